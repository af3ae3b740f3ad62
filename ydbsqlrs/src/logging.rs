use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `YDBSQL_LOG` (then `RUST_LOG`,
/// default `warn`). Safe to call more than once.
pub fn init_tracing() {
    let filter = std::env::var("YDBSQL_LOG")
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
