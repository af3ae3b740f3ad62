use thiserror::Error;

pub type Result<T> = std::result::Result<T, YdbSqlError>;

/// Errors from the fallible edges of the crate. SQL compilation itself
/// never fails.
#[derive(Debug, Error)]
pub enum YdbSqlError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("macro error: {0}")]
    Macro(String),
}
