//! SELECT list composition, including the log-format field synthesis.

use crate::data_types::CastTarget;
use crate::models::{BuilderOptions, LogTimeField, QueryFormat};

use super::aggregations::render_aggregations;
use super::RenderContext;

const LOG_LEVEL_ALIAS: &str = "level";
const LOG_LINE_ALIAS: &str = "logLine";

/// Log-time column and the expression that selects it.
pub(crate) struct LogTime<'a> {
    pub name: &'a str,
    pub expr: String,
}

pub(crate) fn log_time<'a>(ctx: &RenderContext<'_>, field: &'a LogTimeField) -> Option<LogTime<'a>> {
    let name = field.name.as_deref().filter(|n| !n.is_empty())?;
    let column = ctx.dialect.quote_ident(name);
    let cast = field.cast.as_deref().filter(|c| !c.is_empty());
    let expr = match cast.map(|c| (c, c.parse::<CastTarget>())) {
        Some((_, Ok(target))) => ctx.dialect.cast(&column, target.as_str()),
        Some((requested, Err(()))) => {
            tracing::warn!(cast = %requested, field = %name, "ignoring unsupported log time cast");
            column
        }
        None => column,
    };
    Some(LogTime { name, expr })
}

/// `"a="||CAST(`a` AS String)||", "||"b="||CAST(`b` AS String) AS `logLine``
pub(crate) fn render_log_line(
    ctx: &RenderContext<'_>,
    fields: &[String],
    log_time: Option<&LogTime<'_>>,
) -> String {
    let dialect = ctx.dialect;
    let separator = dialect.quote_string(", ");
    let mut parts = Vec::new();
    for field in fields.iter().filter(|f| !f.is_empty()) {
        let value = match log_time {
            Some(t) if t.name == field.as_str() => t.expr.clone(),
            _ => dialect.quote_ident(field),
        };
        if !parts.is_empty() {
            parts.push(separator.clone());
        }
        parts.push(dialect.quote_string(&format!("{field}=")));
        parts.push(dialect.cast(&value, dialect.string_type()));
    }
    if parts.is_empty() {
        return String::new();
    }
    format!(
        "{} AS {}",
        dialect.concat(&parts),
        dialect.quote_ident(LOG_LINE_ALIAS)
    )
}

fn render_log_level(ctx: &RenderContext<'_>, field: &str) -> String {
    let lowered = ctx.dialect.lower_case(&ctx.dialect.quote_ident(field));
    if field == LOG_LEVEL_ALIAS {
        lowered
    } else {
        format!("{lowered} AS {}", ctx.dialect.quote_ident(LOG_LEVEL_ALIAS))
    }
}

/// Every non-empty item of the SELECT list, in output order.
pub(crate) fn select_list(
    ctx: &RenderContext<'_>,
    options: &BuilderOptions,
    format: QueryFormat,
) -> Vec<String> {
    let mut items = match format {
        QueryFormat::Logs => log_fields(ctx, options),
        QueryFormat::Table | QueryFormat::Timeseries => options
            .fields
            .iter()
            .map(|f| ctx.dialect.quote_ident(f))
            .collect(),
    };
    items.extend(render_aggregations(ctx, &options.aggregations));
    items.retain(|item| !item.is_empty());
    items
}

fn log_fields(ctx: &RenderContext<'_>, options: &BuilderOptions) -> Vec<String> {
    let level = options
        .log_level_field
        .as_deref()
        .filter(|l| !l.is_empty());
    let time = options
        .log_time_field
        .as_ref()
        .and_then(|t| log_time(ctx, t));
    let time_name = time.as_ref().map(|t| t.name);

    let mut items = vec![render_log_line(ctx, &options.logline_fields, time.as_ref())];
    if let Some(t) = &time {
        items.push(t.expr.clone());
    }
    items.extend(
        options
            .fields
            .iter()
            .filter(|f| Some(f.as_str()) != level && Some(f.as_str()) != time_name)
            .map(|f| ctx.dialect.quote_ident(f)),
    );
    if let Some(level) = level {
        items.push(render_log_level(ctx, level));
    }
    items
}
