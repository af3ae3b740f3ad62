use crate::models::{Limit, OrderBy};

use super::params::numeral;
use super::RenderContext;

pub(crate) fn render_group_by(ctx: &RenderContext<'_>, fields: &[String]) -> String {
    let columns: Vec<String> = fields
        .iter()
        .map(|f| ctx.dialect.quote_ident(f))
        .filter(|c| !c.is_empty())
        .collect();
    if columns.is_empty() {
        return String::new();
    }
    format!("\n GROUP BY {}", columns.join(", "))
}

pub(crate) fn render_order_by(ctx: &RenderContext<'_>, order_by: &[OrderBy]) -> String {
    let items: Vec<String> = order_by
        .iter()
        .filter_map(|o| {
            let column = o.column.as_deref().filter(|c| !c.is_empty())?;
            let column = ctx.dialect.quote_ident(column);
            Some(match o.sort_direction {
                Some(dir) => format!("{column} {}", dir.sql()),
                None => column,
            })
        })
        .collect();
    if items.is_empty() {
        return String::new();
    }
    format!("\n ORDER BY {}", items.join(", "))
}

/// Canonical row count, or `None` unless the value is a non-negative integer.
fn row_count(value: &str) -> Option<String> {
    numeral(value).filter(|n| n.parse::<u64>().is_ok())
}

pub(crate) fn render_limit(ctx: &RenderContext<'_>, limit: Option<&Limit>) -> String {
    let text = match limit {
        None => return String::new(),
        Some(Limit::Number(n)) => n.to_string(),
        Some(Limit::Text(text)) => text.trim().to_string(),
    };
    if text.is_empty() {
        return String::new();
    }
    if ctx.variables.is_variable(&text) {
        return format!(" \nLIMIT CAST({text} AS {})", ctx.dialect.limit_type());
    }
    match row_count(&text) {
        Some(n) => format!(" \nLIMIT {n}"),
        None => {
            tracing::warn!(limit = %text, "ignoring limit that is not a row count or a variable");
            String::new()
        }
    }
}
