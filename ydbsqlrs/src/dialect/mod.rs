//! SQL dialect abstractions.
//!
//! The query builder decides *what* to render; the dialect decides how
//! identifiers, literals and the few dialect-specific functions are spelled.

use crate::models::AggregationFunction;

/// Dialects render identifiers and primitive expression pieces.
pub trait Dialect {
    fn quote_ident(&self, ident: &str) -> String;
    fn quote_string(&self, value: &str) -> String;
    /// ASCII lower-casing of a rendered expression.
    fn lower_case(&self, expr: &str) -> String;
    /// Token the host replaces with the dashboard range start.
    fn range_start(&self) -> &'static str;
    /// Token the host replaces with the dashboard range end.
    fn range_end(&self) -> &'static str;
    /// Unsigned type a templated LIMIT is cast to.
    fn limit_type(&self) -> &'static str;
    fn string_type(&self) -> &'static str;

    fn cast(&self, expr: &str, data_type: &str) -> String {
        format!("CAST({expr} AS {data_type})")
    }
    fn concat(&self, parts: &[String]) -> String {
        parts.join("||")
    }
    fn render_aggregation(&self, func: AggregationFunction, distinct: bool, expr: &str) -> String {
        let name = match func {
            AggregationFunction::Count => "COUNT",
            AggregationFunction::Min => "MIN",
            AggregationFunction::Max => "MAX",
            AggregationFunction::Sum => "SUM",
            AggregationFunction::Avg => "AVG",
            AggregationFunction::Some => "SOME",
        };
        let distinct = if distinct { "DISTINCT " } else { "" };
        format!("{name}({distinct}{expr})")
    }
}

/// Backslash-escape backslashes and `wrapper`, then wrap.
///
/// An empty input yields an empty string rather than an empty quoted token.
pub fn escape_and_wrap(value: &str, wrapper: char) -> String {
    if value.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push(wrapper);
    for ch in value.chars() {
        if ch == '\\' || ch == wrapper {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push(wrapper);
    out
}

mod yql;
pub use yql::YqlDialect;
