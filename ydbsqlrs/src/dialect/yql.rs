//! YQL dialect implementation.

use super::{escape_and_wrap, Dialect};

#[derive(Debug, Default, Clone, Copy)]
pub struct YqlDialect;

impl Dialect for YqlDialect {
    fn quote_ident(&self, ident: &str) -> String {
        escape_and_wrap(ident, '`')
    }

    fn quote_string(&self, value: &str) -> String {
        if value.is_empty() {
            return "\"\"".to_string();
        }
        escape_and_wrap(value, '"')
    }

    fn lower_case(&self, expr: &str) -> String {
        format!("String::AsciiToLower({expr})")
    }

    fn range_start(&self) -> &'static str {
        "$__fromTimestamp"
    }

    fn range_end(&self) -> &'static str {
        "$__toTimestamp"
    }

    fn limit_type(&self) -> &'static str {
        "Uint16"
    }

    fn string_type(&self) -> &'static str {
        "String"
    }
}
