//! Macro expansion for a concrete dashboard time range.
//!
//! Compiled (or hand-written) SQL may contain host macros:
//!
//! - `$__fromTimestamp`, `$__toTimestamp`
//! - `$__timeFilter(column)`
//! - `$__varFallback(fallback, value)`
//!
//! Unknown `$__name` tokens are left untouched so the host can handle them.

use chrono::{DateTime, Utc};

use crate::error::{Result, YdbSqlError};

const MACRO_PREFIX: &str = "$__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }
}

fn timestamp_literal(at: DateTime<Utc>) -> String {
    format!("CAST({} AS TIMESTAMP)", at.timestamp_micros())
}

/// Expand every known macro in `sql`.
pub fn expand(sql: &str, range: &TimeRange) -> Result<String> {
    let mut out = String::with_capacity(sql.len());
    let mut rest = sql;

    while let Some(start) = rest.find(MACRO_PREFIX) {
        out.push_str(&rest[..start]);
        let after_prefix = &rest[start + MACRO_PREFIX.len()..];
        let name_len = after_prefix
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after_prefix.len());
        let name = &after_prefix[..name_len];
        let tail = &after_prefix[name_len..];

        match name {
            "fromTimestamp" => {
                out.push_str(&timestamp_literal(range.from));
                rest = tail;
            }
            "toTimestamp" => {
                out.push_str(&timestamp_literal(range.to));
                rest = tail;
            }
            "timeFilter" | "varFallback" => {
                let (args, remaining) = take_args(name, tail)?;
                let expanded = match name {
                    "timeFilter" => time_filter(&args, range)?,
                    _ => var_fallback(&args)?,
                };
                out.push_str(&expanded);
                rest = remaining;
            }
            _ => {
                out.push_str(MACRO_PREFIX);
                out.push_str(name);
                rest = tail;
            }
        }
    }
    out.push_str(rest);

    tracing::trace!(before = sql.len(), after = out.len(), "expanded macros");
    Ok(out)
}

/// Split `(a, b)` at the start of `input` into trimmed arguments.
fn take_args<'s>(name: &str, input: &'s str) -> Result<(Vec<String>, &'s str)> {
    let body = input
        .strip_prefix('(')
        .ok_or_else(|| YdbSqlError::Macro(format!("$__{name} expects arguments")))?;

    let mut depth = 0usize;
    for (idx, ch) in body.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => {
                let args = body[..idx]
                    .split(',')
                    .map(|a| a.trim().to_string())
                    .collect();
                return Ok((args, &body[idx + 1..]));
            }
            ')' => depth -= 1,
            _ => {}
        }
    }
    Err(YdbSqlError::Macro(format!("unterminated $__{name} call")))
}

fn time_filter(args: &[String], range: &TimeRange) -> Result<String> {
    let [column] = args else {
        return Err(YdbSqlError::Macro(format!(
            "$__timeFilter expected 1 argument, received {}",
            args.len()
        )));
    };
    if column.is_empty() {
        return Err(YdbSqlError::Macro("$__timeFilter needs a column".to_string()));
    }
    Ok(format!(
        "{column} >= {} AND {column} <=  {}",
        timestamp_literal(range.from),
        timestamp_literal(range.to)
    ))
}

fn is_empty_literal(value: &str) -> bool {
    matches!(value, "" | "''" | "\"\"")
}

fn var_fallback(args: &[String]) -> Result<String> {
    let [fallback, value] = args else {
        return Err(YdbSqlError::Macro(format!(
            "$__varFallback expected 2 arguments, received {}",
            args.len()
        )));
    };
    if !is_empty_literal(value) {
        return Ok(value.clone());
    }
    if is_empty_literal(fallback) {
        return Err(YdbSqlError::Macro(
            "fallback should contain at least one character".to_string(),
        ));
    }
    Ok(fallback.clone())
}
