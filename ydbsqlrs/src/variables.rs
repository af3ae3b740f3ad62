//! Dashboard/template variable recognition.
//!
//! The compiler never resolves variables; it only needs to know whether a
//! parameter string is a variable token so it can be passed through
//! unescaped. Both the parameter normalizer and the empty-variable fallback
//! go through [`TemplateVariables::is_variable`].

use std::collections::BTreeSet;

/// Panel-scoped pseudo variables substituted by the host at execution time.
pub const PANEL_VARIABLES: [&str; 2] = ["$__fromTimestamp", "$__toTimestamp"];

/// Set of variable tokens the host currently knows about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVariables {
    known: BTreeSet<String>,
}

impl TemplateVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register fully formed tokens such as `${env}`.
    pub fn with_known<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Register bare variable ids as reported by the host (`env` -> `${env}`).
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_known(ids.into_iter().map(|id| format!("${{{}}}", id.as_ref())))
    }

    pub fn is_variable(&self, value: &str) -> bool {
        let value = value.trim();
        PANEL_VARIABLES.contains(&value) || is_variable_syntax(value) || self.known.contains(value)
    }
}

/// `${name}` or `${name:format}`.
pub fn is_variable_syntax(value: &str) -> bool {
    let Some(inner) = value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) else {
        return false;
    };
    let (name, format) = match inner.split_once(':') {
        Some((name, format)) => (name, Some(format)),
        None => (inner, None),
    };
    let name_ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    let format_ok = format.map_or(true, |f| !f.is_empty() && !f.contains(['{', '}']));
    name_ok && format_ok
}
