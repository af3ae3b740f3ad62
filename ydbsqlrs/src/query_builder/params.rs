use crate::models::{Expression, ParamsType};

use super::RenderContext;

const DASHBOARD_START: &str = "dashboardStart";
const DASHBOARD_END: &str = "dashboardEnd";

/// Render the parameter part of a filter clause.
///
/// `None` means there is nothing to render: no params type, no params, or a
/// multi-valued list that was empty after splitting.
pub(crate) fn prepare_params(
    ctx: &RenderContext<'_>,
    params: &[String],
    expr: Option<Expression>,
    params_type: Option<ParamsType>,
) -> Option<String> {
    let params_type = params_type?;
    let first = params.first()?;

    match expr {
        Some(expr) if expr.is_multi_valued() => {
            let values: Vec<String> = params
                .iter()
                .flat_map(|p| split_param(ctx, p))
                .map(|v| normalize_value(ctx, v, params_type))
                .collect();
            if values.is_empty() {
                return None;
            }
            match expr {
                Expression::In | Expression::NotIn => Some(format!("({})", values.join(", "))),
                _ => Some(values.join(" AND ")),
            }
        }
        _ => Some(normalize_value(ctx, first, params_type)),
    }
}

/// A free-text element may itself hold a comma separated list. Variables are
/// kept whole; the host expands multi-value variables itself.
fn split_param<'p>(ctx: &RenderContext<'_>, param: &'p str) -> Vec<&'p str> {
    if ctx.variables.is_variable(param) {
        return vec![param.trim()];
    }
    param
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn normalize_value(ctx: &RenderContext<'_>, raw: &str, params_type: ParamsType) -> String {
    let trimmed = raw.trim();
    if ctx.variables.is_variable(trimmed) {
        return trimmed.to_string();
    }
    match trimmed {
        DASHBOARD_START => return ctx.dialect.range_start().to_string(),
        DASHBOARD_END => return ctx.dialect.range_end().to_string(),
        _ => {}
    }
    if params_type == ParamsType::Number {
        if let Some(n) = numeral(trimmed) {
            return n;
        }
    }
    ctx.dialect.quote_string(raw)
}

/// Canonical numeral for a finite number, `None` for anything else.
pub(crate) fn numeral(value: &str) -> Option<String> {
    if let Ok(n) = value.parse::<i64>() {
        return Some(n.to_string());
    }
    if let Ok(n) = value.parse::<u64>() {
        return Some(n.to_string());
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::params_type_for;
    use crate::dialect::YqlDialect;
    use crate::variables::TemplateVariables;

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn with_ctx<T>(f: impl FnOnce(&RenderContext<'_>) -> T) -> T {
        let vars = TemplateVariables::new();
        f(&RenderContext::new(&YqlDialect, &vars))
    }

    #[test]
    fn nothing_without_type_or_values() {
        with_ctx(|ctx| {
            assert_eq!(prepare_params(ctx, &params(&["1"]), Some(Expression::Equals), None), None);
            assert_eq!(
                prepare_params(ctx, &[], Some(Expression::Equals), Some(ParamsType::Number)),
                None
            );
            assert_eq!(
                prepare_params(ctx, &params(&[" , "]), Some(Expression::In), Some(ParamsType::Text)),
                None
            );
        });
    }

    #[test]
    fn single_value_uses_first_param_only() {
        with_ctx(|ctx| {
            let p = params(&["abc", "def"]);
            assert_eq!(
                prepare_params(ctx, &p, Some(Expression::Equals), Some(ParamsType::Text)),
                Some("\"abc\"".to_string())
            );
            let p = params(&["foo, bar, baz, 1  "]);
            assert_eq!(
                prepare_params(ctx, &p, Some(Expression::Gtr), Some(ParamsType::Number)),
                Some("\"foo, bar, baz, 1  \"".to_string())
            );
        });
    }

    #[test]
    fn mixed_lists_for_in_and_between() {
        with_ctx(|ctx| {
            let p = params(&["1, 2 ,bar,  3 "]);
            assert_eq!(
                prepare_params(ctx, &p, Some(Expression::NotIn), Some(ParamsType::Number)),
                Some("(1, 2, \"bar\", 3)".to_string())
            );
            assert_eq!(
                prepare_params(ctx, &p, Some(Expression::Between), Some(ParamsType::Number)),
                Some("1 AND 2 AND \"bar\" AND 3".to_string())
            );
            let p = params(&["abc"]);
            assert_eq!(
                prepare_params(ctx, &p, Some(Expression::In), Some(ParamsType::Text)),
                Some("(\"abc\")".to_string())
            );
        });
    }

    #[test]
    fn text_typed_numbers_stay_quoted() {
        with_ctx(|ctx| {
            let p = params(&["1", "2"]);
            assert_eq!(
                prepare_params(ctx, &p, Some(Expression::In), Some(ParamsType::Text)),
                Some("(\"1\", \"2\")".to_string())
            );
        });
    }

    #[test]
    fn variables_pass_through() {
        with_ctx(|ctx| {
            let p = params(&[" ${host} "]);
            assert_eq!(
                prepare_params(ctx, &p, Some(Expression::Equals), Some(ParamsType::Text)),
                Some("${host}".to_string())
            );
            let p = params(&["${ids:csv}", "7"]);
            assert_eq!(
                prepare_params(ctx, &p, Some(Expression::In), Some(ParamsType::Number)),
                Some("(${ids:csv}, 7)".to_string())
            );
        });
    }

    #[test]
    fn dashboard_range_tokens() {
        with_ctx(|ctx| {
            let p = params(&["dashboardStart"]);
            assert_eq!(
                prepare_params(ctx, &p, Some(Expression::Equals), Some(ParamsType::Date)),
                Some("$__fromTimestamp".to_string())
            );
            let p = params(&["dashboardStart, dashboardEnd"]);
            assert_eq!(
                prepare_params(ctx, &p, Some(Expression::Between), Some(ParamsType::Date)),
                Some("$__fromTimestamp AND $__toTimestamp".to_string())
            );
            let p = params(&["dashboardEnd"]);
            assert_eq!(
                prepare_params(ctx, &p, Some(Expression::Equals), Some(ParamsType::Text)),
                Some("$__toTimestamp".to_string())
            );
            let p = params(&["dashboardStart"]);
            assert_eq!(
                prepare_params(ctx, &p, Some(Expression::Equals), None),
                None
            );
        });
    }

    #[test]
    fn dashboard_range_tokens_on_time_columns() {
        with_ctx(|ctx| {
            let expr = Some(Expression::GtrOrEquals);
            let params_type = params_type_for("Timestamp", expr);
            let p = params(&["dashboardStart"]);
            assert_eq!(
                prepare_params(ctx, &p, expr, params_type),
                Some("$__fromTimestamp".to_string())
            );
            let expr = Some(Expression::NotBetween);
            let p = params(&["dashboardStart,dashboardEnd"]);
            assert_eq!(
                prepare_params(ctx, &p, expr, params_type_for("Optional<Datetime>", expr)),
                Some("$__fromTimestamp AND $__toTimestamp".to_string())
            );
        });
    }

    #[test]
    fn numerals_are_canonical() {
        assert_eq!(numeral("0"), Some("0".to_string()));
        assert_eq!(numeral("-12"), Some("-12".to_string()));
        assert_eq!(numeral("1.50"), Some("1.5".to_string()));
        assert_eq!(numeral("18446744073709551615"), Some("18446744073709551615".to_string()));
        assert_eq!(numeral("inf"), None);
        assert_eq!(numeral("NaN"), None);
        assert_eq!(numeral("1 2"), None);
        assert_eq!(numeral(""), None);
    }
}
