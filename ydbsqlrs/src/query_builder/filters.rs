use crate::dialect::Dialect;
use crate::models::{Expression, Filter};

use super::params::prepare_params;
use super::RenderContext;

/// SQL fragment for each expression. The match is exhaustive on purpose:
/// a new expression variant does not compile until it is mapped here.
pub(crate) fn expression_sql(dialect: &dyn Dialect, expr: Expression) -> String {
    let sql = match expr {
        Expression::Like => "LIKE",
        Expression::NotLike => "NOT LIKE",
        Expression::Regexp => "REGEXP",
        Expression::Equals => "=",
        Expression::HarshEquals => "==",
        Expression::NotEquals => "!=",
        Expression::LessOrGtr => "<>",
        Expression::Gtr => ">",
        Expression::GtrOrEquals => ">=",
        Expression::Less => "<",
        Expression::LessOrEquals => "<=",
        Expression::Null => "IS NULL",
        Expression::NotNull => "IS NOT NULL",
        Expression::Between => "BETWEEN",
        Expression::NotBetween => "NOT BETWEEN",
        Expression::In => "IN",
        Expression::NotIn => "NOT IN",
        Expression::InsideDashboard => {
            return format!(
                "BETWEEN {} AND {}",
                dialect.range_start(),
                dialect.range_end()
            )
        }
        Expression::OutsideDashboard => {
            return format!(
                "NOT BETWEEN {} AND {}",
                dialect.range_start(),
                dialect.range_end()
            )
        }
        Expression::IsTrue => "== true",
        Expression::IsFalse => "== false",
    };
    sql.to_string()
}

/// The variable that guards a skip-empty filter: the filter's only parameter,
/// when that parameter is a template variable.
fn fallback_variable<'f>(ctx: &RenderContext<'_>, filter: &'f Filter) -> Option<&'f str> {
    match filter.params.as_slice() {
        [only] if ctx.variables.is_variable(only) => Some(only.trim()),
        _ => None,
    }
}

pub(crate) fn render_single_filter(ctx: &RenderContext<'_>, filter: &Filter) -> String {
    let column = filter.column.as_deref().filter(|c| !c.is_empty());
    let (Some(column), Some(expr)) = (column, filter.expr) else {
        return String::new();
    };

    let mut clause = format!(
        "{} {}",
        ctx.dialect.quote_ident(column),
        expression_sql(ctx.dialect, expr)
    );

    if expr.takes_params() {
        if let Some(params) = prepare_params(ctx, &filter.params, filter.expr, filter.params_type) {
            clause.push(' ');
            clause.push_str(&params);
            if filter.skip_empty {
                if let Some(var) = fallback_variable(ctx, filter) {
                    clause = format!("IF(\"{var}\" == \"\", true, {clause})");
                }
            }
        }
    }

    match filter.logical_op {
        Some(op) => format!("{} {clause}", op.sql()),
        None => clause,
    }
}

pub(crate) fn render_where(ctx: &RenderContext<'_>, filters: &[Filter]) -> String {
    let rendered: Vec<String> = filters
        .iter()
        .filter(|f| f.column.as_deref().is_some_and(|c| !c.is_empty()))
        .map(|f| render_single_filter(ctx, f))
        .filter(|clause| !clause.is_empty())
        .collect();

    if rendered.len() < filters.len() {
        tracing::trace!(
            total = filters.len(),
            rendered = rendered.len(),
            "dropped incomplete filter rows"
        );
    }

    if rendered.is_empty() {
        return String::new();
    }
    format!(" \nWHERE \n{}", rendered.join(" \n"))
}
