use crate::models::Aggregation;

use super::RenderContext;

const ALL_COLUMNS: &str = "*";

pub(crate) fn render_single_aggregation(ctx: &RenderContext<'_>, agg: &Aggregation) -> String {
    let Some(func) = agg.aggregation_function else {
        return String::new();
    };
    if agg.column.is_empty() {
        return String::new();
    }

    let column = if agg.column == ALL_COLUMNS {
        ALL_COLUMNS.to_string()
    } else {
        ctx.dialect.quote_ident(&agg.column)
    };
    let mut sql = ctx
        .dialect
        .render_aggregation(func, agg.params.distinct, &column);
    if let Some(alias) = agg.alias.as_deref().filter(|a| !a.is_empty()) {
        sql.push_str(" AS ");
        sql.push_str(&ctx.dialect.quote_ident(alias));
    }
    sql
}

pub(crate) fn render_aggregations(ctx: &RenderContext<'_>, aggs: &[Aggregation]) -> Vec<String> {
    aggs.iter()
        .map(|a| render_single_aggregation(ctx, a))
        .filter(|a| !a.is_empty())
        .collect()
}
