//! Builder-options to SQL compiler.
//!
//! Every function here is pure and total: incomplete input yields omitted
//! clauses (or an incomplete statement), never an error.

use crate::config::YdbSqlConfig;
use crate::dialect::{Dialect, YqlDialect};
use crate::models::{Aggregation, BuilderOptions, Filter, Limit, OrderBy, QueryFormat};
use crate::variables::TemplateVariables;

mod aggregations;
mod clauses;
mod fields;
mod filters;
mod params;

/// What every clause renderer needs: the dialect and the variable set used
/// to recognize pass-through tokens.
pub(crate) struct RenderContext<'a> {
    pub dialect: &'a dyn Dialect,
    pub variables: &'a TemplateVariables,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(dialect: &'a dyn Dialect, variables: &'a TemplateVariables) -> Self {
        Self { dialect, variables }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SqlBuilder {
    variables: TemplateVariables,
}

impl SqlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variables(variables: TemplateVariables) -> Self {
        Self { variables }
    }

    pub fn from_config(config: &YdbSqlConfig) -> Self {
        Self::with_variables(config.variables.template_variables())
    }

    pub fn variables(&self) -> &TemplateVariables {
        &self.variables
    }

    /// Compile using the YQL dialect.
    pub fn build(&self, options: &BuilderOptions, format: QueryFormat) -> String {
        self.build_with_dialect(options, format, &YqlDialect)
    }

    /// Compile using a provided dialect (useful for tests).
    pub fn build_with_dialect(
        &self,
        options: &BuilderOptions,
        format: QueryFormat,
        dialect: &dyn Dialect,
    ) -> String {
        let ctx = RenderContext::new(dialect, &self.variables);
        let sql = render_query(&ctx, options, format);
        tracing::debug!(
            format = ?format,
            table = options.table.as_deref().unwrap_or_default(),
            sql_len = sql.len(),
            "compiled builder options"
        );
        sql
    }
}

fn render_query(ctx: &RenderContext<'_>, options: &BuilderOptions, format: QueryFormat) -> String {
    let fields = fields::select_list(ctx, options, format).join(", \n");
    let table = options
        .table
        .as_deref()
        .map(|t| ctx.dialect.quote_ident(t))
        .unwrap_or_default();

    let mut sql = String::from("SELECT");
    if !fields.is_empty() {
        sql.push(' ');
        sql.push_str(&fields);
    }
    sql.push_str(" \nFROM");
    if !table.is_empty() {
        sql.push(' ');
        sql.push_str(&table);
    }
    sql.push_str(&filters::render_where(ctx, &options.filters));
    sql.push_str(&clauses::render_group_by(ctx, &options.group_by));
    sql.push_str(&clauses::render_order_by(ctx, &options.order_by));
    sql.push_str(&clauses::render_limit(ctx, options.limit.as_ref()));
    sql
}

fn with_default_context<T>(f: impl FnOnce(&RenderContext<'_>) -> T) -> T {
    let variables = TemplateVariables::new();
    f(&RenderContext::new(&YqlDialect, &variables))
}

/// Compile builder options with the YQL dialect and no host-specific
/// variables.
pub fn raw_sql_from_builder_options(options: &BuilderOptions, format: QueryFormat) -> String {
    SqlBuilder::default().build(options, format)
}

pub fn single_where_expression(filter: &Filter) -> String {
    with_default_context(|ctx| filters::render_single_filter(ctx, filter))
}

pub fn where_expression(filters: &[Filter]) -> String {
    with_default_context(|ctx| filters::render_where(ctx, filters))
}

/// Parameter clause of a filter, or `None` when it has nothing to render.
pub fn prepare_params(filter: &Filter) -> Option<String> {
    with_default_context(|ctx| {
        params::prepare_params(ctx, &filter.params, filter.expr, filter.params_type)
    })
}

pub fn group_by(fields: &[String]) -> String {
    with_default_context(|ctx| clauses::render_group_by(ctx, fields))
}

pub fn order_by_condition(order_by: &[OrderBy]) -> String {
    with_default_context(|ctx| clauses::render_order_by(ctx, order_by))
}

pub fn limit_condition(limit: Option<&Limit>) -> String {
    with_default_context(|ctx| clauses::render_limit(ctx, limit))
}

pub fn single_aggregation(aggregation: &Aggregation) -> String {
    with_default_context(|ctx| aggregations::render_single_aggregation(ctx, aggregation))
}

pub fn log_line_fields(fields: &[String]) -> String {
    with_default_context(|ctx| fields::render_log_line(ctx, fields, None))
}

/// SQL fragment of an expression, as rendered after the column.
pub fn expression_sql(expr: crate::models::Expression) -> String {
    filters::expression_sql(&YqlDialect, expr)
}
