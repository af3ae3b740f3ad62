use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::BuilderConfig;
use crate::error::Result;
use crate::query_builder::SqlBuilder;

/// Structured representation of a visual query, as edited by the host UI.
///
/// Every field is optional; the compiler degrades missing pieces to omitted
/// clauses instead of rejecting the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderOptions {
    pub table: Option<String>,
    pub fields: Vec<String>,
    pub logline_fields: Vec<String>,
    pub log_level_field: Option<String>,
    pub log_time_field: Option<LogTimeField>,
    pub filters: Vec<Filter>,
    pub group_by: Vec<String>,
    pub aggregations: Vec<Aggregation>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<Limit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogTimeField {
    pub name: Option<String>,
    /// Requested CAST target. Only whitelisted temporal types are honoured.
    pub cast: Option<String>,
}

/// One WHERE predicate row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub logical_op: Option<LogicalOp>,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub expr: Option<Expression>,
    #[serde(default, deserialize_with = "deserialize_params")]
    pub params: Vec<String>,
    #[serde(default)]
    pub params_type: Option<ParamsType>,
    #[serde(default)]
    pub skip_empty: bool,
}

/// Older documents stored params as a single comma-separated string or a
/// bare number; both are folded into the list form.
fn deserialize_params<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    fn scalar<E: de::Error>(value: Value) -> std::result::Result<String, E> {
        match value {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(E::custom(format!("unsupported filter parameter {other}"))),
        }
    }

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.into_iter().map(scalar).collect(),
        other => Ok(vec![scalar(other)?]),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn sql(self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamsType {
    Number,
    Text,
    Date,
}

/// Predicate chosen for a filter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Expression {
    Like,
    NotLike,
    Regexp,
    Equals,
    HarshEquals,
    NotEquals,
    LessOrGtr,
    Gtr,
    GtrOrEquals,
    Less,
    LessOrEquals,
    Null,
    NotNull,
    Between,
    NotBetween,
    In,
    NotIn,
    InsideDashboard,
    OutsideDashboard,
    IsTrue,
    IsFalse,
}

impl Expression {
    pub const ALL: [Expression; 21] = [
        Expression::Like,
        Expression::NotLike,
        Expression::Regexp,
        Expression::Equals,
        Expression::HarshEquals,
        Expression::NotEquals,
        Expression::LessOrGtr,
        Expression::Gtr,
        Expression::GtrOrEquals,
        Expression::Less,
        Expression::LessOrEquals,
        Expression::Null,
        Expression::NotNull,
        Expression::Between,
        Expression::NotBetween,
        Expression::In,
        Expression::NotIn,
        Expression::InsideDashboard,
        Expression::OutsideDashboard,
        Expression::IsTrue,
        Expression::IsFalse,
    ];

    /// Null checks, boolean checks and dashboard-range checks never take
    /// parameters.
    pub fn takes_params(self) -> bool {
        !matches!(
            self,
            Expression::Null
                | Expression::NotNull
                | Expression::InsideDashboard
                | Expression::OutsideDashboard
                | Expression::IsTrue
                | Expression::IsFalse
        )
    }

    pub fn is_multi_valued(self) -> bool {
        matches!(
            self,
            Expression::In | Expression::NotIn | Expression::Between | Expression::NotBetween
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub aggregation_function: Option<AggregationFunction>,
    #[serde(default)]
    pub column: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub params: AggregationParams,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationParams {
    pub distinct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationFunction {
    Count,
    Min,
    Max,
    Sum,
    Avg,
    Some,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub sort_direction: Option<SortDirection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Row limit as typed by the user: a number, or free text that may hold a
/// template variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Limit {
    Number(serde_json::Number),
    Text(String),
}

impl From<u64> for Limit {
    fn from(value: u64) -> Self {
        Limit::Number(value.into())
    }
}

impl From<&str> for Limit {
    fn from(value: &str) -> Self {
        Limit::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryFormat {
    #[default]
    Table,
    Timeseries,
    Logs,
}

impl QueryFormat {
    /// Preferred visualisation code understood by the host.
    pub fn visualization_type(self) -> u8 {
        match self {
            QueryFormat::Table => 1,
            QueryFormat::Timeseries => 0,
            QueryFormat::Logs => 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SqlQuery {
    pub raw_sql: String,
    pub query_format: QueryFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderQuery {
    /// Last compiled text of `builder_options`.
    pub raw_sql: String,
    pub builder_options: BuilderOptions,
    pub query_format: QueryFormat,
}

impl BuilderQuery {
    /// Recompile `raw_sql` from the current builder options.
    pub fn refresh_raw_sql(&mut self, builder: &SqlBuilder) {
        self.raw_sql = builder.build(&self.builder_options, self.query_format);
    }
}

/// A saved panel query, discriminated by `queryType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "queryType", rename_all = "lowercase")]
pub enum Query {
    Sql(SqlQuery),
    Builder(BuilderQuery),
}

impl Query {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn default_builder(config: &BuilderConfig) -> Self {
        Query::Builder(BuilderQuery {
            raw_sql: String::new(),
            builder_options: BuilderOptions {
                limit: Some(Limit::from(config.default_limit)),
                ..BuilderOptions::default()
            },
            query_format: config.default_format,
        })
    }

    pub fn default_sql(config: &BuilderConfig) -> Self {
        Query::Sql(SqlQuery {
            raw_sql: String::new(),
            query_format: config.default_format,
        })
    }

    pub fn query_format(&self) -> QueryFormat {
        match self {
            Query::Sql(q) => q.query_format,
            Query::Builder(q) => q.query_format,
        }
    }

    /// SQL text to hand to the execution layer. Builder queries are always
    /// recompiled so a stale `raw_sql` never leaks through.
    pub fn sql(&self, builder: &SqlBuilder) -> String {
        match self {
            Query::Sql(q) => q.raw_sql.clone(),
            Query::Builder(q) => builder.build(&q.builder_options, q.query_format),
        }
    }
}
