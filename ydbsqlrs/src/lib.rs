pub mod config;
pub mod data_types;
pub mod dialect;
pub mod error;
pub mod logging;
pub mod macros;
pub mod models;
pub mod query_builder;
pub mod variables;

pub use config::YdbSqlConfig;
pub use error::{Result, YdbSqlError};
pub use models::{BuilderOptions, Query, QueryFormat};
pub use query_builder::{raw_sql_from_builder_options, SqlBuilder};
pub use variables::TemplateVariables;
