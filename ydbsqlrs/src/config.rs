//! Configuration for the query builder.
//!
//! TOML based, every section optional:
//!
//! ```toml
//! [builder]
//! default_format = "logs"
//! default_limit = 500
//!
//! [variables]
//! known = ["${env}", "${host}"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, YdbSqlError};
use crate::models::QueryFormat;
use crate::variables::TemplateVariables;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct YdbSqlConfig {
    pub builder: BuilderConfig,
    pub variables: VariablesConfig,
}

/// Defaults seeded into freshly created queries.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Query format of a new query (default: table).
    pub default_format: QueryFormat,
    /// Row limit of a new builder query (default: 100).
    pub default_limit: u64,
}

/// Template variables known ahead of time.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VariablesConfig {
    /// Fully formed tokens, e.g. `${env}`.
    pub known: Vec<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            default_format: QueryFormat::Table,
            default_limit: 100,
        }
    }
}

impl VariablesConfig {
    pub fn template_variables(&self) -> TemplateVariables {
        TemplateVariables::with_known(self.known.iter().cloned())
    }
}

impl YdbSqlConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| YdbSqlError::Config(format!("failed to read config file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| YdbSqlError::Config(format!("failed to parse config: {e}")))
    }

    /// Load from the default search path, falling back to built-in defaults.
    ///
    /// Search order:
    /// 1. `YDBSQL_CONFIG` environment variable
    /// 2. `./ydbsql.toml` (current directory)
    /// 3. `<user config dir>/ydbsql/config.toml`
    pub fn load_default() -> Self {
        let sources = search_path(
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            dirs::config_dir(),
        );
        Self::load_first(&sources)
    }

    /// First source that exists and parses wins. A file that exists but
    /// does not parse is skipped with a warning.
    pub fn load_first(sources: &[ConfigSource]) -> Self {
        for source in sources {
            let path = source.path();
            if !path.is_file() {
                if let ConfigSource::Env(_) = source {
                    tracing::warn!(path = %path.display(), "{CONFIG_ENV} points to a missing file");
                }
                continue;
            }
            match Self::from_file(path) {
                Ok(cfg) => {
                    tracing::info!(source = source.label(), path = %path.display(), "loaded config");
                    return cfg;
                }
                Err(e) => tracing::warn!(
                    source = source.label(),
                    path = %path.display(),
                    error = %e,
                    "skipping config"
                ),
            }
        }
        tracing::debug!("no config file found, using defaults");
        Self::default()
    }
}

const CONFIG_ENV: &str = "YDBSQL_CONFIG";
const LOCAL_CONFIG: &str = "ydbsql.toml";

/// A place a configuration file may be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Env(PathBuf),
    WorkingDir(PathBuf),
    UserDir(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Env(p) | ConfigSource::WorkingDir(p) | ConfigSource::UserDir(p) => p,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ConfigSource::Env(_) => "env",
            ConfigSource::WorkingDir(_) => "cwd",
            ConfigSource::UserDir(_) => "user",
        }
    }
}

/// Candidate config files in priority order.
pub fn search_path(env_path: Option<PathBuf>, config_dir: Option<PathBuf>) -> Vec<ConfigSource> {
    let mut sources = Vec::with_capacity(3);
    sources.extend(env_path.map(ConfigSource::Env));
    sources.push(ConfigSource::WorkingDir(PathBuf::from(LOCAL_CONFIG)));
    sources.extend(
        config_dir.map(|dir| ConfigSource::UserDir(dir.join("ydbsql").join("config.toml"))),
    );
    sources
}
