//! Application configuration.
//!
//! Sources, later ones overriding earlier ones:
//! - built-in defaults
//! - `postlens.toml` in the working directory (optional)
//! - environment variables prefixed with `POSTLENS__`, e.g.
//!   `POSTLENS__ANALYSIS__MAX_WORKERS=8`
//! - `POSTLENS_DB` for the database path

use crate::application::batch_analysis::DEFAULT_MAX_WORKERS;
use crate::domain::error::DomainError;
use crate::domain::values::language::{Language, LanguageSet};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Posts analysed concurrently by a batch run
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Languages whose stop words are filtered out
    #[serde(default = "default_stopword_languages")]
    pub stopword_languages: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub json_logging: bool,
}

fn default_db_path() -> String { "./postlens.db".to_string() }
fn default_max_workers() -> usize { DEFAULT_MAX_WORKERS }
fn default_stopword_languages() -> Vec<String> { vec!["russian".to_string(), "english".to_string()] }
fn default_log_level() -> String { "info".to_string() }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_db_path() }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            stopword_languages: default_stopword_languages(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: false,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, DomainError> {
        let config = Config::builder()
            .add_source(File::with_name("postlens").required(false))
            .add_source(
                Environment::with_prefix("POSTLENS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("analysis.stopword_languages"),
            )
            .build()
            .map_err(|e| DomainError::Config(e.to_string()))?;

        let mut app: AppConfig = config
            .try_deserialize()
            .map_err(|e| DomainError::Config(e.to_string()))?;
        if let Ok(path) = std::env::var("POSTLENS_DB") {
            app.database.path = path;
        }
        app.validate()?;
        Ok(app)
    }

    /// In-memory database with default settings.
    pub fn in_memory() -> Self {
        let mut config = Self::default();
        config.database.path = ":memory:".to_string();
        config
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.analysis.max_workers == 0 {
            return Err(DomainError::Config("analysis.max_workers must be at least 1".into()));
        }
        self.languages().map(|_| ())
    }

    pub fn languages(&self) -> Result<LanguageSet, DomainError> {
        let languages = self
            .analysis
            .stopword_languages
            .iter()
            .map(|name| name.parse::<Language>().map_err(DomainError::Config))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LanguageSet::new(languages))
    }
}
