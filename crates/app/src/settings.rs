//! Application settings, read once at startup.
//!
//! Values come from an optional TOML file (see `settings.toml` at the
//! repository root) and may be overridden by `CASHFLOW__SECTION__KEY`
//! environment variables.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl From<&Pagination> for engine::EngineConfig {
    fn from(value: &Pagination) -> Self {
        Self {
            default_page_size: value.default_page_size,
            max_page_size: value.max_page_size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub pagination: Pagination,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let defaults = engine::EngineConfig::default();
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 8000)?
            .set_default("server.database", "memory")?
            .set_default("pagination.default_page_size", defaults.default_page_size)?
            .set_default("pagination.max_page_size", defaults.max_page_size)?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("CASHFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
