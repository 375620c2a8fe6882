//! Handles settings for the application. Configuration is read from
//! `settings.toml` and can be overridden by `LEDGER__`-prefixed environment
//! variables (`LEDGER__SERVER__PORT=8080`).
//!
//! See `settings.toml` for the configuration.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Where the ledger lives: `memory` or a path to a SQLite file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl From<String> for Database {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("memory") {
            Self::Memory
        } else {
            Self::Sqlite(value.trim().to_string())
        }
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file("settings")
    }

    fn from_file(name: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .add_source(File::with_name(name).required(false))
            .add_source(
                Environment::with_prefix("LEDGER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_urls() {
        assert_eq!(Database::from("memory".to_string()), Database::Memory);
        assert_eq!(Database::Memory.url(), "sqlite::memory:");
        assert_eq!(
            Database::from("./ledger.db".to_string()).url(),
            "sqlite:./ledger.db?mode=rwc"
        );
    }

    #[test]
    fn defaults_without_a_file() {
        let settings = Settings::from_file("does-not-exist").unwrap();
        assert_eq!(settings.app.level, "info");
    }
}
