//! Handles settings for the application. Configuration is written in
//! `settings.toml` (see `settings.example.toml`), overridden by
//! `FINANCE_TRACKER__<SECTION>__<KEY>` environment variables and finally by
//! command line flags.
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";
const ENV_PREFIX: &str = "FINANCE_TRACKER";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    /// Log level applied to the workspace crates.
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    /// Path of the SQLite file, created when missing.
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
    pub expose_internal_errors: bool,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
            database: Database::Sqlite("finance_tracker.db".to_string()),
            expose_internal_errors: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub server: Server,
}

#[derive(Debug, Parser)]
#[command(name = "finance_tracker", version)]
struct Args {
    /// Optional config file path (TOML), without or with extension.
    #[arg(long)]
    config: Option<String>,
    /// Override the listen address.
    #[arg(long)]
    bind: Option<String>,
    /// Override the listen port.
    #[arg(long, env = "PORT")]
    port: Option<u16>,
    /// Override the log level.
    #[arg(long)]
    level: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        let mut settings = Self::from_builder(
            Config::builder().add_source(File::with_name(config_path).required(false)),
        )?;

        if let Some(bind) = args.bind {
            settings.server.bind = bind;
        }
        if let Some(port) = args.port {
            settings.server.port = port;
        }
        if let Some(level) = args.level {
            settings.app.level = level;
        }

        Ok(settings)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Settings {
        Settings::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
            .unwrap()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let settings = from_toml("");
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert_eq!(settings.server.port, 8000);
        assert!(!settings.server.expose_internal_errors);
    }

    #[test]
    fn database_accepts_memory_and_sqlite_path() {
        let settings = from_toml(
            r#"
            [server]
            database = "memory"
            "#,
        );
        assert_eq!(settings.server.database, Database::Memory);

        let settings = from_toml(
            r#"
            [server]
            port = 9000
            database = { sqlite = "/tmp/ledger.db" }
            expose_internal_errors = true
            "#,
        );
        assert_eq!(settings.server.port, 9000);
        assert_eq!(
            settings.server.database,
            Database::Sqlite("/tmp/ledger.db".to_string())
        );
        assert!(settings.server.expose_internal_errors);
    }
}
