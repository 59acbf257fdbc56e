//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger rules configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Ledger rules configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Days between invoice issue date and debt due date when none is given.
    #[serde(default = "default_due_days")]
    pub default_due_days: u32,
    /// How many candidate codes to try before giving up on a collision.
    #[serde(default = "default_code_generation_attempts")]
    pub code_generation_attempts: u32,
}

fn default_due_days() -> u32 {
    30
}

fn default_code_generation_attempts() -> u32 {
    5
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_due_days: default_due_days(),
            code_generation_attempts: default_code_generation_attempts(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "soquy=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `.env`, config files and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SOQUY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
