//! Configuration loading from file and environment variables.

use dxvoice_session::SessionSettings;
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Backend and session timing settings.
    #[serde(default)]
    pub session: SessionSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "dxvoice_session=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies environment overrides.
///
/// Environment variable overrides:
/// - `DXVOICE_BASE_URL`
/// - `DXVOICE_VARIANT` (`local_parse` or `remote_fetch`)
/// - `DXVOICE_SETTLE_DELAY_MS`
/// - `DXVOICE_AGENT_TIMEOUT_MS`
/// - `DXVOICE_REQUEST_TIMEOUT_SECS`
/// - `DXVOICE_LANGUAGE` (`en`, `kn`, `hi`, `ta`)
/// - `DXVOICE_VOICE_BASE`
/// - `DXVOICE_LOG_LEVEL`
/// - `DXVOICE_LOG_JSON`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies overrides from `lookup`, which maps a variable name to its value.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let session = &mut config.session;

    if let Some(url) = lookup("DXVOICE_BASE_URL") {
        session.base_url = url;
    }
    override_parsed(&lookup, "DXVOICE_VARIANT", &mut session.variant);
    override_parsed(&lookup, "DXVOICE_SETTLE_DELAY_MS", &mut session.settle_delay_ms);
    override_parsed(&lookup, "DXVOICE_AGENT_TIMEOUT_MS", &mut session.agent_timeout_ms);
    override_parsed(
        &lookup,
        "DXVOICE_REQUEST_TIMEOUT_SECS",
        &mut session.request_timeout_secs,
    );
    override_parsed(&lookup, "DXVOICE_LANGUAGE", &mut session.language);
    override_parsed(&lookup, "DXVOICE_VOICE_BASE", &mut session.voice_base);

    if let Some(level) = lookup("DXVOICE_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("DXVOICE_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(e) => tracing::warn!(key, value = %raw, "ignoring invalid override: {}", e),
    }
}
