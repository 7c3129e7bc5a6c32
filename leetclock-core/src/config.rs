use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::errors::{ConfigError, LeetClockError};
use crate::geo::GeoCoordinate;
use crate::logging::LogFormat;
use crate::settings::{normalize_system_id, ClockSettings};

/// Prefix of every environment variable read by [`CoreConfig::from_env`].
pub const ENV_PREFIX: &str = "LEETCLOCK_";

/// Configuration shared by the leetclock binaries.
///
/// Sources, lowest precedence first: built-in defaults, the TOML config file,
/// environment variables. Command-line flags are applied on top by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    pub settings: ClockSettings,
    pub log_level: String,
    /// Left unset so each command can pick its own default.
    pub log_format: Option<LogFormat>,
    pub config_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            settings: ClockSettings::default(),
            log_level: "info".to_string(),
            log_format: None,
            config_path: None,
        }
    }
}

/// On-disk layout of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    system: Option<String>,
    show_seconds: Option<bool>,
    log_level: Option<String>,
    log_format: Option<LogFormat>,
    location: Option<GeoCoordinate>,
}

impl FileConfig {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&raw).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }
}

impl CoreConfig {
    /// Loads configuration from `.env`, the config file and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Loads configuration from env vars prefixed with the provided value (e.g. `LEETCLOCK_`).
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(prefix, |key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = |suffix: &str| format!("{}{}", prefix, suffix);
        let mut config = CoreConfig::default();

        let explicit_path = lookup(&key("CONFIG")).map(PathBuf::from);
        let file_path = explicit_path
            .clone()
            .or_else(default_config_path)
            .filter(|path| explicit_path.is_some() || path.exists());

        if let Some(path) = file_path {
            debug!(path = %path.display(), "loading config file");
            config.apply_file(FileConfig::load(&path)?);
            config.config_path = Some(path);
        }

        if let Some(system) = lookup(&key("SYSTEM")) {
            config.settings.system = normalize_system_id(&system);
        }

        let seconds_key = key("SHOW_SECONDS");
        if let Some(raw) = lookup(&seconds_key) {
            config.settings.show_seconds = parse_bool(&seconds_key, &raw)?;
        }

        if let Some(level) = lookup(&key("LOG")) {
            config.log_level = level;
        }

        let format_key = key("LOG_FORMAT");
        if let Some(raw) = lookup(&format_key) {
            let format = raw.parse().map_err(|_| ConfigError::InvalidEnvVar {
                key: format_key,
                value: raw,
            })?;
            config.log_format = Some(format);
        }

        let lat_key = key("LATITUDE");
        let lon_key = key("LONGITUDE");
        match (lookup(&lat_key), lookup(&lon_key)) {
            (Some(lat), Some(lon)) => {
                let latitude = parse_f64(&lat_key, &lat)?;
                let longitude = parse_f64(&lon_key, &lon)?;
                config.settings.location = Some(GeoCoordinate::new(latitude, longitude)?);
            }
            (Some(_), None) => {
                return Err(ConfigError::IncompleteLocation {
                    present: lat_key,
                    missing: lon_key,
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompleteLocation {
                    present: lon_key,
                    missing: lat_key,
                })
            }
            (None, None) => {}
        }

        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(system) = file.system {
            self.settings.system = normalize_system_id(&system);
        }
        if let Some(show_seconds) = file.show_seconds {
            self.settings.show_seconds = show_seconds;
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
        if file.log_format.is_some() {
            self.log_format = file.log_format;
        }
        if file.location.is_some() {
            self.settings.location = file.location;
        }
    }
}

/// `<config dir>/leetclock/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("leetclock").join("config.toml"))
}

/// Helper that loads config and converts to the canonical leetclock error type.
pub fn load_core_config() -> Result<CoreConfig, LeetClockError> {
    Ok(CoreConfig::from_env()?)
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnvVar {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn parse_f64(key: &str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidEnvVar {
            key: key.to_string(),
            value: raw.to_string(),
        })
}
