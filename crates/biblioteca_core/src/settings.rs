//! Startup configuration for the catalogue binary.
//!
//! # Responsibility
//! - Load database and logging settings from an optional TOML file.
//! - Apply `BIBLIOTECA__SECTION__KEY` environment overrides on top.
//!
//! # Invariants
//! - A missing default file is not an error; a missing explicit file is.
//! - Settings are validated before any storage is touched.

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "biblioteca.toml";
/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "BIBLIOTECA_CONFIG";

const ENV_PREFIX: &str = "BIBLIOTECA";
const ENV_SEPARATOR: &str = "__";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug)]
pub enum SettingsError {
    /// Explicitly requested config file does not exist.
    MissingFile(PathBuf),
    /// Source could not be read or deserialized.
    Load(config::ConfigError),
    /// Values were read but violate a settings rule.
    Invalid(String),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFile(path) => {
                write!(f, "config file `{}` does not exist", path.display())
            }
            Self::Load(err) => write!(f, "failed to load configuration: {err}"),
            Self::Invalid(message) => write!(f, "invalid configuration: {message}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::MissingFile(_) | Self::Invalid(_) => None,
        }
    }
}

impl From<config::ConfigError> for SettingsError {
    fn from(value: config::ConfigError) -> Self {
        Self::Load(value)
    }
}

/// Storage target and connection tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file path. `None` selects a private in-memory store.
    pub path: Option<PathBuf>,
    /// Busy timeout applied to every session connection.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl DatabaseSettings {
    /// Settings for an on-disk database at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Settings for a private in-memory database.
    pub fn in_memory() -> Self {
        Self::default()
    }
}

/// Log level and destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// One of `trace|debug|info|warn|error`; build-mode default when unset.
    pub level: Option<String>,
    /// Absolute directory for rolling log files; stderr when unset.
    pub dir: Option<PathBuf>,
}

/// Top-level settings structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Loads settings from `explicit_path` (or `biblioteca.toml` when
    /// absent) layered under environment overrides.
    ///
    /// # Errors
    /// - `MissingFile` when `explicit_path` does not exist.
    /// - `Load` when a source cannot be parsed or deserialized.
    /// - `Invalid` when values violate settings rules.
    pub fn load(explicit_path: Option<&Path>) -> SettingsResult<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let file = match explicit_path {
            Some(path) => required_file(path)?,
            None => File::from(PathBuf::from(DEFAULT_CONFIG_FILE))
                .format(FileFormat::Toml)
                .required(false),
        };

        let cfg = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(cfg)
    }

    /// Reads settings from one TOML file only, ignoring `.env` and the
    /// environment.
    pub fn from_file(path: &Path) -> SettingsResult<Self> {
        let cfg = Config::builder().add_source(required_file(path)?).build()?;
        Self::from_config(cfg)
    }

    /// Parses settings from TOML text without consulting the environment.
    pub fn from_toml_str(source: &str) -> SettingsResult<Self> {
        let cfg = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Self::from_config(cfg)
    }

    fn from_config(cfg: Config) -> SettingsResult<Self> {
        let settings: Settings = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> SettingsResult<()> {
        if let Some(path) = &self.database.path {
            if path.as_os_str().is_empty() {
                return Err(SettingsError::Invalid(
                    "database.path must not be empty; omit it for an in-memory store".to_string(),
                ));
            }
        }
        if self.database.busy_timeout_ms == 0 {
            return Err(SettingsError::Invalid(
                "database.busy_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn required_file(path: &Path) -> SettingsResult<File<config::FileSourceFile, FileFormat>> {
    if !path.is_file() {
        return Err(SettingsError::MissingFile(path.to_path_buf()));
    }
    Ok(File::from(path.to_path_buf())
        .format(FileFormat::Toml)
        .required(true))
}
