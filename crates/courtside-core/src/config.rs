// Configuration loading and parsing (courtside.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name under `config/` (and `defaults/`).
pub const CONFIG_FILE: &str = "courtside.toml";

/// Database file name used when `[database] path` is left empty.
const DEFAULT_DB_FILE: &str = "courtside.db";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// courtside.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub team: TeamConfig,
    pub roster: RosterConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    /// Home team name recorded on each match.
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterConfig {
    /// Roster CSV, relative to the working directory unless absolute.
    pub csv: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file. Empty means the per-user data directory.
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "courtside=info,warn".to_string()
}

impl Config {
    /// Where the database lives: the configured path, or `courtside.db`
    /// in the platform data directory when none is set.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if !self.database.path.is_empty() {
            return Ok(PathBuf::from(&self.database.path));
        }
        let dirs = directories::ProjectDirs::from("", "", "courtside").ok_or_else(|| {
            ConfigError::ValidationError {
                field: "database.path".into(),
                message: "no home directory found; set an explicit path".into(),
            }
        })?;
        Ok(dirs.data_dir().join(DEFAULT_DB_FILE))
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load `config/courtside.toml` relative to `base_dir`, without copying
/// defaults.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/courtside.toml` to `config/` when the scorekeeper has no
/// config yet. Returns the path written, or `None` when a config already
/// exists.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {} in config/ or defaults/ under {}; run from the project root",
                CONFIG_FILE,
                base_dir.display()
            ),
        });
    }

    if let Some(config_dir) = target.parent() {
        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", config_dir.display()),
        })?;
    }
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {}: {e}", source.display()),
    })?;
    Ok(Some(target))
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.team.name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "team.name".into(),
            message: "must not be empty".into(),
        });
    }
    if config.roster.csv.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "roster.csv".into(),
            message: "must name a CSV file".into(),
        });
    }
    if config.logging.filter.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.filter".into(),
            message: "must not be empty".into(),
        });
    }
    Ok(())
}
