use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use crate::history_store::DEFAULT_CAPACITY;
use crate::logging;

pub const APP_DIR_NAME: &str = "clip-recall";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "MaxEntries", alias = "max_entries", default = "default_max_entries")]
    pub max_entries: i64,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            config_path: default_config_path(),
        }
    }
}

impl Config {
    pub fn capacity(&self) -> usize {
        usize::try_from(self.max_entries.max(1)).unwrap_or(usize::MAX)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
    Encode(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Parse(error) => write!(f, "parse error: {error}"),
            Self::Encode(error) => write!(f, "encode error: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

fn default_max_entries() -> i64 {
    DEFAULT_CAPACITY as i64
}

pub fn stable_app_data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(app_data) = std::env::var_os("APPDATA") {
            return PathBuf::from(app_data).join(APP_DIR_NAME);
        }
    }

    #[cfg(not(target_os = "windows"))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            return PathBuf::from(xdg).join(APP_DIR_NAME);
        }
        if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
            return PathBuf::from(home).join(".config").join(APP_DIR_NAME);
        }
    }

    std::env::temp_dir().join(APP_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    stable_app_data_dir().join(SETTINGS_FILE_NAME)
}

pub fn parse(raw: &str) -> Result<Config, ConfigError> {
    json5::from_str::<Config>(raw).map_err(|e| ConfigError::Parse(e.to_string()))
}

// A corrupt file yields defaults; a missing one is created with defaults.
pub fn load(path_override: Option<&Path>) -> Config {
    let path = path_override
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    match std::fs::read_to_string(&path) {
        Ok(raw) => match parse(&raw) {
            Ok(mut cfg) => {
                cfg.config_path = path;
                cfg
            }
            Err(error) => {
                logging::warn(&format!(
                    "settings at {} unreadable ({error}); using defaults",
                    path.display()
                ));
                with_path(path)
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            let cfg = with_path(path);
            if let Err(error) = save(&cfg) {
                logging::warn(&format!("failed to write default settings: {error}"));
            }
            cfg
        }
        Err(error) => {
            logging::warn(&format!(
                "failed to read settings at {}: {error}; using defaults",
                path.display()
            ));
            with_path(path)
        }
    }
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = cfg.config_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let encoded =
        serde_json::to_string_pretty(cfg).map_err(|e| ConfigError::Encode(e.to_string()))?;
    std::fs::write(&cfg.config_path, encoded)?;
    Ok(())
}

fn with_path(path: PathBuf) -> Config {
    Config {
        config_path: path,
        ..Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{parse, Config};

    #[test]
    fn capacity_clamps_non_positive_values() {
        let mut cfg = Config::default();
        cfg.max_entries = 0;
        assert_eq!(cfg.capacity(), 1);
        cfg.max_entries = -12;
        assert_eq!(cfg.capacity(), 1);
        cfg.max_entries = 250;
        assert_eq!(cfg.capacity(), 250);
    }

    #[test]
    fn parse_accepts_comments_and_snake_case_alias() {
        let cfg = parse("{ // history size\n max_entries: 42, }").unwrap();
        assert_eq!(cfg.max_entries, 42);
    }

    #[test]
    fn parse_defaults_missing_key() {
        let cfg = parse("{}").unwrap();
        assert_eq!(cfg.max_entries, 100);
    }
}
