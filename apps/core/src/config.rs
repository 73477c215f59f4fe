use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::hotkey;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub extension: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub trigger_key: String,
    pub window_marker: String,
    pub notify_max_len: usize,
    pub notify_success_secs: u32,
    pub notify_error_secs: u32,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension: ".NEF".to_string(),
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("./_sorted"),
            trigger_key: "x".to_string(),
            window_marker: "ACDSee".to_string(),
            notify_max_len: 60,
            notify_success_secs: 2,
            notify_error_secs: 4,
            config_path: stable_app_data_dir().join("config.toml"),
        }
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    let base = std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    base.join("photocull")
}

/// Adds the leading dot the original tool tolerated omitting; matching stays
/// case-insensitive downstream, so the given casing is preserved.
pub fn normalized_extension(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with('.') {
        trimmed.to_string()
    } else {
        format!(".{trimmed}")
    }
}

pub fn validate(config: &Config) -> Result<(), String> {
    if config.extension.len() < 2 || !config.extension.starts_with('.') {
        return Err(format!(
            "extension must be a dot followed by at least one character, got '{}'",
            config.extension
        ));
    }

    if config.window_marker.trim().is_empty() {
        return Err("window_marker is required".to_string());
    }

    if config.input_dir.as_os_str().is_empty() {
        return Err("input_dir is required".to_string());
    }

    if config.output_dir.as_os_str().is_empty() {
        return Err("output_dir is required".to_string());
    }

    hotkey::parse_trigger(&config.trigger_key).map_err(|error| error.to_string())?;

    if !(8..=200).contains(&config.notify_max_len) {
        return Err("notify_max_len must be between 8 and 200".to_string());
    }

    if !(1..=60).contains(&config.notify_success_secs) || !(1..=60).contains(&config.notify_error_secs) {
        return Err("notification display times must be between 1 and 60 seconds".to_string());
    }

    Ok(())
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Parse(error) => write!(f, "config parse error: {error}"),
            Self::Invalid(error) => write!(f, "invalid config: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Loads the TOML config, falling back to defaults when the file does not
/// exist yet. `path` overrides the stable per-user location.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| stable_app_data_dir().join("config.toml"));

    if !config_path.exists() {
        let mut config = Config::default();
        config.config_path = config_path;
        return Ok(config);
    }

    let raw = fs::read_to_string(&config_path)?;
    let mut config: Config =
        toml::from_str(&raw).map_err(|error| ConfigError::Parse(error.to_string()))?;
    config.config_path = config_path;
    Ok(config)
}

pub fn save(config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = config.config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let rendered =
        toml::to_string_pretty(config).map_err(|error| ConfigError::Parse(error.to_string()))?;
    fs::write(&config.config_path, rendered)?;
    Ok(())
}
