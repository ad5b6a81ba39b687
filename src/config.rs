use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::RegroupError;
use crate::types::{MissingKeyPolicy, OutputFormat};

pub const DEFAULT_MAX_LINE: usize = 72;

/// Settings read from `config.toml`. Every field is optional; CLI flags win.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub key: Option<String>,
    pub strict: Option<bool>,
    pub format: Option<OutputFormat>,
    pub max_line: Option<usize>,
}

impl Config {
    pub fn policy(&self) -> MissingKeyPolicy {
        if self.strict.unwrap_or(false) {
            MissingKeyPolicy::Reject
        } else {
            MissingKeyPolicy::Sentinel
        }
    }

    pub fn max_line(&self) -> usize {
        self.max_line.unwrap_or(DEFAULT_MAX_LINE)
    }
}

/// `<config_dir>/regroup/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("regroup").join("config.toml"))
}

pub fn parse_config(text: &str, path: &Path) -> Result<Config, RegroupError> {
    toml::from_str(text).map_err(|e| RegroupError::ConfigParseError {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Load the config from an explicit path, or from the default location.
///
/// An explicit path must exist. A missing file at the default location yields
/// `Config::default()`.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, RegroupError> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => return Ok(Config::default()),
        },
    };

    if !required && !path.is_file() {
        tracing::debug!(path = %path.display(), "no config file");
        return Ok(Config::default());
    }

    let text = std::fs::read_to_string(&path).map_err(|source| RegroupError::ConfigReadError {
        path: path.clone(),
        source,
    })?;
    let config = parse_config(&text, &path)?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}
