//! Optional config file loading. Search order: ./url2epub.toml, then
//! $XDG_CONFIG_HOME/url2epub/config.toml (or ~/.config/url2epub/config.toml).

use crate::model::ExtractionMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "url2epub.toml";

/// Config file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Default output directory when no output path is given. Relative to CWD.
    pub output_dir: Option<PathBuf>,
    /// HTTP User-Agent header.
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Extraction mode: auto (default), structured, or flattened.
    pub mode: Option<ExtractionMode>,
    /// Price API root for crypto-price.
    pub price_api_base: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config lookup failed: no working directory ({source})")]
    WorkingDir { source: std::io::Error },

    #[error("Config file {path} exists but could not be read: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config file {path} is not valid url2epub TOML: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Candidate config files, highest priority first.
pub fn config_paths() -> Result<Vec<PathBuf>, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::WorkingDir { source: e })?;
    let mut paths = vec![cwd.join(LOCAL_CONFIG_FILE)];
    paths.extend(dirs::config_dir().map(|d| d.join("url2epub").join("config.toml")));
    Ok(paths)
}

/// Parse one config file.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// The first of `paths` that exists wins; later ones are not consulted even if the winner is
/// broken. Ok(None) when none exist.
pub fn first_config(paths: &[PathBuf]) -> Result<Option<Config>, ConfigError> {
    let Some(path) = paths.iter().find(|p| p.exists()) else {
        return Ok(None);
    };
    let config = read_config(path)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(Some(config))
}

/// Config from the default search path. Missing files are not an error.
pub fn load_config() -> Result<Option<Config>, ConfigError> {
    first_config(&config_paths()?)
}
