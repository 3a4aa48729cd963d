//! TOML loading, serialization, and discovery for generator configurations.
//!
//! Configurations are stored as `tessel.toml` files. Loading only produces a
//! [`ConfigFile`]; call [`ConfigFile::validate`] to obtain a usable
//! [`Configuration`](crate::config::Configuration).

use std::path::{Path, PathBuf};

use crate::config::ConfigFile;
use crate::error::{ConfigError, Result};

/// Conventional configuration file name.
pub const CONFIG_FILE_NAME: &str = "tessel.toml";

/// Load a configuration from a TOML file.
pub fn load_config_toml(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_config_toml(&content)
}

/// Parse a configuration from a TOML string.
pub fn parse_config_toml(toml_str: &str) -> Result<ConfigFile> {
    let config: ConfigFile = toml::from_str(toml_str)?;
    Ok(config)
}

/// Serialize a configuration to pretty TOML.
pub fn config_to_toml(config: &ConfigFile) -> Result<String> {
    let toml_str = toml::to_string_pretty(config)?;
    Ok(toml_str)
}

/// Generate a template configuration for the given target kind name.
pub fn generate_template(target: &str, parallelism: i64) -> Result<String> {
    let config = ConfigFile {
        target: target.into(),
        parallelism,
        ..ConfigFile::default()
    };
    config.validate()?;
    config_to_toml(&config)
}

/// Search upward from `start_dir` for a `tessel.toml` file.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}
