//! Configuration loading from disk.
//!
//! Layers `<dir>/base.toml` with the optional `<dir>/<environment>.toml`
//! overlay. Tables merge key by key; any other value in the overlay replaces
//! the base value.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// File every config directory must contain.
pub const BASE_FILE: &str = "base.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Deserialize(#[source] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a single TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let value = read_table(path)?;
    finish(value)
}

/// Load `base.toml` from `dir`, overlay `<environment>.toml` when present,
/// then validate the merged result.
pub fn load_layered(dir: &Path, environment: &str) -> Result<ServerConfig, ConfigError> {
    let mut merged = read_table(&dir.join(BASE_FILE))?;

    let overlay_path = dir.join(format!("{environment}.toml"));
    if overlay_path.is_file() {
        let overlay = read_table(&overlay_path)?;
        merge(&mut merged, overlay);
        tracing::debug!(overlay = %overlay_path.display(), "Applied environment overlay");
    } else {
        tracing::debug!(overlay = %overlay_path.display(), "No environment overlay found");
    }

    finish(merged)
}

fn read_table(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn finish(value: toml::Value) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = value.try_into().map_err(ConfigError::Deserialize)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Deep-merge `overlay` into `base`.
fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
