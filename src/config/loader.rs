//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::config::hydrate::hydrate;
use crate::config::schema::{RoutingConfig, Settings};
use crate::config::validation::{validate_settings, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Payload parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings parse error: {0}")]
    Toml(#[from] toml::de::Error),

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

/// Load and validate daemon settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;

    validate_settings(&settings).map_err(ConfigError::Validation)?;

    Ok(settings)
}

/// Read the raw JSON payload.
pub fn read_payload(path: &Path) -> Result<Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Read the payload and hydrate it into a routing snapshot.
///
/// Only I/O and JSON syntax errors surface; field problems degrade.
pub fn load_payload(path: &Path) -> Result<RoutingConfig, ConfigError> {
    read_payload(path).map(|payload| hydrate(&payload))
}

/// Write a payload as pretty JSON.
pub fn write_payload(path: &Path, payload: &Value) -> Result<(), ConfigError> {
    let content = serde_json::to_string_pretty(payload)?;
    fs::write(path, content + "\n")?;
    Ok(())
}
