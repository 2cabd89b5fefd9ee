//! Settings validation.
//!
//! # Responsibilities
//! - Semantic checks on [`Settings`] (serde handles syntax)
//! - Validate value ranges and addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: Settings → Result<(), Vec<ValidationError>>
//! - Routing payloads are not validated here; hydration degrades instead

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::Settings;

/// A single semantic problem in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("payload.path must not be empty")]
    EmptyPayloadPath,

    #[error("payload.poll_interval_secs must be greater than 0")]
    ZeroPollInterval,

    #[error("observability.log_level {0:?} is not a valid filter")]
    InvalidLogLevel(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate settings, collecting every error.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.payload.path.trim().is_empty() {
        errors.push(ValidationError::EmptyPayloadPath);
    }
    if settings.payload.watch && settings.payload.poll_interval_secs == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }

    let level = &settings.observability.log_level;
    if EnvFilter::try_new(level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(level.clone()));
    }

    let obs = &settings.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(obs.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
