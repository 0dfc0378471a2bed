//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde and clap handle syntax)
//! - Reject settings that cannot describe a sensible run
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Runs on the merged settings, after flags override the file

use std::time::Duration;

use thiserror::Error;

use crate::config::schema::ProbeConfig;

/// A single semantic problem with the settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("readiness-interval and liveness-interval are mutually exclusive")]
    ConflictingIntervals,
}

/// Check merged settings before any probe runs.
pub fn validate(
    probe: &ProbeConfig,
    readiness_interval: Option<Duration>,
    liveness_interval: Option<Duration>,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if probe.timeout.is_zero() {
        errors.push(ValidationError::ZeroTimeout);
    }

    let is_set = |interval: Option<Duration>| interval.is_some_and(|d| !d.is_zero());
    if is_set(readiness_interval) && is_set(liveness_interval) {
        errors.push(ValidationError::ConflictingIntervals);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
