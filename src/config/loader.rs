//! Configuration loading: optional TOML file, then command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::config::schema::{FileConfig, NetworkKind, PollMode, ProbeConfig};
use crate::config::validation::{validate, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Values given explicitly on the command line. `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub network: Option<NetworkKind>,
    pub uri: Option<String>,
    pub port: Option<String>,
    pub timeout: Option<Duration>,
    pub readiness_interval: Option<Duration>,
    pub liveness_interval: Option<Duration>,
}

/// Fully resolved, validated settings for one process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub probe: ProbeConfig,
    pub mode: PollMode,
}

/// Read a TOML config file.
pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge defaults, the optional file and command-line overrides, then validate.
pub fn load_settings(path: Option<&Path>, overrides: Overrides) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => load_file(path)?,
        None => FileConfig::default(),
    };
    resolve(file, overrides)
}

/// Apply precedence (flag > file > default) and validate the result.
pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Settings, ConfigError> {
    let defaults = ProbeConfig::default();
    let probe = ProbeConfig {
        network: overrides.network.or(file.network).unwrap_or(defaults.network),
        uri: overrides.uri.or(file.uri).unwrap_or(defaults.uri),
        port: overrides.port.or(file.port).unwrap_or(defaults.port),
        timeout: overrides.timeout.or(file.timeout).unwrap_or(defaults.timeout),
    };
    let readiness = overrides.readiness_interval.or(file.readiness_interval);
    let liveness = overrides.liveness_interval.or(file.liveness_interval);

    validate(&probe, readiness, liveness).map_err(ConfigError::Validation)?;

    Ok(Settings {
        probe,
        mode: PollMode::from_intervals(readiness, liveness),
    })
}
