//! Configuration schema definitions.
//!
//! `ProbeConfig` is built once at startup and only read afterwards.
//! `FileConfig` mirrors the command-line flags for the optional TOML file.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Transport used by the connection probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    /// TCP over whichever family the target address has.
    #[default]
    Tcp,
    /// TCP, IPv4 targets only.
    Tcp4,
    /// TCP, IPv6 targets only.
    Tcp6,
    /// Unix domain stream socket.
    Unix,
}

impl NetworkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkKind::Tcp => "tcp",
            NetworkKind::Tcp4 => "tcp4",
            NetworkKind::Tcp6 => "tcp6",
            NetworkKind::Unix => "unix",
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(NetworkKind::Tcp),
            "tcp4" => Ok(NetworkKind::Tcp4),
            "tcp6" => Ok(NetworkKind::Tcp6),
            "unix" => Ok(NetworkKind::Unix),
            other => Err(format!("unknown network {} (expected tcp, tcp4, tcp6 or unix)", other)),
        }
    }
}

/// Settings for a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Transport for the connection probe.
    pub network: NetworkKind,
    /// Path for the HTTP probe; empty selects the connection probe.
    pub uri: String,
    /// Numeric port or TCP service name.
    pub port: String,
    /// Per-attempt deadline.
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            network: NetworkKind::Tcp,
            uri: String::new(),
            port: "8080".to_string(),
            timeout: Duration::from_secs(1),
        }
    }
}

impl ProbeConfig {
    /// True when the HTTP probe is selected.
    pub fn is_http(&self) -> bool {
        !self.uri.is_empty()
    }
}

/// How often the check runs and when the run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollMode {
    /// One check, result returned as is.
    #[default]
    SingleShot,
    /// Retry every interval until a check passes.
    Readiness(Duration),
    /// Re-check every interval until a check fails.
    Liveness(Duration),
}

impl PollMode {
    /// Build the mode from the two optional interval settings.
    ///
    /// A zero interval counts as unset. Callers validate that at most one
    /// interval is set; if both are, readiness takes precedence.
    pub fn from_intervals(readiness: Option<Duration>, liveness: Option<Duration>) -> Self {
        match (readiness.filter(|d| !d.is_zero()), liveness.filter(|d| !d.is_zero())) {
            (Some(interval), _) => PollMode::Readiness(interval),
            (None, Some(interval)) => PollMode::Liveness(interval),
            (None, None) => PollMode::SingleShot,
        }
    }
}

/// Contents of the optional TOML config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub network: Option<NetworkKind>,
    pub uri: Option<String>,
    pub port: Option<String>,
    #[serde(deserialize_with = "humantime_opt")]
    pub timeout: Option<Duration>,
    #[serde(deserialize_with = "interval_opt")]
    pub readiness_interval: Option<Duration>,
    #[serde(deserialize_with = "interval_opt")]
    pub liveness_interval: Option<Duration>,
}

fn humantime_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|s| humantime::parse_duration(&s).map_err(serde::de::Error::custom))
        .transpose()
}

fn interval_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|s| parse_interval(&s).map_err(serde::de::Error::custom))
        .transpose()
}

/// Parse a poll interval. Negative values (`-1s`) mean "off" and come back
/// as zero, which [`PollMode::from_intervals`] treats as unset.
pub fn parse_interval(value: &str) -> Result<Duration, humantime::DurationError> {
    match value.trim().strip_prefix('-') {
        Some(magnitude) => humantime::parse_duration(magnitude).map(|_| Duration::ZERO),
        None => humantime::parse_duration(value.trim()),
    }
}
