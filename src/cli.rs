//! Command-line interface.
//!
//! Thin adapter around the library: flags become [`Overrides`], a check
//! outcome becomes a verdict line and a process exit code.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::schema::parse_interval;
use crate::config::{NetworkKind, Overrides};
use crate::health::{codes, ProbeResult};

/// Long flags that may also be spelled with a single dash (`-port 8080`).
const LONG_FLAGS: &[&str] = &[
    "network",
    "uri",
    "port",
    "timeout",
    "readiness-interval",
    "liveness-interval",
    "config",
    "help",
    "version",
];

#[derive(Debug, Parser)]
#[command(name = "healthcheck", version)]
#[command(about = "Probe a local service and report its health through the exit code", long_about = None)]
pub struct Cli {
    /// Network type to dial with: tcp, tcp4, tcp6 or unix [default: tcp]
    #[arg(long)]
    pub network: Option<NetworkKind>,

    /// URI to healthcheck; empty selects a plain connection check [default: ""]
    #[arg(long)]
    pub uri: Option<String>,

    /// Port to healthcheck, numeric or a TCP service name [default: 8080]
    #[arg(long)]
    pub port: Option<String>,

    /// Per-attempt timeout, e.g. 100ms or 2s [default: 1s]
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Readiness mode: keep checking every interval until a check passes.
    /// Zero or negative (e.g. -1s) leaves the mode off
    #[arg(long, value_parser = parse_interval, allow_hyphen_values = true)]
    pub readiness_interval: Option<Duration>,

    /// Liveness mode: keep checking every interval until a check fails.
    /// Zero or negative (e.g. -1s) leaves the mode off
    #[arg(long, value_parser = parse_interval, allow_hyphen_values = true)]
    pub liveness_interval: Option<Duration>,

    /// TOML file with defaults for any of the flags above
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse process arguments, accepting single-dash long flags.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Flags given explicitly; anything absent falls back to file or default.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            network: self.network,
            uri: self.uri.clone(),
            port: self.port.clone(),
            timeout: self.timeout,
            readiness_interval: self.readiness_interval,
            liveness_interval: self.liveness_interval,
        }
    }
}

/// Rewrite `-name[=value]` to `--name[=value]` for known long flags.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some(s) if is_single_dash_long(s) => OsString::from(format!("-{}", s)),
            _ => arg,
        })
        .collect()
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    LONG_FLAGS.contains(&name)
}

/// Write the verdict for `result` and return the process exit code.
pub fn report<O: Write, E: Write>(result: &ProbeResult, out: &mut O, err: &mut E) -> i32 {
    let written = match result {
        Ok(()) => writeln!(out, "healthcheck passed"),
        Err(e) if e.is_unclassified() => writeln!(err, "healthcheck failed (unknown error): {}", e),
        Err(e) => writeln!(err, "healthcheck failed: {}", e),
    };
    if let Err(e) = written {
        tracing::warn!(error = %e, "Failed to write verdict");
    }

    match result {
        Ok(()) => codes::SUCCESS,
        Err(e) => e.code(),
    }
}
