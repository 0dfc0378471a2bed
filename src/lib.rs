//! Process health probe library.
//!
//! Checks whether a service on the local host is reachable, either with a
//! plain connection attempt or an HTTP GET, addressed through the host's
//! first non-loopback IPv4 interface. Each failure kind carries a stable
//! numeric code so orchestrators can tell them apart.

pub mod cli;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::{load_settings, PollMode, ProbeConfig, Settings};
pub use health::{ProbeError, ProbeResult, Prober};
pub use lifecycle::Shutdown;
