//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! poll.rs (SingleShot / Readiness / Liveness)
//!     → engine.rs Prober::check_interfaces
//!         → net::select_address (first non-loopback IPv4)
//!         → connection probe (uri empty) or HTTP probe
//!     → error.rs ProbeError (code + message) or success
//! ```
//!
//! # Design Decisions
//! - A check outcome is `Result<(), ProbeError>`; callers must handle both arms
//! - Interfaces are enumerated once per run, not per attempt
//! - Retries happen only at poll granularity

pub mod engine;
pub mod error;
pub mod poll;

pub use engine::{Dialer, HostDialer, Prober};
pub use error::{codes, ProbeError, ProbeResult};
pub use poll::{InterfaceProbe, Probe};

use crate::config::{PollMode, ProbeConfig};
use crate::lifecycle::ShutdownSignal;
use crate::net::host_interfaces;

/// Enumerate host interfaces once, then poll according to `mode`.
pub async fn run(config: ProbeConfig, mode: PollMode, shutdown: ShutdownSignal) -> ProbeResult {
    let interfaces = host_interfaces().map_err(ProbeError::InterfaceDiscovery)?;

    tracing::debug!(
        network = %config.network,
        uri = %config.uri,
        port = %config.port,
        timeout = ?config.timeout,
        mode = ?mode,
        "Starting health check"
    );

    let probe = InterfaceProbe::new(Prober::new(config), interfaces);
    poll::run(&probe, mode, shutdown).await
}
