//! Host networking subsystem.
//!
//! # Data Flow
//! ```text
//! Host (if-addrs)
//!     → interface.rs (group per interface, pick first non-loopback IPv4)
//!     → format.rs (canonical text for dial / URL targets)
//!     → services.rs (numeric port or TCP service name → port number)
//!     → Hand off to the probe engine
//! ```
//!
//! # Design Decisions
//! - Interfaces are enumerated once per process; topology changes after
//!   startup are not observed
//! - Address text is produced without the `fmt` machinery

pub mod format;
pub mod interface;
pub mod services;

pub use format::{format_ip, host_literal, ip_string};
pub use interface::{host_interfaces, select_address, HostInterface, InterfaceAddress, InterfaceAddrs};
