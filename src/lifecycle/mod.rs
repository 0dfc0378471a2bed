//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → ShutdownSignal held by the poll loop
//!     → loop stops at its next pause between attempts
//! ```
//!
//! # Design Decisions
//! - An attempt in flight is never interrupted; its own timeout bounds it
//! - Single-shot runs ignore shutdown entirely

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use signals::spawn_signal_listener;
