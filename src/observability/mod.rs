//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: addr, code, attempt, ...)
//!     → logging.rs subscriber → stderr
//! ```
//!
//! # Design Decisions
//! - Quiet by default so the verdict line stays readable
//! - Per-attempt detail is at debug level

pub mod logging;
