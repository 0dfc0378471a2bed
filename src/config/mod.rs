//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize into FileConfig)
//!     → command-line overrides applied (flag > file > default)
//!     → validation.rs (semantic checks)
//!     → Settings { ProbeConfig, PollMode } (validated, immutable)
//!     → owned by the poll loop for the process lifetime
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults so an empty file is valid
//! - Validation separates syntactic (serde/clap) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, ConfigError, Overrides, Settings};
pub use schema::{NetworkKind, PollMode, ProbeConfig};
