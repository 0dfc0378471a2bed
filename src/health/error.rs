//! Failure taxonomy for a single check.
//!
//! Every variant maps to a stable integer code that orchestrators branch on.
//! The `Display` text is advisory and embeds the underlying transport error.

use thiserror::Error;

/// Codes reported to the process boundary.
pub mod codes {
    pub const SUCCESS: i32 = 0;
    /// Reserved for command-line and configuration errors.
    pub const USAGE: i32 = 2;
    pub const NO_SUITABLE_INTERFACE: i32 = 3;
    pub const CONNECTION_FAILED: i32 = 4;
    pub const HTTP_REQUEST_FAILED: i32 = 5;
    pub const HTTP_BAD_STATUS: i32 = 6;
    pub const CONNECTION_TIMEOUT: i32 = 64;
    pub const HTTP_TIMEOUT: i32 = 65;
    pub const UNKNOWN: i32 = 127;
    /// Out-of-band code for a target URL that cannot be built.
    pub const URL_CONSTRUCTION: i32 = -1;
}

/// Outcome of one check: `Ok(())` is success.
pub type ProbeResult = Result<(), ProbeError>;

/// Why a check failed.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The host refused to list its interfaces.
    #[error("failure to get interfaces: {0}")]
    InterfaceDiscovery(#[source] std::io::Error),

    /// No non-loopback IPv4 address on any interface.
    #[error("failure to find suitable interface")]
    NoSuitableInterface,

    #[error("failure to make TCP connection: {0}")]
    Connection(String),

    #[error("timeout when making TCP connection: {0}")]
    ConnectionTimeout(String),

    #[error("failure to make HTTP request: {0}")]
    HttpRequest(String),

    #[error("timeout when making HTTP request: {0}")]
    HttpTimeout(String),

    /// The server answered with something other than 200.
    #[error("failure to get valid HTTP status code: {0}")]
    HttpStatus(u16),

    #[error("failed to parse URL: {0}")]
    UrlConstruction(String),

    #[error("{0}")]
    Unknown(String),
}

impl ProbeError {
    /// Stable code for this failure class.
    pub fn code(&self) -> i32 {
        match self {
            ProbeError::InterfaceDiscovery(_) => codes::UNKNOWN,
            ProbeError::NoSuitableInterface => codes::NO_SUITABLE_INTERFACE,
            ProbeError::Connection(_) => codes::CONNECTION_FAILED,
            ProbeError::ConnectionTimeout(_) => codes::CONNECTION_TIMEOUT,
            ProbeError::HttpRequest(_) => codes::HTTP_REQUEST_FAILED,
            ProbeError::HttpTimeout(_) => codes::HTTP_TIMEOUT,
            ProbeError::HttpStatus(_) => codes::HTTP_BAD_STATUS,
            ProbeError::UrlConstruction(_) => codes::URL_CONSTRUCTION,
            ProbeError::Unknown(_) => codes::UNKNOWN,
        }
    }

    /// True for failures that carry no specific classification.
    ///
    /// The CLI words these differently from classified failures.
    pub fn is_unclassified(&self) -> bool {
        self.code() == codes::UNKNOWN
    }

    /// True when the attempt ran out of time rather than being refused.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::ConnectionTimeout(_) | ProbeError::HttpTimeout(_))
    }
}
