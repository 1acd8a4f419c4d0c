//! Error types for the coinpulse dashboard.

use std::time::Duration;
use thiserror::Error;

/// The main error type for coinpulse.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure talking to the market data source
    #[error("Network error: {0}")]
    Network(String),

    /// The market data source answered with a non-success status
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Rate limiting by the market data source
    #[error("Rate limited by market data source")]
    RateLimited,

    /// A fetch did not complete within its deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The response body did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Channel communication errors
    #[error("Channel error: {0}")]
    Channel(String),

    /// Generic application error
    #[error("{0}")]
    Application(String),
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new malformed response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    /// Create a new application error.
    pub fn application(msg: impl Into<String>) -> Self {
        Self::Application(msg.into())
    }

    /// Whether this error ends a poll cycle without producing a snapshot.
    ///
    /// Covers both the network failure family (transport, status, rate
    /// limit, timeout) and malformed bodies. Pollers catch these and log
    /// them; they never reach the presentation layer.
    pub fn is_fetch_failure(&self) -> bool {
        self.is_network_failure() || matches!(self, Self::MalformedResponse(_))
    }

    /// Whether this error is a network failure (non-2xx or transport).
    pub fn is_network_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::HttpStatus(_) | Self::RateLimited | Self::Timeout(_)
        )
    }

    /// Check if this error is recoverable (the next poll may succeed).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::HttpStatus(status) => *status >= 500,
            Self::Network(_) | Self::RateLimited | Self::Timeout(_) | Self::Channel(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::HttpStatus(status.as_u16())
        } else {
            Self::Network(err.to_string())
        }
    }
}
