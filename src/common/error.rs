//! Error types for the relay pipeline

use thiserror::Error;

/// Pipeline error type
///
/// Every fatal condition on the fetch path (bad status, connection failure
/// in direct mode, exhausted proxy chain, malformed directory JSON) is
/// normalized into [`Error::Fetch`]; transport errors never escape raw.
/// Probe failures and per-proxy connection failures are not errors at all,
/// they are logged negative outcomes.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Fetching error, {0}")]
    Fetch(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn fetch<S: Into<String>>(msg: S) -> Self {
        Error::Fetch(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
