//! Relay directory data model

mod fetcher;

pub use fetcher::{
    DirectoryFetcher, DirectoryTransport, HttpTransport, TransportError, TransportResponse,
};

use crate::{Error, Result};
use serde::Deserialize;

/// One relay as listed by the directory: an identity fingerprint plus its
/// OR addresses in declared order. Immutable once parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayRecord {
    pub fingerprint: String,
    pub or_addresses: Vec<String>,
}

/// The parsed top-level directory response.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayDirectory {
    pub relays: Vec<RelayRecord>,
}

impl RelayDirectory {
    /// Parse the directory response body.
    ///
    /// A response without a `relays` key is a fatal error, not an empty
    /// directory; an empty `relays` array is a valid, empty directory.
    pub fn parse(body: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| Error::fetch(format!("malformed directory response: {}", e)))?;

        if value.get("relays").is_none() {
            return Err(Error::fetch("relays not found"));
        }

        serde_json::from_value(value)
            .map_err(|e| Error::fetch(format!("malformed directory response: {}", e)))
    }
}
