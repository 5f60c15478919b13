//! Relayscout - fetch the public Tor relay directory and emit reachable relays
//!
//! The pipeline fetches the Onionoo directory (directly or through a chain
//! of fallback proxies), draws random candidate relays under a bounded
//! budget, filters their addresses against a fixed port denylist, probes
//! each survivor with a bounded-timeout TCP connect, and joins the accepted
//! `ip:port fingerprint` lines into the final output.
//!
//! # Architecture
//!
//! ```text
//! +-------------+     +-------------+     +-------------+
//! | directory/  | --> |  sampler/   | --> |   filter/   |
//! |  (fetch)    |     |  (draws)    |     | (accept?)   |
//! +-------------+     +-------------+     +------+------+
//!                                                |
//!                                  +-------------+------------+
//!                                  |                          |
//!                           +------v------+            +------v------+
//!                           |   policy/   |            |   probe/    |
//!                           | (denylist)  |            | (tcp dial)  |
//!                           +-------------+            +-------------+
//! ```
//!
//! Data flows one direction: network -> JSON -> candidates -> sampled
//! subset -> validated subset -> text. The directory is fetched once per
//! run and discarded afterwards; there is no cross-run state.

pub mod common;
pub mod config;
pub mod directory;
pub mod filter;
pub mod policy;
pub mod probe;
pub mod sampler;

pub use common::error::{Error, Result};
pub use config::Config;

use directory::DirectoryFetcher;
use filter::RelayFilter;
use probe::TcpProbe;
use sampler::RelaySampler;
use std::sync::Arc;
use tracing::info;

/// Relayscout version
pub const VERSION: &str = "0.1.0";

/// Pipeline instance wiring fetcher, sampler and filter together.
pub struct Pipeline {
    config: Config,
    fetcher: DirectoryFetcher,
    filter: RelayFilter,
}

impl Pipeline {
    /// Create a pipeline over the real network stack.
    pub fn new(config: Config) -> Self {
        let fetcher = DirectoryFetcher::new(&config);
        let filter = RelayFilter::new(Arc::new(TcpProbe::new(config.probe_timeout)));
        Pipeline {
            config,
            fetcher,
            filter,
        }
    }

    /// Create a pipeline from pre-built parts, for tests and embedding.
    pub fn with_parts(config: Config, fetcher: DirectoryFetcher, filter: RelayFilter) -> Self {
        Pipeline {
            config,
            fetcher,
            filter,
        }
    }

    /// Run the full acquisition/validation pipeline.
    ///
    /// Returns the newline-joined accepted lines; an empty string after the
    /// sampling budget runs dry is a valid, empty success. The only error
    /// surfaced is a failed directory fetch.
    pub async fn run(&self) -> Result<String> {
        let directory = self.fetcher.fetch().await?;
        info!(relays = directory.relays.len(), "relay directory loaded");

        let mut accepted: Vec<String> = Vec::new();
        let mut sampler = RelaySampler::new(directory.relays.len());

        while accepted.len() < self.config.count {
            let Some(idx) = sampler.draw(directory.relays.len()) else {
                break;
            };
            let relay = &directory.relays[idx];
            for address in &relay.or_addresses {
                if self.filter.accept(address).await {
                    accepted.push(format!("{} {}", address, relay.fingerprint));
                }
            }
        }

        info!(accepted = accepted.len(), "relay validation finished");
        Ok(accepted.join("\n"))
    }
}
