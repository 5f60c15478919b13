//! Run configuration
//!
//! The directory URL, user-agent and timing knobs are owned values injected
//! into the components rather than ambient globals. Nothing here is read
//! from files or the environment; the CLI is the only source of overrides.

use crate::{Error, Result};
use std::time::Duration;
use url::Url;

/// Upstream directory endpoint listing running relays with their
/// fingerprints and OR addresses.
pub const DIRECTORY_URL: &str = "https://onionoo.torproject.org/details?type=relay\
&running=true&fields=fingerprint,or_addresses";

/// Custom user agent sent with every directory request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; Android SDK built for x86) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.120 Mobile Safari/537.36 ";

/// Default directory fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default per-probe TCP connect timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Default number of validated addresses to collect.
pub const DEFAULT_RELAY_COUNT: usize = 30;

/// One proxy endpoint of the fallback chain.
#[derive(Debug, Clone)]
pub struct ProxyEndpoint {
    raw: String,
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl ProxyEndpoint {
    /// Parse a single `scheme://host:port` endpoint.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let parsed = Url::parse(raw)
            .map_err(|e| Error::config(format!("invalid proxy endpoint {}: {}", raw, e)))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| Error::config(format!("proxy endpoint {} has no host", raw)))?
            .to_string();

        Ok(ProxyEndpoint {
            raw: raw.to_string(),
            scheme: parsed.scheme().to_string(),
            host,
            port: parsed.port(),
        })
    }

    /// The endpoint exactly as configured, for handing to the HTTP client.
    pub fn url(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// `host:port` label used in log lines.
    pub fn label(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Relay directory endpoint
    pub directory_url: String,

    /// User agent sent with directory requests
    pub user_agent: String,

    /// Ordered proxy fallback chain; empty means direct fetch
    pub proxies: Vec<ProxyEndpoint>,

    /// Directory fetch timeout
    pub fetch_timeout: Duration,

    /// Per-address TCP probe timeout
    pub probe_timeout: Duration,

    /// Target number of validated addresses
    pub count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            directory_url: DIRECTORY_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            proxies: Vec::new(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            count: DEFAULT_RELAY_COUNT,
        }
    }
}

impl Config {
    /// Install a comma-separated proxy chain, e.g.
    /// `http://proxy-one.org:8888,http://proxy-two.org:8881`.
    ///
    /// Blank entries are skipped; an endpoint that does not parse as a URL
    /// fails the whole configuration before any network activity.
    pub fn with_proxy_list(mut self, list: &str) -> Result<Self> {
        self.proxies = list
            .split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(ProxyEndpoint::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }
}
