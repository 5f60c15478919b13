//! Per-address acceptance filtering

use crate::policy::PortPolicy;
use crate::probe::Probe;
use std::sync::Arc;
use tracing::{debug, trace};

/// Decides whether a single `ip:port` address is worth emitting.
///
/// Checks run cheapest-first and short-circuit: the IPv6 marker and the port
/// denylist are consulted before any socket is dialed.
pub struct RelayFilter {
    policy: PortPolicy,
    probe: Arc<dyn Probe>,
}

impl RelayFilter {
    pub fn new(probe: Arc<dyn Probe>) -> Self {
        RelayFilter {
            policy: PortPolicy,
            probe,
        }
    }

    /// Accept or reject one address. IPv6 literals (bracket notation) are
    /// rejected unconditionally; so are addresses that do not split into a
    /// host and a numeric port.
    pub async fn accept(&self, address: &str) -> bool {
        if address.contains('[') {
            trace!(address, "skipping ipv6 address");
            return false;
        }

        let Some((host, port)) = split_host_port(address) else {
            debug!(address, "skipping malformed relay address");
            return false;
        };

        if !self.policy.is_allowed(port) {
            trace!(address, port, "port is denylisted");
            return false;
        }

        self.probe.is_reachable(host, port).await
    }
}

/// Split `host:port` on the last colon. IPv6 never reaches this point.
fn split_host_port(address: &str) -> Option<(&str, u16)> {
    let (host, port) = address.rsplit_once(':')?;
    if host.is_empty() {
        return None;
    }
    port.parse().ok().map(|port| (host, port))
}
