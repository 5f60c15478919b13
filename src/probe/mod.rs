//! TCP reachability probing

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::trace;

/// Reachability check capability.
///
/// Behind a trait so the filtering logic can be exercised with fakes; the
/// real implementation dials actual sockets.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Returns `true` only on successful connection establishment. Every
    /// transport failure (refused, timeout, unresolvable host, routing
    /// error) collapses into `false`; this never errors.
    async fn is_reachable(&self, host: &str, port: u16) -> bool;
}

/// Bounded-timeout TCP connect probe.
pub struct TcpProbe {
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(timeout: Duration) -> Self {
        TcpProbe { timeout }
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn is_reachable(&self, host: &str, port: u16) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(stream)) => {
                trace!(host, port, "relay port is open");
                drop(stream);
                true
            }
            Ok(Err(e)) => {
                trace!(host, port, error = %e, "relay port is closed");
                false
            }
            Err(_) => {
                trace!(host, port, "probe timed out");
                false
            }
        }
    }
}
