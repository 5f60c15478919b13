//! Directory fetching over HTTP, directly or through a proxy chain

use super::RelayDirectory;
use crate::config::{Config, ProxyEndpoint};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// A raw GET response: status plus body, transport concerns already settled.
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Transport failure classification.
///
/// `Connect` is the only non-fatal kind: in proxied mode it advances the
/// chain to the next endpoint. Everything else (timeouts included) is fatal.
#[derive(Debug)]
pub enum TransportError {
    Connect(String),
    Other(String),
}

/// The HTTP GET capability behind the fetcher.
///
/// TLS, redirects and pooling are the client's business; the fetcher only
/// sees a status/body pair or a classified failure.
#[async_trait]
pub trait DirectoryTransport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        user_agent: &str,
        timeout: Duration,
        proxy: Option<&ProxyEndpoint>,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

/// Real transport on top of reqwest.
pub struct HttpTransport;

#[async_trait]
impl DirectoryTransport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        user_agent: &str,
        timeout: Duration,
        proxy: Option<&ProxyEndpoint>,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let mut builder = reqwest::Client::builder().timeout(timeout);

        if let Some(endpoint) = proxy {
            let upstream = reqwest::Proxy::all(endpoint.url()).map_err(|e| {
                TransportError::Other(format!("unusable proxy {}: {}", endpoint.label(), e))
            })?;
            // Certificate verification is disabled only for proxied legs
            builder = builder.proxy(upstream).danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        let response = client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;

        Ok(TransportResponse { status, body })
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}

/// Fetches and parses the relay directory.
///
/// Two modes: a single direct GET, or an ordered walk of the configured
/// proxy chain where only connection-level failures fall through to the
/// next endpoint. Raw transport errors never escape; every fatal outcome
/// is an [`Error::Fetch`].
pub struct DirectoryFetcher {
    url: String,
    user_agent: String,
    timeout: Duration,
    proxies: Vec<ProxyEndpoint>,
    transport: Arc<dyn DirectoryTransport>,
}

impl DirectoryFetcher {
    pub fn new(config: &Config) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport))
    }

    /// Fetcher with a caller-supplied transport, for tests and embedding.
    pub fn with_transport(config: &Config, transport: Arc<dyn DirectoryTransport>) -> Self {
        DirectoryFetcher {
            url: config.directory_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.fetch_timeout,
            proxies: config.proxies.clone(),
            transport,
        }
    }

    pub async fn fetch(&self) -> Result<RelayDirectory> {
        if self.proxies.is_empty() {
            self.fetch_direct().await
        } else {
            self.fetch_via_proxies().await
        }
    }

    async fn fetch_direct(&self) -> Result<RelayDirectory> {
        debug!(url = %self.url, "fetching relay directory");

        let response = self
            .transport
            .get(&self.url, &self.user_agent, self.timeout, None)
            .await
            .map_err(|e| match e {
                TransportError::Connect(_) => Error::fetch("server connection error"),
                TransportError::Other(msg) => Error::fetch(msg),
            })?;

        Self::into_directory(response)
    }

    async fn fetch_via_proxies(&self) -> Result<RelayDirectory> {
        for endpoint in &self.proxies {
            debug!(proxy = %endpoint.label(), "fetching relay directory via proxy");

            match self
                .transport
                .get(&self.url, &self.user_agent, self.timeout, Some(endpoint))
                .await
            {
                Ok(response) => return Self::into_directory(response),
                Err(TransportError::Connect(reason)) => {
                    warn!(proxy = %endpoint.label(), reason = %reason, "proxy is down");
                }
                Err(TransportError::Other(msg)) => return Err(Error::fetch(msg)),
            }
        }

        Err(Error::fetch("bad proxies"))
    }

    fn into_directory(response: TransportResponse) -> Result<RelayDirectory> {
        if response.status != 200 {
            return Err(Error::fetch(format!(
                "server response code is {}",
                response.status
            )));
        }
        RelayDirectory::parse(&response.body)
    }
}
