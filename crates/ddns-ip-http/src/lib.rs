// # HTTP IP Source
//
// This crate provides an HTTP-based public IP source for the DDNS system.
//
// ## Architecture
//
// Fetches a text page from an external "what is my IP" service
// (default: http://myip.ipip.net/) and extracts the address from a body of
// the form `当前 IP：203.0.113.5  来自于：...`.
//
// One request per call, bounded by a short timeout. Any failure (transport,
// unexpected body, invalid address) is logged and reported as "unknown",
// never as an error.

use ddns_core::ProviderRegistry;
use ddns_core::config::IpSourceConfig;
use ddns_core::traits::{IpSource, IpSourceFactory};
use ddns_core::{Error, Result};

use regex::Regex;
use std::net::IpAddr;
use std::sync::LazyLock;
use std::time::Duration;

/// Body prefix emitted by myip.ipip.net, followed by the address
static IP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^当前 IP：(?P<ip>[0-9.]*)").expect("static pattern is valid"));

/// Extract the address from an ipip.net response body
///
/// The body must start with the `当前 IP：` marker. A marker followed by
/// something that is not a valid address yields `None`.
pub fn extract_ip(body: &str) -> Option<IpAddr> {
    let captures = IP_PATTERN.captures(body)?;
    captures.name("ip")?.as_str().parse().ok()
}

/// HTTP-based IP source
pub struct HttpIpSource {
    /// URL to fetch the IP page from
    url: String,

    /// HTTP client (timeout and User-Agent preset)
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the IP page from
    /// - `timeout`: Request timeout
    /// - `user_agent`: User-Agent header sent with the request
    pub fn new(url: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Fetch the raw page
    async fn fetch_body(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Request failed: {}", e)))?;

        response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Option<IpAddr> {
        let body = match self.fetch_body().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("IP lookup via {} failed: {}", self.url, e);
                return None;
            }
        };

        let ip = extract_ip(&body);
        match ip {
            Some(ip) => tracing::debug!("Current IP from {}: {}", self.url, ip),
            None => tracing::warn!(
                "Unexpected response from {}: {}",
                self.url,
                body.lines().next().unwrap_or_default()
            ),
        }
        ip
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

/// Factory for creating HTTP IP sources
pub struct HttpFactory;

impl IpSourceFactory for HttpFactory {
    fn create(&self, config: &IpSourceConfig) -> Result<Box<dyn IpSource>> {
        match config {
            IpSourceConfig::Http {
                url,
                timeout_secs,
                user_agent,
            } => Ok(Box::new(HttpIpSource::new(
                url.clone(),
                Duration::from_secs(*timeout_secs),
                user_agent,
            )?)),
            _ => Err(Error::config("Invalid config for HTTP IP source")),
        }
    }
}

/// Register the HTTP IP source with a registry
pub fn register(registry: &ProviderRegistry) {
    registry.register_ip_source("http", Box::new(HttpFactory));
}
