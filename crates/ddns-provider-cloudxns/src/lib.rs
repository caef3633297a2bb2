// # CloudXNS DNS Provider
//
// This crate provides a CloudXNS DNS provider implementation for the DDNS system.
//
// ## Behavior
//
// - ✅ One HTTP request per trait call, signed with the API-HMAC scheme
// - ✅ HTTP/1.1 only, 5 second timeout by default
// - ✅ Dry-run mode for safe testing
// - ❌ NO status code handling (the JSON body decides success)
// - ❌ NO retry logic
// - ❌ NO caching
//
// ## Security Requirements
//
// - Secret key NEVER appears in logs or Debug output
// - Provider MUST fail fast if either key is empty
//
// ## API Reference
//
// - CloudXNS API v2: https://www.cloudxns.net/Support/lists/cid/17.html
// - List domains: GET `domain?offset=&row_num=`
// - List hosts: GET `host/:domain_id?offset=&row_num=`
// - List records: GET `record/:domain_id?host_id=&offset=&row_num=`
// - Update record: PUT `record/:record_id`

pub mod sign;

pub use sign::{HttpMethod, SignedRequest};

use async_trait::async_trait;
use ddns_core::config::{DEFAULT_CLOUDXNS_BASE_URL, DEFAULT_PROVIDER_TIMEOUT_SECS, ProviderConfig};
use ddns_core::traits::{ApiResponse, DnsProvider, DnsProviderFactory, RecordUpdate};
use ddns_core::{Error, Result};
use serde_json::{Map, Value, json};
use std::time::Duration;

const PROVIDER_NAME: &str = "cloudxns";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// CloudXNS DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all GET requests (domain, host and record listings)
/// - Log the intended PUT payload
/// - **NOT** actually modify DNS records
pub struct CloudxnsProvider {
    /// API key, sent in the clear as `API-KEY`
    api_key: String,

    /// Secret key used only for signing
    /// ⚠️ NEVER log this value
    secret_key: String,

    /// API base URL, ending with '/'
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip updates
    dry_run: bool,
}

// Custom Debug implementation that hides the secret key
impl std::fmt::Debug for CloudxnsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudxnsProvider")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudxnsProvider {
    /// Create a new CloudXNS provider
    ///
    /// # Parameters
    ///
    /// - `api_key` / `secret_key`: API credentials
    /// - `base_url`: API root; request paths are appended verbatim
    /// - `timeout`: Per-request timeout
    /// - `dry_run`: If true, perform GET requests but skip updates
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        let api_key = api_key.into();
        let secret_key = secret_key.into();

        if api_key.is_empty() {
            return Err(Error::config("CloudXNS API key cannot be empty"));
        }
        if secret_key.is_empty() {
            return Err(Error::config("CloudXNS secret key cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .http1_only()
            .build()
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            secret_key,
            base_url: base_url.into(),
            client,
            dry_run,
        })
    }

    /// Create a live provider against the public API with the default timeout
    pub fn with_defaults(api_key: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        Self::new(
            api_key,
            secret_key,
            DEFAULT_CLOUDXNS_BASE_URL,
            Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            false,
        )
    }

    /// Whether updates are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Sign and send one request
    ///
    /// # Returns
    ///
    /// - `Ok(Value)`: The decoded response body, whatever the HTTP status
    /// - `Err(Error::Transport)`: Connection, timeout or body read failure
    /// - `Err(Error::Decode)`: The body is not JSON
    pub async fn send(
        &self,
        path: &str,
        method: HttpMethod,
        params: &Map<String, Value>,
    ) -> Result<ApiResponse> {
        let date = sign::request_date(chrono::Utc::now());
        let request = SignedRequest::build(
            &self.api_key,
            &self.secret_key,
            &self.base_url,
            path,
            method,
            params,
            date,
        )?;

        tracing::debug!("{} {}", request.method.as_str(), request.url);

        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .header("API-KEY", &self.api_key)
            .header("API-REQUEST-DATE", &request.date)
            .header("API-HMAC", &request.hmac)
            .header("API-FORMAT", "json");

        // Raw JSON body under the form content type the API expects
        if let Some(body) = request.body {
            builder = builder
                .header("Content-Type", FORM_CONTENT_TYPE)
                .body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        tracing::trace!("Response ({}): {}", status, text);

        serde_json::from_str(&text).map_err(|e| {
            Error::decode(format!("{} (HTTP {})", e, status))
        })
    }
}

fn params<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[async_trait]
impl DnsProvider for CloudxnsProvider {
    async fn get_domain(&self, offset: u32, row_num: u32) -> Result<ApiResponse> {
        self.send(
            "domain",
            HttpMethod::Get,
            &params([("offset", json!(offset)), ("row_num", json!(row_num))]),
        )
        .await
    }

    async fn get_domain_host(&self, domain_id: u64, offset: u32, row_num: u32) -> Result<ApiResponse> {
        self.send(
            &format!("host/{domain_id}"),
            HttpMethod::Get,
            &params([("offset", json!(offset)), ("row_num", json!(row_num))]),
        )
        .await
    }

    async fn get_domain_record(
        &self,
        domain_id: u64,
        host_id: u64,
        offset: u32,
        row_num: u32,
    ) -> Result<ApiResponse> {
        self.send(
            &format!("record/{domain_id}"),
            HttpMethod::Get,
            &params([
                ("host_id", json!(host_id)),
                ("offset", json!(offset)),
                ("row_num", json!(row_num)),
            ]),
        )
        .await
    }

    /// Update a record
    ///
    /// Only the fields set on `update` are sent; the rest keep their
    /// current values on the provider side.
    async fn update_record(&self, update: &RecordUpdate) -> Result<ApiResponse> {
        let body = match serde_json::to_value(update) {
            Ok(Value::Object(body)) => body,
            Ok(other) => {
                return Err(Error::invalid_input(format!(
                    "Record update must serialize to an object, got {other}"
                )));
            }
            Err(e) => return Err(Error::invalid_input(e.to_string())),
        };
        let path = format!("record/{}", update.record_id);

        if self.dry_run {
            let payload = Value::Object(body);
            tracing::info!(
                "[DRY-RUN] Would send PUT {}{} with payload: {}",
                self.base_url,
                path,
                payload
            );
            return Ok(json!({"code": 1, "message": "dry-run"}));
        }

        self.send(&path, HttpMethod::Put, &body).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for creating CloudXNS providers
pub struct CloudxnsFactory;

impl DnsProviderFactory for CloudxnsFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::Cloudxns {
                api_key,
                secret_key,
                base_url,
                timeout_secs,
                dry_run,
            } => {
                if *dry_run {
                    tracing::warn!("CloudXNS provider running in DRY-RUN mode - no changes will be made");
                }

                Ok(Box::new(CloudxnsProvider::new(
                    api_key.clone(),
                    secret_key.clone(),
                    base_url.clone(),
                    Duration::from_secs(*timeout_secs),
                    *dry_run,
                )?))
            }
            _ => Err(Error::config("Invalid config for CloudXNS provider")),
        }
    }
}

/// Register the CloudXNS provider with a registry
///
/// # Example
///
/// ```rust
/// use ddns_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// ddns_provider_cloudxns::register(&registry);
/// assert!(registry.has_provider("cloudxns"));
/// ```
pub fn register(registry: &ddns_core::ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(CloudxnsFactory));
}
