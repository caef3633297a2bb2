// # DNS Provider Trait
//
// Defines the interface to a DNS provider's record API.
//
// ## Implementations
//
// - CloudXNS: `ddns-provider-cloudxns` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     // First page of domains on the account
//     let domains = provider.get_domain(0, 50).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Raw provider response
///
/// The schema is provider-defined. Objects keep the key order of the
/// response body.
pub type ApiResponse = Value;

/// Marker value of the `message` field on successful responses
pub const SUCCESS_MESSAGE: &str = "success";

/// Whether a response carries `message == "success"`
pub fn is_success(response: &ApiResponse) -> bool {
    response.get("message").and_then(Value::as_str) == Some(SUCCESS_MESSAGE)
}

/// Read a provider identifier
///
/// The API returns identifiers either as JSON numbers or as numeric strings.
pub fn parse_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One DNS resource record as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    /// Record ID
    pub record_id: u64,
    /// Owning domain ID, when the provider echoes it
    pub domain_id: Option<u64>,
    /// Host ID, when the provider echoes it
    pub host_id: Option<u64>,
    /// Host label (e.g. "www", "@")
    pub host: String,
    /// Record value: the IP address for A records, a target for CNAME
    pub value: String,
    /// Record type (A, CNAME, ...)
    pub record_type: Option<String>,
    /// Time-to-live in seconds
    pub ttl: Option<u32>,
    /// Resolution line ID
    pub line_id: Option<u64>,
}

impl DomainRecord {
    /// Parse a record object from a record listing
    ///
    /// Returns `None` when the object has no usable `record_id`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let record_id = value.get("record_id").and_then(parse_id)?;

        Some(Self {
            record_id,
            domain_id: value.get("domain_id").and_then(parse_id),
            host_id: value.get("host_id").and_then(parse_id),
            host: value.get("host").and_then(parse_string).unwrap_or_default(),
            value: value.get("value").and_then(parse_string).unwrap_or_default(),
            record_type: value.get("type").and_then(parse_string),
            ttl: value
                .get("ttl")
                .and_then(parse_id)
                .and_then(|ttl| u32::try_from(ttl).ok()),
            line_id: value.get("line_id").and_then(parse_id),
        })
    }
}

/// Parameters of a record update
///
/// Unset fields are left out of the request body entirely, so the provider
/// keeps their current values. Set fields are always sent, including empty
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordUpdate {
    /// Record to update (part of the request path, not the body)
    #[serde(skip)]
    pub record_id: u64,
    /// Domain ID
    pub domain_id: u64,
    /// Host label; an empty host is treated as "@" by the provider
    pub host: String,
    /// New value, e.g. `8.8.8.8` for A or `cname.example.net.` for CNAME
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Priority, required for MX/AX/CNAMEX records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mx: Option<u32>,
    /// TTL, 1-3600 depending on the domain plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Record type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    /// Resolution line ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_id: Option<u64>,
    /// Backup IP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bak_ip: Option<String>,
}

impl RecordUpdate {
    /// Create an update touching only the host label
    pub fn new(record_id: u64, domain_id: u64, host: impl Into<String>) -> Self {
        Self {
            record_id,
            domain_id,
            host: host.into(),
            value: None,
            mx: None,
            ttl: None,
            record_type: None,
            line_id: None,
            bak_ip: None,
        }
    }

    /// Set the record value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the record type
    pub fn with_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    /// Set the resolution line
    pub fn with_line_id(mut self, line_id: u64) -> Self {
        self.line_id = Some(line_id);
        self
    }

    /// Set the MX priority
    pub fn with_mx(mut self, mx: u32) -> Self {
        self.mx = Some(mx);
        self
    }

    /// Set the backup IP
    pub fn with_bak_ip(mut self, bak_ip: impl Into<String>) -> Self {
        self.bak_ip = Some(bak_ip.into());
        self
    }
}

/// Trait for DNS provider implementations
///
/// Every method performs exactly one API call and returns the decoded
/// response body. Implementations do not inspect HTTP status codes, do not
/// retry and do not cache.
///
/// # Errors
///
/// - [`crate::Error::Transport`] when the request could not be completed
/// - [`crate::Error::Decode`] when the body is not valid JSON
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List domains on the account
    ///
    /// `row_num` is the page size; the provider caps it at 2000.
    async fn get_domain(&self, offset: u32, row_num: u32) -> Result<ApiResponse, crate::Error>;

    /// List hosts of a domain
    async fn get_domain_host(
        &self,
        domain_id: u64,
        offset: u32,
        row_num: u32,
    ) -> Result<ApiResponse, crate::Error>;

    /// List records of a host within a domain
    ///
    /// `host_id == 0` lists records of every host.
    async fn get_domain_record(
        &self,
        domain_id: u64,
        host_id: u64,
        offset: u32,
        row_num: u32,
    ) -> Result<ApiResponse, crate::Error>;

    /// Update one record
    async fn update_record(&self, update: &RecordUpdate) -> Result<ApiResponse, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
