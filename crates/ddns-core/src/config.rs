//! Configuration types for the DDNS system
//!
//! This module defines all configuration structures used throughout the crate.
//! Every provider constant that used to be a literal (API base URL, page
//! sizes, timeouts, User-Agent) lives here so it can be substituted.

use serde::{Deserialize, Serialize};

/// CloudXNS API base URL
pub const DEFAULT_CLOUDXNS_BASE_URL: &str = "https://www.cloudxns.net/api2/";

/// Default timeout for provider API calls (seconds)
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 5;

/// Default public IP endpoint
pub const DEFAULT_IP_SOURCE_URL: &str = "http://myip.ipip.net/";

/// Default timeout for the public IP lookup (seconds)
pub const DEFAULT_IP_SOURCE_TIMEOUT_SECS: u64 = 3;

/// User-Agent sent to the public IP endpoint
pub const DEFAULT_IP_SOURCE_USER_AGENT: &str = "curl/7.38.0";

/// Largest page the provider will return
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Main DDNS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// IP source configuration
    #[serde(default)]
    pub ip_source: IpSourceConfig,

    /// The record to keep in sync
    pub target: TargetConfig,

    /// Listing settings used by the domain/host lookups
    #[serde(default)]
    pub lookup: LookupConfig,
}

impl DdnsConfig {
    /// Create a configuration for one target with default settings
    pub fn new(provider: ProviderConfig, target: TargetConfig) -> Self {
        Self {
            provider,
            ip_source: IpSourceConfig::default(),
            target,
            lookup: LookupConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        self.ip_source.validate()?;
        self.target.validate()?;
        self.lookup.validate()?;
        Ok(())
    }
}

/// IP source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpSourceConfig {
    /// HTTP text endpoint
    Http {
        /// URL to fetch the IP from
        url: String,
        /// Request timeout in seconds
        #[serde(default = "default_ip_source_timeout_secs")]
        timeout_secs: u64,
        /// User-Agent header
        #[serde(default = "default_user_agent")]
        user_agent: String,
    },

    /// Custom IP source
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl IpSourceConfig {
    /// Validate the IP source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            IpSourceConfig::Http {
                url, timeout_secs, ..
            } => {
                if url.is_empty() {
                    return Err(crate::Error::config("HTTP IP source URL cannot be empty"));
                }
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(crate::Error::config(format!(
                        "HTTP IP source URL must use http or https: {url}"
                    )));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("HTTP IP source timeout must be > 0"));
                }
                Ok(())
            }
            IpSourceConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom IP source factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom IP source config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the IP source type name
    pub fn type_name(&self) -> &str {
        match self {
            IpSourceConfig::Http { .. } => "http",
            IpSourceConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for IpSourceConfig {
    fn default() -> Self {
        IpSourceConfig::Http {
            url: DEFAULT_IP_SOURCE_URL.to_string(),
            timeout_secs: DEFAULT_IP_SOURCE_TIMEOUT_SECS,
            user_agent: DEFAULT_IP_SOURCE_USER_AGENT.to_string(),
        }
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// CloudXNS provider
    Cloudxns {
        /// API key
        api_key: String,
        /// Secret key used to sign requests
        /// ⚠️ NEVER log this value
        secret_key: String,
        /// API base URL; requests append their path to it
        #[serde(default = "default_base_url")]
        base_url: String,
        /// Request timeout in seconds
        #[serde(default = "default_provider_timeout_secs")]
        timeout_secs: u64,
        /// Skip record updates and only log them
        #[serde(default)]
        dry_run: bool,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Create a live CloudXNS configuration with default endpoint and timeout
    pub fn cloudxns(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        ProviderConfig::Cloudxns {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            base_url: default_base_url(),
            timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
            dry_run: false,
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Cloudxns {
                api_key,
                secret_key,
                base_url,
                timeout_secs,
                ..
            } => {
                if api_key.is_empty() {
                    return Err(crate::Error::config("CloudXNS API key cannot be empty"));
                }
                if secret_key.is_empty() {
                    return Err(crate::Error::config("CloudXNS secret key cannot be empty"));
                }
                if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                    return Err(crate::Error::config(format!(
                        "CloudXNS base URL must use http or https: {base_url}"
                    )));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("CloudXNS timeout must be > 0"));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Cloudxns { .. } => "cloudxns",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

/// The domain and host whose record is kept in sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Domain name without trailing dot (e.g. "example.com")
    pub domain: String,
    /// Host label within the domain (e.g. "www", "@")
    pub host: String,
}

impl TargetConfig {
    /// Create a new target
    pub fn new(domain: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            host: host.into(),
        }
    }

    /// Validate the target
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domain.is_empty() {
            return Err(crate::Error::config("Target domain cannot be empty"));
        }
        if self.domain.ends_with('.') {
            return Err(crate::Error::config(format!(
                "Target domain must not end with '.': {}",
                self.domain
            )));
        }
        if self.host.is_empty() {
            return Err(crate::Error::config("Target host cannot be empty"));
        }
        Ok(())
    }
}

/// Page sizes for the provider listings
///
/// Only the first page is ever fetched. An account with more domains than
/// `page_size`, or a domain with more hosts than `page_size`, will not find
/// entries beyond the first page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Page size for the domain and host listings
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Page size for the record listing
    #[serde(default = "default_record_page_size")]
    pub record_page_size: u32,
}

impl LookupConfig {
    /// Validate the page sizes against the provider limit
    pub fn validate(&self) -> Result<(), crate::Error> {
        for (name, size) in [
            ("page_size", self.page_size),
            ("record_page_size", self.record_page_size),
        ] {
            if size == 0 || size > MAX_PAGE_SIZE {
                return Err(crate::Error::config(format!(
                    "{name} must be between 1 and {MAX_PAGE_SIZE}. Got: {size}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            record_page_size: default_record_page_size(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_CLOUDXNS_BASE_URL.to_string()
}

fn default_provider_timeout_secs() -> u64 {
    DEFAULT_PROVIDER_TIMEOUT_SECS
}

fn default_ip_source_timeout_secs() -> u64 {
    DEFAULT_IP_SOURCE_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_IP_SOURCE_USER_AGENT.to_string()
}

fn default_page_size() -> u32 {
    50
}

fn default_record_page_size() -> u32 {
    30
}
