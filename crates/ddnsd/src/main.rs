// # ddnsd - one-shot DDNS updater
//
// This binary is a THIN integration layer: all lookup and comparison logic
// lives in ddns-core. It is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering the provider and IP source
// 4. Running one reconciliation pass and printing the report
//
// Run it from cron or a systemd timer; it exits after one pass.
//
// ## Configuration
//
// ### DNS Provider
// - `DDNS_PROVIDER_TYPE`: Provider type (cloudxns)
// - `DDNS_PROVIDER_API_KEY`: API key (required)
// - `DDNS_PROVIDER_SECRET_KEY`: Secret key (required)
// - `DDNS_PROVIDER_BASE_URL`: API base URL (optional)
// - `DDNS_PROVIDER_TIMEOUT_SECS`: Request timeout (default 5)
//
// ### Target
// - `DDNS_DOMAIN`: Domain name, e.g. example.com (required)
// - `DDNS_HOST`: Host label, e.g. www or @ (required)
//
// ### IP Source
// - `DDNS_IP_SOURCE_URL`: URL to fetch the IP page from
// - `DDNS_IP_SOURCE_TIMEOUT_SECS`: Request timeout (default 3)
//
// ### Lookup
// - `DDNS_PAGE_SIZE`: Domain/host listing page size (default 50)
// - `DDNS_RECORD_PAGE_SIZE`: Record listing page size (default 30)
//
// ### Runtime
// - `DDNS_MODE`: live or dry-run (default live)
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export DDNS_PROVIDER_API_KEY=your_api_key
// export DDNS_PROVIDER_SECRET_KEY=your_secret_key
// export DDNS_DOMAIN=example.com
// export DDNS_HOST=www
//
// ddnsd
// ```

use anyhow::{Context, Result};
use ddns_core::config::{
    DEFAULT_CLOUDXNS_BASE_URL, DEFAULT_IP_SOURCE_TIMEOUT_SECS, DEFAULT_IP_SOURCE_URL,
    DEFAULT_IP_SOURCE_USER_AGENT, DEFAULT_PROVIDER_TIMEOUT_SECS,
};
use ddns_core::{
    DdnsConfig, IpSourceConfig, LookupConfig, Outcome, ProviderConfig, ProviderRegistry,
    Reconciler, TargetConfig,
};
use std::env;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: The pass completed (including "not found" outcomes)
/// - 1: Configuration or startup error
/// - 2: Runtime error (a request failed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// The reconciliation pass completed
    Completed = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (request failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    provider_type: String,
    provider_api_key: String,
    provider_secret_key: String,
    provider_base_url: String,
    provider_timeout_secs: u64,
    domain: String,
    host: String,
    ip_source_url: String,
    ip_source_timeout_secs: u64,
    page_size: u32,
    record_page_size: u32,
    mode: String,
    log_level: String,
}

/// Read an optional variable and parse it
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        Err(_) => Ok(None),
    }
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} is required. Set it via: export {name}=..."))
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let lookup = LookupConfig::default();

        Ok(Self {
            provider_type: env::var("DDNS_PROVIDER_TYPE").unwrap_or_else(|_| "cloudxns".to_string()),
            provider_api_key: required_var("DDNS_PROVIDER_API_KEY")?,
            provider_secret_key: required_var("DDNS_PROVIDER_SECRET_KEY")?,
            provider_base_url: env::var("DDNS_PROVIDER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_CLOUDXNS_BASE_URL.to_string()),
            provider_timeout_secs: parse_var("DDNS_PROVIDER_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS),
            domain: required_var("DDNS_DOMAIN")?.trim().to_string(),
            host: required_var("DDNS_HOST")?.trim().to_string(),
            ip_source_url: env::var("DDNS_IP_SOURCE_URL")
                .unwrap_or_else(|_| DEFAULT_IP_SOURCE_URL.to_string()),
            ip_source_timeout_secs: parse_var("DDNS_IP_SOURCE_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_IP_SOURCE_TIMEOUT_SECS),
            page_size: parse_var("DDNS_PAGE_SIZE")?.unwrap_or(lookup.page_size),
            record_page_size: parse_var("DDNS_RECORD_PAGE_SIZE")?
                .unwrap_or(lookup.record_page_size),
            mode: env::var("DDNS_MODE").unwrap_or_else(|_| "live".to_string()),
            log_level: env::var("DDNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Covers what the core configuration cannot know about: supported
    /// provider types, placeholder credentials, mode and log level, and
    /// domain name syntax.
    fn validate(&self) -> Result<()> {
        match self.provider_type.as_str() {
            "cloudxns" => {}
            _ => anyhow::bail!(
                "DDNS_PROVIDER_TYPE '{}' is not supported. \
                Supported providers: cloudxns",
                self.provider_type
            ),
        }

        for (name, value) in [
            ("DDNS_PROVIDER_API_KEY", &self.provider_api_key),
            ("DDNS_PROVIDER_SECRET_KEY", &self.provider_secret_key),
        ] {
            if value.is_empty() {
                anyhow::bail!("{name} cannot be empty");
            }

            // Check for obvious placeholder values (common mistake)
            let lower = value.to_lowercase();
            if lower.contains("your_api_key")
                || lower.contains("your_secret_key")
                || lower.contains("replace_me")
            {
                anyhow::bail!(
                    "{name} appears to be a placeholder. \
                    Use the key pair from your CloudXNS account."
                );
            }
        }

        self.validate_domain_name(&self.domain)?;

        if self.host.is_empty() {
            anyhow::bail!("DDNS_HOST cannot be empty. Use '@' for the domain apex.");
        }
        if self.host.contains('.') && self.host.ends_with(&self.domain) {
            anyhow::bail!(
                "DDNS_HOST must be the label within {}, not the full name. Got: {}",
                self.domain,
                self.host
            );
        }

        match self.mode.to_lowercase().as_str() {
            "live" | "dry-run" => {}
            _ => anyhow::bail!(
                "DDNS_MODE '{}' is not valid. Valid modes: live, dry-run",
                self.mode
            ),
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Validate that a string is a plausible domain name
    ///
    /// Basic RFC 1035 checks; the provider has the final word.
    fn validate_domain_name(&self, domain: &str) -> Result<()> {
        if domain.is_empty() {
            anyhow::bail!("DDNS_DOMAIN cannot be empty");
        }

        if domain.ends_with('.') {
            anyhow::bail!(
                "DDNS_DOMAIN must not end with a dot. Got: {}",
                domain
            );
        }

        // Total length limit (RFC 1035: 253 chars max)
        if domain.len() > 253 {
            anyhow::bail!(
                "Domain name too long: {} chars (max 253). Got: {}",
                domain.len(),
                domain
            );
        }

        for label in domain.split('.') {
            if label.is_empty() {
                anyhow::bail!("Domain name has empty label: '{}'", domain);
            }

            if label.len() > 63 {
                anyhow::bail!(
                    "Domain label too long: {} chars (max 63). Label: '{}'",
                    label.len(),
                    label
                );
            }

            if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
                anyhow::bail!(
                    "Domain label contains invalid characters. Label: '{}'. \
                    Valid: alphanumeric and hyphen only.",
                    label
                );
            }

            if label.starts_with('-') || label.ends_with('-') {
                anyhow::bail!(
                    "Domain label cannot start or end with hyphen. Label: '{}'",
                    label
                );
            }
        }

        Ok(())
    }

    fn dry_run(&self) -> bool {
        self.mode.eq_ignore_ascii_case("dry-run")
    }

    /// Build the core configuration
    fn to_ddns_config(&self) -> DdnsConfig {
        DdnsConfig {
            provider: ProviderConfig::Cloudxns {
                api_key: self.provider_api_key.clone(),
                secret_key: self.provider_secret_key.clone(),
                base_url: self.provider_base_url.clone(),
                timeout_secs: self.provider_timeout_secs,
                dry_run: self.dry_run(),
            },
            ip_source: IpSourceConfig::Http {
                url: self.ip_source_url.clone(),
                timeout_secs: self.ip_source_timeout_secs,
                user_agent: DEFAULT_IP_SOURCE_USER_AGENT.to_string(),
            },
            target: TargetConfig::new(self.domain.clone(), self.host.clone()),
            lookup: LookupConfig {
                page_size: self.page_size,
                record_page_size: self.record_page_size,
            },
        }
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let ddns_config = config.to_ddns_config();
    if let Err(e) = ddns_config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    // Initialize tracing; stdout is reserved for the report
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddnsd");

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let reconciler = match build_reconciler(ddns_config) {
        Ok(reconciler) => reconciler,
        Err(e) => {
            error!("Startup error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    rt.block_on(run_once(reconciler)).into()
}

/// Register built-in implementations and assemble the reconciler
fn build_reconciler(config: DdnsConfig) -> Result<Reconciler> {
    let registry = ProviderRegistry::new();

    #[cfg(feature = "cloudxns")]
    {
        info!("Registering CloudXNS provider");
        ddns_provider_cloudxns::register(&registry);
    }

    #[cfg(feature = "http")]
    {
        info!("Registering HTTP IP source");
        ddns_ip_http::register(&registry);
    }

    let provider = registry
        .create_provider(&config.provider)
        .context("Failed to create DNS provider")?;
    let ip_source = registry
        .create_ip_source(&config.ip_source)
        .context("Failed to create IP source")?;

    Reconciler::new(provider, ip_source, config).context("Failed to create reconciler")
}

/// Run one pass and print the report
async fn run_once(reconciler: Reconciler) -> DdnsExitCode {
    match reconciler.run().await {
        Ok(outcome) => {
            println!("{}", outcome);
            match &outcome {
                Outcome::Checked { .. } if outcome.updated() => info!("Record updated"),
                Outcome::Checked { .. } => info!("No update sent"),
                _ => info!("Target not found, nothing to update"),
            }
            DdnsExitCode::Completed
        }
        Err(e) => {
            println!("REQUEST FAILED: {}", e);
            error!("Run aborted: {}", e);
            DdnsExitCode::RuntimeError
        }
    }
}
