//! Reconciliation workflow
//!
//! The Reconciler is responsible for:
//! - Resolving the configured domain and host to provider IDs
//! - Discovering the current public IP via IpSource
//! - Comparing it with the value of the host's first record
//! - Updating the record via DnsProvider when they differ
//!
//! ## Flow
//!
//! ```text
//! domain name ──▶ domain id ──▶ host id ──▶ first record ──▶ summary
//!                                                              │
//!                 IpSource::current() ─────────────────────────┤
//!                                                              ▼
//!                                         update iff both known and different
//! ```
//!
//! One call to [`Reconciler::run`] is one complete pass. Nothing is kept
//! between runs; the external scheduler drives repetition.

use crate::config::{DdnsConfig, LookupConfig, TargetConfig};
use crate::error::Result;
use crate::resolver::Resolver;
use crate::traits::{DnsProvider, IpSource, RecordUpdate};
use serde_json::Value;
use std::fmt;
use std::net::IpAddr;
use tracing::{debug, info, warn};

/// What was known about the record when the comparison was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub domain_id: u64,
    pub host_id: u64,
    pub record_id: u64,
    /// Public IP, if it could be determined
    pub current_ip: Option<IpAddr>,
    /// Value currently held by the record
    pub last_ip: String,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current_ip = self
            .current_ip
            .map(|ip| ip.to_string())
            .unwrap_or_default();

        writeln!(f, "domain id : {}", self.domain_id)?;
        writeln!(f, "host id   : {}", self.host_id)?;
        writeln!(f, "record id : {}", self.record_id)?;
        writeln!(f, "curr ip   : {}", current_ip)?;
        write!(f, "last ip   : {}", self.last_ip)
    }
}

/// Decision taken after the comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The public IP could not be determined; nothing was changed
    NoCurrentIp,
    /// The record has no value to compare against; nothing was changed
    NoPriorValue,
    /// The record already holds the current IP
    Unchanged,
    /// The record was updated; carries the provider's response message
    Updated { message: Option<String> },
    /// The update request failed at the transport or decode layer
    UpdateFailed { error: String },
}

/// Result of one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    DomainNotFound,
    HostNotFound,
    RecordNotFound,
    Checked { summary: Summary, action: Action },
}

impl Outcome {
    /// Whether this run changed the record
    pub fn updated(&self) -> bool {
        matches!(
            self,
            Outcome::Checked {
                action: Action::Updated { .. },
                ..
            }
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::DomainNotFound => write!(f, "DOMAIN NOT FOUND"),
            Outcome::HostNotFound => write!(f, "HOST NOT FOUND"),
            Outcome::RecordNotFound => write!(f, "RECORD NOT FOUND"),
            Outcome::Checked { summary, action } => {
                write!(f, "{}", summary)?;
                match action {
                    Action::Updated { message } => {
                        write!(f, "\n{}", message.as_deref().unwrap_or_default())
                    }
                    Action::UpdateFailed { error } => write!(f, "\nUPDATE FAILED: {}", error),
                    Action::NoCurrentIp | Action::NoPriorValue | Action::Unchanged => Ok(()),
                }
            }
        }
    }
}

/// Drives one lookup → compare → update pass against a provider
pub struct Reconciler {
    /// DNS provider for lookups and updates
    provider: Box<dyn DnsProvider>,

    /// Source of the current public IP
    ip_source: Box<dyn IpSource>,

    /// Record to keep in sync
    target: TargetConfig,

    /// Listing page sizes
    lookup: LookupConfig,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// The configuration is validated; the provider and IP source are
    /// expected to have been built from the same configuration.
    pub fn new(
        provider: Box<dyn DnsProvider>,
        ip_source: Box<dyn IpSource>,
        config: DdnsConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            provider,
            ip_source,
            target: config.target,
            lookup: config.lookup,
        })
    }

    /// Run one reconciliation pass
    ///
    /// # Returns
    ///
    /// - `Ok(Outcome)`: The run completed, including "not found" outcomes
    /// - `Err(Error)`: A lookup request failed at the transport layer
    pub async fn run(&self) -> Result<Outcome> {
        let resolver = Resolver::new(self.provider.as_ref(), self.lookup.page_size);
        let TargetConfig { domain, host } = &self.target;

        info!(
            "Checking {} / {} via {}",
            domain,
            host,
            self.provider.provider_name()
        );

        let Some(domain_id) = resolver.domain_id(domain).await? else {
            warn!("Domain not found: {}", domain);
            return Ok(Outcome::DomainNotFound);
        };

        let Some(host_id) = resolver.host_id(domain_id, host).await? else {
            warn!("Host not found: {} in {}", host, domain);
            return Ok(Outcome::HostNotFound);
        };

        let current_ip = self.ip_source.current().await;
        if current_ip.is_none() {
            warn!(
                "Current IP could not be determined via {}",
                self.ip_source.source_name()
            );
        }

        let Some(record) = resolver
            .first_record(domain_id, host_id, self.lookup.record_page_size)
            .await?
        else {
            warn!("No record for host {} in {}", host, domain);
            return Ok(Outcome::RecordNotFound);
        };

        let summary = Summary {
            domain_id,
            host_id,
            record_id: record.record_id,
            current_ip,
            last_ip: record.value.clone(),
        };

        let action = match current_ip {
            None => Action::NoCurrentIp,
            Some(_) if record.value.is_empty() => Action::NoPriorValue,
            Some(ip) if ip.to_string() == record.value => {
                debug!("Record {} already points at {}", record.record_id, ip);
                Action::Unchanged
            }
            Some(ip) => {
                info!(
                    "Updating record {} ({}): {} -> {}",
                    record.record_id, record.host, record.value, ip
                );
                let update =
                    RecordUpdate::new(record.record_id, domain_id, record.host.as_str())
                        .with_value(ip.to_string());

                match self.provider.update_record(&update).await {
                    Ok(response) => Action::Updated {
                        message: response
                            .get("message")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    },
                    Err(e) => {
                        warn!("Update of record {} failed: {}", record.record_id, e);
                        Action::UpdateFailed {
                            error: e.to_string(),
                        }
                    }
                }
            }
        };

        Ok(Outcome::Checked { summary, action })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(current_ip: Option<IpAddr>) -> Summary {
        Summary {
            domain_id: 10,
            host_id: 5,
            record_id: 99,
            current_ip,
            last_ip: "1.2.3.4".to_string(),
        }
    }

    #[test]
    fn summary_renders_aligned_lines() {
        let rendered = summary(Some(IpAddr::from([5, 6, 7, 8]))).to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(
            lines,
            vec![
                "domain id : 10",
                "host id   : 5",
                "record id : 99",
                "curr ip   : 5.6.7.8",
                "last ip   : 1.2.3.4",
            ]
        );
    }

    #[test]
    fn summary_leaves_unknown_ip_blank() {
        let rendered = summary(None).to_string();
        assert!(rendered.lines().any(|line| line == "curr ip   : "));
    }

    #[test]
    fn not_found_outcomes_render_diagnostics() {
        assert_eq!(Outcome::DomainNotFound.to_string(), "DOMAIN NOT FOUND");
        assert_eq!(Outcome::HostNotFound.to_string(), "HOST NOT FOUND");
        assert_eq!(Outcome::RecordNotFound.to_string(), "RECORD NOT FOUND");
        assert!(!Outcome::RecordNotFound.updated());
    }

    #[test]
    fn updated_outcome_appends_provider_message() {
        let outcome = Outcome::Checked {
            summary: summary(Some(IpAddr::from([5, 6, 7, 8]))),
            action: Action::Updated {
                message: Some("success".to_string()),
            },
        };

        assert!(outcome.updated());
        assert_eq!(outcome.to_string().lines().last(), Some("success"));
    }
}
