//! Domain and host name resolution
//!
//! Maps human-readable names to the provider's numeric identifiers by
//! listing one page and searching it linearly.
//!
//! ## Known limitation
//!
//! Only the first page (offset 0, `page_size` entries) is consulted. A name
//! that sits beyond the first page is reported as not found. This matches
//! the provider's documented default usage; paging is not attempted.

use crate::error::{Error, Result};
use crate::traits::{ApiResponse, DnsProvider, DomainRecord, is_success, parse_id};
use serde_json::Value;
use tracing::{debug, warn};

/// Resolves names to provider IDs through a [`DnsProvider`]
pub struct Resolver<'a> {
    provider: &'a dyn DnsProvider,
    page_size: u32,
}

impl<'a> Resolver<'a> {
    /// Create a resolver that lists `page_size` entries per lookup
    pub fn new(provider: &'a dyn DnsProvider, page_size: u32) -> Self {
        Self {
            provider,
            page_size,
        }
    }

    /// Find the ID of a domain by name
    ///
    /// The provider lists domains as FQDNs ("example.com."); one trailing
    /// dot is stripped before comparing with `name`.
    pub async fn domain_id(&self, name: &str) -> Result<Option<u64>> {
        let Some(response) = tolerate_decode(self.provider.get_domain(0, self.page_size).await)?
        else {
            return Ok(None);
        };

        let id = success_list(&response, "data")
            .and_then(|domains| {
                domains.iter().find(|entry| {
                    entry
                        .get("domain")
                        .and_then(Value::as_str)
                        .is_some_and(|fqdn| fqdn.strip_suffix('.').unwrap_or(fqdn) == name)
                })
            })
            .and_then(|entry| entry.get("id").and_then(parse_id));

        debug!("Domain {} resolved to {:?}", name, id);
        Ok(id)
    }

    /// Find the ID of a host within a domain by exact label
    pub async fn host_id(&self, domain_id: u64, host: &str) -> Result<Option<u64>> {
        let Some(response) = tolerate_decode(
            self.provider
                .get_domain_host(domain_id, 0, self.page_size)
                .await,
        )?
        else {
            return Ok(None);
        };

        let id = success_list(&response, "hosts")
            .and_then(|hosts| {
                hosts
                    .iter()
                    .find(|entry| entry.get("host").and_then(Value::as_str) == Some(host))
            })
            .and_then(|entry| entry.get("id").and_then(parse_id));

        debug!("Host {} in domain {} resolved to {:?}", host, domain_id, id);
        Ok(id)
    }

    /// Fetch the first record of a host
    ///
    /// `row_num` is the page size of the record listing.
    pub async fn first_record(
        &self,
        domain_id: u64,
        host_id: u64,
        row_num: u32,
    ) -> Result<Option<DomainRecord>> {
        let Some(response) = tolerate_decode(
            self.provider
                .get_domain_record(domain_id, host_id, 0, row_num)
                .await,
        )?
        else {
            return Ok(None);
        };

        let record = success_list(&response, "data")
            .and_then(|records| records.first())
            .and_then(DomainRecord::from_json);

        debug!(
            "First record of host {} in domain {}: {:?}",
            host_id, domain_id, record
        );
        Ok(record)
    }
}

/// Turn an undecodable response into "nothing found"
///
/// Transport failures still propagate.
fn tolerate_decode(result: Result<ApiResponse>) -> Result<Option<ApiResponse>> {
    match result {
        Ok(response) => Ok(Some(response)),
        Err(Error::Decode(msg)) => {
            warn!("Provider returned an undecodable response: {}", msg);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// The list under `key`, if the response carries the success marker
fn success_list<'r>(response: &'r ApiResponse, key: &str) -> Option<&'r Vec<Value>> {
    if !is_success(response) {
        debug!("Response without success marker: {}", response);
        return None;
    }
    response.get(key).and_then(Value::as_array)
}
