//! Test doubles and common utilities for reconciliation contract tests
//!
//! The doubles return canned provider responses and record every call so
//! tests can assert on exactly what the workflow asked for.

#![allow(dead_code)]

use ddns_core::config::{DdnsConfig, ProviderConfig, TargetConfig};
use ddns_core::error::{Error, Result};
use ddns_core::traits::{ApiResponse, DnsProvider, IpSource, RecordUpdate};
use serde_json::json;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Canned reply for one provider endpoint
#[derive(Clone)]
pub enum Reply {
    Json(ApiResponse),
    Transport(&'static str),
    Undecodable,
}

impl Reply {
    fn produce(&self) -> Result<ApiResponse> {
        match self {
            Reply::Json(value) => Ok(value.clone()),
            Reply::Transport(msg) => Err(Error::transport(*msg)),
            Reply::Undecodable => Err(Error::decode("expected value at line 1 column 1")),
        }
    }
}

/// Listing call as seen by the provider: (path id(s), offset, row_num)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingCall {
    Domain { offset: u32, row_num: u32 },
    Host { domain_id: u64, offset: u32, row_num: u32 },
    Record { domain_id: u64, host_id: u64, offset: u32, row_num: u32 },
}

struct Shared {
    listing_calls: Mutex<Vec<ListingCall>>,
    updates: Mutex<Vec<RecordUpdate>>,
    update_call_count: AtomicUsize,
}

/// A scripted DnsProvider that tracks calls
pub struct MockDnsProvider {
    domains: Reply,
    hosts: Reply,
    records: Reply,
    update: Reply,
    shared: Arc<Shared>,
}

impl MockDnsProvider {
    pub fn new(domains: Reply, hosts: Reply, records: Reply) -> Self {
        Self {
            domains,
            hosts,
            records,
            update: Reply::Json(json!({"code": 1, "message": "success"})),
            shared: Arc::new(Shared {
                listing_calls: Mutex::new(Vec::new()),
                updates: Mutex::new(Vec::new()),
                update_call_count: AtomicUsize::new(0),
            }),
        }
    }

    /// Replace the reply to `update_record`
    pub fn with_update_reply(mut self, update: Reply) -> Self {
        self.update = update;
        self
    }

    /// Create a provider with the same replies that shares call records
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            domains: other.domains.clone(),
            hosts: other.hosts.clone(),
            records: other.records.clone(),
            update: other.update.clone(),
            shared: Arc::clone(&other.shared),
        }
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.shared.update_call_count.load(Ordering::SeqCst)
    }

    /// Get the updates that were requested
    pub fn updates(&self) -> Vec<RecordUpdate> {
        self.shared.updates.lock().unwrap().clone()
    }

    /// Get the listing calls in order
    pub fn listing_calls(&self) -> Vec<ListingCall> {
        self.shared.listing_calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn get_domain(&self, offset: u32, row_num: u32) -> Result<ApiResponse> {
        self.shared
            .listing_calls
            .lock()
            .unwrap()
            .push(ListingCall::Domain { offset, row_num });
        self.domains.produce()
    }

    async fn get_domain_host(
        &self,
        domain_id: u64,
        offset: u32,
        row_num: u32,
    ) -> Result<ApiResponse> {
        self.shared
            .listing_calls
            .lock()
            .unwrap()
            .push(ListingCall::Host {
                domain_id,
                offset,
                row_num,
            });
        self.hosts.produce()
    }

    async fn get_domain_record(
        &self,
        domain_id: u64,
        host_id: u64,
        offset: u32,
        row_num: u32,
    ) -> Result<ApiResponse> {
        self.shared
            .listing_calls
            .lock()
            .unwrap()
            .push(ListingCall::Record {
                domain_id,
                host_id,
                offset,
                row_num,
            });
        self.records.produce()
    }

    async fn update_record(&self, update: &RecordUpdate) -> Result<ApiResponse> {
        self.shared.update_call_count.fetch_add(1, Ordering::SeqCst);
        self.shared.updates.lock().unwrap().push(update.clone());
        self.update.produce()
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// An IpSource that returns a fixed answer and counts calls
pub struct FixedIpSource {
    ip: Option<IpAddr>,
    call_count: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(ip: Option<IpAddr>) -> Self {
        Self {
            ip,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            ip: other.ip,
            call_count: Arc::clone(&other.call_count),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Option<IpAddr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.ip
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// Domain listing containing `example.com.` with id 10
pub fn domains_reply() -> Reply {
    Reply::Json(json!({
        "code": 1,
        "message": "success",
        "total": "2",
        "data": [
            {"id": "7", "domain": "other.org.", "status": "ok"},
            {"id": "10", "domain": "example.com.", "status": "ok"}
        ]
    }))
}

/// Host listing of domain 10 containing `www` with id 5
pub fn hosts_reply() -> Reply {
    Reply::Json(json!({
        "code": 1,
        "message": "success",
        "total": 2,
        "hosts": [
            {"id": "4", "host": "@", "record_num": "1"},
            {"id": "5", "host": "www", "record_num": "1"}
        ]
    }))
}

/// Record listing with a single A record for `www`
pub fn records_reply(value: &str) -> Reply {
    Reply::Json(json!({
        "code": 1,
        "message": "success",
        "total": 1,
        "offset": 0,
        "row_num": 30,
        "data": [{
            "record_id": "99",
            "host_id": "5",
            "host": "www",
            "line_id": "1",
            "line_zh": "全网默认",
            "line_en": "DEFAULT",
            "value": value,
            "ttl": "600",
            "type": "A",
            "status": "ok"
        }]
    }))
}

/// Provider response without the success marker
pub fn failure_reply() -> Reply {
    Reply::Json(json!({"code": 34, "message": "Invalid API KEY"}))
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(domain: &str, host: &str) -> DdnsConfig {
    DdnsConfig::new(
        ProviderConfig::cloudxns("test-key", "test-secret"),
        TargetConfig::new(domain, host),
    )
}
