//! Contract Test: Domain and Host Resolution
//!
//! Constraints verified:
//! - Domain names match provider FQDNs with one trailing dot removed
//! - Host labels match exactly
//! - Responses without the success marker resolve to nothing, not an error
//! - IDs may arrive as numbers or numeric strings

mod common;

use common::*;
use ddns_core::resolver::Resolver;
use serde_json::json;

#[tokio::test]
async fn domain_matches_without_trailing_dot() {
    let provider = MockDnsProvider::new(domains_reply(), hosts_reply(), records_reply("1.2.3.4"));
    let resolver = Resolver::new(&provider, 50);

    assert_eq!(resolver.domain_id("example.com").await.unwrap(), Some(10));
    assert_eq!(resolver.domain_id("other.org").await.unwrap(), Some(7));
    assert_eq!(resolver.domain_id("example.com.").await.unwrap(), None);
    assert_eq!(resolver.domain_id("missing.net").await.unwrap(), None);
}

#[tokio::test]
async fn domain_lookup_honours_page_size() {
    let provider = MockDnsProvider::new(domains_reply(), hosts_reply(), records_reply("1.2.3.4"));
    let resolver = Resolver::new(&provider, 2000);

    resolver.domain_id("example.com").await.unwrap();

    assert_eq!(
        provider.listing_calls(),
        vec![ListingCall::Domain {
            offset: 0,
            row_num: 2000
        }]
    );
}

#[tokio::test]
async fn host_requires_exact_label() {
    let provider = MockDnsProvider::new(domains_reply(), hosts_reply(), records_reply("1.2.3.4"));
    let resolver = Resolver::new(&provider, 50);

    assert_eq!(resolver.host_id(10, "www").await.unwrap(), Some(5));
    assert_eq!(resolver.host_id(10, "@").await.unwrap(), Some(4));
    assert_eq!(resolver.host_id(10, "WWW").await.unwrap(), None);
    assert_eq!(resolver.host_id(10, "www.example.com").await.unwrap(), None);
}

#[tokio::test]
async fn numeric_ids_are_accepted() {
    let provider = MockDnsProvider::new(
        Reply::Json(json!({
            "code": 1,
            "message": "success",
            "data": [{"id": 10, "domain": "example.com."}]
        })),
        Reply::Json(json!({
            "code": 1,
            "message": "success",
            "hosts": [{"id": 5, "host": "www"}]
        })),
        records_reply("1.2.3.4"),
    );
    let resolver = Resolver::new(&provider, 50);

    assert_eq!(resolver.domain_id("example.com").await.unwrap(), Some(10));
    assert_eq!(resolver.host_id(10, "www").await.unwrap(), Some(5));
}

#[tokio::test]
async fn failure_marker_resolves_to_nothing() {
    let provider = MockDnsProvider::new(failure_reply(), failure_reply(), failure_reply());
    let resolver = Resolver::new(&provider, 50);

    assert_eq!(resolver.domain_id("example.com").await.unwrap(), None);
    assert_eq!(resolver.host_id(10, "www").await.unwrap(), None);
    assert_eq!(resolver.first_record(10, 5, 30).await.unwrap(), None);
}

#[tokio::test]
async fn unexpected_shape_resolves_to_nothing() {
    let provider = MockDnsProvider::new(
        Reply::Json(json!({"message": "success", "data": "not a list"})),
        Reply::Json(json!(["success"])),
        Reply::Undecodable,
    );
    let resolver = Resolver::new(&provider, 50);

    assert_eq!(resolver.domain_id("example.com").await.unwrap(), None);
    assert_eq!(resolver.host_id(10, "www").await.unwrap(), None);
    assert_eq!(resolver.first_record(10, 5, 30).await.unwrap(), None);
}

#[tokio::test]
async fn first_record_is_taken() {
    let provider = MockDnsProvider::new(
        domains_reply(),
        hosts_reply(),
        Reply::Json(json!({
            "code": 1,
            "message": "success",
            "data": [
                {"record_id": "99", "host": "www", "value": "1.2.3.4", "type": "A"},
                {"record_id": "100", "host": "www", "value": "9.9.9.9", "type": "A"}
            ]
        })),
    );
    let resolver = Resolver::new(&provider, 50);

    let record = resolver.first_record(10, 5, 30).await.unwrap().unwrap();
    assert_eq!(record.record_id, 99);
    assert_eq!(record.value, "1.2.3.4");
}

#[tokio::test]
async fn transport_failure_propagates() {
    let provider = MockDnsProvider::new(
        Reply::Transport("dns error"),
        hosts_reply(),
        records_reply("1.2.3.4"),
    );
    let resolver = Resolver::new(&provider, 50);

    let err = resolver.domain_id("example.com").await.unwrap_err();
    assert!(err.is_transport());
}
