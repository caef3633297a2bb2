//! Core traits for the DDNS system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Discover the current public IP address
//! - [`DnsProvider`]: Query and update DNS records via a provider API

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::{IpSource, IpSourceFactory};
pub use dns_provider::{
    ApiResponse, DnsProvider, DnsProviderFactory, DomainRecord, RecordUpdate, SUCCESS_MESSAGE,
    is_success, parse_id,
};
