// # IP Source Trait
//
// Defines the interface for discovering the caller's current public IP.
//
// ## Implementations
//
// - HTTP text endpoint (myip.ipip.net): `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() {
//     let source = /* IpSource implementation */;
//
//     match source.current().await {
//         Some(ip) => println!("public ip: {ip}"),
//         None => println!("public ip unknown"),
//     }
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for IP source implementations
///
/// # Contract
///
/// - One attempt per call, bounded by the implementation's timeout
/// - Failure to determine the IP is a normal outcome and yields `None`;
///   implementations log the cause instead of returning an error
/// - No caching between calls
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address, if it can be determined
    async fn current(&self) -> Option<IpAddr>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}

/// Helper trait for constructing IP sources from configuration
pub trait IpSourceFactory: Send + Sync {
    /// Create an IpSource instance from configuration
    fn create(
        &self,
        config: &crate::config::IpSourceConfig,
    ) -> Result<Box<dyn IpSource>, crate::Error>;
}
