// # ddns-core
//
// Core library for the CloudXNS dynamic DNS updater.
//
// ## Architecture Overview
//
// This library provides the provider-independent parts of a DDNS run:
// - **IpSource**: Trait for discovering the current public IP
// - **DnsProvider**: Trait for the provider's record API
// - **Resolver**: Maps domain and host names to provider IDs
// - **Reconciler**: One lookup → compare → update pass
// - **ProviderRegistry**: Plugin-based registry for providers and IP sources
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Single Pass**: One run per invocation; scheduling is external (cron, timers)
// 3. **Plugin-Based**: Providers are registered dynamically, no hard-coded if-else
// 4. **Library-First**: All core functionality can be used as a library
// 5. **Stateless**: Nothing is persisted between runs

pub mod traits;
pub mod engine;
pub mod resolver;
pub mod registry;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{DnsProvider, IpSource};
pub use engine::{Action, Outcome, Reconciler, Summary};
pub use resolver::Resolver;
pub use registry::ProviderRegistry;
pub use config::{DdnsConfig, IpSourceConfig, LookupConfig, ProviderConfig, TargetConfig};
pub use error::{Error, Result};
