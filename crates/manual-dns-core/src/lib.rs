// # manual-dns-core
//
// Host-side contracts for DNS providers whose changes are applied by hand.
//
// ## Architecture Overview
//
// This library provides everything a host needs to drive a DNS provider
// plugin:
// - **Record**: DNS resource record passed to and returned from providers
// - **DnsProvider**: Trait for appending and deleting DNS records
// - **ProviderRegistry**: Plugin-based registry for DNS providers
// - **ProvisionContext**: Shutdown token and placeholder replacer given to
//   providers at setup
// - **directive**: Block-based configuration grammar
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Host contracts are separate from implementations
// 2. **Plugin-Based**: Providers are registered explicitly by the host, no global state
// 3. **Cancellable**: Long-running provider operations observe host shutdown
// 4. **Library-First**: All core functionality can be used as a library

pub mod config;
pub mod context;
pub mod directive;
pub mod error;
pub mod record;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::ProviderConfig;
pub use context::{ProvisionContext, Replacer};
pub use directive::{Dispenser, UnmarshalDirective};
pub use error::{Error, Result};
pub use record::Record;
pub use registry::ProviderRegistry;
pub use traits::{DnsProvider, DnsProviderFactory};

// Hosts and providers share the token type
pub use tokio_util::sync::CancellationToken;
