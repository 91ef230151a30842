// # DNS Provider Trait
//
// Defines the interface the host uses to request DNS record changes.
//
// ## Implementations
//
// - Manual (operator applies changes by hand): `manual-dns-provider` crate
//
// ## Usage
//
// ```rust,ignore
// use manual_dns_core::{DnsProvider, Record};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     // Request a DNS-01 challenge record
//     let added = provider.append_records(
//         "example.com.",
//         vec![Record::new("_acme-challenge", "TXT", "token")],
//     ).await?;
//
//     Ok(())
// }
// ```

use crate::config::ProviderConfig;
use crate::context::ProvisionContext;
use crate::directive::Dispenser;
use crate::record::Record;
use async_trait::async_trait;

/// Trait for DNS provider implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks. The
/// host may issue calls for several zones concurrently.
///
/// # Cancellation
///
/// Both operations may take a long time. They must end early when the
/// [`ProvisionContext`] cancellation token fires, and must tolerate their
/// future being dropped at any await point.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Add records to `zone`
    ///
    /// # Returns
    ///
    /// - `Ok(records)`: the records that were added
    /// - `Err(Error)`: if the change could not be made
    async fn append_records(
        &self,
        zone: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, crate::Error>;

    /// Remove records from `zone`
    ///
    /// # Returns
    ///
    /// - `Ok(records)`: the records that were removed
    /// - `Err(Error)`: if the change could not be made
    async fn delete_records(
        &self,
        zone: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
///
/// Factories return providers that are already provisioned with `ctx`.
pub trait DnsProviderFactory: Send + Sync {
    /// Create a provider from JSON-style configuration
    fn create(
        &self,
        config: &ProviderConfig,
        ctx: &ProvisionContext,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;

    /// Create a provider from a directive block
    ///
    /// The dispenser is positioned before the directive name.
    fn create_from_directive(
        &self,
        d: &mut Dispenser,
        ctx: &ProvisionContext,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
