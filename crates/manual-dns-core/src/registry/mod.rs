//! Plugin-based provider registry
//!
//! The registry allows DNS providers to be registered by the host at
//! startup, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use manual_dns_core::{ProviderConfig, ProviderRegistry, ProvisionContext};
//!
//! // Create a registry
//! let registry = ProviderRegistry::new();
//!
//! // Register providers
//! manual_dns_provider::register(&registry);
//!
//! // Create provider from config
//! let ctx = ProvisionContext::default();
//! let provider = registry.create_provider(&ProviderConfig::manual("2"), &ctx)?;
//! ```
//!
//! ## Registration
//!
//! Provider crates expose a `register` function that the host calls:
//!
//! ```rust,ignore
//! pub fn register(registry: &ProviderRegistry) {
//!     registry.register_provider("manual_dns", Box::new(ManualDnsFactory));
//! }
//! ```

use crate::config::ProviderConfig;
use crate::context::ProvisionContext;
use crate::directive::{Dispenser, parse_directives};
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, DnsProviderFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Provider registry for plugin-based DNS provider creation
///
/// The registry maintains a map of provider type names to factory objects,
/// allowing dynamic instantiation of providers based on configuration.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered DNS provider factories
    providers: RwLock<HashMap<String, Box<dyn DnsProviderFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS provider factory
    ///
    /// Registering the same name twice replaces the earlier factory.
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name, also used as the directive name
    /// - `factory`: Factory object for creating provider instances
    pub fn register_provider(&self, name: impl Into<String>, factory: Box<dyn DnsProviderFactory>) {
        let name = name.into();
        let mut providers = self.providers.write().unwrap_or_else(PoisonError::into_inner);
        if providers.insert(name.clone(), factory).is_some() {
            tracing::warn!("Provider {} registered twice, replacing earlier factory", name);
        } else {
            tracing::debug!("Registered provider {}", name);
        }
    }

    /// Create a DNS provider from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsProvider>)`: Created, provisioned provider instance
    /// - `Err(Error)`: If the configuration is invalid, the provider type is
    ///   not registered, or creation fails
    pub fn create_provider(
        &self,
        config: &ProviderConfig,
        ctx: &ProvisionContext,
    ) -> Result<Box<dyn DnsProvider>> {
        config.validate()?;

        let provider_type = config.type_name();
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);

        let factory = providers
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", provider_type)))?;

        factory.create(config, ctx)
    }

    /// Create a DNS provider from a single directive
    ///
    /// The directive name selects the factory.
    pub fn create_provider_from_directive(
        &self,
        d: &mut Dispenser,
        ctx: &ProvisionContext,
    ) -> Result<Box<dyn DnsProvider>> {
        let name = d
            .directive_name()
            .ok_or_else(|| Error::config("Empty provider directive"))?
            .to_string();

        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);

        let factory = providers
            .get(&name)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", name)))?;

        factory.create_from_directive(d, ctx)
    }

    /// Create a DNS provider from directive text holding exactly one directive
    pub fn create_provider_from_text(
        &self,
        text: &str,
        ctx: &ProvisionContext,
    ) -> Result<Box<dyn DnsProvider>> {
        let mut directives = parse_directives(text)?;
        match directives.len() {
            1 => self.create_provider_from_directive(&mut directives[0], ctx),
            0 => Err(Error::config("No provider directive found")),
            n => Err(Error::config(format!(
                "Expected one provider directive, found {}",
                n
            ))),
        }
    }

    /// List all registered provider types
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        providers.keys().cloned().collect()
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        providers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use async_trait::async_trait;

    struct EchoProvider;

    #[async_trait]
    impl DnsProvider for EchoProvider {
        async fn append_records(&self, _zone: &str, records: Vec<Record>) -> Result<Vec<Record>> {
            Ok(records)
        }

        async fn delete_records(&self, _zone: &str, records: Vec<Record>) -> Result<Vec<Record>> {
            Ok(records)
        }

        fn provider_name(&self) -> &'static str {
            "echo"
        }
    }

    struct EchoFactory;

    impl DnsProviderFactory for EchoFactory {
        fn create(
            &self,
            _config: &ProviderConfig,
            _ctx: &ProvisionContext,
        ) -> Result<Box<dyn DnsProvider>> {
            Ok(Box::new(EchoProvider))
        }

        fn create_from_directive(
            &self,
            d: &mut Dispenser,
            _ctx: &ProvisionContext,
        ) -> Result<Box<dyn DnsProvider>> {
            d.next();
            if d.next_arg() {
                return Err(d.arg_err());
            }
            Ok(Box::new(EchoProvider))
        }
    }

    fn custom(name: &str) -> ProviderConfig {
        ProviderConfig::Custom {
            factory: name.to_string(),
            config: serde_json::json!({}),
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ProviderRegistry::new();

        // Initially empty
        assert!(!registry.has_provider("echo"));

        // Register
        registry.register_provider("echo", Box::new(EchoFactory));

        // Now present
        assert!(registry.has_provider("echo"));
        assert!(registry.list_providers().contains(&"echo".to_string()));
    }

    #[test]
    fn test_create_from_config() {
        let registry = ProviderRegistry::new();
        registry.register_provider("echo", Box::new(EchoFactory));

        let ctx = ProvisionContext::default();
        let provider = registry.create_provider(&custom("echo"), &ctx).unwrap();
        assert_eq!(provider.provider_name(), "echo");

        let records = vec![Record::new("a", "TXT", "v")];
        let out = tokio_test::block_on(provider.append_records("example.com.", records.clone()));
        assert_eq!(out.unwrap(), records);
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let registry = ProviderRegistry::new();
        let ctx = ProvisionContext::default();

        let err = registry.create_provider(&custom("missing"), &ctx).err().unwrap();
        assert!(matches!(err, Error::Config(_)));

        let err = registry
            .create_provider_from_text("missing 1", &ctx)
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_create_from_text() {
        let registry = ProviderRegistry::new();
        registry.register_provider("echo", Box::new(EchoFactory));
        let ctx = ProvisionContext::default();

        assert!(registry.create_provider_from_text("echo", &ctx).is_ok());
        assert!(matches!(
            registry.create_provider_from_text("echo extra", &ctx).err().unwrap(),
            Error::Directive { line: 1, .. }
        ));
        assert!(registry.create_provider_from_text("", &ctx).is_err());
        assert!(registry.create_provider_from_text("echo\necho", &ctx).is_err());
    }
}
