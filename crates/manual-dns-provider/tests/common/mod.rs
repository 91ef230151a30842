//! Shared helpers for manual provider contract tests

#![allow(dead_code)]

use manual_dns_core::{
    CancellationToken, DnsProvider, ProviderConfig, ProviderRegistry, ProvisionContext, Record,
    Replacer,
};

pub const ZONE: &str = "example.com.";

/// Records a typical ACME DNS-01 run submits
pub fn challenge_records() -> Vec<Record> {
    vec![
        Record::new("_acme-challenge", "TXT", "LPsIwTo7o8BoG0-vjCyGQGBWSVIPxI-i_X336eUOQZo")
            .with_ttl(120),
        Record::new("_acme-challenge.www", "TXT", "second token").with_ttl(120),
    ]
}

/// A registry with the manual provider registered, as a host would set it up
pub fn registry() -> ProviderRegistry {
    let registry = ProviderRegistry::new();
    manual_dns_provider::register(&registry);
    registry
}

/// A context that does not read the process environment
pub fn isolated_context(cancel: CancellationToken) -> ProvisionContext {
    ProvisionContext::new(cancel).with_replacer(Replacer::isolated())
}

/// Provider created through the registry from JSON-style configuration
pub fn provider_with_wait(wait_in_mins: &str, cancel: CancellationToken) -> Box<dyn DnsProvider> {
    registry()
        .create_provider(
            &ProviderConfig::manual(wait_in_mins),
            &isolated_context(cancel),
        )
        .expect("manual provider is registered")
}
