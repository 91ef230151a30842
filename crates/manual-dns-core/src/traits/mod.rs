//! Core traits for the manual DNS system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DnsProvider`]: Apply DNS record changes
//! - [`DnsProviderFactory`]: Build providers from configuration

pub mod dns_provider;

pub use dns_provider::{DnsProvider, DnsProviderFactory};
