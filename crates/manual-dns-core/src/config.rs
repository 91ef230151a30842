//! Configuration types for the manual DNS system
//!
//! This module defines the JSON form of provider configuration. The
//! directive form lives in [`crate::directive`].

use serde::{Deserialize, Deserializer, Serialize};

/// DNS provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Manual provider: log requested changes and wait for an operator
    ManualDns {
        /// Minutes to wait after logging, as a decimal string
        ///
        /// May contain placeholders such as `{env.DNS_WAIT}`. Empty means
        /// the provider default.
        #[serde(
            default,
            skip_serializing_if = "String::is_empty",
            deserialize_with = "string_or_number"
        )]
        wait_in_mins: String,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Manual provider configuration with the given wait
    pub fn manual(wait_in_mins: impl Into<String>) -> Self {
        ProviderConfig::ManualDns {
            wait_in_mins: wait_in_mins.into(),
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::ManualDns { .. } => Ok(()),
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::ManualDns { .. } => "manual_dns",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::ManualDns {
            wait_in_mins: String::new(),
        }
    }
}

/// Accept `"2"` as well as `2` or `0.5`
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}
