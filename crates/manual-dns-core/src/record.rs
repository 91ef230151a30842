//! DNS resource records
//!
//! Records are opaque to providers that only relay them: they are carried
//! from the host to the provider and back without modification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A DNS resource record
///
/// `name` is relative to the zone the record is submitted with; `@` or an
/// empty name denotes the zone apex. A name ending in `.` is treated as
/// already fully qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Provider-specific record ID, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Record name, relative to the zone
    pub name: String,

    /// Record type (e.g. "TXT", "A", "CNAME")
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record data
    #[serde(alias = "data")]
    pub value: String,

    /// Time-to-live in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    /// Priority (MX, SRV)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,

    /// Weight (SRV)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
}

impl Record {
    /// Create a record with no TTL, priority or weight
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            record_type: record_type.into(),
            value: value.into(),
            ttl: None,
            priority: None,
            weight: None,
        }
    }

    /// Set the TTL in seconds
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Fully qualified name of this record within `zone`
    pub fn absolute_name(&self, zone: &str) -> String {
        absolute_name(&self.name, zone)
    }

    /// Zone-file style rendering: `<fqdn> [<ttl>] IN <type> [<priority>] <value>`
    pub fn display_in(&self, zone: &str) -> ZoneLine<'_> {
        ZoneLine {
            record: self,
            fqdn: self.absolute_name(zone),
        }
    }
}

/// A record rendered as one zone-file line
pub struct ZoneLine<'a> {
    record: &'a Record,
    fqdn: String,
}

impl fmt::Display for ZoneLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fqdn)?;
        if let Some(ttl) = self.record.ttl {
            write!(f, " {}", ttl)?;
        }
        write!(f, " IN {}", self.record.record_type)?;
        if let Some(priority) = self.record.priority {
            write!(f, " {}", priority)?;
        }
        if let Some(weight) = self.record.weight {
            write!(f, " {}", weight)?;
        }
        if self.record.record_type.eq_ignore_ascii_case("TXT") {
            let escaped = self.record.value.replace('\\', "\\\\").replace('"', "\\\"");
            write!(f, " \"{}\"", escaped)
        } else {
            write!(f, " {}", self.record.value)
        }
    }
}

/// Join a zone-relative name with its zone into a fully qualified name
///
/// - `@` or `""` yields the zone itself
/// - a name already ending in `.` is returned unchanged
/// - the result always ends in `.`
pub fn absolute_name(name: &str, zone: &str) -> String {
    let zone = fqdn(zone);
    match name {
        "" | "@" => zone,
        n if n.ends_with('.') => n.to_string(),
        n if zone == "." => format!("{}.", n),
        n => format!("{}.{}", n, zone),
    }
}

/// Inverse of [`absolute_name`]: strip `zone` from a fully qualified name
///
/// Returns `@` for the apex. Names outside the zone are returned as given.
pub fn relative_name(fqdn_name: &str, zone: &str) -> String {
    let name = fqdn(fqdn_name);
    let zone = fqdn(zone);

    if name.eq_ignore_ascii_case(&zone) {
        return "@".to_string();
    }

    let suffix = format!(".{}", zone);
    if name.len() > suffix.len() && name.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase()) {
        return name[..name.len() - suffix.len()].to_string();
    }

    fqdn_name.to_string()
}

fn fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}
