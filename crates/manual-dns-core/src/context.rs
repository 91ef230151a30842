//! Provisioning context handed from the host to providers
//!
//! A provider is provisioned once, after its configuration has been loaded
//! and before any record operation. The context carries:
//!
//! - a [`CancellationToken`] bound to host shutdown, which long-running
//!   provider operations must observe
//! - a [`Replacer`] for resolving `{placeholder}` values in configuration

use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

/// Host resources available to a provider during provisioning
#[derive(Debug, Clone, Default)]
pub struct ProvisionContext {
    cancel: CancellationToken,
    replacer: Replacer,
}

impl ProvisionContext {
    /// Create a context bound to the given shutdown token
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            replacer: Replacer::new(),
        }
    }

    /// Replace the placeholder resolver
    pub fn with_replacer(mut self, replacer: Replacer) -> Self {
        self.replacer = replacer;
        self
    }

    /// Token that fires when the host shuts down
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Placeholder resolver
    pub fn replacer(&self) -> &Replacer {
        &self.replacer
    }
}

/// Resolves `{key}` placeholders in configuration strings
///
/// Known keys:
///
/// - `env.NAME`: the environment variable `NAME` (unless disabled)
/// - `system.os`, `system.arch`: the platform the host runs on
/// - any static value added with [`Replacer::with_value`]
///
/// `\{` and `\}` produce literal braces.
#[derive(Debug, Clone)]
pub struct Replacer {
    values: HashMap<String, String>,
    use_env: bool,
}

impl Default for Replacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Replacer {
    /// Create a replacer with the global placeholders and environment access
    pub fn new() -> Self {
        let mut values = HashMap::new();
        values.insert("system.os".to_string(), std::env::consts::OS.to_string());
        values.insert("system.arch".to_string(), std::env::consts::ARCH.to_string());

        Self {
            values,
            use_env: true,
        }
    }

    /// Create a replacer that only knows static values (no environment)
    pub fn isolated() -> Self {
        Self {
            values: HashMap::new(),
            use_env: false,
        }
    }

    /// Add or override a static placeholder value
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Look up the value of a single placeholder key
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.values.get(key) {
            return Some(value.clone());
        }

        if self.use_env
            && let Some(name) = key.strip_prefix("env.")
        {
            return std::env::var(name).ok();
        }

        None
    }

    /// Replace every placeholder in `input`
    ///
    /// Unknown placeholders, and placeholders whose value is empty, are
    /// replaced with `empty`. An unterminated `{` is kept verbatim.
    pub fn replace_all(&self, input: &str, empty: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(pos) = rest.find(['{', '\\']) {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if let Some(escaped) = tail.strip_prefix('\\') {
                match escaped.chars().next() {
                    Some(c @ ('{' | '}')) => {
                        out.push(c);
                        rest = &escaped[1..];
                    }
                    _ => {
                        out.push('\\');
                        rest = escaped;
                    }
                }
                continue;
            }

            match tail[1..].find('}') {
                Some(end) => {
                    let key = &tail[1..1 + end];
                    match self.get(key) {
                        Some(value) if !value.is_empty() => out.push_str(&value),
                        _ => out.push_str(empty),
                    }
                    rest = &tail[end + 2..];
                }
                None => {
                    out.push_str(tail);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        let replacer = Replacer::isolated();
        assert_eq!(replacer.replace_all("2", "1"), "2");
        assert_eq!(replacer.replace_all("", "1"), "");
    }

    #[test]
    fn test_unknown_placeholder_uses_default() {
        let replacer = Replacer::isolated();
        assert_eq!(replacer.replace_all("{env.NOT_SET}", "1"), "1");
        assert_eq!(replacer.replace_all("{}", "1"), "1");
    }

    #[test]
    fn test_static_values() {
        let replacer = Replacer::isolated()
            .with_value("env.WAIT", "5")
            .with_value("blank", "");
        assert_eq!(replacer.replace_all("{env.WAIT}", "1"), "5");
        assert_eq!(replacer.replace_all("x{env.WAIT}y", "1"), "x5y");
        assert_eq!(replacer.replace_all("{blank}", "1"), "1");
    }

    #[test]
    fn test_escapes_and_unterminated() {
        let replacer = Replacer::isolated().with_value("a", "A");
        assert_eq!(replacer.replace_all("\\{a\\}", "1"), "{a}");
        assert_eq!(replacer.replace_all("{a", "1"), "{a");
        assert_eq!(replacer.replace_all("a\\b", "1"), "a\\b");
    }

    #[test]
    fn test_environment_lookup() {
        // PATH is present in any test environment
        let replacer = Replacer::new();
        assert!(replacer.get("env.PATH").is_some());
        assert_eq!(replacer.get("system.os").as_deref(), Some(std::env::consts::OS));
        assert!(Replacer::isolated().get("env.PATH").is_none());
    }

    #[test]
    fn test_context_cancellation_is_shared() {
        let token = CancellationToken::new();
        let ctx = ProvisionContext::new(token.clone());
        assert!(!ctx.cancellation().is_cancelled());
        token.cancel();
        assert!(ctx.cancellation().is_cancelled());
    }
}
