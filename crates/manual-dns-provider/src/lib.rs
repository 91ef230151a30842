// # Manual DNS Provider
//
// This crate provides a DNS provider for DNS hosts that have no API. Instead
// of changing records itself, it:
//
// 1. Logs the requested records for an operator to apply by hand
// 2. Waits for a configured number of minutes (e.g. so an ACME DNS-01
//    challenge record can be created and propagate)
// 3. Returns the requested records unchanged
//
// ## Waiting
//
// The wait is best-effort: an unparseable wait value is logged and the
// operation returns immediately. The wait ends early when the host's
// shutdown token fires, or when the caller drops the operation future.
//
// ## Configuration
//
// JSON:
//
// ```json
// { "type": "manual_dns", "wait_in_mins": "2" }
// ```
//
// Directive:
//
// ```text
// manual_dns [<wait_in_mins>] {
//     wait_in_mins <wait_in_mins>
// }
// ```
//
// `wait_in_mins` defaults to 1 and may contain placeholders such as
// `{env.MANUAL_DNS_WAIT}`.

use async_trait::async_trait;
use manual_dns_core::config::ProviderConfig;
use manual_dns_core::directive::{Dispenser, UnmarshalDirective};
use manual_dns_core::traits::{DnsProvider, DnsProviderFactory};
use manual_dns_core::{Error, ProvisionContext, Record, Result};
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Provider name, also the directive name
pub const PROVIDER_NAME: &str = "manual_dns";

/// Wait used when none is configured or a placeholder cannot be resolved
pub const DEFAULT_WAIT_IN_MINS: &str = "1";

const LOG_TARGET: &str = "manual_dns";

/// How a wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full duration elapsed
    Elapsed,
    /// The host shut down first
    Cancelled,
}

/// DNS provider whose changes are applied by a human operator
///
/// # Lifecycle
///
/// 1. Configure with [`ManualDnsProvider::new`] or
///    [`UnmarshalDirective::unmarshal_directive`]
/// 2. Call [`ManualDnsProvider::provision`] with the host context
/// 3. Use through the [`DnsProvider`] trait
#[derive(Debug, Clone, Default)]
pub struct ManualDnsProvider {
    /// Minutes to wait, as configured (resolved by `provision`)
    wait_in_mins: String,

    /// Host shutdown token
    cancel: CancellationToken,
}

impl ManualDnsProvider {
    /// Create an unprovisioned provider with the given wait
    pub fn new(wait_in_mins: impl Into<String>) -> Self {
        Self {
            wait_in_mins: wait_in_mins.into(),
            cancel: CancellationToken::new(),
        }
    }

    /// The configured wait, in minutes
    pub fn wait_in_mins(&self) -> &str {
        &self.wait_in_mins
    }

    /// Resolve placeholders in the wait and bind to the host's shutdown token
    ///
    /// Unresolvable placeholders and an empty wait become
    /// [`DEFAULT_WAIT_IN_MINS`]. Never fails.
    pub fn provision(&mut self, ctx: &ProvisionContext) {
        self.wait_in_mins = ctx
            .replacer()
            .replace_all(&self.wait_in_mins, DEFAULT_WAIT_IN_MINS);
        if self.wait_in_mins.is_empty() {
            self.wait_in_mins = DEFAULT_WAIT_IN_MINS.to_string();
        }
        self.cancel = ctx.cancellation().clone();
        debug!(target: LOG_TARGET, wait_in_mins = %self.wait_in_mins, "provisioned");
    }

    /// Wait for the configured duration
    ///
    /// Returns an error without waiting if the configured value is not a
    /// number of minutes. Cancellation is not an error.
    pub async fn wait(&self) -> Result<WaitOutcome> {
        let duration = match parse_wait(&self.wait_in_mins) {
            Ok(duration) => duration,
            Err(e) => {
                error!(target: LOG_TARGET, error = %e, "waiting for records");
                return Err(e);
            }
        };

        let until = chrono::TimeDelta::from_std(duration)
            .ok()
            .and_then(|delta| chrono::Utc::now().checked_add_signed(delta))
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();

        info!(target: LOG_TARGET, time = ?duration, until = %until, "waiting for records");

        tokio::select! {
            _ = tokio::time::sleep(duration) => {
                info!(target: LOG_TARGET, "wait finished");
                Ok(WaitOutcome::Elapsed)
            }
            _ = self.cancel.cancelled() => {
                warn!(target: LOG_TARGET, "wait cancelled");
                Ok(WaitOutcome::Cancelled)
            }
        }
    }

    async fn wait_best_effort(&self) {
        if let Err(e) = self.wait().await {
            debug!(target: LOG_TARGET, "continuing without waiting: {}", e);
        }
    }
}

/// Parse a wait given in minutes
///
/// The value is read as a duration with a trailing minutes unit, so a plain
/// number is minutes (`"1"`, `"0.5"`, `".5"`, `"+2"`) and a compound value
/// ends in minutes (`"1h30"` is 90 minutes, `"2s500ms"` is invalid because
/// its last unit becomes `msm`). Units are `ns`, `us`/`µs`, `ms`, `s`, `m`
/// and `h`. Negative values mean no wait.
pub fn parse_wait(value: &str) -> Result<Duration> {
    let invalid = || {
        Error::invalid_input(format!(
            "invalid wait_in_mins {:?}: expected a number of minutes",
            value
        ))
    };

    let with_unit = format!("{}m", value);
    let negative = with_unit.starts_with('-');
    let mut rest = with_unit.strip_prefix(['+', '-']).unwrap_or(with_unit.as_str());

    let is_number = |b: u8| b.is_ascii_digit() || b == b'.';
    let mut seconds = 0f64;

    while !rest.is_empty() {
        let number_len = rest.bytes().take_while(|b| is_number(*b)).count();
        let (number, tail) = rest.split_at(number_len);
        if !number.bytes().any(|b| b.is_ascii_digit()) || number.matches('.').count() > 1 {
            return Err(invalid());
        }

        let unit_len = tail.bytes().take_while(|b| !is_number(*b)).count();
        let (unit, tail) = tail.split_at(unit_len);
        let scale = match unit {
            "ns" => 1e-9,
            "us" | "µs" | "μs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => return Err(invalid()),
        };

        let amount: f64 = number.parse().map_err(|_| invalid())?;
        seconds += amount * scale;
        rest = tail;
    }

    if negative {
        return Ok(Duration::ZERO);
    }

    Duration::try_from_secs_f64(seconds).map_err(|_| {
        Error::invalid_input(format!("wait_in_mins {:?} is too large", value))
    })
}

/// Records rendered for the operator, one zone-file line each
struct RecordList<'a> {
    zone: &'a str,
    records: &'a [Record],
}

impl fmt::Display for RecordList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", record.display_in(self.zone))?;
        }
        write!(f, "]")
    }
}

#[async_trait]
impl DnsProvider for ManualDnsProvider {
    async fn append_records(&self, zone: &str, records: Vec<Record>) -> Result<Vec<Record>> {
        let list = RecordList {
            zone,
            records: &records,
        };
        info!(
            target: LOG_TARGET,
            action = "append",
            zone,
            count = records.len(),
            records = %list,
            "please append following dns records manually"
        );
        self.wait_best_effort().await;
        Ok(records)
    }

    async fn delete_records(&self, zone: &str, records: Vec<Record>) -> Result<Vec<Record>> {
        let list = RecordList {
            zone,
            records: &records,
        };
        info!(
            target: LOG_TARGET,
            action = "delete",
            zone,
            count = records.len(),
            records = %list,
            "please delete following dns records manually"
        );
        self.wait_best_effort().await;
        Ok(records)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

impl UnmarshalDirective for ManualDnsProvider {
    /// Syntax:
    ///
    /// ```text
    /// manual_dns [<wait_in_mins>] {
    ///     wait_in_mins <wait_in_mins>
    /// }
    /// ```
    fn unmarshal_directive(&mut self, d: &mut Dispenser) -> Result<()> {
        while d.next() {
            if d.next_arg() {
                self.wait_in_mins = d.val().to_string();
            }
            if d.next_arg() {
                return Err(d.arg_err());
            }

            let nesting = d.nesting();
            while d.next_block(nesting) {
                match d.val() {
                    "wait_in_mins" => {
                        if d.next_arg() {
                            self.wait_in_mins = d.val().to_string();
                        }
                        if d.next_arg() {
                            return Err(d.arg_err());
                        }
                    }
                    other => {
                        return Err(d.err(format!("unrecognized subdirective '{}'", other)));
                    }
                }
            }
        }

        if self.wait_in_mins.is_empty() {
            self.wait_in_mins = DEFAULT_WAIT_IN_MINS.to_string();
        }
        Ok(())
    }
}

/// Factory for creating manual providers
pub struct ManualDnsFactory;

impl DnsProviderFactory for ManualDnsFactory {
    fn create(
        &self,
        config: &ProviderConfig,
        ctx: &ProvisionContext,
    ) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::ManualDns { wait_in_mins } => {
                let mut provider = ManualDnsProvider::new(wait_in_mins.clone());
                provider.provision(ctx);
                Ok(Box::new(provider))
            }
            _ => Err(Error::config("Invalid config for manual DNS provider")),
        }
    }

    fn create_from_directive(
        &self,
        d: &mut Dispenser,
        ctx: &ProvisionContext,
    ) -> Result<Box<dyn DnsProvider>> {
        let mut provider = ManualDnsProvider::default();
        provider.unmarshal_directive(d)?;
        provider.provision(ctx);
        Ok(Box::new(provider))
    }
}

/// Register the manual provider with a registry
///
/// # Example
///
/// ```rust
/// use manual_dns_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// manual_dns_provider::register(&registry);
/// assert!(registry.has_provider("manual_dns"));
/// ```
pub fn register(registry: &manual_dns_core::ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(ManualDnsFactory));
}
