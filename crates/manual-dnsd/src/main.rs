// # manual-dnsd - Manual DNS host
//
// This binary is a THIN integration layer: it reads configuration, registers
// providers, and drives a single record operation. All DNS provider logic
// lives in the provider crates.
//
// The daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering providers and provisioning the configured one
// 4. Running one append or delete, cancelling its wait on SIGTERM/SIGINT
// 5. Printing the records the provider returned as JSON on stdout
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `MANUAL_DNS_ACTION`: `append` or `delete`
// - `MANUAL_DNS_ZONE`: Zone the records belong to
// - `MANUAL_DNS_RECORDS`: Path to a JSON array of records
// - `MANUAL_DNS_CONFIG`: Path to a provider directive file (optional)
// - `MANUAL_DNS_WAIT_IN_MINS`: Wait when no directive file is given (optional)
// - `MANUAL_DNS_LOG_LEVEL`: trace, debug, info, warn or error (default info)
//
// ## Example
//
// ```bash
// cat > records.json <<'EOF'
// [{"name": "_acme-challenge", "type": "TXT", "value": "token", "ttl": 120}]
// EOF
//
// export MANUAL_DNS_ACTION=append
// export MANUAL_DNS_ZONE=example.com
// export MANUAL_DNS_RECORDS=records.json
// export MANUAL_DNS_WAIT_IN_MINS=5
//
// manual-dnsd
// ```

use anyhow::{Context, Result};
use manual_dns_core::{
    CancellationToken, ProviderConfig, ProviderRegistry, ProvisionContext, Record,
};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum HostExitCode {
    /// Operation completed (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<HostExitCode> for ExitCode {
    fn from(code: HostExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Record operation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Append,
    Delete,
}

impl Action {
    fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "append" => Ok(Action::Append),
            "delete" => Ok(Action::Delete),
            other => anyhow::bail!(
                "MANUAL_DNS_ACTION '{}' is not valid. Valid actions: append, delete",
                other
            ),
        }
    }
}

/// Where the provider configuration comes from
#[derive(Debug, Clone, PartialEq)]
enum ProviderSource {
    /// Directive file
    Directive(PathBuf),
    /// Built from environment variables
    Json(ProviderConfig),
}

/// Application configuration
#[derive(Debug)]
struct Config {
    action: Action,
    zone: String,
    records_path: PathBuf,
    provider: ProviderSource,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through a variable lookup function
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} is required", key))
        };

        let provider = match lookup("MANUAL_DNS_CONFIG").filter(|v| !v.is_empty()) {
            Some(path) => ProviderSource::Directive(PathBuf::from(path)),
            None => ProviderSource::Json(ProviderConfig::manual(
                lookup("MANUAL_DNS_WAIT_IN_MINS").unwrap_or_default(),
            )),
        };

        Ok(Self {
            action: Action::parse(&required("MANUAL_DNS_ACTION")?)?,
            zone: required("MANUAL_DNS_ZONE")?.trim().to_string(),
            records_path: PathBuf::from(required("MANUAL_DNS_RECORDS")?),
            provider,
            log_level: lookup("MANUAL_DNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if !self.records_path.is_file() {
            anyhow::bail!(
                "MANUAL_DNS_RECORDS does not point to a file: {}",
                self.records_path.display()
            );
        }

        if let ProviderSource::Directive(path) = &self.provider
            && !path.is_file()
        {
            anyhow::bail!("MANUAL_DNS_CONFIG does not point to a file: {}", path.display());
        }

        self.level()?;
        Ok(())
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "MANUAL_DNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

/// Read the JSON array of records to submit
///
/// Failures are configuration errors: the records file is startup input.
fn load_records(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        manual_dns_core::Error::config(format!(
            "Failed to read records from {}: {}",
            path.display(),
            e
        ))
    })?;
    let records: Vec<Record> = serde_json::from_str(&text)
        .map_err(manual_dns_core::Error::from)
        .with_context(|| format!("Invalid records JSON in {}", path.display()))?;
    Ok(records)
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return HostExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return HostExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = config.level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HostExitCode::ConfigError.into();
    }

    info!("Starting manual-dnsd");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HostExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(config).await {
            Ok(()) => HostExitCode::CleanShutdown,
            Err(e) if is_config_error(&e) => {
                error!("Setup error: {:#}", e);
                HostExitCode::ConfigError
            }
            Err(e) => {
                error!("Runtime error: {:#}", e);
                HostExitCode::RuntimeError
            }
        }
    })
    .into()
}

fn is_config_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<manual_dns_core::Error>()
            .is_some_and(manual_dns_core::Error::is_config)
    })
}

/// Build the registry with every provider compiled in
fn build_registry() -> ProviderRegistry {
    let registry = ProviderRegistry::new();

    #[cfg(feature = "manual")]
    {
        info!("Registering manual DNS provider");
        manual_dns_provider::register(&registry);
    }

    registry
}

/// Provision the configured provider and run the requested operation
async fn run(config: Config) -> Result<()> {
    let registry = build_registry();

    let shutdown = CancellationToken::new();
    let ctx = ProvisionContext::new(shutdown.clone());

    let provider = match &config.provider {
        ProviderSource::Directive(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            registry.create_provider_from_text(&text, &ctx)?
        }
        ProviderSource::Json(provider_config) => registry.create_provider(provider_config, &ctx)?,
    };
    info!("Provider: {}", provider.provider_name());

    let records = load_records(&config.records_path)?;
    info!("Loaded {} record(s) for zone {}", records.len(), config.zone);

    let signals = tokio::spawn(cancel_on_shutdown_signal(shutdown.clone()));

    let result = match config.action {
        Action::Append => provider.append_records(&config.zone, records).await,
        Action::Delete => provider.delete_records(&config.zone, records).await,
    };

    signals.abort();
    let records = result?;

    println!("{}", serde_json::to_string_pretty(&records)?);
    info!("Done: {} record(s)", records.len());
    Ok(())
}

/// Cancel `shutdown` when SIGTERM or SIGINT arrives
#[cfg(unix)]
async fn cancel_on_shutdown_signal(shutdown: CancellationToken) {
    let (mut sigterm, mut sigint) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(term), Ok(int)) => (term, int),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to set up signal handlers: {}", e);
            return;
        }
    };

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    info!("Received {}, cancelling wait", name);
    shutdown.cancel();
}

/// Cancel `shutdown` on CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn cancel_on_shutdown_signal(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received CTRL-C, cancelling wait");
            shutdown.cancel();
        }
        Err(e) => error!("Failed to wait for CTRL-C: {}", e),
    }
}
