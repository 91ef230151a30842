//! Contract Test: Operator Log Output
//!
//! The log is the only channel to the operator, so the requested action,
//! zone, records and wait progress must all reach it.

mod common;

use common::*;
use manual_dns_core::CancellationToken;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// Shared buffer the fmt subscriber writes into
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Install a subscriber for the current thread writing into a new buffer
    fn install() -> (Self, DefaultGuard) {
        let logs = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// The first line containing `needle`
    fn line_with(&self, needle: &str) -> String {
        let contents = self.contents();
        contents
            .lines()
            .find(|line| line.contains(needle))
            .unwrap_or_else(|| panic!("no log line contains {:?}; log was:\n{}", needle, contents))
            .to_string()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test(start_paused = true)]
async fn append_logs_action_zone_and_records() {
    let (logs, _guard) = CapturedLogs::install();
    let provider = provider_with_wait("0", CancellationToken::new());

    provider.append_records(ZONE, challenge_records()).await.unwrap();

    let line = logs.line_with("please append following dns records manually");
    assert!(line.contains("INFO"), "{}", line);
    assert!(line.contains("action=") && line.contains("append"), "{}", line);
    assert!(line.contains("zone=") && line.contains(ZONE), "{}", line);
    assert!(line.contains("count=2"), "{}", line);
    assert!(
        line.contains("_acme-challenge.example.com. 120 IN TXT \"LPsIwTo7o8BoG0-vjCyGQGBWSVIPxI-i_X336eUOQZo\""),
        "{}",
        line
    );
    assert!(line.contains("_acme-challenge.www.example.com. 120 IN TXT \"second token\""), "{}", line);
}

#[tokio::test(start_paused = true)]
async fn delete_logs_action_zone_and_records() {
    let (logs, _guard) = CapturedLogs::install();
    let provider = provider_with_wait("0", CancellationToken::new());

    provider.delete_records(ZONE, challenge_records()).await.unwrap();

    let line = logs.line_with("please delete following dns records manually");
    assert!(line.contains("action=") && line.contains("delete"), "{}", line);
    assert!(line.contains("zone=") && line.contains(ZONE), "{}", line);
    assert!(line.contains("_acme-challenge.example.com. 120 IN TXT"), "{}", line);
    assert!(!logs.contents().contains("please append"));
}

#[tokio::test(start_paused = true)]
async fn wait_progress_is_logged() {
    let (logs, _guard) = CapturedLogs::install();
    let provider = provider_with_wait("2", CancellationToken::new());

    provider.append_records(ZONE, challenge_records()).await.unwrap();

    let waiting = logs.line_with("waiting for records");
    assert!(waiting.contains("time=120s"), "{}", waiting);
    assert!(waiting.contains("until="), "{}", waiting);
    assert!(logs.line_with("wait finished").contains("INFO"));
    assert!(!logs.contents().contains("wait cancelled"));
}

#[tokio::test(start_paused = true)]
async fn cancelled_wait_is_logged() {
    let (logs, _guard) = CapturedLogs::install();
    let shutdown = CancellationToken::new();
    shutdown.cancel();
    let provider = provider_with_wait("60", shutdown);

    provider.append_records(ZONE, challenge_records()).await.unwrap();

    assert!(logs.line_with("wait cancelled").contains("WARN"));
    assert!(!logs.contents().contains("wait finished"));
}

#[tokio::test(start_paused = true)]
async fn unparseable_wait_logs_error_and_returns_records() {
    let (logs, _guard) = CapturedLogs::install();
    let provider = provider_with_wait("abc", CancellationToken::new());
    let records = challenge_records();

    let out = provider.append_records(ZONE, records.clone()).await.unwrap();

    assert_eq!(out, records);
    let line = logs.line_with("waiting for records");
    assert!(line.contains("ERROR"), "{}", line);
    assert!(line.contains("\"abc\""), "{}", line);
    assert!(!logs.contents().contains("wait finished"));
}
