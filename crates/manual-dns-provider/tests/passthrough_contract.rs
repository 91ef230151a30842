//! Contract Test: Record Passthrough
//!
//! Append and delete hand back exactly the records they were given, whatever
//! happens while waiting.

mod common;

use common::*;
use manual_dns_core::{CancellationToken, Record};

#[tokio::test(start_paused = true)]
async fn append_returns_input_records() {
    let provider = provider_with_wait("0", CancellationToken::new());
    let records = challenge_records();

    let out = provider.append_records(ZONE, records.clone()).await;

    assert_eq!(out.expect("append never fails"), records);
}

#[tokio::test(start_paused = true)]
async fn delete_returns_input_records() {
    let provider = provider_with_wait("0", CancellationToken::new());
    let records = challenge_records();

    let out = provider.delete_records(ZONE, records.clone()).await;

    assert_eq!(out.expect("delete never fails"), records);
}

#[tokio::test(start_paused = true)]
async fn empty_record_list_passes_through() {
    let provider = provider_with_wait("0", CancellationToken::new());

    assert!(provider.append_records(ZONE, Vec::new()).await.unwrap().is_empty());
    assert!(provider.delete_records(ZONE, Vec::new()).await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn all_record_fields_are_preserved() {
    let provider = provider_with_wait("0", CancellationToken::new());
    let mut srv = Record::new("_sip._tcp", "SRV", "5060 sip.example.com.")
        .with_ttl(3600)
        .with_priority(10);
    srv.weight = Some(20);
    srv.id = Some("rec-42".to_string());
    let records = vec![srv, Record::new("@", "A", "192.0.2.1")];

    let out = provider.append_records("example.com", records.clone()).await.unwrap();

    assert_eq!(out, records);
}

#[tokio::test(start_paused = true)]
async fn unparseable_wait_still_returns_records() {
    let provider = provider_with_wait("abc", CancellationToken::new());
    let records = challenge_records();
    let start = tokio::time::Instant::now();

    let appended = provider.append_records(ZONE, records.clone()).await.unwrap();
    let deleted = provider.delete_records(ZONE, records.clone()).await.unwrap();

    assert_eq!(appended, records);
    assert_eq!(deleted, records);
    assert_eq!(start.elapsed(), std::time::Duration::ZERO, "no wait on parse failure");
}
