//! Integration tests for the audit log sink.
//!
//! Drives the sink through the public API: events published on an in-memory
//! bus surface as JSON lines in the audit file, and sustained writing rotates
//! the file under the configured cap.

use std::time::Duration;

use chrono::Utc;
use tempfile::tempdir;
use uuid::Uuid;

use enduro::adapters::audit::{ingest_audit_event, Auditlog};
use enduro::adapters::events::InMemoryEventService;
use enduro::adapters::{AuditEvent, AuditLevel};
use enduro::config::AuditConfig;
use enduro::domain::events::{IngestEvent, Sip, SipCreatedEvent, SipStatus};
use enduro::ports::EventService;

fn sip_created(uuid: Uuid) -> IngestEvent {
    IngestEvent::SipCreated(SipCreatedEvent {
        uuid,
        item: Sip {
            uuid,
            name: "transfer.zip".to_string(),
            status: SipStatus::Queued,
            aip_uuid: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            failed_as: None,
            failed_key: None,
        },
    })
}

#[tokio::test]
async fn bus_events_become_audit_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let bus = InMemoryEventService::<IngestEvent>::new();

    let cfg = AuditConfig {
        filepath: path.to_string_lossy().into_owned(),
        max_size_mb: 1,
        compress: false,
        verbosity: 0,
    };
    let mut audit = Auditlog::from_config(&cfg).unwrap();
    audit.listen(&bus, ingest_audit_event).await.unwrap();

    let uuid = Uuid::new_v4();
    bus.publish_event(sip_created(uuid)).await;

    // The listener is asynchronous; poll until the line lands.
    let mut content = String::new();
    for _ in 0..100 {
        content = std::fs::read_to_string(&path).unwrap_or_default();
        if content.contains('\n') {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    audit.close().await;

    let line: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(line["msg"], "SIP ingest started");
    assert_eq!(line["type"], "SIP.ingest");
    assert_eq!(line["object_id"], uuid.to_string());
}

#[tokio::test]
async fn sustained_writing_rotates_and_compresses() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("audit.log");

    let cfg = AuditConfig {
        filepath: path.to_string_lossy().into_owned(),
        max_size_mb: 1,
        compress: true,
        verbosity: 0,
    };
    let mut audit = Auditlog::from_config(&cfg).unwrap();

    // Roughly 2 MiB of records: 8192 records x ~256 bytes.
    let filler = "x".repeat(160);
    for n in 0..8192 {
        audit.log(&AuditEvent {
            level: AuditLevel::Info,
            msg: format!("record {n} {filler}"),
            kind: "system".to_string(),
            object_id: Uuid::new_v4().to_string(),
            user_id: "operator@example.com".to_string(),
        });
    }
    audit.close().await;

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    // One active base-named file under the cap, plus gzipped siblings.
    assert!(names.contains(&"audit.log".to_string()), "files: {names:?}");
    assert!(
        names.iter().any(|n| n.starts_with("audit-") && n.ends_with(".log.gz")),
        "no rotated gz file in {names:?}",
    );
    assert_eq!(
        names.iter().filter(|n| n.ends_with(".log")).count(),
        1,
        "only the active file may stay uncompressed: {names:?}",
    );
    assert!(std::fs::metadata(&path).unwrap().len() < 1024 * 1024);
}
