//! Ingest event family.
//!
//! Events published while a SIP moves through the ingest pipeline:
//! SIP lifecycle, ingest workflows and their tasks, and batch uploads.
//! The envelope serializes as a JSON object with exactly one key named
//! after the variant (`sip_created_event`, `sip_status_updated_event`, ...),
//! which is the wire form shared with the web dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ════════════════════════════════════════════════════════════════════════════
// Envelope
// ════════════════════════════════════════════════════════════════════════════

/// Envelope carrying a single ingest event variant.
///
/// The set of variants is closed: adding one requires a code change on both
/// publisher and consumer. Decoding rejects unknown variant keys and payloads
/// with missing required fields; unknown payload fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IngestEvent {
    #[serde(rename = "ingest_ping_event")]
    Ping(IngestPingEvent),

    #[serde(rename = "sip_created_event")]
    SipCreated(SipCreatedEvent),

    #[serde(rename = "sip_updated_event")]
    SipUpdated(SipUpdatedEvent),

    #[serde(rename = "sip_status_updated_event")]
    SipStatusUpdated(SipStatusUpdatedEvent),

    #[serde(rename = "sip_workflow_created_event")]
    SipWorkflowCreated(SipWorkflowCreatedEvent),

    #[serde(rename = "sip_workflow_updated_event")]
    SipWorkflowUpdated(SipWorkflowUpdatedEvent),

    #[serde(rename = "sip_task_created_event")]
    SipTaskCreated(SipTaskCreatedEvent),

    #[serde(rename = "sip_task_updated_event")]
    SipTaskUpdated(SipTaskUpdatedEvent),

    #[serde(rename = "batch_created_event")]
    BatchCreated(BatchCreatedEvent),

    #[serde(rename = "batch_updated_event")]
    BatchUpdated(BatchUpdatedEvent),
}

// ════════════════════════════════════════════════════════════════════════════
// Variants
// ════════════════════════════════════════════════════════════════════════════

/// Liveness probe sent to monitor clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestPingEvent {
    pub message: String,
}

/// A new SIP was registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipCreatedEvent {
    /// Identifier of the SIP.
    pub uuid: Uuid,
    /// Snapshot of the SIP at creation time.
    pub item: Sip,
}

/// A SIP changed; carries the full updated snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipUpdatedEvent {
    pub uuid: Uuid,
    pub item: Sip,
}

/// Only the status field of a SIP changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipStatusUpdatedEvent {
    pub uuid: Uuid,
    pub status: SipStatus,
}

/// An ingest workflow started for a SIP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipWorkflowCreatedEvent {
    pub uuid: Uuid,
    pub item: SipWorkflow,
}

/// An ingest workflow changed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipWorkflowUpdatedEvent {
    pub uuid: Uuid,
    pub item: SipWorkflow,
}

/// A task was added to an ingest workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipTaskCreatedEvent {
    pub uuid: Uuid,
    pub item: SipTask,
}

/// A task of an ingest workflow changed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipTaskUpdatedEvent {
    pub uuid: Uuid,
    pub item: SipTask,
}

/// A new batch upload was registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCreatedEvent {
    pub uuid: Uuid,
    pub item: Batch,
}

/// A batch upload changed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchUpdatedEvent {
    pub uuid: Uuid,
    pub item: Batch,
}

// ════════════════════════════════════════════════════════════════════════════
// Snapshots
// ════════════════════════════════════════════════════════════════════════════

/// API snapshot of a Submission Information Package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sip {
    pub uuid: Uuid,
    pub name: String,
    pub status: SipStatus,

    /// Identifier of the AIP produced from this SIP, once preservation ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aip_uuid: Option<Uuid>,

    pub created_at: DateTime<Utc>,

    /// Populated as soon as processing starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// Populated as soon as ingest completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Set when the workflow failed, names what the package failed as.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_as: Option<String>,

    /// Object key of the failed package in the internal bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_key: Option<String>,
}

/// API snapshot of a batch of SIP uploads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub uuid: Uuid,
    pub name: String,
    pub status: BatchStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// API snapshot of an ingest workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipWorkflow {
    pub uuid: Uuid,
    /// Identifier assigned by the durable workflow engine.
    pub temporal_id: String,
    pub kind: String,
    pub status: WorkflowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub sip_uuid: Uuid,
}

/// API snapshot of a single task within an ingest workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipTask {
    pub uuid: Uuid,
    pub name: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub workflow_uuid: Uuid,
}

// ════════════════════════════════════════════════════════════════════════════
// Enumerations
// ════════════════════════════════════════════════════════════════════════════

/// Processing status of a SIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SipStatus {
    Queued,
    Processing,
    Pending,
    Ingested,
    Error,
}

/// Processing status of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Open,
    Processing,
    Completed,
    Error,
}

/// State of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Unspecified,
    InProgress,
    Done,
    Error,
    Queued,
    Pending,
    Canceled,
}

/// State of a single workflow task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Unspecified,
    InProgress,
    Done,
    Error,
    Queued,
    Pending,
    Canceled,
}

// ════════════════════════════════════════════════════════════════════════════
// Envelope wrapping
// ════════════════════════════════════════════════════════════════════════════

macro_rules! ingest_envelope_from {
    ($($payload:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for IngestEvent {
                fn from(event: $payload) -> Self {
                    IngestEvent::$variant(event)
                }
            }
        )*
    };
}

ingest_envelope_from!(
    IngestPingEvent => Ping,
    SipCreatedEvent => SipCreated,
    SipUpdatedEvent => SipUpdated,
    SipStatusUpdatedEvent => SipStatusUpdated,
    SipWorkflowCreatedEvent => SipWorkflowCreated,
    SipWorkflowUpdatedEvent => SipWorkflowUpdated,
    SipTaskCreatedEvent => SipTaskCreated,
    SipTaskUpdatedEvent => SipTaskUpdated,
    BatchCreatedEvent => BatchCreated,
    BatchUpdatedEvent => BatchUpdated,
);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sip() -> Sip {
        Sip {
            uuid: Uuid::parse_str("d1845a54-a4bb-4d83-b244-87d4fa3fbf5f").unwrap(),
            name: "transfer.zip".to_string(),
            status: SipStatus::Processing,
            aip_uuid: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 3, 10, 0, 0).unwrap(),
            started_at: Some(Utc.with_ymd_and_hms(2024, 5, 3, 10, 0, 5).unwrap()),
            completed_at: None,
            failed_as: None,
            failed_key: None,
        }
    }

    #[test]
    fn ping_wire_form_matches_monitor_greeting() {
        let event = IngestEvent::Ping(IngestPingEvent {
            message: "Hello".to_string(),
        });

        let encoded = serde_json::to_string(&event).unwrap();

        assert_eq!(encoded, r#"{"ingest_ping_event":{"message":"Hello"}}"#);
    }

    #[test]
    fn envelope_round_trips_every_variant() {
        let workflow = SipWorkflow {
            uuid: Uuid::new_v4(),
            temporal_id: "ingest-workflow-1".to_string(),
            kind: "create-aip".to_string(),
            status: WorkflowStatus::InProgress,
            started_at: Some(Utc.with_ymd_and_hms(2024, 5, 3, 10, 1, 0).unwrap()),
            completed_at: None,
            sip_uuid: sip().uuid,
        };
        let task = SipTask {
            uuid: Uuid::new_v4(),
            name: "Validate structure".to_string(),
            status: TaskStatus::Done,
            started_at: None,
            completed_at: None,
            note: Some("ok".to_string()),
            workflow_uuid: workflow.uuid,
        };
        let batch = Batch {
            uuid: Uuid::new_v4(),
            name: "2024-05 accession".to_string(),
            status: BatchStatus::Open,
            created_at: Utc.with_ymd_and_hms(2024, 5, 3, 9, 0, 0).unwrap(),
            completed_at: None,
        };

        let variants = vec![
            IngestEvent::Ping(IngestPingEvent { message: "Ping".into() }),
            IngestEvent::SipCreated(SipCreatedEvent { uuid: sip().uuid, item: sip() }),
            IngestEvent::SipUpdated(SipUpdatedEvent { uuid: sip().uuid, item: sip() }),
            IngestEvent::SipStatusUpdated(SipStatusUpdatedEvent {
                uuid: sip().uuid,
                status: SipStatus::Ingested,
            }),
            IngestEvent::SipWorkflowCreated(SipWorkflowCreatedEvent {
                uuid: workflow.uuid,
                item: workflow.clone(),
            }),
            IngestEvent::SipWorkflowUpdated(SipWorkflowUpdatedEvent {
                uuid: workflow.uuid,
                item: workflow.clone(),
            }),
            IngestEvent::SipTaskCreated(SipTaskCreatedEvent {
                uuid: task.uuid,
                item: task.clone(),
            }),
            IngestEvent::SipTaskUpdated(SipTaskUpdatedEvent {
                uuid: task.uuid,
                item: task.clone(),
            }),
            IngestEvent::BatchCreated(BatchCreatedEvent {
                uuid: batch.uuid,
                item: batch.clone(),
            }),
            IngestEvent::BatchUpdated(BatchUpdatedEvent {
                uuid: batch.uuid,
                item: batch.clone(),
            }),
        ];

        for event in variants {
            let encoded = serde_json::to_string(&event).unwrap();
            let decoded: IngestEvent = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, event, "round trip failed for {encoded}");
        }
    }

    #[test]
    fn unknown_variant_key_is_rejected() {
        let result =
            serde_json::from_str::<IngestEvent>(r#"{"sip_removed_event":{"uuid":"x"}}"#);

        assert!(result.is_err());
    }

    #[test]
    fn unknown_payload_fields_are_ignored() {
        let decoded: IngestEvent = serde_json::from_str(
            r#"{"ingest_ping_event":{"message":"Hello","extra":42}}"#,
        )
        .unwrap();

        assert_eq!(
            decoded,
            IngestEvent::Ping(IngestPingEvent { message: "Hello".into() })
        );
    }

    #[test]
    fn missing_required_field_fails_decoding() {
        let result = serde_json::from_str::<IngestEvent>(
            r#"{"sip_status_updated_event":{"status":"queued"}}"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn malformed_container_fails_decoding() {
        assert!(serde_json::from_str::<IngestEvent>("not json").is_err());
        assert!(serde_json::from_str::<IngestEvent>("{}").is_err());
    }

    #[test]
    fn invalid_uuid_fails_decoding() {
        let result = serde_json::from_str::<IngestEvent>(
            r#"{"sip_status_updated_event":{"uuid":"not-a-uuid","status":"queued"}}"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn optional_fields_are_omitted_from_wire_form() {
        let event = IngestEvent::SipCreated(SipCreatedEvent { uuid: sip().uuid, item: sip() });

        let encoded = serde_json::to_string(&event).unwrap();

        assert!(!encoded.contains("aip_uuid"));
        assert!(!encoded.contains("failed_as"));
        assert!(encoded.contains("started_at"));
    }
}
