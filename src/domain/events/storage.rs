//! Storage event family.
//!
//! Events published by the storage service: AIP lifecycle, storage locations,
//! and the workflows that move or delete stored packages. Same wire form as
//! the ingest family: a JSON object with exactly one variant-named key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ingest::{TaskStatus, WorkflowStatus};

// ════════════════════════════════════════════════════════════════════════════
// Envelope
// ════════════════════════════════════════════════════════════════════════════

/// Envelope carrying a single storage event variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StorageEvent {
    #[serde(rename = "storage_ping_event")]
    Ping(StoragePingEvent),

    #[serde(rename = "location_created_event")]
    LocationCreated(LocationCreatedEvent),

    #[serde(rename = "aip_created_event")]
    AipCreated(AipCreatedEvent),

    #[serde(rename = "aip_status_updated_event")]
    AipStatusUpdated(AipStatusUpdatedEvent),

    #[serde(rename = "aip_location_updated_event")]
    AipLocationUpdated(AipLocationUpdatedEvent),

    #[serde(rename = "aip_workflow_created_event")]
    AipWorkflowCreated(AipWorkflowCreatedEvent),

    #[serde(rename = "aip_workflow_updated_event")]
    AipWorkflowUpdated(AipWorkflowUpdatedEvent),

    #[serde(rename = "aip_task_created_event")]
    AipTaskCreated(AipTaskCreatedEvent),

    #[serde(rename = "aip_task_updated_event")]
    AipTaskUpdated(AipTaskUpdatedEvent),
}

// ════════════════════════════════════════════════════════════════════════════
// Variants
// ════════════════════════════════════════════════════════════════════════════

/// Liveness probe sent to monitor clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoragePingEvent {
    pub message: String,
}

/// A new storage location was registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCreatedEvent {
    pub uuid: Uuid,
    pub item: Location,
}

/// A new AIP was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AipCreatedEvent {
    pub uuid: Uuid,
    pub item: Aip,
}

/// Only the status field of an AIP changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AipStatusUpdatedEvent {
    pub uuid: Uuid,
    pub status: AipStatus,
}

/// An AIP moved to a different storage location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AipLocationUpdatedEvent {
    pub uuid: Uuid,
    pub location_uuid: Uuid,
}

/// A storage workflow started for an AIP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AipWorkflowCreatedEvent {
    pub uuid: Uuid,
    pub item: AipWorkflow,
}

/// A storage workflow changed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AipWorkflowUpdatedEvent {
    pub uuid: Uuid,
    pub item: AipWorkflow,
}

/// A task was added to a storage workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AipTaskCreatedEvent {
    pub uuid: Uuid,
    pub item: AipTask,
}

/// A task of a storage workflow changed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AipTaskUpdatedEvent {
    pub uuid: Uuid,
    pub item: AipTask,
}

// ════════════════════════════════════════════════════════════════════════════
// Snapshots
// ════════════════════════════════════════════════════════════════════════════

/// API snapshot of an Archival Information Package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aip {
    pub uuid: Uuid,
    pub name: String,
    pub status: AipStatus,

    /// Object key of the package inside its location's bucket.
    pub object_key: String,

    /// Location holding the package; unset while the AIP is in review.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_uuid: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

/// API snapshot of a storage location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub uuid: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source: LocationSource,
    pub purpose: LocationPurpose,
    pub created_at: DateTime<Utc>,
}

/// API snapshot of a storage workflow (move, delete, review).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AipWorkflow {
    pub uuid: Uuid,
    /// Identifier assigned by the durable workflow engine.
    pub temporal_id: String,
    pub kind: String,
    pub status: WorkflowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub aip_uuid: Uuid,
}

/// API snapshot of a single task within a storage workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AipTask {
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

/// Lifecycle status of an AIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AipStatus {
    Unspecified,
    InReview,
    Rejected,
    Stored,
    Moving,
    Processing,
    Deleted,
}

/// Kind of backend behind a storage location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Unspecified,
    Minio,
    Sftp,
    AmssSpace,
}

/// Role a storage location plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationPurpose {
    Unspecified,
    AipStore,
}

// ════════════════════════════════════════════════════════════════════════════
// Envelope wrapping
// ════════════════════════════════════════════════════════════════════════════

macro_rules! storage_envelope_from {
    ($($payload:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for StorageEvent {
                fn from(event: $payload) -> Self {
                    StorageEvent::$variant(event)
                }
            }
        )*
    };
}

storage_envelope_from!(
    StoragePingEvent => Ping,
    LocationCreatedEvent => LocationCreated,
    AipCreatedEvent => AipCreated,
    AipStatusUpdatedEvent => AipStatusUpdated,
    AipLocationUpdatedEvent => AipLocationUpdated,
    AipWorkflowCreatedEvent => AipWorkflowCreated,
    AipWorkflowUpdatedEvent => AipWorkflowUpdated,
    AipTaskCreatedEvent => AipTaskCreated,
    AipTaskUpdatedEvent => AipTaskUpdated,
);
