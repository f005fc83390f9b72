//! Domain event families and their wire envelopes.
//!
//! Two disjoint families exist: *ingest* and *storage*. Each family is a
//! closed sum type whose externally-tagged serde form is the JSON wire format
//! consumed by monitor WebSocket clients and relayed through the shared bus.

mod ingest;
mod publish;
mod storage;

pub use ingest::{
    Batch, BatchCreatedEvent, BatchStatus, BatchUpdatedEvent, IngestEvent, IngestPingEvent, Sip,
    SipCreatedEvent, SipStatus, SipStatusUpdatedEvent, SipTask, SipTaskCreatedEvent,
    SipTaskUpdatedEvent, SipUpdatedEvent, SipWorkflow, SipWorkflowCreatedEvent,
    SipWorkflowUpdatedEvent, TaskStatus, WorkflowStatus,
};
pub use publish::{publish_ingest_event, publish_storage_event};
pub use storage::{
    Aip, AipCreatedEvent, AipLocationUpdatedEvent, AipStatus, AipStatusUpdatedEvent, AipTask,
    AipTaskCreatedEvent, AipTaskUpdatedEvent, AipWorkflow, AipWorkflowCreatedEvent,
    AipWorkflowUpdatedEvent, Location, LocationCreatedEvent, LocationPurpose, LocationSource,
    StorageEvent, StoragePingEvent,
};

/// Capabilities every family envelope offers to the transport layers.
///
/// The monitor endpoint and the shared bus are generic over the family; this
/// trait is the seam that lets them build liveness pings and name the family
/// in diagnostics without knowing the concrete variant set.
pub trait FamilyEvent:
    Clone + Send + Sync + serde::Serialize + serde::de::DeserializeOwned + 'static
{
    /// Family name used in logs and span fields.
    const FAMILY: &'static str;

    /// Builds the liveness ping variant of this family.
    fn ping(message: &str) -> Self;
}

impl FamilyEvent for IngestEvent {
    const FAMILY: &'static str = "ingest";

    fn ping(message: &str) -> Self {
        IngestEvent::Ping(IngestPingEvent { message: message.to_string() })
    }
}

impl FamilyEvent for StorageEvent {
    const FAMILY: &'static str = "storage";

    fn ping(message: &str) -> Self {
        StorageEvent::Ping(StoragePingEvent { message: message.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_ping_builds_the_ping_variant() {
        assert_eq!(
            IngestEvent::ping("Hello"),
            IngestEvent::Ping(IngestPingEvent { message: "Hello".into() })
        );
        assert_eq!(
            StorageEvent::ping("Hello"),
            StorageEvent::Ping(StoragePingEvent { message: "Hello".into() })
        );
    }

    #[test]
    fn family_names_differ() {
        assert_eq!(IngestEvent::FAMILY, "ingest");
        assert_eq!(StorageEvent::FAMILY, "storage");
    }
}
