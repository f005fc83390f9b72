//! Type-safe publishing helpers.
//!
//! Domain code hands a concrete variant payload to these helpers; the
//! `Into` bound restricts the argument to the family's known variants at
//! compile time, so wrapping a foreign event is unrepresentable rather than a
//! runtime error.

use crate::ports::EventService;

use super::{IngestEvent, StorageEvent};

/// Wraps a concrete ingest variant into the family envelope and publishes it.
pub async fn publish_ingest_event(
    svc: &dyn EventService<IngestEvent>,
    event: impl Into<IngestEvent>,
) {
    svc.publish_event(event.into()).await;
}

/// Wraps a concrete storage variant into the family envelope and publishes it.
pub async fn publish_storage_event(
    svc: &dyn EventService<StorageEvent>,
    event: impl Into<StorageEvent>,
) {
    svc.publish_event(event.into()).await;
}
