//! Transforms from bus events to audit records.
//!
//! Only actions with archival significance produce a record; pings, snapshot
//! refreshes, and intermediate workflow chatter are dropped.

use crate::domain::events::{AipStatus, IngestEvent, SipStatus, StorageEvent};

use super::{AuditEvent, AuditLevel};

/// Audit transform for the ingest family.
pub fn ingest_audit_event(event: &IngestEvent) -> Option<AuditEvent> {
    match event {
        IngestEvent::SipCreated(e) => Some(AuditEvent {
            level: AuditLevel::Info,
            msg: "SIP ingest started".to_string(),
            kind: "SIP.ingest".to_string(),
            object_id: e.uuid.to_string(),
            user_id: String::new(),
        }),

        IngestEvent::BatchCreated(e) => Some(AuditEvent {
            level: AuditLevel::Info,
            msg: "Batch ingest started".to_string(),
            kind: "Batch.ingest".to_string(),
            object_id: e.uuid.to_string(),
            user_id: String::new(),
        }),

        IngestEvent::SipStatusUpdated(e) => match e.status {
            SipStatus::Ingested => Some(AuditEvent {
                level: AuditLevel::Info,
                msg: "SIP ingest completed".to_string(),
                kind: "SIP.ingest".to_string(),
                object_id: e.uuid.to_string(),
                user_id: String::new(),
            }),
            SipStatus::Error => Some(AuditEvent {
                level: AuditLevel::Error,
                msg: "SIP ingest failed".to_string(),
                kind: "SIP.ingest".to_string(),
                object_id: e.uuid.to_string(),
                user_id: String::new(),
            }),
            _ => None,
        },

        _ => None,
    }
}

/// Audit transform for the storage family.
pub fn storage_audit_event(event: &StorageEvent) -> Option<AuditEvent> {
    match event {
        StorageEvent::AipCreated(e) => Some(AuditEvent {
            level: AuditLevel::Info,
            msg: "AIP stored".to_string(),
            kind: "AIP.store".to_string(),
            object_id: e.uuid.to_string(),
            user_id: String::new(),
        }),

        StorageEvent::AipLocationUpdated(e) => Some(AuditEvent {
            level: AuditLevel::Info,
            msg: "AIP moved".to_string(),
            kind: "AIP.move".to_string(),
            object_id: e.uuid.to_string(),
            user_id: String::new(),
        }),

        StorageEvent::AipStatusUpdated(e) => match e.status {
            AipStatus::Deleted => Some(AuditEvent {
                level: AuditLevel::Warn,
                msg: "AIP deleted".to_string(),
                kind: "AIP.delete".to_string(),
                object_id: e.uuid.to_string(),
                user_id: String::new(),
            }),
            _ => None,
        },

        _ => None,
    }
}
