//! Append-only audit log.
//!
//! The audit log is just another bus subscriber: it receives the same events
//! the WebSocket monitors do, maps each through a transform into an audit
//! record (or drops it), and appends the record as one JSON line to a
//! size-rotated file. Treating it as a subscriber keeps the publisher
//! single-responsibility and gives audit the same coverage as the monitors.

mod rotate;
mod transform;

pub use rotate::RotatingFileWriter;
pub use transform::{ingest_audit_event, storage_audit_event};

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::AuditConfig;
use crate::ports::{EventError, EventService};

/// Errors surfaced when starting or running the audit log.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit log: subscribe: {0}")]
    Subscribe(#[from] EventError),

    #[error("audit log: {0}")]
    Io(#[from] std::io::Error),
}

/// Severity of an audit record, aligned with the conventional numeric
/// levels (-4 debug, 0 info, 4 warn, 8 error) used for verbosity filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl AuditLevel {
    /// Numeric severity used against `audit.verbosity`.
    pub fn severity(self) -> i8 {
        match self {
            AuditLevel::Debug => -4,
            AuditLevel::Info => 0,
            AuditLevel::Warn => 4,
            AuditLevel::Error => 8,
        }
    }
}

/// One audit record, produced by a transform from a bus event.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub level: AuditLevel,
    pub msg: String,
    /// Category of the audited action, e.g. `SIP.ingest`.
    pub kind: String,
    /// Identifier of the affected entity, empty for system records.
    pub object_id: String,
    /// Acting user, empty when unattributed.
    pub user_id: String,
}

/// Maps a bus event to an audit record; `None` suppresses the record.
pub type EventTransform<T> = fn(&T) -> Option<AuditEvent>;

/// Wire form of one line in the audit file.
#[derive(Serialize)]
struct AuditRecord<'a> {
    time: DateTime<Utc>,
    level: AuditLevel,
    msg: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    object_id: &'a str,
    user_id: &'a str,
}

type SharedWriter = Arc<Mutex<RotatingFileWriter>>;

/// Long-running audit sink.
///
/// Created once per process via [`Auditlog::from_config`]; each event family
/// is attached with [`Auditlog::listen`], and all listeners share the single
/// rotating writer. When `audit.filepath` is empty the instance is a no-op:
/// every method succeeds and nothing is written.
pub struct Auditlog {
    writer: Option<SharedWriter>,
    verbosity: i8,
    listeners: Vec<(oneshot::Sender<()>, JoinHandle<()>)>,
}

impl Auditlog {
    /// Opens the audit file, failing fast when it cannot be created.
    pub fn from_config(cfg: &AuditConfig) -> Result<Self, AuditError> {
        let writer = if cfg.filepath.is_empty() {
            None
        } else {
            Some(Arc::new(Mutex::new(RotatingFileWriter::open(
                &cfg.filepath,
                cfg.max_size_bytes(),
                cfg.compress,
            )?)))
        };

        Ok(Self { writer, verbosity: cfg.verbosity, listeners: Vec::new() })
    }

    /// Subscribes to an event service and starts a listener task.
    ///
    /// Fails fast when the bus does not support subscriptions (the no-op
    /// bus); that is a configuration mistake that must not be discovered at
    /// the first event. The listener exits when the subscription channel
    /// closes or [`Auditlog::close`] is called; write errors are logged and
    /// do not stop it.
    pub async fn listen<T: Clone + Send + 'static>(
        &mut self,
        svc: &dyn EventService<T>,
        transform: EventTransform<T>,
    ) -> Result<(), AuditError> {
        let Some(writer) = &self.writer else {
            return Ok(());
        };

        let mut sub = svc.subscribe().await?;
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let writer = Arc::clone(writer);
        let verbosity = self.verbosity;

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,

                    event = sub.recv() => {
                        let Some(event) = event else { break };
                        let Some(record) = transform(&event) else { continue };
                        write_record(&writer, verbosity, &record);
                    }
                }
            }
            let _ = sub.close().await;
        });

        self.listeners.push((stop_tx, handle));

        Ok(())
    }

    /// Writes a record directly, outside any subscription (system records
    /// such as process start/stop).
    pub fn log(&self, record: &AuditEvent) {
        if let Some(writer) = &self.writer {
            write_record(writer, self.verbosity, record);
        }
    }

    /// Stops all listeners and flushes the file. Idempotent.
    pub async fn close(&mut self) {
        for (stop, handle) in self.listeners.drain(..) {
            let _ = stop.send(());
            let _ = handle.await;
        }
        if let Some(writer) = &self.writer {
            if let Err(err) = writer.lock().expect("audit writer lock poisoned").flush() {
                tracing::error!(error = %err, "failed to flush audit log");
            }
        }
    }
}

/// Serializes and appends one record. Write errors are logged and do not
/// stop the caller.
fn write_record(writer: &SharedWriter, verbosity: i8, record: &AuditEvent) {
    if record.level.severity() < verbosity {
        return;
    }

    let line = AuditRecord {
        time: Utc::now(),
        level: record.level,
        msg: &record.msg,
        kind: &record.kind,
        object_id: &record.object_id,
        user_id: &record.user_id,
    };
    let encoded = match serde_json::to_vec(&line) {
        Ok(encoded) => encoded,
        Err(err) => {
            tracing::error!(error = %err, "failed to encode audit record");
            return;
        }
    };

    let mut writer = writer.lock().expect("audit writer lock poisoned");
    if let Err(err) = writer.write_line(&encoded) {
        tracing::error!(error = %err, "failed to write audit record");
    }
}
