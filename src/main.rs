//! Enduro monitor API host.
//!
//! Wires the configured event buses, the audit log, and the WebSocket
//! monitor endpoints into one axum server.

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use enduro::adapters::audit::{ingest_audit_event, storage_audit_event, Auditlog};
use enduro::adapters::auth::{InMemTicketStore, TicketProvider};
use enduro::adapters::events::{InMemoryEventService, RedisEventService};
use enduro::adapters::http::monitor::{monitor_routes, MonitorState};
use enduro::adapters::{AuditEvent, AuditLevel};
use enduro::config::{AppConfig, BusBackend};
use enduro::domain::events::{IngestEvent, StorageEvent};
use enduro::ports::EventService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.server.log_level)
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Event buses, one per family.
    let buffer = config.monitor.buffer_size;
    let (ingest_bus, storage_bus): (
        Arc<dyn EventService<IngestEvent>>,
        Arc<dyn EventService<StorageEvent>>,
    ) = match config.bus.backend {
        BusBackend::Inmem => (
            Arc::new(InMemoryEventService::<IngestEvent>::with_buffer(buffer)),
            Arc::new(InMemoryEventService::<StorageEvent>::with_buffer(buffer)),
        ),
        BusBackend::Shared => (
            Arc::new(
                RedisEventService::<IngestEvent>::connect_with_buffer(
                    &config.bus.address,
                    config.bus.channel.ingest.as_str(),
                    buffer,
                )
                .await?,
            ),
            Arc::new(
                RedisEventService::<StorageEvent>::connect_with_buffer(
                    &config.bus.address,
                    config.bus.channel.storage.as_str(),
                    buffer,
                )
                .await?,
            ),
        ),
    };

    // Audit log subscribes to both families through one rotating writer.
    let mut audit = Auditlog::from_config(&config.audit)?;
    audit.listen(ingest_bus.as_ref(), ingest_audit_event).await?;
    audit.listen(storage_bus.as_ref(), storage_audit_event).await?;
    if config.audit.enabled() {
        tracing::info!(path = %config.audit.filepath, "audit logging enabled");
    }

    let tickets = Arc::new(
        TicketProvider::new(Arc::new(InMemTicketStore::new()))
            .with_ttl(config.monitor.ticket_ttl()),
    );

    let app = monitor_routes(
        MonitorState {
            bus: Arc::clone(&ingest_bus),
            tickets: Arc::clone(&tickets),
            ping_interval: config.monitor.ping_interval(),
        },
        MonitorState {
            bus: Arc::clone(&storage_bus),
            tickets,
            ping_interval: config.monitor.ping_interval(),
        },
    )
    .layer(TraceLayer::new_for_http());

    audit.log(&AuditEvent {
        level: AuditLevel::Info,
        msg: "Enduro starting".to_string(),
        kind: "system".to_string(),
        object_id: String::new(),
        user_id: String::new(),
    });

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "monitor API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    audit.log(&AuditEvent {
        level: AuditLevel::Info,
        msg: "Enduro stopping".to_string(),
        kind: "system".to_string(),
        object_id: String::new(),
        user_id: String::new(),
    });
    audit.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown handler");
    }
}
