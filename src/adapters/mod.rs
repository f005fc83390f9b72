//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - Event bus implementations (in-memory, Redis, no-op)
//! - `auth` - WebSocket ticket issuance and validation
//! - `http` - Monitor WebSocket endpoints
//! - `audit` - Append-only audit log subscriber

pub mod audit;
pub mod auth;
pub mod events;
pub mod http;

pub use audit::{AuditError, AuditEvent, AuditLevel, Auditlog};
pub use auth::{InMemTicketStore, TicketProvider};
pub use events::{InMemoryEventService, NopEventService, RedisEventService};
