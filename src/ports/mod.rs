//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventService` - Publish/subscribe fabric for one event family
//! - `Subscription` - A single consumer's stream of envelopes
//!
//! ## Auth Ports
//!
//! - `TicketStore` - Persistence for expirable one-time tickets

mod event_bus;
mod ticket_store;

pub use event_bus::{BoxedSubscription, EventError, EventService, Subscription};
pub use ticket_store::{TicketStore, TicketStoreError};
