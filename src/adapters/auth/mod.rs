//! Authentication adapters.
//!
//! Ticket-based out-of-band authentication for the WebSocket upgrade:
//!
//! - `ticket` - `TicketProvider` issuing and consuming single-use tickets
//! - `store` - process-local `TicketStore` implementation

mod store;
mod ticket;

pub use store::InMemTicketStore;
pub use ticket::{TicketError, TicketProvider, TICKET_TTL};
