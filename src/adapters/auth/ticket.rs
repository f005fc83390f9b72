//! WebSocket authentication tickets.
//!
//! The WebSocket upgrade cannot carry the usual Authorization header from
//! browser clients, so authentication happens out of band: the client first
//! POSTs to the monitor path and receives a short-lived single-use ticket in
//! a cookie, then presents it on the upgrade request.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use thiserror::Error;

use crate::ports::TicketStore;

/// Lifetime of an issued ticket.
pub const TICKET_TTL: Duration = Duration::from_secs(5);

/// Error returned when a ticket cannot be issued or validated.
///
/// Deliberately carries no detail: the HTTP surface must not reveal whether a
/// ticket was unknown, consumed, or expired.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TicketError {
    #[error("cannot perform operation")]
    NotAvailable,
}

/// Issues and validates single-use WebSocket tickets.
///
/// Guarantee provided: tickets are held in the configured [`TicketStore`];
/// with the bundled in-memory store that means the issuing replica only, and
/// a ticket presented to any other replica fails with
/// [`TicketError::NotAvailable`]. Unknown tickets are never accepted.
pub struct TicketProvider {
    /// When `None` the provider is disabled: requests yield an empty ticket
    /// and every check succeeds (authentication turned off).
    store: Option<Arc<dyn TicketStore>>,
    ttl: Duration,
}

impl TicketProvider {
    /// Creates a provider backed by the given store.
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store: Some(store), ttl: TICKET_TTL }
    }

    /// Overrides the ticket lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Creates a disabled provider for deployments without authentication.
    pub fn disabled() -> Self {
        Self { store: None, ttl: TICKET_TTL }
    }

    /// Requests a new ticket.
    ///
    /// Returns the empty string when the provider is disabled; the HTTP layer
    /// skips the cookie in that case.
    pub async fn request(&self) -> String {
        let Some(store) = &self.store else {
            return String::new();
        };

        let ticket = generate_ticket();
        store.set_ex(&ticket, self.ttl).await;

        ticket
    }

    /// Checks a ticket and consumes it.
    ///
    /// Succeeds at most once per ticket; any further check of the same value
    /// fails, as does a check after the time-to-live elapsed.
    pub async fn check(&self, ticket: &str) -> Result<(), TicketError> {
        let Some(store) = &self.store else {
            return Ok(());
        };

        store.get_del(ticket).await.map_err(|_| TicketError::NotAvailable)
    }

    /// Ticket lifetime, exposed so the HTTP layer can align the cookie
    /// Max-Age with it.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// 32 bytes of CSPRNG output, URL-safe base64 without padding.
fn generate_ticket() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
