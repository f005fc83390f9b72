//! In-memory ticket store.
//!
//! Tickets live in the memory of the issuing replica only: a ticket issued by
//! replica X cannot be redeemed on replica Y. Deployments with several API
//! replicas behind a load balancer must pin the WebSocket upgrade to the
//! issuing replica, or provide a broker-backed `TicketStore` instead.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::ports::{TicketStore, TicketStoreError};

/// Process-local [`TicketStore`].
///
/// Expired keys are removed lazily on lookup; the expected population is a
/// handful of tickets with a 5-second lifetime, so no sweeper is needed.
pub struct InMemTicketStore {
    keys: Mutex<HashMap<String, Instant>>,
}

impl InMemTicketStore {
    pub fn new() -> Self {
        Self { keys: Mutex::new(HashMap::new()) }
    }

    /// Number of stored keys, counting expired ones not yet reaped.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.keys.lock().expect("ticket store lock poisoned").len()
    }
}

impl Default for InMemTicketStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketStore for InMemTicketStore {
    async fn set_ex(&self, key: &str, ttl: Duration) {
        self.keys
            .lock()
            .expect("ticket store lock poisoned")
            .insert(key.to_string(), Instant::now() + ttl);
    }

    async fn get_del(&self, key: &str) -> Result<(), TicketStoreError> {
        let mut keys = self.keys.lock().expect("ticket store lock poisoned");

        let expires_at = keys.remove(key).ok_or(TicketStoreError::KeyNotFound)?;
        if Instant::now() > expires_at {
            return Err(TicketStoreError::KeyNotFound);
        }

        Ok(())
    }
}
