//! TicketStore port - persistence for expirable one-time tickets.
//!
//! The provider layers single-use semantics on top of this store; the store
//! itself only knows about keys with a time-to-live. The bundled adapter
//! keeps tickets in process memory; a broker-backed store can replace it at
//! deployment level when upgrades must survive load-balancer re-routing.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by ticket stores.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TicketStoreError {
    /// The key does not exist or its time-to-live has been exceeded.
    #[error("key not found")]
    KeyNotFound,
}

/// Port for persisting expirable tickets.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Persists a key with a timeout.
    async fn set_ex(&self, key: &str, ttl: Duration);

    /// Checks whether a key exists and removes it in the same step.
    ///
    /// Returns [`TicketStoreError::KeyNotFound`] if the key was never stored,
    /// was already consumed, or has expired.
    async fn get_del(&self, key: &str) -> Result<(), TicketStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn TicketStore) {}

    #[test]
    fn key_not_found_renders_stable_message() {
        assert_eq!(TicketStoreError::KeyNotFound.to_string(), "key not found");
    }
}
