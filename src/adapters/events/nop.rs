//! No-op event bus.
//!
//! Stands in when eventing is disabled. Publishing succeeds silently;
//! subscription is unsupported, which lets long-running listeners (the audit
//! log among them) fail fast at startup instead of waiting on a stream that
//! will never produce.

use async_trait::async_trait;

use crate::ports::{BoxedSubscription, EventError, EventService};

/// Event bus that discards publishes and rejects subscriptions.
pub struct NopEventService;

#[async_trait]
impl<T: Clone + Send + 'static> EventService<T> for NopEventService {
    async fn publish_event(&self, _event: T) {}

    async fn subscribe(&self) -> Result<BoxedSubscription<T>, EventError> {
        Err(EventError::SubscribeUnsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_is_a_silent_no_op() {
        let bus = NopEventService;
        bus.publish_event(1u32).await;
    }

    #[tokio::test]
    async fn subscribe_is_unsupported() {
        let bus = NopEventService;

        let result = EventService::<u32>::subscribe(&bus).await;

        assert!(matches!(result, Err(EventError::SubscribeUnsupported)));
    }
}
