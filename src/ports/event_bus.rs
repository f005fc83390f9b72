//! EventService port - transport-pluggable event fan-out.
//!
//! The port is generic over the event family so the in-memory and shared
//! (Redis) implementations share one contract instead of duplicating the
//! logic per family. Publishing is fire-and-forget: domain publishers never
//! observe subscriber-side failures, and a slow subscriber only ever loses
//! its own events.

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by event bus implementations.
///
/// Publish paths are best-effort and log instead of returning errors; only
/// subscription setup can fail.
#[derive(Debug, Error)]
pub enum EventError {
    /// The bus implementation cannot create subscriptions (no-op bus).
    #[error("event service does not support subscriptions")]
    SubscribeUnsupported,

    /// Broker connection or protocol failure during subscription setup.
    #[error("event transport failure: {0}")]
    Transport(String),
}

/// A single consumer's live stream of family envelopes.
///
/// The stream ends (`recv` returns `None`) when the subscription is closed or
/// the bus is torn down; no further events will arrive after that.
#[async_trait]
pub trait Subscription<T>: Send {
    /// Receives the next envelope. `None` means the stream has ended.
    ///
    /// Events buffered before `close` remain readable until drained.
    async fn recv(&mut self) -> Option<T>;

    /// Closes the stream and releases bus-side state. Idempotent.
    async fn close(&mut self) -> Result<(), EventError>;
}

/// Owned subscription handle as returned by [`EventService::subscribe`].
pub type BoxedSubscription<T> = Box<dyn Subscription<T>>;

/// Port for event dispatch and subscription management.
///
/// Implementations must register a subscription atomically before returning
/// from `subscribe` so the next `publish_event` can reach it, and must never
/// block or fail the publisher on behalf of a slow subscriber: when a
/// subscription's buffer is full the event is dropped for that subscription
/// only (lossy under backpressure).
#[async_trait]
pub trait EventService<T>: Send + Sync {
    /// Publishes an event to all current subscriptions. Best-effort.
    async fn publish_event(&self, event: T);

    /// Creates a subscription. Callers must `close()` it when done.
    async fn subscribe(&self) -> Result<BoxedSubscription<T>, EventError>;
}
