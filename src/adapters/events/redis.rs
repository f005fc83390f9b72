//! Redis-backed event bus for multi-replica deployments.
//!
//! Publishes the wire-form envelope on one Redis channel per event family so
//! every API replica observes the same stream. Delivery is best-effort on both
//! sides: publish failures are logged and dropped, and a subscriber whose
//! local buffer is full loses the event exactly like on the in-memory bus.
//!
//! The broker subscription is established eagerly and is not re-established
//! after a disconnect: when the connection to Redis ends, the subscription's
//! stream ends and the consumer sees `recv() == None`.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::sync::{mpsc, oneshot};

use crate::domain::events::FamilyEvent;
use crate::ports::{BoxedSubscription, EventError, EventService, Subscription};

use super::in_memory::EVENT_BUFFER_SIZE;

/// Deadline for a single broker publish round-trip.
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(1);

/// Redis event bus for a single event family.
///
/// One instance per family; the channel name is configurable
/// (`bus.channel.ingest` / `bus.channel.storage`).
pub struct RedisEventService<T> {
    client: redis::Client,
    conn: MultiplexedConnection,
    channel: String,
    buffer: usize,
    dropped: Arc<AtomicU64>,
    _family: PhantomData<fn() -> T>,
}

impl<T: FamilyEvent> RedisEventService<T> {
    /// Connects to the broker and prepares the publish connection.
    ///
    /// Fails only on construction; runtime transport loss is logged and the
    /// bus continues degraded.
    pub async fn connect(url: &str, channel: impl Into<String>) -> Result<Self, EventError> {
        Self::connect_with_buffer(url, channel, EVENT_BUFFER_SIZE).await
    }

    /// Same as [`connect`](Self::connect) with a custom subscriber buffer.
    pub async fn connect_with_buffer(
        url: &str,
        channel: impl Into<String>,
        buffer: usize,
    ) -> Result<Self, EventError> {
        let client =
            redis::Client::open(url).map_err(|e| EventError::Transport(e.to_string()))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| EventError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            conn,
            channel: channel.into(),
            buffer,
            dropped: Arc::new(AtomicU64::new(0)),
            _family: PhantomData,
        })
    }

    /// Number of events dropped because a local subscriber buffer was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl<T: FamilyEvent> EventService<T> for RedisEventService<T> {
    #[tracing::instrument(
        name = "bus.publish",
        skip_all,
        fields(family = T::FAMILY, channel = %self.channel)
    )]
    async fn publish_event(&self, event: T) {
        let blob = match serde_json::to_vec(&event) {
            Ok(blob) => blob,
            Err(err) => {
                tracing::error!(error = %err, "failed to encode monitor event");
                return;
            }
        };

        let mut conn = self.conn.clone();
        let publish = conn.publish::<_, _, ()>(&self.channel, blob);
        match tokio::time::timeout(PUBLISH_TIMEOUT, publish).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(error = %err, "failed to publish monitor event");
            }
            Err(_) => {
                tracing::error!("timed out publishing monitor event");
            }
        }
    }

    #[tracing::instrument(
        name = "bus.subscribe",
        skip_all,
        fields(family = T::FAMILY, channel = %self.channel)
    )]
    async fn subscribe(&self) -> Result<BoxedSubscription<T>, EventError> {
        let conn = self
            .client
            .get_async_connection()
            .await
            .map_err(|e| EventError::Transport(e.to_string()))?;
        let mut pubsub = conn.into_pubsub();

        // Awaiting the SUBSCRIBE reply guarantees the broker registered the
        // subscription, so publishes issued after this point are observed.
        pubsub
            .subscribe(&self.channel)
            .await
            .map_err(|e| EventError::Transport(e.to_string()))?;

        let (tx, rx) = mpsc::channel(self.buffer);
        let (stop_tx, stop_rx) = oneshot::channel();
        let dropped = Arc::clone(&self.dropped);

        tokio::spawn(dispatch(pubsub, tx, stop_rx, dropped));

        Ok(Box::new(RedisSubscription { rx, stop: Some(stop_tx) }))
    }
}

/// Reads broker messages, decodes them, and offers them to the local channel.
///
/// Exits on the stop latch, on broker stream end, or when the local receiver
/// is gone. Dropping the pubsub connection closes the broker subscription.
async fn dispatch<T: FamilyEvent>(
    mut pubsub: redis::aio::PubSub,
    tx: mpsc::Sender<T>,
    mut stop_rx: oneshot::Receiver<()>,
    dropped: Arc<AtomicU64>,
) {
    let mut stream = pubsub.on_message();

    loop {
        tokio::select! {
            _ = &mut stop_rx => break,

            msg = stream.next() => {
                let Some(msg) = msg else { break };

                let payload: Vec<u8> = match msg.get_payload() {
                    Ok(payload) => payload,
                    Err(err) => {
                        tracing::warn!(error = %err, "unreadable monitor event payload");
                        continue;
                    }
                };
                let event: T = match serde_json::from_slice(&payload) {
                    Ok(event) => event,
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to decode monitor event");
                        continue;
                    }
                };

                match tx.try_send(event) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        dropped.fetch_add(1, Ordering::Relaxed);
                        tracing::trace!("event dropped: subscriber buffer full");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
            }
        }
    }
}

/// A stream of events delivered by [`RedisEventService`].
pub struct RedisSubscription<T> {
    rx: mpsc::Receiver<T>,
    stop: Option<oneshot::Sender<()>>,
}

#[async_trait]
impl<T: FamilyEvent> Subscription<T> for RedisSubscription<T> {
    async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    async fn close(&mut self) -> Result<(), EventError> {
        if let Some(stop) = self.stop.take() {
            // The dispatcher may already be gone; nothing to report then.
            let _ = stop.send(());
        }
        self.rx.close();
        Ok(())
    }
}
