//! In-memory event bus implementation.
//!
//! Single-process fan-out from publishers to N local subscribers. Used when
//! one API replica runs alone; multi-replica deployments use the Redis bus so
//! every replica observes the same stream.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::ports::{BoxedSubscription, EventError, EventService, Subscription};

/// Default per-subscription buffer capacity.
pub const EVENT_BUFFER_SIZE: usize = 256;

type SubscriberMap<T> = Arc<Mutex<HashMap<Uuid, mpsc::Sender<T>>>>;

/// In-memory event bus for a single event family.
///
/// Fan-out contract:
/// - `publish_event` performs a non-blocking offer to every subscription; a
///   subscription whose buffer is full loses that event and nothing else
///   happens to it. The publisher never blocks on a channel.
/// - `subscribe` registers the new subscription before returning, so a
///   publish that starts afterwards is guaranteed to consider it.
/// - Within one publisher, each subscription observes events in publication
///   order (modulo drops).
///
/// A single mutex guards the subscription set; all channel operations inside
/// the critical section are non-blocking.
pub struct InMemoryEventService<T> {
    subs: SubscriberMap<T>,
    buffer: usize,
    dropped: Arc<AtomicU64>,
}

impl<T: Clone + Send + 'static> InMemoryEventService<T> {
    /// Creates a bus with the default buffer capacity.
    pub fn new() -> Self {
        Self::with_buffer(EVENT_BUFFER_SIZE)
    }

    /// Creates a bus with a custom per-subscription buffer capacity.
    pub fn with_buffer(buffer: usize) -> Self {
        Self {
            subs: Arc::new(Mutex::new(HashMap::new())),
            buffer,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of events dropped because a subscription's buffer was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subs.lock().expect("subscription set lock poisoned").len()
    }
}

impl<T: Clone + Send + 'static> Default for InMemoryEventService<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for InMemoryEventService<T> {
    fn drop(&mut self) {
        // Bus teardown closes every subscription channel; subscribers observe
        // end-of-stream on their next receive. A concurrent explicit close
        // serializes on the same mutex, so each channel closes exactly once.
        self.subs.lock().expect("subscription set lock poisoned").clear();
    }
}

#[async_trait]
impl<T: Clone + Send + 'static> EventService<T> for InMemoryEventService<T> {
    async fn publish_event(&self, event: T) {
        let mut subs = self.subs.lock().expect("subscription set lock poisoned");

        // Offer to every subscription; a full buffer drops the event for that
        // subscription only. A closed channel means the receiver is gone
        // without close(), so the entry is swept here.
        let mut gone = Vec::new();
        for (id, tx) in subs.iter() {
            match tx.try_send(event.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                    tracing::trace!(subscription = %id, "event dropped: subscriber buffer full");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    gone.push(*id);
                }
            }
        }
        for id in gone {
            subs.remove(&id);
        }
    }

    async fn subscribe(&self) -> Result<BoxedSubscription<T>, EventError> {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = Uuid::new_v4();

        self.subs
            .lock()
            .expect("subscription set lock poisoned")
            .insert(id, tx);

        Ok(Box::new(InMemorySubscription {
            id,
            rx,
            subs: Arc::clone(&self.subs),
        }))
    }
}

/// A stream of events delivered by [`InMemoryEventService`].
pub struct InMemorySubscription<T> {
    id: Uuid,
    rx: mpsc::Receiver<T>,
    subs: SubscriberMap<T>,
}

#[async_trait]
impl<T: Clone + Send + 'static> Subscription<T> for InMemorySubscription<T> {
    async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    async fn close(&mut self) -> Result<(), EventError> {
        // Removing the sender closes the channel; removal is serialized on
        // the set mutex so a race with bus teardown still closes it once.
        self.subs
            .lock()
            .expect("subscription set lock poisoned")
            .remove(&self.id);
        self.rx.close();
        Ok(())
    }
}
