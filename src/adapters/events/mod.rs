//! Event bus adapters.
//!
//! Three implementations of the `EventService` port:
//! - `InMemoryEventService` - single-replica fan-out
//! - `RedisEventService` - shared bus across replicas
//! - `NopEventService` - eventing disabled

mod in_memory;
mod nop;
mod redis;

pub use in_memory::{InMemoryEventService, InMemorySubscription, EVENT_BUFFER_SIZE};
pub use nop::NopEventService;
pub use redis::{RedisEventService, RedisSubscription};
