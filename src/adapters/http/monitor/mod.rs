//! Monitor endpoint: real-time event streaming to operator dashboards.
//!
//! One WebSocket path per event family, gated by a single-use ticket obtained
//! through a POST to the same path.

mod handlers;
mod routes;

pub use handlers::{monitor, request_monitor, MonitorState, PING_INTERVAL, TICKET_COOKIE};
pub use routes::monitor_routes;
