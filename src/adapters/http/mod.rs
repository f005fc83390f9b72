//! HTTP adapters - WebSocket monitor endpoints.
//!
//! The REST surface of the host program is generated elsewhere; this module
//! carries only the monitor endpoints the event core owns.

pub mod monitor;

// Re-export key types for convenience
pub use monitor::monitor_routes;
pub use monitor::MonitorState;
