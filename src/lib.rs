//! Enduro - Digital Preservation Orchestration Service
//!
//! This crate implements the event distribution core: a transport-pluggable
//! publish/subscribe fabric feeding operator dashboards over WebSocket, with
//! an append-only audit log subscribed to the same stream.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
