//! Monitor endpoint configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Monitor WebSocket configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Per-subscription channel capacity
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Ticket lifetime in seconds
    #[serde(default = "default_ticket_ttl")]
    pub ticket_ttl: u64,

    /// Heartbeat period in seconds
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
}

impl MonitorConfig {
    /// Ticket lifetime as a Duration
    pub fn ticket_ttl(&self) -> Duration {
        Duration::from_secs(self.ticket_ttl)
    }

    /// Heartbeat period as a Duration
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval)
    }

    /// Validate monitor configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.buffer_size == 0 {
            return Err(ValidationError::InvalidBufferSize);
        }
        if self.ticket_ttl == 0 || self.ping_interval == 0 {
            return Err(ValidationError::InvalidMonitorPeriod);
        }
        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            ticket_ttl: default_ticket_ttl(),
            ping_interval: default_ping_interval(),
        }
    }
}

fn default_buffer_size() -> usize {
    256
}

fn default_ticket_ttl() -> u64 {
    5
}

fn default_ping_interval() -> u64 {
    10
}
