//! Event bus configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Event bus configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BusConfig {
    /// Transport backing the bus
    #[serde(default)]
    pub backend: BusBackend,

    /// Broker connection URL (shared backend only)
    #[serde(default)]
    pub address: String,

    /// Broker channel names, one per event family
    #[serde(default)]
    pub channel: ChannelConfig,
}

/// Which transport backs the event bus
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BusBackend {
    /// Single-replica in-process fan-out
    #[default]
    Inmem,
    /// Redis-backed bus shared by all replicas
    Shared,
}

/// Broker channel names
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    #[serde(default = "default_ingest_channel")]
    pub ingest: String,

    #[serde(default = "default_storage_channel")]
    pub storage: String,
}

impl BusConfig {
    /// Validate bus configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == BusBackend::Shared {
            if self.address.is_empty() {
                return Err(ValidationError::MissingRequired("BUS_ADDRESS"));
            }
            if !self.address.starts_with("redis://") && !self.address.starts_with("rediss://") {
                return Err(ValidationError::InvalidBrokerUrl);
            }
        }
        if self.channel.ingest.is_empty() || self.channel.storage.is_empty() {
            return Err(ValidationError::EmptyChannelName);
        }
        if self.channel.ingest == self.channel.storage {
            return Err(ValidationError::ChannelNameCollision);
        }
        Ok(())
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            backend: BusBackend::Inmem,
            address: String::new(),
            channel: ChannelConfig::default(),
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            ingest: default_ingest_channel(),
            storage: default_storage_channel(),
        }
    }
}

fn default_ingest_channel() -> String {
    "enduro-ingest-events".to_string()
}

fn default_storage_channel() -> String {
    "enduro-storage-events".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_in_memory_backend() {
        let config = BusConfig::default();
        assert_eq!(config.backend, BusBackend::Inmem);
        assert_eq!(config.channel.ingest, "enduro-ingest-events");
        assert_eq!(config.channel.storage, "enduro-storage-events");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn shared_backend_requires_an_address() {
        let config = BusConfig {
            backend: BusBackend::Shared,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn shared_backend_requires_a_redis_url() {
        let config = BusConfig {
            backend: BusBackend::Shared,
            address: "http://localhost:6379".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn shared_backend_with_redis_url_is_valid() {
        let config = BusConfig {
            backend: BusBackend::Shared,
            address: "redis://localhost:6379".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn family_channels_must_differ() {
        let config = BusConfig {
            channel: ChannelConfig {
                ingest: "same".to_string(),
                storage: "same".to_string(),
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
