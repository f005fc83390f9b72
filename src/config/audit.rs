//! Audit log configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Audit log configuration
///
/// An empty `filepath` disables auditing entirely; the sink becomes a no-op.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Path of the active audit file
    #[serde(default)]
    pub filepath: String,

    /// Rotation threshold in MiB
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,

    /// Gzip rotated files
    #[serde(default)]
    pub compress: bool,

    /// Minimum record severity (-4 debug .. 8 error)
    #[serde(default)]
    pub verbosity: i8,
}

impl AuditConfig {
    /// Rotation threshold in bytes
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb * 1024 * 1024
    }

    /// Whether auditing is enabled
    pub fn enabled(&self) -> bool {
        !self.filepath.is_empty()
    }

    /// Validate audit configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.enabled() && self.max_size_mb == 0 {
            return Err(ValidationError::InvalidAuditMaxSize);
        }
        if !(-4..=8).contains(&self.verbosity) {
            return Err(ValidationError::InvalidAuditVerbosity);
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            filepath: String::new(),
            max_size_mb: default_max_size_mb(),
            compress: false,
            verbosity: 0,
        }
    }
}

fn default_max_size_mb() -> u64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default() {
        let config = AuditConfig::default();
        assert!(!config.enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn max_size_converts_to_bytes() {
        let config = AuditConfig { max_size_mb: 2, ..Default::default() };
        assert_eq!(config.max_size_bytes(), 2 * 1024 * 1024);
    }

    #[test]
    fn enabled_with_zero_cap_is_invalid() {
        let config = AuditConfig {
            filepath: "/var/log/enduro/audit.log".to_string(),
            max_size_mb: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn verbosity_outside_range_is_invalid() {
        let config = AuditConfig { verbosity: 9, ..Default::default() };
        assert!(config.validate().is_err());

        let config = AuditConfig { verbosity: -5, ..Default::default() };
        assert!(config.validate().is_err());
    }
}
