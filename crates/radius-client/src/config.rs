//! Client configuration

use crate::error::{ClientError, ClientResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Background health cycles never run more often than this
pub const MIN_HEALTH_CHECK_INTERVAL_MS: u64 = 5_000;

/// Client configuration
///
/// All durations are milliseconds. The failover pool is `hosts` when
/// non-empty, otherwise the single `host`; order defines failover priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Primary server; sole pool member when `hosts` is empty
    pub host: String,

    /// Ordered failover pool
    #[serde(default)]
    pub hosts: Vec<String>,

    /// Shared secret; must be non-empty
    pub secret: String,

    /// UDP port for all hosts
    #[serde(default = "default_port")]
    pub port: u16,

    /// Authentication call timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Background health cycle period, floored at
    /// [`MIN_HEALTH_CHECK_INTERVAL_MS`]
    #[serde(default = "default_health_check_interval_ms")]
    pub health_check_interval_ms: u64,

    /// Per-probe timeout
    #[serde(default = "default_health_check_timeout_ms")]
    pub health_check_timeout_ms: u64,

    /// Probe username
    pub health_check_user: String,

    /// Probe password
    pub health_check_password: String,

    /// Attribute id to extract the assignment value from
    #[serde(default = "default_assignment_attribute_id")]
    pub assignment_attribute_id: u8,

    /// Required vendor id when the assignment target is Vendor-Specific
    #[serde(default)]
    pub vendor_id: Option<u32>,

    /// Required vendor sub-type when the assignment target is Vendor-Specific
    #[serde(default)]
    pub vendor_type: Option<u8>,

    /// Regex whose capture group 1 is the extracted assignment value
    #[serde(default)]
    pub value_pattern: Option<String>,
}

fn default_port() -> u16 {
    1812
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_health_check_interval_ms() -> u64 {
    1_800_000
}

fn default_health_check_timeout_ms() -> u64 {
    5_000
}

fn default_assignment_attribute_id() -> u8 {
    25 // Class
}

impl ClientConfig {
    /// Validate the configuration
    pub fn validate(&self) -> ClientResult<()> {
        if self.secret.is_empty() {
            return Err(ClientError::Configuration(
                "Shared secret cannot be empty".to_string(),
            ));
        }
        if self.health_check_user.is_empty() || self.health_check_password.is_empty() {
            return Err(ClientError::Configuration(
                "Health check credentials are required".to_string(),
            ));
        }
        if self.pool().is_empty() {
            return Err(ClientError::Configuration(
                "No hosts configured".to_string(),
            ));
        }
        if let Some(ref pattern) = self.value_pattern {
            self.compile_value_pattern_str(pattern)?;
        }
        Ok(())
    }

    /// Derive the ordered failover pool: `hosts` when non-empty, else
    /// `[host]`, with empty entries dropped and duplicates removed
    /// preserving first occurrence.
    pub fn pool(&self) -> Vec<String> {
        let source: Vec<&String> = if self.hosts.is_empty() {
            vec![&self.host]
        } else {
            self.hosts.iter().collect()
        };

        let mut pool: Vec<String> = Vec::with_capacity(source.len());
        for host in source {
            if !host.is_empty() && !pool.iter().any(|h| h == host) {
                pool.push(host.clone());
            }
        }
        pool
    }

    /// Compile `value_pattern` once for the client's lifetime
    pub(crate) fn compile_value_pattern(&self) -> ClientResult<Option<Regex>> {
        match self.value_pattern {
            Some(ref pattern) => Ok(Some(self.compile_value_pattern_str(pattern)?)),
            None => Ok(None),
        }
    }

    fn compile_value_pattern_str(&self, pattern: &str) -> ClientResult<Regex> {
        Regex::new(pattern)
            .map_err(|e| ClientError::Configuration(format!("Invalid value pattern: {e}")))
    }

    /// Background cycle period with the floor applied
    pub(crate) fn health_check_interval(&self) -> Duration {
        Duration::from_millis(self.health_check_interval_ms.max(MIN_HEALTH_CHECK_INTERVAL_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ClientConfig {
        ClientConfig {
            host: "10.0.0.1".to_string(),
            hosts: vec![],
            secret: "testing123".to_string(),
            port: default_port(),
            timeout_ms: default_timeout_ms(),
            health_check_interval_ms: default_health_check_interval_ms(),
            health_check_timeout_ms: default_health_check_timeout_ms(),
            health_check_user: "probe".to_string(),
            health_check_password: "probe-pass".to_string(),
            assignment_attribute_id: default_assignment_attribute_id(),
            vendor_id: None,
            vendor_type: None,
            value_pattern: None,
        }
    }

    #[test]
    fn test_defaults_from_json() {
        let config: ClientConfig = serde_json::from_str(
            r#"{
                "host": "10.0.0.1",
                "secret": "testing123",
                "health_check_user": "probe",
                "health_check_password": "probe-pass"
            }"#,
        )
        .unwrap();

        assert_eq!(config.port, 1812);
        assert_eq!(config.timeout_ms, 5_000);
        assert_eq!(config.health_check_interval_ms, 1_800_000);
        assert_eq!(config.health_check_timeout_ms, 5_000);
        assert_eq!(config.assignment_attribute_id, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut config = base_config();
        config.secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_health_credentials_rejected() {
        let mut config = base_config();
        config.health_check_user = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_value_pattern_rejected() {
        let mut config = base_config();
        config.value_pattern = Some("(".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pool_falls_back_to_host() {
        let config = base_config();
        assert_eq!(config.pool(), vec!["10.0.0.1".to_string()]);
    }

    #[test]
    fn test_pool_filters_empties_and_duplicates() {
        let mut config = base_config();
        config.hosts = vec![
            "10.0.0.1".to_string(),
            String::new(),
            "10.0.0.2".to_string(),
            "10.0.0.1".to_string(),
        ];
        assert_eq!(
            config.pool(),
            vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()]
        );
    }

    #[test]
    fn test_empty_pool_rejected() {
        let mut config = base_config();
        config.host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_interval_floor() {
        let mut config = base_config();
        config.health_check_interval_ms = 10;
        assert_eq!(
            config.health_check_interval(),
            Duration::from_millis(MIN_HEALTH_CHECK_INTERVAL_MS)
        );
    }
}
