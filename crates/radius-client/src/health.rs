//! Per-host probe-health records

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

/// Probe history for one pool member
///
/// `consecutive_failures` resets to zero on ANY response from the host
/// (accept, reject, or challenge all prove liveness).
#[derive(Debug, Clone)]
pub struct HostHealth {
    pub host: String,
    pub last_ok_at: Option<DateTime<Utc>>,
    pub last_tried_at: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

impl HostHealth {
    fn new(host: &str) -> Self {
        HostHealth {
            host: host.to_string(),
            last_ok_at: None,
            last_tried_at: None,
            consecutive_failures: 0,
        }
    }
}

/// Point-in-time copy of one host's health, for callers and logs
#[derive(Debug, Clone, Serialize)]
pub struct HostHealthSnapshot {
    pub host: String,
    pub last_ok_at: Option<DateTime<Utc>>,
    pub last_tried_at: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

/// Health records for the whole pool, keyed by host
///
/// One record per configured host, created with the client and updated only
/// by the probe routine.
pub struct HealthTable {
    order: Vec<String>,
    hosts: DashMap<String, HostHealth>,
}

impl HealthTable {
    pub fn new(pool: &[String]) -> Self {
        let hosts = DashMap::with_capacity(pool.len());
        for host in pool {
            hosts.insert(host.clone(), HostHealth::new(host));
        }
        HealthTable {
            order: pool.to_vec(),
            hosts,
        }
    }

    /// Stamp the start of a probe
    pub fn mark_tried(&self, host: &str) {
        if let Some(mut record) = self.hosts.get_mut(host) {
            record.last_tried_at = Some(Utc::now());
        }
    }

    /// Record a probe that proved the host alive
    pub fn mark_alive(&self, host: &str) {
        if let Some(mut record) = self.hosts.get_mut(host) {
            record.last_ok_at = Some(Utc::now());
            record.consecutive_failures = 0;
        }
    }

    /// Record a probe the host did not answer
    pub fn mark_dead(&self, host: &str) {
        if let Some(mut record) = self.hosts.get_mut(host) {
            record.consecutive_failures += 1;
        }
    }

    pub fn consecutive_failures(&self, host: &str) -> u32 {
        self.hosts
            .get(host)
            .map(|r| r.consecutive_failures)
            .unwrap_or(0)
    }

    /// Snapshot all records in pool priority order
    pub fn snapshot(&self) -> Vec<HostHealthSnapshot> {
        self.order
            .iter()
            .filter_map(|host| self.hosts.get(host))
            .map(|record| HostHealthSnapshot {
                host: record.host.clone(),
                last_ok_at: record.last_ok_at,
                last_tried_at: record.last_tried_at,
                consecutive_failures: record.consecutive_failures,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<String> {
        vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()]
    }

    #[test]
    fn test_alive_resets_failures_and_stamps_ok() {
        let table = HealthTable::new(&pool());
        table.mark_dead("10.0.0.1");
        table.mark_dead("10.0.0.1");
        assert_eq!(table.consecutive_failures("10.0.0.1"), 2);

        table.mark_alive("10.0.0.1");
        assert_eq!(table.consecutive_failures("10.0.0.1"), 0);

        let snap = table.snapshot();
        assert!(snap[0].last_ok_at.is_some());
        assert!(snap[1].last_ok_at.is_none());
    }

    #[test]
    fn test_dead_increments_failures() {
        let table = HealthTable::new(&pool());
        let before = table.consecutive_failures("10.0.0.2");
        table.mark_dead("10.0.0.2");
        assert_eq!(table.consecutive_failures("10.0.0.2"), before + 1);
    }

    #[test]
    fn test_tried_stamps_without_touching_failures() {
        let table = HealthTable::new(&pool());
        table.mark_dead("10.0.0.1");
        table.mark_tried("10.0.0.1");
        assert_eq!(table.consecutive_failures("10.0.0.1"), 1);
        assert!(table.snapshot()[0].last_tried_at.is_some());
    }

    #[test]
    fn test_snapshot_preserves_pool_order() {
        let table = HealthTable::new(&pool());
        let hosts: Vec<_> = table.snapshot().into_iter().map(|s| s.host).collect();
        assert_eq!(hosts, pool());
    }
}
