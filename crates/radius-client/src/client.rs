//! Client façade
//!
//! Ties the protocol engine and the failover controller together behind the
//! public surface: construct with a validated config, `authenticate`,
//! `failover`, `active_host`, `shutdown`.

use crate::config::ClientConfig;
use crate::engine::{self, ProtocolOptions};
use crate::error::ClientResult;
use crate::failover::FailoverController;
use crate::health::HostHealthSnapshot;
use crate::result::AuthResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Failover RADIUS authentication client
///
/// Construction spawns the initial host selection and the background health
/// cycle, so a `RadiusClient` must be created inside a Tokio runtime.
/// Dropping the client (or calling [`shutdown`](Self::shutdown)) stops the
/// background cycle; in-flight probes finish or time out on their own.
pub struct RadiusClient {
    controller: Arc<FailoverController>,
    options: ProtocolOptions,
    shutdown: watch::Sender<bool>,
}

impl RadiusClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let secret = config.secret.as_bytes().to_vec();
        let options = ProtocolOptions {
            secret: secret.clone(),
            port: config.port,
            timeout: Duration::from_millis(config.timeout_ms),
            assignment_attribute_id: config.assignment_attribute_id,
            vendor_id: config.vendor_id,
            vendor_type: config.vendor_type,
            value_pattern: config.compile_value_pattern()?,
        };
        // Probes authenticate with dedicated credentials and no
        // assignment extraction.
        let probe_options = ProtocolOptions {
            secret,
            port: config.port,
            timeout: Duration::from_millis(config.health_check_timeout_ms),
            assignment_attribute_id: config.assignment_attribute_id,
            vendor_id: None,
            vendor_type: None,
            value_pattern: None,
        };

        let controller = Arc::new(FailoverController::new(
            config.pool(),
            probe_options,
            config.health_check_user.clone(),
            config.health_check_password.clone(),
        ));

        let initial = Arc::clone(&controller);
        tokio::spawn(async move {
            initial.select_initial().await;
        });

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let cycle_controller = Arc::clone(&controller);
        let period = config.health_check_interval();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // An interval's first tick fires immediately; initial selection
            // already covers that, and a late tick is skipped rather than
            // replayed so cycles never stack up.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => cycle_controller.health_cycle().await,
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow_and_update() {
                            break;
                        }
                    }
                }
            }
            debug!("health cycle task stopped");
        });

        Ok(RadiusClient {
            controller,
            options,
            shutdown,
        })
    }

    /// Authenticate `user` against the current active host
    ///
    /// A `timeout` outcome schedules a background re-probe/failover; the
    /// caller gets the original outcome without waiting for it. Socket
    /// faults propagate as errors.
    pub async fn authenticate(&self, user: &str, password: &str) -> ClientResult<AuthResult> {
        let host = self.active_host();
        let result = engine::authenticate(&host, user, password, &self.options).await?;

        if result.is_timeout() {
            let controller = Arc::clone(&self.controller);
            tokio::spawn(async move {
                controller.on_auth_timeout().await;
            });
        }

        Ok(result)
    }

    /// Force a rotation away from the current active host
    ///
    /// Returns the newly promoted host, or `None` when no other host
    /// responded or a probe sequence is already running.
    pub async fn failover(&self) -> Option<String> {
        self.controller.failover().await
    }

    /// The active host, falling back to the pool's primary
    pub fn active_host(&self) -> String {
        self.controller.active_host()
    }

    /// Point-in-time health of every pool member, in priority order
    pub fn health(&self) -> Vec<HostHealthSnapshot> {
        self.controller.health_snapshot()
    }

    /// Stop the background health cycle
    ///
    /// In-flight authentications and probes are not cancelled; they finish
    /// or time out on their own.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(hosts: &[&str]) -> ClientConfig {
        serde_json::from_value(serde_json::json!({
            "host": hosts.first().copied().unwrap_or(""),
            "hosts": hosts,
            "secret": "testing123",
            "health_check_user": "probe",
            "health_check_password": "probe-pass",
            "timeout_ms": 100,
            "health_check_timeout_ms": 100,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_construction_validates_config() {
        let mut bad = config(&["10.0.0.1"]);
        bad.secret = String::new();
        assert!(RadiusClient::new(bad).is_err());
    }

    #[tokio::test]
    async fn test_active_host_defaults_to_primary() {
        let client = RadiusClient::new(config(&["203.0.113.1", "203.0.113.2"])).unwrap();
        assert_eq!(client.active_host(), "203.0.113.1");
        client.shutdown();
    }

    #[tokio::test]
    async fn test_health_covers_whole_pool() {
        let client = RadiusClient::new(config(&["203.0.113.1", "203.0.113.2"])).unwrap();
        let hosts: Vec<_> = client.health().into_iter().map(|s| s.host).collect();
        assert_eq!(hosts, vec!["203.0.113.1", "203.0.113.2"]);
        client.shutdown();
    }
}
