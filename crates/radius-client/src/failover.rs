//! Failover controller: active-host selection and probing
//!
//! Owns the ordered host pool, the active-host slot, and the health table.
//! Probe sequences (initial selection, explicit failover, the no-active
//! recovery path) are serialized by a cooperative guard; a sequence that
//! finds the guard held returns immediately rather than queueing.

use crate::engine::{self, ProtocolOptions};
use crate::health::{HealthTable, HostHealthSnapshot};
use crate::result::AuthFailure;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

pub struct FailoverController {
    /// Priority-ordered pool; index 0 is the primary
    pool: Vec<String>,
    /// Current active host; `None` until a probe succeeds
    active: RwLock<Option<String>>,
    /// Cooperative guard serializing probe sequences
    in_progress: AtomicBool,
    health: HealthTable,
    probe_options: ProtocolOptions,
    probe_user: String,
    probe_password: String,
}

impl FailoverController {
    pub fn new(
        pool: Vec<String>,
        probe_options: ProtocolOptions,
        probe_user: String,
        probe_password: String,
    ) -> Self {
        let health = HealthTable::new(&pool);
        FailoverController {
            pool,
            active: RwLock::new(None),
            in_progress: AtomicBool::new(false),
            health,
            probe_options,
            probe_user,
            probe_password,
        }
    }

    /// The active host, or the pool's primary as a fallback probe target
    ///
    /// The fallback is never written to the active slot; promotion requires
    /// a successful probe.
    pub fn active_host(&self) -> String {
        self.current_active()
            .unwrap_or_else(|| self.pool[0].clone())
    }

    pub fn current_active(&self) -> Option<String> {
        self.active.read().unwrap().clone()
    }

    pub fn health_snapshot(&self) -> Vec<HostHealthSnapshot> {
        self.health.snapshot()
    }

    fn promote(&self, host: &str) {
        let mut active = self.active.write().unwrap();
        if active.as_deref() == Some(host) {
            return;
        }
        info!(host, previous = ?*active, "promoting active host");
        *active = Some(host.to_string());
    }

    fn clear_active(&self) {
        let mut active = self.active.write().unwrap();
        if active.is_some() {
            warn!(previous = ?*active, "clearing active host");
            *active = None;
        }
    }

    fn try_begin_sequence(&self) -> bool {
        self.in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn end_sequence(&self) {
        self.in_progress.store(false, Ordering::SeqCst);
    }

    /// Probe one host with the health-check credentials
    ///
    /// Any RADIUS response proves the host alive, including rejects,
    /// challenges, and responses that fail the authenticator check (a
    /// wrong-secret server is still a live server). Only silence and
    /// garbage too short to be RADIUS count as dead, as do transport
    /// faults.
    pub async fn probe_host(&self, host: &str) -> bool {
        self.health.mark_tried(host);
        match engine::authenticate(host, &self.probe_user, &self.probe_password, &self.probe_options)
            .await
        {
            Ok(result) => match result.error {
                Some(AuthFailure::Timeout) | Some(AuthFailure::MalformedResponse) => {
                    debug!(
                        host,
                        failures = self.health.consecutive_failures(host) + 1,
                        "probe got no usable response"
                    );
                    self.health.mark_dead(host);
                    false
                }
                _ => {
                    debug!(host, "probe response received");
                    self.health.mark_alive(host);
                    true
                }
            },
            Err(e) => {
                warn!(host, error = %e, "probe transport failure");
                self.health.mark_dead(host);
                false
            }
        }
    }

    /// Probe the pool in priority order and promote the first responsive
    /// host. Used at construction and whenever there is no active host.
    pub async fn select_initial(&self) {
        if !self.try_begin_sequence() {
            debug!("probe sequence already in progress, skipping selection");
            return;
        }

        let mut selected = None;
        for host in &self.pool {
            if self.probe_host(host).await {
                self.promote(host);
                selected = Some(host.clone());
                break;
            }
        }
        self.end_sequence();

        match selected {
            Some(host) => info!(host = %host, "initial selection complete"),
            None => warn!("no RADIUS server responded during selection"),
        }
    }

    /// Rotate to the next responsive host
    ///
    /// Iteration starts at the host after the current active (wrapping) and
    /// skips the active itself. Returns the promoted host, or `None` when
    /// nothing responded (the active slot is then cleared) or when another
    /// sequence holds the guard.
    pub async fn failover(&self) -> Option<String> {
        if !self.try_begin_sequence() {
            debug!("probe sequence already in progress, skipping failover");
            return None;
        }

        let current = self.current_active();
        let start = current
            .as_ref()
            .and_then(|active| self.pool.iter().position(|h| h == active))
            .map(|i| i + 1)
            .unwrap_or(0);

        let mut promoted = None;
        for offset in 0..self.pool.len() {
            let host = &self.pool[(start + offset) % self.pool.len()];
            if current.as_deref() == Some(host.as_str()) {
                continue;
            }
            if self.probe_host(host).await {
                self.promote(host);
                promoted = Some(host.clone());
                break;
            }
        }

        if promoted.is_none() {
            warn!("failover found no responsive host");
            self.clear_active();
        }
        self.end_sequence();
        promoted
    }

    /// One background health cycle: verify the active host, or try to find
    /// one when the slot is empty.
    pub async fn health_cycle(&self) {
        match self.current_active() {
            Some(active) => {
                if !self.probe_host(&active).await {
                    warn!(host = %active, "active host failed health check");
                    self.failover().await;
                }
            }
            None => self.select_initial().await,
        }
    }

    /// Reaction to a live authentication timeout, run in the background
    pub async fn on_auth_timeout(&self) {
        debug!("authentication timeout observed, re-checking active host");
        self.health_cycle().await;
    }
}
