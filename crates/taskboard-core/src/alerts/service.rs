//! Alert orchestration: classification, suppression, masking, storage, and
//! fan-out.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::{
    rules::{is_on_cooldown, RuleCatalog},
    types::{Alert, ErrorType, Severity},
};
use crate::{
    channels::AlertChannel,
    masking::{mask_object, mask_text, MaskingConfig},
};

/// Global minimum spacing between two alerts sharing `(error type, title)`,
/// independent of any per-rule cooldown.
const DEDUP_WINDOW_SECONDS: i64 = 300;

/// Alerts older than this are evicted from the in-memory table.
const RETENTION_HOURS: i64 = 24;

/// Hard cap on stored alerts so a retention-window flood stays bounded.
const MAX_ALERTS: usize = 1000;

/// Orchestrates the alerting pipeline.
///
/// Owns all pipeline state: the bounded in-memory alert table, the
/// last-trigger timestamp table backing deduplication and cooldown, and the
/// registered channel list. One long-lived instance is constructed at
/// process start and shared by reference (the struct is cheaply cloneable;
/// clones share state).
///
/// [`submit`](Self::submit) is call-and-forget: policy suppression is a
/// logged no-op and delivery failures are captured per channel, so the
/// calling business logic never observes an alerting failure.
#[derive(Clone)]
pub struct AlertService {
    catalog: Arc<RuleCatalog>,
    masking: MaskingConfig,
    /// Alert table, keyed by alert id.
    alerts: Arc<RwLock<HashMap<String, Alert>>>,
    /// Most recent trigger per `"{error_type}:{title}"` key.
    last_triggered: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
    /// Registered delivery channels, append-only.
    channels: Arc<RwLock<Vec<Arc<dyn AlertChannel>>>>,
}

impl AlertService {
    /// Creates a service with the production rule catalog and default
    /// masking.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(RuleCatalog::default(), MaskingConfig::default())
    }

    /// Creates a service with an explicit catalog and masking configuration.
    #[must_use]
    pub fn with_catalog(catalog: RuleCatalog, masking: MaskingConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            masking,
            alerts: Arc::new(RwLock::new(HashMap::new())),
            last_triggered: Arc::new(RwLock::new(HashMap::new())),
            channels: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Registers a delivery channel. Channels are append-only; there is no
    /// removal.
    pub fn register_channel(&self, channel: Arc<dyn AlertChannel>) {
        self.channels.write().push(channel);
    }

    /// Classifies, masks, records, and dispatches an error event.
    ///
    /// Runs the full pipeline described in the module docs. Suspension
    /// points are exactly the channel sends; rule lookup, the dedup gate,
    /// and masking are synchronous and no lock is held across an `.await`.
    pub async fn submit(
        &self,
        error_type: ErrorType,
        title: &str,
        message: &str,
        metadata: Value,
        request_id: Option<String>,
    ) {
        let severity = error_type.severity();
        let now = Utc::now();

        let Some(rule) = self.catalog.lookup_rule(error_type) else {
            debug!(error_type = %error_type, "no enabled alert rule, dropping event");
            return;
        };

        // Check-and-set under a single write lock: two near-simultaneous
        // submissions for the same key cannot both pass the gate.
        let dedup_key = format!("{}:{}", error_type.as_str(), title);
        {
            let mut last_triggered = self.last_triggered.write();
            if let Some(last) = last_triggered.get(&dedup_key).copied() {
                let elapsed = now.signed_duration_since(last).num_seconds();
                if elapsed < DEDUP_WINDOW_SECONDS {
                    debug!(
                        error_type = %error_type,
                        title,
                        elapsed_seconds = elapsed,
                        "suppressed by deduplication window"
                    );
                    return;
                }
                if is_on_cooldown(rule, Some(last), now) {
                    debug!(
                        error_type = %error_type,
                        title,
                        cooldown_seconds = rule.cooldown_seconds,
                        "suppressed by rule cooldown"
                    );
                    return;
                }
            }
            last_triggered.insert(dedup_key, now);
        }

        let alert = Alert::new(
            Uuid::new_v4().to_string(),
            error_type,
            severity,
            mask_text(title, &self.masking),
            mask_text(message, &self.masking),
            mask_object(&metadata, &self.masking),
            request_id,
        );

        self.alerts.write().insert(alert.id.clone(), alert.clone());

        if severity == Severity::Critical {
            error!(
                alert_id = %alert.id,
                error_type = %error_type,
                severity = %severity,
                request_id = ?alert.request_id,
                metadata = %alert.metadata,
                "{}", alert.title
            );
        } else {
            warn!(
                alert_id = %alert.id,
                error_type = %error_type,
                severity = %severity,
                request_id = ?alert.request_id,
                metadata = %alert.metadata,
                "{}", alert.title
            );
        }

        self.dispatch(&alert).await;
        self.evict_expired(now);
    }

    /// Fans the alert out to every channel accepting its severity.
    ///
    /// All sends run concurrently and every outcome is collected; one
    /// channel's failure never cancels or delays a sibling.
    async fn dispatch(&self, alert: &Alert) {
        let matching: Vec<Arc<dyn AlertChannel>> = {
            let channels = self.channels.read();
            channels.iter().filter(|c| c.supports_severity(alert.severity)).cloned().collect()
        };

        if matching.is_empty() {
            warn!(
                alert_id = %alert.id,
                severity = %alert.severity,
                "no registered channel accepts this severity"
            );
            return;
        }

        let sends = matching.iter().map(|channel| {
            let channel = Arc::clone(channel);
            async move {
                let outcome = channel.send(alert).await;
                (channel.name(), outcome)
            }
        });

        for (channel, outcome) in join_all(sends).await {
            match outcome {
                Ok(()) => debug!(alert_id = %alert.id, channel, "alert delivered"),
                Err(e) => {
                    warn!(alert_id = %alert.id, channel, error = %e, "alert delivery failed");
                }
            }
        }
    }

    /// Drops alerts past the retention window and stale dedup entries.
    ///
    /// Runs opportunistically after each submission; there is no background
    /// timer.
    fn evict_expired(&self, now: DateTime<Utc>) {
        let retention = Duration::hours(RETENTION_HOURS);

        let mut alerts = self.alerts.write();
        let before = alerts.len();
        alerts.retain(|_, alert| now.signed_duration_since(alert.created_at) < retention);

        if alerts.len() > MAX_ALERTS {
            let mut by_age: Vec<(String, DateTime<Utc>)> =
                alerts.iter().map(|(id, alert)| (id.clone(), alert.created_at)).collect();
            by_age.sort_by_key(|(_, created_at)| *created_at);
            let excess = alerts.len() - MAX_ALERTS;
            for (id, _) in by_age.into_iter().take(excess) {
                alerts.remove(&id);
            }
        }

        let evicted = before - alerts.len();
        drop(alerts);
        if evicted > 0 {
            debug!(evicted, "evicted expired alerts");
        }

        self.last_triggered
            .write()
            .retain(|_, triggered_at| now.signed_duration_since(*triggered_at) < retention);
    }

    /// All non-resolved alerts, oldest first.
    #[must_use]
    pub fn get_active_alerts(&self) -> Vec<Alert> {
        let mut active: Vec<Alert> =
            self.alerts.read().values().filter(|a| !a.resolved).cloned().collect();
        active.sort_by_key(|a| a.created_at);
        active
    }

    /// Non-resolved alerts of the given severity, oldest first.
    #[must_use]
    pub fn get_alerts_by_severity(&self, severity: Severity) -> Vec<Alert> {
        let mut matching: Vec<Alert> = self
            .alerts
            .read()
            .values()
            .filter(|a| !a.resolved && a.severity == severity)
            .cloned()
            .collect();
        matching.sort_by_key(|a| a.created_at);
        matching
    }

    /// Looks up a single alert by id.
    #[must_use]
    pub fn get_alert(&self, alert_id: &str) -> Option<Alert> {
        self.alerts.read().get(alert_id).cloned()
    }

    /// Marks an alert resolved and stamps the resolution time.
    ///
    /// Advisory bookkeeping: returns `false` for an unknown id instead of
    /// raising.
    #[must_use]
    pub fn resolve_alert(&self, alert_id: &str) -> bool {
        let mut alerts = self.alerts.write();
        if let Some(alert) = alerts.get_mut(alert_id) {
            alert.resolve();
            true
        } else {
            false
        }
    }

    /// Total number of stored alerts, resolved included.
    #[must_use]
    pub fn alert_count(&self) -> usize {
        self.alerts.read().len()
    }

    /// Number of non-resolved alerts.
    #[must_use]
    pub fn active_alert_count(&self) -> usize {
        self.alerts.read().values().filter(|a| !a.resolved).count()
    }
}

impl Default for AlertService {
    fn default() -> Self {
        Self::new()
    }
}
