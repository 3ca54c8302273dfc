//! PagerDuty Events API v2 delivery.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::{truncate_body, AlertChannel, ChannelError};
use crate::{
    alerts::{Alert, Severity},
    config::PagerDutyConfig,
};

/// Default Events API endpoint.
const EVENTS_API_URL: &str = "https://events.pagerduty.com/v2/enqueue";

/// Pages the on-call responder for critical alerts.
///
/// Accepts only [`Severity::Critical`]. The routing key is read once at
/// construction; a missing key turns every send into a
/// [`ChannelError::NotConfigured`] failure for this channel alone.
pub struct PagerDutyChannel {
    routing_key: Option<String>,
    source: String,
    api_url: String,
    client: reqwest::Client,
}

impl PagerDutyChannel {
    /// Creates the channel from its configuration section.
    #[must_use]
    pub fn new(config: &PagerDutyConfig, client: reqwest::Client) -> Self {
        Self {
            routing_key: config.routing_key.clone(),
            source: config.source.clone(),
            api_url: EVENTS_API_URL.to_string(),
            client,
        }
    }

    #[cfg(test)]
    fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url;
        self
    }

    /// Maps alert severity onto the PagerDuty event severity scale.
    fn event_severity(severity: Severity) -> &'static str {
        match severity {
            Severity::Critical => "critical",
            Severity::High => "error",
            Severity::Medium => "warning",
            Severity::Low | Severity::Info => "info",
        }
    }
}

#[async_trait]
impl AlertChannel for PagerDutyChannel {
    fn name(&self) -> &'static str {
        "pagerduty"
    }

    fn supports_severity(&self, severity: Severity) -> bool {
        severity == Severity::Critical
    }

    async fn send(&self, alert: &Alert) -> Result<(), ChannelError> {
        let routing_key = self
            .routing_key
            .as_deref()
            .ok_or(ChannelError::NotConfigured("PagerDuty routing key"))?;

        let body = json!({
            "routing_key": routing_key,
            "event_action": "trigger",
            "dedup_key": alert.id,
            "payload": {
                "summary": format!(
                    "{}: {}",
                    alert.severity.as_str().to_uppercase(),
                    alert.title
                ),
                "source": self.source,
                "severity": Self::event_severity(alert.severity),
                "custom_details": {
                    "alert_id": alert.id,
                    "error_type": alert.error_type,
                    "message": alert.message,
                    "request_id": alert.request_id,
                    "metadata": alert.metadata,
                    "timestamp": alert.created_at.to_rfc3339(),
                }
            }
        });

        let response = self.client.post(&self.api_url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChannelError::UnexpectedStatus {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        debug!(alert_id = %alert.id, "pagerduty event accepted");
        Ok(())
    }
}
