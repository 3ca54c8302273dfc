//! Slack incoming-webhook delivery.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::{truncate_body, AlertChannel, ChannelError};
use crate::{
    alerts::{Alert, Severity},
    config::SlackConfig,
};

/// Posts alert summaries to a chat channel via an incoming webhook.
///
/// Accepts [`Severity::Medium`] and above. The webhook URL is read once at
/// construction; a missing URL turns every send into a
/// [`ChannelError::NotConfigured`] failure for this channel alone.
pub struct SlackChannel {
    webhook_url: Option<String>,
    channel: String,
    username: String,
    icon_emoji: String,
    client: reqwest::Client,
}

impl SlackChannel {
    /// Creates the channel from its configuration section.
    #[must_use]
    pub fn new(config: &SlackConfig, client: reqwest::Client) -> Self {
        Self {
            webhook_url: config.webhook_url.clone(),
            channel: config.channel.clone(),
            username: config.username.clone(),
            icon_emoji: config.icon_emoji.clone(),
            client,
        }
    }

    /// Attachment color keyed to severity.
    fn color(severity: Severity) -> &'static str {
        match severity {
            Severity::Critical => "#8b0000",
            Severity::High => "#ff0000",
            Severity::Medium => "#ff9900",
            Severity::Low | Severity::Info => "#36a64f",
        }
    }
}

#[async_trait]
impl AlertChannel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn supports_severity(&self, severity: Severity) -> bool {
        severity >= Severity::Medium
    }

    async fn send(&self, alert: &Alert) -> Result<(), ChannelError> {
        let webhook_url = self
            .webhook_url
            .as_deref()
            .ok_or(ChannelError::NotConfigured("Slack webhook URL"))?;

        let mut fields = vec![
            json!({ "title": "Error Type", "value": alert.error_type.as_str(), "short": true }),
            json!({ "title": "Alert ID", "value": alert.id, "short": true }),
            json!({
                "title": "Timestamp",
                "value": alert.created_at.to_rfc3339(),
                "short": true
            }),
        ];
        if let Some(request_id) = &alert.request_id {
            fields.push(json!({ "title": "Request ID", "value": request_id, "short": true }));
        }
        if alert.metadata.as_object().is_some_and(|m| !m.is_empty()) {
            let pretty = serde_json::to_string_pretty(&alert.metadata)
                .unwrap_or_else(|_| alert.metadata.to_string());
            fields.push(json!({
                "title": "Metadata",
                "value": format!("```{pretty}```"),
                "short": false
            }));
        }

        let body = json!({
            "channel": self.channel,
            "username": self.username,
            "icon_emoji": self.icon_emoji,
            "attachments": [{
                "color": Self::color(alert.severity),
                "title": format!(
                    "{}: {}",
                    alert.severity.as_str().to_uppercase(),
                    alert.title
                ),
                "text": alert.message,
                "fields": fields,
            }]
        });

        let response = self.client.post(webhook_url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChannelError::UnexpectedStatus {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        debug!(alert_id = %alert.id, "slack webhook accepted");
        Ok(())
    }
}
