//! Transactional email delivery (stub).

use async_trait::async_trait;
use tracing::debug;

use super::{AlertChannel, ChannelError};
use crate::{
    alerts::{Alert, Severity},
    config::EmailConfig,
};

/// Placeholder email backend.
///
/// Accepts [`Severity::Medium`] and above. Validates that recipients are
/// configured, then reports success without dispatching; the SMTP relay
/// settings are carried so a real transport can be slotted in without a
/// configuration change.
pub struct EmailChannel {
    recipients: Vec<String>,
    sender: String,
    smtp_host: String,
    smtp_port: u16,
}

impl EmailChannel {
    /// Creates the channel from its configuration section.
    #[must_use]
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            recipients: config.recipients.clone(),
            sender: config.sender.clone(),
            smtp_host: config.smtp_host.clone(),
            smtp_port: config.smtp_port,
        }
    }
}

#[async_trait]
impl AlertChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    fn supports_severity(&self, severity: Severity) -> bool {
        severity >= Severity::Medium
    }

    async fn send(&self, alert: &Alert) -> Result<(), ChannelError> {
        if self.recipients.is_empty() {
            return Err(ChannelError::NoRecipients);
        }

        // TODO: wire up the SMTP transport once the relay is provisioned;
        // until then delivery stops after validation.
        debug!(
            alert_id = %alert.id,
            recipients = self.recipients.len(),
            sender = %self.sender,
            smtp = %format!("{}:{}", self.smtp_host, self.smtp_port),
            "email delivery validated (transport not yet wired)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::ErrorType;
    use serde_json::json;

    fn medium_alert() -> Alert {
        Alert::new(
            "alert-3".to_string(),
            ErrorType::DiskSpaceLow,
            Severity::Medium,
            "Disk Space Low".to_string(),
            "Free space below 10%".to_string(),
            json!({}),
            None,
        )
    }

    #[test]
    fn accepts_medium_and_above() {
        let channel = EmailChannel::new(&EmailConfig::default());

        assert!(channel.supports_severity(Severity::Critical));
        assert!(channel.supports_severity(Severity::Medium));
        assert!(!channel.supports_severity(Severity::Low));
    }

    #[tokio::test]
    async fn empty_recipient_list_fails() {
        let channel = EmailChannel::new(&EmailConfig::default());

        let result = channel.send(&medium_alert()).await;
        assert!(matches!(result, Err(ChannelError::NoRecipients)));
    }

    #[tokio::test]
    async fn validated_send_reports_success() {
        let config = EmailConfig {
            recipients: vec!["oncall@example.com".to_string()],
            ..EmailConfig::default()
        };
        let channel = EmailChannel::new(&config);

        assert!(channel.send(&medium_alert()).await.is_ok());
    }
}
