//! Alerting configuration with layered loading.
//!
//! Configuration is loaded once at startup, later sources overriding
//! earlier ones:
//!
//! 1. **Compiled defaults**: every channel section has working defaults
//!    (credentials default to unset, which disables that channel's outbound
//!    delivery but keeps the channel registered).
//! 2. **Environment variables**: `TASKBOARD_*` with `__` as the section
//!    separator, e.g. `TASKBOARD_PAGERDUTY__ROUTING_KEY`,
//!    `TASKBOARD_SLACK__WEBHOOK_URL`, `TASKBOARD_EMAIL__RECIPIENTS`.
//!
//! Channels read their section at construction, never per-send.

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

use crate::masking::MaskingConfig;

/// PagerDuty Events API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagerDutyConfig {
    /// Pre-shared integration routing key. Unset means the channel fails
    /// every send with a configuration error.
    #[serde(default)]
    pub routing_key: Option<String>,

    /// Source label attached to every event.
    #[serde(default = "default_pagerduty_source")]
    pub source: String,
}

fn default_pagerduty_source() -> String {
    "taskboard".to_string()
}

impl Default for PagerDutyConfig {
    fn default() -> Self {
        Self { routing_key: None, source: default_pagerduty_source() }
    }
}

/// Slack incoming-webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Pre-shared webhook URL. Unset means the channel fails every send
    /// with a configuration error.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Channel the message is posted to.
    #[serde(default = "default_slack_channel")]
    pub channel: String,

    /// Display username for the posting bot.
    #[serde(default = "default_slack_username")]
    pub username: String,

    /// Icon emoji for the posting bot.
    #[serde(default = "default_slack_icon")]
    pub icon_emoji: String,
}

fn default_slack_channel() -> String {
    "#alerts".to_string()
}

fn default_slack_username() -> String {
    "Taskboard Alerts".to_string()
}

fn default_slack_icon() -> String {
    ":rotating_light:".to_string()
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            channel: default_slack_channel(),
            username: default_slack_username(),
            icon_emoji: default_slack_icon(),
        }
    }
}

/// Transactional email settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Recipient addresses. An empty list fails every send.
    #[serde(default)]
    pub recipients: Vec<String>,

    /// Sender address.
    #[serde(default = "default_email_sender")]
    pub sender: String,

    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

fn default_email_sender() -> String {
    "alerts@taskboard.local".to_string()
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            recipients: Vec::new(),
            sender: default_email_sender(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
        }
    }
}

/// Top-level alerting configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertingConfig {
    /// PagerDuty channel settings.
    #[serde(default)]
    pub pagerduty: PagerDutyConfig,

    /// Slack channel settings.
    #[serde(default)]
    pub slack: SlackConfig,

    /// Email channel settings.
    #[serde(default)]
    pub email: EmailConfig,

    /// Masking strategy settings.
    #[serde(default)]
    pub masking: MaskingConfig,
}

impl AlertingConfig {
    /// Loads configuration from the environment over compiled defaults.
    ///
    /// Environment overrides use the `TASKBOARD_` prefix with `__` as the
    /// section separator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an override cannot be parsed into the
    /// expected type.
    pub fn load() -> Result<Self, ConfigError> {
        let loaded = Config::builder()
            .add_source(
                Environment::with_prefix("TASKBOARD")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("email.recipients")
                    .try_parsing(true),
            )
            .build()?;

        loaded.try_deserialize()
    }

    /// Validates the configuration for correctness and consistency.
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.slack.webhook_url {
            if !url.starts_with("http") {
                return Err(format!("Invalid Slack webhook URL: {url}"));
            }
        }
        if let Some(key) = &self.pagerduty.routing_key {
            if key.trim().is_empty() {
                return Err("PagerDuty routing key is empty".to_string());
            }
        }
        for recipient in &self.email.recipients {
            if !recipient.contains('@') {
                return Err(format!("Invalid email recipient: {recipient}"));
            }
        }
        if self.email.smtp_port == 0 {
            return Err("SMTP port must be greater than zero".to_string());
        }
        if self.masking.visible_chars > 16 {
            return Err("masking.visible_chars must be at most 16".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AlertingConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.pagerduty.routing_key.is_none());
        assert!(config.slack.webhook_url.is_none());
        assert_eq!(config.slack.channel, "#alerts");
        assert_eq!(config.email.smtp_port, 587);
    }

    #[test]
    fn rejects_malformed_webhook_url() {
        let config = AlertingConfig {
            slack: SlackConfig {
                webhook_url: Some("hooks.slack.com/services/T000/B000/XXX".to_string()),
                ..SlackConfig::default()
            },
            ..AlertingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_recipient() {
        let config = AlertingConfig {
            email: EmailConfig {
                recipients: vec!["not-an-address".to_string()],
                ..EmailConfig::default()
            },
            ..AlertingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_routing_key() {
        let config = AlertingConfig {
            pagerduty: PagerDutyConfig {
                routing_key: Some("   ".to_string()),
                ..PagerDutyConfig::default()
            },
            ..AlertingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn section_deserialization_fills_defaults() {
        let config: AlertingConfig = serde_json::from_str(
            r#"{ "slack": { "webhook_url": "https://hooks.slack.com/services/T0/B0/XYZ" } }"#,
        )
        .unwrap();

        assert_eq!(
            config.slack.webhook_url.as_deref(),
            Some("https://hooks.slack.com/services/T0/B0/XYZ")
        );
        assert_eq!(config.slack.username, "Taskboard Alerts");
        assert!(config.email.recipients.is_empty());
    }
}
