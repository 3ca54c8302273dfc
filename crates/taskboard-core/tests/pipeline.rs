//! End-to-end pipeline behavior: routing, suppression, masking, and channel
//! isolation.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use serde_json::json;
use taskboard_core::{
    alerts::{Alert, AlertService, ErrorType, Severity},
    channels::{AlertChannel, ChannelError, ConsoleChannel, EmailChannel, PagerDutyChannel, SlackChannel},
    config::AlertingConfig,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Records every delivered alert id; accepts a configurable severity floor.
struct RecordingChannel {
    name: &'static str,
    floor: Severity,
    delivered: parking_lot::Mutex<Vec<String>>,
}

impl RecordingChannel {
    fn new(name: &'static str, floor: Severity) -> Arc<Self> {
        Arc::new(Self { name, floor, delivered: parking_lot::Mutex::new(Vec::new()) })
    }

    fn delivered(&self) -> Vec<String> {
        self.delivered.lock().clone()
    }
}

#[async_trait]
impl AlertChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports_severity(&self, severity: Severity) -> bool {
        severity >= self.floor
    }

    async fn send(&self, alert: &Alert) -> Result<(), ChannelError> {
        self.delivered.lock().push(alert.id.clone());
        Ok(())
    }
}

/// Always rejects; used to prove failure isolation.
struct FailingChannel {
    attempts: AtomicUsize,
}

#[async_trait]
impl AlertChannel for FailingChannel {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn supports_severity(&self, _severity: Severity) -> bool {
        true
    }

    async fn send(&self, _alert: &Alert) -> Result<(), ChannelError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ChannelError::NotConfigured("deliberately broken"))
    }
}

#[tokio::test]
async fn failing_channel_does_not_block_siblings() {
    init_tracing();
    let service = AlertService::new();
    let failing = Arc::new(FailingChannel { attempts: AtomicUsize::new(0) });
    let recording = RecordingChannel::new("recording", Severity::Info);

    service.register_channel(failing.clone());
    service.register_channel(recording.clone());

    service
        .submit(
            ErrorType::SecurityBreach,
            "Breach",
            "Unauthorized access",
            json!({}),
            None,
        )
        .await;

    // Both channels were attempted; the failure stayed contained.
    assert_eq!(failing.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(recording.delivered().len(), 1);
    assert_eq!(service.get_active_alerts().len(), 1);
}

#[tokio::test]
async fn critical_breach_routes_to_every_accepting_channel() {
    let service = AlertService::new();
    let client = reqwest::Client::new();
    let config = AlertingConfig::default();

    // Default configuration: console accepts everything, PagerDuty is
    // critical-only, Slack and email require medium or above.
    let console = Arc::new(ConsoleChannel::new());
    let pagerduty = Arc::new(PagerDutyChannel::new(&config.pagerduty, client.clone()));
    let slack = Arc::new(SlackChannel::new(&config.slack, client));
    let email = Arc::new(EmailChannel::new(&config.email));

    service.register_channel(console);
    service.register_channel(pagerduty);
    service.register_channel(slack);
    service.register_channel(email);

    service
        .submit(
            ErrorType::SecurityBreach,
            "Breach",
            "Unauthorized access",
            json!({ "password": "abc123", "userId": "u-1" }),
            None,
        )
        .await;

    // All four channels accept CRITICAL; the unconfigured outbound ones
    // fail individually without affecting submission.
    let alerts = service.get_active_alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Critical);
    assert_eq!(alerts[0].metadata["password"], "******");
    assert_eq!(alerts[0].metadata["userId"], "u-1");
}

#[tokio::test]
async fn duplicate_submission_does_not_create_a_second_alert() {
    let service = AlertService::new();
    let recording = RecordingChannel::new("recording", Severity::Info);
    service.register_channel(recording.clone());

    // Two submissions of the same (error type, title) inside the window.
    for message in ["first", "second"] {
        service
            .submit(
                ErrorType::HighErrorRate,
                "High Error Rate",
                message,
                json!({}),
                None,
            )
            .await;
    }

    assert_eq!(service.get_active_alerts().len(), 1);
    assert_eq!(recording.delivered().len(), 1);
}

#[tokio::test]
async fn severity_gates_route_around_low_severity_channels() {
    let service = AlertService::new();
    let pager = RecordingChannel::new("pager", Severity::Critical);
    let chat = RecordingChannel::new("chat", Severity::Medium);
    let console = RecordingChannel::new("console", Severity::Info);

    service.register_channel(pager.clone());
    service.register_channel(chat.clone());
    service.register_channel(console.clone());

    // Medium-severity alert: pager must stay silent.
    service
        .submit(ErrorType::DiskSpaceLow, "Disk Space Low", "9% free", json!({}), None)
        .await;

    assert!(pager.delivered().is_empty());
    assert_eq!(chat.delivered().len(), 1);
    assert_eq!(console.delivered().len(), 1);

    // Critical alert reaches all three.
    service
        .submit(ErrorType::DatabaseConnectionLost, "DB Down", "lost", json!({}), None)
        .await;

    assert_eq!(pager.delivered().len(), 1);
    assert_eq!(chat.delivered().len(), 2);
    assert_eq!(console.delivered().len(), 2);
}

#[tokio::test]
async fn delivered_alerts_carry_only_masked_content() {
    let service = AlertService::new();

    struct CapturingChannel {
        seen: parking_lot::Mutex<Vec<Alert>>,
    }

    #[async_trait]
    impl AlertChannel for CapturingChannel {
        fn name(&self) -> &'static str {
            "capturing"
        }
        fn supports_severity(&self, _severity: Severity) -> bool {
            true
        }
        async fn send(&self, alert: &Alert) -> Result<(), ChannelError> {
            self.seen.lock().push(alert.clone());
            Ok(())
        }
    }

    let capturing = Arc::new(CapturingChannel { seen: parking_lot::Mutex::new(Vec::new()) });
    service.register_channel(capturing.clone());

    service
        .submit(
            ErrorType::AuthenticationFailureSpike,
            "Login failures for ops@example.com",
            "reset with token=abcdef0123456789",
            json!({
                "apiKey": "sk_live_4242424242424242",
                "attempts": 37
            }),
            Some("req-abc".to_string()),
        )
        .await;

    let seen = capturing.seen.lock();
    assert_eq!(seen.len(), 1);
    let alert = &seen[0];

    // The channel only ever sees post-masking values.
    assert!(!alert.title.contains("ops@example.com"));
    assert!(alert.title.contains("o**@example.com"));
    assert!(!alert.message.contains("abcdef0123456789"));
    assert!(!alert.metadata["apiKey"].as_str().unwrap().contains("4242424242"));
    assert_eq!(alert.metadata["attempts"], 37);
    assert_eq!(alert.request_id.as_deref(), Some("req-abc"));
}
