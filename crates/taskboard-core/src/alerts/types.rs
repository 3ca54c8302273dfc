//! Alert type definitions and the error taxonomy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity tier of an alert, ordered from least to most urgent.
///
/// Drives channel eligibility and the log level used when an alert is
/// recorded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, no action expected.
    Info,
    /// Minor issue, worth a look during working hours.
    Low,
    /// Degradation that should be investigated soon.
    Medium,
    /// Serious degradation requiring prompt attention.
    High,
    /// Incident requiring immediate attention.
    Critical,
}

impl Severity {
    /// Returns a static lowercase label for log fields and wire payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of operational problem raised by the rest of the application.
///
/// Closed set; each variant carries exactly one severity via
/// [`ErrorType::severity`], fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The primary database stopped accepting connections.
    DatabaseConnectionLost,
    /// A database query exceeded its latency budget.
    DatabaseQuerySlow,
    /// Request error rate exceeded the configured threshold.
    HighErrorRate,
    /// Process memory usage exceeded the configured threshold.
    HighMemoryUsage,
    /// Evidence of unauthorized access to protected data.
    SecurityBreach,
    /// Burst of failed login attempts.
    AuthenticationFailureSpike,
    /// A depended-upon external service is unreachable.
    ExternalServiceDown,
    /// The background task queue is falling behind.
    TaskQueueBacklog,
    /// Free disk space fell below the configured threshold.
    DiskSpaceLow,
    /// A client exhausted its rate limit budget repeatedly.
    RateLimitExceeded,
}

impl ErrorType {
    /// The static severity associated with this error type.
    ///
    /// This mapping is authoritative at submission time; the rule catalog's
    /// own severity field is configuration metadata only.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::DatabaseConnectionLost | Self::SecurityBreach => Severity::Critical,
            Self::HighErrorRate | Self::AuthenticationFailureSpike | Self::ExternalServiceDown => {
                Severity::High
            }
            Self::DatabaseQuerySlow
            | Self::HighMemoryUsage
            | Self::TaskQueueBacklog
            | Self::DiskSpaceLow => Severity::Medium,
            Self::RateLimitExceeded => Severity::Low,
        }
    }

    /// Returns a static `snake_case` label for log fields and dedup keys.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DatabaseConnectionLost => "database_connection_lost",
            Self::DatabaseQuerySlow => "database_query_slow",
            Self::HighErrorRate => "high_error_rate",
            Self::HighMemoryUsage => "high_memory_usage",
            Self::SecurityBreach => "security_breach",
            Self::AuthenticationFailureSpike => "authentication_failure_spike",
            Self::ExternalServiceDown => "external_service_down",
            Self::TaskQueueBacklog => "task_queue_backlog",
            Self::DiskSpaceLow => "disk_space_low",
            Self::RateLimitExceeded => "rate_limit_exceeded",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single triggered notification record.
///
/// Created only by the alert service after an error event passes the
/// dedup/cooldown gate. Title, message, and metadata hold the
/// *post-masking* values; the unmasked originals are never retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Unique identifier for the alert.
    pub id: String,
    /// Severity resolved from the static taxonomy mapping.
    pub severity: Severity,
    /// Error type that raised the alert.
    pub error_type: ErrorType,
    /// Short human-readable title, masked.
    pub title: String,
    /// Descriptive message, masked.
    pub message: String,
    /// Free-form key/value context, masked.
    pub metadata: serde_json::Value,
    /// Timestamp when the alert was created.
    pub created_at: DateTime<Utc>,
    /// Correlation identifier of the originating request, if any.
    pub request_id: Option<String>,
    /// Whether the alert has been marked resolved.
    pub resolved: bool,
    /// Timestamp when the alert was resolved, if applicable.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Alert {
    /// Creates a new unresolved alert.
    #[must_use]
    pub fn new(
        id: String,
        error_type: ErrorType,
        severity: Severity,
        title: String,
        message: String,
        metadata: serde_json::Value,
        request_id: Option<String>,
    ) -> Self {
        Self {
            id,
            severity,
            error_type,
            title,
            message,
            metadata,
            created_at: Utc::now(),
            request_id,
            resolved: false,
            resolved_at: None,
        }
    }

    /// Marks the alert as resolved and stamps the resolution time.
    pub fn resolve(&mut self) {
        self.resolved = true;
        self.resolved_at = Some(Utc::now());
    }
}
