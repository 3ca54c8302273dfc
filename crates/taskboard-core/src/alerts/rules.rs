//! Alert rule catalog and pure evaluation functions.
//!
//! Rules are configuration data: the catalog is built once and never mutated
//! at runtime. Evaluation is side-effect free; all suppression state lives in
//! the alert service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{ErrorType, Severity};

/// Threshold a rule compares the observed value against.
///
/// Numeric thresholds may arrive from configuration as either a number or a
/// numeric string; both normalize to `f64` at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    /// Numeric threshold for ordered comparisons.
    Number(f64),
    /// Text threshold for substring containment.
    Text(String),
}

impl Threshold {
    /// Normalizes the threshold to a float, parsing numeric strings.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

/// Comparison operator applied between the observed value and the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    GreaterThan,
    LessThan,
    Equals,
    Contains,
}

/// A rule defining when an error type may raise an alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    /// Error type this rule applies to.
    pub error_type: ErrorType,
    /// Configured severity. Catalog metadata only: the static taxonomy
    /// mapping is authoritative when an alert is constructed.
    pub severity: Severity,
    /// Threshold the observed value is compared against.
    pub threshold: Threshold,
    /// Comparison operator.
    pub comparison: Comparison,
    /// Minimum seconds the condition must hold before triggering. Catalog
    /// metadata for the metrics collaborator; the core keeps no history.
    pub sustain_seconds: Option<u64>,
    /// Minimum seconds between two triggers of this rule. Zero disables the
    /// cooldown.
    pub cooldown_seconds: u64,
    /// Whether this rule is active.
    pub enabled: bool,
}

/// Ordered table of alert rules, at most one enabled rule per error type.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<AlertRule>,
}

impl RuleCatalog {
    /// Builds a catalog from an explicit rule list.
    #[must_use]
    pub fn new(rules: Vec<AlertRule>) -> Self {
        Self { rules }
    }

    /// Returns the first enabled rule for the error type.
    ///
    /// `None` means the type is unconfigured or disabled: record nothing,
    /// alert nothing.
    #[must_use]
    pub fn lookup_rule(&self, error_type: ErrorType) -> Option<&AlertRule> {
        self.rules.iter().find(|r| r.error_type == error_type && r.enabled)
    }

    /// All rules, in catalog order.
    #[must_use]
    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }
}

impl Default for RuleCatalog {
    /// The production catalog: one enabled rule per error type.
    fn default() -> Self {
        let rule = |error_type: ErrorType,
                    threshold: Threshold,
                    comparison: Comparison,
                    sustain_seconds: Option<u64>,
                    cooldown_seconds: u64| AlertRule {
            error_type,
            severity: error_type.severity(),
            threshold,
            comparison,
            sustain_seconds,
            cooldown_seconds,
            enabled: true,
        };

        Self::new(vec![
            // Security incidents always page; no cooldown.
            rule(
                ErrorType::SecurityBreach,
                Threshold::Number(0.0),
                Comparison::GreaterThan,
                None,
                0,
            ),
            rule(
                ErrorType::DatabaseConnectionLost,
                Threshold::Number(0.0),
                Comparison::GreaterThan,
                None,
                60,
            ),
            rule(
                ErrorType::HighErrorRate,
                Threshold::Number(0.05),
                Comparison::GreaterThan,
                Some(60),
                300,
            ),
            rule(
                ErrorType::AuthenticationFailureSpike,
                Threshold::Number(20.0),
                Comparison::GreaterThan,
                Some(60),
                300,
            ),
            rule(
                ErrorType::ExternalServiceDown,
                Threshold::Text("unreachable".to_string()),
                Comparison::Contains,
                None,
                300,
            ),
            rule(
                ErrorType::DatabaseQuerySlow,
                Threshold::Number(5000.0),
                Comparison::GreaterThan,
                Some(120),
                600,
            ),
            rule(
                ErrorType::HighMemoryUsage,
                Threshold::Number(0.9),
                Comparison::GreaterThan,
                Some(300),
                600,
            ),
            rule(
                ErrorType::TaskQueueBacklog,
                Threshold::Number(1000.0),
                Comparison::GreaterThan,
                Some(300),
                900,
            ),
            rule(
                ErrorType::DiskSpaceLow,
                Threshold::Number(0.1),
                Comparison::LessThan,
                None,
                3600,
            ),
            rule(
                ErrorType::RateLimitExceeded,
                Threshold::Number(100.0),
                Comparison::GreaterThan,
                Some(600),
                3600,
            ),
        ])
    }
}

/// Evaluates a rule's threshold against an observed value.
///
/// Numeric comparisons (`>`, `<`, `==`) normalize both sides to `f64`,
/// accepting numbers and numeric strings; non-numeric input fails the
/// comparison rather than erroring. `Contains` performs substring
/// containment on the string forms.
#[must_use]
pub fn evaluate_threshold(rule: &AlertRule, current: &Value) -> bool {
    match rule.comparison {
        Comparison::GreaterThan => compare_numeric(rule, current, |observed, t| observed > t),
        Comparison::LessThan => compare_numeric(rule, current, |observed, t| observed < t),
        Comparison::Equals => {
            compare_numeric(rule, current, |observed, t| (observed - t).abs() < f64::EPSILON)
        }
        Comparison::Contains => {
            let needle = match &rule.threshold {
                Threshold::Text(s) => s.as_str(),
                Threshold::Number(_) => return false,
            };
            match current {
                Value::String(s) => s.contains(needle),
                _ => false,
            }
        }
    }
}

fn compare_numeric(rule: &AlertRule, current: &Value, op: impl Fn(f64, f64) -> bool) -> bool {
    match (value_as_number(current), rule.threshold.as_number()) {
        (Some(observed), Some(threshold)) => op(observed, threshold),
        _ => false,
    }
}

/// Normalizes an observed JSON value to a float, parsing numeric strings.
fn value_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Returns `true` while the rule's cooldown window is still open.
///
/// A rule with cooldown 0, or a key that has never triggered, is never on
/// cooldown.
#[must_use]
pub fn is_on_cooldown(
    rule: &AlertRule,
    last_triggered: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    if rule.cooldown_seconds == 0 {
        return false;
    }
    let Some(last) = last_triggered else {
        return false;
    };
    let elapsed = now.signed_duration_since(last).num_seconds().max(0);
    #[allow(clippy::cast_sign_loss)]
    let elapsed = elapsed as u64;
    elapsed < rule.cooldown_seconds
}

/// Combined trigger decision: enabled, threshold met, and not on cooldown.
#[must_use]
pub fn should_trigger_alert(
    rule: &AlertRule,
    current: &Value,
    last_triggered: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    rule.enabled
        && evaluate_threshold(rule, current)
        && !is_on_cooldown(rule, last_triggered, now)
}
