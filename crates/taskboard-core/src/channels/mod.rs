//! Alert delivery channels.
//!
//! Every backend implements [`AlertChannel`]; the alert service filters the
//! registered list by [`AlertChannel::supports_severity`] and dispatches to
//! all matches concurrently. A failing channel affects nobody but itself.

pub mod console;
pub mod email;
pub mod pagerduty;
pub mod slack;

pub use console::ConsoleChannel;
pub use email::EmailChannel;
pub use pagerduty::PagerDutyChannel;
pub use slack::SlackChannel;

use async_trait::async_trait;
use thiserror::Error;

use crate::alerts::{Alert, Severity};

/// Errors a channel send can fail with.
///
/// Configuration errors surface here rather than at construction so that a
/// partially configured deployment still delivers through its remaining
/// channels.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChannelError {
    /// The channel is missing a required credential or endpoint.
    #[error("channel not configured: {0}")]
    NotConfigured(&'static str),

    /// Network-level error from the underlying HTTP client.
    #[error("delivery request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The delivery endpoint answered with a non-success status.
    #[error("delivery endpoint returned status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The email channel has no recipients configured.
    #[error("no recipients configured")]
    NoRecipients,
}

/// A delivery backend for alerts, gated by severity.
#[async_trait]
pub trait AlertChannel: Send + Sync {
    /// Stable channel name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this channel accepts alerts of the given severity.
    fn supports_severity(&self, severity: Severity) -> bool;

    /// Delivers the alert. Best-effort: no retry is attempted by the caller.
    async fn send(&self, alert: &Alert) -> Result<(), ChannelError>;
}

/// Truncates a response body for inclusion in an error.
pub(crate) fn truncate_body(mut body: String) -> String {
    const MAX: usize = 256;
    if body.len() > MAX {
        let mut cut = MAX;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("... (truncated)");
    }
    body
}
