//! Interactive console delivery.

use async_trait::async_trait;

use super::{AlertChannel, ChannelError};
use crate::alerts::{Alert, Severity};

/// Writes a human-readable alert block to the local error stream.
///
/// Accepts every severity and never fails; it is the delivery floor every
/// deployment gets even with nothing else configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleChannel;

impl ConsoleChannel {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertChannel for ConsoleChannel {
    fn name(&self) -> &'static str {
        "console"
    }

    fn supports_severity(&self, _severity: Severity) -> bool {
        true
    }

    async fn send(&self, alert: &Alert) -> Result<(), ChannelError> {
        let request_line = alert
            .request_id
            .as_deref()
            .map(|id| format!("\nrequest:  {id}"))
            .unwrap_or_default();

        eprintln!(
            "\n==================== ALERT ====================\n\
             [{severity}] {title}\n\
             id:       {id}\n\
             type:     {error_type}\n\
             time:     {created_at}{request_line}\n\
             message:  {message}\n\
             metadata: {metadata}\n\
             ===============================================",
            severity = alert.severity.as_str().to_uppercase(),
            title = alert.title,
            id = alert.id,
            error_type = alert.error_type,
            created_at = alert.created_at.to_rfc3339(),
            message = alert.message,
            metadata = alert.metadata,
        );

        Ok(())
    }
}
