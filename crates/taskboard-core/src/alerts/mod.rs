//! Alert classification, policy, and dispatch.
//!
//! ## Components
//!
//! - **[`AlertService`]**: Orchestrator: classifies error events, applies
//!   the dedup/cooldown gate, masks sensitive data, stores the alert, and
//!   fans out to registered channels.
//! - **[`RuleCatalog`]**: Ordered table of alert rules with pure evaluation
//!   functions.
//! - **[`Alert`]**: A single triggered notification record.
//! - **[`ErrorType`]** / **[`Severity`]**: Closed error taxonomy with its
//!   static severity mapping.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use taskboard_core::alerts::{AlertService, ErrorType};
//! use taskboard_core::channels::ConsoleChannel;
//!
//! # async fn example() {
//! let service = AlertService::new();
//! service.register_channel(Arc::new(ConsoleChannel::new()));
//!
//! service
//!     .submit(
//!         ErrorType::SecurityBreach,
//!         "Breach",
//!         "Unauthorized access to project export",
//!         json!({ "userId": "u-1", "password": "abc123" }),
//!         Some("req-42".to_string()),
//!     )
//!     .await;
//! # }
//! ```

pub mod rules;
pub mod service;
pub mod types;

pub use rules::{
    evaluate_threshold, is_on_cooldown, should_trigger_alert, AlertRule, Comparison, RuleCatalog,
    Threshold,
};
pub use service::AlertService;
pub use types::{Alert, ErrorType, Severity};
