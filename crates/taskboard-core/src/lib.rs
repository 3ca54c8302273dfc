//! # Taskboard Core
//!
//! Alerting and sensitive-data-masking pipeline for the Taskboard project
//! tracker.
//!
//! This crate provides the components the rest of the application calls into
//! when an operational error condition needs to reach a human:
//!
//! - **[`alerts`]**: Error taxonomy, rule catalog, and the [`AlertService`]
//!   orchestrator that classifies incoming error events, deduplicates them,
//!   and fans them out to delivery channels.
//!
//! - **[`masking`]**: Recursive, depth-bounded, cycle-safe sanitization of
//!   alert metadata plus pattern-based scrubbing of free-form text, so no
//!   secret leaves the process inside a notification.
//!
//! - **[`channels`]**: Interchangeable delivery backends (console, PagerDuty,
//!   Slack, email) behind a single severity-gated trait.
//!
//! - **[`config`](crate::config)**: Environment-backed channel configuration,
//!   loaded once at startup.
//!
//! ## Pipeline
//!
//! ```text
//! business logic ──► AlertService::submit
//!                        │ severity lookup (static taxonomy)
//!                        │ rule lookup (silent drop if unconfigured)
//!                        │ dedup / cooldown gate
//!                        │ masking (metadata + title + message)
//!                        │ in-memory persistence
//!                        ▼
//!                  concurrent fan-out ──► console / PagerDuty / Slack / email
//!                  (one failure never blocks the others)
//! ```
//!
//! Alert storage is process-lifetime only: records are evicted once older
//! than 24 hours, opportunistically on each submission. There is no retry
//! and no delivery guarantee; channels are best-effort side-channels.
//!
//! [`AlertService`]: alerts::AlertService

pub mod alerts;
pub mod channels;
pub mod config;
pub mod masking;
