//! # Triage Core
//!
//! Core business logic for the mammography triage worklist:
//! - Urgency classification and the queue ordering policy
//! - The in-memory queue store (`append` / `mark_complete` / `list`)
//! - Worklist filtering and pagination
//! - The case intake flow state machine
//!
//! **No API concerns**: HTTP servers, serialised request/response shapes
//! and the outbound report-service client belong in `api-rest` and
//! `report-gateway`.

pub mod case;
pub mod config;
pub mod demo;
pub mod error;
pub mod intake;
pub mod queue;
pub mod store;
pub mod urgency;
pub mod worklist;

pub use case::{Case, CaseStatus, UrgencyLevel};
pub use config::CoreConfig;
pub use error::{QueueError, QueueResult};
pub use intake::{IntakeError, IntakeFlow, NewCase, ReportDraft, ScanSubmission, SelectedScan};
pub use queue::present;
pub use store::{QueueService, QueueStats};
pub use urgency::{classify, score_percent, SCORE_MAX, SCORE_MIN};
