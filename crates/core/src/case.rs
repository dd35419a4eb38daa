//! The queued case record and its ordinal attributes.
//!
//! A [`Case`] is one patient's queued mammography review record. It is
//! created by the intake flow after a successful report generation (or by
//! demo seeding), mutated only by [`crate::store::QueueService::mark_complete`],
//! and never deleted.

use serde::{Deserialize, Serialize};
use triage_types::CaseId;

/// Ordinal severity band derived once from the urgency score.
///
/// The band is frozen at case creation. Completing a case nulls the score
/// but leaves the band as a record of the severity at intake time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            UrgencyLevel::Critical => "critical",
            UrgencyLevel::High => "high",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::Low => "low",
        };
        write!(f, "{label}")
    }
}

/// Review state of a queued case.
///
/// Forward progressing only: Pending → InProgress → Complete, or Pending →
/// Complete directly. There is no transition out of Complete. The InProgress
/// slot is assigned on read by [`crate::queue::present`], not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStatus {
    Pending,
    InProgress,
    Complete,
}

impl CaseStatus {
    pub fn is_complete(self) -> bool {
        matches!(self, CaseStatus::Complete)
    }

    /// Wire value, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            CaseStatus::Pending => "pending",
            CaseStatus::InProgress => "in-progress",
            CaseStatus::Complete => "complete",
        }
    }

    /// Human-readable badge label.
    pub fn label(self) -> &'static str {
        match self {
            CaseStatus::Pending => "Pending",
            CaseStatus::InProgress => "In Progress",
            CaseStatus::Complete => "Complete",
        }
    }
}

/// One patient's queued mammography review record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Opaque identifier, unique within the store
    pub case_id: CaseId,
    /// Optional display name
    pub patient_name: Option<String>,
    /// Descriptive attribute, not validated against any domain rule
    pub sex: String,
    /// Age in whole years; 0 when no date of birth was supplied
    pub age: u32,
    /// Urgency score in the nominal range [-3, 40]; `None` means "not
    /// scored" (completed, or scoring failed)
    pub urgency_score: Option<f64>,
    /// Severity band derived from the score at creation, frozen thereafter
    pub urgency_level: UrgencyLevel,
    /// Review state; see [`CaseStatus`]
    pub status: CaseStatus,
    /// Display timestamp ("2:05 PM"), set once at creation
    pub time_added: String,
    /// Scan image reference, typically an embedded `data:` URI
    pub image_url: Option<String>,
    /// Generated narrative, immutable once set
    pub report: Option<String>,
}

impl Case {
    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }
}
