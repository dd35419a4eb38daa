//! Request and response shapes for the REST surface.
//!
//! These are wire types: flat, string-typed where the core uses enums, and
//! derived from the presented queue snapshot. Domain rules live in
//! `triage-core`; nothing here mutates state.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use triage_core::case::Case;
use triage_core::store::QueueStats;
use triage_core::urgency::score_percent;
use triage_core::worklist::{action_label, WorklistPage};

/// One row of the worklist table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorklistRow {
    pub case_id: String,
    pub patient_name: Option<String>,
    pub sex: String,
    pub age: u32,
    /// `null` once the case is complete (or scoring failed)
    pub urgency_score: Option<f64>,
    /// Position of the score within the nominal [-3, 40] range, for the
    /// urgency bar; absent when unscored
    pub urgency_percent: Option<u8>,
    pub urgency_level: String,
    pub status: String,
    pub status_label: String,
    pub time_added: String,
    /// Row action caption ("Review Case", "Continue", "Archived")
    pub action: String,
    /// Completed rows are shown but cannot be opened for review
    pub actionable: bool,
}

impl WorklistRow {
    pub fn from_case(case: &Case) -> Self {
        Self {
            case_id: case.case_id.to_string(),
            patient_name: case.patient_name.clone(),
            sex: case.sex.clone(),
            age: case.age,
            urgency_score: case.urgency_score,
            urgency_percent: case.urgency_score.map(score_percent),
            urgency_level: case.urgency_level.to_string(),
            status: case.status.as_str().to_owned(),
            status_label: case.status.label().to_owned(),
            time_added: case.time_added.clone(),
            action: action_label(case.status).to_owned(),
            actionable: !case.is_complete(),
        }
    }
}

/// One page of the worklist, with the table footer figures.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorklistRes {
    pub rows: Vec<WorklistRow>,
    pub page: usize,
    pub total_pages: usize,
    pub total_filtered: usize,
    /// One-based index of the first row shown; 0 when nothing matched
    pub start_index: usize,
    pub end_index: usize,
}

impl From<WorklistPage> for WorklistRes {
    fn from(page: WorklistPage) -> Self {
        Self {
            rows: page.cases.iter().map(WorklistRow::from_case).collect(),
            page: page.page,
            total_pages: page.total_pages,
            total_filtered: page.total_filtered,
            start_index: page.start_index,
            end_index: page.end_index,
        }
    }
}

/// Dashboard stat card counts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueueStatsRes {
    pub pending: usize,
    pub completed: usize,
}

impl From<QueueStats> for QueueStatsRes {
    fn from(stats: QueueStats) -> Self {
        Self {
            pending: stats.pending,
            completed: stats.completed,
        }
    }
}

/// Full case detail for the review view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaseRes {
    pub case_id: String,
    pub patient_name: Option<String>,
    pub sex: String,
    pub age: u32,
    pub urgency_score: Option<f64>,
    pub urgency_percent: Option<u8>,
    pub urgency_level: String,
    pub status: String,
    pub time_added: String,
    pub image_url: Option<String>,
    pub report: Option<String>,
}

impl CaseRes {
    pub fn from_case(case: &Case) -> Self {
        Self {
            case_id: case.case_id.to_string(),
            patient_name: case.patient_name.clone(),
            sex: case.sex.clone(),
            age: case.age,
            urgency_score: case.urgency_score,
            urgency_percent: case.urgency_score.map(score_percent),
            urgency_level: case.urgency_level.to_string(),
            status: case.status.as_str().to_owned(),
            time_added: case.time_added.clone(),
            image_url: case.image_url.clone(),
            report: case.report.clone(),
        }
    }
}

/// One tile of the scan archive grid.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArchiveScanRes {
    pub case_id: String,
    pub sex: String,
    pub age: u32,
    pub time_added: String,
    pub image_url: String,
}

/// All uploaded scans that carry an image, in presented order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArchiveRes {
    pub scans: Vec<ArchiveScanRes>,
}

/// Result of a successful report generation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateReportRes {
    pub report: String,
    pub urgency_score: f64,
}

/// Schema of the multipart form accepted by `POST /reports`.
#[derive(ToSchema)]
pub struct GenerateReportForm {
    /// Scan image file
    #[schema(value_type = String, format = Binary)]
    pub image: String,
    /// Optional clinical notes forwarded to the analysis service
    pub notes: Option<String>,
}

/// Confirmation of a generated report into the queue.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfirmCaseReq {
    /// Blank or absent gets a generated placeholder identifier
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    /// ISO date (`YYYY-MM-DD`); drives the derived age
    pub date_of_birth: Option<String>,
    pub report: String,
    pub urgency_score: f64,
    /// Scan preview as a `data:` URI
    pub image_data_uri: Option<String>,
}

/// Acknowledgement of a completed review.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompleteCaseRes {
    pub success: bool,
}
