//! Case intake flow.
//!
//! Models the upload dialog as an explicit state machine: a scan is
//! selected, submitted to the report-generation service exactly once at a
//! time, and the generated report is either confirmed into the queue or
//! discarded. The transport call itself happens outside this type — the
//! caller takes the payload from [`IntakeFlow::begin_submission`], performs
//! the gateway call, and feeds the outcome back in. A result that arrives
//! after the flow moved on (the user navigated away) is dropped.

use base64::Engine;
use chrono::{DateTime, Local, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use triage_types::CaseId;

use crate::case::{Case, CaseStatus};
use crate::urgency::classify;

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("no scan selected")]
    NoScanSelected,
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("a generated report is awaiting confirmation")]
    AwaitingConfirmation,
    #[error("no generated report to confirm")]
    NotReadyToConfirm,
    #[error("no failed submission to retry")]
    NothingToRetry,
}

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;

/// A scan file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedScan {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedScan {
    /// Embeds the scan as a `data:` URI for inline display, mirroring the
    /// preview the dialog keeps while the file is selected.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// What the report-generation service produced for one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDraft {
    pub report: String,
    pub urgency_score: f64,
}

/// Form fields collected by the dialog. None are validated against any
/// domain rule; a blank identifier gets a generated placeholder at
/// confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeForm {
    pub patient_id: String,
    pub patient_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub notes: String,
}

/// The payload handed to the gateway for one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSubmission {
    pub scan: SelectedScan,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum IntakeState {
    Idle,
    FileSelected {
        scan: SelectedScan,
    },
    Submitting {
        scan: SelectedScan,
    },
    ReportReady {
        scan: SelectedScan,
        draft: ReportDraft,
    },
    SubmissionFailed {
        scan: SelectedScan,
        message: String,
    },
}

/// Upload dialog orchestration state machine.
///
/// `Idle` → `FileSelected` → `Submitting` → `ReportReady` or
/// `SubmissionFailed`; confirm appends-ready, back and cancel discard.
/// At most one submission is in flight per flow instance.
#[derive(Debug, Default)]
pub struct IntakeFlow {
    pub form: IntakeForm,
    state: IntakeState,
}

impl Default for IntakeState {
    fn default() -> Self {
        IntakeState::Idle
    }
}

impl IntakeFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chooses (or replaces) the scan to submit. Clears any previous
    /// failure message.
    pub fn select_file(&mut self, scan: SelectedScan) -> IntakeResult<()> {
        match self.state {
            IntakeState::Idle
            | IntakeState::FileSelected { .. }
            | IntakeState::SubmissionFailed { .. } => {
                self.state = IntakeState::FileSelected { scan };
                Ok(())
            }
            IntakeState::Submitting { .. } => Err(IntakeError::SubmissionInFlight),
            IntakeState::ReportReady { .. } => Err(IntakeError::AwaitingConfirmation),
        }
    }

    /// Drops the selected scan and returns to `Idle` (form fields kept).
    pub fn remove_file(&mut self) -> IntakeResult<()> {
        match self.state {
            IntakeState::Idle
            | IntakeState::FileSelected { .. }
            | IntakeState::SubmissionFailed { .. } => {
                self.state = IntakeState::Idle;
                Ok(())
            }
            IntakeState::Submitting { .. } => Err(IntakeError::SubmissionInFlight),
            IntakeState::ReportReady { .. } => Err(IntakeError::AwaitingConfirmation),
        }
    }

    /// Starts a submission, yielding the payload for the gateway call.
    ///
    /// # Errors
    ///
    /// [`IntakeError::NoScanSelected`] when nothing is selected,
    /// [`IntakeError::SubmissionInFlight`] while a previous submission is
    /// outstanding, [`IntakeError::AwaitingConfirmation`] once a report has
    /// been generated.
    pub fn begin_submission(&mut self) -> IntakeResult<ScanSubmission> {
        match std::mem::take(&mut self.state) {
            IntakeState::FileSelected { scan } => {
                let submission = self.submission_for(&scan);
                self.state = IntakeState::Submitting { scan };
                Ok(submission)
            }
            IntakeState::Idle => Err(IntakeError::NoScanSelected),
            state @ IntakeState::Submitting { .. } => {
                self.state = state;
                Err(IntakeError::SubmissionInFlight)
            }
            state @ IntakeState::ReportReady { .. } => {
                self.state = state;
                Err(IntakeError::AwaitingConfirmation)
            }
            state @ IntakeState::SubmissionFailed { .. } => {
                // A failed attempt is resubmitted through retry().
                self.state = state;
                Err(IntakeError::NothingToRetry)
            }
        }
    }

    /// Re-submits after a failure, with the same scan.
    pub fn retry(&mut self) -> IntakeResult<ScanSubmission> {
        match std::mem::take(&mut self.state) {
            IntakeState::SubmissionFailed { scan, .. } => {
                let submission = self.submission_for(&scan);
                self.state = IntakeState::Submitting { scan };
                Ok(submission)
            }
            state => {
                self.state = state;
                Err(IntakeError::NothingToRetry)
            }
        }
    }

    /// Records a successful gateway response. Ignored unless a submission
    /// is in flight — a late result after cancel is discarded.
    pub fn submission_succeeded(&mut self, draft: ReportDraft) {
        match std::mem::take(&mut self.state) {
            IntakeState::Submitting { scan } => {
                self.state = IntakeState::ReportReady { scan, draft };
            }
            state => {
                tracing::debug!("discarding report for an abandoned submission");
                self.state = state;
            }
        }
    }

    /// Records a failed gateway call, keeping the scan so the user can
    /// retry. Ignored unless a submission is in flight.
    pub fn submission_failed(&mut self, message: impl Into<String>) {
        match std::mem::take(&mut self.state) {
            IntakeState::Submitting { scan } => {
                self.state = IntakeState::SubmissionFailed {
                    scan,
                    message: message.into(),
                };
            }
            state => {
                tracing::debug!("discarding failure for an abandoned submission");
                self.state = state;
            }
        }
    }

    /// Discards the generated report and returns to the upload view.
    pub fn back(&mut self) -> IntakeResult<()> {
        match std::mem::take(&mut self.state) {
            IntakeState::ReportReady { scan, .. } => {
                self.state = IntakeState::FileSelected { scan };
                Ok(())
            }
            state => {
                self.state = state;
                Err(IntakeError::NotReadyToConfirm)
            }
        }
    }

    /// Confirms the generated report, producing the new case and resetting
    /// the flow to a fresh `Idle`. The caller appends the case to the
    /// queue store.
    pub fn confirm(&mut self, now: DateTime<Local>) -> IntakeResult<Case> {
        match std::mem::take(&mut self.state) {
            IntakeState::ReportReady { scan, draft } => {
                let form = std::mem::take(&mut self.form);
                let case = NewCase {
                    patient_id: non_blank(&form.patient_id),
                    patient_name: non_blank(&form.patient_name),
                    date_of_birth: form.date_of_birth,
                    report: draft.report,
                    urgency_score: draft.urgency_score,
                    image_data_uri: Some(scan.data_uri()),
                }
                .into_case(now);
                Ok(case)
            }
            state => {
                self.state = state;
                Err(IntakeError::NotReadyToConfirm)
            }
        }
    }

    /// Abandons the flow: all transient state is discarded.
    pub fn cancel(&mut self) {
        self.form = IntakeForm::default();
        self.state = IntakeState::Idle;
    }

    /// Message from the last failed submission, for the dismissible inline
    /// banner.
    pub fn failure_message(&self) -> Option<&str> {
        match &self.state {
            IntakeState::SubmissionFailed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// True while a submission is outstanding (the UI disables resubmission).
    pub fn is_submitting(&self) -> bool {
        matches!(self.state, IntakeState::Submitting { .. })
    }

    fn submission_for(&self, scan: &SelectedScan) -> ScanSubmission {
        ScanSubmission {
            scan: scan.clone(),
            notes: non_blank(&self.form.notes),
        }
    }
}

/// Everything needed to construct a queued case from a confirmed report.
///
/// Shared between [`IntakeFlow::confirm`] and the REST confirmation
/// endpoint so both produce identical records.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCase {
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub report: String,
    pub urgency_score: f64,
    pub image_data_uri: Option<String>,
}

impl NewCase {
    /// Builds the queued record: placeholder identifier when none was
    /// given, age derived from the date of birth (else 0), severity band
    /// classified from the score and frozen, status `Pending`.
    pub fn into_case(self, now: DateTime<Local>) -> Case {
        let case_id = self
            .patient_id
            .as_deref()
            .and_then(|id| CaseId::new(id).ok())
            .unwrap_or_else(placeholder_case_id);

        Case {
            case_id,
            patient_name: self.patient_name,
            sex: "Female".into(),
            age: self
                .date_of_birth
                .map(|dob| age_in_years(dob, now))
                .unwrap_or(0),
            urgency_level: classify(self.urgency_score),
            urgency_score: Some(self.urgency_score),
            status: CaseStatus::Pending,
            time_added: now.format("%-I:%M %p").to_string(),
            image_url: self.image_data_uri,
            report: Some(self.report),
        }
    }
}

fn non_blank(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Whole years between the date of birth and now, in mean solar years.
fn age_in_years(date_of_birth: NaiveDate, now: DateTime<Local>) -> u32 {
    let days = (now.date_naive() - date_of_birth).num_days();
    (days as f64 / 365.25).floor().max(0.0) as u32
}

/// Generated identifier for cases queued without one, e.g. `#482-17`.
fn placeholder_case_id() -> CaseId {
    let mut rng = rand::thread_rng();
    let id = format!(
        "#{}-{}",
        rng.gen_range(100..1000),
        rng.gen_range(0..1000u32)
    );
    CaseId::new(id).expect("generated placeholder is never empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scan() -> SelectedScan {
        SelectedScan {
            filename: "scan.png".into(),
            content_type: "image/png".into(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    fn draft() -> ReportDraft {
        ReportDraft {
            report: "Findings: scattered fibroglandular densities.".into(),
            urgency_score: 26.5,
        }
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 12, 5, 0).unwrap()
    }

    #[test]
    fn happy_path_produces_a_pending_case_with_classified_level() {
        let mut flow = IntakeFlow::new();
        flow.form.patient_id = "#310-4".into();
        flow.form.patient_name = "Sarah Williams".into();
        flow.select_file(scan()).expect("select");

        let submission = flow.begin_submission().expect("begin");
        assert_eq!(submission.scan.filename, "scan.png");
        assert_eq!(submission.notes, None);
        assert!(flow.is_submitting());

        flow.submission_succeeded(draft());
        let case = flow.confirm(noon()).expect("confirm");

        assert_eq!(case.case_id.as_str(), "#310-4");
        assert_eq!(case.patient_name.as_deref(), Some("Sarah Williams"));
        assert_eq!(case.status, CaseStatus::Pending);
        assert_eq!(case.urgency_score, Some(26.5));
        assert_eq!(case.urgency_level, crate::case::UrgencyLevel::Critical);
        assert_eq!(case.time_added, "12:05 PM");
        assert!(case
            .image_url
            .as_deref()
            .expect("embedded image")
            .starts_with("data:image/png;base64,"));

        // The flow is back to a fresh Idle.
        assert!(matches!(flow.begin_submission(), Err(IntakeError::NoScanSelected)));
        assert_eq!(flow.form, IntakeForm::default());
    }

    #[test]
    fn notes_are_trimmed_and_blank_notes_are_omitted() {
        let mut flow = IntakeFlow::new();
        flow.form.notes = "  family history of breast cancer  ".into();
        flow.select_file(scan()).expect("select");
        let submission = flow.begin_submission().expect("begin");
        assert_eq!(
            submission.notes.as_deref(),
            Some("family history of breast cancer")
        );

        let mut blank = IntakeFlow::new();
        blank.form.notes = "   ".into();
        blank.select_file(scan()).expect("select");
        assert_eq!(blank.begin_submission().expect("begin").notes, None);
    }

    #[test]
    fn submission_requires_a_selected_scan() {
        let mut flow = IntakeFlow::new();
        assert!(matches!(
            flow.begin_submission(),
            Err(IntakeError::NoScanSelected)
        ));
    }

    #[test]
    fn only_one_submission_in_flight() {
        let mut flow = IntakeFlow::new();
        flow.select_file(scan()).expect("select");
        flow.begin_submission().expect("begin");
        assert!(matches!(
            flow.begin_submission(),
            Err(IntakeError::SubmissionInFlight)
        ));
        assert!(matches!(
            flow.select_file(scan()),
            Err(IntakeError::SubmissionInFlight)
        ));
    }

    #[test]
    fn failure_is_retryable_with_the_same_scan() {
        let mut flow = IntakeFlow::new();
        flow.select_file(scan()).expect("select");
        flow.begin_submission().expect("begin");
        flow.submission_failed("report service rejected the request");

        assert_eq!(
            flow.failure_message(),
            Some("report service rejected the request")
        );
        let resubmission = flow.retry().expect("retry");
        assert_eq!(resubmission.scan, scan());
        assert!(flow.is_submitting());
    }

    #[test]
    fn back_discards_the_draft_but_keeps_the_scan() {
        let mut flow = IntakeFlow::new();
        flow.select_file(scan()).expect("select");
        flow.begin_submission().expect("begin");
        flow.submission_succeeded(draft());

        flow.back().expect("back");
        assert!(matches!(flow.confirm(noon()), Err(IntakeError::NotReadyToConfirm)));
        // The scan is still selected, so a new submission can start.
        flow.begin_submission().expect("resubmit");
    }

    #[test]
    fn cancel_discards_everything_and_late_results_are_dropped() {
        let mut flow = IntakeFlow::new();
        flow.form.patient_id = "#1".into();
        flow.select_file(scan()).expect("select");
        flow.begin_submission().expect("begin");

        flow.cancel();
        assert_eq!(flow.form, IntakeForm::default());

        // The in-flight result eventually arrives and is discarded.
        flow.submission_succeeded(draft());
        assert!(matches!(flow.confirm(noon()), Err(IntakeError::NotReadyToConfirm)));
    }

    #[test]
    fn blank_identifier_gets_a_generated_placeholder() {
        let case = NewCase {
            patient_id: None,
            patient_name: None,
            date_of_birth: None,
            report: "Findings: none.".into(),
            urgency_score: 2.0,
            image_data_uri: None,
        }
        .into_case(noon());

        let id = case.case_id.as_str();
        assert!(id.starts_with('#'), "placeholder starts with '#': {id}");
        assert!(id.contains('-'), "placeholder contains '-': {id}");
        assert_eq!(case.age, 0);
    }

    #[test]
    fn age_is_derived_from_the_date_of_birth() {
        let case = NewCase {
            patient_id: Some("#9".into()),
            patient_name: None,
            date_of_birth: Some(NaiveDate::from_ymd_opt(1980, 3, 20).unwrap()),
            report: "Findings: none.".into(),
            urgency_score: 2.0,
            image_data_uri: None,
        }
        .into_case(noon());
        assert_eq!(case.age, 45);
    }

    #[test]
    fn future_date_of_birth_clamps_to_zero() {
        let case = NewCase {
            patient_id: Some("#10".into()),
            patient_name: None,
            date_of_birth: Some(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()),
            report: "Findings: none.".into(),
            urgency_score: 2.0,
            image_data_uri: None,
        }
        .into_case(noon());
        assert_eq!(case.age, 0);
    }
}
