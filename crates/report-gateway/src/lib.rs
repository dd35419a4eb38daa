//! # Report Gateway
//!
//! Client for the external report-generation service: one outbound call
//! that turns an uploaded scan (plus optional clinical notes) into a
//! generated report and an urgency score.
//!
//! The request is a multipart POST with an `image` part and an optional
//! `notes` part; the success response is JSON with `report` and
//! `urgency_score` fields. There is no retry policy here — resubmission is
//! the caller's decision — and no timeout beyond the transport's own.

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

use triage_core::config::CoreConfig;
use triage_core::intake::{ReportDraft, ScanSubmission};

/// Fallback shown when the service failed without a usable message.
const GENERIC_FAILURE: &str = "report generation failed";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("report service unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("report service error ({status}): {message}")]
    Server { status: StatusCode, message: String },
}

impl GatewayError {
    /// The message to surface to the user in the intake dialog.
    pub fn surface_message(&self) -> String {
        match self {
            GatewayError::Transport(_) => GENERIC_FAILURE.to_owned(),
            GatewayError::Server { message, .. } => message.clone(),
        }
    }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Client for the report-generation endpoint.
#[derive(Debug, Clone)]
pub struct ReportClient {
    report_url: String,
    client: reqwest::Client,
}

impl ReportClient {
    /// Creates a client for the service at the given API base URL
    /// (the `/report` path is appended).
    pub fn new(api_base_url: impl Into<String>) -> Self {
        let base = api_base_url.into();
        Self {
            report_url: format!("{}/report", base.trim_end_matches('/')),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(cfg.report_api_url())
    }

    /// Submits one scan for report generation.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Transport`] when the service is unreachable or the
    /// success body cannot be decoded; [`GatewayError::Server`] on a
    /// non-2xx response, carrying the service's `detail` message when it
    /// sent one.
    pub async fn submit(&self, submission: ScanSubmission) -> GatewayResult<ReportDraft> {
        let ScanSubmission { scan, notes } = submission;

        let image = Part::bytes(scan.bytes)
            .file_name(scan.filename)
            .mime_str(&scan.content_type)
            .map_err(GatewayError::Transport)?;
        let mut form = Form::new().part("image", image);
        if let Some(notes) = notes {
            form = form.text("notes", notes);
        }

        let response = self
            .client
            .post(&self.report_url)
            .multipart(form)
            .send()
            .await
            .map_err(GatewayError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = server_message(&body).unwrap_or_else(|| GENERIC_FAILURE.to_owned());
            tracing::warn!(%status, %message, "report service returned an error");
            return Err(GatewayError::Server { status, message });
        }

        response
            .json::<ReportDraft>()
            .await
            .map_err(GatewayError::Transport)
    }
}

/// Extracts a human-readable message from an error response body.
///
/// The report service reports failures as JSON `{"detail": "..."}`; a
/// non-JSON body is used as-is when non-empty.
fn server_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return Some(detail.to_owned());
        }
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
