//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! services. The intent is to avoid reading process-wide environment
//! variables during request handling, which can lead to inconsistent
//! behaviour in multi-threaded runtimes and test harnesses.

use crate::error::{QueueError, QueueResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    report_api_url: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `report_api_url` is the base URL of the report-generation service
    /// (the `/report` path is appended per call); a trailing slash is
    /// trimmed so both spellings behave identically.
    pub fn new(report_api_url: impl Into<String>) -> QueueResult<Self> {
        let report_api_url = report_api_url.into();
        let trimmed = report_api_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(QueueError::InvalidInput(
                "report_api_url cannot be empty".into(),
            ));
        }

        Ok(Self {
            report_api_url: trimmed.to_owned(),
        })
    }

    pub fn report_api_url(&self) -> &str {
        &self.report_api_url
    }
}
