use triage_types::CaseId;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("a case with identifier '{0}' is already queued")]
    DuplicateCaseId(CaseId),
    #[error("no queued case with identifier '{0}'")]
    CaseNotFound(String),
}

pub type QueueResult<T> = std::result::Result<T, QueueError>;
