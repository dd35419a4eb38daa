//! In-memory queue store.
//!
//! `QueueService` owns the backing list of cases and is the only mutation
//! surface. It is constructed once at startup and shared across handlers;
//! reads derive the presented order fresh on every call via
//! [`crate::queue::present`]. State lives for the life of the process only.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::case::{Case, CaseStatus};
use crate::error::{QueueError, QueueResult};
use crate::queue::present;

/// Headline counts for the dashboard stat cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct QueueStats {
    /// Cases still awaiting review (pending or in progress)
    pub pending: usize,
    /// Cases marked complete
    pub completed: usize,
}

/// Owned, in-memory case store.
#[derive(Debug, Default)]
pub struct QueueService {
    cases: RwLock<Vec<Case>>,
}

impl QueueService {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given cases, in insertion order.
    ///
    /// Used by demo seeding and tests; duplicates among the seed are the
    /// seeder's responsibility.
    pub fn with_cases(cases: Vec<Case>) -> Self {
        Self {
            cases: RwLock::new(cases),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Case>> {
        // A poisoned lock only means another handler panicked mid-update;
        // the data itself is still a valid list of cases.
        self.cases.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Case>> {
        self.cases.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a new case to the end of the backing list.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::DuplicateCaseId`] when a case with the same
    /// identifier is already queued.
    pub fn append(&self, case: Case) -> QueueResult<()> {
        let mut cases = self.write();
        if cases.iter().any(|c| c.case_id == case.case_id) {
            return Err(QueueError::DuplicateCaseId(case.case_id));
        }
        tracing::info!(case_id = %case.case_id, "case queued");
        cases.push(case);
        Ok(())
    }

    /// Marks the identified case complete and clears its urgency score.
    ///
    /// Completing an already-complete case is a no-op success, so the
    /// operation is idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::CaseNotFound`] when no queued case carries the
    /// identifier.
    pub fn mark_complete(&self, case_id: &str) -> QueueResult<()> {
        let mut cases = self.write();
        let case = cases
            .iter_mut()
            .find(|c| c.case_id.as_str() == case_id)
            .ok_or_else(|| QueueError::CaseNotFound(case_id.to_owned()))?;

        case.status = CaseStatus::Complete;
        case.urgency_score = None;
        tracing::info!(case_id, "case marked complete");
        Ok(())
    }

    /// Returns one case as presented, or `None` when the identifier is
    /// unknown.
    pub fn get(&self, case_id: &str) -> Option<Case> {
        self.list()
            .into_iter()
            .find(|c| c.case_id.as_str() == case_id)
    }

    /// Returns the presented queue, recomputed from the backing list on
    /// every call.
    pub fn list(&self) -> Vec<Case> {
        present(&self.read())
    }

    /// Pending / completed counts over the backing list.
    pub fn stats(&self) -> QueueStats {
        let cases = self.read();
        let completed = cases.iter().filter(|c| c.is_complete()).count();
        QueueStats {
            pending: cases.len() - completed,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::UrgencyLevel;
    use triage_types::CaseId;

    fn case(id: &str, score: Option<f64>, status: CaseStatus) -> Case {
        Case {
            case_id: CaseId::new(id).expect("valid id"),
            patient_name: None,
            sex: "Female".into(),
            age: 52,
            urgency_score: score,
            urgency_level: UrgencyLevel::Medium,
            status,
            time_added: "11:40 AM".into(),
            image_url: None,
            report: None,
        }
    }

    #[test]
    fn append_rejects_duplicate_identifiers() {
        let store = QueueService::new();
        store
            .append(case("#101-1", Some(9.0), CaseStatus::Pending))
            .expect("first append");
        let err = store
            .append(case("#101-1", Some(20.0), CaseStatus::Pending))
            .expect_err("duplicate append");
        assert!(matches!(err, QueueError::DuplicateCaseId(_)));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn mark_complete_clears_the_score() {
        let store = QueueService::with_cases(vec![case("#7", Some(18.0), CaseStatus::Pending)]);
        store.mark_complete("#7").expect("mark complete");

        let stored = store.get("#7").expect("case present");
        assert_eq!(stored.status, CaseStatus::Complete);
        assert_eq!(stored.urgency_score, None);
        // The band stays as the record of the original severity.
        assert_eq!(stored.urgency_level, UrgencyLevel::Medium);
    }

    #[test]
    fn mark_complete_is_idempotent() {
        let store = QueueService::with_cases(vec![case("#7", Some(18.0), CaseStatus::Pending)]);
        store.mark_complete("#7").expect("first call");
        let after_first = store.list();
        store.mark_complete("#7").expect("second call");
        assert_eq!(store.list(), after_first);
    }

    #[test]
    fn mark_complete_signals_unknown_identifiers() {
        let store = QueueService::new();
        let err = store.mark_complete("#missing").expect_err("unknown id");
        assert!(matches!(err, QueueError::CaseNotFound(_)));
    }

    #[test]
    fn list_reflects_mutations_on_the_next_read() {
        let store = QueueService::new();
        store
            .append(case("a", Some(30.0), CaseStatus::Pending))
            .expect("append a");
        store
            .append(case("b", Some(10.0), CaseStatus::Pending))
            .expect("append b");

        assert_eq!(store.list()[0].status, CaseStatus::InProgress);

        store.mark_complete("a").expect("complete a");
        let listed = store.list();
        // "a" lost its score, so "b" leads and takes the slot.
        assert_eq!(listed[0].case_id.as_str(), "b");
        assert_eq!(listed[0].status, CaseStatus::InProgress);
        assert_eq!(listed[1].status, CaseStatus::Complete);
    }

    #[test]
    fn stats_split_pending_from_completed() {
        let store = QueueService::with_cases(vec![
            case("a", Some(30.0), CaseStatus::Pending),
            case("b", Some(10.0), CaseStatus::InProgress),
            case("c", None, CaseStatus::Complete),
        ]);
        assert_eq!(
            store.stats(),
            QueueStats {
                pending: 2,
                completed: 1
            }
        );
    }
}
