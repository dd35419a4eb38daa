//! Queue ordering policy.
//!
//! The presented queue order is a pure derivation over a snapshot of the
//! stored cases, recomputed on every read. Keeping it derived (rather than
//! cached or written back) means the stored and presented status can never
//! diverge.

use crate::case::{Case, CaseStatus};

/// Sort key for urgency ordering: unscored cases rank below every scored
/// one.
fn urgency_key(case: &Case) -> f64 {
    case.urgency_score.unwrap_or(f64::NEG_INFINITY)
}

/// Derives the presented queue from a snapshot of the stored cases.
///
/// 1. Stable sort by urgency score descending; `None` scores sort after all
///    scored cases; ties keep their input order.
/// 2. One forward pass assigns the single in-progress slot: the first
///    non-complete case becomes `InProgress`, any other non-complete case
///    still carrying `InProgress` is demoted to `Pending`, and complete
///    cases pass through unchanged.
///
/// Invariant: the result contains exactly one `InProgress` case when at
/// least one non-complete case exists, and none otherwise.
pub fn present(cases: &[Case]) -> Vec<Case> {
    let mut ordered: Vec<Case> = cases.to_vec();
    ordered.sort_by(|a, b| urgency_key(b).total_cmp(&urgency_key(a)));

    let mut assigned_in_progress = false;
    for case in &mut ordered {
        if case.status == CaseStatus::Complete {
            continue;
        }
        if !assigned_in_progress {
            assigned_in_progress = true;
            case.status = CaseStatus::InProgress;
        } else if case.status == CaseStatus::InProgress {
            case.status = CaseStatus::Pending;
        }
    }

    ordered
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
            age: 48,
            urgency_score: score,
            urgency_level: score.map(crate::urgency::classify).unwrap_or(UrgencyLevel::Low),
            status,
            time_added: "9:15 AM".into(),
            image_url: None,
            report: None,
        }
    }

    fn ids(cases: &[Case]) -> Vec<&str> {
        cases.iter().map(|c| c.case_id.as_str()).collect()
    }

    #[test]
    fn orders_by_score_descending_with_unscored_last() {
        let presented = present(&[
            case("low", Some(3.0), CaseStatus::Pending),
            case("none", None, CaseStatus::Pending),
            case("high", Some(31.0), CaseStatus::Pending),
        ]);
        assert_eq!(ids(&presented), vec!["high", "low", "none"]);
    }

    #[test]
    fn first_non_complete_takes_the_in_progress_slot() {
        let presented = present(&[
            case("a", Some(30.0), CaseStatus::Pending),
            case("b", Some(10.0), CaseStatus::Pending),
            case("c", None, CaseStatus::Complete),
        ]);
        assert_eq!(ids(&presented), vec!["a", "b", "c"]);
        assert_eq!(presented[0].status, CaseStatus::InProgress);
        assert_eq!(presented[1].status, CaseStatus::Pending);
        assert_eq!(presented[2].status, CaseStatus::Complete);
    }

    #[test]
    fn exactly_one_in_progress_among_non_complete() {
        let presented = present(&[
            case("a", Some(12.0), CaseStatus::InProgress),
            case("b", Some(28.0), CaseStatus::InProgress),
            case("c", Some(5.0), CaseStatus::Pending),
        ]);
        let in_progress = presented
            .iter()
            .filter(|c| c.status == CaseStatus::InProgress)
            .count();
        assert_eq!(in_progress, 1);
        // The slot follows the presented order, not the stored flags.
        assert_eq!(presented[0].case_id.as_str(), "b");
        assert_eq!(presented[0].status, CaseStatus::InProgress);
    }

    #[test]
    fn no_in_progress_when_everything_is_complete() {
        let mut complete = case("a", None, CaseStatus::Complete);
        complete.urgency_score = None;
        let presented = present(&[complete, case("b", None, CaseStatus::Complete)]);
        assert!(presented.iter().all(|c| c.status == CaseStatus::Complete));
    }

    #[test]
    fn empty_input_presents_empty() {
        assert!(present(&[]).is_empty());
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let presented = present(&[
            case("first", Some(20.0), CaseStatus::Pending),
            case("second", Some(20.0), CaseStatus::Pending),
            case("third", Some(20.0), CaseStatus::Pending),
        ]);
        assert_eq!(ids(&presented), vec!["first", "second", "third"]);
    }

    #[test]
    fn unscored_cases_keep_input_order_among_themselves() {
        let presented = present(&[
            case("n1", None, CaseStatus::Pending),
            case("n2", None, CaseStatus::Pending),
            case("scored", Some(1.0), CaseStatus::Pending),
        ]);
        assert_eq!(ids(&presented), vec!["scored", "n1", "n2"]);
    }

    #[test]
    fn complete_cases_keep_their_status_and_position_in_score_order() {
        // A completed case has no score, so it sorts with the unscored tail
        // but is never pulled into the in-progress slot.
        let presented = present(&[
            case("done", None, CaseStatus::Complete),
            case("open", None, CaseStatus::Pending),
        ]);
        assert_eq!(ids(&presented), vec!["done", "open"]);
        assert_eq!(presented[0].status, CaseStatus::Complete);
        assert_eq!(presented[1].status, CaseStatus::InProgress);
    }
}
