//! Demo worklist seeding.
//!
//! A small, fixed set of cases so a fresh instance renders a populated
//! dashboard. Only loaded when the runtime asks for it; the store starts
//! empty otherwise.

use triage_types::CaseId;

use crate::case::{Case, CaseStatus, UrgencyLevel};
use crate::urgency::classify;

fn seeded(
    id: &str,
    name: Option<&str>,
    age: u32,
    score: Option<f64>,
    level: UrgencyLevel,
    status: CaseStatus,
    time_added: &str,
) -> Case {
    Case {
        case_id: CaseId::new(id).expect("seed identifiers are non-empty"),
        patient_name: name.map(str::to_owned),
        sex: "Female".into(),
        age,
        urgency_score: score,
        urgency_level: level,
        status,
        time_added: time_added.into(),
        image_url: None,
        report: None,
    }
}

/// The demo worklist, in insertion order.
pub fn demo_cases() -> Vec<Case> {
    vec![
        seeded(
            "#204-17",
            Some("Margaret Chen"),
            67,
            Some(31.0),
            classify(31.0),
            CaseStatus::Pending,
            "8:12 AM",
        ),
        seeded(
            "#198-03",
            Some("Patricia Okafor"),
            54,
            Some(22.5),
            classify(22.5),
            CaseStatus::Pending,
            "8:27 AM",
        ),
        seeded(
            "#176-42",
            None,
            61,
            Some(18.0),
            classify(18.0),
            CaseStatus::Pending,
            "8:40 AM",
        ),
        seeded(
            "#221-09",
            Some("Elena Vasquez"),
            48,
            Some(12.5),
            classify(12.5),
            CaseStatus::Pending,
            "9:03 AM",
        ),
        seeded(
            "#188-55",
            Some("Ruth Lindqvist"),
            72,
            Some(9.0),
            classify(9.0),
            CaseStatus::Pending,
            "9:18 AM",
        ),
        seeded(
            "#163-21",
            None,
            59,
            Some(4.5),
            classify(4.5),
            CaseStatus::Pending,
            "9:31 AM",
        ),
        seeded(
            "#152-78",
            Some("Amara Diallo"),
            44,
            Some(1.0),
            classify(1.0),
            CaseStatus::Pending,
            "9:47 AM",
        ),
        // Already reviewed this morning: score cleared, band kept.
        seeded(
            "#149-66",
            Some("Joan Petrov"),
            65,
            None,
            UrgencyLevel::High,
            CaseStatus::Complete,
            "7:55 AM",
        ),
        seeded(
            "#145-12",
            None,
            57,
            None,
            UrgencyLevel::Low,
            CaseStatus::Complete,
            "7:41 AM",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_identifiers_are_unique() {
        let cases = demo_cases();
        let mut ids: Vec<&str> = cases.iter().map(|c| c.case_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), cases.len());
    }

    #[test]
    fn completed_seeds_carry_no_score() {
        for case in demo_cases() {
            if case.is_complete() {
                assert_eq!(case.urgency_score, None);
            }
        }
    }
}
