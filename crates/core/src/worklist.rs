//! Worklist presentation: filtering, display ordering and pagination.
//!
//! Operates on the presented queue (the output of
//! [`crate::store::QueueService::list`]). Everything here is pure; the
//! REST layer recomputes the page on every request, so a changed filter
//! implicitly starts back at page zero.

use crate::case::{Case, CaseStatus};

/// Fixed number of worklist rows per page.
pub const PAGE_SIZE: usize = 6;

/// One page of the filtered worklist, plus the figures the table footer
/// shows ("Showing X to Y of Z results").
#[derive(Debug, Clone, PartialEq)]
pub struct WorklistPage {
    /// The rows on this page, in display order
    pub cases: Vec<Case>,
    /// Zero-based page actually returned (the request is clamped)
    pub page: usize,
    /// Always at least 1, even for an empty result
    pub total_pages: usize,
    /// Number of cases matching the filter
    pub total_filtered: usize,
    /// One-based index of the first row shown; 0 when nothing matched
    pub start_index: usize,
    /// One-based index of the last row shown
    pub end_index: usize,
}

/// Row action offered for a case in the given state.
///
/// Completed cases are visually marked but not actionable.
pub fn action_label(status: CaseStatus) -> &'static str {
    match status {
        CaseStatus::Pending => "Review Case",
        CaseStatus::InProgress => "Continue",
        CaseStatus::Complete => "Archived",
    }
}

/// Keeps the cases whose identifier contains `search`, case-insensitively.
/// An empty search keeps everything.
pub fn filter_by_case_id(cases: Vec<Case>, search: &str) -> Vec<Case> {
    if search.is_empty() {
        return cases;
    }
    cases
        .into_iter()
        .filter(|c| c.case_id.contains_ignore_case(search))
        .collect()
}

/// Sorts for the worklist table: open cases before completed ones, scored
/// before unscored, then score descending. Stable, so equal keys keep the
/// presented queue order.
pub fn order_for_display(cases: &mut [Case]) {
    cases.sort_by(|a, b| {
        (a.is_complete().cmp(&b.is_complete())).then_with(|| {
            match (a.urgency_score, b.urgency_score) {
                (None, None) => std::cmp::Ordering::Equal,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (Some(_), None) => std::cmp::Ordering::Less,
                (Some(a_score), Some(b_score)) => b_score.total_cmp(&a_score),
            }
        })
    });
}

/// Filters, orders and paginates the presented queue.
///
/// The requested page is clamped into range, and the page count never drops
/// below one, so a filter with no matches still yields a well-formed (empty)
/// first page.
pub fn page(cases: Vec<Case>, search: &str, requested_page: usize) -> WorklistPage {
    let mut filtered = filter_by_case_id(cases, search);
    order_for_display(&mut filtered);

    let total_filtered = filtered.len();
    let total_pages = std::cmp::max(1, total_filtered.div_ceil(PAGE_SIZE));
    let page = std::cmp::min(requested_page, total_pages - 1);

    let start = page * PAGE_SIZE;
    let end = std::cmp::min(start + PAGE_SIZE, total_filtered);
    let rows: Vec<Case> = filtered
        .into_iter()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect();

    WorklistPage {
        page,
        total_pages,
        total_filtered,
        start_index: if total_filtered == 0 { 0 } else { start + 1 },
        end_index: end,
        cases: rows,
    }
}
