//! Round partitioner.
//!
//! # Algorithm
//!
//! `max = floor(reviewers / min_reviewers)`, capped by the forced
//! projects-per-round value when that is smaller. Rounds are filled to `max`
//! in order; the last round takes the remainder.
//!
//! Assumes every reviewer is available in every round.

use crate::models::Reviewer;

/// Reviewers counted toward round capacity under the spare policy.
pub fn capacity_reviewers(reviewers: &[Reviewer], include_spare: bool) -> usize {
    reviewers
        .iter()
        .filter(|r| r.counts_toward_minimum(include_spare))
        .count()
}

/// Maximum projects per round (never below 1).
pub fn max_projects_per_round(
    min_reviewers: usize,
    reviewer_count: usize,
    cap: Option<usize>,
) -> usize {
    let by_capacity = reviewer_count / min_reviewers.max(1);
    let capped = match cap {
        Some(c) if c > 0 => by_capacity.min(c),
        _ => by_capacity,
    };
    capped.max(1)
}

/// Splits `project_count` projects into round sizes.
///
/// # Example
/// ```
/// use u_roster::scheduler::partition_rounds;
///
/// assert_eq!(partition_rounds(6, 3, 9, None), vec![3, 3]);
/// assert_eq!(partition_rounds(7, 3, 9, Some(2)), vec![2, 2, 2, 1]);
/// ```
pub fn partition_rounds(
    project_count: usize,
    min_reviewers: usize,
    reviewer_count: usize,
    cap: Option<usize>,
) -> Vec<usize> {
    let max = max_projects_per_round(min_reviewers, reviewer_count, cap);
    let mut sizes = Vec::with_capacity(project_count.div_ceil(max));
    let mut remaining = project_count;
    while remaining > 0 {
        let size = remaining.min(max);
        sizes.push(size);
        remaining -= size;
    }
    sizes
}
