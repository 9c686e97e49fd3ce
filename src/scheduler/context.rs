//! Run context for assignment generation.

use std::collections::HashMap;

use crate::models::DecisionLog;

/// Mutable state threaded through the stages of one generation attempt.
///
/// A fresh context is created per attempt, so attempts never observe each
/// other's counters and a run is trivially reentrant.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Assignments per reviewer position, across the whole attempt.
    pub workload: Vec<usize>,
    /// Occurrences of each likely team (sorted handles) across rounds.
    pub team_recurrence: HashMap<Vec<String>, usize>,
    /// Best-matching project slot per reviewer position, for the current round.
    pub best_match: HashMap<usize, usize>,
    /// Number of rounds in the layout.
    pub round_count: usize,
    /// Decisions recorded during the attempt.
    pub log: DecisionLog,
}

impl RunContext {
    /// Creates a context for a roster of `reviewer_count` reviewers.
    pub fn new(reviewer_count: usize, round_count: usize) -> Self {
        Self {
            workload: vec![0; reviewer_count],
            round_count,
            ..Default::default()
        }
    }

    /// Records one more assignment for a reviewer.
    pub fn add_workload(&mut self, reviewer: usize) {
        if let Some(load) = self.workload.get_mut(reviewer) {
            *load += 1;
        }
    }

    /// Current workload of a reviewer.
    pub fn workload_of(&self, reviewer: usize) -> usize {
        self.workload.get(reviewer).copied().unwrap_or(0)
    }

    /// Counts a team occurrence and returns how often it was seen before.
    pub fn note_team(&mut self, key: Vec<String>) -> usize {
        let count = self.team_recurrence.entry(key).or_insert(0);
        let previous = *count;
        *count += 1;
        previous
    }

    /// Recurrence count above which a team gets a member excluded.
    pub fn recurrence_threshold(&self, ratio: f64) -> f64 {
        ratio * self.round_count as f64
    }
}
