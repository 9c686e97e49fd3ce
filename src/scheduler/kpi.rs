//! Roster quality metrics (KPIs).
//!
//! Computes workload and coverage indicators from a produced roster.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Load | Assigned-family cells per reviewer, across all rounds |
//! | Load Spread | max(load) - min(load) |
//! | Mean Load | Average load over reviewers appearing in the roster |
//! | Fill Rate | Fraction of project placements meeting the minimum |
//! | Under-filled | Number of placements below the minimum |
//! | Primaries | Number of primary designations |

use std::collections::BTreeMap;

use crate::models::{AssignmentStatus, Roster};

/// Roster performance indicators.
#[derive(Debug, Clone)]
pub struct RosterKpi {
    /// Assigned-family cells per reviewer handle.
    pub load_by_reviewer: BTreeMap<String, usize>,
    /// Smallest reviewer load.
    pub min_load: usize,
    /// Largest reviewer load.
    pub max_load: usize,
    /// Mean reviewer load.
    pub mean_load: f64,
    /// `max_load - min_load`.
    pub load_spread: usize,
    /// Fraction of placements meeting the minimum (0.0..1.0).
    pub fill_rate: f64,
    /// Placements below the minimum.
    pub under_filled: usize,
    /// Number of primary designations.
    pub primaries: usize,
    /// Counted team members summed over placements.
    pub staffed_reviewers: usize,
}

impl RosterKpi {
    /// Computes KPIs from a roster.
    ///
    /// Every reviewer with a cell in the roster is listed in the load table,
    /// including those never assigned (load 0). Under-filled placements are
    /// taken from the roster's shortfalls.
    ///
    /// # Arguments
    /// * `roster` - The roster to evaluate.
    /// * `include_spare` - Whether spare assignments count toward the team.
    pub fn calculate(roster: &Roster, include_spare: bool) -> Self {
        let mut load_by_reviewer: BTreeMap<String, usize> = BTreeMap::new();
        let mut primaries = 0;
        let mut staffed_reviewers = 0;

        for (_, project) in roster.iter_projects() {
            for (handle, status) in &project.cells {
                let load = load_by_reviewer.entry(handle.clone()).or_insert(0);
                if status.is_assigned() {
                    *load += 1;
                }
                if *status == AssignmentStatus::Primary {
                    primaries += 1;
                }
            }
            staffed_reviewers += project.counted(include_spare);
        }

        let min_load = load_by_reviewer.values().copied().min().unwrap_or(0);
        let max_load = load_by_reviewer.values().copied().max().unwrap_or(0);
        let mean_load = if load_by_reviewer.is_empty() {
            0.0
        } else {
            load_by_reviewer.values().sum::<usize>() as f64 / load_by_reviewer.len() as f64
        };

        let placements = roster.project_count();
        let under_filled = roster.shortfalls.len();
        let fill_rate = if placements == 0 {
            1.0
        } else {
            (placements - under_filled.min(placements)) as f64 / placements as f64
        };

        Self {
            load_by_reviewer,
            min_load,
            max_load,
            mean_load,
            load_spread: max_load - min_load,
            fill_rate,
            under_filled,
            primaries,
            staffed_reviewers,
        }
    }

    /// Whether the roster meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_spread: usize, min_fill_rate: f64) -> bool {
        self.load_spread <= max_spread && self.fill_rate >= min_fill_rate
    }
}
