//! Affinity scorer.
//!
//! # Algorithm
//!
//! 1. Every (project, reviewer) pair starts at 0.
//! 2. History is walked oldest → newest. An event at position `i` of a
//!    history of length `n` adds `boost(type) / (n - i)` to each reviewer
//!    involved: the newest event keeps full weight, older ones fade.
//! 3. Each preferred reviewer receives the preferred boost once.
//! 4. Each ignored reviewer is forced to [`IGNORED_SCORE`].
//! 5. Positive scores are divided by the dataset's mean history length
//!    (over projects with any history) so long-running projects do not
//!    permanently outrank new ones.
//!
//! Ties are left in place; assignment stages break them randomly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::BoostTable;
use crate::models::{Project, ReviewType, Reviewer};

/// Internal sentinel marking a reviewer who must never be assigned.
pub const IGNORED_SCORE: f64 = -1.0;

/// Boundary view of a single affinity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Affinity {
    /// On the project's ignore list.
    Ignored,
    /// No history and no preference.
    Neutral,
    /// Boosted by history or preference (normalized value).
    Boosted(f64),
}

impl Affinity {
    fn from_raw(value: f64) -> Self {
        if value < 0.0 {
            Affinity::Ignored
        } else if value > 0.0 {
            Affinity::Boosted(value)
        } else {
            Affinity::Neutral
        }
    }
}

/// Score matrix indexed by project position and reviewer position.
#[derive(Debug, Clone)]
pub struct AffinityScores {
    handles: Vec<String>,
    index: HashMap<String, usize>,
    values: Vec<Vec<f64>>,
    average_activity: f64,
}

impl AffinityScores {
    /// Number of projects scored.
    pub fn project_count(&self) -> usize {
        self.values.len()
    }

    /// Number of reviewers scored.
    pub fn reviewer_count(&self) -> usize {
        self.handles.len()
    }

    /// Mean history length used for normalization.
    pub fn average_activity(&self) -> f64 {
        self.average_activity
    }

    /// Raw numeric score (sentinel for ignored).
    #[inline]
    pub fn raw(&self, project: usize, reviewer: usize) -> f64 {
        self.values[project][reviewer]
    }

    /// Whether the pair carries the ignored sentinel.
    #[inline]
    pub fn is_ignored(&self, project: usize, reviewer: usize) -> bool {
        self.values[project][reviewer] < 0.0
    }

    /// Score for a pair by position.
    pub fn affinity(&self, project: usize, reviewer: usize) -> Affinity {
        Affinity::from_raw(self.raw(project, reviewer))
    }

    /// Score for a project position and reviewer handle.
    pub fn get(&self, project: usize, handle: &str) -> Option<Affinity> {
        let r = self.reviewer_index(handle)?;
        self.values
            .get(project)
            .map(|row| Affinity::from_raw(row[r]))
    }

    /// Reviewer position for a handle.
    pub fn reviewer_index(&self, handle: &str) -> Option<usize> {
        self.index.get(handle).copied()
    }
}

/// Computes affinity scores from history and preference lists.
#[derive(Debug, Clone, Copy)]
pub struct AffinityScorer<'a> {
    boosts: &'a BoostTable,
}

impl<'a> AffinityScorer<'a> {
    /// Creates a scorer over a boost table.
    pub fn new(boosts: &'a BoostTable) -> Self {
        Self { boosts }
    }

    /// Scores every (project, reviewer) pair.
    ///
    /// Handles that do not resolve to a reviewer are skipped; callers are
    /// expected to run [`validate_input`](crate::validation::validate_input) first.
    pub fn score(&self, projects: &[Project], reviewers: &[Reviewer]) -> AffinityScores {
        let handles: Vec<String> = reviewers.iter().map(|r| r.handle.clone()).collect();
        let index: HashMap<String, usize> = handles
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();

        let mut values = Vec::with_capacity(projects.len());
        for project in projects {
            let mut row = vec![0.0; handles.len()];
            let n = project.history.len();

            for (i, event) in project.history.iter().enumerate() {
                if event.review_type == ReviewType::PreferredReviewer {
                    continue;
                }
                let boost = self.boosts.get(event.review_type) / (n - i) as f64;
                for handle in &event.reviewers {
                    if let Some(&r) = index.get(handle) {
                        row[r] += boost;
                    }
                }
            }

            for handle in &project.preferred {
                if let Some(&r) = index.get(handle) {
                    row[r] += self.boosts.preferred();
                }
            }

            for handle in &project.ignored {
                if let Some(&r) = index.get(handle) {
                    row[r] = IGNORED_SCORE;
                }
            }

            values.push(row);
        }

        let average_activity = average_activity(projects);
        for row in &mut values {
            for v in row.iter_mut().filter(|v| **v > 0.0) {
                *v /= average_activity;
            }
        }

        AffinityScores {
            handles,
            index,
            values,
            average_activity,
        }
    }
}

/// Mean history length over projects with at least one event (1.0 if none).
pub fn average_activity(projects: &[Project]) -> f64 {
    let active: Vec<usize> = projects
        .iter()
        .map(|p| p.history.len())
        .filter(|&n| n > 0)
        .collect();
    if active.is_empty() {
        1.0
    } else {
        active.iter().sum::<usize>() as f64 / active.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReviewEvent;

    fn reviewers() -> Vec<Reviewer> {
        vec![
            Reviewer::new("a", "OrgA"),
            Reviewer::new("b", "OrgB"),
            Reviewer::new("c", "OrgC"),
        ]
    }

    #[test]
    fn test_history_decay_and_normalization() {
        // n = 2: outline at i=0 → 1/2, full proposal at i=1 → 3/1
        let projects = vec![Project::new(1, "P")
            .with_event(ReviewEvent::new(ReviewType::OutlineReview, ["a", "b"]))
            .with_event(ReviewEvent::new(ReviewType::FullProposalReview, ["b"]))];
        let boosts = BoostTable::default();
        let scores = AffinityScorer::new(&boosts).score(&projects, &reviewers());

        assert!((scores.average_activity() - 2.0).abs() < 1e-10);
        assert!((scores.raw(0, 0) - 0.25).abs() < 1e-10);
        assert!((scores.raw(0, 1) - 1.75).abs() < 1e-10);
        assert_eq!(scores.affinity(0, 2), Affinity::Neutral);
    }

    #[test]
    fn test_ignored_overrides_everything() {
        let projects = vec![
            Project::new(1, "P").with_ignored("a"),
            Project::new(2, "Q")
                .with_event(ReviewEvent::new(ReviewType::GenericReview, ["a"]))
                .with_preferred("a"),
        ];
        let boosts = BoostTable::default();
        let scores = AffinityScorer::new(&boosts).score(&projects, &reviewers());

        assert!((scores.raw(0, 0) - IGNORED_SCORE).abs() < 1e-10);
        assert_eq!(scores.get(0, "a"), Some(Affinity::Ignored));
        assert!(scores.is_ignored(0, 0));
        // a is top-scored on Q, which must not leak into P
        assert!(matches!(scores.get(1, "a"), Some(Affinity::Boosted(v)) if v > 0.0));
    }

    #[test]
    fn test_ignored_beats_history_on_same_project() {
        let projects = vec![Project::new(1, "P")
            .with_event(ReviewEvent::new(ReviewType::GenericReview, ["b"]))
            .with_preferred("b")
            .with_ignored("b")];
        let boosts = BoostTable::default();
        let scores = AffinityScorer::new(&boosts).score(&projects, &reviewers());
        assert_eq!(scores.affinity(0, 1), Affinity::Ignored);
    }

    #[test]
    fn test_empty_history_only_explicit_entries() {
        let projects = vec![Project::new(1, "P").with_preferred("c").with_ignored("a")];
        let boosts = BoostTable::default();
        let scores = AffinityScorer::new(&boosts).score(&projects, &reviewers());

        assert!((scores.average_activity() - 1.0).abs() < 1e-10);
        assert_eq!(scores.affinity(0, 0), Affinity::Ignored);
        assert_eq!(scores.affinity(0, 1), Affinity::Neutral);
        assert_eq!(scores.affinity(0, 2), Affinity::Boosted(10.0));
    }

    #[test]
    fn test_preferred_marker_in_history_is_skipped() {
        let projects = vec![Project::new(1, "P")
            .with_event(ReviewEvent::new(ReviewType::PreferredReviewer, ["a"]))];
        let boosts = BoostTable::default();
        let scores = AffinityScorer::new(&boosts).score(&projects, &reviewers());
        assert_eq!(scores.affinity(0, 0), Affinity::Neutral);
    }

    #[test]
    fn test_average_activity_ignores_empty_projects() {
        let projects = vec![
            Project::new(1, "A")
                .with_event(ReviewEvent::new(ReviewType::OutlineReview, ["a"]))
                .with_event(ReviewEvent::new(ReviewType::OutlineReview, ["a"]))
                .with_event(ReviewEvent::new(ReviewType::OutlineReview, ["a"])),
            Project::new(2, "B").with_event(ReviewEvent::new(ReviewType::OutlineReview, ["b"])),
            Project::new(3, "C"),
        ];
        assert!((average_activity(&projects) - 2.0).abs() < 1e-10);
        assert!((average_activity(&[]) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_scaling_boosts_scales_positive_scores() {
        let projects = vec![
            Project::new(1, "A")
                .with_event(ReviewEvent::new(ReviewType::OutlineReview, ["a", "b"]))
                .with_event(ReviewEvent::new(ReviewType::ProgressReportReview, ["b"]))
                .with_ignored("c"),
            Project::new(2, "B")
                .with_event(ReviewEvent::new(ReviewType::GenericReview, ["c"]))
                .with_preferred("a"),
        ];
        let base = BoostTable::default();
        let doubled = base.scaled(2.0);
        let s1 = AffinityScorer::new(&base).score(&projects, &reviewers());
        let s2 = AffinityScorer::new(&doubled).score(&projects, &reviewers());

        for p in 0..2 {
            for r in 0..3 {
                let (v1, v2) = (s1.raw(p, r), s2.raw(p, r));
                if v1 > 0.0 {
                    assert!((v2 - 2.0 * v1).abs() < 1e-9);
                } else {
                    assert!((v2 - v1).abs() < 1e-10);
                }
            }
        }
    }

    #[test]
    fn test_unknown_handle_lookup() {
        let boosts = BoostTable::default();
        let scores = AffinityScorer::new(&boosts).score(&[Project::new(1, "P")], &reviewers());
        assert_eq!(scores.get(0, "zz"), None);
        assert_eq!(scores.get(5, "a"), None);
        assert_eq!(scores.project_count(), 1);
        assert_eq!(scores.reviewer_count(), 3);
    }
}
