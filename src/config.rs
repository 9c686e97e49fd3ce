//! Run configuration.
//!
//! `RosterConfig` holds the numeric tuning parameters of a run and the
//! per-review-type boost table used by the affinity scorer. Both are plain
//! values passed by reference into every stage; nothing is read from global
//! state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::ReviewType;
use crate::RosterError;

/// Immutable per-review-type boost constants.
///
/// Boosts for outline, change-request, full-proposal, progress-report,
/// generic-review and future-evaluation events are read from history;
/// the preferred-reviewer boost is applied once per preferred handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoostTable {
    boosts: BTreeMap<ReviewType, f64>,
}

impl Default for BoostTable {
    fn default() -> Self {
        Self::from_entries([
            (ReviewType::OutlineReview, 1.0),
            (ReviewType::ChangeRequestReview, 2.0),
            (ReviewType::FullProposalReview, 3.0),
            (ReviewType::ProgressReportReview, 3.0),
            (ReviewType::GenericReview, 5.0),
            (ReviewType::FutureEvaluation, 6.0),
            (ReviewType::PreferredReviewer, 10.0),
        ])
    }
}

impl BoostTable {
    /// Builds a table from explicit entries. Missing types boost by zero.
    pub fn from_entries(entries: impl IntoIterator<Item = (ReviewType, f64)>) -> Self {
        Self {
            boosts: entries.into_iter().collect(),
        }
    }

    /// Boost for a review type.
    #[inline]
    pub fn get(&self, review_type: ReviewType) -> f64 {
        self.boosts.get(&review_type).copied().unwrap_or(0.0)
    }

    /// Boost for an explicit preference.
    #[inline]
    pub fn preferred(&self) -> f64 {
        self.get(ReviewType::PreferredReviewer)
    }

    /// Returns a copy with every boost multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            boosts: self.boosts.iter().map(|(k, v)| (*k, v * factor)).collect(),
        }
    }

    fn validate(&self) -> Result<(), RosterError> {
        for (review_type, boost) in &self.boosts {
            if !boost.is_finite() || *boost <= 0.0 {
                return Err(RosterError::InvalidConfig(format!(
                    "boost for {review_type} must be positive and finite, got {boost}"
                )));
            }
        }
        Ok(())
    }
}

/// Tuning parameters of a roster run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Minimum reviewers per project.
    pub min_reviewers: usize,
    /// Whether spare reviewers count toward the minimum.
    pub include_spare: bool,
    /// Forced cap on projects per round (`None` or 0 = derived from capacity).
    pub projects_per_round: Option<usize>,
    /// Retry ceiling for the generation pipeline.
    pub max_attempts: usize,
    /// Pass cap for the round distribution search.
    pub max_optimizer_passes: usize,
    /// A team recurring more than `ratio × rounds` times gets a member excluded.
    pub team_recurrence_ratio: f64,
    /// Per-review-type boost constants.
    pub boosts: BoostTable,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            min_reviewers: 3,
            include_spare: false,
            projects_per_round: None,
            max_attempts: 25,
            max_optimizer_passes: 10,
            team_recurrence_ratio: 0.3,
            boosts: BoostTable::default(),
        }
    }
}

impl RosterConfig {
    /// Sets the minimum reviewers per project.
    pub fn with_min_reviewers(mut self, min_reviewers: usize) -> Self {
        self.min_reviewers = min_reviewers;
        self
    }

    /// Sets the spare-inclusion policy.
    pub fn with_include_spare(mut self, include_spare: bool) -> Self {
        self.include_spare = include_spare;
        self
    }

    /// Forces a cap on projects per round.
    pub fn with_projects_per_round(mut self, projects_per_round: usize) -> Self {
        self.projects_per_round = Some(projects_per_round);
        self
    }

    /// Sets the retry ceiling.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the distribution search pass cap.
    pub fn with_max_optimizer_passes(mut self, passes: usize) -> Self {
        self.max_optimizer_passes = passes;
        self
    }

    /// Sets the team recurrence ratio.
    pub fn with_team_recurrence_ratio(mut self, ratio: f64) -> Self {
        self.team_recurrence_ratio = ratio;
        self
    }

    /// Replaces the boost table.
    pub fn with_boosts(mut self, boosts: BoostTable) -> Self {
        self.boosts = boosts;
        self
    }

    /// Effective projects-per-round override (zero means none).
    pub fn projects_per_round_cap(&self) -> Option<usize> {
        self.projects_per_round.filter(|&n| n > 0)
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.min_reviewers == 0 {
            return Err(RosterError::InvalidConfig(
                "min_reviewers must be at least 1".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(RosterError::InvalidConfig(
                "max_attempts must be at least 1".into(),
            ));
        }
        if !self.team_recurrence_ratio.is_finite() || self.team_recurrence_ratio < 0.0 {
            return Err(RosterError::InvalidConfig(format!(
                "team_recurrence_ratio must be a non-negative number, got {}",
                self.team_recurrence_ratio
            )));
        }
        self.boosts.validate()
    }
}
