//! Roster (solution) model.
//!
//! A roster is the full round → project → reviewer → status structure
//! produced by one engine run, plus the decision log and any projects left
//! below their minimum reviewer count.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{DecisionLog, ReviewType};

/// Status of one (round, project, reviewer) cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentStatus {
    /// Not assigned.
    #[default]
    Unassigned,
    /// Assigned as a present reviewer.
    Assigned,
    /// Lead reviewer (change-request rosters only, one per project).
    Primary,
    /// Assigned as a spare reviewer.
    Spare,
    /// Present reviewer added beyond the minimum.
    Extra,
    /// Spare reviewer added beyond the minimum.
    ExtraSpare,
    /// On the project's ignore list; can never hold another status.
    Ignored,
}

impl AssignmentStatus {
    /// Whether the status places the reviewer on the project's team.
    #[inline]
    pub fn is_assigned(&self) -> bool {
        matches!(
            self,
            AssignmentStatus::Assigned
                | AssignmentStatus::Primary
                | AssignmentStatus::Spare
                | AssignmentStatus::Extra
                | AssignmentStatus::ExtraSpare
        )
    }

    /// Whether the status counts toward the minimum reviewer requirement.
    ///
    /// Spare statuses only count when the spare-inclusion policy is on.
    #[inline]
    pub fn counts_toward_minimum(&self, include_spare: bool) -> bool {
        match self {
            AssignmentStatus::Assigned | AssignmentStatus::Primary | AssignmentStatus::Extra => {
                true
            }
            AssignmentStatus::Spare | AssignmentStatus::ExtraSpare => include_spare,
            AssignmentStatus::Unassigned | AssignmentStatus::Ignored => false,
        }
    }

    /// Regular status for a reviewer given their presence.
    pub fn for_presence(present: bool) -> Self {
        if present {
            AssignmentStatus::Assigned
        } else {
            AssignmentStatus::Spare
        }
    }

    /// Extra status for a reviewer given their presence.
    pub fn extra_for_presence(present: bool) -> Self {
        if present {
            AssignmentStatus::Extra
        } else {
            AssignmentStatus::ExtraSpare
        }
    }
}

/// Reviewer statuses for one project within one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAssignment {
    /// Project identifier.
    pub project_id: u64,
    /// Project name (denormalized for display).
    pub project_name: String,
    /// Status per reviewer handle.
    pub cells: BTreeMap<String, AssignmentStatus>,
}

impl ProjectAssignment {
    /// Status for a reviewer (unassigned if absent).
    pub fn status(&self, handle: &str) -> AssignmentStatus {
        self.cells.get(handle).copied().unwrap_or_default()
    }

    /// Handles holding an assigned-family status.
    pub fn team(&self) -> Vec<&str> {
        self.cells
            .iter()
            .filter(|(_, s)| s.is_assigned())
            .map(|(h, _)| h.as_str())
            .collect()
    }

    /// Number of cells counting toward the minimum.
    pub fn counted(&self, include_spare: bool) -> usize {
        self.cells
            .values()
            .filter(|s| s.counts_toward_minimum(include_spare))
            .count()
    }

    /// Handle of the primary reviewer, if any.
    pub fn primary(&self) -> Option<&str> {
        self.cells
            .iter()
            .find(|(_, s)| **s == AssignmentStatus::Primary)
            .map(|(h, _)| h.as_str())
    }
}

/// One review round (time slot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Zero-based round index.
    pub index: usize,
    /// Projects reviewed in this round.
    pub projects: Vec<ProjectAssignment>,
}

impl Round {
    /// Finds a project in this round.
    pub fn project(&self, project_id: u64) -> Option<&ProjectAssignment> {
        self.projects.iter().find(|p| p.project_id == project_id)
    }
}

/// A project left below its minimum reviewer count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    /// Round index.
    pub round: usize,
    /// Project identifier.
    pub project_id: u64,
    /// Reviewers counted toward the minimum.
    pub assigned: usize,
    /// Configured minimum.
    pub required: usize,
}

/// The output of an engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    /// Roster type of the run.
    pub review_type: ReviewType,
    /// Rounds in chronological order.
    pub rounds: Vec<Round>,
    /// Attempt number that produced this roster (1-based).
    pub attempts: usize,
    /// Projects still below the minimum (empty on success).
    pub shortfalls: Vec<Shortfall>,
    /// Decision log.
    pub log: DecisionLog,
}

impl Roster {
    /// Whether every project reached the configured minimum.
    pub fn is_complete(&self) -> bool {
        self.shortfalls.is_empty()
    }

    /// Status of a reviewer on a project in a round.
    pub fn status(&self, round: usize, project_id: u64, handle: &str) -> Option<AssignmentStatus> {
        self.rounds
            .get(round)?
            .project(project_id)
            .map(|p| p.status(handle))
    }

    /// All (round, project_id, status) placements of a reviewer.
    pub fn assignments_for_reviewer(&self, handle: &str) -> Vec<(usize, u64, AssignmentStatus)> {
        self.rounds
            .iter()
            .flat_map(|round| {
                round.projects.iter().filter_map(move |p| {
                    let status = p.status(handle);
                    status
                        .is_assigned()
                        .then_some((round.index, p.project_id, status))
                })
            })
            .collect()
    }

    /// Total number of project placements across rounds.
    pub fn project_count(&self) -> usize {
        self.rounds.iter().map(|r| r.projects.len()).sum()
    }

    /// Iterates over every (round, project) pair.
    pub fn iter_projects(&self) -> impl Iterator<Item = (&Round, &ProjectAssignment)> {
        self.rounds
            .iter()
            .flat_map(|r| r.projects.iter().map(move |p| (r, p)))
    }
}
