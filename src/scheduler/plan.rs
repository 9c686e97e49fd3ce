//! Working assignment state for one attempt.
//!
//! Stages mutate `RoundPlan`s by reviewer and project position; the plan is
//! converted into the public [`Round`] shape once an attempt completes.

use std::collections::BTreeMap;

use crate::config::RosterConfig;
use crate::models::{AssignmentStatus, Project, ProjectAssignment, Reviewer, Round};
use crate::scoring::AffinityScores;

/// Borrowed inputs shared by every stage of a run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunInput<'a> {
    pub reviewers: &'a [Reviewer],
    pub projects: &'a [Project],
    pub scores: &'a AffinityScores,
    pub config: &'a RosterConfig,
}

impl RunInput<'_> {
    /// Reviewer positions eligible for regular slots under the spare policy.
    pub fn counted_pool(&self) -> Vec<usize> {
        (0..self.reviewers.len())
            .filter(|&r| self.reviewers[r].counts_toward_minimum(self.config.include_spare))
            .collect()
    }
}

/// Reviewer statuses for the projects of one round.
#[derive(Debug, Clone)]
pub(crate) struct RoundPlan {
    /// Project positions, in processing order.
    pub projects: Vec<usize>,
    /// Status per slot per reviewer position.
    cells: Vec<Vec<AssignmentStatus>>,
}

impl RoundPlan {
    /// Creates an empty plan with ignore-list cells pre-marked.
    pub fn new(projects: Vec<usize>, input: &RunInput<'_>) -> Self {
        let cells = projects
            .iter()
            .map(|&p| {
                (0..input.reviewers.len())
                    .map(|r| {
                        if input.scores.is_ignored(p, r) {
                            AssignmentStatus::Ignored
                        } else {
                            AssignmentStatus::Unassigned
                        }
                    })
                    .collect()
            })
            .collect();
        Self { projects, cells }
    }

    #[inline]
    pub fn status(&self, slot: usize, reviewer: usize) -> AssignmentStatus {
        self.cells[slot][reviewer]
    }

    /// Whether the reviewer already sits on any team in this round.
    pub fn is_used(&self, reviewer: usize) -> bool {
        self.cells.iter().any(|row| row[reviewer].is_assigned())
    }

    /// Reviewer positions on a project's team.
    pub fn team(&self, slot: usize) -> impl Iterator<Item = usize> + '_ {
        self.cells[slot]
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_assigned())
            .map(|(r, _)| r)
    }

    /// Team size including spares and extras.
    pub fn team_size(&self, slot: usize) -> usize {
        self.team(slot).count()
    }

    /// Team members counting toward the minimum.
    pub fn counted(&self, slot: usize, include_spare: bool) -> usize {
        self.cells[slot]
            .iter()
            .filter(|s| s.counts_toward_minimum(include_spare))
            .count()
    }

    /// Spare reviewers on a project's team.
    pub fn spare_count(&self, slot: usize, reviewers: &[Reviewer]) -> usize {
        self.team(slot).filter(|&r| !reviewers[r].present).count()
    }

    /// Whether any team member is experienced.
    pub fn has_experienced(&self, slot: usize, reviewers: &[Reviewer]) -> bool {
        self.team(slot).any(|r| reviewers[r].experienced)
    }

    /// Whether the reviewer clashes with a team member's organisation.
    pub fn conflicts(&self, slot: usize, reviewer: usize, reviewers: &[Reviewer]) -> bool {
        let candidate = &reviewers[reviewer];
        self.team(slot)
            .any(|member| member != reviewer && reviewers[member].conflicts_with(candidate))
    }

    /// Whether the reviewer may join the project's team: not ignored, not
    /// already on it, and free of organisation conflicts.
    pub fn can_take(&self, slot: usize, reviewer: usize, reviewers: &[Reviewer]) -> bool {
        self.status(slot, reviewer) == AssignmentStatus::Unassigned
            && !self.conflicts(slot, reviewer, reviewers)
    }

    /// Sets a cell. Ignored cells are never overwritten.
    pub fn assign(&mut self, slot: usize, reviewer: usize, status: AssignmentStatus) -> bool {
        let cell = &mut self.cells[slot][reviewer];
        if *cell == AssignmentStatus::Ignored {
            return false;
        }
        *cell = status;
        true
    }

    /// Converts into the public round shape.
    pub fn into_round(self, index: usize, input: &RunInput<'_>) -> Round {
        let projects = self
            .projects
            .iter()
            .zip(self.cells)
            .map(|(&p, row)| ProjectAssignment {
                project_id: input.projects[p].id,
                project_name: input.projects[p].name.clone(),
                cells: row
                    .into_iter()
                    .enumerate()
                    .map(|(r, s)| (input.reviewers[r].handle.clone(), s))
                    .collect::<BTreeMap<_, _>>(),
            })
            .collect();
        Round { index, projects }
    }
}
