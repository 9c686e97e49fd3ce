//! Roster validation.
//!
//! Two checks on a produced roster:
//! - **Coverage**: every project in every round reaches the configured
//!   minimum of counted reviewers. Failures trigger a retry.
//! - **Invariants**: no ignored reviewer holds an assigned status, no two
//!   team members share an organisation tree, and no project has more than
//!   one primary. These hold by construction; the check exists for callers
//!   and tests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{AssignmentStatus, Project, Reviewer, Roster, Round, Shortfall};

/// Projects below `min_reviewers` counted reviewers.
pub fn check_coverage(rounds: &[Round], min_reviewers: usize, include_spare: bool) -> Vec<Shortfall> {
    rounds
        .iter()
        .flat_map(|round| {
            round.projects.iter().filter_map(move |p| {
                let assigned = p.counted(include_spare);
                (assigned < min_reviewers).then_some(Shortfall {
                    round: round.index,
                    project_id: p.project_id,
                    assigned,
                    required: min_reviewers,
                })
            })
        })
        .collect()
}

/// A broken structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Round index.
    pub round: usize,
    /// Project identifier.
    pub project_id: u64,
    /// Human-readable description.
    pub message: String,
}

/// Classification of invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// An ignored reviewer holds a non-ignored status.
    IgnoredAssigned,
    /// Two team members share an organisation or parent organisation.
    OrganisationConflict,
    /// More than one primary reviewer on a project.
    MultiplePrimaries,
}

/// Checks the structural invariants of a roster against its inputs.
pub fn find_violations(roster: &Roster, reviewers: &[Reviewer], projects: &[Project]) -> Vec<Violation> {
    let by_handle: HashMap<&str, &Reviewer> =
        reviewers.iter().map(|r| (r.handle.as_str(), r)).collect();
    let by_id: HashMap<u64, &Project> = projects.iter().map(|p| (p.id, p)).collect();
    let mut violations = Vec::new();

    for (round, assignment) in roster.iter_projects() {
        let mut push = |violation_type, message: String| {
            violations.push(Violation {
                violation_type,
                round: round.index,
                project_id: assignment.project_id,
                message,
            })
        };

        if let Some(project) = by_id.get(&assignment.project_id) {
            for handle in &project.ignored {
                let status = assignment.status(handle);
                if !matches!(status, AssignmentStatus::Ignored | AssignmentStatus::Unassigned) {
                    push(
                        ViolationType::IgnoredAssigned,
                        format!("ignored reviewer {handle} holds {status:?}"),
                    );
                }
            }
        }

        let team: Vec<&Reviewer> = assignment
            .team()
            .into_iter()
            .filter_map(|h| by_handle.get(h).copied())
            .collect();
        for (i, a) in team.iter().enumerate() {
            for b in &team[i + 1..] {
                if a.conflicts_with(b) {
                    push(
                        ViolationType::OrganisationConflict,
                        format!("{} and {} share an organisation", a.handle, b.handle),
                    );
                }
            }
        }

        let primaries = assignment
            .cells
            .values()
            .filter(|s| **s == AssignmentStatus::Primary)
            .count();
        if primaries > 1 {
            push(
                ViolationType::MultiplePrimaries,
                format!("{primaries} primary reviewers"),
            );
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DecisionLog, ProjectAssignment, ReviewType};
    use std::collections::BTreeMap;

    fn round(cells: &[(&str, AssignmentStatus)]) -> Round {
        Round {
            index: 0,
            projects: vec![ProjectAssignment {
                project_id: 1,
                project_name: "A".into(),
                cells: cells
                    .iter()
                    .map(|(h, s)| (h.to_string(), *s))
                    .collect::<BTreeMap<_, _>>(),
            }],
        }
    }

    fn roster(rounds: Vec<Round>) -> Roster {
        Roster {
            review_type: ReviewType::OutlineReview,
            rounds,
            attempts: 1,
            shortfalls: Vec::new(),
            log: DecisionLog::new(),
        }
    }

    #[test]
    fn test_coverage_counts_by_policy() {
        let rounds = vec![round(&[
            ("a", AssignmentStatus::Assigned),
            ("b", AssignmentStatus::Extra),
            ("c", AssignmentStatus::Spare),
        ])];
        assert!(check_coverage(&rounds, 2, false).is_empty());

        let short = check_coverage(&rounds, 3, false);
        assert_eq!(
            short,
            vec![Shortfall {
                round: 0,
                project_id: 1,
                assigned: 2,
                required: 3
            }]
        );
        assert!(check_coverage(&rounds, 3, true).is_empty());
    }

    #[test]
    fn test_no_violations_on_clean_roster() {
        let reviewers = vec![Reviewer::new("a", "X"), Reviewer::new("b", "Y")];
        let projects = vec![Project::new(1, "A").with_ignored("b")];
        let r = roster(vec![round(&[
            ("a", AssignmentStatus::Primary),
            ("b", AssignmentStatus::Ignored),
        ])]);
        assert!(find_violations(&r, &reviewers, &projects).is_empty());
    }

    #[test]
    fn test_detects_each_violation() {
        let reviewers = vec![
            Reviewer::new("a", "X"),
            Reviewer::new("b", "X"),
            Reviewer::new("c", "Z"),
        ];
        let projects = vec![Project::new(1, "A").with_ignored("c")];
        let r = roster(vec![round(&[
            ("a", AssignmentStatus::Primary),
            ("b", AssignmentStatus::Primary),
            ("c", AssignmentStatus::Extra),
        ])]);

        let kinds: Vec<ViolationType> = find_violations(&r, &reviewers, &projects)
            .into_iter()
            .map(|v| v.violation_type)
            .collect();
        assert!(kinds.contains(&ViolationType::IgnoredAssigned));
        assert!(kinds.contains(&ViolationType::OrganisationConflict));
        assert!(kinds.contains(&ViolationType::MultiplePrimaries));
    }
}
