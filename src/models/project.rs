//! Project model.
//!
//! A project is the unit under review. It carries its chronological review
//! history plus explicit preferred and ignored reviewer sets, all of which
//! feed the affinity scorer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Kind of review event, also used as the roster type of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewType {
    /// Short outline review.
    OutlineReview,
    /// Full proposal review.
    FullProposalReview,
    /// Change-request review (single round, primary reviewer).
    ChangeRequestReview,
    /// Periodic progress report review.
    ProgressReportReview,
    /// Review of unspecified kind.
    GenericReview,
    /// Reviewer earmarked for the next evaluation of this project.
    FutureEvaluation,
    /// Explicit preference marker.
    PreferredReviewer,
}

impl ReviewType {
    /// All review types, in declaration order.
    pub const ALL: [ReviewType; 7] = [
        ReviewType::OutlineReview,
        ReviewType::FullProposalReview,
        ReviewType::ChangeRequestReview,
        ReviewType::ProgressReportReview,
        ReviewType::GenericReview,
        ReviewType::FutureEvaluation,
        ReviewType::PreferredReviewer,
    ];

    /// Stable kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewType::OutlineReview => "outline-review",
            ReviewType::FullProposalReview => "full-proposal-review",
            ReviewType::ChangeRequestReview => "change-request-review",
            ReviewType::ProgressReportReview => "progress-report-review",
            ReviewType::GenericReview => "generic-review",
            ReviewType::FutureEvaluation => "future-evaluation",
            ReviewType::PreferredReviewer => "preferred-reviewer",
        }
    }

    /// Whether a roster run can be driven by this type.
    ///
    /// Future-evaluation and preferred markers only tag history.
    pub fn is_rosterable(&self) -> bool {
        !matches!(
            self,
            ReviewType::FutureEvaluation | ReviewType::PreferredReviewer
        )
    }

    /// Whether rosters of this type are split into rounds.
    pub fn is_periodic(&self) -> bool {
        *self != ReviewType::ChangeRequestReview
    }
}

impl fmt::Display for ReviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A historical review record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEvent {
    /// Kind of review held.
    pub review_type: ReviewType,
    /// Handles of the reviewers involved.
    pub reviewers: Vec<String>,
}

impl ReviewEvent {
    /// Creates a review event.
    pub fn new<I, S>(review_type: ReviewType, reviewers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            review_type,
            reviewers: reviewers.into_iter().map(Into::into).collect(),
        }
    }
}

/// A project to be reviewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Numeric project identifier.
    pub id: u64,
    /// Human-readable name.
    pub name: String,
    /// Call or batch label.
    pub call: String,
    /// Review history, oldest first.
    pub history: Vec<ReviewEvent>,
    /// Reviewers that must never be assigned.
    pub ignored: BTreeSet<String>,
    /// Reviewers receiving a fixed preference boost.
    pub preferred: BTreeSet<String>,
}

impl Project {
    /// Creates a project with no history.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            call: String::new(),
            history: Vec::new(),
            ignored: BTreeSet::new(),
            preferred: BTreeSet::new(),
        }
    }

    /// Sets the call label.
    pub fn with_call(mut self, call: impl Into<String>) -> Self {
        self.call = call.into();
        self
    }

    /// Appends a review event (events must be added oldest first).
    pub fn with_event(mut self, event: ReviewEvent) -> Self {
        self.history.push(event);
        self
    }

    /// Adds a reviewer to the ignored set.
    pub fn with_ignored(mut self, handle: impl Into<String>) -> Self {
        self.ignored.insert(handle.into());
        self
    }

    /// Adds a reviewer to the preferred set.
    pub fn with_preferred(mut self, handle: impl Into<String>) -> Self {
        self.preferred.insert(handle.into());
        self
    }

    /// Whether the reviewer is on this project's ignore list.
    #[inline]
    pub fn ignores(&self, handle: &str) -> bool {
        self.ignored.contains(handle)
    }

    /// Handles earmarked by future-evaluation events, newest first, deduplicated.
    pub fn future_evaluators(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for event in self.history.iter().rev() {
            if event.review_type != ReviewType::FutureEvaluation {
                continue;
            }
            for handle in &event.reviewers {
                if seen.insert(handle.as_str()) {
                    out.push(handle.as_str());
                }
            }
        }
        out
    }

    /// Every handle this project references (history, ignored, preferred).
    pub fn referenced_handles(&self) -> impl Iterator<Item = &str> {
        self.history
            .iter()
            .flat_map(|e| e.reviewers.iter())
            .chain(self.ignored.iter())
            .chain(self.preferred.iter())
            .map(String::as_str)
    }
}
