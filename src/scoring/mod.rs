//! Reviewer-project affinity scoring.
//!
//! Scores express how well suited a reviewer is for a project, derived from
//! the project's review history and its preferred/ignored lists. A negative
//! score is the ignored sentinel, zero is neutral, positive is boosted.
//!
//! # Usage
//!
//! ```
//! use u_roster::config::BoostTable;
//! use u_roster::models::{Project, ReviewEvent, ReviewType, Reviewer};
//! use u_roster::scoring::{Affinity, AffinityScorer};
//!
//! let reviewers = vec![Reviewer::new("a", "Acme"), Reviewer::new("b", "Globex")];
//! let projects = vec![Project::new(1, "P")
//!     .with_event(ReviewEvent::new(ReviewType::GenericReview, ["a"]))
//!     .with_ignored("b")];
//!
//! let boosts = BoostTable::default();
//! let scores = AffinityScorer::new(&boosts).score(&projects, &reviewers);
//! assert_eq!(scores.get(0, "a"), Some(Affinity::Boosted(5.0)));
//! assert_eq!(scores.get(0, "b"), Some(Affinity::Ignored));
//! ```

mod affinity;

pub use affinity::{average_activity, Affinity, AffinityScorer, AffinityScores, IGNORED_SCORE};
