//! Reviewer roster assignment for the U-Engine ecosystem.
//!
//! Turns a roster of reviewers, a list of projects with review history and a
//! handful of tuning parameters into a schedule of reviewer-to-project
//! assignments across one or more review rounds.
//!
//! # Modules
//!
//! - **`models`**: Domain types (`Reviewer`, `Project`, `ReviewEvent`,
//!   `Roster`, `AssignmentStatus`, `DecisionLog`)
//! - **`config`**: Run parameters and per-review-type boost table
//! - **`scoring`**: Affinity scores from review history and preference lists
//! - **`scheduler`**: Round partitioning, distribution search, assignment
//!   generation, gap filling, coverage validation and the retrying engine
//! - **`validation`**: Input integrity checks (duplicate handles, unknown references)
//!
//! # Architecture
//!
//! The engine is a pure function of its explicit inputs: it performs no I/O
//! and keeps all working state local to one call. Randomness only breaks
//! ties, so structural guarantees (ignore lists, organisation conflicts) hold
//! for every seed.
//!
//! # Example
//!
//! ```
//! use u_roster::config::RosterConfig;
//! use u_roster::models::{Project, ReviewType, Reviewer};
//! use u_roster::scheduler::{RosterEngine, RosterRequest};
//!
//! let reviewers: Vec<Reviewer> = (0..6)
//!     .map(|i| Reviewer::new(format!("r{i}"), format!("org{i}")))
//!     .collect();
//! let projects = vec![Project::new(1, "Alpha"), Project::new(2, "Beta")];
//! let request = RosterRequest::new(ReviewType::OutlineReview, reviewers, projects)
//!     .with_config(RosterConfig::default().with_min_reviewers(3));
//!
//! let roster = RosterEngine::new().run(&request).unwrap();
//! assert!(roster.is_complete());
//! ```

/// Records a decision in a [`models::DecisionLog`], tagged with the caller's
/// module path and source line.
macro_rules! decision {
    ($log:expr, $($arg:tt)*) => {
        $log.record(module_path!(), line!(), format!($($arg)*))
    };
}

pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod scoring;
pub mod validation;

pub use error::RosterError;
