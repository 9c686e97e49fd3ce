//! Roster domain models.
//!
//! Provides the input types (reviewers, projects, review history) and the
//! output types (rounds, per-project reviewer statuses, decision log) of a
//! roster run.
//!
//! # Domain Mappings
//!
//! | u-roster | Grant Panels | Conference | Audit |
//! |----------|-------------|------------|-------|
//! | Reviewer | Panel Expert | PC Member | Auditor |
//! | Project | Proposal | Submission | Engagement |
//! | Round | Panel Session | Review Wave | Audit Cycle |
//! | Roster | Panel Schedule | Assignment Sheet | Audit Plan |

mod log;
mod project;
mod reviewer;
mod roster;

pub use log::{DecisionLog, LogEntry};
pub use project::{Project, ReviewEvent, ReviewType};
pub use reviewer::Reviewer;
pub use roster::{AssignmentStatus, ProjectAssignment, Roster, Round, Shortfall};
