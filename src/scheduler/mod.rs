//! Roster generation and KPI evaluation.
//!
//! # Pipeline
//!
//! 1. **Partition**: projects are split into rounds so that every project
//!    in a round can be staffed from disjoint reviewers.
//! 2. **Distribution**: a single-swap hill climb spreads historically
//!    boosted and ignored reviewers evenly across rounds.
//! 3. **Generation**: each round is staffed from ranked candidates
//!    (periodic rosters), or every project is staffed in call order with a
//!    primary reviewer (change-request rosters).
//! 4. **Gap filling**: short projects draw unused reviewers; leftovers join
//!    the least-staffed projects as extras.
//! 5. **Validation**: coverage is checked and the engine retries up to a
//!    configured number of attempts.
//!
//! `RosterEngine` drives the whole pipeline; the other public items are the
//! deterministic building blocks.
//!
//! # KPI
//!
//! `RosterKpi` summarises reviewer load balance and coverage of a roster.

mod change_request;
mod context;
mod distribution;
mod engine;
mod gap_fill;
mod kpi;
mod partition;
mod periodic;
mod plan;
mod validator;

pub use distribution::{
    boost_spread, dominates, ignore_spread, naive_rounds, optimize_pass, optimize_rounds,
    population_std_dev, DistributionOutcome, Objectives,
};
pub use engine::{RosterEngine, RosterRequest};
pub use kpi::RosterKpi;
pub use partition::{capacity_reviewers, max_projects_per_round, partition_rounds};
pub use validator::{check_coverage, find_violations, Violation, ViolationType};
