//! Roster engine: the full pipeline with bounded retry.
//!
//! # Algorithm
//!
//! 1. Validate configuration and input (fatal on failure).
//! 2. Score every (project, reviewer) pair once.
//! 3. Periodic rosters: partition projects into rounds and run the
//!    distribution search. Change-request rosters use a single round.
//! 4. Up to `max_attempts` times: generate assignments, fill gaps and check
//!    coverage. The first attempt with full coverage is returned; otherwise
//!    the last attempt is returned with its shortfalls logged.
//!
//! The distribution search has no random component, so its layout is
//! computed once and shared by every attempt.

use rand::Rng;
use tracing::{debug, info, warn};

use super::change_request::assign_change_requests;
use super::context::RunContext;
use super::distribution::{naive_rounds, optimize_rounds};
use super::gap_fill::fill_gaps;
use super::partition::{capacity_reviewers, partition_rounds};
use super::periodic::assign_round;
use super::plan::{RoundPlan, RunInput};
use super::validator::check_coverage;
use crate::config::RosterConfig;
use crate::models::{DecisionLog, Project, ReviewType, Reviewer, Roster, Round, Shortfall};
use crate::scoring::AffinityScorer;
use crate::validation::validate_input;
use crate::RosterError;

/// Input container for a roster run.
#[derive(Debug, Clone)]
pub struct RosterRequest {
    /// Roster type; change-request rosters use a single round.
    pub review_type: ReviewType,
    /// Present and spare reviewers.
    pub reviewers: Vec<Reviewer>,
    /// Projects to staff.
    pub projects: Vec<Project>,
    /// Tuning parameters.
    pub config: RosterConfig,
}

impl RosterRequest {
    /// Creates a request with the default configuration.
    pub fn new(review_type: ReviewType, reviewers: Vec<Reviewer>, projects: Vec<Project>) -> Self {
        Self {
            review_type,
            reviewers,
            projects,
            config: RosterConfig::default(),
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: RosterConfig) -> Self {
        self.config = config;
        self
    }
}

struct Attempt {
    rounds: Vec<Round>,
    shortfalls: Vec<Shortfall>,
    log: DecisionLog,
}

/// Retrying roster generator.
///
/// # Example
///
/// ```
/// use u_roster::models::{Project, ReviewType, Reviewer};
/// use u_roster::scheduler::{RosterEngine, RosterRequest};
///
/// let reviewers = vec![
///     Reviewer::new("a", "Acme"),
///     Reviewer::new("b", "Globex"),
///     Reviewer::new("c", "Initech"),
/// ];
/// let projects = vec![Project::new(1, "Alpha")];
/// let request = RosterRequest::new(ReviewType::ChangeRequestReview, reviewers, projects);
///
/// let roster = RosterEngine::new().run(&request).unwrap();
/// assert_eq!(roster.rounds.len(), 1);
/// assert!(roster.rounds[0].projects[0].primary().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RosterEngine;

impl RosterEngine {
    /// Creates an engine.
    pub fn new() -> Self {
        Self
    }

    /// Runs the pipeline with the thread-local RNG.
    pub fn run(&self, request: &RosterRequest) -> Result<Roster, RosterError> {
        let mut rng = rand::rng();
        self.run_with_rng(request, &mut rng)
    }

    /// Runs the pipeline with a caller-supplied RNG.
    pub fn run_with_rng<R: Rng>(
        &self,
        request: &RosterRequest,
        rng: &mut R,
    ) -> Result<Roster, RosterError> {
        let RosterRequest {
            review_type,
            reviewers,
            projects,
            config,
        } = request;
        let review_type = *review_type;

        config.validate()?;
        if !review_type.is_rosterable() {
            return Err(RosterError::UnsupportedRosterType(review_type));
        }
        validate_input(reviewers, projects)?;

        info!(
            %review_type,
            reviewers = reviewers.len(),
            projects = projects.len(),
            "starting roster run"
        );
        let mut log = DecisionLog::new();

        let scores = AffinityScorer::new(&config.boosts).score(projects, reviewers);
        debug!(average_activity = scores.average_activity(), "affinity scores ready");
        decision!(
            log,
            "scored {} projects x {} reviewers, average activity {:.2}",
            scores.project_count(),
            scores.reviewer_count(),
            scores.average_activity()
        );
        let input = RunInput {
            reviewers,
            projects,
            scores: &scores,
            config,
        };

        let layout = self.layout(&input, review_type, &mut log);
        debug!(rounds = layout.len(), "round layout ready");

        let mut attempt = 1;
        let outcome = loop {
            let outcome = self.attempt(&input, review_type, &layout, rng);
            if outcome.shortfalls.is_empty() {
                decision!(log, "attempt {attempt}: every project staffed");
                info!(attempt, "roster complete");
                break outcome;
            }
            decision!(
                log,
                "attempt {attempt}: {} project(s) below minimum",
                outcome.shortfalls.len()
            );
            if attempt >= config.max_attempts {
                warn!(
                    attempts = attempt,
                    shortfalls = outcome.shortfalls.len(),
                    "retry ceiling reached, returning best effort"
                );
                for s in &outcome.shortfalls {
                    decision!(
                        log,
                        "round {}: project {} has {}/{} reviewers",
                        s.round,
                        s.project_id,
                        s.assigned,
                        s.required
                    );
                }
                info!(attempt, "roster run finished with shortfalls");
                break outcome;
            }
            info!(
                attempt,
                shortfalls = outcome.shortfalls.len(),
                "attempt below minimum, retrying"
            );
            attempt += 1;
        };

        let Attempt {
            rounds,
            shortfalls,
            log: attempt_log,
        } = outcome;
        log.extend(attempt_log);

        Ok(Roster {
            review_type,
            rounds,
            attempts: attempt,
            shortfalls,
            log,
        })
    }

    /// Project positions per round.
    fn layout(
        &self,
        input: &RunInput<'_>,
        review_type: ReviewType,
        log: &mut DecisionLog,
    ) -> Vec<Vec<usize>> {
        if input.projects.is_empty() {
            return Vec::new();
        }
        if !review_type.is_periodic() {
            return vec![(0..input.projects.len()).collect()];
        }

        let config = input.config;
        let capacity = capacity_reviewers(input.reviewers, config.include_spare);
        if capacity < config.min_reviewers {
            decision!(
                log,
                "only {capacity} reviewers for a minimum of {}, one project per round",
                config.min_reviewers
            );
        }
        let sizes = partition_rounds(
            input.projects.len(),
            config.min_reviewers,
            capacity,
            config.projects_per_round_cap(),
        );
        decision!(log, "round sizes {sizes:?}");

        let outcome = optimize_rounds(
            naive_rounds(&sizes),
            input.scores,
            config.max_optimizer_passes,
        );
        decision!(
            log,
            "distribution search: {} swap(s) in {} pass(es), boost spread {:.3} -> {:.3}, ignore spread {:.3} -> {:.3}",
            outcome.swaps,
            outcome.passes,
            outcome.initial.boost,
            outcome.objectives.boost,
            outcome.initial.ignore,
            outcome.objectives.ignore
        );
        outcome.rounds
    }

    /// One generation attempt with a fresh run context.
    fn attempt<R: Rng>(
        &self,
        input: &RunInput<'_>,
        review_type: ReviewType,
        layout: &[Vec<usize>],
        rng: &mut R,
    ) -> Attempt {
        let mut ctx = RunContext::new(input.reviewers.len(), layout.len());

        let mut plans: Vec<RoundPlan> = if review_type.is_periodic() {
            layout
                .iter()
                .enumerate()
                .map(|(index, projects)| {
                    let mut plan = RoundPlan::new(projects.clone(), input);
                    assign_round(input, &mut ctx, &mut plan, index, rng);
                    plan
                })
                .collect()
        } else if layout.is_empty() {
            Vec::new()
        } else {
            vec![assign_change_requests(input, &mut ctx, rng)]
        };

        fill_gaps(input, &mut ctx, &mut plans, rng);

        let rounds: Vec<Round> = plans
            .into_iter()
            .enumerate()
            .map(|(index, plan)| plan.into_round(index, input))
            .collect();
        let shortfalls = check_coverage(
            &rounds,
            input.config.min_reviewers,
            input.config.include_spare,
        );

        Attempt {
            rounds,
            shortfalls,
            log: ctx.log,
        }
    }
}
