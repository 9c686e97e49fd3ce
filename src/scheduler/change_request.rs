//! Change-request assignment.
//!
//! Change-request rosters have no rounds: every project is handled in one
//! pass, ordered by call (descending).
//!
//! # Algorithm
//!
//! 1. Reviewers earmarked by future-evaluation events are taken first, up
//!    to the minimum, skipping organisation conflicts.
//! 2. Without a usable earmark, the single highest-scoring reviewer is taken
//!    (random among ties).
//! 3. Remaining slots go to the least-loaded conflict-free reviewer, with
//!    the workload order refreshed after every pick.
//! 4. Exactly one team member becomes primary: one sourced in step 1 or 2
//!    when available, otherwise any member.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use super::context::RunContext;
use super::plan::{RoundPlan, RunInput};
use crate::models::AssignmentStatus;

/// Project positions ordered by call, descending (stable for equal calls).
pub(crate) fn order_by_call(input: &RunInput<'_>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..input.projects.len()).collect();
    order.sort_by(|&a, &b| input.projects[b].call.cmp(&input.projects[a].call));
    order
}

/// Builds the single change-request round.
pub(crate) fn assign_change_requests<R: Rng>(
    input: &RunInput<'_>,
    ctx: &mut RunContext,
    rng: &mut R,
) -> RoundPlan {
    let mut plan = RoundPlan::new(order_by_call(input), input);
    let pool = input.counted_pool();
    let min = input.config.min_reviewers;
    let include_spare = input.config.include_spare;

    for slot in 0..plan.projects.len() {
        let project = &input.projects[plan.projects[slot]];
        let mut sourced = Vec::new();

        for handle in project.future_evaluators() {
            if plan.counted(slot, include_spare) >= min {
                break;
            }
            let Some(r) = input.scores.reviewer_index(handle) else {
                continue;
            };
            if !pool.contains(&r) || !plan.can_take(slot, r, input.reviewers) {
                continue;
            }
            let status = AssignmentStatus::for_presence(input.reviewers[r].present);
            plan.assign(slot, r, status);
            ctx.add_workload(r);
            sourced.push(r);
            decision!(
                ctx.log,
                "project {}: {} taken from future-evaluation marker",
                project.id,
                input.reviewers[r].handle
            );
        }

        if sourced.is_empty() {
            if let Some(r) = best_scoring(&plan, slot, &pool, input, rng) {
                let status = AssignmentStatus::for_presence(input.reviewers[r].present);
                plan.assign(slot, r, status);
                ctx.add_workload(r);
                sourced.push(r);
                decision!(
                    ctx.log,
                    "project {}: {} is best match (score {:.3})",
                    project.id,
                    input.reviewers[r].handle,
                    input.scores.raw(plan.projects[slot], r)
                );
            }
        }

        while plan.counted(slot, include_spare) < min {
            let mut order = pool.clone();
            order.shuffle(rng);
            order.sort_by_key(|&r| ctx.workload_of(r));
            let Some(r) = order
                .into_iter()
                .find(|&r| plan.can_take(slot, r, input.reviewers))
            else {
                decision!(
                    ctx.log,
                    "project {}: no conflict-free reviewer left ({}/{})",
                    project.id,
                    plan.counted(slot, include_spare),
                    min
                );
                break;
            };
            let status = AssignmentStatus::for_presence(input.reviewers[r].present);
            plan.assign(slot, r, status);
            ctx.add_workload(r);
            decision!(
                ctx.log,
                "project {}: {} added by workload ({})",
                project.id,
                input.reviewers[r].handle,
                ctx.workload_of(r)
            );
        }

        let team: Vec<usize> = plan.team(slot).collect();
        let primary = sourced
            .choose(rng)
            .or_else(|| team.choose(rng))
            .copied();
        if let Some(r) = primary {
            plan.assign(slot, r, AssignmentStatus::Primary);
            decision!(
                ctx.log,
                "project {}: {} is primary",
                project.id,
                input.reviewers[r].handle
            );
        }
    }

    plan
}

/// Highest-scoring takeable reviewer, random among ties.
fn best_scoring<R: Rng>(
    plan: &RoundPlan,
    slot: usize,
    pool: &[usize],
    input: &RunInput<'_>,
    rng: &mut R,
) -> Option<usize> {
    let p = plan.projects[slot];
    let takeable: Vec<usize> = pool
        .iter()
        .copied()
        .filter(|&r| plan.can_take(slot, r, input.reviewers))
        .collect();
    let best = takeable
        .iter()
        .map(|&r| input.scores.raw(p, r))
        .fold(f64::NEG_INFINITY, f64::max);
    let tied: Vec<usize> = takeable
        .into_iter()
        .filter(|&r| input.scores.raw(p, r) == best)
        .collect();
    tied.choose(rng).copied()
}
