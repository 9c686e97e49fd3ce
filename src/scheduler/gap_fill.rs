//! Gap filler.
//!
//! Runs after the main assignment pass of every round:
//! 1. Projects still below the minimum draw from reviewers not yet used in
//!    the round (neediest project first, best original score first).
//! 2. In every round but the last, reviewers still unused are added as
//!    extras to the least-staffed project they may join, preferring the one
//!    they score highest on.
//!
//! Ignore lists and organisation conflicts hold throughout.

use rand::seq::SliceRandom;
use rand::Rng;

use super::context::RunContext;
use super::plan::{RoundPlan, RunInput};
use crate::models::AssignmentStatus;

/// Fills remaining gaps in every round.
pub(crate) fn fill_gaps<R: Rng>(
    input: &RunInput<'_>,
    ctx: &mut RunContext,
    rounds: &mut [RoundPlan],
    rng: &mut R,
) {
    let last = rounds.len().saturating_sub(1);
    for (index, plan) in rounds.iter_mut().enumerate() {
        fill_shortfalls(input, ctx, plan, index, rng);
        if index < last {
            distribute_extras(input, ctx, plan, index, rng);
        }
    }
}

fn fill_shortfalls<R: Rng>(
    input: &RunInput<'_>,
    ctx: &mut RunContext,
    plan: &mut RoundPlan,
    round_index: usize,
    rng: &mut R,
) {
    let k = input.config.min_reviewers;
    let include_spare = input.config.include_spare;

    let mut pool: Vec<usize> = input
        .counted_pool()
        .into_iter()
        .filter(|&r| !plan.is_used(r))
        .collect();
    pool.shuffle(rng);

    let mut short: Vec<usize> = (0..plan.projects.len())
        .filter(|&slot| plan.counted(slot, include_spare) < k)
        .collect();
    short.sort_by_key(|&slot| plan.counted(slot, include_spare));

    for slot in short {
        let p = plan.projects[slot];
        while plan.counted(slot, include_spare) < k && !pool.is_empty() {
            let best = pool
                .iter()
                .enumerate()
                .filter(|&(_, &r)| plan.can_take(slot, r, input.reviewers))
                .fold(None, |acc: Option<(usize, usize)>, (i, &r)| match acc {
                    Some((_, b)) if input.scores.raw(p, b) >= input.scores.raw(p, r) => acc,
                    _ => Some((i, r)),
                });
            let Some((i, r)) = best else {
                break;
            };
            pool.swap_remove(i);
            plan.assign(slot, r, AssignmentStatus::for_presence(input.reviewers[r].present));
            ctx.add_workload(r);
            decision!(
                ctx.log,
                "round {round_index}: gap fill {} -> project {}",
                input.reviewers[r].handle,
                input.projects[p].id
            );
        }
    }
}

fn distribute_extras<R: Rng>(
    input: &RunInput<'_>,
    ctx: &mut RunContext,
    plan: &mut RoundPlan,
    round_index: usize,
    rng: &mut R,
) {
    let mut leftovers: Vec<usize> = (0..input.reviewers.len())
        .filter(|&r| !plan.is_used(r))
        .collect();
    leftovers.shuffle(rng);

    for r in leftovers {
        let mut slots: Vec<usize> = (0..plan.projects.len())
            .filter(|&slot| plan.can_take(slot, r, input.reviewers))
            .collect();
        let Some(min_load) = slots.iter().map(|&slot| plan.team_size(slot)).min() else {
            continue;
        };
        slots.retain(|&slot| plan.team_size(slot) == min_load);
        slots.shuffle(rng);
        let score = |slot: usize| input.scores.raw(plan.projects[slot], r);
        let target = slots
            .iter()
            .copied()
            .fold(None, |acc: Option<usize>, slot| match acc {
                Some(best) if score(best) >= score(slot) => acc,
                _ => Some(slot),
            });
        if let Some(slot) = target {
            let status = AssignmentStatus::extra_for_presence(input.reviewers[r].present);
            plan.assign(slot, r, status);
            ctx.add_workload(r);
            decision!(
                ctx.log,
                "round {round_index}: extra {} -> project {}",
                input.reviewers[r].handle,
                input.projects[plan.projects[slot]].id
            );
        }
    }
}
