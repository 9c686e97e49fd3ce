//! Periodic (outline / full proposal / progress report) round assignment.
//!
//! # Algorithm
//!
//! Per round:
//! 1. Rank each project's candidates (score > 0, descending, shuffled within
//!    ties) and record every reviewer's single best-matching project.
//! 2. Diversity guard: the top-K candidates of each project form its likely
//!    team. A team seen more than `ratio × rounds` times before loses one
//!    non-top member for this project, along with that member's best-match
//!    claim on it.
//! 3. Admission walk over the ranked candidates. A candidate is admitted
//!    when not excluded, not yet used in the round, not reserved for a
//!    project ranked earlier by their best-match claim, not a second spare,
//!    and free of organisation conflicts.
//! 4. Short projects get a relaxed second pass over all reviewers in random
//!    order (any non-ignored score); an inexperienced reviewer may not fill
//!    the last slot of a team without an experienced member.
//!
//! Reviewers left over fall through to the gap filler.

use std::collections::HashSet;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use super::context::RunContext;
use super::plan::{RoundPlan, RunInput};
use crate::models::AssignmentStatus;

/// Assigns reviewers to the projects of one round.
pub(crate) fn assign_round<R: Rng>(
    input: &RunInput<'_>,
    ctx: &mut RunContext,
    plan: &mut RoundPlan,
    round_index: usize,
    rng: &mut R,
) {
    let pool = input.counted_pool();
    let k = input.config.min_reviewers;
    let include_spare = input.config.include_spare;

    let candidates: Vec<Vec<usize>> = (0..plan.projects.len())
        .map(|slot| ranked_candidates(input, plan.projects[slot], &pool, rng))
        .collect();
    record_best_matches(input, ctx, plan, &pool, rng);

    let excluded = diversity_guard(input, ctx, plan, &candidates, round_index, rng);

    for slot in 0..plan.projects.len() {
        let project_id = input.projects[plan.projects[slot]].id;

        for &r in &candidates[slot] {
            if plan.counted(slot, include_spare) >= k {
                break;
            }
            if excluded.contains(&(slot, r)) || !admissible(input, plan, slot, r) {
                continue;
            }
            if matches!(ctx.best_match.get(&r), Some(&claim) if slot > claim) {
                continue;
            }
            take(input, ctx, plan, slot, r);
        }

        if plan.counted(slot, include_spare) < k {
            let mut order = pool.clone();
            order.shuffle(rng);
            for r in order {
                let counted = plan.counted(slot, include_spare);
                if counted >= k {
                    break;
                }
                if excluded.contains(&(slot, r)) || !admissible(input, plan, slot, r) {
                    continue;
                }
                let last_slot = counted + 1 == k;
                if last_slot
                    && !input.reviewers[r].experienced
                    && !plan.has_experienced(slot, input.reviewers)
                {
                    continue;
                }
                take(input, ctx, plan, slot, r);
            }
        }

        let counted = plan.counted(slot, include_spare);
        if counted < k {
            decision!(
                ctx.log,
                "round {round_index}: project {project_id} short after main pass ({counted}/{k})"
            );
        } else {
            decision!(
                ctx.log,
                "round {round_index}: project {project_id} team {:?}",
                plan.team(slot)
                    .map(|r| input.reviewers[r].handle.as_str())
                    .collect::<Vec<_>>()
            );
        }
    }
}

/// Positive-score reviewers from `pool`, best first, random within ties.
fn ranked_candidates<R: Rng>(
    input: &RunInput<'_>,
    project: usize,
    pool: &[usize],
    rng: &mut R,
) -> Vec<usize> {
    let mut ranked: Vec<usize> = pool
        .iter()
        .copied()
        .filter(|&r| input.scores.raw(project, r) > 0.0)
        .collect();
    ranked.shuffle(rng);
    ranked.sort_by(|&a, &b| {
        input
            .scores
            .raw(project, b)
            .total_cmp(&input.scores.raw(project, a))
    });
    ranked
}

/// Records each reviewer's highest-scoring project slot in this round.
fn record_best_matches<R: Rng>(
    input: &RunInput<'_>,
    ctx: &mut RunContext,
    plan: &RoundPlan,
    pool: &[usize],
    rng: &mut R,
) {
    ctx.best_match.clear();
    for &r in pool {
        let best = plan
            .projects
            .iter()
            .map(|&p| input.scores.raw(p, r))
            .fold(0.0, f64::max);
        if best <= 0.0 {
            continue;
        }
        let tied: Vec<usize> = (0..plan.projects.len())
            .filter(|&slot| input.scores.raw(plan.projects[slot], r) == best)
            .collect();
        if let Some(&slot) = tied.choose(rng) {
            ctx.best_match.insert(r, slot);
        }
    }
}

/// Excludes one member from teams that keep recurring.
fn diversity_guard<R: Rng>(
    input: &RunInput<'_>,
    ctx: &mut RunContext,
    plan: &RoundPlan,
    candidates: &[Vec<usize>],
    round_index: usize,
    rng: &mut R,
) -> HashSet<(usize, usize)> {
    let k = input.config.min_reviewers;
    let threshold = ctx.recurrence_threshold(input.config.team_recurrence_ratio);
    let mut excluded = HashSet::new();

    for (slot, ranked) in candidates.iter().enumerate() {
        let team = &ranked[..ranked.len().min(k)];
        if team.len() < 2 {
            continue;
        }
        let mut key: Vec<String> = team
            .iter()
            .map(|&r| input.reviewers[r].handle.clone())
            .collect();
        key.sort();
        let seen = ctx.note_team(key);
        if seen as f64 <= threshold {
            continue;
        }

        let p = plan.projects[slot];
        let top_tied = input.scores.raw(p, team[0]) == input.scores.raw(p, team[1]);
        let eligible: Vec<usize> = team
            .iter()
            .enumerate()
            .filter(|&(i, _)| i > 0 || top_tied)
            .map(|(_, &r)| r)
            .collect();
        if let Some(&r) = eligible.choose(rng) {
            excluded.insert((slot, r));
            if ctx.best_match.get(&r) == Some(&slot) {
                ctx.best_match.remove(&r);
            }
            decision!(
                ctx.log,
                "round {round_index}: team of project {} seen {seen} times, excluding {}",
                input.projects[p].id,
                input.reviewers[r].handle
            );
        }
    }
    excluded
}

/// Round-level admission rules shared by both passes.
fn admissible(input: &RunInput<'_>, plan: &RoundPlan, slot: usize, r: usize) -> bool {
    if plan.is_used(r) {
        return false;
    }
    if !input.reviewers[r].present && plan.spare_count(slot, input.reviewers) >= 1 {
        return false;
    }
    plan.can_take(slot, r, input.reviewers)
}

fn take(input: &RunInput<'_>, ctx: &mut RunContext, plan: &mut RoundPlan, slot: usize, r: usize) {
    let status = AssignmentStatus::for_presence(input.reviewers[r].present);
    if plan.assign(slot, r, status) {
        ctx.add_workload(r);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RosterConfig;
    use crate::models::{Project, ReviewEvent, ReviewType, Reviewer};
    use crate::scheduler::plan::fixtures::Fixture;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn distinct_reviewers(n: usize) -> Vec<Reviewer> {
        (0..n)
            .map(|i| Reviewer::new(format!("r{i}"), format!("org{i}")).experienced())
            .collect()
    }

    #[test]
    fn test_history_drives_selection() {
        let f = Fixture::new(
            distinct_reviewers(6),
            vec![
                Project::new(1, "A")
                    .with_event(ReviewEvent::new(ReviewType::OutlineReview, ["r0", "r1"])),
                Project::new(2, "B")
                    .with_event(ReviewEvent::new(ReviewType::OutlineReview, ["r2", "r3"])),
            ],
            RosterConfig::default().with_min_reviewers(2),
        );
        for seed in 0..10 {
            let mut ctx = RunContext::new(6, 1);
            let mut plan = RoundPlan::new(vec![0, 1], &f.input());
            let mut rng = SmallRng::seed_from_u64(seed);
            assign_round(&f.input(), &mut ctx, &mut plan, 0, &mut rng);

            let a: Vec<usize> = plan.team(0).collect();
            let b: Vec<usize> = plan.team(1).collect();
            assert_eq!(a, vec![0, 1]);
            assert_eq!(b, vec![2, 3]);
        }
    }

    #[test]
    fn test_reviewer_used_once_per_round() {
        let f = Fixture::new(
            distinct_reviewers(6),
            vec![
                Project::new(1, "A").with_preferred("r0"),
                Project::new(2, "B").with_preferred("r0"),
            ],
            RosterConfig::default().with_min_reviewers(3),
        );
        for seed in 0..10 {
            let mut ctx = RunContext::new(6, 1);
            let mut plan = RoundPlan::new(vec![0, 1], &f.input());
            let mut rng = SmallRng::seed_from_u64(seed);
            assign_round(&f.input(), &mut ctx, &mut plan, 0, &mut rng);

            let on_a = plan.status(0, 0).is_assigned();
            let on_b = plan.status(1, 0).is_assigned();
            assert!(on_a ^ on_b);
            assert_eq!(plan.team_size(0), 3);
            assert_eq!(plan.team_size(1), 3);
        }
    }

    #[test]
    fn test_organisation_conflict_in_round() {
        let reviewers = vec![
            Reviewer::new("a", "Acme").experienced(),
            Reviewer::new("b", "Acme").experienced(),
            Reviewer::new("c", "Globex").experienced(),
            Reviewer::new("d", "Initech").experienced(),
        ];
        let f = Fixture::new(
            reviewers,
            vec![Project::new(1, "A").with_preferred("a").with_preferred("b")],
            RosterConfig::default().with_min_reviewers(3),
        );
        for seed in 0..10 {
            let mut ctx = RunContext::new(4, 1);
            let mut plan = RoundPlan::new(vec![0], &f.input());
            let mut rng = SmallRng::seed_from_u64(seed);
            assign_round(&f.input(), &mut ctx, &mut plan, 0, &mut rng);

            let team: Vec<usize> = plan.team(0).collect();
            assert!(!(team.contains(&0) && team.contains(&1)));
            assert_eq!(team.len(), 3);
        }
    }

    #[test]
    fn test_spares_skipped_when_policy_off() {
        let reviewers = vec![
            Reviewer::new("p", "P").experienced(),
            Reviewer::new("s", "S").spare().experienced(),
        ];
        let f = Fixture::new(
            reviewers,
            vec![Project::new(1, "A").with_preferred("s")],
            RosterConfig::default().with_min_reviewers(2),
        );
        let mut ctx = RunContext::new(2, 1);
        let mut plan = RoundPlan::new(vec![0], &f.input());
        let mut rng = SmallRng::seed_from_u64(5);
        assign_round(&f.input(), &mut ctx, &mut plan, 0, &mut rng);

        assert_eq!(plan.status(0, 1), AssignmentStatus::Unassigned);
        assert_eq!(plan.status(0, 0), AssignmentStatus::Assigned);
        assert!(ctx.log.contains("short after main pass (1/2)"));
    }

    #[test]
    fn test_at_most_one_spare_per_project() {
        let reviewers = vec![
            Reviewer::new("s1", "A").spare().experienced(),
            Reviewer::new("s2", "B").spare().experienced(),
            Reviewer::new("p1", "C").experienced(),
            Reviewer::new("p2", "D").experienced(),
        ];
        let f = Fixture::new(
            reviewers,
            vec![Project::new(1, "A").with_preferred("s1").with_preferred("s2")],
            RosterConfig::default()
                .with_min_reviewers(3)
                .with_include_spare(true),
        );
        for seed in 0..10 {
            let mut ctx = RunContext::new(4, 1);
            let mut plan = RoundPlan::new(vec![0], &f.input());
            let mut rng = SmallRng::seed_from_u64(seed);
            assign_round(&f.input(), &mut ctx, &mut plan, 0, &mut rng);

            assert_eq!(plan.spare_count(0, &f.reviewers), 1);
            assert_eq!(plan.team_size(0), 3);
        }
    }

    #[test]
    fn test_last_slot_requires_experience() {
        let reviewers = vec![
            Reviewer::new("n1", "A"),
            Reviewer::new("n2", "B"),
            Reviewer::new("n3", "C"),
        ];
        let f = Fixture::new(
            reviewers,
            vec![Project::new(1, "A")],
            RosterConfig::default().with_min_reviewers(3),
        );
        let mut ctx = RunContext::new(3, 1);
        let mut plan = RoundPlan::new(vec![0], &f.input());
        let mut rng = SmallRng::seed_from_u64(2);
        assign_round(&f.input(), &mut ctx, &mut plan, 0, &mut rng);

        assert_eq!(plan.team_size(0), 2);
        assert!(ctx.log.contains("short after main pass (2/3)"));
    }

    #[test]
    fn test_best_match_claim_blocks_later_projects() {
        // r0's best match is B (slot 0), which fills up with r1 instead.
        // C (slot 1) ranks r0 first, but comes after B, so r0 only reaches C
        // through the random second pass.
        let f = Fixture::new(
            distinct_reviewers(3),
            vec![
                Project::new(1, "B")
                    .with_event(ReviewEvent::new(ReviewType::GenericReview, ["r1"]))
                    .with_preferred("r0")
                    .with_preferred("r1"),
                Project::new(2, "C")
                    .with_event(ReviewEvent::new(ReviewType::OutlineReview, ["r0"])),
            ],
            RosterConfig::default().with_min_reviewers(1),
        );
        let mut saw_other = false;
        for seed in 0..20 {
            let mut ctx = RunContext::new(3, 1);
            let mut plan = RoundPlan::new(vec![0, 1], &f.input());
            let mut rng = SmallRng::seed_from_u64(seed);
            assign_round(&f.input(), &mut ctx, &mut plan, 0, &mut rng);

            assert_eq!(ctx.best_match.get(&0), Some(&0));
            assert_eq!(plan.team(0).collect::<Vec<_>>(), vec![1]);
            let c: Vec<usize> = plan.team(1).collect();
            assert_eq!(c.len(), 1);
            saw_other |= c == vec![2];
        }
        assert!(saw_other);
    }

    #[test]
    fn test_recurring_team_loses_a_member() {
        let reviewers = distinct_reviewers(5);
        let f = Fixture::new(
            reviewers,
            vec![Project::new(1, "A")
                .with_event(ReviewEvent::new(ReviewType::GenericReview, ["r0"]))
                .with_event(ReviewEvent::new(ReviewType::OutlineReview, ["r1"]))],
            RosterConfig::default().with_min_reviewers(2),
        );
        let mut ctx = RunContext::new(5, 1);
        ctx.team_recurrence
            .insert(vec!["r0".to_string(), "r1".to_string()], 3);
        let mut plan = RoundPlan::new(vec![0], &f.input());
        let mut rng = SmallRng::seed_from_u64(9);
        assign_round(&f.input(), &mut ctx, &mut plan, 0, &mut rng);

        // r0 is the clear top scorer and stays; r1 is excluded
        assert!(plan.status(0, 0).is_assigned());
        assert!(!plan.status(0, 1).is_assigned());
        assert_eq!(plan.team_size(0), 2);
        assert!(ctx.log.contains("excluding r1"));
    }

    #[test]
    fn test_tied_top_scorers_may_be_excluded() {
        let f = Fixture::new(
            distinct_reviewers(4),
            vec![Project::new(1, "A").with_preferred("r0").with_preferred("r1")],
            RosterConfig::default().with_min_reviewers(2),
        );
        let mut excluded = [false; 2];
        for seed in 0..40 {
            let mut ctx = RunContext::new(4, 1);
            ctx.team_recurrence
                .insert(vec!["r0".to_string(), "r1".to_string()], 3);
            let mut plan = RoundPlan::new(vec![0], &f.input());
            let mut rng = SmallRng::seed_from_u64(seed);
            assign_round(&f.input(), &mut ctx, &mut plan, 0, &mut rng);

            let r0_out = ctx.log.contains("excluding r0");
            let r1_out = ctx.log.contains("excluding r1");
            assert!(r0_out ^ r1_out);
            assert_eq!(plan.status(0, 0).is_assigned(), !r0_out);
            assert_eq!(plan.status(0, 1).is_assigned(), !r1_out);
            excluded[0] |= r0_out;
            excluded[1] |= r1_out;
        }
        assert_eq!(excluded, [true, true]);
    }

    #[test]
    fn test_excluded_member_releases_best_match_claim() {
        // A: r0 = 15, r1 = 5. B: r1 = 1, r2 = 1. r1's best match is A, but
        // the recurring A team drops r1, so B may admit r1 in the first pass.
        let f = Fixture::new(
            distinct_reviewers(5),
            vec![
                Project::new(1, "A")
                    .with_event(ReviewEvent::new(ReviewType::GenericReview, ["r0", "r1"]))
                    .with_preferred("r0"),
                Project::new(2, "B")
                    .with_event(ReviewEvent::new(ReviewType::OutlineReview, ["r1", "r2"])),
            ],
            RosterConfig::default().with_min_reviewers(2),
        );
        for seed in 0..30 {
            let mut ctx = RunContext::new(5, 1);
            ctx.team_recurrence
                .insert(vec!["r0".to_string(), "r1".to_string()], 3);
            let mut plan = RoundPlan::new(vec![0, 1], &f.input());
            let mut rng = SmallRng::seed_from_u64(seed);
            assign_round(&f.input(), &mut ctx, &mut plan, 0, &mut rng);

            assert!(ctx.log.contains("excluding r1"));
            assert_eq!(ctx.best_match.get(&1), None);
            assert!(plan.status(0, 0).is_assigned());
            assert!(!plan.status(0, 1).is_assigned());
            assert!(plan.status(1, 1).is_assigned());
        }
    }
}
