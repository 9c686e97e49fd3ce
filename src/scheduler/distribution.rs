//! Round distribution search.
//!
//! Rearranges which projects land in which round, keeping round sizes fixed,
//! so that no reviewer sees all of their boosted projects (or all of their
//! ignore-list entries) packed into a single round.
//!
//! # Objectives
//!
//! For each reviewer, the population standard deviation across rounds of
//! - the summed positive affinity (**boost spread**), and
//! - the number of ignored-sentinel cells (**ignore spread**),
//!
//! summed over reviewers. Lower is better for both.
//!
//! # Algorithm
//!
//! Hill climbing by pairwise swaps. Each pass visits every project of every
//! round but the last and tries swapping it with every project of a later
//! round; the first swap that dominates the current objectives is kept and
//! the search moves on to the next project. The search stops after a pass
//! without an accepted swap, or at the pass cap. Local optima are accepted.

use crate::scoring::AffinityScores;

const EPSILON: f64 = 1e-9;

/// Values of both distribution objectives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Objectives {
    /// Summed per-reviewer spread of boost totals.
    pub boost: f64,
    /// Summed per-reviewer spread of ignore counts.
    pub ignore: f64,
}

impl Objectives {
    /// Evaluates both objectives for a round layout.
    pub fn evaluate(rounds: &[Vec<usize>], scores: &AffinityScores) -> Self {
        Self {
            boost: boost_spread(rounds, scores),
            ignore: ignore_spread(rounds, scores),
        }
    }
}

/// Result of a distribution search.
#[derive(Debug, Clone)]
pub struct DistributionOutcome {
    /// Project positions per round.
    pub rounds: Vec<Vec<usize>>,
    /// Objectives before the search.
    pub initial: Objectives,
    /// Objectives after the search.
    pub objectives: Objectives,
    /// Passes run (including the final pass without improvement).
    pub passes: usize,
    /// Total swaps accepted.
    pub swaps: usize,
}

/// Sequential layout: projects consumed in input order.
pub fn naive_rounds(sizes: &[usize]) -> Vec<Vec<usize>> {
    let mut next = 0;
    sizes
        .iter()
        .map(|&size| {
            let round: Vec<usize> = (next..next + size).collect();
            next += size;
            round
        })
        .collect()
}

/// Whether `candidate` is no worse on both objectives and strictly better on one.
pub fn dominates(candidate: Objectives, current: Objectives) -> bool {
    let no_regression =
        candidate.boost <= current.boost + EPSILON && candidate.ignore <= current.ignore + EPSILON;
    let improves =
        candidate.boost < current.boost - EPSILON || candidate.ignore < current.ignore - EPSILON;
    no_regression && improves
}

/// Population standard deviation via a frequency-weighted sum of squared
/// deviations over distinct values.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mut sum_sq = 0.0;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let mut freq = 0;
        while i < sorted.len() && sorted[i] == value {
            freq += 1;
            i += 1;
        }
        sum_sq += freq as f64 * (value - mean).powi(2);
    }
    (sum_sq / n).sqrt()
}

/// Summed per-reviewer spread of positive affinity across rounds.
pub fn boost_spread(rounds: &[Vec<usize>], scores: &AffinityScores) -> f64 {
    spread_by(rounds, scores, |v| if v > 0.0 { v } else { 0.0 })
}

/// Summed per-reviewer spread of ignored cells across rounds.
pub fn ignore_spread(rounds: &[Vec<usize>], scores: &AffinityScores) -> f64 {
    spread_by(rounds, scores, |v| if v < 0.0 { 1.0 } else { 0.0 })
}

fn spread_by(rounds: &[Vec<usize>], scores: &AffinityScores, weight: impl Fn(f64) -> f64) -> f64 {
    let mut total = 0.0;
    let mut per_round = vec![0.0; rounds.len()];
    for r in 0..scores.reviewer_count() {
        for (slot, round) in rounds.iter().enumerate() {
            per_round[slot] = round.iter().map(|&p| weight(scores.raw(p, r))).sum();
        }
        if per_round.iter().all(|&v| v == 0.0) {
            continue;
        }
        total += population_std_dev(&per_round);
    }
    total
}

fn swap_projects(rounds: &mut [Vec<usize>], a: (usize, usize), b: (usize, usize)) {
    let tmp = rounds[a.0][a.1];
    rounds[a.0][a.1] = rounds[b.0][b.1];
    rounds[b.0][b.1] = tmp;
}

/// Runs one pass of the swap search. Returns the number of accepted swaps.
pub fn optimize_pass(
    rounds: &mut [Vec<usize>],
    scores: &AffinityScores,
    current: &mut Objectives,
) -> usize {
    let mut accepted = 0;
    for a in 0..rounds.len().saturating_sub(1) {
        for i in 0..rounds[a].len() {
            'candidates: for b in (a + 1)..rounds.len() {
                for j in 0..rounds[b].len() {
                    swap_projects(rounds, (a, i), (b, j));
                    let candidate = Objectives::evaluate(rounds, scores);
                    if dominates(candidate, *current) {
                        *current = candidate;
                        accepted += 1;
                        break 'candidates;
                    }
                    swap_projects(rounds, (a, i), (b, j));
                }
            }
        }
    }
    accepted
}

/// Runs the bounded swap search from a starting layout.
pub fn optimize_rounds(
    mut rounds: Vec<Vec<usize>>,
    scores: &AffinityScores,
    max_passes: usize,
) -> DistributionOutcome {
    let initial = Objectives::evaluate(&rounds, scores);
    let mut objectives = initial;
    let mut passes = 0;
    let mut swaps = 0;

    while passes < max_passes {
        passes += 1;
        let accepted = optimize_pass(&mut rounds, scores, &mut objectives);
        swaps += accepted;
        if accepted == 0 {
            break;
        }
    }

    DistributionOutcome {
        rounds,
        initial,
        objectives,
        passes,
        swaps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoostTable;
    use crate::models::{Project, Reviewer};
    use crate::scoring::AffinityScorer;

    fn clustered() -> AffinityScores {
        // x is preferred on projects 0 and 1, y is ignored on 2 and 3:
        // the sequential layout packs both clusters into single rounds.
        let reviewers = vec![
            Reviewer::new("x", "X"),
            Reviewer::new("y", "Y"),
            Reviewer::new("z", "Z"),
        ];
        let projects = vec![
            Project::new(1, "A").with_preferred("x"),
            Project::new(2, "B").with_preferred("x"),
            Project::new(3, "C").with_ignored("y"),
            Project::new(4, "D").with_ignored("y"),
        ];
        AffinityScorer::new(&BoostTable::default()).score(&projects, &reviewers)
    }

    #[test]
    fn test_naive_rounds() {
        assert_eq!(naive_rounds(&[3, 3, 1]), vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]);
        assert!(naive_rounds(&[]).is_empty());
    }

    #[test]
    fn test_population_std_dev() {
        assert!((population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-10);
        assert!((population_std_dev(&[3.0, 3.0]) - 0.0).abs() < 1e-10);
        assert!((population_std_dev(&[]) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_dominance_rule() {
        let cur = Objectives { boost: 1.0, ignore: 1.0 };
        assert!(!dominates(cur, cur));
        assert!(dominates(Objectives { boost: 0.5, ignore: 1.0 }, cur));
        assert!(dominates(Objectives { boost: 1.0, ignore: 0.0 }, cur));
        assert!(!dominates(Objectives { boost: 0.5, ignore: 1.5 }, cur));
        assert!(!dominates(Objectives { boost: 2.0, ignore: 0.0 }, cur));
    }

    #[test]
    fn test_objectives_on_clustered_layout() {
        let scores = clustered();
        let rounds = naive_rounds(&[2, 2]);
        let obj = Objectives::evaluate(&rounds, &scores);
        // x: [20, 0] → σ = 10; y: [0, 2] → σ = 1
        assert!((obj.boost - 10.0).abs() < 1e-10);
        assert!((obj.ignore - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_search_spreads_clusters() {
        let scores = clustered();
        let outcome = optimize_rounds(naive_rounds(&[2, 2]), &scores, 10);

        assert!(outcome.objectives.boost < outcome.initial.boost);
        assert!(outcome.objectives.ignore < outcome.initial.ignore);
        assert!((outcome.objectives.boost - 0.0).abs() < 1e-10);
        assert!((outcome.objectives.ignore - 0.0).abs() < 1e-10);
        assert!(outcome.swaps >= 1);
    }

    #[test]
    fn test_search_preserves_round_sizes_and_projects() {
        let scores = clustered();
        let sizes = [3, 1];
        let outcome = optimize_rounds(naive_rounds(&sizes), &scores, 10);

        let got: Vec<usize> = outcome.rounds.iter().map(Vec::len).collect();
        assert_eq!(got, sizes);
        let mut all: Vec<usize> = outcome.rounds.concat();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_single_round_is_untouched() {
        let scores = clustered();
        let outcome = optimize_rounds(naive_rounds(&[4]), &scores, 10);
        assert_eq!(outcome.rounds, vec![vec![0, 1, 2, 3]]);
        assert_eq!(outcome.passes, 1);
        assert_eq!(outcome.swaps, 0);
    }

    #[test]
    fn test_pass_cap_respected() {
        let scores = clustered();
        let outcome = optimize_rounds(naive_rounds(&[2, 2]), &scores, 0);
        assert_eq!(outcome.passes, 0);
        assert_eq!(outcome.rounds, naive_rounds(&[2, 2]));
    }
}
