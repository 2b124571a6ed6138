//! Same-rank swap local search.
//!
//! # Objective
//!
//! ```text
//! affiliation_weight · Σ_labels C(members with label, 2)
//!   + repeat_weight · Σ_pairs C(count, 2)
//! ```
//!
//! summed over all sessions. Two members sharing two labels count twice.
//! `C(count, 2)` is 0 for pairs that met at most once and grows with every
//! further meeting.
//!
//! # Algorithm
//!
//! Each step first tries a fairness swap, then an objective swap, and
//! applies the first one found:
//!
//! 1. **Fairness**: for participants with few distinct partners (within
//!    the bottom 20% of the min..max range) and then those with a repeated
//!    partner, try same-rank swaps with members of other groups in each
//!    session. Accept a swap that does not raise the objective and strictly
//!    lowers the variance of distinct-partner counts.
//! 2. **Objective**: scan sessions, group pairs `g1 < g2`, then members in
//!    position order, and take the first same-rank swap that strictly
//!    lowers the objective.
//!
//! Stop when neither pass finds a swap or after `max_iterations` applied
//! swaps. Every accepted swap lowers `(objective, variance)`
//! lexicographically, so the search terminates. Swaps exchange equal
//! ranks, so group sizes and quotas never change.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::evaluation::{pair_excess_penalty, CooccurrenceMatrix};
use crate::models::Assignment;
use crate::roster::Roster;

const IMPROVEMENT_EPS: f64 = 1e-9;

/// Share of the distinct-partner range counted as "few partners".
const LOW_PARTNER_FRACTION: f64 = 0.2;

/// Local search settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalSearchConfig {
    /// Maximum number of applied swaps.
    pub max_iterations: usize,
    /// Weight per same-group pair and shared affiliation label.
    pub affiliation_weight: f64,
    /// Weight per unit of repeated-pair penalty.
    pub repeat_weight: f64,
    /// Run the distinct-partner fairness pass before each objective scan.
    #[serde(default = "default_fairness_pass")]
    pub fairness_pass: bool,
}

fn default_fairness_pass() -> bool {
    true
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            affiliation_weight: 5.0,
            repeat_weight: 100.0,
            fairness_pass: true,
        }
    }
}

impl LocalSearchConfig {
    /// Sets the swap budget.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the affiliation weight.
    pub fn with_affiliation_weight(mut self, w: f64) -> Self {
        self.affiliation_weight = w;
        self
    }

    /// Sets the repeat weight.
    pub fn with_repeat_weight(mut self, w: f64) -> Self {
        self.repeat_weight = w;
        self
    }

    /// Enables or disables the fairness pass.
    pub fn with_fairness_pass(mut self, enabled: bool) -> Self {
        self.fairness_pass = enabled;
        self
    }
}

/// Outcome of one refinement run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RefineStats {
    /// Swaps applied.
    pub swaps: usize,
    /// Of those, swaps made by the fairness pass.
    pub fairness_swaps: usize,
    /// Objective before refinement.
    pub initial_objective: f64,
    /// Objective after refinement.
    pub final_objective: f64,
    /// `true` if the last scan found no improving swap.
    pub converged: bool,
}

/// First-improvement same-rank swap refiner.
#[derive(Debug, Clone, Default)]
pub struct LocalSearchRefiner {
    config: LocalSearchConfig,
}

impl LocalSearchRefiner {
    /// Creates a refiner.
    pub fn new(config: LocalSearchConfig) -> Self {
        Self { config }
    }

    /// Settings in use.
    pub fn config(&self) -> &LocalSearchConfig {
        &self.config
    }

    /// Objective of `assignment`, computed from scratch.
    pub fn objective(&self, roster: &Roster, assignment: &Assignment) -> f64 {
        let matrix = CooccurrenceMatrix::from_assignment(assignment, roster.participant_count());
        let conflicts: usize = assignment
            .sessions
            .iter()
            .flatten()
            .map(|group| conflict_pairs(roster, group))
            .sum();
        self.config.affiliation_weight * conflicts as f64
            + self.config.repeat_weight * matrix.repeat_penalty(1) as f64
    }

    /// Improves `assignment` in place.
    pub fn refine(&self, roster: &Roster, assignment: &mut Assignment) -> RefineStats {
        let mut matrix =
            CooccurrenceMatrix::from_assignment(assignment, roster.participant_count());
        let initial = self.objective(roster, assignment);
        let mut current = initial;
        let mut swaps = 0;
        let mut fairness_swaps = 0;
        let mut converged = false;

        while swaps < self.config.max_iterations {
            let fair = if self.config.fairness_pass {
                self.find_fairness_swap(roster, &matrix, assignment)
            } else {
                None
            };
            let (found, is_fair) = match fair {
                Some(m) => (Some(m), true),
                None => (self.find_improving_swap(roster, &matrix, assignment), false),
            };
            match found {
                Some((swap, delta)) => {
                    apply_swap(&mut matrix, assignment, swap);
                    current += delta;
                    swaps += 1;
                    if is_fair {
                        fairness_swaps += 1;
                    }
                }
                None => {
                    converged = true;
                    break;
                }
            }
        }

        debug!(swaps, fairness_swaps, initial, current, converged, "local search finished");

        RefineStats {
            swaps,
            fairness_swaps,
            initial_objective: initial,
            final_objective: current,
            converged,
        }
    }

    fn find_improving_swap(
        &self,
        roster: &Roster,
        matrix: &CooccurrenceMatrix,
        assignment: &Assignment,
    ) -> Option<(Swap, f64)> {
        for (s, groups) in assignment.sessions.iter().enumerate() {
            for g1 in 0..groups.len() {
                for g2 in (g1 + 1)..groups.len() {
                    for i1 in 0..groups[g1].len() {
                        for i2 in 0..groups[g2].len() {
                            let (a, b) = (groups[g1][i1], groups[g2][i2]);
                            if roster.rank_of(a) != roster.rank_of(b) {
                                continue;
                            }
                            let swap = Swap {
                                session: s,
                                g1,
                                i1,
                                g2,
                                i2,
                            };
                            let delta = self.swap_delta(roster, matrix, groups, swap);
                            if delta < -IMPROVEMENT_EPS {
                                return Some((swap, delta));
                            }
                        }
                    }
                }
            }
        }
        None
    }

    /// First swap that keeps the objective and spreads partners more evenly.
    fn find_fairness_swap(
        &self,
        roster: &Roster,
        matrix: &CooccurrenceMatrix,
        assignment: &Assignment,
    ) -> Option<(Swap, f64)> {
        let n = roster.participant_count();
        let distinct = matrix.distinct_partner_counts();
        let moments = partner_moments(&distinct);
        let current = scaled_variance(n, moments);
        if current == 0 {
            return None;
        }

        let memberships: Vec<Vec<Option<usize>>> = (0..assignment.session_count())
            .map(|s| assignment.membership(s, n))
            .collect();

        for p in fairness_targets(matrix, &distinct) {
            for (s, groups) in assignment.sessions.iter().enumerate() {
                let Some(g1) = memberships[s][p] else {
                    continue;
                };
                let Some(i1) = groups[g1].iter().position(|&x| x == p) else {
                    continue;
                };
                for g2 in (0..groups.len()).filter(|&g| g != g1) {
                    for (i2, &q) in groups[g2].iter().enumerate() {
                        if roster.rank_of(q) != roster.rank_of(p) {
                            continue;
                        }
                        let swap = Swap {
                            session: s,
                            g1,
                            i1,
                            g2,
                            i2,
                        };
                        let delta = self.swap_delta(roster, matrix, groups, swap);
                        if delta > 0.0 {
                            continue;
                        }
                        let after = moments_after_swap(matrix, groups, swap, &distinct, moments);
                        if scaled_variance(n, after) < current {
                            return Some((swap, delta));
                        }
                    }
                }
            }
        }
        None
    }

    /// Objective change of exchanging `groups[g1][i1]` and `groups[g2][i2]`.
    fn swap_delta(
        &self,
        roster: &Roster,
        matrix: &CooccurrenceMatrix,
        groups: &[Vec<usize>],
        swap: Swap,
    ) -> f64 {
        let a = groups[swap.g1][swap.i1];
        let b = groups[swap.g2][swap.i2];
        let mut conflict_delta: i64 = 0;
        let mut repeat_delta: i64 = 0;

        let step = |count: u32, up: bool| -> i64 {
            let next = if up { count + 1 } else { count.saturating_sub(1) };
            pair_excess_penalty(next, 1) as i64 - pair_excess_penalty(count, 1) as i64
        };

        // a leaves g1 for g2; b leaves g2 for g1.
        for &x in groups[swap.g1].iter().filter(|&&x| x != a) {
            conflict_delta -= roster.shared_affiliations(a, x) as i64;
            conflict_delta += roster.shared_affiliations(b, x) as i64;
            repeat_delta += step(matrix.count(a, x), false);
            repeat_delta += step(matrix.count(b, x), true);
        }
        for &y in groups[swap.g2].iter().filter(|&&y| y != b) {
            conflict_delta -= roster.shared_affiliations(b, y) as i64;
            conflict_delta += roster.shared_affiliations(a, y) as i64;
            repeat_delta += step(matrix.count(b, y), false);
            repeat_delta += step(matrix.count(a, y), true);
        }

        self.config.affiliation_weight * conflict_delta as f64
            + self.config.repeat_weight * repeat_delta as f64
    }
}

/// Position pair of a candidate swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Swap {
    session: usize,
    g1: usize,
    i1: usize,
    g2: usize,
    i2: usize,
}

/// Exchanges the two members and updates `matrix` to match.
fn apply_swap(matrix: &mut CooccurrenceMatrix, assignment: &mut Assignment, swap: Swap) {
    let groups = assignment.groups_mut(swap.session);
    let a = groups[swap.g1][swap.i1];
    let b = groups[swap.g2][swap.i2];

    for &x in groups[swap.g1].iter().filter(|&&x| x != a) {
        matrix.decrement(a, x);
        matrix.increment(b, x);
    }
    for &y in groups[swap.g2].iter().filter(|&&y| y != b) {
        matrix.decrement(b, y);
        matrix.increment(a, y);
    }

    groups[swap.g1][swap.i1] = b;
    groups[swap.g2][swap.i2] = a;
}

/// Participants the fairness pass works on, in priority order: those with
/// few distinct partners, then the rest of those with a repeated partner.
fn fairness_targets(matrix: &CooccurrenceMatrix, distinct: &[usize]) -> Vec<usize> {
    let min = distinct.iter().copied().min().unwrap_or(0);
    let max = distinct.iter().copied().max().unwrap_or(0);
    let threshold = min as f64 + (max - min) as f64 * LOW_PARTNER_FRACTION;
    let low = |p: usize| distinct[p] as f64 <= threshold;

    let mut targets: Vec<usize> = (0..distinct.len()).filter(|&p| low(p)).collect();
    targets.extend((0..distinct.len()).filter(|&p| !low(p) && matrix.duplicate_partners(p) > 0));
    targets
}

/// `(Σ d, Σ d²)` over distinct-partner counts.
fn partner_moments(distinct: &[usize]) -> (i64, i64) {
    distinct.iter().fold((0, 0), |(sum, sq), &d| {
        let d = d as i64;
        (sum + d, sq + d * d)
    })
}

/// `n² · variance`, exact in integers.
fn scaled_variance(n: usize, (sum, sq): (i64, i64)) -> i64 {
    n as i64 * sq - sum * sum
}

/// Partner moments after `swap`, derived from the current counts.
fn moments_after_swap(
    matrix: &CooccurrenceMatrix,
    groups: &[Vec<usize>],
    swap: Swap,
    distinct: &[usize],
    (mut sum, mut sq): (i64, i64),
) -> (i64, i64) {
    let a = groups[swap.g1][swap.i1];
    let b = groups[swap.g2][swap.i2];
    let (mut da, mut db) = (0i64, 0i64);
    let mut shift = |old: usize, d: i64| {
        let old = old as i64;
        sum += d;
        sq += (old + d) * (old + d) - old * old;
    };

    // `x` loses `a` if they met only here and gains `b` if they never met.
    for &x in groups[swap.g1].iter().filter(|&&x| x != a) {
        let mut dx = 0;
        if matrix.count(a, x) == 1 {
            da -= 1;
            dx -= 1;
        }
        if matrix.count(b, x) == 0 {
            db += 1;
            dx += 1;
        }
        shift(distinct[x], dx);
    }
    for &y in groups[swap.g2].iter().filter(|&&y| y != b) {
        let mut dy = 0;
        if matrix.count(b, y) == 1 {
            db -= 1;
            dy -= 1;
        }
        if matrix.count(a, y) == 0 {
            da += 1;
            dy += 1;
        }
        shift(distinct[y], dy);
    }
    shift(distinct[a], da);
    shift(distinct[b], db);

    (sum, sq)
}

/// Affiliation overlap of a group: `Σ_labels C(members with label, 2)`.
///
/// Equals the number of (pair, shared label) combinations, so a pair
/// sharing two labels counts twice.
pub(crate) fn conflict_pairs(roster: &Roster, group: &[usize]) -> usize {
    group
        .iter()
        .enumerate()
        .map(|(i, &a)| {
            group[i + 1..]
                .iter()
                .map(|&b| roster.shared_affiliations(a, b))
                .sum::<usize>()
        })
        .sum()
}
