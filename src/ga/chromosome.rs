//! Assignment chromosome and its rank-safe operators.
//!
//! # Encoding
//!
//! A chromosome is a complete [`Assignment`]: per session, per group, the
//! member indices. Every operator keeps each group's rank composition equal
//! to the session's quota plan.
//!
//! # Operators
//!
//! - [`rank_slot_crossover`]: in one random session each child takes every
//!   `(group, rank)` slot set from one parent or the other, then repairs.
//! - [`session_crossover`]: each child takes whole sessions from either
//!   parent. No repair needed.
//! - [`swap_mutation`]: per session, with probability `rate`, swaps two
//!   same-rank participants sitting in different groups.
//! - [`rebuild_mutation`]: per session, with probability `rate`, rebuilds
//!   the session with the shuffled heuristic against all other sessions.
//! - [`repair_session`]: dedupes, evicts over-quota members and re-places
//!   missing participants with the placement score.

use rand::prelude::IndexedRandom;
use rand::Rng;
use tracing::warn;

use super::fitness::Penalty;
use super::types::{Fitness, Individual};
use crate::evaluation::CooccurrenceMatrix;
use crate::heuristic::{smallest_group, HeuristicConstructor, PlacementWeights};
use crate::models::{Assignment, Rank, RankCounts};
use crate::roster::Roster;

/// One GA individual: an assignment and its cached penalty.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingChromosome {
    /// Encoded assignment.
    pub assignment: Assignment,
    /// Cached penalty ([`Penalty::worst`] until evaluated).
    pub fitness: Penalty,
}

impl Individual for GroupingChromosome {
    type Fitness = Penalty;

    fn fitness(&self) -> Penalty {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: Penalty) {
        self.fitness = fitness;
    }
}

impl GroupingChromosome {
    /// Wraps an unevaluated assignment.
    pub fn new(assignment: Assignment) -> Self {
        Self {
            assignment,
            fitness: Penalty::worst(),
        }
    }

    /// `true` if every session matches its quota plan and covers everyone
    /// exactly once.
    pub fn is_valid(&self, roster: &Roster) -> bool {
        if self.assignment.session_count() != roster.session_count()
            || !self.assignment.is_complete(roster.participant_count())
        {
            return false;
        }
        (0..roster.session_count()).all(|s| {
            let plan = roster.quota(s);
            let groups = self.assignment.groups(s);
            groups.len() == plan.group_count()
                && groups
                    .iter()
                    .enumerate()
                    .all(|(g, members)| roster.rank_counts(members) == *plan.group(g))
        })
    }
}

/// Rank-slot crossover at one random session.
///
/// Both children inherit all other sessions unchanged: child 1 from
/// `p1`, child 2 from `p2`. In the chosen session, child 1 takes each
/// `(group, rank)` slot set from a coin-flipped parent and child 2 from
/// the other one. Both are repaired afterwards.
pub fn rank_slot_crossover<R: Rng>(
    p1: &GroupingChromosome,
    p2: &GroupingChromosome,
    roster: &Roster,
    weights: &PlacementWeights,
    rng: &mut R,
) -> (GroupingChromosome, GroupingChromosome) {
    let sessions = roster.session_count();
    if sessions == 0 {
        return (
            GroupingChromosome::new(p1.assignment.clone()),
            GroupingChromosome::new(p2.assignment.clone()),
        );
    }

    let s = rng.random_range(0..sessions);
    let g_count = roster.quota(s).group_count();
    let groups1 = p1.assignment.groups(s);
    let groups2 = p2.assignment.groups(s);

    let mut child1 = vec![Vec::new(); g_count];
    let mut child2 = vec![Vec::new(); g_count];

    for g in 0..g_count {
        for rank in Rank::ALL {
            let slot1 = rank_members(roster, groups1.get(g), rank);
            let slot2 = rank_members(roster, groups2.get(g), rank);
            if rng.random_bool(0.5) {
                child1[g].extend(slot1);
                child2[g].extend(slot2);
            } else {
                child1[g].extend(slot2);
                child2[g].extend(slot1);
            }
        }
    }

    let mut a1 = p1.assignment.clone();
    let mut a2 = p2.assignment.clone();
    *a1.groups_mut(s) = child1;
    *a2.groups_mut(s) = child2;
    repair_session(roster, weights, &mut a1, s);
    repair_session(roster, weights, &mut a2, s);

    (GroupingChromosome::new(a1), GroupingChromosome::new(a2))
}

/// Uniform crossover over whole sessions.
pub fn session_crossover<R: Rng>(
    p1: &GroupingChromosome,
    p2: &GroupingChromosome,
    rng: &mut R,
) -> (GroupingChromosome, GroupingChromosome) {
    let mut a1 = p1.assignment.clone();
    let mut a2 = p2.assignment.clone();
    for s in 0..a1.session_count().min(a2.session_count()) {
        if rng.random_bool(0.5) {
            std::mem::swap(&mut a1.sessions[s], &mut a2.sessions[s]);
        }
    }
    (GroupingChromosome::new(a1), GroupingChromosome::new(a2))
}

/// Same-rank swap mutation, applied per session with probability `rate`.
pub fn swap_mutation<R: Rng>(
    chromosome: &mut GroupingChromosome,
    roster: &Roster,
    rate: f64,
    rng: &mut R,
) {
    let n = roster.participant_count();
    if n < 2 {
        return;
    }
    let rate = rate.clamp(0.0, 1.0);

    for s in 0..chromosome.assignment.session_count() {
        if !rng.random_bool(rate) {
            continue;
        }
        let groups = chromosome.assignment.groups_mut(s);
        let positions = positions(groups, n);

        let a = rng.random_range(0..n);
        let Some((ga, ia)) = positions[a] else {
            continue;
        };
        let partners: Vec<usize> = roster
            .members_of_rank(roster.rank_of(a))
            .iter()
            .copied()
            .filter(|&b| matches!(positions[b], Some((gb, _)) if gb != ga))
            .collect();
        if let Some(&b) = partners.choose(rng) {
            if let Some((gb, ib)) = positions[b] {
                groups[ga][ia] = b;
                groups[gb][ib] = a;
            }
        }
    }
}

/// Session rebuild mutation, applied per session with probability `rate`.
///
/// The rebuilt session is placed by the shuffled heuristic against the
/// co-occurrences of every other session.
pub fn rebuild_mutation<R: Rng>(
    chromosome: &mut GroupingChromosome,
    roster: &Roster,
    constructor: &HeuristicConstructor,
    rate: f64,
    rng: &mut R,
) {
    let n = roster.participant_count();
    let rate = rate.clamp(0.0, 1.0);

    for s in 0..chromosome.assignment.session_count() {
        if !rng.random_bool(rate) {
            continue;
        }
        let history = CooccurrenceMatrix::excluding_session(&chromosome.assignment, n, s);
        let groups = constructor.rebuild_session(roster, s, &history, rng);
        *chromosome.assignment.groups_mut(s) = groups;
    }
}

/// Restores the quota plan of session `s` in place.
///
/// 1. Keep only the first placement of each participant.
/// 2. Evict members beyond their group's quota for their rank.
/// 3. Re-place every unplaced participant (rank order, then index) into
///    the best-scoring group with headroom for its rank, scored against
///    all other sessions.
pub fn repair_session(
    roster: &Roster,
    weights: &PlacementWeights,
    assignment: &mut Assignment,
    s: usize,
) {
    let n = roster.participant_count();
    let plan = roster.quota(s);
    let g_count = plan.group_count();
    let history = CooccurrenceMatrix::excluding_session(assignment, n, s);
    let targets: Vec<usize> = (0..g_count).map(|g| plan.group_target(g)).collect();

    let groups = assignment.groups_mut(s);
    // Groups beyond the plan are dissolved; their members become unplaced.
    groups.resize_with(g_count, Vec::new);

    let mut placed = vec![false; n];
    let mut filled = vec![RankCounts::zero(); g_count];

    for (g, members) in groups.iter_mut().enumerate() {
        members.retain(|&p| {
            if p >= n || placed[p] {
                return false;
            }
            let rank = roster.rank_of(p);
            if filled[g][rank] >= plan.quota(g, rank) {
                return false;
            }
            placed[p] = true;
            filled[g][rank] += 1;
            true
        });
    }

    for rank in Rank::ALL {
        for &p in roster.members_of_rank(rank) {
            if placed[p] {
                continue;
            }
            let open = (0..g_count).filter(|&g| filled[g][rank] < plan.quota(g, rank));
            let chosen = weights
                .best_group(roster, &history, p, groups, &targets, open)
                .unwrap_or_else(|| {
                    warn!(session = s, participant = p, "repair found no headroom");
                    smallest_group(groups)
                });
            groups[chosen].push(p);
            filled[chosen][rank] += 1;
            placed[p] = true;
        }
    }
}

/// Members of `group` with the given rank, in position order.
fn rank_members(roster: &Roster, group: Option<&Vec<usize>>, rank: Rank) -> Vec<usize> {
    group
        .map(|members| {
            members
                .iter()
                .copied()
                .filter(|&p| roster.rank_of(p) == rank)
                .collect()
        })
        .unwrap_or_default()
}

/// `(group, position)` of every participant in one session.
fn positions(groups: &[Vec<usize>], n: usize) -> Vec<Option<(usize, usize)>> {
    let mut pos = vec![None; n];
    for (g, members) in groups.iter().enumerate() {
        for (i, &p) in members.iter().enumerate() {
            if p < n {
                pos[p] = Some((g, i));
            }
        }
    }
    pos
}
