//! Pairwise co-occurrence tracking.
//!
//! Counts, for every unordered pair of participants, the number of
//! sessions in which both were placed in the same group.

use serde::Serialize;

use crate::models::Assignment;

/// Symmetric pair-count matrix over participant indices.
///
/// Both halves are stored so row scans need no index juggling. The
/// diagonal is unused and always 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CooccurrenceMatrix {
    n: usize,
    counts: Vec<u32>,
}

impl CooccurrenceMatrix {
    /// An all-zero matrix for `n` participants.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            counts: vec![0; n * n],
        }
    }

    /// Counts every co-member pair of every group of every session.
    pub fn from_assignment(assignment: &Assignment, n: usize) -> Self {
        let mut matrix = Self::new(n);
        for groups in &assignment.sessions {
            matrix.record_session(groups);
        }
        matrix
    }

    /// Counts co-member pairs of all sessions except `skip`.
    ///
    /// Gives the "everything else" context when one session is rebuilt.
    pub fn excluding_session(assignment: &Assignment, n: usize, skip: usize) -> Self {
        let mut matrix = Self::new(n);
        for (s, groups) in assignment.sessions.iter().enumerate() {
            if s != skip {
                matrix.record_session(groups);
            }
        }
        matrix
    }

    /// Number of participants covered.
    #[inline]
    pub fn participant_count(&self) -> usize {
        self.n
    }

    /// Records all groups of one session.
    pub fn record_session(&mut self, groups: &[Vec<usize>]) {
        for group in groups {
            self.record_group(group);
        }
    }

    /// Records every unordered pair within one group.
    pub fn record_group(&mut self, members: &[usize]) {
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                self.increment(a, b);
            }
        }
    }

    /// Pair count of `a` and `b`.
    #[inline]
    pub fn count(&self, a: usize, b: usize) -> u32 {
        self.counts[a * self.n + b]
    }

    /// Adds one co-placement of `a` and `b`.
    #[inline]
    pub fn increment(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.counts[a * self.n + b] += 1;
        self.counts[b * self.n + a] += 1;
    }

    /// Removes one co-placement of `a` and `b`. Saturates at zero.
    #[inline]
    pub fn decrement(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let ab = a * self.n + b;
        let ba = b * self.n + a;
        self.counts[ab] = self.counts[ab].saturating_sub(1);
        self.counts[ba] = self.counts[ba].saturating_sub(1);
    }

    /// Pair counts of one participant against everyone (diagonal 0).
    #[inline]
    pub fn row(&self, a: usize) -> &[u32] {
        &self.counts[a * self.n..(a + 1) * self.n]
    }

    /// Number of members of `group` who already met `participant`.
    pub fn met_count(&self, participant: usize, group: &[usize]) -> usize {
        group
            .iter()
            .filter(|&&m| m != participant && self.count(participant, m) > 0)
            .count()
    }

    /// Number of distinct partners of `a`.
    pub fn distinct_partners(&self, a: usize) -> usize {
        self.row(a).iter().filter(|&&c| c > 0).count()
    }

    /// Distinct-partner count of every participant.
    pub fn distinct_partner_counts(&self) -> Vec<usize> {
        (0..self.n).map(|a| self.distinct_partners(a)).collect()
    }

    /// Total co-placements of `a`, repeats included.
    pub fn total_partners(&self, a: usize) -> usize {
        self.row(a).iter().map(|&c| c as usize).sum()
    }

    /// Partners `a` met more than once.
    pub fn duplicate_partners(&self, a: usize) -> usize {
        self.row(a).iter().filter(|&&c| c > 1).count()
    }

    /// Σ (count − 1) over partners `a` met more than once.
    pub fn repeat_count(&self, a: usize) -> usize {
        self.row(a)
            .iter()
            .filter(|&&c| c > 1)
            .map(|&c| (c - 1) as usize)
            .sum()
    }

    /// Iterates `(a, b, count)` over pairs with `a < b` and `count > 0`.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        (0..self.n).flat_map(move |a| {
            ((a + 1)..self.n).filter_map(move |b| {
                let c = self.count(a, b);
                (c > 0).then_some((a, b, c))
            })
        })
    }

    /// Penalty of pairs co-placed more than `tolerance` times.
    ///
    /// A pair with `excess = count − tolerance > 0` contributes
    /// `excess * (excess + 1) / 2`, so a third meeting costs more than a
    /// second.
    pub fn repeat_penalty(&self, tolerance: u32) -> u64 {
        self.pairs()
            .map(|(_, _, c)| pair_excess_penalty(c, tolerance))
            .sum()
    }

    /// Number of pairs co-placed more than `tolerance` times.
    pub fn pairs_over(&self, tolerance: u32) -> usize {
        self.pairs().filter(|&(_, _, c)| c > tolerance).count()
    }

    /// The most co-placed pair `(a, b, count)`; ties go to the lowest indices.
    pub fn most_repeated_pair(&self) -> Option<(usize, usize, u32)> {
        self.pairs().fold(None, |best, cur| match best {
            Some((_, _, c)) if c >= cur.2 => best,
            _ => Some(cur),
        })
    }

    /// Mean count over all unordered pairs, zeros included.
    pub fn mean_pair_count(&self) -> f64 {
        if self.n < 2 {
            return 0.0;
        }
        let total: u64 = self.pairs().map(|(_, _, c)| c as u64).sum();
        let pairs = (self.n * (self.n - 1) / 2) as f64;
        total as f64 / pairs
    }

    /// Whether `count(a, b) == count(b, a)` for all pairs.
    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|a| (0..self.n).all(|b| self.count(a, b) == self.count(b, a)))
    }
}

/// Penalty of one pair seen `count` times against `tolerance`.
#[inline]
pub fn pair_excess_penalty(count: u32, tolerance: u32) -> u64 {
    let excess = count.saturating_sub(tolerance) as u64;
    excess * (excess + 1) / 2
}
