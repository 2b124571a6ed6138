//! Tiered penalty fitness.
//!
//! # Tiers
//!
//! | Tier | Term | Measures |
//! |------|------|----------|
//! | 1 | `size_violations` | Group sizes outside `[min, max]`, missing or duplicate placements |
//! | 2 | `repeat` | Σ over pairs of `pair_excess_penalty(count, tolerance)` |
//! | 3 | `fairness` | `variance · Var(d) + range · (max d − min d)`, `d` = distinct partners |
//! | 4 | `affiliation` | Σ over groups and labels of C(members with label, 2) |
//!
//! [`Penalty`] compares lexicographically in tier order, so no amount of a
//! lower tier outweighs one unit of a higher tier. [`Penalty::weighted`]
//! folds the tiers into one scalar for logs and reports only.

use serde::{Deserialize, Serialize};

use super::types::Fitness;
use crate::evaluation::{CooccurrenceMatrix, PartnerSpread};
use crate::heuristic::conflict_pairs;
use crate::models::Assignment;
use crate::roster::Roster;

/// Weights and scales of the penalty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyWeights {
    /// Weight of the distinct-partner variance in the fairness tier.
    pub variance: f64,
    /// Weight of the distinct-partner range in the fairness tier.
    pub range: f64,
    /// Co-placements a pair may share before it is penalized.
    pub repeat_tolerance: u32,
    /// Scalar weight of the size tier.
    pub size_scale: f64,
    /// Scalar weight of the repeat tier.
    pub repeat_scale: f64,
    /// Scalar weight of the fairness tier.
    pub fairness_scale: f64,
    /// Scalar weight of the affiliation tier.
    pub affiliation_scale: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            variance: 1000.0,
            range: 300.0,
            repeat_tolerance: 1,
            size_scale: 1_000_000.0,
            repeat_scale: 100.0,
            fairness_scale: 1.0,
            affiliation_scale: 5.0,
        }
    }
}

impl PenaltyWeights {
    /// Sets the variance weight.
    pub fn with_variance(mut self, w: f64) -> Self {
        self.variance = w;
        self
    }

    /// Sets the range weight.
    pub fn with_range(mut self, w: f64) -> Self {
        self.range = w;
        self
    }

    /// Sets the repeat tolerance.
    pub fn with_repeat_tolerance(mut self, tolerance: u32) -> Self {
        self.repeat_tolerance = tolerance;
        self
    }

    /// Sets the scalar scales of all four tiers.
    pub fn with_scales(mut self, size: f64, repeat: f64, fairness: f64, affiliation: f64) -> Self {
        self.size_scale = size;
        self.repeat_scale = repeat;
        self.fairness_scale = fairness;
        self.affiliation_scale = affiliation;
        self
    }
}

/// Penalty of an assignment, compared tier by tier.
///
/// Field order is tier order; the derived `PartialOrd` is lexicographic.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Penalty {
    /// Tier 1: structural violations.
    pub size_violations: u64,
    /// Tier 2: repeated-pair penalty.
    pub repeat: u64,
    /// Tier 3: distinct-partner imbalance.
    pub fairness: f64,
    /// Tier 4: same-affiliation co-placements.
    pub affiliation: u64,
}

impl Penalty {
    /// The zero penalty.
    pub const ZERO: Penalty = Penalty {
        size_violations: 0,
        repeat: 0,
        fairness: 0.0,
        affiliation: 0,
    };

    /// Computes the penalty of `assignment`.
    pub fn evaluate(roster: &Roster, assignment: &Assignment, weights: &PenaltyWeights) -> Self {
        let n = roster.participant_count();
        let matrix = CooccurrenceMatrix::from_assignment(assignment, n);
        let spread = PartnerSpread::from_counts(&matrix.distinct_partner_counts());

        let affiliation = assignment
            .sessions
            .iter()
            .flatten()
            .map(|group| conflict_pairs(roster, group) as u64)
            .sum();

        Self {
            size_violations: size_violations(roster, assignment),
            repeat: matrix.repeat_penalty(weights.repeat_tolerance),
            fairness: weights.variance * spread.variance + weights.range * spread.range() as f64,
            affiliation,
        }
    }

    /// `true` if every participant sits in exactly one in-bounds group
    /// per session.
    pub fn is_feasible(&self) -> bool {
        self.size_violations == 0
    }

    /// Single scalar of all tiers.
    pub fn weighted(&self, weights: &PenaltyWeights) -> f64 {
        weights.size_scale * self.size_violations as f64
            + weights.repeat_scale * self.repeat as f64
            + weights.fairness_scale * self.fairness
            + weights.affiliation_scale * self.affiliation as f64
    }
}

impl Fitness for Penalty {
    fn worst() -> Self {
        Self {
            size_violations: u64::MAX,
            repeat: u64::MAX,
            fairness: f64::INFINITY,
            affiliation: u64::MAX,
        }
    }

    fn to_f64(self) -> f64 {
        self.weighted(&PenaltyWeights::default())
    }
}

/// Out-of-bounds size distance plus missing and duplicate placements.
fn size_violations(roster: &Roster, assignment: &Assignment) -> u64 {
    let n = roster.participant_count();
    let mut total = 0u64;

    for (s, session) in roster.sessions().iter().enumerate() {
        let groups = assignment.sessions.get(s).map(Vec::as_slice).unwrap_or(&[]);
        let mut seen = vec![0u32; n];

        for group in groups {
            let len = group.len();
            if len < session.min_size {
                total += (session.min_size - len) as u64;
            } else if len > session.max_size {
                total += (len - session.max_size) as u64;
            }
            for &p in group {
                if let Some(c) = seen.get_mut(p) {
                    *c += 1;
                }
            }
        }
        if groups.len() != session.group_count {
            total += groups.len().abs_diff(session.group_count) as u64;
        }
        total += seen
            .iter()
            .map(|&c| if c == 0 { 1 } else { (c - 1) as u64 })
            .sum::<u64>();
    }

    total
}
