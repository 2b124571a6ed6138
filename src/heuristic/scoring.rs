//! Placement scoring shared by construction and GA repair.
//!
//! A candidate group is scored for one participant as
//!
//! ```text
//! affiliation · conflicts + repeat · already_met + fill · (size / target)
//! ```
//!
//! Lower is better. Default weights separate the three terms by orders of
//! magnitude so each one only breaks ties of the one above it.

use serde::{Deserialize, Serialize};

use crate::evaluation::CooccurrenceMatrix;
use crate::roster::Roster;

/// Weights of the placement score terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementWeights {
    /// Per member sharing an affiliation with the candidate.
    pub affiliation: f64,
    /// Per member the candidate already met in an earlier session.
    pub repeat: f64,
    /// Times the group's fill ratio (current size / target size).
    pub fill: f64,
}

impl Default for PlacementWeights {
    fn default() -> Self {
        Self {
            affiliation: 1_000_000.0,
            repeat: 1_000.0,
            fill: 1.0,
        }
    }
}

impl PlacementWeights {
    /// Sets the affiliation-conflict weight.
    pub fn with_affiliation(mut self, weight: f64) -> Self {
        self.affiliation = weight;
        self
    }

    /// Sets the repeated-partner weight.
    pub fn with_repeat(mut self, weight: f64) -> Self {
        self.repeat = weight;
        self
    }

    /// Sets the fill-ratio weight.
    pub fn with_fill(mut self, weight: f64) -> Self {
        self.fill = weight;
        self
    }

    /// Scores placing `participant` into `group` (current members) whose
    /// target size is `target`.
    pub fn score(
        &self,
        roster: &Roster,
        history: &CooccurrenceMatrix,
        participant: usize,
        group: &[usize],
        target: usize,
    ) -> f64 {
        let conflicts = roster.affiliation_conflicts(participant, group) as f64;
        let met = history.met_count(participant, group) as f64;
        let fill = if target == 0 {
            1.0
        } else {
            group.len() as f64 / target as f64
        };
        self.affiliation * conflicts + self.repeat * met + self.fill * fill
    }

    /// Picks the lowest-scoring group among `candidates`.
    ///
    /// `targets[g]` is the target size of group `g`. Candidates are visited
    /// in the given order and only a strictly lower score replaces the
    /// current best, so with ascending candidates ties go to the lowest
    /// group index.
    pub fn best_group(
        &self,
        roster: &Roster,
        history: &CooccurrenceMatrix,
        participant: usize,
        groups: &[Vec<usize>],
        targets: &[usize],
        candidates: impl IntoIterator<Item = usize>,
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for g in candidates {
            let score = self.score(roster, history, participant, &groups[g], targets[g]);
            match best {
                Some((_, s)) if score >= s => {}
                _ => best = Some((g, score)),
            }
        }
        best.map(|(g, _)| g)
    }
}
