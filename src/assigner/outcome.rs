//! Result of an assignment run.

use serde::Serialize;

use crate::evaluation::FairnessReport;
use crate::ga::{Penalty, PenaltyWeights};
use crate::models::Assignment;
use crate::roster::Roster;

/// An assignment with its penalty and fairness report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentOutcome {
    /// Session → group → participant index.
    pub assignment: Assignment,
    /// Session → group → participant ID.
    pub groups: Vec<Vec<Vec<String>>>,
    /// Tiered penalty.
    pub penalty: Penalty,
    /// Partner statistics.
    pub fairness: FairnessReport,
}

impl AssignmentOutcome {
    /// Evaluates `assignment` over `roster`.
    pub fn evaluate(roster: &Roster, assignment: Assignment, weights: &PenaltyWeights) -> Self {
        let penalty = Penalty::evaluate(roster, &assignment, weights);
        let fairness = FairnessReport::calculate(roster, &assignment);
        let groups = assignment.member_ids(roster.participants());
        Self {
            assignment,
            groups,
            penalty,
            fairness,
        }
    }

    /// Mean repeats per participant.
    pub fn avg_repeat_per_person(&self) -> f64 {
        self.fairness.avg_repeat_per_person
    }

    /// Mean distinct-partner count.
    pub fn mean_distinct_partners(&self) -> f64 {
        self.fairness.spread.mean
    }
}
