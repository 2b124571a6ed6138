//! Heuristic assigner.

use tracing::debug;

use super::{AssignmentOutcome, GroupAssigner};
use crate::error::Result;
use crate::ga::PenaltyWeights;
use crate::heuristic::{HeuristicConstructor, LocalSearchConfig, LocalSearchRefiner, PlacementWeights};
use crate::models::{Participant, Session};
use crate::roster::Roster;

/// Greedy construction followed by optional local search.
///
/// # Example
/// ```
/// use u_group::assigner::{GroupAssigner, HeuristicAssigner};
/// use u_group::models::{Participant, Rank, Session};
///
/// let participants = vec![
///     Participant::new("a", Rank::Faculty),
///     Participant::new("b", Rank::Bachelor),
///     Participant::new("c", Rank::Doctoral),
///     Participant::new("d", Rank::Master),
/// ];
/// let sessions = vec![Session::new(2, 2, 3); 2];
///
/// let outcome = HeuristicAssigner::new().assign(&participants, &sessions).unwrap();
/// assert_eq!(outcome.groups.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicAssigner {
    constructor: HeuristicConstructor,
    refiner: Option<LocalSearchRefiner>,
    penalty_weights: PenaltyWeights,
}

impl HeuristicAssigner {
    /// Creates an assigner with default weights and local search enabled.
    pub fn new() -> Self {
        Self {
            constructor: HeuristicConstructor::new(),
            refiner: Some(LocalSearchRefiner::default()),
            penalty_weights: PenaltyWeights::default(),
        }
    }

    /// Sets the placement weights.
    pub fn with_placement_weights(mut self, weights: PlacementWeights) -> Self {
        self.constructor = self.constructor.with_weights(weights);
        self
    }

    /// Sets the local search settings.
    pub fn with_local_search(mut self, config: LocalSearchConfig) -> Self {
        self.refiner = Some(LocalSearchRefiner::new(config));
        self
    }

    /// Disables local search.
    pub fn without_local_search(mut self) -> Self {
        self.refiner = None;
        self
    }

    /// Sets the penalty weights used for the reported penalty.
    pub fn with_penalty_weights(mut self, weights: PenaltyWeights) -> Self {
        self.penalty_weights = weights;
        self
    }

    /// Assigns over an already built roster.
    pub fn assign_roster(&self, roster: &Roster) -> AssignmentOutcome {
        let mut assignment = self.constructor.construct(roster);
        if let Some(refiner) = &self.refiner {
            let stats = refiner.refine(roster, &mut assignment);
            debug!(swaps = stats.swaps, "heuristic assignment refined");
        }
        AssignmentOutcome::evaluate(roster, assignment, &self.penalty_weights)
    }
}

impl Default for HeuristicAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupAssigner for HeuristicAssigner {
    fn assign(
        &self,
        participants: &[Participant],
        sessions: &[Session],
    ) -> Result<AssignmentOutcome> {
        let roster = Roster::new(participants.to_vec(), sessions.to_vec())?;
        Ok(self.assign_roster(&roster))
    }
}
