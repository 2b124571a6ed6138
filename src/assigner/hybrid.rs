//! Hybrid GA assigner.

use super::{AssignmentOutcome, GroupAssigner};
use crate::error::Result;
use crate::ga::{
    operators::GeneticOperators, GaConfig, GaResult, GaRunner, GroupingChromosome,
    GroupingGaProblem, PenaltyWeights,
};
use crate::heuristic::{HeuristicConstructor, LocalSearchConfig, LocalSearchRefiner, PlacementWeights};
use crate::models::{Participant, Session};
use crate::roster::Roster;

/// Heuristic-seeded genetic optimizer.
///
/// # Example
/// ```
/// use u_group::assigner::{GroupAssigner, HybridGaAssigner};
/// use u_group::ga::GaConfig;
/// use u_group::models::{Participant, Rank, Session};
///
/// let participants: Vec<_> = (0..8)
///     .map(|i| Participant::new(format!("p{i}"), Rank::Master))
///     .collect();
/// let sessions = vec![Session::new(2, 4, 4); 3];
/// let assigner = HybridGaAssigner::new(
///     GaConfig::default().with_population_size(10).with_max_generations(10).with_seed(1),
/// );
///
/// let outcome = assigner.assign(&participants, &sessions).unwrap();
/// assert!(outcome.penalty.is_feasible());
/// ```
#[derive(Debug, Clone, Default)]
pub struct HybridGaAssigner {
    config: GaConfig,
    placement: PlacementWeights,
    local_search: LocalSearchConfig,
    penalty_weights: PenaltyWeights,
    operators: GeneticOperators,
}

impl HybridGaAssigner {
    /// Creates an assigner with the given GA settings.
    pub fn new(config: GaConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Sets the placement weights for seeding and repair.
    pub fn with_placement_weights(mut self, weights: PlacementWeights) -> Self {
        self.placement = weights;
        self
    }

    /// Sets the local search settings for seed refinement.
    pub fn with_local_search(mut self, config: LocalSearchConfig) -> Self {
        self.local_search = config;
        self
    }

    /// Sets the penalty weights.
    pub fn with_penalty_weights(mut self, weights: PenaltyWeights) -> Self {
        self.penalty_weights = weights;
        self
    }

    /// Sets the genetic operators.
    pub fn with_operators(mut self, operators: GeneticOperators) -> Self {
        self.operators = operators;
        self
    }

    /// GA settings in use.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs the GA over `roster` and returns the raw result.
    pub fn optimize(&self, roster: &Roster) -> GaResult<GroupingChromosome> {
        let mut problem = GroupingGaProblem::from_config(roster, &self.config)
            .with_constructor(HeuristicConstructor::new().with_weights(self.placement))
            .with_penalty_weights(self.penalty_weights)
            .with_operators(self.operators);
        if self.config.refine_seeds {
            problem = problem.with_refiner(LocalSearchRefiner::new(self.local_search));
        }
        GaRunner::run(&problem, &self.config)
    }

    /// Assigns over an already built roster.
    pub fn assign_roster(&self, roster: &Roster) -> AssignmentOutcome {
        let result = self.optimize(roster);
        AssignmentOutcome::evaluate(roster, result.best.assignment, &self.penalty_weights)
    }
}

impl GroupAssigner for HybridGaAssigner {
    fn assign(
        &self,
        participants: &[Participant],
        sessions: &[Session],
    ) -> Result<AssignmentOutcome> {
        let roster = Roster::new(participants.to_vec(), sessions.to_vec())?;
        Ok(self.assign_roster(&roster))
    }
}
