//! Grouping GA problem definition.
//!
//! Implements [`GaProblem`] for multi-session group assignment, bridging
//! the [`Roster`] to the generic runner.
//!
//! # Initialization
//!
//! Individual 0 is the deterministic heuristic; individuals
//! `1..num_heuristic_seeds` use shuffled rank orders. Seeds are refined by
//! local search when a refiner is set. Remaining individuals are shuffled
//! heuristic runs without refinement, which keeps the population diverse.

use rand::Rng;

use super::chromosome::GroupingChromosome;
use super::config::GaConfig;
use super::fitness::{Penalty, PenaltyWeights};
use super::operators::GeneticOperators;
use super::types::GaProblem;
use crate::heuristic::{HeuristicConstructor, LocalSearchRefiner, PlacementWeights};
use crate::roster::Roster;

/// GA problem over one roster.
///
/// # Example
/// ```
/// use u_group::ga::{GaConfig, GaRunner, GroupingGaProblem};
/// use u_group::models::{Participant, Rank, Session};
/// use u_group::Roster;
///
/// let participants = (0..6)
///     .map(|i| Participant::new(format!("p{i}"), Rank::Master))
///     .collect();
/// let roster = Roster::new(participants, vec![Session::new(2, 3, 3); 3]).unwrap();
/// let config = GaConfig::default()
///     .with_population_size(10)
///     .with_max_generations(5)
///     .with_seed(42);
/// let problem = GroupingGaProblem::from_config(&roster, &config);
/// let result = GaRunner::run(&problem, &config);
/// assert!(result.best.is_valid(&roster));
/// ```
pub struct GroupingGaProblem<'a> {
    roster: &'a Roster,
    constructor: HeuristicConstructor,
    refiner: Option<LocalSearchRefiner>,
    penalty_weights: PenaltyWeights,
    operators: GeneticOperators,
    heuristic_seeds: usize,
}

impl<'a> GroupingGaProblem<'a> {
    /// Creates a problem with default settings and no seed refinement.
    pub fn new(roster: &'a Roster) -> Self {
        Self {
            roster,
            constructor: HeuristicConstructor::new(),
            refiner: None,
            penalty_weights: PenaltyWeights::default(),
            operators: GeneticOperators::default(),
            heuristic_seeds: 10,
        }
    }

    /// Creates a problem seeded as `config` asks: `num_heuristic_seeds`
    /// seeds, refined with the default local search when `refine_seeds`.
    pub fn from_config(roster: &'a Roster, config: &GaConfig) -> Self {
        let problem = Self::new(roster).with_heuristic_seeds(config.num_heuristic_seeds);
        if config.refine_seeds {
            problem.with_refiner(LocalSearchRefiner::default())
        } else {
            problem
        }
    }

    /// Sets the constructor used for seeding, repair and rebuilds.
    pub fn with_constructor(mut self, constructor: HeuristicConstructor) -> Self {
        self.constructor = constructor;
        self
    }

    /// Refines heuristic seeds with `refiner`.
    pub fn with_refiner(mut self, refiner: LocalSearchRefiner) -> Self {
        self.refiner = Some(refiner);
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

    /// Sets how many initial individuals are heuristic seeds.
    pub fn with_heuristic_seeds(mut self, n: usize) -> Self {
        self.heuristic_seeds = n;
        self
    }

    /// The roster being solved.
    pub fn roster(&self) -> &Roster {
        self.roster
    }

    /// Penalty weights in use.
    pub fn penalty_weights(&self) -> &PenaltyWeights {
        &self.penalty_weights
    }

    fn placement_weights(&self) -> &PlacementWeights {
        self.constructor.weights()
    }
}

impl GaProblem for GroupingGaProblem<'_> {
    type Individual = GroupingChromosome;

    fn create_individual<R: Rng>(&self, index: usize, rng: &mut R) -> GroupingChromosome {
        let mut assignment = if index == 0 {
            self.constructor.construct(self.roster)
        } else {
            self.constructor.construct_shuffled(self.roster, rng)
        };
        if index < self.heuristic_seeds {
            if let Some(refiner) = &self.refiner {
                refiner.refine(self.roster, &mut assignment);
            }
        }
        GroupingChromosome::new(assignment)
    }

    fn evaluate(&self, individual: &GroupingChromosome) -> Penalty {
        Penalty::evaluate(self.roster, &individual.assignment, &self.penalty_weights)
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &GroupingChromosome,
        parent2: &GroupingChromosome,
        rng: &mut R,
    ) -> Vec<GroupingChromosome> {
        let (c1, c2) = self.operators.crossover(
            parent1,
            parent2,
            self.roster,
            self.placement_weights(),
            rng,
        );
        vec![c1, c2]
    }

    fn mutate<R: Rng>(&self, individual: &mut GroupingChromosome, rate: f64, rng: &mut R) {
        self.operators
            .mutate(individual, self.roster, &self.constructor, rate, rng);
    }
}
