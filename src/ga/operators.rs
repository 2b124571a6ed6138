//! Configurable genetic operators for grouping chromosomes.
//!
//! Provides runtime-selectable crossover and mutation strategies via
//! [`GeneticOperators`].
//!
//! # Usage
//!
//! ```
//! use u_group::ga::operators::{CrossoverType, GeneticOperators, MutationType};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover_type, CrossoverType::RankSlot);
//! assert_eq!(ops.mutation_type, MutationType::Swap);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chromosome::{
    rank_slot_crossover, rebuild_mutation, session_crossover, swap_mutation, GroupingChromosome,
};
use crate::heuristic::{HeuristicConstructor, PlacementWeights};
use crate::roster::Roster;

/// Crossover strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverType {
    /// Per `(group, rank)` slot inheritance in one session, then repair.
    RankSlot,
    /// Whole sessions inherited from either parent.
    Session,
}

/// Mutation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationType {
    /// Swap two same-rank participants in different groups.
    Swap,
    /// Rebuild the session with the shuffled heuristic.
    Rebuild,
}

/// Runtime-selectable genetic operators.
///
/// # Example
///
/// ```
/// use u_group::ga::operators::{CrossoverType, GeneticOperators, MutationType};
///
/// let ops = GeneticOperators {
///     crossover_type: CrossoverType::Session,
///     mutation_type: MutationType::Rebuild,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneticOperators {
    /// Crossover strategy.
    pub crossover_type: CrossoverType,
    /// Mutation strategy.
    pub mutation_type: MutationType,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            crossover_type: CrossoverType::RankSlot,
            mutation_type: MutationType::Swap,
        }
    }
}

impl GeneticOperators {
    /// Performs crossover using the configured strategy.
    ///
    /// `weights` drives repair placement for [`CrossoverType::RankSlot`].
    pub fn crossover<R: Rng>(
        &self,
        p1: &GroupingChromosome,
        p2: &GroupingChromosome,
        roster: &Roster,
        weights: &PlacementWeights,
        rng: &mut R,
    ) -> (GroupingChromosome, GroupingChromosome) {
        match self.crossover_type {
            CrossoverType::RankSlot => rank_slot_crossover(p1, p2, roster, weights, rng),
            CrossoverType::Session => session_crossover(p1, p2, rng),
        }
    }

    /// Performs mutation using the configured strategy, per session with
    /// probability `rate`.
    pub fn mutate<R: Rng>(
        &self,
        chromosome: &mut GroupingChromosome,
        roster: &Roster,
        constructor: &HeuristicConstructor,
        rate: f64,
        rng: &mut R,
    ) {
        match self.mutation_type {
            MutationType::Swap => swap_mutation(chromosome, roster, rate, rng),
            MutationType::Rebuild => rebuild_mutation(chromosome, roster, constructor, rate, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Participant, Rank, Session};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_roster() -> Roster {
        let ranks = [Rank::Faculty, Rank::Master, Rank::Master, Rank::Bachelor];
        let ps = (0..8)
            .map(|i| Participant::new(format!("p{i}"), ranks[i % 4]))
            .collect();
        Roster::new(ps, vec![Session::new(2, 4, 4); 3]).unwrap()
    }

    fn parent(roster: &Roster, rng: &mut SmallRng) -> GroupingChromosome {
        GroupingChromosome::new(HeuristicConstructor::new().construct_shuffled(roster, rng))
    }

    #[test]
    fn test_default_operators() {
        let ops = GeneticOperators::default();
        assert_eq!(ops.crossover_type, CrossoverType::RankSlot);
        assert_eq!(ops.mutation_type, MutationType::Swap);
    }

    #[test]
    fn test_every_crossover_valid() {
        let roster = sample_roster();
        let mut rng = SmallRng::seed_from_u64(42);
        for crossover_type in [CrossoverType::RankSlot, CrossoverType::Session] {
            let ops = GeneticOperators {
                crossover_type,
                mutation_type: MutationType::Swap,
            };
            let p1 = parent(&roster, &mut rng);
            let p2 = parent(&roster, &mut rng);
            let (c1, c2) = ops.crossover(&p1, &p2, &roster, &PlacementWeights::default(), &mut rng);
            assert!(c1.is_valid(&roster));
            assert!(c2.is_valid(&roster));
        }
    }

    #[test]
    fn test_every_mutation_valid() {
        let roster = sample_roster();
        let constructor = HeuristicConstructor::new();
        let mut rng = SmallRng::seed_from_u64(42);
        for mutation_type in [MutationType::Swap, MutationType::Rebuild] {
            let ops = GeneticOperators {
                crossover_type: CrossoverType::RankSlot,
                mutation_type,
            };
            let mut ch = parent(&roster, &mut rng);
            for _ in 0..10 {
                ops.mutate(&mut ch, &roster, &constructor, 0.5, &mut rng);
                assert!(ch.is_valid(&roster));
            }
        }
    }

    #[test]
    fn test_operators_serde() {
        let ops = GeneticOperators {
            crossover_type: CrossoverType::Session,
            mutation_type: MutationType::Rebuild,
        };
        let json = serde_json::to_string(&ops).unwrap();
        let back: GeneticOperators = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ops);
    }
}
