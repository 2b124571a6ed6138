//! GA run configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Parameters of a [`GaRunner`](super::GaRunner) run.
///
/// # Example
/// ```
/// use u_group::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(50)
///     .with_seed(7)
///     .with_parallel(false);
/// assert_eq!(config.population_size, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Generation budget.
    pub max_generations: usize,
    /// Initial individuals built as heuristic seeds. Read by
    /// [`GroupingGaProblem::from_config`](super::GroupingGaProblem::from_config).
    pub num_heuristic_seeds: usize,
    /// Per-gene mutation probability, handed to the problem's mutation.
    pub mutation_rate: f64,
    /// Probability that a selected pair is recombined instead of copied.
    pub crossover_rate: f64,
    /// Individuals drawn per tournament.
    pub tournament_size: usize,
    /// Best individuals copied unchanged into the next generation (at least 1).
    pub elite_count: usize,
    /// Stop after this many generations without improvement.
    pub stagnation_limit: Option<usize>,
    /// Wall-clock budget, checked between generations.
    pub time_budget: Option<Duration>,
    /// RNG seed; `None` means 0.
    pub seed: Option<u64>,
    /// Evaluate the population on the rayon pool.
    pub parallel: bool,
    /// Run local search on the heuristic seeds. Read by
    /// [`GroupingGaProblem::from_config`](super::GroupingGaProblem::from_config).
    pub refine_seeds: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 40,
            max_generations: 500,
            num_heuristic_seeds: 10,
            mutation_rate: 0.08,
            crossover_rate: 0.9,
            tournament_size: 3,
            elite_count: 2,
            stagnation_limit: None,
            time_budget: None,
            seed: None,
            parallel: true,
            refine_seeds: true,
        }
    }
}

impl GaConfig {
    /// Sets the population size (at least 1).
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n.max(1);
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the number of heuristic seeds.
    pub fn with_heuristic_seeds(mut self, n: usize) -> Self {
        self.num_heuristic_seeds = n;
        self
    }

    /// Sets the mutation rate, clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate, clamped to `[0, 1]`.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the tournament size (at least 1).
    pub fn with_tournament_size(mut self, n: usize) -> Self {
        self.tournament_size = n.max(1);
        self
    }

    /// Sets the elite count (at least 1).
    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n.max(1);
        self
    }

    /// Stops after `n` generations without improvement.
    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.stagnation_limit = Some(n);
        self
    }

    /// Stops once `budget` has elapsed.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enables or disables local search on heuristic seeds.
    pub fn with_refine_seeds(mut self, refine: bool) -> Self {
        self.refine_seeds = refine;
        self
    }
}
