//! Core GA traits.
//!
//! [`Individual`] and [`GaProblem`] are the contract between
//! [`GaRunner`](super::GaRunner) and a problem encoding. Lower fitness is
//! better.

use rand::Rng;

/// Fitness value of an individual (minimized).
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Worst possible value, used for unevaluated individuals.
    fn worst() -> Self;

    /// Scalar view for logging and statistics.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// A candidate solution carrying its own fitness.
pub trait Individual: Clone + Send + Sync {
    /// Fitness type.
    type Fitness: Fitness;

    /// Current fitness.
    fn fitness(&self) -> Self::Fitness;

    /// Stores a freshly computed fitness.
    fn set_fitness(&mut self, fitness: Self::Fitness);
}

/// A GA optimization problem.
///
/// `Send + Sync` so that [`evaluate`](GaProblem::evaluate) can run on a
/// rayon pool. Evaluation must not draw randomness.
pub trait GaProblem: Send + Sync {
    /// Solution representation.
    type Individual: Individual;

    /// Creates the `index`-th member of the initial population.
    fn create_individual<R: Rng>(&self, index: usize, rng: &mut R) -> Self::Individual;

    /// Computes the fitness of `individual`.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// Recombines two parents into one or two children.
    ///
    /// The default clones `parent1`.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        _parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Vec<Self::Individual> {
        vec![parent1.clone()]
    }

    /// Mutates `individual` in place; `rate` is the per-gene probability.
    ///
    /// The default is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rate: f64, _rng: &mut R) {}

    /// Called after each generation with the best fitness so far.
    fn on_generation(
        &self,
        _generation: usize,
        _best_fitness: <Self::Individual as Individual>::Fitness,
    ) {
    }
}
