//! Generational GA loop.
//!
//! # Algorithm
//!
//! 1. Create and evaluate `population_size` individuals.
//! 2. Per generation: copy the `elite_count` best unchanged, fill the rest
//!    with tournament-selected parents recombined with probability
//!    `crossover_rate` and then mutated, evaluate the newcomers, sort.
//! 3. Stop at `max_generations`, after `stagnation_limit` generations
//!    without improvement, or when `time_budget` has elapsed (checked
//!    between generations).
//!
//! The population is kept sorted best-first, so a tournament winner is the
//! drawn index with the smallest value, and the best-so-far individual is
//! always the first elite. The best fitness is therefore non-increasing.
//!
//! All randomness comes from one `SmallRng` seeded from the config.
//! Evaluation draws none, so parallel evaluation does not change results.

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::config::GaConfig;
use super::types::{Fitness, GaProblem, Individual};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `max_generations` reached.
    MaxGenerations,
    /// `stagnation_limit` generations without improvement.
    Stagnation,
    /// `time_budget` elapsed.
    TimeBudget,
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// Best individual found.
    pub best: I,
    /// Its fitness.
    pub best_fitness: I::Fitness,
    /// Generations completed.
    pub generations: usize,
    /// Best fitness after initialization and after each generation.
    pub history: Vec<I::Fitness>,
    /// Why the run ended.
    pub stop_reason: StopReason,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

/// Runs a [`GaProblem`] under a [`GaConfig`].
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA to completion.
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> GaResult<P::Individual> {
        let start = Instant::now();
        let mut rng = SmallRng::seed_from_u64(config.seed.unwrap_or(0));
        let pop_size = config.population_size.max(1);
        let elite_count = config.elite_count.clamp(1, pop_size);

        let mut population: Vec<P::Individual> = (0..pop_size)
            .map(|i| problem.create_individual(i, &mut rng))
            .collect();
        evaluate(problem, &mut population, config.parallel);
        sort_by_fitness(&mut population);

        let mut history = vec![population[0].fitness()];
        let mut stagnant = 0;
        let mut generations = 0;
        let mut stop_reason = StopReason::MaxGenerations;

        info!(
            population = pop_size,
            max_generations = config.max_generations,
            initial_best = population[0].fitness().to_f64(),
            "GA started"
        );

        while generations < config.max_generations {
            if let Some(budget) = config.time_budget {
                if start.elapsed() >= budget {
                    warn!(generations, "GA time budget exhausted");
                    stop_reason = StopReason::TimeBudget;
                    break;
                }
            }

            let previous_best = population[0].fitness();
            population = Self::next_generation(problem, config, &population, elite_count, &mut rng);
            evaluate(problem, &mut population[elite_count..], config.parallel);
            sort_by_fitness(&mut population);

            let best = population[0].fitness();
            if best < previous_best {
                stagnant = 0;
            } else {
                stagnant += 1;
            }
            history.push(best);
            problem.on_generation(generations, best);
            debug!(generation = generations, best = best.to_f64(), stagnant, "generation complete");
            generations += 1;

            if let Some(limit) = config.stagnation_limit {
                if stagnant >= limit {
                    stop_reason = StopReason::Stagnation;
                    break;
                }
            }
        }

        let best = population.swap_remove(0);
        let best_fitness = best.fitness();
        info!(
            generations,
            best = best_fitness.to_f64(),
            ?stop_reason,
            "GA finished"
        );

        GaResult {
            best,
            best_fitness,
            generations,
            history,
            stop_reason,
            elapsed: start.elapsed(),
        }
    }

    fn next_generation<P: GaProblem, R: Rng>(
        problem: &P,
        config: &GaConfig,
        population: &[P::Individual],
        elite_count: usize,
        rng: &mut R,
    ) -> Vec<P::Individual> {
        let pop_size = population.len();
        let mut next: Vec<P::Individual> = population[..elite_count].to_vec();

        while next.len() < pop_size {
            let p1 = tournament(pop_size, config.tournament_size, rng);
            let p2 = tournament(pop_size, config.tournament_size, rng);
            let children = if rng.random_bool(config.crossover_rate.clamp(0.0, 1.0)) {
                problem.crossover(&population[p1], &population[p2], rng)
            } else {
                vec![population[p1].clone(), population[p2].clone()]
            };
            for mut child in children {
                if next.len() >= pop_size {
                    break;
                }
                problem.mutate(&mut child, config.mutation_rate, rng);
                next.push(child);
            }
        }

        next
    }
}

/// Tournament over a best-first population: the smallest drawn index wins.
fn tournament<R: Rng>(len: usize, size: usize, rng: &mut R) -> usize {
    (0..size.max(1))
        .map(|_| rng.random_range(0..len))
        .min()
        .unwrap_or(0)
}

fn evaluate<P: GaProblem>(problem: &P, individuals: &mut [P::Individual], parallel: bool) {
    if parallel {
        individuals.par_iter_mut().for_each(|ind| {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        });
    } else {
        for ind in individuals.iter_mut() {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        }
    }
}

/// Stable sort, best first.
fn sort_by_fitness<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| {
        a.fitness()
            .partial_cmp(&b.fitness())
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimize Σ x² over a small integer vector.
    #[derive(Debug, Clone)]
    struct Point {
        x: Vec<i32>,
        fitness: f64,
    }

    impl Individual for Point {
        type Fitness = f64;

        fn fitness(&self) -> f64 {
            self.fitness
        }

        fn set_fitness(&mut self, fitness: f64) {
            self.fitness = fitness;
        }
    }

    struct Sphere;

    impl GaProblem for Sphere {
        type Individual = Point;

        fn create_individual<R: Rng>(&self, _index: usize, rng: &mut R) -> Point {
            Point {
                x: (0..4).map(|_| rng.random_range(-20..=20)).collect(),
                fitness: f64::worst(),
            }
        }

        fn evaluate(&self, p: &Point) -> f64 {
            p.x.iter().map(|&v| (v * v) as f64).sum()
        }

        fn crossover<R: Rng>(&self, a: &Point, b: &Point, rng: &mut R) -> Vec<Point> {
            let x = a
                .x
                .iter()
                .zip(&b.x)
                .map(|(&u, &v)| if rng.random_bool(0.5) { u } else { v })
                .collect();
            vec![Point {
                x,
                fitness: f64::worst(),
            }]
        }

        fn mutate<R: Rng>(&self, p: &mut Point, rate: f64, rng: &mut R) {
            for v in p.x.iter_mut() {
                if rng.random_bool(rate) {
                    *v += rng.random_range(-2..=2);
                }
            }
        }
    }

    #[test]
    fn test_run_improves() {
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(30)
            .with_mutation_rate(0.3)
            .with_seed(42)
            .with_parallel(false);
        let result = GaRunner::run(&Sphere, &config);

        assert_eq!(result.generations, 30);
        assert_eq!(result.stop_reason, StopReason::MaxGenerations);
        assert_eq!(result.history.len(), 31);
        assert!(result.best_fitness <= result.history[0]);
        assert_eq!(Sphere.evaluate(&result.best), result.best_fitness);
    }

    #[test]
    fn test_history_non_increasing() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_max_generations(40)
            .with_seed(42)
            .with_parallel(false);
        let result = GaRunner::run(&Sphere, &config);
        assert!(result.history.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_seed_reproducible_and_parallel_neutral() {
        let base = GaConfig::default()
            .with_population_size(12)
            .with_max_generations(15)
            .with_seed(42);
        let a = GaRunner::run(&Sphere, &base.clone().with_parallel(false));
        let b = GaRunner::run(&Sphere, &base.with_parallel(true));
        assert_eq!(a.best.x, b.best.x);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_stagnation_stops() {
        let config = GaConfig::default()
            .with_population_size(4)
            .with_max_generations(1000)
            .with_mutation_rate(0.0)
            .with_crossover_rate(0.0)
            .with_stagnation_limit(5)
            .with_seed(42)
            .with_parallel(false);
        let result = GaRunner::run(&Sphere, &config);
        // Copies only: the best can never improve.
        assert_eq!(result.stop_reason, StopReason::Stagnation);
        assert_eq!(result.generations, 5);
    }

    #[test]
    fn test_zero_time_budget() {
        let config = GaConfig::default()
            .with_population_size(4)
            .with_time_budget(Duration::ZERO)
            .with_seed(42)
            .with_parallel(false);
        let result = GaRunner::run(&Sphere, &config);
        assert_eq!(result.stop_reason, StopReason::TimeBudget);
        assert_eq!(result.generations, 0);
        assert_eq!(result.history.len(), 1);
    }

    #[test]
    fn test_tournament_in_range() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..100 {
            assert!(tournament(7, 3, &mut rng) < 7);
        }
        assert_eq!(tournament(1, 5, &mut rng), 0);
    }
}
