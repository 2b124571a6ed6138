//! Hybrid genetic optimization of assignments.
//!
//! A generational GA whose population is seeded by the heuristic
//! constructor (optionally refined by local search) and evolved under
//! rank-safe operators, minimizing a tiered [`Penalty`].
//!
//! # Encoding
//!
//! A chromosome is a complete [`Assignment`](crate::models::Assignment).
//! Operators move participants only between groups of the same session
//! and only within their rank slots, so every group keeps the rank
//! composition of the session's quota plan.
//!
//! # Submodules
//!
//! - [`operators`]: runtime-selectable crossover and mutation strategies
//!
//! # Reference
//! - Falkenauer (1998), "Genetic Algorithms and Grouping Problems"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

mod chromosome;
mod config;
mod fitness;
pub mod operators;
mod problem;
mod runner;
mod types;

pub use chromosome::{
    rank_slot_crossover, rebuild_mutation, repair_session, session_crossover, swap_mutation,
    GroupingChromosome,
};
pub use config::GaConfig;
pub use fitness::{Penalty, PenaltyWeights};
pub use problem::GroupingGaProblem;
pub use runner::{GaResult, GaRunner, StopReason};
pub use types::{Fitness, GaProblem, Individual};
