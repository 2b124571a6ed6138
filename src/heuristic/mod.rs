//! Heuristic construction and refinement.
//!
//! - [`HeuristicConstructor`]: greedy quota-driven builder of complete
//!   assignments.
//! - [`LocalSearchRefiner`]: same-rank swap hill climbing on top of any
//!   complete assignment.
//! - [`PlacementWeights`]: the per-placement score both the constructor
//!   and GA repair use.

mod constructor;
mod local_search;
mod scoring;

pub use constructor::HeuristicConstructor;
pub use local_search::{LocalSearchConfig, LocalSearchRefiner, RefineStats};
pub use scoring::PlacementWeights;

pub(crate) use constructor::smallest_group;
pub(crate) use local_search::conflict_pairs;
