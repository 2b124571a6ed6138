//! Assigners: participants + sessions → assignment.
//!
//! [`GroupAssigner`] is the seam between callers and backends. Two
//! backends are provided:
//!
//! - [`HeuristicAssigner`]: greedy construction, optionally refined by
//!   local search. Deterministic.
//! - [`HybridGaAssigner`]: heuristic-seeded GA. Deterministic per seed.
//!
//! Both return an [`AssignmentOutcome`] carrying the assignment, its
//! penalty breakdown and the fairness report.

mod heuristic;
mod hybrid;
mod outcome;

pub use heuristic::HeuristicAssigner;
pub use hybrid::HybridGaAssigner;
pub use outcome::AssignmentOutcome;

use crate::error::Result;
use crate::models::{Participant, Session};

/// A group assignment backend.
pub trait GroupAssigner {
    /// Assigns every participant to one group per session.
    ///
    /// # Errors
    /// Any [`AssignError`](crate::AssignError) raised while building the
    /// roster: empty input, infeasible sessions or infeasible quotas.
    fn assign(&self, participants: &[Participant], sessions: &[Session])
        -> Result<AssignmentOutcome>;
}
