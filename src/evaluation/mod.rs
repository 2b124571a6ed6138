//! Co-occurrence tracking and fairness evaluation.
//!
//! [`CooccurrenceMatrix`] is the shared scoring state of every assigner:
//! the constructor reads it while placing, local search updates it while
//! swapping, and the GA rebuilds it per chromosome. [`FairnessReport`]
//! summarizes a finished assignment for downstream reporting.

mod cooccurrence;
mod fairness;

pub use cooccurrence::{pair_excess_penalty, CooccurrenceMatrix};
pub use fairness::{theoretical_min_avg_repeat, FairnessReport, PartnerSpread, PartnerStats};
