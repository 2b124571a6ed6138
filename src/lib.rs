//! Multi-session group assignment.
//!
//! Places a roster of ranked participants into groups over several
//! sessions so that every group mixes ranks evenly, lab-mates are split
//! up, and participants meet as many different people as possible.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Participant`, `Rank`, `Session`, `Assignment`
//! - **`quota`**: Per-session zigzag rank quotas
//! - **`heuristic`**: Greedy constructor and same-rank swap local search
//! - **`ga`**: Hybrid genetic optimizer with a tiered penalty fitness
//! - **`evaluation`**: Co-occurrence matrix and fairness report
//! - **`assigner`**: The `GroupAssigner` seam and its two backends
//! - **`validation`**: Input integrity checks for loaders
//!
//! # Example
//!
//! ```
//! use u_group::assigner::{GroupAssigner, HeuristicAssigner};
//! use u_group::models::{Participant, Rank, Session};
//!
//! let participants = vec![
//!     Participant::new("kim", Rank::Faculty).with_affiliation("Vision"),
//!     Participant::new("lee", Rank::Doctoral).with_affiliation("Vision"),
//!     Participant::new("park", Rank::Master).with_affiliation("Systems"),
//!     Participant::new("choi", Rank::Bachelor).with_affiliation("Systems"),
//! ];
//! let sessions = vec![Session::new(2, 2, 2); 3];
//!
//! let outcome = HeuristicAssigner::new().assign(&participants, &sessions)?;
//! assert!(outcome.penalty.is_feasible());
//! # Ok::<(), u_group::AssignError>(())
//! ```
//!
//! # References
//!
//! - Falkenauer (1998), "Genetic Algorithms and Grouping Problems"
//! - Lewis (2015), "A Guide to Graph Colouring", Ch. 8 (social golfer variants)

pub mod assigner;
pub mod error;
pub mod evaluation;
pub mod ga;
pub mod heuristic;
pub mod models;
pub mod quota;
mod roster;
pub mod validation;

pub use error::{AssignError, Result};
pub use roster::Roster;
