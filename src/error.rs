//! Error types for group assignment.
//!
//! Only infeasible input is an error. Local search and the GA never fail
//! on a feasible roster; an exhausted budget yields a valid but possibly
//! suboptimal assignment.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AssignError>;

/// Fatal assignment errors. No partial output is produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssignError {
    /// A session's bounds cannot contain all participants.
    #[error(
        "session {session}: {participants} participants do not fit {group_count} groups of {min_size}..={max_size}"
    )]
    InfeasibleSessionConfiguration {
        /// Session ordinal (0-based).
        session: usize,
        /// Number of groups `G`.
        group_count: usize,
        /// Minimum group size.
        min_size: usize,
        /// Maximum group size.
        max_size: usize,
        /// Participant count `N`.
        participants: usize,
    },

    /// Rank quotas cannot be distributed within the group bounds.
    #[error("session {session}: infeasible rank quota: {reason}")]
    InfeasibleQuota {
        /// Session ordinal (0-based).
        session: usize,
        /// What could not be satisfied.
        reason: String,
    },

    /// There is nobody to assign, or no session to assign them in.
    #[error("roster must contain at least one participant and one session")]
    EmptyRoster,
}

impl AssignError {
    /// Builds an [`AssignError::InfeasibleQuota`].
    pub fn quota(session: usize, reason: impl Into<String>) -> Self {
        Self::InfeasibleQuota {
            session,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = AssignError::InfeasibleSessionConfiguration {
            session: 1,
            group_count: 3,
            min_size: 2,
            max_size: 2,
            participants: 5,
        };
        assert_eq!(
            e.to_string(),
            "session 1: 5 participants do not fit 3 groups of 2..=2"
        );

        let q = AssignError::quota(0, "Faculty totals 3, expected 2");
        assert!(q.to_string().contains("Faculty totals 3"));
    }
}
