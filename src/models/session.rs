//! Session model.
//!
//! A session is one round of grouping. Every participant is placed in
//! exactly one of its `group_count` groups, each holding between
//! `min_size` and `max_size` members.

use serde::{Deserialize, Serialize};

use super::RankCounts;

/// One grouping round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Number of groups `G`.
    pub group_count: usize,
    /// Minimum members per group.
    pub min_size: usize,
    /// Maximum members per group.
    pub max_size: usize,
    /// Explicit per-group rank targets. `None` = zigzag planning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_targets: Option<Vec<RankCounts>>,
}

impl Session {
    /// Creates a session with `group_count` groups of `min_size..=max_size` members.
    pub fn new(group_count: usize, min_size: usize, max_size: usize) -> Self {
        Self {
            group_count,
            min_size,
            max_size,
            rank_targets: None,
        }
    }

    /// Fixes the rank quota of every group instead of planning it.
    pub fn with_rank_targets(mut self, targets: Vec<RankCounts>) -> Self {
        self.rank_targets = Some(targets);
        self
    }

    /// Smallest participant count this session can hold (`G * min`),
    /// `None` if it exceeds `usize`.
    #[inline]
    pub fn min_capacity(&self) -> Option<usize> {
        self.group_count.checked_mul(self.min_size)
    }

    /// Largest participant count this session can hold (`G * max`),
    /// saturating at `usize::MAX`.
    #[inline]
    pub fn max_capacity(&self) -> usize {
        self.group_count.saturating_mul(self.max_size)
    }

    /// Whether `participants` people fit this session's bounds.
    pub fn can_hold(&self, participants: usize) -> bool {
        self.group_count > 0
            && self.min_size <= self.max_size
            && self
                .min_capacity()
                .is_some_and(|min| min <= participants)
            && participants <= self.max_capacity()
    }

    /// Whether a group of `size` members is within bounds.
    #[inline]
    pub fn size_ok(&self, size: usize) -> bool {
        (self.min_size..=self.max_size).contains(&size)
    }
}
