//! Per-session rank quota planning.
//!
//! Decides, before anyone is placed, how many participants of each rank
//! every group of a session receives.
//!
//! # Algorithm
//!
//! 1. Group capacities are balanced: with `q, r = N divmod G`, the first
//!    `r` groups hold `q + 1` members and the rest `q`.
//! 2. Ranks are visited in rank order. A single boustrophedon cursor,
//!    continuing across ranks, walks `0, 1, …, G-1, G-1, …, 1, 0, 0, 1, …`
//!    (dwelling one extra step at each end). Each step hands one seat of
//!    the current rank to the visited group if it still has capacity.
//!
//! The dwell at the endpoints keeps repeated passes from favouring the
//! middle groups, so rank remainders spread evenly.
//!
//! Because the cursor is shared, a rank is split flat (every group within
//! one seat of the others, exactly equal when `G` divides the count) only
//! if the ranks before it also have counts divisible by `G`. Otherwise
//! the rank starts mid-sweep and can split unevenly even when its own
//! count is a multiple of `G`: Faculty 2, Doctoral 3 over three groups
//! gives Doctoral `[0, 1, 2]`. Group sizes stay balanced either way.

use serde::{Deserialize, Serialize};

use crate::error::{AssignError, Result};
use crate::models::{Rank, RankCounts, Session};

/// Rank quotas for every group of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPlan {
    groups: Vec<RankCounts>,
}

impl QuotaPlan {
    /// Plans quotas for `session` (ordinal `session_index`) given the
    /// participant count of each rank.
    ///
    /// Uses the session's explicit rank targets when present, the zigzag
    /// plan otherwise.
    pub fn plan(session_index: usize, session: &Session, totals: RankCounts) -> Result<Self> {
        match &session.rank_targets {
            Some(targets) => Self::from_targets(session_index, session, targets, totals),
            None => Self::zigzag(session_index, session, totals),
        }
    }

    /// Zigzag plan over balanced group capacities.
    pub fn zigzag(session_index: usize, session: &Session, totals: RankCounts) -> Result<Self> {
        let g = session.group_count;
        let n = totals.total();
        if g == 0 {
            return Err(AssignError::quota(session_index, "session has no groups"));
        }

        let sizes = balanced_sizes(n, g);
        if let Some(bad) = sizes.iter().find(|&&s| !session.size_ok(s)) {
            return Err(AssignError::quota(
                session_index,
                format!(
                    "balanced group size {bad} outside {}..={}",
                    session.min_size, session.max_size
                ),
            ));
        }

        let mut groups = vec![RankCounts::zero(); g];
        let mut loads = vec![0usize; g];
        let mut cursor = ZigzagCursor::new(g);

        for rank in Rank::ALL {
            for _ in 0..totals[rank] {
                // Two full sweeps visit every group at least once.
                let mut placed = false;
                for _ in 0..2 * g {
                    let idx = cursor.current();
                    cursor.advance();
                    if loads[idx] < sizes[idx] {
                        groups[idx][rank] += 1;
                        loads[idx] += 1;
                        placed = true;
                        break;
                    }
                }
                if !placed {
                    return Err(AssignError::quota(
                        session_index,
                        format!("no group has capacity left for a {rank} seat"),
                    ));
                }
            }
        }

        Ok(Self { groups })
    }

    /// Adopts explicit per-group targets after checking them.
    ///
    /// Targets must cover every group, sum to the rank totals, and keep
    /// every group within the session bounds.
    pub fn from_targets(
        session_index: usize,
        session: &Session,
        targets: &[RankCounts],
        totals: RankCounts,
    ) -> Result<Self> {
        if targets.len() != session.group_count {
            return Err(AssignError::quota(
                session_index,
                format!(
                    "{} rank targets given for {} groups",
                    targets.len(),
                    session.group_count
                ),
            ));
        }
        for (g, t) in targets.iter().enumerate() {
            if !session.size_ok(t.total()) {
                return Err(AssignError::quota(
                    session_index,
                    format!(
                        "group {g} target size {} outside {}..={}",
                        t.total(),
                        session.min_size,
                        session.max_size
                    ),
                ));
            }
        }
        for rank in Rank::ALL {
            let planned: usize = targets.iter().map(|t| t[rank]).sum();
            if planned != totals[rank] {
                return Err(AssignError::quota(
                    session_index,
                    format!("{rank} targets total {planned}, roster has {}", totals[rank]),
                ));
            }
        }
        Ok(Self {
            groups: targets.to_vec(),
        })
    }

    /// Number of groups.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Quota of `rank` in group `group`.
    #[inline]
    pub fn quota(&self, group: usize, rank: Rank) -> usize {
        self.groups[group][rank]
    }

    /// Rank quotas of one group.
    #[inline]
    pub fn group(&self, group: usize) -> &RankCounts {
        &self.groups[group]
    }

    /// Target size of one group (sum of its rank quotas).
    #[inline]
    pub fn group_target(&self, group: usize) -> usize {
        self.groups[group].total()
    }

    /// Quotas of one rank across all groups.
    pub fn rank_column(&self, rank: Rank) -> Vec<usize> {
        self.groups.iter().map(|c| c[rank]).collect()
    }

    /// All group quotas.
    pub fn groups(&self) -> &[RankCounts] {
        &self.groups
    }
}

/// Splits `n` into `g` sizes differing by at most one, larger ones first.
pub fn balanced_sizes(n: usize, g: usize) -> Vec<usize> {
    if g == 0 {
        return Vec::new();
    }
    let (q, r) = (n / g, n % g);
    (0..g).map(|i| if i < r { q + 1 } else { q }).collect()
}

/// Boustrophedon cursor over `0..len` that dwells once at each end.
///
/// Visits `0, 1, …, len-1, len-1, …, 0, 0, 1, …` indefinitely.
#[derive(Debug, Clone)]
pub struct ZigzagCursor {
    len: usize,
    idx: usize,
    forward: bool,
}

impl ZigzagCursor {
    /// Starts at index 0, moving forward.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            idx: 0,
            forward: true,
        }
    }

    /// Index under the cursor.
    #[inline]
    pub fn current(&self) -> usize {
        self.idx
    }

    /// Moves one step; at an end, only the direction flips.
    pub fn advance(&mut self) {
        if self.len <= 1 {
            return;
        }
        if self.forward {
            if self.idx == self.len - 1 {
                self.forward = false;
            } else {
                self.idx += 1;
            }
        } else if self.idx == 0 {
            self.forward = true;
        } else {
            self.idx -= 1;
        }
    }
}

impl Iterator for ZigzagCursor {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let cur = self.idx;
        self.advance();
        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_sequence() {
        let seq: Vec<usize> = ZigzagCursor::new(3).take(10).collect();
        assert_eq!(seq, vec![0, 1, 2, 2, 1, 0, 0, 1, 2, 2]);
        let single: Vec<usize> = ZigzagCursor::new(1).take(3).collect();
        assert_eq!(single, vec![0, 0, 0]);
        assert_eq!(ZigzagCursor::new(0).next(), None);
    }

    #[test]
    fn test_balanced_sizes() {
        assert_eq!(balanced_sizes(10, 3), vec![4, 3, 3]);
        assert_eq!(balanced_sizes(6, 3), vec![2, 2, 2]);
        assert!(balanced_sizes(5, 0).is_empty());
    }

    #[test]
    fn test_zigzag_sums_per_rank() {
        let session = Session::new(3, 2, 5);
        let totals = RankCounts::from_pairs([
            (Rank::Faculty, 2),
            (Rank::Doctoral, 3),
            (Rank::Master, 4),
            (Rank::Bachelor, 2),
        ]);
        let plan = QuotaPlan::zigzag(0, &session, totals).unwrap();

        for rank in Rank::ALL {
            assert_eq!(plan.rank_column(rank).iter().sum::<usize>(), totals[rank]);
        }
        let sizes: Vec<usize> = (0..3).map(|g| plan.group_target(g)).collect();
        assert_eq!(sizes, vec![4, 4, 3]);
    }

    #[test]
    fn test_zigzag_even_rank_is_flat() {
        let session = Session::new(3, 1, 4);
        let totals = RankCounts::from_pairs([(Rank::Master, 6), (Rank::Bachelor, 3)]);
        let plan = QuotaPlan::zigzag(0, &session, totals).unwrap();
        assert_eq!(plan.rank_column(Rank::Master), vec![2, 2, 2]);
        assert_eq!(plan.rank_column(Rank::Bachelor), vec![1, 1, 1]);
    }

    #[test]
    fn test_zigzag_remainder_follows_cursor() {
        // Faculty 0,1 then the cursor continues at 2 for Doctoral.
        let session = Session::new(3, 1, 3);
        let totals = RankCounts::from_pairs([(Rank::Faculty, 2), (Rank::Doctoral, 4)]);
        let plan = QuotaPlan::zigzag(0, &session, totals).unwrap();
        assert_eq!(plan.rank_column(Rank::Faculty), vec![1, 1, 0]);
        // Doctoral visits 2, 2, 1, 0.
        assert_eq!(plan.rank_column(Rank::Doctoral), vec![1, 1, 2]);
    }

    #[test]
    fn test_zigzag_carry_over_unbalances_divisible_rank() {
        let session = Session::new(3, 3, 3);
        let totals = RankCounts::from_pairs([
            (Rank::Faculty, 2),
            (Rank::Doctoral, 3),
            (Rank::Master, 4),
        ]);
        let plan = QuotaPlan::zigzag(0, &session, totals).unwrap();
        // Faculty 0, 1; Doctoral 2, 2, 1; Master 0, 0, 1, 2.
        assert_eq!(plan.rank_column(Rank::Faculty), vec![1, 1, 0]);
        assert_eq!(plan.rank_column(Rank::Doctoral), vec![0, 1, 2]);
        assert_eq!(plan.rank_column(Rank::Master), vec![2, 1, 1]);
        assert!((0..3).all(|g| plan.group_target(g) == 3));
    }

    #[test]
    fn test_zigzag_skips_full_groups() {
        // Sizes [2, 2]: Faculty takes 0, 1, 1; the Master seat lands in 0.
        let session = Session::new(2, 2, 2);
        let totals = RankCounts::from_pairs([(Rank::Faculty, 3), (Rank::Master, 1)]);
        let plan = QuotaPlan::zigzag(0, &session, totals).unwrap();
        assert_eq!(plan.group_target(0), 2);
        assert_eq!(plan.group_target(1), 2);
        assert_eq!(plan.rank_column(Rank::Faculty), vec![1, 2]);
        assert_eq!(plan.rank_column(Rank::Master), vec![1, 0]);
    }

    #[test]
    fn test_zigzag_rejects_out_of_bounds() {
        let session = Session::new(3, 2, 2);
        let totals = RankCounts::from_pairs([(Rank::Master, 5)]);
        let err = QuotaPlan::zigzag(4, &session, totals).unwrap_err();
        assert!(matches!(err, AssignError::InfeasibleQuota { session: 4, .. }));
    }

    #[test]
    fn test_explicit_targets() {
        let session = Session::new(2, 2, 3);
        let totals = RankCounts::from_pairs([(Rank::Faculty, 2), (Rank::Master, 3)]);
        let targets = vec![
            RankCounts::from_pairs([(Rank::Faculty, 2)]),
            RankCounts::from_pairs([(Rank::Master, 3)]),
        ];
        let plan = QuotaPlan::from_targets(0, &session, &targets, totals).unwrap();
        assert_eq!(plan.quota(0, Rank::Faculty), 2);
        assert_eq!(plan.quota(1, Rank::Master), 3);

        let session = session.with_rank_targets(targets);
        assert_eq!(QuotaPlan::plan(0, &session, totals).unwrap(), plan);
    }

    #[test]
    fn test_explicit_targets_rejected() {
        let session = Session::new(2, 2, 3);
        let totals = RankCounts::from_pairs([(Rank::Faculty, 2), (Rank::Master, 3)]);

        let wrong_sum = vec![
            RankCounts::from_pairs([(Rank::Faculty, 1), (Rank::Master, 1)]),
            RankCounts::from_pairs([(Rank::Master, 2)]),
        ];
        assert!(QuotaPlan::from_targets(0, &session, &wrong_sum, totals).is_err());

        let too_big = vec![
            RankCounts::from_pairs([(Rank::Faculty, 1)]),
            RankCounts::from_pairs([(Rank::Faculty, 1), (Rank::Master, 3)]),
        ];
        assert!(QuotaPlan::from_targets(0, &session, &too_big, totals).is_err());

        let short = vec![RankCounts::from_pairs([(Rank::Faculty, 2), (Rank::Master, 3)])];
        assert!(QuotaPlan::from_targets(0, &session, &short, totals).is_err());
    }
}
