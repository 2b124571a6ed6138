//! Validated problem instance.
//!
//! A [`Roster`] bundles the participants and sessions of one run with
//! everything derived from them once: per-session quota plans, rank
//! buckets, and a pairwise shared-affiliation table. All assigners read
//! from it; nothing mutates it.

use tracing::debug;

use crate::error::{AssignError, Result};
use crate::models::{Participant, Rank, RankCounts, Session};
use crate::quota::QuotaPlan;

/// Read-only problem instance shared by every assigner.
#[derive(Debug, Clone)]
pub struct Roster {
    participants: Vec<Participant>,
    sessions: Vec<Session>,
    quotas: Vec<QuotaPlan>,
    ranks: Vec<Rank>,
    by_rank: [Vec<usize>; Rank::COUNT],
    totals: RankCounts,
    /// Row-major N×N shared-affiliation counts.
    shared: Vec<u16>,
}

impl Roster {
    /// Builds a roster, failing fast on infeasible sessions or quotas.
    ///
    /// # Errors
    /// - [`AssignError::EmptyRoster`] without participants or sessions.
    /// - [`AssignError::InfeasibleSessionConfiguration`] if `G*min > N` or
    ///   `G*max < N` for any session.
    /// - [`AssignError::InfeasibleQuota`] if a quota plan cannot be built.
    pub fn new(participants: Vec<Participant>, sessions: Vec<Session>) -> Result<Self> {
        let n = participants.len();
        if n == 0 || sessions.is_empty() {
            return Err(AssignError::EmptyRoster);
        }

        for (s, session) in sessions.iter().enumerate() {
            if !session.can_hold(n) {
                return Err(AssignError::InfeasibleSessionConfiguration {
                    session: s,
                    group_count: session.group_count,
                    min_size: session.min_size,
                    max_size: session.max_size,
                    participants: n,
                });
            }
        }

        let ranks: Vec<Rank> = participants.iter().map(|p| p.rank).collect();
        let mut by_rank: [Vec<usize>; Rank::COUNT] = Default::default();
        let mut totals = RankCounts::zero();
        for (i, &rank) in ranks.iter().enumerate() {
            by_rank[rank.index()].push(i);
            totals[rank] += 1;
        }

        let quotas = sessions
            .iter()
            .enumerate()
            .map(|(s, session)| QuotaPlan::plan(s, session, totals))
            .collect::<Result<Vec<_>>>()?;

        let mut shared = vec![0u16; n * n];
        for a in 0..n {
            for b in (a + 1)..n {
                let k = participants[a].shared_affiliations(&participants[b]) as u16;
                shared[a * n + b] = k;
                shared[b * n + a] = k;
            }
        }

        debug!(
            participants = n,
            sessions = sessions.len(),
            "roster built"
        );

        Ok(Self {
            participants,
            sessions,
            quotas,
            ranks,
            by_rank,
            totals,
            shared,
        })
    }

    /// All participants, in input order.
    #[inline]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// One participant.
    #[inline]
    pub fn participant(&self, index: usize) -> &Participant {
        &self.participants[index]
    }

    /// Participant count `N`.
    #[inline]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// All sessions, in order.
    #[inline]
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// One session.
    #[inline]
    pub fn session(&self, index: usize) -> &Session {
        &self.sessions[index]
    }

    /// Number of sessions.
    #[inline]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Quota plan of one session.
    #[inline]
    pub fn quota(&self, session: usize) -> &QuotaPlan {
        &self.quotas[session]
    }

    /// Rank of one participant.
    #[inline]
    pub fn rank_of(&self, participant: usize) -> Rank {
        self.ranks[participant]
    }

    /// Participants of one rank, in input order.
    #[inline]
    pub fn members_of_rank(&self, rank: Rank) -> &[usize] {
        &self.by_rank[rank.index()]
    }

    /// Participant count per rank.
    #[inline]
    pub fn rank_totals(&self) -> RankCounts {
        self.totals
    }

    /// Number of affiliation labels `a` and `b` share (0 for `a == b`).
    #[inline]
    pub fn shared_affiliations(&self, a: usize, b: usize) -> usize {
        self.shared[a * self.participants.len() + b] as usize
    }

    /// Whether `a` and `b` share any affiliation.
    #[inline]
    pub fn conflicts(&self, a: usize, b: usize) -> bool {
        self.shared_affiliations(a, b) > 0
    }

    /// Number of members of `group` sharing an affiliation with `participant`.
    pub fn affiliation_conflicts(&self, participant: usize, group: &[usize]) -> usize {
        group
            .iter()
            .filter(|&&m| m != participant && self.conflicts(participant, m))
            .count()
    }

    /// Per-rank member counts of a group.
    pub fn rank_counts(&self, group: &[usize]) -> RankCounts {
        let mut counts = RankCounts::zero();
        for &m in group {
            counts[self.ranks[m]] += 1;
        }
        counts
    }
}
