//! Assignment (solution) model.
//!
//! Stores, for every session, the member list of every group as
//! participant indices into the roster.

use serde::{Deserialize, Serialize};

use super::Participant;

/// A multi-session group assignment.
///
/// `sessions[s][g]` holds the participant indices of group `g` in session `s`.
/// Group order and member order are significant only for reproducibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Session → group → member indices.
    pub sessions: Vec<Vec<Vec<usize>>>,
}

impl Assignment {
    /// Creates an assignment from raw group lists.
    pub fn new(sessions: Vec<Vec<Vec<usize>>>) -> Self {
        Self { sessions }
    }

    /// Creates an assignment with empty groups, `group_counts[s]` per session.
    pub fn empty(group_counts: impl IntoIterator<Item = usize>) -> Self {
        Self {
            sessions: group_counts
                .into_iter()
                .map(|g| vec![Vec::new(); g])
                .collect(),
        }
    }

    /// Number of sessions.
    #[inline]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Groups of one session.
    #[inline]
    pub fn groups(&self, session: usize) -> &[Vec<usize>] {
        &self.sessions[session]
    }

    /// Mutable groups of one session.
    #[inline]
    pub fn groups_mut(&mut self, session: usize) -> &mut Vec<Vec<usize>> {
        &mut self.sessions[session]
    }

    /// Group index of `participant` in `session`, if placed.
    pub fn group_of(&self, session: usize, participant: usize) -> Option<usize> {
        self.sessions
            .get(session)?
            .iter()
            .position(|g| g.contains(&participant))
    }

    /// Participant → group index for one session (`None` = unplaced).
    pub fn membership(&self, session: usize, participant_count: usize) -> Vec<Option<usize>> {
        let mut out = vec![None; participant_count];
        for (g, members) in self.sessions[session].iter().enumerate() {
            for &p in members {
                if p < participant_count {
                    out[p] = Some(g);
                }
            }
        }
        out
    }

    /// Whether every session places each of `participant_count` participants
    /// exactly once (no omissions, no duplicates, no foreign indices).
    pub fn is_complete(&self, participant_count: usize) -> bool {
        self.sessions.iter().all(|groups| {
            let mut seen = vec![false; participant_count];
            let mut placed = 0;
            for &p in groups.iter().flatten() {
                if p >= participant_count || seen[p] {
                    return false;
                }
                seen[p] = true;
                placed += 1;
            }
            placed == participant_count
        })
    }

    /// Resolves indices to participant IDs: session → group → IDs.
    pub fn member_ids(&self, participants: &[Participant]) -> Vec<Vec<Vec<String>>> {
        self.sessions
            .iter()
            .map(|groups| {
                groups
                    .iter()
                    .map(|g| g.iter().map(|&p| participants[p].id.clone()).collect())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rank;

    #[test]
    fn test_empty() {
        let a = Assignment::empty([2, 3]);
        assert_eq!(a.session_count(), 2);
        assert_eq!(a.groups(0).len(), 2);
        assert_eq!(a.groups(1).len(), 3);
        assert!(!a.is_complete(1));
        assert!(a.is_complete(0));
    }

    #[test]
    fn test_group_of_and_membership() {
        let a = Assignment::new(vec![vec![vec![0, 2], vec![1, 3]]]);
        assert_eq!(a.group_of(0, 2), Some(0));
        assert_eq!(a.group_of(0, 3), Some(1));
        assert_eq!(a.group_of(0, 9), None);
        assert_eq!(a.group_of(5, 0), None);
        assert_eq!(a.membership(0, 4), vec![Some(0), Some(1), Some(0), Some(1)]);
    }

    #[test]
    fn test_is_complete_detects_duplicates_and_omissions() {
        assert!(Assignment::new(vec![vec![vec![0, 1], vec![2, 3]]]).is_complete(4));
        assert!(!Assignment::new(vec![vec![vec![0, 1], vec![1, 3]]]).is_complete(4));
        assert!(!Assignment::new(vec![vec![vec![0, 1], vec![3]]]).is_complete(4));
        assert!(!Assignment::new(vec![vec![vec![0, 1], vec![2, 7]]]).is_complete(4));
    }

    #[test]
    fn test_member_ids() {
        let ps = vec![
            Participant::new("a", Rank::Faculty),
            Participant::new("b", Rank::Master),
        ];
        let a = Assignment::new(vec![vec![vec![1], vec![0]]]);
        assert_eq!(
            a.member_ids(&ps),
            vec![vec![vec!["b".to_string()], vec!["a".to_string()]]]
        );
    }
}
