//! Participant model.
//!
//! A participant is one person to be placed into a group in every session.
//! Its rank buckets it for quota planning; its affiliations (lab, team)
//! are used to keep colleagues apart.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Organizational rank of a participant.
///
/// Closed and ordered. The declaration order is the processing order for
/// quota planning and construction, and the tie-break order everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Teaching or research staff.
    Faculty,
    /// Doctoral student.
    Doctoral,
    /// Master's student.
    Master,
    /// Undergraduate.
    Bachelor,
}

impl Rank {
    /// Number of ranks.
    pub const COUNT: usize = 4;

    /// All ranks in processing order.
    pub const ALL: [Rank; Rank::COUNT] =
        [Rank::Faculty, Rank::Doctoral, Rank::Master, Rank::Bachelor];

    /// Dense index of this rank (0-based, in processing order).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical label.
    pub fn as_str(self) -> &'static str {
        match self {
            Rank::Faculty => "Faculty",
            Rank::Doctoral => "Doctoral",
            Rank::Master => "Master",
            Rank::Bachelor => "Bachelor",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One counter per rank.
///
/// Used for per-group quotas and per-session rank totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankCounts(pub [usize; Rank::COUNT]);

impl RankCounts {
    /// All-zero counts.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Builds counts from `(rank, count)` pairs. Repeated ranks accumulate.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Rank, usize)>) -> Self {
        let mut counts = Self::zero();
        for (rank, n) in pairs {
            counts[rank] += n;
        }
        counts
    }

    /// Sum over all ranks.
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Iterates `(rank, count)` in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (Rank, usize)> + '_ {
        Rank::ALL.iter().map(move |&r| (r, self.0[r.index()]))
    }
}

impl Index<Rank> for RankCounts {
    type Output = usize;

    fn index(&self, rank: Rank) -> &usize {
        &self.0[rank.index()]
    }
}

impl IndexMut<Rank> for RankCounts {
    fn index_mut(&mut self, rank: Rank) -> &mut usize {
        &mut self.0[rank.index()]
    }
}

/// A participant to be grouped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identifier.
    pub id: String,
    /// Display name. Defaults to the identifier.
    pub name: String,
    /// Organizational rank.
    pub rank: Rank,
    /// Affiliation labels (lab, team). May be empty.
    pub affiliations: Vec<String>,
}

impl Participant {
    /// Creates a participant with no affiliations.
    pub fn new(id: impl Into<String>, rank: Rank) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            rank,
            affiliations: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds an affiliation label. Duplicate labels are ignored.
    pub fn with_affiliation(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !self.affiliations.contains(&label) {
            self.affiliations.push(label);
        }
        self
    }

    /// Adds several affiliation labels.
    pub fn with_affiliations<I, S>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels
            .into_iter()
            .fold(self, |p, label| p.with_affiliation(label))
    }

    /// Number of affiliation labels shared with `other`.
    pub fn shared_affiliations(&self, other: &Participant) -> usize {
        self.affiliations
            .iter()
            .filter(|a| other.affiliations.contains(a))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order() {
        assert!(Rank::Faculty < Rank::Doctoral);
        assert!(Rank::Master < Rank::Bachelor);
        assert_eq!(Rank::ALL.len(), Rank::COUNT);
        for (i, r) in Rank::ALL.iter().enumerate() {
            assert_eq!(r.index(), i);
        }
    }

    #[test]
    fn test_rank_counts() {
        let counts = RankCounts::from_pairs([
            (Rank::Faculty, 2),
            (Rank::Master, 3),
            (Rank::Faculty, 1),
        ]);
        assert_eq!(counts[Rank::Faculty], 3);
        assert_eq!(counts[Rank::Doctoral], 0);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_participant_builder() {
        let p = Participant::new("p1", Rank::Master)
            .with_name("Alice")
            .with_affiliations(["LabA", "LabB", "LabA"]);
        assert_eq!(p.id, "p1");
        assert_eq!(p.name, "Alice");
        assert_eq!(p.affiliations, vec!["LabA".to_string(), "LabB".to_string()]);
    }

    #[test]
    fn test_shared_affiliations() {
        let a = Participant::new("a", Rank::Master).with_affiliations(["X", "Y"]);
        let b = Participant::new("b", Rank::Master).with_affiliations(["Y", "Z"]);
        let c = Participant::new("c", Rank::Master);
        assert_eq!(a.shared_affiliations(&b), 1);
        assert_eq!(a.shared_affiliations(&c), 0);
    }

    #[test]
    fn test_rank_serde() {
        let json = serde_json::to_string(&Rank::Doctoral).unwrap();
        assert_eq!(json, "\"Doctoral\"");
        let back: Rank = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rank::Doctoral);
    }
}
