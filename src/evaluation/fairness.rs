//! Fairness statistics of a finished assignment.
//!
//! Computes how evenly participants meet new people across all sessions.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Distinct partners | Others a participant shared a group with at least once |
//! | Total partners | Co-placements, repeats included |
//! | Duplicate partners | Others met more than once |
//! | Repeated pairs | Pairs that shared a group more than once |
//! | Avg repeat per person | Mean of Σ (count − 1) over partners met more than once |
//! | Theoretical min avg repeat | Lower bound of the above for the session shapes |

use serde::Serialize;

use super::CooccurrenceMatrix;
use crate::models::Assignment;
use crate::roster::Roster;

/// Mean, variance and range of a set of distinct-partner counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartnerSpread {
    /// Arithmetic mean.
    pub mean: f64,
    /// Population variance.
    pub variance: f64,
    /// Smallest count.
    pub min: usize,
    /// Largest count.
    pub max: usize,
}

impl PartnerSpread {
    /// Summarizes `counts`. Empty input yields all zeros.
    pub fn from_counts(counts: &[usize]) -> Self {
        if counts.is_empty() {
            return Self {
                mean: 0.0,
                variance: 0.0,
                min: 0,
                max: 0,
            };
        }
        let len = counts.len() as f64;
        let mean = counts.iter().sum::<usize>() as f64 / len;
        let variance = counts
            .iter()
            .map(|&c| {
                let d = c as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / len;
        Self {
            mean,
            variance,
            min: counts.iter().copied().min().unwrap_or(0),
            max: counts.iter().copied().max().unwrap_or(0),
        }
    }

    /// `max − min`.
    #[inline]
    pub fn range(&self) -> usize {
        self.max - self.min
    }
}

/// Partner statistics of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnerStats {
    /// Participant ID.
    pub participant_id: String,
    /// Others met at least once.
    pub distinct_partners: usize,
    /// Co-placements, repeats included.
    pub total_partners: usize,
    /// Others met more than once.
    pub duplicate_partners: usize,
    /// Σ (count − 1) over others met more than once.
    pub repeats: usize,
}

/// Post-hoc fairness report of an assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FairnessReport {
    /// Per-participant statistics, in roster order.
    pub partners: Vec<PartnerStats>,
    /// Spread of distinct-partner counts.
    pub spread: PartnerSpread,
    /// Mean repeats per participant.
    pub avg_repeat_per_person: f64,
    /// Lower bound of `avg_repeat_per_person` for these session shapes.
    pub theoretical_min_avg_repeat: f64,
    /// Pairs that shared a group more than once.
    pub repeated_pairs: usize,
    /// Most co-placed pair as `(id, id, count)`.
    pub most_repeated_pair: Option<(String, String, u32)>,
    /// Mean co-placement count over all unordered pairs.
    pub mean_pair_cooccurrence: f64,
}

impl FairnessReport {
    /// Computes the report for `assignment` over `roster`.
    pub fn calculate(roster: &Roster, assignment: &Assignment) -> Self {
        let matrix = CooccurrenceMatrix::from_assignment(assignment, roster.participant_count());
        Self::from_matrix(roster, &matrix)
    }

    /// Computes the report from an already built matrix.
    pub fn from_matrix(roster: &Roster, matrix: &CooccurrenceMatrix) -> Self {
        let partners: Vec<PartnerStats> = roster
            .participants()
            .iter()
            .enumerate()
            .map(|(i, p)| PartnerStats {
                participant_id: p.id.clone(),
                distinct_partners: matrix.distinct_partners(i),
                total_partners: matrix.total_partners(i),
                duplicate_partners: matrix.duplicate_partners(i),
                repeats: matrix.repeat_count(i),
            })
            .collect();

        let distinct: Vec<usize> = partners.iter().map(|s| s.distinct_partners).collect();
        let spread = PartnerSpread::from_counts(&distinct);

        let avg_repeat_per_person = if partners.is_empty() {
            0.0
        } else {
            partners.iter().map(|s| s.repeats).sum::<usize>() as f64 / partners.len() as f64
        };

        let most_repeated_pair = matrix.most_repeated_pair().map(|(a, b, c)| {
            (
                roster.participant(a).id.clone(),
                roster.participant(b).id.clone(),
                c,
            )
        });

        Self {
            partners,
            spread,
            avg_repeat_per_person,
            theoretical_min_avg_repeat: theoretical_min_avg_repeat(roster),
            repeated_pairs: matrix.pairs_over(1),
            most_repeated_pair,
            mean_pair_cooccurrence: matrix.mean_pair_count(),
        }
    }

    /// Distinct-partner count per participant, in roster order.
    pub fn distinct_partner_counts(&self) -> Vec<usize> {
        self.partners.iter().map(|s| s.distinct_partners).collect()
    }
}

/// Lower bound on the mean repeats per participant.
///
/// Balanced groups minimize the pairs formed per session: with
/// `q, r = N divmod G`, a session forms `Q_s = (G − r)·C(q,2) + r·C(q+1,2)`
/// pairs. Each participant can meet at most `N − 1` distinct others, so
/// `max(0, 2·ΣQ_s / N − (N − 1))` repeats per person are unavoidable.
pub fn theoretical_min_avg_repeat(roster: &Roster) -> f64 {
    let n = roster.participant_count();
    if n <= 1 {
        return 0.0;
    }
    let comb2 = |k: usize| k * k.saturating_sub(1) / 2;
    let pairs: usize = roster
        .sessions()
        .iter()
        .filter(|s| s.group_count > 0)
        .map(|s| {
            let (q, r) = (n / s.group_count, n % s.group_count);
            (s.group_count - r) * comb2(q) + r * comb2(q + 1)
        })
        .sum();
    let bound = 2.0 * pairs as f64 / n as f64 - (n - 1) as f64;
    bound.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Participant, Rank, Session};

    fn roster(n: usize, sessions: Vec<Session>) -> Roster {
        let ps = (0..n)
            .map(|i| Participant::new(format!("p{i}"), Rank::Master))
            .collect();
        Roster::new(ps, sessions).unwrap()
    }

    #[test]
    fn test_spread() {
        let s = PartnerSpread::from_counts(&[2, 2, 4, 2, 2]);
        assert!((s.mean - 2.4).abs() < 1e-10);
        // deviations: -0.4 x4, 1.6 -> (0.64 + 2.56) / 5
        assert!((s.variance - 0.64).abs() < 1e-10);
        assert_eq!(s.range(), 2);

        let empty = PartnerSpread::from_counts(&[]);
        assert_eq!(empty.mean, 0.0);
        assert_eq!(empty.range(), 0);
    }

    #[test]
    fn test_report() {
        let r = roster(5, vec![Session::new(2, 2, 3), Session::new(2, 2, 3)]);
        let asg = Assignment::new(vec![
            vec![vec![0, 1, 2], vec![3, 4]],
            vec![vec![0, 1], vec![2, 3, 4]],
        ]);
        let report = FairnessReport::calculate(&r, &asg);

        assert_eq!(report.distinct_partner_counts(), vec![2, 2, 4, 2, 2]);
        assert_eq!(report.partners[0].participant_id, "p0");
        assert_eq!(report.partners[0].duplicate_partners, 1);
        assert_eq!(report.partners[2].total_partners, 4);
        // repeats: p0 1, p1 1, p3 1, p4 1 -> 4 / 5
        assert!((report.avg_repeat_per_person - 0.8).abs() < 1e-10);
        // (p0, p1) and (p3, p4) met twice.
        assert_eq!(report.repeated_pairs, 2);
        assert_eq!(
            report.most_repeated_pair,
            Some(("p0".to_string(), "p1".to_string(), 2))
        );
        assert!((report.spread.variance - 0.64).abs() < 1e-10);
    }

    #[test]
    fn test_theoretical_min() {
        // N=4, two sessions of 2 groups: 2 pairs each -> 2*4/4 - 3 < 0.
        let r = roster(4, vec![Session::new(2, 2, 2), Session::new(2, 2, 2)]);
        assert_eq!(theoretical_min_avg_repeat(&r), 0.0);

        // N=4, four sessions of one group: 6 pairs each -> 2*24/4 - 3 = 9.
        let r = roster(4, vec![Session::new(1, 4, 4); 4]);
        assert!((theoretical_min_avg_repeat(&r) - 9.0).abs() < 1e-10);
    }

    #[test]
    fn test_report_serializes() {
        let r = roster(2, vec![Session::new(1, 2, 2)]);
        let asg = Assignment::new(vec![vec![vec![0, 1]]]);
        let json = serde_json::to_value(FairnessReport::calculate(&r, &asg)).unwrap();
        assert_eq!(json["partners"][1]["distinct_partners"], 1);
        assert_eq!(json["spread"]["max"], 1);
    }
}
