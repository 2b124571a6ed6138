//! Property-based tests for u-group
//!
//! Uses proptest to verify assignment invariants over generated rosters.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use u_group::evaluation::CooccurrenceMatrix;
use u_group::ga::{GaConfig, GaRunner, GroupingGaProblem};
use u_group::heuristic::{HeuristicConstructor, LocalSearchRefiner};
use u_group::models::{Assignment, Participant, Rank, Session};
use u_group::quota::QuotaPlan;
use u_group::Roster;

/// Participants with the given rank and lab indices.
fn participants(specs: &[(usize, usize)]) -> Vec<Participant> {
    specs
        .iter()
        .enumerate()
        .map(|(i, &(rank, lab))| {
            Participant::new(format!("p{i}"), Rank::ALL[rank]).with_affiliation(format!("lab{lab}"))
        })
        .collect()
}

/// Feasible sessions: balanced bounds with optional slack.
fn sessions(n: usize, shapes: &[(usize, usize)]) -> Vec<Session> {
    shapes
        .iter()
        .map(|&(g, slack)| {
            let g = g.clamp(1, n);
            let min = (n / g).saturating_sub(slack);
            let max = n.div_ceil(g) + slack;
            Session::new(g, min, max)
        })
        .collect()
}

fn roster_strategy() -> impl Strategy<Value = Roster> {
    (4usize..24)
        .prop_flat_map(|n| {
            (
                prop::collection::vec((0usize..4, 0usize..4), n),
                prop::collection::vec((1usize..6, 0usize..2), 1..5),
            )
        })
        .prop_map(|(specs, shapes)| {
            let n = specs.len();
            Roster::new(participants(&specs), sessions(n, &shapes)).unwrap()
        })
}

fn assert_valid(roster: &Roster, a: &Assignment) -> Result<(), TestCaseError> {
    prop_assert!(a.is_complete(roster.participant_count()));
    for s in 0..roster.session_count() {
        let plan = roster.quota(s);
        let session = roster.session(s);
        prop_assert_eq!(a.groups(s).len(), session.group_count);
        for (g, members) in a.groups(s).iter().enumerate() {
            prop_assert!(session.size_ok(members.len()));
            prop_assert_eq!(&roster.rank_counts(members), plan.group(g));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // ==================== Quota Properties ====================

    #[test]
    fn quota_sums_match_rank_totals(roster in roster_strategy()) {
        for s in 0..roster.session_count() {
            let plan = roster.quota(s);
            for rank in Rank::ALL {
                let sum: usize = plan.rank_column(rank).iter().sum();
                prop_assert_eq!(sum, roster.rank_totals()[rank]);
            }
            for g in 0..plan.group_count() {
                prop_assert!(roster.session(s).size_ok(plan.group_target(g)));
            }
        }
    }

    #[test]
    fn zigzag_even_split_differs_by_at_most_one(g in 1usize..6, per in 1usize..5, k in 1usize..4) {
        // k ranks, each with a multiple of g participants.
        let mut totals = u_group::models::RankCounts::zero();
        for rank in Rank::ALL.iter().take(k) {
            totals[*rank] = g * per;
        }
        let n = totals.total();
        let session = Session::new(g, n / g, n.div_ceil(g));
        let plan = QuotaPlan::zigzag(0, &session, totals).unwrap();
        for rank in Rank::ALL {
            let column = plan.rank_column(rank);
            let max = column.iter().copied().max().unwrap_or(0);
            let min = column.iter().copied().min().unwrap_or(0);
            prop_assert!(max - min <= 1);
        }
    }

    // ==================== Constructor Properties ====================

    #[test]
    fn heuristic_assignment_valid(roster in roster_strategy()) {
        let a = HeuristicConstructor::new().construct(&roster);
        assert_valid(&roster, &a)?;
    }

    #[test]
    fn heuristic_deterministic(roster in roster_strategy(), seed in any::<u64>()) {
        let c = HeuristicConstructor::new();
        prop_assert_eq!(c.construct(&roster), c.construct(&roster));
        prop_assert_eq!(
            c.construct_shuffled(&roster, &mut SmallRng::seed_from_u64(seed)),
            c.construct_shuffled(&roster, &mut SmallRng::seed_from_u64(seed))
        );
    }

    // ==================== Local Search Properties ====================

    #[test]
    fn local_search_valid_and_not_worse(roster in roster_strategy()) {
        let refiner = LocalSearchRefiner::default();
        let mut a = HeuristicConstructor::new().construct(&roster);
        let before = refiner.objective(&roster, &a);
        let stats = refiner.refine(&roster, &mut a);

        assert_valid(&roster, &a)?;
        let after = refiner.objective(&roster, &a);
        prop_assert!(after <= before + 1e-9);
        prop_assert!((after - stats.final_objective).abs() < 1e-6);
    }

    // ==================== Matrix Properties ====================

    #[test]
    fn cooccurrence_symmetric(roster in roster_strategy(), seed in any::<u64>()) {
        let a = HeuristicConstructor::new()
            .construct_shuffled(&roster, &mut SmallRng::seed_from_u64(seed));
        let m = CooccurrenceMatrix::from_assignment(&a, roster.participant_count());
        prop_assert!(m.is_symmetric());
        for p in 0..roster.participant_count() {
            prop_assert_eq!(m.count(p, p), 0);
        }
    }

    // ==================== GA Properties ====================

    #[test]
    fn ga_valid_monotone_and_seeded(roster in roster_strategy(), seed in 0u64..1000) {
        let problem = GroupingGaProblem::new(&roster);
        let config = GaConfig::default()
            .with_population_size(8)
            .with_max_generations(5)
            .with_seed(seed)
            .with_parallel(false);

        let r1 = GaRunner::run(&problem, &config);
        let r2 = GaRunner::run(&problem, &config);

        assert_valid(&roster, &r1.best.assignment)?;
        prop_assert!(r1.history.windows(2).all(|w| w[1] <= w[0]));
        prop_assert_eq!(&r1.best.assignment, &r2.best.assignment);
    }
}
