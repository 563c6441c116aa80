//! Property tests for the proposal calculator and evaluator
//!
//! The floor-vs-match policy and the weighted evaluator have simple algebraic
//! contracts that must hold for arbitrary inputs, not just the desk's usual
//! numbers. Rates are rounded to 2 decimals, so floor comparisons allow half
//! a cent of rounding slack.

use proptest::prelude::*;
use rate_negotiation_core_rs::{
    buckets_for, compute_proposal, evaluate, ApprovalTier, BucketTable, CompetitorRates,
    CostConfig, PlanType,
};

/// Half a cent of rounding slack plus float noise
const ROUNDING_SLACK: f64 = 0.005 + 1e-9;

fn arb_costs() -> impl Strategy<Value = CostConfig> {
    (
        0.0..5.0f64,
        0.0..5.0f64,
        0.0..1.0f64,
        0.0..5.0f64,
        0.0..5.0f64,
        0.0..5.0f64,
        0.0..0.5f64,
        0.0..20.0f64,
    )
        .prop_map(
            |(debit, sight, anticipation, inst26, inst712, inst1318, fixed, tax)| CostConfig {
                debit_cost: debit,
                credit_sight_cost: sight,
                anticipation_cost: anticipation,
                installment_2_6_cost: inst26,
                installment_7_12_cost: inst712,
                installment_13_18_cost: inst1318,
                fixed_cost_per_tx: fixed,
                tax_rate: tax,
            },
        )
}

fn arb_competitor() -> impl Strategy<Value = CompetitorRates> {
    (0.0..10.0f64, 0.0..10.0f64, 0.0..15.0f64)
        .prop_map(|(debit, c1, c12)| CompetitorRates::new(debit, c1, c12))
}

fn arb_plan() -> impl Strategy<Value = PlanType> {
    prop_oneof![Just(PlanType::Full), Just(PlanType::Simples)]
}

proptest! {
    /// Alçada 1: the floor is never violated, for any bucket
    #[test]
    fn automatic_tier_never_breaks_the_floor(
        costs in arb_costs(),
        competitor in arb_competitor(),
        plan in arb_plan(),
        spread in 0.65..5.0f64,
    ) {
        let proposal = compute_proposal(&costs, &competitor, plan, spread);
        prop_assert_eq!(proposal.tier, ApprovalTier::Automatic);

        for (bucket, rate) in proposal.rates.iter() {
            let floor = costs.bucket_cost(bucket, plan) + spread;
            prop_assert!(
                rate >= floor - ROUNDING_SLACK,
                "bucket {} rate {} below floor {}",
                bucket, rate, floor
            );
        }
    }

    /// Alçada 1: the competitor is matched whenever matching clears the floor
    #[test]
    fn automatic_tier_matches_clearing_competitor(
        costs in arb_costs(),
        competitor in arb_competitor(),
        plan in arb_plan(),
        spread in 0.65..5.0f64,
    ) {
        let proposal = compute_proposal(&costs, &competitor, plan, spread);

        for (bucket, rate) in proposal.rates.iter() {
            let floor = costs.bucket_cost(bucket, plan) + spread;
            let estimate = competitor.estimate(bucket);
            if estimate > floor {
                prop_assert!(
                    (rate - estimate).abs() <= ROUNDING_SLACK,
                    "bucket {}: estimate {} clears floor {} but rate is {}",
                    bucket, estimate, floor, rate
                );
            }
        }
    }

    /// Alçada 2: rate is exactly cost + spread, competitor ignored
    #[test]
    fn managerial_tier_is_exactly_cost_plus_spread(
        costs in arb_costs(),
        competitor in arb_competitor(),
        plan in arb_plan(),
        spread in -2.0..0.65f64,
    ) {
        let proposal = compute_proposal(&costs, &competitor, plan, spread);
        prop_assert_eq!(proposal.tier, ApprovalTier::Managerial);

        for (bucket, rate) in proposal.rates.iter() {
            let floor = costs.bucket_cost(bucket, plan) + spread;
            prop_assert!(
                (rate - floor).abs() <= ROUNDING_SLACK,
                "bucket {}: rate {} differs from floor {}",
                bucket, rate, floor
            );
        }
    }

    /// Weighted rate always lies within the range of the per-bucket rates
    #[test]
    fn weighted_rate_is_bounded_by_extremes(
        costs in arb_costs(),
        competitor in arb_competitor(),
        plan in arb_plan(),
        spread in 0.0..3.0f64,
        weights in proptest::collection::vec(0.0..50.0f64, 13),
        tpv in 1.0..1_000_000.0f64,
    ) {
        let proposal = compute_proposal(&costs, &competitor, plan, spread);
        let buckets = buckets_for(plan);
        let mix: BucketTable = buckets
            .iter()
            .zip(weights)
            .map(|(bucket, weight)| (*bucket, weight))
            .collect();

        let comparison = evaluate(&proposal.rates, &mix, &costs, &competitor, plan, tpv);

        let rates: Vec<f64> = proposal.rates.iter().map(|(_, rate)| rate).collect();
        let min = rates.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = rates.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        if mix.total() > 0.0 {
            prop_assert!(comparison.proposed.weighted_rate >= min - 1e-9);
            prop_assert!(comparison.proposed.weighted_rate <= max + 1e-9);
        } else {
            prop_assert_eq!(comparison.proposed.weighted_rate, 0.0);
        }
    }

    /// Spread identity: spread_percent equals weighted_rate - weighted_cost
    #[test]
    fn spread_percent_identity(
        costs in arb_costs(),
        competitor in arb_competitor(),
        plan in arb_plan(),
        spread in 0.0..3.0f64,
        tpv in 1.0..1_000_000.0f64,
    ) {
        let proposal = compute_proposal(&costs, &competitor, plan, spread);
        let mix: BucketTable = buckets_for(plan)
            .into_iter()
            .map(|bucket| (bucket, 10.0))
            .collect();

        let comparison = evaluate(&proposal.rates, &mix, &costs, &competitor, plan, tpv);
        let side = comparison.proposed;

        prop_assert!(
            (side.spread_percent - (side.weighted_rate - side.weighted_cost)).abs() < 1e-6,
            "spread% {} vs rate-cost {}",
            side.spread_percent,
            side.weighted_rate - side.weighted_cost
        );
    }
}
