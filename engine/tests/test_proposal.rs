//! Integration tests for the rate proposal calculator
//!
//! Tests cover:
//! - Floor-vs-match policy in both approval tiers
//! - Interpolation anchors reproducing the competitor inputs
//! - Simples-plan offset estimates
//! - Rounding and negative-spread overrides

use rate_negotiation_core_rs::{
    compute_proposal, ApprovalTier, CompetitorRates, CostConfig, PlanType, RateBucket,
};

fn desk_costs() -> CostConfig {
    CostConfig {
        debit_cost: 1.5,
        credit_sight_cost: 2.0,
        anticipation_cost: 0.3,
        installment_2_6_cost: 2.3,
        installment_7_12_cost: 2.6,
        installment_13_18_cost: 2.9,
        fixed_cost_per_tx: 0.1,
        tax_rate: 11.25,
    }
}

#[test]
fn test_floor_beats_cheap_competitor() {
    // bucketCost = 1.5 + 0.1 = 1.6; floor = 1.6 + 0.85 = 2.45.
    // The competitor's 2.01 debit quote is below the floor, so the floor wins.
    let costs = CostConfig {
        debit_cost: 1.5,
        fixed_cost_per_tx: 0.1,
        ..CostConfig::default()
    };
    let competitor = CompetitorRates::new(2.01, 3.5, 4.6);

    let proposal = compute_proposal(&costs, &competitor, PlanType::Full, 0.85);

    assert_eq!(proposal.tier, ApprovalTier::Automatic);
    assert_eq!(proposal.rates.value(RateBucket::Debit), 2.45);
}

#[test]
fn test_undercut_tier_ignores_competitor() {
    // Same inputs, spread 0.5: Alçada 2, rate = 1.6 + 0.5 = 2.10 regardless
    // of the competitor's 2.01 figure.
    let costs = CostConfig {
        debit_cost: 1.5,
        fixed_cost_per_tx: 0.1,
        ..CostConfig::default()
    };
    let competitor = CompetitorRates::new(2.01, 3.5, 4.6);

    let proposal = compute_proposal(&costs, &competitor, PlanType::Full, 0.5);

    assert_eq!(proposal.tier, ApprovalTier::Managerial);
    assert!((proposal.rates.value(RateBucket::Debit) - 2.10).abs() < 1e-9);
}

#[test]
fn test_match_when_competitor_clears_floor() {
    let costs = desk_costs();
    // High competitor card: every estimate clears cost + 0.65
    let competitor = CompetitorRates::new(9.0, 10.0, 14.0);

    let proposal = compute_proposal(&costs, &competitor, PlanType::Full, 0.65);

    assert_eq!(proposal.rates.value(RateBucket::Debit), 9.0);
    assert_eq!(proposal.rates.value(RateBucket::Credit(1)), 10.0);
    assert_eq!(proposal.rates.value(RateBucket::Credit(12)), 14.0);
}

#[test]
fn test_interpolation_anchors_round_trip() {
    // When the competitor wins everywhere, the 1x and 12x buckets must
    // reproduce the stored inputs exactly (sanity check of the formula:
    // value at n=1 is credit1x, value at n=12 is credit12x).
    let costs = CostConfig::default();
    let competitor = CompetitorRates::new(9.0, 10.0, 14.0);

    let proposal = compute_proposal(&costs, &competitor, PlanType::Full, 0.65);

    assert_eq!(proposal.rates.value(RateBucket::Credit(1)), 10.0);
    assert_eq!(proposal.rates.value(RateBucket::Credit(12)), 14.0);

    // Interior buckets sit on the straight line between the anchors
    for n in 2..=11u8 {
        let expected = 10.0 + (14.0 - 10.0) / 11.0 * (f64::from(n) - 1.0);
        let actual = proposal.rates.value(RateBucket::Credit(n));
        assert!(
            (actual - expected).abs() <= 0.005,
            "bucket {}x: expected ~{}, got {}",
            n,
            expected,
            actual
        );
    }
}

#[test]
fn test_simples_plan_offsets() {
    let costs = CostConfig::default();
    let competitor = CompetitorRates::new(9.0, 10.0, 14.0);

    let proposal = compute_proposal(&costs, &competitor, PlanType::Simples, 0.65);

    assert_eq!(proposal.rates.len(), 5);
    assert_eq!(proposal.rates.value(RateBucket::Range2to6), 12.5); // 1x + 2.5
    assert_eq!(proposal.rates.value(RateBucket::Range7to12), 14.0); // 12x
    assert_eq!(proposal.rates.value(RateBucket::Range13to18), 18.0); // 12x + 4
}

#[test]
fn test_simples_plan_carries_no_funding_cost() {
    let costs = desk_costs();
    let competitor = CompetitorRates::new(0.0, 0.0, 0.0);

    // Managerial tier quotes exactly cost + spread, exposing the cost model
    let proposal = compute_proposal(&costs, &competitor, PlanType::Simples, 0.5);

    // 2x-6x: 2.3 MDR + 0.1 fixed + 0.5 spread, no anticipation term
    assert!((proposal.rates.value(RateBucket::Range2to6) - 2.9).abs() < 1e-9);
}

#[test]
fn test_full_plan_funding_grows_with_installments() {
    let costs = desk_costs();
    let competitor = CompetitorRates::new(0.0, 0.0, 0.0);

    let proposal = compute_proposal(&costs, &competitor, PlanType::Full, 0.5);

    // Longer installments carry more anticipation cost, so floors rise
    // within each MDR tier.
    let r2 = proposal.rates.value(RateBucket::Credit(2));
    let r6 = proposal.rates.value(RateBucket::Credit(6));
    let r7 = proposal.rates.value(RateBucket::Credit(7));
    let r12 = proposal.rates.value(RateBucket::Credit(12));
    assert!(r2 < r6, "2x {} should be below 6x {}", r2, r6);
    assert!(r7 < r12, "7x {} should be below 12x {}", r7, r12);
}

#[test]
fn test_negative_spread_prices_below_cost() {
    let costs = CostConfig {
        debit_cost: 1.5,
        fixed_cost_per_tx: 0.1,
        ..CostConfig::default()
    };
    let competitor = CompetitorRates::new(2.01, 3.5, 4.6);

    let proposal = compute_proposal(&costs, &competitor, PlanType::Full, -0.4);

    assert_eq!(proposal.tier, ApprovalTier::Managerial);
    assert!((proposal.rates.value(RateBucket::Debit) - 1.2).abs() < 1e-9);
}

#[test]
fn test_threshold_spread_is_automatic() {
    let costs = desk_costs();
    let competitor = CompetitorRates::new(2.01, 3.5, 4.6);

    assert_eq!(
        compute_proposal(&costs, &competitor, PlanType::Full, 0.65).tier,
        ApprovalTier::Automatic
    );
    assert_eq!(
        compute_proposal(&costs, &competitor, PlanType::Full, 0.6499).tier,
        ApprovalTier::Managerial
    );
}
