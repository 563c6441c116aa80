//! Mix-weighted margin evaluator
//!
//! Produces the financial comparison the desk sees side by side: the
//! incumbent's card versus the proposed card, both weighted by the merchant's
//! volume mix and costed with the operator's own cost structure (the
//! competitor's actual costs are unknown, so the comparison holds costs
//! constant and varies only the rates).
//!
//! # Critical Invariants
//!
//! 1. Weighted averages normalize by total mix weight, so mixes that do not
//!    sum to exactly 100 still evaluate correctly
//! 2. A zero-weight mix (or zero TPV) degrades to all-zero metrics; the desk
//!    view must render, never crash, on an unconfigured mix
//! 3. Both sides use the same per-bucket cost and the same competitor
//!    estimates as the proposal calculator

use serde::{Deserialize, Serialize};

use crate::models::bucket::{buckets_for, BucketTable};
use crate::models::competitor::CompetitorRates;
use crate::models::cost::{CostConfig, PlanType};

/// Weighted financial metrics for one rate card
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideMetrics {
    /// Mix-weighted average rate (%)
    pub weighted_rate: f64,

    /// Mix-weighted average operating cost (%)
    pub weighted_cost: f64,

    /// Gross take-rate over the TPV (currency)
    pub take_rate_value: f64,

    /// Take-rate minus cost (currency)
    pub spread_value: f64,

    /// Spread as a percentage of TPV
    pub spread_percent: f64,

    /// MCF2: spread net of tax charged on the gross take-rate (currency)
    pub margin_value: f64,
}

/// Side-by-side comparison of the incumbent and the proposal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginComparison {
    /// Metrics under the competitor's rate card
    pub competitor: SideMetrics,

    /// Metrics under the proposed rate card
    pub proposed: SideMetrics,
}

/// Evaluate both rate cards against the merchant's mix and TPV
///
/// For each side: `weighted_rate` is the mix-normalized average of the
/// per-bucket rates; `take_rate_value = tpv * weighted_rate / 100`;
/// `spread_value` subtracts the identically-weighted cost;
/// `margin_value` (MCF2) further subtracts `take_rate_value * tax_rate / 100`
/// (tax is charged on the gross take-rate, not on the spread). The tax rate
/// comes from the cost table.
///
/// # Example
/// ```
/// use rate_negotiation_core_rs::{
///     evaluate, BucketTable, CompetitorRates, CostConfig, PlanType, RateBucket,
/// };
///
/// let costs = CostConfig { debit_cost: 1.5, tax_rate: 10.0, ..CostConfig::default() };
/// let competitor = CompetitorRates::new(2.0, 3.0, 4.0);
///
/// let mut rates = BucketTable::new();
/// rates.set(RateBucket::Debit, 2.5);
/// let mut mix = BucketTable::new();
/// mix.set(RateBucket::Debit, 100.0);
///
/// let comparison = evaluate(&rates, &mix, &costs, &competitor, PlanType::Full, 10_000.0);
/// assert!((comparison.proposed.take_rate_value - 250.0).abs() < 1e-9);
/// assert!((comparison.proposed.spread_value - 100.0).abs() < 1e-9);
/// // MCF2: 100 - 250 * 10%
/// assert!((comparison.proposed.margin_value - 75.0).abs() < 1e-9);
/// ```
pub fn evaluate(
    proposed_rates: &BucketTable,
    mix: &BucketTable,
    cost: &CostConfig,
    competitor: &CompetitorRates,
    plan: PlanType,
    tpv: f64,
) -> MarginComparison {
    let competitor_rates: BucketTable = buckets_for(plan)
        .into_iter()
        .map(|bucket| (bucket, competitor.estimate(bucket)))
        .collect();

    MarginComparison {
        competitor: evaluate_side(&competitor_rates, mix, cost, plan, tpv),
        proposed: evaluate_side(proposed_rates, mix, cost, plan, tpv),
    }
}

/// Evaluate a single rate card
fn evaluate_side(
    rates: &BucketTable,
    mix: &BucketTable,
    cost: &CostConfig,
    plan: PlanType,
    tpv: f64,
) -> SideMetrics {
    let total_weight: f64 = buckets_for(plan)
        .iter()
        .map(|bucket| mix.value(*bucket))
        .sum();
    if total_weight <= 0.0 {
        // Unconfigured mix: zero metrics, never a division by zero
        return SideMetrics::default();
    }

    let mut weighted_rate = 0.0;
    let mut weighted_cost = 0.0;
    for bucket in buckets_for(plan) {
        let weight = mix.value(bucket) / total_weight;
        weighted_rate += rates.value(bucket) * weight;
        weighted_cost += cost.bucket_cost(bucket, plan) * weight;
    }

    let take_rate_value = tpv * weighted_rate / 100.0;
    let spread_value = take_rate_value - tpv * weighted_cost / 100.0;
    let spread_percent = if tpv > 0.0 {
        spread_value / tpv * 100.0
    } else {
        0.0
    };
    let margin_value = spread_value - take_rate_value * cost.tax_rate / 100.0;

    SideMetrics {
        weighted_rate,
        weighted_cost,
        take_rate_value,
        spread_value,
        spread_percent,
        margin_value,
    }
}
