//! Rate proposal calculator
//!
//! Turns the internal cost table, the competitor's card, and an operator
//! spread target into a counter-proposal rate per bucket, and classifies the
//! deal into an approval tier (Alçada).
//!
//! Per bucket: `floor = bucket_cost + target_spread`.
//! - At or above the automatic-tier spread (0.65%): match the competitor when
//!   the match still clears the floor, otherwise quote the floor (Alçada 1)
//! - Below it: quote the floor unconditionally, ignoring the competitor
//!   (aggressive undercut, Alçada 2 — managerial approval)
//!
//! # Critical Invariants
//!
//! 1. In Alçada 1, `rate >= floor` for every bucket (the floor is never
//!    violated before 2-decimal rounding)
//! 2. In Alçada 2, `rate == floor` exactly (before rounding), independent of
//!    competitor values
//! 3. Negative spread targets are legal operator overrides, never rejected

use serde::{Deserialize, Serialize};

use crate::models::bucket::{buckets_for, BucketTable, RateBucket};
use crate::models::competitor::CompetitorRates;
use crate::models::cost::{CostConfig, PlanType};

/// Spread (%) at or above which a deal is approvable without escalation
pub const AUTO_TIER_SPREAD: f64 = 0.65;

/// Default mix weight (% of TPV) seeded for the debit bucket
const DEFAULT_DEBIT_WEIGHT: f64 = 40.0;

/// Default mix weight (% of TPV) seeded for sight credit
const DEFAULT_SIGHT_WEIGHT: f64 = 30.0;

/// Approval tier (Alçada) for a deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalTier {
    /// Alçada 1: spread clears the automatic threshold; desk approves alone
    Automatic,

    /// Alçada 2: aggressive undercut; requires managerial approval
    Managerial,
}

/// Classify the approval tier for a spread target
///
/// # Example
/// ```
/// use rate_negotiation_core_rs::{classify_tier, ApprovalTier};
///
/// assert_eq!(classify_tier(0.85), ApprovalTier::Automatic);
/// assert_eq!(classify_tier(0.65), ApprovalTier::Automatic);
/// assert_eq!(classify_tier(0.64), ApprovalTier::Managerial);
/// assert_eq!(classify_tier(-0.2), ApprovalTier::Managerial);
/// ```
pub fn classify_tier(target_spread: f64) -> ApprovalTier {
    if target_spread >= AUTO_TIER_SPREAD {
        ApprovalTier::Automatic
    } else {
        ApprovalTier::Managerial
    }
}

/// A computed counter-proposal: one rate per bucket plus its tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateProposal {
    /// Proposed rate per bucket (%), rounded to 2 decimals
    pub rates: BucketTable,

    /// Approval tier implied by the spread target
    pub tier: ApprovalTier,
}

/// Compute the counter-proposal rate table
///
/// Iterates the plan's bucket set; every rate is rounded to 2 decimal
/// places. See the module docs for the floor-vs-match rule.
///
/// # Example
/// ```
/// use rate_negotiation_core_rs::{
///     compute_proposal, ApprovalTier, CompetitorRates, CostConfig, PlanType, RateBucket,
/// };
///
/// let costs = CostConfig {
///     debit_cost: 1.5,
///     fixed_cost_per_tx: 0.1,
///     ..CostConfig::default()
/// };
/// let competitor = CompetitorRates::new(2.01, 3.5, 4.6);
///
/// // Floor 1.6 + 0.85 = 2.45 beats the 2.01 competitor quote
/// let proposal = compute_proposal(&costs, &competitor, PlanType::Full, 0.85);
/// assert_eq!(proposal.tier, ApprovalTier::Automatic);
/// assert_eq!(proposal.rates.value(RateBucket::Debit), 2.45);
///
/// // Below the threshold the competitor is ignored entirely
/// let undercut = compute_proposal(&costs, &competitor, PlanType::Full, 0.5);
/// assert_eq!(undercut.tier, ApprovalTier::Managerial);
/// assert_eq!(undercut.rates.value(RateBucket::Debit), 2.10);
/// ```
pub fn compute_proposal(
    cost: &CostConfig,
    competitor: &CompetitorRates,
    plan: PlanType,
    target_spread: f64,
) -> RateProposal {
    let tier = classify_tier(target_spread);

    let rates = buckets_for(plan)
        .into_iter()
        .map(|bucket| {
            let floor = cost.bucket_cost(bucket, plan) + target_spread;
            let rate = match tier {
                ApprovalTier::Automatic => floor.max(competitor.estimate(bucket)),
                ApprovalTier::Managerial => floor,
            };
            (bucket, round2(rate))
        })
        .collect();

    RateProposal { rates, tier }
}

/// Heuristic default mix seeded on first computation
///
/// Debit 40%, sight credit 30%, remaining buckets split the residual 30%
/// evenly. The sum approximates 100%; the evaluator normalizes, so the
/// rounding residue is harmless. These weights only seed the desk view and
/// are replaced as the operator captures the merchant's real mix.
///
/// # Example
/// ```
/// use rate_negotiation_core_rs::{default_mix, PlanType};
///
/// let mix = default_mix(PlanType::Simples);
/// assert!((mix.total() - 100.0).abs() < 0.5);
/// ```
pub fn default_mix(plan: PlanType) -> BucketTable {
    let buckets = buckets_for(plan);
    let residual_buckets = (buckets.len() - 2) as f64;
    let residual_weight = (100.0 - DEFAULT_DEBIT_WEIGHT - DEFAULT_SIGHT_WEIGHT) / residual_buckets;

    buckets
        .into_iter()
        .map(|bucket| {
            let weight = match bucket {
                RateBucket::Debit => DEFAULT_DEBIT_WEIGHT,
                RateBucket::Credit(1) => DEFAULT_SIGHT_WEIGHT,
                _ => round2(residual_weight),
            };
            (bucket, weight)
        })
        .collect()
}

/// Round a percentage to 2 decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
