//! Competitor rate model
//!
//! The incumbent acquirer's rate card as captured by the sales rep. Only
//! three reference points are observed (`debit`, `credit_1x`, `credit_12x`);
//! every other bucket is derived:
//! - Full plan intermediates interpolate linearly between `1x` and `12x`
//! - Simples ranges use fixed additive offsets from the reference points
//!
//! # Critical Invariants
//!
//! 1. `estimate(Credit(1)) == credit_1x` and `estimate(Credit(12)) == credit_12x`
//!    exactly (the interpolation anchors reproduce the inputs)
//! 2. The same estimate feeds both the proposal calculator and the margin
//!    evaluator; the two components must never price a bucket differently

use serde::{Deserialize, Serialize};

use crate::models::bucket::RateBucket;

/// Additive offset over `credit_1x` for the Simples `2x-6x` range (%)
pub const SIMPLES_2_6_OFFSET: f64 = 2.5;

/// Additive offset over `credit_12x` for the Simples `13x-18x` range (%)
///
/// The incumbent publishes no long-tail rate; the desk estimates it 4 points
/// above the 12x reference.
pub const SIMPLES_13_18_OFFSET: f64 = 4.0;

/// Observed competitor rate card (three reference points, all %)
///
/// # Example
/// ```
/// use rate_negotiation_core_rs::{CompetitorRates, RateBucket};
///
/// let rates = CompetitorRates::new(2.01, 3.5, 4.6);
/// assert_eq!(rates.estimate(RateBucket::Debit), 2.01);
/// assert_eq!(rates.estimate(RateBucket::Credit(12)), 4.6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorRates {
    /// Debit rate (%)
    pub debit: f64,

    /// Sight credit rate (%)
    pub credit_1x: f64,

    /// 12-installment credit rate (%)
    pub credit_12x: f64,
}

impl CompetitorRates {
    /// Create a rate card from the three observed reference points
    pub fn new(debit: f64, credit_1x: f64, credit_12x: f64) -> Self {
        Self {
            debit,
            credit_1x,
            credit_12x,
        }
    }

    /// Whether all reference points satisfy the sign convention (>= 0)
    pub fn is_valid(&self) -> bool {
        self.debit >= 0.0 && self.credit_1x >= 0.0 && self.credit_12x >= 0.0
    }

    /// Estimated competitor rate for a bucket (%)
    ///
    /// Reference buckets return the stored value. Full-plan intermediates
    /// interpolate linearly:
    /// `credit_1x + ((credit_12x - credit_1x) / 11) * (n - 1)`.
    /// Simples ranges are offset estimates: `2x-6x` = `credit_1x` + 2.5,
    /// `7x-12x` = `credit_12x`, `13x-18x` = `credit_12x` + 4.
    ///
    /// # Example
    /// ```
    /// use rate_negotiation_core_rs::{CompetitorRates, RateBucket};
    ///
    /// let rates = CompetitorRates::new(2.0, 3.0, 5.2);
    /// // Midpoint installment sits on the line between the anchors
    /// let mid = rates.estimate(RateBucket::Credit(6));
    /// assert!((mid - 4.0).abs() < 1e-9);
    /// ```
    pub fn estimate(&self, bucket: RateBucket) -> f64 {
        match bucket {
            RateBucket::Debit => self.debit,
            RateBucket::Credit(1) => self.credit_1x,
            // Anchors return the stored values exactly; (x / 11) * 11 is not
            // guaranteed to round-trip in floating point
            RateBucket::Credit(12) => self.credit_12x,
            RateBucket::Credit(n) => {
                let step = (self.credit_12x - self.credit_1x) / 11.0;
                self.credit_1x + step * (f64::from(n) - 1.0)
            }
            RateBucket::Range2to6 => self.credit_1x + SIMPLES_2_6_OFFSET,
            RateBucket::Range7to12 => self.credit_12x,
            RateBucket::Range13to18 => self.credit_12x + SIMPLES_13_18_OFFSET,
        }
    }
}
