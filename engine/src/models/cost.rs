//! Internal cost model
//!
//! Per-plan cost table for the operator's own cost structure: interchange/MDR
//! cost by installment tier, receivables funding (anticipation) cost, a fixed
//! per-transaction cost, and the tax rate charged on gross take-rate.
//!
//! # Critical Invariants
//!
//! 1. All cost percentages are >= 0 (`validate` enforces the sign convention;
//!    no upper-bound validation — aggressive configs are an operator decision)
//! 2. A `CostConfig` is immutable for the duration of one negotiation
//!    evaluation; it is owned by the configuration collaborator
//! 3. All percentages are plain numbers (1.5 means 1.5%), never fractions or
//!    basis points; `fixed_cost_per_tx` is a currency amount

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::bucket::RateBucket;

/// Merchant plan type
///
/// Determines the bucket set and whether installment funding (anticipation)
/// cost is borne by the platform (`Full`) or not (`Simples`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    /// Platform funds installments; per-installment buckets `1x`..`12x`
    Full,

    /// Merchant carries funding; coarse installment ranges up to `13x-18x`
    Simples,
}

impl PlanType {
    /// Derive the plan type from a free-text demand description
    ///
    /// The upstream form has no structured plan field; the desk convention is
    /// that Simples demands mention "simples" somewhere in the description.
    /// Anything else defaults to Full.
    ///
    /// # Example
    /// ```
    /// use rate_negotiation_core_rs::PlanType;
    ///
    /// assert_eq!(PlanType::from_description("Plano SIMPLES - padaria"), PlanType::Simples);
    /// assert_eq!(PlanType::from_description("concorrente Stone"), PlanType::Full);
    /// ```
    pub fn from_description(description: &str) -> Self {
        if description.to_lowercase().contains("simples") {
            PlanType::Simples
        } else {
            PlanType::Full
        }
    }
}

impl Default for PlanType {
    fn default() -> Self {
        PlanType::Full
    }
}

/// Errors raised by cost-table validation
#[derive(Debug, Error, PartialEq)]
pub enum CostConfigError {
    #[error("cost field '{field}' is negative: {value}")]
    NegativeCost { field: &'static str, value: f64 },
}

/// Per-plan cost table
///
/// # Example
/// ```
/// use rate_negotiation_core_rs::{CostConfig, RateBucket, PlanType};
///
/// let costs = CostConfig {
///     debit_cost: 1.5,
///     fixed_cost_per_tx: 0.1,
///     ..CostConfig::default()
/// };
///
/// assert_eq!(costs.bucket_cost(RateBucket::Debit, PlanType::Full), 1.6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostConfig {
    /// Debit interchange/MDR cost (%)
    pub debit_cost: f64,

    /// Sight credit (1x) MDR cost (%)
    pub credit_sight_cost: f64,

    /// Receivables funding cost per month outstanding (%)
    ///
    /// Charged only on Full-plan credit buckets, scaled by the bucket's
    /// average outstanding term.
    pub anticipation_cost: f64,

    /// MDR cost for 2-6 installments (%)
    #[serde(rename = "installment2to6Cost")]
    pub installment_2_6_cost: f64,

    /// MDR cost for 7-12 installments (%)
    #[serde(rename = "installment7to12Cost")]
    pub installment_7_12_cost: f64,

    /// MDR cost for 13-18 installments (%)
    #[serde(rename = "installment13to18Cost")]
    pub installment_13_18_cost: f64,

    /// Fixed processing cost per transaction (currency)
    pub fixed_cost_per_tx: f64,

    /// Tax rate applied to gross take-rate (%)
    pub tax_rate: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            debit_cost: 0.0,
            credit_sight_cost: 0.0,
            anticipation_cost: 0.0,
            installment_2_6_cost: 0.0,
            installment_7_12_cost: 0.0,
            installment_13_18_cost: 0.0,
            fixed_cost_per_tx: 0.0,
            tax_rate: 0.0,
        }
    }
}

impl CostConfig {
    /// Check the sign convention: every cost field must be >= 0
    ///
    /// Returns the first offending field. No upper bounds are enforced.
    pub fn validate(&self) -> Result<(), CostConfigError> {
        let fields = [
            ("debit_cost", self.debit_cost),
            ("credit_sight_cost", self.credit_sight_cost),
            ("anticipation_cost", self.anticipation_cost),
            ("installment_2_6_cost", self.installment_2_6_cost),
            ("installment_7_12_cost", self.installment_7_12_cost),
            ("installment_13_18_cost", self.installment_13_18_cost),
            ("fixed_cost_per_tx", self.fixed_cost_per_tx),
            ("tax_rate", self.tax_rate),
        ];

        for (field, value) in fields {
            if value < 0.0 {
                return Err(CostConfigError::NegativeCost { field, value });
            }
        }
        Ok(())
    }

    /// Interchange/MDR cost for a bucket (%)
    pub fn mdr_cost(&self, bucket: RateBucket) -> f64 {
        match bucket {
            RateBucket::Debit => self.debit_cost,
            RateBucket::Credit(1) => self.credit_sight_cost,
            RateBucket::Credit(n) if n <= 6 => self.installment_2_6_cost,
            RateBucket::Credit(_) => self.installment_7_12_cost,
            RateBucket::Range2to6 => self.installment_2_6_cost,
            RateBucket::Range7to12 => self.installment_7_12_cost,
            RateBucket::Range13to18 => self.installment_13_18_cost,
        }
    }

    /// Total operating cost for a bucket (%)
    ///
    /// MDR cost, plus anticipation cost scaled by the bucket's average
    /// outstanding term on the Full plan (the platform funds receivables),
    /// plus the fixed per-transaction cost.
    ///
    /// # Example
    /// ```
    /// use rate_negotiation_core_rs::{CostConfig, RateBucket, PlanType};
    ///
    /// let costs = CostConfig {
    ///     credit_sight_cost: 2.0,
    ///     anticipation_cost: 0.5,
    ///     fixed_cost_per_tx: 0.1,
    ///     ..CostConfig::default()
    /// };
    ///
    /// // Full: 2.0 + 0.5 * 1.0 + 0.1
    /// assert_eq!(costs.bucket_cost(RateBucket::Credit(1), PlanType::Full), 2.6);
    /// // Simples: merchant carries funding, no anticipation term
    /// assert_eq!(costs.bucket_cost(RateBucket::Credit(1), PlanType::Simples), 2.1);
    /// ```
    pub fn bucket_cost(&self, bucket: RateBucket, plan: PlanType) -> f64 {
        let funding = match plan {
            PlanType::Full => self.anticipation_cost * bucket.average_term(),
            PlanType::Simples => 0.0,
        };
        self.mdr_cost(bucket) + funding + self.fixed_cost_per_tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> CostConfig {
        CostConfig {
            debit_cost: 1.5,
            credit_sight_cost: 2.0,
            anticipation_cost: 0.4,
            installment_2_6_cost: 2.3,
            installment_7_12_cost: 2.6,
            installment_13_18_cost: 2.9,
            fixed_cost_per_tx: 0.1,
            tax_rate: 11.25,
        }
    }

    #[test]
    fn test_validate_accepts_non_negative() {
        assert!(sample_config().validate().is_ok());
        assert!(CostConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_field() {
        let config = CostConfig {
            anticipation_cost: -0.1,
            ..sample_config()
        };
        assert_eq!(
            config.validate(),
            Err(CostConfigError::NegativeCost {
                field: "anticipation_cost",
                value: -0.1
            })
        );
    }

    #[test]
    fn test_mdr_cost_tiers() {
        let config = sample_config();
        assert_eq!(config.mdr_cost(RateBucket::Debit), 1.5);
        assert_eq!(config.mdr_cost(RateBucket::Credit(1)), 2.0);
        assert_eq!(config.mdr_cost(RateBucket::Credit(2)), 2.3);
        assert_eq!(config.mdr_cost(RateBucket::Credit(6)), 2.3);
        assert_eq!(config.mdr_cost(RateBucket::Credit(7)), 2.6);
        assert_eq!(config.mdr_cost(RateBucket::Credit(12)), 2.6);
        assert_eq!(config.mdr_cost(RateBucket::Range13to18), 2.9);
    }

    #[test]
    fn test_debit_has_no_funding_term() {
        let config = sample_config();
        assert_eq!(
            config.bucket_cost(RateBucket::Debit, PlanType::Full),
            config.bucket_cost(RateBucket::Debit, PlanType::Simples)
        );
        assert_eq!(config.bucket_cost(RateBucket::Debit, PlanType::Full), 1.6);
    }

    #[test]
    fn test_full_plan_funding_scales_with_term() {
        let config = sample_config();
        // 12x: 2.6 MDR + 0.4 * 6.5 funding + 0.1 fixed
        let cost = config.bucket_cost(RateBucket::Credit(12), PlanType::Full);
        assert!((cost - 5.3).abs() < 1e-9);
    }

    #[test]
    fn test_plan_type_from_description() {
        assert_eq!(
            PlanType::from_description("cliente quer plano Simples"),
            PlanType::Simples
        );
        assert_eq!(PlanType::from_description(""), PlanType::Full);
        assert_eq!(PlanType::from_description("SIMPLES"), PlanType::Simples);
    }
}
