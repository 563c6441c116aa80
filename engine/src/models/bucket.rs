//! Rate buckets and bucket-keyed tables
//!
//! A bucket identifies one line of a merchant rate card: debit, sight credit
//! (1x), or an installment tier. The two plan types expose different bucket
//! sets:
//! - **Full**: `debit`, `1x` .. `12x` (13 buckets, one per installment count)
//! - **Simples**: `debit`, `1x`, `2x-6x`, `7x-12x`, `13x-18x` (5 buckets)
//!
//! # Critical Invariants
//!
//! 1. Bucket labels are canonical (`"debit"`, `"3x"`, `"7x-12x"`) and round-trip
//!    through `Display`/`FromStr` and serde
//! 2. All rates and mix weights are plain percentages (5.08 means 5.08%)
//! 3. `buckets_for` returns buckets in rate-card order (debit first)

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::models::cost::PlanType;

/// One line of a merchant rate card
///
/// `Credit(n)` covers the per-installment buckets of the Full plan (`1x` is
/// sight credit). The three range variants are the coarser Simples tiers.
///
/// # Example
/// ```
/// use rate_negotiation_core_rs::RateBucket;
///
/// assert_eq!(RateBucket::Credit(3).to_string(), "3x");
/// assert_eq!("7x-12x".parse::<RateBucket>().unwrap(), RateBucket::Range7to12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RateBucket {
    /// Debit card transactions
    Debit,

    /// Credit in `n` installments (1 = sight credit)
    Credit(u8),

    /// Simples plan: 2 to 6 installments
    Range2to6,

    /// Simples plan: 7 to 12 installments
    Range7to12,

    /// Simples plan: 13 to 18 installments
    Range13to18,
}

/// Error parsing a bucket label
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseBucketError {
    #[error("unknown rate bucket label: {0}")]
    UnknownLabel(String),

    #[error("installment count {0} out of range (1-12)")]
    InstallmentsOutOfRange(u8),
}

impl RateBucket {
    /// Representative installment count for funding-term math
    ///
    /// Debit has none; the Simples ranges use their midpoint installment
    /// count (4, 9, 15).
    pub fn installments(&self) -> Option<u8> {
        match self {
            RateBucket::Debit => None,
            RateBucket::Credit(n) => Some(*n),
            RateBucket::Range2to6 => Some(4),
            RateBucket::Range7to12 => Some(9),
            RateBucket::Range13to18 => Some(15),
        }
    }

    /// Average outstanding term of this bucket, in months
    ///
    /// An n-installment sale has receivables outstanding for 1..n months,
    /// averaging `(n + 1) / 2`. Debit settles immediately (term 0).
    ///
    /// # Example
    /// ```
    /// use rate_negotiation_core_rs::RateBucket;
    ///
    /// assert_eq!(RateBucket::Debit.average_term(), 0.0);
    /// assert_eq!(RateBucket::Credit(1).average_term(), 1.0);
    /// assert_eq!(RateBucket::Credit(12).average_term(), 6.5);
    /// ```
    pub fn average_term(&self) -> f64 {
        match self.installments() {
            Some(n) => (f64::from(n) + 1.0) / 2.0,
            None => 0.0,
        }
    }
}

/// Ordered bucket set for a plan type, in rate-card order
///
/// # Example
/// ```
/// use rate_negotiation_core_rs::{buckets_for, PlanType, RateBucket};
///
/// let full = buckets_for(PlanType::Full);
/// assert_eq!(full.len(), 13);
/// assert_eq!(full[0], RateBucket::Debit);
///
/// let simples = buckets_for(PlanType::Simples);
/// assert_eq!(simples.len(), 5);
/// assert_eq!(simples[4], RateBucket::Range13to18);
/// ```
pub fn buckets_for(plan: PlanType) -> Vec<RateBucket> {
    match plan {
        PlanType::Full => {
            let mut buckets = vec![RateBucket::Debit];
            buckets.extend((1..=12).map(RateBucket::Credit));
            buckets
        }
        PlanType::Simples => vec![
            RateBucket::Debit,
            RateBucket::Credit(1),
            RateBucket::Range2to6,
            RateBucket::Range7to12,
            RateBucket::Range13to18,
        ],
    }
}

impl fmt::Display for RateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateBucket::Debit => write!(f, "debit"),
            RateBucket::Credit(n) => write!(f, "{}x", n),
            RateBucket::Range2to6 => write!(f, "2x-6x"),
            RateBucket::Range7to12 => write!(f, "7x-12x"),
            RateBucket::Range13to18 => write!(f, "13x-18x"),
        }
    }
}

impl FromStr for RateBucket {
    type Err = ParseBucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(RateBucket::Debit),
            "2x-6x" => Ok(RateBucket::Range2to6),
            "7x-12x" => Ok(RateBucket::Range7to12),
            "13x-18x" => Ok(RateBucket::Range13to18),
            other => {
                let count = other
                    .strip_suffix('x')
                    .and_then(|digits| digits.parse::<u8>().ok())
                    .ok_or_else(|| ParseBucketError::UnknownLabel(other.to_string()))?;
                if !(1..=12).contains(&count) {
                    return Err(ParseBucketError::InstallmentsOutOfRange(count));
                }
                Ok(RateBucket::Credit(count))
            }
        }
    }
}

// Buckets serialize as their canonical label so bucket-keyed tables are plain
// JSON objects ({"debit": 2.45, "1x": 3.10, ...}).
impl Serialize for RateBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RateBucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(de::Error::custom)
    }
}

/// Bucket-keyed table of percentages
///
/// Used for both proposed rate tables (percent of transaction value) and
/// volume-mix tables (percent of TPV). Mix weights need not sum to exactly
/// 100; consumers normalize.
///
/// # Example
/// ```
/// use rate_negotiation_core_rs::{BucketTable, RateBucket};
///
/// let mut rates = BucketTable::new();
/// rates.set(RateBucket::Debit, 2.45);
/// rates.set(RateBucket::Credit(1), 3.10);
///
/// assert_eq!(rates.value(RateBucket::Debit), 2.45);
/// assert_eq!(rates.value(RateBucket::Credit(2)), 0.0); // absent -> 0
/// assert_eq!(rates.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketTable(BTreeMap<RateBucket, f64>);

impl BucketTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Get the value for a bucket, if present
    pub fn get(&self, bucket: RateBucket) -> Option<f64> {
        self.0.get(&bucket).copied()
    }

    /// Get the value for a bucket, defaulting to 0.0 when absent
    pub fn value(&self, bucket: RateBucket) -> f64 {
        self.get(bucket).unwrap_or(0.0)
    }

    /// Set the value for a bucket
    pub fn set(&mut self, bucket: RateBucket, value: f64) {
        self.0.insert(bucket, value);
    }

    /// Whether the table has an entry for this bucket
    pub fn contains(&self, bucket: RateBucket) -> bool {
        self.0.contains_key(&bucket)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all values (e.g. total mix weight)
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Iterate entries in bucket order
    pub fn iter(&self) -> impl Iterator<Item = (RateBucket, f64)> + '_ {
        self.0.iter().map(|(bucket, value)| (*bucket, *value))
    }

    /// Last entry in bucket order (the longest-installment bucket)
    pub fn last(&self) -> Option<(RateBucket, f64)> {
        self.0
            .iter()
            .next_back()
            .map(|(bucket, value)| (*bucket, *value))
    }
}

impl FromIterator<(RateBucket, f64)> for BucketTable {
    fn from_iter<I: IntoIterator<Item = (RateBucket, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
