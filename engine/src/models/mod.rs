//! Domain models for the rate negotiation engine

pub mod bucket;
pub mod competitor;
pub mod cost;
pub mod negotiation;

// Re-exports
pub use bucket::{buckets_for, BucketTable, ParseBucketError, RateBucket};
pub use competitor::CompetitorRates;
pub use cost::{CostConfig, CostConfigError, PlanType};
pub use negotiation::{
    ApprovedRates, ChangeLogEntry, LogAction, NegotiationContext, NegotiationError,
    NegotiationRecord, NegotiationStatus, RejectionReason,
};
