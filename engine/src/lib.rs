//! Rate Negotiation Core - Margin Engine
//!
//! Computation core for the pricing desk ("Mesa de Negociação"): given a
//! merchant's competitor rate card and the operator's internal cost
//! structure, it computes a counter-proposal rate table, classifies the deal
//! into an approval tier, and produces a mix-weighted financial comparison
//! between the incumbent and the proposed rates.
//!
//! # Architecture
//!
//! - **models**: Domain types (CostConfig, CompetitorRates, NegotiationRecord)
//! - **proposal**: Counter-proposal calculation and tier classification
//! - **evaluator**: Mix-weighted take-rate / spread / margin comparison
//! - **session**: Desk editing session with explicit recomputation triggers
//! - **store**: Persistence collaborator trait + in-memory implementation
//!
//! # Critical Invariants
//!
//! 1. All rates and mix weights are plain percentages (5.08 means 5.08%);
//!    monetary values are plain currency amounts
//! 2. Every computation is pure and bounded (at most 13 buckets); degenerate
//!    inputs (empty mix, zero TPV) degrade to zero results, never panics
//! 3. Lifecycle transitions validate preconditions before mutating anything
//! 4. Timestamps enter through arguments; the engine never reads a clock

// Module declarations
pub mod evaluator;
pub mod models;
pub mod proposal;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use evaluator::{evaluate, MarginComparison, SideMetrics};
pub use models::{
    bucket::{buckets_for, BucketTable, ParseBucketError, RateBucket},
    competitor::{CompetitorRates, SIMPLES_13_18_OFFSET, SIMPLES_2_6_OFFSET},
    cost::{CostConfig, CostConfigError, PlanType},
    negotiation::{
        ApprovedRates, ChangeLogEntry, LogAction, NegotiationContext, NegotiationError,
        NegotiationRecord, NegotiationStatus, RejectionReason, DEFAULT_TARGET_SPREAD,
    },
};
pub use proposal::{
    classify_tier, compute_proposal, default_mix, ApprovalTier, RateProposal, AUTO_TIER_SPREAD,
};
pub use session::{NegotiationSession, RecomputeTrigger};
pub use store::{MemoryStore, NegotiationStore, StoreError};
