//! Persistence collaborator
//!
//! The engine does not own storage. Records arrive from and return to an
//! opaque collaborator through this trait: a cost-table lookup, a demand
//! listing, and a single full-record upsert after every approve/reject/edit.
//! There are no partial updates and no retries; store errors propagate to the
//! caller unchanged.

use thiserror::Error;

use crate::models::cost::{CostConfig, PlanType};
use crate::models::negotiation::NegotiationRecord;

pub mod memory;

pub use memory::MemoryStore;

/// Errors surfaced by a store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no cost table configured for plan {plan:?}")]
    MissingCostConfig { plan: PlanType },

    #[error("malformed demand payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// The engine's view of the persistence layer
///
/// Implementations decide where records live; the engine only requires that
/// `update_demand` persists the full record (status, rates, mix, change log)
/// in one call.
pub trait NegotiationStore {
    /// Cost table for a plan type
    fn cost_config(&self, plan: PlanType) -> Result<CostConfig, StoreError>;

    /// All negotiation demands carrying a pricing payload
    fn demands(&self) -> Result<Vec<NegotiationRecord>, StoreError>;

    /// Upsert one full record
    fn update_demand(&mut self, record: &NegotiationRecord) -> Result<(), StoreError>;
}
