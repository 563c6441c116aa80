//! Negotiation session
//!
//! Owns one negotiation record plus the active cost table while the desk
//! works it. The upstream UI recomputed proposals through reactive effects
//! keyed on several dependencies; here recomputation is an explicit call with
//! a named trigger, so there is no hidden re-entrancy and no implicit global
//! state.
//!
//! # Critical Invariants
//!
//! 1. Manual per-bucket rate edits survive a `SpreadChanged` recomputation;
//!    only `RecordSwitched` and `PlanChanged` discard them
//! 2. The session holds the record exclusively (at most one editor per
//!    record); a second concurrent editor is unrepresentable
//! 3. Persistence is a single full-record upsert through the store trait;
//!    store errors propagate unchanged

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::evaluator::{evaluate, MarginComparison};
use crate::models::bucket::{BucketTable, RateBucket};
use crate::models::cost::{CostConfig, PlanType};
use crate::models::negotiation::{NegotiationError, NegotiationRecord, RejectionReason};
use crate::proposal::{compute_proposal, default_mix, ApprovalTier};
use crate::store::{NegotiationStore, StoreError};

/// What caused a proposal recomputation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeTrigger {
    /// Operator moved the spread target; manual rate edits are preserved
    SpreadChanged,

    /// A different record was loaded; everything is recomputed fresh
    RecordSwitched,

    /// The plan type changed; bucket set changes, everything recomputed
    PlanChanged,
}

/// One desk editing session over a single negotiation record
///
/// # Example
/// ```
/// use chrono::Utc;
/// use rate_negotiation_core_rs::{
///     ApprovalTier, CompetitorRates, CostConfig, NegotiationContext, NegotiationRecord,
///     NegotiationSession, RateBucket,
/// };
///
/// let record = NegotiationRecord::new(
///     "Padaria Central".to_string(),
///     "ana.souza".to_string(),
///     Utc::now(),
///     "",
///     NegotiationContext { potential_revenue: 100_000.0, min_agreed: 0.65 },
///     CompetitorRates::new(2.01, 3.5, 4.6),
/// );
/// let costs = CostConfig { debit_cost: 1.5, fixed_cost_per_tx: 0.1, ..CostConfig::default() };
///
/// let session = NegotiationSession::open(record, costs);
/// assert_eq!(session.tier(), ApprovalTier::Automatic);
/// assert_eq!(session.record().proposed_rates().value(RateBucket::Debit), 2.45);
/// ```
#[derive(Debug, Clone)]
pub struct NegotiationSession {
    record: NegotiationRecord,
    cost_config: CostConfig,
    tier: ApprovalTier,
    edited_buckets: BTreeSet<RateBucket>,
}

impl NegotiationSession {
    /// Open a session on a record
    ///
    /// Computes a fresh proposal immediately. The record's mix is seeded with
    /// the heuristic default only when it arrives empty; a mix the desk
    /// already captured is kept.
    pub fn open(record: NegotiationRecord, cost_config: CostConfig) -> Self {
        let mut session = Self {
            record,
            cost_config,
            tier: ApprovalTier::Automatic,
            edited_buckets: BTreeSet::new(),
        };
        session.recompute(RecomputeTrigger::RecordSwitched);
        session
    }

    /// The record under edit
    pub fn record(&self) -> &NegotiationRecord {
        &self.record
    }

    /// The active cost table
    pub fn cost_config(&self) -> &CostConfig {
        &self.cost_config
    }

    /// Approval tier implied by the current spread target
    pub fn tier(&self) -> ApprovalTier {
        self.tier
    }

    /// Buckets the operator has manually overridden since the last reload
    pub fn edited_buckets(&self) -> &BTreeSet<RateBucket> {
        &self.edited_buckets
    }

    /// Replace the record under edit (switching cases on the desk)
    pub fn load_record(&mut self, record: NegotiationRecord) {
        self.record = record;
        self.recompute(RecomputeTrigger::RecordSwitched);
    }

    /// Change the spread target and recompute
    ///
    /// Manual rate edits survive: the operator tuned those buckets by hand
    /// and a spread nudge must not silently revert them.
    pub fn set_target_spread(&mut self, spread: f64) {
        self.record.set_target_spread(spread);
        self.recompute(RecomputeTrigger::SpreadChanged);
    }

    /// Change the plan type and recompute from scratch
    pub fn set_plan_type(&mut self, plan: PlanType) {
        if plan == self.record.plan_type() {
            return;
        }
        self.record.set_plan_type(plan);
        self.recompute(RecomputeTrigger::PlanChanged);
    }

    /// Manually override one proposed rate
    pub fn set_rate(&mut self, bucket: RateBucket, rate: f64) {
        self.record.set_rate(bucket, rate);
        self.edited_buckets.insert(bucket);
    }

    /// Set one mix weight
    pub fn set_mix_weight(&mut self, bucket: RateBucket, weight: f64) {
        self.record.set_mix_weight(bucket, weight);
    }

    /// Recompute the proposal for an explicit trigger
    ///
    /// `RecordSwitched` and `PlanChanged` rebuild the whole table and reseed
    /// an empty mix; `SpreadChanged` rewrites only buckets the operator has
    /// not touched.
    pub fn recompute(&mut self, trigger: RecomputeTrigger) {
        let proposal = compute_proposal(
            &self.cost_config,
            &self.record.competitor_rates(),
            self.record.plan_type(),
            self.record.target_spread(),
        );
        self.tier = proposal.tier;

        match trigger {
            RecomputeTrigger::RecordSwitched | RecomputeTrigger::PlanChanged => {
                self.edited_buckets.clear();
                self.record.set_proposed_rates(proposal.rates);
                if self.record.mix().is_empty()
                    || trigger == RecomputeTrigger::PlanChanged
                {
                    self.record.set_mix(default_mix(self.record.plan_type()));
                }
            }
            RecomputeTrigger::SpreadChanged => {
                for (bucket, rate) in proposal.rates.iter() {
                    if !self.edited_buckets.contains(&bucket) {
                        self.record.set_rate(bucket, rate);
                    }
                }
            }
        }
    }

    /// Evaluate competitor vs. proposal under the current mix and TPV
    pub fn evaluate(&self) -> MarginComparison {
        evaluate(
            self.record.proposed_rates(),
            self.record.mix(),
            &self.cost_config,
            &self.record.competitor_rates(),
            self.record.plan_type(),
            self.record.context().potential_revenue,
        )
    }

    /// Approve the record, logging the computed spread at decision time
    pub fn approve(&mut self, approver: &str, now: DateTime<Utc>) -> Result<(), NegotiationError> {
        let spread = self.evaluate().proposed.spread_percent;
        self.record
            .approve(approver, format!("spread {:.2}%", spread), now)
    }

    /// Reject the record with an enumerated reason
    pub fn reject(&mut self, reason: RejectionReason) -> Result<(), NegotiationError> {
        self.record.reject(reason)
    }

    /// Re-edit rates on an approved record (logged, status unchanged)
    pub fn edit_approved_rates(
        &mut self,
        user: &str,
        rates: BucketTable,
        now: DateTime<Utc>,
    ) -> Result<(), NegotiationError> {
        self.record.edit_approved_rates(user, rates, now)
    }

    /// Persist the record through the store collaborator
    ///
    /// One full-record upsert; errors propagate unchanged, no retry.
    pub fn commit(&self, store: &mut dyn NegotiationStore) -> Result<(), StoreError> {
        store.update_demand(&self.record)
    }
}
