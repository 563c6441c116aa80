//! Negotiation record and lifecycle
//!
//! A `NegotiationRecord` is one pricing-desk case: a merchant's competitor
//! rate card escalated by a sales rep, the desk's counter-proposal table, the
//! volume mix, and the approval lifecycle.
//!
//! Lifecycle: `Pending -> {Approved, Rejected}`. An Approved record may have
//! its rates re-edited (logged) but never leaves Approved; Rejected is
//! terminal.
//!
//! # Critical Invariants
//!
//! 1. Transition methods validate preconditions before touching any field; a
//!    failed approve/reject/edit leaves the record byte-identical
//! 2. `change_log` is append-only; entries are never rewritten or removed
//! 3. `approved_rates` holds exactly three reference points (the official
//!    approved card), regardless of how many buckets the live table has
//! 4. Timestamps are passed in by the caller; the record never reads a clock

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::bucket::{BucketTable, RateBucket};
use crate::models::competitor::CompetitorRates;
use crate::models::cost::PlanType;

/// Default target spread (%) seeded on newly escalated demands
///
/// Sits above the automatic-tier threshold so a fresh case starts in
/// Alçada 1 until the operator says otherwise.
pub const DEFAULT_TARGET_SPREAD: f64 = 0.85;

/// Approval lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationStatus {
    /// Awaiting a desk decision
    Pending,

    /// Approved; rates may still be re-edited under audit
    Approved,

    /// Rejected with a reason; terminal
    Rejected,
}

impl std::fmt::Display for NegotiationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NegotiationStatus::Pending => write!(f, "pending"),
            NegotiationStatus::Approved => write!(f, "approved"),
            NegotiationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Audit-trail action labels, as the desk displays them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogAction {
    /// Approval of the proposal
    #[serde(rename = "Aprovação")]
    Approval,

    /// Rate edit on an already-approved record
    #[serde(rename = "Edição de Taxas")]
    RateEdit,
}

impl std::fmt::Display for LogAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogAction::Approval => write!(f, "Aprovação"),
            LogAction::RateEdit => write!(f, "Edição de Taxas"),
        }
    }
}

/// One append-only audit-trail entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    /// When the action happened
    pub date: DateTime<Utc>,

    /// Who performed it
    pub user: String,

    /// What was done
    pub action: LogAction,

    /// Free-form detail (e.g. the computed spread at approval time)
    pub details: String,
}

/// Enumerated rejection reasons, as the desk form offers them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    /// Evidência incorreta
    IncorrectEvidence,

    /// Anexos incompletos
    IncompleteAttachments,

    /// Erro no cálculo de margem
    MarginCalculationError,

    /// Reenviar dados
    ResendData,

    /// Outros — requires non-empty free text
    Other { details: String },
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::IncorrectEvidence => write!(f, "Evidência incorreta"),
            RejectionReason::IncompleteAttachments => write!(f, "Anexos incompletos"),
            RejectionReason::MarginCalculationError => write!(f, "Erro no cálculo de margem"),
            RejectionReason::ResendData => write!(f, "Reenviar dados"),
            RejectionReason::Other { details } => write!(f, "Outros: {}", details),
        }
    }
}

/// The official approved rate card: three reference points only
///
/// Intermediate bucket edits live on in `proposed_rates`, but the approved
/// snapshot is intentionally coarser.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedRates {
    /// Approved debit rate (%)
    pub debit: f64,

    /// Approved sight-credit rate (%)
    pub credit_1x: f64,

    /// Approved 12x (or longest-bucket) rate (%)
    pub credit_12x: f64,
}

/// Commercial context attached to the demand
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationContext {
    /// Projected TPV (currency)
    pub potential_revenue: f64,

    /// Minimum spread agreed with the rep (%)
    pub min_agreed: f64,
}

/// Errors raised by lifecycle operations
#[derive(Debug, Error, PartialEq)]
pub enum NegotiationError {
    #[error("cannot {action} a {from} negotiation")]
    InvalidTransition {
        from: NegotiationStatus,
        action: &'static str,
    },

    #[error("rejection reason 'Outros' requires a non-empty description")]
    MissingRejectionDetails,

    #[error("cannot approve without a proposed rate table")]
    EmptyProposal,
}

/// One pricing-desk negotiation case
///
/// # Example
/// ```
/// use chrono::Utc;
/// use rate_negotiation_core_rs::{
///     CompetitorRates, NegotiationContext, NegotiationRecord, NegotiationStatus,
/// };
///
/// let record = NegotiationRecord::new(
///     "Padaria Central".to_string(),
///     "ana.souza".to_string(),
///     Utc::now(),
///     "concorrente cobra 2.01 no débito",
///     NegotiationContext { potential_revenue: 150_000.0, min_agreed: 0.65 },
///     CompetitorRates::new(2.01, 3.5, 4.6),
/// );
///
/// assert_eq!(record.status(), NegotiationStatus::Pending);
/// assert!(record.change_log().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationRecord {
    /// Unique record identifier (UUID)
    id: String,

    /// Merchant name
    client_name: String,

    /// Sales rep who escalated the demand
    requester: String,

    /// When the demand was escalated
    date: DateTime<Utc>,

    /// Plan type (derived from the demand description; default Full)
    plan_type: PlanType,

    /// Commercial context (TPV estimate, agreed floor)
    context: NegotiationContext,

    /// Incumbent's observed rate card
    competitor_rates: CompetitorRates,

    /// Desk counter-proposal, bucket -> rate (%)
    proposed_rates: BucketTable,

    /// Volume mix, bucket -> weight (% of TPV)
    mix: BucketTable,

    /// Operator-adjustable spread target (%)
    target_spread: f64,

    /// Lifecycle status
    status: NegotiationStatus,

    /// Official approved card, set on approval
    approved_rates: Option<ApprovedRates>,

    /// Rejection reason (rendered), set on rejection
    resolution_notes: Option<String>,

    /// Append-only audit trail
    change_log: Vec<ChangeLogEntry>,
}

impl NegotiationRecord {
    /// Create a freshly escalated (Pending) negotiation
    ///
    /// The plan type is derived from the free-text `description` ("simples"
    /// anywhere in it selects the Simples plan). Rates and mix start empty;
    /// the session seeds them on first computation.
    pub fn new(
        client_name: String,
        requester: String,
        date: DateTime<Utc>,
        description: &str,
        context: NegotiationContext,
        competitor_rates: CompetitorRates,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            client_name,
            requester,
            date,
            plan_type: PlanType::from_description(description),
            context,
            competitor_rates,
            proposed_rates: BucketTable::new(),
            mix: BucketTable::new(),
            target_spread: DEFAULT_TARGET_SPREAD,
            status: NegotiationStatus::Pending,
            approved_rates: None,
            resolution_notes: None,
            change_log: Vec::new(),
        }
    }

    /// Get the record ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the merchant name
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Get the escalating sales rep
    pub fn requester(&self) -> &str {
        &self.requester
    }

    /// Get the escalation date
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Get the plan type
    pub fn plan_type(&self) -> PlanType {
        self.plan_type
    }

    /// Set the plan type (desk override of the derived value)
    pub fn set_plan_type(&mut self, plan: PlanType) {
        self.plan_type = plan;
    }

    /// Get the commercial context
    pub fn context(&self) -> NegotiationContext {
        self.context
    }

    /// Get the competitor rate card
    pub fn competitor_rates(&self) -> CompetitorRates {
        self.competitor_rates
    }

    /// Get the current proposal table
    pub fn proposed_rates(&self) -> &BucketTable {
        &self.proposed_rates
    }

    /// Replace the whole proposal table
    pub fn set_proposed_rates(&mut self, rates: BucketTable) {
        self.proposed_rates = rates;
    }

    /// Set one proposed rate
    pub fn set_rate(&mut self, bucket: RateBucket, rate: f64) {
        self.proposed_rates.set(bucket, rate);
    }

    /// Get the volume mix
    pub fn mix(&self) -> &BucketTable {
        &self.mix
    }

    /// Replace the whole volume mix
    pub fn set_mix(&mut self, mix: BucketTable) {
        self.mix = mix;
    }

    /// Set one mix weight
    pub fn set_mix_weight(&mut self, bucket: RateBucket, weight: f64) {
        self.mix.set(bucket, weight);
    }

    /// Get the target spread (%)
    pub fn target_spread(&self) -> f64 {
        self.target_spread
    }

    /// Set the target spread (%)
    ///
    /// Any real value is accepted, including negative: a below-cost spread is
    /// an explicit operator override, not an input error.
    pub fn set_target_spread(&mut self, spread: f64) {
        self.target_spread = spread;
    }

    /// Get the lifecycle status
    pub fn status(&self) -> NegotiationStatus {
        self.status
    }

    /// Get the official approved card, if approved
    pub fn approved_rates(&self) -> Option<ApprovedRates> {
        self.approved_rates
    }

    /// Get the rejection notes, if rejected
    pub fn resolution_notes(&self) -> Option<&str> {
        self.resolution_notes.as_deref()
    }

    /// Get the audit trail
    pub fn change_log(&self) -> &[ChangeLogEntry] {
        &self.change_log
    }

    /// Whether the record awaits a decision
    pub fn is_pending(&self) -> bool {
        self.status == NegotiationStatus::Pending
    }

    /// Whether the record is approved
    pub fn is_approved(&self) -> bool {
        self.status == NegotiationStatus::Approved
    }

    /// Approve the negotiation
    ///
    /// Only legal while Pending. Snapshots the three reference points of the
    /// current proposal into `approved_rates`, appends an `Aprovação` entry
    /// carrying `spread_details` (the computed spread at decision time), and
    /// moves to Approved.
    ///
    /// # Errors
    /// - `InvalidTransition` if the record is not Pending
    /// - `EmptyProposal` if no rates have been computed yet
    pub fn approve(
        &mut self,
        approver: &str,
        spread_details: String,
        now: DateTime<Utc>,
    ) -> Result<(), NegotiationError> {
        if self.status != NegotiationStatus::Pending {
            return Err(NegotiationError::InvalidTransition {
                from: self.status,
                action: "approve",
            });
        }

        let snapshot = self.snapshot_reference_points()?;

        self.approved_rates = Some(snapshot);
        self.change_log.push(ChangeLogEntry {
            date: now,
            user: approver.to_string(),
            action: LogAction::Approval,
            details: spread_details,
        });
        self.status = NegotiationStatus::Approved;
        Ok(())
    }

    /// Reject the negotiation
    ///
    /// Only legal while Pending. The rendered reason is written into
    /// `resolution_notes`; Rejected is terminal. The `Outros` reason requires
    /// non-empty free text, validated before any mutation.
    pub fn reject(&mut self, reason: RejectionReason) -> Result<(), NegotiationError> {
        if self.status != NegotiationStatus::Pending {
            return Err(NegotiationError::InvalidTransition {
                from: self.status,
                action: "reject",
            });
        }
        if let RejectionReason::Other { details } = &reason {
            if details.trim().is_empty() {
                return Err(NegotiationError::MissingRejectionDetails);
            }
        }

        self.resolution_notes = Some(reason.to_string());
        self.status = NegotiationStatus::Rejected;
        Ok(())
    }

    /// Re-edit the rate table of an already-approved negotiation
    ///
    /// Only legal while Approved. Replaces the proposal table, refreshes the
    /// three-point approved snapshot, and appends an `Edição de Taxas` entry.
    /// The status stays Approved.
    pub fn edit_approved_rates(
        &mut self,
        user: &str,
        rates: BucketTable,
        now: DateTime<Utc>,
    ) -> Result<(), NegotiationError> {
        if self.status != NegotiationStatus::Approved {
            return Err(NegotiationError::InvalidTransition {
                from: self.status,
                action: "edit rates of",
            });
        }
        if rates.is_empty() {
            return Err(NegotiationError::EmptyProposal);
        }

        self.proposed_rates = rates;
        let snapshot = self.snapshot_reference_points()?;
        self.approved_rates = Some(snapshot);
        self.change_log.push(ChangeLogEntry {
            date: now,
            user: user.to_string(),
            action: LogAction::RateEdit,
            details: String::new(),
        });
        Ok(())
    }

    /// Extract the three official reference points from the live proposal
    ///
    /// `credit_12x` falls back to the longest bucket present when the table
    /// has no literal `12x` entry (the Simples plan tops out at `13x-18x`).
    fn snapshot_reference_points(&self) -> Result<ApprovedRates, NegotiationError> {
        let last = self
            .proposed_rates
            .last()
            .ok_or(NegotiationError::EmptyProposal)?;

        Ok(ApprovedRates {
            debit: self.proposed_rates.value(RateBucket::Debit),
            credit_1x: self.proposed_rates.value(RateBucket::Credit(1)),
            credit_12x: self
                .proposed_rates
                .get(RateBucket::Credit(12))
                .unwrap_or(last.1),
        })
    }
}
