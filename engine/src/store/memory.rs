//! In-memory store
//!
//! Backs tests and single-process deployments. Demands can be loaded from the
//! JSON documents the upstream system attaches to an escalated demand;
//! documents without a pricing payload are not negotiation material and are
//! skipped, matching the listing the desk sees.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::bucket::BucketTable;
use crate::models::competitor::CompetitorRates;
use crate::models::cost::{CostConfig, PlanType};
use crate::models::negotiation::{NegotiationContext, NegotiationRecord};
use crate::store::{NegotiationStore, StoreError};

/// One demand document as the upstream system ships it
///
/// Only demands with an attached `pricing` payload become negotiation
/// records; the free-text description drives the plan type.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DemandDocument {
    client_name: String,
    requester: String,
    date: DateTime<Utc>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    context: NegotiationContext,
    pricing: Option<PricingPayload>,
}

/// The pricing payload attached to an escalated demand
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PricingPayload {
    competitor_rates: CompetitorRates,
    #[serde(default)]
    proposed_rates: BucketTable,
    #[serde(default)]
    mix: BucketTable,
    target_spread: Option<f64>,
}

/// In-memory implementation of the store trait
///
/// # Example
/// ```
/// use rate_negotiation_core_rs::{CostConfig, MemoryStore, NegotiationStore, PlanType};
///
/// let store = MemoryStore::new(CostConfig::default(), CostConfig::default());
/// assert!(store.demands().unwrap().is_empty());
/// assert!(store.cost_config(PlanType::Simples).is_ok());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    full_costs: Option<CostConfig>,
    simples_costs: Option<CostConfig>,
    demands: BTreeMap<String, NegotiationRecord>,
}

impl MemoryStore {
    /// Create a store with one cost table per plan
    pub fn new(full: CostConfig, simples: CostConfig) -> Self {
        Self {
            full_costs: Some(full),
            simples_costs: Some(simples),
            demands: BTreeMap::new(),
        }
    }

    /// Load demands from an upstream JSON document array
    ///
    /// Documents without a pricing payload are skipped. Malformed JSON is an
    /// error for the whole batch; the desk listing is all-or-nothing.
    pub fn load_demands_json(&mut self, json: &str) -> Result<usize, StoreError> {
        let documents: Vec<DemandDocument> = serde_json::from_str(json)?;
        let mut loaded = 0;

        for document in documents {
            let Some(pricing) = document.pricing else {
                continue;
            };

            let mut record = NegotiationRecord::new(
                document.client_name,
                document.requester,
                document.date,
                &document.description,
                document.context,
                pricing.competitor_rates,
            );
            if !pricing.proposed_rates.is_empty() {
                record.set_proposed_rates(pricing.proposed_rates);
            }
            if !pricing.mix.is_empty() {
                record.set_mix(pricing.mix);
            }
            if let Some(spread) = pricing.target_spread {
                record.set_target_spread(spread);
            }

            self.demands.insert(record.id().to_string(), record);
            loaded += 1;
        }

        Ok(loaded)
    }

    /// Insert or replace a record directly
    pub fn insert_demand(&mut self, record: NegotiationRecord) {
        self.demands.insert(record.id().to_string(), record);
    }

    /// Fetch one record by ID
    pub fn get_demand(&self, id: &str) -> Option<&NegotiationRecord> {
        self.demands.get(id)
    }

    /// Number of stored demands
    pub fn len(&self) -> usize {
        self.demands.len()
    }

    /// Whether the store holds no demands
    pub fn is_empty(&self) -> bool {
        self.demands.is_empty()
    }
}

impl NegotiationStore for MemoryStore {
    fn cost_config(&self, plan: PlanType) -> Result<CostConfig, StoreError> {
        let config = match plan {
            PlanType::Full => &self.full_costs,
            PlanType::Simples => &self.simples_costs,
        };
        config
            .clone()
            .ok_or(StoreError::MissingCostConfig { plan })
    }

    fn demands(&self) -> Result<Vec<NegotiationRecord>, StoreError> {
        Ok(self.demands.values().cloned().collect())
    }

    fn update_demand(&mut self, record: &NegotiationRecord) -> Result<(), StoreError> {
        self.demands
            .insert(record.id().to_string(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMANDS_JSON: &str = r#"[
        {
            "clientName": "Padaria Central",
            "requester": "ana.souza",
            "date": "2026-08-01T12:00:00Z",
            "description": "concorrente Stone, cliente quer plano simples",
            "context": { "potentialRevenue": 150000.0, "minAgreed": 0.65 },
            "pricing": {
                "competitorRates": { "debit": 2.01, "credit1x": 3.5, "credit12x": 4.6 },
                "targetSpread": 0.85
            }
        },
        {
            "clientName": "Oficina do Zé",
            "requester": "ana.souza",
            "date": "2026-08-02T09:30:00Z",
            "description": "troca de maquininha, sem taxas anexadas"
        }
    ]"#;

    #[test]
    fn test_load_skips_demands_without_pricing() {
        let mut store = MemoryStore::default();
        let loaded = store.load_demands_json(DEMANDS_JSON).unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(store.len(), 1);

        let records = store.demands().unwrap();
        assert_eq!(records[0].client_name(), "Padaria Central");
        assert_eq!(records[0].plan_type(), PlanType::Simples);
        assert_eq!(records[0].target_spread(), 0.85);
        assert_eq!(records[0].competitor_rates().debit, 2.01);
    }

    #[test]
    fn test_load_rejects_malformed_batch() {
        let mut store = MemoryStore::default();
        let err = store.load_demands_json("{not json").unwrap_err();
        assert!(matches!(err, StoreError::MalformedPayload(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_demand_upserts_full_record() {
        let mut store = MemoryStore::default();
        store.load_demands_json(DEMANDS_JSON).unwrap();

        let mut record = store.demands().unwrap().remove(0);
        record.set_target_spread(0.5);
        store.update_demand(&record).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get_demand(record.id()).unwrap().target_spread(),
            0.5
        );
    }

    #[test]
    fn test_cost_config_per_plan() {
        let full = CostConfig {
            debit_cost: 1.5,
            ..CostConfig::default()
        };
        let simples = CostConfig {
            debit_cost: 1.8,
            ..CostConfig::default()
        };
        let store = MemoryStore::new(full, simples);

        assert_eq!(store.cost_config(PlanType::Full).unwrap().debit_cost, 1.5);
        assert_eq!(
            store.cost_config(PlanType::Simples).unwrap().debit_cost,
            1.8
        );
    }

    #[test]
    fn test_default_store_has_no_cost_tables() {
        let store = MemoryStore::default();
        assert!(matches!(
            store.cost_config(PlanType::Full),
            Err(StoreError::MissingCostConfig { .. })
        ));
    }
}
