//! Prediction Store
//!
//! Owner-scoped record storage backing the prediction and dashboard routes.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use super::{PredictionKind, PredictionRecord};

// == Dashboard Summary ==
/// Per-owner overview shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_predictions: usize,
    /// Count per prediction type, every type present
    pub by_type: BTreeMap<String, usize>,
    pub latest: Option<PredictionRecord>,
}

// == Prediction Store ==
#[derive(Debug, Default)]
pub struct PredictionStore {
    records: HashMap<u64, PredictionRecord>,
    next_id: u64,
}

impl PredictionStore {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            next_id: 1,
        }
    }

    // == Create ==
    /// Stores a new record and returns it. Ids increase monotonically.
    pub fn create(
        &mut self,
        owner: &str,
        kind: PredictionKind,
        input: Value,
        scores: Option<Value>,
    ) -> PredictionRecord {
        let id = self.next_id.max(1);
        self.next_id = id + 1;

        let record = PredictionRecord {
            id,
            owner: owner.to_string(),
            kind,
            input,
            scores,
            created_at: Utc::now(),
        };
        self.records.insert(id, record.clone());
        record
    }

    // == List ==
    /// Returns the owner's records, newest first, optionally of one type.
    pub fn list(&self, owner: &str, kind: Option<PredictionKind>) -> Vec<PredictionRecord> {
        let mut records: Vec<PredictionRecord> = self
            .records
            .values()
            .filter(|r| r.owner == owner)
            .filter(|r| kind.map_or(true, |k| r.kind == k))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.id.cmp(&a.id));
        records
    }

    /// Returns the record if it exists and belongs to `owner`.
    pub fn get(&self, owner: &str, id: u64) -> Option<PredictionRecord> {
        self.records.get(&id).filter(|r| r.owner == owner).cloned()
    }

    /// Deletes the owner's record. Returns false if there was nothing to delete.
    pub fn delete(&mut self, owner: &str, id: u64) -> bool {
        match self.records.get(&id) {
            Some(record) if record.owner == owner => {
                self.records.remove(&id);
                true
            }
            _ => false,
        }
    }

    // == Dashboard ==
    pub fn dashboard(&self, owner: &str) -> DashboardSummary {
        let records = self.list(owner, None);
        let mut by_type: BTreeMap<String, usize> = PredictionKind::ALL
            .iter()
            .map(|k| (k.as_str().to_string(), 0))
            .collect();
        for record in &records {
            *by_type.entry(record.kind.as_str().to_string()).or_insert(0) += 1;
        }

        DashboardSummary {
            total_predictions: records.len(),
            by_type,
            latest: records.into_iter().next(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
