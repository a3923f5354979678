//! Broker Stats: broker registry plus per-broker queue detail merge

use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use crate::monitor::queue_view_store::QueueViewStore;
use crate::monitor::types::StatsMerge;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerRecord {
    pub broker_name: String,
    /// Latest full `brokerStats` event payload
    pub stats: Value,
    pub updated_at: DateTime<Utc>,
}

/// Broker name -> slot. A slot, once assigned, never moves.
#[derive(Default)]
pub struct BrokerRegistry {
    index: HashMap<String, usize>,
    records: Vec<BrokerRecord>,
}

impl BrokerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the broker's slot content, assigning the next slot on first sight.
    pub fn upsert(&mut self, broker_name: &str, stats: Value) -> usize {
        let record = BrokerRecord {
            broker_name: broker_name.to_string(),
            stats,
            updated_at: Utc::now(),
        };

        match self.index.get(broker_name) {
            Some(&slot) => {
                self.records[slot] = record;
                slot
            }
            None => {
                let slot = self.records.len();
                self.records.push(record);
                self.index.insert(broker_name.to_string(), slot);
                slot
            }
        }
    }

    pub fn index_of(&self, broker_name: &str) -> Option<usize> {
        self.index.get(broker_name).copied()
    }

    pub fn get(&self, broker_name: &str) -> Option<&BrokerRecord> {
        self.index_of(broker_name).map(|slot| &self.records[slot])
    }

    pub fn records(&self) -> &[BrokerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Default)]
pub struct BrokerStatsMerger {
    registry: BrokerRegistry,
}

impl BrokerStatsMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &BrokerRegistry {
        &self.registry
    }

    /// Applies one `brokerStats` payload. Returns the broker's slot, or `None` if the
    /// payload carries no broker name.
    ///
    /// Queue entries only enrich queues the store already knows; unknown queues are skipped.
    pub fn apply_broker_stats(&mut self, store: &QueueViewStore, payload: &Value) -> Option<usize> {
        let broker_name = payload
            .get("brokerStats")
            .and_then(|stats| stats.get("brokerName"))
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())?
            .to_string();

        let slot = self.registry.upsert(&broker_name, payload.clone());

        let Some(queue_stats) = payload.get("queueStats").and_then(Value::as_object) else {
            return Some(slot);
        };

        for (queue_name, stats) in queue_stats {
            let Some(handle) = store.get(queue_name) else {
                tracing::trace!("[BrokerStats] '{}' reports untracked queue '{}'", broker_name, queue_name);
                continue;
            };
            let mut view = handle.write();
            let detail = view.broker_detail_mut(&broker_name);
            if let Value::Object(fields) = stats {
                detail.merge_stats(fields);
            }
        }

        Some(slot)
    }
}
