//! Monitor Types: the per-queue view model and the shared field merge

use std::collections::BTreeMap;
use std::sync::Arc;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

/// Open, string-keyed stat set. Unknown keys are kept as-is.
pub type StatFields = serde_json::Map<String, Value>;

/// Stable handle to a queue's view. Observers keep this across updates.
pub type QueueHandle = Arc<RwLock<QueueView>>;

pub const DEFAULT_BROKER_LABEL: &str = "totals";
pub const PENDING_REMOVAL_CLASS: &str = "deletedItemPendingRemoval";

// ---------- Well-known stat fields ----------

pub const PRODUCER_COUNT: &str = "producerCount";
pub const CONSUMER_COUNT: &str = "consumerCount";
pub const QUEUE_SIZE: &str = "queueSize";
pub const ENQUEUE_COUNT: &str = "enqueueCount";
pub const DEQUEUE_COUNT: &str = "dequeueCount";
pub const CURSOR_PERCENT_USAGE: &str = "cursorPercentUsage";
pub const MEMORY_PERCENT_USAGE: &str = "memoryPercentUsage";
pub const INFLIGHT_COUNT: &str = "inflightCount";
pub const DEQUEUE_RATE: &str = "dequeueRate";

pub const QUEUE_STAT_FIELDS: [&str; 9] = [
    PRODUCER_COUNT,
    CONSUMER_COUNT,
    QUEUE_SIZE,
    ENQUEUE_COUNT,
    DEQUEUE_COUNT,
    CURSOR_PERCENT_USAGE,
    MEMORY_PERCENT_USAGE,
    INFLIGHT_COUNT,
    DEQUEUE_RATE,
];

// Keys owned by the view itself; a stats update never overwrites them.
const QUEUE_NAME_KEY: &str = "queueName";
const BROKER_NAME_KEY: &str = "brokerName";
const VIEW_OWNED_KEYS: [&str; 4] = [QUEUE_NAME_KEY, "brokerDetails", "deleted", "displayClass"];

// ---------- StatsMerge ----------

/// Field-by-field, in-place merge. Fields missing from `update` keep their value.
pub trait StatsMerge {
    fn merge_stats(&mut self, update: &StatFields);
}

fn merge_into(label: &mut String, stats: &mut StatFields, update: &StatFields) {
    for (key, value) in update {
        if key == BROKER_NAME_KEY {
            if let Some(name) = value.as_str() {
                *label = name.to_string();
            }
            continue;
        }
        if VIEW_OWNED_KEYS.contains(&key.as_str()) {
            tracing::trace!("Skipping view-owned field '{}' in stats update", key);
            continue;
        }
        stats.insert(key.clone(), value.clone());
    }
}

fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ---------- BrokerDetail ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerDetail {
    pub broker_name: String,
    #[serde(flatten)]
    pub stats: StatFields,
}

impl BrokerDetail {
    pub fn new(broker_name: &str) -> Self {
        Self {
            broker_name: broker_name.to_string(),
            stats: StatFields::new(),
        }
    }

    pub fn stat(&self, field: &str) -> Option<&Value> {
        self.stats.get(field)
    }
}

impl StatsMerge for BrokerDetail {
    fn merge_stats(&mut self, update: &StatFields) {
        merge_into(&mut self.broker_name, &mut self.stats, update);
    }
}

// ---------- QueueView ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueView {
    pub queue_name: String,
    pub broker_name: String,
    pub broker_details: BTreeMap<String, BrokerDetail>,
    pub deleted: bool,
    pub display_class: String,
    #[serde(flatten)]
    pub stats: StatFields,
}

impl QueueView {
    pub fn new(queue_name: &str) -> Self {
        Self {
            queue_name: queue_name.to_string(),
            broker_name: DEFAULT_BROKER_LABEL.to_string(),
            broker_details: BTreeMap::new(),
            deleted: false,
            display_class: String::new(),
            stats: StatFields::new(),
        }
    }

    pub fn stat(&self, field: &str) -> Option<&Value> {
        self.stats.get(field)
    }

    pub fn stat_i64(&self, field: &str) -> Option<i64> {
        self.stats.get(field).and_then(Value::as_i64)
    }

    /// Detail for `broker_name`, created with just the name on first reference.
    pub fn broker_detail_mut(&mut self, broker_name: &str) -> &mut BrokerDetail {
        self.broker_details
            .entry(broker_name.to_string())
            .or_insert_with(|| BrokerDetail::new(broker_name))
    }

    /// Textual form of any field, as compared by the queue filters.
    pub fn field_text(&self, field: &str) -> String {
        match field {
            QUEUE_NAME_KEY => self.queue_name.clone(),
            BROKER_NAME_KEY => self.broker_name.clone(),
            "deleted" => self.deleted.to_string(),
            "displayClass" => self.display_class.clone(),
            _ => value_text(self.stats.get(field)),
        }
    }

    /// Every field a plain-text filter may hit.
    pub fn searchable_texts(&self) -> Vec<String> {
        let mut texts = vec![self.queue_name.clone(), self.broker_name.clone()];
        texts.extend(self.stats.values().map(|v| value_text(Some(v))));
        texts
    }
}

impl StatsMerge for QueueView {
    fn merge_stats(&mut self, update: &StatFields) {
        merge_into(&mut self.broker_name, &mut self.stats, update);
    }
}
