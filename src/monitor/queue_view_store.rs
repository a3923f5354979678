//! Queue View Store: one view per queue name, merged in place, listed in first-seen order

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use serde_json::Value;
use crate::monitor::subscription::QueueState;
use crate::monitor::types::{QueueHandle, QueueView, StatFields, StatsMerge, PENDING_REMOVAL_CLASS};

pub struct QueueViewStore {
    /// Lookup by name
    queues: HashMap<String, QueueHandle>,
    /// Display order. Holds the same handles as `queues`, never copies.
    display: Vec<QueueHandle>,
}

impl QueueViewStore {
    pub fn new() -> Self {
        Self {
            queues: HashMap::new(),
            display: Vec::new(),
        }
    }

    /// Returns the existing view, or creates and lists a fresh one.
    pub fn add_queue(&mut self, queue_name: &str) -> QueueHandle {
        if let Some(existing) = self.queues.get(queue_name) {
            return Arc::clone(existing);
        }

        let handle: QueueHandle = Arc::new(RwLock::new(QueueView::new(queue_name)));
        self.display.push(Arc::clone(&handle));
        self.queues.insert(queue_name.to_string(), Arc::clone(&handle));
        tracing::debug!("[QueueViewStore] Added queue '{}'", queue_name);
        handle
    }

    /// Folds `{ queueName: { field: value, .. }, .. }` into the views, creating unseen queues.
    pub fn merge_queue_stats(&mut self, updates: &StatFields) {
        for (queue_name, update) in updates {
            let handle = self.add_queue(queue_name);
            if let Value::Object(fields) = update {
                handle.write().merge_stats(fields);
            }
        }
    }

    /// Soft delete: the view stays listed until `reconcile_removal`.
    pub fn mark_removed(&mut self, queue_name: &str) -> bool {
        let Some(handle) = self.queues.get(queue_name) else {
            return false;
        };
        let mut view = handle.write();
        view.deleted = true;
        view.display_class = PENDING_REMOVAL_CLASS.to_string();
        true
    }

    /// Drops a view previously marked removed. Active views are left alone.
    pub fn reconcile_removal(&mut self, queue_name: &str) -> bool {
        let Some(handle) = self.queues.get(queue_name) else {
            return false;
        };
        if !handle.read().deleted {
            return false;
        }

        let handle = Arc::clone(handle);
        handle.write().display_class.clear();
        self.queues.remove(queue_name);
        if let Some(pos) = self.display.iter().position(|listed| Arc::ptr_eq(listed, &handle)) {
            self.display.remove(pos);
        }
        tracing::debug!("[QueueViewStore] Removed queue '{}'", queue_name);
        true
    }

    pub fn get(&self, queue_name: &str) -> Option<QueueHandle> {
        self.queues.get(queue_name).cloned()
    }

    pub fn state_of(&self, queue_name: &str) -> QueueState {
        match self.queues.get(queue_name) {
            None => QueueState::Unknown,
            Some(handle) if handle.read().deleted => QueueState::PendingRemoval,
            Some(_) => QueueState::Active,
        }
    }

    pub fn contains(&self, queue_name: &str) -> bool {
        self.queues.contains_key(queue_name)
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub fn display_list(&self) -> &[QueueHandle] {
        &self.display
    }

    /// Copies of every view, in display order.
    pub fn snapshot(&self) -> Vec<QueueView> {
        self.display.iter().map(|handle| handle.read().clone()).collect()
    }
}

impl Default for QueueViewStore {
    fn default() -> Self {
        Self::new()
    }
}
