//! Monitor Controller: owns the view model and applies inbound events and request completions.
//!
//! All mutation happens through `&mut self`; callers serialize access (one event at a time).

use std::collections::BTreeSet;
use std::fmt;
use std::time::Instant;
use crate::dashboard::models::{BrokerSummary, DashboardSnapshot};
use crate::monitor::broker_stats::BrokerStatsMerger;
use crate::monitor::envelope::MonitorEvent;
use crate::monitor::filter::{unique_by, DestinationQuery, FilterError};
use crate::monitor::queue_view_store::QueueViewStore;
use crate::monitor::subscription::{BrokerTarget, QueueState, SubscriptionStateMachine};
use crate::monitor::types::{QueueView, QUEUE_STAT_FIELDS};

pub const INITIAL_DEBUG_LOG: &str = "Start of debug log. ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Initializing,
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Initializing => write!(f, "monitor initializing"),
            ConnectionState::Connected => write!(f, "monitor connected"),
            ConnectionState::Disconnected => write!(f, "monitor disconnected"),
        }
    }
}

// ---------- Columns ----------

/// Which of the well-known stat columns the dashboard shows. All shown by default.
#[derive(Debug, Clone, Default)]
pub struct ColumnVisibility {
    hidden: BTreeSet<String>,
}

impl ColumnVisibility {
    /// From a comma separated list of hidden field names.
    pub fn from_hidden_list(list: &str) -> Self {
        Self {
            hidden: list
                .split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn is_visible(&self, field: &str) -> bool {
        !self.hidden.contains(field)
    }

    pub fn set_visible(&mut self, field: &str, visible: bool) {
        if visible {
            self.hidden.remove(field);
        } else {
            self.hidden.insert(field.to_string());
        }
    }

    pub fn visible_columns(&self) -> Vec<&'static str> {
        QUEUE_STAT_FIELDS
            .iter()
            .copied()
            .filter(|field| self.is_visible(field))
            .collect()
    }
}

// ---------- Controller ----------

pub struct MonitorController {
    store: QueueViewStore,
    brokers: BrokerStatsMerger,
    connection_state: ConnectionState,
    note: Option<String>,
    last_message: String,
    columns: ColumnVisibility,
    query_text: String,
    query: DestinationQuery,
    started_at: Instant,
}

impl MonitorController {
    pub fn new(columns: ColumnVisibility) -> Self {
        Self {
            store: QueueViewStore::new(),
            brokers: BrokerStatsMerger::new(),
            connection_state: ConnectionState::Initializing,
            note: None,
            last_message: INITIAL_DEBUG_LOG.to_string(),
            columns,
            query_text: String::new(),
            query: DestinationQuery::default(),
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &QueueViewStore {
        &self.store
    }

    pub fn brokers(&self) -> &BrokerStatsMerger {
        &self.brokers
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection_state
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    pub fn columns_mut(&mut self) -> &mut ColumnVisibility {
        &mut self.columns
    }

    pub fn queue_state(&self, queue_name: &str) -> QueueState {
        self.store.state_of(queue_name)
    }

    // ========================================
    // INBOUND FEED
    // ========================================

    /// Decodes and applies one raw feed message. Undecodable text is logged and dropped.
    pub fn handle_message(&mut self, text: &str) {
        match MonitorEvent::parse(text) {
            Ok(event) => self.apply_event(event),
            Err(e) => tracing::debug!("[Controller] Ignoring message: {}", e),
        }
        self.last_message = text.to_string();
    }

    pub fn apply_event(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::BrokerStats(payload) => {
                if self.brokers.apply_broker_stats(&self.store, &payload).is_none() {
                    tracing::debug!("[Controller] brokerStats without a broker name ignored");
                }
            }
            MonitorEvent::QueueStats(updates) => self.store.merge_queue_stats(&updates),
            MonitorEvent::QueueAdded(names) => {
                let mut subs = SubscriptionStateMachine::new(&mut self.store);
                for name in &names {
                    subs.request_add(name);
                }
            }
            MonitorEvent::QueueRemoved(names) => {
                let mut subs = SubscriptionStateMachine::new(&mut self.store);
                for name in &names {
                    subs.request_remove(name);
                }
            }
            MonitorEvent::Unknown { action } => {
                tracing::debug!("[Controller] Unknown action {:?} ignored", action);
            }
        }
    }

    pub fn on_connected(&mut self) {
        self.connection_state = ConnectionState::Connected;
    }

    pub fn on_disconnected(&mut self) {
        self.connection_state = ConnectionState::Disconnected;
    }

    pub fn on_transport_error(&mut self) {
        self.set_note("websocket error".to_string());
    }

    // ========================================
    // REQUEST COMPLETIONS
    // ========================================

    pub fn on_broker_added<E: fmt::Display>(&mut self, target: &BrokerTarget, result: Result<(), E>) {
        match result {
            Ok(()) => self.set_note(format!("added broker {}", target)),
            Err(e) => {
                tracing::warn!("[Controller] Add broker {} failed: {}", target, e);
                self.set_note(format!("error adding broker {}", target));
            }
        }
    }

    pub fn on_broker_removed<E: fmt::Display>(&mut self, target: &BrokerTarget, result: Result<(), E>) {
        match result {
            Ok(()) => self.set_note(format!("removed broker {}", target)),
            Err(e) => {
                tracing::warn!("[Controller] Remove broker {} failed: {}", target, e);
                self.set_note(format!("error on remove broker {}", target));
            }
        }
    }

    /// Lists every queue name the backend reports as added.
    pub fn on_queue_added<E: fmt::Display>(&mut self, requested: &str, result: Result<Vec<String>, E>) {
        match result {
            Ok(added) => {
                self.set_note(format!("added queue {}", requested));
                let mut subs = SubscriptionStateMachine::new(&mut self.store);
                for name in &added {
                    subs.request_add(name);
                }
            }
            Err(e) => {
                tracing::warn!("[Controller] Add queue '{}' failed: {}", requested, e);
                self.set_note(format!("error adding queue {}", requested));
            }
        }
    }

    /// Optimistic local removal, applied when the request is submitted.
    pub fn begin_remove_queue(&mut self, queue_name: &str) {
        SubscriptionStateMachine::new(&mut self.store).request_remove(queue_name);
    }

    /// Marks every queue name the backend reports as removed. The views stay listed,
    /// pending removal, until `check_remove_queue`.
    pub fn on_queue_removed<E: fmt::Display>(&mut self, requested: &str, result: Result<Vec<String>, E>) {
        match result {
            Ok(removed) => {
                self.set_note(format!("removed queue {}", requested));
                let mut subs = SubscriptionStateMachine::new(&mut self.store);
                for name in &removed {
                    subs.request_remove(name);
                }
            }
            Err(e) => {
                tracing::warn!("[Controller] Remove queue '{}' failed: {}", requested, e);
                self.set_note(format!("error on remove queue {}", requested));
            }
        }
    }

    pub fn on_monitor_started<E: fmt::Display>(&mut self, result: Result<(), E>) {
        match result {
            Ok(()) => self.set_note("monitor started".to_string()),
            Err(e) => {
                tracing::warn!("[Controller] Start monitor failed: {}", e);
                self.set_note("failed to start monitor".to_string());
            }
        }
    }

    /// Acknowledges a pending removal and drops the view. Active queues are kept.
    pub fn check_remove_queue(&mut self, queue_name: &str) -> QueueState {
        SubscriptionStateMachine::new(&mut self.store).confirm_removed(queue_name).to
    }

    // ========================================
    // VIEW
    // ========================================

    pub fn set_destination_filter(&mut self, query: &str) -> Result<(), FilterError> {
        let parsed = DestinationQuery::parse(query)?;
        self.query = parsed;
        self.query_text = query.trim().to_string();
        Ok(())
    }

    pub fn visible_queues(&self) -> Vec<QueueView> {
        self.store
            .display_list()
            .iter()
            .filter_map(|handle| {
                let view = handle.read();
                self.query.matches(&view).then(|| view.clone())
            })
            .collect()
    }

    /// Distinct broker names seen in any queue's broker details, in display order.
    pub fn broker_names(&self) -> Vec<String> {
        let names = self
            .store
            .display_list()
            .iter()
            .flat_map(|handle| handle.read().broker_details.keys().cloned().collect::<Vec<_>>());
        unique_by(names, |name| name.clone())
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            uptime_seconds: self.started_at.elapsed().as_secs(),
            server_time: chrono::Utc::now().to_rfc3339(),
            connection_state: self.connection_state.to_string(),
            note: self.note.clone(),
            last_message: self.last_message.clone(),
            columns: self.columns.visible_columns().into_iter().map(str::to_string).collect(),
            queue_filter: self.query_text.clone(),
            brokers: self
                .brokers
                .registry()
                .records()
                .iter()
                .enumerate()
                .map(|(index, record)| BrokerSummary {
                    index,
                    broker_name: record.broker_name.clone(),
                    updated_at: record.updated_at.to_rfc3339(),
                })
                .collect(),
            broker_names: self.broker_names(),
            queues: self.visible_queues(),
        }
    }

    fn set_note(&mut self, note: String) {
        tracing::info!("[Controller] {}", note);
        self.note = Some(note);
    }
}

impl Default for MonitorController {
    fn default() -> Self {
        Self::new(ColumnVisibility::default())
    }
}
