//! Subscriptions: queue lifecycle (Unknown -> Active -> PendingRemoval -> Unknown)
//! and the broker target syntax used by add/remove broker requests.
//!
//! Every transition is idempotent, so duplicate or out-of-order confirmations are safe.
//! `"*"` is an ordinary name here; only the backend gives it a meaning.

use std::fmt;
use serde::Serialize;
use crate::monitor::queue_view_store::QueueViewStore;

pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QueueState {
    Unknown,
    Active,
    PendingRemoval,
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueState::Unknown => write!(f, "unknown"),
            QueueState::Active => write!(f, "active"),
            QueueState::PendingRemoval => write!(f, "pending-removal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: QueueState,
    pub to: QueueState,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

pub struct SubscriptionStateMachine<'a> {
    store: &'a mut QueueViewStore,
}

impl<'a> SubscriptionStateMachine<'a> {
    pub fn new(store: &'a mut QueueViewStore) -> Self {
        Self { store }
    }

    pub fn state_of(&self, queue_name: &str) -> QueueState {
        self.store.state_of(queue_name)
    }

    /// Unknown/Active -> Active. A queue already pending removal stays pending.
    pub fn request_add(&mut self, queue_name: &str) -> Transition {
        let from = self.state_of(queue_name);
        self.store.add_queue(queue_name);
        self.transition(queue_name, from)
    }

    /// Active -> PendingRemoval. Unknown and PendingRemoval are untouched.
    pub fn request_remove(&mut self, queue_name: &str) -> Transition {
        let from = self.state_of(queue_name);
        self.store.mark_removed(queue_name);
        self.transition(queue_name, from)
    }

    /// PendingRemoval -> Unknown. Never removes an Active queue.
    pub fn confirm_removed(&mut self, queue_name: &str) -> Transition {
        let from = self.state_of(queue_name);
        self.store.reconcile_removal(queue_name);
        self.transition(queue_name, from)
    }

    fn transition(&self, queue_name: &str, from: QueueState) -> Transition {
        let transition = Transition { from, to: self.state_of(queue_name) };
        if transition.changed() {
            tracing::info!("[Subscriptions] Queue '{}': {} -> {}", queue_name, from, transition.to);
        }
        transition
    }
}

// ---------- Broker targets ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerTarget {
    pub broker_name: String,
    pub address: String,
}

impl BrokerTarget {
    pub fn new(broker_name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            broker_name: broker_name.into(),
            address: address.into(),
        }
    }

    /// `broker-name/location`, split at the first `/`. Without a `/` the whole text is
    /// the location and the broker name is the wildcard. Empty text is no target.
    pub fn parse(spec: &str) -> Option<Self> {
        if spec.is_empty() {
            return None;
        }
        match spec.split_once('/') {
            Some((name, address)) => Some(Self::new(name, address)),
            None => Some(Self::new(WILDCARD, spec)),
        }
    }
}

impl fmt::Display for BrokerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.broker_name, self.address)
    }
}
