pub mod types;
pub mod envelope;
pub mod queue_view_store;
pub mod broker_stats;
pub mod subscription;
pub mod requests;
pub mod filter;
pub mod controller;

pub use controller::{ColumnVisibility, ConnectionState, MonitorController};
pub use queue_view_store::QueueViewStore;
pub use broker_stats::{BrokerRegistry, BrokerStatsMerger};
pub use subscription::{BrokerTarget, QueueState, SubscriptionStateMachine};
