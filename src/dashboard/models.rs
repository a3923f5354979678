use serde::Serialize;
use crate::monitor::types::QueueView;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub uptime_seconds: u64,
    pub server_time: String,
    pub connection_state: String,
    pub note: Option<String>,
    pub last_message: String,
    pub columns: Vec<String>,
    pub queue_filter: String,
    pub brokers: Vec<BrokerSummary>,
    pub broker_names: Vec<String>,
    pub queues: Vec<QueueView>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerSummary {
    pub index: usize,
    pub broker_name: String,
    pub updated_at: String,
}
