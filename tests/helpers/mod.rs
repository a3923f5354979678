#![allow(dead_code)]

use amq_monitor::config::{BackendConfig, Config, DashboardConfig};
use amq_monitor::monitor::types::StatFields;
use amq_monitor::monitor::{MonitorController, QueueViewStore};
use amq_monitor::MonitorEngine;
use serde_json::{json, Value};

pub fn setup_store() -> QueueViewStore {
    QueueViewStore::new()
}

pub fn setup_controller() -> MonitorController {
    MonitorController::default()
}

/// Engine pointed at a backend that is never contacted by the tests using it.
pub fn setup_engine() -> MonitorEngine {
    let config = Config {
        backend: BackendConfig {
            base_url: "http://127.0.0.1:9/amq-monitor/".to_string(),
            request_timeout_secs: 1,
            auto_start: false,
        },
        dashboard: DashboardConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            log_level: "error".to_string(),
            hidden_columns: "dequeueRate".to_string(),
        },
    };
    MonitorEngine::new(&config).unwrap()
}

pub fn fields(value: Value) -> StatFields {
    value.as_object().cloned().unwrap_or_default()
}

pub fn broker_stats(broker_name: &str, queue_stats: Value) -> Value {
    json!({
        "brokerStats": { "brokerName": broker_name, "uptime": "1 hour" },
        "queueStats": queue_stats,
    })
}

pub fn envelope(action: &str, data: Value) -> String {
    json!({ "action": action, "data": data }).to_string()
}

/// Engine whose backend client targets `base_url`.
pub fn setup_engine_with_backend(base_url: &str) -> MonitorEngine {
    let config = Config {
        backend: BackendConfig {
            base_url: base_url.to_string(),
            request_timeout_secs: 5,
            auto_start: false,
        },
        dashboard: DashboardConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            log_level: "error".to_string(),
            hidden_columns: String::new(),
        },
    };
    MonitorEngine::new(&config).unwrap()
}
