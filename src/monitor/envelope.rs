//! Envelope: decodes `{ action, data }` messages pushed by the monitor backend

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use crate::monitor::types::StatFields;

pub const ACTION_BROKER_STATS: &str = "brokerStats";
pub const ACTION_QUEUE_STATS: &str = "queueStats";
pub const ACTION_QUEUE_ADDED: &str = "queueAdded";
pub const ACTION_QUEUE_REMOVED: &str = "queueRemoved";

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("undecodable monitor message: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// `{ brokerStats: { brokerName, .. }, queueStats?: { .. } }`, kept whole for the registry.
    BrokerStats(Value),
    QueueStats(StatFields),
    QueueAdded(Vec<String>),
    QueueRemoved(Vec<String>),
    Unknown { action: Option<String> },
}

impl MonitorEvent {
    pub fn parse(text: &str) -> Result<Self, EnvelopeError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        let envelope: RawEnvelope = match serde_json::from_value(value) {
            Ok(envelope) => envelope,
            // Not an object, or `action` is not a string
            Err(_) => return Self::Unknown { action: None },
        };

        match envelope.action.as_deref() {
            Some(ACTION_BROKER_STATS) => Self::BrokerStats(envelope.data),
            Some(ACTION_QUEUE_STATS) => match envelope.data {
                Value::Object(updates) => Self::QueueStats(updates),
                _ => Self::QueueStats(StatFields::new()),
            },
            Some(ACTION_QUEUE_ADDED) => Self::QueueAdded(queue_names(&envelope.data)),
            Some(ACTION_QUEUE_REMOVED) => Self::QueueRemoved(queue_names(&envelope.data)),
            _ => Self::Unknown { action: envelope.action },
        }
    }

    pub fn action(&self) -> &str {
        match self {
            Self::BrokerStats(_) => ACTION_BROKER_STATS,
            Self::QueueStats(_) => ACTION_QUEUE_STATS,
            Self::QueueAdded(_) => ACTION_QUEUE_ADDED,
            Self::QueueRemoved(_) => ACTION_QUEUE_REMOVED,
            Self::Unknown { action } => action.as_deref().unwrap_or(""),
        }
    }
}

/// A single name or an array of names. Anything else yields nothing.
pub fn queue_names(data: &Value) -> Vec<String> {
    match data {
        Value::String(name) => vec![name.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_each_action() {
        let event = MonitorEvent::parse(r#"{"action":"queueStats","data":{"orders":{"enqueueCount":10}}}"#).unwrap();
        match event {
            MonitorEvent::QueueStats(updates) => assert_eq!(updates["orders"]["enqueueCount"], json!(10)),
            other => panic!("unexpected event {:?}", other),
        }

        let event = MonitorEvent::parse(r#"{"action":"queueAdded","data":"orders"}"#).unwrap();
        assert_eq!(event, MonitorEvent::QueueAdded(vec!["orders".to_string()]));

        let event = MonitorEvent::parse(r#"{"action":"queueRemoved","data":["a","b",3]}"#).unwrap();
        assert_eq!(event, MonitorEvent::QueueRemoved(vec!["a".to_string(), "b".to_string()]));

        let event = MonitorEvent::parse(r#"{"action":"brokerStats","data":{"brokerStats":{"brokerName":"b1"}}}"#).unwrap();
        assert_eq!(event.action(), ACTION_BROKER_STATS);
    }

    #[test]
    fn unknown_and_partial_envelopes_do_not_fail() {
        assert_eq!(
            MonitorEvent::parse(r#"{"action":"topicStats","data":{}}"#).unwrap(),
            MonitorEvent::Unknown { action: Some("topicStats".to_string()) }
        );
        assert_eq!(MonitorEvent::parse(r#"{"data":{}}"#).unwrap(), MonitorEvent::Unknown { action: None });
        assert_eq!(MonitorEvent::parse("[1,2]").unwrap(), MonitorEvent::Unknown { action: None });
        assert_eq!(
            MonitorEvent::parse(r#"{"action":"queueStats","data":7}"#).unwrap(),
            MonitorEvent::QueueStats(StatFields::new())
        );
    }

    #[test]
    fn rejects_non_json_text() {
        assert!(MonitorEvent::parse("not json").is_err());
    }
}
