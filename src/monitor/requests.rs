//! Outbound requests: shape of the add/remove/start calls made to the monitor backend

use crate::monitor::subscription::BrokerTarget;

pub const BROKER_PATH: &str = "api/monitor/broker/";
pub const QUEUE_PATH: &str = "api/monitor/queue";
pub const START_PATH: &str = "api/monitor/start";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Put,
    Delete,
}

/// Where `params()` travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamEncoding {
    None,
    Form,
    Query,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorRequest {
    AddBroker(BrokerTarget),
    RemoveBroker(BrokerTarget),
    AddQueue { queue_name: String },
    RemoveQueue { queue_name: String },
    StartMonitor,
}

impl MonitorRequest {
    pub fn method(&self) -> RequestMethod {
        match self {
            Self::AddBroker(_) | Self::AddQueue { .. } => RequestMethod::Put,
            Self::RemoveBroker(_) | Self::RemoveQueue { .. } => RequestMethod::Delete,
            Self::StartMonitor => RequestMethod::Get,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::AddBroker(_) | Self::RemoveBroker(_) => BROKER_PATH,
            Self::AddQueue { .. } | Self::RemoveQueue { .. } => QUEUE_PATH,
            Self::StartMonitor => START_PATH,
        }
    }

    pub fn encoding(&self) -> ParamEncoding {
        match self.method() {
            RequestMethod::Put => ParamEncoding::Form,
            RequestMethod::Delete => ParamEncoding::Query,
            RequestMethod::Get => ParamEncoding::None,
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::AddBroker(target) | Self::RemoveBroker(target) => vec![
                ("brokerName", target.broker_name.clone()),
                ("address", target.address.clone()),
            ],
            Self::AddQueue { queue_name } | Self::RemoveQueue { queue_name } => {
                vec![("queueName", queue_name.clone())]
            }
            Self::StartMonitor => Vec::new(),
        }
    }

    /// Add/remove queue answer with the JSON array of affected queue names.
    pub fn expects_queue_names(&self) -> bool {
        matches!(self, Self::AddQueue { .. } | Self::RemoveQueue { .. })
    }
}
