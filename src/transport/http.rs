//! HTTP Backend: executes `MonitorRequest`s against the monitor REST api

use std::time::Duration;
use reqwest::header::ACCEPT;
use url::Url;
use crate::monitor::requests::{MonitorRequest, ParamEncoding, RequestMethod};
use crate::monitor::subscription::BrokerTarget;
use crate::transport::TransportError;

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, TransportError> {
        let mut base_url = Url::parse(base_url)?;
        // Request paths are relative; keep the last segment as a directory
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, request: &MonitorRequest) -> Result<Url, TransportError> {
        Ok(self.base_url.join(request.path())?)
    }

    /// Sends the request. Queue requests return the affected queue names, others an empty list.
    pub async fn execute(&self, request: &MonitorRequest) -> Result<Vec<String>, TransportError> {
        let url = self.endpoint(request)?;
        let params = request.params();
        tracing::info!("[HttpBackend] {:?} {}", request.method(), url);

        let builder = match request.method() {
            RequestMethod::Get => self.client.get(url),
            RequestMethod::Put => self.client.put(url),
            RequestMethod::Delete => self.client.delete(url),
        };
        let builder = match request.encoding() {
            ParamEncoding::Form => builder.form(&params),
            ParamEncoding::Query => builder.query(&params),
            ParamEncoding::None => builder,
        };

        let response = builder.header(ACCEPT, "application/json").send().await?;
        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }

        if !request.expects_queue_names() {
            return Ok(Vec::new());
        }
        let body = response.bytes().await?;
        decode_queue_names(&body)
    }

    pub async fn add_broker(&self, target: &BrokerTarget) -> Result<(), TransportError> {
        self.execute(&MonitorRequest::AddBroker(target.clone())).await.map(|_| ())
    }

    pub async fn remove_broker(&self, target: &BrokerTarget) -> Result<(), TransportError> {
        self.execute(&MonitorRequest::RemoveBroker(target.clone())).await.map(|_| ())
    }

    pub async fn add_queue(&self, queue_name: &str) -> Result<Vec<String>, TransportError> {
        self.execute(&MonitorRequest::AddQueue { queue_name: queue_name.to_string() }).await
    }

    pub async fn remove_queue(&self, queue_name: &str) -> Result<Vec<String>, TransportError> {
        self.execute(&MonitorRequest::RemoveQueue { queue_name: queue_name.to_string() }).await
    }

    pub async fn start_monitor(&self) -> Result<(), TransportError> {
        self.execute(&MonitorRequest::StartMonitor).await.map(|_| ())
    }
}

/// JSON array of names. A success without a body affects no queues.
pub fn decode_queue_names(body: &[u8]) -> Result<Vec<String>, TransportError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(body)?)
}
