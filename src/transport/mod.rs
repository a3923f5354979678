//! Transport: the HTTP backend client and the websocket stats feed

use thiserror::Error;

pub mod feed;
pub mod http;

pub use feed::{monitor_ws_url, run_feed};
pub use http::HttpBackend;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),
    #[error("cannot derive a websocket url from '{0}'")]
    Scheme(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("undecodable backend response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend answered HTTP {0}")]
    Status(u16),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}
