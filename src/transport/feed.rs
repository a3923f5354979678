//! Stats Feed: websocket connection that pushes monitor events into the controller

use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;
use crate::transport::TransportError;
use crate::SharedController;

pub const MONITOR_WS_PATH: &str = "ws/monitor";

/// `ws://` (or `wss://` for https) next to the dashboard page, at `ws/monitor`.
pub fn monitor_ws_url(base: &Url) -> Result<Url, TransportError> {
    let mut url = base.join(MONITOR_WS_PATH)?;
    let scheme = match base.scheme() {
        "https" => "wss",
        "http" => "ws",
        other => return Err(TransportError::Scheme(other.to_string())),
    };
    url.set_scheme(scheme)
        .map_err(|_| TransportError::Scheme(base.to_string()))?;
    Ok(url)
}

/// Runs until the socket closes or fails. There is no reconnect.
pub async fn run_feed(url: &Url, controller: SharedController) -> Result<(), TransportError> {
    let (mut ws, _) = match connect_async(url.as_str()).await {
        Ok(connected) => connected,
        Err(e) => {
            tracing::warn!("[Feed] Cannot connect to {}: {}", url, e);
            let mut ctl = controller.lock();
            ctl.on_transport_error();
            ctl.on_disconnected();
            return Err(e.into());
        }
    };

    tracing::info!("[Feed] Connected to {}", url);
    controller.lock().on_connected();

    let mut outcome = Ok(());
    while let Some(frame) = ws.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                controller.lock().handle_message(&text);
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("[Feed] Socket error: {}", e);
                controller.lock().on_transport_error();
                outcome = Err(e.into());
                break;
            }
        }
    }

    tracing::info!("[Feed] Disconnected from {}", url);
    controller.lock().on_disconnected();
    outcome
}
