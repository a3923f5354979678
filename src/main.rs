use tracing_subscriber::EnvFilter;
use amq_monitor::config::Config;
use amq_monitor::dashboard::server::start_dashboard_server;
use amq_monitor::transport::{monitor_ws_url, run_feed};
use amq_monitor::MonitorEngine;

// ========================================
// MAIN ENTRY POINT
// ========================================

#[tokio::main]
async fn main() {
    let config = Config::global();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.dashboard.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let engine = match MonitorEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("FATAL: cannot set up backend client: {}", e);
            std::process::exit(1);
        }
    };

    let ws_url = match monitor_ws_url(engine.backend.base_url()) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("FATAL: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("🚀 AMQ Monitor v0.1 Starting...");
    tracing::info!("📡 Backend: {}", engine.backend.base_url());

    if config.backend.auto_start {
        let result = engine.backend.start_monitor().await;
        engine.controller.lock().on_monitor_started(result);
    }

    let feed_controller = engine.controller.clone();
    tokio::spawn(async move {
        if let Err(e) = run_feed(&ws_url, feed_controller).await {
            tracing::warn!("[Feed] Stopped: {}", e);
        }
    });

    let dashboard = start_dashboard_server(engine.clone(), config.dashboard.host.clone(), config.dashboard.port);

    tokio::select! {
        result = dashboard => {
            if let Err(e) = result {
                tracing::error!("FATAL: dashboard server failed: {}", e);
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }
}
