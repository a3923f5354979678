use axum::{
    routing::{get, post, put},
    Router,
    Form,
    Json,
    response::{IntoResponse, Response},
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tower_http::compression::CompressionLayer;
use crate::monitor::subscription::BrokerTarget;
use crate::MonitorEngine;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueParams {
    pub queue_name: String,
}

#[derive(Deserialize)]
pub struct BrokerParams {
    /// `broker-name/location`
    pub spec: String,
}

#[derive(Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub query: String,
}

pub fn router(engine: MonitorEngine) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/queue", put(add_queue).delete(remove_queue))
        .route("/api/queue/{name}/reconcile", post(reconcile_queue))
        .route("/api/broker", put(add_broker).delete(remove_broker))
        .route("/api/start", post(start_monitor))
        .route("/api/filter", put(set_filter))
        .layer(CompressionLayer::new())
        .with_state(engine)
}

pub async fn start_dashboard_server(engine: MonitorEngine, host: String, port: u16) -> std::io::Result<()> {
    let app = router(engine);

    let addr = format!("{}:{}", host, port);
    tracing::info!("🌐 Dashboard api available at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}

fn state_response(engine: &MonitorEngine) -> Response {
    let snapshot = engine.controller.lock().snapshot();
    Json(snapshot).into_response()
}

async fn get_state(State(engine): State<MonitorEngine>) -> impl IntoResponse {
    state_response(&engine)
}

// The controller lock is never held across a backend call.

async fn add_queue(State(engine): State<MonitorEngine>, Form(params): Form<QueueParams>) -> Response {
    if params.queue_name.is_empty() {
        return (StatusCode::BAD_REQUEST, "queueName is required").into_response();
    }
    let result = engine.backend.add_queue(&params.queue_name).await;
    engine.controller.lock().on_queue_added(&params.queue_name, result);
    state_response(&engine)
}

async fn remove_queue(State(engine): State<MonitorEngine>, Query(params): Query<QueueParams>) -> Response {
    if params.queue_name.is_empty() {
        return (StatusCode::BAD_REQUEST, "queueName is required").into_response();
    }
    engine.controller.lock().begin_remove_queue(&params.queue_name);
    let result = engine.backend.remove_queue(&params.queue_name).await;
    engine.controller.lock().on_queue_removed(&params.queue_name, result);
    state_response(&engine)
}

async fn reconcile_queue(State(engine): State<MonitorEngine>, Path(name): Path<String>) -> Response {
    engine.controller.lock().check_remove_queue(&name);
    state_response(&engine)
}

async fn add_broker(State(engine): State<MonitorEngine>, Form(params): Form<BrokerParams>) -> Response {
    let Some(target) = BrokerTarget::parse(&params.spec) else {
        return (StatusCode::BAD_REQUEST, "spec must be broker-name/location").into_response();
    };
    let result = engine.backend.add_broker(&target).await;
    engine.controller.lock().on_broker_added(&target, result);
    state_response(&engine)
}

async fn remove_broker(State(engine): State<MonitorEngine>, Query(params): Query<BrokerParams>) -> Response {
    let Some(target) = BrokerTarget::parse(&params.spec) else {
        return (StatusCode::BAD_REQUEST, "spec must be broker-name/location").into_response();
    };
    let result = engine.backend.remove_broker(&target).await;
    engine.controller.lock().on_broker_removed(&target, result);
    state_response(&engine)
}

async fn start_monitor(State(engine): State<MonitorEngine>) -> Response {
    let result = engine.backend.start_monitor().await;
    engine.controller.lock().on_monitor_started(result);
    state_response(&engine)
}

async fn set_filter(State(engine): State<MonitorEngine>, Form(params): Form<FilterParams>) -> Response {
    let outcome = engine.controller.lock().set_destination_filter(&params.query);
    match outcome {
        Ok(()) => state_response(&engine),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}
