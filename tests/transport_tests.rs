use amq_monitor::dashboard::server::router;
use amq_monitor::monitor::{BrokerTarget, ConnectionState, MonitorController, QueueState};
use amq_monitor::transport::{run_feed, HttpBackend, TransportError};
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, Method, Request, StatusCode};
use axum::routing::{get, put};
use axum::{Form, Json, Router};
use parking_lot::Mutex;
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceExt;
use url::Url;

mod helpers;
use helpers::setup_engine_with_backend;

// =========================================================================================
// FAKE MONITOR BACKEND
// =========================================================================================

/// Every request the fake backend saw, as `method:encoding:params`.
type Received = Arc<Mutex<Vec<String>>>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueueParams {
    queue_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrokerParams {
    broker_name: String,
    address: String,
}

async fn put_queue(State(received): State<Received>, Form(params): Form<QueueParams>) -> Json<Vec<String>> {
    received.lock().push(format!("put:form:{}", params.queue_name));
    if params.queue_name == "*" {
        Json(vec!["orders".to_string(), "billing".to_string()])
    } else {
        Json(vec![params.queue_name])
    }
}

async fn delete_queue(State(received): State<Received>, Query(params): Query<QueueParams>) -> Json<Vec<String>> {
    received.lock().push(format!("delete:query:{}", params.queue_name));
    Json(vec![params.queue_name])
}

async fn put_broker(State(received): State<Received>, Form(params): Form<BrokerParams>) -> StatusCode {
    received.lock().push(format!("put:form:{}/{}", params.broker_name, params.address));
    if params.broker_name == "main" {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

async fn delete_broker(State(received): State<Received>, Query(params): Query<BrokerParams>) -> StatusCode {
    received.lock().push(format!("delete:query:{}/{}", params.broker_name, params.address));
    StatusCode::OK
}

async fn start() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Starts the fake backend on an ephemeral port and returns its base url.
async fn spawn_backend() -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/amq-monitor/api/monitor/queue", put(put_queue).delete(delete_queue))
        .route("/amq-monitor/api/monitor/broker/", put(put_broker).delete(delete_broker))
        .route("/amq-monitor/api/monitor/start", get(start))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/amq-monitor/", addr), received)
}

fn form_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[cfg(test)]
mod transport_tests {
    use super::*;

    // =========================================================================================
    // 1. HTTP BACKEND CLIENT
    // =========================================================================================

    mod backend {
        use super::*;

        #[tokio::test]
        async fn test_queue_requests_use_form_and_query() {
            let (base, received) = spawn_backend().await;
            let backend = HttpBackend::new(&base, 5).unwrap();

            let added = backend.add_queue("a b").await.unwrap();
            assert_eq!(added, vec!["a b".to_string()]);

            let removed = backend.remove_queue("x&y").await.unwrap();
            assert_eq!(removed, vec!["x&y".to_string()]);

            assert_eq!(
                *received.lock(),
                vec!["put:form:a b".to_string(), "delete:query:x&y".to_string()]
            );
        }

        #[tokio::test]
        async fn test_broker_requests_carry_name_and_address() {
            let (base, received) = spawn_backend().await;
            let backend = HttpBackend::new(&base, 5).unwrap();

            backend.add_broker(&BrokerTarget::new("main", "host:1099")).await.unwrap();
            backend.remove_broker(&BrokerTarget::new("*", "host:1099")).await.unwrap();

            assert_eq!(
                *received.lock(),
                vec!["put:form:main/host:1099".to_string(), "delete:query:*/host:1099".to_string()]
            );
        }

        #[tokio::test]
        async fn test_non_success_status_is_an_error() {
            let (base, _received) = spawn_backend().await;
            let backend = HttpBackend::new(&base, 5).unwrap();

            let outcome = backend.start_monitor().await;
            assert!(matches!(outcome, Err(TransportError::Status(500))), "got {:?}", outcome);

            let outcome = backend.add_broker(&BrokerTarget::new("other", "host")).await;
            assert!(matches!(outcome, Err(TransportError::Status(500))));
        }
    }

    // =========================================================================================
    // 2. DASHBOARD API THROUGH THE BACKEND
    // =========================================================================================

    mod api {
        use super::*;

        #[tokio::test]
        async fn test_add_and_remove_queue_routes() {
            let (base, _received) = spawn_backend().await;
            let engine = setup_engine_with_backend(&base);

            let response = router(engine.clone())
                .oneshot(form_request(Method::PUT, "/api/queue", "queueName=*"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            {
                let ctl = engine.controller.lock();
                assert_eq!(ctl.note(), Some("added queue *"));
                assert_eq!(ctl.queue_state("orders"), QueueState::Active);
                assert_eq!(ctl.queue_state("billing"), QueueState::Active);
                assert_eq!(ctl.queue_state("*"), QueueState::Unknown);
            }

            let response = router(engine.clone())
                .oneshot(
                    Request::builder()
                        .method(Method::DELETE)
                        .uri("/api/queue?queueName=orders")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let ctl = engine.controller.lock();
            assert_eq!(ctl.note(), Some("removed queue orders"));
            assert_eq!(ctl.queue_state("orders"), QueueState::PendingRemoval);
            assert_eq!(ctl.queue_state("billing"), QueueState::Active);
        }

        #[tokio::test]
        async fn test_backend_failures_become_notes() {
            let (base, _received) = spawn_backend().await;
            let engine = setup_engine_with_backend(&base);

            router(engine.clone())
                .oneshot(form_request(Method::PUT, "/api/broker", "spec=other/host:1099"))
                .await
                .unwrap();
            assert_eq!(engine.controller.lock().note(), Some("error adding broker other/host:1099"));

            router(engine.clone())
                .oneshot(form_request(Method::PUT, "/api/broker", "spec=main/host:1099"))
                .await
                .unwrap();
            assert_eq!(engine.controller.lock().note(), Some("added broker main/host:1099"));

            router(engine.clone())
                .oneshot(
                    Request::builder()
                        .method(Method::DELETE)
                        .uri("/api/broker?spec=main%2Fhost%3A1099")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(engine.controller.lock().note(), Some("removed broker main/host:1099"));

            router(engine.clone())
                .oneshot(Request::builder().method(Method::POST).uri("/api/start").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(engine.controller.lock().note(), Some("failed to start monitor"));
        }

        #[tokio::test]
        async fn test_unreachable_backend_keeps_optimistic_removal() {
            let engine = setup_engine_with_backend("http://127.0.0.1:9/amq-monitor/");
            engine
                .controller
                .lock()
                .handle_message(r#"{"action":"queueAdded","data":"orders"}"#);

            router(engine.clone())
                .oneshot(
                    Request::builder()
                        .method(Method::DELETE)
                        .uri("/api/queue?queueName=orders")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            let ctl = engine.controller.lock();
            assert_eq!(ctl.note(), Some("error on remove queue orders"));
            assert_eq!(ctl.queue_state("orders"), QueueState::PendingRemoval);
        }
    }

    // =========================================================================================
    // 3. WEBSOCKET FEED
    // =========================================================================================

    mod feed {
        use super::*;

        #[tokio::test]
        async fn test_failed_connect_reports_disconnected() {
            let controller = Arc::new(Mutex::new(MonitorController::default()));
            let url = Url::parse("ws://127.0.0.1:9/amq-monitor/ws/monitor").unwrap();

            let outcome = run_feed(&url, controller.clone()).await;

            assert!(outcome.is_err());
            let ctl = controller.lock();
            assert_eq!(ctl.connection_state(), ConnectionState::Disconnected);
            assert_eq!(ctl.note(), Some("websocket error"));
        }
    }
}
