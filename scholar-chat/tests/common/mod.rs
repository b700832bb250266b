//! Test helpers: a scripted answer-generation backend on a local port

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use scholar_core::ApiConfig;
use serde_json::Value;
use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

// Make sure tracing is only initialized once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

/// A request the fake backend received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Running fake backend
pub struct TestBackend {
    pub address: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestBackend {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(&self.address)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Spawn a backend that answers every call with `status` and `body`
pub async fn spawn_backend(status: u16, body: &str) -> TestBackend {
    spawn_backend_with_delay(status, body, None).await
}

pub async fn spawn_backend_with_delay(
    status: u16,
    body: &str,
    delay: Option<Duration>,
) -> TestBackend {
    LazyLock::force(&TRACING);

    let requests = Arc::new(Mutex::new(Vec::new()));
    let reply = Reply {
        status: StatusCode::from_u16(status).expect("valid status code"),
        body: body.to_string(),
        delay,
        requests: Arc::clone(&requests),
    };

    let app = Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health))
        .with_state(reply);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test backend crashed");
    });

    TestBackend {
        address: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

/// Base URL of a port nothing listens on
pub fn unreachable_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

async fn chat(
    State(reply): State<Reply>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    reply.requests.lock().unwrap().push(RecordedRequest {
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    (reply.status, [(CONTENT_TYPE, "application/json")], reply.body)
}

async fn health(State(reply): State<Reply>) -> impl IntoResponse {
    (reply.status, [(CONTENT_TYPE, "application/json")], reply.body)
}
