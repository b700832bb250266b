//! HTTP client for the answer-generation service
//!
//! Every call resolves to a decoded response or a single [`ErrorKind`];
//! transport errors never escape this module. Nothing is retried.

use async_trait::async_trait;
use reqwest::StatusCode;
use scholar_core::logging::performance::measure_async;
use scholar_core::{
    ApiConfig, ChatBackend, ChatRequest, ChatResponse, ErrorBody, ErrorContext,
    ErrorKind, HealthStatus, ScholarError, ScholarResult,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Request layer backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpChatClient {
    /// Create a new client for the configured backend
    pub fn new(config: &ApiConfig) -> ScholarResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }

        let client = builder.build().map_err(|e| ScholarError::Config {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("create_client"),
        })?;

        info!("Created chat client for {}", config.base_url);

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Query the backend's health endpoint
    pub async fn health(&self) -> Result<HealthStatus, ErrorKind> {
        let url = self.config.health_endpoint();
        debug!("Checking backend health at {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_failure("health", &e))?;

        decode_success(response, "health").await
    }
}

#[async_trait]
impl ChatBackend for HttpChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ErrorKind> {
        let url = self.config.chat_endpoint();
        debug!(
            endpoint = %url,
            conversation_id = %request.conversation_id,
            "Sending chat request"
        );

        let pending = self.client.post(&url).json(request).send();
        let response = measure_async("chat_request", pending)
            .await
            .map_err(|e| transport_failure("chat", &e))?;

        decode_success(response, "chat").await
    }
}

fn transport_failure(operation: &str, error: &reqwest::Error) -> ErrorKind {
    warn!(
        operation = operation,
        kind = ErrorKind::NetworkError.code(),
        error = %error,
        "No response from backend"
    );
    ErrorKind::NetworkError
}

/// Classify the status, then decode a 2xx body
async fn decode_success<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> Result<T, ErrorKind> {
    let status = response.status();

    if !status.is_success() {
        let kind = ErrorKind::from_status(status.as_u16());
        warn!(
            operation = operation,
            kind = kind.code(),
            status = status.as_u16(),
            "Backend returned an error status"
        );
        log_error_body(response, status).await;
        return Err(kind);
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| transport_failure(operation, &e))?;

    serde_json::from_slice(&body).map_err(|e| {
        warn!(
            operation = operation,
            kind = ErrorKind::ApiError.code(),
            error = %e,
            "Failed to decode backend response"
        );
        ErrorKind::ApiError
    })
}

/// Failure bodies are optional and may be malformed; only log what parses
async fn log_error_body(response: reqwest::Response, status: StatusCode) {
    let Ok(bytes) = response.bytes().await else {
        return;
    };

    if let Ok(body) = serde_json::from_slice::<ErrorBody>(&bytes) {
        debug!(
            status = status.as_u16(),
            error = body.error.as_deref().unwrap_or_default(),
            detail = body.detail.as_deref().unwrap_or_default(),
            "Backend error body"
        );
    }
}
