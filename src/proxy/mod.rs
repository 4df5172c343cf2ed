//! Stateless HTTP proxy for the hosted code-generation model.
//!
//! The proxy exposes a single route, `POST /api/generate`. It attaches the
//! caller-supplied bearer credential to one outbound call against the fixed
//! upstream endpoint and relays the response or error. It keeps no state
//! across invocations and never retries.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::GenerationRequest;
use crate::core::constants::{GENERATE_ROUTE, UPSTREAM_URL};

pub struct ProxyState {
    http: reqwest::Client,
    upstream_url: String,
}

impl ProxyState {
    pub fn new(upstream_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            upstream_url: upstream_url.into(),
        }
    }
}

impl Default for ProxyState {
    fn default() -> Self {
        Self::new(UPSTREAM_URL)
    }
}

pub fn router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route(GENERATE_ROUTE, post(generate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the proxy on the given port and serves until the process exits.
pub async fn run(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(Arc::new(ProxyState::default()));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {addr}");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let message: String = message.into();
    (status, Json(json!({ "error": message }))).into_response()
}

async fn generate(
    State(state): State<Arc<ProxyState>>,
    headers: HeaderMap,
    Json(request): Json<GenerationRequest>,
) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return error_response(StatusCode::UNAUTHORIZED, "API key is required");
    };

    let upstream = state
        .http
        .post(&state.upstream_url)
        .bearer_auth(token)
        .json(&request)
        .send()
        .await;

    let response = match upstream {
        Ok(response) => response,
        Err(err) => {
            tracing::error!("upstream request failed: {err}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string());
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::error!("upstream returned {status}");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("inference service returned an error: {status}"),
        );
    }

    // Relay the upstream body unchanged.
    match response.bytes().await {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(err) => {
            tracing::error!("failed to read upstream body: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}
