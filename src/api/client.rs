use async_trait::async_trait;
use serde_json::Value;

use crate::api::{extract_generated_text, ErrorBody, GenerateError, GenerationRequest, TextGenerator};
use crate::core::constants::GENERATE_ROUTE;

/// HTTP client for the local generate proxy.
pub struct ProxyClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Self {
        // Trailing slashes on the configured base would produce `//api/...`.
        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), GENERATE_ROUTE);
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for ProxyClient {
    async fn generate(&self, inputs: &str, token: &str) -> Result<String, GenerateError> {
        let request = GenerationRequest {
            inputs: inputs.to_string(),
        };
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(GenerateError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
            };
            return Err(GenerateError::Upstream { status, message });
        }

        let body: Value = response.json().await.map_err(|_| GenerateError::Shape)?;
        extract_generated_text(&body)
            .map(str::to_owned)
            .ok_or(GenerateError::Shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;
    use std::net::SocketAddr;

    async fn spawn_server(app: Router) -> SocketAddr {
        let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
            .serve(app.into_make_service());
        let addr = server.local_addr();
        tokio::spawn(server);
        addr
    }

    fn client_for(addr: SocketAddr) -> ProxyClient {
        ProxyClient::new(&format!("http://{addr}"))
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = ProxyClient::new("http://localhost:3000/");
        assert_eq!(client.endpoint(), "http://localhost:3000/api/generate");
    }

    #[tokio::test]
    async fn returns_generated_text_on_success() {
        let app = Router::new().route(
            GENERATE_ROUTE,
            post(|| async { Json(json!([{"generated_text": "def f(): pass"}])) }),
        );
        let addr = spawn_server(app).await;

        let text = client_for(addr)
            .generate("write f", "hf_token")
            .await
            .unwrap();
        assert_eq!(text, "def f(): pass");
    }

    #[tokio::test]
    async fn forwards_payload_and_bearer_token() {
        let app = Router::new().route(
            GENERATE_ROUTE,
            post(
                |headers: axum::http::HeaderMap, Json(request): Json<GenerationRequest>| async move {
                    assert_eq!(
                        headers
                            .get(axum::http::header::AUTHORIZATION)
                            .and_then(|v| v.to_str().ok()),
                        Some("Bearer hf_token")
                    );
                    assert_eq!(request.inputs, "write f");
                    Json(json!([{"generated_text": "ok"}]))
                },
            ),
        );
        let addr = spawn_server(app).await;

        client_for(addr).generate("write f", "hf_token").await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_an_upstream_error() {
        let app = Router::new().route(
            GENERATE_ROUTE,
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "inference service returned an error: 503 Service Unavailable"})),
                )
            }),
        );
        let addr = spawn_server(app).await;

        let err = client_for(addr)
            .generate("write f", "hf_token")
            .await
            .unwrap_err();
        match err {
            GenerateError::Upstream { status, message } => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
                assert!(message.contains("Service Unavailable"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_shape_error() {
        let app = Router::new().route(
            GENERATE_ROUTE,
            post(|| async { Json(json!({"unexpected": true})) }),
        );
        let addr = spawn_server(app).await;

        let err = client_for(addr)
            .generate("write f", "hf_token")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Shape));
    }

    #[tokio::test]
    async fn unreachable_proxy_is_a_network_error() {
        // Port 1 should refuse connections.
        let client = ProxyClient::new("http://127.0.0.1:1");
        let err = client.generate("write f", "hf_token").await.unwrap_err();
        assert!(matches!(err, GenerateError::Network(_)));
    }
}
