use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt;

/// The only payload shape sent to the inference service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub inputs: String,
}

/// Error body returned by the proxy for every failure mode.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Pulls the generated text out of an upstream response body.
///
/// The inference service replies with a JSON array whose first element
/// carries a `generated_text` field. Anything else is treated as a malformed
/// response.
pub fn extract_generated_text(body: &Value) -> Option<&str> {
    body.pointer("/0/generated_text").and_then(Value::as_str)
}

/// Failure modes of a single generate attempt.
///
/// The session reports all of these uniformly to the user; the distinction
/// only matters for the notice text and for tests.
#[derive(Debug)]
pub enum GenerateError {
    /// No credential was available at submission time.
    MissingCredential,
    /// The request never produced an HTTP response.
    Network(reqwest::Error),
    /// The proxy (or the service behind it) answered with a non-success status.
    Upstream {
        status: reqwest::StatusCode,
        message: String,
    },
    /// The response arrived but the generated text could not be extracted.
    Shape,
    /// The configured deadline elapsed before the request resolved.
    TimedOut,
    /// The caller canceled the attempt.
    Canceled,
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::MissingCredential => write!(f, "no API token is configured"),
            GenerateError::Network(err) => write!(f, "request failed: {err}"),
            GenerateError::Upstream { status, message } => {
                write!(f, "inference service returned an error ({status}): {message}")
            }
            GenerateError::Shape => write!(f, "unexpected response shape from inference service"),
            GenerateError::TimedOut => write!(f, "request timed out"),
            GenerateError::Canceled => write!(f, "request canceled"),
        }
    }
}

impl Error for GenerateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GenerateError::Network(err) => Some(err),
            _ => None,
        }
    }
}

/// Seam between the session and whatever produces generated text. The real
/// implementation is [`client::ProxyClient`]; tests substitute stubs.
#[async_trait]
pub trait TextGenerator {
    async fn generate(&self, inputs: &str, token: &str) -> Result<String, GenerateError>;
}

pub mod client;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_text_from_first_element() {
        let body = json!([{"generated_text": "def f(): pass"}]);
        assert_eq!(extract_generated_text(&body), Some("def f(): pass"));
    }

    #[test]
    fn later_elements_are_ignored() {
        let body = json!([
            {"generated_text": "first"},
            {"generated_text": "second"}
        ]);
        assert_eq!(extract_generated_text(&body), Some("first"));
    }

    #[test]
    fn rejects_unexpected_shapes() {
        assert_eq!(extract_generated_text(&json!([])), None);
        assert_eq!(extract_generated_text(&json!({"generated_text": "x"})), None);
        assert_eq!(extract_generated_text(&json!([{"text": "x"}])), None);
        assert_eq!(extract_generated_text(&json!([{"generated_text": 42}])), None);
        assert_eq!(extract_generated_text(&json!("plain string")), None);
    }

    #[test]
    fn generation_request_serializes_to_inputs_payload() {
        let request = GenerationRequest {
            inputs: "write a sort".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"inputs": "write a sort"})
        );
    }
}
