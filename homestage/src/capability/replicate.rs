//! Replicate-backed capability client.
//!
//! Invokes models through the blocking-wait prediction API with a bearer
//! credential supplied at construction time. The credential is treated as
//! an opaque string.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::{CapabilityInput, CapabilityOutput, ImageCapability};
use crate::errors::CapabilityError;

const API_BASE: &str = "https://api.replicate.com/v1";

/// HTTP client for the Replicate prediction API.
#[derive(Debug, Clone)]
pub struct ReplicateCapability {
    client: reqwest::Client,
    api_token: String,
    call_timeout: Duration,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    output: Value,
    #[serde(default)]
    error: Option<String>,
}

impl ReplicateCapability {
    /// Creates a client with the given credential and per-call timeout.
    pub fn new(
        api_token: impl Into<String>,
        call_timeout: Duration,
    ) -> Result<Self, CapabilityError> {
        let client = reqwest::Client::builder()
            .timeout(call_timeout)
            .build()
            .map_err(|err| CapabilityError::transport(err.to_string()))?;

        Ok(Self {
            client,
            api_token: api_token.into(),
            call_timeout,
            base_url: API_BASE.to_owned(),
        })
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Endpoint for the given model identifier.
    ///
    /// Pinned identifiers (`owner/name:version`) go through the generic
    /// predictions endpoint; unpinned ones through the model-scoped one.
    fn endpoint(&self, model: &str) -> String {
        if model.contains(':') {
            format!("{}/predictions", self.base_url)
        } else {
            format!("{}/models/{model}/predictions", self.base_url)
        }
    }

    /// Request body for the given model identifier and payload.
    fn request_body(model: &str, input: &CapabilityInput) -> Value {
        match model.split_once(':') {
            Some((_, version)) => serde_json::json!({
                "version": version,
                "input": input.params(),
            }),
            None => serde_json::json!({
                "input": input.params(),
            }),
        }
    }
}

#[async_trait]
impl ImageCapability for ReplicateCapability {
    async fn invoke(
        &self,
        model: &str,
        input: CapabilityInput,
    ) -> Result<CapabilityOutput, CapabilityError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_token))
            .header("Prefer", "wait")
            .json(&Self::request_body(model, &input))
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    CapabilityError::timeout(self.call_timeout)
                } else {
                    CapabilityError::transport(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(CapabilityError::rate_limited(format!("HTTP 429: {body}")));
            }
            return Err(CapabilityError::api(status.as_u16(), body));
        }

        let prediction: PredictionResponse = response
            .json()
            .await
            .map_err(|err| CapabilityError::transport(err.to_string()))?;

        if let Some(error) = prediction.error {
            return Err(CapabilityError::api(status.as_u16(), error));
        }

        Ok(CapabilityOutput::Json(prediction.output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ReplicateCapability {
        ReplicateCapability::new("test-token", Duration::from_secs(180))
            .expect("client builds")
    }

    #[test]
    fn test_endpoint_for_unpinned_model() {
        let capability = client();
        assert_eq!(
            capability.endpoint("black-forest-labs/flux-kontext-pro"),
            "https://api.replicate.com/v1/models/black-forest-labs/flux-kontext-pro/predictions"
        );
    }

    #[test]
    fn test_endpoint_for_pinned_model() {
        let capability = client();
        assert_eq!(
            capability.endpoint("proplabs/virtual-staging:635d607e"),
            "https://api.replicate.com/v1/predictions"
        );
    }

    #[test]
    fn test_base_url_override() {
        let capability = client().with_base_url("http://127.0.0.1:9900/v1");
        assert_eq!(
            capability.endpoint("acme/editor"),
            "http://127.0.0.1:9900/v1/models/acme/editor/predictions"
        );
    }

    #[test]
    fn test_request_body_pins_version() {
        let input = CapabilityInput::new().with_param("image", "https://img.example.com/in.jpg");

        let pinned = ReplicateCapability::request_body("proplabs/virtual-staging:635d607e", &input);
        assert_eq!(pinned["version"], "635d607e");
        assert_eq!(pinned["input"]["image"], "https://img.example.com/in.jpg");

        let unpinned = ReplicateCapability::request_body("acme/editor", &input);
        assert!(unpinned.get("version").is_none());
        assert_eq!(unpinned["input"]["image"], "https://img.example.com/in.jpg");
    }
}
