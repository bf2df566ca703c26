//! External image-transformation capability contract.
//!
//! This module provides:
//! - The `ImageCapability` protocol trait for pluggable providers
//! - The key/value invocation payload
//! - Normalization of the provider's loosely-typed output shapes
//! - The retrying invocation wrapper
//! - A Replicate-backed client

mod replicate;
mod retry;

pub use replicate::ReplicateCapability;
pub use retry::{invoke_with_retry, mentions_rate_limit, RetryPolicy};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::errors::{CapabilityError, ExtractionError};

/// Key/value payload for a capability invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CapabilityInput {
    params: HashMap<String, Value>,
}

impl CapabilityInput {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Reads a parameter back.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// All parameters, as handed to the provider.
    #[must_use]
    pub fn params(&self) -> &HashMap<String, Value> {
        &self.params
    }
}

/// An output object exposing a URI-producing accessor.
///
/// Models the file-handle shape some provider SDKs hand back instead of
/// a bare URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlHandle {
    url: Option<String>,
}

impl UrlHandle {
    /// Creates a handle pointing at a hosted output.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    /// Creates a handle with no resolvable URI.
    #[must_use]
    pub fn unresolved() -> Self {
        Self { url: None }
    }

    /// The hosted output URI, if the handle resolves to one.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// The shapes a capability invocation can answer with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityOutput {
    /// A bare URI string.
    Uri(String),
    /// An object exposing a URI-producing accessor.
    Handle(UrlHandle),
    /// A raw JSON value expected to carry a direct `url` field.
    Json(Value),
}

impl CapabilityOutput {
    /// Normalizes any supported output shape to a single URI string.
    ///
    /// Every unsupported shape, including null, raises `ExtractionError`.
    pub fn into_url(self) -> Result<String, ExtractionError> {
        match self {
            Self::Uri(url) => {
                if url.is_empty() {
                    Err(ExtractionError::new("empty uri string"))
                } else {
                    Ok(url)
                }
            }
            Self::Handle(handle) => handle
                .url()
                .map(str::to_owned)
                .ok_or_else(|| ExtractionError::new("handle without a resolvable url")),
            Self::Json(Value::String(url)) => Ok(url),
            Self::Json(Value::Object(fields)) => match fields.get("url") {
                Some(Value::String(url)) => Ok(url.clone()),
                Some(other) => Err(ExtractionError::new(format!(
                    "object url field is not a string: {other}"
                ))),
                None => Err(ExtractionError::new("object without a url field")),
            },
            Self::Json(Value::Null) => Err(ExtractionError::new("null output")),
            Self::Json(other) => Err(ExtractionError::new(format!(
                "unsupported output shape: {other}"
            ))),
        }
    }
}

/// A remote image-transformation service invoked by model identifier.
///
/// Implementations are stateless with respect to concurrent callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageCapability: Send + Sync {
    /// Invokes the named model with the given payload.
    async fn invoke(
        &self,
        model: &str,
        input: CapabilityInput,
    ) -> Result<CapabilityOutput, CapabilityError>;
}
