//! Error types for the homestage pipeline.
//!
//! The taxonomy separates client mistakes (`ValidationError`), single-call
//! capability failures (`CapabilityError`), and stage-scoped pipeline
//! failures (`StagingError::Stage`).

use thiserror::Error;

use crate::pipeline::StageName;

/// The main error type for staging operations.
#[derive(Debug, Clone, Error)]
pub enum StagingError {
    /// The request referenced an unknown catalog entry or was malformed.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A pipeline stage failed; no later stage ran.
    #[error("stage '{stage}' failed: {source}")]
    Stage {
        /// The stage that failed.
        stage: StageName,
        /// The underlying capability failure.
        #[source]
        source: CapabilityError,
    },

    /// The run was cancelled before its next stage invocation.
    #[error("staging run cancelled: {reason}")]
    Cancelled {
        /// The cancellation reason.
        reason: String,
    },
}

impl StagingError {
    /// Wraps a capability failure with the stage it occurred in.
    #[must_use]
    pub fn stage(stage: StageName, source: CapabilityError) -> Self {
        Self::Stage { stage, source }
    }

    /// Creates a cancellation error.
    #[must_use]
    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self::Cancelled {
            reason: reason.into(),
        }
    }

    /// The stage this error is scoped to, if any.
    #[must_use]
    pub fn stage_name(&self) -> Option<StageName> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            Self::Validation(_) | Self::Cancelled { .. } => None,
        }
    }
}

/// Error raised when a request references unknown enumerated entries.
///
/// Validation failures are the caller's responsibility and are surfaced
/// before any external call is attempted.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// The error message.
    pub message: String,
    /// The offending request field.
    pub field: String,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: field.into(),
        }
    }

    /// The request named a room type that is not in the catalog.
    #[must_use]
    pub fn unknown_room(id: &str) -> Self {
        Self::new("room_type", format!("unknown room type id '{id}'"))
    }

    /// The request named an interior style that is not in the catalog.
    #[must_use]
    pub fn unknown_style(id: &str) -> Self {
        Self::new("style", format!("unknown interior style id '{id}'"))
    }

    /// A refinement was submitted without a correction.
    #[must_use]
    pub fn empty_correction() -> Self {
        Self::new("correction", "refinement correction must not be empty")
    }
}

/// Error raised when a capability output cannot be normalized to a URI.
///
/// Shape mismatches recur identically on retry, so extraction failures
/// are hard failures and are never retried.
#[derive(Debug, Clone, Error)]
#[error("unusable capability output: {shape}")]
pub struct ExtractionError {
    /// Description of the shape that could not be normalized.
    pub shape: String,
}

impl ExtractionError {
    /// Creates a new extraction error.
    #[must_use]
    pub fn new(shape: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
        }
    }
}

/// Errors from a single capability invocation, including its retries.
#[derive(Debug, Clone, Error)]
pub enum CapabilityError {
    /// The provider rejected the call for rate-limiting reasons.
    #[error("capability rate limited: {message}")]
    RateLimited {
        /// The provider's error text.
        message: String,
    },

    /// Rate-limit retries were exhausted without a success.
    #[error("retries exhausted after {attempts} attempts: {last_error}")]
    ExhaustedRetries {
        /// How many retries were spent.
        attempts: u32,
        /// The last error observed.
        last_error: String,
    },

    /// The output shape could not be normalized to a URI.
    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    /// The request never produced a response.
    #[error("capability request failed: {message}")]
    Transport {
        /// The transport error text.
        message: String,
    },

    /// The call exceeded the per-call timeout. Not retried.
    #[error("capability call timed out after {seconds}s")]
    Timeout {
        /// The configured timeout in seconds.
        seconds: u64,
    },

    /// The provider answered with a non-success status.
    #[error("capability returned HTTP {status}: {message}")]
    Api {
        /// The HTTP status code.
        status: u16,
        /// The provider's error text.
        message: String,
    },
}

impl CapabilityError {
    /// Creates a rate-limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates an exhausted-retries error from the last failure.
    #[must_use]
    pub fn exhausted(attempts: u32, last: &Self) -> Self {
        Self::ExhaustedRetries {
            attempts,
            last_error: last.to_string(),
        }
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(timeout: std::time::Duration) -> Self {
        Self::Timeout {
            seconds: timeout.as_secs(),
        }
    }

    /// Creates an API error from a status code and body text.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_display_carries_stage_and_cause() {
        let err = StagingError::stage(
            StageName::Stage,
            CapabilityError::transport("connection reset"),
        );

        let text = err.to_string();
        assert!(text.contains("stage 'stage' failed"));
        assert!(text.contains("connection reset"));
        assert_eq!(err.stage_name(), Some(StageName::Stage));
    }

    #[test]
    fn test_validation_error_constructors() {
        let room = ValidationError::unknown_room("attic");
        assert_eq!(room.field, "room_type");
        assert!(room.to_string().contains("attic"));

        let style = ValidationError::unknown_style("brutalist");
        assert_eq!(style.field, "style");

        let correction = ValidationError::empty_correction();
        assert_eq!(correction.field, "correction");
    }

    #[test]
    fn test_validation_error_has_no_stage() {
        let err = StagingError::from(ValidationError::unknown_room("attic"));
        assert_eq!(err.stage_name(), None);
    }

    #[test]
    fn test_extraction_error_converts_to_capability_error() {
        let err = CapabilityError::from(ExtractionError::new("null output"));
        assert!(matches!(err, CapabilityError::Extraction(_)));
        assert!(err.to_string().contains("null output"));
    }

    #[test]
    fn test_exhausted_preserves_last_error_text() {
        let last = CapabilityError::rate_limited("HTTP 429");
        let err = CapabilityError::exhausted(4, &last);

        match err {
            CapabilityError::ExhaustedRetries {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 4);
                assert!(last_error.contains("429"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_timeout_display() {
        let err = CapabilityError::timeout(std::time::Duration::from_secs(180));
        assert_eq!(err.to_string(), "capability call timed out after 180s");
    }
}
