//! Retrying invocation wrapper with rate-limit backoff.
//!
//! The backoff policy is a pure function from retry number to delay,
//! kept separate from the effectful sleep/log loop so it can be tested
//! without waiting.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{CapabilityInput, ImageCapability};
use crate::errors::CapabilityError;

/// Error-text markers that indicate provider rate limiting.
const RATE_LIMIT_MARKERS: &[&str] = &["429", "throttled", "rate"];

/// Backoff policy for rate-limited capability calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum rate-limit retries before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Linear backoff step in seconds; retry n waits n steps.
    #[serde(default = "default_backoff_step_secs")]
    pub backoff_step_secs: u64,
    /// Upper bound on the random jitter added to each delay.
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,
}

fn default_max_retries() -> u32 {
    4
}

fn default_backoff_step_secs() -> u64 {
    15
}

fn default_max_jitter_ms() -> u64 {
    2000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_step_secs: default_backoff_step_secs(),
            max_jitter_ms: default_max_jitter_ms(),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum retry count.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the linear backoff step.
    #[must_use]
    pub fn with_backoff_step(mut self, step: Duration) -> Self {
        self.backoff_step_secs = step.as_secs();
        self
    }

    /// Sets the jitter upper bound.
    #[must_use]
    pub fn with_max_jitter(mut self, jitter: Duration) -> Self {
        self.max_jitter_ms = u64::try_from(jitter.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Base delay before the given retry (1-based), jitter excluded.
    #[must_use]
    pub fn base_delay(&self, retry: u32) -> Duration {
        Duration::from_secs(self.backoff_step_secs.saturating_mul(u64::from(retry)))
    }

    /// Random jitter added on top of the base delay.
    #[must_use]
    pub fn jitter(&self) -> Duration {
        if self.max_jitter_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=self.max_jitter_ms))
    }

    /// Whether the given number of spent retries exhausts the policy.
    #[must_use]
    pub fn is_exhausted(&self, retries_used: u32) -> bool {
        retries_used >= self.max_retries
    }
}

/// Whether an error's text carries a rate-limit indicator.
#[must_use]
pub fn mentions_rate_limit(text: &str) -> bool {
    let lowered = text.to_lowercase();
    RATE_LIMIT_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Invokes the capability and normalizes its output to a single URI,
/// retrying rate-limited failures per the policy.
///
/// Non-rate-limit errors (including extraction failures) propagate
/// immediately. Exhausting the retry budget escalates to
/// `CapabilityError::ExhaustedRetries`.
pub async fn invoke_with_retry(
    capability: &dyn ImageCapability,
    model: &str,
    input: CapabilityInput,
    policy: &RetryPolicy,
) -> Result<String, CapabilityError> {
    let mut retries = 0u32;

    loop {
        match capability.invoke(model, input.clone()).await {
            Ok(output) => return Ok(output.into_url()?),
            Err(err) => {
                if !mentions_rate_limit(&err.to_string()) {
                    return Err(err);
                }
                if policy.is_exhausted(retries) {
                    return Err(CapabilityError::exhausted(retries, &err));
                }
                retries += 1;
                let delay = policy.base_delay(retries) + policy.jitter();
                tracing::warn!(
                    model,
                    retry = retries,
                    max_retries = policy.max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "capability rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
