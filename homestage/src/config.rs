//! Pipeline configuration.
//!
//! Configuration is read once at process start and handed to the
//! pipeline constructor; there is no ambient global switch, so tests can
//! run multiple configurations in one process.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::capability::{CapabilityInput, RetryPolicy};
use crate::catalog::{InteriorStyle, RoomType};

/// Environment variable enabling demo mode.
pub const DEMO_MODE_VAR: &str = "DEMO_MODE";
/// Environment variable carrying the provider credential.
pub const API_TOKEN_VAR: &str = "REPLICATE_API_TOKEN";

fn default_finish_model() -> String {
    "black-forest-labs/flux-kontext-pro".to_owned()
}

fn default_dedicated_model() -> String {
    "proplabs/virtual-staging:635d607efc6e3a6016ef6d655327cd35f3d792e84b8f110688b04498c6e94cfb"
        .to_owned()
}

fn default_guidance_scale() -> f64 {
    7.5
}

fn default_inference_steps() -> u32 {
    30
}

fn default_staging_backend() -> StagingBackend {
    StagingBackend::Dedicated {
        model: default_dedicated_model(),
    }
}

fn default_cooldown_secs() -> u64 {
    3
}

fn default_demo_delay_secs() -> u64 {
    3
}

fn default_call_timeout_secs() -> u64 {
    180
}

/// The furniture-placement backend contract.
///
/// The staging provider has changed parameter shape more than once, so
/// the backend is carried as versioned configuration rather than
/// hardwired into the composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StagingBackend {
    /// Dedicated staging model taking enumerated room and style values.
    Dedicated {
        /// Model identifier, usually version-pinned.
        #[serde(default = "default_dedicated_model")]
        model: String,
    },
    /// Generic prompt-driven inpainting model.
    Inpainting {
        /// Model identifier.
        model: String,
        /// Classifier-free guidance scale.
        #[serde(default = "default_guidance_scale")]
        guidance_scale: f64,
        /// Denoising step count.
        #[serde(default = "default_inference_steps")]
        num_inference_steps: u32,
    },
}

impl StagingBackend {
    /// The model identifier this backend invokes.
    #[must_use]
    pub fn model(&self) -> &str {
        match self {
            Self::Dedicated { model } | Self::Inpainting { model, .. } => model,
        }
    }

    /// Builds the furniture-placement payload for this backend's
    /// parameter contract.
    #[must_use]
    pub fn build_input(
        &self,
        image_url: &str,
        style: &InteriorStyle,
        room: &RoomType,
    ) -> CapabilityInput {
        match self {
            Self::Dedicated { .. } => CapabilityInput::new()
                .with_param("image", image_url)
                .with_param("room", room.staging_room)
                .with_param("furniture_style", style.staging_style)
                .with_param("furniture_items", "Default (AI decides)"),
            Self::Inpainting {
                guidance_scale,
                num_inference_steps,
                ..
            } => CapabilityInput::new()
                .with_param("image", image_url)
                .with_param(
                    "prompt",
                    format!("{}, {}", room.prompt_hint, style.design_prompt),
                )
                .with_param("guidance_scale", *guidance_scale)
                .with_param("num_inference_steps", *num_inference_steps),
        }
    }
}

/// Configuration for the staging pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Short-circuits both operations with canned outputs.
    #[serde(default)]
    pub demo_mode: bool,
    /// Bearer credential for the capability provider; opaque here.
    #[serde(default, skip_serializing)]
    pub api_token: String,
    /// Model used for the finish, polish, and refinement calls.
    #[serde(default = "default_finish_model")]
    pub finish_model: String,
    /// Furniture-placement backend and its parameter contract.
    #[serde(default = "default_staging_backend")]
    pub staging_backend: StagingBackend,
    /// Rate-limit retry policy for every capability call.
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Fixed delay between successful stages.
    #[serde(default = "default_cooldown_secs")]
    pub stage_cooldown_secs: u64,
    /// Artificial delay before canned demo outputs.
    #[serde(default = "default_demo_delay_secs")]
    pub demo_delay_secs: u64,
    /// Per-call timeout on external calls.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            demo_mode: false,
            api_token: String::new(),
            finish_model: default_finish_model(),
            staging_backend: default_staging_backend(),
            retry: RetryPolicy::default(),
            stage_cooldown_secs: default_cooldown_secs(),
            demo_delay_secs: default_demo_delay_secs(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

impl StagingConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the process configuration from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let demo_mode = lookup(DEMO_MODE_VAR)
            .map(|value| {
                let value = value.trim().to_lowercase();
                value == "true" || value == "1"
            })
            .unwrap_or(false);
        let api_token = lookup(API_TOKEN_VAR).unwrap_or_default();

        Self {
            demo_mode,
            api_token,
            ..Self::default()
        }
    }

    /// Enables or disables demo mode.
    #[must_use]
    pub fn with_demo_mode(mut self, demo_mode: bool) -> Self {
        self.demo_mode = demo_mode;
        self
    }

    /// Sets the provider credential.
    #[must_use]
    pub fn with_api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = api_token.into();
        self
    }

    /// Sets the surface-finish model.
    #[must_use]
    pub fn with_finish_model(mut self, model: impl Into<String>) -> Self {
        self.finish_model = model.into();
        self
    }

    /// Sets the furniture-placement backend.
    #[must_use]
    pub fn with_staging_backend(mut self, backend: StagingBackend) -> Self {
        self.staging_backend = backend;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the inter-stage cool-down.
    #[must_use]
    pub fn with_stage_cooldown(mut self, cooldown: Duration) -> Self {
        self.stage_cooldown_secs = cooldown.as_secs();
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout_secs = timeout.as_secs();
        self
    }

    /// The inter-stage cool-down as a duration.
    #[must_use]
    pub fn stage_cooldown(&self) -> Duration {
        Duration::from_secs(self.stage_cooldown_secs)
    }

    /// The demo delay as a duration.
    #[must_use]
    pub fn demo_delay(&self) -> Duration {
        Duration::from_secs(self.demo_delay_secs)
    }

    /// The per-call timeout as a duration.
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}
