//! The staging pipeline composer and refinement entry point.
//!
//! This module provides:
//! - Request and result types for staging runs
//! - The three-stage state machine (finish, stage, polish)
//! - The standalone refinement operation
//! - Demo-mode short-circuits for offline testing

mod demo;
mod request;
mod state;


pub use demo::sample_image;
pub use request::{RefinementRequest, ResolvedSelection, SourceImage, StagingRequest};
pub use state::{PipelineRun, PipelineState, StageName, StageResult};

use chrono::Utc;
use std::sync::Arc;

use crate::cancellation::CancellationToken;
use crate::capability::{
    invoke_with_retry, CapabilityInput, ImageCapability, ReplicateCapability,
};
use crate::config::StagingConfig;
use crate::errors::{CapabilityError, StagingError};
use crate::prompts;

/// Sequenced virtual-staging pipeline over an external image capability.
///
/// Stages run strictly sequentially per request; concurrent requests
/// share no mutable state and need no locking.
pub struct StagingPipeline {
    capability: Arc<dyn ImageCapability>,
    config: StagingConfig,
}

impl StagingPipeline {
    /// Creates a pipeline over an explicit capability.
    #[must_use]
    pub fn new(config: StagingConfig, capability: Arc<dyn ImageCapability>) -> Self {
        Self { capability, config }
    }

    /// Creates a pipeline backed by the live Replicate client.
    pub fn connect(config: StagingConfig) -> Result<Self, CapabilityError> {
        let capability = ReplicateCapability::new(config.api_token.clone(), config.call_timeout())?;
        Ok(Self::new(config, Arc::new(capability)))
    }

    /// The configuration this pipeline was built with.
    #[must_use]
    pub fn config(&self) -> &StagingConfig {
        &self.config
    }

    /// Runs the full finish, stage, polish pipeline.
    pub async fn generate_staged_image(
        &self,
        request: &StagingRequest,
    ) -> Result<PipelineRun, StagingError> {
        self.generate_with_token(request, &CancellationToken::new())
            .await
    }

    /// Runs the full pipeline, aborting before the next stage if the
    /// token is cancelled. An in-flight call is never interrupted.
    pub async fn generate_with_token(
        &self,
        request: &StagingRequest,
        cancel: &CancellationToken,
    ) -> Result<PipelineRun, StagingError> {
        let selection = request.resolve()?;

        // The demo switch is evaluated exactly once, ahead of the state
        // machine; no stage or wrapper code runs in demo mode.
        if self.config.demo_mode {
            return Ok(self.demo_run(&request.room_type_id).await);
        }

        let mut run = PipelineRun::new();
        let mut image = request.source.to_payload_value();
        tracing::info!(
            run_id = %run.run_id,
            room = %request.room_type_id,
            style = %request.style_id,
            "starting staging run"
        );

        loop {
            let (stage, model, input) = match run.state {
                PipelineState::Finishing => (
                    StageName::Finish,
                    self.config.finish_model.as_str(),
                    surface_finish_input(
                        &image,
                        &prompts::finish_prompt(
                            selection.room.prompt_hint,
                            request.user_instruction.as_deref(),
                        ),
                    ),
                ),
                PipelineState::Staging => (
                    StageName::Stage,
                    self.config.staging_backend.model(),
                    self.config
                        .staging_backend
                        .build_input(&image, selection.style, selection.room),
                ),
                PipelineState::Polishing => (
                    StageName::Polish,
                    self.config.finish_model.as_str(),
                    surface_finish_input(
                        &image,
                        &prompts::polish_prompt(selection.room.prompt_hint),
                    ),
                ),
                PipelineState::Done | PipelineState::Failed(_) => break,
            };

            self.ensure_active(cancel)?;

            let started_at = Utc::now();
            tracing::info!(run_id = %run.run_id, stage = %stage, model, "invoking image capability");
            match invoke_with_retry(self.capability.as_ref(), model, input, &self.config.retry)
                .await
            {
                Ok(url) => {
                    image.clone_from(&url);
                    run.record(StageResult::new(stage, url, started_at));
                    if !run.state.is_terminal() {
                        tokio::time::sleep(self.config.stage_cooldown()).await;
                    }
                }
                Err(cause) => {
                    run.fail(stage);
                    tracing::error!(
                        run_id = %run.run_id,
                        stage = %stage,
                        state = ?run.state,
                        error = %cause,
                        "staging run aborted"
                    );
                    return Err(StagingError::stage(stage, cause));
                }
            }
        }

        tracing::info!(run_id = %run.run_id, stages = run.stages.len(), "staging run complete");
        Ok(run)
    }

    /// Applies a single natural-language correction to a staged image.
    ///
    /// Stateless: each call invokes the capability afresh, with no
    /// cool-down and no result caching.
    pub async fn refine_image(
        &self,
        request: &RefinementRequest,
    ) -> Result<StageResult, StagingError> {
        request.validate()?;

        if self.config.demo_mode {
            tokio::time::sleep(self.config.demo_delay()).await;
            return Ok(StageResult::new(
                StageName::Refine,
                request.image_url.clone(),
                Utc::now(),
            ));
        }

        let started_at = Utc::now();
        let input = surface_finish_input(
            &request.image_url,
            &prompts::refinement_prompt(&request.correction),
        );
        tracing::info!(
            stage = %StageName::Refine,
            model = %self.config.finish_model,
            "invoking image capability"
        );
        let url = invoke_with_retry(
            self.capability.as_ref(),
            &self.config.finish_model,
            input,
            &self.config.retry,
        )
        .await
        .map_err(|cause| StagingError::stage(StageName::Refine, cause))?;

        Ok(StageResult::new(StageName::Refine, url, started_at))
    }

    async fn demo_run(&self, room_type_id: &str) -> PipelineRun {
        tokio::time::sleep(self.config.demo_delay()).await;
        PipelineRun::canned(StageResult::new(
            StageName::Polish,
            sample_image(room_type_id),
            Utc::now(),
        ))
    }

    fn ensure_active(&self, cancel: &CancellationToken) -> Result<(), StagingError> {
        if cancel.is_cancelled() {
            let reason = cancel.reason().unwrap_or_else(|| "cancelled".to_owned());
            return Err(StagingError::cancelled(reason));
        }
        Ok(())
    }
}

/// Payload for a surface-finish capability call.
fn surface_finish_input(image: &str, prompt: &str) -> CapabilityInput {
    CapabilityInput::new()
        .with_param("prompt", prompt)
        .with_param("input_image", image)
        .with_param("aspect_ratio", "match_input_image")
        .with_param("output_format", "jpg")
        .with_param("safety_tolerance", 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_surface_finish_input_shape() {
        let input = surface_finish_input("https://img.example.com/in.jpg", "do the thing");

        assert_eq!(input.get("prompt"), Some(&json!("do the thing")));
        assert_eq!(
            input.get("input_image"),
            Some(&json!("https://img.example.com/in.jpg"))
        );
        assert_eq!(input.get("aspect_ratio"), Some(&json!("match_input_image")));
        assert_eq!(input.get("output_format"), Some(&json!("jpg")));
        assert_eq!(input.get("safety_tolerance"), Some(&json!(2)));
    }
}
