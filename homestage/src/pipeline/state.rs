//! Pipeline state machine and result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies which pipeline step produced a result or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageName {
    /// Surface finishing of the raw photo.
    Finish,
    /// Furniture placement.
    Stage,
    /// Artifact polishing.
    Polish,
    /// Standalone refinement.
    Refine,
}

impl StageName {
    /// The stage tag as surfaced in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Finish => "finish",
            Self::Stage => "stage",
            Self::Polish => "polish",
            Self::Refine => "refine",
        }
    }
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution state of a staging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    /// Waiting to invoke the surface-finish stage.
    Finishing,
    /// Waiting to invoke the furniture-placement stage.
    Staging,
    /// Waiting to invoke the polish stage.
    Polishing,
    /// All stages completed.
    Done,
    /// A stage failed; no later stage ran.
    Failed(StageName),
}

impl PipelineState {
    /// The stage this state would invoke next, if any.
    #[must_use]
    pub fn current_stage(self) -> Option<StageName> {
        match self {
            Self::Finishing => Some(StageName::Finish),
            Self::Staging => Some(StageName::Stage),
            Self::Polishing => Some(StageName::Polish),
            Self::Done | Self::Failed(_) => None,
        }
    }

    /// Advances past a successful stage. Terminal states are unchanged.
    #[must_use]
    pub fn advance(self) -> Self {
        match self {
            Self::Finishing => Self::Staging,
            Self::Staging => Self::Polishing,
            Self::Polishing => Self::Done,
            terminal @ (Self::Done | Self::Failed(_)) => terminal,
        }
    }

    /// Marks the given stage as failed.
    #[must_use]
    pub fn fail(self, stage: StageName) -> Self {
        Self::Failed(stage)
    }

    /// Whether the machine has stopped.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

/// The output of one pipeline stage.
///
/// Stage outputs are ephemeral, externally hosted URIs with no
/// guaranteed lifetime; callers needing durability must fetch and
/// persist them promptly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    /// The stage that produced this image.
    pub stage: StageName,
    /// Where the output is hosted.
    pub image_url: String,
    /// When the stage started.
    pub started_at: DateTime<Utc>,
    /// When the stage ended.
    pub ended_at: DateTime<Utc>,
}

impl StageResult {
    /// Creates a result ending now.
    #[must_use]
    pub fn new(stage: StageName, image_url: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            stage,
            image_url: image_url.into(),
            started_at,
            ended_at: Utc::now(),
        }
    }

    /// The stage duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        (self.ended_at - self.started_at).num_milliseconds() as f64
    }
}

/// One full staging run: up to three ordered stage results.
///
/// Runs have no resume semantics; a retried request starts a fresh run
/// from the original source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Identity of this run, for log correlation only.
    pub run_id: Uuid,
    /// Current machine state.
    pub state: PipelineState,
    /// Results of completed stages, in execution order.
    pub stages: Vec<StageResult>,
}

impl PipelineRun {
    /// Starts a fresh run at the finishing state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            state: PipelineState::Finishing,
            stages: Vec::new(),
        }
    }

    /// Creates an already-completed run holding a single canned result.
    #[must_use]
    pub fn canned(result: StageResult) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            state: PipelineState::Done,
            stages: vec![result],
        }
    }

    /// Records a successful stage and advances the machine.
    pub fn record(&mut self, result: StageResult) {
        self.stages.push(result);
        self.state = self.state.advance();
    }

    /// Marks the run as failed at the given stage.
    pub fn fail(&mut self, stage: StageName) {
        self.state = self.state.fail(stage);
    }

    /// The final image of the run, once available.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.stages.last().map(|result| result.image_url.as_str())
    }
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_name_tags() {
        assert_eq!(StageName::Finish.to_string(), "finish");
        assert_eq!(StageName::Stage.to_string(), "stage");
        assert_eq!(StageName::Polish.to_string(), "polish");
        assert_eq!(StageName::Refine.to_string(), "refine");
    }

    #[test]
    fn test_state_advances_in_order() {
        let mut state = PipelineState::Finishing;
        assert_eq!(state.current_stage(), Some(StageName::Finish));

        state = state.advance();
        assert_eq!(state.current_stage(), Some(StageName::Stage));

        state = state.advance();
        assert_eq!(state.current_stage(), Some(StageName::Polish));

        state = state.advance();
        assert_eq!(state, PipelineState::Done);
        assert_eq!(state.current_stage(), None);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_terminal_states_do_not_advance() {
        assert_eq!(PipelineState::Done.advance(), PipelineState::Done);

        let failed = PipelineState::Staging.fail(StageName::Stage);
        assert_eq!(failed, PipelineState::Failed(StageName::Stage));
        assert_eq!(failed.advance(), failed);
        assert!(failed.is_terminal());
        assert_eq!(failed.current_stage(), None);
    }

    #[test]
    fn test_stage_result_duration() {
        let started = Utc::now() - chrono::Duration::milliseconds(25);
        let result = StageResult::new(StageName::Finish, "https://img.example.com/a.jpg", started);
        assert!(result.duration_ms() >= 25.0);
    }

    #[test]
    fn test_run_records_and_advances() {
        let mut run = PipelineRun::new();
        assert_eq!(run.state, PipelineState::Finishing);
        assert_eq!(run.image_url(), None);

        run.record(StageResult::new(
            StageName::Finish,
            "https://img.example.com/clean.jpg",
            Utc::now(),
        ));
        assert_eq!(run.state, PipelineState::Staging);
        assert_eq!(run.image_url(), Some("https://img.example.com/clean.jpg"));

        run.record(StageResult::new(
            StageName::Stage,
            "https://img.example.com/staged.jpg",
            Utc::now(),
        ));
        run.record(StageResult::new(
            StageName::Polish,
            "https://img.example.com/final.jpg",
            Utc::now(),
        ));

        assert_eq!(run.state, PipelineState::Done);
        assert_eq!(run.stages.len(), 3);
        assert_eq!(run.image_url(), Some("https://img.example.com/final.jpg"));
    }

    #[test]
    fn test_run_fail_is_terminal() {
        let mut run = PipelineRun::new();
        run.record(StageResult::new(
            StageName::Finish,
            "https://img.example.com/clean.jpg",
            Utc::now(),
        ));
        run.fail(StageName::Stage);

        assert_eq!(run.state, PipelineState::Failed(StageName::Stage));
        assert!(run.state.is_terminal());
    }

    #[test]
    fn test_canned_run_is_done() {
        let run = PipelineRun::canned(StageResult::new(
            StageName::Polish,
            "https://img.example.com/sample.jpg",
            Utc::now(),
        ));
        assert_eq!(run.state, PipelineState::Done);
        assert_eq!(run.image_url(), Some("https://img.example.com/sample.jpg"));
    }

    #[test]
    fn test_run_serialization_round_trip() {
        let mut run = PipelineRun::new();
        run.record(StageResult::new(
            StageName::Finish,
            "https://img.example.com/clean.jpg",
            Utc::now(),
        ));

        let encoded = serde_json::to_string(&run).expect("serializes");
        let decoded: PipelineRun = serde_json::from_str(&encoded).expect("deserializes");
        assert_eq!(decoded, run);
    }
}
