//! Test doubles for the image capability.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::capability::{CapabilityInput, CapabilityOutput, ImageCapability};
use crate::errors::CapabilityError;

/// A recorded capability invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The model identifier that was invoked.
    pub model: String,
    /// The payload it was invoked with.
    pub input: CapabilityInput,
}

/// Scriptable capability double.
///
/// Returns queued outcomes in order and records every invocation. Once
/// the queue is empty, each call succeeds with a distinct synthetic URI.
#[derive(Debug, Default)]
pub struct ScriptedCapability {
    outcomes: Mutex<VecDeque<Result<CapabilityOutput, CapabilityError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedCapability {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful outcome.
    pub fn push_ok(&self, output: CapabilityOutput) {
        self.outcomes.lock().push_back(Ok(output));
    }

    /// Queues a successful bare-URI outcome.
    pub fn push_url(&self, url: &str) {
        self.push_ok(CapabilityOutput::Uri(url.to_owned()));
    }

    /// Queues a failure.
    pub fn push_err(&self, error: CapabilityError) {
        self.outcomes.lock().push_back(Err(error));
    }

    /// How many times the capability was invoked.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Every recorded invocation, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ImageCapability for ScriptedCapability {
    async fn invoke(
        &self,
        model: &str,
        input: CapabilityInput,
    ) -> Result<CapabilityOutput, CapabilityError> {
        self.calls.lock().push(RecordedCall {
            model: model.to_owned(),
            input,
        });

        let scripted = self.outcomes.lock().pop_front();
        scripted.unwrap_or_else(|| {
            let serial = self.calls.lock().len();
            Ok(CapabilityOutput::Uri(format!(
                "https://delivery.example.com/out-{serial}.jpg"
            )))
        })
    }
}
