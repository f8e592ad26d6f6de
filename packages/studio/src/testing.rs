//! Testing utilities including a mock collaborator.
//!
//! Useful for driving the controller through its states without a backend.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::collaborator::Collaborator;
use crate::demo::canned_generation;
use crate::error::{FailureKind, GenerationFailure};
use crate::model::{LanguageModel, RawGeneration, ValidatedRequest};

/// Arguments captured from a generate call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorCall {
    pub model: LanguageModel,
    pub credential: String,
    pub topic_seed: String,
    pub audience: String,
}

/// Scripted collaborator. Responses are served in order; once the script is
/// exhausted every call gets the demo content.
#[derive(Clone, Default)]
pub struct MockCollaborator {
    responses: Arc<Mutex<VecDeque<Result<RawGeneration, GenerationFailure>>>>,
    calls: Arc<Mutex<Vec<CollaboratorCall>>>,
    gate: Option<Arc<Notify>>,
}

impl MockCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_demo_response(self) -> Self {
        let raw = canned_generation().expect("demo content encodes");
        self.push(Ok(raw))
    }

    pub fn with_raw(self, blog: &str, social: &str) -> Self {
        self.push(Ok(RawGeneration {
            blog: blog.to_string(),
            social: social.to_string(),
        }))
    }

    pub fn with_failure(self, failure: GenerationFailure) -> Self {
        self.push(Err(failure))
    }

    /// Hold every call until the returned handle is notified once per call.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn calls(&self) -> Vec<CollaboratorCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn push(self, response: Result<RawGeneration, GenerationFailure>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }
}

#[async_trait]
impl Collaborator for MockCollaborator {
    async fn generate(&self, request: &ValidatedRequest) -> Result<RawGeneration, GenerationFailure> {
        // Record the call
        self.calls.lock().unwrap().push(CollaboratorCall {
            model: request.model,
            credential: request.credential.expose().to_string(),
            topic_seed: request.topic_seed.clone(),
            audience: request.audience.clone(),
        });

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(response) => response,
            None => canned_generation()
                .map_err(|e| GenerationFailure::new(FailureKind::Upstream, e.to_string())),
        }
    }
}
