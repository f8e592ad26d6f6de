//! Generation request controller.
//!
//! Owns the form draft and the single request lifecycle:
//!
//! ```text
//! Idle ──submit──► Validating ──valid──► InFlight ──ok──────► Resolved
//!   ▲                  │                    │
//!   │                  └──invalid──► Failed ◄┘ error / malformed
//!   │                                  │
//!   └──── Failed / Resolved ──submit───┘ (retry / regenerate)
//! ```
//!
//! At most one submission is outstanding. A `submit()` while `InFlight` is
//! rejected without touching the collaborator. The draft lock is never held
//! across the collaborator await, so reads stay available while a request is
//! in flight.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::collaborator::Collaborator;
use crate::error::{FailureKind, FieldRejected, GenerationFailure, RequestError};
use crate::model::{Field, GenerationRequest, GenerationResult};
use crate::notification::NotificationQueue;
use crate::presentation::decode_result;

pub const GENERATED_CONFIRMATION: &str = "Content generated!";
pub const IDLE_LABEL: &str = "Generate Content ✨";
pub const IN_FLIGHT_LABEL: &str = "Generating...";

const TRANSITION_CAPACITY: usize = 16;
const ABANDONED_DETAIL: &str = "request was abandoned before the backend answered";

/// Lifecycle of the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Validating,
    InFlight,
    Resolved(Arc<GenerationResult>),
    Failed(RequestError),
}

impl RequestState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::InFlight => "in_flight",
            Self::Resolved(_) => "resolved",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    pub fn result(&self) -> Option<&Arc<GenerationResult>> {
        match self {
            Self::Resolved(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RequestError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// What happened to a `submit()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Another request was already in flight; nothing was done.
    Rejected,
    /// The request ran to a terminal state.
    Settled(RequestState),
}

#[derive(Debug, Default)]
struct Inner {
    draft: GenerationRequest,
    state: RequestState,
    /// Result on screen. Survives a regeneration until the new outcome lands.
    displayed: Option<Arc<GenerationResult>>,
}

pub struct RequestController {
    collaborator: Arc<dyn Collaborator>,
    inner: Mutex<Inner>,
    notifications: NotificationQueue,
    transitions: broadcast::Sender<RequestState>,
}

impl RequestController {
    pub fn new(collaborator: Arc<dyn Collaborator>, notifications: NotificationQueue) -> Self {
        let (transitions, _) = broadcast::channel(TRANSITION_CAPACITY);
        Self {
            collaborator,
            inner: Mutex::new(Inner::default()),
            notifications,
            transitions,
        }
    }

    /// Observe every state transition, including the transient `Validating`.
    pub fn subscribe(&self) -> broadcast::Receiver<RequestState> {
        self.transitions.subscribe()
    }

    pub fn state(&self) -> RequestState {
        self.lock().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.is_in_flight()
    }

    /// Label for the submit affordance.
    pub fn submit_label(&self) -> &'static str {
        if self.is_loading() {
            IN_FLIGHT_LABEL
        } else {
            IDLE_LABEL
        }
    }

    pub fn draft(&self) -> GenerationRequest {
        self.lock().draft.clone()
    }

    /// The result to render: the resolved one, or the previous one while a
    /// regeneration is in flight.
    pub fn displayed_result(&self) -> Option<Arc<GenerationResult>> {
        self.lock().displayed.clone()
    }

    /// Edit a form field. Rejected while a request is in flight.
    pub fn update_field(&self, field: Field, value: &str) -> Result<(), FieldRejected> {
        let mut inner = self.lock();
        if inner.state.is_in_flight() {
            warn!(field = %field, "field update rejected while in flight");
            return Err(FieldRejected::InFlight);
        }
        inner.draft.set(field, value)?;
        debug!(field = %field, "field updated");
        Ok(())
    }

    /// Validate the draft and, if valid, call the collaborator once.
    ///
    /// Never returns an error: every failure is folded into
    /// `RequestState::Failed`.
    pub async fn submit(&self) -> Submission {
        let request = {
            let mut inner = self.lock();
            if inner.state.is_in_flight() {
                warn!("submit rejected: a request is already in flight");
                return Submission::Rejected;
            }

            self.transition(&mut inner, RequestState::Validating);
            match inner.draft.validate() {
                Ok(request) => {
                    self.transition(&mut inner, RequestState::InFlight);
                    request
                }
                Err(missing) => {
                    info!(missing = ?missing, "submission failed validation");
                    let state = RequestState::Failed(RequestError::Validation { missing });
                    inner.displayed = None;
                    self.transition(&mut inner, state.clone());
                    return Submission::Settled(state);
                }
            }
        };

        let mut guard = InFlightGuard {
            controller: self,
            armed: true,
        };

        info!(
            model = %request.model,
            topic_len = request.topic_seed.len(),
            audience_len = request.audience.len(),
            "submitting generation request"
        );

        let outcome = match self.collaborator.generate(&request).await {
            Ok(raw) => decode_result(raw).map_err(RequestError::from),
            Err(failure) => Err(RequestError::from(failure)),
        };

        let state = match outcome {
            Ok(result) => {
                info!(
                    sections = result.document.sections.len(),
                    "generation resolved"
                );
                RequestState::Resolved(Arc::new(result))
            }
            Err(error) => {
                warn!(error = %error, "generation failed");
                RequestState::Failed(error)
            }
        };

        guard.armed = false;
        {
            let mut inner = self.lock();
            inner.displayed = state.result().cloned();
            self.transition(&mut inner, state.clone());
        }

        if state.result().is_some() {
            self.notifications.enqueue(GENERATED_CONFIRMATION);
        }

        Submission::Settled(state)
    }

    fn transition(&self, inner: &mut Inner, next: RequestState) {
        debug!(from = inner.state.name(), to = next.name(), "request transition");
        inner.state = next.clone();
        // No subscribers is fine.
        let _ = self.transitions.send(next);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Settles an abandoned submission. Fires when the `submit()` future is
/// dropped (or the collaborator panics) while the request is in flight.
struct InFlightGuard<'a> {
    controller: &'a RequestController,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("generation request abandoned while in flight");
        let state = RequestState::Failed(RequestError::Generation(GenerationFailure::new(
            FailureKind::Upstream,
            ABANDONED_DETAIL,
        )));
        let mut inner = self.controller.lock();
        inner.displayed = None;
        self.controller.transition(&mut inner, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockCollaborator;
    use std::time::Duration;

    fn controller(mock: &MockCollaborator) -> RequestController {
        RequestController::new(Arc::new(mock.clone()), NotificationQueue::new())
    }

    fn fill(controller: &RequestController) {
        controller.update_field(Field::Model, "gemini").unwrap();
        controller.update_field(Field::Credential, "k1").unwrap();
        controller
            .update_field(Field::TopicSeed, "social media growth")
            .unwrap();
        controller
            .update_field(Field::Audience, "small business owners")
            .unwrap();
    }

    fn drain(rx: &mut broadcast::Receiver<RequestState>) -> Vec<&'static str> {
        let mut names = Vec::new();
        while let Ok(state) = rx.try_recv() {
            names.push(state.name());
        }
        names
    }

    #[tokio::test]
    async fn valid_submit_passes_through_in_flight() {
        let mock = MockCollaborator::new().with_demo_response();
        let controller = controller(&mock);
        fill(&controller);
        let mut rx = controller.subscribe();

        let outcome = controller.submit().await;

        assert!(matches!(outcome, Submission::Settled(RequestState::Resolved(_))));
        assert_eq!(drain(&mut rx), vec!["validating", "in_flight", "resolved"]);
        assert_eq!(mock.call_count(), 1);
        assert!(controller.displayed_result().is_some());
    }

    #[tokio::test]
    async fn invalid_submit_never_calls_collaborator() {
        let mock = MockCollaborator::new().with_demo_response();
        let controller = controller(&mock);
        controller.update_field(Field::Model, "gpt4").unwrap();
        controller.update_field(Field::TopicSeed, "ideas").unwrap();
        let mut rx = controller.subscribe();

        let outcome = controller.submit().await;

        assert_eq!(
            outcome,
            Submission::Settled(RequestState::Failed(RequestError::Validation {
                missing: vec![Field::Credential]
            }))
        );
        assert_eq!(drain(&mut rx), vec!["validating", "failed"]);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn collaborator_failure_keeps_kind() {
        let mock = MockCollaborator::new()
            .with_failure(GenerationFailure::new(FailureKind::Auth, "401 Unauthorized"));
        let controller = controller(&mock);
        fill(&controller);

        controller.submit().await;

        match controller.state() {
            RequestState::Failed(RequestError::Generation(failure)) => {
                assert_eq!(failure.kind, FailureKind::Auth)
            }
            other => panic!("unexpected state: {:?}", other),
        }
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn malformed_payload_fails_the_attempt() {
        let mock = MockCollaborator::new().with_raw("{\"title\":\"T\"}", "post");
        let controller = controller(&mock);
        fill(&controller);

        controller.submit().await;

        assert!(matches!(
            controller.state(),
            RequestState::Failed(RequestError::MalformedResult(_))
        ));
        assert!(controller.displayed_result().is_none());
    }

    #[tokio::test]
    async fn retry_after_failure() {
        let mock = MockCollaborator::new()
            .with_failure(GenerationFailure::new(FailureKind::Network, "refused"))
            .with_demo_response();
        let controller = controller(&mock);
        fill(&controller);

        controller.submit().await;
        assert!(controller.state().error().is_some());

        controller.submit().await;
        assert!(controller.state().result().is_some());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn reentrant_submit_is_rejected() {
        let (mock, release) = MockCollaborator::new().with_demo_response().gated();
        let controller = controller(&mock);
        fill(&controller);

        let second = async {
            tokio::task::yield_now().await;
            assert!(controller.is_loading());
            assert_eq!(controller.submit_label(), IN_FLIGHT_LABEL);
            assert_eq!(
                controller.update_field(Field::TopicSeed, "changed"),
                Err(FieldRejected::InFlight)
            );
            let outcome = controller.submit().await;
            release.notify_one();
            outcome
        };

        let (first, second) = tokio::join!(controller.submit(), second);

        assert_eq!(second, Submission::Rejected);
        assert!(matches!(first, Submission::Settled(RequestState::Resolved(_))));
        assert_eq!(mock.call_count(), 1);
        assert_eq!(controller.draft().topic_seed, "social media growth");
    }

    #[tokio::test]
    async fn regeneration_keeps_previous_result_until_resolved() {
        let (mock, release) = MockCollaborator::new()
            .with_demo_response()
            .with_raw(
                r#"{"title":"Second","sections":[{"heading":"H","content":"B"}],"conclusion":"C"}"#,
                "second post",
            )
            .gated();
        let controller = controller(&mock);
        fill(&controller);

        release.notify_one();
        controller.submit().await;
        let first = controller.displayed_result().unwrap();

        let observe = async {
            tokio::task::yield_now().await;
            assert!(controller.is_loading());
            assert_eq!(controller.state().result(), None);
            assert_eq!(controller.displayed_result(), Some(first.clone()));
            release.notify_one();
        };
        tokio::join!(controller.submit(), observe);

        let second = controller.displayed_result().unwrap();
        assert_eq!(second.document.title, "Second");
        assert_eq!(second.social_post, "second post");
    }

    #[tokio::test]
    async fn success_enqueues_notification() {
        let mock = MockCollaborator::new().with_demo_response();
        let queue = NotificationQueue::new();
        let controller = RequestController::new(Arc::new(mock), queue.clone());
        fill(&controller);

        controller.submit().await;

        assert_eq!(queue.visible_message().as_deref(), Some(GENERATED_CONFIRMATION));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_submit_settles_as_failed() {
        let (mock, release) = MockCollaborator::new().with_demo_response().gated();
        let controller = controller(&mock);
        fill(&controller);
        let mut rx = controller.subscribe();

        let timed_out = tokio::time::timeout(Duration::from_millis(50), controller.submit()).await;

        assert!(timed_out.is_err());
        assert!(!controller.is_loading());
        assert_eq!(controller.submit_label(), IDLE_LABEL);
        match controller.state() {
            RequestState::Failed(RequestError::Generation(failure)) => {
                assert_eq!(failure.kind, FailureKind::Upstream)
            }
            other => panic!("unexpected state: {:?}", other),
        }
        assert_eq!(drain(&mut rx), vec!["validating", "in_flight", "failed"]);
        assert!(controller.update_field(Field::Audience, "founders").is_ok());

        release.notify_one();
        let retry = controller.submit().await;

        assert!(matches!(retry, Submission::Settled(RequestState::Resolved(_))));
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn unknown_model_is_rejected() {
        let controller = controller(&MockCollaborator::new());
        assert_eq!(
            controller.update_field(Field::Model, "llama"),
            Err(FieldRejected::UnknownModel("llama".into()))
        );
        assert_eq!(controller.draft().model, None);
    }
}
