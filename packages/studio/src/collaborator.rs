//! The generation collaborator seam.
//!
//! The controller only knows this trait. `HttpCollaborator` talks to the
//! generation backend; `DemoCollaborator` serves canned content offline.

use std::time::Duration;

use async_trait::async_trait;
use content_client::{ClientError, GenerateRequest, GenerationClient};
use tracing::info;

use crate::demo;
use crate::error::{FailureKind, GenerationFailure};
use crate::model::{RawGeneration, ValidatedRequest};

#[async_trait]
pub trait Collaborator: Send + Sync {
    /// Turn a validated request into a raw payload. Called at most once per
    /// submission.
    async fn generate(&self, request: &ValidatedRequest) -> Result<RawGeneration, GenerationFailure>;
}

// =============================================================================
// HTTP backend
// =============================================================================

/// Collaborator backed by the generation service over HTTP.
#[derive(Clone)]
pub struct HttpCollaborator {
    client: GenerationClient,
}

impl HttpCollaborator {
    pub fn new(client: GenerationClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GenerationClient {
        &self.client
    }
}

#[async_trait]
impl Collaborator for HttpCollaborator {
    async fn generate(&self, request: &ValidatedRequest) -> Result<RawGeneration, GenerationFailure> {
        let body = GenerateRequest::new(
            request.model.id(),
            request.topic_seed.as_str(),
            request.audience.as_str(),
        );

        let response = self
            .client
            .generate(request.credential.expose(), &body)
            .await
            .map_err(failure_from_client)?;

        Ok(RawGeneration {
            blog: response.blog,
            social: response.linkedin,
        })
    }
}

/// Map transport errors onto the collaborator failure kinds.
///
/// An unreadable response envelope is an upstream fault; only the blog
/// document inside a well-formed envelope is subject to result decoding.
pub fn failure_from_client(error: ClientError) -> GenerationFailure {
    let kind = match &error {
        ClientError::Network(_) | ClientError::Config(_) => FailureKind::Network,
        ClientError::Auth(_) => FailureKind::Auth,
        ClientError::Timeout(_) => FailureKind::Timeout,
        ClientError::Upstream { .. } | ClientError::Parse(_) => FailureKind::Upstream,
    };
    GenerationFailure::new(kind, error.to_string())
}

// =============================================================================
// Offline demo
// =============================================================================

/// Serves the canned social-media-strategy content after a fixed delay.
#[derive(Debug, Clone)]
pub struct DemoCollaborator {
    delay: Duration,
}

impl DemoCollaborator {
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for DemoCollaborator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl Collaborator for DemoCollaborator {
    async fn generate(&self, request: &ValidatedRequest) -> Result<RawGeneration, GenerationFailure> {
        info!(
            model = %request.model,
            topic = %request.topic_seed,
            "serving demo content"
        );
        tokio::time::sleep(self.delay).await;
        demo::canned_generation()
            .map_err(|e| GenerationFailure::new(FailureKind::Upstream, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LanguageModel;
    use crate::presentation::decode_result;

    fn request() -> ValidatedRequest {
        ValidatedRequest {
            model: LanguageModel::Gpt4,
            credential: "k1".into(),
            topic_seed: "social media growth".into(),
            audience: String::new(),
        }
    }

    #[test]
    fn client_errors_map_to_kinds() {
        assert_eq!(
            failure_from_client(ClientError::Auth("nope".into())).kind,
            FailureKind::Auth
        );
        assert_eq!(
            failure_from_client(ClientError::Timeout("slow".into())).kind,
            FailureKind::Timeout
        );
        assert_eq!(
            failure_from_client(ClientError::Network("refused".into())).kind,
            FailureKind::Network
        );
        assert_eq!(
            failure_from_client(ClientError::Upstream {
                status: 502,
                message: "bad gateway".into()
            })
            .kind,
            FailureKind::Upstream
        );
    }

    #[tokio::test(start_paused = true)]
    async fn demo_waits_then_returns_decodable_content() {
        let demo = DemoCollaborator::default();
        let start = tokio::time::Instant::now();

        let raw = demo.generate(&request()).await.unwrap();

        assert!(start.elapsed() >= DemoCollaborator::DEFAULT_DELAY);
        let result = decode_result(raw).unwrap();
        assert_eq!(result.document.sections.len(), 3);
    }
}
