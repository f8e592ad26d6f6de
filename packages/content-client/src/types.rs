//! Generation backend request and response types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Generate
// =============================================================================

/// Body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g., "gemini", "gpt4")
    pub model: String,

    /// Topic seed / blog content ideas
    pub topic: String,

    /// Target audience, may be empty
    pub audience: String,
}

impl GenerateRequest {
    /// Create a new generate request.
    pub fn new(
        model: impl Into<String>,
        topic: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            topic: topic.into(),
            audience: audience.into(),
        }
    }
}

/// Response of `POST /generate`.
///
/// `blog` is itself a JSON document serialized to a string; decoding it is
/// left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerateResponse {
    pub blog: String,
    pub linkedin: String,
}

// =============================================================================
// Health
// =============================================================================

/// Response of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
