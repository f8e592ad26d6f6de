//! Typed errors for the studio library.
//!
//! Uses `thiserror` for library errors; `anyhow` only appears at the binary
//! edge and in configuration loading.

use thiserror::Error;

use crate::model::Field;

/// Why the collaborator could not produce content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Network,
    Auth,
    Upstream,
    Timeout,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::Auth => "authentication error",
            Self::Upstream => "upstream error",
            Self::Timeout => "timeout",
        }
    }
}

/// A collaborator failure. The kind is kept for display even though the
/// controller treats every kind the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {detail}", .kind.label())]
pub struct GenerationFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl GenerationFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// The collaborator answered, but the blog payload has the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedResult {
    #[error("blog payload is not a valid document: {0}")]
    InvalidDocument(String),

    #[error("blog payload has no sections")]
    EmptySections,
}

/// Terminal error of one submission. Always lands in `RequestState::Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("missing required input: {}", join_fields(.missing))]
    Validation { missing: Vec<Field> },

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationFailure),

    #[error("malformed result: {0}")]
    MalformedResult(#[from] MalformedResult),
}

impl RequestError {
    /// The single message shown where the result would otherwise render.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { missing } => {
                format!("Please fill in: {}.", join_fields(missing))
            }
            Self::Generation(failure) => match failure.kind {
                FailureKind::Auth => {
                    "The API key was rejected. Check it and try again.".to_string()
                }
                FailureKind::Timeout => {
                    "Content generation timed out. Please try again.".to_string()
                }
                FailureKind::Network => {
                    "Could not reach the content service. Check your connection and try again."
                        .to_string()
                }
                FailureKind::Upstream => {
                    "An error occurred while generating content. Please try again.".to_string()
                }
            },
            Self::MalformedResult(_) => {
                "The generated content could not be read. Please try again.".to_string()
            }
        }
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A form edit that was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldRejected {
    #[error("a generation request is in flight")]
    InFlight,

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// File export failures. Each one produces a failure notification.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid file name: {0:?}")]
    InvalidFilename(String),

    #[error("encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("could not save file: {0}")]
    Persist(#[from] tempfile::PersistError),
}
