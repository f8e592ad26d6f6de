//! # Studio
//!
//! Generation-request lifecycle and output-rendering pipeline for Content
//! Studio: a form submission becomes a single in-flight request, the
//! collaborator's payload is decoded once into a typed result, and that
//! result is exposed as independently actionable views.
//!
//! ## Architecture
//!
//! ```text
//! form fields
//!     │ update_field()
//!     ▼
//! RequestController ── submit() ──► Collaborator (HTTP backend / demo)
//!     │                                   │
//!     │◄──────── RawGeneration ───────────┘
//!     │ decode_result()
//!     ▼
//! RequestState::Resolved(GenerationResult)
//!     │
//!     ▼
//! PresentationModel ──► DocumentView ─┬─ copy()   ──► Sink ──► NotificationQueue
//!                   └─► SocialView  ──┴─ export() ──┘
//! ```
//!
//! [`Studio`] owns all of it and is the only thing front-ends hold.

pub mod cmd_builder;
pub mod collaborator;
pub mod config;
pub mod controller;
pub mod demo;
pub mod error;
pub mod model;
pub mod notification;
pub mod presentation;
pub mod render;
pub mod security;
pub mod session;
pub mod sink;
pub mod testing;

pub use collaborator::{Collaborator, DemoCollaborator, HttpCollaborator};
pub use config::Config;
pub use controller::{RequestController, RequestState, Submission};
pub use error::{
    ExportError, FailureKind, FieldRejected, GenerationFailure, MalformedResult, RequestError,
};
pub use model::{
    Disclaimer, Field, GenerationRequest, GenerationResult, LanguageModel, RawGeneration, Section,
    StructuredDocument, ValidatedRequest,
};
pub use notification::{Notification, NotificationQueue};
pub use presentation::{decode_result, DocumentView, PresentationModel, SocialView};
pub use security::SecretString;
pub use session::{Studio, StudioSettings};
pub use sink::{Clipboard, MemoryClipboard, Sink, SystemClipboard};
