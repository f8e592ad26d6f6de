//! Output presentation model.
//!
//! The collaborator's payload is decoded exactly once, here, into a typed
//! [`GenerationResult`]. Views borrow from that value and never re-parse.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ExportError, MalformedResult};
use crate::model::{GenerationResult, RawGeneration, Section, StructuredDocument};
use crate::sink::Sink;

/// Default name for the exported blog document.
pub const DEFAULT_EXPORT_FILENAME: &str = "blog-content.json";

/// Decode and validate a raw collaborator payload.
pub fn decode_result(raw: RawGeneration) -> Result<GenerationResult, MalformedResult> {
    let document: StructuredDocument = serde_json::from_str(&raw.blog)
        .map_err(|e| MalformedResult::InvalidDocument(e.to_string()))?;

    if document.sections.is_empty() {
        return Err(MalformedResult::EmptySections);
    }

    debug!(
        sections = document.sections.len(),
        social_len = raw.social.len(),
        "decoded generation result"
    );

    Ok(GenerationResult {
        document,
        social_post: raw.social,
    })
}

/// Read-only views over one resolved result.
#[derive(Debug, Clone)]
pub struct PresentationModel {
    result: Arc<GenerationResult>,
}

impl PresentationModel {
    pub fn new(result: Arc<GenerationResult>) -> Self {
        Self { result }
    }

    pub fn result(&self) -> &GenerationResult {
        &self.result
    }

    pub fn document(&self) -> DocumentView<'_> {
        DocumentView {
            document: &self.result.document,
        }
    }

    pub fn social(&self) -> SocialView<'_> {
        SocialView {
            post: &self.result.social_post,
        }
    }
}

// =============================================================================
// Document view
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct DocumentView<'a> {
    document: &'a StructuredDocument,
}

impl<'a> DocumentView<'a> {
    pub fn title(&self) -> &'a str {
        &self.document.title
    }

    /// Sections in display order
    pub fn sections(&self) -> &'a [Section] {
        &self.document.sections
    }

    pub fn conclusion(&self) -> &'a str {
        &self.document.conclusion
    }

    pub fn document(&self) -> &'a StructuredDocument {
        self.document
    }

    /// Title, each heading with its body, then the conclusion, separated by
    /// blank lines.
    pub fn flattened_text(&self) -> String {
        let sections = self
            .document
            .sections
            .iter()
            .map(|s| format!("{}\n{}", s.heading, s.body))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "{}\n\n{}\n\n{}",
            self.document.title, sections, self.document.conclusion
        )
    }

    pub fn copy(&self, sink: &Sink) {
        sink.copy_text(&self.flattened_text());
    }

    /// Export the structured document, not the flattened text.
    pub fn export(&self, sink: &Sink, filename: &str) -> Result<PathBuf, ExportError> {
        sink.export_file(self.document, filename)
    }
}

// =============================================================================
// Social view
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct SocialView<'a> {
    post: &'a str,
}

impl<'a> SocialView<'a> {
    /// The post exactly as generated, line breaks included.
    pub fn text(&self) -> &'a str {
        self.post
    }

    pub fn lines(&self) -> impl Iterator<Item = &'a str> {
        self.post.split('\n')
    }

    pub fn copy(&self, sink: &Sink) {
        sink.copy_text(self.post);
    }
}
