//! Core data model: the request draft, the typed generation result, and the
//! disclaimer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldRejected;
use crate::security::SecretString;

// =============================================================================
// Language model choice
// =============================================================================

/// Language model offered in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageModel {
    Gemini,
    Gpt4,
}

impl LanguageModel {
    /// Wire identifier sent to the backend.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Gpt4 => "gpt4",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::Gpt4 => "GPT-4",
        }
    }

    /// All models in display order
    pub fn all() -> &'static [LanguageModel] {
        &[Self::Gemini, Self::Gpt4]
    }
}

impl fmt::Display for LanguageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for LanguageModel {
    type Err = FieldRejected;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "gpt4" | "gpt-4" => Ok(Self::Gpt4),
            other => Err(FieldRejected::UnknownModel(other.to_string())),
        }
    }
}

// =============================================================================
// Form fields
// =============================================================================

/// Editable inputs of the generation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Model,
    Credential,
    TopicSeed,
    Audience,
}

impl Field {
    /// Form label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Model => "Select LLM 🤖",
            Self::Credential => "API Key 🔑",
            Self::TopicSeed => "Blog Content Ideas 💡",
            Self::Audience => "Targeted Audience 🎯",
        }
    }

    /// Short name used in messages and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Credential => "api key",
            Self::TopicSeed => "topic",
            Self::Audience => "audience",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, Self::Audience)
    }

    pub fn all() -> &'static [Field] {
        &[Self::Model, Self::Credential, Self::TopicSeed, Self::Audience]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FieldRejected;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "model" | "llm" => Ok(Self::Model),
            "credential" | "api-key" | "api key" | "apikey" => Ok(Self::Credential),
            "topic" | "topic-seed" | "ideas" => Ok(Self::TopicSeed),
            "audience" => Ok(Self::Audience),
            other => Err(FieldRejected::UnknownField(other.to_string())),
        }
    }
}

// =============================================================================
// Request draft
// =============================================================================

/// The pending form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: Option<LanguageModel>,
    pub credential: SecretString,
    pub topic_seed: String,
    pub audience: String,
}

impl GenerationRequest {
    /// Apply a raw form value to a field. An empty model value clears the
    /// selection.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), FieldRejected> {
        match field {
            Field::Model => {
                self.model = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.parse()?)
                };
            }
            Field::Credential => self.credential = SecretString::new(value),
            Field::TopicSeed => self.topic_seed = value.to_string(),
            Field::Audience => self.audience = value.to_string(),
        }
        Ok(())
    }

    /// Required fields that are still empty, in form order.
    pub fn missing_fields(&self) -> Vec<Field> {
        let mut missing = Vec::new();
        if self.model.is_none() {
            missing.push(Field::Model);
        }
        if self.credential.is_blank() {
            missing.push(Field::Credential);
        }
        if self.topic_seed.trim().is_empty() {
            missing.push(Field::TopicSeed);
        }
        missing
    }

    /// Snapshot the draft as a submittable request.
    pub fn validate(&self) -> Result<ValidatedRequest, Vec<Field>> {
        let missing = self.missing_fields();
        match self.model {
            Some(model) if missing.is_empty() => Ok(ValidatedRequest {
                model,
                credential: self.credential.clone(),
                topic_seed: self.topic_seed.clone(),
                audience: self.audience.clone(),
            }),
            _ => Err(missing),
        }
    }
}

/// A request whose required fields are known to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub model: LanguageModel,
    pub credential: SecretString,
    pub topic_seed: String,
    pub audience: String,
}

// =============================================================================
// Generation result
// =============================================================================

/// One heading/body pair of the blog document.
///
/// The body is encoded as `content` on the wire and in exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    #[serde(rename = "content", alias = "body")]
    pub body: String,
}

impl Section {
    pub fn new(heading: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            body: body.into(),
        }
    }
}

/// The long-form blog piece. Field order here is the canonical key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDocument {
    pub title: String,
    pub sections: Vec<Section>,
    pub conclusion: String,
}

/// A decoded, validated generation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub document: StructuredDocument,
    pub social_post: String,
}

/// The collaborator's payload before decoding: the blog document still as a
/// JSON string, the social post as free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGeneration {
    pub blog: String,
    pub social: String,
}

// =============================================================================
// Canonical encoding
// =============================================================================

/// Pretty-printed JSON with two-space indentation and struct field order.
pub fn encode_canonical<T: Serialize + ?Sized>(data: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(data)
}

pub fn decode_document(bytes: &[u8]) -> Result<StructuredDocument, serde_json::Error> {
    serde_json::from_slice(bytes)
}

// =============================================================================
// Disclaimer
// =============================================================================

pub const DEFAULT_DISCLAIMER: &str =
    "This content is AI-generated. Please review and edit as necessary.";

/// User-editable note shown under the generated content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disclaimer(String);

impl Disclaimer {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.0 = text.into();
    }

    pub fn reset(&mut self) {
        self.0 = DEFAULT_DISCLAIMER.to_string();
    }
}

impl Default for Disclaimer {
    fn default() -> Self {
        Self(DEFAULT_DISCLAIMER.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> GenerationRequest {
        let mut draft = GenerationRequest::default();
        draft.set(Field::Model, "gemini").unwrap();
        draft.set(Field::Credential, "k1").unwrap();
        draft.set(Field::TopicSeed, "social media growth").unwrap();
        draft
    }

    #[test]
    fn model_parsing() {
        assert_eq!("gemini".parse::<LanguageModel>().unwrap(), LanguageModel::Gemini);
        assert_eq!("GPT-4".parse::<LanguageModel>().unwrap(), LanguageModel::Gpt4);
        assert_eq!(
            "claude".parse::<LanguageModel>(),
            Err(FieldRejected::UnknownModel("claude".into()))
        );
    }

    #[test]
    fn audience_is_optional() {
        let draft = filled();
        assert!(draft.missing_fields().is_empty());
        let validated = draft.validate().unwrap();
        assert_eq!(validated.model, LanguageModel::Gemini);
        assert_eq!(validated.audience, "");
    }

    #[test]
    fn missing_fields_in_form_order() {
        let draft = GenerationRequest::default();
        assert_eq!(
            draft.missing_fields(),
            vec![Field::Model, Field::Credential, Field::TopicSeed]
        );
    }

    #[test]
    fn whitespace_counts_as_empty() {
        let mut draft = filled();
        draft.set(Field::TopicSeed, "   ").unwrap();
        assert_eq!(draft.validate().unwrap_err(), vec![Field::TopicSeed]);
    }

    #[test]
    fn empty_model_value_clears_selection() {
        let mut draft = filled();
        draft.set(Field::Model, "").unwrap();
        assert_eq!(draft.model, None);
    }

    #[test]
    fn section_body_is_encoded_as_content() {
        let doc = StructuredDocument {
            title: "T".into(),
            sections: vec![Section::new("H", "B")],
            conclusion: "C".into(),
        };
        let text = String::from_utf8(encode_canonical(&doc).unwrap()).unwrap();
        assert_eq!(
            text,
            "{\n  \"title\": \"T\",\n  \"sections\": [\n    {\n      \"heading\": \"H\",\n      \"content\": \"B\"\n    }\n  ],\n  \"conclusion\": \"C\"\n}"
        );
    }

    #[test]
    fn disclaimer_reset() {
        let mut disclaimer = Disclaimer::default();
        disclaimer.set("Reviewed by the editor.");
        assert_eq!(disclaimer.as_str(), "Reviewed by the editor.");
        disclaimer.reset();
        assert_eq!(disclaimer.as_str(), DEFAULT_DISCLAIMER);
    }
}
