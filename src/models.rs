use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A stored note. Notes are owned by an external store keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
}

impl Note {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub text: String,
}

/// The persisted note returned by note creation; same shape as [`Note`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreateNoteResponse(pub Note);

impl From<Note> for CreateNoteResponse {
    fn from(value: Note) -> Self {
        Self(value)
    }
}

impl From<CreateNoteResponse> for Note {
    fn from(value: CreateNoteResponse) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid model name '{0}', expected one of: openai, gemini")]
pub struct InvalidModelName(pub String);

/// Vendor selector for a summary request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ModelName {
    OpenAi,
    Gemini,
}

impl ModelName {
    pub const ALL: [ModelName; 2] = [ModelName::OpenAi, ModelName::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::OpenAi => "openai",
            ModelName::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelName {
    type Err = InvalidModelName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(ModelName::OpenAi),
            "gemini" => Ok(ModelName::Gemini),
            _ => Err(InvalidModelName(s.to_string())),
        }
    }
}

impl TryFrom<String> for ModelName {
    type Error = InvalidModelName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModelName> for &'static str {
    fn from(value: ModelName) -> Self {
        value.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub user_query: String,
    pub notes_id: String,
    pub model_name: ModelName,
}

impl SummaryRequest {
    /// Build a request, rejecting any model name outside the supported set.
    pub fn new(
        user_query: impl Into<String>,
        notes_id: impl Into<String>,
        model_name: &str,
    ) -> Result<Self, InvalidModelName> {
        Ok(Self {
            user_query: user_query.into(),
            notes_id: notes_id.into(),
            model_name: model_name.parse()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}
