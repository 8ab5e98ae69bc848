use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GEMINI_API_KEY};
use crate::models::ModelName;

use super::{Generate, Prompt, SummarizeError, Summarizer, note_prompt, run_generate};

// Verbatim, typos included.
pub const PROMPT_PREFIX: &str = "You are a friendly AI to help summarize notes and i am attachinf a notes it's not referring to you in any kind .\n\n";

pub struct GeminiClient {
    client: Client,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            ..Default::default()
        }
    }

    pub fn model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self {
            client: Client::new(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

fn generate_request(prompt: &Prompt) -> GenerateRequest<'_> {
    GenerateRequest {
        system_instruction: prompt.system.as_deref().map(|system| Content {
            role: None,
            parts: vec![Part { text: system }],
        }),
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part { text: &prompt.user }],
        }],
    }
}

/// Text of the first candidate, all parts joined.
///
/// A response without a candidate or without text parts (a blocked prompt, a
/// safety stop) is an error carrying the vendor's reason. Text that is present
/// but empty comes back as `Some("")`.
fn candidate_text(body: &str) -> anyhow::Result<Option<String>> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| anyhow::anyhow!("malformed generate content response: {}", e))?;

    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        match block_reason {
            Some(reason) => anyhow::bail!("Gemini blocked the prompt (blockReason: {})", reason),
            None => anyhow::bail!("Gemini response has no candidates"),
        }
    };

    let finish_reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
    let parts: Vec<String> = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if parts.is_empty() {
        anyhow::bail!(
            "Gemini candidate has no text parts (finishReason: {})",
            finish_reason
        );
    }

    Ok(Some(parts.concat()))
}

impl Generate for GeminiClient {
    fn generate<'a>(
        &'a self,
        api_key: &'a str,
        prompt: &'a Prompt,
    ) -> BoxFuture<'a, anyhow::Result<Option<String>>> {
        Box::pin(async move {
            let payload = serde_json::to_string(&generate_request(prompt))?;

            let response = self
                .client
                .post(self.generate_url())
                .header("x-goog-api-key", api_key)
                .header("Content-Type", "application/json")
                .body(payload)
                .send()
                .await
                .map_err(|e| anyhow::anyhow!("failed to call Gemini generate content API: {}", e))?;

            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                anyhow::bail!("Gemini generate content API returned {}: {}", status, body);
            }

            candidate_text(&body)
        })
    }
}

/// Summarizes notes with a single instructional prompt.
pub struct GeminiSummarizer<C = GeminiClient> {
    api_key: Option<String>,
    client: C,
}

impl<C: Generate> GeminiSummarizer<C> {
    pub fn new(api_key: Option<String>, client: C) -> Self {
        Self { api_key, client }
    }

    pub fn prompt(note_text: &str, user_query: &str) -> Prompt {
        Prompt {
            system: None,
            user: format!("{}{}", PROMPT_PREFIX, note_prompt(note_text, user_query)),
        }
    }
}

impl<C: Generate> Summarizer for GeminiSummarizer<C> {
    fn summarize<'a>(
        &'a self,
        note_text: &'a str,
        user_query: &'a str,
    ) -> BoxFuture<'a, Result<String, SummarizeError>> {
        Box::pin(run_generate(
            ModelName::Gemini,
            GEMINI_API_KEY,
            self.api_key.as_deref(),
            &self.client,
            Self::prompt(note_text, user_query),
        ))
    }
}
