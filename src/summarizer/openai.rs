use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL, OPENAI_API_KEY};
use crate::models::ModelName;

use super::{Generate, Prompt, SummarizeError, Summarizer, note_prompt, run_generate};

pub const SYSTEM_PROMPT: &str = "You are a friendly AI to help summarize notes";

/// Chat completions client.
pub struct OpenAiClient {
    client: Client,
    model: String,
    base_url: String,
}

impl OpenAiClient {
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

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self {
            client: Client::new(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn chat_messages(prompt: &Prompt) -> Vec<ChatMessage<'_>> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &prompt.system {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: &prompt.user,
    });
    messages
}

fn first_choice_content(body: &str) -> anyhow::Result<Option<String>> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| anyhow::anyhow!("malformed chat completion response: {}", e))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("chat completion response has no choices"))?;

    Ok(choice.message.content)
}

impl Generate for OpenAiClient {
    fn generate<'a>(
        &'a self,
        api_key: &'a str,
        prompt: &'a Prompt,
    ) -> BoxFuture<'a, anyhow::Result<Option<String>>> {
        Box::pin(async move {
            let payload = serde_json::to_string(&ChatRequest {
                model: &self.model,
                messages: chat_messages(prompt),
            })?;

            let response = self
                .client
                .post(self.completions_url())
                .bearer_auth(api_key)
                .header("Content-Type", "application/json")
                .body(payload)
                .send()
                .await
                .map_err(|e| anyhow::anyhow!("failed to call OpenAI chat completions API: {}", e))?;

            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                anyhow::bail!("OpenAI chat completions API returned {}: {}", status, body);
            }

            first_choice_content(&body)
        })
    }
}

/// Summarizes notes with a two-message chat: fixed system turn, then the note.
pub struct OpenAiSummarizer<C = OpenAiClient> {
    api_key: Option<String>,
    client: C,
}

impl<C: Generate> OpenAiSummarizer<C> {
    pub fn new(api_key: Option<String>, client: C) -> Self {
        Self { api_key, client }
    }

    pub fn prompt(note_text: &str, user_query: &str) -> Prompt {
        Prompt {
            system: Some(SYSTEM_PROMPT.to_string()),
            user: note_prompt(note_text, user_query),
        }
    }
}

impl<C: Generate> Summarizer for OpenAiSummarizer<C> {
    fn summarize<'a>(
        &'a self,
        note_text: &'a str,
        user_query: &'a str,
    ) -> BoxFuture<'a, Result<String, SummarizeError>> {
        Box::pin(run_generate(
            ModelName::OpenAi,
            OPENAI_API_KEY,
            self.api_key.as_deref(),
            &self.client,
            Self::prompt(note_text, user_query),
        ))
    }
}
