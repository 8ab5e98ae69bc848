pub mod cli;
pub mod gemini;
pub mod openai;

use std::collections::HashMap;

use futures::future::BoxFuture;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{CreateNoteRequest, ModelName, SummaryRequest, SummaryResponse};
use crate::notes::NoteStore;

pub use gemini::{GeminiClient, GeminiSummarizer};
pub use openai::{OpenAiClient, OpenAiSummarizer};

/// Returned in place of an empty or absent generation.
pub const FALLBACK_SUMMARY: &str = "No summary generated";

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    /// Vendor credential is not configured; raised before any network call.
    #[error("{env_var} environment variable is not set ({vendor})")]
    MissingCredential {
        vendor: ModelName,
        env_var: &'static str,
    },

    /// Vendor call failed or returned a malformed response.
    #[error("{vendor} summarization failed: {source}")]
    Upstream {
        vendor: ModelName,
        #[source]
        source: anyhow::Error,
    },

    #[error("no summarizer registered for {0}")]
    Unregistered(ModelName),
}

impl SummarizeError {
    /// Server-side configuration faults, as opposed to vendor failures.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SummarizeError::MissingCredential { .. } | SummarizeError::Unregistered(_)
        )
    }
}

/// Failure to answer a [`SummaryRequest`] end to end.
#[derive(Debug, thiserror::Error)]
pub enum RespondError {
    #[error("note {0} was not found")]
    NoteNotFound(String),

    #[error("note store failed: {0:#}")]
    Store(#[source] anyhow::Error),

    #[error(transparent)]
    Summarize(#[from] SummarizeError),
}

impl RespondError {
    /// sysexits-style process status, so callers can tell fault classes apart.
    pub fn exit_code(&self) -> u8 {
        match self {
            RespondError::Summarize(e) if e.is_configuration() => 78,
            RespondError::Summarize(_) => 69,
            RespondError::NoteNotFound(_) => 66,
            RespondError::Store(_) => 74,
        }
    }
}

/// Prompt handed to a vendor: an optional system instruction and the user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
}

/// Narrow vendor capability: send one prompt, get back the generated text if any.
pub trait Generate: Send + Sync {
    fn generate<'a>(
        &'a self,
        api_key: &'a str,
        prompt: &'a Prompt,
    ) -> BoxFuture<'a, anyhow::Result<Option<String>>>;
}

pub trait Summarizer: Send + Sync {
    fn summarize<'a>(
        &'a self,
        note_text: &'a str,
        user_query: &'a str,
    ) -> BoxFuture<'a, Result<String, SummarizeError>>;
}

pub fn note_prompt(note_text: &str, user_query: &str) -> String {
    format!("NOTE: {}\n\nUser Query: {}", note_text, user_query)
}

/// Shared request path for both vendors: credential check, one call, fallback.
pub(crate) async fn run_generate<G: Generate>(
    vendor: ModelName,
    env_var: &'static str,
    api_key: Option<&str>,
    client: &G,
    prompt: Prompt,
) -> Result<String, SummarizeError> {
    let api_key = api_key.ok_or(SummarizeError::MissingCredential { vendor, env_var })?;

    debug!(
        "Requesting {} summary ({} prompt chars)",
        vendor,
        prompt.user.chars().count()
    );

    match client.generate(api_key, &prompt).await {
        Ok(Some(text)) if !text.is_empty() => Ok(text),
        Ok(_) => {
            info!("{} returned no content, using fallback summary", vendor);
            Ok(FALLBACK_SUMMARY.to_string())
        }
        Err(source) => {
            warn!("{} summarization failed: {:#}", vendor, source);
            Err(SummarizeError::Upstream { vendor, source })
        }
    }
}

pub(crate) fn build_http_client(config: &Config) -> anyhow::Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Maps each [`ModelName`] to the strategy that serves it.
#[derive(Default)]
pub struct SummarizerRegistry {
    summarizers: HashMap<ModelName, Box<dyn Summarizer>>,
}

impl SummarizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register both vendors with real clients sharing one connection pool.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = build_http_client(config)?;

        let openai = OpenAiSummarizer::new(
            config.openai.api_key.clone(),
            OpenAiClient::new(http.clone())
                .model(config.openai.model.clone())
                .base_url(config.openai.base_url.clone()),
        );
        let gemini = GeminiSummarizer::new(
            config.gemini.api_key.clone(),
            GeminiClient::new(http)
                .model(config.gemini.model.clone())
                .base_url(config.gemini.base_url.clone()),
        );

        Ok(Self::new()
            .register(ModelName::OpenAi, openai)
            .register(ModelName::Gemini, gemini))
    }

    pub fn register<S: Summarizer + 'static>(mut self, model: ModelName, summarizer: S) -> Self {
        self.summarizers.insert(model, Box::new(summarizer));
        self
    }

    pub fn contains(&self, model: ModelName) -> bool {
        self.summarizers.contains_key(&model)
    }

    pub async fn summarize(
        &self,
        model: ModelName,
        note_text: &str,
        user_query: &str,
    ) -> Result<String, SummarizeError> {
        let summarizer = self
            .summarizers
            .get(&model)
            .ok_or(SummarizeError::Unregistered(model))?;
        summarizer.summarize(note_text, user_query).await
    }

    /// Resolve `notes_id` through the store, summarize it, and keep the summary
    /// as a new note.
    pub async fn respond<S: NoteStore + ?Sized>(
        &self,
        store: &S,
        request: &SummaryRequest,
    ) -> Result<SummaryResponse, RespondError> {
        let note = store
            .get(&request.notes_id)
            .await
            .map_err(RespondError::Store)?
            .ok_or_else(|| RespondError::NoteNotFound(request.notes_id.clone()))?;

        let summary = self
            .summarize(request.model_name, &note.text, &request.user_query)
            .await?;

        let saved = store
            .create(&CreateNoteRequest {
                text: summary.clone(),
            })
            .await
            .map_err(RespondError::Store)?;
        debug!("Saved summary of note {} as note {}", note.id, saved.0.id);

        Ok(SummaryResponse { summary })
    }
}
