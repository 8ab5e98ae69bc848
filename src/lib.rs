pub mod config;
pub mod models;
pub mod notes;
pub mod summarizer;

use std::path::{Path, PathBuf};

pub use config::{Config, ConfigArgs, VendorConfig};
pub use models::{
    CreateNoteRequest, CreateNoteResponse, InvalidModelName, ModelName, Note, SummaryRequest,
    SummaryResponse,
};
pub use notes::{
    JsonNoteStore, MemoryNoteStore, NoteStore,
    cli::{NoteTextArgs, NotesCommand, StoreArgs},
};
pub use summarizer::{
    FALLBACK_SUMMARY, GeminiClient, GeminiSummarizer, Generate, OpenAiClient, OpenAiSummarizer,
    Prompt, RespondError, SummarizeError, Summarizer, SummarizerRegistry, cli::SummarizeArgs,
};

/// Expand `~` and environment variables in a user supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => path.to_path_buf(),
    }
}
