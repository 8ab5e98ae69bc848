use clap::Args;

use crate::models::{ModelName, SummaryRequest};

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    /// Id of the stored note to summarize
    pub notes_id: String,

    /// Vendor to summarize with (openai or gemini)
    #[arg(short, long)]
    pub model: ModelName,

    /// Question to answer about the note
    #[arg(short, long)]
    pub query: String,

    /// Print a JSON summary response instead of plain text
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl From<&SummarizeArgs> for SummaryRequest {
    fn from(args: &SummarizeArgs) -> Self {
        Self {
            user_query: args.query.clone(),
            notes_id: args.notes_id.clone(),
            model_name: args.model,
        }
    }
}
