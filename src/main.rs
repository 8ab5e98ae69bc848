use std::process::ExitCode;

use clap::{Parser, Subcommand};
use notesum::{
    Config, ConfigArgs, CreateNoteRequest, Note, NoteStore, NotesCommand, StoreArgs,
    SummarizeArgs, SummarizerRegistry, SummaryRequest, notes::sort_newest_first,
};
use tracing::{error, info};

/// Note summarizer backed by hosted LLM vendors
#[derive(Debug, Parser)]
#[command(name = "notesum")]
#[command(about = "Keep notes and summarize them with OpenAI or Gemini", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage stored notes
    #[command(subcommand)]
    Notes(NotesCommand),

    /// Summarize a stored note against a user query
    #[command(arg_required_else_help = true)]
    Summarize(SummarizeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env first, then .env.local can override
    let _ = dotenvy::from_filename_override(".env");
    let _ = dotenvy::from_filename_override(".env.local");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let store = args.store.open();

    match args.command {
        Commands::Notes(command) => run_notes(&store, command).await?,
        Commands::Summarize(cfg) => {
            let config = Config::from(args.config);
            let registry = SummarizerRegistry::from_config(&config)?;
            let request = SummaryRequest::from(&cfg);

            info!(
                "Summarizing note {} with {}",
                request.notes_id, request.model_name
            );

            let response = match registry.respond(&store, &request).await {
                Ok(response) => response,
                Err(e) => {
                    error!("{}", e);
                    return Ok(ExitCode::from(e.exit_code()));
                }
            };

            if cfg.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", response.summary);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_notes<S: NoteStore>(store: &S, command: NotesCommand) -> anyhow::Result<()> {
    match command {
        NotesCommand::Create(text) => {
            let request = CreateNoteRequest {
                text: text.read_text()?,
            };
            let created = store.create(&request).await?;
            info!("Created note {}", created.0.id);
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        NotesCommand::List => {
            let mut notes = store.list().await?;
            sort_newest_first(&mut notes);
            println!("{}", serde_json::to_string_pretty(&notes)?);
        }
        NotesCommand::Show { id } => {
            let note: Note = store
                .get(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("note {} was not found", id))?;
            println!("{}", serde_json::to_string_pretty(&note)?);
        }
        NotesCommand::Delete { id } => {
            if !store.delete(&id).await? {
                anyhow::bail!("note {} was not found", id);
            }
            info!("Deleted note {}", id);
        }
    }

    Ok(())
}
