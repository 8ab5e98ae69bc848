use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};

use crate::expand_path;

use super::JsonNoteStore;

#[derive(Debug, Args)]
pub struct StoreArgs {
    /// JSON file holding the notes
    #[arg(long, default_value = "notes.json", env = "NOTES_FILE")]
    pub notes_file: PathBuf,
}

impl StoreArgs {
    pub fn open(&self) -> JsonNoteStore {
        JsonNoteStore::new(expand_path(&self.notes_file))
    }
}

#[derive(Debug, Subcommand)]
pub enum NotesCommand {
    /// Create a note
    #[command(arg_required_else_help = true)]
    Create(NoteTextArgs),

    /// List notes, newest first
    List,

    /// Print one note
    #[command(arg_required_else_help = true)]
    Show { id: String },

    /// Delete a note
    #[command(arg_required_else_help = true)]
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct NoteTextArgs {
    /// Note text
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    pub text: Option<String>,

    /// Read the note text from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl NoteTextArgs {
    /// Inline text, or the contents of `--file` with `~` and variables expanded.
    pub fn read_text(self) -> anyhow::Result<String> {
        match (self.text, self.file) {
            (Some(text), _) => Ok(text),
            (None, Some(path)) => {
                let path = expand_path(&path);
                fs::read_to_string(&path)
                    .with_context(|| format!("failed to read note file {}", path.display()))
            }
            (None, None) => anyhow::bail!("either --text or --file is required"),
        }
    }
}
