pub mod cli;
mod json;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::models::{CreateNoteRequest, CreateNoteResponse, Note};

pub use json::JsonNoteStore;

/// Note lifecycle: create, list, look up and delete notes by id.
pub trait NoteStore: Send + Sync {
    fn create<'a>(
        &'a self,
        request: &'a CreateNoteRequest,
    ) -> BoxFuture<'a, anyhow::Result<CreateNoteResponse>>;
    fn list(&self) -> BoxFuture<'_, anyhow::Result<Vec<Note>>>;
    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, anyhow::Result<Option<Note>>>;
    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, anyhow::Result<bool>>;
}

/// Notes plus the last id handed out. Ids are increasing integers rendered as
/// strings and never reused, even after a delete.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteBook {
    last_id: u64,
    notes: Vec<Note>,
}

impl NoteBook {
    pub fn insert(&mut self, request: &CreateNoteRequest) -> anyhow::Result<Note> {
        if request.text.trim().is_empty() {
            anyhow::bail!("note text is empty");
        }

        self.last_id += 1;
        let note = Note::new(self.last_id.to_string(), request.text.clone());
        self.notes.push(note.clone());
        Ok(note)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        self.notes.len() != before
    }
}

/// Process-local store; notes live as long as the store does.
#[derive(Default)]
pub struct MemoryNoteStore {
    book: Mutex<NoteBook>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoteStore for MemoryNoteStore {
    fn create<'a>(
        &'a self,
        request: &'a CreateNoteRequest,
    ) -> BoxFuture<'a, anyhow::Result<CreateNoteResponse>> {
        Box::pin(async move {
            let note = self.book.lock().await.insert(request)?;
            Ok(CreateNoteResponse::from(note))
        })
    }

    fn list(&self) -> BoxFuture<'_, anyhow::Result<Vec<Note>>> {
        Box::pin(async move { Ok(self.book.lock().await.notes().to_vec()) })
    }

    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, anyhow::Result<Option<Note>>> {
        Box::pin(async move { Ok(self.book.lock().await.get(id).cloned()) })
    }

    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, anyhow::Result<bool>> {
        Box::pin(async move { Ok(self.book.lock().await.remove(id)) })
    }
}

/// Newest first, by numeric id.
pub fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by_key(|note| std::cmp::Reverse(note.id.parse::<u64>().unwrap_or(0)));
}
