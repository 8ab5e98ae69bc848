use std::path::PathBuf;

use anyhow::Context;
use futures::future::BoxFuture;
use tokio::{fs, sync::Mutex};
use tracing::debug;

use crate::models::{CreateNoteRequest, CreateNoteResponse, Note};

use super::{NoteBook, NoteStore};

/// Note store backed by a single JSON file, rewritten on every change.
pub struct JsonNoteStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonNoteStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> anyhow::Result<NoteBook> {
        if !fs::try_exists(&self.path).await? {
            return Ok(NoteBook::default());
        }

        let data = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read notes file {}", self.path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("notes file {} is not valid", self.path.display()))
    }

    async fn save(&self, book: &NoteBook) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&self.path, serde_json::to_string_pretty(book)?)
            .await
            .with_context(|| format!("failed to write notes file {}", self.path.display()))?;
        debug!("Saved {} notes to {}", book.notes().len(), self.path.display());
        Ok(())
    }
}

impl NoteStore for JsonNoteStore {
    fn create<'a>(
        &'a self,
        request: &'a CreateNoteRequest,
    ) -> BoxFuture<'a, anyhow::Result<CreateNoteResponse>> {
        Box::pin(async move {
            let _guard = self.lock.lock().await;
            let mut book = self.load().await?;
            let note = book.insert(request)?;
            self.save(&book).await?;
            Ok(CreateNoteResponse::from(note))
        })
    }

    fn list(&self) -> BoxFuture<'_, anyhow::Result<Vec<Note>>> {
        Box::pin(async move {
            let _guard = self.lock.lock().await;
            Ok(self.load().await?.notes().to_vec())
        })
    }

    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, anyhow::Result<Option<Note>>> {
        Box::pin(async move {
            let _guard = self.lock.lock().await;
            Ok(self.load().await?.get(id).cloned())
        })
    }

    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, anyhow::Result<bool>> {
        Box::pin(async move {
            let _guard = self.lock.lock().await;
            let mut book = self.load().await?;
            if !book.remove(id) {
                return Ok(false);
            }
            self.save(&book).await?;
            Ok(true)
        })
    }
}
