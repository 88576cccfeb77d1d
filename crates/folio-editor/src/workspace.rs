//! Workspace controller.
//!
//! Ties the sidebar list, the open editor, and its autosave scheduler to a
//! [`NoteRepository`]. Every successful mutation updates the list directly;
//! nothing is refetched implicitly.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};

use folio_core::defaults::{NEW_NOTE_TITLE, SAVE_EVENT_CAPACITY};
use folio_core::{Block, BlockType, CreateNoteRequest, Note, NoteRepository, Result};

use crate::autosave::{Autosave, AutosaveConfig, AutosaveHandle};
use crate::saver::{NoteSaver, SaveEvent};
use crate::sidebar::NoteList;
use crate::state::{Editor, NoteDraft};

/// Transient message for the user (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

impl Notification {
    fn info(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            destructive: false,
        }
    }

    fn error(description: &str) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.to_string(),
            destructive: true,
        }
    }
}

struct OpenNote {
    editor: Editor,
    autosave: AutosaveHandle<NoteDraft>,
}

/// Sidebar plus at most one open note.
pub struct Workspace {
    repo: Arc<dyn NoteRepository>,
    config: AutosaveConfig,
    list: NoteList,
    query: String,
    open: Option<OpenNote>,
    events_tx: broadcast::Sender<SaveEvent>,
    events_rx: broadcast::Receiver<SaveEvent>,
    notifications: Vec<Notification>,
}

impl Workspace {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self::with_config(repo, AutosaveConfig::default())
    }

    pub fn with_config(repo: Arc<dyn NoteRepository>, config: AutosaveConfig) -> Self {
        let (events_tx, events_rx) = broadcast::channel(SAVE_EVENT_CAPACITY);
        Self {
            repo,
            config,
            list: NoteList::new(),
            query: String::new(),
            open: None,
            events_tx,
            events_rx,
            notifications: Vec::new(),
        }
    }

    pub fn list(&self) -> &NoteList {
        &self.list
    }

    pub fn editor(&self) -> Option<&Editor> {
        self.open.as_ref().map(|open| &open.editor)
    }

    pub fn selected_id(&self) -> Option<i32> {
        self.editor().and_then(Editor::note_id)
    }

    /// Reload the list, honouring the active search.
    pub async fn refresh(&mut self) -> Result<()> {
        let notes = if self.query.is_empty() {
            self.repo.list().await
        } else {
            self.repo.search(&self.query).await
        };

        match notes {
            Ok(notes) => {
                self.list.replace_all(&notes);
                Ok(())
            }
            Err(e) => {
                warn!(
                    subsystem = "editor",
                    component = "workspace",
                    op = "refresh",
                    error = %e,
                    "Failed to fetch notes"
                );
                self.notifications
                    .push(Notification::error("Failed to fetch notes."));
                Err(e)
            }
        }
    }

    /// Filter the list. A blank query shows every note.
    pub async fn search(&mut self, query: &str) -> Result<()> {
        self.query = query.trim().to_string();
        self.refresh().await
    }

    /// Create an "Untitled Note" with one empty paragraph and open it.
    pub async fn create_note(&mut self) -> Result<i32> {
        let request =
            CreateNoteRequest::new(NEW_NOTE_TITLE, vec![Block::new(BlockType::Paragraph)]);

        let note = match self.repo.create(request).await {
            Ok(note) => note,
            Err(e) => {
                warn!(
                    subsystem = "editor",
                    component = "workspace",
                    op = "create",
                    error = %e,
                    "Failed to create note"
                );
                self.notifications
                    .push(Notification::error("Failed to create new note."));
                return Err(e);
            }
        };

        info!(
            subsystem = "editor",
            component = "workspace",
            op = "create",
            note_id = note.id,
            "Note created"
        );
        if self.query.is_empty() {
            self.list.upsert(&note);
        } else {
            // A failed refresh already notified; the note itself was created.
            let _ = self.refresh().await;
        }
        self.notifications.push(Notification::info(
            "Note created",
            "New note has been created successfully.",
        ));
        self.open_loaded(&note);
        Ok(note.id)
    }

    /// Fetch a note and open it in the editor, closing the current one.
    pub async fn open(&mut self, id: i32) -> Result<()> {
        self.close();
        let note = match self.repo.get(id).await {
            Ok(note) => note,
            Err(e) => {
                warn!(
                    subsystem = "editor",
                    component = "workspace",
                    op = "open",
                    note_id = id,
                    error = %e,
                    "Failed to open note"
                );
                self.notifications
                    .push(Notification::error("Failed to open note."));
                return Err(e);
            }
        };
        self.open_loaded(&note);
        Ok(())
    }

    fn open_loaded(&mut self, note: &Note) {
        self.close();
        let editor = Editor::from_note(note);
        let saver = NoteSaver::with_events(self.repo.clone(), note.id, self.events_tx.clone());
        let autosave = Autosave::spawn(self.config.clone(), Arc::new(saver), editor.draft());
        self.open = Some(OpenNote { editor, autosave });
    }

    /// Apply `f` to the open editor and report the new draft to autosave.
    ///
    /// Returns `None` when no note is open.
    pub fn edit<F, R>(&mut self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Editor) -> R,
    {
        let open = self.open.as_mut()?;
        let result = f(&mut open.editor);
        open.autosave.watch(open.editor.draft());
        Some(result)
    }

    pub async fn delete(&mut self, id: i32) -> Result<()> {
        if let Err(e) = self.repo.delete(id).await {
            self.notifications
                .push(Notification::error("Failed to delete note."));
            return Err(e);
        }
        self.list.remove(id);
        if self.selected_id() == Some(id) {
            self.close();
        }
        Ok(())
    }

    /// Close the open note. A pending autosave is discarded.
    pub fn close(&mut self) {
        self.open = None;
    }

    /// Fold finished saves into the list. Returns how many events were applied.
    pub fn apply_save_events(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.events_rx.try_recv() {
                Ok(SaveEvent::Saved(note)) => {
                    self.list.upsert(&note);
                    if let Some(open) = self.open.as_mut() {
                        let saved = NoteDraft {
                            title: note.title.clone(),
                            blocks: note.blocks.clone(),
                        };
                        if open.editor.note_id() == Some(note.id) && open.editor.draft() == saved
                        {
                            open.editor.mark_clean();
                        }
                    }
                    applied += 1;
                }
                Ok(SaveEvent::Failed { .. }) => {
                    self.notifications
                        .push(Notification::error("Failed to save note."));
                    applied += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(
                        subsystem = "editor",
                        component = "workspace",
                        skipped,
                        "Save events dropped"
                    );
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        applied
    }

    /// Drain pending notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}
