//! Note save action driven by the autosave scheduler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use folio_core::defaults::SAVE_EVENT_CAPACITY;
use folio_core::{Note, NoteRepository};

use crate::autosave::SaveAction;
use crate::state::NoteDraft;

/// Outcome of one save attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveEvent {
    Saved(Note),
    Failed { note_id: i32, message: String },
}

/// Writes a note's draft through a [`NoteRepository`].
///
/// Skips drafts without meaningful content and never overlaps with itself:
/// a save requested while another is in flight is dropped, and the next
/// autosave cycle picks the change up.
pub struct NoteSaver {
    repo: Arc<dyn NoteRepository>,
    note_id: i32,
    in_flight: AtomicBool,
    events: broadcast::Sender<SaveEvent>,
}

impl NoteSaver {
    pub fn new(repo: Arc<dyn NoteRepository>, note_id: i32) -> Self {
        let (events, _) = broadcast::channel(SAVE_EVENT_CAPACITY);
        Self::with_events(repo, note_id, events)
    }

    /// Saver publishing to an existing event channel.
    pub fn with_events(
        repo: Arc<dyn NoteRepository>,
        note_id: i32,
        events: broadcast::Sender<SaveEvent>,
    ) -> Self {
        Self {
            repo,
            note_id,
            in_flight: AtomicBool::new(false),
            events,
        }
    }

    pub fn note_id(&self) -> i32 {
        self.note_id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SaveEvent> {
        self.events.subscribe()
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

#[async_trait]
impl SaveAction<NoteDraft> for NoteSaver {
    async fn save(&self, draft: NoteDraft) {
        if draft.is_blank() {
            debug!(
                subsystem = "editor",
                component = "saver",
                note_id = self.note_id,
                "Skipping save of empty note"
            );
            return;
        }
        if self.in_flight.swap(true, Ordering::AcqRel) {
            debug!(
                subsystem = "editor",
                component = "saver",
                note_id = self.note_id,
                "Save already in flight, skipping"
            );
            return;
        }

        let start = Instant::now();
        let result = self
            .repo
            .update(self.note_id, draft.to_update_request())
            .await;
        self.in_flight.store(false, Ordering::Release);

        let event = match result {
            Ok(note) => {
                debug!(
                    subsystem = "editor",
                    component = "saver",
                    op = "save",
                    note_id = self.note_id,
                    block_count = note.blocks.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Note saved"
                );
                SaveEvent::Saved(note)
            }
            Err(e) => {
                warn!(
                    subsystem = "editor",
                    component = "saver",
                    op = "save",
                    note_id = self.note_id,
                    error = %e,
                    "Failed to save note"
                );
                SaveEvent::Failed {
                    note_id: self.note_id,
                    message: e.to_string(),
                }
            }
        };
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
