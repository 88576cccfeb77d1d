//! In-memory note repository.
//!
//! Used for local development without PostgreSQL and as the backing store of
//! the API and editor test suites. Ids increase monotonically and are never
//! reused, matching the `SERIAL` column of the PostgreSQL implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use folio_core::{
    Block, BlockType, CreateNoteRequest, Error, Note, NoteRepository, Result, UpdateNoteRequest,
};

#[derive(Debug, Default)]
struct MemState {
    notes: BTreeMap<i32, Note>,
    next_id: i32,
}

/// Note repository held entirely in process memory.
#[derive(Debug)]
pub struct MemNoteRepository {
    state: RwLock<MemState>,
}

impl Default for MemNoteRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemNoteRepository {
    /// Empty repository; the first created note gets id 1.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemState {
                notes: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Repository seeded with a welcome note (id 1).
    pub fn with_welcome_note() -> Self {
        let now = Utc::now();
        let welcome = Note {
            id: 1,
            title: "Welcome to Folio".to_string(),
            blocks: vec![
                Block::with_id("block-1", BlockType::Heading1, "Getting Started"),
                Block::with_id(
                    "block-2",
                    BlockType::Paragraph,
                    "Welcome to your new note-taking app! Type / to see available commands.",
                ),
            ],
            created_at: now,
            updated_at: now,
        };

        let mut notes = BTreeMap::new();
        notes.insert(welcome.id, welcome);
        Self {
            state: RwLock::new(MemState { notes, next_id: 2 }),
        }
    }

    /// Number of stored notes.
    pub async fn len(&self) -> usize {
        self.state.read().await.notes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn newest_first(mut notes: Vec<Note>) -> Vec<Note> {
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
    notes
}

#[async_trait]
impl NoteRepository for MemNoteRepository {
    async fn list(&self) -> Result<Vec<Note>> {
        let state = self.state.read().await;
        Ok(newest_first(state.notes.values().cloned().collect()))
    }

    async fn get(&self, id: i32) -> Result<Note> {
        let state = self.state.read().await;
        state.notes.get(&id).cloned().ok_or(Error::NoteNotFound(id))
    }

    async fn create(&self, req: CreateNoteRequest) -> Result<Note> {
        req.validate()?;

        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let now = Utc::now();
        let note = Note {
            id,
            title: req.title,
            blocks: req.blocks,
            created_at: now,
            updated_at: now,
        };
        state.notes.insert(id, note.clone());

        debug!(
            subsystem = "db",
            component = "memory",
            op = "create",
            note_id = id,
            "Note created"
        );
        Ok(note)
    }

    async fn update(&self, id: i32, req: UpdateNoteRequest) -> Result<Note> {
        req.validate()?;

        let mut state = self.state.write().await;
        let note = state.notes.get_mut(&id).ok_or(Error::NoteNotFound(id))?;

        if let Some(title) = req.title {
            note.title = title;
        }
        if let Some(blocks) = req.blocks {
            note.blocks = blocks;
        }
        // Never move backwards, even if the wall clock does.
        note.updated_at = Utc::now().max(note.updated_at);

        Ok(note.clone())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .notes
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NoteNotFound(id))
    }

    async fn search(&self, query: &str) -> Result<Vec<Note>> {
        let needle = query.to_lowercase();
        let state = self.state.read().await;
        let hits = state
            .notes
            .values()
            .filter(|note| note.matches(&needle))
            .cloned()
            .collect();
        Ok(newest_first(hits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(id: &str, content: &str) -> Block {
        Block::with_id(id, BlockType::Paragraph, content)
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips_blocks() {
        let repo = MemNoteRepository::new();
        let b1 = paragraph("b1", "first");
        let created = repo
            .create(CreateNoteRequest::new("A", vec![b1.clone()]))
            .await
            .unwrap();

        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched.title, "A");
        assert_eq!(fetched.blocks, vec![b1]);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn test_ids_are_assigned_sequentially_and_not_reused() {
        let repo = MemNoteRepository::new();
        let a = repo.create(CreateNoteRequest::new("a", vec![])).await.unwrap();
        let b = repo.create(CreateNoteRequest::new("b", vec![])).await.unwrap();
        repo.delete(b.id).await.unwrap();
        let c = repo.create(CreateNoteRequest::new("c", vec![])).await.unwrap();

        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
    }

    #[tokio::test]
    async fn test_update_merges_only_provided_fields() {
        let repo = MemNoteRepository::new();
        let note = repo
            .create(CreateNoteRequest::new("title", vec![paragraph("b1", "x")]))
            .await
            .unwrap();

        let updated = repo
            .update(
                note.id,
                UpdateNoteRequest {
                    title: Some("renamed".into()),
                    blocks: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.blocks, note.blocks);
        assert!(updated.updated_at >= note.updated_at);
        assert_eq!(updated.created_at, note.created_at);
    }

    #[tokio::test]
    async fn test_update_replaces_whole_block_array() {
        let repo = MemNoteRepository::new();
        let note = repo
            .create(CreateNoteRequest::new(
                "t",
                vec![paragraph("b1", "x"), paragraph("b2", "y")],
            ))
            .await
            .unwrap();

        let updated = repo
            .update(
                note.id,
                UpdateNoteRequest {
                    title: None,
                    blocks: Some(vec![paragraph("b3", "z")]),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.blocks, vec![paragraph("b3", "z")]);
    }

    #[tokio::test]
    async fn test_missing_note_operations_fail_with_not_found() {
        let repo = MemNoteRepository::new();
        assert!(matches!(repo.get(9).await, Err(Error::NoteNotFound(9))));
        assert!(matches!(
            repo.update(9, UpdateNoteRequest::default()).await,
            Err(Error::NoteNotFound(9))
        ));
        assert!(matches!(repo.delete(9).await, Err(Error::NoteNotFound(9))));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_block_ids() {
        let repo = MemNoteRepository::new();
        let result = repo
            .create(CreateNoteRequest::new(
                "t",
                vec![paragraph("same", ""), paragraph("same", "")],
            ))
            .await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_is_newest_updated_first() {
        let repo = MemNoteRepository::new();
        let first = repo.create(CreateNoteRequest::new("first", vec![])).await.unwrap();
        let second = repo.create(CreateNoteRequest::new("second", vec![])).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        repo.update(
            first.id,
            UpdateNoteRequest {
                title: Some("first, edited".into()),
                blocks: None,
            },
        )
        .await
        .unwrap();

        let ids: Vec<i32> = repo.list().await.unwrap().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_on_title_and_content() {
        let repo = MemNoteRepository::new();
        let by_title = repo
            .create(CreateNoteRequest::new("Say HELLO", vec![]))
            .await
            .unwrap();
        let by_content = repo
            .create(CreateNoteRequest::new(
                "greetings",
                vec![paragraph("b1", "well, Hello there")],
            ))
            .await
            .unwrap();
        let other = repo
            .create(CreateNoteRequest::new("goodbye", vec![paragraph("b1", "bye")]))
            .await
            .unwrap();

        let ids: Vec<i32> = repo
            .search("hello")
            .await
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();

        assert!(ids.contains(&by_title.id));
        assert!(ids.contains(&by_content.id));
        assert!(!ids.contains(&other.id));
    }

    #[tokio::test]
    async fn test_welcome_note_is_seeded() {
        let repo = MemNoteRepository::with_welcome_note();
        let welcome = repo.get(1).await.unwrap();
        assert_eq!(welcome.blocks.len(), 2);
        assert_eq!(welcome.blocks[0].block_type, BlockType::Heading1);

        let next = repo.create(CreateNoteRequest::new("n", vec![])).await.unwrap();
        assert_eq!(next.id, 2);
    }
}
