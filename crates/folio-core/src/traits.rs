//! Core traits for folio abstractions.
//!
//! The persistence gateway is a trait so the server, the editor, and the tests
//! can swap PostgreSQL, in-memory, and HTTP implementations freely.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CreateNoteRequest, Note, UpdateNoteRequest};

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Repository for note persistence operations.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// All notes, most recently updated first.
    async fn list(&self) -> Result<Vec<Note>>;

    /// Fetch one note. Fails with `Error::NoteNotFound` when absent.
    async fn get(&self, id: i32) -> Result<Note>;

    /// Create a note, assigning its id and timestamps.
    async fn create(&self, req: CreateNoteRequest) -> Result<Note>;

    /// Merge the provided fields and refresh `updated_at`.
    ///
    /// A provided block array replaces the stored array as a whole.
    async fn update(&self, id: i32, req: UpdateNoteRequest) -> Result<Note>;

    /// Delete a note. Fails with `Error::NoteNotFound` when absent.
    async fn delete(&self, id: i32) -> Result<()>;

    /// Case-insensitive substring search over titles and text-block content,
    /// most recently updated first.
    async fn search(&self, query: &str) -> Result<Vec<Note>>;
}
