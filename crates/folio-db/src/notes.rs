//! Note repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info};

use folio_core::{
    Block, CreateNoteRequest, Error, Note, NoteRepository, Result, UpdateNoteRequest,
};

use crate::escape_like;

const NOTE_COLUMNS: &str = "id, title, blocks, created_at, updated_at";

/// PostgreSQL implementation of NoteRepository.
///
/// Blocks live in a single JSONB column; every update replaces the whole
/// array in one row write, so concurrent writers resolve as last write wins.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map a database row to a Note.
fn map_row_to_note(row: &PgRow) -> Result<Note> {
    let blocks: Json<Vec<Block>> = row.try_get("blocks")?;
    Ok(Note {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        blocks: blocks.0,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_rows(rows: &[PgRow]) -> Result<Vec<Note>> {
    rows.iter().map(map_row_to_note).collect()
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn list(&self) -> Result<Vec<Note>> {
        let start = Instant::now();
        let rows = sqlx::query(&format!(
            "SELECT {} FROM notes ORDER BY updated_at DESC, id DESC",
            NOTE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let notes = map_rows(&rows)?;
        debug!(
            subsystem = "db",
            component = "notes",
            op = "list",
            result_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed notes"
        );
        Ok(notes)
    }

    async fn get(&self, id: i32) -> Result<Note> {
        let row = sqlx::query(&format!("SELECT {} FROM notes WHERE id = $1", NOTE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))?;

        map_row_to_note(&row)
    }

    async fn create(&self, req: CreateNoteRequest) -> Result<Note> {
        req.validate()?;

        let row = sqlx::query(&format!(
            "INSERT INTO notes (title, blocks) VALUES ($1, $2) RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(&req.title)
        .bind(Json(&req.blocks))
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let note = map_row_to_note(&row)?;
        info!(
            subsystem = "db",
            component = "notes",
            op = "create",
            note_id = note.id,
            block_count = note.blocks.len(),
            "Note created"
        );
        Ok(note)
    }

    async fn update(&self, id: i32, req: UpdateNoteRequest) -> Result<Note> {
        req.validate()?;

        // COALESCE keeps the stored value for every field the request leaves out.
        let row = sqlx::query(&format!(
            "UPDATE notes \
             SET title = COALESCE($2, title), \
                 blocks = COALESCE($3, blocks), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(id)
        .bind(req.title.as_deref())
        .bind(req.blocks.as_ref().map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::NoteNotFound(id))?;

        let note = map_row_to_note(&row)?;
        debug!(
            subsystem = "db",
            component = "notes",
            op = "update",
            note_id = id,
            block_count = note.blocks.len(),
            "Note updated"
        );
        Ok(note)
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }

        info!(
            subsystem = "db",
            component = "notes",
            op = "delete",
            note_id = id,
            "Note deleted"
        );
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<Note>> {
        let start = Instant::now();
        let pattern = format!("%{}%", escape_like(query));

        let rows = sqlx::query(&format!(
            r#"SELECT {} FROM notes
               WHERE title ILIKE $1 ESCAPE '\'
                  OR EXISTS (
                      SELECT 1 FROM jsonb_array_elements(blocks) AS b
                      WHERE b->>'type' NOT IN ('image', 'video', 'audio')
                        AND b->>'content' ILIKE $1 ESCAPE '\'
                  )
               ORDER BY updated_at DESC, id DESC"#,
            NOTE_COLUMNS
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let notes = map_rows(&rows)?;
        debug!(
            subsystem = "db",
            component = "notes",
            op = "search",
            query = %query,
            result_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Searched notes"
        );
        Ok(notes)
    }
}
