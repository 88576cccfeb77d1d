//! # folio-db
//!
//! Note storage for folio.
//!
//! This crate provides:
//! - Connection pool management
//! - A PostgreSQL note repository storing each note's blocks as JSONB
//! - An in-memory note repository for local runs and tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use folio_db::{Block, BlockType, CreateNoteRequest, Database, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/folio").await?;
//!
//!     let note = db
//!         .notes
//!         .create(CreateNoteRequest::new(
//!             "Groceries",
//!             vec![Block::new(BlockType::CheckboxList)],
//!         ))
//!         .await?;
//!
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```
pub mod memory;
pub mod notes;
pub mod pool;

// Compiled unconditionally so tests/ can share the fixtures.
pub mod test_fixtures;

pub use folio_core::*;

pub use memory::MemNoteRepository;
pub use notes::PgNoteRepository;
pub use pool::PoolConfig;

/// Escape `%`, `_` and `\` so user text matches literally inside `ILIKE`.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// PostgreSQL-backed storage.
#[derive(Clone)]
pub struct Database {
    pub pool: sqlx::PgPool,
    pub notes: PgNoteRepository,
}

impl Database {
    pub fn new(pool: sqlx::PgPool) -> Self {
        let notes = PgNoteRepository::new(pool.clone());
        Self { pool, notes }
    }

    /// Connect with [`PoolConfig::default`].
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(url, PoolConfig::default()).await
    }

    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        pool::connect(url, &config).await.map(Self::new)
    }

    /// Apply the SQL files under `migrations/`.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(e.into()))
    }
}
