//! # folio-core
//!
//! Core types, traits, and abstractions for the folio block-based note editor.
//!
//! This crate provides the block and note data model shared by the server,
//! the database layer, and the editor library, together with the
//! persistence gateway trait they all speak.

pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, FieldError, Result};
pub use models::*;
pub use traits::*;
