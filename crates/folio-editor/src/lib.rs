//! # folio-editor
//!
//! Headless editing model for folio notes.
//!
//! This crate provides:
//! - The block editor state machine and its keyboard transition policy
//! - The command (slash) menu catalogue and list numbering
//! - Media attachment with MIME sniffing and data URIs
//! - A debounced autosave scheduler and the note save action
//! - An HTTP client implementing [`NoteRepository`] over the REST API
//! - Sidebar and workspace view models binding it all together
//!
//! Nothing here draws; a front end renders [`Editor`] state and feeds key
//! presses and edits back in.

pub mod autosave;
pub mod client;
pub mod commands;
pub mod keyboard;
pub mod media;
pub mod numbering;
pub mod saver;
pub mod sidebar;
pub mod state;
pub mod workspace;

pub use folio_core::*;

pub use autosave::{Autosave, AutosaveConfig, AutosaveHandle, SaveAction};
pub use client::NotesClient;
pub use commands::{CommandCategory, CommandItem, COMMAND_MENU};
pub use keyboard::{CommandMenu, Key, KeyInput};
pub use media::{MediaError, MediaFile};
pub use numbering::list_numbers;
pub use saver::{NoteSaver, SaveEvent};
pub use sidebar::{format_time_ago, NoteList, NoteListItem};
pub use state::{BlockPatch, Editor, NoteDraft};
pub use workspace::{Notification, Workspace};
