//! Centralized default constants for folio.
//!
//! Crates reference these instead of repeating magic numbers.

// =============================================================================
// EDITOR
// =============================================================================

/// Quiet period before an autosave fires, in milliseconds.
pub const AUTOSAVE_DELAY_MS: u64 = 1500;

/// Title given to notes created from the sidebar.
pub const NEW_NOTE_TITLE: &str = "Untitled Note";

/// Placeholder shown for a note with an empty title.
pub const UNTITLED: &str = "Untitled";

/// Prefix of generated block ids.
pub const BLOCK_ID_PREFIX: &str = "block-";

/// Previews longer than this are truncated.
pub const PREVIEW_MAX_CHARS: usize = 100;

/// Characters kept before the ellipsis when truncating a preview.
pub const PREVIEW_TRUNCATE_CHARS: usize = 97;

/// Preview text for notes without any previewable block.
pub const EMPTY_NOTE_PREVIEW: &str = "Empty note";

/// Capacity of the save event broadcast channel.
pub const SAVE_EVENT_CAPACITY: usize = 32;

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const SERVER_PORT: u16 = 5000;

/// Default request body limit. Media blocks travel as data URIs, so this is generous.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Default database URL for local development.
pub const DATABASE_URL: &str = "postgres://localhost/folio";

/// Default base URL the editor client talks to.
pub const API_URL: &str = "http://localhost:5000";

/// Default HTTP client timeout in seconds.
pub const API_TIMEOUT_SECS: u64 = 30;
