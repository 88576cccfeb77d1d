//! Sidebar note list view model.

use chrono::{DateTime, Utc};

use folio_core::defaults::{
    EMPTY_NOTE_PREVIEW, PREVIEW_MAX_CHARS, PREVIEW_TRUNCATE_CHARS, UNTITLED,
};
use folio_core::{Block, BlockType, Note};

/// One row of the note list.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteListItem {
    pub id: i32,
    pub title: String,
    pub preview: String,
    pub block_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl NoteListItem {
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            preview: preview(&note.blocks),
            block_count: note.blocks.len(),
            updated_at: note.updated_at,
        }
    }

    /// Title, or the placeholder when it is blank.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }
}

/// Notes shown in the sidebar, newest updated first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteList {
    items: Vec<NoteListItem>,
}

impl NoteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[NoteListItem] {
        &self.items
    }

    pub fn get(&self, id: i32) -> Option<&NoteListItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the whole list, e.g. after a fetch or search.
    pub fn replace_all(&mut self, notes: &[Note]) {
        self.items = notes.iter().map(NoteListItem::from_note).collect();
        self.sort();
    }

    /// Insert or refresh one note.
    pub fn upsert(&mut self, note: &Note) {
        let item = NoteListItem::from_note(note);
        match self.items.iter_mut().find(|existing| existing.id == note.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        self.sort();
    }

    pub fn remove(&mut self, id: i32) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    fn sort(&mut self) {
        self.items
            .sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
    }
}

/// Text of the first non-blank block that is not a top-level heading.
pub fn preview(blocks: &[Block]) -> String {
    let Some(block) = blocks
        .iter()
        .find(|b| !b.is_blank() && b.block_type != BlockType::Heading1)
    else {
        return EMPTY_NOTE_PREVIEW.to_string();
    };

    let content = block.content.trim();
    if content.chars().count() > PREVIEW_MAX_CHARS {
        let head: String = content.chars().take(PREVIEW_TRUNCATE_CHARS).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}

/// Relative age such as `45s ago` or `3d ago`; dates older than four weeks
/// are shown as `YYYY-MM-DD`.
pub fn format_time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - at).num_seconds().max(0);
    if seconds < 60 {
        return format!("{}s ago", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{}d ago", days);
    }
    let weeks = days / 7;
    if weeks < 4 {
        return format!("{}w ago", weeks);
    }
    at.format("%Y-%m-%d").to_string()
}
