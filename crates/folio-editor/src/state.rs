//! Editor state machine.
//!
//! An [`Editor`] owns the title and block sequence of one open note. Every
//! operation is synchronous and applied in call order; operations that target
//! a block id that does not exist are silent no-ops and report `false`.

use tracing::debug;

use folio_core::{
    Block, BlockId, BlockMetadata, BlockType, Note, UpdateNoteRequest,
};

use crate::keyboard::CommandMenu;

/// Partial change to a single block. Fields left as `None` are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockPatch {
    pub content: Option<String>,
    pub block_type: Option<BlockType>,
    /// `Some(None)` clears metadata.
    pub metadata: Option<Option<BlockMetadata>>,
}

impl BlockPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn metadata(metadata: BlockMetadata) -> Self {
        Self {
            metadata: Some(Some(metadata)),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_type(mut self, block_type: BlockType) -> Self {
        self.block_type = Some(block_type);
        self
    }

    pub fn clear_metadata(mut self) -> Self {
        self.metadata = Some(None);
        self
    }
}

/// Snapshot of an open note's editable fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl NoteDraft {
    /// Empty title and no block with non-blank content.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.blocks.iter().all(Block::is_blank)
    }

    /// Full replacement of title and blocks.
    pub fn to_update_request(&self) -> UpdateNoteRequest {
        UpdateNoteRequest {
            title: Some(self.title.clone()),
            blocks: Some(self.blocks.clone()),
        }
    }
}

/// In-memory editing state of one note.
#[derive(Debug, Default)]
pub struct Editor {
    note_id: Option<i32>,
    title: String,
    blocks: Vec<Block>,
    dirty: bool,
    focus: Option<BlockId>,
    pub(crate) menu: Option<CommandMenu>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor with `note` already loaded.
    pub fn from_note(note: &Note) -> Self {
        let mut editor = Self::new();
        editor.load(note);
        editor
    }

    /// Replace title and blocks with the note's; the editor becomes clean.
    pub fn load(&mut self, note: &Note) {
        self.note_id = Some(note.id);
        self.title = note.title.clone();
        self.blocks = note.blocks.clone();
        self.dirty = false;
        self.focus = None;
        self.menu = None;

        debug!(
            subsystem = "editor",
            component = "state",
            op = "load",
            note_id = note.id,
            block_count = note.blocks.len(),
            "Note loaded into editor"
        );
    }

    /// Drop the loaded note.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn note_id(&self) -> Option<i32> {
        self.note_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    /// True once any edit landed since the last load or [`Editor::mark_clean`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.dirty = true;
    }

    /// Merge `patch` into the block. Returns false if the block is missing.
    pub fn update_block_content(&mut self, id: &BlockId, patch: BlockPatch) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| &b.id == id) else {
            return false;
        };

        if let Some(content) = patch.content {
            block.content = content;
        }
        if let Some(block_type) = patch.block_type {
            block.block_type = block_type;
        }
        if let Some(metadata) = patch.metadata {
            block.metadata = metadata;
        }
        self.dirty = true;
        true
    }

    /// Insert an empty block of `block_type` after `after`, or at the end when
    /// `after` is `None` or unknown. The new block is focused and an open
    /// command menu is closed.
    pub fn insert_block(&mut self, block_type: BlockType, after: Option<&BlockId>) -> BlockId {
        let block = Block::new(block_type);
        let id = block.id.clone();

        let index = after
            .and_then(|anchor| self.position(anchor))
            .map(|i| i + 1)
            .unwrap_or(self.blocks.len());
        self.blocks.insert(index, block);

        self.dirty = true;
        self.focus = Some(id.clone());
        self.menu = None;

        debug!(
            subsystem = "editor",
            component = "state",
            op = "insert_block",
            block_id = %id,
            block_type = %block_type,
            "Block inserted"
        );
        id
    }

    /// Change only the block's type; content and metadata stay as they are.
    pub fn convert_block(&mut self, id: &BlockId, block_type: BlockType) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| &b.id == id) else {
            return false;
        };
        block.block_type = block_type;
        self.dirty = true;
        self.focus = Some(id.clone());
        self.menu = None;
        true
    }

    pub fn delete_block(&mut self, id: &BlockId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.blocks.remove(index);
        self.dirty = true;
        if self.focus.as_ref() == Some(id) {
            self.focus = None;
        }
        if self.menu.as_ref().is_some_and(|menu| &menu.origin == id) {
            self.menu = None;
        }
        true
    }

    /// Swap with the previous block; no-op on the first block.
    pub fn move_block_up(&mut self, id: &BlockId) -> bool {
        match self.position(id) {
            Some(index) if index > 0 => {
                self.blocks.swap(index - 1, index);
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Swap with the next block; no-op on the last block.
    pub fn move_block_down(&mut self, id: &BlockId) -> bool {
        match self.position(id) {
            Some(index) if index + 1 < self.blocks.len() => {
                self.blocks.swap(index, index + 1);
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Move a block to `to_index` (drag and drop). Out-of-range indices clamp
    /// to the last position.
    pub fn move_block(&mut self, id: &BlockId, to_index: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let to = to_index.min(self.blocks.len() - 1);
        if from == to {
            return false;
        }
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        self.dirty = true;
        true
    }

    /// Flip the checked state of a checkbox-list block.
    pub fn toggle_checked(&mut self, id: &BlockId) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| &b.id == id) else {
            return false;
        };
        if block.block_type != BlockType::CheckboxList {
            return false;
        }
        block.metadata = Some(BlockMetadata::checkbox(!block.is_checked()));
        self.dirty = true;
        true
    }

    /// Non-blank title, or at least one block with non-blank content.
    pub fn has_meaningful_content(&self) -> bool {
        !self.title.trim().is_empty() || self.blocks.iter().any(|b| !b.is_blank())
    }

    pub fn draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            blocks: self.blocks.clone(),
        }
    }

    /// The block the front end should focus next, if any. Consumed on read.
    pub fn take_focus(&mut self) -> Option<BlockId> {
        self.focus.take()
    }

    pub(crate) fn request_focus(&mut self, id: BlockId) {
        self.focus = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use chrono::Utc;

    fn ids(editor: &Editor) -> Vec<BlockId> {
        editor.blocks().iter().map(|b| b.id.clone()).collect()
    }

    fn note_with(blocks: Vec<Block>) -> Note {
        let now = Utc::now();
        Note {
            id: 7,
            title: "T".into(),
            blocks,
            created_at: now,
            updated_at: now,
        }
    }

    fn abc() -> Editor {
        Editor::from_note(&note_with(vec![
            Block::with_id("a", BlockType::Paragraph, "a"),
            Block::with_id("b", BlockType::Paragraph, "b"),
            Block::with_id("c", BlockType::Paragraph, "c"),
        ]))
    }

    #[test]
    fn test_load_is_clean() {
        let editor = abc();
        assert_eq!(editor.note_id(), Some(7));
        assert!(!editor.is_dirty());
        assert_eq!(editor.blocks().len(), 3);
    }

    #[test]
    fn test_insert_appends_without_anchor_and_focuses() {
        let mut editor = Editor::new();
        let id = editor.insert_block(BlockType::Paragraph, None);

        assert_eq!(editor.blocks().len(), 1);
        assert_eq!(editor.blocks()[0].content, "");
        assert!(id.as_str().starts_with("block-"));
        assert_eq!(editor.take_focus(), Some(id));
        assert_eq!(editor.take_focus(), None);
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_insert_after_anchor_and_unknown_anchor_appends() {
        let mut editor = abc();
        let after_a = editor.insert_block(BlockType::Code, Some(&"a".into()));
        assert_eq!(editor.position(&after_a), Some(1));

        let orphan = editor.insert_block(BlockType::Code, Some(&"missing".into()));
        assert_eq!(editor.position(&orphan), Some(4));
    }

    #[test]
    fn test_structural_edits_keep_ids_unique() {
        let mut editor = abc();
        let x = editor.insert_block(BlockType::BulletList, Some(&"b".into()));
        editor.move_block_up(&x);
        editor.move_block_up(&x);
        editor.delete_block(&"b".into());
        let y = editor.insert_block(BlockType::Paragraph, Some(&x));
        editor.move_block_down(&y);
        editor.move_block_down(&"a".into());

        let ids = ids(&editor);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.contains(&x) && ids.contains(&y));
        assert!(!ids.contains(&"b".into()));
    }

    #[test]
    fn test_convert_changes_only_type() {
        let mut editor = Editor::from_note(&note_with(vec![Block::with_id(
            "m",
            BlockType::Image,
            "data:image/png;base64,AAAA",
        )
        .with_metadata(BlockMetadata::media("a.png", 4, "image/png"))]));
        let before = editor.blocks()[0].clone();

        assert!(editor.convert_block(&"m".into(), BlockType::Paragraph));

        let after = &editor.blocks()[0];
        assert_eq!(after.block_type, BlockType::Paragraph);
        assert_eq!(after.id, before.id);
        assert_eq!(after.content, before.content);
        assert_eq!(after.metadata, before.metadata);
        assert_eq!(editor.take_focus(), Some("m".into()));
    }

    #[test]
    fn test_move_boundaries_are_noops() {
        let mut editor = abc();
        let before = ids(&editor);

        assert!(!editor.move_block_up(&"a".into()));
        assert!(!editor.move_block_down(&"c".into()));
        assert_eq!(ids(&editor), before);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_missing_block_operations_are_noops() {
        let mut editor = abc();
        let before = editor.blocks().to_vec();
        let missing: BlockId = "zzz".into();

        assert!(!editor.delete_block(&missing));
        assert!(!editor.convert_block(&missing, BlockType::Code));
        assert!(!editor.update_block_content(&missing, BlockPatch::content("x")));
        assert!(!editor.move_block(&missing, 0));
        assert!(!editor.toggle_checked(&missing));
        assert_eq!(editor.blocks(), before.as_slice());
    }

    #[test]
    fn test_move_block_clamps_out_of_range_index() {
        let mut editor = abc();
        assert!(editor.move_block(&"a".into(), 99));
        assert_eq!(ids(&editor), vec!["b".into(), "c".into(), BlockId::from("a")]);

        assert!(editor.move_block(&"a".into(), 0));
        assert_eq!(ids(&editor), vec!["a".into(), "b".into(), BlockId::from("c")]);
    }

    #[test]
    fn test_update_merges_patch_fields() {
        let mut editor = abc();
        let id: BlockId = "a".into();
        editor.update_block_content(&id, BlockPatch::content("hello"));
        editor.update_block_content(&id, BlockPatch::metadata(BlockMetadata::checkbox(true)));

        let block = editor.block(&id).unwrap();
        assert_eq!(block.content, "hello");
        assert!(block.is_checked());
        assert_eq!(block.block_type, BlockType::Paragraph);

        editor.update_block_content(&id, BlockPatch::default().clear_metadata());
        assert_eq!(editor.block(&id).unwrap().metadata, None);
        assert_eq!(editor.block(&id).unwrap().content, "hello");
    }

    #[test]
    fn test_toggle_checked_only_on_checkbox_blocks() {
        let mut editor = abc();
        let id: BlockId = "a".into();
        assert!(!editor.toggle_checked(&id));

        editor.convert_block(&id, BlockType::CheckboxList);
        assert!(editor.toggle_checked(&id));
        assert!(editor.block(&id).unwrap().is_checked());
        assert!(editor.toggle_checked(&id));
        assert!(!editor.block(&id).unwrap().is_checked());
    }

    #[test]
    fn test_meaningful_content() {
        let mut editor = Editor::new();
        assert!(!editor.has_meaningful_content());

        let id = editor.insert_block(BlockType::Paragraph, None);
        editor.update_block_content(&id, BlockPatch::content("   "));
        assert!(!editor.has_meaningful_content());
        assert!(editor.draft().is_blank());

        editor.set_title("x");
        assert!(editor.has_meaningful_content());
    }

    #[test]
    fn test_draft_converts_to_full_update() {
        let editor = abc();
        let req = editor.draft().to_update_request();
        assert_eq!(req.title.as_deref(), Some("T"));
        assert_eq!(req.blocks.as_ref().map(Vec::len), Some(3));
    }
}
