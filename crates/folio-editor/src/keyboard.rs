//! Keyboard transition policy and command menu state.
//!
//! Each handler returns whether the key was consumed; a consumed key must not
//! reach the text input (the front end's "prevent default").

use tracing::debug;

use folio_core::{BlockId, BlockType};

use crate::state::Editor;

/// Keys the editor reacts to. Everything else is [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Slash,
    Enter,
    Backspace,
    Escape,
    Other,
}

/// One key press inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
    /// Text of the block between its start and the caret.
    pub text_before_cursor: String,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            text_before_cursor: String::new(),
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_text_before_cursor(mut self, text: impl Into<String>) -> Self {
        self.text_before_cursor = text.into();
        self
    }
}

/// Open command menu, remembering the block it was opened from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMenu {
    pub origin: BlockId,
}

impl Editor {
    pub fn command_menu(&self) -> Option<&CommandMenu> {
        self.menu.as_ref()
    }

    pub fn close_menu(&mut self) {
        self.menu = None;
    }

    /// Apply the transition table for a key pressed in `block_id`.
    pub fn handle_key(&mut self, block_id: &BlockId, input: &KeyInput) -> bool {
        match input.key {
            Key::Slash => self.on_slash(block_id, &input.text_before_cursor),
            Key::Enter if !input.shift => self.on_enter(block_id),
            Key::Backspace => self.on_backspace(block_id),
            Key::Escape if self.menu.is_some() => {
                self.close_menu();
                true
            }
            _ => false,
        }
    }

    /// A command menu entry was picked. Converts the originating block when it
    /// is blank, otherwise inserts a block of the chosen type after it.
    pub fn select_command(&mut self, block_type: BlockType) -> bool {
        let Some(menu) = self.menu.take() else {
            return false;
        };

        let Some(origin) = self.block(&menu.origin) else {
            return false;
        };

        debug!(
            subsystem = "editor",
            component = "keyboard",
            op = "select_command",
            block_id = %menu.origin,
            block_type = %block_type,
            "Command selected"
        );

        if origin.is_blank() {
            self.convert_block(&menu.origin, block_type)
        } else {
            self.insert_block(block_type, Some(&menu.origin));
            true
        }
    }

    fn on_slash(&mut self, block_id: &BlockId, text_before_cursor: &str) -> bool {
        if self.menu.is_some() || self.block(block_id).is_none() {
            return false;
        }
        if !(text_before_cursor.is_empty() || text_before_cursor.ends_with(' ')) {
            return false;
        }
        self.menu = Some(CommandMenu {
            origin: block_id.clone(),
        });
        true
    }

    fn on_enter(&mut self, block_id: &BlockId) -> bool {
        let Some(block) = self.block(block_id) else {
            return false;
        };
        let block_type = block.block_type;

        if block_type.is_list() {
            if block.is_blank() {
                self.convert_block(block_id, BlockType::Paragraph);
            } else {
                self.insert_block(block_type, Some(block_id));
            }
        } else {
            self.insert_block(BlockType::Paragraph, Some(block_id));
        }
        true
    }

    fn on_backspace(&mut self, block_id: &BlockId) -> bool {
        let Some(index) = self.position(block_id) else {
            return false;
        };
        if !self.blocks()[index].content.is_empty() {
            return false;
        }

        let predecessor = index
            .checked_sub(1)
            .map(|i| self.blocks()[i].id.clone());
        self.delete_block(block_id);
        if let Some(prev) = predecessor {
            self.request_focus(prev);
        }
        true
    }
}
