//! Core data models for folio.
//!
//! These types are shared across all folio crates and define the JSON wire
//! format used by the REST API and stored in the `notes.blocks` column.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults::BLOCK_ID_PREFIX;
use crate::error::{Error, FieldError, Result};

// =============================================================================
// BLOCK TYPES
// =============================================================================

/// The fixed set of content block types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
pub enum BlockType {
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "heading-1")]
    Heading1,
    #[serde(rename = "heading-2")]
    Heading2,
    #[serde(rename = "heading-3")]
    Heading3,
    #[serde(rename = "bullet-list")]
    BulletList,
    #[serde(rename = "numbered-list")]
    NumberedList,
    #[serde(rename = "checkbox-list")]
    CheckboxList,
    #[serde(rename = "code")]
    Code,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "video")]
    Video,
    #[serde(rename = "audio")]
    Audio,
}

impl BlockType {
    /// Every block type, in command-menu order of appearance on the wire enum.
    pub const ALL: [BlockType; 11] = [
        BlockType::Paragraph,
        BlockType::Heading1,
        BlockType::Heading2,
        BlockType::Heading3,
        BlockType::BulletList,
        BlockType::NumberedList,
        BlockType::CheckboxList,
        BlockType::Code,
        BlockType::Image,
        BlockType::Video,
        BlockType::Audio,
    ];

    /// Wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading1 => "heading-1",
            BlockType::Heading2 => "heading-2",
            BlockType::Heading3 => "heading-3",
            BlockType::BulletList => "bullet-list",
            BlockType::NumberedList => "numbered-list",
            BlockType::CheckboxList => "checkbox-list",
            BlockType::Code => "code",
            BlockType::Image => "image",
            BlockType::Video => "video",
            BlockType::Audio => "audio",
        }
    }

    /// List types continue themselves on Enter and collapse to a paragraph when empty.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            BlockType::BulletList | BlockType::NumberedList | BlockType::CheckboxList
        )
    }

    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            BlockType::Heading1 | BlockType::Heading2 | BlockType::Heading3
        )
    }

    /// Media blocks carry a data URI or remote reference as content.
    pub fn is_media(&self) -> bool {
        self.media_family().is_some()
    }

    /// MIME top-level type accepted by a media block (`image`, `video`, `audio`).
    pub fn media_family(&self) -> Option<&'static str> {
        match self {
            BlockType::Image => Some("image"),
            BlockType::Video => Some("video"),
            BlockType::Audio => Some("audio"),
            _ => None,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown block type: {}", s)))
    }
}

// =============================================================================
// BLOCK METADATA
// =============================================================================

/// Checkbox state of a `checkbox-list` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CheckboxMetadata {
    pub checked: bool,
}

/// File details of an uploaded image, video, or audio block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MediaMetadata {
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
}

/// Explicitly empty metadata object (`{}`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct EmptyMetadata {}

/// Type-specific block metadata.
///
/// Serialized without a tag: the wire shape alone selects the variant, so
/// `{"checked": true}` and `{"fileName": .., "fileSize": .., "fileType": ..}`
/// stay compatible with stored documents. Any other shape is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum BlockMetadata {
    Checkbox(CheckboxMetadata),
    Media(MediaMetadata),
    Empty(EmptyMetadata),
}

impl BlockMetadata {
    pub fn checkbox(checked: bool) -> Self {
        BlockMetadata::Checkbox(CheckboxMetadata { checked })
    }

    pub fn media(
        file_name: impl Into<String>,
        file_size: u64,
        file_type: impl Into<String>,
    ) -> Self {
        BlockMetadata::Media(MediaMetadata {
            file_name: file_name.into(),
            file_size,
            file_type: file_type.into(),
        })
    }
}

// =============================================================================
// BLOCK
// =============================================================================

/// Opaque block identifier, unique within a note.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Generate a fresh id. UUIDv7 keeps ids unique and never reused.
    pub fn generate() -> Self {
        BlockId(format!("{}{}", BLOCK_ID_PREFIX, uuid::Uuid::now_v7()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        BlockId(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        BlockId(s)
    }
}

/// One unit of document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BlockMetadata>,
}

impl Block {
    /// New empty block with a freshly generated id.
    pub fn new(block_type: BlockType) -> Self {
        Self {
            id: BlockId::generate(),
            block_type,
            content: String::new(),
            metadata: None,
        }
    }

    /// Block with an explicit id, used when building fixtures and seeds.
    pub fn with_id(
        id: impl Into<BlockId>,
        block_type: BlockType,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            block_type,
            content: content.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: BlockMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// True when the content is empty after trimming whitespace.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Checkbox state; false for anything without checkbox metadata.
    pub fn is_checked(&self) -> bool {
        matches!(
            self.metadata,
            Some(BlockMetadata::Checkbox(CheckboxMetadata { checked: true }))
        )
    }

    pub fn media(&self) -> Option<&MediaMetadata> {
        match &self.metadata {
            Some(BlockMetadata::Media(media)) => Some(media),
            _ => None,
        }
    }

    /// Text blocks take part in search; media payloads do not.
    pub fn is_searchable(&self) -> bool {
        !self.block_type.is_media()
    }
}

/// Validate a block sequence, collecting every field-level problem.
pub fn validate_blocks(blocks: &[Block], path: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, block) in blocks.iter().enumerate() {
        let field = format!("{}[{}].id", path, i);
        if block.id.as_str().trim().is_empty() {
            errors.push(FieldError::new(field, "must not be empty"));
        } else if !seen.insert(block.id.as_str()) {
            errors.push(FieldError::new(
                field,
                format!("duplicate block id \"{}\"", block.id),
            ));
        }
    }

    errors
}

// =============================================================================
// NOTE
// =============================================================================

/// A titled, ordered collection of blocks persisted as one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i32,
    pub title: String,
    pub blocks: Vec<Block>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Case-insensitive substring match on title and text-block content.
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        if self.title.to_lowercase().contains(needle) {
            return true;
        }
        self.blocks
            .iter()
            .filter(|b| b.is_searchable())
            .any(|b| b.content.to_lowercase().contains(needle))
    }
}

/// Request for creating a new note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateNoteRequest {
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl CreateNoteRequest {
    pub fn new(title: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            title: title.into(),
            blocks,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let errors = validate_blocks(&self.blocks, "blocks");
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }
}

/// Partial update of a note. The block array, when present, replaces the stored one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateNoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
}

impl UpdateNoteRequest {
    pub fn validate(&self) -> Result<()> {
        let errors = self
            .blocks
            .as_deref()
            .map(|blocks| validate_blocks(blocks, "blocks"))
            .unwrap_or_default();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.blocks.is_none()
    }
}
