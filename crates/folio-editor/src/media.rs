//! Media attachment for image, video, and audio blocks.
//!
//! Files are embedded in the block as `data:` URIs. A file is accepted when
//! its declared MIME type or the type sniffed from its magic bytes belongs to
//! the block's family. Audio and video share container formats (WebM, Ogg,
//! MP4), so a sniffed audio type never vetoes a declared video type or the
//! other way round. A mismatch is rejected before the block is touched.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use tracing::{debug, warn};

use folio_core::{BlockId, BlockMetadata, BlockType};

use crate::state::{BlockPatch, Editor};

/// A file picked or dropped by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub bytes: Vec<u8>,
    /// MIME type reported by the picker, if any.
    pub declared_type: Option<String>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            declared_type: None,
        }
    }

    pub fn with_declared_type(mut self, mime: impl Into<String>) -> Self {
        self.declared_type = Some(mime.into());
        self
    }

    /// Sniffed MIME type, else the declared one, else `application/octet-stream`.
    pub fn mime_type(&self) -> String {
        if let Some(kind) = infer::get(&self.bytes) {
            return kind.mime_type().to_string();
        }
        self.declared_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string())
    }

    /// MIME type to store for a block of `family` (`image`, `video`,
    /// `audio`), or `None` when the file does not belong there.
    ///
    /// A matching declared type wins, since it carries the audio/video
    /// distinction that container sniffing cannot.
    pub fn mime_for_family(&self, family: &str) -> Option<String> {
        let prefix = format!("{}/", family);
        let sniffed = infer::get(&self.bytes).map(|kind| kind.mime_type());

        if let Some(declared) = self.declared_type.as_deref() {
            let sniff_allows = match sniffed {
                None => true,
                Some(mime) => mime.starts_with(&prefix) || (is_av(mime) && is_av(&prefix)),
            };
            if declared.starts_with(&prefix) && sniff_allows {
                return Some(declared.to_string());
            }
        }

        sniffed
            .filter(|mime| mime.starts_with(&prefix))
            .map(str::to_string)
    }

    pub fn to_data_uri(&self, mime: &str) -> String {
        format!("data:{};base64,{}", mime, STANDARD.encode(&self.bytes))
    }
}

/// Media attachment failures. Display strings are meant for the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("Please select {} {} file", article(.expected), .expected)]
    WrongType { expected: &'static str, found: String },

    #[error("Block {0} does not accept media")]
    NotMediaBlock(BlockId),

    #[error("Block {0} not found")]
    BlockNotFound(BlockId),
}

fn is_av(mime: &str) -> bool {
    mime.starts_with("audio/") || mime.starts_with("video/")
}

fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Human-readable size, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

impl Editor {
    /// Embed `file` in a media block and append an empty paragraph after it.
    ///
    /// Returns the id of the new paragraph. On error the block is unchanged.
    pub fn attach_media(
        &mut self,
        block_id: &BlockId,
        file: &MediaFile,
    ) -> Result<BlockId, MediaError> {
        let block = self
            .block(block_id)
            .ok_or_else(|| MediaError::BlockNotFound(block_id.clone()))?;
        let expected = block
            .block_type
            .media_family()
            .ok_or_else(|| MediaError::NotMediaBlock(block_id.clone()))?;

        let Some(mime) = file.mime_for_family(expected) else {
            let found = file.mime_type();
            warn!(
                subsystem = "editor",
                component = "media",
                op = "attach",
                block_id = %block_id,
                expected,
                found = %found,
                "Rejected media with wrong type"
            );
            return Err(MediaError::WrongType { expected, found });
        };

        let size = file.bytes.len() as u64;
        let patch = BlockPatch::metadata(BlockMetadata::media(&file.name, size, &mime))
            .with_content(file.to_data_uri(&mime));
        self.update_block_content(block_id, patch);

        debug!(
            subsystem = "editor",
            component = "media",
            op = "attach",
            block_id = %block_id,
            mime = %mime,
            size,
            "Media attached"
        );

        Ok(self.insert_block(BlockType::Paragraph, Some(block_id)))
    }

    /// Clear the embedded file, keeping the block and its type.
    pub fn remove_media(&mut self, block_id: &BlockId) -> bool {
        self.update_block_content(block_id, BlockPatch::content("").clear_metadata())
    }

    /// Abandon an empty media block, turning it back into a paragraph.
    pub fn cancel_media(&mut self, block_id: &BlockId) -> bool {
        self.update_block_content(
            block_id,
            BlockPatch::content("").with_type(BlockType::Paragraph),
        )
    }
}
