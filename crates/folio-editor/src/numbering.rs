//! Display numbers for numbered-list blocks.
//!
//! Numbers are derived at render time and never stored. A run of consecutive
//! `numbered-list` blocks counts from 1; any other block ends the run.

use folio_core::{Block, BlockType};

/// One entry per block: `Some(n)` for numbered-list blocks, `None` otherwise.
pub fn list_numbers(blocks: &[Block]) -> Vec<Option<usize>> {
    let mut run = 0;
    blocks
        .iter()
        .map(|block| {
            if block.block_type == BlockType::NumberedList {
                run += 1;
                Some(run)
            } else {
                run = 0;
                None
            }
        })
        .collect()
}

/// Display number of the block at `index`.
pub fn number_at(blocks: &[Block], index: usize) -> Option<usize> {
    if blocks.get(index)?.block_type != BlockType::NumberedList {
        return None;
    }
    let start = blocks[..index]
        .iter()
        .rposition(|b| b.block_type != BlockType::NumberedList)
        .map(|i| i + 1)
        .unwrap_or(0);
    Some(index - start + 1)
}
