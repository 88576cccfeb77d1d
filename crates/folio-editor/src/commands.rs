//! Command (slash) menu catalogue.

use folio_core::BlockType;

/// One selectable entry of the command menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandItem {
    pub block_type: BlockType,
    pub title: &'static str,
    pub description: &'static str,
    pub shortcut: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandCategory {
    pub name: &'static str,
    pub items: &'static [CommandItem],
}

const fn item(
    block_type: BlockType,
    title: &'static str,
    description: &'static str,
    shortcut: &'static str,
) -> CommandItem {
    CommandItem {
        block_type,
        title,
        description,
        shortcut,
    }
}

/// Menu contents in display order.
pub const COMMAND_MENU: &[CommandCategory] = &[
    CommandCategory {
        name: "Basic Blocks",
        items: &[
            item(BlockType::Heading1, "Heading 1", "Top-level heading", "⌘⌥1"),
            item(BlockType::Heading2, "Heading 2", "Key section heading", "⌘⌥2"),
            item(BlockType::Heading3, "Heading 3", "Subsection heading", "⌘⌥3"),
            item(BlockType::Paragraph, "Paragraph", "The body of your document", "⌘⌥0"),
        ],
    },
    CommandCategory {
        name: "Lists",
        items: &[
            item(BlockType::BulletList, "Bullet List", "List with unordered items", "⌘⇧8"),
            item(BlockType::NumberedList, "Numbered List", "List with ordered items", "⌘⇧7"),
            item(BlockType::CheckboxList, "Check List", "List with checkboxes", "⌘⇧9"),
        ],
    },
    CommandCategory {
        name: "Advanced",
        items: &[item(
            BlockType::Code,
            "Code Block",
            "Code block with syntax highlighting",
            "⌘⌥C",
        )],
    },
    CommandCategory {
        name: "Media",
        items: &[
            item(BlockType::Image, "Image", "Upload an image file", "⌘⌥I"),
            item(BlockType::Video, "Video", "Upload a video file", "⌘⌥V"),
            item(BlockType::Audio, "Audio", "Upload an audio file", "⌘⌥A"),
        ],
    },
];

/// Catalogue entry for a block type.
pub fn lookup(block_type: BlockType) -> Option<&'static CommandItem> {
    COMMAND_MENU
        .iter()
        .flat_map(|category| category.items.iter())
        .find(|item| item.block_type == block_type)
}

/// Entries whose title contains `query` (case-insensitive), grouped by
/// category. Categories with no match are dropped.
pub fn filter(query: &str) -> Vec<(&'static str, Vec<&'static CommandItem>)> {
    let needle = query.trim().to_lowercase();
    COMMAND_MENU
        .iter()
        .filter_map(|category| {
            let items: Vec<_> = category
                .items
                .iter()
                .filter(|item| item.title.to_lowercase().contains(&needle))
                .collect();
            (!items.is_empty()).then_some((category.name, items))
        })
        .collect()
}
