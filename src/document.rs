//! Block document model
//!
//! A document is an ordered list of blocks. Text blocks carry plain text plus
//! inline mark spans; structural blocks (image, table, file) carry their own
//! payload and hold the caret at offset 0.

use serde::{Deserialize, Serialize};

use crate::file_block::FileData;

mod buffer;
pub mod marks;

pub use buffer::{EditorBuffer, Position, Selection};
pub use marks::{Mark, MarkSpan};

/// Snapshot format version written to storage
pub const SNAPSHOT_VERSION: &str = "1";

pub type BlockId = u64;

/// Kind of a block, serialized as an internally tagged enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    Heading { level: u8 },
    BulletItem,
    NumberedItem,
    Task { checked: bool },
    Code,
    Image { src: String },
    Table {
        rows: Vec<Vec<String>>,
        with_header_row: bool,
    },
    File(FileData),
}

impl BlockKind {
    /// Whether the block holds editable inline text
    pub fn is_text(&self) -> bool {
        !matches!(
            self,
            BlockKind::Image { .. } | BlockKind::Table { .. } | BlockKind::File(_)
        )
    }

    /// Short type name handed to suggestion providers
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Heading { .. } => "heading",
            BlockKind::BulletItem => "bullet_item",
            BlockKind::NumberedItem => "numbered_item",
            BlockKind::Task { .. } => "task",
            BlockKind::Code => "code",
            BlockKind::Image { .. } => "image",
            BlockKind::Table { .. } => "table",
            BlockKind::File(_) => "file",
        }
    }

    /// Kind given to the block created when Enter splits a block of this kind
    pub fn continuation(&self) -> BlockKind {
        match self {
            BlockKind::BulletItem => BlockKind::BulletItem,
            BlockKind::NumberedItem => BlockKind::NumberedItem,
            BlockKind::Task { .. } => BlockKind::Task { checked: false },
            _ => BlockKind::Paragraph,
        }
    }

    /// A `rows` x `cols` table of empty cells with a header row
    pub fn empty_table(rows: usize, cols: usize) -> BlockKind {
        BlockKind::Table {
            rows: vec![vec![String::new(); cols]; rows],
            with_header_row: true,
        }
    }

    pub fn into_block(self, id: BlockId) -> Block {
        Block::new(id, self)
    }
}

/// A single block of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(flatten)]
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<MarkSpan>,
}

impl Block {
    pub fn new(id: BlockId, kind: BlockKind) -> Self {
        Self {
            id,
            kind,
            text: String::new(),
            marks: Vec::new(),
        }
    }

    pub fn with_text(id: BlockId, kind: BlockKind, text: &str) -> Self {
        Self {
            id,
            kind,
            text: text.to_string(),
            marks: Vec::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind.is_text()
    }

    /// Length of the block text in chars
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Plain text between two char offsets, clamped to the block
    pub fn text_between(&self, start: usize, end: usize) -> String {
        let end = end.min(self.char_len());
        let start = start.min(end);
        self.text.chars().skip(start).take(end - start).collect()
    }

    /// Chars counted toward the document character limit
    pub fn counted_chars(&self) -> usize {
        match &self.kind {
            BlockKind::Table { rows, .. } => rows
                .iter()
                .flat_map(|row| row.iter())
                .map(|cell| cell.chars().count())
                .sum(),
            _ => self.char_len(),
        }
    }
}

/// Serialized form of a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub version: String,
    pub blocks: Vec<Block>,
}

/// Ordered list of blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
    next_id: BlockId,
}

impl Document {
    /// Build a document from blocks; an empty list becomes one empty paragraph
    pub fn from_blocks(mut blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            blocks.push(Block::new(1, BlockKind::Paragraph));
        }
        let next_id = blocks.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        Self { blocks, next_id }
    }

    pub fn empty() -> Self {
        Self::from_blocks(Vec::new())
    }

    /// Starter content shown when nothing has been saved yet
    pub fn welcome() -> Self {
        let mut intro = Block::with_text(
            2,
            BlockKind::Paragraph,
            "Type / for commands. Select text with Shift+Arrows to see the bubble menu.",
        );
        intro.marks.push(MarkSpan::new(5, 6, Mark::Bold));

        Self::from_blocks(vec![
            Block::with_text(1, BlockKind::Heading { level: 2 }, "blockpad"),
            intro,
            Block::with_text(3, BlockKind::BulletItem, "Bold/Italic/Underline/Strike"),
            Block::with_text(4, BlockKind::BulletItem, "Task lists, tables and file blocks"),
            Block::with_text(5, BlockKind::BulletItem, "Tab accepts the grey ghost suggestion"),
            Block::new(6, BlockKind::Paragraph),
        ])
    }

    pub fn from_snapshot(snapshot: DocumentSnapshot) -> Self {
        Self::from_blocks(snapshot.blocks)
    }

    pub fn to_snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            blocks: self.blocks.clone(),
        }
    }

    /// Allocate a fresh block id
    pub fn next_block_id(&mut self) -> BlockId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    /// Total chars counted toward the character limit
    pub fn character_count(&self) -> usize {
        self.blocks.iter().map(Block::counted_chars).sum()
    }

    /// True when the document is a single empty paragraph
    pub fn is_blank(&self) -> bool {
        self.blocks.len() == 1
            && self.blocks[0].kind == BlockKind::Paragraph
            && self.blocks[0].text.is_empty()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::welcome()
    }
}

/// Byte index of a char offset in `text`, clamped to the end
pub fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod document_tests;
