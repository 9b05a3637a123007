//! Editing buffer: a document plus the caret/selection and editing operations

use super::marks;
use super::{Block, BlockKind, Document, byte_index};

/// Caret location: block index plus char offset inside that block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub block: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// Selection between an anchor and a head; the head is the caret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    pub fn collapsed(at: Position) -> Self {
        Self {
            anchor: at,
            head: at,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    pub fn start(&self) -> Position {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> Position {
        self.anchor.max(self.head)
    }

    /// `(block, start, end)` when the selection is non-empty and inside one block
    pub fn block_range(&self) -> Option<(usize, usize, usize)> {
        if self.is_collapsed() || self.anchor.block != self.head.block {
            return None;
        }
        let start = self.start();
        let end = self.end();
        Some((start.block, start.offset, end.offset))
    }
}

/// Document plus selection, with the editing operations the editor exposes
#[derive(Debug, Clone)]
pub struct EditorBuffer {
    pub doc: Document,
    pub selection: Selection,
    char_limit: usize,
}

impl EditorBuffer {
    /// Create a buffer with the caret at the end of the document
    pub fn new(doc: Document, char_limit: usize) -> Self {
        let mut buffer = Self {
            doc,
            selection: Selection::default(),
            char_limit,
        };
        buffer.move_to_document_end();
        buffer
    }

    pub fn char_limit(&self) -> usize {
        self.char_limit
    }

    pub fn caret(&self) -> Position {
        self.selection.head
    }

    pub fn current_block(&self) -> Option<&Block> {
        self.doc.block(self.caret().block)
    }

    pub fn set_caret(&mut self, position: Position) {
        let position = self.clamp(position);
        self.selection = Selection::collapsed(position);
    }

    fn clamp(&self, position: Position) -> Position {
        let block = position.block.min(self.doc.len().saturating_sub(1));
        let max = self
            .doc
            .block(block)
            .map(|b| if b.is_text() { b.char_len() } else { 0 })
            .unwrap_or(0);
        Position::new(block, position.offset.min(max))
    }

    pub fn move_to_document_end(&mut self) {
        let last = self.doc.len().saturating_sub(1);
        let offset = self.doc.block(last).map(|b| b.char_len()).unwrap_or(0);
        self.set_caret(Position::new(last, offset));
    }

    /// Text of the caret's block from its start up to the caret
    pub fn text_before_caret(&self) -> String {
        let caret = self.caret();
        self.doc
            .block(caret.block)
            .filter(|b| b.is_text())
            .map(|b| b.text_between(0, caret.offset))
            .unwrap_or_default()
    }

    /// Chars that may still be inserted before hitting the character limit
    pub fn remaining_chars(&self) -> usize {
        self.char_limit.saturating_sub(self.doc.character_count())
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf))
    }

    /// Insert literal text at the caret, replacing any selection.
    ///
    /// Input past the character limit is truncated. The caret ends up right
    /// after the inserted text with the selection collapsed.
    pub fn insert_str(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let replaced = self.delete_selection();
        self.insert_literal(text) || replaced
    }

    /// Insert text at the caret without touching selected content.
    /// The selection collapses to the caret first.
    pub fn insert_literal(&mut self, text: &str) -> bool {
        self.selection = Selection::collapsed(self.selection.head);
        if text.is_empty() {
            return false;
        }
        let caret = self.caret();
        if !self.doc.block(caret.block).is_some_and(|b| b.is_text()) {
            return false;
        }

        let remaining = self.char_limit.saturating_sub(self.doc.character_count());
        let accepted: String = text.chars().take(remaining).collect();
        if accepted.is_empty() {
            return false;
        }
        let len = accepted.chars().count();

        let Some(block) = self.doc.block_mut(caret.block) else {
            return false;
        };
        let at = byte_index(&block.text, caret.offset);
        block.text.insert_str(at, &accepted);
        marks::shift_for_insert(&mut block.marks, caret.offset, len);

        self.selection = Selection::collapsed(Position::new(caret.block, caret.offset + len));
        true
    }

    /// Delete the char range `[start, end)` of a text block
    pub fn delete_range(&mut self, block: usize, start: usize, end: usize) -> bool {
        let Some(b) = self.doc.block_mut(block) else {
            return false;
        };
        let end = end.min(b.char_len());
        if !b.is_text() || start >= end {
            return false;
        }
        let from = byte_index(&b.text, start);
        let to = byte_index(&b.text, end);
        b.text.replace_range(from..to, "");
        marks::shift_for_delete(&mut b.marks, start, end);

        let caret = self.caret();
        if caret.block == block && caret.offset > start {
            let offset = if caret.offset >= end {
                caret.offset - (end - start)
            } else {
                start
            };
            self.selection = Selection::collapsed(Position::new(block, offset));
        }
        true
    }

    /// Delete the selected range, collapsing the selection to its start
    pub fn delete_selection(&mut self) -> bool {
        let Some((block, start, end)) = self.selection.block_range() else {
            self.selection = Selection::collapsed(self.selection.head);
            return false;
        };
        self.selection = Selection::collapsed(Position::new(block, start));
        self.delete_range(block, start, end)
    }

    pub fn backspace(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let caret = self.caret();
        let Some(block) = self.doc.block(caret.block) else {
            return false;
        };

        if !block.is_text() {
            return self.remove_block(caret.block);
        }
        if caret.offset > 0 {
            return self.delete_range(caret.block, caret.offset - 1, caret.offset);
        }
        if caret.block == 0 {
            // Backspace at the very start turns a list item or heading back into text
            if block.kind != BlockKind::Paragraph {
                return self.set_block_kind(BlockKind::Paragraph);
            }
            return false;
        }
        self.merge_with_previous(caret.block)
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let caret = self.caret();
        let Some(block) = self.doc.block(caret.block) else {
            return false;
        };
        if !block.is_text() {
            return self.remove_block(caret.block);
        }
        if caret.offset < block.char_len() {
            return self.delete_range(caret.block, caret.offset, caret.offset + 1);
        }
        if caret.block + 1 < self.doc.len() {
            return self.merge_with_previous(caret.block + 1);
        }
        false
    }

    /// Join block `index` into the block before it
    fn merge_with_previous(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.doc.len() {
            return false;
        }
        let prev_is_text = self.doc.blocks[index - 1].is_text();
        let cur_is_text = self.doc.blocks[index].is_text();

        if !prev_is_text {
            // Step onto the structural block instead of merging into it
            self.set_caret(Position::new(index - 1, 0));
            return false;
        }
        if !cur_is_text {
            return false;
        }

        let removed = self.doc.blocks.remove(index);
        let prev = &mut self.doc.blocks[index - 1];
        let join_at = prev.char_len();
        prev.text.push_str(&removed.text);
        marks::append(&mut prev.marks, &removed.marks, join_at);
        self.selection = Selection::collapsed(Position::new(index - 1, join_at));
        true
    }

    /// Enter: split the caret's block in two
    pub fn split_block(&mut self) -> bool {
        self.delete_selection();
        let caret = self.caret();
        let Some(block) = self.doc.block(caret.block) else {
            return false;
        };

        if !block.is_text() {
            let id = self.doc.next_block_id();
            self.doc
                .blocks
                .insert(caret.block + 1, Block::new(id, BlockKind::Paragraph));
            self.set_caret(Position::new(caret.block + 1, 0));
            return true;
        }

        if block.kind == BlockKind::Code {
            return self.insert_str("\n");
        }

        // Enter on an empty list item leaves the list
        let is_list = matches!(
            block.kind,
            BlockKind::BulletItem | BlockKind::NumberedItem | BlockKind::Task { .. }
        );
        if is_list && block.text.is_empty() {
            return self.set_block_kind(BlockKind::Paragraph);
        }

        let kind = block.kind.continuation();
        let id = self.doc.next_block_id();
        let block = &mut self.doc.blocks[caret.block];
        let at = byte_index(&block.text, caret.offset);
        let tail = block.text.split_off(at);
        let tail_marks = marks::split_at(&mut block.marks, caret.offset);

        let mut new_block = Block::with_text(id, kind, &tail);
        new_block.marks = tail_marks;
        self.doc.blocks.insert(caret.block + 1, new_block);
        self.set_caret(Position::new(caret.block + 1, 0));
        true
    }

    pub fn move_left(&mut self) {
        let caret = self.caret();
        if !self.selection.is_collapsed() {
            let start = self.selection.start();
            self.set_caret(start);
            return;
        }
        if caret.offset > 0 {
            self.set_caret(Position::new(caret.block, caret.offset - 1));
        } else if caret.block > 0 {
            self.set_caret(Position::new(caret.block - 1, usize::MAX));
        }
    }

    pub fn move_right(&mut self) {
        let caret = self.caret();
        if !self.selection.is_collapsed() {
            let end = self.selection.end();
            self.set_caret(end);
            return;
        }
        let len = self.block_caret_len(caret.block);
        if caret.offset < len {
            self.set_caret(Position::new(caret.block, caret.offset + 1));
        } else if caret.block + 1 < self.doc.len() {
            self.set_caret(Position::new(caret.block + 1, 0));
        }
    }

    pub fn move_home(&mut self) {
        let caret = self.caret();
        self.set_caret(Position::new(caret.block, 0));
    }

    pub fn move_end(&mut self) {
        let caret = self.caret();
        self.set_caret(Position::new(caret.block, usize::MAX));
    }

    /// Shift+Left: move the head left, keeping the anchor, within the block
    pub fn extend_left(&mut self) {
        let head = self.selection.head;
        if head.offset > 0 {
            self.selection.head = Position::new(head.block, head.offset - 1);
        }
    }

    /// Shift+Right: move the head right, keeping the anchor, within the block
    pub fn extend_right(&mut self) {
        let head = self.selection.head;
        if head.offset < self.block_caret_len(head.block) {
            self.selection.head = Position::new(head.block, head.offset + 1);
        }
    }

    fn block_caret_len(&self, index: usize) -> usize {
        self.doc
            .block(index)
            .map(|b| if b.is_text() { b.char_len() } else { 0 })
            .unwrap_or(0)
    }

    /// Change the kind of the caret's block, keeping its text
    pub fn set_block_kind(&mut self, kind: BlockKind) -> bool {
        let index = self.caret().block;
        let Some(block) = self.doc.block_mut(index) else {
            return false;
        };
        if !block.is_text() || !kind.is_text() || block.kind == kind {
            return false;
        }
        block.kind = kind;
        if block.kind == BlockKind::Code {
            block.marks.clear();
        }
        true
    }

    /// Toggle the caret's block between `kind` and a plain paragraph
    pub fn toggle_block_kind(&mut self, kind: BlockKind) -> bool {
        let same = self.current_block().map(|b| b.kind == kind).unwrap_or(false);
        if same {
            self.set_block_kind(BlockKind::Paragraph)
        } else {
            self.set_block_kind(kind)
        }
    }

    /// Flip the checked state of a task item under the caret
    pub fn toggle_task(&mut self) -> bool {
        let index = self.caret().block;
        match self.doc.block_mut(index) {
            Some(Block {
                kind: BlockKind::Task { checked },
                ..
            }) => {
                *checked = !*checked;
                true
            }
            _ => false,
        }
    }

    /// Insert a structural or text block after the caret's block.
    ///
    /// An empty paragraph under the caret is replaced instead. Structural
    /// blocks at the end of the document get a trailing paragraph so typing
    /// can continue below them. The caret lands on the new block.
    pub fn insert_block(&mut self, kind: BlockKind) -> usize {
        let caret = self.caret();
        let replace_current = self
            .doc
            .block(caret.block)
            .map(|b| b.kind == BlockKind::Paragraph && b.text.is_empty())
            .unwrap_or(false);

        let id = self.doc.next_block_id();
        let is_text = kind.is_text();
        let index = if replace_current {
            self.doc.blocks[caret.block] = Block::new(id, kind);
            caret.block
        } else {
            let index = (caret.block + 1).min(self.doc.len());
            self.doc.blocks.insert(index, Block::new(id, kind));
            index
        };

        if !is_text && index + 1 == self.doc.len() {
            let id = self.doc.next_block_id();
            self.doc.blocks.push(Block::new(id, BlockKind::Paragraph));
        }
        self.set_caret(Position::new(index, 0));
        index
    }

    /// Replace the kind of block `index`, used for structural block payload updates
    pub fn replace_block_kind(&mut self, index: usize, kind: BlockKind) -> bool {
        match self.doc.block_mut(index) {
            Some(block) if !block.is_text() && !kind.is_text() => {
                block.kind = kind;
                true
            }
            _ => false,
        }
    }

    /// Remove a block; the document always keeps at least one block
    pub fn remove_block(&mut self, index: usize) -> bool {
        if index >= self.doc.len() {
            return false;
        }
        if self.doc.len() == 1 {
            let id = self.doc.next_block_id();
            self.doc.blocks[0] = Block::new(id, BlockKind::Paragraph);
            self.set_caret(Position::new(0, 0));
            return true;
        }
        self.doc.blocks.remove(index);
        if index == 0 {
            self.set_caret(Position::new(0, 0));
        } else {
            self.set_caret(Position::new(index - 1, usize::MAX));
        }
        true
    }

    /// Insert a char into block text without touching marks, limits or the caret.
    ///
    /// Used for transient measurement probes that are removed again before
    /// anything else observes the document.
    pub(crate) fn insert_raw_char(&mut self, at: Position, c: char) -> bool {
        match self.doc.block_mut(at.block) {
            Some(block) if block.is_text() => {
                let i = byte_index(&block.text, at.offset);
                block.text.insert(i, c);
                true
            }
            _ => false,
        }
    }

    /// Remove a char previously added with `insert_raw_char`
    pub(crate) fn remove_raw_char(&mut self, at: Position) -> bool {
        match self.doc.block_mut(at.block) {
            Some(block) if block.is_text() && at.offset < block.char_len() => {
                let i = byte_index(&block.text, at.offset);
                block.text.remove(i);
                true
            }
            _ => false,
        }
    }
}
