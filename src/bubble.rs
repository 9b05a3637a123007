//! Bubble format menu: inline mark toggles for the current selection

use crate::document::{EditorBuffer, Mark, marks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleItem {
    pub mark: Mark,
    pub label: &'static str,
    /// Pressed together with Alt
    pub key: char,
}

pub const BUBBLE_ITEMS: [BubbleItem; 4] = [
    BubbleItem {
        mark: Mark::Bold,
        label: "B",
        key: 'b',
    },
    BubbleItem {
        mark: Mark::Italic,
        label: "I",
        key: 'i',
    },
    BubbleItem {
        mark: Mark::Underline,
        label: "U",
        key: 'u',
    },
    BubbleItem {
        mark: Mark::Strike,
        label: "S",
        key: 's',
    },
];

pub fn mark_for_key(key: char) -> Option<Mark> {
    let key = key.to_ascii_lowercase();
    BUBBLE_ITEMS
        .iter()
        .find(|item| item.key == key)
        .map(|item| item.mark)
}

/// The bubble is shown for a non-empty selection inside one text block
pub fn is_visible(buffer: &EditorBuffer) -> bool {
    let Some((block, _, _)) = buffer.selection.block_range() else {
        return false;
    };
    buffer.doc.block(block).is_some_and(|b| b.is_text())
}

/// Whether the whole selection carries `mark`
pub fn is_active(buffer: &EditorBuffer, mark: Mark) -> bool {
    let Some((block, start, end)) = buffer.selection.block_range() else {
        return false;
    };
    buffer
        .doc
        .block(block)
        .is_some_and(|b| marks::covers(&b.marks, start, end, mark))
}

/// Remove `mark` from the selection if all of it has the mark, add it otherwise
pub fn toggle_mark(buffer: &mut EditorBuffer, mark: Mark) -> bool {
    if !is_visible(buffer) {
        return false;
    }
    let active = is_active(buffer, mark);
    let Some((index, start, end)) = buffer.selection.block_range() else {
        return false;
    };
    let Some(block) = buffer.doc.block_mut(index) else {
        return false;
    };
    if active {
        marks::remove_mark(&mut block.marks, start, end, mark);
    } else {
        marks::add_mark(&mut block.marks, start, end, mark);
    }
    true
}
