//! Terminal layout of the block document
//!
//! Wraps each block into visual rows for a given container width and answers
//! geometry queries: where the caret is on screen, which document position a
//! screen cell maps to, and how far to scroll to keep the caret visible.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthChar;

use crate::document::{Block, BlockKind, Document, Position};

/// Rectangle in terminal cell coordinates, right/bottom exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

impl From<Rect> for ScreenRect {
    fn from(rect: Rect) -> Self {
        ScreenRect::new(
            rect.x as i32,
            rect.y as i32,
            rect.width as i32,
            rect.height as i32,
        )
    }
}

/// One visual row of a block: the char range `[start, end)` it shows.
///
/// A row ending in a hard line break includes the `\n` in its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualRow {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout {
    pub index: usize,
    /// First row of the block in document space (before scrolling)
    pub top: i32,
    pub prefix: String,
    pub prefix_width: i32,
    pub rows: Vec<VisualRow>,
}

impl BlockLayout {
    pub fn height(&self) -> i32 {
        self.rows.len() as i32
    }

    /// Row index and display column of a char offset inside this block
    fn locate(&self, block: &Block, offset: usize) -> (usize, i32) {
        let last = self.rows.len().saturating_sub(1);
        let row_index = self
            .rows
            .iter()
            .position(|row| offset < row.end)
            .unwrap_or(last)
            .min(last);
        let row = self.rows[row_index];
        let col = block
            .text
            .chars()
            .skip(row.start)
            .take(offset.saturating_sub(row.start))
            .filter(|c| *c != '\n')
            .map(|c| c.width().unwrap_or(0) as i32)
            .sum();
        (row_index, col)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    area: ScreenRect,
    scroll: i32,
    blocks: Vec<BlockLayout>,
    total_height: i32,
}

impl Layout {
    /// Lay out every block of `doc` inside `area`, scrolled by `scroll` rows
    pub fn compute(doc: &Document, area: ScreenRect, scroll: i32) -> Self {
        let mut blocks = Vec::with_capacity(doc.len());
        let mut top = 0;
        let mut ordinal = 0;

        for (index, block) in doc.blocks.iter().enumerate() {
            ordinal = if block.kind == BlockKind::NumberedItem {
                ordinal + 1
            } else {
                0
            };
            let prefix = block_prefix(&block.kind, ordinal);
            let prefix_width = prefix
                .chars()
                .map(|c| c.width().unwrap_or(0) as i32)
                .sum::<i32>();
            let text_width = (area.width() - prefix_width - 1).max(1) as usize;

            let rows = if block.is_text() {
                wrap_rows(&block.text, text_width)
            } else {
                vec![VisualRow { start: 0, end: 0 }; structural_height(&block.kind)]
            };

            let layout = BlockLayout {
                index,
                top,
                prefix,
                prefix_width,
                rows,
            };
            top += layout.height();
            blocks.push(layout);
        }

        Self {
            area,
            scroll: scroll.max(0),
            blocks,
            total_height: top,
        }
    }

    pub fn area(&self) -> ScreenRect {
        self.area
    }

    pub fn scroll(&self) -> i32 {
        self.scroll
    }

    pub fn blocks(&self) -> &[BlockLayout] {
        &self.blocks
    }

    pub fn total_height(&self) -> i32 {
        self.total_height
    }

    /// Screen row of a document-space row
    pub fn screen_y(&self, doc_row: i32) -> i32 {
        self.area.top + doc_row - self.scroll
    }

    /// Screen cell of a position, regardless of whether a glyph is there
    pub fn cell_of(&self, doc: &Document, position: Position) -> Option<(i32, i32)> {
        let block = doc.block(position.block)?;
        let layout = self.blocks.get(position.block)?;
        if !block.is_text() {
            return Some((self.area.left, self.screen_y(layout.top)));
        }
        let (row, col) = layout.locate(block, position.offset);
        Some((
            self.area.left + layout.prefix_width + col,
            self.screen_y(layout.top + row as i32),
        ))
    }

    /// Rectangle of the collapsed caret.
    ///
    /// An empty text block has no glyph to measure against and yields `None`.
    pub fn caret_rect(&self, doc: &Document, position: Position) -> Option<ScreenRect> {
        let block = doc.block(position.block)?;
        if block.is_text() && block.text.is_empty() {
            return None;
        }
        let (x, y) = self.cell_of(doc, position)?;
        Some(ScreenRect::new(x, y, 0, 1))
    }

    /// Rectangle of the char at `position`
    pub fn char_rect(&self, doc: &Document, position: Position) -> Option<ScreenRect> {
        let block = doc.block(position.block)?;
        let c = block.text.chars().nth(position.offset)?;
        let (x, y) = self.cell_of(doc, position)?;
        Some(ScreenRect::new(x, y, c.width().unwrap_or(0) as i32, 1))
    }

    /// Document position under a screen cell, clamped to the nearest block
    pub fn position_at(&self, doc: &Document, x: i32, y: i32) -> Option<Position> {
        let doc_row = y - self.area.top + self.scroll;
        let layout = self
            .blocks
            .iter()
            .find(|b| doc_row >= b.top && doc_row < b.top + b.height())
            .or_else(|| {
                if doc_row < 0 {
                    self.blocks.first()
                } else {
                    self.blocks.last()
                }
            })?;
        let block = doc.block(layout.index)?;
        if !block.is_text() {
            return Some(Position::new(layout.index, 0));
        }

        let row_index = (doc_row - layout.top).clamp(0, layout.height() - 1) as usize;
        let row = layout.rows[row_index];
        let is_last = row_index + 1 == layout.rows.len();
        let chars: Vec<char> = block.text.chars().collect();
        let limit = if is_last {
            row.end
        } else {
            row.end.saturating_sub(1).max(row.start)
        };

        let col = (x - self.area.left - layout.prefix_width).max(0);
        let mut acc = 0;
        for (offset, c) in chars.iter().enumerate().take(limit).skip(row.start) {
            let w = c.width().unwrap_or(0) as i32;
            if col < acc + w {
                return Some(Position::new(layout.index, offset));
            }
            acc += w;
        }
        Some(Position::new(layout.index, limit))
    }

    /// Scroll offset that keeps `position` inside the visible area
    pub fn scroll_to_reveal(&self, doc: &Document, position: Position) -> i32 {
        let Some((_, y)) = self.cell_of(doc, position) else {
            return self.scroll;
        };
        let doc_row = y - self.area.top + self.scroll;
        let height = self.area.height().max(1);
        if doc_row < self.scroll {
            doc_row
        } else if doc_row >= self.scroll + height {
            doc_row - height + 1
        } else {
            self.scroll
        }
    }

    /// Plain-text rendering of the visible rows, without styling
    pub fn render_plain(&self, doc: &Document) -> Vec<String> {
        let mut lines = Vec::new();
        for layout in &self.blocks {
            let Some(block) = doc.block(layout.index) else {
                continue;
            };
            for (i, row) in layout.rows.iter().enumerate() {
                let y = self.screen_y(layout.top + i as i32);
                if y < self.area.top || y >= self.area.bottom {
                    continue;
                }
                let body = if block.is_text() {
                    block
                        .text
                        .chars()
                        .skip(row.start)
                        .take(row.end - row.start)
                        .filter(|c| *c != '\n')
                        .collect()
                } else {
                    structural_row(&block.kind, i)
                };
                let prefix = if i == 0 {
                    layout.prefix.clone()
                } else {
                    " ".repeat(layout.prefix_width as usize)
                };
                lines.push(format!("{}{}", prefix, body));
            }
        }
        lines
    }
}

/// Marker drawn before a block's first row
pub fn block_prefix(kind: &BlockKind, ordinal: usize) -> String {
    match kind {
        BlockKind::Heading { level } => format!("{} ", "#".repeat((*level).clamp(1, 3) as usize)),
        BlockKind::BulletItem => "• ".to_string(),
        BlockKind::NumberedItem => format!("{}. ", ordinal.max(1)),
        BlockKind::Task { checked: true } => "[x] ".to_string(),
        BlockKind::Task { checked: false } => "[ ] ".to_string(),
        BlockKind::Code => "│ ".to_string(),
        _ => String::new(),
    }
}

fn structural_height(kind: &BlockKind) -> usize {
    match kind {
        BlockKind::Table {
            rows,
            with_header_row,
        } => rows.len().max(1) + usize::from(*with_header_row && rows.len() > 1),
        _ => 1,
    }
}

/// Text of row `row` of a structural block
pub fn structural_row(kind: &BlockKind, row: usize) -> String {
    match kind {
        BlockKind::Image { src } => format!("🖼  {}", src),
        BlockKind::File(data) => {
            let size = data.display_size();
            let size = if size.is_empty() {
                String::new()
            } else {
                format!(" · {}", size)
            };
            format!(
                "📄 {}{}  [o] Open  [r] {}  [Del] Delete",
                data.display_title(),
                size,
                data.pick_label()
            )
        }
        BlockKind::Table {
            rows,
            with_header_row,
        } => {
            let has_rule = *with_header_row && rows.len() > 1;
            if has_rule && row == 1 {
                let cols = rows.first().map(|r| r.len()).unwrap_or(0);
                let widths = column_widths(rows);
                let cells: Vec<String> = (0..cols).map(|c| "─".repeat(widths[c] + 2)).collect();
                return format!("├{}┤", cells.join("┼"));
            }
            let data_row = if has_rule && row > 1 { row - 1 } else { row };
            let widths = column_widths(rows);
            let cells: Vec<String> = rows
                .get(data_row)
                .map(|r| {
                    r.iter()
                        .enumerate()
                        .map(|(c, cell)| format!(" {:<width$} ", cell, width = widths[c]))
                        .collect()
                })
                .unwrap_or_default();
            format!("│{}│", cells.join("│"))
        }
        _ => String::new(),
    }
}

fn column_widths(rows: &[Vec<String>]) -> Vec<usize> {
    let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    (0..cols)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(3)
        })
        .collect()
}

/// Char-wrap `text` into rows of at most `width` display columns
fn wrap_rows(text: &str, width: usize) -> Vec<VisualRow> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut col = 0;
    let mut count = 0;

    for (i, c) in text.chars().enumerate() {
        count = i + 1;
        if c == '\n' {
            rows.push(VisualRow { start, end: i + 1 });
            start = i + 1;
            col = 0;
            continue;
        }
        let w = c.width().unwrap_or(0);
        if col + w > width && col > 0 {
            rows.push(VisualRow { start, end: i });
            start = i;
            col = 0;
        }
        col += w;
    }
    rows.push(VisualRow { start, end: count });
    rows
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod layout_tests;
