//! Terminal editing surface: an editing buffer plus its current layout

use super::{BlockRef, EditorHost, HostEvent, ProbeId, ScreenRect, Subscription};
use crate::document::{EditorBuffer, Position, Selection};
use crate::layout::Layout;

/// Zero-width space used as the measurement probe
pub const PROBE_CHAR: char = '\u{200b}';

#[derive(Debug)]
pub struct DocumentHost {
    buffer: EditorBuffer,
    layout: Layout,
    area: ScreenRect,
    scroll: i32,
    subscriptions: Vec<Subscription>,
    next_subscription_id: u64,
    probe: Option<(ProbeId, Position)>,
    next_probe_id: u64,
    changed: bool,
}

impl DocumentHost {
    pub fn new(buffer: EditorBuffer) -> Self {
        let mut host = Self {
            buffer,
            layout: Layout::default(),
            area: ScreenRect::default(),
            scroll: 0,
            subscriptions: Vec::new(),
            next_subscription_id: 1,
            probe: None,
            next_probe_id: 1,
            changed: false,
        };
        host.relayout();
        host
    }

    pub fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Apply a content edit. Marks the document changed when `edit` reports a change.
    pub fn edit(&mut self, edit: impl FnOnce(&mut EditorBuffer) -> bool) -> bool {
        let changed = edit(&mut self.buffer);
        if changed {
            self.changed = true;
        }
        self.relayout();
        changed
    }

    /// Apply a caret or selection change that leaves content untouched
    pub fn navigate(&mut self, motion: impl FnOnce(&mut EditorBuffer)) {
        motion(&mut self.buffer);
        self.relayout();
    }

    /// Returns whether content changed since the last call, resetting the flag
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Resize the container the document is laid out in
    pub fn set_area(&mut self, area: ScreenRect) {
        if area != self.area {
            self.area = area;
            self.relayout();
        }
    }

    /// Move the caret to the position under a screen cell
    pub fn click(&mut self, x: i32, y: i32) -> bool {
        if !self.area.contains(x, y) {
            return false;
        }
        match self.layout.position_at(&self.buffer.doc, x, y) {
            Some(position) => {
                self.navigate(|b| b.set_caret(position));
                true
            }
            None => false,
        }
    }

    /// Move the caret one visual row up or down, keeping its column
    pub fn move_vertical(&mut self, rows: i32) {
        let caret = self.buffer.caret();
        let Some((x, y)) = self.layout.cell_of(&self.buffer.doc, caret) else {
            return;
        };
        let target_y = y + rows;
        let doc_row = target_y - self.area.top + self.scroll;
        if doc_row < 0 || doc_row >= self.layout.total_height() {
            return;
        }
        if let Some(position) = self.layout.position_at(&self.buffer.doc, x, target_y) {
            self.navigate(|b| b.set_caret(position));
        }
    }

    pub fn is_subscribed(&self, event: HostEvent) -> bool {
        self.subscriptions.iter().any(|s| s.event == event)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Recompute the layout, scrolling so the caret stays visible
    pub fn relayout(&mut self) {
        self.layout = Layout::compute(&self.buffer.doc, self.area, self.scroll);
        let scroll = self
            .layout
            .scroll_to_reveal(&self.buffer.doc, self.buffer.caret());
        if scroll != self.scroll {
            self.scroll = scroll;
            self.layout = Layout::compute(&self.buffer.doc, self.area, self.scroll);
        }
    }
}

impl EditorHost for DocumentHost {
    fn selection(&self) -> Option<Selection> {
        Some(self.buffer.selection)
    }

    fn enclosing_block(&self, position: Position) -> Option<BlockRef> {
        self.buffer.doc.block(position.block).map(|block| BlockRef {
            index: position.block,
            block_type: block.kind.type_name(),
        })
    }

    fn text_between(&self, block: usize, start: usize, end: usize) -> String {
        self.buffer
            .doc
            .block(block)
            .filter(|b| b.is_text())
            .map(|b| b.text_between(start, end))
            .unwrap_or_default()
    }

    fn insert_text_at_caret(&mut self, text: &str) -> bool {
        self.edit(|buffer| buffer.insert_literal(text))
    }

    fn caret_rect(&self) -> Option<ScreenRect> {
        self.layout
            .caret_rect(&self.buffer.doc, self.buffer.caret())
    }

    fn container_rect(&self) -> Option<ScreenRect> {
        (self.area.width() > 0 && self.area.height() > 0).then_some(self.area)
    }

    fn insert_probe(&mut self) -> Option<ProbeId> {
        if self.probe.is_some() {
            return None;
        }
        let at = self.buffer.caret();
        if !self.buffer.insert_raw_char(at, PROBE_CHAR) {
            return None;
        }
        let id = ProbeId(self.next_probe_id);
        self.next_probe_id += 1;
        self.probe = Some((id, at));
        self.relayout();
        Some(id)
    }

    fn probe_rect(&self, probe: ProbeId) -> Option<ScreenRect> {
        match self.probe {
            Some((id, at)) if id == probe => self.layout.char_rect(&self.buffer.doc, at),
            _ => None,
        }
    }

    fn remove_probe(&mut self, probe: ProbeId) {
        if let Some((id, at)) = self.probe
            && id == probe
        {
            self.buffer.remove_raw_char(at);
            self.probe = None;
            self.relayout();
        }
    }

    fn subscribe(&mut self, event: HostEvent) -> Subscription {
        let subscription = Subscription {
            id: self.next_subscription_id,
            event,
        };
        self.next_subscription_id += 1;
        self.subscriptions.push(subscription);
        subscription
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscriptions.retain(|s| *s != subscription);
    }
}
