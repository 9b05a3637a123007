//! Host adapter between the suggestion overlay and an editing surface
//!
//! The overlay never reaches into the editor directly. It asks an
//! [`EditorHost`] for the selection, the enclosing block, caret geometry and
//! text insertion, and registers for input events through it. This keeps the
//! controller testable against a fake host.

use crate::document::{Position, Selection};

mod document_host;

pub use crate::layout::ScreenRect;
pub use document_host::DocumentHost;

/// Raw input events a controller can listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEvent {
    KeyDown,
    KeyUp,
    MouseUp,
    SelectionChange,
}

impl HostEvent {
    pub const ALL: [HostEvent; 4] = [
        HostEvent::KeyDown,
        HostEvent::KeyUp,
        HostEvent::MouseUp,
        HostEvent::SelectionChange,
    ];
}

/// Handle returned by [`EditorHost::subscribe`], needed to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    pub id: u64,
    pub event: HostEvent,
}

/// Handle of a temporary zero-width measurement marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeId(pub u64);

/// The block containing a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRef {
    pub index: usize,
    pub block_type: &'static str,
}

/// Editing surface consumed by the suggestion overlay
pub trait EditorHost {
    /// Current selection, `None` when nothing is focused
    fn selection(&self) -> Option<Selection>;

    /// Block enclosing `position`
    fn enclosing_block(&self, position: Position) -> Option<BlockRef>;

    /// Plain text of block `block` between two char offsets
    fn text_between(&self, block: usize, start: usize, end: usize) -> String;

    /// Insert literal text at the caret, leaving the caret right after it
    /// with the selection collapsed. Selected text stays in place.
    /// Returns false if nothing was inserted.
    fn insert_text_at_caret(&mut self, text: &str) -> bool;

    /// Rectangle of the collapsed caret, `None` when it cannot be measured
    fn caret_rect(&self) -> Option<ScreenRect>;

    /// Rectangle of the container the overlay is positioned in
    fn container_rect(&self) -> Option<ScreenRect>;

    /// Insert a zero-width marker at the caret
    fn insert_probe(&mut self) -> Option<ProbeId>;

    /// Rectangle of a marker inserted with `insert_probe`
    fn probe_rect(&self, probe: ProbeId) -> Option<ScreenRect>;

    /// Remove a marker, restoring the surface to its prior state
    fn remove_probe(&mut self, probe: ProbeId);

    fn subscribe(&mut self, event: HostEvent) -> Subscription;

    fn unsubscribe(&mut self, subscription: Subscription);
}

/// Scoped zero-width probe: removed from the host when dropped
pub struct ProbeGuard<'a, H: EditorHost + ?Sized> {
    host: &'a mut H,
    probe: ProbeId,
}

impl<'a, H: EditorHost + ?Sized> ProbeGuard<'a, H> {
    pub fn acquire(host: &'a mut H) -> Option<Self> {
        let probe = host.insert_probe()?;
        Some(Self { host, probe })
    }

    pub fn rect(&self) -> Option<ScreenRect> {
        self.host.probe_rect(self.probe)
    }
}

impl<H: EditorHost + ?Sized> Drop for ProbeGuard<'_, H> {
    fn drop(&mut self) {
        self.host.remove_probe(self.probe);
    }
}
