//! Ghost-text suggestion overlay
//!
//! Tracks the caret of an [`EditorHost`], asks the suggestion worker for a
//! continuation of the text before the caret once typing pauses, and keeps
//! the suggestion plus its caret-relative position ready for rendering.
//! Tab inserts the suggestion, Escape drops it.
//!
//! Requests are tagged with a wrapping id. Only the response to the latest
//! request is applied; anything older is discarded when it arrives.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::host::{EditorHost, HostEvent, ProbeGuard, ScreenRect, Subscription};
use crate::suggest::{SuggestionContext, SuggestionRequest, SuggestionResponse};

mod debouncer;

pub use debouncer::Debouncer;

/// Default quiet period before a suggestion is requested
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("caret geometry unavailable")]
    Unavailable,
}

/// Overlay offset relative to the host container, in cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayPosition {
    pub left: i32,
    pub top: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionState {
    /// Empty when there is nothing to accept
    pub active_text: String,
    pub visible: bool,
    pub position: OverlayPosition,
}

/// Keys that dismiss or move the suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissKey {
    Escape,
    Arrow,
}

#[derive(Debug)]
pub struct SuggestionOverlay {
    state: SuggestionState,
    debouncer: Debouncer,
    subscriptions: Vec<Subscription>,
    request_tx: Option<Sender<SuggestionRequest>>,
    response_rx: Option<Receiver<SuggestionResponse>>,
    request_id: u64,
    in_flight_request_id: Option<u64>,
    disposed: bool,
}

impl SuggestionOverlay {
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: SuggestionState::default(),
            debouncer: Debouncer::new(debounce),
            subscriptions: Vec::new(),
            request_tx: None,
            response_rx: None,
            request_id: 0,
            in_flight_request_id: None,
            disposed: false,
        }
    }

    /// Register for every host event the overlay reacts to
    pub fn attach<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        if self.disposed || !self.subscriptions.is_empty() {
            return;
        }
        self.subscriptions = HostEvent::ALL
            .iter()
            .map(|event| host.subscribe(*event))
            .collect();
    }

    /// Connect to a suggestion worker
    pub fn set_channels(
        &mut self,
        request_tx: Sender<SuggestionRequest>,
        response_rx: Receiver<SuggestionResponse>,
    ) {
        self.request_tx = Some(request_tx);
        self.response_rx = Some(response_rx);
    }

    pub fn is_attached(&self) -> bool {
        !self.disposed && !self.subscriptions.is_empty()
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    /// Text to draw, `None` while hidden
    pub fn ghost_text(&self) -> Option<&str> {
        (self.state.visible && !self.state.active_text.is_empty())
            .then_some(self.state.active_text.as_str())
    }

    pub fn current_request_id(&self) -> u64 {
        self.request_id
    }

    pub fn has_in_flight_request(&self) -> bool {
        self.in_flight_request_id.is_some()
    }

    pub fn is_refresh_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// How long the event loop may sleep before the next `tick`
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_due(now)
    }

    /// Key-up, mouse-up and selection changes: restart the debounce and
    /// move the overlay to the current caret right away
    pub fn on_text_or_selection_changed<H: EditorHost + ?Sized>(&mut self, host: &mut H, now: Instant) {
        if !self.is_attached() {
            return;
        }
        self.debouncer.schedule(now);
        self.update_position(host);
    }

    /// Fire the debounced refresh once its deadline has passed
    pub fn tick<H: EditorHost + ?Sized>(&mut self, host: &mut H, now: Instant) -> bool {
        if !self.is_attached() || !self.debouncer.fire_if_due(now) {
            return false;
        }
        self.refresh_suggestion(host);
        true
    }

    /// Request a suggestion for the text before the caret
    ///
    /// Any pending debounce is cancelled. The response is applied later by
    /// `poll_responses`.
    pub fn refresh_suggestion<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        if !self.is_attached() {
            return;
        }
        self.debouncer.cancel();

        let text = self.extract_text_before_caret(host);
        let block_type = host
            .selection()
            .and_then(|selection| host.enclosing_block(selection.anchor))
            .map(|block| block.block_type.to_string());

        self.request_id = self.request_id.wrapping_add(1);
        let request = SuggestionRequest {
            request_id: self.request_id,
            context: SuggestionContext {
                text_before_cursor: text,
                block_type,
            },
        };

        let sent = self
            .request_tx
            .as_ref()
            .is_some_and(|tx| tx.send(request).is_ok());

        if sent {
            self.in_flight_request_id = Some(self.request_id);
        } else {
            log::debug!("Suggestion worker unavailable, clearing suggestion");
            self.in_flight_request_id = None;
            self.clear_suggestion();
        }
    }

    /// Apply the response to the latest request, dropping stale ones.
    /// Returns true when the visible state changed.
    pub fn poll_responses<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> bool {
        let mut applied = false;
        loop {
            let Some(rx) = &self.response_rx else {
                return applied;
            };
            let response = match rx.try_recv() {
                Ok(response) => response,
                Err(TryRecvError::Empty) => return applied,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("Suggestion worker disconnected");
                    self.response_rx = None;
                    return applied;
                }
            };

            if self.disposed || self.in_flight_request_id != Some(response.request_id) {
                log::debug!("Discarding stale suggestion {}", response.request_id);
                continue;
            }

            self.in_flight_request_id = None;
            self.state.visible = !response.text.is_empty();
            self.state.active_text = response.text;
            self.update_position(host);
            applied = true;
        }
    }

    /// Tab: insert the active suggestion. Returns true when the key was consumed.
    pub fn on_accept_key<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if !self.is_attached() || self.state.active_text.is_empty() {
            return false;
        }

        let text = std::mem::take(&mut self.state.active_text);
        if !host.insert_text_at_caret(&text) {
            log::debug!("Suggestion could not be inserted");
        }
        self.state.visible = false;
        self.in_flight_request_id = None;
        self.update_position(host);
        true
    }

    /// Escape clears the suggestion; arrows keep it and follow the caret.
    /// Returns true when the key was consumed.
    pub fn on_dismiss_key<H: EditorHost + ?Sized>(&mut self, host: &mut H, key: DismissKey) -> bool {
        if !self.is_attached() {
            return false;
        }
        match key {
            DismissKey::Escape => {
                let had_suggestion = !self.state.active_text.is_empty() || self.state.visible;
                self.clear_suggestion();
                self.in_flight_request_id = None;
                had_suggestion
            }
            DismissKey::Arrow => {
                self.update_position(host);
                false
            }
        }
    }

    /// Caret position relative to the host container
    ///
    /// When the caret has no measurable rectangle (an empty block), a
    /// zero-width probe is inserted at the caret, measured and removed again.
    pub fn compute_caret_screen_position<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
    ) -> Result<OverlayPosition, GeometryError> {
        let container = host.container_rect().ok_or(GeometryError::Unavailable)?;
        let caret = match host.caret_rect() {
            Some(rect) => rect,
            None => {
                let probe = ProbeGuard::acquire(host).ok_or(GeometryError::Unavailable)?;
                probe.rect().ok_or(GeometryError::Unavailable)?
            }
        };
        Ok(relative_position(caret, container))
    }

    /// Plain text of the caret's block from its start to the caret
    pub fn extract_text_before_caret<H: EditorHost + ?Sized>(&self, host: &H) -> String {
        let Some(selection) = host.selection() else {
            return String::new();
        };
        let caret = selection.head;
        match host.enclosing_block(selection.anchor) {
            Some(block) if block.index == caret.block => {
                host.text_between(block.index, 0, caret.offset)
            }
            _ => String::new(),
        }
    }

    /// Unsubscribe from the host and drop all suggestion state. Idempotent.
    pub fn dispose<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        for subscription in self.subscriptions.drain(..) {
            host.unsubscribe(subscription);
        }
        self.debouncer.cancel();
        self.clear_suggestion();
        self.in_flight_request_id = None;
        self.request_tx = None;
        self.response_rx = None;
        self.disposed = true;
    }

    fn clear_suggestion(&mut self) {
        self.state.active_text.clear();
        self.state.visible = false;
    }

    fn update_position<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        match self.compute_caret_screen_position(host) {
            Ok(position) => self.state.position = position,
            Err(e) => log::debug!("Keeping overlay position: {}", e),
        }
    }
}

impl Default for SuggestionOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

fn relative_position(caret: ScreenRect, container: ScreenRect) -> OverlayPosition {
    OverlayPosition {
        left: (caret.left - container.left).max(0),
        top: (caret.top - container.top).max(0),
    }
}

#[cfg(test)]
#[path = "overlay_tests.rs"]
mod overlay_tests;
