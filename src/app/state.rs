use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders},
};
use tui_textarea::TextArea;

use crate::commands::{PromptKind, SlashMenuState};
use crate::config::Config;
use crate::document::{BlockKind, Document, EditorBuffer};
use crate::file_block::{self, FileData};
use crate::host::DocumentHost;
use crate::notification::NotificationState;
use crate::overlay::SuggestionOverlay;
use crate::storage::DocumentStore;
use crate::suggest::{SuggestionRequest, SuggestionResponse};

/// Where the result of a prompt goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTarget {
    /// Insert a new block after the caret's block
    Insert,
    /// Replace the payload of an existing file block
    ReplaceFile(usize),
}

/// Single-line input popup for image URLs and file paths
pub struct PromptState {
    pub kind: PromptKind,
    pub target: PromptTarget,
    pub textarea: TextArea<'static>,
}

impl PromptState {
    pub fn new(kind: PromptKind, target: PromptTarget) -> Self {
        let mut textarea = TextArea::default();
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(kind.title())
                .border_style(Style::default().fg(Color::Cyan)),
        );
        textarea.set_cursor_line_style(Style::default());
        Self {
            kind,
            target,
            textarea,
        }
    }

    pub fn value(&self) -> String {
        self.textarea.lines().join("").trim().to_string()
    }
}

/// Application state
pub struct App {
    pub host: DocumentHost,
    pub overlay: SuggestionOverlay,
    pub slash_menu: SlashMenuState,
    pub prompt: Option<PromptState>,
    pub notification: NotificationState,
    pub(super) store: Option<DocumentStore>,
    pub(super) should_quit: bool,
}

impl App {
    /// Create an app editing `document` with the caret at its end.
    /// `store` receives every content change.
    pub fn new(document: Document, config: &Config, store: Option<DocumentStore>) -> Self {
        let buffer = EditorBuffer::new(document, config.editor.character_limit);
        let mut host = DocumentHost::new(buffer);
        let mut overlay =
            SuggestionOverlay::new(Duration::from_millis(config.suggest.debounce_ms));
        if config.suggest.enabled {
            overlay.attach(&mut host);
        }

        Self {
            host,
            overlay,
            slash_menu: SlashMenuState::new(),
            prompt: None,
            notification: NotificationState::new(),
            store,
            should_quit: false,
        }
    }

    /// Connect the overlay to a running suggestion worker
    pub fn connect_suggestions(
        &mut self,
        request_tx: Sender<SuggestionRequest>,
        response_rx: Receiver<SuggestionResponse>,
    ) {
        self.overlay.set_channels(request_tx, response_rx);
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn buffer(&self) -> &EditorBuffer {
        self.host.buffer()
    }

    pub fn document(&self) -> &Document {
        &self.host.buffer().doc
    }

    /// Time-driven work: debounced refresh, worker responses, notification expiry.
    /// Returns true when the screen needs a redraw.
    pub fn tick(&mut self, now: Instant) -> bool {
        let fired = self.overlay.tick(&mut self.host, now);
        let applied = self.overlay.poll_responses(&mut self.host);
        let expired = self.notification.clear_expired(now);
        fired || applied || expired
    }

    /// Longest the event loop may wait for input before calling `tick`
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        const IDLE: Duration = Duration::from_millis(50);
        self.overlay
            .time_until_due(now)
            .map_or(IDLE, |due| due.min(IDLE))
    }

    /// Write the document to the store, reporting failures as a notification
    pub fn persist(&mut self, now: Instant) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        match store.save(&self.host.buffer().doc) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save document: {}", e);
                self.notification
                    .show_warning(format!("Save failed: {}", e), now);
                false
            }
        }
    }

    /// Tear down the overlay before exit
    pub fn shutdown(&mut self) {
        self.overlay.dispose(&mut self.host);
    }

    pub fn open_prompt(&mut self, kind: PromptKind, target: PromptTarget) {
        self.slash_menu.close();
        self.prompt = Some(PromptState::new(kind, target));
    }

    /// Apply the prompt's value. Empty image URLs are ignored; an empty file
    /// path inserts a file card that can be picked later.
    pub fn submit_prompt(&mut self, now: Instant) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let value = prompt.value();

        match (prompt.kind, prompt.target) {
            (PromptKind::ImageUrl, _) => {
                if value.is_empty() {
                    return;
                }
                self.host.edit(|b| {
                    b.insert_block(BlockKind::Image { src: value });
                    true
                });
            }
            (PromptKind::FilePath, target) => {
                let data = if value.is_empty() {
                    FileData::default()
                } else {
                    match file_block::pick(std::path::Path::new(&value)) {
                        Ok(data) => data,
                        Err(e) => {
                            self.notification
                                .show_warning(format!("Cannot attach {}: {}", value, e), now);
                            return;
                        }
                    }
                };
                match target {
                    PromptTarget::Insert => {
                        self.host.edit(|b| {
                            b.insert_block(BlockKind::File(data.save()));
                            true
                        });
                    }
                    PromptTarget::ReplaceFile(index) => {
                        self.host
                            .edit(|b| b.replace_block_kind(index, BlockKind::File(data.save())));
                    }
                }
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Document::welcome(), &Config::default(), None)
    }
}
