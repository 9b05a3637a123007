use std::time::Instant;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::state::{App, PromptTarget};
use crate::bubble;
use crate::commands::{self, CommandOutcome, PromptKind};
use crate::document::BlockKind;
use crate::host::HostEvent;
use crate::overlay::DismissKey;

/// Whether a handled key should still count as a key-up trigger for the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyUp {
    Notify,
    Skip,
}

impl App {
    /// Handle one terminal event
    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            // Only key presses, to avoid handling releases and repeats twice
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key, now),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse, now),
            Event::Paste(text) => self.handle_paste(&text, now),
            _ => {}
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        if self.handle_global_keys(key, now) {
            return;
        }

        if self.prompt.is_some() {
            self.handle_prompt_key(key, now);
            return;
        }

        if self.slash_menu.is_visible() && self.handle_slash_menu_key(key, now) {
            self.after_input(now, KeyUp::Notify);
            return;
        }

        if let Some(key_up) = self.handle_suggestion_key(key) {
            self.after_input(now, key_up);
            return;
        }

        self.handle_editor_key(key, now);
        self.after_input(now, KeyUp::Notify);
    }

    /// Keys that work in every mode. Returns true if the key was handled.
    fn handle_global_keys(&mut self, key: KeyEvent, now: Instant) -> bool {
        if !key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => {
                self.should_quit = true;
                true
            }
            KeyCode::Char('s') => {
                if self.persist(now)
                    && let Some(store) = &self.store
                {
                    let message = format!("Saved to {}", store.path().display());
                    self.notification.show(message, now);
                }
                true
            }
            _ => false,
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => {
                self.submit_prompt(now);
                self.after_input(now, KeyUp::Notify);
            }
            _ => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.textarea.input(key);
                }
            }
        }
    }

    /// Up/Down/Enter/Escape while the slash menu is open.
    /// Returns false for keys that should reach the editor.
    fn handle_slash_menu_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        match key.code {
            KeyCode::Up => self.slash_menu.select_previous(),
            KeyCode::Down => self.slash_menu.select_next(),
            KeyCode::Esc => self.slash_menu.close(),
            KeyCode::Enter => {
                if let Some(command) = self.slash_menu.selected() {
                    self.slash_menu.close();
                    self.run_command(command, now);
                } else {
                    self.slash_menu.close();
                }
            }
            _ => return false,
        }
        true
    }

    fn run_command(&mut self, command: &commands::CommandOption, now: Instant) {
        let mut outcome = CommandOutcome::Unchanged;
        self.host.edit(|buffer| {
            outcome = commands::run_command(buffer, command);
            outcome != CommandOutcome::Unchanged
        });

        match outcome {
            CommandOutcome::RefreshSuggestion => self.overlay.refresh_suggestion(&mut self.host),
            CommandOutcome::Prompt(kind) => self.open_prompt(kind, PromptTarget::Insert),
            CommandOutcome::Applied | CommandOutcome::Unchanged => {}
        }
        log::debug!("Command {} -> {:?} at {:?}", command.id, outcome, now);
    }

    /// Tab, Escape and arrows as seen by the overlay before the editor.
    /// Returns `Some` when the overlay consumed the key.
    fn handle_suggestion_key(&mut self, key: KeyEvent) -> Option<KeyUp> {
        if !self.host.is_subscribed(HostEvent::KeyDown) {
            return None;
        }
        match key.code {
            KeyCode::Tab if key.modifiers.is_empty() => self
                .overlay
                .on_accept_key(&mut self.host)
                .then_some(KeyUp::Notify),
            KeyCode::Esc => self
                .overlay
                .on_dismiss_key(&mut self.host, DismissKey::Escape)
                .then_some(KeyUp::Skip),
            _ => None,
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent, now: Instant) {
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if alt
            && let KeyCode::Char(c) = key.code
            && let Some(mark) = bubble::mark_for_key(c)
        {
            self.host.edit(|buffer| bubble::toggle_mark(buffer, mark));
            return;
        }

        if ctrl {
            if key.code == KeyCode::Char('t') {
                self.host.edit(|buffer| buffer.toggle_task());
            }
            return;
        }

        if self.handle_file_block_key(key, now) {
            return;
        }

        match key.code {
            KeyCode::Char(c) => {
                self.host.edit(|buffer| buffer.insert_char(c));
                if c == '/' {
                    self.open_slash_menu();
                }
            }
            KeyCode::Enter => {
                self.host.edit(|buffer| buffer.split_block());
            }
            KeyCode::Backspace => {
                self.host.edit(|buffer| buffer.backspace());
            }
            KeyCode::Delete => {
                self.host.edit(|buffer| buffer.delete_forward());
            }
            KeyCode::Left if shift => self.host.navigate(|buffer| buffer.extend_left()),
            KeyCode::Right if shift => self.host.navigate(|buffer| buffer.extend_right()),
            KeyCode::Left => self.host.navigate(|buffer| buffer.move_left()),
            KeyCode::Right => self.host.navigate(|buffer| buffer.move_right()),
            KeyCode::Up => self.host.move_vertical(-1),
            KeyCode::Down => self.host.move_vertical(1),
            KeyCode::Home => self.host.navigate(|buffer| buffer.move_home()),
            KeyCode::End => self.host.navigate(|buffer| buffer.move_end()),
            _ => return,
        }

        if matches!(
            key.code,
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down
        ) && self.host.is_subscribed(HostEvent::KeyDown)
        {
            self.overlay
                .on_dismiss_key(&mut self.host, DismissKey::Arrow);
        }
    }

    /// `o` / `r` / Delete on a focused file card
    fn handle_file_block_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let index = self.host.buffer().caret().block;
        let Some(BlockKind::File(data)) = self.host.buffer().current_block().map(|b| &b.kind)
        else {
            return false;
        };

        match key.code {
            KeyCode::Char('o') => {
                let message = match &data.href {
                    Some(href) => format!("{}: {}", data.display_title(), href),
                    None => "No file attached".to_string(),
                };
                self.notification.show(message, now);
                true
            }
            KeyCode::Char('r') => {
                self.open_prompt(PromptKind::FilePath, PromptTarget::ReplaceFile(index));
                true
            }
            KeyCode::Delete => {
                self.host.edit(|buffer| buffer.remove_block(index));
                true
            }
            _ => false,
        }
    }

    fn open_slash_menu(&mut self) {
        let opens = self
            .host
            .buffer()
            .current_block()
            .is_some_and(|b| b.is_text() && b.kind != BlockKind::Code);
        if opens {
            self.slash_menu.open(self.host.buffer().caret());
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent, now: Instant) {
        if self.prompt.is_some() {
            return;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.host.click(i32::from(mouse.column), i32::from(mouse.row)) {
                    self.slash_menu.close();
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.host.is_subscribed(HostEvent::MouseUp) {
                    self.overlay
                        .on_text_or_selection_changed(&mut self.host, now);
                }
            }
            _ => {}
        }
    }

    fn handle_paste(&mut self, text: &str, now: Instant) {
        if let Some(prompt) = &mut self.prompt {
            prompt.textarea.insert_str(text);
            return;
        }
        self.host.edit(|buffer| buffer.insert_str(text));
        self.after_input(now, KeyUp::Notify);
    }

    /// Key-up: refresh menus, persist content changes, notify the overlay
    fn after_input(&mut self, now: Instant, key_up: KeyUp) {
        self.slash_menu.update(self.host.buffer());

        if self.host.take_changed() {
            self.persist(now);
        }

        if key_up == KeyUp::Skip {
            return;
        }
        let subscribed = self.host.is_subscribed(HostEvent::KeyUp)
            || self.host.is_subscribed(HostEvent::SelectionChange);
        if subscribed {
            self.overlay
                .on_text_or_selection_changed(&mut self.host, now);
        }
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod events_tests;
