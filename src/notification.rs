//! Transient status messages
//!
//! Any part of the app can post a message; it stays on screen until it
//! expires or is replaced by a newer one.

use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::widgets::popup;

const INFO_DURATION: Duration = Duration::from_millis(2500);
const WARNING_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct NotificationState {
    current: Option<Notification>,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.post(message.into(), NotificationKind::Info, now + INFO_DURATION);
    }

    pub fn show_warning(&mut self, message: impl Into<String>, now: Instant) {
        self.post(message.into(), NotificationKind::Warning, now + WARNING_DURATION);
    }

    fn post(&mut self, message: String, kind: NotificationKind, expires_at: Instant) {
        log::debug!("Notification: {}", message);
        self.current = Some(Notification {
            message,
            kind,
            expires_at,
        });
    }

    /// Active notification, `None` once it has expired
    pub fn current(&self, now: Instant) -> Option<&Notification> {
        self.current.as_ref().filter(|n| now < n.expires_at)
    }

    /// Drop an expired notification. Returns true when one was removed.
    pub fn clear_expired(&mut self, now: Instant) -> bool {
        if self.current.is_some() && self.current(now).is_none() {
            self.current = None;
            return true;
        }
        false
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

/// Draw the notification in the top-right corner of `area`
pub fn render_notification(frame: &mut Frame, area: Rect, state: &NotificationState, now: Instant) {
    let Some(notification) = state.current(now) else {
        return;
    };

    let color = match notification.kind {
        NotificationKind::Info => Color::Cyan,
        NotificationKind::Warning => Color::Yellow,
    };

    let width = (notification.message.width() as u16 + 4).min(area.width);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height: 3.min(area.height),
    };

    popup::clear_area(frame, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let paragraph = Paragraph::new(Line::from(notification.message.as_str()))
        .style(Style::default().fg(color))
        .block(block);
    frame.render_widget(paragraph, rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_show_and_expire() {
        let now = Instant::now();
        let mut state = NotificationState::new();
        state.show("Saved", now);

        assert_eq!(state.current(now).unwrap().message, "Saved");
        assert!(state.current(now + INFO_DURATION).is_none());
        assert!(!state.clear_expired(now));
        assert!(state.clear_expired(now + INFO_DURATION));
        assert!(!state.clear_expired(now + INFO_DURATION));
    }

    #[test]
    fn test_newer_message_replaces_older() {
        let now = Instant::now();
        let mut state = NotificationState::new();
        state.show("first", now);
        state.show_warning("second", now);

        let current = state.current(now).unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.kind, NotificationKind::Warning);
        assert!(state.current(now + INFO_DURATION).is_some());
    }

    #[test]
    fn test_render_draws_message() {
        let now = Instant::now();
        let mut state = NotificationState::new();
        state.show("Saved", now);

        let mut terminal = Terminal::new(TestBackend::new(30, 5)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render_notification(f, area, &state, now)
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..30).map(|x| buffer[(x, 2)].symbol().to_string()).collect();
        assert!(row.contains("Saved"));
    }

    #[test]
    fn test_render_nothing_when_empty() {
        let state = NotificationState::new();
        let mut terminal = Terminal::new(TestBackend::new(20, 4)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render_notification(f, area, &state, Instant::now())
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        assert!(buffer.content().iter().all(|c| c.symbol() == " "));
    }
}
