use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Layout as SplitLayout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::state::App;
use crate::bubble::{self, BUBBLE_ITEMS};
use crate::commands;
use crate::document::{BlockKind, EditorBuffer, Mark, Position, marks};
use crate::layout::{BlockLayout, structural_row};
use crate::notification::render_notification;
use crate::widgets::popup;

pub const PLACEHOLDER: &str = "Type \"/\" for commands…";
const SLASH_MENU_WIDTH: u16 = 30;
const PROMPT_WIDTH: u16 = 60;

impl App {
    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame, now: Instant) {
        let layout = SplitLayout::vertical([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());
        let editor_area = layout[0];
        let footer_area = layout[1];

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" blockpad ")
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(editor_area);
        frame.render_widget(block, editor_area);

        self.host.set_area(inner.into());
        self.render_document(frame, inner);
        self.render_ghost_text(frame, inner);

        if self.prompt.is_none() {
            self.set_cursor(frame, inner);
        }

        if bubble::is_visible(self.buffer()) {
            self.render_bubble(frame, inner);
        }
        if self.slash_menu.is_visible() {
            self.render_slash_menu(frame, inner);
        }

        self.render_footer(frame, footer_area);

        if let Some(prompt) = &self.prompt {
            let rect = popup::centered_popup(frame.area(), PROMPT_WIDTH, 3);
            popup::clear_area(frame, rect);
            frame.render_widget(&prompt.textarea, rect);
        }

        let frame_area = frame.area();
        render_notification(frame, frame_area, &self.notification, now);
    }

    fn render_document(&self, frame: &mut Frame, area: Rect) {
        let buffer = self.host.buffer();
        let layout = self.host.layout();

        if buffer.doc.is_blank() {
            let line = Line::styled(
                PLACEHOLDER,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            );
            frame
                .buffer_mut()
                .set_line(area.x, area.y, &line, area.width);
            return;
        }

        for block_layout in layout.blocks() {
            for row in 0..block_layout.rows.len() {
                let y = layout.screen_y(block_layout.top + row as i32);
                if y < area.y as i32 || y >= (area.y + area.height) as i32 {
                    continue;
                }
                let line = styled_row(buffer, block_layout, row);
                frame
                    .buffer_mut()
                    .set_line(area.x, y as u16, &line, area.width);
            }
        }
    }

    /// Draw the suggestion right after the caret, clipped to the editor area
    fn render_ghost_text(&self, frame: &mut Frame, area: Rect) {
        let Some(text) = self.overlay.ghost_text() else {
            return;
        };
        let position = self.overlay.state().position;
        let x = area.x as i32 + position.left;
        let y = area.y as i32 + position.top;
        let right = (area.x + area.width) as i32;
        if y < area.y as i32 || y >= (area.y + area.height) as i32 || x >= right {
            return;
        }

        let style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);
        let text = text.replace('\n', " ");
        frame.buffer_mut().set_stringn(
            x as u16,
            y as u16,
            text,
            (right - x) as usize,
            style,
        );
    }

    fn set_cursor(&self, frame: &mut Frame, area: Rect) {
        let buffer = self.host.buffer();
        let Some((x, y)) = self.host.layout().cell_of(&buffer.doc, buffer.caret()) else {
            return;
        };
        let inside = x >= area.x as i32
            && x < (area.x + area.width) as i32
            && y >= area.y as i32
            && y < (area.y + area.height) as i32;
        if inside {
            frame.set_cursor_position((x as u16, y as u16));
        }
    }

    fn render_slash_menu(&self, frame: &mut Frame, area: Rect) {
        let filtered = self.slash_menu.filtered();
        let active = self.slash_menu.selected().map(|c| c.id);

        let mut lines = Vec::new();
        if filtered.is_empty() {
            lines.push(Line::styled(
                " No results",
                Style::default().fg(Color::DarkGray),
            ));
        }
        for (group, members) in commands::group_commands(&filtered) {
            lines.push(Line::styled(
                format!(" {}", group.label()),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            ));
            for command in members {
                let style = if Some(command.id) == active {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default()
                };
                lines.push(Line::styled(
                    format!(" {} {}", command.icon, command.label),
                    style,
                ));
            }
        }

        let buffer = self.host.buffer();
        let (x, y) = self
            .host
            .layout()
            .cell_of(&buffer.doc, buffer.caret())
            .unwrap_or((area.x as i32, area.y as i32));
        let rect = popup::popup_near_cell(
            area,
            x.max(0) as u16,
            y.max(0) as u16,
            SLASH_MENU_WIDTH,
            lines.len() as u16 + 2,
        );

        popup::clear_area(frame, rect);
        let title = if self.slash_menu.query().is_empty() {
            " Commands ".to_string()
        } else {
            format!(" /{} ", self.slash_menu.query())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(Paragraph::new(lines).block(block), rect);
    }

    /// Format toggles floating above the selection
    fn render_bubble(&self, frame: &mut Frame, area: Rect) {
        let buffer = self.host.buffer();
        let Some((x, y)) = self
            .host
            .layout()
            .cell_of(&buffer.doc, buffer.selection.start())
        else {
            return;
        };

        let spans: Vec<Span> = BUBBLE_ITEMS
            .iter()
            .map(|item| {
                let style = if bubble::is_active(buffer, item.mark) {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default().fg(Color::White).bg(Color::DarkGray)
                };
                Span::styled(format!(" {} ", item.label), style)
            })
            .collect();
        let line = Line::from(spans);
        let width = line.width() as u16;

        let above = y - 1;
        let row = if above >= area.y as i32 { above } else { y + 1 };
        if row < area.y as i32 || row >= (area.y + area.height) as i32 {
            return;
        }
        let max_x = (area.x + area.width).saturating_sub(width) as i32;
        let col = x.clamp(area.x as i32, max_x.max(area.x as i32));
        frame
            .buffer_mut()
            .set_line(col as u16, row as u16, &line, width);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let buffer = self.host.buffer();
        let count = format!(
            " Characters: {} / {}",
            buffer.doc.character_count(),
            buffer.char_limit()
        );
        let hints = "Tab accept · Esc dismiss · / menu · ^S save · ^Q quit ";

        let used = count.width() + hints.width();
        let mut spans = vec![Span::styled(count, Style::default().fg(Color::Gray))];
        if used <= area.width as usize {
            spans.push(Span::raw(" ".repeat(area.width as usize - used)));
            spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));
        }
        let line = Line::from(spans);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// One visual row of a block with marks, selection and block styling applied
fn styled_row(buffer: &EditorBuffer, block_layout: &BlockLayout, row: usize) -> Line<'static> {
    let Some(block) = buffer.doc.block(block_layout.index) else {
        return Line::default();
    };
    let base = block_style(&block.kind);

    let prefix = if row == 0 {
        block_layout.prefix.clone()
    } else {
        " ".repeat(block_layout.prefix_width as usize)
    };
    let mut spans = vec![Span::styled(prefix, base.fg(Color::DarkGray))];

    if !block.is_text() {
        let style = if buffer.caret().block == block_layout.index {
            base.add_modifier(Modifier::REVERSED)
        } else {
            base
        };
        spans.push(Span::styled(structural_row(&block.kind, row), style));
        return Line::from(spans);
    }

    let visual = block_layout.rows[row];
    let selection = buffer.selection;
    let (start, end) = (selection.start(), selection.end());

    let mut run = String::new();
    let mut run_style = base;
    for (offset, c) in block
        .text
        .chars()
        .enumerate()
        .skip(visual.start)
        .take(visual.end - visual.start)
    {
        if c == '\n' {
            continue;
        }
        let position = Position::new(block_layout.index, offset);
        let selected = !selection.is_collapsed() && start <= position && position < end;
        let style = char_style(base, &marks::marks_at(&block.marks, offset), selected);
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(c);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    Line::from(spans)
}

fn block_style(kind: &BlockKind) -> Style {
    match kind {
        BlockKind::Heading { .. } => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        BlockKind::Code => Style::default().fg(Color::Green),
        BlockKind::Task { checked: true } => Style::default().fg(Color::DarkGray),
        BlockKind::Image { .. } | BlockKind::File(_) => Style::default().fg(Color::Magenta),
        BlockKind::Table { .. } => Style::default().fg(Color::Gray),
        _ => Style::default(),
    }
}

fn char_style(base: Style, active: &[Mark], selected: bool) -> Style {
    let mut style = base;
    for mark in active {
        style = style.add_modifier(match mark {
            Mark::Bold => Modifier::BOLD,
            Mark::Italic => Modifier::ITALIC,
            Mark::Underline => Modifier::UNDERLINED,
            Mark::Strike => Modifier::CROSSED_OUT,
        });
    }
    if selected {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
