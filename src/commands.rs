//! Slash command menu
//!
//! Typing `/` in a text block opens a filterable list of block commands. The
//! text typed after the slash is the filter query; running a command removes
//! the `/query` again before applying it.

use crate::document::{BlockKind, EditorBuffer, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandGroup {
    Ai,
    Style,
    Insert,
}

impl CommandGroup {
    pub fn label(self) -> &'static str {
        match self {
            CommandGroup::Ai => "AI",
            CommandGroup::Style => "Style",
            CommandGroup::Insert => "Insert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    ContinueWriting,
    Paragraph,
    Heading(u8),
    BulletList,
    OrderedList,
    TaskList,
    Image,
    Table,
    CodeBlock,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOption {
    pub id: &'static str,
    pub label: &'static str,
    pub keywords: &'static [&'static str],
    pub group: CommandGroup,
    pub icon: &'static str,
    pub action: CommandAction,
}

impl CommandOption {
    fn matches(&self, query: &str) -> bool {
        self.label.to_lowercase().contains(query)
            || self.keywords.iter().any(|k| k.to_lowercase().contains(query))
    }
}

pub const DEFAULT_COMMANDS: &[CommandOption] = &[
    CommandOption {
        id: "continue",
        label: "Continue Writing",
        keywords: &["ai", "continue"],
        group: CommandGroup::Ai,
        icon: "✨",
        action: CommandAction::ContinueWriting,
    },
    CommandOption {
        id: "paragraph",
        label: "Paragraph",
        keywords: &["text", "p"],
        group: CommandGroup::Style,
        icon: "¶",
        action: CommandAction::Paragraph,
    },
    CommandOption {
        id: "h1",
        label: "Heading 1",
        keywords: &["title", "h1", "heading"],
        group: CommandGroup::Style,
        icon: "H1",
        action: CommandAction::Heading(1),
    },
    CommandOption {
        id: "h2",
        label: "Heading 2",
        keywords: &["subtitle", "h2", "heading"],
        group: CommandGroup::Style,
        icon: "H2",
        action: CommandAction::Heading(2),
    },
    CommandOption {
        id: "h3",
        label: "Heading 3",
        keywords: &["h3", "heading"],
        group: CommandGroup::Style,
        icon: "H3",
        action: CommandAction::Heading(3),
    },
    CommandOption {
        id: "bulletList",
        label: "Bulleted list",
        keywords: &["list", "ul", "bullet"],
        group: CommandGroup::Style,
        icon: "•",
        action: CommandAction::BulletList,
    },
    CommandOption {
        id: "orderedList",
        label: "Numbered list",
        keywords: &["list", "ol", "number"],
        group: CommandGroup::Style,
        icon: "1.",
        action: CommandAction::OrderedList,
    },
    CommandOption {
        id: "taskList",
        label: "Task list",
        keywords: &["todo", "checkbox", "tasks"],
        group: CommandGroup::Style,
        icon: "☑",
        action: CommandAction::TaskList,
    },
    CommandOption {
        id: "image",
        label: "Image (URL)",
        keywords: &["img", "picture", "media"],
        group: CommandGroup::Insert,
        icon: "🖼",
        action: CommandAction::Image,
    },
    CommandOption {
        id: "table",
        label: "Insert table",
        keywords: &["grid", "table"],
        group: CommandGroup::Insert,
        icon: "▦",
        action: CommandAction::Table,
    },
    CommandOption {
        id: "codeBlock",
        label: "Code block",
        keywords: &["code", "snippet"],
        group: CommandGroup::Insert,
        icon: "</>",
        action: CommandAction::CodeBlock,
    },
    CommandOption {
        id: "file",
        label: "File",
        keywords: &["file", "attachment", "upload"],
        group: CommandGroup::Insert,
        icon: "📄",
        action: CommandAction::File,
    },
];

/// Commands whose label or keywords contain the query, case-insensitively
pub fn filter_commands<'a>(commands: &'a [CommandOption], query: &str) -> Vec<&'a CommandOption> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return commands.iter().collect();
    }
    commands.iter().filter(|c| c.matches(&query)).collect()
}

/// Group commands, keeping groups in order of first appearance
pub fn group_commands<'a>(
    commands: &[&'a CommandOption],
) -> Vec<(CommandGroup, Vec<&'a CommandOption>)> {
    let mut groups: Vec<(CommandGroup, Vec<&'a CommandOption>)> = Vec::new();
    for command in commands {
        match groups.iter_mut().find(|(g, _)| *g == command.group) {
            Some((_, members)) => members.push(command),
            None => groups.push((command.group, vec![*command])),
        }
    }
    groups
}

/// Char offset of the last `/` in `text_before_caret` and the query after it.
/// `None` when there is no slash or the query contains whitespace.
pub fn slash_query(text_before_caret: &str) -> Option<(usize, String)> {
    let slash_byte = text_before_caret.rfind('/')?;
    let query = &text_before_caret[slash_byte + 1..];
    if query.chars().any(char::is_whitespace) {
        return None;
    }
    let slash_offset = text_before_caret[..slash_byte].chars().count();
    Some((slash_offset, query.to_string()))
}

/// Delete the trailing `/query` before the caret, if any
pub fn remove_trailing_slash_query(buffer: &mut EditorBuffer) -> bool {
    let caret = buffer.caret();
    let Some((slash_offset, _)) = slash_query(&buffer.text_before_caret()) else {
        return false;
    };
    buffer.delete_range(caret.block, slash_offset, caret.offset)
}

/// Follow-up the app has to perform after a command ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    /// Ask for a suggestion right away instead of waiting for the debounce
    RefreshSuggestion,
    Prompt(PromptKind),
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    ImageUrl,
    FilePath,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::ImageUrl => " Image URL ",
            PromptKind::FilePath => " File path ",
        }
    }
}

pub fn apply_action(buffer: &mut EditorBuffer, action: CommandAction) -> CommandOutcome {
    let changed = match action {
        CommandAction::ContinueWriting => return CommandOutcome::RefreshSuggestion,
        CommandAction::Image => return CommandOutcome::Prompt(PromptKind::ImageUrl),
        CommandAction::File => return CommandOutcome::Prompt(PromptKind::FilePath),
        CommandAction::Paragraph => buffer.set_block_kind(BlockKind::Paragraph),
        CommandAction::Heading(level) => buffer.toggle_block_kind(BlockKind::Heading { level }),
        CommandAction::BulletList => buffer.toggle_block_kind(BlockKind::BulletItem),
        CommandAction::OrderedList => buffer.toggle_block_kind(BlockKind::NumberedItem),
        CommandAction::TaskList => buffer.toggle_block_kind(BlockKind::Task { checked: false }),
        CommandAction::CodeBlock => buffer.toggle_block_kind(BlockKind::Code),
        CommandAction::Table => {
            buffer.insert_block(BlockKind::empty_table(3, 3));
            true
        }
    };
    if changed {
        CommandOutcome::Applied
    } else {
        CommandOutcome::Unchanged
    }
}

/// Remove the `/query` and apply the command
pub fn run_command(buffer: &mut EditorBuffer, command: &CommandOption) -> CommandOutcome {
    let removed = remove_trailing_slash_query(buffer);
    log::debug!("Running command {}", command.id);
    match apply_action(buffer, command.action) {
        CommandOutcome::Unchanged if removed => CommandOutcome::Applied,
        outcome => outcome,
    }
}

/// Open/closed state of the slash menu
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlashMenuState {
    visible: bool,
    query: String,
    active_index: usize,
    /// Block the menu was opened in
    block: usize,
}

impl SlashMenuState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Open after a `/` was typed at `caret`
    pub fn open(&mut self, caret: Position) {
        self.visible = true;
        self.query.clear();
        self.active_index = 0;
        self.block = caret.block;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.query.clear();
        self.active_index = 0;
    }

    /// Re-read the query after an edit or caret move; closes the menu when the
    /// caret left the block, the slash was deleted or whitespace was typed
    pub fn update(&mut self, buffer: &EditorBuffer) {
        if !self.visible {
            return;
        }
        if buffer.caret().block != self.block || !buffer.selection.is_collapsed() {
            self.close();
            return;
        }
        match slash_query(&buffer.text_before_caret()) {
            Some((_, query)) => {
                if query != self.query {
                    self.active_index = 0;
                }
                self.query = query;
            }
            None => self.close(),
        }
    }

    pub fn filtered(&self) -> Vec<&'static CommandOption> {
        if !self.visible {
            return Vec::new();
        }
        filter_commands(DEFAULT_COMMANDS, &self.query)
    }

    pub fn select_next(&mut self) {
        let len = self.filtered().len().max(1);
        self.active_index = (self.active_index + 1) % len;
    }

    pub fn select_previous(&mut self) {
        let len = self.filtered().len().max(1);
        self.active_index = (self.active_index + len - 1) % len;
    }

    /// Active command, falling back to the first match
    pub fn selected(&self) -> Option<&'static CommandOption> {
        let filtered = self.filtered();
        filtered
            .get(self.active_index)
            .or_else(|| filtered.first())
            .copied()
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod commands_tests;
