//! Tests for the slash command menu

use super::*;
use crate::document::{Block, Document};
use proptest::prelude::*;

fn buffer_with(text: &str) -> EditorBuffer {
    let doc = Document::from_blocks(vec![Block::with_text(1, BlockKind::Paragraph, text)]);
    EditorBuffer::new(doc, 5000)
}

fn ids(commands: &[&CommandOption]) -> Vec<&'static str> {
    commands.iter().map(|c| c.id).collect()
}

fn command(id: &str) -> &'static CommandOption {
    DEFAULT_COMMANDS.iter().find(|c| c.id == id).unwrap()
}

#[test]
fn test_empty_query_returns_everything() {
    assert_eq!(filter_commands(DEFAULT_COMMANDS, "").len(), DEFAULT_COMMANDS.len());
    assert_eq!(filter_commands(DEFAULT_COMMANDS, "   ").len(), DEFAULT_COMMANDS.len());
}

#[test]
fn test_filter_by_keyword() {
    let filtered = filter_commands(DEFAULT_COMMANDS, "list");
    assert_eq!(ids(&filtered), vec!["bulletList", "orderedList", "taskList"]);
}

#[test]
fn test_filter_is_case_insensitive_and_trimmed() {
    let filtered = filter_commands(DEFAULT_COMMANDS, "  HEADING ");
    assert_eq!(ids(&filtered), vec!["h1", "h2", "h3"]);
}

#[test]
fn test_filter_no_match() {
    assert!(filter_commands(DEFAULT_COMMANDS, "zzz").is_empty());
}

#[test]
fn test_groups_in_first_appearance_order() {
    let all = filter_commands(DEFAULT_COMMANDS, "");
    let groups = group_commands(&all);
    let labels: Vec<&str> = groups.iter().map(|(g, _)| g.label()).collect();
    assert_eq!(labels, vec!["AI", "Style", "Insert"]);
    assert_eq!(groups[0].1.len(), 1);
}

#[test]
fn test_grouping_skips_empty_groups() {
    let filtered = filter_commands(DEFAULT_COMMANDS, "code");
    let groups = group_commands(&filtered);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].0, CommandGroup::Insert);
}

#[test]
fn test_slash_query() {
    assert_eq!(slash_query("hello /he"), Some((6, "he".to_string())));
    assert_eq!(slash_query("/"), Some((0, String::new())));
    assert_eq!(slash_query("no slash"), None);
    assert_eq!(slash_query("/he llo"), None);
    assert_eq!(slash_query("é/x"), Some((1, "x".to_string())));
}

#[test]
fn test_remove_trailing_slash_query() {
    let mut buffer = buffer_with("Title /head");
    assert!(remove_trailing_slash_query(&mut buffer));
    assert_eq!(buffer.doc.blocks[0].text, "Title ");
    assert_eq!(buffer.caret(), Position::new(0, 6));
}

#[test]
fn test_remove_keeps_text_after_whitespace() {
    let mut buffer = buffer_with("a/b c");
    assert!(!remove_trailing_slash_query(&mut buffer));
    assert_eq!(buffer.doc.blocks[0].text, "a/b c");
}

#[test]
fn test_run_heading_command() {
    let mut buffer = buffer_with("Title/h1");
    let outcome = run_command(&mut buffer, command("h1"));
    assert_eq!(outcome, CommandOutcome::Applied);
    assert_eq!(buffer.doc.blocks[0].text, "Title");
    assert_eq!(buffer.doc.blocks[0].kind, BlockKind::Heading { level: 1 });
}

#[test]
fn test_heading_command_toggles_back() {
    let doc = Document::from_blocks(vec![Block::with_text(
        1,
        BlockKind::Heading { level: 2 },
        "x/",
    )]);
    let mut buffer = EditorBuffer::new(doc, 5000);
    run_command(&mut buffer, command("h2"));
    assert_eq!(buffer.doc.blocks[0].kind, BlockKind::Paragraph);
}

#[test]
fn test_run_table_command_inserts_table() {
    let mut buffer = buffer_with("/table");
    assert_eq!(run_command(&mut buffer, command("table")), CommandOutcome::Applied);

    match &buffer.doc.blocks[0].kind {
        BlockKind::Table {
            rows,
            with_header_row,
        } => {
            assert_eq!(rows.len(), 3);
            assert!(rows.iter().all(|r| r.len() == 3));
            assert!(with_header_row);
        }
        other => panic!("expected table, got {:?}", other),
    }
    // Trailing paragraph keeps the document editable below the table
    assert_eq!(buffer.doc.blocks[1].kind, BlockKind::Paragraph);
}

#[test]
fn test_continue_requests_refresh() {
    let mut buffer = buffer_with("Once upon/cont");
    assert_eq!(
        run_command(&mut buffer, command("continue")),
        CommandOutcome::RefreshSuggestion
    );
    assert_eq!(buffer.doc.blocks[0].text, "Once upon");
}

#[test]
fn test_image_and_file_open_prompts() {
    let mut buffer = buffer_with("/img");
    assert_eq!(
        run_command(&mut buffer, command("image")),
        CommandOutcome::Prompt(PromptKind::ImageUrl)
    );
    let mut buffer = buffer_with("/file");
    assert_eq!(
        run_command(&mut buffer, command("file")),
        CommandOutcome::Prompt(PromptKind::FilePath)
    );
    assert_eq!(buffer.doc.blocks[0].text, "");
}

#[test]
fn test_menu_tracks_query_and_closes_on_whitespace() {
    let mut buffer = buffer_with("/");
    let mut menu = SlashMenuState::new();
    menu.open(buffer.caret());

    buffer.insert_str("ta");
    menu.update(&buffer);
    assert!(menu.is_visible());
    assert_eq!(menu.query(), "ta");
    assert_eq!(ids(&menu.filtered()), vec!["taskList", "table", "file"]);

    buffer.insert_char(' ');
    menu.update(&buffer);
    assert!(!menu.is_visible());
    assert!(menu.filtered().is_empty());
}

#[test]
fn test_menu_closes_when_slash_deleted() {
    let mut buffer = buffer_with("/");
    let mut menu = SlashMenuState::new();
    menu.open(buffer.caret());

    buffer.backspace();
    menu.update(&buffer);
    assert!(!menu.is_visible());
}

#[test]
fn test_menu_navigation_wraps() {
    let buffer = buffer_with("/heading");
    let mut menu = SlashMenuState::new();
    menu.open(buffer.caret());
    menu.update(&buffer);
    assert_eq!(menu.filtered().len(), 3);

    menu.select_previous();
    assert_eq!(menu.selected().unwrap().id, "h3");
    menu.select_next();
    assert_eq!(menu.selected().unwrap().id, "h1");
    menu.select_next();
    menu.select_next();
    menu.select_next();
    assert_eq!(menu.active_index(), 0);
}

#[test]
fn test_selected_falls_back_to_first() {
    let mut buffer = buffer_with("/");
    let mut menu = SlashMenuState::new();
    menu.open(buffer.caret());
    menu.update(&buffer);
    for _ in 0..5 {
        menu.select_next();
    }
    buffer.insert_str("code");
    menu.update(&buffer);
    assert_eq!(menu.active_index(), 0);
    assert_eq!(menu.selected().unwrap().id, "codeBlock");
}

#[test]
fn test_empty_filter_has_no_selection() {
    let buffer = buffer_with("/zzz");
    let mut menu = SlashMenuState::new();
    menu.open(buffer.caret());
    menu.update(&buffer);
    assert!(menu.is_visible());
    assert!(menu.selected().is_none());
    menu.select_next();
    assert_eq!(menu.active_index(), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Every filtered command matches the query and the filter preserves order
    #[test]
    fn prop_filter_results_match_query(query in "[a-zA-Z ]{0,6}") {
        let filtered = filter_commands(DEFAULT_COMMANDS, &query);
        let q = query.trim().to_lowercase();
        for c in &filtered {
            prop_assert!(q.is_empty() || c.matches(&q));
        }
        let positions: Vec<usize> = filtered
            .iter()
            .map(|c| DEFAULT_COMMANDS.iter().position(|d| d.id == c.id).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    // Arrow navigation keeps the active index in range
    #[test]
    fn prop_navigation_stays_in_range(steps in prop::collection::vec(prop::bool::ANY, 0..20)) {
        let buffer = buffer_with("/");
        let mut menu = SlashMenuState::new();
        menu.open(buffer.caret());
        for down in steps {
            if down { menu.select_next() } else { menu.select_previous() }
        }
        prop_assert!(menu.active_index() < DEFAULT_COMMANDS.len());
    }
}
