//! Tests for the document model and editing buffer

use super::*;

fn buffer_with(blocks: Vec<Block>) -> EditorBuffer {
    EditorBuffer::new(Document::from_blocks(blocks), 5000)
}

fn para(id: BlockId, text: &str) -> Block {
    Block::with_text(id, BlockKind::Paragraph, text)
}

#[test]
fn test_empty_document_gets_one_paragraph() {
    let doc = Document::from_blocks(Vec::new());
    assert_eq!(doc.len(), 1);
    assert!(doc.is_blank());
}

#[test]
fn test_next_block_id_follows_max_id() {
    let mut doc = Document::from_blocks(vec![para(3, "a"), para(9, "b")]);
    assert_eq!(doc.next_block_id(), 10);
    assert_eq!(doc.next_block_id(), 11);
}

#[test]
fn test_buffer_starts_at_document_end() {
    let buffer = buffer_with(vec![para(1, "one"), para(2, "two!")]);
    assert_eq!(buffer.caret(), Position::new(1, 4));
}

#[test]
fn test_text_before_caret_uses_caret_block_only() {
    let mut buffer = buffer_with(vec![para(1, "first"), para(2, "hello world")]);
    buffer.set_caret(Position::new(1, 5));
    assert_eq!(buffer.text_before_caret(), "hello");
}

#[test]
fn test_text_before_caret_on_structural_block_is_empty() {
    let mut buffer = buffer_with(vec![
        para(1, "text"),
        Block::new(2, BlockKind::Image { src: "x.png".into() }),
    ]);
    buffer.set_caret(Position::new(1, 0));
    assert_eq!(buffer.text_before_caret(), "");
}

#[test]
fn test_insert_str_moves_caret_after_text() {
    let mut buffer = buffer_with(vec![para(1, "intro")]);
    assert!(buffer.insert_str("duction"));
    assert_eq!(buffer.doc.blocks[0].text, "introduction");
    assert_eq!(buffer.caret(), Position::new(0, 12));
    assert!(buffer.selection.is_collapsed());
}

#[test]
fn test_insert_str_replaces_selection() {
    let mut buffer = buffer_with(vec![para(1, "hello world")]);
    buffer.selection = Selection {
        anchor: Position::new(0, 6),
        head: Position::new(0, 11),
    };
    buffer.insert_str("there");
    assert_eq!(buffer.doc.blocks[0].text, "hello there");
}

#[test]
fn test_insert_literal_keeps_selection_content() {
    let mut buffer = buffer_with(vec![para(1, "hello world")]);
    buffer.selection = Selection {
        anchor: Position::new(0, 11),
        head: Position::new(0, 6),
    };
    assert!(buffer.insert_literal("big "));
    assert_eq!(buffer.doc.blocks[0].text, "hello big world");
    assert_eq!(buffer.caret(), Position::new(0, 10));
    assert!(buffer.selection.is_collapsed());
}

#[test]
fn test_insert_respects_character_limit() {
    let mut buffer = EditorBuffer::new(Document::from_blocks(vec![para(1, "abcd")]), 6);
    assert!(buffer.insert_str("xyz"));
    assert_eq!(buffer.doc.blocks[0].text, "abcdxy");
    assert!(!buffer.insert_char('!'));
    assert_eq!(buffer.remaining_chars(), 0);
}

#[test]
fn test_insert_handles_multibyte_text() {
    let mut buffer = buffer_with(vec![para(1, "héllo")]);
    buffer.set_caret(Position::new(0, 2));
    buffer.insert_char('ü');
    assert_eq!(buffer.doc.blocks[0].text, "héüllo");
    assert_eq!(buffer.caret(), Position::new(0, 3));
}

#[test]
fn test_backspace_deletes_previous_char() {
    let mut buffer = buffer_with(vec![para(1, "abc")]);
    assert!(buffer.backspace());
    assert_eq!(buffer.doc.blocks[0].text, "ab");
    assert_eq!(buffer.caret(), Position::new(0, 2));
}

#[test]
fn test_backspace_at_block_start_merges() {
    let mut buffer = buffer_with(vec![para(1, "foo"), para(2, "bar")]);
    buffer.set_caret(Position::new(1, 0));
    assert!(buffer.backspace());
    assert_eq!(buffer.doc.len(), 1);
    assert_eq!(buffer.doc.blocks[0].text, "foobar");
    assert_eq!(buffer.caret(), Position::new(0, 3));
}

#[test]
fn test_backspace_on_first_heading_turns_it_into_paragraph() {
    let mut buffer = buffer_with(vec![Block::with_text(1, BlockKind::Heading { level: 1 }, "T")]);
    buffer.set_caret(Position::new(0, 0));
    assert!(buffer.backspace());
    assert_eq!(buffer.doc.blocks[0].kind, BlockKind::Paragraph);
}

#[test]
fn test_backspace_on_structural_block_removes_it() {
    let mut buffer = buffer_with(vec![para(1, "a"), BlockKind::empty_table(3, 3).into_block(2)]);
    buffer.set_caret(Position::new(1, 0));
    assert!(buffer.backspace());
    assert_eq!(buffer.doc.len(), 1);
    assert_eq!(buffer.caret(), Position::new(0, 1));
}

#[test]
fn test_delete_forward_at_end_merges_next() {
    let mut buffer = buffer_with(vec![para(1, "ab"), para(2, "cd")]);
    buffer.set_caret(Position::new(0, 2));
    assert!(buffer.delete_forward());
    assert_eq!(buffer.doc.blocks[0].text, "abcd");
}

#[test]
fn test_split_block_moves_tail_and_marks() {
    let mut block = para(1, "hello world");
    block.marks.push(MarkSpan::new(4, 8, Mark::Bold));
    let mut buffer = buffer_with(vec![block]);
    buffer.set_caret(Position::new(0, 6));
    assert!(buffer.split_block());

    assert_eq!(buffer.doc.blocks[0].text, "hello ");
    assert_eq!(buffer.doc.blocks[0].marks, vec![MarkSpan::new(4, 6, Mark::Bold)]);
    assert_eq!(buffer.doc.blocks[1].text, "world");
    assert_eq!(buffer.doc.blocks[1].marks, vec![MarkSpan::new(0, 2, Mark::Bold)]);
    assert_eq!(buffer.caret(), Position::new(1, 0));
}

#[test]
fn test_split_list_item_continues_list() {
    let mut buffer = buffer_with(vec![Block::with_text(1, BlockKind::Task { checked: true }, "done")]);
    buffer.split_block();
    assert_eq!(buffer.doc.blocks[1].kind, BlockKind::Task { checked: false });
}

#[test]
fn test_enter_on_empty_list_item_leaves_list() {
    let mut buffer = buffer_with(vec![Block::new(1, BlockKind::BulletItem)]);
    buffer.split_block();
    assert_eq!(buffer.doc.len(), 1);
    assert_eq!(buffer.doc.blocks[0].kind, BlockKind::Paragraph);
}

#[test]
fn test_split_heading_continues_with_paragraph() {
    let mut buffer = buffer_with(vec![Block::with_text(1, BlockKind::Heading { level: 2 }, "Title")]);
    buffer.split_block();
    assert_eq!(buffer.doc.blocks[1].kind, BlockKind::Paragraph);
}

#[test]
fn test_enter_in_code_block_inserts_newline() {
    let mut buffer = buffer_with(vec![Block::with_text(1, BlockKind::Code, "fn main()")]);
    buffer.split_block();
    assert_eq!(buffer.doc.len(), 1);
    assert_eq!(buffer.doc.blocks[0].text, "fn main()\n");
}

#[test]
fn test_move_left_right_cross_blocks() {
    let mut buffer = buffer_with(vec![para(1, "ab"), para(2, "cd")]);
    buffer.set_caret(Position::new(1, 0));
    buffer.move_left();
    assert_eq!(buffer.caret(), Position::new(0, 2));
    buffer.move_right();
    assert_eq!(buffer.caret(), Position::new(1, 0));
}

#[test]
fn test_extend_selection_stays_in_block() {
    let mut buffer = buffer_with(vec![para(1, "abc"), para(2, "")]);
    buffer.set_caret(Position::new(0, 1));
    buffer.extend_right();
    buffer.extend_right();
    buffer.extend_right();
    assert_eq!(buffer.selection.block_range(), Some((0, 1, 3)));
}

#[test]
fn test_toggle_block_kind() {
    let mut buffer = buffer_with(vec![para(1, "x")]);
    assert!(buffer.toggle_block_kind(BlockKind::Heading { level: 1 }));
    assert_eq!(buffer.doc.blocks[0].kind, BlockKind::Heading { level: 1 });
    assert!(buffer.toggle_block_kind(BlockKind::Heading { level: 1 }));
    assert_eq!(buffer.doc.blocks[0].kind, BlockKind::Paragraph);
}

#[test]
fn test_insert_structural_block_adds_trailing_paragraph() {
    let mut buffer = buffer_with(vec![para(1, "text")]);
    let index = buffer.insert_block(BlockKind::empty_table(3, 3));
    assert_eq!(index, 1);
    assert_eq!(buffer.doc.len(), 3);
    assert_eq!(buffer.doc.blocks[2].kind, BlockKind::Paragraph);
    assert_eq!(buffer.caret(), Position::new(1, 0));
}

#[test]
fn test_insert_block_replaces_empty_paragraph() {
    let mut buffer = buffer_with(vec![para(1, "a"), para(2, "")]);
    let index = buffer.insert_block(BlockKind::Image { src: "a.png".into() });
    assert_eq!(index, 1);
    assert!(matches!(buffer.doc.blocks[1].kind, BlockKind::Image { .. }));
}

#[test]
fn test_remove_last_block_leaves_empty_paragraph() {
    let mut buffer = buffer_with(vec![Block::new(1, BlockKind::Image { src: "a".into() })]);
    assert!(buffer.remove_block(0));
    assert!(buffer.doc.is_blank());
}

#[test]
fn test_toggle_task() {
    let mut buffer = buffer_with(vec![Block::with_text(1, BlockKind::Task { checked: false }, "t")]);
    assert!(buffer.toggle_task());
    assert_eq!(buffer.doc.blocks[0].kind, BlockKind::Task { checked: true });
}

#[test]
fn test_character_count_includes_table_cells() {
    let mut table = BlockKind::empty_table(1, 2).into_block(2);
    if let BlockKind::Table { rows, .. } = &mut table.kind {
        rows[0][0] = "abc".into();
    }
    let doc = Document::from_blocks(vec![para(1, "hello"), table]);
    assert_eq!(doc.character_count(), 8);
}

#[test]
fn test_snapshot_json_shape() {
    let doc = Document::from_blocks(vec![Block::with_text(7, BlockKind::Heading { level: 2 }, "Hi")]);
    let json = serde_json::to_value(doc.to_snapshot()).unwrap();
    assert_eq!(json["version"], "1");
    assert_eq!(json["blocks"][0]["type"], "heading");
    assert_eq!(json["blocks"][0]["level"], 2);
    assert_eq!(json["blocks"][0]["text"], "Hi");
}

#[test]
fn test_snapshot_restores_file_block() {
    let json = r#"{"version":"1","blocks":[{"id":4,"type":"file","title":"a.pdf","size":"1 KB"}]}"#;
    let snapshot: DocumentSnapshot = serde_json::from_str(json).unwrap();
    let doc = Document::from_snapshot(snapshot);
    match &doc.blocks[0].kind {
        BlockKind::File(data) => {
            assert_eq!(data.title.as_deref(), Some("a.pdf"));
            assert_eq!(data.href, None);
        }
        other => panic!("expected file block, got {:?}", other),
    }
}

#[test]
fn test_raw_char_probe_round_trip_leaves_text_unchanged() {
    let mut buffer = buffer_with(vec![para(1, "")]);
    let at = buffer.caret();
    assert!(buffer.insert_raw_char(at, '\u{200b}'));
    assert_eq!(buffer.doc.blocks[0].char_len(), 1);
    assert!(buffer.remove_raw_char(at));
    assert_eq!(buffer.doc.blocks[0].text, "");
    assert_eq!(buffer.caret(), at);
}
