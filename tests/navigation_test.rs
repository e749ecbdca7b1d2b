// Test keyboard navigation over the grid, through the editor host

use json_grid_wasm::converters::ImportSource;
use json_grid_wasm::models::CellValue;
use json_grid_wasm::navigation::{Focus, Key, KeyContext, KeyPress, Modifiers};
use json_grid_wasm::storage::MemoryStorage;
use json_grid_wasm::{EditorConfig, EditorState};

fn editor(json: &str) -> EditorState<MemoryStorage> {
    let mut editor = EditorState::new(EditorConfig::default(), MemoryStorage::new());
    editor
        .import(ImportSource::File, Ok(json.to_string()))
        .expect("test data should import");
    editor
}

fn press(editor: &mut EditorState<MemoryStorage>, press: KeyPress) -> bool {
    editor
        .handle_key(press, &KeyContext::default())
        .expect("key should be handled")
        .claimed
}

fn key(editor: &mut EditorState<MemoryStorage>, key: Key) -> bool {
    press(editor, KeyPress::plain(key))
}

const TWO_BY_TWO: &str = r#"[{"a": 1, "b": "x"}, {"a": 2, "b": "y"}]"#;

#[test]
fn test_tab_from_last_column_reaches_delete_slot() {
    let mut editor = editor(TWO_BY_TWO);
    editor.focus_cell(0, 1);

    assert!(key(&mut editor, Key::Tab));
    assert_eq!(editor.focus(), &Focus::Focused { row: 0, col: 2 }, "Tab should land on the delete control");

    key(&mut editor, Key::Tab);
    assert_eq!(editor.focus(), &Focus::Focused { row: 1, col: 0 });
}

#[test]
fn test_tab_past_end_yields_focus() {
    let mut editor = editor(TWO_BY_TWO);
    editor.focus_cell(1, 2);

    let claimed = key(&mut editor, Key::Tab);
    assert!(!claimed, "leaving the grid must not suppress browser focus traversal");
    assert_eq!(editor.focus(), &Focus::Idle);
}

#[test]
fn test_shift_tab_before_start_yields_focus() {
    let mut editor = editor(TWO_BY_TWO);
    assert!(!press(&mut editor, KeyPress::shifted(Key::Tab)));
    assert_eq!(editor.focus(), &Focus::Idle);
}

#[test]
fn test_arrows_clamp_at_edges() {
    let mut editor = editor(TWO_BY_TWO);
    key(&mut editor, Key::ArrowUp);
    key(&mut editor, Key::ArrowLeft);
    assert_eq!(editor.focus(), &Focus::Focused { row: 0, col: 0 });

    for _ in 0..5 {
        key(&mut editor, Key::ArrowDown);
        key(&mut editor, Key::ArrowRight);
    }
    assert_eq!(editor.focus(), &Focus::Focused { row: 1, col: 2 });
}

#[test]
fn test_escape_discards_edit() {
    let mut editor = editor(TWO_BY_TWO);
    editor.focus_cell(0, 1);
    key(&mut editor, Key::Enter);
    editor.set_draft("changed");

    key(&mut editor, Key::Escape);
    assert_eq!(editor.focus(), &Focus::Focused { row: 0, col: 1 });
    assert_eq!(editor.document().cell(0, "b"), Some(&CellValue::from("x")));

    key(&mut editor, Key::Escape);
    assert_eq!(editor.focus(), &Focus::Idle);
}

#[test]
fn test_number_edit_falls_back_to_text() {
    let mut editor = editor(TWO_BY_TWO);
    key(&mut editor, Key::Space);
    editor.set_draft("abc");
    key(&mut editor, Key::Enter);

    assert_eq!(editor.document().cell(0, "a"), Some(&CellValue::from("abc")));
}

#[test]
fn test_delete_clears_cell_and_shift_delete_removes_row() {
    let mut editor = editor(TWO_BY_TWO);
    editor.focus_cell(1, 1);

    key(&mut editor, Key::Delete);
    assert_eq!(editor.document().cell(1, "b"), Some(&CellValue::from("")));

    press(&mut editor, KeyPress::shifted(Key::Backspace));
    assert_eq!(editor.document().row_count(), 1);
    assert_eq!(
        editor.focus(),
        &Focus::Focused { row: 0, col: 1 },
        "focus should clamp to the new last row"
    );
}

#[test]
fn test_enter_on_delete_slot_removes_row() {
    let mut editor = editor(r#"[{"a": 1}]"#);
    editor.focus_cell(0, 1);

    key(&mut editor, Key::Enter);
    assert!(editor.document().is_empty());
    assert_eq!(editor.focus(), &Focus::Idle);
}

#[test]
fn test_keys_ignored_on_other_controls() {
    let mut editor = editor(TWO_BY_TWO);
    let ctx = KeyContext {
        target_is_control: true,
        ..KeyContext::default()
    };

    let response = editor.handle_key(KeyPress::plain(Key::ArrowDown), &ctx).unwrap();
    assert!(!response.claimed);
    assert_eq!(editor.focus(), &Focus::Focused { row: 0, col: 0 });
}

#[test]
fn test_each_commit_is_one_undo_step() {
    let mut editor = editor(TWO_BY_TWO);
    key(&mut editor, Key::Enter);
    editor.set_draft("5");
    key(&mut editor, Key::Enter);

    assert_eq!(editor.document().history().undo_count(), 1);
    press(&mut editor, KeyPress::new(Key::Char('z'), Modifiers::CTRL));
    assert_eq!(editor.document().cell(0, "a"), Some(&CellValue::Number(1.0)));
}
