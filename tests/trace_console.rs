use pretty_assertions::assert_eq;

use typewrite::host::InsertOrigin;
use typewrite::model::{EditorId, Position};
use typewrite::sim::InsertRecord;
use typewrite::trace::console_trace;

fn record(editor: u64, line: u32, column: u32, text: &str) -> InsertRecord {
    InsertRecord {
        editor: EditorId(editor),
        position: Position::new(line, column),
        text: text.to_string(),
        origin: InsertOrigin::Typing,
    }
}

fn pasted(editor: u64, line: u32, column: u32, text: &str) -> InsertRecord {
    InsertRecord {
        origin: InsertOrigin::Paste,
        ..record(editor, line, column, text)
    }
}

#[test]
fn contiguous_keystrokes_collapse_into_one_line() {
    let records = vec![
        record(1, 0, 0, "a"),
        record(1, 0, 1, "\n"),
        record(1, 1, 0, "  "),
        record(1, 1, 2, "b"),
    ];

    assert_eq!(console_trace(&records), vec!["Typing \"a\\n  b\"...".to_string()]);
}

#[test]
fn jumps_and_editor_changes_start_a_new_run() {
    let records = vec![
        record(1, 0, 0, "a"),
        record(1, 4, 0, "b"),
        record(2, 4, 1, "c"),
    ];

    assert_eq!(
        console_trace(&records),
        vec![
            "Typing \"a\"...".to_string(),
            "Typing \"b\"...".to_string(),
            "Typing \"c\"...".to_string(),
        ]
    );
}

#[test]
fn direct_insertions_show_as_pastes() {
    let records = vec![
        record(1, 0, 0, "x"),
        pasted(1, 0, 1, "let \"y\" = 2;"),
        pasted(1, 1, 1, "done"),
    ];

    assert_eq!(
        console_trace(&records),
        vec![
            "Typing \"x\"...".to_string(),
            "Paste \"let \\\"y\\\" = 2;\"...".to_string(),
            "Paste \"done\"...".to_string(),
        ]
    );
}

#[test]
fn single_character_pastes_never_join_a_typing_run() {
    let records = vec![
        record(1, 0, 0, "a"),
        pasted(1, 0, 1, "x"),
        pasted(1, 1, 1, "y"),
        record(1, 2, 1, "b"),
    ];

    assert_eq!(
        console_trace(&records),
        vec![
            "Typing \"a\"...".to_string(),
            "Paste \"x\"...".to_string(),
            "Paste \"y\"...".to_string(),
            "Typing \"b\"...".to_string(),
        ]
    );
}
