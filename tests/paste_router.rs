use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::sync::mpsc;
use tokio::time::Instant;

use typewrite::engine::SessionOutcome;
use typewrite::error::EngineError;
use typewrite::model::{Config, DocumentId, Position};
use typewrite::session::SessionController;
use typewrite::trace::console_trace;
use typewrite::sim::MemoryHost;

fn controller(
    initial: &str,
    cursor: Position,
    config: Config,
) -> (SessionController<MemoryHost>, DocumentId) {
    let mut host = MemoryHost::new();
    let (document, editor) = host.open("/work/notes.txt", initial);
    host.set_selection(editor, cursor);
    let (tx, _rx) = mpsc::unbounded_channel();
    (SessionController::new(host, config, tx), document)
}

fn inserted(controller: &SessionController<MemoryHost>) -> Vec<(Position, String)> {
    controller.with_host(|host| {
        host.insertions()
            .iter()
            .map(|r| (r.position, r.text.clone()))
            .collect()
    })
}

// Known quirk: direct paste moves the tracker down one line per pasted line
// but keeps the original column and inserts no line breaks.
#[tokio::test(start_paused = true)]
async fn direct_paste_inserts_trimmed_lines_one_line_apart() {
    let (mut controller, document) =
        controller("l0\nl1\nl2\nl3", Position::new(1, 2), Config::default());

    controller.paste_received("a\n\nb\n").unwrap();

    assert_eq!(
        inserted(&controller),
        vec![
            (Position::new(1, 2), "a".to_string()),
            (Position::new(2, 2), "b".to_string()),
        ]
    );
    assert_eq!(controller.tracker().get(), Some(Position::new(3, 2)));
    assert_eq!(
        controller.with_host(|host| host.text(document)).unwrap(),
        "l0\nl1a\nl2b\nl3"
    );
    assert!(controller.wait_idle().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn direct_paste_trims_each_line() {
    let (mut controller, _) = controller("\n\n", Position::new(0, 0), Config::default());

    controller.paste_received("   one  \r\n\t two\n  \n").unwrap();

    let texts: Vec<String> = inserted(&controller).into_iter().map(|(_, t)| t).collect();
    assert_eq!(texts, vec!["one".to_string(), "two".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn auto_trigger_replays_the_raw_text_through_the_engine() {
    let config = Config {
        typing_speed_ms: 5,
        auto_trigger_on_paste: true,
        ..Config::default()
    };
    let (mut controller, document) = controller("", Position::new(0, 0), config);
    let started = Instant::now();

    controller.paste_received("a\n\nb\n").unwrap();
    assert!(controller.engine().is_busy());

    let report = controller.wait_idle().await.unwrap();
    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(
        inserted(&controller),
        vec![
            (Position::new(0, 0), "a".to_string()),
            (Position::new(0, 1), "\n".to_string()),
            (Position::new(1, 0), "\n".to_string()),
            (Position::new(2, 0), "b".to_string()),
            (Position::new(2, 1), "\n".to_string()),
        ]
    );
    assert_eq!(
        controller.with_host(|host| host.text(document)).unwrap(),
        "a\n\nb\n"
    );
    assert_eq!(controller.tracker().get(), Some(Position::new(3, 0)));
    assert!(started.elapsed() >= Duration::from_millis(10));
}

#[tokio::test(start_paused = true)]
async fn auto_trigger_paste_is_rejected_while_typing() {
    let config = Config {
        auto_trigger_on_paste: true,
        ..Config::default()
    };
    let (mut controller, document) = controller("", Position::new(0, 0), config);

    controller.start_typing("abc", None).unwrap();
    let err = controller.paste_received("zzz").unwrap_err();
    assert_eq!(err, EngineError::SessionBusy);

    controller.wait_idle().await.unwrap();
    assert_eq!(
        controller.with_host(|host| host.text(document)).unwrap(),
        "abc"
    );
}

#[tokio::test(start_paused = true)]
async fn paste_without_editor_is_rejected() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut controller = SessionController::new(MemoryHost::new(), Config::default(), tx);

    let err = controller.paste_received("a").unwrap_err();

    assert_eq!(err, EngineError::NoActiveEditor);
}

#[tokio::test(start_paused = true)]
async fn one_character_paste_lines_trace_as_pastes() {
    let (mut controller, _) = controller("\n", Position::new(0, 0), Config::default());

    controller.paste_received("x\ny").unwrap();

    let records = controller.with_host(|host| host.insertions().to_vec());
    assert_eq!(
        console_trace(&records),
        vec!["Paste \"x\"...".to_string(), "Paste \"y\"...".to_string()]
    );
}
