use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

use typewrite::host::HostEvent;
use typewrite::marker::MarkerRenderer;
use typewrite::model::{Config, Marker, MarkerStyle, Position};
use typewrite::session::SessionController;
use typewrite::sim::MemoryHost;

fn marker_at(position: Position) -> Marker {
    let style = MarkerStyle::default();
    Marker {
        position,
        glyph: style.glyph,
        color: style.color,
    }
}

#[test]
fn rendering_twice_leaves_one_marker() {
    let mut host = MemoryHost::new();
    let (_, editor) = host.open("a.txt", "abc");
    let mut renderer = MarkerRenderer::new();
    let style = MarkerStyle::default();

    renderer.render(&mut host, editor, Position::new(0, 1), true, &style);
    renderer.render(&mut host, editor, Position::new(0, 1), true, &style);

    assert_eq!(host.markers(editor), &[marker_at(Position::new(0, 1))]);
}

#[test]
fn moving_to_another_editor_clears_the_old_marker() {
    let mut host = MemoryHost::new();
    let (_, first) = host.open("a.txt", "");
    let (_, second) = host.open("b.txt", "");
    let mut renderer = MarkerRenderer::new();
    let style = MarkerStyle::default();

    renderer.render(&mut host, first, Position::new(0, 0), true, &style);
    renderer.render(&mut host, second, Position::new(0, 0), true, &style);

    assert!(host.markers(first).is_empty());
    assert_eq!(host.markers(second).len(), 1);
    assert_eq!(renderer.painted_editor(), Some(second));
}

#[test]
fn custom_style_is_used() {
    let mut host = MemoryHost::new();
    let (_, editor) = host.open("a.txt", "");
    let style = MarkerStyle {
        glyph: "▶".to_string(),
        color: "green".to_string(),
    };

    MarkerRenderer::new().render(&mut host, editor, Position::new(0, 0), true, &style);

    assert_eq!(host.markers(editor)[0].glyph, "▶");
    assert_eq!(host.markers(editor)[0].color, "green");
}

#[test]
fn visibility_toggle_clears_and_repaints() {
    let mut host = MemoryHost::new();
    let (_, editor) = host.open("a.txt", "hello");
    host.set_selection(editor, Position::new(0, 2));
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut controller = SessionController::new(host, Config::default(), tx);
    assert_eq!(
        controller.with_host(|host| host.markers(editor).to_vec()),
        vec![marker_at(Position::new(0, 2))]
    );

    controller.set_marker_visible(false);
    assert!(controller.with_host(|host| host.markers(editor).is_empty()));

    controller.set_marker_visible(true);
    assert_eq!(
        controller.with_host(|host| host.markers(editor).to_vec()),
        vec![marker_at(Position::new(0, 2))]
    );
}

#[test]
fn selection_change_repaints_at_the_new_position() {
    let mut host = MemoryHost::new();
    let (_, editor) = host.open("a.txt", "hello\nworld");
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut controller = SessionController::new(host, Config::default(), tx);

    controller.handle_host_event(HostEvent::SelectionChanged {
        editor,
        position: Position::new(1, 3),
    });

    assert_eq!(
        controller.with_host(|host| host.markers(editor).to_vec()),
        vec![marker_at(Position::new(1, 3))]
    );
}

#[tokio::test(start_paused = true)]
async fn marker_follows_typing() {
    let mut host = MemoryHost::new();
    let (_, editor) = host.open("a.txt", "");
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut controller = SessionController::new(host, Config::default(), tx);

    controller.start_typing("ab\ncd", Some(1)).unwrap();
    controller.wait_idle().await.unwrap();

    assert_eq!(
        controller.with_host(|host| host.markers(editor).to_vec()),
        vec![marker_at(Position::new(1, 2))]
    );
}
