use tracing::{debug, info};

use crate::engine::{TypingEngine, TypingHandle};
use crate::error::EngineError;
use crate::host::{Host, InsertOrigin};
use crate::insert::insert_text;
use crate::workspace::{lock, Shared};

/// Non-empty lines of pasted text, trimmed on both sides.
pub fn paste_lines(raw: &str) -> Vec<&str> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[derive(Debug)]
pub enum PasteOutcome {
    /// Lines were inserted directly.
    Inserted { lines: usize },
    /// The paste is being replayed by the typing engine.
    Replayed(TypingHandle),
}

/// Route pasted text according to `auto_trigger_on_paste`.
///
/// Without auto-trigger each trimmed line is inserted at the tracker and the
/// tracker moves down one line, keeping its column. No line break is inserted
/// and the column is not reset. With auto-trigger the untrimmed text is typed
/// at the configured speed instead.
pub fn route_paste<H: Host>(
    shared: &Shared<H>,
    engine: &TypingEngine,
    raw: &str,
) -> Result<PasteOutcome, EngineError> {
    let mut ws = lock(shared);
    let binding = ws.tracker.binding().ok_or(EngineError::NoActiveEditor)?;

    if ws.config.auto_trigger_on_paste {
        let speed = ws.config.typing_speed_ms;
        drop(ws);
        debug!(target: "paste", len = raw.len(), speed, "replaying paste");
        let handle = engine.play(shared, binding.editor, binding.position, raw, speed)?;
        return Ok(PasteOutcome::Replayed(handle));
    }

    let lines = paste_lines(raw);
    let mut inserted = 0usize;
    for line in &lines {
        let Some(position) = ws.tracker.get() else {
            break;
        };
        match insert_text(&mut ws.host, binding.editor, position, line, InsertOrigin::Paste) {
            Ok(_) => inserted += 1,
            Err(err) => {
                debug!(target: "paste", %err, "paste line dropped");
                break;
            }
        }
        ws.tracker.move_to(position.down(1));
    }
    ws.repaint_marker();

    info!(target: "paste", lines = inserted, editor = %binding.editor, "paste inserted");
    Ok(PasteOutcome::Inserted { lines: inserted })
}
