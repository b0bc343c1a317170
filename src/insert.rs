use tracing::trace;

use crate::error::EngineError;
use crate::host::{Host, InsertOrigin};
use crate::model::{EditorId, Position};

/// Insert `text` at `position` and return the position right after it.
///
/// This is the only place document content is mutated.
pub fn insert_text<H: Host + ?Sized>(
    host: &mut H,
    editor: EditorId,
    position: Position,
    text: &str,
    origin: InsertOrigin,
) -> Result<Position, EngineError> {
    host.insert(editor, position, text, origin)
        .map_err(|err| EngineError::InvalidTarget {
            editor,
            reason: err.to_string(),
        })?;

    let next = position.after(text);
    trace!(target: "engine", %editor, %position, %next, len = text.len(), "inserted");
    Ok(next)
}
