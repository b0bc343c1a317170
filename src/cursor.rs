use crate::model::{DocumentId, EditorId, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub editor: EditorId,
    pub document: DocumentId,
    pub position: Position,
}

/// The single authoritative insertion cursor of a session.
///
/// Every change of the bound editor bumps `epoch`; typing sessions remember the
/// epoch they started under and stop as soon as it moves on.
#[derive(Debug, Default, Clone)]
pub struct CursorTracker {
    binding: Option<Binding>,
    epoch: u64,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Position> {
        self.binding.map(|binding| binding.position)
    }

    pub fn binding(&self) -> Option<Binding> {
        self.binding
    }

    pub fn editor(&self) -> Option<EditorId> {
        self.binding.map(|binding| binding.editor)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Bind to `editor` at `position`, replacing both.
    pub fn set(&mut self, editor: EditorId, document: DocumentId, position: Position) {
        if self.editor() != Some(editor) {
            self.epoch += 1;
        }
        self.binding = Some(Binding {
            editor,
            document,
            position,
        });
    }

    /// Alias of [`CursorTracker::set`] used when the active editor changes or a
    /// tab switch completes; `selection` is the new editor's current cursor.
    pub fn rebind(&mut self, editor: EditorId, document: DocumentId, selection: Position) {
        self.set(editor, document, selection);
    }

    /// Replace the position, keeping the bound editor.
    pub fn move_to(&mut self, position: Position) {
        if let Some(binding) = &mut self.binding {
            binding.position = position;
        }
    }

    /// Offset the position by `(d_line, d_column)`, see [`Position::translate`].
    pub fn advance(&mut self, d_line: u32, d_column: u32) {
        if let Some(binding) = &mut self.binding {
            binding.position = binding.position.translate(d_line, d_column);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: DocumentId = DocumentId(1);

    #[test]
    fn unbound_tracker_has_no_position() {
        let mut tracker = CursorTracker::new();
        tracker.advance(0, 3);
        tracker.move_to(Position::new(1, 1));

        assert_eq!(tracker.get(), None);
        assert_eq!(tracker.epoch(), 0);
    }

    #[test]
    fn epoch_moves_only_when_editor_changes() {
        let mut tracker = CursorTracker::new();
        tracker.set(EditorId(1), DOC, Position::new(0, 0));
        let first = tracker.epoch();

        tracker.set(EditorId(1), DOC, Position::new(3, 2));
        assert_eq!(tracker.epoch(), first);

        tracker.rebind(EditorId(2), DocumentId(2), Position::new(0, 0));
        assert_eq!(tracker.epoch(), first + 1);
    }

    #[test]
    fn advance_follows_translate_rules() {
        let mut tracker = CursorTracker::new();
        tracker.set(EditorId(1), DOC, Position::new(0, 4));

        tracker.advance(0, 1);
        assert_eq!(tracker.get(), Some(Position::new(0, 5)));

        tracker.advance(1, 0);
        assert_eq!(tracker.get(), Some(Position::new(1, 0)));
    }
}
