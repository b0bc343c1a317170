use crate::error::HostError;
use crate::model::{DocumentId, DocumentInfo, EditorId, Marker, Position};

/// The host editor as seen by the engine.
///
/// Implementations wrap whatever editor API is available. Notifications
/// (selection and active-editor changes) are not pulled through this trait;
/// the host pushes them into the session as [`HostEvent`]s.
pub trait Host: Send + 'static {
    fn active_editor(&self) -> Option<EditorId>;

    fn editor_document(&self, editor: EditorId) -> Option<DocumentId>;

    /// The primary cursor of `editor`.
    fn selection(&self, editor: EditorId) -> Option<Position>;

    /// Open documents in a stable order.
    fn open_documents(&self) -> Vec<DocumentInfo>;

    fn visible_editor(&self, document: DocumentId) -> Option<EditorId>;

    /// Insert `text` verbatim at `position`. Positions past the end of a line
    /// or document are clamped by the host. Cursors at or after `position`
    /// move with the inserted text.
    fn insert(
        &mut self,
        editor: EditorId,
        position: Position,
        text: &str,
        origin: InsertOrigin,
    ) -> Result<(), HostError>;

    fn add_marker(&mut self, editor: EditorId, marker: Marker);

    fn clear_markers(&mut self, editor: EditorId);

    /// Bring `document` into view. With `preserve_focus` keyboard focus stays
    /// where it is (e.g. on the control panel).
    fn show_document(&mut self, document: DocumentId, preserve_focus: bool) -> Option<EditorId>;
}

/// Which engine path produced an insertion. Hosts may use it for undo
/// grouping or logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOrigin {
    Typing,
    Paste,
}

/// Notifications emitted by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    SelectionChanged { editor: EditorId, position: Position },
    ActiveEditorChanged { editor: Option<EditorId> },
}
