use thiserror::Error;

use crate::model::{DocumentId, EditorId};

/// Failures reported by the engine. None of them is fatal: the controller turns
/// each into an informational panel message and leaves state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("No active editor found!")]
    NoActiveEditor,

    #[error("{editor} is no longer available: {reason}")]
    InvalidTarget { editor: EditorId, reason: String },

    #[error("A typing session is already running")]
    SessionBusy,

    #[error("No open document matches \"{0}\"")]
    NotFound(String),

    #[error("Document {0} has no visible editor")]
    NoVisibleEditor(String),

    #[error("Typing speed must be a positive number of milliseconds (got {0})")]
    InvalidSpeed(u64),
}

/// Failures raised by the host editor collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("unknown editor {0}")]
    UnknownEditor(EditorId),

    #[error("{0} was closed")]
    DocumentClosed(DocumentId),

    #[error("edit rejected by {0}")]
    EditRejected(DocumentId),
}
