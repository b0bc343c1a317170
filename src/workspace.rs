use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::cursor::CursorTracker;
use crate::host::Host;
use crate::marker::MarkerRenderer;
use crate::model::{Config, EditorId};

/// Everything a session mutates: the host, the cursor, config and the marker.
#[derive(Debug)]
pub struct Workspace<H> {
    pub host: H,
    pub tracker: CursorTracker,
    pub config: Config,
    pub marker: MarkerRenderer,
}

pub type Shared<H> = Arc<Mutex<Workspace<H>>>;

/// Lock the shared workspace. Every update is a single step, so a poisoned
/// lock still holds consistent state.
pub fn lock<H>(shared: &Shared<H>) -> MutexGuard<'_, Workspace<H>> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<H: Host> Workspace<H> {
    /// Create a workspace bound to the host's active editor, if any.
    pub fn new(host: H, config: Config) -> Self {
        let mut ws = Self {
            host,
            tracker: CursorTracker::new(),
            config,
            marker: MarkerRenderer::new(),
        };
        if let Some(editor) = ws.host.active_editor() {
            ws.bind_editor(editor);
        }
        ws
    }

    pub fn into_shared(self) -> Shared<H> {
        Arc::new(Mutex::new(self))
    }

    /// Rebind the tracker to `editor` at its current selection and repaint.
    /// Returns false if the host no longer knows the editor.
    pub fn bind_editor(&mut self, editor: EditorId) -> bool {
        let Some(document) = self.host.editor_document(editor) else {
            debug!(target: "session", %editor, "bind to unknown editor ignored");
            return false;
        };
        let selection = self.host.selection(editor).unwrap_or_default();
        self.tracker.rebind(editor, document, selection);
        self.repaint_marker();
        true
    }

    /// Repaint the marker at the tracker position (or clear it when unbound).
    pub fn repaint_marker(&mut self) {
        match self.tracker.binding() {
            Some(binding) => self.marker.render(
                &mut self.host,
                binding.editor,
                binding.position,
                self.config.marker_visible,
                &self.config.marker,
            ),
            None => self.marker.clear(&mut self.host),
        }
    }
}
