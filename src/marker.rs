use tracing::trace;

use crate::host::Host;
use crate::model::{EditorId, Marker, MarkerStyle, Position};

/// Paints the "arrow" showing where typing resumes.
///
/// Rendering always clears before painting, so repeated calls never stack
/// markers, and moving to another editor wipes the one left behind.
#[derive(Debug, Default, Clone)]
pub struct MarkerRenderer {
    painted: Option<EditorId>,
}

impl MarkerRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn painted_editor(&self) -> Option<EditorId> {
        self.painted
    }

    pub fn render<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        editor: EditorId,
        position: Position,
        visible: bool,
        style: &MarkerStyle,
    ) {
        if let Some(previous) = self.painted.take() {
            if previous != editor {
                host.clear_markers(previous);
            }
        }
        host.clear_markers(editor);

        if !visible {
            trace!(target: "marker", %editor, "cleared");
            return;
        }

        host.add_marker(
            editor,
            Marker {
                position,
                glyph: style.glyph.clone(),
                color: style.color.clone(),
            },
        );
        self.painted = Some(editor);
        trace!(target: "marker", %editor, %position, "painted");
    }

    pub fn clear<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(previous) = self.painted.take() {
            host.clear_markers(previous);
        }
    }
}
