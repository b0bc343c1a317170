use crate::error::HostError;
use crate::host::{Host, InsertOrigin};
use crate::model::{DocumentId, DocumentInfo, EditorId, Marker, Position};

/// One successful insertion, in the order the host applied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertRecord {
    pub editor: EditorId,
    pub position: Position,
    pub text: String,
    pub origin: InsertOrigin,
}

/// Where `cursor` ends up once `text` is inserted at `at`.
fn shift_cursor(cursor: Position, at: Position, text: &str) -> Position {
    if cursor < at {
        return cursor;
    }
    let end = at.after(text);
    if cursor.line == at.line {
        Position::new(end.line, end.column + (cursor.column - at.column))
    } else {
        cursor.down(end.line - at.line)
    }
}

#[derive(Debug, Clone)]
struct SimDocument {
    id: DocumentId,
    path: String,
    lines: Vec<String>,
}

impl SimDocument {
    fn new(id: DocumentId, path: &str, text: &str) -> Self {
        Self {
            id,
            path: path.to_string(),
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    fn clamp(&self, position: Position) -> Position {
        let last = self.lines.len().saturating_sub(1);
        let line = (position.line as usize).min(last);
        let width = self.lines[line].chars().count();
        Position::new(line as u32, (position.column as usize).min(width) as u32)
    }

    /// Insert at the clamped `position` and return that position.
    fn insert(&mut self, position: Position, text: &str) -> Position {
        let position = self.clamp(position);
        let line = position.line as usize;
        let current = &self.lines[line];
        let split = current
            .char_indices()
            .nth(position.column as usize)
            .map(|(idx, _)| idx)
            .unwrap_or(current.len());

        let merged = format!("{}{}{}", &current[..split], text, &current[split..]);
        let replacement: Vec<String> = merged.split('\n').map(str::to_string).collect();
        self.lines.splice(line..=line, replacement);
        position
    }

    fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone)]
struct SimEditor {
    id: EditorId,
    document: DocumentId,
    selection: Position,
    visible: bool,
    markers: Vec<Marker>,
}

/// An in-memory editor host.
///
/// This is intended for the CLI and tests. It models open documents, their
/// editors and markers, and clamps insert positions the way real editors
/// validate them. It does not emit notifications on its own.
#[derive(Debug, Default, Clone)]
pub struct MemoryHost {
    documents: Vec<SimDocument>,
    editors: Vec<SimEditor>,
    active: Option<EditorId>,
    next_id: u64,
    log: Vec<InsertRecord>,
    shown: Vec<(DocumentId, bool)>,
    rejections: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Open `path` with `text` in a visible editor and make it active.
    pub fn open(&mut self, path: &str, text: &str) -> (DocumentId, EditorId) {
        let document = self.open_hidden(path, text);
        let editor = EditorId(self.alloc_id());
        self.editors.push(SimEditor {
            id: editor,
            document,
            selection: Position::default(),
            visible: true,
            markers: Vec::new(),
        });
        self.active = Some(editor);
        (document, editor)
    }

    /// Open `path` without any visible editor (a background tab).
    pub fn open_hidden(&mut self, path: &str, text: &str) -> DocumentId {
        let document = DocumentId(self.alloc_id());
        self.documents.push(SimDocument::new(document, path, text));
        document
    }

    /// Close a document and every editor showing it.
    pub fn close(&mut self, document: DocumentId) {
        self.documents.retain(|doc| doc.id != document);
        self.editors.retain(|editor| editor.document != document);
        if let Some(active) = self.active {
            if !self.editors.iter().any(|editor| editor.id == active) {
                self.active = None;
            }
        }
    }

    /// Make the next `count` insertions fail while the editors stay open.
    pub fn reject_next_inserts(&mut self, count: usize) {
        self.rejections = count;
    }

    pub fn set_active(&mut self, editor: Option<EditorId>) {
        self.active = editor;
    }

    pub fn set_selection(&mut self, editor: EditorId, position: Position) {
        if let Some(editor) = self.editor_mut(editor) {
            editor.selection = position;
        }
    }

    pub fn text(&self, document: DocumentId) -> Option<String> {
        self.document(document).map(SimDocument::text)
    }

    pub fn path(&self, document: DocumentId) -> Option<&str> {
        self.document(document).map(|doc| doc.path.as_str())
    }

    pub fn markers(&self, editor: EditorId) -> &[Marker] {
        self.editor(editor)
            .map(|editor| editor.markers.as_slice())
            .unwrap_or(&[])
    }

    pub fn insertions(&self) -> &[InsertRecord] {
        &self.log
    }

    /// Documents passed to `show_document`, with their `preserve_focus` flag.
    pub fn shown(&self) -> &[(DocumentId, bool)] {
        &self.shown
    }

    fn document(&self, document: DocumentId) -> Option<&SimDocument> {
        self.documents.iter().find(|doc| doc.id == document)
    }

    fn editor(&self, editor: EditorId) -> Option<&SimEditor> {
        self.editors.iter().find(|e| e.id == editor)
    }

    fn editor_mut(&mut self, editor: EditorId) -> Option<&mut SimEditor> {
        self.editors.iter_mut().find(|e| e.id == editor)
    }
}

impl Host for MemoryHost {
    fn active_editor(&self) -> Option<EditorId> {
        self.active
    }

    fn editor_document(&self, editor: EditorId) -> Option<DocumentId> {
        self.editor(editor).map(|editor| editor.document)
    }

    fn selection(&self, editor: EditorId) -> Option<Position> {
        self.editor(editor).map(|editor| editor.selection)
    }

    fn open_documents(&self) -> Vec<DocumentInfo> {
        self.documents
            .iter()
            .map(|doc| DocumentInfo {
                id: doc.id,
                path: doc.path.clone(),
            })
            .collect()
    }

    fn visible_editor(&self, document: DocumentId) -> Option<EditorId> {
        self.editors
            .iter()
            .find(|editor| editor.document == document && editor.visible)
            .map(|editor| editor.id)
    }

    fn insert(
        &mut self,
        editor: EditorId,
        position: Position,
        text: &str,
        origin: InsertOrigin,
    ) -> Result<(), HostError> {
        let document = self
            .editor_document(editor)
            .ok_or(HostError::UnknownEditor(editor))?;
        if self.rejections > 0 {
            self.rejections -= 1;
            return Err(HostError::EditRejected(document));
        }
        let doc = self
            .documents
            .iter_mut()
            .find(|doc| doc.id == document)
            .ok_or(HostError::DocumentClosed(document))?;

        let at = doc.insert(position, text);
        for view in self.editors.iter_mut().filter(|e| e.document == document) {
            view.selection = shift_cursor(view.selection, at, text);
        }
        self.log.push(InsertRecord {
            editor,
            position,
            text: text.to_string(),
            origin,
        });
        Ok(())
    }

    fn add_marker(&mut self, editor: EditorId, marker: Marker) {
        if let Some(editor) = self.editor_mut(editor) {
            editor.markers.push(marker);
        }
    }

    fn clear_markers(&mut self, editor: EditorId) {
        if let Some(editor) = self.editor_mut(editor) {
            editor.markers.clear();
        }
    }

    fn show_document(&mut self, document: DocumentId, preserve_focus: bool) -> Option<EditorId> {
        let editor = self.visible_editor(document)?;
        self.shown.push((document, preserve_focus));
        self.active = Some(editor);
        Some(editor)
    }
}
