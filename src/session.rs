use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::command::{PanelCommand, PanelMessage, SessionEvent};
use crate::cursor::CursorTracker;
use crate::engine::{Canceller, SessionReport, TypingEngine, TypingHandle};
use crate::error::EngineError;
use crate::host::{Host, HostEvent};
use crate::model::{Config, DocumentInfo, EditorId};
use crate::paste::{route_paste, PasteOutcome};
use crate::workspace::{lock, Shared, Workspace};

/// Resolve a tab name against open documents by path suffix.
///
/// Ties go to the first match in the host's listing order.
pub fn resolve_tab<'a>(documents: &'a [DocumentInfo], name: &str) -> Option<&'a DocumentInfo> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    documents.iter().find(|doc| doc.path.ends_with(name))
}

/// Top-level orchestrator for one control panel.
///
/// Owns the shared workspace (host, cursor, config, marker) and the typing
/// engine, and turns panel commands and host notifications into engine calls.
pub struct SessionController<H: Host> {
    shared: Shared<H>,
    engine: TypingEngine,
    current: Option<TypingHandle>,
    panel: UnboundedSender<PanelMessage>,
}

impl<H: Host> SessionController<H> {
    pub fn new(host: H, config: Config, panel: UnboundedSender<PanelMessage>) -> Self {
        Self {
            shared: Workspace::new(host, config).into_shared(),
            engine: TypingEngine::new(),
            current: None,
            panel,
        }
    }

    pub fn shared(&self) -> &Shared<H> {
        &self.shared
    }

    pub fn engine(&self) -> &TypingEngine {
        &self.engine
    }

    /// Run `f` against the host while holding the workspace lock.
    pub fn with_host<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        f(&mut lock(&self.shared).host)
    }

    pub fn config(&self) -> Config {
        lock(&self.shared).config.clone()
    }

    pub fn tracker(&self) -> CursorTracker {
        lock(&self.shared).tracker.clone()
    }

    /// Start typing at the tracker position. `speed` overrides the configured
    /// speed for this session only.
    pub fn start_typing(&mut self, text: &str, speed: Option<u64>) -> Result<u64, EngineError> {
        let (binding, speed) = {
            let ws = lock(&self.shared);
            let binding = ws.tracker.binding().ok_or(EngineError::NoActiveEditor)?;
            (binding, speed.unwrap_or(ws.config.typing_speed_ms))
        };

        let handle =
            self.engine
                .play(&self.shared, binding.editor, binding.position, text, speed)?;
        let session = handle.session();
        self.current = Some(handle);
        Ok(session)
    }

    pub fn paste_received(&mut self, text: &str) -> Result<(), EngineError> {
        match route_paste(&self.shared, &self.engine, text)? {
            PasteOutcome::Inserted { .. } => {}
            PasteOutcome::Replayed(handle) => self.current = Some(handle),
        }
        Ok(())
    }

    /// Focus the document whose path ends with `name` and rebind to it.
    pub fn switch_tab(&mut self, name: &str) -> Result<EditorId, EngineError> {
        let mut ws = lock(&self.shared);
        let documents = ws.host.open_documents();
        let document = resolve_tab(&documents, name)
            .ok_or_else(|| EngineError::NotFound(name.to_string()))?;

        if ws.host.visible_editor(document.id).is_none() {
            return Err(EngineError::NoVisibleEditor(document.path.clone()));
        }
        let editor = ws
            .host
            .show_document(document.id, true)
            .ok_or_else(|| EngineError::NoVisibleEditor(document.path.clone()))?;

        if !ws.bind_editor(editor) {
            return Err(EngineError::NoVisibleEditor(document.path.clone()));
        }
        info!(target: "session", tab = %document.path, %editor, "switched tab");
        Ok(editor)
    }

    pub fn set_speed(&mut self, speed_ms: u64) -> Result<(), EngineError> {
        if speed_ms == 0 {
            return Err(EngineError::InvalidSpeed(speed_ms));
        }
        lock(&self.shared).config.typing_speed_ms = speed_ms;
        debug!(target: "session", speed_ms, "typing speed set");
        Ok(())
    }

    pub fn set_auto_trigger(&mut self, enabled: bool) {
        lock(&self.shared).config.auto_trigger_on_paste = enabled;
        debug!(target: "session", enabled, "auto-trigger set");
    }

    pub fn set_marker_visible(&mut self, visible: bool) {
        let mut ws = lock(&self.shared);
        ws.config.marker_visible = visible;
        ws.repaint_marker();
    }

    pub fn clear(&mut self) {
        self.post(PanelMessage::ClearText);
    }

    pub fn tab_names(&self) -> Vec<String> {
        lock(&self.shared)
            .host
            .open_documents()
            .iter()
            .map(|doc| doc.tab_name().to_string())
            .collect()
    }

    pub fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::SelectionChanged { editor, position } => {
                let mut ws = lock(&self.shared);
                let Some(document) = ws.host.editor_document(editor) else {
                    return;
                };
                ws.tracker.set(editor, document, position);
                ws.repaint_marker();
            }
            HostEvent::ActiveEditorChanged { editor: Some(editor) } => {
                {
                    // Refocusing the tracked editor keeps the tracked position.
                    let mut ws = lock(&self.shared);
                    if ws.tracker.editor() != Some(editor) {
                        ws.bind_editor(editor);
                    }
                }
                let tabs = self.tab_names();
                self.post(PanelMessage::TabList { tabs });
            }
            // Focus moved to a non-editor view such as the panel itself.
            HostEvent::ActiveEditorChanged { editor: None } => {}
        }
    }

    /// Apply one panel command. Errors are also reported to the panel.
    pub fn dispatch(&mut self, command: PanelCommand) -> Result<(), EngineError> {
        let result = match command {
            PanelCommand::TriggerTypewriter { text, speed } => {
                self.start_typing(&text, speed).map(|_| ())
            }
            PanelCommand::HandlePaste { text } => self.paste_received(&text),
            PanelCommand::SelectTab { tab_name } => self.switch_tab(&tab_name).map(|_| ()),
            PanelCommand::ToggleAutoTrigger { value } => {
                self.set_auto_trigger(value);
                Ok(())
            }
            PanelCommand::SetTypingSpeed { value } => self.set_speed(value),
            PanelCommand::ToggleArrowVisibility { is_visible } => {
                self.set_marker_visible(is_visible);
                Ok(())
            }
            PanelCommand::HandleClear => {
                self.clear();
                Ok(())
            }
            PanelCommand::RequestTabs => {
                let tabs = self.tab_names();
                self.post(PanelMessage::TabList { tabs });
                Ok(())
            }
        };

        if let Err(err) = &result {
            info!(target: "session", %err, "command rejected");
            self.post(PanelMessage::Info {
                message: err.to_string(),
            });
        }
        result
    }

    pub fn handle_event(&mut self, event: SessionEvent) -> Result<(), EngineError> {
        match event {
            SessionEvent::Panel(command) => self.dispatch(command),
            SessionEvent::Host(event) => {
                self.handle_host_event(event);
                Ok(())
            }
        }
    }

    /// Wait for the most recent typing session, if any, to end.
    pub async fn wait_idle(&mut self) -> Option<SessionReport> {
        let handle = self.current.take()?;
        Some(handle.finished().await)
    }

    pub fn canceller(&self) -> Option<Canceller> {
        self.current.as_ref().map(TypingHandle::canceller)
    }

    /// Stop the running session, if any.
    pub fn cancel(&self) {
        if let Some(handle) = &self.current {
            handle.cancel();
        }
    }

    /// Process events until the sender side closes, then wait for the last
    /// session to finish.
    pub async fn run(mut self, mut events: UnboundedReceiver<SessionEvent>) -> Self {
        while let Some(event) = events.recv().await {
            // Errors were already reported to the panel.
            let _ = self.handle_event(event);
        }
        self.wait_idle().await;
        self
    }

    fn post(&self, message: PanelMessage) {
        if self.panel.send(message).is_err() {
            debug!(target: "session", "panel closed, message dropped");
        }
    }
}
