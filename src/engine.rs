use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::host::{Host, InsertOrigin};
use crate::insert::insert_text;
use crate::model::{EditorId, Position};
use crate::workspace::{lock, Shared};

/// One insertion of a typing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Line break between two source lines.
    Newline,
    /// Leading whitespace of a line, inserted as one block.
    Indent(String),
    /// A visible keystroke, preceded by the typing delay.
    Char(char),
}

impl Step {
    pub fn text(&self) -> String {
        match self {
            Step::Newline => "\n".to_string(),
            Step::Indent(indent) => indent.clone(),
            Step::Char(c) => c.to_string(),
        }
    }

    pub fn is_delayed(&self) -> bool {
        matches!(self, Step::Char(_))
    }
}

fn is_indent_char(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Break `text` into insertion steps.
///
/// Every `\n` in `text` becomes one [`Step::Newline`], a trailing one
/// included; a `\r` before it is dropped. Line breaks are re-emitted
/// explicitly between lines.
pub fn typing_steps(text: &str) -> Vec<Step> {
    let mut steps = Vec::with_capacity(text.len());

    for (idx, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if idx > 0 {
            steps.push(Step::Newline);
        }

        let body = line.trim_start_matches(is_indent_char);
        let indent = &line[..line.len() - body.len()];
        if !indent.is_empty() {
            steps.push(Step::Indent(indent.to_string()));
        }

        steps.extend(body.chars().map(Step::Char));
    }

    steps
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every step ran (failed, skipped steps included).
    Completed,
    /// The tracker moved to another editor, or the target editor went away.
    Cancelled,
    /// Stopped through [`TypingHandle::cancel`].
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub session: u64,
    pub insertions: usize,
    pub outcome: SessionOutcome,
}

/// Holds the engine's busy flag for the lifetime of a session.
#[derive(Debug)]
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard(flag.clone()))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Stops a running session from anywhere (e.g. a Ctrl+C handler).
#[derive(Debug, Clone)]
pub struct Canceller(Arc<AtomicBool>);

impl Canceller {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct TypingHandle {
    session: u64,
    stop: Arc<AtomicBool>,
    task: JoinHandle<SessionReport>,
}

impl TypingHandle {
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Drop every step not yet inserted. Text already typed stays.
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn canceller(&self) -> Canceller {
        Canceller(self.stop.clone())
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn finished(self) -> SessionReport {
        match self.task.await {
            Ok(report) => report,
            Err(err) => {
                warn!(target: "engine", session = self.session, %err, "typing task aborted");
                SessionReport {
                    session: self.session,
                    insertions: 0,
                    outcome: SessionOutcome::Cancelled,
                }
            }
        }
    }
}

/// Replays text into a document one keystroke at a time.
///
/// At most one session runs per engine; clones share the busy flag.
#[derive(Debug, Default, Clone)]
pub struct TypingEngine {
    busy: Arc<AtomicBool>,
    sessions: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy)]
struct Target {
    session: u64,
    editor: EditorId,
    epoch: u64,
}

enum StepResult {
    Applied,
    Skipped,
    Stale,
}

impl TypingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Start typing `text` into `editor` from `start`, waiting `speed_ms`
    /// before each visible character.
    ///
    /// Rebinds the tracker to `(editor, start)`. Must be called from within a
    /// Tokio runtime; the session runs as a spawned task.
    pub fn play<H: Host>(
        &self,
        shared: &Shared<H>,
        editor: EditorId,
        start: Position,
        text: &str,
        speed_ms: u64,
    ) -> Result<TypingHandle, EngineError> {
        if speed_ms == 0 {
            return Err(EngineError::InvalidSpeed(speed_ms));
        }
        let guard = BusyGuard::acquire(&self.busy).ok_or(EngineError::SessionBusy)?;

        let epoch = {
            let mut ws = lock(shared);
            let document =
                ws.host
                    .editor_document(editor)
                    .ok_or_else(|| EngineError::InvalidTarget {
                        editor,
                        reason: "editor is not open".to_string(),
                    })?;
            ws.tracker.set(editor, document, start);
            ws.repaint_marker();
            ws.tracker.epoch()
        };

        let target = Target {
            session: self.sessions.fetch_add(1, Ordering::SeqCst) + 1,
            editor,
            epoch,
        };
        let steps = typing_steps(text);
        info!(
            target: "engine",
            session = target.session,
            %editor,
            %start,
            steps = steps.len(),
            speed_ms,
            "typing session started"
        );

        let stop = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(run_session(
            shared.clone(),
            target,
            steps,
            Duration::from_millis(speed_ms),
            stop.clone(),
            guard,
        ));

        Ok(TypingHandle {
            session: target.session,
            stop,
            task,
        })
    }
}

async fn run_session<H: Host>(
    shared: Shared<H>,
    target: Target,
    steps: Vec<Step>,
    delay: Duration,
    stop: Arc<AtomicBool>,
    _guard: BusyGuard,
) -> SessionReport {
    let mut insertions = 0usize;
    let mut outcome = SessionOutcome::Completed;

    for step in &steps {
        if stop.load(Ordering::SeqCst) {
            outcome = SessionOutcome::Stopped;
            break;
        }

        if step.is_delayed() {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        if stop.load(Ordering::SeqCst) {
            outcome = SessionOutcome::Stopped;
            break;
        }

        match apply_step(&shared, target, step) {
            StepResult::Applied => insertions += 1,
            StepResult::Skipped => {}
            StepResult::Stale => {
                outcome = SessionOutcome::Cancelled;
                break;
            }
        }
    }

    info!(
        target: "engine",
        session = target.session,
        insertions,
        total = steps.len(),
        ?outcome,
        "typing session ended"
    );
    SessionReport {
        session: target.session,
        insertions,
        outcome,
    }
}

fn apply_step<H: Host>(shared: &Shared<H>, target: Target, step: &Step) -> StepResult {
    let mut ws = lock(shared);

    if ws.tracker.epoch() != target.epoch {
        debug!(target: "engine", session = target.session, "tracker rebound, dropping session");
        return StepResult::Stale;
    }
    let Some(position) = ws.tracker.get() else {
        return StepResult::Stale;
    };

    match insert_text(
        &mut ws.host,
        target.editor,
        position,
        &step.text(),
        InsertOrigin::Typing,
    ) {
        Ok(next) => {
            ws.tracker.move_to(next);
            ws.repaint_marker();
            StepResult::Applied
        }
        Err(err) if ws.host.editor_document(target.editor).is_none() => {
            debug!(
                target: "engine",
                session = target.session,
                %err,
                "target gone, dropping session"
            );
            StepResult::Stale
        }
        Err(err) => {
            warn!(target: "engine", session = target.session, %err, "insertion failed, skipping");
            StepResult::Skipped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_is_one_step_per_char() {
        assert_eq!(
            typing_steps("hi!"),
            vec![Step::Char('h'), Step::Char('i'), Step::Char('!')]
        );
    }

    #[test]
    fn indentation_is_a_single_block() {
        assert_eq!(
            typing_steps("a\n \tb c"),
            vec![
                Step::Char('a'),
                Step::Newline,
                Step::Indent(" \t".to_string()),
                Step::Char('b'),
                Step::Char(' '),
                Step::Char('c'),
            ]
        );
    }

    #[test]
    fn blank_lines_and_trailing_newline() {
        assert_eq!(
            typing_steps("a\r\n\nb\n"),
            vec![
                Step::Char('a'),
                Step::Newline,
                Step::Newline,
                Step::Char('b'),
                Step::Newline,
            ]
        );
        assert_eq!(typing_steps("\n"), vec![Step::Newline]);
        assert!(typing_steps("").is_empty());
    }

    #[test]
    fn whitespace_only_line_is_all_indent() {
        assert_eq!(typing_steps("    "), vec![Step::Indent("    ".to_string())]);
    }

    #[test]
    fn busy_guard_is_exclusive_and_released_on_drop() {
        let flag = Arc::new(AtomicBool::new(false));
        let guard = BusyGuard::acquire(&flag).unwrap();
        assert!(BusyGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(BusyGuard::acquire(&flag).is_some());
    }
}
