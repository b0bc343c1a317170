use crate::host::InsertOrigin;
use crate::model::{EditorId, Position};
use crate::sim::InsertRecord;

#[derive(Debug, Default)]
struct TraceBuilder {
    run: String,
    run_editor: Option<EditorId>,
    expected: Option<Position>,
    lines: Vec<String>,
}

impl TraceBuilder {
    fn flush_run(&mut self) {
        if !self.run.is_empty() {
            self.lines
                .push(format!("Typing \"{}\"...", escape_for_log(&self.run)));
            self.run.clear();
        }
        self.run_editor = None;
        self.expected = None;
    }

    fn observe(&mut self, record: &InsertRecord) {
        if record.origin == InsertOrigin::Paste {
            self.flush_run();
            self.lines
                .push(format!("Paste \"{}\"...", escape_for_log(&record.text)));
            return;
        }

        let continues = self.run_editor == Some(record.editor)
            && self.expected == Some(record.position);
        if !continues {
            self.flush_run();
        }

        self.run.push_str(&record.text);
        self.run_editor = Some(record.editor);
        self.expected = Some(record.position.after(&record.text));
    }
}

/// Summarize an insertion log as console lines.
///
/// Contiguous typed insertions (indentation and line breaks included) collapse
/// into one `Typing "..."...` line; every pasted line gets its own line.
pub fn console_trace(records: &[InsertRecord]) -> Vec<String> {
    let mut builder = TraceBuilder::default();
    for record in records {
        builder.observe(record);
    }
    builder.flush_run();
    builder.lines
}

pub fn print_trace_line(line: &str) {
    const RESET: &str = "\x1b[0m";
    const TYPING: &str = "\x1b[34m";
    const PASTE: &str = "\x1b[33m";

    if let Some(rest) = line.strip_prefix("Typing") {
        eprintln!("{TYPING}Typing{RESET}{rest}");
    } else if let Some(rest) = line.strip_prefix("Paste") {
        eprintln!("{PASTE}Paste{RESET}{rest}");
    } else {
        eprintln!("{line}");
    }
}

fn escape_for_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
