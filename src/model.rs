use std::fmt;

use serde::{Deserialize, Serialize};

/// A zero-based (line, column) location in a document. Columns count chars.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Offset by `(d_line, d_column)`.
    ///
    /// When `d_line` is non-zero the column is absolute within the destination
    /// line, so `translate(1, 0)` is the start of the next line.
    pub fn translate(self, d_line: u32, d_column: u32) -> Self {
        if d_line == 0 {
            Self::new(self.line, self.column.saturating_add(d_column))
        } else {
            Self::new(self.line.saturating_add(d_line), d_column)
        }
    }

    /// Move down `lines` keeping the current column.
    pub fn down(self, lines: u32) -> Self {
        Self::new(self.line.saturating_add(lines), self.column)
    }

    /// The position immediately following `text` inserted at `self`.
    pub fn after(self, text: &str) -> Self {
        let newlines = text.matches('\n').count();
        if newlines == 0 {
            return self.translate(0, char_len(text));
        }

        let tail = text.rsplit('\n').next().unwrap_or_default();
        self.translate(clamp_u32(newlines), char_len(tail))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

fn char_len(text: &str) -> u32 {
    clamp_u32(text.chars().count())
}

fn clamp_u32(n: usize) -> u32 {
    n.try_into().unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EditorId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "editor#{}", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document#{}", self.0)
    }
}

/// An open document as listed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub id: DocumentId,
    pub path: String,
}

impl DocumentInfo {
    /// The last path component, as shown on the editor tab.
    pub fn tab_name(&self) -> &str {
        self.path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.path.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub glyph: String,
    pub color: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            glyph: "←".to_string(),
            color: "#ff5555".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub typing_speed_ms: u64,
    pub auto_trigger_on_paste: bool,
    pub marker_visible: bool,
    pub marker: MarkerStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            typing_speed_ms: 10,
            auto_trigger_on_paste: false,
            marker_visible: true,
            marker: MarkerStyle::default(),
        }
    }
}

/// A painted marker glyph, anchored just after `position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Position,
    pub glyph: String,
    pub color: String,
}
