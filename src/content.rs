//! Source text model: line splitting, marker lookup, and the content digest.
//!
//! The digest joins lines with `\n` regardless of the file's own line endings
//! so a checkout on another platform hashes identically.
use crate::util::sha256_hex;
use crate::version::{find_version, Version};

pub const DEFAULT_COMMENT_PREFIX: &str = "//";
const MARKER_KEYWORD: &str = "version";
const BOM: char = '\u{FEFF}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// A text file split into lines, remembering how to put it back together.
///
/// Each line keeps its own terminator. A leading byte order mark is held
/// aside so it neither hides a marker on the first line nor reaches the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    bom: bool,
    lines: Vec<String>,
    endings: Vec<LineEnding>,
    trailing_newline: bool,
}

impl SourceText {
    pub fn parse(text: &str) -> Self {
        let (bom, mut rest) = match text.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let mut lines = Vec::new();
        let mut endings = Vec::new();
        while let Some(pos) = rest.find('\n') {
            let line = &rest[..pos];
            match line.strip_suffix('\r') {
                Some(line) => {
                    lines.push(line.to_string());
                    endings.push(LineEnding::CrLf);
                }
                None => {
                    lines.push(line.to_string());
                    endings.push(LineEnding::Lf);
                }
            }
            rest = &rest[pos + 1..];
        }
        let trailing_newline = rest.is_empty() && !lines.is_empty();
        if !rest.is_empty() {
            lines.push(rest.to_string());
            endings.push(endings.last().copied().unwrap_or(LineEnding::Lf));
        }
        Self {
            bom,
            lines,
            endings,
            trailing_newline,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        let mut text = String::new();
        if self.bom {
            text.push(BOM);
        }
        let last = self.lines.len().saturating_sub(1);
        for (index, (line, ending)) in self.lines.iter().zip(&self.endings).enumerate() {
            text.push_str(line);
            if index < last || self.trailing_newline {
                text.push_str(ending.as_str());
            }
        }
        text
    }

    /// Replace the marker line in place, or insert one at the top.
    pub fn write_marker(&mut self, marker: Option<&Marker>, line: String) {
        match marker {
            Some(marker) if marker.index < self.lines.len() => {
                let existing = &self.lines[marker.index];
                let indent_len = existing.len() - existing.trim_start().len();
                let indent = existing[..indent_len].to_string();
                self.lines[marker.index] = format!("{indent}{line}");
            }
            _ => {
                if self.lines.is_empty() {
                    self.trailing_newline = true;
                }
                let ending = self.endings.first().copied().unwrap_or(LineEnding::Lf);
                self.lines.insert(0, line);
                self.endings.insert(0, ending);
            }
        }
    }
}

/// Location and parsed value of a file's version marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub index: usize,
    /// `None` when the line exists but carries no dotted version.
    pub version: Option<Version>,
}

fn is_marker_line(line: &str, comment_prefix: &str) -> bool {
    let Some(rest) = line.trim_start().strip_prefix(comment_prefix) else {
        return false;
    };
    let rest = rest.trim_start();
    rest.get(..MARKER_KEYWORD.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(MARKER_KEYWORD))
}

/// First line that looks like `// Version: ...` (case-insensitive).
pub fn find_marker(lines: &[String], comment_prefix: &str) -> Option<Marker> {
    lines
        .iter()
        .position(|line| is_marker_line(line, comment_prefix))
        .map(|index| Marker {
            index,
            version: find_version(&lines[index]),
        })
}

pub fn marker_line(comment_prefix: &str, version: &Version) -> String {
    format!("{comment_prefix} Version: {version}")
}

/// SHA-256 (hex) over every line except the marker, joined with `\n`.
pub fn content_hash(lines: &[String], marker_index: Option<usize>) -> String {
    let body = lines
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != marker_index)
        .map(|(_, line)| line.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    sha256_hex(body.as_bytes())
}
