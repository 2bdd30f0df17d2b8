//! Line Emitter
//!
//! Collects generated JavaScript line by line with tracked indentation.

use once_cell::sync::Lazy;
use regex::Regex;

const INDENT_WITH: &str = "  ";

static LEGAL_IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_$][0-9a-zA-Z_$]*$").unwrap());

#[derive(Debug, Clone)]
struct EmittedLine {
    parts: Vec<String>,
    indent: usize,
}

impl EmittedLine {
    fn new(indent: usize) -> Self {
        EmittedLine {
            parts: Vec::new(),
            indent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmitterContext {
    lines: Vec<EmittedLine>,
    indent: usize,
    /// Prefix of every line after the first, for output spliced into an
    /// already indented line.
    margin: String,
}

impl Default for EmitterContext {
    fn default() -> Self {
        Self::create_root()
    }
}

impl EmitterContext {
    pub fn create_root() -> Self {
        EmitterContext::new(0)
    }

    pub fn new(indent: usize) -> Self {
        EmitterContext {
            lines: vec![EmittedLine::new(indent)],
            indent,
            margin: String::new(),
        }
    }

    pub fn with_margin(margin: &str) -> Self {
        EmitterContext {
            margin: margin.to_string(),
            ..Self::create_root()
        }
    }

    fn current_line_mut(&mut self) -> &mut EmittedLine {
        if self.lines.is_empty() {
            self.lines.push(EmittedLine::new(self.indent));
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    pub fn line_is_empty(&self) -> bool {
        self.lines.last().map_or(true, |l| l.parts.is_empty())
    }

    pub fn print(&mut self, part: &str) {
        if !part.is_empty() {
            self.current_line_mut().parts.push(part.to_string());
        }
    }

    pub fn println(&mut self, last_part: &str) {
        self.print(last_part);
        self.lines.push(EmittedLine::new(self.indent));
    }

    pub fn inc_indent(&mut self) {
        self.indent += 1;
        if self.line_is_empty() {
            let indent = self.indent;
            self.current_line_mut().indent = indent;
        }
    }

    pub fn dec_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        if self.line_is_empty() {
            let indent = self.indent;
            self.current_line_mut().indent = indent;
        }
    }

    pub fn to_source(&self) -> String {
        let mut lines: &[EmittedLine] = &self.lines;
        if let Some((last, rest)) = lines.split_last() {
            if last.parts.is_empty() {
                lines = rest;
            }
        }
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| {
                if l.parts.is_empty() {
                    return String::new();
                }
                let margin = if i == 0 { "" } else { self.margin.as_str() };
                format!("{}{}{}", margin, INDENT_WITH.repeat(l.indent), l.parts.concat())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Print an object-literal key, quoting it when it is not a plain identifier.
pub fn property_key(name: &str) -> String {
    if LEGAL_IDENTIFIER_RE.is_match(name) {
        name.to_string()
    } else {
        serde_json::to_string(name).unwrap_or_else(|_| format!("\"{}\"", name))
    }
}
