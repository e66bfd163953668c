use serde::{Deserialize, Serialize};
use std::fmt;

/// Which stage detected a problem, and how the parser reacted to it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Invalid character sequence, unterminated literal or comment, or an
    /// integer constant outside 0..=32767. Found by the tokenizer.
    Lexical,
    /// A production's expected token did not match. Parsing resumes at the
    /// next synchronizing token.
    Syntax,
    /// The unit does not open with `class` (or the class header is broken).
    /// Parsing stops and the tree is truncated.
    Structural,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Lexical => "lexical",
            ErrorKind::Syntax => "syntax",
            ErrorKind::Structural => "structural",
        })
    }
}

/// A single problem found in a compilation unit, anchored at a token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub line: u32,
    pub column: u32,
    pub message: String,
    /// Enclosing grammar rules, outermost first, at the point of failure.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub trace: Vec<String>,
}

impl Diagnostic {
    pub fn new(
        kind: ErrorKind,
        line: u32,
        column: u32,
        message: impl Into<String>,
        trace: Vec<String>,
    ) -> Self {
        Diagnostic {
            kind,
            line,
            column,
            message: message.into(),
            trace,
        }
    }

    pub fn lexical(line: u32, column: u32, message: impl Into<String>) -> Self {
        Diagnostic::new(ErrorKind::Lexical, line, column, message, Vec::new())
    }

    /// The trace joined as `class > subroutineDec > ...`.
    pub fn trace_path(&self) -> String {
        self.trace.join(" > ")
    }

    /// Serialize to JSON with every field present, including an empty trace.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "column":  self.column,
            "kind":    self.kind,
            "line":    self.line,
            "message": self.message,
            "trace":   self.trace,
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} error: {}",
            self.line, self.column, self.kind, self.message
        )?;
        if !self.trace.is_empty() {
            write!(f, " (in {})", self.trace_path())?;
        }
        Ok(())
    }
}
