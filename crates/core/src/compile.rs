//! Two-phase pipeline: tokenize the whole unit, then parse it.
//!
//! This is a thin orchestrator; each phase lives in its own module.

use crate::error::Diagnostic;
use crate::lexer::{self, Spanned};
use crate::parser::{self, ParseOptions};
use crate::serialize;
use crate::tree::Node;
use serde::Serialize;

/// Everything one compilation unit produces. Malformed input never makes
/// this fail; it shows up in `diagnostics`.
#[derive(Debug, Clone, Serialize)]
pub struct CompilationResult {
    /// Root `class` node, truncated if the class header was broken.
    pub tree: Node,
    /// In source order, at most one per token.
    pub diagnostics: Vec<Diagnostic>,
    pub tokens: Vec<Spanned>,
}

impl CompilationResult {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn to_xml(&self) -> String {
        serialize::to_xml(&self.tree)
    }

    pub fn tokens_to_xml(&self) -> String {
        serialize::tokens_to_xml(&self.tokens)
    }

    /// One-line status in the analyzer's classic format, or `None` on
    /// success.
    pub fn summary(&self) -> Option<String> {
        let first = self.diagnostics.first()?;
        Some(format!(
            "Compilation failed! Error count = {}; line: {}; char: {}; Error Message: {}",
            self.diagnostics.len(),
            first.line,
            first.column,
            first.message
        ))
    }
}

pub fn compile(src: &str) -> CompilationResult {
    compile_with(src, &ParseOptions::default())
}

pub fn compile_with(src: &str, options: &ParseOptions) -> CompilationResult {
    let tokens = lexer::lex(src);
    let (tree, diagnostics) = parser::parse(&tokens, options);
    let diagnostics = diagnostics.into_vec();
    if !diagnostics.is_empty() {
        tracing::debug!(count = diagnostics.len(), "compilation unit has diagnostics");
    }
    CompilationResult {
        tree,
        diagnostics,
        tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_unit_has_no_summary() {
        let result = compile("class Main { function void main() { return; } }");
        assert!(!result.has_errors());
        assert_eq!(result.tokens.len(), 13);
        assert!(result.summary().is_none());
    }

    #[test]
    fn summary_reports_first_diagnostic() {
        let result = compile("class Main {\n  function void main() {\n    return\n  }\n}");
        let summary = result.summary().expect("summary");
        assert!(summary.starts_with("Compilation failed! Error count = 1; line: 4; char: 3;"));
        assert!(summary.contains("expected ';'"));
    }

    #[test]
    fn lexical_errors_do_not_abort() {
        let result = compile("class A { function void f() { let s = \"open; return; } }");
        assert!(result.has_errors());
        assert_eq!(result.tree.tag(), "class");
        assert!(result.tokens.iter().any(|t| t.error.is_some()));
    }
}
