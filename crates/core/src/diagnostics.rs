//! Per-run collection of diagnostics.
//!
//! Records are keyed by the index of the token they are anchored at. The
//! first record for a token wins; later attempts on the same token are
//! dropped, so the most specific message (usually the innermost production,
//! or the tokenizer's own complaint) is what the caller sees.

use crate::error::Diagnostic;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
    anchored: HashSet<usize>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `diagnostic` against token `position`. Returns false if that
    /// token already has a diagnostic.
    pub fn record(&mut self, position: usize, diagnostic: Diagnostic) -> bool {
        if !self.anchored.insert(position) {
            tracing::trace!(position, message = %diagnostic.message, "diagnostic suppressed");
            return false;
        }
        self.records.push(diagnostic);
        true
    }

    pub fn has_errors(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Diagnostics in the order recorded. Can be called any number of times.
    pub fn all(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.records.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.records
    }
}
