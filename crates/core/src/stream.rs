//! Cursor over a materialized token sequence.
//!
//! `current` is empty until the first [`TokenStream::advance`]. The cursor only
//! ever moves forward and stops one slot past the last token, which is the
//! end-of-input position.

use crate::lexer::{Spanned, Token};

pub struct TokenStream<'a> {
    tokens: &'a [Spanned],
    /// `None` before the first advance.
    index: Option<usize>,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [Spanned]) -> Self {
        TokenStream {
            tokens,
            index: None,
        }
    }

    /// True while an advance would land on a real token.
    pub fn has_more_tokens(&self) -> bool {
        self.next_index() < self.tokens.len()
    }

    pub fn advance(&mut self) {
        self.index = Some(self.next_index().min(self.tokens.len()));
    }

    pub fn current(&self) -> Option<&'a Spanned> {
        self.index.and_then(|i| self.tokens.get(i))
    }

    pub fn peek(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.next_index())
    }

    pub fn current_token(&self) -> Option<&'a Token> {
        self.current().map(|s| &s.token)
    }

    pub fn peek_token(&self) -> Option<&'a Token> {
        self.peek().map(|s| &s.token)
    }

    /// Index of the current token; `len()` once past the end.
    pub fn position(&self) -> usize {
        self.index.unwrap_or(0)
    }

    pub fn at_end(&self) -> bool {
        self.index.is_some() && self.current().is_none()
    }

    /// Line and column for a diagnostic anchored at the current token, or
    /// just past the last token at end of input.
    pub fn anchor(&self) -> (u32, u32) {
        match self.current() {
            Some(s) => (s.line, s.column),
            None => match self.tokens.last() {
                Some(last) => (last.line, last.end_column()),
                None => (1, 1),
            },
        }
    }

    fn next_index(&self) -> usize {
        self.index.map_or(0, |i| i + 1)
    }
}
