//! jack-core: syntax analyzer for the Jack language.
//!
//! Source text goes through two phases: the tokenizer materializes every
//! token up front, then the compilation engine walks them with a one-token
//! lookahead and builds a parse tree, recording diagnostics as it goes.
//!
//! # Public API
//!
//! - [`compile()`] / [`compile_with()`] -- run both phases on one unit
//! - [`CompilationResult`] -- tree, diagnostics and tokens for one unit
//! - [`lex()`] and [`parse()`] -- the individual phases
//! - [`to_xml()`] / [`tokens_to_xml()`] -- tag-document rendering
//! - [`Diagnostic`], [`ErrorKind`] -- what went wrong and where

pub mod compile;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod serialize;
pub mod stream;
pub mod tree;

// ── Convenience re-exports: key types ────────────────────────────────

pub use compile::CompilationResult;
pub use diagnostics::Diagnostics;
pub use error::{Diagnostic, ErrorKind};
pub use lexer::{Keyword, Spanned, Token};
pub use parser::{ParseOptions, DEFAULT_MAX_ERRORS, MAX_NESTING};
pub use stream::TokenStream;
pub use tree::{Node, Rule};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use compile::{compile, compile_with};
pub use lexer::lex;
pub use parser::parse;
pub use serialize::{to_xml, tokens_to_xml};
