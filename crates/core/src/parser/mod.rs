/// Compilation engine: recursive descent over the token stream, one routine
/// per grammar rule, building the parse tree and recording diagnostics.
///
/// Every routine expects `current` to hold the first token of its construct
/// and leaves it on the first token after the construct.
use crate::diagnostics::Diagnostics;
use crate::error::{Diagnostic, ErrorKind};
use crate::lexer::{Keyword, Spanned, Token};
use crate::stream::TokenStream;
use crate::tree::{Node, Rule};

mod expressions;
mod statements;
mod structure;

pub use expressions::IdentifierForm;

/// Default maximum number of diagnostics collected before parsing halts.
pub const DEFAULT_MAX_ERRORS: usize = 10;

/// Deepest chain of open grammar rules the parser will follow. Going past
/// it records one diagnostic and halts the parse, keeping the recursion
/// within a small stack.
pub const MAX_NESTING: usize = 256;

/// Once parsing halts (error cap reached, or input nested deeper than
/// [`MAX_NESTING`]) no further diagnostics are recorded and the tree is
/// returned as far as it got. Constructs still open at that point are left
/// out; the class keeps its closing `}` only if that is the sole token left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Stop once this many diagnostics are recorded. `0` disables the cap.
    pub max_errors: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }
}

/// The construct being built was given up on. Its diagnostic has already
/// been recorded; the nearest enclosing list resynchronizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Abandon;

pub(crate) type PResult<T> = Result<T, Abandon>;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

pub(crate) struct Parser<'a> {
    stream: TokenStream<'a>,
    diagnostics: Diagnostics,
    trace: Vec<Rule>,
    max_errors: usize,
    too_deep: bool,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned], options: &ParseOptions) -> Self {
        Parser {
            stream: TokenStream::new(tokens),
            diagnostics: Diagnostics::new(),
            trace: Vec::new(),
            max_errors: options.max_errors,
            too_deep: false,
        }
    }

    fn cur(&self) -> Option<&'a Token> {
        self.stream.current_token()
    }

    /// Move to the next token. A lexical error carried by the token we land
    /// on is recorded before anything else can claim that position.
    fn advance(&mut self) {
        self.stream.advance();
        if let Some(err) = self.stream.current().and_then(|s| s.error.as_ref()) {
            let mut diagnostic = err.clone();
            diagnostic.trace = self.trace_names();
            self.report(diagnostic);
        }
    }

    fn is_keyword(&self, k: Keyword) -> bool {
        self.cur().is_some_and(|t| t.is_keyword(k))
    }

    fn is_symbol(&self, c: char) -> bool {
        self.cur().is_some_and(|t| t.is_symbol(c))
    }

    fn halted(&self) -> bool {
        self.too_deep || (self.max_errors > 0 && self.diagnostics.len() >= self.max_errors)
    }

    fn trace_names(&self) -> Vec<String> {
        self.trace.iter().map(|r| r.as_str().to_owned()).collect()
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        if self.halted() {
            return;
        }
        let position = self.stream.position();
        self.diagnostics.record(position, diagnostic);
    }

    /// Record "expected `what`" at the current token and give up on the
    /// construct.
    fn expected(&mut self, kind: ErrorKind, what: &str) -> Abandon {
        let found = match self.cur() {
            Some(t) => t.to_string(),
            None => "end of input".to_owned(),
        };
        let (line, column) = self.stream.anchor();
        let message = format!("expected {}, found {}", what, found);
        let diagnostic = Diagnostic::new(kind, line, column, message, self.trace_names());
        self.report(diagnostic);
        Abandon
    }

    // -- Token matching ------------------------------------------

    /// Consume the current token as a leaf if it satisfies `pred`.
    fn accept(&mut self, pred: impl Fn(&Token) -> bool) -> Option<Node> {
        let token = self.cur().filter(|t| pred(t))?;
        let leaf = Node::leaf(token);
        self.advance();
        Some(leaf)
    }

    fn expect(&mut self, pred: impl Fn(&Token) -> bool, what: &str) -> PResult<Node> {
        match self.accept(pred) {
            Some(leaf) => Ok(leaf),
            None => Err(self.expected(ErrorKind::Syntax, what)),
        }
    }

    fn accept_symbol(&mut self, c: char) -> Option<Node> {
        self.accept(|t| t.is_symbol(c))
    }

    fn expect_symbol(&mut self, c: char) -> PResult<Node> {
        self.expect(|t| t.is_symbol(c), &format!("'{}'", c))
    }

    fn expect_keyword(&mut self, k: Keyword) -> PResult<Node> {
        self.expect(|t| t.is_keyword(k), &format!("'{}'", k))
    }

    fn expect_identifier(&mut self, what: &str) -> PResult<Node> {
        self.expect(|t| matches!(t, Token::Identifier(_)), what)
    }

    /// Consume a closing `}`. When the construct has clearly ended without
    /// one (end of input, or the next class member begins) the brace is
    /// reported missing and treated as present so the enclosing construct
    /// survives; anything else abandons the construct.
    fn expect_closing_brace(&mut self) -> PResult<Option<Node>> {
        if let Some(leaf) = self.accept_symbol('}') {
            return Ok(Some(leaf));
        }
        let ended = match self.cur() {
            None => true,
            Some(Token::Keyword(k)) => is_member_keyword(*k),
            _ => false,
        };
        let abandon = self.expected(ErrorKind::Syntax, "'}'");
        if ended {
            Ok(None)
        } else {
            Err(abandon)
        }
    }

    // -- Production bookkeeping ----------------------------------

    /// Run `build` as rule `rule`, wrapping what it produces in a node.
    fn production(
        &mut self,
        rule: Rule,
        build: impl FnOnce(&mut Self, &mut Vec<Node>) -> PResult<()>,
    ) -> PResult<Node> {
        debug_assert!(rule.has_node(), "{} is inlined into its parent", rule);
        let mut children = Vec::new();
        self.inline(rule, &mut children, build)?;
        Ok(Node::branch(rule, children))
    }

    /// Run `build` as rule `rule`, appending to the parent's children.
    fn inline(
        &mut self,
        rule: Rule,
        children: &mut Vec<Node>,
        build: impl FnOnce(&mut Self, &mut Vec<Node>) -> PResult<()>,
    ) -> PResult<()> {
        if self.trace.len() >= MAX_NESTING {
            return Err(self.nested_too_deeply(rule));
        }
        self.trace.push(rule);
        let outcome = build(self, children);
        self.trace.pop();
        outcome
    }

    /// Record the nesting failure once and halt.
    fn nested_too_deeply(&mut self, rule: Rule) -> Abandon {
        if !self.too_deep {
            let (line, column) = self.stream.anchor();
            let message = format!("{} nested too deeply (limit {})", rule, MAX_NESTING);
            let diagnostic =
                Diagnostic::new(ErrorKind::Syntax, line, column, message, self.trace_names());
            self.report(diagnostic);
            self.too_deep = true;
            tracing::debug!(depth = self.trace.len(), "nesting limit reached");
        }
        Abandon
    }

    // -- Recovery ------------------------------------------------

    /// After a failed construct that began at `start`: make sure at least
    /// one token was consumed, then skip with `sync`.
    fn recover(&mut self, start: usize, sync: fn(&mut Self)) {
        if self.stream.position() == start && !self.stream.at_end() {
            self.advance();
        }
        sync(self);
    }

    /// Skip to the next statement or local declaration. Stops before a
    /// statement or declaration keyword or a closing `}` at the starting
    /// nesting level; consumes a `;` at that level.
    fn synchronize_statement(&mut self) {
        let mut depth = 0usize;
        let mut skipped = 0usize;
        while let Some(token) = self.cur() {
            match token {
                Token::Symbol('{') => depth += 1,
                Token::Symbol('}') if depth == 0 => break,
                Token::Symbol('}') => depth -= 1,
                Token::Symbol(';') if depth == 0 => {
                    self.advance();
                    skipped += 1;
                    break;
                }
                Token::Keyword(k) if depth == 0 && is_sync_keyword(*k) => break,
                _ => {}
            }
            self.advance();
            skipped += 1;
        }
        tracing::trace!(skipped, "resynchronized at statement boundary");
    }

    /// Skip to the next class member. Stops before a member keyword or the
    /// class's closing `}`; a brace-balanced body encountered on the way is
    /// consumed whole.
    fn synchronize_member(&mut self) {
        let mut depth = 0usize;
        let mut skipped = 0usize;
        while let Some(token) = self.cur() {
            match token {
                Token::Symbol('{') => depth += 1,
                Token::Symbol('}') if depth == 0 => break,
                Token::Symbol('}') => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        skipped += 1;
                        break;
                    }
                }
                Token::Keyword(k) if depth == 0 && is_member_keyword(*k) => break,
                _ => {}
            }
            self.advance();
            skipped += 1;
        }
        tracing::trace!(skipped, "resynchronized at class member boundary");
    }
}

pub(crate) fn is_statement_keyword(k: Keyword) -> bool {
    matches!(
        k,
        Keyword::Let | Keyword::If | Keyword::While | Keyword::Do | Keyword::Return
    )
}

pub(crate) fn is_member_keyword(k: Keyword) -> bool {
    matches!(
        k,
        Keyword::Static | Keyword::Field | Keyword::Constructor | Keyword::Function | Keyword::Method
    )
}

fn is_sync_keyword(k: Keyword) -> bool {
    is_statement_keyword(k) || is_member_keyword(k) || k == Keyword::Var
}

/// Parse a whole compilation unit. Always yields a `class` node; it is
/// truncated if the class header is broken.
pub fn parse(tokens: &[Spanned], options: &ParseOptions) -> (Node, Diagnostics) {
    let mut p = Parser::new(tokens, options);
    // Load the first token; nothing is current before this.
    p.advance();
    let tree = p.compile_class();
    tracing::debug!(
        diagnostics = p.diagnostics.len(),
        consumed = p.stream.position(),
        "parsed compilation unit"
    );
    (tree, p.diagnostics)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
