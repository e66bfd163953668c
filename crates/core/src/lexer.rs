//! Tokenizer: source text to a fully materialized token sequence.
//!
//! Scanning is line oriented. Block-comment state is the only thing carried
//! from one line to the next; string literals may not span lines. Problems
//! never abort the scan, they become error-bearing tokens that the parser
//! reports at their exact position.

use crate::error::Diagnostic;
use serde::Serialize;
use std::fmt;

/// Largest value an integer constant may hold.
pub const MAX_INT_CONST: u16 = 32767;

/// Characters that are tokens on their own and end any word in progress.
pub const SYMBOLS: &[char] = &[
    '(', ')', '{', '}', '[', ']', '.', ',', ';', '+', '-', '*', '/', '&', '|', '<', '>', '=', '~',
];

pub fn is_symbol(c: char) -> bool {
    SYMBOLS.contains(&c)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

impl Keyword {
    pub const ALL: [Keyword; 21] = [
        Keyword::Class,
        Keyword::Constructor,
        Keyword::Function,
        Keyword::Method,
        Keyword::Field,
        Keyword::Static,
        Keyword::Var,
        Keyword::Int,
        Keyword::Char,
        Keyword::Boolean,
        Keyword::Void,
        Keyword::True,
        Keyword::False,
        Keyword::Null,
        Keyword::This,
        Keyword::Let,
        Keyword::Do,
        Keyword::If,
        Keyword::Else,
        Keyword::While,
        Keyword::Return,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Class => "class",
            Keyword::Constructor => "constructor",
            Keyword::Function => "function",
            Keyword::Method => "method",
            Keyword::Field => "field",
            Keyword::Static => "static",
            Keyword::Var => "var",
            Keyword::Int => "int",
            Keyword::Char => "char",
            Keyword::Boolean => "boolean",
            Keyword::Void => "void",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::This => "this",
            Keyword::Let => "let",
            Keyword::Do => "do",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Return => "return",
        }
    }

    pub fn from_word(word: &str) -> Option<Keyword> {
        Keyword::ALL.iter().copied().find(|k| k.as_str() == word)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified lexical unit. Each kind carries its own payload type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum Token {
    #[serde(rename = "keyword")]
    Keyword(Keyword),
    #[serde(rename = "symbol")]
    Symbol(char),
    #[serde(rename = "identifier")]
    Identifier(String),
    /// Always within 0..=32767.
    #[serde(rename = "integerConstant")]
    IntConst(u16),
    /// Content without the surrounding quotes.
    #[serde(rename = "stringConstant")]
    StrConst(String),
    /// Synthetic token standing in for text that could not be classified.
    /// The owning [`Spanned`] always carries the lexical diagnostic.
    #[serde(rename = "error")]
    Error(String),
}

impl Token {
    /// External category name used by the serializers.
    pub fn category(&self) -> &'static str {
        match self {
            Token::Keyword(_) => "keyword",
            Token::Symbol(_) => "symbol",
            Token::Identifier(_) => "identifier",
            Token::IntConst(_) => "integerConstant",
            Token::StrConst(_) => "stringConstant",
            Token::Error(_) => "error",
        }
    }

    /// The literal value as it appears in the parse tree.
    pub fn value(&self) -> String {
        match self {
            Token::Keyword(k) => k.as_str().to_owned(),
            Token::Symbol(c) => c.to_string(),
            Token::Identifier(s) | Token::StrConst(s) | Token::Error(s) => s.clone(),
            Token::IntConst(n) => n.to_string(),
        }
    }

    pub fn is_keyword(&self, k: Keyword) -> bool {
        matches!(self, Token::Keyword(x) if *x == k)
    }

    pub fn is_symbol(&self, c: char) -> bool {
        matches!(self, Token::Symbol(x) if *x == c)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::StrConst(s) => write!(f, "\"{}\"", s),
            Token::Identifier(s) => write!(f, "identifier '{}'", s),
            Token::Error(s) => write!(f, "'{}'", s),
            other => write!(f, "'{}'", other.value()),
        }
    }
}

/// A token with its source position. Immutable once the tokenizer is done.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spanned {
    #[serde(flatten)]
    pub token: Token,
    /// Source text as written; string literals keep their quotes.
    pub lexeme: String,
    /// 1-based line of the first character.
    pub line: u32,
    /// 1-based column of the first character.
    pub column: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Diagnostic>,
}

impl Spanned {
    /// Column just past the last character, for highlight spans.
    pub fn end_column(&self) -> u32 {
        self.column + self.lexeme.chars().count() as u32
    }
}

pub fn lex(src: &str) -> Vec<Spanned> {
    let mut lexer = Lexer::default();
    for (idx, line) in src.lines().enumerate() {
        lexer.scan_line(line, idx as u32 + 1);
    }
    lexer.finish()
}

#[derive(Default)]
struct Lexer {
    tokens: Vec<Spanned>,
    /// Position of the `/*` that opened the block comment we are inside.
    block_comment: Option<(u32, u32)>,
    word: String,
    word_start: u32,
}

impl Lexer {
    fn scan_line(&mut self, line_text: &str, line: u32) {
        let chars: Vec<char> = line_text.chars().collect();
        let mut pos = 0usize;

        while pos < chars.len() {
            let c = chars[pos];
            let next = chars.get(pos + 1).copied();
            let column = pos as u32 + 1;

            if self.block_comment.is_some() {
                if c == '*' && next == Some('/') {
                    self.block_comment = None;
                    pos += 2;
                } else {
                    pos += 1;
                }
                continue;
            }

            match c {
                '/' if next == Some('/') => {
                    self.flush_word(line);
                    break;
                }
                '/' if next == Some('*') => {
                    self.flush_word(line);
                    self.block_comment = Some((line, column));
                    pos += 2;
                }
                '"' => {
                    self.flush_word(line);
                    pos = self.scan_string(&chars, pos, line);
                }
                c if c.is_whitespace() => {
                    self.flush_word(line);
                    pos += 1;
                }
                c if is_symbol(c) => {
                    self.flush_word(line);
                    self.push(Token::Symbol(c), c.to_string(), line, column);
                    pos += 1;
                }
                c => {
                    if self.word.is_empty() {
                        self.word_start = column;
                    }
                    self.word.push(c);
                    pos += 1;
                }
            }
        }

        self.flush_word(line);
    }

    /// Scan a string literal whose opening quote is at `start`. Returns the
    /// index just past the closing quote, or the line length if unterminated.
    fn scan_string(&mut self, chars: &[char], start: usize, line: u32) -> usize {
        let column = start as u32 + 1;
        let mut pos = start + 1;
        let mut content = String::new();
        while pos < chars.len() {
            if chars[pos] == '"' {
                let lexeme = format!("\"{}\"", content);
                self.push(Token::StrConst(content), lexeme, line, column);
                return pos + 1;
            }
            content.push(chars[pos]);
            pos += 1;
        }
        let lexeme = format!("\"{}", content);
        self.push_error(lexeme, line, column, "unterminated string literal");
        pos
    }

    fn flush_word(&mut self, line: u32) {
        if self.word.is_empty() {
            return;
        }
        let word = std::mem::take(&mut self.word);
        let column = self.word_start;

        if let Some(k) = Keyword::from_word(&word) {
            self.push(Token::Keyword(k), word, line, column);
        } else if word.chars().all(|c| c.is_ascii_digit()) {
            match word.parse::<u32>() {
                Ok(n) if n <= u32::from(MAX_INT_CONST) => {
                    self.push(Token::IntConst(n as u16), word, line, column);
                }
                _ => {
                    let message = format!(
                        "integer constant {} out of range (0..={})",
                        word, MAX_INT_CONST
                    );
                    self.push_error(word, line, column, message);
                }
            }
        } else if is_identifier(&word) {
            self.push(Token::Identifier(word.clone()), word, line, column);
        } else {
            let message = format!("unrecognized token '{}'", word);
            self.push_error(word, line, column, message);
        }
    }

    fn push(&mut self, token: Token, lexeme: String, line: u32, column: u32) {
        self.tokens.push(Spanned {
            token,
            lexeme,
            line,
            column,
            error: None,
        });
    }

    fn push_error(&mut self, lexeme: String, line: u32, column: u32, message: impl Into<String>) {
        self.tokens.push(Spanned {
            token: Token::Error(lexeme.clone()),
            lexeme,
            line,
            column,
            error: Some(Diagnostic::lexical(line, column, message)),
        });
    }

    fn finish(mut self) -> Vec<Spanned> {
        if let Some((line, column)) = self.block_comment.take() {
            self.push_error("/*".to_owned(), line, column, "unterminated block comment");
        }
        tracing::debug!(tokens = self.tokens.len(), "tokenized source");
        self.tokens
    }
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        lex(src).into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn line_comment_yields_no_tokens() {
        assert!(lex("// let x = 1;").is_empty());
        assert_eq!(
            kinds("x // y z\nw"),
            vec![Token::Identifier("x".into()), Token::Identifier("w".into())]
        );
    }

    #[test]
    fn block_comment_spanning_lines_yields_no_tokens() {
        let src = "/** api doc\n * let x = 1;\n */";
        assert!(lex(src).is_empty());
        assert_eq!(
            kinds("a /* b */ c"),
            vec![Token::Identifier("a".into()), Token::Identifier("c".into())]
        );
    }

    #[test]
    fn slash_alone_is_division() {
        assert_eq!(
            kinds("a/b"),
            vec![
                Token::Identifier("a".into()),
                Token::Symbol('/'),
                Token::Identifier("b".into()),
            ]
        );
    }

    #[test]
    fn string_literal_keeps_symbols_and_spaces() {
        let toks = lex("do Output.printString(\"a.b(c) // d\");");
        let strings: Vec<_> = toks
            .iter()
            .filter_map(|t| match &t.token {
                Token::StrConst(s) => Some(s.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(strings, vec!["a.b(c) // d".to_owned()]);
        assert_eq!(toks.len(), 8);
    }

    #[test]
    fn unterminated_string_is_lexical_error() {
        let toks = lex("let s = \"abc;\nlet t = 1;");
        let bad = toks
            .iter()
            .find(|t| matches!(t.token, Token::Error(_)))
            .expect("error token");
        assert_eq!((bad.line, bad.column), (1, 9));
        assert!(bad
            .error
            .as_ref()
            .unwrap()
            .message
            .contains("unterminated string"));
        // Scanning continues on the next line.
        assert!(toks.iter().any(|t| t.line == 2 && t.token.is_keyword(Keyword::Let)));
    }

    #[test]
    fn integer_range_is_enforced() {
        assert_eq!(kinds("32767"), vec![Token::IntConst(32767)]);
        let toks = lex("32768");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].token, Token::Error("32768".into()));
        assert!(toks[0].error.as_ref().unwrap().message.contains("out of range"));

        let huge = lex("99999999999999999999");
        assert!(huge[0].error.is_some());
    }

    #[test]
    fn keywords_and_identifiers_are_classified() {
        for k in Keyword::ALL {
            assert_eq!(kinds(k.as_str()), vec![Token::Keyword(k)]);
        }
        assert_eq!(kinds("_tmp1"), vec![Token::Identifier("_tmp1".into())]);
        assert_eq!(kinds("classy"), vec![Token::Identifier("classy".into())]);
    }

    #[test]
    fn invalid_word_becomes_error_token() {
        let toks = lex("let 1abc = #;");
        let errors: Vec<_> = toks.iter().filter(|t| t.error.is_some()).collect();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].lexeme, "1abc");
        assert_eq!(errors[1].lexeme, "#");
        assert_eq!(errors[1].column, 12);
    }

    #[test]
    fn unterminated_block_comment_anchors_at_opener() {
        let toks = lex("class A {\n  /* never closed\n}");
        let last = toks.last().unwrap();
        assert_eq!(last.token, Token::Error("/*".into()));
        assert_eq!((last.line, last.column), (2, 3));
    }

    #[test]
    fn positions_are_one_based() {
        let toks = lex("class Main {\r\n  field int x;\r\n}");
        let positions: Vec<_> = toks.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(
            positions,
            vec![(1, 1), (1, 7), (1, 12), (2, 3), (2, 9), (2, 13), (2, 14), (3, 1)]
        );
        assert!(toks.iter().all(|t| !t.lexeme.contains('\r')));
    }

    #[test]
    fn end_to_end_token_count() {
        let toks = lex("class Main { function void main() { return; } }");
        let lexemes: Vec<_> = toks.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(
            lexemes,
            vec![
                "class", "Main", "{", "function", "void", "main", "(", ")", "{", "return", ";",
                "}", "}"
            ]
        );
    }
}
