use super::{PResult, Parser};
use crate::error::ErrorKind;
use crate::lexer::{Keyword, Token};
use crate::tree::{Node, Rule};

/// What an identifier at the start of a term turns out to be, decided by
/// the one token after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierForm {
    /// `varName '[' expression ']'`
    ArrayAccess,
    /// `subroutineName '(' ...` or `(className|varName) '.' ...`
    Call,
    /// Plain `varName`.
    Variable,
}

impl IdentifierForm {
    pub fn from_lookahead(next: Option<&Token>) -> Self {
        match next {
            Some(Token::Symbol('[')) => IdentifierForm::ArrayAccess,
            Some(Token::Symbol('(' | '.')) => IdentifierForm::Call,
            _ => IdentifierForm::Variable,
        }
    }
}

fn is_op(t: &Token) -> bool {
    matches!(
        t,
        Token::Symbol('+' | '-' | '*' | '/' | '&' | '|' | '<' | '>' | '=')
    )
}

fn is_unary_op(t: &Token) -> bool {
    matches!(t, Token::Symbol('-' | '~'))
}

fn is_constant(t: &Token) -> bool {
    matches!(
        t,
        Token::IntConst(_)
            | Token::StrConst(_)
            | Token::Keyword(Keyword::True | Keyword::False | Keyword::Null | Keyword::This)
    )
}

/// Tokens that can open a term.
pub(super) fn starts_term(t: &Token) -> bool {
    is_constant(t)
        || is_unary_op(t)
        || t.is_symbol('(')
        || matches!(t, Token::Identifier(_))
}

impl<'a> Parser<'a> {
    /// Classify the identifier at `current` without consuming anything.
    pub(super) fn identifier_form(&self) -> IdentifierForm {
        IdentifierForm::from_lookahead(self.stream.peek_token())
    }

    /// `term (op term)*`
    pub(super) fn compile_expression(&mut self) -> PResult<Node> {
        self.production(Rule::Expression, |p, ch| {
            ch.push(p.compile_term()?);
            while let Some(op) = p.accept(is_op) {
                ch.push(op);
                ch.push(p.compile_term()?);
            }
            Ok(())
        })
    }

    pub(super) fn compile_term(&mut self) -> PResult<Node> {
        self.production(Rule::Term, |p, ch| {
            if let Some(constant) = p.accept(is_constant) {
                ch.push(constant);
                return Ok(());
            }
            if let Some(open) = p.accept_symbol('(') {
                ch.push(open);
                ch.push(p.compile_expression()?);
                ch.push(p.expect_symbol(')')?);
                return Ok(());
            }
            if let Some(op) = p.accept(is_unary_op) {
                ch.push(op);
                ch.push(p.compile_term()?);
                return Ok(());
            }
            if !matches!(p.cur(), Some(Token::Identifier(_))) {
                return Err(p.expected(ErrorKind::Syntax, "term"));
            }
            match p.identifier_form() {
                IdentifierForm::Call => p.compile_subroutine_call(ch),
                IdentifierForm::ArrayAccess => {
                    ch.push(p.expect_identifier("varName")?);
                    ch.push(p.expect_symbol('[')?);
                    ch.push(p.compile_expression()?);
                    ch.push(p.expect_symbol(']')?);
                    Ok(())
                }
                IdentifierForm::Variable => {
                    ch.push(p.expect_identifier("varName")?);
                    Ok(())
                }
            }
        })
    }

    /// `subroutineName '(' expressionList ')'` or
    /// `(className|varName) '.' subroutineName '(' expressionList ')'`,
    /// appended to the enclosing node.
    pub(super) fn compile_subroutine_call(&mut self, ch: &mut Vec<Node>) -> PResult<()> {
        self.inline(Rule::SubroutineCall, ch, |p, ch| {
            ch.push(p.expect_identifier("subroutineName")?);
            if let Some(dot) = p.accept_symbol('.') {
                ch.push(dot);
                ch.push(p.expect_identifier("subroutineName")?);
            }
            ch.push(p.expect_symbol('(')?);
            ch.push(p.compile_expression_list()?);
            ch.push(p.expect_symbol(')')?);
            Ok(())
        })
    }

    /// `(expression (',' expression)*)?`, without the parentheses.
    fn compile_expression_list(&mut self) -> PResult<Node> {
        self.production(Rule::ExpressionList, |p, ch| {
            if p.is_symbol(')') {
                return Ok(());
            }
            ch.push(p.compile_expression()?);
            while let Some(comma) = p.accept_symbol(',') {
                ch.push(comma);
                ch.push(p.compile_expression()?);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;
    use crate::parser::{parse, ParseOptions};

    fn expr_tree(expr: &str) -> Node {
        let src = format!("class T {{ function void f() {{ let x = {}; return; }} }}", expr);
        let tokens = lexer::lex(&src);
        let (tree, diags) = parse(&tokens, &ParseOptions::default());
        assert!(!diags.has_errors(), "{:?}", diags.into_vec());
        let stmt = tree.find_all(Rule::LetStatement)[0].clone();
        stmt.children()[3].clone()
    }

    fn first_term_tags(expr: &Node) -> Vec<&'static str> {
        expr.children()[0]
            .children()
            .iter()
            .map(|c| c.tag())
            .collect()
    }

    #[test]
    fn lookahead_decides_identifier_form() {
        let sym = |c| Token::Symbol(c);
        assert_eq!(
            IdentifierForm::from_lookahead(Some(&sym('['))),
            IdentifierForm::ArrayAccess
        );
        assert_eq!(IdentifierForm::from_lookahead(Some(&sym('('))), IdentifierForm::Call);
        assert_eq!(IdentifierForm::from_lookahead(Some(&sym('.'))), IdentifierForm::Call);
        assert_eq!(IdentifierForm::from_lookahead(Some(&sym(';'))), IdentifierForm::Variable);
        assert_eq!(IdentifierForm::from_lookahead(None), IdentifierForm::Variable);
    }

    #[test]
    fn plain_variable_term() {
        let e = expr_tree("y");
        assert_eq!(first_term_tags(&e), vec!["identifier"]);
    }

    #[test]
    fn array_access_term() {
        let e = expr_tree("a[i]");
        assert_eq!(
            first_term_tags(&e),
            vec!["identifier", "symbol", "expression", "symbol"]
        );
    }

    #[test]
    fn call_terms() {
        let e = expr_tree("f(1, 2)");
        assert_eq!(
            first_term_tags(&e),
            vec!["identifier", "symbol", "expressionList", "symbol"]
        );
        let e = expr_tree("Math.max(a, b)");
        assert_eq!(
            first_term_tags(&e),
            vec![
                "identifier",
                "symbol",
                "identifier",
                "symbol",
                "expressionList",
                "symbol"
            ]
        );
        let list = &e.children()[0].children()[4];
        assert_eq!(list.children().len(), 3);
    }

    #[test]
    fn operators_chain_left_to_right_without_precedence() {
        let e = expr_tree("1 + 2 * 3 < 4");
        let tags: Vec<_> = e.children().iter().map(|c| c.tag()).collect();
        assert_eq!(
            tags,
            vec!["term", "symbol", "term", "symbol", "term", "symbol", "term"]
        );
    }

    #[test]
    fn unary_and_parenthesized_terms() {
        let e = expr_tree("-(~b)");
        assert_eq!(first_term_tags(&e), vec!["symbol", "term"]);
        let inner = &e.children()[0].children()[1];
        assert_eq!(inner.leaves(), vec!["(", "~", "b", ")"]);
    }

    #[test]
    fn constants_are_terms() {
        for (src, tag) in [
            ("17", "integerConstant"),
            ("\"hi there\"", "stringConstant"),
            ("true", "keyword"),
            ("null", "keyword"),
            ("this", "keyword"),
        ] {
            assert_eq!(first_term_tags(&expr_tree(src)), vec![tag], "{}", src);
        }
    }

    #[test]
    fn empty_expression_list() {
        let e = expr_tree("g()");
        assert!(e.children()[0].children()[2].children().is_empty());
    }
}
