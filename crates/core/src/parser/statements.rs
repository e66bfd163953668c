use super::expressions::starts_term;
use super::{is_member_keyword, Abandon, PResult, Parser};
use crate::error::ErrorKind;
use crate::lexer::{Keyword, Token};
use crate::tree::{Node, Rule};

impl<'a> Parser<'a> {
    /// `statement*`. Runs until a closing `}`, end of input, or the start of
    /// the next class member; a failed statement is dropped and parsing
    /// resumes at the next statement boundary.
    pub(super) fn compile_statements(&mut self) -> PResult<Node> {
        self.production(Rule::Statements, |p, ch| {
            while !p.halted() {
                let start = p.stream.position();
                let outcome = match p.cur() {
                    None | Some(Token::Symbol('}')) => break,
                    Some(Token::Keyword(k)) if is_member_keyword(*k) => break,
                    Some(Token::Keyword(Keyword::Let)) => p.compile_let(),
                    Some(Token::Keyword(Keyword::If)) => p.compile_if(),
                    Some(Token::Keyword(Keyword::While)) => p.compile_while(),
                    Some(Token::Keyword(Keyword::Do)) => p.compile_do(),
                    Some(Token::Keyword(Keyword::Return)) => p.compile_return(),
                    Some(_) => Err(p.expected(ErrorKind::Syntax, "statement")),
                };
                match outcome {
                    Ok(node) => ch.push(node),
                    Err(Abandon) => p.recover(start, Self::synchronize_statement),
                }
            }
            Ok(())
        })
    }

    /// `'{' statements '}'`, appended to the enclosing statement.
    fn block(&mut self, ch: &mut Vec<Node>) -> PResult<()> {
        ch.push(self.expect_symbol('{')?);
        ch.push(self.compile_statements()?);
        if let Some(close) = self.expect_closing_brace()? {
            ch.push(close);
        }
        Ok(())
    }

    /// `'(' expression ')'`
    fn condition(&mut self, ch: &mut Vec<Node>) -> PResult<()> {
        ch.push(self.expect_symbol('(')?);
        ch.push(self.compile_expression()?);
        ch.push(self.expect_symbol(')')?);
        Ok(())
    }

    /// `'let' varName ('[' expression ']')? '=' expression ';'`
    fn compile_let(&mut self) -> PResult<Node> {
        self.production(Rule::LetStatement, |p, ch| {
            ch.push(p.expect_keyword(Keyword::Let)?);
            ch.push(p.expect_identifier("varName")?);
            if let Some(open) = p.accept_symbol('[') {
                ch.push(open);
                ch.push(p.compile_expression()?);
                ch.push(p.expect_symbol(']')?);
            }
            ch.push(p.expect_symbol('=')?);
            ch.push(p.compile_expression()?);
            ch.push(p.expect_symbol(';')?);
            Ok(())
        })
    }

    /// `'if' '(' expression ')' '{' statements '}' ('else' '{' statements '}')?`
    fn compile_if(&mut self) -> PResult<Node> {
        self.production(Rule::IfStatement, |p, ch| {
            ch.push(p.expect_keyword(Keyword::If)?);
            p.condition(ch)?;
            p.block(ch)?;
            if let Some(otherwise) = p.accept(|t| t.is_keyword(Keyword::Else)) {
                ch.push(otherwise);
                p.block(ch)?;
            }
            Ok(())
        })
    }

    fn compile_while(&mut self) -> PResult<Node> {
        self.production(Rule::WhileStatement, |p, ch| {
            ch.push(p.expect_keyword(Keyword::While)?);
            p.condition(ch)?;
            p.block(ch)
        })
    }

    fn compile_do(&mut self) -> PResult<Node> {
        self.production(Rule::DoStatement, |p, ch| {
            ch.push(p.expect_keyword(Keyword::Do)?);
            p.compile_subroutine_call(ch)?;
            ch.push(p.expect_symbol(';')?);
            Ok(())
        })
    }

    fn compile_return(&mut self) -> PResult<Node> {
        self.production(Rule::ReturnStatement, |p, ch| {
            ch.push(p.expect_keyword(Keyword::Return)?);
            if p.cur().is_some_and(starts_term) {
                ch.push(p.compile_expression()?);
            }
            ch.push(p.expect_symbol(';')?);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Diagnostic;
    use crate::lexer;
    use crate::parser::{parse, ParseOptions};
    use crate::tree::{Node, Rule};

    /// Wrap `body` in a class with a single function and parse it.
    fn parse_body(body: &str) -> (Node, Vec<Diagnostic>) {
        let src = format!("class T {{ function void f() {{ {} }} }}", body);
        let tokens = lexer::lex(&src);
        let (tree, diags) = parse(&tokens, &ParseOptions::default());
        (tree, diags.into_vec())
    }

    fn statement_tags(tree: &Node) -> Vec<&'static str> {
        tree.find_all(Rule::Statements)[0]
            .children()
            .iter()
            .map(|c| c.tag())
            .collect()
    }

    #[test]
    fn every_statement_kind_parses() {
        let (tree, diags) = parse_body(
            "let a[i] = 1; if (x) { do f(); } else { while (y) { let y = false; } } do Sys.halt(); return;",
        );
        assert!(diags.is_empty(), "{:?}", diags);
        assert_eq!(
            statement_tags(&tree),
            vec![
                "letStatement",
                "ifStatement",
                "doStatement",
                "returnStatement"
            ]
        );
        assert_eq!(tree.find_all(Rule::WhileStatement).len(), 1);
        assert_eq!(tree.find_all(Rule::Statements).len(), 4);
    }

    #[test]
    fn let_with_index_keeps_brackets() {
        let (tree, _) = parse_body("let a[i + 1] = b;");
        let stmt = tree.find_all(Rule::LetStatement)[0];
        let tags: Vec<_> = stmt.children().iter().map(|c| c.tag()).collect();
        assert_eq!(
            tags,
            vec![
                "keyword",
                "identifier",
                "symbol",
                "expression",
                "symbol",
                "symbol",
                "expression",
                "symbol"
            ]
        );
    }

    #[test]
    fn return_with_and_without_value() {
        let (tree, diags) = parse_body("if (a) { return 1; } return;");
        assert!(diags.is_empty(), "{:?}", diags);
        let returns = tree.find_all(Rule::ReturnStatement);
        assert_eq!(returns[0].children().len(), 3);
        assert_eq!(returns[1].children().len(), 2);
    }

    #[test]
    fn if_without_else_has_no_else_children() {
        let (tree, _) = parse_body("if (a) { } return;");
        let stmt = tree.find_all(Rule::IfStatement)[0];
        assert_eq!(stmt.leaves(), vec!["if", "(", "a", ")", "{", "}"]);
    }

    #[test]
    fn unexpected_token_in_statements_is_skipped() {
        let (tree, diags) = parse_body("x = 1; let y = 2; return;");
        assert_eq!(diags.len(), 1, "{:?}", diags);
        assert!(diags[0].message.starts_with("expected statement"));
        assert_eq!(statement_tags(&tree), vec!["letStatement", "returnStatement"]);
    }

    #[test]
    fn error_in_nested_block_recovers_inside_block() {
        let (tree, diags) = parse_body("while (i < 10) { let = 3; let i = i + 1; } return;");
        assert_eq!(diags.len(), 1, "{:?}", diags);
        assert!(diags[0].trace.contains(&"whileStatement".to_owned()));
        let inner = tree.find_all(Rule::WhileStatement)[0];
        assert_eq!(inner.find_all(Rule::LetStatement).len(), 1);
        assert_eq!(tree.find_all(Rule::ReturnStatement).len(), 1);
    }

    #[test]
    fn broken_condition_drops_whole_statement() {
        let (tree, diags) = parse_body("while (i < ) { let i = 1; } return;");
        assert_eq!(diags.len(), 1, "{:?}", diags);
        assert!(diags[0].message.starts_with("expected term"));
        assert!(tree.find_all(Rule::WhileStatement).is_empty());
        assert_eq!(statement_tags(&tree), vec!["returnStatement"]);
    }

    #[test]
    fn var_dec_after_statement_is_rejected() {
        let (tree, diags) = parse_body("let a = 1; var int b; return;");
        assert_eq!(diags.len(), 1, "{:?}", diags);
        assert!(diags[0].message.contains("found 'var'"));
        assert_eq!(statement_tags(&tree), vec!["letStatement", "returnStatement"]);
    }
}
