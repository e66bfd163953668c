use super::{Abandon, PResult, Parser};
use crate::error::ErrorKind;
use crate::lexer::{Keyword, Token};
use crate::tree::{Node, Rule};

fn is_type(t: &Token) -> bool {
    matches!(
        t,
        Token::Keyword(Keyword::Int | Keyword::Char | Keyword::Boolean) | Token::Identifier(_)
    )
}

impl<'a> Parser<'a> {
    // -- Class ----------------------------------------------------

    /// `'class' className '{' classVarDec* subroutineDec* '}'`
    ///
    /// Never fails: a broken header is recorded and the partial node is
    /// returned as-is.
    pub(super) fn compile_class(&mut self) -> Node {
        let mut children = Vec::new();
        // Whatever stopped the class has already been recorded.
        let _ = self.inline(Rule::Class, &mut children, |p, ch| p.class_body(ch));
        Node::branch(Rule::Class, children)
    }

    fn class_body(&mut self, ch: &mut Vec<Node>) -> PResult<()> {
        ch.push(self.expect_header(|t| t.is_keyword(Keyword::Class), "'class'")?);
        ch.push(self.expect_header(|t| matches!(t, Token::Identifier(_)), "className")?);
        ch.push(self.expect_header(|t| t.is_symbol('{'), "'{'")?);

        self.class_members(ch);
        let only_close_left = self.is_symbol('}') && !self.stream.has_more_tokens();
        if self.halted() && !only_close_left {
            return Err(Abandon);
        }

        if let Some(close) = self.expect_closing_brace()? {
            ch.push(close);
            if !self.stream.at_end() {
                self.expected(ErrorKind::Syntax, "end of input");
            }
        }
        Ok(())
    }

    /// Header mismatches leave nothing to recover into.
    fn expect_header(&mut self, pred: impl Fn(&Token) -> bool, what: &str) -> PResult<Node> {
        match self.accept(pred) {
            Some(leaf) => Ok(leaf),
            None => Err(self.expected(ErrorKind::Structural, what)),
        }
    }

    fn class_members(&mut self, ch: &mut Vec<Node>) {
        let mut in_subroutines = false;
        while !self.halted() {
            let start = self.stream.position();
            let outcome = match self.cur() {
                None | Some(Token::Symbol('}')) => break,
                Some(Token::Keyword(Keyword::Static | Keyword::Field)) if !in_subroutines => {
                    self.compile_class_var_dec()
                }
                Some(Token::Keyword(Keyword::Constructor | Keyword::Function | Keyword::Method)) => {
                    in_subroutines = true;
                    self.compile_subroutine_dec()
                }
                _ => {
                    let what = if in_subroutines {
                        "subroutineDec"
                    } else {
                        "classVarDec or subroutineDec"
                    };
                    Err(self.expected(ErrorKind::Syntax, what))
                }
            };
            match outcome {
                Ok(node) => ch.push(node),
                Err(Abandon) => self.recover(start, Self::synchronize_member),
            }
        }
    }

    /// `('static'|'field') type varName (',' varName)* ';'`
    fn compile_class_var_dec(&mut self) -> PResult<Node> {
        self.production(Rule::ClassVarDec, |p, ch| {
            ch.push(p.expect(
                |t| t.is_keyword(Keyword::Static) || t.is_keyword(Keyword::Field),
                "'static' or 'field'",
            )?);
            p.compile_type(ch)?;
            p.var_name_list(ch)
        })
    }

    /// `'int'|'char'|'boolean'|className`, inlined into the parent.
    fn compile_type(&mut self, ch: &mut Vec<Node>) -> PResult<()> {
        self.inline(Rule::Type, ch, |p, ch| {
            ch.push(p.expect(is_type, "type")?);
            Ok(())
        })
    }

    /// `varName (',' varName)* ';'`, shared by class and local declarations.
    fn var_name_list(&mut self, ch: &mut Vec<Node>) -> PResult<()> {
        ch.push(self.expect_identifier("varName")?);
        while let Some(comma) = self.accept_symbol(',') {
            ch.push(comma);
            ch.push(self.expect_identifier("varName")?);
        }
        ch.push(self.expect_symbol(';')?);
        Ok(())
    }

    // -- Subroutines ----------------------------------------------

    fn compile_subroutine_dec(&mut self) -> PResult<Node> {
        self.production(Rule::SubroutineDec, |p, ch| {
            ch.push(p.expect(
                |t| {
                    matches!(
                        t,
                        Token::Keyword(Keyword::Constructor | Keyword::Function | Keyword::Method)
                    )
                },
                "'constructor', 'function' or 'method'",
            )?);
            match p.accept(|t| t.is_keyword(Keyword::Void)) {
                Some(void) => ch.push(void),
                None => p.compile_type(ch)?,
            }
            ch.push(p.expect_identifier("subroutineName")?);
            ch.push(p.expect_symbol('(')?);
            ch.push(p.compile_parameter_list()?);
            ch.push(p.expect_symbol(')')?);
            ch.push(p.compile_subroutine_body()?);
            Ok(())
        })
    }

    /// `(type varName (',' type varName)*)?`, without the parentheses.
    fn compile_parameter_list(&mut self) -> PResult<Node> {
        self.production(Rule::ParameterList, |p, ch| {
            if p.is_symbol(')') {
                return Ok(());
            }
            p.compile_type(ch)?;
            ch.push(p.expect_identifier("varName")?);
            while let Some(comma) = p.accept_symbol(',') {
                ch.push(comma);
                p.compile_type(ch)?;
                ch.push(p.expect_identifier("varName")?);
            }
            Ok(())
        })
    }

    fn compile_subroutine_body(&mut self) -> PResult<Node> {
        self.production(Rule::SubroutineBody, |p, ch| {
            ch.push(p.expect_symbol('{')?);
            while p.is_keyword(Keyword::Var) && !p.halted() {
                let start = p.stream.position();
                match p.compile_var_dec() {
                    Ok(node) => ch.push(node),
                    Err(Abandon) => p.recover(start, Self::synchronize_statement),
                }
            }
            ch.push(p.compile_statements()?);
            if let Some(close) = p.expect_closing_brace()? {
                ch.push(close);
            }
            Ok(())
        })
    }

    /// `'var' type varName (',' varName)* ';'`
    fn compile_var_dec(&mut self) -> PResult<Node> {
        self.production(Rule::VarDec, |p, ch| {
            ch.push(p.expect_keyword(Keyword::Var)?);
            p.compile_type(ch)?;
            p.var_name_list(ch)
        })
    }
}
