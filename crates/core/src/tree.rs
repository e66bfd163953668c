//! Parse tree produced by the compilation engine.
//!
//! Non-terminal nodes are tagged with the grammar rule that built them;
//! terminals carry the token category and literal value. Nodes are built
//! bottom-up and never touched again once their rule returns.

use crate::lexer::Token;
use serde::Serialize;
use std::fmt;

// ──────────────────────────────────────────────
// Grammar rules
// ──────────────────────────────────────────────

/// Every production of the grammar. Only some of them get a node of their
/// own in the tree (see [`Rule::has_node`]); all of them show up in
/// diagnostic traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    Class,
    ClassVarDec,
    Type,
    SubroutineDec,
    ParameterList,
    SubroutineBody,
    VarDec,
    Statements,
    LetStatement,
    IfStatement,
    WhileStatement,
    DoStatement,
    ReturnStatement,
    Expression,
    Term,
    SubroutineCall,
    ExpressionList,
}

impl Rule {
    pub fn as_str(self) -> &'static str {
        match self {
            Rule::Class => "class",
            Rule::ClassVarDec => "classVarDec",
            Rule::Type => "type",
            Rule::SubroutineDec => "subroutineDec",
            Rule::ParameterList => "parameterList",
            Rule::SubroutineBody => "subroutineBody",
            Rule::VarDec => "varDec",
            Rule::Statements => "statements",
            Rule::LetStatement => "letStatement",
            Rule::IfStatement => "ifStatement",
            Rule::WhileStatement => "whileStatement",
            Rule::DoStatement => "doStatement",
            Rule::ReturnStatement => "returnStatement",
            Rule::Expression => "expression",
            Rule::Term => "term",
            Rule::SubroutineCall => "subroutineCall",
            Rule::ExpressionList => "expressionList",
        }
    }

    /// Rules that are inlined into their parent rather than wrapped.
    pub fn has_node(self) -> bool {
        !matches!(self, Rule::Type | Rule::SubroutineCall)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────────────────────────────────
// Nodes
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Branch {
        tag: Rule,
        children: Vec<Node>,
    },
    Leaf {
        /// Token category: `keyword`, `symbol`, `identifier`,
        /// `integerConstant` or `stringConstant`.
        tag: &'static str,
        value: String,
    },
}

impl Node {
    pub fn branch(tag: Rule, children: Vec<Node>) -> Self {
        Node::Branch { tag, children }
    }

    pub fn leaf(token: &Token) -> Self {
        Node::Leaf {
            tag: token.category(),
            value: token.value(),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Node::Branch { tag, .. } => tag.as_str(),
            Node::Leaf { tag, .. } => tag,
        }
    }

    pub fn rule(&self) -> Option<Rule> {
        match self {
            Node::Branch { tag, .. } => Some(*tag),
            Node::Leaf { .. } => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Branch { children, .. } => children,
            Node::Leaf { .. } => &[],
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Node::Leaf { value, .. } => Some(value),
            Node::Branch { .. } => None,
        }
    }

    /// All descendant branches tagged `rule`, in pre-order.
    pub fn find_all(&self, rule: Rule) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect(rule, &mut found);
        found
    }

    fn collect<'a>(&'a self, rule: Rule, found: &mut Vec<&'a Node>) {
        if self.rule() == Some(rule) {
            found.push(self);
        }
        for child in self.children() {
            child.collect(rule, found);
        }
    }

    /// Terminal values in source order.
    pub fn leaves(&self) -> Vec<&str> {
        match self.value() {
            Some(value) => vec![value],
            None => self.children().iter().flat_map(|c| c.leaves()).collect(),
        }
    }
}
