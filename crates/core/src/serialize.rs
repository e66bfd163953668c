//! Tag-document rendering of the parse tree and the token stream.
//!
//! A pure projection: nodes are written depth-first in pre-order, exactly as
//! they appear in the tree, two spaces of indentation per level.

use crate::lexer::{Spanned, Token};
use crate::tree::Node;
use std::fmt::Write;

pub fn to_xml(tree: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, tree, 0);
    out
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Leaf { tag, value } => {
            let _ = writeln!(out, "{}<{}> {} </{}>", indent, tag, escape(value), tag);
        }
        Node::Branch { tag, children } => {
            let _ = writeln!(out, "{}<{}>", indent, tag);
            for child in children {
                write_node(out, child, depth + 1);
            }
            let _ = writeln!(out, "{}</{}>", indent, tag);
        }
    }
}

/// Flat `<tokens>` document. Error tokens have no category and are left out.
pub fn tokens_to_xml(tokens: &[Spanned]) -> String {
    let mut out = String::from("<tokens>\n");
    for s in tokens {
        if matches!(s.token, Token::Error(_)) {
            continue;
        }
        let tag = s.token.category();
        let _ = writeln!(out, "<{}> {} </{}>", tag, escape(&s.token.value()), tag);
    }
    out.push_str("</tokens>\n");
    out
}

pub fn to_json(tree: &Node) -> serde_json::Value {
    serde_json::to_value(tree).unwrap_or(serde_json::Value::Null)
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::{parse, ParseOptions};
    use crate::tree::Rule;

    fn tree_of(src: &str) -> Node {
        let tokens = lex(src);
        parse(&tokens, &ParseOptions::default()).0
    }

    #[test]
    fn minimal_class_document() {
        let xml = to_xml(&tree_of("class Main { function void main() { return; } }"));
        let expected = "\
<class>
  <keyword> class </keyword>
  <identifier> Main </identifier>
  <symbol> { </symbol>
  <subroutineDec>
    <keyword> function </keyword>
    <keyword> void </keyword>
    <identifier> main </identifier>
    <symbol> ( </symbol>
    <parameterList>
    </parameterList>
    <symbol> ) </symbol>
    <subroutineBody>
      <symbol> { </symbol>
      <statements>
        <returnStatement>
          <keyword> return </keyword>
          <symbol> ; </symbol>
        </returnStatement>
      </statements>
      <symbol> } </symbol>
    </subroutineBody>
  </subroutineDec>
  <symbol> } </symbol>
</class>
";
        assert_eq!(xml, expected);
    }

    #[test]
    fn terminal_values_are_escaped() {
        let tree = Node::branch(
            Rule::Expression,
            vec![
                Node::leaf(&Token::Symbol('<')),
                Node::leaf(&Token::Symbol('&')),
                Node::leaf(&Token::StrConst("say \"hi\" > 1".into())),
            ],
        );
        let xml = to_xml(&tree);
        assert!(xml.contains("<symbol> &lt; </symbol>"));
        assert!(xml.contains("<symbol> &amp; </symbol>"));
        assert!(xml.contains("<stringConstant> say &quot;hi&quot; &gt; 1 </stringConstant>"));
    }

    #[test]
    fn serializing_twice_is_identical() {
        let tree = tree_of(
            "class A { field int x; method int get() { if (x > 0) { return x; } return -x; } }",
        );
        assert_eq!(to_xml(&tree), to_xml(&tree));
    }

    #[test]
    fn token_document_is_flat() {
        let xml = tokens_to_xml(&lex("let s = \"a<b\"; 32768"));
        assert_eq!(
            xml,
            "<tokens>\n<keyword> let </keyword>\n<identifier> s </identifier>\n<symbol> = </symbol>\n<stringConstant> a&lt;b </stringConstant>\n<symbol> ; </symbol>\n</tokens>\n"
        );
    }

    #[test]
    fn json_mirrors_tree() {
        let json = to_json(&tree_of("class E { }"));
        assert_eq!(json["tag"], "class");
        assert_eq!(json["children"][0]["tag"], "keyword");
        assert_eq!(json["children"][1]["value"], "E");
        assert_eq!(json["children"].as_array().map(Vec::len), Some(4));
    }
}
