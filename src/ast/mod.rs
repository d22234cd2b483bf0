//! Входное синтаксическое дерево и его обход построителем.
//!
//! Дерево приходит от внешнего парсера в JSON:
//!
//! ```json
//! { "kind": "MethodDeclaration", "signature": "Foo.m1/0",
//!   "children": [ { "token": { "text": "return", "role": "plain" } },
//!                 { "node": { "kind": "Block" } } ] }
//! ```

pub mod driver;

pub use driver::TreeDriver;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GraphResult;
use crate::nodecodes::{SyntaxKind, TokenRole};

/// Корень входного дерева.
pub type SyntaxTree = SyntaxNode;

/// Узел синтаксического дерева.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    /// Имя объявленного типа
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Сигнатура объявленного или вызываемого метода
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SyntaxElement>,
}

/// Дочерний элемент: вложенный узел или токен.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxElement {
    Node(SyntaxNode),
    Token(SyntaxToken),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxToken {
    pub text: String,
    #[serde(default)]
    pub role: TokenRole,
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind) -> Self {
        Self {
            kind,
            name: None,
            signature: None,
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Добавить дочерний узел.
    pub fn node(mut self, child: SyntaxNode) -> Self {
        self.children.push(SyntaxElement::Node(child));
        self
    }

    /// Добавить токен.
    pub fn token(mut self, text: impl Into<String>, role: TokenRole) -> Self {
        self.children.push(SyntaxElement::Token(SyntaxToken {
            text: text.into(),
            role,
        }));
        self
    }

    pub fn plain(self, text: impl Into<String>) -> Self {
        self.token(text, TokenRole::Plain)
    }

    pub fn ident(self, name: impl Into<String>) -> Self {
        self.token(name, TokenRole::Identifier)
    }

    pub fn literal(self, text: impl Into<String>) -> Self {
        self.token(text, TokenRole::Literal)
    }

    /// Дочерние узлы без токенов.
    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(|c| match c {
            SyntaxElement::Node(node) => Some(node),
            SyntaxElement::Token(_) => None,
        })
    }

    /// Разобрать дерево из JSON.
    ///
    /// Глубина вложенности не ограничена: стек растёт по мере разбора.
    pub fn from_json_str(text: &str) -> GraphResult<Self> {
        let mut json = serde_json::Deserializer::from_str(text);
        json.disable_recursion_limit();
        let tree = Self::deserialize(serde_stacker::Deserializer::new(&mut json))?;
        json.end()?;
        Ok(tree)
    }

    pub fn from_path(path: impl AsRef<Path>) -> GraphResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree_json() {
        let tree = SyntaxTree::from_json_str(
            r#"{
                "kind": "MethodDeclaration",
                "signature": "Foo.m1/0",
                "children": [
                    {"token": {"text": "return"}},
                    {"node": {"kind": "ReturnStatement", "children": [
                        {"token": {"text": "x", "role": "identifier"}}
                    ]}}
                ]
            }"#,
        )
        .unwrap();

        let expected = SyntaxNode::new(SyntaxKind::MethodDeclaration)
            .with_signature("Foo.m1/0")
            .plain("return")
            .node(SyntaxNode::new(SyntaxKind::ReturnStatement).ident("x"));
        assert_eq!(tree, expected);
        assert_eq!(tree.child_nodes().count(), 1);
    }

    #[test]
    fn test_deep_tree_from_json() {
        let mut expr = SyntaxNode::new(SyntaxKind::ParenthesizedExpression).ident("x");
        for _ in 0..200 {
            expr = SyntaxNode::new(SyntaxKind::ParenthesizedExpression).node(expr);
        }
        let json = serde_json::to_string(&expr).unwrap();
        assert_eq!(SyntaxTree::from_json_str(&json).unwrap(), expr);
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        assert!(SyntaxTree::from_json_str(r#"{"kind": "Block"} {"kind": "Block"}"#).is_err());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(SyntaxTree::from_json_str(r#"{"kind": "NoSuchNode"}"#).is_err());
    }

    #[test]
    fn test_json_round_trip_omits_empty_fields() {
        let tree = SyntaxNode::new(SyntaxKind::Block);
        assert_eq!(serde_json::to_string(&tree).unwrap(), r#"{"kind":"Block"}"#);
    }
}
