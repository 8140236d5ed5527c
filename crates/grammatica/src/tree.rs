//! Parse tree.

use std::fmt::Write;
use std::sync::Arc;

use grammatica_core::{Position, ProductionId, Token, TokenId};
use serde::Serialize;

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Token(TokenNode),
    Production(ProductionNode),
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct TokenNode {
    pub id: TokenId,
    pub name: Arc<str>,
    pub image: String,
    pub position: Position,
}

impl TokenNode {
    pub fn new(token: Token, name: Arc<str>) -> Self {
        Self {
            id: token.id,
            name,
            image: token.image,
            position: token.position,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct ProductionNode {
    pub id: ProductionId,
    pub name: Arc<str>,
    pub children: Vec<Node>,
}

impl ProductionNode {
    pub fn new(id: ProductionId, name: Arc<str>) -> Self {
        Self {
            id,
            name,
            children: Vec::new(),
        }
    }

    /// Position of the first token below this node.
    pub fn position(&self) -> Option<Position> {
        self.children.iter().find_map(Node::position)
    }
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Token(t) => &t.name,
            Node::Production(p) => &p.name,
        }
    }

    /// `None` for productions.
    pub fn token_id(&self) -> Option<TokenId> {
        self.as_token().map(|t| t.id)
    }

    /// `None` for tokens.
    pub fn production_id(&self) -> Option<ProductionId> {
        self.as_production().map(|p| p.id)
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Node::Token(_))
    }

    pub fn as_token(&self) -> Option<&TokenNode> {
        match self {
            Node::Token(t) => Some(t),
            Node::Production(_) => None,
        }
    }

    pub fn as_production(&self) -> Option<&ProductionNode> {
        match self {
            Node::Production(p) => Some(p),
            Node::Token(_) => None,
        }
    }

    /// Empty for tokens.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Token(_) => &[],
            Node::Production(p) => &p.children,
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children().get(index)
    }

    /// Own position for tokens, first token below for productions.
    pub fn position(&self) -> Option<Position> {
        match self {
            Node::Token(t) => Some(t.position),
            Node::Production(p) => p.position(),
        }
    }

    /// Indented outline, one node per line.
    ///
    /// ```text
    /// Sum
    ///   NUMBER "1" 1:1
    ///   PLUS "+" 1:3
    /// ```
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        match self {
            Node::Token(t) => {
                let token = Token::new(t.id, t.image.as_str(), t.position);
                let _ = writeln!(
                    out,
                    "{} {} {}:{}",
                    t.name,
                    token.short_image(),
                    t.position.line,
                    t.position.column
                );
            }
            Node::Production(p) => {
                out.push_str(&p.name);
                out.push('\n');
                for child in &p.children {
                    child.dump_into(out, depth + 1);
                }
            }
        }
    }
}
