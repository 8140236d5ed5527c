use std::sync::Arc;

use grammatica_core::{Position, ProductionId, Token, TokenId};
use serde_json::json;

use crate::test_grammars;
use crate::tree::{Node, ProductionNode, TokenNode};

fn token(id: u32, name: &str, image: &str, column: u32) -> Node {
    let position = Position::new(1, column, column as usize - 1);
    Node::Token(TokenNode::new(
        Token::new(TokenId(id), image, position),
        Arc::from(name),
    ))
}

fn pair() -> Node {
    let mut node = ProductionNode::new(ProductionId(1), Arc::from("Pair"));
    node.children.push(token(1, "KEY", "name", 1));
    node.children.push(token(2, "VALUE", "\"x\"", 6));
    Node::Production(node)
}

#[test]
fn accessors() {
    let node = pair();

    assert_eq!(node.name(), "Pair");
    assert!(!node.is_token());
    assert_eq!(node.production_id(), Some(ProductionId(1)));
    assert_eq!(node.token_id(), None);
    assert_eq!(node.child(1).and_then(Node::token_id), Some(TokenId(2)));
    assert_eq!(node.child_count(), 2);
    assert_eq!(node.child(1).map(Node::name), Some("VALUE"));
    assert!(node.child(2).is_none());
    assert_eq!(node.child(0).and_then(Node::as_token).map(|t| t.image.as_str()), Some("name"));
    assert!(node.child(0).unwrap().children().is_empty());
}

#[test]
fn positions() {
    let node = pair();
    assert_eq!(node.position(), Some(Position::new(1, 1, 0)));
    assert_eq!(node.child(1).and_then(Node::position), Some(Position::new(1, 6, 5)));

    let empty = Node::Production(ProductionNode::new(ProductionId(2), Arc::from("Empty")));
    assert_eq!(empty.position(), None);
}

#[test]
fn dump_escapes_images() {
    insta::assert_snapshot!(pair().dump(), @r#"
    Pair
      KEY "name" 1:1
      VALUE "\"x\"" 1:6
    "#);
}

#[test]
fn serializes_as_tagged_json() {
    let value = serde_json::to_value(pair()).unwrap();

    assert_eq!(
        value,
        json!({
            "kind": "production",
            "id": 1,
            "name": "Pair",
            "children": [
                {
                    "kind": "token",
                    "id": 1,
                    "name": "KEY",
                    "image": "name",
                    "position": { "line": 1, "column": 1, "offset": 0 }
                },
                {
                    "kind": "token",
                    "id": 2,
                    "name": "VALUE",
                    "image": "\"x\"",
                    "position": { "line": 1, "column": 6, "offset": 5 }
                }
            ]
        })
    );
}

#[test]
fn parsed_production_position() {
    let tree = test_grammars::arithmetic().parse_str("  (1)").unwrap();
    let factor = &tree.children()[0].children()[0];

    assert_eq!(factor.name(), "Factor");
    assert_eq!(factor.position(), Some(Position::new(1, 3, 2)));
}
