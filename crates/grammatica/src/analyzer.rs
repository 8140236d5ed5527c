//! Parse events.

use grammatica_core::ParseError;

use crate::log::ParseLog;
use crate::tree::{Node, ProductionNode};

/// Receives every node the parser builds.
///
/// For each node the parser calls `enter` before its children are parsed
/// (productions are passed without children), then `exit` once the node is
/// complete, and finally `child` on the parent with whatever `exit`
/// returned. Returning `None` from `exit` drops the node from the tree.
///
/// Errors returned by a callback are logged and parsing continues.
/// Synthetic productions never reach the analyzer.
pub trait Analyzer {
    fn enter(&mut self, node: &Node) -> Result<(), ParseError> {
        let _ = node;
        Ok(())
    }

    fn exit(&mut self, node: Node) -> Result<Option<Node>, ParseError> {
        Ok(Some(node))
    }

    fn child(&mut self, parent: &mut ProductionNode, child: Node) -> Result<(), ParseError> {
        parent.children.push(child);
        Ok(())
    }

    /// Replay the callbacks over an already built tree.
    fn analyze(&mut self, node: Node) -> Result<Option<Node>, ParseLog> {
        let mut log = ParseLog::new();
        let result = replay(self, node, &mut log);
        if log.is_empty() { Ok(result) } else { Err(log) }
    }
}

fn replay<A: Analyzer + ?Sized>(analyzer: &mut A, node: Node, log: &mut ParseLog) -> Option<Node> {
    let node = match node {
        Node::Token(token) => {
            let node = Node::Token(token);
            if let Err(e) = analyzer.enter(&node) {
                log.push(e);
            }
            node
        }
        Node::Production(production) => {
            let mut rebuilt = ProductionNode::new(production.id, production.name);
            if let Err(e) = analyzer.enter(&Node::Production(rebuilt.clone())) {
                log.push(e);
            }
            for child in production.children {
                if let Some(child) = replay(analyzer, child, log) {
                    if let Err(e) = analyzer.child(&mut rebuilt, child) {
                        log.push(e);
                    }
                }
            }
            Node::Production(rebuilt)
        }
    };

    match analyzer.exit(node) {
        Ok(node) => node,
        Err(e) => {
            log.push(e);
            None
        }
    }
}

/// Keeps the complete tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeBuilder;

impl Analyzer for TreeBuilder {}
