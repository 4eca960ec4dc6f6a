//! Forward cursor over the child records of a control.

use crate::hwp5::record::{RecordNode, TagId};

/// Hands out a control's child nodes in file order.
///
/// Decoders take the children they understand; whatever is left afterwards is
/// reported by the control dispatcher.
#[derive(Debug, Clone)]
pub struct Children<'n> {
    nodes: &'n [RecordNode],
    pos: usize,
}

impl<'n> Children<'n> {
    pub fn new(nodes: &'n [RecordNode]) -> Self {
        Self { nodes, pos: 0 }
    }

    pub fn peek(&self) -> Option<&'n RecordNode> {
        self.nodes.get(self.pos)
    }

    pub fn peek_tag(&self) -> Option<TagId> {
        self.peek().map(RecordNode::tag)
    }

    /// Takes the next child only if it has the given tag.
    pub fn next_if(&mut self, tag: TagId) -> Option<&'n RecordNode> {
        if self.peek_tag() == Some(tag) {
            self.next()
        } else {
            None
        }
    }

    /// Children not yet taken.
    pub fn rest(&mut self) -> &'n [RecordNode] {
        let rest = &self.nodes[self.pos..];
        self.pos = self.nodes.len();
        rest
    }

    pub fn remaining(&self) -> usize {
        self.nodes.len() - self.pos
    }
}

impl<'n> Iterator for Children<'n> {
    type Item = &'n RecordNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.pos)?;
        self.pos += 1;
        Some(node)
    }
}
