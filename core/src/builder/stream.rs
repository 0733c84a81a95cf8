//! file: core/src/builder/stream.rs
//! description: linear cursor over a builder chain.
//!
//! `BuilderStream::create` walks the predecessor links of the terminal node
//! back to the root once and stores the chain root-first. Cursors share that
//! storage, so `copy` is cheap and independent passes can scan the same
//! chain without disturbing each other.

use std::sync::Arc;

use super::chain::Builder;
use super::kind::NodeTag;
use super::node::BuilderNode;

#[derive(Debug, Clone)]
pub struct BuilderStream {
    nodes: Arc<[Arc<BuilderNode>]>,
    cursor: usize,
}

impl BuilderStream {
    pub fn create(builder: &Builder) -> Self {
        let mut nodes = Vec::with_capacity(builder.head().index() + 1);
        let mut curr = Some(builder.head());
        while let Some(node) = curr {
            nodes.push(Arc::clone(node));
            curr = node.parent();
        }
        nodes.reverse();
        BuilderStream {
            nodes: nodes.into(),
            cursor: 0,
        }
    }

    /// Independent cursor at the same position over the same chain.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn curr(&self) -> Option<&Arc<BuilderNode>> {
        self.nodes.get(self.cursor)
    }

    /// Node `offset` positions past the cursor, without moving it.
    pub fn peek(&self, offset: usize) -> Option<&Arc<BuilderNode>> {
        self.nodes.get(self.cursor + offset)
    }

    pub fn peek_tag(&self) -> Option<NodeTag> {
        self.curr().map(|n| n.tag())
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.nodes.len()
    }

    /// Return the node under the cursor and advance past it.
    pub fn read(&mut self) -> Option<Arc<BuilderNode>> {
        let node = self.nodes.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(node)
    }

    /// Skip nodes whose tag is not in `tags`; return the first match and
    /// leave the cursor just past it. `None` once the chain is exhausted.
    pub fn read_next(&mut self, tags: &[NodeTag]) -> Option<Arc<BuilderNode>> {
        while let Some(node) = self.read() {
            if tags.contains(&node.tag()) {
                return Some(node);
            }
        }
        None
    }
}
