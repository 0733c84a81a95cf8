use std::sync::Arc;

use crate::location::Location;

use super::kind::{NodeKind, NodeTag};

/// One recorded builder call. Nodes only know their predecessor; the chain
/// is append-only and never mutated once built.
#[derive(Debug)]
pub struct BuilderNode {
    pub kind: NodeKind,
    parent: Option<Arc<BuilderNode>>,
    index: usize,
}

impl BuilderNode {
    pub fn root(kind: NodeKind) -> Self {
        BuilderNode {
            kind,
            parent: None,
            index: 0,
        }
    }

    pub fn child(parent: Arc<BuilderNode>, kind: NodeKind) -> Self {
        let index = parent.index + 1;
        BuilderNode {
            kind,
            parent: Some(parent),
            index,
        }
    }

    pub fn parent(&self) -> Option<&Arc<BuilderNode>> {
        self.parent.as_ref()
    }

    pub fn parent_kind(&self) -> Option<&NodeKind> {
        self.parent.as_ref().map(|p| &p.kind)
    }

    /// Distance from the root of the chain.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tag(&self) -> NodeTag {
        self.kind.tag()
    }

    pub fn location(&self) -> Location {
        Location::new(self.index, self.tag().to_string())
    }
}
