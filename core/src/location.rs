
/// Position of a node inside a linearized builder chain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Location {
    /// Zero-based index of the node, counted from the register at the root.
    pub index: usize,
    /// Kind name of the node found at `index`.
    pub node: String,
}

impl Location {
    /// Creates a new `Location`.
    pub fn new(index: usize, node: impl Into<String>) -> Self {
        Self { index, node: node.into() }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node #{} ({})", self.index, self.node)
    }
}
