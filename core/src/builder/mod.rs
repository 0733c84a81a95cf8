pub mod chain;
pub mod kind;
pub mod node;
pub mod stream;

pub use chain::Builder;
pub use kind::{NodeKind, NodeTag};
pub use node::BuilderNode;
pub use stream::BuilderStream;
