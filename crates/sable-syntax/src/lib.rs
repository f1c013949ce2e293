//! Lossless raw syntax tree for sable.
//!
//! Every byte of input is preserved: tokens carry their leading and trailing
//! trivia, layouts have a fixed arity per kind with explicit missing
//! placeholders, and stray input is kept in per-layout unexpected buckets.
//! All nodes are owned by a session [`Arena`]; incremental reuse chains
//! arenas through reference-counted handles.

mod arena;
mod node;
mod syntax_kind;
mod syntax_set;
mod trivia;

pub use arena::{Arena, NodeId, UnexpectedEntry};
pub use node::{ChildrenInOrder, RawNode, SyntaxTree};
pub use syntax_kind::{SlotInfo, SlotKind, SyntaxKind};
pub use syntax_set::SyntaxSet;
pub use trivia::{Trivia, TriviaPiece, TriviaPieceKind};
