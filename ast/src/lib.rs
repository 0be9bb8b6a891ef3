//! The abstract syntax tree's data model: token kinds, the node inventory,
//! and the arena that owns every node produced by a parse.
//!
//! This crate is deliberately inert: it has no knowledge of how a tree is
//! built (that's `corec-parser`'s job). It only defines the shape nodes take
//! and the bump allocator they live in, so that the parser, and any future
//! consumer crate (formatter, analyzer), agree on one representation.

pub mod arena;
pub mod node;
pub mod token;

pub use arena::Arena;
pub use node::{AsmOutputKind, ContainerKind, ControlFlowKind, Node, NodeId, NodeKind, PtrSize};
pub use token::{TokenKind, KEYWORDS};
