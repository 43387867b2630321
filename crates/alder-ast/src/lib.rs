// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax tree core for the Alder language.
//!
//! This crate defines the tree storage and node base shared between the
//! parser, name resolution, optimization passes, and code emission:
//! source spans, parent navigation, per-node annotations, semantic entity
//! bindings, structural matching, visitor traversal, and the pattern
//! rewrite engine.

pub mod annotations;
pub mod error;
pub mod kind;
pub mod matching;
pub mod node;
pub mod rewrite;
pub mod span;
pub mod visit;

pub use annotations::{AnnotationKey, Annotations};
pub use error::AstError;
pub use kind::{BinOp, NodeKind, NodeType, UnaryOp};
pub use node::{Ast, Entity, Node};
pub use span::{LineMap, SourceId, Span};
pub use visit::{walk, walk_children, Visitor};

/// Unique identifier for AST nodes.
///
/// Indexes into the [`Ast`] arena that allocated it; ids from one tree are
/// meaningless in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
