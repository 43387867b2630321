// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Errors raised by tree construction and the annotation store.

use crate::span::Span;

/// An error from the syntax-tree core.
///
/// Not-found conditions (ancestor queries, removing an absent annotation)
/// are ordinary `Option`/`bool` results, not errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AstError {
    /// The unknown-span sentinel was passed where a real location is
    /// required.
    #[error("invalid span: {0} is not a source location")]
    InvalidSpan(Span),
    /// Keyed annotations are insert-only; the key was already present.
    #[error("duplicate annotation key: {0}")]
    DuplicateAnnotation(String),
}
