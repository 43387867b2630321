// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source rendering for Alder syntax trees.
//!
//! Linearizes a subtree back to source text by driving a printer over the
//! tree through the visitor protocol. The tree core knows nothing about
//! rendering beyond the accept hook.

mod printer;

pub use printer::Printer;

use alder_ast::{Ast, NodeId};

/// Render the subtree rooted at `id` as source text.
pub fn to_source(ast: &Ast, id: NodeId) -> String {
    let mut p = Printer::new();
    ast.accept(id, &mut p);
    p.finish()
}
