// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree traversal.
//!
//! [`Visitor`] has one callback per node variant; every default recurses
//! depth-first pre-order via [`walk_children`], so a pass overrides only
//! the variants it cares about and calls `walk_children` (or not) to
//! continue below itself. [`walk`] dispatches a single node to the
//! callback matching its variant; [`Ast::accept`] is the entry point
//! external printers and passes use.

use crate::kind::NodeKind;
use crate::node::Ast;
use crate::NodeId;

/// A read-only tree visitor. Defaults recurse into all children.
pub trait Visitor: Sized {
    fn visit_module(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_function(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_block(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_let(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_expr_stmt(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_return(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_if(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_binary(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_unary(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_call(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_ident(&mut self, _ast: &Ast, _id: NodeId) {}

    fn visit_int(&mut self, _ast: &Ast, _id: NodeId) {}

    fn visit_bool(&mut self, _ast: &Ast, _id: NodeId) {}

    fn visit_str(&mut self, _ast: &Ast, _id: NodeId) {}
}

/// Dispatch `id` to the callback for its variant.
pub fn walk<V: Visitor>(v: &mut V, ast: &Ast, id: NodeId) {
    match &ast.node(id).kind {
        NodeKind::Module { .. } => v.visit_module(ast, id),
        NodeKind::Function { .. } => v.visit_function(ast, id),
        NodeKind::Block { .. } => v.visit_block(ast, id),
        NodeKind::Let { .. } => v.visit_let(ast, id),
        NodeKind::ExprStmt { .. } => v.visit_expr_stmt(ast, id),
        NodeKind::Return { .. } => v.visit_return(ast, id),
        NodeKind::If { .. } => v.visit_if(ast, id),
        NodeKind::Binary { .. } => v.visit_binary(ast, id),
        NodeKind::Unary { .. } => v.visit_unary(ast, id),
        NodeKind::Call { .. } => v.visit_call(ast, id),
        NodeKind::Ident(_) => v.visit_ident(ast, id),
        NodeKind::Int(_) => v.visit_int(ast, id),
        NodeKind::Bool(_) => v.visit_bool(ast, id),
        NodeKind::Str(_) => v.visit_str(ast, id),
    }
}

/// Visit every child of `id`, left to right.
pub fn walk_children<V: Visitor>(v: &mut V, ast: &Ast, id: NodeId) {
    for child in ast.node(id).kind.children() {
        walk(v, ast, child);
    }
}

impl Ast {
    /// Drive `visitor` over the subtree rooted at `id`. The node is
    /// dispatched to the callback for its variant; the default callbacks
    /// continue depth-first pre-order.
    pub fn accept<V: Visitor>(&self, id: NodeId, visitor: &mut V) {
        walk(visitor, self, id);
    }
}
