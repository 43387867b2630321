// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Structural matching.
//!
//! Two nodes match when they are the same variant and every
//! meaning-bearing child or field matches recursively. Spans, end spans,
//! documentation, the synthetic flag, annotations and entity bindings are
//! ignored: matching consults only [`NodeKind`] shape. A missing optional
//! block is equivalent to a present-but-empty one.

use crate::kind::NodeKind;
use crate::node::Ast;
use crate::NodeId;

impl Ast {
    /// Structural equivalence between this tree's `a` and `other`'s `b`.
    /// The two ids may come from the same arena (`ast.matches(a, &ast2,
    /// b)` with `ast2` a separate tree, or both from `self`).
    pub fn matches(&self, a: NodeId, other: &Ast, b: NodeId) -> bool {
        match (&self.node(a).kind, &other.node(b).kind) {
            (NodeKind::Module { items: l }, NodeKind::Module { items: r }) => {
                self.all_match(Some(l), other, Some(r))
            }
            (
                NodeKind::Function {
                    name: ln,
                    params: lp,
                    body: lb,
                },
                NodeKind::Function {
                    name: rn,
                    params: rp,
                    body: rb,
                },
            ) => ln == rn && lp == rp && self.block_matches(*lb, other, *rb),
            (NodeKind::Block { stmts: l }, NodeKind::Block { stmts: r }) => {
                self.all_match(Some(l), other, Some(r))
            }
            (
                NodeKind::Let { name: ln, init: li },
                NodeKind::Let { name: rn, init: ri },
            ) => ln == rn && self.matches(*li, other, *ri),
            (NodeKind::ExprStmt { expr: l }, NodeKind::ExprStmt { expr: r }) => {
                self.matches(*l, other, *r)
            }
            (NodeKind::Return { value: l }, NodeKind::Return { value: r }) => {
                self.opt_matches(*l, other, *r)
            }
            (
                NodeKind::If {
                    cond: lc,
                    then_block: lt,
                    else_block: le,
                },
                NodeKind::If {
                    cond: rc,
                    then_block: rt,
                    else_block: re,
                },
            ) => {
                self.matches(*lc, other, *rc)
                    && self.matches(*lt, other, *rt)
                    && self.block_matches(*le, other, *re)
            }
            (
                NodeKind::Binary {
                    op: lo,
                    lhs: ll,
                    rhs: lr,
                },
                NodeKind::Binary {
                    op: ro,
                    lhs: rl,
                    rhs: rr,
                },
            ) => lo == ro && self.matches(*ll, other, *rl) && self.matches(*lr, other, *rr),
            (
                NodeKind::Unary {
                    op: lo,
                    operand: l,
                },
                NodeKind::Unary {
                    op: ro,
                    operand: r,
                },
            ) => lo == ro && self.matches(*l, other, *r),
            (
                NodeKind::Call {
                    callee: lc,
                    args: la,
                },
                NodeKind::Call {
                    callee: rc,
                    args: ra,
                },
            ) => self.matches(*lc, other, *rc) && self.all_match(Some(la), other, Some(ra)),
            (NodeKind::Ident(l), NodeKind::Ident(r)) => l == r,
            (NodeKind::Int(l), NodeKind::Int(r)) => l == r,
            (NodeKind::Bool(l), NodeKind::Bool(r)) => l == r,
            (NodeKind::Str(l), NodeKind::Str(r)) => l == r,
            _ => false,
        }
    }

    /// Optional children: equal if both absent, else both present and
    /// matching.
    pub fn opt_matches(&self, a: Option<NodeId>, other: &Ast, b: Option<NodeId>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => self.matches(a, other, b),
            _ => false,
        }
    }

    /// Optional blocks: a missing block is equivalent to an empty one.
    pub fn block_matches(&self, a: Option<NodeId>, other: &Ast, b: Option<NodeId>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => self.matches(a, other, b),
            (None, Some(b)) => other.block_is_empty(b),
            (Some(a), None) => self.block_is_empty(a),
        }
    }

    fn block_is_empty(&self, id: NodeId) -> bool {
        matches!(&self.node(id).kind, NodeKind::Block { stmts } if stmts.is_empty())
    }

    /// Ordered sequences: an absent sequence matches only an absent or
    /// empty one; present sequences must have equal length and match
    /// pairwise in lock-step.
    pub fn all_match(
        &self,
        a: Option<&[NodeId]>,
        other: &Ast,
        b: Option<&[NodeId]>,
    ) -> bool {
        match (a, b) {
            (None, None) => true,
            (None, Some(s)) | (Some(s), None) => s.is_empty(),
            (Some(l), Some(r)) => {
                l.len() == r.len()
                    && l.iter()
                        .zip(r.iter())
                        .all(|(&x, &y)| self.matches(x, other, y))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::BinOp;
    use crate::span::{SourceId, Span};
    use std::rc::Rc;

    /// 1 + 2, with every node allocated in `ast`.
    fn sum(ast: &mut Ast) -> NodeId {
        let one = ast.alloc(NodeKind::Int(1));
        let two = ast.alloc(NodeKind::Int(2));
        ast.alloc(NodeKind::Binary {
            op: BinOp::Add,
            lhs: one,
            rhs: two,
        })
    }

    #[test]
    fn matching_ignores_everything_but_shape() {
        let mut ast = Ast::new();
        let a = sum(&mut ast);
        let b = sum(&mut ast);
        // Location, documentation, synthetic flag, annotations, entity:
        // none of it participates.
        ast.node_mut(a)
            .set_span(Span::new(SourceId(0), 1, 1, 1, 6))
            .unwrap();
        ast.node_mut(a).documentation = Some("the sum".into());
        ast.node_mut(b).synthetic = true;
        ast.node_mut(b).annotate_key("folded").unwrap();
        ast.node_mut(b).set_entity(Rc::new(3i64));
        assert!(ast.matches(a, &ast, b));
        assert!(ast.matches(b, &ast, a));
    }

    #[test]
    fn matching_across_trees() {
        let mut left = Ast::new();
        let mut right = Ast::new();
        let a = sum(&mut left);
        let b = sum(&mut right);
        assert!(left.matches(a, &right, b));
    }

    #[test]
    fn different_shape_does_not_match() {
        let mut ast = Ast::new();
        let a = sum(&mut ast);
        let one = ast.alloc(NodeKind::Int(1));
        let three = ast.alloc(NodeKind::Int(3));
        let b = ast.alloc(NodeKind::Binary {
            op: BinOp::Add,
            lhs: one,
            rhs: three,
        });
        assert!(!ast.matches(a, &ast, b));

        let lit = ast.alloc(NodeKind::Int(1));
        assert!(!ast.matches(a, &ast, lit));

        // Same operands, different operator
        let x = ast.alloc(NodeKind::Int(1));
        let y = ast.alloc(NodeKind::Int(2));
        let c = ast.alloc(NodeKind::Binary {
            op: BinOp::Mul,
            lhs: x,
            rhs: y,
        });
        assert!(!ast.matches(a, &ast, c));
    }

    #[test]
    fn opt_matches_requires_both_or_neither() {
        let mut ast = Ast::new();
        let one = ast.alloc(NodeKind::Int(1));
        let other = ast.alloc(NodeKind::Int(1));
        assert!(ast.opt_matches(None, &ast, None));
        assert!(ast.opt_matches(Some(one), &ast, Some(other)));
        assert!(!ast.opt_matches(Some(one), &ast, None));
        assert!(!ast.opt_matches(None, &ast, Some(other)));
    }

    #[test]
    fn absent_block_matches_empty_block() {
        let mut ast = Ast::new();
        let empty = ast.alloc(NodeKind::Block { stmts: vec![] });
        let one = ast.alloc(NodeKind::Int(1));
        let stmt = ast.alloc(NodeKind::ExprStmt { expr: one });
        let nonempty = ast.alloc(NodeKind::Block { stmts: vec![stmt] });

        assert!(ast.block_matches(None, &ast, Some(empty)));
        assert!(ast.block_matches(Some(empty), &ast, None));
        assert!(!ast.block_matches(None, &ast, Some(nonempty)));
        assert!(ast.block_matches(None, &ast, None));
    }

    #[test]
    fn extern_function_matches_empty_bodied_function() {
        let mut ast = Ast::new();
        let block = ast.alloc(NodeKind::Block { stmts: vec![] });
        let with_body = ast.alloc(NodeKind::Function {
            name: "f".into(),
            params: vec!["a".into()],
            body: Some(block),
        });
        let without = ast.alloc(NodeKind::Function {
            name: "f".into(),
            params: vec!["a".into()],
            body: None,
        });
        assert!(ast.matches(with_body, &ast, without));
    }

    #[test]
    fn all_match_sequences() {
        let mut ast = Ast::new();
        let a1 = ast.alloc(NodeKind::Int(1));
        let a2 = ast.alloc(NodeKind::Int(2));
        let b1 = ast.alloc(NodeKind::Int(1));
        let b2 = ast.alloc(NodeKind::Int(2));

        assert!(ast.all_match(None, &ast, None));
        assert!(ast.all_match(None, &ast, Some(&[])));
        assert!(!ast.all_match(None, &ast, Some(&[a1])));
        assert!(ast.all_match(Some(&[a1, a2]), &ast, Some(&[b1, b2])));
        // No dangling elements on either side
        assert!(!ast.all_match(Some(&[a1, a2]), &ast, Some(&[b1])));
        assert!(!ast.all_match(Some(&[a1]), &ast, Some(&[b1, b2])));
        // Lock-step order matters
        assert!(!ast.all_match(Some(&[a1, a2]), &ast, Some(&[b2, b1])));
    }
}
