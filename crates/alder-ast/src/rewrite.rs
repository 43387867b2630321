// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pattern-driven tree rewriting.
//!
//! The engine traverses child slots depth-first, pre-order. Where the
//! predicate holds it writes a fresh clone of the template into the slot
//! and does not descend into either the replaced subtree or the
//! inserted clone. A template that itself satisfies the predicate can
//! therefore never retrigger; callers wanting a fixpoint loop externally.
//!
//! The pattern and template must be detached subtrees (typically built on
//! the side in the same arena). Replaced subtrees stay in the arena,
//! detached, until the tree is dropped. A predicate that panics leaves
//! the tree partially rewritten. While a node is visited, the kinds on the
//! path above it are detached; predicates must examine the candidate
//! subtree only, not the nodes above it.

use crate::kind::NodeKind;
use crate::node::Ast;
use crate::NodeId;

impl Ast {
    /// Replace every subtree under `root` satisfying `pred` with a fresh
    /// clone of `template`, returning the number of replacements. `root`
    /// is itself a slot: if the root matches, the caller's binding is
    /// rewritten to the clone.
    pub fn replace_nodes<F>(&mut self, root: &mut NodeId, template: NodeId, mut pred: F) -> usize
    where
        F: FnMut(&Ast, NodeId) -> bool,
    {
        let mut count = 0;
        self.rewrite_slot(root, template, &mut pred, &mut count);
        count
    }

    /// [`replace_nodes`](Self::replace_nodes) with the predicate
    /// "structurally matches `pattern`".
    pub fn replace_matching(
        &mut self,
        root: &mut NodeId,
        pattern: NodeId,
        template: NodeId,
    ) -> usize {
        self.replace_nodes(root, template, |ast, id| ast.matches(id, ast, pattern))
    }

    fn rewrite_slot<F>(
        &mut self,
        slot: &mut NodeId,
        template: NodeId,
        pred: &mut F,
        count: &mut usize,
    ) where
        F: FnMut(&Ast, NodeId) -> bool,
    {
        let id = *slot;
        if pred(self, id) {
            let parent = self.node(id).parent();
            let copy = self.clone_subtree(template);
            self.set_parent(copy, parent);
            self.set_parent(id, None);
            *slot = copy;
            *count += 1;
            // Replacements are opaque: no descent into the clone
            return;
        }
        // Detach the kind while iterating its slots so substitution is a
        // plain write, never pointer surgery on a structure being walked
        let mut kind = std::mem::replace(&mut self.node_mut(id).kind, NodeKind::Int(0)); // placeholder
        for child_slot in kind.child_slots() {
            self.rewrite_slot(child_slot, template, pred, count);
        }
        self.node_mut(id).kind = kind;
    }
}
