// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree storage, the node base, and ancestor queries.
//!
//! An [`Ast`] owns every node of one tree; ownership flows strictly from
//! parent to child through the ids stored in each [`NodeKind`]. The parent
//! back-reference on each node is navigation only. Subtrees detached by
//! the rewrite engine stay in the arena until the whole tree is dropped.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::annotations::Annotations;
use crate::error::AstError;
use crate::kind::{NodeKind, NodeType};
use crate::span::Span;
use crate::NodeId;

/// Opaque handle to a semantic-analysis result bound to a node. The core
/// stores and clears it; only the analysis that produced it looks inside.
pub type Entity = Rc<dyn Any>;

/// A single syntax-tree node.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub kind: NodeKind,
    span: Option<Span>,
    end_span: Option<Span>,
    parent: Option<NodeId>,
    /// True if fabricated by the compiler rather than parsed from source.
    pub synthetic: bool,
    /// Descriptive text attached by the builder.
    pub documentation: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip))]
    annotations: Option<Box<Annotations>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    entity: Option<Entity>,
}

impl Node {
    fn new(kind: NodeKind, span: Option<Span>) -> Self {
        Node {
            kind,
            span,
            end_span: None,
            parent: None,
            synthetic: false,
            documentation: None,
            annotations: None,
            entity: None,
        }
    }

    /// The discriminator for this node's variant.
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// The enclosing node, or `None` for a root or detached node.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// This node's own span, without ancestor fallback. See
    /// [`Ast::span`] for the resolving read.
    pub fn own_span(&self) -> Span {
        self.span.unwrap_or(Span::UNKNOWN)
    }

    pub fn set_span(&mut self, span: Span) -> Result<(), AstError> {
        if !span.is_known() {
            return Err(AstError::InvalidSpan(span));
        }
        self.span = Some(span);
        Ok(())
    }

    /// The end span, meaningful mainly for block-like nodes. Never
    /// inherited.
    pub fn end_span(&self) -> Span {
        self.end_span.unwrap_or(Span::UNKNOWN)
    }

    pub fn set_end_span(&mut self, span: Span) -> Result<(), AstError> {
        if !span.is_known() {
            return Err(AstError::InvalidSpan(span));
        }
        self.end_span = Some(span);
        Ok(())
    }

    /// The semantic binding, if analysis has attached one.
    pub fn entity(&self) -> Option<&Entity> {
        self.entity.as_ref()
    }

    /// The semantic binding downcast to `T`.
    pub fn entity_as<T: Any>(&self) -> Option<&T> {
        self.entity.as_ref().and_then(|e| e.downcast_ref::<T>())
    }

    pub fn set_entity(&mut self, entity: Entity) {
        self.entity = Some(entity);
    }

    pub fn clear_entity(&mut self) {
        self.entity = None;
    }

    /// The annotation store, if any annotation has ever been attached.
    pub fn annotations(&self) -> Option<&Annotations> {
        self.annotations.as_deref()
    }

    /// The annotation store, allocated on first use.
    pub fn annotations_mut(&mut self) -> &mut Annotations {
        self.annotations.get_or_insert_with(Default::default)
    }

    /// Insert a named annotation. Fails with
    /// [`AstError::DuplicateAnnotation`] if `key` is already present.
    pub fn annotate(&mut self, key: impl Into<String>, value: impl Any) -> Result<(), AstError> {
        self.annotations_mut().insert(key, value)
    }

    /// Insert a named annotation whose value is the key itself.
    pub fn annotate_key(&mut self, key: &str) -> Result<(), AstError> {
        self.annotations_mut().insert_key(key)
    }

    pub fn contains_annotation(&self, key: &str) -> bool {
        self.annotations.as_ref().map_or(false, |a| a.contains(key))
    }

    /// Remove a named annotation. Removing an absent key is a no-op.
    pub fn remove_annotation(&mut self, key: &str) -> bool {
        self.annotations.as_mut().map_or(false, |a| a.remove(key))
    }

    /// Whether any annotation (typed or named) is attached.
    pub fn has_annotations(&self) -> bool {
        self.annotations.as_ref().map_or(false, |a| !a.is_empty())
    }

    /// The typed annotation slot for `T`.
    pub fn get_annotation<T: Any>(&self) -> Option<&T> {
        self.annotations.as_ref().and_then(|a| a.get::<T>())
    }

    /// Fill the typed annotation slot for `T`, replacing any previous
    /// value.
    pub fn set_annotation<T: Any>(&mut self, value: T) {
        self.annotations_mut().set(value);
    }

    /// Drop the whole annotation store and the entity binding together.
    /// Used when semantic results go stale and by clean cloning.
    pub fn clear_bindings(&mut self) {
        self.annotations = None;
        self.entity = None;
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Node");
        s.field("kind", &self.kind);
        if let Some(span) = self.span {
            s.field("span", &format_args!("{span}"));
        }
        if let Some(parent) = self.parent {
            s.field("parent", &parent);
        }
        if self.synthetic {
            s.field("synthetic", &true);
        }
        if let Some(anns) = &self.annotations {
            s.field("annotations", anns);
        }
        if self.entity.is_some() {
            s.field("entity", &"<bound>");
        }
        s.finish()
    }
}

/// Owns every node of one tree.
#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Allocate a node with no known location and adopt every child
    /// referenced by `kind`: each child's parent link is set to the new
    /// node. A child must not already be attached elsewhere.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.push(Node::new(kind, None))
    }

    /// Allocate a node at an explicit location. Passing the unknown
    /// sentinel is an error; use [`alloc`](Self::alloc) for nodes whose
    /// location is genuinely unknown.
    pub fn alloc_at(&mut self, kind: NodeKind, span: Span) -> Result<NodeId, AstError> {
        if !span.is_known() {
            return Err(AstError::InvalidSpan(span));
        }
        Ok(self.push(Node::new(kind, Some(span))))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let children = node.kind.children();
        self.nodes.push(node);
        for child in children {
            let child = &mut self.nodes[child.index()];
            debug_assert!(child.parent.is_none(), "node is already attached");
            child.parent = Some(id);
        }
        id
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id.index()].parent = parent;
    }

    /// The resolved span of `id`: its own span if set, otherwise the
    /// nearest ancestor's known span, otherwise [`Span::UNKNOWN`]. A node
    /// carrying a concrete span never consults its ancestors. The walk is
    /// a pure read; nothing is cached or mutated.
    pub fn span(&self, id: NodeId) -> Span {
        let mut cur = Some(id);
        while let Some(n) = cur {
            let node = self.node(n);
            if let Some(span) = node.span {
                return span;
            }
            cur = node.parent;
        }
        Span::UNKNOWN
    }

    /// The parent chain of `id`, nearest first, excluding `id` itself.
    /// The iterator is cheap, lazy and cloneable, so a walk can be
    /// restarted from any point.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            ast: self,
            cur: self.node(id).parent,
        }
    }

    /// The nearest ancestor with discriminator `ty`.
    pub fn get_ancestor(&self, id: NodeId, ty: NodeType) -> Option<NodeId> {
        self.ancestors(id).find(|&a| self.node(a).node_type() == ty)
    }

    /// The nearest ancestor with discriminator `ty`, looking at most
    /// `max_depth` hops up. The depth budget is spent before an ancestor
    /// is examined, so a budget of zero never matches anything.
    pub fn get_ancestor_within(
        &self,
        id: NodeId,
        ty: NodeType,
        max_depth: usize,
    ) -> Option<NodeId> {
        let mut depth = max_depth;
        for ancestor in self.ancestors(id) {
            if depth == 0 {
                return None;
            }
            depth -= 1;
            if self.node(ancestor).node_type() == ty {
                return Some(ancestor);
            }
        }
        None
    }

    /// The nearest ancestor satisfying `pred`.
    pub fn get_ancestor_where<F>(&self, id: NodeId, mut pred: F) -> Option<NodeId>
    where
        F: FnMut(&Node) -> bool,
    {
        self.ancestors(id).find(|&a| pred(self.node(a)))
    }

    /// The farthest ancestor with discriminator `ty`.
    pub fn get_root_ancestor(&self, id: NodeId, ty: NodeType) -> Option<NodeId> {
        self.ancestors_of_type(id, ty).last()
    }

    /// All ancestors with discriminator `ty`, nearest first.
    pub fn ancestors_of_type(
        &self,
        id: NodeId,
        ty: NodeType,
    ) -> impl Iterator<Item = NodeId> + '_ {
        self.ancestors(id)
            .filter(move |&a| self.node(a).node_type() == ty)
    }

    /// Deep-copy the subtree rooted at `id` into this arena, returning
    /// the copy's root. The copy is detached (no parent). Spans, the
    /// synthetic flag and documentation are carried over; each copied
    /// node gets an independent annotation store and the same entity
    /// reference.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        self.clone_subtree_inner(id, false)
    }

    /// Like [`clone_subtree`](Self::clone_subtree), but every copied node
    /// has an empty annotation store and no entity binding.
    pub fn clean_clone_subtree(&mut self, id: NodeId) -> NodeId {
        self.clone_subtree_inner(id, true)
    }

    fn clone_subtree_inner(&mut self, id: NodeId, clean: bool) -> NodeId {
        let mut kind = self.node(id).kind.clone();
        for slot in kind.child_slots() {
            let child = *slot;
            *slot = self.clone_subtree_inner(child, clean);
        }
        let src = self.node(id);
        let node = Node {
            kind,
            span: src.span,
            end_span: src.end_span,
            parent: None,
            synthetic: src.synthetic,
            documentation: src.documentation.clone(),
            annotations: if clean { None } else { src.annotations.clone() },
            entity: if clean { None } else { src.entity.clone() },
        };
        self.push(node)
    }
}

/// Iterator over a node's parent chain. See [`Ast::ancestors`].
#[derive(Clone)]
pub struct Ancestors<'a> {
    ast: &'a Ast,
    cur: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cur?;
        self.cur = self.ast.node(id).parent;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SourceId;

    fn span(line: u32) -> Span {
        Span::new(SourceId(0), line, 1, line, 10)
    }

    /// fn f() { let x = 1; } as (ast, module, function, block, let, int)
    fn sample_tree() -> (Ast, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut ast = Ast::new();
        let one = ast.alloc(NodeKind::Int(1));
        let binding = ast.alloc(NodeKind::Let {
            name: "x".into(),
            init: one,
        });
        let block = ast.alloc(NodeKind::Block {
            stmts: vec![binding],
        });
        let func = ast.alloc(NodeKind::Function {
            name: "f".into(),
            params: vec![],
            body: Some(block),
        });
        let module = ast.alloc(NodeKind::Module { items: vec![func] });
        (ast, module, func, block, binding, one)
    }

    #[test]
    fn alloc_adopts_children() {
        let (ast, module, func, block, binding, one) = sample_tree();
        assert_eq!(ast.node(one).parent(), Some(binding));
        assert_eq!(ast.node(binding).parent(), Some(block));
        assert_eq!(ast.node(block).parent(), Some(func));
        assert_eq!(ast.node(func).parent(), Some(module));
        assert_eq!(ast.node(module).parent(), None);
    }

    #[test]
    fn alloc_at_rejects_unknown_span() {
        let mut ast = Ast::new();
        let err = ast.alloc_at(NodeKind::Int(1), Span::UNKNOWN).unwrap_err();
        assert!(matches!(err, AstError::InvalidSpan(_)));
        let id = ast.alloc_at(NodeKind::Int(1), span(3)).unwrap();
        assert_eq!(ast.node(id).own_span(), span(3));
    }

    #[test]
    fn set_span_rejects_unknown() {
        let mut ast = Ast::new();
        let id = ast.alloc(NodeKind::Int(1));
        assert!(ast.node_mut(id).set_span(Span::UNKNOWN).is_err());
        assert!(ast.node_mut(id).set_end_span(Span::UNKNOWN).is_err());
        ast.node_mut(id).set_span(span(2)).unwrap();
        ast.node_mut(id).set_end_span(span(4)).unwrap();
        assert_eq!(ast.node(id).own_span(), span(2));
        assert_eq!(ast.node(id).end_span(), span(4));
    }

    #[test]
    fn span_inherited_from_nearest_ancestor() {
        let (mut ast, module, func, block, binding, one) = sample_tree();
        // Nothing has a span yet
        assert_eq!(ast.span(one), Span::UNKNOWN);
        // Function gets one; everything below it resolves to it
        ast.node_mut(func).set_span(span(10)).unwrap();
        assert_eq!(ast.span(one), span(10));
        assert_eq!(ast.span(block), span(10));
        assert_eq!(ast.span(func), span(10));
        assert_eq!(ast.span(module), Span::UNKNOWN);
        // A nearer ancestor's span wins
        ast.node_mut(binding).set_span(span(11)).unwrap();
        assert_eq!(ast.span(one), span(11));
        // A concrete span never consults ancestors
        ast.node_mut(one).set_span(span(12)).unwrap();
        assert_eq!(ast.span(one), span(12));
    }

    #[test]
    fn end_span_is_not_inherited() {
        let (mut ast, _, func, block, ..) = sample_tree();
        ast.node_mut(func).set_end_span(span(20)).unwrap();
        assert_eq!(ast.node(block).end_span(), Span::UNKNOWN);
    }

    #[test]
    fn ancestors_nearest_first_and_restartable() {
        let (ast, module, func, block, binding, one) = sample_tree();
        let chain: Vec<NodeId> = ast.ancestors(one).collect();
        assert_eq!(chain, vec![binding, block, func, module]);

        let mut iter = ast.ancestors(one);
        iter.next();
        let rest = iter.clone();
        assert_eq!(iter.count(), rest.count());
    }

    #[test]
    fn get_ancestor_by_type() {
        let (ast, module, func, _, _, one) = sample_tree();
        assert_eq!(ast.get_ancestor(one, NodeType::Function), Some(func));
        assert_eq!(ast.get_ancestor(one, NodeType::Module), Some(module));
        assert_eq!(ast.get_ancestor(one, NodeType::If), None);
        // A node is not its own ancestor
        assert_eq!(ast.get_ancestor(module, NodeType::Module), None);
    }

    #[test]
    fn get_ancestor_within_spends_depth_before_looking() {
        let (ast, _, _, _, binding, one) = sample_tree();
        // Zero budget never matches, even though the parent is a Let
        assert_eq!(ast.get_ancestor_within(one, NodeType::Let, 0), None);
        assert_eq!(ast.get_ancestor_within(one, NodeType::Let, 1), Some(binding));
        // The block is two hops away; a budget of 2 reaches it, 1 does not
        assert_eq!(ast.get_ancestor_within(one, NodeType::Block, 1), None);
        assert_eq!(
            ast.get_ancestor_within(one, NodeType::Block, 2),
            Some(ast.node(binding).parent().unwrap())
        );
    }

    #[test]
    fn root_ancestor_is_farthest() {
        let mut ast = Ast::new();
        let leaf = ast.alloc(NodeKind::Int(1));
        let inner = ast.alloc(NodeKind::Block { stmts: vec![leaf] });
        let outer = ast.alloc(NodeKind::Block { stmts: vec![inner] });
        assert_eq!(ast.get_ancestor(leaf, NodeType::Block), Some(inner));
        assert_eq!(ast.get_root_ancestor(leaf, NodeType::Block), Some(outer));
        let blocks: Vec<NodeId> = ast.ancestors_of_type(leaf, NodeType::Block).collect();
        assert_eq!(blocks, vec![inner, outer]);
    }

    #[test]
    fn get_ancestor_where_predicate() {
        let (ast, _, func, _, _, one) = sample_tree();
        let found = ast.get_ancestor_where(one, |n| {
            matches!(&n.kind, NodeKind::Function { name, .. } if name == "f")
        });
        assert_eq!(found, Some(func));
    }

    #[test]
    fn entity_binding() {
        let mut ast = Ast::new();
        let id = ast.alloc(NodeKind::Ident("x".into()));
        assert!(ast.node(id).entity().is_none());
        ast.node_mut(id).set_entity(Rc::new("local:x".to_string()));
        assert_eq!(
            ast.node(id).entity_as::<String>(),
            Some(&"local:x".to_string())
        );
        ast.node_mut(id).clear_entity();
        assert!(ast.node(id).entity().is_none());
    }

    #[test]
    fn typed_annotations_on_nodes() {
        #[derive(Debug, PartialEq)]
        struct Inferred(&'static str);

        let mut ast = Ast::new();
        let id = ast.alloc(NodeKind::Ident("x".into()));
        assert!(ast.node(id).get_annotation::<Inferred>().is_none());
        assert!(!ast.node(id).has_annotations());
        ast.node_mut(id).set_annotation(Inferred("int"));
        assert_eq!(
            ast.node(id).get_annotation::<Inferred>(),
            Some(&Inferred("int"))
        );
        assert!(ast.node(id).has_annotations());
    }

    #[test]
    fn clear_bindings_resets_store_and_entity() {
        let mut ast = Ast::new();
        let id = ast.alloc(NodeKind::Int(1));
        ast.node_mut(id).annotate_key("folded").unwrap();
        ast.node_mut(id).set_entity(Rc::new(42i32));
        ast.node_mut(id).clear_bindings();
        assert!(!ast.node(id).has_annotations());
        assert!(ast.node(id).entity().is_none());
        // And the key can be inserted again afterwards
        ast.node_mut(id).annotate_key("folded").unwrap();
    }

    #[test]
    fn clone_subtree_is_deep_and_detached() {
        let (mut ast, _, _, _, binding, one) = sample_tree();
        ast.node_mut(binding).annotate_key("checked").unwrap();
        let copy = ast.clone_subtree(binding);
        assert_ne!(copy, binding);
        assert_eq!(ast.node(copy).parent(), None);
        assert!(ast.matches(copy, &ast, binding));
        // Children are copies, not shared
        let copied_init = match &ast.node(copy).kind {
            NodeKind::Let { init, .. } => *init,
            other => panic!("expected let, got {other:?}"),
        };
        assert_ne!(copied_init, one);
        assert_eq!(ast.node(copied_init).parent(), Some(copy));
    }

    #[test]
    fn clone_annotations_are_independent() {
        let mut ast = Ast::new();
        let id = ast.alloc(NodeKind::Int(1));
        ast.node_mut(id).annotate_key("original").unwrap();
        let copy = ast.clone_subtree(id);
        assert!(ast.node(copy).contains_annotation("original"));
        ast.node_mut(copy).annotate_key("copy-only").unwrap();
        ast.node_mut(copy).remove_annotation("original");
        assert!(ast.node(id).contains_annotation("original"));
        assert!(!ast.node(id).contains_annotation("copy-only"));
    }

    #[test]
    fn clean_clone_strips_bindings() {
        let mut ast = Ast::new();
        let leaf = ast.alloc(NodeKind::Int(1));
        let root = ast.alloc(NodeKind::ExprStmt { expr: leaf });
        ast.node_mut(root).annotate_key("checked").unwrap();
        ast.node_mut(leaf).set_entity(Rc::new(1u8));
        ast.node_mut(root).synthetic = true;

        let copy = ast.clean_clone_subtree(root);
        assert!(!ast.node(copy).has_annotations());
        assert!(ast.node(copy).entity().is_none());
        let copied_leaf = match &ast.node(copy).kind {
            NodeKind::ExprStmt { expr } => *expr,
            other => panic!("expected expr statement, got {other:?}"),
        };
        assert!(ast.node(copied_leaf).entity().is_none());
        // Everything else is still carried over
        assert!(ast.node(copy).synthetic);
        assert!(ast.matches(copy, &ast, root));
    }

    #[test]
    fn clone_preserves_span_and_synthetic() {
        let mut ast = Ast::new();
        let id = ast.alloc_at(NodeKind::Bool(true), span(5)).unwrap();
        ast.node_mut(id).synthetic = true;
        ast.node_mut(id).documentation = Some("truth".into());
        let copy = ast.clone_subtree(id);
        assert_eq!(ast.node(copy).own_span(), span(5));
        assert!(ast.node(copy).synthetic);
        assert_eq!(ast.node(copy).documentation.as_deref(), Some("truth"));
    }
}
