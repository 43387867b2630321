// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Concrete node variants.
//!
//! `NodeKind` is the closed set of syntax constructs; child nodes are
//! referenced by id, the [`Ast`](crate::Ast) arena owns the nodes
//! themselves. `NodeType` is the fieldless discriminator used by ancestor
//! queries and dispatch.

use std::fmt;

use crate::NodeId;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Logical not (!)
    Not,
}

/// The concrete variant of a node.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// Compilation-unit root.
    Module { items: Vec<NodeId> },
    /// Function declaration. A missing body declares an external function.
    Function {
        name: String,
        params: Vec<String>,
        body: Option<NodeId>,
    },
    /// Braced statement list.
    Block { stmts: Vec<NodeId> },
    /// Immutable binding.
    Let { name: String, init: NodeId },
    /// Expression evaluated for its effect.
    ExprStmt { expr: NodeId },
    /// Return statement.
    Return { value: Option<NodeId> },
    /// Conditional statement.
    If {
        cond: NodeId,
        then_block: NodeId,
        else_block: Option<NodeId>,
    },
    /// Binary operation.
    Binary {
        op: BinOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    /// Unary operation.
    Unary { op: UnaryOp, operand: NodeId },
    /// Function call.
    Call { callee: NodeId, args: Vec<NodeId> },
    /// Identifier reference.
    Ident(String),
    /// Integer literal.
    Int(i64),
    /// Boolean literal.
    Bool(bool),
    /// String literal.
    Str(String),
}

/// Fieldless discriminator for [`NodeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeType {
    Module,
    Function,
    Block,
    Let,
    ExprStmt,
    Return,
    If,
    Binary,
    Unary,
    Call,
    Ident,
    Int,
    Bool,
    Str,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Module => "module",
            NodeType::Function => "function",
            NodeType::Block => "block",
            NodeType::Let => "let",
            NodeType::ExprStmt => "expression statement",
            NodeType::Return => "return",
            NodeType::If => "if",
            NodeType::Binary => "binary operation",
            NodeType::Unary => "unary operation",
            NodeType::Call => "call",
            NodeType::Ident => "identifier",
            NodeType::Int => "integer literal",
            NodeType::Bool => "boolean literal",
            NodeType::Str => "string literal",
        };
        write!(f, "{name}")
    }
}

impl NodeKind {
    /// The discriminator for this variant.
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Module { .. } => NodeType::Module,
            NodeKind::Function { .. } => NodeType::Function,
            NodeKind::Block { .. } => NodeType::Block,
            NodeKind::Let { .. } => NodeType::Let,
            NodeKind::ExprStmt { .. } => NodeType::ExprStmt,
            NodeKind::Return { .. } => NodeType::Return,
            NodeKind::If { .. } => NodeType::If,
            NodeKind::Binary { .. } => NodeType::Binary,
            NodeKind::Unary { .. } => NodeType::Unary,
            NodeKind::Call { .. } => NodeType::Call,
            NodeKind::Ident(_) => NodeType::Ident,
            NodeKind::Int(_) => NodeType::Int,
            NodeKind::Bool(_) => NodeType::Bool,
            NodeKind::Str(_) => NodeType::Str,
        }
    }

    /// Child ids in source order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Module { items } => items.clone(),
            NodeKind::Function { body, .. } => body.iter().copied().collect(),
            NodeKind::Block { stmts } => stmts.clone(),
            NodeKind::Let { init, .. } => vec![*init],
            NodeKind::ExprStmt { expr } => vec![*expr],
            NodeKind::Return { value } => value.iter().copied().collect(),
            NodeKind::If {
                cond,
                then_block,
                else_block,
            } => {
                let mut out = vec![*cond, *then_block];
                out.extend(else_block.iter().copied());
                out
            }
            NodeKind::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            NodeKind::Unary { operand, .. } => vec![*operand],
            NodeKind::Call { callee, args } => {
                let mut out = vec![*callee];
                out.extend(args.iter().copied());
                out
            }
            NodeKind::Ident(_) | NodeKind::Int(_) | NodeKind::Bool(_) | NodeKind::Str(_) => {
                Vec::new()
            }
        }
    }

    /// Mutable references to every child slot, in source order. The rewrite
    /// engine substitutes subtrees by writing to these slots.
    pub(crate) fn child_slots(&mut self) -> Vec<&mut NodeId> {
        match self {
            NodeKind::Module { items } => items.iter_mut().collect(),
            NodeKind::Function { body, .. } => body.iter_mut().collect(),
            NodeKind::Block { stmts } => stmts.iter_mut().collect(),
            NodeKind::Let { init, .. } => vec![init],
            NodeKind::ExprStmt { expr } => vec![expr],
            NodeKind::Return { value } => value.iter_mut().collect(),
            NodeKind::If {
                cond,
                then_block,
                else_block,
            } => {
                let mut slots: Vec<&mut NodeId> = vec![cond, then_block];
                slots.extend(else_block.iter_mut());
                slots
            }
            NodeKind::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            NodeKind::Unary { operand, .. } => vec![operand],
            NodeKind::Call { callee, args } => {
                let mut slots: Vec<&mut NodeId> = vec![callee];
                slots.extend(args.iter_mut());
                slots
            }
            NodeKind::Ident(_) | NodeKind::Int(_) | NodeKind::Bool(_) | NodeKind::Str(_) => {
                Vec::new()
            }
        }
    }
}
