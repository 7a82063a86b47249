//! Typed tree nodes.
//!
//! Nodes live in a flat [`NodeArena`] and refer to each other by [`NodeId`].
//! Every node carries the type the inference engine assigned to it.
//! [`NodeKind`] is closed: a backend matches on it exhaustively, so adding a
//! node kind is a compile error in every backend until it is handled.

mod arena;
mod loops;
mod operators;

use std::fmt;

pub use arena::NodeArena;
pub use loops::{ForEachLoop, LoopSpec};
pub use operators::{BinaryOp, UnaryOp};

use crate::types::JvmType;

/// Index into a [`NodeArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a new `NodeId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A typed tree node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Inferred type of the value this node produces.
    pub ty: JvmType,
}

/// Who a call is sent to.
#[derive(Clone, Debug, PartialEq)]
pub enum Receiver {
    /// Unqualified call on the current object (or class, in static code).
    Implicit,
    /// Static call on a named type.
    Static(JvmType),
    /// Call on the value of an expression.
    Expr(NodeId),
}

/// One `rescue` clause: the exception types it catches, the optional name
/// the exception is bound to, and its body.
#[derive(Clone, Debug, PartialEq)]
pub struct RescueClause {
    pub types: Vec<JvmType>,
    pub name: Option<String>,
    pub body: Option<NodeId>,
}

/// Node kinds understood by the backends.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    // Literals
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    /// Stored as bits so nodes stay `Eq`-comparable.
    Float(u32),
    Double(u64),
    Char(char),
    Str(String),
    /// `Foo.class`
    ClassLiteral(JvmType),

    // Names
    SelfRef,
    Local(String),
    LocalAssign {
        name: String,
        value: NodeId,
    },
    FieldAccess {
        name: String,
        is_static: bool,
    },
    FieldAssign {
        name: String,
        value: NodeId,
        is_static: bool,
    },

    // Calls and operators
    Call {
        receiver: Receiver,
        method: String,
        args: Vec<NodeId>,
        /// Return type of the resolved target. `void` targets still have a
        /// value in Mirah: the receiver.
        returns: JvmType,
    },
    New {
        class: JvmType,
        args: Vec<NodeId>,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    IsNull(NodeId),
    InstanceOf {
        value: NodeId,
        class: JvmType,
    },
    Cast {
        target: JvmType,
        value: NodeId,
    },
    StringConcat(Vec<NodeId>),
    EmptyArray {
        component: JvmType,
        size: NodeId,
    },

    // Control flow
    If {
        cond: NodeId,
        then_branch: Option<NodeId>,
        else_branch: Option<NodeId>,
    },
    Body(Vec<NodeId>),
    Loop(LoopSpec),
    ForEach(ForEachLoop),
    Break,
    Next,
    Redo,
    Return(Option<NodeId>),
    Raise(NodeId),
    Rescue {
        body: Option<NodeId>,
        clauses: Vec<RescueClause>,
        else_branch: Option<NodeId>,
    },
    Ensure {
        body: NodeId,
        clause: NodeId,
    },
    Print {
        value: Option<NodeId>,
        newline: bool,
    },
}

impl NodeKind {
    /// Short name for diagnostics and tracing.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Null => "null",
            NodeKind::Bool(_) => "bool",
            NodeKind::Int(_) => "int",
            NodeKind::Long(_) => "long",
            NodeKind::Float(_) => "float",
            NodeKind::Double(_) => "double",
            NodeKind::Char(_) => "char",
            NodeKind::Str(_) => "string",
            NodeKind::ClassLiteral(_) => "class literal",
            NodeKind::SelfRef => "self",
            NodeKind::Local(_) => "local",
            NodeKind::LocalAssign { .. } => "local assignment",
            NodeKind::FieldAccess { .. } => "field access",
            NodeKind::FieldAssign { .. } => "field assignment",
            NodeKind::Call { .. } => "call",
            NodeKind::New { .. } => "new",
            NodeKind::Binary { .. } => "binary",
            NodeKind::Unary { .. } => "unary",
            NodeKind::IsNull(_) => "nil?",
            NodeKind::InstanceOf { .. } => "instanceof",
            NodeKind::Cast { .. } => "cast",
            NodeKind::StringConcat(_) => "string concat",
            NodeKind::EmptyArray { .. } => "empty array",
            NodeKind::If { .. } => "if",
            NodeKind::Body(_) => "body",
            NodeKind::Loop(_) => "loop",
            NodeKind::ForEach(_) => "for-each",
            NodeKind::Break => "break",
            NodeKind::Next => "next",
            NodeKind::Redo => "redo",
            NodeKind::Return(_) => "return",
            NodeKind::Raise(_) => "raise",
            NodeKind::Rescue { .. } => "rescue",
            NodeKind::Ensure { .. } => "ensure",
            NodeKind::Print { .. } => "print",
        }
    }

    /// Direct child nodes, in evaluation order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Null
            | NodeKind::Bool(_)
            | NodeKind::Int(_)
            | NodeKind::Long(_)
            | NodeKind::Float(_)
            | NodeKind::Double(_)
            | NodeKind::Char(_)
            | NodeKind::Str(_)
            | NodeKind::ClassLiteral(_)
            | NodeKind::SelfRef
            | NodeKind::Local(_)
            | NodeKind::FieldAccess { .. }
            | NodeKind::Break
            | NodeKind::Next
            | NodeKind::Redo
            | NodeKind::Return(None)
            | NodeKind::Print { value: None, .. } => Vec::new(),
            NodeKind::LocalAssign { value, .. }
            | NodeKind::FieldAssign { value, .. }
            | NodeKind::InstanceOf { value, .. }
            | NodeKind::Cast { value, .. }
            | NodeKind::Print {
                value: Some(value), ..
            } => vec![*value],
            NodeKind::Unary { operand, .. } => vec![*operand],
            NodeKind::IsNull(inner) | NodeKind::Raise(inner) | NodeKind::Return(Some(inner)) => {
                vec![*inner]
            }
            NodeKind::EmptyArray { size, .. } => vec![*size],
            NodeKind::Call { receiver, args, .. } => {
                let mut out = Vec::with_capacity(args.len() + 1);
                if let Receiver::Expr(target) = receiver {
                    out.push(*target);
                }
                out.extend_from_slice(args);
                out
            }
            NodeKind::New { args, .. } => args.clone(),
            NodeKind::Binary { left, right, .. } => vec![*left, *right],
            NodeKind::StringConcat(parts) | NodeKind::Body(parts) => parts.clone(),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => std::iter::once(*cond)
                .chain(*then_branch)
                .chain(*else_branch)
                .collect(),
            NodeKind::Loop(spec) => spec
                .init
                .into_iter()
                .chain(std::iter::once(spec.cond))
                .chain(spec.pre)
                .chain(spec.body)
                .chain(spec.post)
                .collect(),
            NodeKind::ForEach(each) => std::iter::once(each.iterable).chain(each.body).collect(),
            NodeKind::Rescue {
                body,
                clauses,
                else_branch,
            } => body
                .iter()
                .copied()
                .chain(clauses.iter().filter_map(|clause| clause.body))
                .chain(*else_branch)
                .collect(),
            NodeKind::Ensure { body, clause } => vec![*body, *clause],
        }
    }

    /// True for plain literal values.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            NodeKind::Null
                | NodeKind::Bool(_)
                | NodeKind::Int(_)
                | NodeKind::Long(_)
                | NodeKind::Float(_)
                | NodeKind::Double(_)
                | NodeKind::Char(_)
                | NodeKind::Str(_)
                | NodeKind::ClassLiteral(_)
        )
    }
}

#[cfg(test)]
mod tests;
