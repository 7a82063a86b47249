//! Flat storage for tree nodes.

use super::{Node, NodeId, NodeKind};
use crate::types::JvmType;

/// Owns every node of a compilation unit.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id.
    pub fn alloc(&mut self, kind: NodeKind, ty: JvmType) -> NodeId {
        let index = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        self.nodes.push(Node { kind, ty });
        NodeId::new(index)
    }

    /// Get a node by id.
    ///
    /// Ids are only produced by [`NodeArena::alloc`], so a missing node is a
    /// caller bug.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.get(id).kind
    }

    #[inline]
    pub fn ty(&self, id: NodeId) -> &JvmType {
        &self.get(id).ty
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // Shorthands used by front ends and tests.

    pub fn int(&mut self, value: i32) -> NodeId {
        self.alloc(NodeKind::Int(value), JvmType::Int)
    }

    pub fn bool(&mut self, value: bool) -> NodeId {
        self.alloc(NodeKind::Bool(value), JvmType::Boolean)
    }

    pub fn string(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Str(value.into()), JvmType::string())
    }

    pub fn null(&mut self) -> NodeId {
        self.alloc(NodeKind::Null, JvmType::object())
    }

    pub fn local(&mut self, name: impl Into<String>, ty: JvmType) -> NodeId {
        self.alloc(NodeKind::Local(name.into()), ty)
    }

    pub fn body(&mut self, nodes: Vec<NodeId>, ty: JvmType) -> NodeId {
        self.alloc(NodeKind::Body(nodes), ty)
    }
}
