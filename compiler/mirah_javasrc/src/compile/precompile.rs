//! Expression capability and operand normalization.

use mirah_ir::{JvmType, NodeId, NodeKind, Receiver};

use super::{value_type, Dest, JavaSourceCompiler};
use crate::error::CompileResult;

/// A temp (or existing local) holding an already computed value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TempValue {
    /// Identifier the value is bound to.
    pub name: String,
    /// Node whose value the temp holds; `None` when it aliases a local.
    pub source: Option<NodeId>,
}

impl TempValue {
    /// Re-evaluate the source node into the temp.
    pub fn reload(&self, compiler: &mut JavaSourceCompiler<'_>) -> CompileResult<()> {
        match self.source {
            Some(source) => compiler.statement(source, &Dest::store(format!("{} = ", self.name))),
            None => Ok(()),
        }
    }
}

/// A node ready to be used in expression position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    /// The node itself renders as a Java expression.
    Node(NodeId),
    /// The node's value was computed into a temp.
    Temp(TempValue),
}

impl JavaSourceCompiler<'_> {
    /// Whether the node can be written as a single Java expression.
    pub fn is_expression_capable(&self, id: NodeId) -> bool {
        let capable = |id: &NodeId| self.is_expression_capable(*id);
        match self.arena.kind(id) {
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
            | NodeKind::FieldAccess { .. } => true,
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                capable(cond)
                    && then_branch.as_ref().map_or(true, capable)
                    && else_branch.as_ref().map_or(true, capable)
            }
            NodeKind::Body(_)
            | NodeKind::Loop(_)
            | NodeKind::ForEach(_)
            | NodeKind::Break
            | NodeKind::Next
            | NodeKind::Redo
            | NodeKind::Return(_)
            | NodeKind::Raise(_)
            | NodeKind::Rescue { .. }
            | NodeKind::Ensure { .. }
            | NodeKind::Print { .. }
            | NodeKind::FieldAssign { .. } => false,
            NodeKind::Call {
                receiver,
                args,
                returns,
                ..
            } => {
                let receiver_ok = match receiver {
                    Receiver::Implicit | Receiver::Static(_) => true,
                    Receiver::Expr(target) => capable(target),
                };
                !returns.is_void() && receiver_ok && args.iter().all(capable)
            }
            NodeKind::LocalAssign { name, value } => self.is_local(name) && capable(value),
            NodeKind::Binary { left, right, .. } => capable(left) && capable(right),
            NodeKind::Unary { operand: inner, .. }
            | NodeKind::IsNull(inner)
            | NodeKind::InstanceOf { value: inner, .. }
            | NodeKind::Cast { value: inner, .. }
            | NodeKind::EmptyArray { size: inner, .. } => capable(inner),
            NodeKind::StringConcat(nodes) | NodeKind::New { args: nodes, .. } => {
                nodes.iter().all(capable)
            }
        }
    }

    /// Make the node usable in expression position.
    ///
    /// Capable nodes come back unchanged; anything else is compiled now, in
    /// statement position, and its value left in a temp.
    pub fn precompile(&mut self, id: NodeId) -> CompileResult<Operand> {
        if self.is_expression_capable(id) {
            Ok(Operand::Node(id))
        } else {
            self.spill(id).map(Operand::Temp)
        }
    }

    /// Expression text for a precompiled operand.
    pub fn operand_text(&mut self, operand: &Operand) -> CompileResult<String> {
        match operand {
            Operand::Node(id) => self.render_value(*id),
            Operand::Temp(temp) => Ok(temp.name.clone()),
        }
    }

    /// Compile a non-capable node into a temp.
    pub(super) fn spill(&mut self, id: NodeId) -> CompileResult<TempValue> {
        let arena = self.arena;
        match arena.kind(id) {
            NodeKind::Loop(_) | NodeKind::ForEach(_) => {
                self.statement(id, &Dest::Discard)?;
                let name = self.method()?.new_temp_with(&JvmType::object(), "null");
                Ok(TempValue { name, source: None })
            }
            NodeKind::LocalAssign { name, .. } => {
                self.statement(id, &Dest::Discard)?;
                Ok(TempValue {
                    name: name.clone(),
                    source: None,
                })
            }
            _ => {
                let ty = value_type(arena.ty(id));
                let name = self.method()?.new_temp(&ty);
                self.statement(id, &Dest::store(format!("{name} = ")))?;
                Ok(TempValue {
                    name,
                    source: Some(id),
                })
            }
        }
    }

    /// Evaluate the node into a temp now, capable or not.
    pub(super) fn evaluate_to_temp(&mut self, id: NodeId) -> CompileResult<TempValue> {
        if !self.is_expression_capable(id) {
            return self.spill(id);
        }
        let ty = value_type(self.arena.ty(id));
        let init = self.render_value(id)?;
        let name = self.method()?.new_temp_with(&ty, &init);
        Ok(TempValue {
            name,
            source: Some(id),
        })
    }

    /// Expression text for each operand of a composite, left to right.
    ///
    /// If any operand needs statements, every operand that could observe
    /// them is evaluated into a temp first so the operands still run in
    /// source order.
    pub(super) fn operands(&mut self, ids: &[NodeId]) -> CompileResult<Vec<String>> {
        if ids.iter().all(|id| self.is_expression_capable(*id)) {
            return ids.iter().map(|id| self.render_value(*id)).collect();
        }
        let arena = self.arena;
        let mut values = Vec::with_capacity(ids.len());
        for &id in ids {
            let kind = arena.kind(id);
            let value = if kind.is_literal() || matches!(kind, NodeKind::SelfRef) {
                self.render_value(id)?
            } else {
                self.evaluate_to_temp(id)?.name
            };
            values.push(value);
        }
        Ok(values)
    }
}
