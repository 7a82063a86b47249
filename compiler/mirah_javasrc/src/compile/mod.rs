//! Per-node compilation into Java statements and expressions.
//!
//! Java only accepts a small subset of constructs in expression position,
//! while Mirah lets conditionals, loops and exception handling appear
//! anywhere a value is expected. Every node is compiled in one of two ways:
//!
//! - [`JavaSourceCompiler::expression`] returns Java expression text for the
//!   node's value, first emitting whatever statements it needs
//!   (see [`precompile`](JavaSourceCompiler::precompile)).
//! - [`JavaSourceCompiler::statement`] emits the node as statements, and
//!   stores its value according to a [`Dest`].
//!
//! Loop lowering lives in `loops`, the declaration-level driver in `unit`.

mod loops;
mod precompile;
mod unit;

pub use loops::LoopStrategy;
pub use precompile::{Operand, TempValue};
pub use unit::compile_unit;

use mirah_ir::{BinaryOp, JvmType, NodeArena, NodeId, NodeKind, Receiver, RescueClause};

use crate::builder::{ClassBuilder, MethodBuilder, MethodId};
use crate::error::{CompileError, CompileResult};
use crate::literal;

use loops::{ActiveLoop, LoopControl};

/// What to do with the value of a statement-position node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dest {
    /// The value is not needed.
    Discard,
    /// Emit `<prefix><value>;`, e.g. `temp$3 = `, `return ` or `throw `.
    Store(String),
}

impl Dest {
    pub fn store(prefix: impl Into<String>) -> Self {
        Dest::Store(prefix.into())
    }

    pub fn wants_value(&self) -> bool {
        matches!(self, Dest::Store(_))
    }
}

/// Compiles method bodies of one class into its method builders.
pub struct JavaSourceCompiler<'a> {
    arena: &'a NodeArena,
    class: &'a mut ClassBuilder,
    method: MethodId,
    is_static: bool,
    /// Enclosing loops, innermost last.
    loops: Vec<ActiveLoop>,
}

/// Type used to hold a node's value in a temp. `void` values are `null`.
fn value_type(ty: &JvmType) -> JvmType {
    if ty.is_void() {
        JvmType::object()
    } else {
        ty.clone()
    }
}

/// Strip one pair of parentheses enclosing the whole expression.
pub(crate) fn unwrap_parens(text: &str) -> &str {
    let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) else {
        return text;
    };
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in inner.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return text;
                }
            }
            _ => {}
        }
    }
    if depth == 0 {
        inner
    } else {
        text
    }
}

impl<'a> JavaSourceCompiler<'a> {
    /// Compiler for the body of `method`, which must belong to `class`.
    pub fn new(
        arena: &'a NodeArena,
        class: &'a mut ClassBuilder,
        method: MethodId,
    ) -> CompileResult<Self> {
        let is_static = class
            .method(method)
            .ok_or_else(|| CompileError::Internal(format!("unknown method {method:?}")))?
            .is_static();
        Ok(Self {
            arena,
            class,
            method,
            is_static,
            loops: Vec::new(),
        })
    }

    /// The method being compiled.
    pub fn method(&mut self) -> CompileResult<&mut MethodBuilder> {
        let id = self.method;
        self.class
            .method_mut(id)
            .ok_or_else(|| CompileError::Internal(format!("unknown method {id:?}")))
    }

    fn method_ref(&self) -> Option<&MethodBuilder> {
        self.class.method(self.method)
    }

    fn puts(&mut self, line: &str) -> CompileResult<()> {
        self.method()?.puts(line);
        Ok(())
    }

    fn is_local(&self, name: &str) -> bool {
        self.method_ref().is_some_and(|m| m.is_local(name))
    }

    /// Run `f` with `name` known as a local of type `ty`, declared by the
    /// enclosing Java block (catch parameter, for-each variable). The name is
    /// forgotten again when `f` returns.
    fn scoped_local<F>(&mut self, name: &str, ty: &JvmType, f: F) -> CompileResult<()>
    where
        F: FnOnce(&mut Self) -> CompileResult<()>,
    {
        let reserved = self.method()?.reserve_local(ty, name);
        let result = f(self);
        if reserved {
            self.method()?.release_local(name);
        }
        result
    }

    /// Compile a node; with `wants_value`, return its value as an expression.
    pub fn compile(&mut self, id: NodeId, wants_value: bool) -> CompileResult<Option<String>> {
        if wants_value {
            self.expression(id).map(Some)
        } else {
            self.statement(id, &Dest::Discard).map(|()| None)
        }
    }

    /// Java expression for the node's value.
    ///
    /// Composite expressions stay inline even when some operand is not an
    /// expression: the operands are evaluated into temps first. Anything
    /// else that is not expression-capable is evaluated into a temp.
    pub fn expression(&mut self, id: NodeId) -> CompileResult<String> {
        if self.is_expression_capable(id) || self.is_composite(id) {
            self.render_value(id)
        } else {
            Ok(self.spill(id)?.name)
        }
    }

    fn is_composite(&self, id: NodeId) -> bool {
        match self.arena.kind(id) {
            NodeKind::Binary { op, .. } => !matches!(op, BinaryOp::And | BinaryOp::Or),
            NodeKind::Call { returns, .. } => !returns.is_void(),
            NodeKind::Unary { .. }
            | NodeKind::IsNull(_)
            | NodeKind::InstanceOf { .. }
            | NodeKind::Cast { .. }
            | NodeKind::StringConcat(_)
            | NodeKind::EmptyArray { .. }
            | NodeKind::New { .. } => true,
            _ => false,
        }
    }

    fn implicit_receiver(&self) -> String {
        if self.is_static {
            self.class.simple_name().to_string()
        } else {
            "this".to_string()
        }
    }

    fn field_target(&self, name: &str, is_static: bool) -> String {
        if is_static {
            format!("{}.{name}", self.class.simple_name())
        } else {
            format!("this.{name}")
        }
    }

    /// Render a value node as an expression.
    fn render_value(&mut self, id: NodeId) -> CompileResult<String> {
        let arena = self.arena;
        let ty = arena.ty(id);
        let text = match arena.kind(id) {
            NodeKind::Null => "null".to_string(),
            NodeKind::Bool(value) => value.to_string(),
            NodeKind::Int(value) => literal::int(*value),
            NodeKind::Long(value) => literal::long(*value),
            NodeKind::Float(bits) => literal::float(f32::from_bits(*bits)),
            NodeKind::Double(bits) => literal::double(f64::from_bits(*bits)),
            NodeKind::Char(value) => literal::quote_char(*value),
            NodeKind::Str(value) => literal::quote_string(value),
            NodeKind::ClassLiteral(class) => literal::class(class),
            NodeKind::SelfRef => "this".to_string(),
            NodeKind::Local(name) => name.clone(),
            NodeKind::FieldAccess { name, is_static } => {
                self.class.declare_field(name, ty, *is_static, &[]);
                self.field_target(name, *is_static)
            }
            NodeKind::LocalAssign { name, value } => {
                if self.is_local(name) {
                    let value = self.expression(*value)?;
                    format!("({name} = {value})")
                } else {
                    self.spill(id)?.name
                }
            }
            NodeKind::Call {
                receiver,
                method,
                args,
                returns,
            } => {
                if returns.is_void() {
                    self.spill(id)?.name
                } else {
                    self.render_call(receiver, method, args)?
                }
            }
            NodeKind::New { class, args } => {
                let args = self.operands(args)?;
                format!("new {}({})", class.to_source(), args.join(", "))
            }
            NodeKind::Binary { op, left, right } => {
                if matches!(op, BinaryOp::And | BinaryOp::Or) && !self.is_expression_capable(id) {
                    self.spill(id)?.name
                } else {
                    let values = self.operands(&[*left, *right])?;
                    format!("({} {} {})", values[0], op.as_symbol(), values[1])
                }
            }
            NodeKind::Unary { op, operand } => {
                let value = self.expression(*operand)?;
                format!("{}({})", op.as_symbol(), unwrap_parens(&value))
            }
            NodeKind::IsNull(value) => {
                let value = self.expression(*value)?;
                format!("({value} == null)")
            }
            NodeKind::InstanceOf { value, class } => {
                let value = self.expression(*value)?;
                format!("({value} instanceof {})", class.to_source())
            }
            NodeKind::Cast { target, value } => {
                let value = self.expression(*value)?;
                format!("(({})({}))", target.to_source(), unwrap_parens(&value))
            }
            NodeKind::StringConcat(parts) => {
                let values = self.operands(parts)?;
                let starts_with_string = parts
                    .first()
                    .is_some_and(|first| matches!(arena.kind(*first), NodeKind::Str(_)));
                if values.is_empty() {
                    "\"\"".to_string()
                } else if starts_with_string {
                    format!("({})", values.join(" + "))
                } else {
                    format!("(\"\" + {})", values.join(" + "))
                }
            }
            NodeKind::EmptyArray { component, size } => {
                let size = self.expression(*size)?;
                let mut base = component;
                let mut dims = String::new();
                while let Some(inner) = base.component_type() {
                    dims.push_str("[]");
                    base = inner;
                }
                format!("new {}[{}]{dims}", base.to_source(), unwrap_parens(&size))
            }
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.is_expression_capable(id) {
                    let cond = self.render_value(*cond)?;
                    let then_value = self.arm_value(*then_branch, ty)?;
                    let else_value = self.arm_value(*else_branch, ty)?;
                    format!("({cond} ? {then_value} : {else_value})")
                } else {
                    self.spill(id)?.name
                }
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
            | NodeKind::FieldAssign { .. } => self.spill(id)?.name,
        };
        Ok(text)
    }

    fn arm_value(&mut self, arm: Option<NodeId>, ty: &JvmType) -> CompileResult<String> {
        match arm {
            Some(arm) => self.render_value(arm),
            None => Ok(value_type(ty).default_value().to_string()),
        }
    }

    fn render_call(
        &mut self,
        receiver: &Receiver,
        method: &str,
        args: &[NodeId],
    ) -> CompileResult<String> {
        let mut ids = Vec::with_capacity(args.len() + 1);
        if let Receiver::Expr(target) = receiver {
            ids.push(*target);
        }
        ids.extend_from_slice(args);
        let mut values = self.operands(&ids)?;
        let target = match receiver {
            Receiver::Implicit => self.implicit_receiver(),
            Receiver::Static(ty) => ty.to_source(),
            Receiver::Expr(_) => values.remove(0),
        };
        Ok(format!("{target}.{method}({})", values.join(", ")))
    }

    /// Emit the node as statements, storing its value into `dest`.
    pub fn statement(&mut self, id: NodeId, dest: &Dest) -> CompileResult<()> {
        let arena = self.arena;
        match arena.kind(id) {
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
            | NodeKind::Unary { .. }
            | NodeKind::IsNull(_)
            | NodeKind::InstanceOf { .. }
            | NodeKind::Cast { .. }
            | NodeKind::StringConcat(_)
            | NodeKind::EmptyArray { .. } => self.store_value(id, dest),
            NodeKind::Binary { op, left, right } => match op {
                BinaryOp::And | BinaryOp::Or => self.logical(*op, *left, *right, dest),
                _ => self.store_value(id, dest),
            },
            NodeKind::LocalAssign { name, value } => self.local_assign(id, name, *value, dest),
            NodeKind::FieldAssign {
                name,
                value,
                is_static,
            } => {
                self.class
                    .declare_field(name, &value_type(arena.ty(id)), *is_static, &[]);
                let value = self.expression(*value)?;
                let target = self.field_target(name, *is_static);
                self.puts(&format!("{target} = {value};"))?;
                self.store_text(&target, dest)
            }
            NodeKind::Call {
                receiver,
                method,
                args,
                returns,
            } => self.call_statement(receiver, method, args, returns, dest),
            NodeKind::New { .. } => {
                let value = self.render_value(id)?;
                match dest {
                    Dest::Discard => self.puts(&format!("{value};")),
                    Dest::Store(prefix) => self.puts(&format!("{prefix}{value};")),
                }
            }
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.expression(*cond)?;
                let ty = value_type(arena.ty(id));
                self.method()?
                    .open_block(&format!("if ({})", unwrap_parens(&cond)));
                self.branch(*then_branch, dest, &ty)?;
                if else_branch.is_some() || dest.wants_value() {
                    self.method()?.next_block("else");
                    self.branch(*else_branch, dest, &ty)?;
                }
                self.method()?.close_block();
                Ok(())
            }
            NodeKind::Body(nodes) => match nodes.split_last() {
                Some((last, init)) => {
                    for node in init {
                        self.statement(*node, &Dest::Discard)?;
                    }
                    self.statement(*last, dest)
                }
                None => self.store_text(value_type(arena.ty(id)).default_value(), dest),
            },
            NodeKind::Loop(spec) => {
                self.while_loop(spec)?;
                self.store_text("null", dest)
            }
            NodeKind::ForEach(each) => {
                self.for_each(each)?;
                self.store_text("null", dest)
            }
            NodeKind::Break => self.loop_control(LoopControl::Break),
            NodeKind::Next => self.loop_control(LoopControl::Next),
            NodeKind::Redo => self.loop_control(LoopControl::Redo),
            NodeKind::Return(value) => self.return_statement(*value),
            NodeKind::Raise(value) => {
                if self.is_expression_capable(*value) {
                    let value = self.render_value(*value)?;
                    self.puts(&format!("throw {value};"))
                } else {
                    self.statement(*value, &Dest::store("throw "))
                }
            }
            NodeKind::Rescue {
                body,
                clauses,
                else_branch,
            } => self.rescue(id, *body, clauses, *else_branch, dest),
            NodeKind::Ensure { body, clause } => {
                self.method()?.open_block("try");
                self.statement(*body, dest)?;
                self.method()?.next_block("finally");
                self.statement(*clause, &Dest::Discard)?;
                self.method()?.close_block();
                Ok(())
            }
            NodeKind::Print { value, newline } => {
                let method = if *newline { "println" } else { "print" };
                let value = match value {
                    Some(value) => self.expression(*value)?,
                    None => String::new(),
                };
                self.puts(&format!("System.out.{method}({value});"))?;
                self.store_text("null", dest)
            }
        }
    }

    /// `<prefix><text>;` when a value is wanted.
    fn store_text(&mut self, text: &str, dest: &Dest) -> CompileResult<()> {
        match dest {
            Dest::Discard => Ok(()),
            Dest::Store(prefix) => self.puts(&format!("{prefix}{text};")),
        }
    }

    /// Pure value kinds. Discarded ones still evaluate their operands.
    fn store_value(&mut self, id: NodeId, dest: &Dest) -> CompileResult<()> {
        match dest {
            Dest::Store(_) => {
                let value = self.render_value(id)?;
                self.store_text(&value, dest)
            }
            Dest::Discard => {
                for child in self.arena.kind(id).children() {
                    self.statement(child, &Dest::Discard)?;
                }
                Ok(())
            }
        }
    }

    fn branch(&mut self, node: Option<NodeId>, dest: &Dest, ty: &JvmType) -> CompileResult<()> {
        match node {
            Some(node) => self.statement(node, dest),
            None => self.store_text(ty.default_value(), dest),
        }
    }

    /// `&&` / `||` whose right operand needs statements: lowered to `if` so
    /// the right side still only runs when needed.
    fn logical(
        &mut self,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
        dest: &Dest,
    ) -> CompileResult<()> {
        let left = self.expression(left)?;
        let left = unwrap_parens(&left);
        let is_and = op == BinaryOp::And;
        if dest.wants_value() {
            self.method()?.open_block(&format!("if ({left})"));
            if is_and {
                self.statement(right, dest)?;
                self.method()?.next_block("else");
                self.store_text("false", dest)?;
            } else {
                self.store_text("true", dest)?;
                self.method()?.next_block("else");
                self.statement(right, dest)?;
            }
        } else {
            let test = if is_and {
                format!("if ({left})")
            } else {
                format!("if (!({left}))")
            };
            self.method()?.open_block(&test);
            self.statement(right, dest)?;
        }
        self.method()?.close_block();
        Ok(())
    }

    fn local_assign(
        &mut self,
        id: NodeId,
        name: &str,
        value: NodeId,
        dest: &Dest,
    ) -> CompileResult<()> {
        let value = self.expression(value)?;
        if self.is_local(name) {
            self.puts(&format!("{name} = {value};"))?;
        } else {
            let ty = value_type(self.arena.ty(id));
            self.method()?.declare_local(&ty, name, Some(&value));
        }
        self.store_text(name, dest)
    }

    fn call_statement(
        &mut self,
        receiver: &Receiver,
        method: &str,
        args: &[NodeId],
        returns: &JvmType,
        dest: &Dest,
    ) -> CompileResult<()> {
        if !returns.is_void() || !dest.wants_value() {
            let call = self.render_call(receiver, method, args)?;
            return match dest {
                Dest::Discard => self.puts(&format!("{call};")),
                Dest::Store(prefix) => self.puts(&format!("{prefix}{call};")),
            };
        }

        // A void call's value is its receiver, which must only be evaluated once.
        let (target, value) = match receiver {
            Receiver::Implicit => {
                let target = self.implicit_receiver();
                let value = if self.is_static { "null".to_string() } else { "this".to_string() };
                (target, value)
            }
            Receiver::Static(ty) => (ty.to_source(), "null".to_string()),
            Receiver::Expr(target) => {
                let arena = self.arena;
                let target = match arena.kind(*target) {
                    NodeKind::Local(_) | NodeKind::SelfRef => self.render_value(*target)?,
                    _ => self.evaluate_to_temp(*target)?.name,
                };
                (target.clone(), target)
            }
        };
        let args = self.operands(args)?;
        self.puts(&format!("{target}.{method}({});", args.join(", ")))?;
        self.store_text(&value, dest)
    }

    /// `return` of the method's value, or a bare `return;` in void methods.
    pub fn return_statement(&mut self, value: Option<NodeId>) -> CompileResult<()> {
        let returns_void = self.method()?.returns().is_void();
        match value {
            None => self.puts("return;"),
            Some(value) if returns_void => {
                self.statement(value, &Dest::Discard)?;
                self.puts("return;")
            }
            Some(value) if self.is_expression_capable(value) => {
                let value = self.render_value(value)?;
                self.puts(&format!("return {value};"))
            }
            Some(value) => self.statement(value, &Dest::store("return ")),
        }
    }

    fn rescue(
        &mut self,
        id: NodeId,
        body: Option<NodeId>,
        clauses: &[RescueClause],
        else_branch: Option<NodeId>,
        dest: &Dest,
    ) -> CompileResult<()> {
        let ty = value_type(self.arena.ty(id));
        let body_dest = if else_branch.is_some() {
            Dest::Discard
        } else {
            dest.clone()
        };

        if clauses.is_empty() {
            self.branch(body, &body_dest, &ty)?;
            if let Some(else_branch) = else_branch {
                self.statement(else_branch, dest)?;
            }
            return Ok(());
        }

        self.method()?.open_block("try");
        self.branch(body, &body_dest, &ty)?;
        if let Some(else_branch) = else_branch {
            self.statement(else_branch, dest)?;
        }
        for clause in clauses {
            let types = if clause.types.is_empty() {
                vec![JvmType::reference("java.lang.Exception")]
            } else {
                clause.types.clone()
            };
            // A catch parameter only lives in its own block. A name that is
            // already a method local can't be redeclared; catch into a fresh
            // name and assign it.
            let rebind = clause.name.as_deref().filter(|name| self.is_local(name));
            for exception in &types {
                match (&clause.name, rebind) {
                    (Some(name), None) => {
                        self.method()?
                            .next_block(&format!("catch ({} {name})", exception.to_source()));
                        self.scoped_local(name, exception, |c| {
                            c.branch(clause.body, dest, &ty)
                        })?;
                    }
                    (_, rebind) => {
                        let var = self.method()?.fresh_name();
                        self.method()?
                            .next_block(&format!("catch ({} {var})", exception.to_source()));
                        if let Some(local) = rebind {
                            self.puts(&format!("{local} = {var};"))?;
                        }
                        self.branch(clause.body, dest, &ty)?;
                    }
                }
            }
        }
        self.method()?.close_block();
        Ok(())
    }
}
