//! Method builder: one method's signature, body text and local scope.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::trace;

use mirah_ir::{JvmType, Param};

use crate::error::{CompileError, CompileResult};
use crate::literal;
use crate::output::Output;

/// Index of a method within its [`ClassBuilder`](super::ClassBuilder).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct MethodId(u32);

impl MethodId {
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        MethodId(u32::try_from(index).unwrap_or(u32::MAX))
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodId({})", self.0)
    }
}

/// Where a method is in its emission lifecycle.
///
/// `Pending -> Open -> Closed` for methods with a body,
/// `Pending -> Sealed` for abstract ones. Text is only accepted while `Open`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EmitState {
    Pending,
    Open,
    Sealed,
    Closed,
}

/// What a method declaration is, beyond its signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum MethodFlavor {
    Instance,
    Static,
    Abstract,
    Constructor,
}

/// Builds the text of a single method.
#[derive(Debug)]
pub struct MethodBuilder {
    name: String,
    flavor: MethodFlavor,
    /// `Void` when the method returns nothing.
    returns: JvmType,
    params: Vec<Param>,
    exceptions: Vec<JvmType>,
    out: Output,
    /// Declared locals and parameters.
    locals: FxHashMap<String, JvmType>,
    temp_counter: u32,
    label_counter: u32,
    state: EmitState,
}

impl MethodBuilder {
    pub(crate) fn new(
        name: String,
        flavor: MethodFlavor,
        returns: JvmType,
        params: Vec<Param>,
        exceptions: Vec<JvmType>,
        indent_width: usize,
    ) -> Self {
        let locals = params
            .iter()
            .map(|param| (param.name.clone(), param.ty.clone()))
            .collect();
        Self {
            name,
            flavor,
            returns,
            params,
            exceptions,
            out: Output::with_indent_width(indent_width),
            locals,
            temp_counter: 0,
            label_counter: 0,
            state: EmitState::Pending,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn returns(&self) -> &JvmType {
        &self.returns
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn is_static(&self) -> bool {
        self.flavor == MethodFlavor::Static
    }

    pub fn is_abstract(&self) -> bool {
        self.flavor == MethodFlavor::Abstract
    }

    pub fn is_constructor(&self) -> bool {
        self.flavor == MethodFlavor::Constructor
    }

    pub fn state(&self) -> EmitState {
        self.state
    }

    /// The signature was abstract; nothing more will be emitted.
    pub fn is_sealed(&self) -> bool {
        self.state == EmitState::Sealed
    }

    pub fn output(&self) -> &Output {
        &self.out
    }

    /// Emit the signature and open the body.
    ///
    /// Abstract methods end with `;` and seal instead. Calling `start` twice
    /// has no effect.
    pub fn start(&mut self) {
        if self.state != EmitState::Pending {
            return;
        }
        let mut line = String::from("public");
        if self.is_static() {
            line.push_str(" static");
        }
        if self.is_abstract() {
            line.push_str(" abstract");
        }
        line.push(' ');
        if !self.is_constructor() {
            line.push_str(&self.returns.to_source());
            line.push(' ');
        }
        line.push_str(&self.name);
        let params: Vec<String> = self
            .params
            .iter()
            .map(|param| format!("{} {}", param.ty.to_source(), param.name))
            .collect();
        line.push('(');
        line.push_str(&params.join(", "));
        line.push(')');
        if !self.exceptions.is_empty() {
            let exceptions: Vec<String> = self.exceptions.iter().map(JvmType::to_source).collect();
            line.push_str(" throws ");
            line.push_str(&exceptions.join(", "));
        }

        if self.is_abstract() {
            line.push(';');
            self.out.puts(&line);
            self.state = EmitState::Sealed;
        } else {
            line.push_str(" {");
            self.out.puts(&line);
            self.out.indent();
            self.state = EmitState::Open;
        }
    }

    /// Close the body. No-op unless the body is open.
    pub fn stop(&mut self) {
        if self.state != EmitState::Open {
            return;
        }
        self.out.dedent();
        self.out.puts("}");
        self.state = EmitState::Closed;
    }

    #[inline]
    fn emitting(&self) -> bool {
        self.state == EmitState::Open
    }

    pub fn print(&mut self, text: &str) {
        if self.emitting() {
            self.out.print(text);
        }
    }

    pub fn puts(&mut self, line: &str) {
        if self.emitting() {
            self.out.puts(line);
        }
    }

    /// `header {` (or a bare `{`), then indent.
    pub fn open_block(&mut self, header: &str) {
        if !self.emitting() {
            return;
        }
        if header.is_empty() {
            self.out.puts("{");
        } else {
            self.out.puts(&format!("{header} {{"));
        }
        self.out.indent();
    }

    /// Dedent and `}`.
    pub fn close_block(&mut self) {
        self.close_block_with("");
    }

    /// Dedent and `}` followed by `suffix` on the same line, e.g. ` while (x);`.
    pub fn close_block_with(&mut self, suffix: &str) {
        if !self.emitting() {
            return;
        }
        self.out.dedent();
        self.out.puts(&format!("}}{suffix}"));
    }

    /// `} header {`: close one block and open the next at the same depth.
    pub fn next_block(&mut self, header: &str) {
        if !self.emitting() {
            return;
        }
        self.out.dedent();
        self.out.puts(&format!("}} {header} {{"));
        self.out.indent();
    }

    /// Declare a local with an initializer, or the type's default value.
    ///
    /// Returns `false` (and emits nothing) if the name is already a local.
    pub fn declare_local(&mut self, ty: &JvmType, name: &str, init: Option<&str>) -> bool {
        if self.locals.contains_key(name) {
            return false;
        }
        self.locals.insert(name.to_string(), ty.clone());
        let init = init.unwrap_or_else(|| ty.default_value());
        self.puts(&format!("{} {name} = {init};", ty.to_source()));
        true
    }

    /// Record a local that some other construct declares, such as a catch
    /// parameter.
    pub fn reserve_local(&mut self, ty: &JvmType, name: &str) -> bool {
        if self.locals.contains_key(name) {
            return false;
        }
        self.locals.insert(name.to_string(), ty.clone());
        true
    }

    /// Forget a local whose Java scope has ended, such as a catch parameter
    /// once its `catch` block is closed.
    pub fn release_local(&mut self, name: &str) -> Option<JvmType> {
        self.locals.remove(name)
    }

    pub fn is_local(&self, name: &str) -> bool {
        self.locals.contains_key(name)
    }

    pub fn local_type(&self, name: &str) -> Option<&JvmType> {
        self.locals.get(name)
    }

    /// Fresh `temp$N` identifier, not declared.
    pub fn fresh_name(&mut self) -> String {
        self.temp_counter += 1;
        format!("temp${}", self.temp_counter)
    }

    /// Fresh temporary initialized to the type's default value.
    pub fn new_temp(&mut self, ty: &JvmType) -> String {
        self.new_temp_with(ty, ty.default_value())
    }

    /// Fresh temporary initialized to `init`.
    pub fn new_temp_with(&mut self, ty: &JvmType, init: &str) -> String {
        let name = self.fresh_name();
        trace!(method = %self.name, temp = %name, ty = %ty, "allocated temp");
        self.locals.insert(name.clone(), ty.clone());
        self.puts(&format!("{} {name} = {init};", ty.to_source()));
        name
    }

    /// Fresh statement label.
    pub fn new_label(&mut self) -> String {
        self.label_counter += 1;
        let label = format!("label{}", self.label_counter);
        trace!(method = %self.name, label = %label, "allocated label");
        label
    }

    // Literal directives. Each continues the current line.

    pub fn push_int(&mut self, value: i32) {
        self.print(&literal::int(value));
    }

    pub fn ldc_long(&mut self, value: i64) {
        self.print(&literal::long(value));
    }

    pub fn ldc_float(&mut self, value: f32) {
        self.print(&literal::float(value));
    }

    pub fn ldc_double(&mut self, value: f64) {
        self.print(&literal::double(value));
    }

    pub fn ldc_class(&mut self, ty: &JvmType) {
        self.print(&literal::class(ty));
    }

    /// ` instanceof T`, continuing an expression already on the line.
    pub fn instance_of(&mut self, ty: &JvmType) {
        self.print(&format!(" instanceof {}", ty.to_source()));
    }

    /// Emit the literal for a constant directive such as `iconst_m1`.
    pub fn push_const(&mut self, directive: &str) -> CompileResult<()> {
        let literal = literal::const_directive(directive).ok_or_else(|| {
            CompileError::UnknownDirective {
                directive: directive.to_string(),
            }
        })?;
        self.print(&literal);
        Ok(())
    }
}
