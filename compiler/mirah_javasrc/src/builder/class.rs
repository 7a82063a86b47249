//! Class and interface builder.

use rustc_hash::FxHashSet;
use tracing::debug;

use mirah_ir::{Annotation, JvmType, Param};

use super::annotation;
use super::method::{MethodBuilder, MethodFlavor, MethodId};
use crate::config::SourceConfig;
use crate::error::{CompileError, CompileResult};
use crate::output::Output;

/// Header state of a type.
///
/// The header (package, annotations, class line) is written once, on the
/// first member declaration or at `generate()`. After that, anything the
/// header depends on is frozen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Unsealed,
    Sealed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Shape {
    Class { superclass: JvmType, is_abstract: bool },
    Interface,
}

/// Builds one top-level class or interface.
#[derive(Debug)]
pub struct ClassBuilder {
    source_name: String,
    package: Option<String>,
    simple_name: String,
    shape: Shape,
    interfaces: Vec<JvmType>,
    annotations: Vec<Annotation>,
    /// Header and field declarations. Methods are spliced in at `generate()`.
    out: Output,
    fields: FxHashSet<String>,
    methods: Vec<MethodBuilder>,
    lifecycle: Lifecycle,
    config: SourceConfig,
}

/// Split `a.b.C` or `a/b/C` into `(Some("a.b"), "C")`.
fn split_name(name: &str) -> (Option<String>, String) {
    let name = name.replace('/', ".");
    match name.rsplit_once('.') {
        Some((package, simple)) => (Some(package.to_string()), simple.to_string()),
        None => (None, name),
    }
}

impl ClassBuilder {
    pub(crate) fn new_class(
        source_name: &str,
        name: &str,
        default_package: Option<&str>,
        superclass: Option<JvmType>,
        interfaces: Vec<JvmType>,
        config: &SourceConfig,
    ) -> Self {
        let shape = Shape::Class {
            superclass: superclass.unwrap_or_else(JvmType::object),
            is_abstract: false,
        };
        Self::new(source_name, name, default_package, shape, interfaces, config)
    }

    pub(crate) fn new_interface(
        source_name: &str,
        name: &str,
        default_package: Option<&str>,
        interfaces: Vec<JvmType>,
        config: &SourceConfig,
    ) -> Self {
        Self::new(
            source_name,
            name,
            default_package,
            Shape::Interface,
            interfaces,
            config,
        )
    }

    fn new(
        source_name: &str,
        name: &str,
        default_package: Option<&str>,
        shape: Shape,
        interfaces: Vec<JvmType>,
        config: &SourceConfig,
    ) -> Self {
        let (package, simple_name) = split_name(name);
        Self {
            source_name: source_name.to_string(),
            package: package.or_else(|| default_package.map(str::to_string)),
            simple_name,
            shape,
            interfaces,
            annotations: Vec::new(),
            out: Output::with_indent_width(config.indent_width),
            fields: FxHashSet::default(),
            methods: Vec::new(),
            lifecycle: Lifecycle::Unsealed,
            config: config.clone(),
        }
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn is_interface(&self) -> bool {
        self.shape == Shape::Interface
    }

    pub fn is_sealed(&self) -> bool {
        self.lifecycle == Lifecycle::Sealed
    }

    /// Relative artifact path: `a/b/C.java`.
    pub fn path(&self) -> String {
        let file = format!("{}.{}", self.simple_name, self.config.extension);
        match &self.package {
            Some(package) => format!("{}/{file}", package.replace('.', "/")),
            None => file,
        }
    }

    fn check_unsealed(&self, what: &'static str) -> CompileResult<()> {
        match self.lifecycle {
            Lifecycle::Unsealed => Ok(()),
            Lifecycle::Sealed => Err(CompileError::HeaderSealed {
                class: self.simple_name.clone(),
                what,
            }),
        }
    }

    pub fn set_package(&mut self, package: impl Into<String>) -> CompileResult<()> {
        self.check_unsealed("package")?;
        self.package = Some(package.into());
        Ok(())
    }

    pub fn set_superclass(&mut self, superclass: JvmType) -> CompileResult<()> {
        self.check_unsealed("superclass")?;
        match &mut self.shape {
            Shape::Class { superclass: slot, .. } => {
                *slot = superclass;
                Ok(())
            }
            Shape::Interface => Err(CompileError::Internal(format!(
                "interface {} has no superclass",
                self.simple_name
            ))),
        }
    }

    pub fn set_abstract(&mut self, value: bool) -> CompileResult<()> {
        self.check_unsealed("abstract flag")?;
        if let Shape::Class { is_abstract, .. } = &mut self.shape {
            *is_abstract = value;
        }
        Ok(())
    }

    pub fn add_interface(&mut self, interface: JvmType) -> CompileResult<()> {
        self.check_unsealed("interfaces")?;
        self.interfaces.push(interface);
        Ok(())
    }

    pub fn add_annotation(&mut self, annotation: Annotation) -> CompileResult<()> {
        self.check_unsealed("annotations")?;
        self.annotations.push(annotation);
        Ok(())
    }

    /// Write the header. Only the first call has an effect.
    pub fn seal(&mut self) {
        if self.is_sealed() {
            return;
        }
        self.lifecycle = Lifecycle::Sealed;
        debug!(class = %self.simple_name, "sealing header");

        if self.config.provenance {
            self.out.puts(&format!("// Generated from {}", self.source_name));
        }
        if let Some(package) = &self.package {
            self.out.puts(&format!("package {package};"));
            self.out.puts("");
        }
        for annotation in &self.annotations {
            self.out.puts(&annotation::render(annotation));
        }

        let interfaces: Vec<String> = self.interfaces.iter().map(JvmType::to_source).collect();
        let header = match &self.shape {
            Shape::Class {
                superclass,
                is_abstract,
            } => {
                let mut header = String::from("public ");
                if *is_abstract {
                    header.push_str("abstract ");
                }
                header.push_str(&format!(
                    "class {} extends {}",
                    self.simple_name,
                    superclass.to_source()
                ));
                if !interfaces.is_empty() {
                    header.push_str(" implements ");
                    header.push_str(&interfaces.join(", "));
                }
                header
            }
            Shape::Interface => {
                let mut header = format!("public interface {}", self.simple_name);
                if !interfaces.is_empty() {
                    header.push_str(" extends ");
                    header.push_str(&interfaces.join(", "));
                }
                header
            }
        };
        self.out.puts(&format!("{header} {{"));
        self.out.indent();
    }

    /// Declare a field. Only the first declaration of a name is emitted.
    pub fn declare_field(
        &mut self,
        name: &str,
        ty: &JvmType,
        is_static: bool,
        annotations: &[Annotation],
    ) -> bool {
        if self.fields.contains(name) {
            return false;
        }
        self.seal();
        self.fields.insert(name.to_string());
        for annotation in annotations {
            self.out.puts(&annotation::render(annotation));
        }
        let modifier = if is_static { "static " } else { "" };
        self.out
            .puts(&format!("private {modifier}{} {name};", ty.to_source()));
        true
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    fn push_method(
        &mut self,
        name: String,
        flavor: MethodFlavor,
        params: Vec<Param>,
        returns: JvmType,
        exceptions: Vec<JvmType>,
    ) -> MethodId {
        self.seal();
        let id = MethodId::from_index(self.methods.len());
        self.methods.push(MethodBuilder::new(
            name,
            flavor,
            returns,
            params,
            exceptions,
            self.config.indent_width,
        ));
        id
    }

    /// Declare an instance method. On interfaces this is abstract.
    pub fn declare_method(
        &mut self,
        name: &str,
        params: Vec<Param>,
        returns: JvmType,
        exceptions: Vec<JvmType>,
    ) -> MethodId {
        let flavor = if self.is_interface() {
            MethodFlavor::Abstract
        } else {
            MethodFlavor::Instance
        };
        self.push_method(name.to_string(), flavor, params, returns, exceptions)
    }

    pub fn declare_abstract_method(
        &mut self,
        name: &str,
        params: Vec<Param>,
        returns: JvmType,
        exceptions: Vec<JvmType>,
    ) -> MethodId {
        self.push_method(
            name.to_string(),
            MethodFlavor::Abstract,
            params,
            returns,
            exceptions,
        )
    }

    pub fn declare_static_method(
        &mut self,
        name: &str,
        params: Vec<Param>,
        returns: JvmType,
        exceptions: Vec<JvmType>,
    ) -> CompileResult<MethodId> {
        if self.is_interface() {
            return Err(CompileError::StaticInterfaceMethod {
                interface: self.simple_name.clone(),
                method: name.to_string(),
            });
        }
        Ok(self.push_method(
            name.to_string(),
            MethodFlavor::Static,
            params,
            returns,
            exceptions,
        ))
    }

    pub fn declare_constructor(
        &mut self,
        params: Vec<Param>,
        exceptions: Vec<JvmType>,
    ) -> CompileResult<MethodId> {
        if self.is_interface() {
            return Err(CompileError::Internal(format!(
                "interface {} can't have a constructor",
                self.simple_name
            )));
        }
        Ok(self.push_method(
            self.simple_name.clone(),
            MethodFlavor::Constructor,
            params,
            JvmType::Void,
            exceptions,
        ))
    }

    /// `public static void main(String[] argv)`.
    pub fn declare_main(&mut self) -> CompileResult<MethodId> {
        let argv = Param::new("argv", JvmType::string().array_of());
        self.declare_static_method("main", vec![argv], JvmType::Void, Vec::new())
    }

    pub fn method(&self, id: MethodId) -> Option<&MethodBuilder> {
        self.methods.get(id.index())
    }

    pub fn method_mut(&mut self, id: MethodId) -> Option<&mut MethodBuilder> {
        self.methods.get_mut(id.index())
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Finish the type and return its text.
    pub fn generate(mut self) -> String {
        self.seal();
        for (i, method) in self.methods.iter().enumerate() {
            if i > 0 || !self.fields.is_empty() {
                self.out.puts("");
            }
            self.out.append(method.output());
        }
        self.out.dedent();
        self.out.puts("}");
        self.out.into_string()
    }
}
