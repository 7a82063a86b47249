//! Declaration-level driver: types, members and method bodies.

use tracing::debug;

use mirah_ir::{CompilationUnit, Delegate, MethodDecl, MethodKind, NodeArena, TypeDecl, TypeDeclKind};

use super::{Dest, JavaSourceCompiler};
use crate::builder::{ClassBuilder, SourceArtifact, UnitBuilder};
use crate::config::SourceConfig;
use crate::error::{CompileError, CompileResult};

/// Generate one Java source per type declared in `unit`.
///
/// All or nothing: the first error aborts the unit and no artifacts are
/// returned.
#[tracing::instrument(level = "debug", skip_all, fields(unit = %unit.source_name, types = unit.types.len()))]
pub fn compile_unit(
    unit: &CompilationUnit,
    arena: &NodeArena,
    config: &SourceConfig,
) -> CompileResult<Vec<SourceArtifact>> {
    let mut builder = UnitBuilder::new(unit.source_name.clone(), config.clone());
    if let Some(package) = &unit.package {
        builder.set_package(package.clone());
    }
    for decl in &unit.types {
        compile_type(&mut builder, decl, arena)?;
    }
    let artifacts = builder.generate();
    debug!(artifacts = artifacts.len(), "unit compiled");
    Ok(artifacts)
}

#[tracing::instrument(level = "debug", skip_all, fields(name = %decl.name))]
fn compile_type(builder: &mut UnitBuilder, decl: &TypeDecl, arena: &NodeArena) -> CompileResult<()> {
    let class = match &decl.kind {
        TypeDeclKind::Class {
            superclass,
            is_abstract,
        } => {
            let class = builder.declare_class(&decl.name, superclass.clone(), decl.interfaces.clone());
            class.set_abstract(*is_abstract)?;
            class
        }
        TypeDeclKind::Interface => builder.declare_interface(&decl.name, decl.interfaces.clone()),
    };
    for annotation in &decl.annotations {
        class.add_annotation(annotation.clone())?;
    }
    for field in &decl.fields {
        class.declare_field(&field.name, &field.ty, field.is_static, &field.annotations);
    }
    for method in &decl.methods {
        compile_method(class, method, arena)?;
    }
    Ok(())
}

#[tracing::instrument(level = "debug", skip_all, fields(method = %decl.name))]
fn compile_method(class: &mut ClassBuilder, decl: &MethodDecl, arena: &NodeArena) -> CompileResult<()> {
    let params = decl.params.clone();
    let exceptions = decl.exceptions.clone();
    let returns = decl.returns.clone();
    let id = match &decl.kind {
        MethodKind::Instance => class.declare_method(&decl.name, params, returns, exceptions),
        MethodKind::Static => class.declare_static_method(&decl.name, params, returns, exceptions)?,
        MethodKind::Abstract => {
            class.declare_abstract_method(&decl.name, params, returns, exceptions)
        }
        MethodKind::Constructor { .. } => class.declare_constructor(params, exceptions)?,
    };

    let mut compiler = JavaSourceCompiler::new(arena, class, id)?;
    compiler.method()?.start();
    if compiler.method()?.is_sealed() {
        return Ok(());
    }

    if let MethodKind::Constructor {
        delegate: Some(delegate),
    } = &decl.kind
    {
        compiler.delegate(delegate)?;
    }
    for local in &decl.locals {
        compiler.method()?.declare_local(&local.ty, &local.name, None);
    }
    if let Some(body) = decl.body {
        let discard = decl.returns.is_void() || matches!(decl.kind, MethodKind::Constructor { .. });
        if discard {
            compiler.statement(body, &Dest::Discard)?;
        } else {
            compiler.return_statement(Some(body))?;
        }
    }
    compiler.method()?.stop();
    Ok(())
}

impl JavaSourceCompiler<'_> {
    /// `super(...)` or `this(...)` opening a constructor.
    fn delegate(&mut self, delegate: &Delegate) -> CompileResult<()> {
        let mut args = Vec::with_capacity(delegate.args.len());
        for &arg in &delegate.args {
            if !self.is_expression_capable(arg) {
                return Err(CompileError::InvalidDelegateArgument {
                    kind: self.arena.kind(arg).name(),
                });
            }
            args.push(self.render_value(arg)?);
        }
        let target = if delegate.to_super { "super" } else { "this" };
        self.puts(&format!("{target}({});", args.join(", ")))
    }
}
