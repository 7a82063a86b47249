//! Unit, class and method builders.
//!
//! A [`UnitBuilder`] owns one [`ClassBuilder`] per declared type, and each
//! class owns its [`MethodBuilder`]s. Every builder has its own output buffer
//! and its own registries (declared fields, declared locals, temp and label
//! counters); nothing is shared between builders.

mod annotation;
mod class;
mod method;

pub use annotation::render as render_annotation;
pub use class::{ClassBuilder, Lifecycle};
pub use method::{EmitState, MethodBuilder, MethodId};

use tracing::debug;

use mirah_ir::JvmType;

use crate::config::SourceConfig;

/// One generated source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceArtifact {
    /// Relative path: package directories, simple name, extension.
    pub path: String,
    pub text: String,
}

/// Collects the types generated from one source unit.
#[derive(Debug)]
pub struct UnitBuilder {
    source_name: String,
    package: Option<String>,
    config: SourceConfig,
    classes: Vec<ClassBuilder>,
}

impl UnitBuilder {
    pub fn new(source_name: impl Into<String>, config: SourceConfig) -> Self {
        Self {
            source_name: source_name.into(),
            package: None,
            config,
            classes: Vec::new(),
        }
    }

    /// Default package for types declared from now on without one.
    pub fn set_package(&mut self, package: impl Into<String>) {
        self.package = Some(package.into());
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Register a class. `None` extends the root object type.
    pub fn declare_class(
        &mut self,
        name: &str,
        superclass: Option<JvmType>,
        interfaces: Vec<JvmType>,
    ) -> &mut ClassBuilder {
        let class = ClassBuilder::new_class(
            &self.source_name,
            name,
            self.package.as_deref(),
            superclass,
            interfaces,
            &self.config,
        );
        self.push(class)
    }

    pub fn declare_interface(&mut self, name: &str, interfaces: Vec<JvmType>) -> &mut ClassBuilder {
        let interface = ClassBuilder::new_interface(
            &self.source_name,
            name,
            self.package.as_deref(),
            interfaces,
            &self.config,
        );
        self.push(interface)
    }

    fn push(&mut self, class: ClassBuilder) -> &mut ClassBuilder {
        debug!(name = %class.simple_name(), package = ?class.package(), "declared type");
        self.classes.push(class);
        let last = self.classes.len() - 1;
        &mut self.classes[last]
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// One artifact per type, in declaration order.
    pub fn generate(self) -> Vec<SourceArtifact> {
        self.classes
            .into_iter()
            .map(|class| SourceArtifact {
                path: class.path(),
                text: class.generate(),
            })
            .collect()
    }
}
