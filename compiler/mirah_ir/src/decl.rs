//! Declarations: the class / interface / member skeleton of a unit.
//!
//! Method and constructor bodies point into the unit's [`NodeArena`](crate::NodeArena).

use crate::node::NodeId;
use crate::types::JvmType;

/// One source file's worth of type declarations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompilationUnit {
    /// Name of the source the unit came from, for provenance comments.
    pub source_name: String,
    /// Package applied to types whose names do not carry one.
    pub package: Option<String>,
    pub types: Vec<TypeDecl>,
}

/// Whether a declaration is a class or an interface.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeDeclKind {
    Class {
        /// `None` means the root object type.
        superclass: Option<JvmType>,
        is_abstract: bool,
    },
    Interface,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeDecl {
    /// Simple or qualified name; `.` and `/` both separate packages.
    pub name: String,
    pub kind: TypeDeclKind,
    pub interfaces: Vec<JvmType>,
    pub annotations: Vec<Annotation>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    pub fn class(name: impl Into<String>) -> Self {
        TypeDecl {
            name: name.into(),
            kind: TypeDeclKind::Class {
                superclass: None,
                is_abstract: false,
            },
            interfaces: Vec::new(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        TypeDecl {
            kind: TypeDeclKind::Interface,
            ..TypeDecl::class(name)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: JvmType,
    pub is_static: bool,
    pub annotations: Vec<Annotation>,
}

/// What kind of member a [`MethodDecl`] is.
#[derive(Clone, Debug, PartialEq)]
pub enum MethodKind {
    Instance,
    Static,
    Abstract,
    Constructor { delegate: Option<Delegate> },
}

/// Explicit `super(...)` / `this(...)` call opening a constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct Delegate {
    pub to_super: bool,
    pub args: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: JvmType,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: JvmType) -> Self {
        Param {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodDecl {
    /// Ignored for constructors, which take the owning type's name.
    pub name: String,
    pub kind: MethodKind,
    pub params: Vec<Param>,
    /// `JvmType::Void` for methods without a value.
    pub returns: JvmType,
    pub exceptions: Vec<JvmType>,
    /// Locals of the method's scope, declared up front with default values.
    pub locals: Vec<Param>,
    pub body: Option<NodeId>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, returns: JvmType, body: Option<NodeId>) -> Self {
        MethodDecl {
            name: name.into(),
            kind: MethodKind::Instance,
            params: Vec::new(),
            returns,
            exceptions: Vec::new(),
            locals: Vec::new(),
            body,
        }
    }

    pub fn constructor(body: Option<NodeId>) -> Self {
        MethodDecl {
            kind: MethodKind::Constructor { delegate: None },
            ..MethodDecl::new("initialize", JvmType::Void, body)
        }
    }
}

/// A Java annotation attached to a type or field.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    /// Qualified annotation type name.
    pub name: String,
    pub values: Vec<(String, AnnotationValue)>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationValue {
    Int(i32),
    Str(String),
    Array(Vec<AnnotationValue>),
    Class(JvmType),
    Annotation(Annotation),
}
