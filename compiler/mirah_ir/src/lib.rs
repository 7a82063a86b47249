//! Mirah IR - typed tree consumed by the source backends
//!
//! This crate holds the data the parser and type-inference stages hand to a
//! backend:
//! - `JvmType` for resolved types
//! - `NodeArena` / `NodeId` / `NodeKind` for method bodies
//! - `CompilationUnit` and friends for the type and member skeleton
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: No `Box<Node>`, use `NodeId(u32)` indices
//! - **Closed Node Set**: `NodeKind` is one enum; backends match it exhaustively
//! - **Typed Nodes**: every node carries its inferred `JvmType`

mod decl;
pub mod node;
pub mod types;

pub use decl::{
    Annotation, AnnotationValue, CompilationUnit, Delegate, FieldDecl, MethodDecl, MethodKind,
    Param, TypeDecl, TypeDeclKind,
};
pub use node::{
    BinaryOp, ForEachLoop, LoopSpec, Node, NodeArena, NodeId, NodeKind, Receiver, RescueClause,
    UnaryOp,
};
pub use types::JvmType;
