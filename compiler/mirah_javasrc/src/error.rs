//! Errors raised while generating Java source.
//!
//! All of them abort the current unit; `compile_unit` never returns partial
//! artifacts.

use thiserror::Error;

/// Problem encountered during source generation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompileError {
    /// `break`, `next` or `redo` with no enclosing loop.
    #[error("{keyword} outside of loop")]
    OutsideLoop { keyword: &'static str },

    /// `redo` inside a loop whose lowering has no redo labels.
    #[error("{strategy} doesn't support redo")]
    RedoUnsupported { strategy: &'static str },

    /// Low-level emission directive the method builder does not know.
    #[error("unknown emission directive `{directive}`")]
    UnknownDirective { directive: String },

    /// `super(...)` / `this(...)` argument that needs statements to compute.
    #[error("invalid constructor argument: {kind} is not an expression")]
    InvalidDelegateArgument { kind: &'static str },

    /// Header-dependent change after the type header was written.
    #[error("cannot change {what} of {class}: header already emitted")]
    HeaderSealed { class: String, what: &'static str },

    #[error("interfaces can't have static methods ({interface}.{method})")]
    StaticInterfaceMethod { interface: String, method: String },

    /// Invariant violation inside the backend.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type CompileResult<T> = Result<T, CompileError>;
