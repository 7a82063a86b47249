//! Java Source Backend for Mirah
//!
//! Turns a typed Mirah tree into Java source text, one artifact per declared
//! class or interface.
//!
//! # Architecture
//!
//! ```text
//! CompilationUnit + NodeArena
//!        ↓
//!   compile_unit        (declares types, fields, methods)
//!        ↓
//!   JavaSourceCompiler  (lowers each method body)
//!        ↓
//!   UnitBuilder         (class and method builders, output buffers)
//!        ↓
//!   Vec<SourceArtifact> (relative path + text)
//! ```
//!
//! The hard part is that Mirah allows conditionals, loops and exception
//! handling anywhere a value is expected. [`JavaSourceCompiler`] decides per
//! node whether it can be written as a Java expression, and evaluates it
//! into a temp otherwise. Loops that need `redo`, or `next` with a `post`
//! step, are lowered onto labeled blocks.
//!
//! # Debugging
//!
//! Enable tracing with environment variables:
//! - `RUST_LOG=mirah_javasrc=debug` - Unit, type and method compilation
//! - `RUST_LOG=mirah_javasrc=trace` - Loop strategies, temps and labels

pub mod builder;
pub mod compile;
pub mod config;
pub mod error;
pub mod literal;
pub mod output;

pub use builder::{ClassBuilder, MethodBuilder, MethodId, SourceArtifact, UnitBuilder};
pub use compile::{compile_unit, Dest, JavaSourceCompiler, LoopStrategy, Operand, TempValue};
pub use config::SourceConfig;
pub use error::{CompileError, CompileResult};
pub use output::Output;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
