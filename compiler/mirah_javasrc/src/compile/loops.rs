//! Loop lowering.
//!
//! Java has no `redo` and its `continue` skips the rest of the loop body,
//! including the `post` part of a desugared counting loop. Loops that need
//! either are wrapped in labeled blocks:
//!
//! ```text
//! label1:
//! while (cond) {
//!   boolean temp$1 = false;
//!   label2:
//!   do {
//!     temp$1 = false;
//!     body
//!   } while (temp$1);
//!   post
//! }
//! ```
//!
//! `break` leaves the outer label, `next` leaves the inner block and `redo`
//! sets the flag and re-enters it. Plain loops map directly onto `while`,
//! `do`-`while` and enhanced `for`.

use tracing::trace;

use mirah_ir::{ForEachLoop, JvmType, LoopSpec, NodeId, NodeKind};

use super::precompile::TempValue;
use super::{unwrap_parens, Dest, JavaSourceCompiler};
use crate::error::{CompileError, CompileResult};

/// How a loop is lowered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopStrategy {
    SimpleWhile,
    ComplexWhile,
    SimpleForEach,
    RedoableForEach,
}

impl LoopStrategy {
    pub fn name(self) -> &'static str {
        match self {
            LoopStrategy::SimpleWhile => "simple while loop",
            LoopStrategy::ComplexWhile => "complex while loop",
            LoopStrategy::SimpleForEach => "simple for-each loop",
            LoopStrategy::RedoableForEach => "redoable for-each loop",
        }
    }
}

/// Labels of a labeled loop: `break` leaves `outer`, `next` leaves `inner`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LoopLabels {
    pub outer: String,
    pub inner: String,
}

/// A loop the compiler is currently inside of.
#[derive(Clone, Debug)]
pub(crate) struct ActiveLoop {
    pub strategy: LoopStrategy,
    pub labels: Option<LoopLabels>,
    /// Set by `redo` to re-run the body.
    pub redo_flag: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Break,
    Next,
    Redo,
}

impl LoopControl {
    fn keyword(self) -> &'static str {
        match self {
            LoopControl::Break => "break",
            LoopControl::Next => "next",
            LoopControl::Redo => "redo",
        }
    }
}

impl JavaSourceCompiler<'_> {
    /// Whether `redo` occurs in the node, outside of nested loops.
    fn contains_redo(&self, id: NodeId) -> bool {
        match self.arena.kind(id) {
            NodeKind::Redo => true,
            NodeKind::Loop(_) | NodeKind::ForEach(_) => false,
            kind => kind
                .children()
                .into_iter()
                .any(|child| self.contains_redo(child)),
        }
    }

    fn reject_redo(&self, body: Option<NodeId>, strategy: LoopStrategy) -> CompileResult<()> {
        match body {
            Some(body) if self.contains_redo(body) => Err(CompileError::RedoUnsupported {
                strategy: strategy.name(),
            }),
            _ => Ok(()),
        }
    }

    /// Emit the body of a labeled loop: `inner: do { flag = false; ... } while (flag);`
    /// with a redo flag, `inner: { ... }` without.
    fn labeled_body(
        &mut self,
        body: Option<NodeId>,
        inner: &str,
        redo_flag: Option<&str>,
    ) -> CompileResult<()> {
        self.puts(&format!("{inner}:"))?;
        match redo_flag {
            Some(flag) => {
                self.method()?.open_block("do");
                self.puts(&format!("{flag} = false;"))?;
                self.optional_statement(body)?;
                self.method()?.close_block_with(&format!(" while ({flag});"));
            }
            None => {
                self.method()?.open_block("");
                self.optional_statement(body)?;
                self.method()?.close_block();
            }
        }
        Ok(())
    }

    fn optional_statement(&mut self, node: Option<NodeId>) -> CompileResult<()> {
        match node {
            Some(node) => self.statement(node, &Dest::Discard),
            None => Ok(()),
        }
    }

    /// Run `f` with `active` as the innermost loop.
    fn in_loop<F>(&mut self, active: ActiveLoop, f: F) -> CompileResult<()>
    where
        F: FnOnce(&mut Self) -> CompileResult<()>,
    {
        self.loops.push(active);
        let result = f(self);
        self.loops.pop();
        result
    }

    /// `while` / `until`, pre- or post-tested.
    pub(super) fn while_loop(&mut self, spec: &LoopSpec) -> CompileResult<()> {
        let complex =
            spec.redo || spec.post.is_some() || !self.is_expression_capable(spec.cond);
        let strategy = if complex {
            LoopStrategy::ComplexWhile
        } else {
            LoopStrategy::SimpleWhile
        };
        trace!(strategy = strategy.name(), check_first = spec.check_first, "lowering loop");
        if !spec.redo {
            self.reject_redo(spec.body, strategy)?;
        }

        self.optional_statement(spec.init)?;

        if complex {
            self.complex_while(spec)
        } else {
            let cond = self.render_value(spec.cond)?;
            let test = negate_if(unwrap_parens(&cond), spec.negative);
            let active = ActiveLoop {
                strategy,
                labels: None,
                redo_flag: None,
            };
            if spec.check_first {
                self.method()?.open_block(&format!("while ({test})"));
            } else {
                self.method()?.open_block("do");
            }
            self.in_loop(active, |c| {
                c.optional_statement(spec.pre)?;
                c.optional_statement(spec.body)
            })?;
            if spec.check_first {
                self.method()?.close_block();
            } else {
                self.method()?.close_block_with(&format!(" while ({test});"));
            }
            Ok(())
        }
    }

    fn complex_while(&mut self, spec: &LoopSpec) -> CompileResult<()> {
        // A condition that needs statements is computed into a flag, before
        // the loop when tested first, and again at the end of every pass.
        let (test, cond_temp) = if self.is_expression_capable(spec.cond) {
            let cond = self.render_value(spec.cond)?;
            (cond, None)
        } else {
            let name = self.method()?.new_temp(&JvmType::Boolean);
            let temp = TempValue {
                name: name.clone(),
                source: Some(spec.cond),
            };
            if spec.check_first {
                temp.reload(self)?;
            }
            (name, Some(temp))
        };
        let test = negate_if(unwrap_parens(&test), spec.negative);

        let outer = self.method()?.new_label();
        let inner = self.method()?.new_label();

        self.puts(&format!("{outer}:"))?;
        if spec.check_first {
            self.method()?.open_block(&format!("while ({test})"));
        } else {
            self.method()?.open_block("do");
        }
        let redo_flag = if spec.redo {
            Some(self.method()?.new_temp(&JvmType::Boolean))
        } else {
            None
        };

        let active = ActiveLoop {
            strategy: LoopStrategy::ComplexWhile,
            labels: Some(LoopLabels {
                outer,
                inner: inner.clone(),
            }),
            redo_flag: redo_flag.clone(),
        };
        self.in_loop(active, |c| {
            c.optional_statement(spec.pre)?;
            c.labeled_body(spec.body, &inner, redo_flag.as_deref())?;
            c.optional_statement(spec.post)?;
            match &cond_temp {
                Some(temp) => temp.reload(c),
                None => Ok(()),
            }
        })?;

        if spec.check_first {
            self.method()?.close_block();
        } else {
            self.method()?.close_block_with(&format!(" while ({test});"));
        }
        Ok(())
    }

    /// Enhanced `for` over an array or `Iterable`.
    pub(super) fn for_each(&mut self, each: &ForEachLoop) -> CompileResult<()> {
        let strategy = if each.redo {
            LoopStrategy::RedoableForEach
        } else {
            LoopStrategy::SimpleForEach
        };
        trace!(strategy = strategy.name(), var = %each.var, "lowering loop");
        if !each.redo {
            self.reject_redo(each.body, strategy)?;
        }

        let iterable = self.expression(each.iterable)?;
        let element = self
            .arena
            .ty(each.iterable)
            .component_type()
            .cloned()
            .unwrap_or_else(JvmType::object);

        // An existing local can't be the loop variable; bind a fresh one and copy.
        let rebind = self.is_local(&each.var);
        let var = if rebind {
            self.method()?.fresh_name()
        } else {
            each.var.clone()
        };
        let header = format!("for ({} {var} : {})", element.to_source(), unwrap_parens(&iterable));

        if each.redo {
            let outer = self.method()?.new_label();
            let inner = self.method()?.new_label();
            self.puts(&format!("{outer}:"))?;
            self.method()?.open_block(&header);
            if rebind {
                self.puts(&format!("{} = {var};", each.var))?;
            }
            let flag = self.method()?.new_temp(&JvmType::Boolean);
            let active = ActiveLoop {
                strategy,
                labels: Some(LoopLabels {
                    outer,
                    inner: inner.clone(),
                }),
                redo_flag: Some(flag.clone()),
            };
            self.in_loop(active, |c| {
                c.loop_variable(each, rebind, &element, |c| {
                    c.labeled_body(each.body, &inner, Some(&flag))
                })
            })?;
        } else {
            self.method()?.open_block(&header);
            if rebind {
                self.puts(&format!("{} = {var};", each.var))?;
            }
            let active = ActiveLoop {
                strategy,
                labels: None,
                redo_flag: None,
            };
            self.in_loop(active, |c| {
                c.loop_variable(each, rebind, &element, |c| c.optional_statement(each.body))
            })?;
        }
        self.method()?.close_block();
        Ok(())
    }

    /// Run `f` with the for-each variable in scope. A rebound variable is
    /// already a method local.
    fn loop_variable<F>(
        &mut self,
        each: &ForEachLoop,
        rebind: bool,
        element: &JvmType,
        f: F,
    ) -> CompileResult<()>
    where
        F: FnOnce(&mut Self) -> CompileResult<()>,
    {
        if rebind {
            f(self)
        } else {
            self.scoped_local(&each.var, element, f)
        }
    }

    /// `break`, `next` or `redo` of the innermost loop.
    pub(super) fn loop_control(&mut self, control: LoopControl) -> CompileResult<()> {
        let active = self
            .loops
            .last()
            .cloned()
            .ok_or(CompileError::OutsideLoop {
                keyword: control.keyword(),
            })?;
        match (control, &active.labels, &active.redo_flag) {
            (LoopControl::Break, None, _) => self.puts("break;"),
            (LoopControl::Break, Some(labels), _) => self.puts(&format!("break {};", labels.outer)),
            (LoopControl::Next, None, _) => self.puts("continue;"),
            (LoopControl::Next, Some(labels), _) => self.puts(&format!("break {};", labels.inner)),
            (LoopControl::Redo, Some(labels), Some(flag)) => {
                self.puts(&format!("{flag} = true;"))?;
                self.puts(&format!("continue {};", labels.inner))
            }
            (LoopControl::Redo, _, _) => Err(CompileError::RedoUnsupported {
                strategy: active.strategy.name(),
            }),
        }
    }
}

fn negate_if(test: &str, negative: bool) -> String {
    if negative {
        format!("!({test})")
    } else {
        test.to_string()
    }
}
