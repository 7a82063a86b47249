//! Loop descriptors.

use super::NodeId;

/// A `while` / `until` loop, pre- or post-tested.
///
/// `init`, `pre` and `post` come from desugared counting loops: `init` runs
/// once before the loop, `pre` at the top of every iteration and `post` after
/// the body, before the condition is re-tested.
#[derive(Clone, Debug, PartialEq)]
pub struct LoopSpec {
    pub cond: NodeId,
    /// Test before the first iteration (`while`) or after it (`begin ... end while`).
    pub check_first: bool,
    /// `until`: loop while the condition is false.
    pub negative: bool,
    pub body: Option<NodeId>,
    /// The body uses `redo`.
    pub redo: bool,
    pub init: Option<NodeId>,
    pub pre: Option<NodeId>,
    pub post: Option<NodeId>,
}

impl LoopSpec {
    /// A plain pre-tested `while` loop.
    pub fn while_loop(cond: NodeId, body: Option<NodeId>) -> Self {
        LoopSpec {
            cond,
            check_first: true,
            negative: false,
            body,
            redo: false,
            init: None,
            pre: None,
            post: None,
        }
    }

    /// A plain pre-tested `until` loop.
    pub fn until_loop(cond: NodeId, body: Option<NodeId>) -> Self {
        LoopSpec {
            negative: true,
            ..LoopSpec::while_loop(cond, body)
        }
    }

    /// Same loop, tested after each iteration.
    #[must_use]
    pub fn post_tested(mut self) -> Self {
        self.check_first = false;
        self
    }

    /// Same loop, with `redo` support requested.
    #[must_use]
    pub fn with_redo(mut self) -> Self {
        self.redo = true;
        self
    }
}

/// Iteration over an array or `Iterable`.
#[derive(Clone, Debug, PartialEq)]
pub struct ForEachLoop {
    /// Name bound to each element.
    pub var: String,
    pub iterable: NodeId,
    pub body: Option<NodeId>,
    pub redo: bool,
}
