//! Property-based tests for loop and branch lowering.
//!
//! Random trees of loops, conditionals and loop control are compiled into a
//! method and the generated text is checked structurally: indentation tracks
//! block depth, braces balance, and no temp is declared twice.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use mirah_ir::{
    CompilationUnit, ForEachLoop, JvmType, LoopSpec, MethodDecl, NodeArena, NodeId, NodeKind,
    Receiver, TypeDecl,
};
use mirah_javasrc::{compile_unit, SourceConfig};
use proptest::prelude::*;
use rustc_hash::FxHashSet;

#[derive(Clone, Debug)]
enum Tree {
    Call(String),
    Break,
    Next,
    Redo,
    If(Box<Tree>, Option<Box<Tree>>),
    Seq(Vec<Tree>),
    While {
        body: Box<Tree>,
        check_first: bool,
        negative: bool,
        post: bool,
        complex_cond: bool,
    },
    Each {
        body: Box<Tree>,
        redo: bool,
    },
}

fn tree() -> impl Strategy<Value = Tree> {
    let leaf = prop_oneof![
        "[a-z]{1,6}".prop_map(Tree::Call),
        Just(Tree::Break),
        Just(Tree::Next),
        Just(Tree::Redo),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), prop::option::of(inner.clone()))
                .prop_map(|(then, other)| Tree::If(Box::new(then), other.map(Box::new))),
            prop::collection::vec(inner.clone(), 1..4).prop_map(Tree::Seq),
            (
                inner.clone(),
                any::<bool>(),
                any::<bool>(),
                any::<bool>(),
                any::<bool>()
            )
                .prop_map(|(body, check_first, negative, post, complex_cond)| {
                    Tree::While {
                        body: Box::new(body),
                        check_first,
                        negative,
                        post,
                        complex_cond,
                    }
                }),
            (inner, any::<bool>()).prop_map(|(body, redo)| Tree::Each {
                body: Box::new(body),
                redo,
            }),
        ]
    })
}

fn call(arena: &mut NodeArena, method: &str, returns: JvmType) -> NodeId {
    arena.alloc(
        NodeKind::Call {
            receiver: Receiver::Implicit,
            method: method.to_string(),
            args: Vec::new(),
            returns: returns.clone(),
        },
        returns,
    )
}

/// Lower `tree` into the arena. The flag reports a `redo` outside of nested
/// loops, which the enclosing loop must then support.
fn build(arena: &mut NodeArena, tree: &Tree) -> (NodeId, bool) {
    match tree {
        Tree::Call(name) => (call(arena, name, JvmType::Void), false),
        Tree::Break => (arena.alloc(NodeKind::Break, JvmType::Void), false),
        Tree::Next => (arena.alloc(NodeKind::Next, JvmType::Void), false),
        Tree::Redo => (arena.alloc(NodeKind::Redo, JvmType::Void), true),
        Tree::If(then, other) => {
            let cond = arena.local("flag", JvmType::Boolean);
            let (then_branch, then_redo) = build(arena, then);
            let (else_branch, else_redo) = match other {
                Some(other) => {
                    let (id, redo) = build(arena, other);
                    (Some(id), redo)
                }
                None => (None, false),
            };
            let id = arena.alloc(
                NodeKind::If {
                    cond,
                    then_branch: Some(then_branch),
                    else_branch,
                },
                JvmType::Void,
            );
            (id, then_redo || else_redo)
        }
        Tree::Seq(items) => {
            let mut nodes = Vec::with_capacity(items.len());
            let mut redo = false;
            for item in items {
                let (id, item_redo) = build(arena, item);
                nodes.push(id);
                redo |= item_redo;
            }
            (arena.body(nodes, JvmType::Void), redo)
        }
        Tree::While {
            body,
            check_first,
            negative,
            post,
            complex_cond,
        } => {
            let cond = if *complex_cond {
                let check = call(arena, "check", JvmType::Boolean);
                let cached = arena.local("flag", JvmType::Boolean);
                arena.body(vec![check, cached], JvmType::Boolean)
            } else {
                arena.local("flag", JvmType::Boolean)
            };
            let (body, redo) = build(arena, body);
            let post = post.then(|| call(arena, "step", JvmType::Void));
            let spec = LoopSpec {
                check_first: *check_first,
                negative: *negative,
                redo,
                post,
                ..LoopSpec::while_loop(cond, Some(body))
            };
            (arena.alloc(NodeKind::Loop(spec), JvmType::Void), false)
        }
        Tree::Each { body, redo } => {
            let iterable = arena.local("items", JvmType::string().array_of());
            let (body, body_redo) = build(arena, body);
            let each = ForEachLoop {
                var: "item".to_string(),
                iterable,
                body: Some(body),
                redo: *redo || body_redo,
            };
            (arena.alloc(NodeKind::ForEach(each), JvmType::Void), false)
        }
    }
}

fn compile_tree(tree: &Tree) -> String {
    let mut arena = NodeArena::new();
    let root = Tree::While {
        body: Box::new(tree.clone()),
        check_first: true,
        negative: false,
        post: false,
        complex_cond: false,
    };
    let (body, _) = build(&mut arena, &root);
    let unit = CompilationUnit {
        source_name: "gen.mirah".to_string(),
        package: None,
        types: vec![TypeDecl {
            methods: vec![MethodDecl::new("run", JvmType::Void, Some(body))],
            ..TypeDecl::class("Gen")
        }],
    };
    let config = SourceConfig::default().without_provenance();
    let mut artifacts = compile_unit(&unit, &arena, &config).unwrap();
    artifacts.remove(0).text
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn indentation_tracks_blocks(tree in tree()) {
        let text = compile_tree(&tree);
        let mut depth = 0usize;
        for line in text.lines().filter(|line| !line.is_empty()) {
            let trimmed = line.trim_start();
            if trimmed.starts_with('}') {
                prop_assert!(depth > 0, "unbalanced close in:\n{}", text);
                depth -= 1;
            }
            let indent = line.len() - trimmed.len();
            prop_assert_eq!(indent, depth * 2, "line {:?} in:\n{}", line, text);
            if trimmed.ends_with('{') {
                depth += 1;
            }
        }
        prop_assert_eq!(depth, 0);
    }

    #[test]
    fn temps_are_declared_once(tree in tree()) {
        let text = compile_tree(&tree);
        let mut seen = FxHashSet::default();
        for line in text.lines() {
            let mut words = line.split_whitespace();
            let (Some(_), Some(name), Some("=")) = (words.next(), words.next(), words.next()) else {
                continue;
            };
            if name.starts_with("temp$") {
                prop_assert!(seen.insert(name.to_string()), "{} declared twice in:\n{}", name, text);
            }
        }
    }

    #[test]
    fn every_label_is_declared_once(tree in tree()) {
        let text = compile_tree(&tree);
        let mut seen = FxHashSet::default();
        for line in text.lines() {
            if let Some(label) = line.trim().strip_suffix(':') {
                prop_assert!(seen.insert(label.to_string()), "{} declared twice", label);
            }
        }
        for line in text.lines() {
            let trimmed = line.trim();
            let target = trimmed
                .strip_prefix("break ")
                .or_else(|| trimmed.strip_prefix("continue "))
                .and_then(|rest| rest.strip_suffix(';'));
            if let Some(target) = target {
                prop_assert!(seen.contains(target), "jump to undeclared {}", target);
            }
        }
    }
}
