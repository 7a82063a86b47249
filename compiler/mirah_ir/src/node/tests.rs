use super::*;
use crate::types::JvmType;

#[test]
fn arena_assigns_sequential_ids() {
    let mut arena = NodeArena::new();
    assert!(arena.is_empty());
    let a = arena.int(1);
    let b = arena.string("x");
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(arena.len(), 2);
    assert_eq!(arena.ty(b), &JvmType::string());
    assert_eq!(arena.kind(a), &NodeKind::Int(1));
}

#[test]
fn literal_classification() {
    assert!(NodeKind::Null.is_literal());
    assert!(NodeKind::Str("s".into()).is_literal());
    assert!(!NodeKind::Local("x".into()).is_literal());
    assert!(!NodeKind::Break.is_literal());
}

#[test]
fn loop_spec_builders() {
    let mut arena = NodeArena::new();
    let cond = arena.bool(true);
    let spec = LoopSpec::until_loop(cond, None).post_tested().with_redo();
    assert!(spec.negative);
    assert!(!spec.check_first);
    assert!(spec.redo);
    assert_eq!(spec.init, None);
}

#[test]
fn operator_symbols() {
    assert_eq!(BinaryOp::UShr.as_symbol(), ">>>");
    assert_eq!(BinaryOp::And.as_symbol(), "&&");
    assert_eq!(UnaryOp::BitNot.as_symbol(), "~");
}

#[test]
fn node_id_debug() {
    assert_eq!(format!("{:?}", NodeId::new(7)), "NodeId(7)");
}

#[test]
fn call_children_put_receiver_first() {
    let mut arena = NodeArena::new();
    let target = arena.local("list", JvmType::reference("java.util.List"));
    let arg = arena.int(3);
    let call = NodeKind::Call {
        receiver: Receiver::Expr(target),
        method: "get".into(),
        args: vec![arg],
        returns: JvmType::object(),
    };
    assert_eq!(call.children(), vec![target, arg]);

    let implicit = NodeKind::Call {
        receiver: Receiver::Implicit,
        method: "run".into(),
        args: Vec::new(),
        returns: JvmType::Void,
    };
    assert!(implicit.children().is_empty());
}

#[test]
fn loop_children_follow_execution_order() {
    let mut arena = NodeArena::new();
    let init = arena.int(0);
    let cond = arena.bool(true);
    let body = arena.int(1);
    let post = arena.int(2);
    let spec = LoopSpec {
        init: Some(init),
        post: Some(post),
        ..LoopSpec::while_loop(cond, Some(body))
    };
    assert_eq!(NodeKind::Loop(spec).children(), vec![init, cond, body, post]);
}

#[test]
fn rescue_children_skip_empty_clauses() {
    let mut arena = NodeArena::new();
    let body = arena.int(1);
    let handler = arena.int(2);
    let rescue = NodeKind::Rescue {
        body: Some(body),
        clauses: vec![
            RescueClause {
                types: vec![JvmType::reference("java.lang.Exception")],
                name: None,
                body: None,
            },
            RescueClause {
                types: vec![JvmType::reference("java.lang.Error")],
                name: Some("e".into()),
                body: Some(handler),
            },
        ],
        else_branch: None,
    };
    assert_eq!(rescue.children(), vec![body, handler]);
}
