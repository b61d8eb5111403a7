use naftah_ir::{Span, TreeBuilder};
use pretty_assertions::assert_eq;

use super::*;

fn var(name: &str, value: i64) -> DeclaredVariable {
    DeclaredVariable::new(name, Value::int(value), Span::DUMMY)
}

#[test]
fn test_register_and_deregister_are_stacked() {
    let mut reg = ContextRegistry::new(EvalMode::Script);
    assert_eq!(reg.depth(), 0);
    let d1 = reg.register();
    let d2 = reg.register();
    assert_eq!((d1, d2), (1, 2));
    assert_eq!(reg.current().parent(), Some(1));
    // Only the innermost context can close.
    assert!(reg.deregister(d1).is_none());
    assert!(reg.deregister(d2).is_some());
    assert!(reg.deregister(d1).is_some());
    assert!(reg.get(1).is_none());
    // The root stays.
    assert!(reg.deregister(0).is_none());
    assert_eq!(reg.len(), 1);
}

#[test]
fn test_duplicate_declaration_in_same_context() {
    let mut reg = ContextRegistry::new(EvalMode::Script);
    assert_eq!(reg.define_variable(var("س", 1)), Ok(()));
    assert_eq!(
        reg.define_variable(var("س", 2)),
        Err(AssignError::Duplicate {
            name: "س".to_string()
        })
    );
    // Shadowing in a child context is allowed.
    reg.register();
    assert_eq!(reg.define_variable(var("س", 3)), Ok(()));
    assert_eq!(
        reg.get_variable("س", true)
            .map(|(d, v)| (d, v.value.clone())),
        Some((1, Value::int(3)))
    );
}

#[test]
fn test_lookup_without_ancestors() {
    let mut reg = ContextRegistry::new(EvalMode::Script);
    assert_eq!(reg.define_variable(var("أ", 1)), Ok(()));
    reg.register();
    assert!(reg.get_variable("أ", false).is_none());
    assert_eq!(reg.get_variable("أ", true).map(|(d, _)| d), Some(0));
}

#[test]
fn test_set_variable_mutates_owner() {
    let mut reg = ContextRegistry::new(EvalMode::Script);
    assert_eq!(reg.define_variable(var("أ", 1)), Ok(()));
    let depth = reg.register();
    assert_eq!(reg.set_variable("أ", Value::int(5)), Ok(()));
    reg.deregister(depth);
    assert_eq!(
        reg.get_variable("أ", false).map(|(_, v)| v.value.clone()),
        Some(Value::int(5))
    );
}

#[test]
fn test_set_variable_rejects_constants_and_mismatches() {
    let mut reg = ContextRegistry::new(EvalMode::Script);
    let constant = DeclaredVariable::constant("ث", Value::int(1), Span::DUMMY);
    assert_eq!(reg.define_variable(constant), Ok(()));
    assert_eq!(
        reg.set_variable("ث", Value::int(2)),
        Err(AssignError::Constant {
            name: "ث".to_string()
        })
    );
    let typed = var("ع", 1).with_type(Some(TypeName::Number));
    assert_eq!(reg.define_variable(typed), Ok(()));
    assert!(matches!(
        reg.set_variable("ع", Value::text("x")),
        Err(AssignError::TypeMismatch { .. })
    ));
    assert_eq!(
        reg.set_variable("مجهول", Value::None),
        Err(AssignError::NotFound {
            name: "مجهول".to_string()
        })
    );
}

#[test]
fn test_script_mode_discards_declarations() {
    let mut reg = ContextRegistry::new(EvalMode::Script);
    let depth = reg.register();
    assert_eq!(reg.define_variable(var("مؤقت", 1)), Ok(()));
    reg.deregister(depth);
    assert!(reg.get_variable("مؤقت", true).is_none());
    assert_eq!(reg.len(), 1);
}

#[test]
fn test_repl_mode_merges_into_parent() {
    let mut reg = ContextRegistry::new(EvalMode::Repl);
    let depth = reg.register();
    assert_eq!(reg.define_variable(var("دائم", 1)), Ok(()));
    let child_names: Vec<String> = reg.current().variables().keys().cloned().collect();
    reg.deregister(depth);
    let root = reg.current();
    for name in child_names {
        assert!(root.variables().contains_key(&name));
    }
}

#[test]
fn test_loop_variables_are_not_merged() {
    let mut reg = ContextRegistry::new(EvalMode::Repl);
    let depth = reg.register();
    reg.bind_loop_variable(var("ع", 1));
    reg.bind_loop_variable(var("ع", 2));
    assert_eq!(reg.set_variable("ع", Value::int(3)), Ok(()));
    let value = reg.get_variable("ع", false).map(|(_, var)| var.value.clone());
    assert_eq!(value, Some(Value::int(3)));
    assert!(reg.current().variables().is_empty());
    reg.deregister(depth);
    assert!(reg.get_variable("ع", true).is_none());
}

#[test]
fn test_call_contexts_keep_their_state() {
    let mut reg = ContextRegistry::new(EvalMode::Repl);
    let depth = reg.register();
    reg.current_mut().function_call_id = Some("1-f-0".to_string());
    assert_eq!(reg.define_variable(var("معامل", 1)), Ok(()));
    reg.mark_executed(NodeId::new(7));
    reg.deregister(depth);
    assert!(reg.get_variable("معامل", true).is_none());
    assert!(!reg.current().is_executed(NodeId::new(7)));
}

#[test]
fn test_executed_markers_move_to_parent() {
    let mut b = TreeBuilder::new();
    let ret = b.return_stmt(None);
    let inner = b.block_stmt(vec![ret.clone()]);

    let mut reg = ContextRegistry::new(EvalMode::Script);
    let outer = reg.register();
    let nested = reg.register();
    reg.mark_executed(ret.id);
    reg.deregister(nested);
    assert!(reg.has_executed_descendant_of_kind(outer, &inner, NodeKind::Return));
    assert!(!reg.has_executed_descendant_of_kind(outer, &inner, NodeKind::Break));
    reg.deregister(outer);
    // The root is below the queried depth.
    assert!(!reg.has_executed_descendant_of_kind(1, &inner, NodeKind::Return));
}

#[test]
fn test_replace_variable_shadows_and_restores() {
    let mut reg = ContextRegistry::new(EvalMode::Script);
    assert_eq!(reg.define_variable(var("ن", 1)), Ok(()));
    let previous = reg.replace_variable("ن", Some(var("ن", 2)));
    assert_eq!(previous.map(|v| v.value), Some(Value::int(1)));
    let shadow = reg.replace_variable("ن", None);
    assert_eq!(shadow.map(|v| v.value), Some(Value::int(2)));
    assert!(reg.get_variable("ن", true).is_none());
}

#[test]
fn test_pending_declared_type_needs_flag() {
    let mut reg = ContextRegistry::new(EvalMode::Script);
    let ctx = reg.current_mut();
    ctx.declaration_of_assignment = Some(var("ق", 0).with_type(Some(TypeName::Number)));
    assert_eq!(ctx.pending_declared_type(), None);
    ctx.flags.insert(ContextFlags::PARSING_ASSIGNMENT);
    assert_eq!(ctx.pending_declared_type(), Some(TypeName::Number));
}

#[test]
fn test_define_function_rejects_duplicates() {
    let mut b = TreeBuilder::new();
    let body = std::rc::Rc::new(b.block(vec![]));
    let func = FunctionRef::Declared(std::rc::Rc::new(crate::declared::DeclaredFunction::new(
        "د",
        vec![],
        None,
        body,
        Span::DUMMY,
    )));
    let mut reg = ContextRegistry::new(EvalMode::Script);
    assert_eq!(reg.define_function("د", func.clone()), Ok(()));
    assert!(reg.define_function("د", func).is_err());
    assert_eq!(reg.get_function("د", true).map(<[FunctionRef]>::len), Some(1));
}
