//! Literals, names, containers, and operators.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use naftah_ir::{
    BinaryOp, DeclKeyword, Expr, Stmt, TextKind, TreeBuilder, TypeName, UnaryOp, UpdateOp,
};
use pretty_assertions::assert_eq;

use super::{print, run};
use crate::{EvalErrorKind, EvalResult, Value, NONE_TEXT};

/// Run `setup`, then `expr` as the final statement.
fn eval(b: &mut TreeBuilder, mut setup: Vec<Stmt>, expr: Expr) -> EvalResult<Value> {
    setup.push(b.expr_stmt(expr));
    run(b, setup).0
}

#[test]
fn test_arithmetic_precedence_is_tree_shape() {
    let mut b = TreeBuilder::new();
    let two = b.int(2);
    let three = b.int(3);
    let product = b.binary(BinaryOp::Mul, two, three);
    let one = b.int(1);
    let sum = b.binary(BinaryOp::Add, one, product);
    assert_eq!(eval(&mut b, vec![], sum).unwrap(), Value::int(7));
}

#[test]
fn test_number_literals() {
    let mut b = TreeBuilder::new();
    let hex = b.radix("ff", 16);
    assert_eq!(eval(&mut b, vec![], hex).unwrap(), Value::int(255));
    let float = b.number("2.5");
    assert_eq!(eval(&mut b, vec![], float).unwrap(), Value::float(2.5));
    let bad = b.number("2.5.1");
    assert!(matches!(
        eval(&mut b, vec![], bad).unwrap_err().kind,
        EvalErrorKind::InvalidNumber { .. }
    ));
}

#[test]
fn test_interpolation_uses_bindings_and_defaults() {
    let mut b = TreeBuilder::new();
    let name = b.text("سارة");
    let decl = b.var("الاسم", name);
    let none = b.none();
    let empty = b.var("فارغ", none);
    let template = b.text("\"مرحبا ${الاسم} {{العمر:مجهول}} {فارغ:بديل}$ ${غائب}\"");
    let result = eval(&mut b, vec![decl, empty], template).unwrap();
    assert_eq!(
        result,
        Value::text(format!("مرحبا سارة مجهول بديل {NONE_TEXT}"))
    );
}

#[test]
fn test_raw_and_byte_text() {
    let mut b = TreeBuilder::new();
    let raw = b.text_of("«${لا_استبدال}»", TextKind::Raw);
    assert_eq!(eval(&mut b, vec![], raw).unwrap(), Value::text("${لا_استبدال}"));
    let bytes = b.text_of("\"ab\"", TextKind::Bytes);
    assert_eq!(eval(&mut b, vec![], bytes).unwrap(), Value::bytes(b"ab".to_vec()));
    let quoted = b.text_of("\"قال «مرحبا»\"", TextKind::Raw);
    assert_eq!(eval(&mut b, vec![], quoted).unwrap(), Value::text("قال مرحبا"));
}

#[test]
fn test_list_homogeneity_under_number_type() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let two = b.int(2);
    let x = b.text("x");
    let list = b.list(vec![one, two, x]);
    let typed = b.assign_decl(Some(DeclKeyword::Variable), "ق", Some(TypeName::Number), list);
    let (result, _) = run(&mut b, vec![typed]);
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn test_mixed_list_under_dynamic_type() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let two = b.int(2);
    let x = b.text("x");
    let list = b.list(vec![one, two, x]);
    let dynamic = b.var("ق", list);
    let read = b.ident("ق");
    let result = eval(&mut b, vec![dynamic], read).unwrap();
    assert_eq!(
        result,
        Value::list(vec![Value::int(1), Value::int(2), Value::text("x")])
    );
}

#[test]
fn test_mixed_list_under_container_type() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let x = b.text("x");
    let list = b.list(vec![one, x]);
    let typed = b.assign_decl(Some(DeclKeyword::Variable), "ق", Some(TypeName::List), list);
    let (result, _) = run(&mut b, vec![typed]);
    assert!(result.is_ok());
}

#[test]
fn test_optional_chain() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let field = b.field("س", one);
    let object = b.object(vec![field]);
    let decl = b.var("أ", object);

    let optional = b.path("أ:ب؟:ج");
    assert_eq!(eval(&mut b, vec![decl.clone()], optional).unwrap(), Value::None);

    let required = b.path("أ:ب:ج");
    let err = eval(&mut b, vec![decl], required).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::VariableNotFound { .. }));
}

#[test]
fn test_object_fields_read_and_write() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let field = b.field("س", one);
    let two = b.int(2);
    let constant = b.constant_field("ث", two);
    let object = b.object(vec![field, constant]);
    let decl = b.var("أ", object);
    let five = b.int(5);
    let assign = b.assign("أ:س", five);
    let read = b.path("أ:س");
    assert_eq!(
        eval(&mut b, vec![decl.clone(), assign], read).unwrap(),
        Value::int(5)
    );

    let three = b.int(3);
    let assign_constant = b.assign("أ:ث", three);
    let (result, _) = run(&mut b, vec![decl, assign_constant]);
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::ConstantReassignment { .. }
    ));
}

#[test]
fn test_map_rejects_duplicate_key() {
    let mut b = TreeBuilder::new();
    let (k1, v1) = (b.int(1), b.text("x"));
    let (k2, v2) = (b.int(1), b.text("y"));
    let map = b.map(false, vec![(k1, v1), (k2, v2)]);
    let err = eval(&mut b, vec![], map).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::DuplicateKey { .. }));
}

#[test]
fn test_map_rejects_null_key() {
    let mut b = TreeBuilder::new();
    let (k, v) = (b.none(), b.text("x"));
    let map = b.map(false, vec![(k, v)]);
    let err = eval(&mut b, vec![], map).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::NullKey);
}

#[test]
fn test_map_identifier_keys_and_lookup() {
    let mut b = TreeBuilder::new();
    let (k, v) = (b.ident("مفتاح"), b.int(1));
    let map = b.map(true, vec![(k, v)]);
    let decl = b.var("م", map);

    let base = b.ident("م");
    let key = b.text("مفتاح");
    let hit = b.index(base, key);
    assert_eq!(eval(&mut b, vec![decl.clone()], hit).unwrap(), Value::int(1));

    let base = b.ident("م");
    let key = b.text("غائب");
    let miss = b.index(base, key);
    assert_eq!(eval(&mut b, vec![decl], miss).unwrap(), Value::None);
}

#[test]
fn test_typed_map_checks_key_types() {
    let mut b = TreeBuilder::new();
    let (k1, v1) = (b.int(1), b.int(10));
    let (k2, v2) = (b.text("ب"), b.int(20));
    let map = b.map(false, vec![(k1, v1), (k2, v2)]);
    let typed = b.assign_decl(Some(DeclKeyword::Variable), "م", Some(TypeName::Number), map);
    let (result, _) = run(&mut b, vec![typed]);
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn test_set_rejects_duplicate_element() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let again = b.int(1);
    let set = b.set(false, vec![one, again]);
    let err = eval(&mut b, vec![], set).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::DuplicateElement { .. }));
}

#[test]
fn test_index_assignment_is_shared() {
    let mut b = TreeBuilder::new();
    let items: Vec<_> = (1..=3).map(|i| b.int(i)).collect();
    let list = b.list(items);
    let decl = b.var("ق", list);
    let alias_value = b.ident("ق");
    let alias = b.var("نسخة", alias_value);
    let index = b.int(0);
    let seven = b.int(7);
    let store = b.assign_index("نسخة", vec![index], seven);
    let base = b.ident("ق");
    let index = b.int(0);
    let read = b.index(base, index);
    assert_eq!(
        eval(&mut b, vec![decl, alias, store], read).unwrap(),
        Value::int(7)
    );
}

#[test]
fn test_index_out_of_bounds() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let list = b.list(vec![one]);
    let five = b.int(5);
    let read = b.index(list, five);
    let err = eval(&mut b, vec![], read).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::IndexOutOfBounds { .. }));
}

#[test]
fn test_text_indexing_yields_characters() {
    let mut b = TreeBuilder::new();
    let text = b.text("سلام");
    let one = b.int(1);
    let read = b.index(text, one);
    assert_eq!(eval(&mut b, vec![], read).unwrap(), Value::Character('ل'));
}

#[test]
fn test_update_expressions() {
    let mut b = TreeBuilder::new();
    let five = b.int(5);
    let decl = b.var("س", five);
    let post = b.update(UpdateOp::Increment, false, "س");
    let post = b.var("أ", post);
    let pre = b.update(UpdateOp::Increment, true, "س");
    let pre = b.var("ب", pre);
    let dec = b.update(UpdateOp::Decrement, false, "س");
    let dec = b.var("ج", dec);
    let a = b.ident("أ");
    let print_a = print(&mut b, a);
    let bb = b.ident("ب");
    let print_b = print(&mut b, bb);
    let c = b.ident("ج");
    let print_c = print(&mut b, c);
    let s = b.ident("س");
    let print_s = print(&mut b, s);
    let (result, output) = run(
        &mut b,
        vec![decl, post, pre, dec, print_a, print_b, print_c, print_s],
    );
    result.unwrap();
    assert_eq!(output, "5\n7\n7\n6\n");
}

#[test]
fn test_update_requires_number() {
    let mut b = TreeBuilder::new();
    let text = b.text("x");
    let decl = b.var("س", text);
    let update = b.update(UpdateOp::Increment, true, "س");
    let err = eval(&mut b, vec![decl], update).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::TypeMismatch { .. }));
}

#[test]
fn test_logical_operators_short_circuit() {
    let mut b = TreeBuilder::new();
    let f = b.boolean(false);
    let missing = b.call("غير_موجودة", vec![]);
    let and = b.binary(BinaryOp::And, f, missing);
    assert_eq!(eval(&mut b, vec![], and).unwrap(), Value::Boolean(false));

    let t = b.boolean(true);
    let missing = b.ident("غير_معرف");
    let or = b.binary(BinaryOp::Or, t, missing);
    assert_eq!(eval(&mut b, vec![], or).unwrap(), Value::Boolean(true));

    let none = b.none();
    let three = b.int(3);
    let coalesce = b.binary(BinaryOp::Coalesce, none, three);
    assert_eq!(eval(&mut b, vec![], coalesce).unwrap(), Value::int(3));
}

#[test]
fn test_unary_and_ternary() {
    let mut b = TreeBuilder::new();
    let four = b.int(4);
    let neg = b.unary(UnaryOp::Minus, four);
    assert_eq!(eval(&mut b, vec![], neg).unwrap(), Value::int(-4));

    let cond = b.boolean(false);
    let yes = b.text("نعم");
    let no = b.text("لا");
    let ternary = b.ternary(cond, yes, no);
    assert_eq!(eval(&mut b, vec![], ternary).unwrap(), Value::text("لا"));
}

#[test]
fn test_unknown_identifier() {
    let mut b = TreeBuilder::new();
    let read = b.ident("مجهول");
    let err = eval(&mut b, vec![], read).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::VariableNotFound {
            name: "مجهول".to_string()
        }
    );
    assert!(err.span.is_some());
}

#[test]
fn test_tuple_skips_type_checks() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let x = b.text("x");
    let tuple = b.tuple(vec![one, x]);
    assert_eq!(
        eval(&mut b, vec![], tuple).unwrap(),
        Value::tuple(vec![Value::int(1), Value::text("x")])
    );
}
