//! Function declaration, argument binding, and native calls.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use naftah_ir::{Argument, BinaryOp, Callee, ReturnType, Stmt, TreeBuilder, TypeName};
use pretty_assertions::assert_eq;

use super::{interpreter, print, run};
use crate::{
    Arity, DynamicObject, EvalErrorKind, EvalResult, Interpreter, NativeError, NativeFunction,
    Value, BUILTIN_PROVIDER,
};

/// `دالة ترتيب(أ، ب = 2، ج = 3) { ارجع أ * 100 + ب * 10 + ج }`
fn ordering_function(b: &mut TreeBuilder) -> Stmt {
    let a = b.ident("أ");
    let hundred = b.int(100);
    let a = b.binary(BinaryOp::Mul, a, hundred);
    let bb = b.ident("ب");
    let ten = b.int(10);
    let bb = b.binary(BinaryOp::Mul, bb, ten);
    let c = b.ident("ج");
    let sum = b.binary(BinaryOp::Add, a, bb);
    let sum = b.binary(BinaryOp::Add, sum, c);
    let ret = b.return_stmt(Some(sum));
    let body = b.block(vec![ret]);
    let two = b.int(2);
    let three = b.int(3);
    let params = vec![
        b.param("أ"),
        b.param_with_default("ب", two),
        b.param_with_default("ج", three),
    ];
    b.function("ترتيب", params, None, body)
}

fn call_ordering(arguments: impl FnOnce(&mut TreeBuilder) -> Vec<Argument>) -> EvalResult<Value> {
    let mut b = TreeBuilder::new();
    let function = ordering_function(&mut b);
    let arguments = arguments(&mut b);
    let call = b.call_with(Callee::plain("ترتيب"), arguments);
    let call = b.expr_stmt(call);
    run(&mut b, vec![function, call]).0
}

#[test]
fn test_defaults_fill_missing_parameters() {
    let result = call_ordering(|b| {
        let one = b.int(1);
        vec![b.arg(one)]
    });
    assert_eq!(result.unwrap(), Value::int(123));
}

#[test]
fn test_named_arguments_bind_by_name() {
    let result = call_ordering(|b| {
        let nine = b.int(9);
        let one = b.int(1);
        vec![b.named_arg("ج", nine), b.named_arg("أ", one)]
    });
    assert_eq!(result.unwrap(), Value::int(129));
}

#[test]
fn test_positional_arguments_fill_in_order() {
    let result = call_ordering(|b| {
        let one = b.int(1);
        let five = b.int(5);
        vec![b.arg(one), b.arg(five)]
    });
    assert_eq!(result.unwrap(), Value::int(153));
}

#[test]
fn test_extra_argument_is_rejected() {
    let result = call_ordering(|b| {
        (1..=4)
            .map(|i| {
                let value = b.int(i);
                b.arg(value)
            })
            .collect()
    });
    let err = result.unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::TooManyArguments {
            name: "ترتيب".to_string(),
            expected: 3,
            found: 4,
        }
    );
}

#[test]
fn test_missing_required_argument() {
    let result = call_ordering(|_| vec![]);
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::TooFewArguments { .. }
    ));
}

#[test]
fn test_binding_a_parameter_twice() {
    let result = call_ordering(|b| {
        let one = b.int(1);
        let two = b.int(2);
        vec![b.arg(one), b.named_arg("أ", two)]
    });
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::DuplicateBinding { .. }
    ));
}

#[test]
fn test_unknown_named_argument() {
    let result = call_ordering(|b| {
        let one = b.int(1);
        let two = b.int(2);
        vec![b.arg(one), b.named_arg("مجهول", two)]
    });
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::UnknownParameter { .. }
    ));
}

#[test]
fn test_return_skips_rest_of_block() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let ret = b.return_stmt(Some(one));
    let missing = b.ident("غير_معرف");
    let missing = b.expr_stmt(missing);
    let body = b.block(vec![ret, missing]);
    let function = b.function("د", vec![], None, body);
    let call = b.call("د", vec![]);
    let call = b.expr_stmt(call);
    let (result, _) = run(&mut b, vec![function, call]);
    assert_eq!(result.unwrap(), Value::int(1));
}

#[test]
fn test_return_from_nested_loop() {
    let mut b = TreeBuilder::new();
    let seven = b.int(7);
    let ret = b.return_stmt(Some(seven));
    let then = b.block(vec![ret]);
    let t = b.boolean(true);
    let inner_if = b.if_stmt(t, then, None);
    let body = b.block(vec![inner_if]);
    let t = b.boolean(true);
    let loop_stmt = b.while_stmt(None, t, body);
    let text = b.text("لن يطبع");
    let after = print(&mut b, text);
    let fn_body = b.block(vec![loop_stmt, after]);
    let function = b.function("د", vec![], None, fn_body);
    let call = b.call("د", vec![]);
    let call = b.expr_stmt(call);
    let (result, output) = run(&mut b, vec![function, call]);
    assert_eq!(result.unwrap(), Value::int(7));
    assert_eq!(output, "");
}

/// `دالة عاملي(ن) { إذا ن <= 1 { ارجع 1 } ارجع ن * عاملي(ن - 1) }`
fn factorial(b: &mut TreeBuilder) -> Stmt {
    let n = b.ident("ن");
    let one = b.int(1);
    let base_case = b.binary(BinaryOp::LtEq, n, one);
    let one = b.int(1);
    let ret_one = b.return_stmt(Some(one));
    let then = b.block(vec![ret_one]);
    let guard = b.if_stmt(base_case, then, None);
    let n = b.ident("ن");
    let one = b.int(1);
    let smaller = b.binary(BinaryOp::Sub, n, one);
    let recurse = b.call("عاملي", vec![smaller]);
    let n = b.ident("ن");
    let product = b.binary(BinaryOp::Mul, n, recurse);
    let ret = b.return_stmt(Some(product));
    let body = b.block(vec![guard, ret]);
    let param = b.param("ن");
    b.function("عاملي", vec![param], None, body)
}

#[test]
fn test_recursion() {
    let mut b = TreeBuilder::new();
    let function = factorial(&mut b);
    let ten = b.int(10);
    let call = b.call("عاملي", vec![ten]);
    let call = b.expr_stmt(call);
    let (result, _) = run(&mut b, vec![function, call]);
    assert_eq!(result.unwrap(), Value::int(3_628_800));
}

#[test]
fn test_call_depth_limit() {
    let mut b = TreeBuilder::new();
    let again = b.call("بلا_نهاية", vec![]);
    let ret = b.return_stmt(Some(again));
    let body = b.block(vec![ret]);
    let function = b.function("بلا_نهاية", vec![], None, body);
    let call = b.call("بلا_نهاية", vec![]);
    let call = b.expr_stmt(call);
    let program = b.program(vec![function, call]);

    let mut interpreter = Interpreter::builder().max_call_depth(Some(50)).build();
    let err = interpreter.run(&program).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::StackOverflow { depth: 50 });
    let backtrace = err.backtrace.unwrap();
    assert_eq!(backtrace.len(), 50);
    assert!(interpreter.call_stack().is_empty());
}

#[test]
fn test_call_context_is_isolated() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let local = b.var("محلي", one);
    let body = b.block(vec![local]);
    let function = b.function("د", vec![], None, body);
    let call = b.call("د", vec![]);
    let call = b.expr_stmt(call);
    let read = b.ident("محلي");
    let read = b.expr_stmt(read);
    let (result, _) = run(&mut b, vec![function, call, read]);
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::VariableNotFound { .. }
    ));
}

#[test]
fn test_callee_reads_enclosing_variables() {
    let mut b = TreeBuilder::new();
    let ten = b.int(10);
    let global = b.var("س", ten);
    let s = b.ident("س");
    let one = b.int(1);
    let sum = b.binary(BinaryOp::Add, s, one);
    let ret = b.return_stmt(Some(sum));
    let body = b.block(vec![ret]);
    let function = b.function("د", vec![], None, body);
    let call = b.call("د", vec![]);
    let call = b.expr_stmt(call);
    let (result, _) = run(&mut b, vec![global, function, call]);
    assert_eq!(result.unwrap(), Value::int(11));
}

#[test]
fn test_break_cannot_escape_function() {
    let mut b = TreeBuilder::new();
    let stop = b.break_stmt(None);
    let body = b.block(vec![stop]);
    let function = b.function("د", vec![], None, body);
    let call = b.call("د", vec![]);
    let call = b.expr_stmt(call);
    let loop_body = b.block(vec![call]);
    let t = b.boolean(true);
    let loop_stmt = b.while_stmt(None, t, loop_body);
    let (result, _) = run(&mut b, vec![function, loop_stmt]);
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::InvalidControlFlowUsage { .. }
    ));
}

#[test]
fn test_return_types() {
    let mut b = TreeBuilder::new();
    let five = b.int(5);
    let ret = b.return_stmt(Some(five));
    let body = b.block(vec![ret]);
    let void = b.function("عدمي", vec![], Some(ReturnType::Void), body);
    let call = b.call("عدمي", vec![]);
    let call = b.expr_stmt(call);
    let (result, _) = run(&mut b, vec![void, call]);
    assert_eq!(result.unwrap(), Value::None);

    let text = b.text("نص");
    let ret = b.return_stmt(Some(text));
    let body = b.block(vec![ret]);
    let typed = b.function("رقمي", vec![], Some(ReturnType::Type(TypeName::Number)), body);
    let call = b.call("رقمي", vec![]);
    let call = b.expr_stmt(call);
    let (result, _) = run(&mut b, vec![typed, call]);
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn test_typed_parameter_rejects_argument() {
    let mut b = TreeBuilder::new();
    let body = b.block(vec![]);
    let param = b.typed_param("ن", TypeName::Number);
    let function = b.function("د", vec![param], None, body);
    let text = b.text("نص");
    let call = b.call("د", vec![text]);
    let call = b.expr_stmt(call);
    let (result, _) = run(&mut b, vec![function, call]);
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn test_function_as_value() {
    let mut b = TreeBuilder::new();
    let function = factorial(&mut b);
    let reference = b.ident("عاملي");
    let alias = b.var("مرجع", reference);
    let four = b.int(4);
    let call = b.call("مرجع", vec![four]);
    let call = b.expr_stmt(call);
    let (result, _) = run(&mut b, vec![function, alias, call]);
    assert_eq!(result.unwrap(), Value::int(24));
}

#[test]
fn test_calling_a_non_function() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let decl = b.var("س", one);
    let call = b.call("س", vec![]);
    let call = b.expr_stmt(call);
    let (result, _) = run(&mut b, vec![decl, call]);
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::NotCallable { .. }
    ));
}

#[test]
fn test_unknown_function() {
    let mut b = TreeBuilder::new();
    let call = b.qualified_call(&["مجهول"], "د", vec![]);
    let call = b.expr_stmt(call);
    let (result, _) = run(&mut b, vec![call]);
    assert_eq!(
        result.unwrap_err().kind,
        EvalErrorKind::FunctionNotFound {
            name: "مجهول::د".to_string()
        }
    );
}

#[test]
fn test_print_builtin() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let x = b.text("x");
    let call = b.call("إطبع", vec![one, x]);
    let call = b.expr_stmt(call);
    let (result, output) = run(&mut b, vec![call]);
    assert_eq!(result.unwrap(), Value::None);
    assert_eq!(output, "1 x\n");
}

#[test]
fn test_qualified_builtin_call() {
    let mut b = TreeBuilder::new();
    let two = b.int(2);
    let three = b.int(3);
    let call = b.qualified_call(&[BUILTIN_PROVIDER], "إجمع", vec![two, three]);
    let call = b.expr_stmt(call);
    let (result, _) = run(&mut b, vec![call]);
    assert_eq!(result.unwrap(), Value::int(5));
}

#[test]
fn test_native_arity_and_named_arguments() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let call = b.call("إجمع", vec![one]);
    let call = b.expr_stmt(call);
    let (result, _) = run(&mut b, vec![call]);
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::TooFewArguments { .. }
    ));

    let one = b.int(1);
    let named = vec![b.named_arg("س", one)];
    let call = b.call_with(Callee::plain("إطبع"), named);
    let call = b.expr_stmt(call);
    let (result, _) = run(&mut b, vec![call]);
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::UnknownParameter { .. }
    ));
}

#[test]
fn test_native_errors() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let zero = b.int(0);
    let call = b.call("إقسم", vec![one, zero]);
    let call = b.expr_stmt(call);
    let (result, _) = run(&mut b, vec![call]);
    assert_eq!(result.unwrap_err().kind, EvalErrorKind::DivisionByZero);

    let text = b.text("x");
    let call = b.call("القيمة_المطلقة", vec![text]);
    let call = b.expr_stmt(call);
    let (result, _) = run(&mut b, vec![call]);
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::NativeInvocationFailure { .. }
    ));
}

#[test]
fn test_host_instance_function_needs_receiver() {
    let mut b = TreeBuilder::new();
    let one = b.int(1);
    let bad = b.call("الاسم", vec![one]);
    let bad = b.expr_stmt(bad);
    let program = b.program(vec![bad]);

    let mut interpreter = interpreter();
    interpreter
        .registry_mut()
        .register_host(NativeFunction::host(
            "ملفات",
            "الاسم",
            Arity::exact(1),
            false,
            |_, args| match args.first() {
                Some(Value::Object(object)) => Ok(Value::text(
                    object
                        .borrow()
                        .host_instance()
                        .map_or("؟", |host| host.type_name.as_str()),
                )),
                _ => Err(NativeError::Message("expected an object".to_string())),
            },
        ));
    let err = interpreter.run(&program).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::InvalidInstanceCall { .. }));

    let file = Value::object(DynamicObject::host("ملف", std::rc::Rc::new(())));
    let function = interpreter.registry().lookup("الاسم").unwrap()[0].clone();
    let name = interpreter
        .call(&function, vec![(None, file)], naftah_ir::Span::DUMMY)
        .unwrap();
    assert_eq!(name, Value::text("ملف"));
}
