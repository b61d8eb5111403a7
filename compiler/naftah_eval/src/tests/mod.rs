//! Evaluator suites.
//!
//! Each test builds its tree with `TreeBuilder` and runs it on an
//! interpreter whose `إطبع` output goes to a buffer.

mod call_tests;
mod expr_tests;

use naftah_ir::{Expr, Stmt, TreeBuilder};

use crate::{buffer_handler, EvalMode, EvalResult, Interpreter, Value};

/// Script-mode interpreter printing into a buffer.
fn interpreter() -> Interpreter {
    interpreter_in(EvalMode::Script)
}

fn interpreter_in(mode: EvalMode) -> Interpreter {
    Interpreter::builder()
        .mode(mode)
        .print_handler(buffer_handler())
        .build()
}

/// Run `statements` as one script. Returns the result and the printed text.
fn run(b: &mut TreeBuilder, statements: Vec<Stmt>) -> (EvalResult<Value>, String) {
    let mut interpreter = interpreter();
    let program = b.program(statements);
    let result = interpreter.run(&program);
    (result, interpreter.print_handler().get_output())
}

/// `إطبع(value)`
fn print(b: &mut TreeBuilder, value: Expr) -> Stmt {
    let call = b.call("إطبع", vec![value]);
    b.expr_stmt(call)
}
