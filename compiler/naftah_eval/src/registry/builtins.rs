//! The built-in provider: printing, arithmetic, comparison, bitwise, and
//! increment helpers callable by name from script.

use naftah_ir::{BinaryOp, UnaryOp};

use super::{Arity, NativeError, NativeFunction};
#[cfg(test)]
use super::NativeCall;
use crate::operators;
use crate::value::{Number, Value};

/// Provider name of the built-in functions.
pub const BUILTIN_PROVIDER: &str = "مزوّد دوال مدمجة";

fn number_arg(args: &[Value], index: usize) -> Result<Number, NativeError> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(*n),
        Some(Value::NaN) => Ok(Number::Float(f64::NAN)),
        other => Err(NativeError::InvalidArgument {
            index,
            expected: "رقم",
            found: other.map_or("لاشيء", Value::type_name),
        }),
    }
}

fn arity_error(expected: usize, found: usize) -> NativeError {
    NativeError::Message(format!("expected {expected} arguments, found {found}"))
}

fn binary(name: &'static str, op: BinaryOp) -> NativeFunction {
    NativeFunction::builtin(BUILTIN_PROVIDER, name, Arity::exact(2), move |_, args| {
        let [left, right] = args else {
            return Err(arity_error(2, args.len()));
        };
        Ok(operators::binary(op, left, right)?)
    })
}

fn unary(name: &'static str, op: UnaryOp) -> NativeFunction {
    NativeFunction::builtin(BUILTIN_PROVIDER, name, Arity::exact(1), move |_, args| {
        let [operand] = args else {
            return Err(arity_error(1, args.len()));
        };
        Ok(operators::unary(op, operand)?)
    })
}

/// One-argument numeric function.
fn numeric(name: &'static str, f: fn(Number) -> Result<Number, NativeError>) -> NativeFunction {
    NativeFunction::builtin(BUILTIN_PROVIDER, name, Arity::exact(1), move |_, args| {
        Ok(Value::from(f(number_arg(args, 0)?)?))
    })
}

/// Round a float with `f`, keeping integers as they are.
fn rounding(n: Number, f: fn(f64) -> f64) -> Result<Number, NativeError> {
    Ok(match n {
        Number::Int(_) => n,
        Number::Float(x) => {
            let rounded = Number::Float(f(x));
            rounded.as_i64().map_or(rounded, Number::Int)
        }
    })
}

fn extremum(name: &'static str, pick_left: fn(std::cmp::Ordering) -> bool) -> NativeFunction {
    NativeFunction::builtin(BUILTIN_PROVIDER, name, Arity::exact(2), move |_, args| {
        let (a, b) = (number_arg(args, 0)?, number_arg(args, 1)?);
        Ok(match a.compare(b) {
            Some(ordering) if pick_left(ordering) => Value::from(a),
            Some(_) => Value::from(b),
            None => Value::NaN,
        })
    })
}

fn step(name: &'static str, delta: i64, returns_updated: bool) -> NativeFunction {
    NativeFunction::builtin(BUILTIN_PROVIDER, name, Arity::exact(1), move |_, args| {
        let n = number_arg(args, 0)?;
        if returns_updated {
            Ok(Value::from(n.add(Number::Int(delta))?))
        } else {
            Ok(Value::from(n))
        }
    })
}

pub(super) fn functions() -> Vec<NativeFunction> {
    vec![
        NativeFunction::builtin(BUILTIN_PROVIDER, "إطبع", Arity::at_least(1), |call, args| {
            let line = args
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            call.println(&line);
            Ok(Value::None)
        })
        .returning_void()
        .with_description("Print the arguments on one line"),
        // Arithmetic
        binary("إجمع", BinaryOp::Add),
        binary("إطرح", BinaryOp::Sub),
        binary("إضرب", BinaryOp::Mul),
        binary("إقسم", BinaryOp::Div),
        binary("باقي_القسمة", BinaryOp::Mod),
        binary("إرفع", BinaryOp::Pow),
        extremum("الأكبر", |o| o != std::cmp::Ordering::Less),
        extremum("الأصغر", |o| o != std::cmp::Ordering::Greater),
        numeric("تقريب", |n| rounding(n, f64::round)),
        numeric("أرضي", |n| rounding(n, f64::floor)),
        numeric("سقف", |n| rounding(n, f64::ceil)),
        numeric("إنفي", |n| Ok(n.neg()?)),
        numeric("جذر", |n| Ok(Number::Float(n.as_f64().sqrt()))),
        numeric("القيمة_المطلقة", |n| Ok(n.abs()?)),
        numeric("إشارة", |n| {
            Ok(match n {
                Number::Int(i) => Number::Int(i.signum()),
                Number::Float(x) if x == 0.0 || x.is_nan() => Number::Float(x),
                Number::Float(x) => Number::Int(if x > 0.0 { 1 } else { -1 }),
            })
        }),
        // Comparison
        numeric_predicate("هل_صفر"),
        binary("هل_يساوي", BinaryOp::Eq),
        binary("هل_لا_يساوي", BinaryOp::NotEq),
        binary("هل_أصغر_من", BinaryOp::Lt),
        binary("هل_أصغر_أو_يساوي", BinaryOp::LtEq),
        binary("هل_أكبر_من", BinaryOp::Gt),
        binary("هل_أكبر_أو_يساوي", BinaryOp::GtEq),
        // Bitwise
        binary("و_بتي", BinaryOp::BitAnd),
        binary("أو_بتي", BinaryOp::BitOr),
        binary("حصري_أو_بتي", BinaryOp::BitXor),
        unary("ليس_بتي", UnaryOp::BitNot),
        binary("إزاحة_إلى_اليسار", BinaryOp::Shl),
        binary("إزاحة_إلى_اليمين", BinaryOp::Shr),
        binary("إزاحة_إلى_اليمين_غير_موقعة", BinaryOp::UnsignedShr),
        // Increment and decrement. These compute; the update expression
        // writes the new value back.
        step("زيادة_قبلية", 1, true),
        step("زيادة_بعدية", 1, false),
        step("نقصان_قبلي", -1, true),
        step("نقصان_بعدي", -1, false),
    ]
}

fn numeric_predicate(name: &'static str) -> NativeFunction {
    NativeFunction::builtin(BUILTIN_PROVIDER, name, Arity::exact(1), |_, args| {
        Ok(Value::Boolean(number_arg(args, 0)?.is_zero()))
    })
}

/// Built-in used by `++x` / `x--`: returns the value the expression yields.
pub(crate) fn update_name(increment: bool, prefix: bool) -> &'static str {
    match (increment, prefix) {
        (true, true) => "زيادة_قبلية",
        (true, false) => "زيادة_بعدية",
        (false, true) => "نقصان_قبلي",
        (false, false) => "نقصان_بعدي",
    }
}

/// Invoke a built-in by name outside an interpreter.
#[cfg(test)]
pub(super) fn call_builtin(name: &str, args: &[Value]) -> Result<Value, NativeError> {
    let print = crate::print_handler::PrintHandlerImpl::Silent;
    let mut call = NativeCall::new(name, naftah_ir::Span::DUMMY, &print);
    functions()
        .into_iter()
        .find(|f| f.name == name)
        .ok_or_else(|| NativeError::Message(format!("no builtin {name}")))?
        .invoke(&mut call, args)
}
