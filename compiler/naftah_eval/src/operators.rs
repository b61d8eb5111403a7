//! Binary and unary operator semantics.
//!
//! Shared by expression evaluation and the built-in arithmetic helpers.
//! Short-circuit operators are handled by the interpreter before it gets
//! here; [`binary`] still accepts them with both sides already evaluated.
//!
//! Numbers combine with collections element-wise: `[1, 2] * 2` is `[2, 4]`.
//! `ليس_رقم` is contagious through arithmetic.

use std::cmp::Ordering;

use naftah_ir::{BinaryOp, UnaryOp};

use crate::errors::{arithmetic_overflow, invalid_binary_op, invalid_unary_op};
use crate::value::{Number, Value};
use crate::EvalResult;

/// Apply a binary operator to two evaluated operands.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    match op {
        BinaryOp::Eq => Ok(Value::Boolean(left == right)),
        BinaryOp::NotEq => Ok(Value::Boolean(left != right)),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            comparison(op, left, right)
        }
        BinaryOp::And => Ok(Value::Boolean(left.is_truthy() && right.is_truthy())),
        BinaryOp::Or => Ok(Value::Boolean(left.is_truthy() || right.is_truthy())),
        BinaryOp::Coalesce => Ok(if left.is_truthy() {
            left.clone()
        } else {
            right.clone()
        }),
        BinaryOp::BitAnd
        | BinaryOp::BitOr
        | BinaryOp::BitXor
        | BinaryOp::Shl
        | BinaryOp::Shr
        | BinaryOp::UnsignedShr => bitwise(op, left, right),
        BinaryOp::ElementwiseAdd => elementwise(op, BinaryOp::Add, left, right),
        BinaryOp::ElementwiseSub => elementwise(op, BinaryOp::Sub, left, right),
        BinaryOp::ElementwiseMul => elementwise(op, BinaryOp::Mul, left, right),
        BinaryOp::ElementwiseDiv => elementwise(op, BinaryOp::Div, left, right),
        BinaryOp::ElementwiseMod => elementwise(op, BinaryOp::Mod, left, right),
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        | BinaryOp::Pow => arithmetic(op, left, right),
    }
}

fn is_text_like(value: &Value) -> bool {
    matches!(value, Value::Text(_) | Value::Character(_))
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => number_op(op, *a, *b).map(Value::from),
        (Value::NaN, Value::Number(_) | Value::NaN) | (Value::Number(_), Value::NaN) => {
            Ok(Value::NaN)
        }
        (l, r) if op == BinaryOp::Add && (is_text_like(l) || is_text_like(r)) => {
            Ok(Value::text(format!("{l}{r}")))
        }
        (Value::List(a), Value::List(b)) if op == BinaryOp::Add => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        (collection, Value::Number(_) | Value::NaN) if is_sequence(collection) => {
            map_sequence(collection, |item| arithmetic(op, item, right))
        }
        (Value::Number(_) | Value::NaN, collection) if is_sequence(collection) => {
            map_sequence(collection, |item| arithmetic(op, left, item))
        }
        _ => Err(invalid_binary_op(op, left.type_name(), right.type_name())),
    }
}

fn number_op(op: BinaryOp, a: Number, b: Number) -> EvalResult<Number> {
    match op {
        BinaryOp::Add => a.add(b),
        BinaryOp::Sub => a.sub(b),
        BinaryOp::Mul => a.mul(b),
        BinaryOp::Div => a.div(b),
        BinaryOp::Mod => a.rem(b),
        BinaryOp::Pow => a.pow(b),
        _ => Err(invalid_binary_op(op, "رقم", "رقم")),
    }
}

fn is_sequence(value: &Value) -> bool {
    matches!(value, Value::List(_) | Value::Tuple(_))
}

fn sequence_items(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::List(items) => Some(items.borrow().clone()),
        Value::Tuple(items) => Some(items.to_vec()),
        _ => None,
    }
}

/// Rebuild a list or tuple with `f` applied to each element.
fn map_sequence(
    sequence: &Value,
    f: impl FnMut(&Value) -> EvalResult<Value>,
) -> EvalResult<Value> {
    let items = sequence_items(sequence).unwrap_or_default();
    let mapped = items.iter().map(f).collect::<EvalResult<Vec<_>>>()?;
    Ok(match sequence {
        Value::Tuple(_) => Value::tuple(mapped),
        _ => Value::list(mapped),
    })
}

fn elementwise(op: BinaryOp, base: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    match (sequence_items(left), sequence_items(right)) {
        (Some(a), Some(b)) => {
            if a.len() != b.len() {
                return Err(invalid_binary_op(
                    op,
                    &format!("{} of length {}", left.type_name(), a.len()),
                    &format!("{} of length {}", right.type_name(), b.len()),
                ));
            }
            let mapped = a
                .iter()
                .zip(&b)
                .map(|(x, y)| binary(base, x, y))
                .collect::<EvalResult<Vec<_>>>()?;
            Ok(match left {
                Value::Tuple(_) => Value::tuple(mapped),
                _ => Value::list(mapped),
            })
        }
        (Some(_), None) => map_sequence(left, |item| binary(base, item, right)),
        (None, Some(_)) => map_sequence(right, |item| binary(base, left, item)),
        (None, None) => binary(base, left, right),
    }
}

/// Ordering between two values, when one exists.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Character(a), Value::Character(b)) => Some(a.cmp(b)),
        (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn comparison(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    if matches!(left, Value::NaN) || matches!(right, Value::NaN) {
        return Ok(Value::Boolean(false));
    }
    let Some(ordering) = compare(left, right) else {
        return Err(invalid_binary_op(op, left.type_name(), right.type_name()));
    };
    Ok(Value::Boolean(match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    }))
}

fn integer(value: &Value) -> Option<i64> {
    value.as_number().and_then(Number::as_i64)
}

fn shift_amount(op: BinaryOp, amount: i64) -> EvalResult<u32> {
    u32::try_from(amount)
        .ok()
        .filter(|n| *n < 64)
        .ok_or_else(|| arithmetic_overflow(op.as_symbol()))
}

fn bitwise(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    if let (Value::Boolean(a), Value::Boolean(b)) = (left, right) {
        return match op {
            BinaryOp::BitAnd => Ok(Value::Boolean(a & b)),
            BinaryOp::BitOr => Ok(Value::Boolean(a | b)),
            BinaryOp::BitXor => Ok(Value::Boolean(a ^ b)),
            _ => Err(invalid_binary_op(op, left.type_name(), right.type_name())),
        };
    }
    let (Some(a), Some(b)) = (integer(left), integer(right)) else {
        return Err(invalid_binary_op(op, left.type_name(), right.type_name()));
    };
    let result = match op {
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        BinaryOp::Shl => a
            .checked_shl(shift_amount(op, b)?)
            .ok_or_else(|| arithmetic_overflow(op.as_symbol()))?,
        BinaryOp::Shr => a >> shift_amount(op, b)?,
        _ => {
            let bits = u64::from_ne_bytes(a.to_ne_bytes()) >> shift_amount(op, b)?;
            i64::from_ne_bytes(bits.to_ne_bytes())
        }
    };
    Ok(Value::int(result))
}

/// Apply a unary operator.
pub fn unary(op: UnaryOp, operand: &Value) -> EvalResult<Value> {
    match (op, operand) {
        (UnaryOp::Plus, Value::Number(_) | Value::NaN) => Ok(operand.clone()),
        (UnaryOp::Minus | UnaryOp::Not, Value::Number(n)) => n.neg().map(Value::from),
        (UnaryOp::Minus, Value::NaN) => Ok(Value::NaN),
        (UnaryOp::Minus, seq) if is_sequence(seq) => map_sequence(seq, |item| unary(op, item)),
        (UnaryOp::Not, other) => Ok(Value::Boolean(!other.is_truthy())),
        (UnaryOp::BitNot, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (UnaryOp::BitNot, other) => integer(other)
            .map(|i| Value::int(!i))
            .ok_or_else(|| invalid_unary_op(op.as_symbol(), other.type_name())),
        _ => Err(invalid_unary_op(op.as_symbol(), operand.type_name())),
    }
}
