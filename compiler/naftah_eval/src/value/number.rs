//! Numeric values.
//!
//! Integers stay integral until an operation cannot represent its result
//! exactly; then the result widens to a float. Integer overflow is an error,
//! never a silent wrap.

use std::cmp::Ordering;
use std::fmt;
use std::num::IntErrorKind;

use crate::errors::{arithmetic_overflow, division_by_zero, invalid_number};
use crate::EvalResult;

#[derive(Copy, Clone, Debug)]
pub enum Number {
    Int(i64),
    Float(f64),
}

#[expect(
    clippy::cast_precision_loss,
    reason = "integers widen to floats in mixed arithmetic"
)]
fn widen(i: i64) -> f64 {
    i as f64
}

/// Map Arabic-Indic and Extended Arabic-Indic digits to ASCII, and the
/// Arabic decimal separators to `.`.
fn normalize_digits(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '_')
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => ascii_digit(c, '\u{0660}'),
            '\u{06F0}'..='\u{06F9}' => ascii_digit(c, '\u{06F0}'),
            ',' | '٫' | '،' | '٬' => '.',
            other => other,
        })
        .collect()
}

fn ascii_digit(c: char, zero: char) -> char {
    let offset = u32::from(c) - u32::from(zero);
    char::from_digit(offset, 10).unwrap_or(c)
}

impl Number {
    /// Parse a decimal literal as written in source.
    pub fn parse_literal(text: &str) -> EvalResult<Number> {
        let normalized = normalize_digits(text.trim());
        if normalized.contains(['.', 'e', 'E']) {
            return normalized
                .parse::<f64>()
                .map(Number::Float)
                .map_err(|_| invalid_number(text));
        }
        match normalized.parse::<i64>() {
            Ok(i) => Ok(Number::Int(i)),
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                normalized
                    .parse::<f64>()
                    .map(Number::Float)
                    .map_err(|_| invalid_number(text))
            }
            Err(_) => Err(invalid_number(text)),
        }
    }

    /// Parse `digits` in base `radix` (2 to 36).
    pub fn parse_radix(digits: &str, radix: u32) -> EvalResult<Number> {
        if !(2..=36).contains(&radix) {
            return Err(invalid_number(&format!("{digits} (base {radix})")));
        }
        let normalized = normalize_digits(digits.trim());
        i64::from_str_radix(&normalized, radix)
            .map(Number::Int)
            .map_err(|_| invalid_number(&format!("{digits} (base {radix})")))
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => widen(i),
            Number::Float(f) => f,
        }
    }

    /// Integral value, accepting floats with no fractional part.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "only whole floats inside the i64 range are converted"
    )]
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(i),
            Number::Float(f) if f.fract() == 0.0 && f.abs() < 9.2e18 => Some(f as i64),
            Number::Float(_) => None,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    pub fn is_nan(self) -> bool {
        matches!(self, Number::Float(f) if f.is_nan())
    }

    pub fn add(self, other: Number) -> EvalResult<Number> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_add(b)
                .map(Number::Int)
                .ok_or_else(|| arithmetic_overflow("addition")),
            (a, b) => Ok(Number::Float(a.as_f64() + b.as_f64())),
        }
    }

    pub fn sub(self, other: Number) -> EvalResult<Number> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_sub(b)
                .map(Number::Int)
                .ok_or_else(|| arithmetic_overflow("subtraction")),
            (a, b) => Ok(Number::Float(a.as_f64() - b.as_f64())),
        }
    }

    pub fn mul(self, other: Number) -> EvalResult<Number> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_mul(b)
                .map(Number::Int)
                .ok_or_else(|| arithmetic_overflow("multiplication")),
            (a, b) => Ok(Number::Float(a.as_f64() * b.as_f64())),
        }
    }

    /// Exact integer quotients stay integers; others widen.
    pub fn div(self, other: Number) -> EvalResult<Number> {
        if other.is_zero() {
            return Err(division_by_zero());
        }
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => {
                if a % b == 0 {
                    a.checked_div(b)
                        .map(Number::Int)
                        .ok_or_else(|| arithmetic_overflow("division"))
                } else {
                    Ok(Number::Float(widen(a) / widen(b)))
                }
            }
            (a, b) => Ok(Number::Float(a.as_f64() / b.as_f64())),
        }
    }

    pub fn rem(self, other: Number) -> EvalResult<Number> {
        if other.is_zero() {
            return Err(division_by_zero());
        }
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_rem(b)
                .map(Number::Int)
                .ok_or_else(|| arithmetic_overflow("remainder")),
            (a, b) => Ok(Number::Float(a.as_f64() % b.as_f64())),
        }
    }

    pub fn pow(self, other: Number) -> EvalResult<Number> {
        match (self, other) {
            (Number::Int(base), Number::Int(exp)) if exp >= 0 => {
                let exp = u32::try_from(exp).map_err(|_| arithmetic_overflow("power"))?;
                base.checked_pow(exp)
                    .map(Number::Int)
                    .ok_or_else(|| arithmetic_overflow("power"))
            }
            (a, b) => Ok(Number::Float(a.as_f64().powf(b.as_f64()))),
        }
    }

    pub fn neg(self) -> EvalResult<Number> {
        match self {
            Number::Int(i) => i
                .checked_neg()
                .map(Number::Int)
                .ok_or_else(|| arithmetic_overflow("negation")),
            Number::Float(f) => Ok(Number::Float(-f)),
        }
    }

    pub fn abs(self) -> EvalResult<Number> {
        match self {
            Number::Int(i) => i
                .checked_abs()
                .map(Number::Int)
                .ok_or_else(|| arithmetic_overflow("absolute value")),
            Number::Float(f) => Ok(Number::Float(f.abs())),
        }
    }

    /// Numeric ordering across int and float. `None` when a NaN is involved.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Float(a), Number::Float(b)) if a.is_nan() && b.is_nan() => true,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
                write!(f, "{x:.1}")
            }
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}
