//! Expression evaluation.

use naftah_ir::{
    BinaryOp, CollectionKind, DeclKeyword, Expr, ExprKind, Literal, ObjectField, QualifiedName,
    Span, TextKind, TypeName, UpdateOp,
};

use super::declare::check_declared;
use super::Interpreter;
use crate::context::ContextFlags;
use crate::declared::FunctionRef;
use crate::errors::{
    duplicate_element, duplicate_key, index_out_of_bounds, native_invocation_failure, null_key,
    type_mismatch, variable_not_found,
};
use crate::interpolate::{interpolate, strip_delimiters};
use crate::registry::{update_name, NativeCall, BUILTIN_PROVIDER};
use crate::stack::ensure_sufficient_stack;
use crate::typecheck::{self, ElementChecker};
use crate::value::{DynamicObject, MapValue, Number, SetValue};
use crate::{operators, qualified, DeclaredVariable, EvalResult, Value};

/// Position `index` in a sequence of `len` elements.
pub(super) fn list_position(index: &Value, len: usize) -> EvalResult<usize> {
    let Value::Number(n) = index else {
        return Err(type_mismatch(TypeName::Number, index.type_name()));
    };
    n.as_i64()
        .and_then(|i| usize::try_from(i).ok())
        .filter(|i| *i < len)
        .ok_or_else(|| index_out_of_bounds(&n.to_string(), len))
}

/// `container[index]`.
pub(super) fn index_value(container: &Value, index: &Value) -> EvalResult<Value> {
    match container {
        Value::List(items) => {
            let items = items.borrow();
            Ok(items[list_position(index, items.len())?].clone())
        }
        Value::Tuple(items) => Ok(items[list_position(index, items.len())?].clone()),
        Value::Text(text) => {
            let count = text.chars().count();
            let position = list_position(index, count)?;
            Ok(text.chars().nth(position).map_or(Value::None, Value::Character))
        }
        Value::ByteArray(bytes) => {
            let position = list_position(index, bytes.len())?;
            Ok(Value::int(i64::from(bytes[position])))
        }
        Value::Map(map) => Ok(map.borrow().get(index).cloned().unwrap_or(Value::None)),
        other => Err(type_mismatch(TypeName::List, other.type_name())),
    }
}

impl Interpreter {
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr))
            .map_err(|err| err.with_span(expr.span))
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Literal(literal) => self.eval_literal(literal),
            ExprKind::Identifier(name) => self.eval_identifier(name),
            ExprKind::Path(path) => qualified::resolve(&self.contexts, path),
            ExprKind::Index { base, index } => {
                let base = self.eval_expr(base)?;
                let index = self.eval_expr(index)?;
                index_value(&base, &index)
            }
            ExprKind::Call(call) => self.eval_call(call, expr.span),
            ExprKind::Collection { kind, elements } => self.eval_collection(*kind, elements),
            ExprKind::Map { ordered, entries } => self.eval_map(*ordered, entries),
            ExprKind::Object(fields) => self.eval_object(fields),
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right),
            ExprKind::Unary { op, operand } => {
                let operand = self.eval_expr(operand)?;
                operators::unary(*op, &operand)
            }
            ExprKind::Update { op, prefix, target } => self.eval_update(*op, *prefix, target),
            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                if self.eval_expr(condition)?.is_truthy() {
                    self.eval_expr(then_expr)
                } else {
                    self.eval_expr(else_expr)
                }
            }
        }
    }

    fn eval_literal(&self, literal: &Literal) -> EvalResult<Value> {
        Ok(match literal {
            Literal::None => Value::None,
            Literal::NaN => Value::NaN,
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Number(text) => Value::from(Number::parse_literal(text)?),
            Literal::Radix { digits, radix } => Value::from(Number::parse_radix(digits, *radix)?),
            Literal::Character(c) => Value::Character(*c),
            Literal::Text { value, kind } => match kind {
                TextKind::Interpolated => Value::text(interpolate(value, |name| {
                    self.contexts
                        .get_variable(name, true)
                        .map(|(_, var)| &var.value)
                        .filter(|value| !value.is_none())
                        .map(ToString::to_string)
                })),
                TextKind::Raw => Value::text(strip_delimiters(value)),
                TextKind::Bytes => Value::bytes(strip_delimiters(value).into_bytes()),
            },
        })
    }

    /// A variable, else a function of that name as a value.
    fn eval_identifier(&self, name: &str) -> EvalResult<Value> {
        if let Some((_, var)) = self.contexts.get_variable(name, true) {
            return Ok(var.value.clone());
        }
        self.contexts
            .get_function(name, true)
            .or_else(|| self.registry.lookup(name))
            .and_then(<[FunctionRef]>::first)
            .map(|function| Value::Function(function.clone()))
            .ok_or_else(|| variable_not_found(name))
    }

    fn eval_collection(&mut self, kind: CollectionKind, elements: &[Expr]) -> EvalResult<Value> {
        if kind == CollectionKind::Tuple {
            let mut items = Vec::with_capacity(elements.len());
            for element in elements {
                items.push(self.eval_expr(element)?);
            }
            return Ok(Value::tuple(items));
        }

        let mut checker = ElementChecker::new(self.contexts.current().pending_declared_type());
        let mut items = Vec::with_capacity(elements.len());
        for element in elements {
            let value = self.eval_expr(element)?;
            checker.check(&value).map_err(|err| err.with_span(element.span))?;
            items.push(value);
        }

        match kind {
            CollectionKind::Set { ordered } => {
                let mut set = SetValue::new(ordered);
                for (value, element) in items.into_iter().zip(elements) {
                    let display = value.to_string();
                    if !set.insert(value) {
                        return Err(duplicate_element(&display).with_span(element.span));
                    }
                }
                Ok(Value::set(set))
            }
            _ => Ok(Value::list(items)),
        }
    }

    /// Map literal. Null and repeated keys are always rejected; key and
    /// value types are checked only under a concrete declared type.
    fn eval_map(&mut self, ordered: bool, entries: &[(Expr, Expr)]) -> EvalResult<Value> {
        let declared = typecheck::concrete(self.contexts.current().pending_declared_type());
        let mut first_key_type: Option<TypeName> = None;
        let mut map = MapValue::new(ordered);
        for (key_expr, value_expr) in entries {
            let key = match &key_expr.kind {
                ExprKind::Identifier(name) => Value::text(name.as_str()),
                _ => self.eval_expr(key_expr)?,
            };
            if key.is_none() {
                return Err(null_key().with_span(key_expr.span));
            }
            if map.contains_key(&key) {
                return Err(duplicate_key(&key.to_string()).with_span(key_expr.span));
            }
            let value = self.eval_expr(value_expr)?;
            if declared.is_some() {
                let key_type = key.type_of();
                match first_key_type {
                    Some(first) if typecheck::type_mismatch(&key, key_type, Some(first)) => {
                        return Err(type_mismatch(first, key.type_name()).with_span(key_expr.span));
                    }
                    Some(_) => {}
                    None => first_key_type = key_type,
                }
                check_declared(&value, declared).map_err(|err| err.with_span(value_expr.span))?;
            }
            map.insert(key, value);
        }
        Ok(Value::map(map))
    }

    fn eval_object(&mut self, fields: &[ObjectField]) -> EvalResult<Value> {
        let mut object = DynamicObject::new();
        for field in fields {
            let mut var = DeclaredVariable {
                name: field.name.clone(),
                is_constant: field.keyword == Some(DeclKeyword::Constant),
                declared_type: field.declared_type,
                value: Value::None,
                span: field.span,
            };
            let value = self.with_declaration(ContextFlags::CREATING_OBJECT, &var, |this| {
                this.eval_expr(&field.value)
            })?;
            check_declared(&value, var.declared_type).map_err(|err| err.with_span(field.span))?;
            var.value = value;
            object.define(var);
        }
        Ok(Value::object(object))
    }

    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult<Value> {
        let left = self.eval_expr(left)?;
        match op {
            BinaryOp::And if !left.is_truthy() => Ok(Value::Boolean(false)),
            BinaryOp::Or if left.is_truthy() => Ok(Value::Boolean(true)),
            BinaryOp::Coalesce if left.is_truthy() => Ok(left),
            _ => {
                let right = self.eval_expr(right)?;
                operators::binary(op, &left, &right)
            }
        }
    }

    /// `++x`, `x--`: the built-in step helper computes the result, the
    /// target is written with the stepped value.
    fn eval_update(
        &mut self,
        op: UpdateOp,
        prefix: bool,
        target: &QualifiedName,
    ) -> EvalResult<Value> {
        let current = qualified::resolve(&self.contexts, target)?;
        let Value::Number(n) = current else {
            return Err(type_mismatch(TypeName::Number, current.type_name()));
        };
        let increment = op == UpdateOp::Increment;
        let stepped = Value::from(if increment {
            n.add(Number::Int(1))?
        } else {
            n.sub(Number::Int(1))?
        });

        let name = update_name(increment, prefix);
        let helper = self
            .registry
            .lookup_in(&[BUILTIN_PROVIDER.to_string()], name)
            .and_then(<[FunctionRef]>::first)
            .cloned();
        let result = match helper {
            Some(FunctionRef::Builtin(helper)) => {
                let mut call = NativeCall::new(name, Span::DUMMY, &self.print_handler);
                helper
                    .invoke(&mut call, &[current.clone()])
                    .map_err(|err| native_invocation_failure(name, &err.to_string()))?
            }
            _ if prefix => stepped.clone(),
            _ => current.clone(),
        };
        qualified::assign(&mut self.contexts, target, stepped)?;
        Ok(result)
    }
}
