//! Reading and writing `أ:ب؟:ج` paths through nested objects.
//!
//! The head segment is a plain variable lookup. Every later segment is a
//! field of the object reached so far. Host-wrapped objects are leaves:
//! their fields cannot be named from script.

use naftah_ir::QualifiedName;

use crate::context::{check_store, ContextRegistry};
use crate::errors::variable_not_found;
use crate::value::DynamicObject;
use crate::{DeclaredVariable, EvalError, EvalResult, Value};

fn field_of(value: &Value, name: &str) -> Option<Value> {
    match value {
        Value::Object(object) => {
            let object = object.borrow();
            if object.is_host() {
                None
            } else {
                object.field(name).map(|field| field.value.clone())
            }
        }
        _ => None,
    }
}

fn head_value(contexts: &ContextRegistry, path: &QualifiedName) -> EvalResult<Value> {
    let head = &path.head().name;
    contexts
        .get_variable(head, true)
        .map(|(_, var)| var.value.clone())
        .ok_or_else(|| variable_not_found(head))
}

/// Value at `path`.
///
/// A missing field yields none when every segment after the head, up to
/// and including the missing one, carries the optional marker.
pub fn resolve(contexts: &ContextRegistry, path: &QualifiedName) -> EvalResult<Value> {
    let mut current = head_value(contexts, path)?;
    let mut optional_chain = true;
    for (i, segment) in path.segments().iter().enumerate().skip(1) {
        optional_chain &= segment.optional;
        match field_of(&current, &segment.name) {
            Some(value) => current = value,
            None if optional_chain => return Ok(Value::None),
            None => return Err(variable_not_found(&path.prefix(i + 1))),
        }
    }
    Ok(current)
}

/// Store `value` at `path`.
///
/// A single segment reassigns the variable. Longer paths overwrite the final
/// field of the object reached by the segments before it.
pub fn assign(
    contexts: &mut ContextRegistry,
    path: &QualifiedName,
    value: Value,
) -> EvalResult<()> {
    if path.is_single() {
        return contexts
            .set_variable(&path.head().name, value)
            .map_err(EvalError::from);
    }

    let segments = path.segments();
    let last = segments.len() - 1;
    let mut current = head_value(contexts, path)?;
    for (i, segment) in segments.iter().enumerate().take(last).skip(1) {
        current = field_of(&current, &segment.name)
            .ok_or_else(|| variable_not_found(&path.prefix(i + 1)))?;
    }

    let missing = || variable_not_found(&path.prefix(segments.len()));
    let Value::Object(object) = current else {
        return Err(missing());
    };
    let mut object = object.borrow_mut();
    let field = writable_field(&mut object, &segments[last].name).ok_or_else(missing)?;
    check_store(field, &value)?;
    field.value = value;
    Ok(())
}

fn writable_field<'a>(
    object: &'a mut DynamicObject,
    name: &str,
) -> Option<&'a mut DeclaredVariable> {
    if object.is_host() {
        None
    } else {
        object.field_mut(name)
    }
}
