//! Function invocation: argument binding and the call stack.
//!
//! [`prepare_arguments`] turns a call's argument list into one value per
//! declared parameter. It is pure; the interpreter defines the resulting
//! bindings in a fresh call context.

mod stack;

use crate::declared::DeclaredParameter;
use crate::Value;

pub use stack::{CallFrame, CallStack};

/// Argument binding failure. Converted into an `EvalError` with the callee
/// name and call position attached.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("expected at most {expected} arguments, found {found}")]
    TooManyArguments { expected: usize, found: usize },
    #[error("expected at least {required} arguments, found {found}")]
    TooFewArguments { required: usize, found: usize },
    #[error("parameter '{name}' is bound more than once")]
    DuplicateBinding { name: String },
    #[error("no parameter named '{name}'")]
    UnknownParameter { name: String },
    #[error("parameter '{name}' has no argument and no default")]
    UnboundParameter { name: String },
}

/// Bind call arguments to parameters.
///
/// `required` holds the positions of parameters without defaults. Each
/// argument is `(name, value)`, with `name` set for `f(p = v)`. The result
/// is in parameter order.
///
/// With only positional arguments, argument `i` binds to `required[i]` while
/// `i < required.len()` and to parameter `i` after that; a later argument
/// overwrites an earlier one on the same parameter. With any named argument,
/// positional arguments bind by index and named ones by name, and binding a
/// parameter twice is an error. Parameters left unbound take their default.
pub fn prepare_arguments(
    parameters: &[DeclaredParameter],
    required: &[usize],
    arguments: Vec<(Option<String>, Value)>,
) -> Result<Vec<(String, Value)>, ArgumentError> {
    if arguments.len() > parameters.len() {
        return Err(ArgumentError::TooManyArguments {
            expected: parameters.len(),
            found: arguments.len(),
        });
    }

    let mut slots: Vec<Option<Value>> = vec![None; parameters.len()];
    let any_named = arguments.iter().any(|(name, _)| name.is_some());

    if any_named {
        bind_mixed(parameters, &mut slots, arguments)?;
    } else {
        if arguments.len() < required.len() {
            return Err(ArgumentError::TooFewArguments {
                required: required.len(),
                found: arguments.len(),
            });
        }
        for (i, (_, value)) in arguments.into_iter().enumerate() {
            let index = required.get(i).copied().unwrap_or(i);
            slots[index] = Some(value);
        }
    }

    parameters
        .iter()
        .zip(slots)
        .map(|(param, slot)| {
            let value = match slot {
                Some(value) => value,
                None => param
                    .default_value
                    .clone()
                    .ok_or_else(|| ArgumentError::UnboundParameter {
                        name: param.name.clone(),
                    })?,
            };
            Ok((param.name.clone(), value))
        })
        .collect()
}

fn bind_mixed(
    parameters: &[DeclaredParameter],
    slots: &mut [Option<Value>],
    arguments: Vec<(Option<String>, Value)>,
) -> Result<(), ArgumentError> {
    let named: Vec<&str> = arguments
        .iter()
        .filter_map(|(name, _)| name.as_deref())
        .collect();
    for (position, (name, _)) in arguments.iter().enumerate() {
        if name.is_none() && named.contains(&parameters[position].name.as_str()) {
            return Err(ArgumentError::DuplicateBinding {
                name: parameters[position].name.clone(),
            });
        }
    }

    for (position, (name, value)) in arguments.into_iter().enumerate() {
        let index = match name {
            None => position,
            Some(name) => parameters
                .iter()
                .position(|p| p.name == name)
                .ok_or(ArgumentError::UnknownParameter { name })?,
        };
        if slots[index].is_some() {
            return Err(ArgumentError::DuplicateBinding {
                name: parameters[index].name.clone(),
            });
        }
        slots[index] = Some(value);
    }
    Ok(())
}
