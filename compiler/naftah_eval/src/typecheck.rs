//! Structural type compatibility.
//!
//! Naftah is dynamically typed, but a declaration may name a type. The
//! checks here decide whether a value, or each element of a container
//! literal, fits that declared type. Container supertypes and `أي_نمط`
//! accept anything; so does an undeclared (dynamic) variable.

use naftah_ir::TypeName;

use crate::errors::type_mismatch_named;
use crate::{EvalResult, Value};

/// Whether `value` of runtime type `value_type` is incompatible with
/// `declared`.
pub fn type_mismatch(
    value: &Value,
    value_type: Option<TypeName>,
    declared: Option<TypeName>,
) -> bool {
    let Some(declared) = declared else {
        return false;
    };
    if declared == TypeName::Any || declared.is_container() || value.is_none() {
        return false;
    }
    let Some(value_type) = value_type else {
        return false;
    };
    if value_type.is_numeric() != declared.is_numeric() {
        return true;
    }
    if !value_type.is_numeric() && !value_type.is_assignable_to(declared) {
        return true;
    }
    value_type.is_container()
}

/// A declared type that constrains element types: not dynamic, not `Any`,
/// not a container supertype.
pub fn concrete(declared: Option<TypeName>) -> Option<TypeName> {
    declared.filter(|ty| *ty != TypeName::Any && !ty.is_container())
}

fn mismatch(value: &Value, declared: Option<TypeName>) -> bool {
    type_mismatch(value, value.type_of(), declared)
}

/// Check a value about to be stored in a variable declared as `declared`.
///
/// On mismatch, returns the type name of the offending value or element.
pub fn check_assignment(value: &Value, declared: Option<TypeName>) -> Result<(), &'static str> {
    let Some(ty) = concrete(declared) else {
        return Ok(());
    };
    let declared = Some(ty);
    let found = match value {
        Value::Tuple(_) => Some(value.type_name()),
        Value::List(items) => first_mismatch(items.borrow().iter(), declared),
        Value::Set(set) => first_mismatch(set.borrow().items().iter(), declared),
        Value::Map(map) => first_mismatch(map.borrow().entries().iter().map(|(_, v)| v), declared),
        scalar => mismatch(scalar, declared).then(|| scalar.type_name()),
    };
    found.map_or(Ok(()), Err)
}

fn first_mismatch<'a>(
    mut items: impl Iterator<Item = &'a Value>,
    declared: Option<TypeName>,
) -> Option<&'static str> {
    items.find(|v| mismatch(v, declared)).map(Value::type_name)
}

/// Homogeneity check for list and set literals.
///
/// Each element is checked against the declared type and against the first
/// scalar element seen so far. Container elements are checked but never
/// become the reference type. With no concrete declared type nothing is
/// checked.
#[derive(Debug)]
pub struct ElementChecker {
    declared: Option<TypeName>,
    first_scalar: Option<TypeName>,
}

impl ElementChecker {
    pub fn new(declared: Option<TypeName>) -> Self {
        ElementChecker {
            declared: concrete(declared),
            first_scalar: None,
        }
    }

    pub fn check(&mut self, value: &Value) -> EvalResult<()> {
        let Some(declared) = self.declared else {
            return Ok(());
        };
        let value_type = value.type_of();
        if type_mismatch(value, value_type, Some(declared)) {
            return Err(type_mismatch_named(declared.display_name(), value.type_name()));
        }
        if let Some(first) = self.first_scalar {
            if type_mismatch(value, value_type, Some(first)) {
                return Err(type_mismatch_named(first.display_name(), value.type_name()));
            }
        } else if let Some(ty) = value_type.filter(|ty| !ty.is_container()) {
            self.first_scalar = Some(ty);
        }
        Ok(())
    }
}
