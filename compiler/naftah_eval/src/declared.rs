//! Records for named script entities: variables, parameters, functions.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use naftah_ir::{Block, ReturnType, Span, TypeName};

use crate::registry::NativeFunction;
use crate::Value;

/// A variable binding, also used for object fields.
#[derive(Clone, Debug, PartialEq)]
pub struct DeclaredVariable {
    pub name: String,
    pub is_constant: bool,
    /// `None` means dynamically typed.
    pub declared_type: Option<TypeName>,
    pub value: Value,
    /// Where it was declared.
    pub span: Span,
}

impl DeclaredVariable {
    /// Mutable, dynamically typed.
    pub fn new(name: impl Into<String>, value: Value, span: Span) -> Self {
        DeclaredVariable {
            name: name.into(),
            is_constant: false,
            declared_type: None,
            value,
            span,
        }
    }

    pub fn constant(name: impl Into<String>, value: Value, span: Span) -> Self {
        DeclaredVariable {
            is_constant: true,
            ..Self::new(name, value, span)
        }
    }

    #[must_use]
    pub fn with_type(mut self, declared_type: Option<TypeName>) -> Self {
        self.declared_type = declared_type;
        self
    }
}

impl fmt::Display for DeclaredVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_constant { "ثابت" } else { "متغير" };
        write!(f, "<{keyword} {} = {}>", self.name, self.value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeclaredParameter {
    pub name: String,
    pub is_constant: bool,
    pub declared_type: Option<TypeName>,
    /// Evaluated when the declaring statement ran.
    pub default_value: Option<Value>,
}

impl DeclaredParameter {
    pub fn is_required(&self) -> bool {
        self.default_value.is_none()
    }
}

/// A function declared in script.
#[derive(Debug)]
pub struct DeclaredFunction {
    pub name: String,
    pub parameters: Vec<DeclaredParameter>,
    pub return_type: Option<ReturnType>,
    pub body: Rc<Block>,
    pub span: Span,
    /// Positions of parameters without defaults, computed on first call.
    required: OnceCell<Vec<usize>>,
}

impl DeclaredFunction {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<DeclaredParameter>,
        return_type: Option<ReturnType>,
        body: Rc<Block>,
        span: Span,
    ) -> Self {
        DeclaredFunction {
            name: name.into(),
            parameters,
            return_type,
            body,
            span,
            required: OnceCell::new(),
        }
    }

    pub fn required_indexes(&self) -> &[usize] {
        self.required.get_or_init(|| {
            self.parameters
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_required())
                .map(|(i, _)| i)
                .collect()
        })
    }
}

/// What a function name or function value refers to.
#[derive(Clone, Debug)]
pub enum FunctionRef {
    Declared(Rc<DeclaredFunction>),
    Builtin(Rc<NativeFunction>),
    Host(Rc<NativeFunction>),
}

impl FunctionRef {
    pub fn name(&self) -> &str {
        match self {
            FunctionRef::Declared(f) => &f.name,
            FunctionRef::Builtin(f) | FunctionRef::Host(f) => &f.name,
        }
    }

    /// Whether `count` arguments fit this function's parameter list.
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            FunctionRef::Declared(f) => {
                count <= f.parameters.len() && count >= f.required_indexes().len()
            }
            FunctionRef::Builtin(f) | FunctionRef::Host(f) => f.arity.accepts(count),
        }
    }
}

impl PartialEq for FunctionRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FunctionRef::Declared(a), FunctionRef::Declared(b)) => Rc::ptr_eq(a, b),
            (FunctionRef::Builtin(a), FunctionRef::Builtin(b))
            | (FunctionRef::Host(a), FunctionRef::Host(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use naftah_ir::TreeBuilder;
    use pretty_assertions::assert_eq;

    fn param(name: &str, default: Option<Value>) -> DeclaredParameter {
        DeclaredParameter {
            name: name.to_string(),
            is_constant: false,
            declared_type: None,
            default_value: default,
        }
    }

    fn sample_function() -> Rc<DeclaredFunction> {
        let mut b = TreeBuilder::new();
        let body = Rc::new(b.block(vec![]));
        Rc::new(DeclaredFunction::new(
            "مجموع",
            vec![
                param("أ", None),
                param("ب", Some(Value::int(2))),
                param("ج", None),
            ],
            None,
            body,
            Span::DUMMY,
        ))
    }

    #[test]
    fn test_required_indexes() {
        let f = sample_function();
        assert_eq!(f.required_indexes(), &[0, 2]);
    }

    #[test]
    fn test_function_ref_identity() {
        let f = sample_function();
        let a = FunctionRef::Declared(Rc::clone(&f));
        let b = FunctionRef::Declared(f);
        let other = FunctionRef::Declared(sample_function());
        assert_eq!(a, b);
        assert!(a != other);
        assert_eq!(a.name(), "مجموع");
    }

    #[test]
    fn test_accepts_argument_counts() {
        let f = FunctionRef::Declared(sample_function());
        assert!(!f.accepts(1));
        assert!(f.accepts(2));
        assert!(f.accepts(3));
        assert!(!f.accepts(4));
    }

    #[test]
    fn test_variable_display() {
        let v = DeclaredVariable::constant("ث", Value::int(3), Span::DUMMY);
        assert_eq!(v.to_string(), "<ثابت ث = 3>");
        let v = DeclaredVariable::new("م", Value::text("x"), Span::DUMMY);
        assert_eq!(v.to_string(), "<متغير م = x>");
    }
}
