//! Native function registration.
//!
//! Built-in and host functions are plain Rust closures registered under a
//! provider name. Calls resolve a plain name by searching providers in
//! registration order, and a qualified `مزود::f` name in that provider only.

mod builtins;

use std::fmt;
use std::rc::Rc;

use naftah_ir::Span;
use rustc_hash::FxHashMap;

use crate::declared::FunctionRef;
use crate::errors::EvalError;
use crate::print_handler::PrintHandlerImpl;
use crate::Value;

pub use builtins::BUILTIN_PROVIDER;
pub(crate) use builtins::update_name;

/// Accepted argument counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Arity {
    pub min: usize,
    /// `None` for variadic.
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exact(n: usize) -> Self {
        Arity {
            min: n,
            max: Some(n),
        }
    }

    pub const fn at_least(n: usize) -> Self {
        Arity { min: n, max: None }
    }

    pub fn accepts(self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{max}"),
            Some(max) => write!(f, "{} to {max}", self.min),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// Failure reported by a native function body.
#[derive(Clone, Debug, thiserror::Error)]
pub enum NativeError {
    #[error("{0}")]
    Message(String),
    #[error("argument {index}: expected {expected}, found {found}")]
    InvalidArgument {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    /// An evaluator error raised by shared code (operators, numbers).
    #[error(transparent)]
    Eval(Box<EvalError>),
}

impl From<EvalError> for NativeError {
    fn from(err: EvalError) -> Self {
        NativeError::Eval(Box::new(err))
    }
}

/// What a native function can reach while it runs.
pub struct NativeCall<'a> {
    pub name: &'a str,
    /// Call-site position.
    pub span: Span,
    print: &'a PrintHandlerImpl,
}

impl<'a> NativeCall<'a> {
    pub fn new(name: &'a str, span: Span, print: &'a PrintHandlerImpl) -> Self {
        NativeCall { name, span, print }
    }

    pub fn println(&mut self, msg: &str) {
        self.print.println(msg);
    }
}

/// Body of a native function.
pub type NativeFn = dyn Fn(&mut NativeCall<'_>, &[Value]) -> Result<Value, NativeError>;

/// A built-in or host function.
pub struct NativeFunction {
    pub name: String,
    pub provider: String,
    pub description: String,
    pub arity: Arity,
    /// The call evaluates to none regardless of what the body returns.
    pub returns_void: bool,
    /// Host instance functions are not static: their first argument is the
    /// receiving object.
    pub is_static: bool,
    callable: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn builtin(
        provider: impl Into<String>,
        name: impl Into<String>,
        arity: Arity,
        callable: impl Fn(&mut NativeCall<'_>, &[Value]) -> Result<Value, NativeError> + 'static,
    ) -> Self {
        NativeFunction {
            name: name.into(),
            provider: provider.into(),
            description: String::new(),
            arity,
            returns_void: false,
            is_static: true,
            callable: Rc::new(callable),
        }
    }

    pub fn host(
        provider: impl Into<String>,
        name: impl Into<String>,
        arity: Arity,
        is_static: bool,
        callable: impl Fn(&mut NativeCall<'_>, &[Value]) -> Result<Value, NativeError> + 'static,
    ) -> Self {
        NativeFunction {
            is_static,
            ..Self::builtin(provider, name, arity, callable)
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn returning_void(mut self) -> Self {
        self.returns_void = true;
        self
    }

    pub fn invoke(&self, call: &mut NativeCall<'_>, args: &[Value]) -> Result<Value, NativeError> {
        (self.callable)(call, args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("arity", &self.arity)
            .field("returns_void", &self.returns_void)
            .field("is_static", &self.is_static)
            .finish_non_exhaustive()
    }
}

struct Provider {
    name: String,
    functions: FxHashMap<String, Vec<FunctionRef>>,
}

/// Providers of native functions, in registration order.
#[derive(Default)]
pub struct FunctionRegistry {
    providers: Vec<Provider>,
    index: FxHashMap<String, usize>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in provider.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for function in builtins::functions() {
            registry.register_builtin(function);
        }
        registry
    }

    fn provider_mut(&mut self, name: &str) -> &mut Provider {
        let index = match self.index.get(name) {
            Some(index) => *index,
            None => {
                self.providers.push(Provider {
                    name: name.to_string(),
                    functions: FxHashMap::default(),
                });
                let index = self.providers.len() - 1;
                self.index.insert(name.to_string(), index);
                index
            }
        };
        &mut self.providers[index]
    }

    fn insert(&mut self, function: FunctionRef, provider: &str, name: &str) {
        tracing::trace!(provider, name, "register native function");
        self.provider_mut(provider)
            .functions
            .entry(name.to_string())
            .or_default()
            .push(function);
    }

    pub fn register_builtin(&mut self, function: NativeFunction) {
        let (provider, name) = (function.provider.clone(), function.name.clone());
        self.insert(FunctionRef::Builtin(Rc::new(function)), &provider, &name);
    }

    pub fn register_host(&mut self, function: NativeFunction) {
        let (provider, name) = (function.provider.clone(), function.name.clone());
        self.insert(FunctionRef::Host(Rc::new(function)), &provider, &name);
    }

    /// Overload set for `name` in the first provider that has one.
    pub fn lookup(&self, name: &str) -> Option<&[FunctionRef]> {
        self.providers
            .iter()
            .find_map(|p| p.functions.get(name))
            .map(Vec::as_slice)
    }

    /// Overload set for `name` in the provider at `path` (`a:b`).
    pub fn lookup_in(&self, path: &[String], name: &str) -> Option<&[FunctionRef]> {
        let provider = self.index.get(&path.join(":"))?;
        self.providers[*provider]
            .functions
            .get(name)
            .map(Vec::as_slice)
    }

    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.name.as_str())
    }
}
