//! Runtime values.
//!
//! Scalars are stored inline. Containers and objects are reference-counted
//! and shared: mutating a list element or an object field through one
//! binding is visible through every other binding of the same value.

mod display;
mod number;

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use naftah_ir::TypeName;

use crate::declared::{DeclaredVariable, FunctionRef};

pub use display::NONE_TEXT;
pub use number::Number;

/// A Naftah value.
#[derive(Clone, Debug)]
pub enum Value {
    /// `لاشيء`
    None,
    /// `ليس_رقم`
    NaN,
    Boolean(bool),
    Number(Number),
    Character(char),
    Text(Rc<str>),
    ByteArray(Rc<[u8]>),
    List(Rc<RefCell<Vec<Value>>>),
    Tuple(Rc<[Value]>),
    Set(Rc<RefCell<SetValue>>),
    Map(Rc<RefCell<MapValue>>),
    Object(Rc<RefCell<DynamicObject>>),
    Function(FunctionRef),
    Result(Rc<ResultValue>),
}

/// Unique elements in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SetValue {
    /// Declared as an ordered set (`{..}` with the ordered marker).
    pub ordered: bool,
    items: Vec<Value>,
}

impl SetValue {
    pub fn new(ordered: bool) -> Self {
        SetValue {
            ordered,
            items: Vec::new(),
        }
    }

    /// Insert unless an equal element exists. Returns whether it was added.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.iter().any(|item| item == value)
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Key/value entries in insertion order. Keys are unique and never none.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapValue {
    pub ordered: bool,
    entries: Vec<(Value, Value)>,
}

impl MapValue {
    pub fn new(ordered: bool) -> Self {
        MapValue {
            ordered,
            entries: Vec::new(),
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace. Returns the previous value for `key`.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((key, value));
        None
    }

    pub fn entries(&self) -> &[(Value, Value)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Opaque handle to a host-language object.
#[derive(Clone)]
pub struct HostInstance {
    pub type_name: String,
    pub instance: Rc<dyn Any>,
}

impl fmt::Debug for HostInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostInstance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Object built from a `كائن { .. }` literal, or a wrapped host instance.
///
/// Host instances have no decomposable fields: path resolution treats them
/// as leaves.
#[derive(Clone, Debug, Default)]
pub struct DynamicObject {
    fields: Vec<DeclaredVariable>,
    host: Option<HostInstance>,
}

impl DynamicObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(type_name: impl Into<String>, instance: Rc<dyn Any>) -> Self {
        DynamicObject {
            fields: Vec::new(),
            host: Some(HostInstance {
                type_name: type_name.into(),
                instance,
            }),
        }
    }

    pub fn is_host(&self) -> bool {
        self.host.is_some()
    }

    pub fn host_instance(&self) -> Option<&HostInstance> {
        self.host.as_ref()
    }

    pub fn field(&self, name: &str) -> Option<&DeclaredVariable> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut DeclaredVariable> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Add a field, replacing one of the same name.
    pub fn define(&mut self, field: DeclaredVariable) {
        match self.field_mut(&field.name) {
            Some(slot) => *slot = field,
            None => self.fields.push(field),
        }
    }

    pub fn fields(&self) -> &[DeclaredVariable] {
        &self.fields
    }
}

/// Value bound by the `نجاح` / `فشل` cases of a `حاول` statement.
#[derive(Clone, Debug, PartialEq)]
pub enum ResultValue {
    Ok(Value),
    Error { message: String, code: String },
}

impl Value {
    pub fn int(i: i64) -> Self {
        Value::Number(Number::Int(i))
    }

    pub fn float(f: f64) -> Self {
        Value::from(Number::Float(f))
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(Rc::from(s.into()))
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::ByteArray(Rc::from(bytes.into()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Rc::from(items))
    }

    pub fn set(set: SetValue) -> Self {
        Value::Set(Rc::new(RefCell::new(set)))
    }

    pub fn map(map: MapValue) -> Self {
        Value::Map(Rc::new(RefCell::new(map)))
    }

    pub fn object(object: DynamicObject) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    pub fn ok(value: Value) -> Self {
        Value::Result(Rc::new(ResultValue::Ok(value)))
    }

    pub fn error(message: impl Into<String>, code: impl Into<String>) -> Self {
        Value::Result(Rc::new(ResultValue::Error {
            message: message.into(),
            code: code.into(),
        }))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Truthiness used by conditions and logical operators.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None | Value::NaN => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => !n.is_zero() && !n.is_nan(),
            Value::Character(_) | Value::Function(_) | Value::Object(_) => true,
            Value::Text(s) => !s.trim().is_empty(),
            Value::ByteArray(b) => !b.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Tuple(items) => !items.is_empty(),
            Value::Set(set) => !set.borrow().is_empty(),
            Value::Map(map) => !map.borrow().is_empty(),
            Value::Result(r) => matches!(**r, ResultValue::Ok(_)),
        }
    }

    /// Runtime type, or `None` for the none value.
    pub fn type_of(&self) -> Option<TypeName> {
        Some(match self {
            Value::None => return None,
            Value::NaN | Value::Number(_) => TypeName::Number,
            Value::Boolean(_) => TypeName::Boolean,
            Value::Character(_) => TypeName::Character,
            Value::Text(_) => TypeName::Text,
            Value::ByteArray(_) => TypeName::ByteArray,
            Value::List(_) => TypeName::List,
            Value::Tuple(_) => TypeName::Tuple,
            Value::Set(_) => TypeName::Set,
            Value::Map(_) => TypeName::Map,
            Value::Object(_) => TypeName::Object,
            Value::Function(_) => TypeName::Function,
            Value::Result(_) => TypeName::Result,
        })
    }

    /// Type name for error messages.
    pub fn type_name(&self) -> &'static str {
        self.type_of().map_or("لاشيء", TypeName::display_name)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        if n.is_nan() {
            Value::NaN
        } else {
            Value::Number(n)
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) | (Value::NaN, Value::NaN) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Character(a), Value::Character(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Character(c), Value::Text(s)) | (Value::Text(s), Value::Character(c)) => {
                let mut chars = s.chars();
                chars.next() == Some(*c) && chars.next().is_none()
            }
            (Value::ByteArray(a), Value::ByteArray(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.items().iter().all(|item| b.contains(item))
            }
            (Value::Map(a), Value::Map(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.entries().iter().all(|(k, v)| b.get(k) == Some(v))
            }
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Result(a), Value::Result(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests;
