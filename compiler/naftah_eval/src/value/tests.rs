use std::rc::Rc;

use naftah_ir::{Span, TypeName};
use pretty_assertions::assert_eq;

use super::*;
use crate::declared::DeclaredVariable;

fn sample_map() -> Value {
    let mut map = MapValue::new(true);
    map.insert(Value::text("أ"), Value::int(1));
    map.insert(Value::text("ب"), Value::int(2));
    Value::map(map)
}

#[test]
fn test_truthiness() {
    assert!(!Value::None.is_truthy());
    assert!(!Value::NaN.is_truthy());
    assert!(!Value::int(0).is_truthy());
    assert!(!Value::text("  ").is_truthy());
    assert!(!Value::list(vec![]).is_truthy());
    assert!(!Value::bytes(Vec::new()).is_truthy());
    assert!(Value::int(-1).is_truthy());
    assert!(Value::text("س").is_truthy());
    assert!(Value::tuple(vec![Value::None]).is_truthy());
    assert!(sample_map().is_truthy());
}

#[test]
fn test_structural_equality() {
    assert_eq!(Value::int(2), Value::float(2.0));
    assert_eq!(
        Value::list(vec![Value::int(1), Value::text("x")]),
        Value::list(vec![Value::int(1), Value::text("x")])
    );
    assert_eq!(Value::Character('س'), Value::text("س"));
    assert_eq!(Value::NaN, Value::NaN);
    assert!(Value::int(1) != Value::text("1"));
}

#[test]
fn test_objects_compare_by_identity() {
    let a = Value::object(DynamicObject::new());
    let b = Value::object(DynamicObject::new());
    assert_eq!(a, a.clone());
    assert!(a != b);
}

#[test]
fn test_lists_are_shared() {
    let list = Value::list(vec![Value::int(1)]);
    let alias = list.clone();
    if let Value::List(items) = &list {
        items.borrow_mut().push(Value::int(2));
    }
    assert_eq!(alias.to_string(), "[1، 2]");
}

#[test]
fn test_set_rejects_equal_elements() {
    let mut set = SetValue::new(false);
    assert!(set.insert(Value::int(1)));
    assert!(!set.insert(Value::float(1.0)));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_map_insert_replaces() {
    let mut map = MapValue::new(false);
    assert_eq!(map.insert(Value::int(1), Value::text("x")), None);
    assert_eq!(
        map.insert(Value::int(1), Value::text("y")),
        Some(Value::text("x"))
    );
    assert_eq!(map.get(&Value::int(1)), Some(&Value::text("y")));
}

#[test]
fn test_display() {
    assert_eq!(Value::Boolean(true).to_string(), "صحيح");
    assert_eq!(Value::Boolean(false).to_string(), "خطأ");
    assert_eq!(Value::None.to_string(), "<فارغ>");
    assert_eq!(
        Value::tuple(vec![Value::int(1), Value::float(2.5)]).to_string(),
        "(1، 2.5)"
    );
    assert_eq!(sample_map().to_string(), "{أ: 1، ب: 2}");
    assert_eq!(Value::ok(Value::int(3)).to_string(), "نجاح(3)");
    assert_eq!(Value::error("boom", "E9002").to_string(), "فشل(boom)");
}

#[test]
fn test_object_display_and_fields() {
    let mut object = DynamicObject::new();
    object.define(DeclaredVariable::new("أ", Value::int(1), Span::DUMMY));
    object.define(DeclaredVariable::constant("ب", Value::int(2), Span::DUMMY));
    object.define(DeclaredVariable::new("أ", Value::int(5), Span::DUMMY));
    assert_eq!(object.fields().len(), 2);
    assert!(object.field("ب").is_some_and(|f| f.is_constant));
    assert_eq!(Value::object(object).to_string(), "كائن{أ: 5، ب: 2}");
}

#[test]
fn test_host_objects_are_leaves() {
    let object = DynamicObject::host("ملف", Rc::new(42_u8));
    assert!(object.is_host());
    assert!(object.field("x").is_none());
    assert_eq!(Value::object(object).to_string(), "<ملف>");
}

#[test]
fn test_type_of() {
    assert_eq!(Value::None.type_of(), None);
    assert_eq!(Value::NaN.type_of(), Some(TypeName::Number));
    assert_eq!(Value::Character('a').type_of(), Some(TypeName::Character));
    assert_eq!(sample_map().type_of(), Some(TypeName::Map));
    assert_eq!(Value::None.type_name(), "لاشيء");
}

#[test]
fn test_nan_float_becomes_nan_value() {
    assert!(matches!(Value::float(f64::NAN), Value::NaN));
}
