//! Printed form of values, as `إطبع` and interpolation render them.

use std::fmt::{self, Write};

use super::{ResultValue, Value};

/// Rendering of the none value.
pub const NONE_TEXT: &str = "<فارغ>";

const SEPARATOR: &str = "، ";

fn write_joined<'a>(
    f: &mut fmt::Formatter<'_>,
    open: char,
    items: impl IntoIterator<Item = &'a Value>,
    close: char,
) -> fmt::Result {
    f.write_char(open)?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(SEPARATOR)?;
        }
        write!(f, "{item}")?;
    }
    f.write_char(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str(NONE_TEXT),
            Value::NaN => f.write_str("NaN"),
            Value::Boolean(true) => f.write_str("صحيح"),
            Value::Boolean(false) => f.write_str("خطأ"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Character(c) => f.write_char(*c),
            Value::Text(s) => f.write_str(s),
            Value::ByteArray(bytes) => {
                f.write_char('[')?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(SEPARATOR)?;
                    }
                    write!(f, "{b}")?;
                }
                f.write_char(']')
            }
            Value::List(items) => write_joined(f, '[', items.borrow().iter(), ']'),
            Value::Tuple(items) => write_joined(f, '(', items.iter(), ')'),
            Value::Set(set) => write_joined(f, '{', set.borrow().items(), '}'),
            Value::Map(map) => {
                f.write_char('{')?;
                for (i, (k, v)) in map.borrow().entries().iter().enumerate() {
                    if i > 0 {
                        f.write_str(SEPARATOR)?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_char('}')
            }
            Value::Object(object) => {
                let object = object.borrow();
                if let Some(host) = object.host_instance() {
                    return write!(f, "<{}>", host.type_name);
                }
                f.write_str("كائن{")?;
                for (i, field) in object.fields().iter().enumerate() {
                    if i > 0 {
                        f.write_str(SEPARATOR)?;
                    }
                    write!(f, "{}: {}", field.name, field.value)?;
                }
                f.write_char('}')
            }
            Value::Function(func) => write!(f, "<دالة {}>", func.name()),
            Value::Result(result) => match &**result {
                ResultValue::Ok(value) => write!(f, "نجاح({value})"),
                ResultValue::Error { message, .. } => write!(f, "فشل({message})"),
            },
        }
    }
}
