//! Placeholder substitution in text literals.
//!
//! Three placeholder spellings are recognized, each with an optional default
//! after a colon:
//!
//! | form              | with default              |
//! |-------------------|---------------------------|
//! | `${name}`         | `${name:default}`         |
//! | `{{name}}`        | `{{name:default}}`        |
//! | `{name}$`         | `{name:default}$`         |
//!
//! Text that looks like a placeholder but has an invalid name is copied
//! through unchanged.

use crate::value::NONE_TEXT;

const DELIMITERS: [char; 3] = ['"', '«', '»'];

/// Remove every string delimiter, wherever it appears.
pub fn strip_delimiters(text: &str) -> String {
    text.replace(DELIMITERS, "")
}

/// Substitute every placeholder in `template`.
///
/// `resolve` returns the rendered value of a name, or `None` when the name
/// is unbound. Unbound names take the placeholder default, else
/// [`NONE_TEXT`].
pub fn interpolate(template: &str, mut resolve: impl FnMut(&str) -> Option<String>) -> String {
    let text = strip_delimiters(template);
    let mut out = String::with_capacity(text.len());
    let mut rest = text.as_str();

    while !rest.is_empty() {
        if let Some((placeholder, consumed)) = placeholder_at(rest) {
            let value = resolve(placeholder.name)
                .or_else(|| placeholder.default.map(str::to_string))
                .unwrap_or_else(|| NONE_TEXT.to_string());
            out.push_str(&value);
            rest = &rest[consumed..];
            continue;
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}

struct Placeholder<'a> {
    name: &'a str,
    default: Option<&'a str>,
}

/// Placeholder starting at the beginning of `text`, with its length in bytes.
fn placeholder_at(text: &str) -> Option<(Placeholder<'_>, usize)> {
    let (open, close, trailer) = if text.starts_with("${") {
        ("${", "}", "")
    } else if text.starts_with("{{") {
        ("{{", "}}", "")
    } else if text.starts_with('{') {
        ("{", "}", "$")
    } else {
        return None;
    };

    let body_start = open.len();
    let body_len = text[body_start..].find('}')?;
    let body = &text[body_start..body_start + body_len];
    let after_body = &text[body_start + body_len..];
    let tail = format!("{close}{trailer}");
    if !after_body.starts_with(&tail) {
        return None;
    }

    let (name, default) = match body.split_once(':') {
        Some((name, default)) => (name, Some(default)),
        None => (body, None),
    };
    if !is_name(name) {
        return None;
    }
    Some((Placeholder { name, default }, body_start + body_len + tail.len()))
}

fn is_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
