//! Colon-separated paths.
//!
//! `أ:ب:ج` walks the field maps of nested objects. A segment suffixed with
//! [`OPTIONAL_MARKER`] (`أ:ب؟:ج`) turns a missing field into "none" instead of
//! an error.

use std::fmt;

use smallvec::SmallVec;

/// Suffix that marks a path segment as optional.
pub const OPTIONAL_MARKER: char = '؟';

/// Separator between path segments.
pub const PATH_SEPARATOR: char = ':';

/// One identifier in a qualified path.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Segment {
    pub name: String,
    pub optional: bool,
}

impl Segment {
    pub fn new(name: impl Into<String>) -> Self {
        Segment {
            name: name.into(),
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Segment {
            name: name.into(),
            optional: true,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.optional {
            write!(f, "{OPTIONAL_MARKER}")?;
        }
        Ok(())
    }
}

/// A qualified name such as `أ:ب؟:ج`.
///
/// Never empty: the parser only produces paths with at least one segment.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct QualifiedName {
    segments: SmallVec<[Segment; 4]>,
}

impl QualifiedName {
    /// Build a path from segments. Returns `None` when `segments` is empty.
    pub fn new(segments: impl IntoIterator<Item = Segment>) -> Option<Self> {
        let segments: SmallVec<[Segment; 4]> = segments.into_iter().collect();
        if segments.is_empty() {
            None
        } else {
            Some(QualifiedName { segments })
        }
    }

    /// Single-segment path.
    pub fn single(name: impl Into<String>) -> Self {
        let mut segments = SmallVec::new();
        segments.push(Segment::new(name));
        QualifiedName { segments }
    }

    /// Parse `a:b؟:c` source text. Empty segments are rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let mut segments = SmallVec::<[Segment; 4]>::new();
        for raw in text.split(PATH_SEPARATOR) {
            let (name, optional) = match raw.strip_suffix(OPTIONAL_MARKER) {
                Some(stripped) => (stripped, true),
                None => (raw, false),
            };
            if name.is_empty() {
                return None;
            }
            segments.push(Segment {
                name: name.to_string(),
                optional,
            });
        }
        Self::new(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First segment, resolved as a plain variable.
    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.segments.len() == 1
    }

    /// Render the first `count` segments, markers included.
    pub fn prefix(&self, count: usize) -> String {
        let count = count.min(self.segments.len());
        let mut out = String::new();
        for (i, segment) in self.segments[..count].iter().enumerate() {
            if i > 0 {
                out.push(PATH_SEPARATOR);
            }
            out.push_str(&segment.to_string());
        }
        out
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix(self.segments.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_optional_segments() {
        let Some(path) = QualifiedName::parse("أ:ب؟:ج") else {
            panic!("path should parse");
        };
        assert_eq!(path.len(), 3);
        assert!(!path.segments()[0].optional);
        assert!(path.segments()[1].optional);
        assert_eq!(path.segments()[1].name, "ب");
        assert_eq!(path.to_string(), "أ:ب؟:ج");
    }

    #[test]
    fn test_parse_rejects_empty_segment() {
        assert!(QualifiedName::parse("أ::ب").is_none());
        assert!(QualifiedName::parse("").is_none());
    }

    #[test]
    fn test_prefix_keeps_markers() {
        let Some(path) = QualifiedName::parse("a:b؟:c:d") else {
            panic!("path should parse");
        };
        assert_eq!(path.prefix(2), "a:b؟");
        assert_eq!(path.prefix(10), "a:b؟:c:d");
    }
}
