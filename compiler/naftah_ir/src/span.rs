//! Source positions.
//!
//! The front end reports positions the way its token stream does: a 1-based
//! line and a 0-based column within that line. Every parse-tree node carries
//! the position of its first token so runtime errors can point back at it.

use std::fmt;

/// Line/column position of a node's first token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct Span {
    /// 1-based line number. `0` means "unknown".
    pub line: u32,
    /// 0-based column within the line.
    pub column: u32,
}

impl Span {
    /// Placeholder for synthesized nodes.
    pub const DUMMY: Span = Span { line: 0, column: 0 };

    /// Create a new span.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Span { line, column }
    }

    /// Whether this span points at real source.
    #[inline]
    pub const fn is_dummy(self) -> bool {
        self.line == 0
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Trait for nodes that know where they came from.
pub trait Spanned {
    fn span(&self) -> Span;
}
