//! Expression nodes and operators.

use super::stmt::DeclKeyword;
use crate::{NodeId, QualifiedName, Span, Spanned, TypeName};

/// An expression with identity and position.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    /// Bare identifier: a variable, else a function. Inside a map literal
    /// key position it stands for its own name.
    Identifier(String),
    /// `أ:ب؟:ج`
    Path(QualifiedName),
    /// `base[index]`
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Call(FunctionCall),
    /// `[..]`, `(..)`, `{..}` element literals.
    Collection {
        kind: CollectionKind,
        elements: Vec<Expr>,
    },
    /// `{k: v, ...}`
    Map {
        ordered: bool,
        entries: Vec<(Expr, Expr)>,
    },
    /// `كائن { a = 1, ثابت b : رقم = 2 }`
    Object(Vec<ObjectField>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `++x`, `x--`: read, step by one, write back.
    Update {
        op: UpdateOp,
        prefix: bool,
        target: QualifiedName,
    },
    /// `c ? a : b`
    Ternary {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
}

/// Text literal flavours.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TextKind {
    /// Placeholders are substituted at evaluation time.
    Interpolated,
    /// `خام"..."`: delimiters stripped, no substitution.
    Raw,
    /// `بايت"..."`: UTF-8 bytes.
    Bytes,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    None,
    NaN,
    Boolean(bool),
    /// Decimal number text as written, Arabic-Indic digits allowed.
    Number(String),
    /// `digits` in `radix`, e.g. `١٠١` base 2.
    Radix { digits: String, radix: u32 },
    Character(char),
    Text { value: String, kind: TextKind },
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CollectionKind {
    List,
    Tuple,
    /// `ordered` keeps insertion order when printing.
    Set { ordered: bool },
}

/// Field of an object literal.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectField {
    pub span: Span,
    pub name: String,
    pub keyword: Option<DeclKeyword>,
    pub declared_type: Option<TypeName>,
    pub value: Expr,
}

/// Call target.
///
/// `path` is empty for a plain call `f(x)`. For `مزود:فرعي::f(x)` it holds
/// the provider path before `::`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Callee {
    pub path: Vec<String>,
    pub name: String,
}

impl Callee {
    pub fn plain(name: impl Into<String>) -> Self {
        Callee {
            path: Vec::new(),
            name: name.into(),
        }
    }

    pub fn is_qualified(&self) -> bool {
        !self.path.is_empty()
    }

    /// `a:b::f` rendering used in diagnostics.
    pub fn display(&self) -> String {
        if self.path.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.path.join(":"), self.name)
        }
    }
}

/// A call argument, optionally named (`f(b = 2)`).
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub span: Span,
    pub name: Option<String>,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub callee: Callee,
    pub arguments: Vec<Argument>,
}

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
    /// Left operand when truthy, otherwise the right one.
    Coalesce,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UnsignedShr,

    // Element-wise over containers
    ElementwiseAdd,
    ElementwiseSub,
    ElementwiseMul,
    ElementwiseDiv,
    ElementwiseMod,
}

impl BinaryOp {
    /// Source-level spelling, used in error messages.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "و",
            Self::Or => "أو",
            Self::Coalesce => "??",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UnsignedShr => ">>>",
            Self::ElementwiseAdd => ".+",
            Self::ElementwiseSub => ".-",
            Self::ElementwiseMul => ".*",
            Self::ElementwiseDiv => "./",
            Self::ElementwiseMod => ".%",
        }
    }

    /// Operators whose right side is evaluated only when needed.
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Coalesce)
    }

    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }

    pub const fn is_elementwise(self) -> bool {
        matches!(
            self,
            Self::ElementwiseAdd
                | Self::ElementwiseSub
                | Self::ElementwiseMul
                | Self::ElementwiseDiv
                | Self::ElementwiseMod
        )
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Plus,
    Minus,
    /// Arithmetic negation for numbers, logical negation otherwise.
    Not,
    BitNot,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "!",
            Self::BitNot => "~",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UpdateOp {
    Increment,
    Decrement,
}
