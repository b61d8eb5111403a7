//! Statement nodes.

use std::rc::Rc;

use super::{Block, Expr};
use crate::{NodeId, NodeKind, QualifiedName, ReturnType, Span, Spanned, TypeName};

/// A statement with identity and position.
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub id: NodeId,
    pub span: Span,
    pub kind: StmtKind,
}

impl Stmt {
    /// The kind recorded for executed-node bookkeeping.
    pub fn node_kind(&self) -> NodeKind {
        match &self.kind {
            StmtKind::Declaration(_) => NodeKind::Declaration,
            StmtKind::Assignment(_) => NodeKind::Assignment,
            StmtKind::FunctionDeclaration(_) => NodeKind::FunctionDeclaration,
            StmtKind::Expression(_) => NodeKind::ExpressionStatement,
            StmtKind::Block(_) => NodeKind::Block,
            StmtKind::If(_) => NodeKind::If,
            StmtKind::For(_) => NodeKind::For,
            StmtKind::ForEach(_) => NodeKind::ForEach,
            StmtKind::While(_) => NodeKind::While,
            StmtKind::Repeat(_) => NodeKind::Repeat,
            StmtKind::Case(_) => NodeKind::Case,
            StmtKind::Try(_) => NodeKind::Try,
            StmtKind::Break(_) => NodeKind::Break,
            StmtKind::Continue(_) => NodeKind::Continue,
            StmtKind::Return(_) => NodeKind::Return,
        }
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `متغير س : رقم` without an initializer.
    Declaration(Declaration),
    Assignment(Assignment),
    FunctionDeclaration(FunctionDecl),
    Expression(Expr),
    Block(Block),
    If(IfStmt),
    For(ForStmt),
    ForEach(ForEachStmt),
    While(WhileStmt),
    Repeat(RepeatStmt),
    Case(CaseStmt),
    Try(TryStmt),
    /// `اكسر [label]`
    Break(Option<String>),
    /// `تابع [label]`
    Continue(Option<String>),
    /// `ارجع [expr]`
    Return(Option<Expr>),
}

/// `ثابت` or `متغير`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKeyword {
    Constant,
    Variable,
}

/// Left side of a declaration.
///
/// With neither keyword nor type (`س = 1`) the declaration reuses an
/// existing variable of that name, or creates a mutable one.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub keyword: Option<DeclKeyword>,
    pub declared_type: Option<TypeName>,
}

impl Declaration {
    pub fn is_constant(&self) -> bool {
        matches!(self.keyword, Some(DeclKeyword::Constant))
    }

    /// Bare identifier: no keyword, no type.
    pub fn is_bare(&self) -> bool {
        self.keyword.is_none() && self.declared_type.is_none()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AssignTarget {
    /// `[ثابت|متغير] name [: type] = value`
    Declaration(Declaration),
    /// `name = value` on an existing variable, or `a:b:c = value`.
    Path(QualifiedName),
    /// `a:b[i][j] = value`
    Index {
        base: QualifiedName,
        indexes: Vec<Expr>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub target: AssignTarget,
    pub value: Expr,
}

/// One declared parameter. The default is evaluated once, when the
/// enclosing function declaration runs.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterDecl {
    pub span: Span,
    pub name: String,
    pub is_constant: bool,
    pub declared_type: Option<TypeName>,
    pub default: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub parameters: Vec<ParameterDecl>,
    pub return_type: Option<ReturnType>,
    pub body: Rc<Block>,
}

/// `إذا c إذن {} وإلا_إذا c {} وإلا {}`
#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub branches: Vec<(Expr, Block)>,
    pub else_block: Option<Block>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LoopDirection {
    /// `إلى`
    Up,
    /// `تنازليا`
    Down,
}

/// `كرر_حلقة i تعيين a إلى b [خطوة s] إفعل {} [وإلا {}]`
#[derive(Clone, Debug, PartialEq)]
pub struct ForStmt {
    pub label: Option<String>,
    pub variable: String,
    pub start: Expr,
    pub direction: LoopDirection,
    pub end: Expr,
    pub step: Option<Expr>,
    pub body: Block,
    pub else_block: Option<Block>,
}

/// Loop variables of a for-each.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ForEachTarget {
    Value(String),
    IndexValue(String, String),
    KeyValue(String, String),
    IndexKeyValue(String, String, String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForEachStmt {
    pub label: Option<String>,
    pub target: ForEachTarget,
    pub iterable: Expr,
    pub body: Block,
    pub else_block: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStmt {
    pub label: Option<String>,
    pub condition: Expr,
    pub body: Block,
    pub else_block: Option<Block>,
}

/// `كرر {} حتى c`: runs at least once.
#[derive(Clone, Debug, PartialEq)]
pub struct RepeatStmt {
    pub label: Option<String>,
    pub body: Block,
    pub condition: Expr,
    pub else_block: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CaseArm {
    pub labels: Vec<Expr>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CaseStmt {
    pub subject: Expr,
    pub arms: Vec<CaseArm>,
    pub else_block: Option<Block>,
}

/// Either an inline expression or a block.
#[derive(Clone, Debug, PartialEq)]
pub enum CaseBody {
    Expr(Expr),
    Block(Block),
}

/// `نجاح(أ) -> ...`: an optional binding and a body.
#[derive(Clone, Debug, PartialEq)]
pub struct TryCase {
    pub binding: Option<String>,
    pub body: CaseBody,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TryCases {
    /// `نجاح` / `فشل`
    Result {
        ok: Option<TryCase>,
        error: Option<TryCase>,
    },
    /// `بعض` / `معدوم`
    Option { some: TryCase, none: TryCase },
}

/// `حاول(expr) { cases }`
#[derive(Clone, Debug, PartialEq)]
pub struct TryStmt {
    pub expr: Expr,
    pub cases: TryCases,
}
