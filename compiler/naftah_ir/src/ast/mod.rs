//! Parse-tree nodes.
//!
//! The tree is owned and boxed rather than arena-allocated: the front end
//! builds it once per program (or per REPL turn) and the evaluator walks it
//! by reference. Function bodies sit behind `Rc` so a declared function can
//! outlive the turn that declared it.
//!
//! Node kinds mirror the grammar productions the evaluator executes:
//! - [`Program`] and [`Block`]: statement sequences with their own scope
//! - [`Stmt`]: declarations, assignments, loops, branches, jumps
//! - [`Expr`]: literals, names, calls, operators, container literals

mod expr;
mod stmt;

pub use expr::{
    Argument, BinaryOp, Callee, CollectionKind, Expr, ExprKind, FunctionCall, Literal,
    ObjectField, TextKind, UnaryOp, UpdateOp,
};
pub use stmt::{
    AssignTarget, Assignment, CaseArm, CaseBody, CaseStmt, DeclKeyword, Declaration,
    ForEachStmt, ForEachTarget, ForStmt, FunctionDecl, IfStmt, LoopDirection, ParameterDecl,
    RepeatStmt, Stmt, StmtKind, TryCase, TryCases, TryStmt, WhileStmt,
};

use crate::{NodeId, Span, Spanned};

/// Root of a parsed script or REPL turn.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub id: NodeId,
    pub span: Span,
    pub statements: Vec<Stmt>,
}

/// `{ ... }` statement sequence. Evaluating a block registers a scope.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub span: Span,
    pub statements: Vec<Stmt>,
}

impl Spanned for Program {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for Block {
    fn span(&self) -> Span {
        self.span
    }
}
