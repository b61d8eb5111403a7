//! Naftah IR - parse-tree types
//!
//! The data the front end hands to the evaluator:
//! - [`Span`] line/column positions and the [`Spanned`] trait
//! - [`NodeId`] / [`NodeKind`] identity used for executed-node bookkeeping
//! - [`TypeName`] declared types and [`QualifiedName`] colon paths
//! - [`ast`] statement and expression nodes
//! - [`TreeBuilder`] for id-stamped construction
//! - [`TokenVocabulary`] for keyword spelling in diagnostics

pub mod ast;
mod builder;
mod node;
mod qualified;
mod span;
mod types;
pub mod visit;
mod vocabulary;

pub use ast::{
    Argument, AssignTarget, Assignment, BinaryOp, Block, Callee, CaseArm, CaseBody, CaseStmt,
    CollectionKind, DeclKeyword, Declaration, Expr, ExprKind, ForEachStmt, ForEachTarget,
    ForStmt, FunctionCall, FunctionDecl, IfStmt, Literal, LoopDirection, ObjectField,
    ParameterDecl, Program, RepeatStmt, Stmt, StmtKind, TextKind, TryCase, TryCases, TryStmt,
    UnaryOp, UpdateOp, WhileStmt,
};
pub use builder::TreeBuilder;
pub use node::{NodeId, NodeKind};
pub use qualified::{QualifiedName, Segment, OPTIONAL_MARKER, PATH_SEPARATOR};
pub use span::{Span, Spanned};
pub use types::{ReturnType, TypeName};
pub use vocabulary::{ArabicVocabulary, Token, TokenVocabulary};
