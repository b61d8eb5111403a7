//! Node identity.
//!
//! Every statement, block, and expression gets a [`NodeId`] from the
//! [`TreeBuilder`](crate::TreeBuilder). The evaluator records executed nodes
//! by id, and asks "did a `return` run anywhere under this statement?" by
//! combining those records with [`NodeKind`].

use std::fmt;

/// Identifier of one node inside a parse tree.
///
/// Ids are unique within a single tree. Trees built by separate builders may
/// reuse ids; the evaluator only compares ids of nodes that share a tree.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        NodeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Closed set of node kinds the evaluator distinguishes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    Program,
    Block,
    Declaration,
    Assignment,
    FunctionDeclaration,
    ExpressionStatement,
    If,
    For,
    ForEach,
    While,
    Repeat,
    Case,
    Try,
    Break,
    Continue,
    Return,
    Expression,
}

impl NodeKind {
    /// Loop constructs push a loop frame.
    #[inline]
    pub const fn is_loop(self) -> bool {
        matches!(self, Self::For | Self::ForEach | Self::While | Self::Repeat)
    }

    /// Statements that produce a control-flow signal.
    #[inline]
    pub const fn is_jump(self) -> bool {
        matches!(self, Self::Break | Self::Continue | Self::Return)
    }
}
