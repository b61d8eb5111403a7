//! Parse-tree traversal.
//!
//! A single [`Visitor`] trait walks statements, blocks, and expressions.
//! Default methods call the matching `walk_*` function; override a
//! `visit_*` method to act at a node and call `walk_*` to keep descending.
//!
//! Function declarations are walked through [`Visitor::visit_function_decl`]
//! so a visitor can decide whether a nested body belongs to the enclosing
//! statement. [`descendant_stmts`] does not descend into them: a `return`
//! inside a nested function never ends the block that declares it.

use crate::ast::{
    AssignTarget, Block, CaseBody, Expr, ExprKind, FunctionDecl, Program, Stmt, StmtKind, TryCase,
    TryCases,
};
use crate::{NodeId, NodeKind};

/// Parse-tree visitor. The tree itself is never mutated.
pub trait Visitor<'ast> {
    fn visit_program(&mut self, program: &'ast Program) {
        for stmt in &program.statements {
            self.visit_stmt(stmt);
        }
    }

    fn visit_block(&mut self, block: &'ast Block) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_function_decl(&mut self, decl: &'ast FunctionDecl) {
        walk_function_decl(self, decl);
    }
}

pub fn walk_block<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, block: &'ast Block) {
    for stmt in &block.statements {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_function_decl<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    decl: &'ast FunctionDecl,
) {
    for param in &decl.parameters {
        if let Some(default) = &param.default {
            visitor.visit_expr(default);
        }
    }
    visitor.visit_block(&decl.body);
}

fn walk_try_case<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, case: &'ast TryCase) {
    match &case.body {
        CaseBody::Expr(expr) => visitor.visit_expr(expr),
        CaseBody::Block(block) => visitor.visit_block(block),
    }
}

fn walk_else<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, else_block: Option<&'ast Block>) {
    if let Some(block) = else_block {
        visitor.visit_block(block);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmt: &'ast Stmt) {
    match &stmt.kind {
        StmtKind::Declaration(_) | StmtKind::Break(_) | StmtKind::Continue(_) => {}
        StmtKind::Assignment(assignment) => {
            if let AssignTarget::Index { indexes, .. } = &assignment.target {
                for index in indexes {
                    visitor.visit_expr(index);
                }
            }
            visitor.visit_expr(&assignment.value);
        }
        StmtKind::FunctionDeclaration(decl) => visitor.visit_function_decl(decl),
        StmtKind::Expression(expr) => visitor.visit_expr(expr),
        StmtKind::Return(value) => {
            if let Some(expr) = value {
                visitor.visit_expr(expr);
            }
        }
        StmtKind::Block(block) => visitor.visit_block(block),
        StmtKind::If(if_stmt) => {
            for (condition, block) in &if_stmt.branches {
                visitor.visit_expr(condition);
                visitor.visit_block(block);
            }
            walk_else(visitor, if_stmt.else_block.as_ref());
        }
        StmtKind::For(for_stmt) => {
            visitor.visit_expr(&for_stmt.start);
            visitor.visit_expr(&for_stmt.end);
            if let Some(step) = &for_stmt.step {
                visitor.visit_expr(step);
            }
            visitor.visit_block(&for_stmt.body);
            walk_else(visitor, for_stmt.else_block.as_ref());
        }
        StmtKind::ForEach(each) => {
            visitor.visit_expr(&each.iterable);
            visitor.visit_block(&each.body);
            walk_else(visitor, each.else_block.as_ref());
        }
        StmtKind::While(while_stmt) => {
            visitor.visit_expr(&while_stmt.condition);
            visitor.visit_block(&while_stmt.body);
            walk_else(visitor, while_stmt.else_block.as_ref());
        }
        StmtKind::Repeat(repeat) => {
            visitor.visit_block(&repeat.body);
            visitor.visit_expr(&repeat.condition);
            walk_else(visitor, repeat.else_block.as_ref());
        }
        StmtKind::Case(case) => {
            visitor.visit_expr(&case.subject);
            for arm in &case.arms {
                for label in &arm.labels {
                    visitor.visit_expr(label);
                }
                visitor.visit_block(&arm.body);
            }
            walk_else(visitor, case.else_block.as_ref());
        }
        StmtKind::Try(try_stmt) => {
            visitor.visit_expr(&try_stmt.expr);
            match &try_stmt.cases {
                TryCases::Result { ok, error } => {
                    for case in ok.iter().chain(error.iter()) {
                        walk_try_case(visitor, case);
                    }
                }
                TryCases::Option { some, none } => {
                    walk_try_case(visitor, some);
                    walk_try_case(visitor, none);
                }
            }
        }
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) {
    match &expr.kind {
        ExprKind::Literal(_)
        | ExprKind::Identifier(_)
        | ExprKind::Path(_)
        | ExprKind::Update { .. } => {}
        ExprKind::Index { base, index } => {
            visitor.visit_expr(base);
            visitor.visit_expr(index);
        }
        ExprKind::Call(call) => {
            for argument in &call.arguments {
                visitor.visit_expr(&argument.value);
            }
        }
        ExprKind::Collection { elements, .. } => {
            for element in elements {
                visitor.visit_expr(element);
            }
        }
        ExprKind::Map { entries, .. } => {
            for (key, value) in entries {
                visitor.visit_expr(key);
                visitor.visit_expr(value);
            }
        }
        ExprKind::Object(fields) => {
            for field in fields {
                visitor.visit_expr(&field.value);
            }
        }
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        ExprKind::Unary { operand, .. } => visitor.visit_expr(operand),
        ExprKind::Ternary {
            condition,
            then_expr,
            else_expr,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_expr(then_expr);
            visitor.visit_expr(else_expr);
        }
    }
}

/// Collects `(id, kind)` for a statement and every statement nested under it.
struct StmtCollector {
    found: Vec<(NodeId, NodeKind)>,
}

impl<'ast> Visitor<'ast> for StmtCollector {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        self.found.push((stmt.id, stmt.node_kind()));
        walk_stmt(self, stmt);
    }

    fn visit_function_decl(&mut self, _decl: &'ast FunctionDecl) {}
}

/// The statement itself followed by all nested statements, pre-order.
/// Bodies of nested function declarations are skipped.
pub fn descendant_stmts(stmt: &Stmt) -> Vec<(NodeId, NodeKind)> {
    let mut collector = StmtCollector { found: Vec::new() };
    collector.visit_stmt(stmt);
    collector.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeclKeyword, TreeBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_descendants_include_nested_jumps() {
        let mut b = TreeBuilder::new();
        let cond = b.boolean(true);
        let brk = b.break_stmt(None);
        let brk_id = brk.id;
        let body = b.block(vec![brk]);
        let if_stmt = b.if_stmt(cond, body, None);
        let found = descendant_stmts(&if_stmt);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], (if_stmt.id, NodeKind::If));
        assert_eq!(found[1], (brk_id, NodeKind::Break));
    }

    #[test]
    fn test_descendants_skip_function_bodies() {
        let mut b = TreeBuilder::new();
        let one = b.int(1);
        let ret = b.return_stmt(Some(one));
        let body = b.block(vec![ret]);
        let decl = b.function("f", vec![], None, body);
        let found = descendant_stmts(&decl);
        assert_eq!(found, vec![(decl.id, NodeKind::FunctionDeclaration)]);
    }

    #[test]
    fn test_expression_visitor_counts_literals() {
        struct Literals(usize);
        impl<'ast> Visitor<'ast> for Literals {
            fn visit_expr(&mut self, expr: &'ast Expr) {
                if matches!(expr.kind, ExprKind::Literal(_)) {
                    self.0 += 1;
                }
                walk_expr(self, expr);
            }
        }

        let mut b = TreeBuilder::new();
        let one = b.int(1);
        let two = b.int(2);
        let list = b.list(vec![one, two]);
        let stmt = b.assign_decl(Some(DeclKeyword::Variable), "س", None, list);
        let mut counter = Literals(0);
        counter.visit_stmt(&stmt);
        assert_eq!(counter.0, 2);
    }
}
