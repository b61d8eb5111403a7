//! Tree construction with node ids.
//!
//! Front ends (and tests) build trees through [`TreeBuilder`] so every node
//! gets a unique [`NodeId`]. The builder also tracks a "current" position,
//! set with [`TreeBuilder::at`], that is stamped onto each node it creates.

use std::rc::Rc;

use crate::ast::{
    Argument, AssignTarget, Assignment, BinaryOp, Block, CaseArm, CaseStmt, Callee,
    CollectionKind, DeclKeyword, Declaration, Expr, ExprKind, ForEachStmt, ForEachTarget,
    ForStmt, FunctionCall, FunctionDecl, IfStmt, Literal, LoopDirection, ObjectField,
    ParameterDecl, Program, RepeatStmt, Stmt, StmtKind, TextKind, TryStmt, TryCases, UnaryOp,
    UpdateOp, WhileStmt,
};
use crate::{NodeId, QualifiedName, ReturnType, Span, TypeName};

/// Allocates node ids and stamps positions.
#[derive(Debug)]
pub struct TreeBuilder {
    next_id: u32,
    span: Span,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder {
            next_id: 0,
            span: Span::new(1, 0),
        }
    }

    /// Position used for nodes created from now on.
    pub fn at(&mut self, line: u32, column: u32) -> &mut Self {
        self.span = Span::new(line, column);
        self
    }

    pub fn current_span(&self) -> Span {
        self.span
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn program(&mut self, statements: Vec<Stmt>) -> Program {
        Program {
            id: self.next_id(),
            span: self.span,
            statements,
        }
    }

    pub fn block(&mut self, statements: Vec<Stmt>) -> Block {
        Block {
            id: self.next_id(),
            span: self.span,
            statements,
        }
    }

    pub fn stmt(&mut self, kind: StmtKind) -> Stmt {
        Stmt {
            id: self.next_id(),
            span: self.span,
            kind,
        }
    }

    pub fn expr(&mut self, kind: ExprKind) -> Expr {
        Expr {
            id: self.next_id(),
            span: self.span,
            kind,
        }
    }

    // Literals

    pub fn none(&mut self) -> Expr {
        self.expr(ExprKind::Literal(Literal::None))
    }

    pub fn nan(&mut self) -> Expr {
        self.expr(ExprKind::Literal(Literal::NaN))
    }

    pub fn boolean(&mut self, value: bool) -> Expr {
        self.expr(ExprKind::Literal(Literal::Boolean(value)))
    }

    /// Number literal as written in source.
    pub fn number(&mut self, text: &str) -> Expr {
        self.expr(ExprKind::Literal(Literal::Number(text.to_string())))
    }

    pub fn int(&mut self, value: i64) -> Expr {
        self.expr(ExprKind::Literal(Literal::Number(value.to_string())))
    }

    pub fn radix(&mut self, digits: &str, radix: u32) -> Expr {
        self.expr(ExprKind::Literal(Literal::Radix {
            digits: digits.to_string(),
            radix,
        }))
    }

    pub fn character(&mut self, value: char) -> Expr {
        self.expr(ExprKind::Literal(Literal::Character(value)))
    }

    /// Interpolated text literal.
    pub fn text(&mut self, value: &str) -> Expr {
        self.text_of(value, TextKind::Interpolated)
    }

    pub fn text_of(&mut self, value: &str, kind: TextKind) -> Expr {
        self.expr(ExprKind::Literal(Literal::Text {
            value: value.to_string(),
            kind,
        }))
    }

    // Names

    pub fn ident(&mut self, name: &str) -> Expr {
        self.expr(ExprKind::Identifier(name.to_string()))
    }

    /// `a:b؟:c`. Text that does not parse as a path is kept as one segment.
    pub fn path(&mut self, text: &str) -> Expr {
        let path = QualifiedName::parse(text).unwrap_or_else(|| QualifiedName::single(text));
        self.expr(ExprKind::Path(path))
    }

    pub fn index(&mut self, base: Expr, index: Expr) -> Expr {
        self.expr(ExprKind::Index {
            base: Box::new(base),
            index: Box::new(index),
        })
    }

    // Containers

    pub fn list(&mut self, elements: Vec<Expr>) -> Expr {
        self.collection(CollectionKind::List, elements)
    }

    pub fn tuple(&mut self, elements: Vec<Expr>) -> Expr {
        self.collection(CollectionKind::Tuple, elements)
    }

    pub fn set(&mut self, ordered: bool, elements: Vec<Expr>) -> Expr {
        self.collection(CollectionKind::Set { ordered }, elements)
    }

    pub fn collection(&mut self, kind: CollectionKind, elements: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Collection { kind, elements })
    }

    pub fn map(&mut self, ordered: bool, entries: Vec<(Expr, Expr)>) -> Expr {
        self.expr(ExprKind::Map { ordered, entries })
    }

    pub fn object(&mut self, fields: Vec<ObjectField>) -> Expr {
        self.expr(ExprKind::Object(fields))
    }

    pub fn field(&mut self, name: &str, value: Expr) -> ObjectField {
        ObjectField {
            span: self.span,
            name: name.to_string(),
            keyword: None,
            declared_type: None,
            value,
        }
    }

    pub fn constant_field(&mut self, name: &str, value: Expr) -> ObjectField {
        ObjectField {
            keyword: Some(DeclKeyword::Constant),
            ..self.field(name, value)
        }
    }

    // Operators

    pub fn binary(&mut self, op: BinaryOp, left: Expr, right: Expr) -> Expr {
        self.expr(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: Expr) -> Expr {
        self.expr(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn update(&mut self, op: UpdateOp, prefix: bool, target: &str) -> Expr {
        let target = QualifiedName::parse(target).unwrap_or_else(|| QualifiedName::single(target));
        self.expr(ExprKind::Update { op, prefix, target })
    }

    pub fn ternary(&mut self, condition: Expr, then_expr: Expr, else_expr: Expr) -> Expr {
        self.expr(ExprKind::Ternary {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        })
    }

    // Calls

    pub fn arg(&mut self, value: Expr) -> Argument {
        Argument {
            span: self.span,
            name: None,
            value,
        }
    }

    pub fn named_arg(&mut self, name: &str, value: Expr) -> Argument {
        Argument {
            span: self.span,
            name: Some(name.to_string()),
            value,
        }
    }

    /// `name(args...)` with positional arguments.
    pub fn call(&mut self, name: &str, args: Vec<Expr>) -> Expr {
        let arguments = args.into_iter().map(|value| self.arg(value)).collect();
        self.call_with(Callee::plain(name), arguments)
    }

    /// `a:b::name(args...)`
    pub fn qualified_call(&mut self, path: &[&str], name: &str, args: Vec<Expr>) -> Expr {
        let arguments = args.into_iter().map(|value| self.arg(value)).collect();
        let callee = Callee {
            path: path.iter().map(|s| (*s).to_string()).collect(),
            name: name.to_string(),
        };
        self.call_with(callee, arguments)
    }

    pub fn call_with(&mut self, callee: Callee, arguments: Vec<Argument>) -> Expr {
        self.expr(ExprKind::Call(FunctionCall { callee, arguments }))
    }

    // Statements

    pub fn expr_stmt(&mut self, expr: Expr) -> Stmt {
        self.stmt(StmtKind::Expression(expr))
    }

    /// `متغير س : رقم` without a value.
    pub fn declare(
        &mut self,
        keyword: Option<DeclKeyword>,
        name: &str,
        declared_type: Option<TypeName>,
    ) -> Stmt {
        self.stmt(StmtKind::Declaration(Declaration {
            name: name.to_string(),
            keyword,
            declared_type,
        }))
    }

    /// `[ثابت|متغير] name [: type] = value`
    pub fn assign_decl(
        &mut self,
        keyword: Option<DeclKeyword>,
        name: &str,
        declared_type: Option<TypeName>,
        value: Expr,
    ) -> Stmt {
        let target = AssignTarget::Declaration(Declaration {
            name: name.to_string(),
            keyword,
            declared_type,
        });
        self.stmt(StmtKind::Assignment(Assignment { target, value }))
    }

    /// `متغير name = value`
    pub fn var(&mut self, name: &str, value: Expr) -> Stmt {
        self.assign_decl(Some(DeclKeyword::Variable), name, None, value)
    }

    /// `ثابت name = value`
    pub fn constant(&mut self, name: &str, value: Expr) -> Stmt {
        self.assign_decl(Some(DeclKeyword::Constant), name, None, value)
    }

    /// `a:b:c = value` on an existing binding.
    pub fn assign(&mut self, path: &str, value: Expr) -> Stmt {
        let path = QualifiedName::parse(path).unwrap_or_else(|| QualifiedName::single(path));
        self.stmt(StmtKind::Assignment(Assignment {
            target: AssignTarget::Path(path),
            value,
        }))
    }

    /// `base[i]...[k] = value`
    pub fn assign_index(&mut self, base: &str, indexes: Vec<Expr>, value: Expr) -> Stmt {
        let base = QualifiedName::parse(base).unwrap_or_else(|| QualifiedName::single(base));
        self.stmt(StmtKind::Assignment(Assignment {
            target: AssignTarget::Index { base, indexes },
            value,
        }))
    }

    pub fn block_stmt(&mut self, statements: Vec<Stmt>) -> Stmt {
        let block = self.block(statements);
        self.stmt(StmtKind::Block(block))
    }

    pub fn return_stmt(&mut self, value: Option<Expr>) -> Stmt {
        self.stmt(StmtKind::Return(value))
    }

    pub fn break_stmt(&mut self, label: Option<&str>) -> Stmt {
        self.stmt(StmtKind::Break(label.map(str::to_string)))
    }

    pub fn continue_stmt(&mut self, label: Option<&str>) -> Stmt {
        self.stmt(StmtKind::Continue(label.map(str::to_string)))
    }

    pub fn param(&mut self, name: &str) -> ParameterDecl {
        ParameterDecl {
            span: self.span,
            name: name.to_string(),
            is_constant: false,
            declared_type: None,
            default: None,
        }
    }

    pub fn param_with_default(&mut self, name: &str, default: Expr) -> ParameterDecl {
        ParameterDecl {
            default: Some(default),
            ..self.param(name)
        }
    }

    pub fn typed_param(&mut self, name: &str, declared_type: TypeName) -> ParameterDecl {
        ParameterDecl {
            declared_type: Some(declared_type),
            ..self.param(name)
        }
    }

    pub fn function(
        &mut self,
        name: &str,
        parameters: Vec<ParameterDecl>,
        return_type: Option<ReturnType>,
        body: Block,
    ) -> Stmt {
        self.stmt(StmtKind::FunctionDeclaration(FunctionDecl {
            name: name.to_string(),
            parameters,
            return_type,
            body: Rc::new(body),
        }))
    }

    pub fn if_stmt(
        &mut self,
        condition: Expr,
        then_block: Block,
        else_block: Option<Block>,
    ) -> Stmt {
        self.stmt(StmtKind::If(IfStmt {
            branches: vec![(condition, then_block)],
            else_block,
        }))
    }

    pub fn if_chain(&mut self, branches: Vec<(Expr, Block)>, else_block: Option<Block>) -> Stmt {
        self.stmt(StmtKind::If(IfStmt {
            branches,
            else_block,
        }))
    }

    /// `كرر_حلقة variable تعيين start إلى end إفعل body`
    pub fn for_stmt(
        &mut self,
        label: Option<&str>,
        variable: &str,
        start: Expr,
        end: Expr,
        body: Block,
    ) -> Stmt {
        self.for_stmt_with(ForStmt {
            label: label.map(str::to_string),
            variable: variable.to_string(),
            start,
            direction: LoopDirection::Up,
            end,
            step: None,
            body,
            else_block: None,
        })
    }

    pub fn for_stmt_with(&mut self, for_stmt: ForStmt) -> Stmt {
        self.stmt(StmtKind::For(for_stmt))
    }

    pub fn for_each(
        &mut self,
        label: Option<&str>,
        target: ForEachTarget,
        iterable: Expr,
        body: Block,
    ) -> Stmt {
        self.stmt(StmtKind::ForEach(ForEachStmt {
            label: label.map(str::to_string),
            target,
            iterable,
            body,
            else_block: None,
        }))
    }

    pub fn while_stmt(&mut self, label: Option<&str>, condition: Expr, body: Block) -> Stmt {
        self.while_with_else(label, condition, body, None)
    }

    pub fn while_with_else(
        &mut self,
        label: Option<&str>,
        condition: Expr,
        body: Block,
        else_block: Option<Block>,
    ) -> Stmt {
        self.stmt(StmtKind::While(WhileStmt {
            label: label.map(str::to_string),
            condition,
            body,
            else_block,
        }))
    }

    pub fn repeat_stmt(&mut self, label: Option<&str>, body: Block, condition: Expr) -> Stmt {
        self.stmt(StmtKind::Repeat(RepeatStmt {
            label: label.map(str::to_string),
            body,
            condition,
            else_block: None,
        }))
    }

    pub fn case_stmt(
        &mut self,
        subject: Expr,
        arms: Vec<CaseArm>,
        else_block: Option<Block>,
    ) -> Stmt {
        self.stmt(StmtKind::Case(CaseStmt {
            subject,
            arms,
            else_block,
        }))
    }

    pub fn try_stmt(&mut self, expr: Expr, cases: TryCases) -> Stmt {
        self.stmt(StmtKind::Try(TryStmt { expr, cases }))
    }
}
