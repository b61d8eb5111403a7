//! Statement dispatch and block evaluation.

use naftah_ir::{Block, NodeKind, Stmt, StmtKind, Token};

use super::Interpreter;
use crate::signal::{Flow, LoopSignal, SignalKind};
use crate::stack::ensure_sufficient_stack;
use crate::EvalResult;

impl Interpreter {
    /// Evaluate a block in its own context.
    #[tracing::instrument(level = "debug", skip_all, fields(block = ?block.id))]
    pub fn eval_block(&mut self, block: &Block) -> EvalResult<Flow> {
        let mut scoped = self.enter_context();
        scoped.eval_statements(&block.statements)
    }

    /// Run statements in order in the current context, stopping early after
    /// a `ارجع`, or after a signal produced by an `اكسر` / `تابع`.
    pub(crate) fn eval_statements(&mut self, statements: &[Stmt]) -> EvalResult<Flow> {
        let depth = self.contexts.depth();
        let mut last = Flow::NONE;
        for stmt in statements {
            let flow = self.eval_stmt(stmt)?;
            self.contexts.mark_executed(stmt.id);
            let returned = self
                .contexts
                .has_executed_descendant_of_kind(depth, stmt, NodeKind::Return);
            let jumped = flow.is_signal()
                && (self
                    .contexts
                    .has_executed_descendant_of_kind(depth, stmt, NodeKind::Break)
                    || self
                        .contexts
                        .has_executed_descendant_of_kind(depth, stmt, NodeKind::Continue));
            last = flow;
            if returned || jumped {
                break;
            }
        }
        Ok(last)
    }

    pub fn eval_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| self.eval_stmt_inner(stmt))
            .map_err(|err| err.with_span(stmt.span))
    }

    fn eval_stmt_inner(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match &stmt.kind {
            StmtKind::Declaration(declaration) => {
                self.eval_declaration(declaration, stmt.span)?;
                Ok(Flow::NONE)
            }
            StmtKind::Assignment(assignment) => {
                self.eval_assignment(assignment, stmt.span)?;
                Ok(Flow::NONE)
            }
            StmtKind::FunctionDeclaration(decl) => {
                self.eval_function_decl(decl, stmt.span)?;
                Ok(Flow::NONE)
            }
            StmtKind::Expression(expr) => self.eval_expr(expr).map(Flow::Value),
            StmtKind::Block(block) => self.eval_block(block),
            StmtKind::If(if_stmt) => self.eval_if(if_stmt),
            StmtKind::For(for_stmt) => self.eval_for(stmt, for_stmt),
            StmtKind::ForEach(each) => self.eval_for_each(stmt, each),
            StmtKind::While(while_stmt) => self.eval_while(stmt, while_stmt),
            StmtKind::Repeat(repeat) => self.eval_repeat(stmt, repeat),
            StmtKind::Case(case) => self.eval_case(case),
            StmtKind::Try(try_stmt) => self.eval_try(try_stmt, stmt.span),
            StmtKind::Break(label) => {
                self.eval_jump(SignalKind::Break, Token::Break, label.as_deref())
            }
            StmtKind::Continue(label) => {
                self.eval_jump(SignalKind::Continue, Token::Continue, label.as_deref())
            }
            StmtKind::Return(value) => {
                let result = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => crate::Value::None,
                };
                let source = self.loops.innermost().map(|frame| frame.label.clone());
                Ok(Flow::Signal(LoopSignal::returning(result, source)))
            }
        }
    }
}
