//! Branching: `إذا`, `اختر`, and `حاول`.
//!
//! Signals produced inside a branch pass through unchanged; the enclosing
//! block or loop deals with them.

use naftah_ir::{CaseBody, CaseStmt, IfStmt, Span, TryCase, TryCases, TryStmt};

use super::Interpreter;
use crate::signal::Flow;
use crate::{DeclaredVariable, EvalResult, Value};

impl Interpreter {
    pub(super) fn eval_if(&mut self, if_stmt: &IfStmt) -> EvalResult<Flow> {
        for (condition, block) in &if_stmt.branches {
            if self.eval_expr(condition)?.is_truthy() {
                return self.eval_block(block);
            }
        }
        match &if_stmt.else_block {
            Some(block) => self.eval_block(block),
            None => Ok(Flow::NONE),
        }
    }

    pub(super) fn eval_case(&mut self, case: &CaseStmt) -> EvalResult<Flow> {
        let subject = self.eval_expr(&case.subject)?;
        for arm in &case.arms {
            for label in &arm.labels {
                if self.eval_expr(label)? == subject {
                    return self.eval_block(&arm.body);
                }
            }
        }
        match &case.else_block {
            Some(block) => self.eval_block(block),
            None => Ok(Flow::NONE),
        }
    }

    /// `حاول(expr)`. With result cases, an error from `expr` is caught only
    /// when a `فشل` case exists.
    pub(super) fn eval_try(&mut self, try_stmt: &TryStmt, span: Span) -> EvalResult<Flow> {
        let outcome = self.eval_expr(&try_stmt.expr);
        match &try_stmt.cases {
            TryCases::Result { ok, error } => match (outcome, ok, error) {
                (Err(err), _, Some(case)) => {
                    let code = err.code().as_str();
                    tracing::debug!(code, "try caught error");
                    let bound = Value::error(err.message, code);
                    self.run_try_case(case, bound, span)
                }
                (Err(err), _, None) => Err(err),
                (Ok(value), Some(case), _) if !value.is_none() => {
                    self.run_try_case(case, Value::ok(value), span)
                }
                (Ok(_), _, _) => Ok(Flow::NONE),
            },
            TryCases::Option { some, none } => {
                let value = outcome?;
                if value.is_none() {
                    self.run_try_case(none, Value::None, span)
                } else {
                    self.run_try_case(some, value, span)
                }
            }
        }
    }

    /// Run one case with its binding shadowing any same-named variable of
    /// the current context. The previous binding is restored afterwards,
    /// whether the case succeeded or not.
    fn run_try_case(&mut self, case: &TryCase, bound: Value, span: Span) -> EvalResult<Flow> {
        let Some(name) = &case.binding else {
            return self.eval_case_body(&case.body);
        };
        let previous = self
            .contexts
            .replace_variable(name, Some(DeclaredVariable::constant(name, bound, span)));
        let result = self.eval_case_body(&case.body);
        self.contexts.replace_variable(name, previous);
        result
    }

    fn eval_case_body(&mut self, body: &CaseBody) -> EvalResult<Flow> {
        match body {
            CaseBody::Expr(expr) => self.eval_expr(expr).map(Flow::Value),
            CaseBody::Block(block) => self.eval_block(block),
        }
    }
}
