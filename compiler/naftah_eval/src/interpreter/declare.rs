//! Declarations and assignments.

use std::rc::Rc;

use naftah_ir::{
    AssignTarget, Assignment, Declaration, Expr, FunctionDecl, QualifiedName, Span, TypeName,
};

use super::Interpreter;
use crate::context::ContextFlags;
use crate::declared::{DeclaredFunction, DeclaredParameter, FunctionRef};
use crate::errors::{null_key, type_mismatch};
use crate::{qualified, typecheck, DeclaredVariable, EvalResult, Value};

use super::expr::{index_value, list_position};

/// `TypeMismatch` for a value rejected by `declared`.
pub(super) fn check_declared(value: &Value, declared: Option<TypeName>) -> EvalResult<()> {
    match (declared, typecheck::check_assignment(value, declared)) {
        (Some(expected), Err(found)) => Err(type_mismatch(expected, found)),
        _ => Ok(()),
    }
}

impl Interpreter {
    /// Evaluate `f` with `var` as the declaration under construction, so
    /// container literals check their elements against its type. The
    /// previous state is restored even when `f` fails.
    pub(super) fn with_declaration<T>(
        &mut self,
        flag: ContextFlags,
        var: &DeclaredVariable,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        let context = self.contexts.current_mut();
        let saved_flags = context.flags;
        let saved_declaration = context.declaration_of_assignment.replace(var.clone());
        context.flags |= flag;
        let result = f(self);
        let context = self.contexts.current_mut();
        context.flags = saved_flags;
        context.declaration_of_assignment = saved_declaration;
        result
    }

    /// `متغير س : رقم` with no value.
    pub(super) fn eval_declaration(
        &mut self,
        declaration: &Declaration,
        span: Span,
    ) -> EvalResult<()> {
        if declaration.is_bare() && self.contexts.get_variable(&declaration.name, true).is_some() {
            return Ok(());
        }
        let var = declared_variable(declaration, Value::None, span);
        self.contexts.define_variable(var)?;
        Ok(())
    }

    pub(super) fn eval_assignment(
        &mut self,
        assignment: &Assignment,
        span: Span,
    ) -> EvalResult<()> {
        match &assignment.target {
            AssignTarget::Declaration(declaration) if declaration.is_bare() => {
                let value = self.eval_expr(&assignment.value)?;
                if self.contexts.get_variable(&declaration.name, true).is_some() {
                    self.contexts.set_variable(&declaration.name, value)?;
                } else {
                    self.contexts
                        .define_variable(DeclaredVariable::new(&declaration.name, value, span))?;
                }
                Ok(())
            }
            AssignTarget::Declaration(declaration) => {
                let mut var = declared_variable(declaration, Value::None, span);
                let value = self.with_declaration(ContextFlags::PARSING_ASSIGNMENT, &var, |this| {
                    this.eval_expr(&assignment.value)
                })?;
                check_declared(&value, var.declared_type)?;
                var.value = value;
                self.contexts.define_variable(var)?;
                Ok(())
            }
            AssignTarget::Path(path) => {
                let value = self.eval_expr(&assignment.value)?;
                qualified::assign(&mut self.contexts, path, value)
            }
            AssignTarget::Index { base, indexes } => {
                let value = self.eval_expr(&assignment.value)?;
                self.assign_index(base, indexes, value)
            }
        }
    }

    /// `أ:ب[i][j] = value`: all indexes but the last select a container,
    /// the last one is written.
    fn assign_index(
        &mut self,
        base: &QualifiedName,
        indexes: &[Expr],
        value: Value,
    ) -> EvalResult<()> {
        let mut container = qualified::resolve(&self.contexts, base)?;
        let Some((last, leading)) = indexes.split_last() else {
            return qualified::assign(&mut self.contexts, base, value);
        };
        for index in leading {
            let index = self.eval_expr(index)?;
            container = index_value(&container, &index)?;
        }
        let index = self.eval_expr(last)?;
        store_index(&container, index, value)
    }

    pub(super) fn eval_function_decl(&mut self, decl: &FunctionDecl, span: Span) -> EvalResult<()> {
        let mut parameters = Vec::with_capacity(decl.parameters.len());
        for param in &decl.parameters {
            let default_value = match &param.default {
                Some(expr) => {
                    let value = self.eval_expr(expr)?;
                    check_declared(&value, param.declared_type)?;
                    Some(value)
                }
                None => None,
            };
            parameters.push(DeclaredParameter {
                name: param.name.clone(),
                is_constant: param.is_constant,
                declared_type: param.declared_type,
                default_value,
            });
        }
        let function = DeclaredFunction::new(
            &decl.name,
            parameters,
            decl.return_type,
            Rc::clone(&decl.body),
            span,
        );
        tracing::debug!(name = %decl.name, "declare function");
        self.contexts
            .define_function(&decl.name, FunctionRef::Declared(Rc::new(function)))?;
        Ok(())
    }
}

fn declared_variable(declaration: &Declaration, value: Value, span: Span) -> DeclaredVariable {
    DeclaredVariable {
        name: declaration.name.clone(),
        is_constant: declaration.is_constant(),
        declared_type: declaration.declared_type,
        value,
        span,
    }
}

fn store_index(container: &Value, index: Value, value: Value) -> EvalResult<()> {
    match container {
        Value::List(items) => {
            let mut items = items.borrow_mut();
            let position = list_position(&index, items.len())?;
            items[position] = value;
            Ok(())
        }
        Value::Map(map) => {
            if index.is_none() {
                return Err(null_key());
            }
            map.borrow_mut().insert(index, value);
            Ok(())
        }
        other => Err(type_mismatch(TypeName::List, other.type_name())),
    }
}
