//! Callee resolution and invocation.

use std::rc::Rc;
use std::sync::Arc;

use naftah_ir::{FunctionCall, ReturnType, Span};

use super::declare::check_declared;
use super::Interpreter;
use crate::call::{prepare_arguments, ArgumentError, CallFrame};
use crate::declared::{DeclaredFunction, FunctionRef};
use crate::errors::{
    function_not_found, invalid_instance_call, native_invocation_failure, not_callable,
    too_few_arguments, too_many_arguments, unknown_parameter,
};
use crate::registry::{NativeCall, NativeError, NativeFunction};
use crate::stack::ensure_sufficient_stack;
use crate::{DeclaredVariable, EvalResult, Value};

/// First overload accepting `count` arguments, else the first one.
fn pick(candidates: &[FunctionRef], count: usize) -> Option<FunctionRef> {
    candidates
        .iter()
        .find(|f| f.accepts(count))
        .or_else(|| candidates.first())
        .cloned()
}

impl Interpreter {
    pub(super) fn eval_call(&mut self, call: &FunctionCall, span: Span) -> EvalResult<Value> {
        let mut args = Vec::with_capacity(call.arguments.len());
        for arg in &call.arguments {
            let value = self.eval_expr(&arg.value)?;
            args.push((arg.name.clone(), value));
        }
        let function = self.resolve_callee(call, args.len())?;
        self.call(&function, args, span)
    }

    /// Qualified names go to their provider. A plain name is looked up as a
    /// script function, then as a variable holding a function, then among
    /// the native providers.
    fn resolve_callee(&self, call: &FunctionCall, count: usize) -> EvalResult<FunctionRef> {
        let callee = &call.callee;
        let found = if callee.is_qualified() {
            self.registry
                .lookup_in(&callee.path, &callee.name)
                .and_then(|candidates| pick(candidates, count))
        } else if let Some(candidates) = self.contexts.get_function(&callee.name, true) {
            pick(candidates, count)
        } else if let Some((_, var)) = self.contexts.get_variable(&callee.name, true) {
            match &var.value {
                Value::Function(function) => Some(function.clone()),
                other => return Err(not_callable(other.type_name())),
            }
        } else {
            self.registry
                .lookup(&callee.name)
                .and_then(|candidates| pick(candidates, count))
        };
        found.ok_or_else(|| function_not_found(&callee.display()))
    }

    /// Invoke `function` with evaluated `(name, value)` arguments.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %function.name()))]
    pub fn call(
        &mut self,
        function: &FunctionRef,
        args: Vec<(Option<String>, Value)>,
        span: Span,
    ) -> EvalResult<Value> {
        match function {
            FunctionRef::Declared(declared) => self.call_declared(declared, args, span),
            FunctionRef::Builtin(native) | FunctionRef::Host(native) => {
                let is_host = matches!(function, FunctionRef::Host(_));
                self.call_native(native, is_host, args, span)
            }
        }
    }

    fn call_declared(
        &mut self,
        function: &Rc<DeclaredFunction>,
        args: Vec<(Option<String>, Value)>,
        span: Span,
    ) -> EvalResult<Value> {
        let found = args.len();
        let bound = prepare_arguments(&function.parameters, function.required_indexes(), args)
            .map_err(|err| match err {
                ArgumentError::TooManyArguments { expected, .. } => {
                    too_many_arguments(&function.name, expected, found)
                }
                ArgumentError::TooFewArguments { required, .. } => {
                    too_few_arguments(&function.name, required, found)
                }
                other => other.into(),
            })?;

        let frame = CallFrame {
            name: function.name.clone(),
            call_id: self.next_call_id(&function.name),
            call_span: Some(span),
        };
        let mut scoped = self.enter_call(frame)?;
        for (param, (name, value)) in function.parameters.iter().zip(bound) {
            check_declared(&value, param.declared_type)?;
            let var = DeclaredVariable {
                name,
                is_constant: param.is_constant,
                declared_type: param.declared_type,
                value,
                span: function.span,
            };
            scoped.contexts.define_variable(var)?;
        }

        let flow = ensure_sufficient_stack(|| scoped.eval_block(&function.body))
            .map_err(|err| scoped.call_stack.attach_backtrace(err))?;
        let value = flow.into_value();
        match function.return_type {
            Some(ReturnType::Void) => Ok(Value::None),
            Some(ReturnType::Type(ty)) => {
                check_declared(&value, Some(ty))?;
                Ok(value)
            }
            None => Ok(value),
        }
    }

    fn call_native(
        &mut self,
        function: &Rc<NativeFunction>,
        is_host: bool,
        args: Vec<(Option<String>, Value)>,
        span: Span,
    ) -> EvalResult<Value> {
        if let Some(name) = args.iter().find_map(|(name, _)| name.as_deref()) {
            return Err(unknown_parameter(name));
        }
        let args: Vec<Value> = args.into_iter().map(|(_, value)| value).collect();
        let arity = function.arity;
        if args.len() < arity.min {
            return Err(too_few_arguments(&function.name, arity.min, args.len()));
        }
        if let Some(max) = arity.max.filter(|max| args.len() > *max) {
            return Err(too_many_arguments(&function.name, max, args.len()));
        }
        if is_host && !function.is_static && !matches!(args.first(), Some(Value::Object(_))) {
            return Err(invalid_instance_call(&function.name));
        }

        let frame = CallFrame {
            name: function.name.clone(),
            call_id: self.next_call_id(&function.name),
            call_span: Some(span),
        };
        let scoped = self.enter_native_call(frame)?;
        let print = Arc::clone(&scoped.print_handler);
        let mut call = NativeCall::new(&function.name, span, &print);
        let value = function
            .invoke(&mut call, &args)
            .map_err(|err| match err {
                NativeError::Eval(inner) => *inner,
                other => native_invocation_failure(&function.name, &other.to_string()),
            })
            .map_err(|err| scoped.call_stack.attach_backtrace(err))?;
        Ok(if function.returns_void {
            Value::None
        } else {
            value
        })
    }
}
