//! Loop forms and the break/continue protocol.
//!
//! All four loops share one shape: resolve the label, enter a loop scope,
//! feed each body result to [`LoopState::observe`], then let
//! [`Interpreter::finish_loop`] decide what the loop statement yields.

use std::ops::ControlFlow;

use naftah_ir::{
    Block, ForEachStmt, ForEachTarget, ForStmt, LoopDirection, NodeId, RepeatStmt, Span, Stmt,
    Token, WhileStmt,
};

use super::{Interpreter, ScopedInterpreter};
use crate::errors::{invalid_control_flow, invalid_loop_bounds, invalid_loop_label, not_iterable};
use crate::signal::{Flow, LoopSignal, SignalKind};
use crate::value::Number;
use crate::{DeclaredVariable, EvalResult, Value};

/// Per-loop bookkeeping.
struct LoopState {
    label: String,
    /// Signal aimed past this loop.
    pending: Option<LoopSignal>,
    /// A break aimed at this loop ran.
    broke: bool,
}

impl LoopState {
    fn new(label: String) -> Self {
        LoopState {
            label,
            pending: None,
            broke: false,
        }
    }

    /// Inspect one body result. `Break` means stop iterating.
    fn observe(&mut self, flow: Flow) -> ControlFlow<()> {
        let Flow::Signal(signal) = flow else {
            return ControlFlow::Continue(());
        };
        match signal.kind {
            SignalKind::None => ControlFlow::Continue(()),
            SignalKind::Continue if signal.targets(&self.label) => ControlFlow::Continue(()),
            SignalKind::Break if signal.targets(&self.label) => {
                self.broke = true;
                ControlFlow::Break(())
            }
            SignalKind::Continue | SignalKind::Break | SignalKind::Return => {
                self.pending = Some(signal);
                ControlFlow::Break(())
            }
        }
    }
}

/// One for-each step: position, map key, element.
struct Item {
    index: usize,
    key: Option<Value>,
    value: Value,
}

fn iteration_items(iterable: &Value) -> EvalResult<Vec<Item>> {
    let plain = |values: Vec<Value>| -> Vec<Item> {
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| Item {
                index,
                key: None,
                value,
            })
            .collect()
    };
    Ok(match iterable {
        Value::List(items) => plain(items.borrow().clone()),
        Value::Tuple(items) => plain(items.to_vec()),
        Value::Set(set) => plain(set.borrow().items().to_vec()),
        Value::Text(text) => plain(text.chars().map(Value::Character).collect()),
        Value::ByteArray(bytes) => plain(bytes.iter().map(|b| Value::int(i64::from(*b))).collect()),
        Value::Map(map) => map
            .borrow()
            .entries()
            .iter()
            .enumerate()
            .map(|(index, (key, value))| Item {
                index,
                key: Some(key.clone()),
                value: value.clone(),
            })
            .collect(),
        other => return Err(not_iterable(other.type_name())),
    })
}

fn index_value(index: usize) -> Value {
    Value::int(i64::try_from(index).unwrap_or(i64::MAX))
}

fn bounds_number(value: &Value, what: &str) -> EvalResult<Number> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(invalid_loop_bounds(&format!(
            "{what} must be a number, found {}",
            other.type_name()
        ))),
    }
}

impl ScopedInterpreter<'_> {
    /// Bind a loop variable in the loop context, replacing the previous
    /// iteration's binding.
    fn bind_loop_variable(&mut self, name: &str, value: Value, span: Span) {
        self.contexts.bind_loop_variable(DeclaredVariable::new(name, value, span));
    }
}

impl Interpreter {
    /// Validate or generate the loop label, then enter the loop scope.
    fn enter_loop(
        &mut self,
        label: Option<&str>,
        node: NodeId,
    ) -> EvalResult<(ScopedInterpreter<'_>, LoopState)> {
        let label = match label {
            Some(label) => {
                if self.loops.innermost().is_some_and(|frame| frame.label == label) {
                    return Err(invalid_loop_label(label));
                }
                label.to_string()
            }
            None => self.next_loop_label(),
        };
        let state = LoopState::new(label.clone());
        Ok((self.enter_loop_scope(label, node), state))
    }

    /// What a finished loop statement yields. Runs the `وإلا` block when
    /// the loop ended without a break.
    fn finish_loop(&mut self, state: LoopState, else_block: Option<&Block>) -> EvalResult<Flow> {
        match state.pending {
            Some(signal) if signal.kind == SignalKind::Return || !self.loops.is_empty() => {
                Ok(Flow::Signal(signal))
            }
            Some(_) => Ok(Flow::NONE),
            None if state.broke => Ok(Flow::NONE),
            None => match else_block {
                Some(block) => self.eval_block(block),
                None => Ok(Flow::NONE),
            },
        }
    }

    pub(super) fn eval_for(&mut self, stmt: &Stmt, for_stmt: &ForStmt) -> EvalResult<Flow> {
        let start = bounds_number(&self.eval_expr(&for_stmt.start)?, "start")?;
        let end = bounds_number(&self.eval_expr(&for_stmt.end)?, "end")?;
        let step = match &for_stmt.step {
            Some(step) => bounds_number(&self.eval_expr(step)?, "step")?,
            None => Number::Int(1),
        };
        if step.is_nan() || step.compare(Number::Int(0)).map_or(true, |o| o.is_le()) {
            return Err(invalid_loop_bounds("step must be greater than zero"));
        }
        let ascending = for_stmt.direction == LoopDirection::Up;
        let inverted = if ascending {
            end.compare(start).map_or(true, |o| o.is_lt())
        } else {
            start.compare(end).map_or(true, |o| o.is_lt())
        };
        if inverted {
            return Err(invalid_loop_bounds(&format!(
                "cannot count from {start} {} {end}",
                if ascending { "up to" } else { "down to" }
            )));
        }

        let state = {
            let (mut scoped, mut state) = self.enter_loop(for_stmt.label.as_deref(), stmt.id)?;
            let mut current = start;
            loop {
                let in_range = if ascending {
                    current.compare(end).is_some_and(|o| o.is_le())
                } else {
                    current.compare(end).is_some_and(|o| o.is_ge())
                };
                if !in_range {
                    break;
                }
                scoped.bind_loop_variable(&for_stmt.variable, Value::from(current), stmt.span);
                let flow = scoped.eval_block(&for_stmt.body)?;
                if state.observe(flow).is_break() {
                    break;
                }
                current = if ascending {
                    current.add(step)?
                } else {
                    current.sub(step)?
                };
            }
            state
        };
        self.finish_loop(state, for_stmt.else_block.as_ref())
    }

    pub(super) fn eval_for_each(&mut self, stmt: &Stmt, each: &ForEachStmt) -> EvalResult<Flow> {
        let iterable = self.eval_expr(&each.iterable)?;
        let is_map = matches!(iterable, Value::Map(_));
        if !is_map
            && matches!(
                each.target,
                ForEachTarget::KeyValue(..) | ForEachTarget::IndexKeyValue(..)
            )
        {
            return Err(not_iterable(iterable.type_name()));
        }
        let items = iteration_items(&iterable)?;

        let state = {
            let (mut scoped, mut state) = self.enter_loop(each.label.as_deref(), stmt.id)?;
            for item in items {
                let key = item.key.unwrap_or(Value::None);
                // A map under a single value target yields (key, value) pairs.
                let element = if is_map {
                    Value::tuple(vec![key.clone(), item.value.clone()])
                } else {
                    item.value.clone()
                };
                match &each.target {
                    ForEachTarget::Value(v) => scoped.bind_loop_variable(v, element, stmt.span),
                    ForEachTarget::IndexValue(i, v) => {
                        scoped.bind_loop_variable(i, index_value(item.index), stmt.span);
                        scoped.bind_loop_variable(v, element, stmt.span);
                    }
                    ForEachTarget::KeyValue(k, v) => {
                        scoped.bind_loop_variable(k, key, stmt.span);
                        scoped.bind_loop_variable(v, item.value, stmt.span);
                    }
                    ForEachTarget::IndexKeyValue(i, k, v) => {
                        scoped.bind_loop_variable(i, index_value(item.index), stmt.span);
                        scoped.bind_loop_variable(k, key, stmt.span);
                        scoped.bind_loop_variable(v, item.value, stmt.span);
                    }
                }
                let flow = scoped.eval_block(&each.body)?;
                if state.observe(flow).is_break() {
                    break;
                }
            }
            state
        };
        self.finish_loop(state, each.else_block.as_ref())
    }

    pub(super) fn eval_while(&mut self, stmt: &Stmt, while_stmt: &WhileStmt) -> EvalResult<Flow> {
        let state = {
            let (mut scoped, mut state) = self.enter_loop(while_stmt.label.as_deref(), stmt.id)?;
            while scoped.eval_expr(&while_stmt.condition)?.is_truthy() {
                let flow = scoped.eval_block(&while_stmt.body)?;
                if state.observe(flow).is_break() {
                    break;
                }
            }
            state
        };
        self.finish_loop(state, while_stmt.else_block.as_ref())
    }

    pub(super) fn eval_repeat(&mut self, stmt: &Stmt, repeat: &RepeatStmt) -> EvalResult<Flow> {
        let state = {
            let (mut scoped, mut state) = self.enter_loop(repeat.label.as_deref(), stmt.id)?;
            loop {
                let flow = scoped.eval_block(&repeat.body)?;
                if state.observe(flow).is_break() {
                    break;
                }
                if scoped.eval_expr(&repeat.condition)?.is_truthy() {
                    break;
                }
            }
            state
        };
        self.finish_loop(state, repeat.else_block.as_ref())
    }

    /// `اكسر` / `تابع`, optionally labelled.
    pub(super) fn eval_jump(
        &mut self,
        kind: SignalKind,
        token: Token,
        label: Option<&str>,
    ) -> EvalResult<Flow> {
        let statement = self.vocabulary.quoted(token);
        let Some(innermost) = self.loops.innermost() else {
            return Err(invalid_control_flow(&statement, "used outside of a loop"));
        };
        if let Some(label) = label {
            if !self.loops.contains_label(label) {
                return Err(invalid_control_flow(
                    &statement,
                    &format!("no enclosing loop is labelled '{label}'"),
                ));
            }
            if innermost.label == label {
                return Err(invalid_control_flow(
                    &statement,
                    &format!("'{label}' names the loop the statement is directly in"),
                ));
            }
        }
        let source = Some(innermost.label.clone());
        Ok(Flow::Signal(LoopSignal::new(
            kind,
            source,
            label.map(str::to_string),
        )))
    }
}
