//! Tree-walking interpreter for Naftah.
//!
//! Evaluation is a direct recursive walk over the parse tree:
//!
//! - `stmt.rs` - statement dispatch and the block early-exit rule
//! - `loops.rs` - the four loop forms and `اكسر` / `تابع`
//! - `control.rs` - `إذا`, `اختر`, and `حاول`
//! - `declare.rs` - declarations, assignments, function declarations
//! - `expr.rs` - literals, names, containers, operators
//! - `function_call.rs` - callee resolution and invocation
//!
//! # Scopes
//!
//! Every context registration, loop frame, and call frame is owned by a
//! [`ScopedInterpreter`] guard. Dropping the guard undoes it, so an error
//! propagated with `?` (or a panic) never leaves a stale scope behind.
//!
//! # Early exit
//!
//! Statements return [`Flow`]. A block stops after a statement under which a
//! `ارجع` has executed, or after a statement that produced a signal and
//! executed an `اكسر` / `تابع`. The executed-node markers in the context
//! registry make that check possible without unwinding through errors.

mod builder;
mod control;
mod declare;
mod expr;
mod function_call;
mod loops;
mod scope_guard;
mod stmt;

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

use naftah_ir::{Program, TokenVocabulary};

use crate::call::CallStack;
use crate::context::ContextRegistry;
use crate::print_handler::SharedPrintHandler;
use crate::registry::FunctionRegistry;
use crate::signal::LoopStack;
use crate::{EvalMode, EvalResult, Value};

/// Interpreter state. One per script run or REPL session.
pub struct Interpreter {
    pub(crate) mode: EvalMode,
    pub(crate) contexts: ContextRegistry,
    pub(crate) loops: LoopStack,
    pub(crate) call_stack: CallStack,
    pub(crate) registry: FunctionRegistry,
    pub(crate) vocabulary: Box<dyn TokenVocabulary>,
    pub(crate) print_handler: SharedPrintHandler,
    /// Next generated loop label suffix.
    label_seq: usize,
    /// Next call id suffix.
    call_seq: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Script-mode interpreter printing to stdout, with the built-in
    /// functions registered.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub fn mode(&self) -> EvalMode {
        self.mode
    }

    pub fn contexts(&self) -> &ContextRegistry {
        &self.contexts
    }

    pub fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }

    pub fn loops(&self) -> &LoopStack {
        &self.loops
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Register host functions after construction.
    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Run a script, or one REPL turn, and return its last value.
    ///
    /// The program gets its own context below the root. In REPL mode its
    /// declarations merge into the root when it finishes, so the next turn
    /// sees them.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, program: &Program) -> EvalResult<Value> {
        let mut scoped = self.enter_context();
        let flow = scoped.eval_statements(&program.statements)?;
        Ok(flow.into_value())
    }

    fn next_loop_label(&mut self) -> String {
        let label = format!("{}-loop-{}", self.contexts.depth(), self.label_seq);
        self.label_seq += 1;
        label
    }

    fn next_call_id(&mut self, name: &str) -> String {
        let id = format!("{}-{name}-{}", self.contexts.depth(), self.call_seq);
        self.call_seq += 1;
        id
    }
}
