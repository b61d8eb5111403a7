//! Naftah Eval - runtime core of the Naftah scripting language.
//!
//! This crate walks the parse tree produced by the front end (see
//! `naftah_ir`) and executes it.
//!
//! # Architecture
//!
//! - `Interpreter`: statement and expression evaluation, owned scopes via
//!   [`ScopedInterpreter`] guards
//! - `ContextRegistry`: depth-indexed scopes with executed-node markers
//! - `LoopStack` / `Flow`: break, continue, and return propagation
//! - `CallStack`: live calls, recursion limit, error backtraces
//! - `FunctionRegistry`: built-in and host functions grouped by provider
//! - `operators`: binary and unary operator semantics
//! - `typecheck`: declared-type compatibility
//!
//! # Re-exports
//!
//! Value types, error types, and the pieces a host needs to embed the
//! interpreter (print handlers, native function registration, tracing
//! setup) are re-exported at the crate root.

mod call;
mod context;
mod declared;
pub mod errors;
mod eval_mode;
pub mod interpreter;
mod interpolate;
pub mod operators;
mod print_handler;
pub mod qualified;
mod registry;
mod signal;
mod stack;
mod tracing_setup;
pub mod typecheck;
mod value;

pub use call::{prepare_arguments, ArgumentError, CallFrame, CallStack};
pub use context::{AssignError, Context, ContextFlags, ContextRegistry};
pub use declared::{DeclaredFunction, DeclaredParameter, DeclaredVariable, FunctionRef};
pub use errors::{BacktraceFrame, EvalBacktrace, EvalError, EvalErrorKind, EvalNote, EvalResult};
pub use eval_mode::EvalMode;
pub use interpolate::{interpolate, strip_delimiters};
pub use interpreter::{Interpreter, InterpreterBuilder, ScopedInterpreter};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
pub use registry::{
    Arity, FunctionRegistry, NativeCall, NativeError, NativeFn, NativeFunction, BUILTIN_PROVIDER,
};
pub use signal::{Flow, LoopFrame, LoopSignal, LoopStack, SignalKind};
pub use stack::ensure_sufficient_stack;
pub use tracing_setup::init_tracing;
pub use value::{
    DynamicObject, HostInstance, MapValue, Number, ResultValue, SetValue, Value, NONE_TEXT,
};

#[cfg(test)]
mod tests;
