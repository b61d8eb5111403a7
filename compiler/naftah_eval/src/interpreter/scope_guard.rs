//! RAII-style scope guards for interpreter state.
//!
//! [`ScopedInterpreter`] holds `&mut Interpreter` and implements `Deref` and
//! `DerefMut`, so code inside a scope calls interpreter methods as usual.
//! Dropping the guard, including during unwinding, undoes what entering
//! the scope did:
//!
//! | entered with          | undone on drop                                        |
//! |-----------------------|-------------------------------------------------------|
//! | `enter_context`       | context deregistered                                  |
//! | `enter_loop_scope`    | loop frame popped, context deregistered               |
//! | `enter_call`          | context deregistered, call frame popped, loops reset  |
//! | `enter_native_call`   | call frame popped                                     |

use std::mem;
use std::ops::{Deref, DerefMut};

use naftah_ir::NodeId;

use super::Interpreter;
use crate::call::CallFrame;
use crate::signal::{LoopFrame, LoopStack};
use crate::EvalResult;

enum ScopeKind {
    Context { depth: usize },
    Loop { depth: usize },
    Call { depth: usize, caller_loops: LoopStack },
    NativeCall,
}

/// Guard that restores interpreter state on drop.
pub struct ScopedInterpreter<'guard> {
    interpreter: &'guard mut Interpreter,
    kind: ScopeKind,
}

impl Drop for ScopedInterpreter<'_> {
    fn drop(&mut self) {
        let interpreter = &mut *self.interpreter;
        match &mut self.kind {
            ScopeKind::Context { depth } => {
                interpreter.contexts.deregister(*depth);
            }
            ScopeKind::Loop { depth } => {
                interpreter.loops.pop();
                interpreter.contexts.deregister(*depth);
            }
            ScopeKind::Call {
                depth,
                caller_loops,
            } => {
                interpreter.contexts.deregister(*depth);
                interpreter.call_stack.pop();
                interpreter.loops = mem::take(caller_loops);
            }
            ScopeKind::NativeCall => {
                interpreter.call_stack.pop();
            }
        }
    }
}

impl Deref for ScopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Register a child context, deregistered when the guard drops.
    pub fn enter_context(&mut self) -> ScopedInterpreter<'_> {
        let depth = self.contexts.register();
        ScopedInterpreter {
            interpreter: self,
            kind: ScopeKind::Context { depth },
        }
    }

    /// Run `f` inside a fresh child context.
    pub fn with_env_scope<T>(&mut self, f: impl FnOnce(&mut ScopedInterpreter<'_>) -> T) -> T {
        let mut scoped = self.enter_context();
        f(&mut scoped)
    }

    /// Register a loop context labelled `label` and push its frame.
    pub(crate) fn enter_loop_scope(
        &mut self,
        label: String,
        node: NodeId,
    ) -> ScopedInterpreter<'_> {
        let depth = self.contexts.register();
        self.contexts.current_mut().loop_label = Some(label.clone());
        self.loops.push(LoopFrame { label, node });
        ScopedInterpreter {
            interpreter: self,
            kind: ScopeKind::Loop { depth },
        }
    }

    /// Push a call frame and register the call context. The callee starts
    /// with an empty loop stack.
    ///
    /// Fails without changing anything when the call-depth limit is reached.
    pub(crate) fn enter_call(&mut self, frame: CallFrame) -> EvalResult<ScopedInterpreter<'_>> {
        let call_id = frame.call_id.clone();
        self.call_stack.push(frame)?;
        let depth = self.contexts.register();
        self.contexts.current_mut().function_call_id = Some(call_id);
        let caller_loops = mem::take(&mut self.loops);
        Ok(ScopedInterpreter {
            interpreter: self,
            kind: ScopeKind::Call {
                depth,
                caller_loops,
            },
        })
    }

    /// Push a call frame for a native function.
    pub(crate) fn enter_native_call(
        &mut self,
        frame: CallFrame,
    ) -> EvalResult<ScopedInterpreter<'_>> {
        self.call_stack.push(frame)?;
        Ok(ScopedInterpreter {
            interpreter: self,
            kind: ScopeKind::NativeCall,
        })
    }
}
