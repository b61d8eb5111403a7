//! Live call stack.
//!
//! Every declared or native call pushes a [`CallFrame`] before running and
//! pops it on every exit path (the interpreter's scope guard does the pop).
//! When an error escapes a call, the stack is captured into an
//! [`EvalBacktrace`] so the report shows how execution got there.

use naftah_ir::Span;

use crate::errors::{recursion_limit_exceeded, BacktraceFrame, EvalBacktrace, EvalError};

/// One active call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallFrame {
    pub name: String,
    /// `"{depth}-{name}-{seq}"`, unique within one interpreter.
    pub call_id: String,
    /// Where the call was made.
    pub call_span: Option<Span>,
}

#[derive(Clone, Debug, Default)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `max_depth` of `None` means unlimited.
    pub fn new(max_depth: Option<usize>) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame. Past the depth limit the frame is not pushed and a
    /// `StackOverflow` error is returned.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        tracing::debug!(name = %frame.name, call_id = %frame.call_id, "push call");
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<CallFrame> {
        debug_assert!(!self.frames.is_empty(), "call stack underflow");
        let frame = self.frames.pop();
        if let Some(frame) = &frame {
            tracing::debug!(name = %frame.name, call_id = %frame.call_id, "pop call");
        }
        frame
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn current(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    /// Snapshot, most recent call first.
    pub fn capture(&self) -> EvalBacktrace {
        EvalBacktrace::new(
            self.frames
                .iter()
                .rev()
                .map(|f| BacktraceFrame {
                    name: f.name.clone(),
                    span: f.call_span,
                })
                .collect(),
        )
    }

    /// Attach a backtrace unless the error already carries one.
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        if self.frames.is_empty() || err.backtrace.is_some() {
            return err;
        }
        err.with_backtrace(self.capture())
    }
}
