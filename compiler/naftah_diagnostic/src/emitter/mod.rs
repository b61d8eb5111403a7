//! Diagnostic emitters.
//!
//! Each emitter implements [`DiagnosticEmitter`]. The runtime ships a plain
//! terminal emitter; embedders can write their own.

mod terminal;

pub use terminal::TerminalEmitter;

use crate::Diagnostic;

/// Where a runtime error is reported.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Flush any buffered output.
    fn flush(&mut self);
}
