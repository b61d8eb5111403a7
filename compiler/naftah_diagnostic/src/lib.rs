//! Diagnostics for the Naftah runtime.
//!
//! Runtime errors are converted into a [`Diagnostic`] before they are shown:
//! - an [`ErrorCode`] for searchability
//! - a message saying what went wrong
//! - labelled positions saying where
//! - notes, including the call backtrace

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Label};
pub use emitter::{DiagnosticEmitter, TerminalEmitter};
pub use error_code::ErrorCode;
