//! Plain-text rendering of a runtime error.
//!
//! ```text
//! error[E1001]: variable 'س' not found
//!   --> 3:4: referenced here
//!       1:0: declared here
//!   = note: stack backtrace: ...
//!   = help: declare 'س' before use
//! ```

use std::io::Write;

use crate::Diagnostic;

use super::DiagnosticEmitter;

const RED: &str = "\x1b[1;31m";
const BLUE: &str = "\x1b[1;34m";
const GREEN: &str = "\x1b[1;32m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Writes diagnostics as text, with ANSI colors when asked to.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, colors: bool) -> Self {
        TerminalEmitter { writer, colors }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn paint(&mut self, text: &str, color: &str) {
        let _ = if self.colors {
            write!(self.writer, "{color}{text}{RESET}")
        } else {
            write!(self.writer, "{text}")
        };
    }

    fn trailer(&mut self, kind: &str, color: &str, text: &str) {
        let _ = write!(self.writer, "  = ");
        self.paint(kind, color);
        let _ = writeln!(self.writer, ": {text}");
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.paint("error", RED);
        self.paint(&format!("[{}]", diagnostic.code), BOLD);
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        for label in &diagnostic.labels {
            let (marker, color) = if label.is_primary {
                ("-->", RED)
            } else {
                ("   ", BLUE)
            };
            let _ = write!(self.writer, "  {marker} {:?}: ", label.span);
            self.paint(&label.message, color);
            let _ = writeln!(self.writer);
        }
        for note in &diagnostic.notes {
            self.trailer("note", BOLD, note);
        }
        for suggestion in &diagnostic.suggestions {
            self.trailer("help", GREEN, suggestion);
        }
        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests;
