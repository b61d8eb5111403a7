use super::*;
use crate::ErrorCode;
use naftah_ir::Span;
use pretty_assertions::assert_eq;

fn sample_diagnostic() -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001)
        .with_message("variable 'س' not found")
        .with_label(Span::new(3, 4), "referenced here")
        .with_secondary_label(Span::new(1, 0), "scope starts here")
        .with_note("stack backtrace:\n  0: f at 2:0")
        .with_suggestion("declare 'س' before use")
}

fn render(colors: bool, diag: &Diagnostic) -> String {
    let mut emitter = TerminalEmitter::new(Vec::new(), colors);
    emitter.emit(diag);
    emitter.flush();
    String::from_utf8_lossy(&emitter.into_inner()).into_owned()
}

#[test]
fn test_plain_text() {
    let text = render(false, &sample_diagnostic());
    assert_eq!(
        text,
        "error[E1001]: variable 'س' not found\n  \
         --> 3:4: referenced here\n      \
         1:0: scope starts here\n  \
         = note: stack backtrace:\n  0: f at 2:0\n  \
         = help: declare 'س' before use\n\n"
    );
}

#[test]
fn test_colored_header_and_labels() {
    let text = render(true, &sample_diagnostic());
    assert!(text.starts_with("\x1b[1;31merror\x1b[0m\x1b[1m[E1001]\x1b[0m"));
    assert!(text.contains("\x1b[1;34mscope starts here\x1b[0m"));
}

#[test]
fn test_without_labels() {
    let diag = Diagnostic::error(ErrorCode::E3001).with_message("'اكسر' used outside of a loop");
    assert_eq!(
        render(false, &diag),
        "error[E3001]: 'اكسر' used outside of a loop\n\n"
    );
}
