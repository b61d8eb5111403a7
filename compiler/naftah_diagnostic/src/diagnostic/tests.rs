use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("variable 'س' not found")
        .with_label(Span::new(3, 4), "referenced here")
        .with_note("declare it with 'متغير' first");

    assert_eq!(diag.code, ErrorCode::E1001);
    assert_eq!(diag.labels.len(), 1);
    assert_eq!(diag.primary_span(), Some(Span::new(3, 4)));
    assert_eq!(diag.notes, vec!["declare it with 'متغير' first".to_string()]);
}

#[test]
fn test_dummy_spans_are_not_labelled() {
    let diag = Diagnostic::error(ErrorCode::E9002)
        .with_message("boom")
        .with_label(Span::DUMMY, "nowhere");
    assert!(diag.labels.is_empty());
    assert_eq!(diag.primary_span(), None);
}

#[test]
fn test_diagnostic_display() {
    let diag = Diagnostic::error(ErrorCode::E2001).with_message("mismatch");
    assert_eq!(diag.to_string(), "error[E2001]: mismatch");
}
