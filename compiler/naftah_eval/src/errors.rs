//! Runtime error types.
//!
//! [`EvalError`] is the one error that crosses evaluator boundaries. Its
//! [`EvalErrorKind`] carries structured data so callers (and `try` cases)
//! can match on the category instead of parsing messages. Factory functions
//! below are the public way to build one; they fill `kind` and `message`
//! together.
//!
//! Break/continue/return never travel as errors: they are
//! [`Flow::Signal`](crate::Flow) values.

use std::fmt;

use naftah_diagnostic::{Diagnostic, DiagnosticEmitter, ErrorCode, TerminalEmitter};
use naftah_ir::{BinaryOp, Span, TypeName};

use crate::call::ArgumentError;
use crate::context::AssignError;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Names and scopes
    VariableNotFound {
        name: String,
    },
    FunctionNotFound {
        name: String,
    },
    ConstantReassignment {
        name: String,
    },
    DuplicateDeclaration {
        name: String,
    },

    // Types and containers
    TypeMismatch {
        expected: String,
        found: String,
    },
    NullKey,
    DuplicateKey {
        key: String,
    },
    DuplicateElement {
        element: String,
    },
    NotIterable {
        type_name: String,
    },
    IndexOutOfBounds {
        index: String,
        len: usize,
    },

    // Control flow
    InvalidControlFlowUsage {
        statement: String,
        reason: String,
    },
    InvalidLoopLabel {
        label: String,
    },
    InvalidLoopBounds {
        reason: String,
    },

    // Calls
    TooManyArguments {
        name: String,
        expected: usize,
        found: usize,
    },
    TooFewArguments {
        name: String,
        required: usize,
        found: usize,
    },
    DuplicateBinding {
        name: String,
    },
    UnknownParameter {
        name: String,
    },
    UnboundParameter {
        name: String,
    },
    NotCallable {
        type_name: String,
    },
    StackOverflow {
        depth: usize,
    },

    // Native functions
    InvalidInstanceCall {
        name: String,
    },
    NativeInvocationFailure {
        name: String,
        reason: String,
    },

    // Operators
    InvalidOperation {
        op: String,
        operands: String,
    },
    DivisionByZero,
    ArithmeticOverflow {
        operation: String,
    },
    InvalidNumber {
        text: String,
    },

    /// Catch-all for errors without a structured category.
    Custom {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VariableNotFound { name } => write!(f, "variable '{name}' not found"),
            Self::FunctionNotFound { name } => write!(f, "function '{name}' not found"),
            Self::ConstantReassignment { name } => {
                write!(f, "cannot reassign constant '{name}'")
            }
            Self::DuplicateDeclaration { name } => {
                write!(f, "'{name}' is already declared in this scope")
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {expected}, found {found}")
            }
            Self::NullKey => write!(f, "map keys cannot be null"),
            Self::DuplicateKey { key } => write!(f, "duplicate map key: {key}"),
            Self::DuplicateElement { element } => write!(f, "duplicate set element: {element}"),
            Self::NotIterable { type_name } => write!(f, "{type_name} is not iterable"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::InvalidControlFlowUsage { statement, reason } => {
                write!(f, "invalid use of {statement}: {reason}")
            }
            Self::InvalidLoopLabel { label } => write!(
                f,
                "loop label '{label}' is already used by the enclosing loop"
            ),
            Self::InvalidLoopBounds { reason } => write!(f, "invalid loop bounds: {reason}"),
            Self::TooManyArguments {
                name,
                expected,
                found,
            } => write!(
                f,
                "'{name}' takes at most {expected} argument{}, found {found}",
                plural_s(*expected)
            ),
            Self::TooFewArguments {
                name,
                required,
                found,
            } => write!(
                f,
                "'{name}' requires {required} argument{}, found {found}",
                plural_s(*required)
            ),
            Self::DuplicateBinding { name } => {
                write!(f, "parameter '{name}' is bound more than once")
            }
            Self::UnknownParameter { name } => write!(f, "no parameter named '{name}'"),
            Self::UnboundParameter { name } => {
                write!(f, "parameter '{name}' has no argument and no default")
            }
            Self::NotCallable { type_name } => write!(f, "{type_name} is not callable"),
            Self::StackOverflow { depth } => {
                write!(f, "maximum call depth exceeded (limit: {depth})")
            }
            Self::InvalidInstanceCall { name } => {
                write!(f, "'{name}' is an instance function and needs an instance argument")
            }
            Self::NativeInvocationFailure { name, reason } => {
                write!(f, "call to '{name}' failed: {reason}")
            }
            Self::InvalidOperation { op, operands } => {
                write!(f, "operator `{op}` cannot be applied to {operands}")
            }
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ArithmeticOverflow { operation } => {
                write!(f, "integer overflow in {operation}")
            }
            Self::InvalidNumber { text } => write!(f, "invalid number literal '{text}'"),
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Additional context note attached to an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalNote {
    pub message: String,
    pub span: Option<Span>,
}

impl EvalNote {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span: Some(span),
        }
    }
}

/// One call in the chain that led to an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    pub name: String,
    /// Call-site position.
    pub span: Option<Span>,
}

/// Snapshot of the call stack at an error site, most recent call first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if let Some(span) = frame.span {
                write!(f, " at {span:?}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Equals `kind.to_string()` for factory-built errors.
    pub message: String,
    /// Position of the node that failed.
    pub span: Option<Span>,
    /// Call chain at the error site, attached once by the innermost call.
    pub backtrace: Option<EvalBacktrace>,
    pub notes: Vec<EvalNote>,
}

/// Result of evaluating an expression.
pub type EvalResult<T = crate::Value> = Result<T, EvalError>;

impl EvalError {
    /// Uncategorized error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::Custom {
            message: message.into(),
        })
    }

    pub(crate) fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
            backtrace: None,
            notes: Vec::new(),
        }
    }

    /// Attach a position. An existing position is kept: the innermost node
    /// that failed is the most precise one.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() && !span.is_dummy() {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: EvalNote) -> Self {
        self.notes.push(note);
        self
    }

    /// Diagnostic code for this error.
    pub fn code(&self) -> ErrorCode {
        self.kind.error_code()
    }

    /// Convert into a reportable diagnostic.
    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code()).with_message(&self.message);
        if let Some(span) = self.span {
            diag = diag.with_label(span, self.kind.primary_label());
        }
        for note in &self.notes {
            diag = match note.span {
                Some(span) => diag.with_secondary_label(span, &note.message),
                None => diag.with_note(&note.message),
            };
        }
        if let Some(bt) = &self.backtrace {
            if !bt.is_empty() {
                diag = diag.with_note(bt.to_string().trim_end().to_string());
            }
        }
        if let Some(suggestion) = self.kind.suggestion() {
            diag = diag.with_suggestion(suggestion);
        }
        diag
    }

    /// Send this error to `emitter` as a diagnostic.
    pub fn report(&self, emitter: &mut impl DiagnosticEmitter) {
        emitter.emit(&self.to_diagnostic());
        emitter.flush();
    }

    /// The diagnostic as plain text, the way a script runner prints it.
    pub fn render(&self) -> String {
        let mut emitter = TerminalEmitter::new(Vec::new(), false);
        self.report(&mut emitter);
        String::from_utf8_lossy(&emitter.into_inner()).into_owned()
    }
}

impl EvalErrorKind {
    /// Map this kind to its diagnostic code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::VariableNotFound { .. } => ErrorCode::E1001,
            Self::FunctionNotFound { .. } => ErrorCode::E1002,
            Self::ConstantReassignment { .. } => ErrorCode::E1003,
            Self::DuplicateDeclaration { .. } => ErrorCode::E1004,
            Self::TypeMismatch { .. } => ErrorCode::E2001,
            Self::NullKey => ErrorCode::E2002,
            Self::DuplicateKey { .. } => ErrorCode::E2003,
            Self::DuplicateElement { .. } => ErrorCode::E2004,
            Self::NotIterable { .. } => ErrorCode::E2005,
            Self::IndexOutOfBounds { .. } => ErrorCode::E2006,
            Self::InvalidControlFlowUsage { .. } => ErrorCode::E3001,
            Self::InvalidLoopLabel { .. } => ErrorCode::E3002,
            Self::InvalidLoopBounds { .. } => ErrorCode::E3003,
            Self::TooManyArguments { .. } => ErrorCode::E4001,
            Self::TooFewArguments { .. } => ErrorCode::E4002,
            Self::DuplicateBinding { .. } => ErrorCode::E4003,
            Self::UnknownParameter { .. } => ErrorCode::E4004,
            Self::UnboundParameter { .. } => ErrorCode::E4005,
            Self::NotCallable { .. } => ErrorCode::E4006,
            Self::InvalidInstanceCall { .. } => ErrorCode::E5001,
            Self::NativeInvocationFailure { .. } => ErrorCode::E5002,
            Self::InvalidOperation { .. } => ErrorCode::E6001,
            Self::DivisionByZero => ErrorCode::E6002,
            Self::ArithmeticOverflow { .. } => ErrorCode::E6003,
            Self::InvalidNumber { .. } => ErrorCode::E6004,
            Self::StackOverflow { .. } => ErrorCode::E9001,
            Self::Custom { .. } => ErrorCode::E9002,
        }
    }

    /// Short label for the primary position.
    pub fn primary_label(&self) -> &'static str {
        match self {
            Self::VariableNotFound { .. } => "not found in this scope",
            Self::FunctionNotFound { .. } => "function not found",
            Self::ConstantReassignment { .. } => "constant assigned here",
            Self::DuplicateDeclaration { .. } => "declared again here",
            Self::TypeMismatch { .. } => "type mismatch",
            Self::NullKey => "null key",
            Self::DuplicateKey { .. } => "repeated key",
            Self::DuplicateElement { .. } => "repeated element",
            Self::NotIterable { .. } => "not iterable",
            Self::IndexOutOfBounds { .. } => "index out of bounds",
            Self::InvalidControlFlowUsage { .. } => "jump not allowed here",
            Self::InvalidLoopLabel { .. } => "label reused",
            Self::InvalidLoopBounds { .. } => "invalid bounds",
            Self::TooManyArguments { .. }
            | Self::TooFewArguments { .. }
            | Self::UnboundParameter { .. } => "wrong number of arguments",
            Self::DuplicateBinding { .. } | Self::UnknownParameter { .. } => "bad argument",
            Self::NotCallable { .. } => "not callable",
            Self::StackOverflow { .. } => "call depth exceeded",
            Self::InvalidInstanceCall { .. } => "missing instance",
            Self::NativeInvocationFailure { .. } => "native call failed",
            Self::InvalidOperation { .. } => "operator not supported",
            Self::DivisionByZero => "division by zero here",
            Self::ArithmeticOverflow { .. } => "overflow occurred here",
            Self::InvalidNumber { .. } => "malformed number",
            Self::Custom { .. } => "runtime error",
        }
    }

    /// Fix hint for the errors that have an obvious one.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ConstantReassignment { name } => {
                Some(format!("declare '{name}' as a variable instead of a constant"))
            }
            Self::DivisionByZero => Some("check the divisor before dividing".to_string()),
            Self::NullKey => Some("use a non-null key".to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(span) = self.span {
            write!(f, " ({span})")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

impl From<ArgumentError> for EvalError {
    fn from(err: ArgumentError) -> Self {
        match err {
            ArgumentError::TooManyArguments { expected, found } => {
                EvalError::from_kind(EvalErrorKind::TooManyArguments {
                    name: String::new(),
                    expected,
                    found,
                })
            }
            ArgumentError::TooFewArguments { required, found } => {
                EvalError::from_kind(EvalErrorKind::TooFewArguments {
                    name: String::new(),
                    required,
                    found,
                })
            }
            ArgumentError::DuplicateBinding { name } => duplicate_binding(&name),
            ArgumentError::UnknownParameter { name } => unknown_parameter(&name),
            ArgumentError::UnboundParameter { name } => unbound_parameter(&name),
        }
    }
}

impl From<AssignError> for EvalError {
    fn from(err: AssignError) -> Self {
        match err {
            AssignError::NotFound { name } => variable_not_found(&name),
            AssignError::Constant { name } => constant_reassignment(&name),
            AssignError::Duplicate { name } => duplicate_declaration(&name),
            AssignError::TypeMismatch { expected, found } => {
                type_mismatch_named(expected.display_name(), &found)
            }
        }
    }
}

// Factory functions

#[cold]
pub fn variable_not_found(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::VariableNotFound {
        name: name.to_string(),
    })
}

#[cold]
pub fn function_not_found(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::FunctionNotFound {
        name: name.to_string(),
    })
}

#[cold]
pub fn constant_reassignment(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConstantReassignment {
        name: name.to_string(),
    })
}

#[cold]
pub fn duplicate_declaration(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateDeclaration {
        name: name.to_string(),
    })
}

#[cold]
pub fn type_mismatch(expected: TypeName, found: &str) -> EvalError {
    type_mismatch_named(expected.display_name(), found)
}

#[cold]
pub fn type_mismatch_named(expected: &str, found: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        found: found.to_string(),
    })
}

#[cold]
pub fn null_key() -> EvalError {
    EvalError::from_kind(EvalErrorKind::NullKey)
}

#[cold]
pub fn duplicate_key(key: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateKey {
        key: key.to_string(),
    })
}

#[cold]
pub fn duplicate_element(element: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateElement {
        element: element.to_string(),
    })
}

#[cold]
pub fn not_iterable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIterable {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn index_out_of_bounds(index: &str, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds {
        index: index.to_string(),
        len,
    })
}

#[cold]
pub fn invalid_control_flow(statement: &str, reason: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidControlFlowUsage {
        statement: statement.to_string(),
        reason: reason.to_string(),
    })
}

#[cold]
pub fn invalid_loop_label(label: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidLoopLabel {
        label: label.to_string(),
    })
}

#[cold]
pub fn invalid_loop_bounds(reason: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidLoopBounds {
        reason: reason.to_string(),
    })
}

#[cold]
pub fn too_many_arguments(name: &str, expected: usize, found: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TooManyArguments {
        name: name.to_string(),
        expected,
        found,
    })
}

#[cold]
pub fn too_few_arguments(name: &str, required: usize, found: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TooFewArguments {
        name: name.to_string(),
        required,
        found,
    })
}

#[cold]
pub fn duplicate_binding(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateBinding {
        name: name.to_string(),
    })
}

#[cold]
pub fn unknown_parameter(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownParameter {
        name: name.to_string(),
    })
}

#[cold]
pub fn unbound_parameter(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnboundParameter {
        name: name.to_string(),
    })
}

#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

#[cold]
pub fn invalid_instance_call(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidInstanceCall {
        name: name.to_string(),
    })
}

#[cold]
pub fn native_invocation_failure(name: &str, reason: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NativeInvocationFailure {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

#[cold]
pub fn invalid_binary_op(op: BinaryOp, left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidOperation {
        op: op.as_symbol().to_string(),
        operands: format!("{left} and {right}"),
    })
}

#[cold]
pub fn invalid_unary_op(op: &str, operand: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidOperation {
        op: op.to_string(),
        operands: operand.to_string(),
    })
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn arithmetic_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArithmeticOverflow {
        operation: operation.to_string(),
    })
}

#[cold]
pub fn invalid_number(text: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidNumber {
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_factory_sets_kind_and_message() {
        let err = variable_not_found("س");
        assert_eq!(
            err.kind,
            EvalErrorKind::VariableNotFound {
                name: "س".to_string()
            }
        );
        assert_eq!(err.message, "variable 'س' not found");
        assert_eq!(err.code(), ErrorCode::E1001);
    }

    #[test]
    fn test_with_span_keeps_innermost() {
        let err = division_by_zero()
            .with_span(Span::new(2, 4))
            .with_span(Span::new(1, 0));
        assert_eq!(err.span, Some(Span::new(2, 4)));
        assert_eq!(err.to_string(), "division by zero (line 2, column 4)");
    }

    #[test]
    fn test_backtrace_display() {
        let bt = EvalBacktrace::new(vec![
            BacktraceFrame {
                name: "داخلي".to_string(),
                span: Some(Span::new(5, 2)),
            },
            BacktraceFrame {
                name: "خارجي".to_string(),
                span: None,
            },
        ]);
        assert_eq!(
            bt.to_string(),
            "stack backtrace:\n  0: داخلي at 5:2\n  1: خارجي\n"
        );
    }

    #[test]
    fn test_to_diagnostic() {
        let err = constant_reassignment("ث")
            .with_span(Span::new(3, 1))
            .with_note(EvalNote::new("declared as a constant"))
            .with_backtrace(EvalBacktrace::new(vec![BacktraceFrame {
                name: "f".to_string(),
                span: Some(Span::new(9, 0)),
            }]));
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E1003);
        assert_eq!(diag.message, "cannot reassign constant 'ث'");
        assert_eq!(diag.primary_span(), Some(Span::new(3, 1)));
        assert_eq!(
            diag.notes,
            vec![
                "declared as a constant".to_string(),
                "stack backtrace:\n  0: f at 9:0".to_string()
            ]
        );
        assert_eq!(diag.suggestions.len(), 1);
    }

    #[test]
    fn test_render() {
        let err = variable_not_found("س").with_span(Span::new(2, 5));
        let text = err.render();
        assert!(text.starts_with("error[E1001]: variable 'س' not found\n  --> 2:5: "));
        assert!(text.ends_with("\n\n"));

        let unplaced = division_by_zero().render();
        assert!(unplaced.starts_with("error[E6002]: division by zero\n"));
        assert!(!unplaced.contains("-->"));
    }

    #[test]
    fn test_argument_error_conversion() {
        let err: EvalError = ArgumentError::UnknownParameter {
            name: "ج".to_string(),
        }
        .into();
        assert_eq!(err.code(), ErrorCode::E4004);
    }
}
