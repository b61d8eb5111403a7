//! Error codes for runtime diagnostics.
//!
//! Each code is a unique identifier (e.g., `E1001`) whose first digit names
//! the area of the evaluator that raised it.

use std::fmt;

/// Error codes for all runtime diagnostics.
///
/// Format: E#### where the first digit indicates the area:
/// - E1xxx: Names and scopes
/// - E2xxx: Types and container values
/// - E3xxx: Control flow
/// - E4xxx: Argument binding and calls
/// - E5xxx: Built-in and host functions
/// - E6xxx: Operators and arithmetic
/// - E9xxx: Resource limits and uncategorized failures
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Names and scopes (E1xxx)
    /// Variable not found
    E1001,
    /// Function not found
    E1002,
    /// Assignment to a constant
    E1003,
    /// Name declared twice in the same scope
    E1004,

    // Types and containers (E2xxx)
    /// Value does not match the declared type
    E2001,
    /// Map literal with a null key
    E2002,
    /// Map literal with a repeated key
    E2003,
    /// Set literal with a repeated element
    E2004,
    /// Value cannot be iterated
    E2005,
    /// Index outside the container
    E2006,

    // Control flow (E3xxx)
    /// `break`/`continue` outside a loop or with a bad target
    E3001,
    /// Loop label clashes with the enclosing loop
    E3002,
    /// Invalid for-loop bounds or step
    E3003,

    // Calls (E4xxx)
    /// More arguments than parameters
    E4001,
    /// Fewer arguments than required parameters
    E4002,
    /// Parameter bound twice
    E4003,
    /// Named argument matches no parameter
    E4004,
    /// Parameter left without a value
    E4005,
    /// Value is not callable
    E4006,

    // Native functions (E5xxx)
    /// Instance method called without an instance
    E5001,
    /// Built-in or host function failed
    E5002,

    // Operators (E6xxx)
    /// Operator not defined for the operand types
    E6001,
    /// Division by zero
    E6002,
    /// Integer overflow
    E6003,
    /// Malformed number literal
    E6004,

    // Limits and uncategorized (E9xxx)
    /// Call depth limit exceeded
    E9001,
    /// Uncategorized runtime error
    E9002,
}

impl ErrorCode {
    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
            ErrorCode::E4004 => "E4004",
            ErrorCode::E4005 => "E4005",
            ErrorCode::E4006 => "E4006",
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Check if this is a name/scope error (E1xxx range).
    pub fn is_scope_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E1001 | ErrorCode::E1002 | ErrorCode::E1003 | ErrorCode::E1004
        )
    }

    /// Check if this is a type or container error (E2xxx range).
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E2001
                | ErrorCode::E2002
                | ErrorCode::E2003
                | ErrorCode::E2004
                | ErrorCode::E2005
                | ErrorCode::E2006
        )
    }

    /// Check if this is a control-flow error (E3xxx range).
    pub fn is_control_flow_error(&self) -> bool {
        matches!(self, ErrorCode::E3001 | ErrorCode::E3002 | ErrorCode::E3003)
    }

    /// Check if this is an argument binding or call error (E4xxx range).
    pub fn is_call_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E4001
                | ErrorCode::E4002
                | ErrorCode::E4003
                | ErrorCode::E4004
                | ErrorCode::E4005
                | ErrorCode::E4006
        )
    }

    /// Check if this came from a built-in or host function (E5xxx range).
    pub fn is_native_error(&self) -> bool {
        matches!(self, ErrorCode::E5001 | ErrorCode::E5002)
    }

    /// Check if this is an operator error (E6xxx range).
    pub fn is_operator_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E6001 | ErrorCode::E6002 | ErrorCode::E6003 | ErrorCode::E6004
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests;
