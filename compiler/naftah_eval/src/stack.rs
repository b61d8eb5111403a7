//! Stack growth for deeply nested evaluation.
//!
//! Recursive scripts and deeply nested expressions recurse on the native
//! stack. Wrapping statement, expression, and call evaluation in
//! [`ensure_sufficient_stack`] grows the stack on demand instead of
//! overflowing it. WASM targets manage their own stack, so the wrapper is a
//! passthrough there.

/// Grow when less than this remains (100 KiB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1 MiB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if the red zone has been reached.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
