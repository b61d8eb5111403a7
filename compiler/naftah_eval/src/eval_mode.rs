//! Evaluation modes.
//!
//! A script run and a REPL session differ in one policy: whether scopes
//! hand their declarations back to the enclosing scope when they close.
//! Both share the call-depth limit below.

/// How the interpreter treats scopes and recursion.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Run a whole script. Scopes discard their declarations on exit.
    #[default]
    Script,
    /// Interactive session. Declarations survive into the persistent root
    /// scope so later turns can see them.
    Repl,
}

impl EvalMode {
    /// Whether closing scopes merge their tables into the parent.
    #[inline]
    pub fn merges_scopes(self) -> bool {
        matches!(self, Self::Repl)
    }

    /// Default call-depth limit, or `None` for unlimited.
    ///
    /// Native builds rely on stack growth; WASM gets a fixed bound.
    #[inline]
    pub fn max_recursion_depth(self) -> Option<usize> {
        #[cfg(target_arch = "wasm32")]
        {
            let _ = self;
            Some(200)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            match self {
                Self::Script => None,
                Self::Repl => Some(10_000),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repl_merges() {
        assert!(EvalMode::Repl.merges_scopes());
        assert!(!EvalMode::Script.merges_scopes());
        assert_eq!(EvalMode::default(), EvalMode::Script);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_recursion_limits() {
        assert_eq!(EvalMode::Script.max_recursion_depth(), None);
        assert_eq!(EvalMode::Repl.max_recursion_depth(), Some(10_000));
    }
}
