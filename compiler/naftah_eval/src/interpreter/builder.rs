//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use naftah_ir::{ArabicVocabulary, TokenVocabulary};

use super::Interpreter;
use crate::call::CallStack;
use crate::context::ContextRegistry;
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::registry::FunctionRegistry;
use crate::signal::LoopStack;
use crate::EvalMode;

/// Builder for [`Interpreter`].
///
/// Defaults: `Script` mode, Arabic keyword spellings in messages, stdout
/// printing, the built-in function provider, and the mode's call-depth
/// limit.
#[derive(Default)]
pub struct InterpreterBuilder {
    mode: EvalMode,
    vocabulary: Option<Box<dyn TokenVocabulary>>,
    print_handler: Option<SharedPrintHandler>,
    registry: Option<FunctionRegistry>,
    max_call_depth: Option<Option<usize>>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the evaluation mode.
    ///
    /// Controls scope merging and the default recursion limit.
    #[must_use]
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Keyword spellings used in runtime error messages.
    #[must_use]
    pub fn vocabulary(mut self, vocabulary: impl TokenVocabulary + 'static) -> Self {
        self.vocabulary = Some(Box::new(vocabulary));
        self
    }

    /// Where `إطبع` writes.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Replace the function registry. The built-ins are not added to it.
    #[must_use]
    pub fn registry(mut self, registry: FunctionRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Override the mode's call-depth limit. `None` means unlimited.
    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = Some(depth);
        self
    }

    pub fn build(self) -> Interpreter {
        let max_depth = self
            .max_call_depth
            .unwrap_or_else(|| self.mode.max_recursion_depth());
        Interpreter {
            mode: self.mode,
            contexts: ContextRegistry::new(self.mode),
            loops: LoopStack::default(),
            call_stack: CallStack::new(max_depth),
            registry: self.registry.unwrap_or_else(FunctionRegistry::with_builtins),
            vocabulary: self
                .vocabulary
                .unwrap_or_else(|| Box::new(ArabicVocabulary)),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            label_seq: 0,
            call_seq: 0,
        }
    }
}
