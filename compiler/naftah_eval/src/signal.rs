//! Non-local control flow.
//!
//! `اكسر`, `تابع`, and `ارجع` do not raise errors. Evaluating one produces a
//! [`LoopSignal`] as the statement's result, and every block and loop decides
//! from it whether to keep going, stop, or hand it outward.

use naftah_ir::NodeId;
use smallvec::SmallVec;

use crate::Value;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// Ordinary completion.
    None,
    Continue,
    Break,
    Return,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoopSignal {
    pub kind: SignalKind,
    /// Label of the innermost loop when the jump ran.
    pub source_label: Option<String>,
    /// Explicit `اكسر label` / `تابع label` target.
    pub target_label: Option<String>,
    /// Returned value; none for break and continue.
    pub result: Value,
}

impl LoopSignal {
    pub fn new(
        kind: SignalKind,
        source_label: Option<String>,
        target_label: Option<String>,
    ) -> Self {
        LoopSignal {
            kind,
            source_label,
            target_label,
            result: Value::None,
        }
    }

    pub fn returning(result: Value, source_label: Option<String>) -> Self {
        LoopSignal {
            kind: SignalKind::Return,
            source_label,
            target_label: None,
            result,
        }
    }

    /// Whether this break/continue is aimed at the loop labelled `label`.
    pub fn targets(&self, label: &str) -> bool {
        self.target_label.as_deref().map_or(true, |target| target == label)
    }
}

/// Result of evaluating a statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    Value(Value),
    Signal(LoopSignal),
}

impl Flow {
    pub const NONE: Flow = Flow::Value(Value::None);

    pub fn is_signal(&self) -> bool {
        matches!(self, Flow::Signal(_))
    }

    pub fn signal_kind(&self) -> SignalKind {
        match self {
            Flow::Value(_) => SignalKind::None,
            Flow::Signal(signal) => signal.kind,
        }
    }

    /// The carried value. A signal yields its result.
    pub fn into_value(self) -> Value {
        match self {
            Flow::Value(value) => value,
            Flow::Signal(signal) => signal.result,
        }
    }
}

impl From<Value> for Flow {
    fn from(value: Value) -> Self {
        Flow::Value(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopFrame {
    pub label: String,
    pub node: NodeId,
}

/// Active loops, innermost last.
#[derive(Clone, Debug, Default)]
pub struct LoopStack {
    frames: SmallVec<[LoopFrame; 8]>,
}

impl LoopStack {
    pub fn push(&mut self, frame: LoopFrame) {
        tracing::trace!(label = %frame.label, depth = self.frames.len() + 1, "push loop");
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<LoopFrame> {
        let frame = self.frames.pop();
        debug_assert!(frame.is_some(), "loop stack underflow");
        tracing::trace!(label = ?frame.as_ref().map(|f| &f.label), "pop loop");
        frame
    }

    pub fn innermost(&self) -> Option<&LoopFrame> {
        self.frames.last()
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.frames.iter().any(|f| f.label == label)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_targets_matches_absent_or_equal_label() {
        let any = LoopSignal::new(SignalKind::Break, None, None);
        assert!(any.targets("خارجي"));
        let aimed = LoopSignal::new(SignalKind::Continue, None, Some("خارجي".to_string()));
        assert!(aimed.targets("خارجي"));
        assert!(!aimed.targets("داخلي"));
    }

    #[test]
    fn test_flow_into_value() {
        let ret = Flow::Signal(LoopSignal::returning(Value::int(1), None));
        assert!(ret.is_signal());
        assert_eq!(ret.signal_kind(), SignalKind::Return);
        assert_eq!(ret.into_value(), Value::int(1));
        assert_eq!(Flow::NONE.signal_kind(), SignalKind::None);
    }

    #[test]
    fn test_loop_stack() {
        let mut stack = LoopStack::default();
        stack.push(LoopFrame {
            label: "أ".to_string(),
            node: NodeId::new(1),
        });
        stack.push(LoopFrame {
            label: "ب".to_string(),
            node: NodeId::new(2),
        });
        assert!(stack.contains_label("أ"));
        assert_eq!(stack.innermost().map(|f| f.label.as_str()), Some("ب"));
        assert_eq!(stack.pop().map(|f| f.node), Some(NodeId::new(2)));
        assert_eq!(stack.len(), 1);
    }
}
