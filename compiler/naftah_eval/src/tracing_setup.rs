//! Tracing subscriber setup for hosts that embed the evaluator.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber. Safe to call more than once.
///
/// Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=naftah_eval=debug`. With `NAFTAH_LOG_TREE` also set, events are
/// rendered as an indented call tree instead of flat lines.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }

        let tree = std::env::var_os("NAFTAH_LOG_TREE").map(|_| {
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true)
        });
        let flat = tree
            .is_none()
            .then(|| fmt::layer().with_target(true).with_level(true));

        // A host may already have installed its own subscriber.
        let _ = tracing_subscriber::registry()
            .with(flat)
            .with(tree)
            .with(EnvFilter::from_default_env())
            .try_init();
    });
}
