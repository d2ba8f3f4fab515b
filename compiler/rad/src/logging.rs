//! Tracing setup for the `rad` binary.
//!
//! Off unless `RAD_LOG` or `RUST_LOG` holds a filter, e.g.
//! `RAD_LOG=rad_eval=debug`. `RAD_LOG_TREE=1` prints nested spans as an
//! indented tree. Everything goes to stderr so script output stays clean.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracing_tree::HierarchicalLayer;

static TRACING_INIT: Once = Once::new();

/// Filter spec from the environment, `RAD_LOG` first.
fn filter_spec(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    ["RAD_LOG", "RUST_LOG"]
        .into_iter()
        .find_map(|var| lookup(var).filter(|spec| !spec.trim().is_empty()))
}

fn tree_requested(lookup: impl Fn(&str) -> Option<String>) -> bool {
    lookup("RAD_LOG_TREE").is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Install the global subscriber. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let lookup = |var: &str| std::env::var(var).ok();
        let Some(spec) = filter_spec(lookup) else {
            return;
        };
        let filter = EnvFilter::new(spec);
        if tree_requested(lookup) {
            tracing_subscriber::registry()
                .with(
                    HierarchicalLayer::new(2)
                        .with_writer(std::io::stderr)
                        .with_targets(true),
                )
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
