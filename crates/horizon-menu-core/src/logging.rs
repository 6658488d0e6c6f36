//! Logging facilities for Horizon Menu.
//!
//! Horizon Menu uses the `tracing` crate for instrumentation. The library never
//! installs a subscriber; applications do that themselves:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_menu=debug")
//!         .init();
//! }
//! ```
//!
//! Every subsystem logs under its own target, so filter directives can narrow
//! output to one of them, e.g. `horizon_menu::binding=debug` to watch surfaces
//! being accepted or rejected.

/// Span names used throughout Horizon Menu for tracing.
pub mod span_names {
    /// Composition of one menu template.
    pub const COMPOSE: &str = "horizon_menu::compose";
    /// One turn of the tick queue.
    pub const TICK: &str = "horizon_menu::tick";
    /// Credential lookup for the autofill section.
    pub const ENRICHMENT: &str = "horizon_menu::enrichment";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to measure how long a unit of work (such as composing a menu) takes.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_menu::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Debug-level event under the crate-wide `horizon_menu` target.
#[macro_export]
macro_rules! menu_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_menu", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        // Ensure it constructs and drops without a subscriber installed.
        let _span = PerfSpan::new("test_operation");
    }

    #[test]
    fn test_perf_span_with_subscriber() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let _span = PerfSpan::new(span_names::COMPOSE);
            menu_debug!("inside span");
        });
    }
}
