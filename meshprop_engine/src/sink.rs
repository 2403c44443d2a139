//! Diagnostic sink for human-readable progress and stop notifications.
//!
//! `report` is one-way and infallible. The controller also emits
//! structured `tracing` events; the sink carries the operator-facing
//! messages only.

use static_assertions::assert_obj_safe;
use tracing::info;

/// One-way diagnostic message sink.
pub trait DiagnosticSink {
    /// Deliver one message. Must not fail or panic.
    fn report(&mut self, message: &str);
}

assert_obj_safe!(DiagnosticSink);

/// Forwards every message to `tracing` at INFO under the `meshprop::report` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, message: &str) {
        info!(target: "meshprop::report", "{message}");
    }
}

/// Keeps every message in memory, in delivery order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    messages: Vec<String>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Whether any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&mut self, message: &str) {
        self.messages.push(message.to_owned());
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, message: &str) {
        (**self).report(message);
    }
}
