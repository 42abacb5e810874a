//! Common test utilities and helpers for integration tests

use sparkpi_core::context::FlowContext;
use std::sync::OnceLock;

/// Create a test context with a given name and thread count
pub fn create_test_context_with_threads(name: &str, threads: usize) -> FlowContext {
    FlowContext::new_with_threads(name, threads).expect("failed to create test context")
}

/// A context shared by tests that run many small estimations
#[allow(dead_code)] // not every test binary uses the shared context
pub fn shared_context() -> &'static FlowContext {
    static CONTEXT: OnceLock<FlowContext> = OnceLock::new();
    CONTEXT.get_or_init(|| create_test_context_with_threads("shared-test-context", 4))
}

/// Ten indicator values: seven samples inside the circle, three outside
#[allow(dead_code)]
pub fn seven_of_ten_indicators() -> Vec<u64> {
    vec![1, 0, 1, 1, 0, 1, 1, 1, 0, 1]
}
