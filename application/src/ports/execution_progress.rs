//! Progress notification port for single tool invocations.

use toolgate_domain::{ExecutionOutcome, InvocationState, ValidationDecision};

/// Callbacks fired while an invocation moves through its state machine.
///
/// All methods default to no-ops; implement only what the UI needs.
pub trait ExecutionProgressNotifier: Send + Sync {
    /// Called on every state transition, including the first `Validating`.
    fn on_state_change(&self, _tool_name: &str, _state: InvocationState) {}

    fn on_validated(&self, _tool_name: &str, _decision: &ValidationDecision) {}

    /// Called right before the confirmation port is asked.
    fn on_confirmation_requested(&self, _tool_name: &str, _timeout_seconds: u64) {}

    fn on_execution_start(&self, _tool_name: &str, _attempt: u32) {}

    /// Called once with the final outcome, whatever the path.
    fn on_outcome(&self, _tool_name: &str, _outcome: &ExecutionOutcome) {}
}

/// No-op progress notifier
pub struct NoExecutionProgress;

impl ExecutionProgressNotifier for NoExecutionProgress {}
