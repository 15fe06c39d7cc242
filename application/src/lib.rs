//! Application layer for toolgate
//!
//! The orchestrator surface the agent loop calls, plus the ports the
//! caller implements (tool adapter, confirmation prompt, progress UI).
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    confirmation::{AutoApproveConfirmation, AutoRejectConfirmation, ConfirmationDecision, ConfirmationError, ConfirmationPort},
    execution_progress::{ExecutionProgressNotifier, NoExecutionProgress},
    tool_adapter::ToolAdapterPort,
};
pub use use_cases::error_handler::{ErrorHandler, RecoveryDecision};
pub use use_cases::execute_tool::{
    DEFAULT_MAX_ATTEMPTS, ExecuteToolError, ExecuteToolInput, ExecuteToolOutput, ExecuteToolUseCase,
};
pub use use_cases::orchestrator::ExecutionOrchestrator;
pub use use_cases::tool_execution_engine::ToolExecutionEngine;
