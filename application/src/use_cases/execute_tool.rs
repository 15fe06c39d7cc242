//! Execute tool use case
//!
//! Drives one tool invocation through its state machine:
//!
//! ```text
//! Requested → Validating → Denied
//!                        → NeedsConfirmation → Executing | Denied
//!                        → Executing → Succeeded
//!                                    → Failed → RetryDescribed | FallbackApplied → Terminal | Terminal
//! ```
//!
//! A single attempt only. When the outcome describes a retry, the caller
//! waits `retry_after_ms` and submits a new [`ExecuteToolInput`] with the
//! next attempt number; this use case never sleeps or loops.

use super::orchestrator::ExecutionOrchestrator;
use crate::ports::confirmation::{ConfirmationDecision, ConfirmationError, ConfirmationPort};
use crate::ports::execution_progress::{ExecutionProgressNotifier, NoExecutionProgress};
use crate::ports::tool_adapter::ToolAdapterPort;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use toolgate_domain::{
    ClassifiedError, DomainError, ExecutionOutcome, Invocation, InvocationState, RetryContext, ToolCall,
    UpstreamError,
};
use tracing::{debug, info, warn};

/// Attempts allowed per retry chain unless the caller says otherwise.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Errors from the use case itself. Tool failures are outcomes, not errors.
#[derive(Error, Debug)]
pub enum ExecuteToolError {
    #[error("Invocation state error: {0}")]
    State(#[from] DomainError),
}

/// Input for one attempt.
#[derive(Debug, Clone)]
pub struct ExecuteToolInput {
    pub call: ToolCall,
    /// 1-indexed, maintained by the caller across a retry chain
    pub attempt: u32,
    pub max_attempts: u32,
    /// Errors from earlier attempts of the same chain
    pub prior_errors: Vec<ClassifiedError>,
}

impl ExecuteToolInput {
    pub fn new(call: ToolCall) -> Self {
        Self {
            call,
            attempt: 1,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            prior_errors: Vec::new(),
        }
    }

    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = attempt;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Input for the next attempt of the same chain.
    pub fn next_attempt(mut self, error: Option<ClassifiedError>) -> Self {
        self.attempt += 1;
        self.prior_errors.extend(error);
        self
    }
}

/// Output of one attempt.
#[derive(Debug, Clone)]
pub struct ExecuteToolOutput {
    pub outcome: ExecutionOutcome,
    pub invocation: Invocation,
}

impl ExecuteToolOutput {
    pub fn state(&self) -> InvocationState {
        self.invocation.state()
    }

    /// The caller should resubmit after `outcome.metadata.retry_after_ms`.
    pub fn should_retry(&self) -> bool {
        self.state() == InvocationState::RetryDescribed
    }
}

/// Runs a single validated, optionally confirmed, tool call.
pub struct ExecuteToolUseCase {
    orchestrator: Arc<ExecutionOrchestrator>,
    adapter: Arc<dyn ToolAdapterPort>,
    confirmation: Arc<dyn ConfirmationPort>,
}

impl ExecuteToolUseCase {
    pub fn new(
        orchestrator: Arc<ExecutionOrchestrator>,
        adapter: Arc<dyn ToolAdapterPort>,
        confirmation: Arc<dyn ConfirmationPort>,
    ) -> Self {
        Self {
            orchestrator,
            adapter,
            confirmation,
        }
    }

    pub async fn execute(&self, input: ExecuteToolInput) -> Result<ExecuteToolOutput, ExecuteToolError> {
        self.execute_with_progress(input, &NoExecutionProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: ExecuteToolInput,
        progress: &dyn ExecutionProgressNotifier,
    ) -> Result<ExecuteToolOutput, ExecuteToolError> {
        let tool_name = input.call.tool_name.clone();
        let mut invocation = Invocation::new(&tool_name, input.attempt);
        let step = |invocation: &mut Invocation, state: InvocationState| -> Result<(), ExecuteToolError> {
            invocation.transition(state)?;
            progress.on_state_change(&tool_name, state);
            Ok(())
        };

        step(&mut invocation, InvocationState::Validating)?;
        let decision = self
            .orchestrator
            .validate_execution(&tool_name, &input.call.arguments);
        progress.on_validated(&tool_name, &decision);

        if !decision.allowed {
            step(&mut invocation, InvocationState::Denied)?;
            let outcome = if decision.is_unknown_tool() {
                self.orchestrator
                    .handle_error(UpstreamError::tool_not_found(&tool_name), None)
            } else {
                self.orchestrator.engine().denied_outcome(&tool_name, &decision)
            };
            return Ok(self.finish(outcome, invocation, progress));
        }

        if decision.requires_confirmation {
            step(&mut invocation, InvocationState::NeedsConfirmation)?;
            if let Some(outcome) = self.confirm(&input.call, progress).await {
                step(&mut invocation, InvocationState::Denied)?;
                return Ok(self.finish(outcome, invocation, progress));
            }
        }

        step(&mut invocation, InvocationState::Executing)?;
        progress.on_execution_start(&tool_name, input.attempt);
        let started = Instant::now();
        let result = self.adapter.execute(&input.call).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let outcome = match result {
            Ok(payload) => {
                let outcome = self.orchestrator.format_result(&tool_name, &payload, elapsed_ms);
                if outcome.success {
                    step(&mut invocation, InvocationState::Succeeded)?;
                } else {
                    step(&mut invocation, InvocationState::Failed)?;
                    step(&mut invocation, InvocationState::Terminal)?;
                }
                outcome
            }
            Err(error) => {
                step(&mut invocation, InvocationState::Failed)?;
                let context = RetryContext {
                    tool_name: tool_name.clone(),
                    arguments: input.call.arguments.clone(),
                    granted_tiers: self.orchestrator.engine().granted_tiers().clone(),
                    attempt: input.attempt,
                    max_attempts: input.max_attempts,
                    prior_errors: input.prior_errors.clone(),
                };
                let recovery = self.orchestrator.decide(error, Some(&context));
                let state = recovery.state();
                step(&mut invocation, state)?;
                if state == InvocationState::FallbackApplied {
                    step(&mut invocation, InvocationState::Terminal)?;
                }
                recovery.into_outcome().with_execution_time(elapsed_ms)
            }
        };

        Ok(self.finish(outcome, invocation, progress))
    }

    /// Ask for confirmation. `None` means approved; otherwise the refusal outcome.
    async fn confirm(&self, call: &ToolCall, progress: &dyn ExecutionProgressNotifier) -> Option<ExecutionOutcome> {
        let engine = self.orchestrator.engine();
        let descriptor = engine.descriptor(&call.tool_name)?;
        let timeout_seconds = engine.preferences().confirmation_timeout_seconds;
        progress.on_confirmation_requested(&call.tool_name, timeout_seconds);

        let answer = tokio::time::timeout(
            Duration::from_secs(timeout_seconds),
            self.confirmation.confirm(call, descriptor),
        )
        .await
        .unwrap_or(Err(ConfirmationError::TimedOut(timeout_seconds)));

        match answer {
            Ok(ConfirmationDecision::Approved) => {
                debug!(tool = %call.tool_name, "Confirmation approved");
                None
            }
            Ok(ConfirmationDecision::Rejected) => {
                info!(tool = %call.tool_name, "Confirmation rejected");
                Some(engine.declined_outcome(&call.tool_name, None))
            }
            Err(ConfirmationError::TimedOut(seconds)) => {
                warn!(tool = %call.tool_name, timeout_seconds = seconds, "Confirmation timed out");
                Some(engine.declined_outcome(&call.tool_name, Some(seconds)))
            }
            Err(e) => {
                warn!(tool = %call.tool_name, "Confirmation failed: {}", e);
                Some(engine.declined_outcome(&call.tool_name, None))
            }
        }
    }

    fn finish(
        &self,
        outcome: ExecutionOutcome,
        invocation: Invocation,
        progress: &dyn ExecutionProgressNotifier,
    ) -> ExecuteToolOutput {
        debug!(
            tool = %invocation.tool_name,
            attempt = invocation.attempt,
            state = %invocation.state(),
            success = outcome.success,
            "Invocation finished"
        );
        progress.on_outcome(&invocation.tool_name, &outcome);
        ExecuteToolOutput { outcome, invocation }
    }
}
