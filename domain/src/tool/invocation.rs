//! Per-invocation state machine.
//!
//! Tracks a single tool call from request to outcome. This is a pure
//! decision record: no timers live here, and a described retry restarts a
//! fresh invocation at `Requested` with the next attempt number.
//!
//! # State Transitions
//!
//! ```text
//! Requested ──> Validating ──> Denied
//!                         ├──> NeedsConfirmation ──> Executing | Denied
//!                         └──> Executing ──> Succeeded
//!                                       └──> Failed ──> RetryDescribed
//!                                                  ├──> FallbackApplied ──> Terminal
//!                                                  └──> Terminal
//! ```

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Lifecycle state of one tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvocationState {
    Requested,
    Validating,
    Denied,
    NeedsConfirmation,
    Executing,
    Succeeded,
    Failed,
    RetryDescribed,
    FallbackApplied,
    Terminal,
}

impl InvocationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationState::Requested => "Requested",
            InvocationState::Validating => "Validating",
            InvocationState::Denied => "Denied",
            InvocationState::NeedsConfirmation => "NeedsConfirmation",
            InvocationState::Executing => "Executing",
            InvocationState::Succeeded => "Succeeded",
            InvocationState::Failed => "Failed",
            InvocationState::RetryDescribed => "RetryDescribed",
            InvocationState::FallbackApplied => "FallbackApplied",
            InvocationState::Terminal => "Terminal",
        }
    }

    pub fn can_transition_to(&self, next: InvocationState) -> bool {
        use InvocationState::*;
        matches!(
            (self, next),
            (Requested, Validating)
                | (Validating, Denied)
                | (Validating, NeedsConfirmation)
                | (Validating, Executing)
                | (NeedsConfirmation, Executing)
                | (NeedsConfirmation, Denied)
                | (Executing, Succeeded)
                | (Executing, Failed)
                | (Failed, RetryDescribed)
                | (Failed, FallbackApplied)
                | (Failed, Terminal)
                | (FallbackApplied, Terminal)
        )
    }

    /// No further transitions are possible from this state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InvocationState::Denied
                | InvocationState::Succeeded
                | InvocationState::RetryDescribed
                | InvocationState::Terminal
        )
    }
}

impl std::fmt::Display for InvocationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked invocation: tool name, caller-owned attempt number, state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    pub tool_name: String,
    /// 1-indexed; maintained by the caller across a retry chain
    pub attempt: u32,
    state: InvocationState,
    history: Vec<InvocationState>,
}

impl Invocation {
    pub fn new(tool_name: impl Into<String>, attempt: u32) -> Self {
        Self {
            tool_name: tool_name.into(),
            attempt,
            state: InvocationState::Requested,
            history: vec![InvocationState::Requested],
        }
    }

    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// Every state visited, in order, starting with `Requested`.
    pub fn history(&self) -> &[InvocationState] {
        &self.history
    }

    pub fn transition(&mut self, next: InvocationState) -> Result<(), DomainError> {
        if !self.state.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        self.state = next;
        self.history.push(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut inv = Invocation::new("get_tasks", 1);
        inv.transition(InvocationState::Validating).unwrap();
        inv.transition(InvocationState::Executing).unwrap();
        inv.transition(InvocationState::Succeeded).unwrap();

        assert!(inv.state().is_terminal());
        assert_eq!(inv.history().len(), 4);
    }

    #[test]
    fn test_confirmation_path() {
        let mut inv = Invocation::new("create_task", 1);
        inv.transition(InvocationState::Validating).unwrap();
        inv.transition(InvocationState::NeedsConfirmation).unwrap();
        inv.transition(InvocationState::Denied).unwrap();
        assert_eq!(inv.state(), InvocationState::Denied);
    }

    #[test]
    fn test_failure_with_fallback() {
        let mut inv = Invocation::new("create_task", 2);
        for state in [
            InvocationState::Validating,
            InvocationState::Executing,
            InvocationState::Failed,
            InvocationState::FallbackApplied,
            InvocationState::Terminal,
        ] {
            inv.transition(state).unwrap();
        }
        assert_eq!(inv.attempt, 2);
        assert!(inv.state().is_terminal());
    }

    #[test]
    fn test_invalid_transition_rejected() {
        let mut inv = Invocation::new("get_tasks", 1);
        let err = inv.transition(InvocationState::Succeeded).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(inv.state(), InvocationState::Requested);
    }

    #[test]
    fn test_failed_is_not_terminal() {
        assert!(!InvocationState::Failed.is_terminal());
        assert!(!InvocationState::FallbackApplied.is_terminal());
        assert!(InvocationState::RetryDescribed.is_terminal());
    }
}
