//! Confirmation port for tools that need explicit user approval.
//!
//! The use case asks this port before running any tool whose descriptor
//! requires confirmation (unless the user auto-approved it). The wait is
//! bounded by `ExecutionPreferences::confirmation_timeout_seconds`.
//!
//! # Built-in Implementations
//!
//! - [`AutoApproveConfirmation`] - Always approves
//! - [`AutoRejectConfirmation`] - Always rejects
//!
//! Interactive implementations (chat prompt, dialog) live with the UI.

use async_trait::async_trait;
use thiserror::Error;
use toolgate_domain::{ToolCall, ToolDescriptor};

/// The user's answer to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationDecision {
    Approved,
    Rejected,
}

/// Failures while asking for confirmation, as opposed to a "no" answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    /// The prompt was dismissed without an answer.
    #[error("Confirmation cancelled")]
    Cancelled,

    #[error("Confirmation timed out after {0}s")]
    TimedOut(u64),

    #[error("Confirmation prompt failed: {0}")]
    Prompt(String),
}

/// Port for asking the user to approve a tool call.
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    async fn confirm(
        &self,
        call: &ToolCall,
        descriptor: &ToolDescriptor,
    ) -> Result<ConfirmationDecision, ConfirmationError>;
}

/// Approves everything. Intended for tests and trusted automation.
pub struct AutoApproveConfirmation;

#[async_trait]
impl ConfirmationPort for AutoApproveConfirmation {
    async fn confirm(
        &self,
        _call: &ToolCall,
        _descriptor: &ToolDescriptor,
    ) -> Result<ConfirmationDecision, ConfirmationError> {
        Ok(ConfirmationDecision::Approved)
    }
}

/// Rejects everything; the safest non-interactive mode.
pub struct AutoRejectConfirmation;

#[async_trait]
impl ConfirmationPort for AutoRejectConfirmation {
    async fn confirm(
        &self,
        _call: &ToolCall,
        _descriptor: &ToolDescriptor,
    ) -> Result<ConfirmationDecision, ConfirmationError> {
        Ok(ConfirmationDecision::Rejected)
    }
}
