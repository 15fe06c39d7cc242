//! Execution outcome: the single result type handed to the UI and agent loop.

use crate::error::category::ErrorCategory;
use crate::permission::tier::TierSet;
use crate::tool::matcher::AlternativeSuggestion;
use serde::{Deserialize, Serialize};

/// Result of one tool invocation, successful or not.
///
/// Constructed per call and never persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Lightly formatted text for the conversational UI
    pub user_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_confirmation: Option<bool>,
    pub metadata: OutcomeMetadata,
}

/// Structured metadata about an outcome.
///
/// | Outcome | `retry_after_ms` | `attempt` | `suggestions` | `required_tiers` | `category` |
/// |---------|:---:|:---:|:---:|:---:|:---:|
/// | success | - | - | - | - | - |
/// | retry descriptor | yes | yes | - | - | yes |
/// | tool not found | - | - | yes | - | yes |
/// | permission denied | - | - | - | yes | yes |
/// | other failure | - | - | - | - | yes |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeMetadata {
    pub execution_time_ms: u64,
    pub tool_name: String,
    pub granted_tiers: TierSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<AlternativeSuggestion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_tiers: Option<TierSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ErrorCategory>,
}

impl ExecutionOutcome {
    /// Create a successful outcome
    pub fn success(tool_name: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error_message: None,
            user_message: user_message.into(),
            requires_confirmation: None,
            metadata: OutcomeMetadata {
                tool_name: tool_name.into(),
                ..Default::default()
            },
        }
    }

    /// Create a failed outcome
    pub fn failure(
        tool_name: impl Into<String>,
        error_message: impl Into<String>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            error_message: Some(error_message.into()),
            ..Self::success(tool_name, user_message)
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_execution_time(mut self, execution_time_ms: u64) -> Self {
        self.metadata.execution_time_ms = execution_time_ms;
        self
    }

    pub fn with_granted_tiers(mut self, tiers: TierSet) -> Self {
        self.metadata.granted_tiers = tiers;
        self
    }

    pub fn with_category(mut self, category: ErrorCategory) -> Self {
        self.metadata.category = Some(category);
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<AlternativeSuggestion>) -> Self {
        self.metadata.suggestions = Some(suggestions);
        self
    }

    pub fn with_required_tiers(mut self, tiers: TierSet) -> Self {
        self.metadata.required_tiers = Some(tiers);
        self
    }

    pub fn with_confirmation(mut self, requires: bool) -> Self {
        self.requires_confirmation = Some(requires);
        self
    }

    /// Mark as a retry descriptor.
    pub fn with_retry(mut self, retry_after_ms: u64, attempt: u32, max_attempts: u32) -> Self {
        self.metadata.retry_after_ms = Some(retry_after_ms);
        self.metadata.attempt = Some(attempt);
        self.metadata.max_attempts = Some(max_attempts);
        self
    }

    pub fn tool_name(&self) -> &str {
        &self.metadata.tool_name
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        self.metadata.category
    }

    /// Whether the caller is being asked to resubmit after a delay.
    pub fn is_retry(&self) -> bool {
        !self.success && self.metadata.retry_after_ms.is_some()
    }
}
