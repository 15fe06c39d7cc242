//! Retry context supplied by the caller.

use crate::error::classified::ClassifiedError;
use crate::permission::tier::TierSet;
use std::collections::HashMap;

/// Caller-maintained state of a retry chain.
///
/// `attempt` is 1-indexed and only ever advanced by the caller when it
/// resubmits; nothing in this crate increments it.
#[derive(Debug, Clone)]
pub struct RetryContext {
    pub tool_name: String,
    pub arguments: HashMap<String, serde_json::Value>,
    pub granted_tiers: TierSet,
    pub attempt: u32,
    pub max_attempts: u32,
    pub prior_errors: Vec<ClassifiedError>,
}

impl RetryContext {
    pub fn new(tool_name: impl Into<String>, attempt: u32, max_attempts: u32) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
            granted_tiers: TierSet::new(),
            attempt,
            max_attempts,
            prior_errors: Vec::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: HashMap<String, serde_json::Value>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_granted_tiers(mut self, tiers: TierSet) -> Self {
        self.granted_tiers = tiers;
        self
    }

    pub fn with_prior_error(mut self, error: ClassifiedError) -> Self {
        self.prior_errors.push(error);
        self
    }

    /// Whether the caller's budget allows another attempt after this one.
    pub fn has_attempts_left(&self) -> bool {
        self.attempt < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::category::ErrorCategory;
    use crate::permission::tier::PermissionTier;

    #[test]
    fn test_builder() {
        let ctx = RetryContext::new("get_time_data", 2, 4)
            .with_granted_tiers([PermissionTier::ReadOnly].into())
            .with_prior_error(ClassifiedError::new(ErrorCategory::TimeoutError, "timed out"));

        assert_eq!(ctx.attempt, 2);
        assert_eq!(ctx.max_attempts, 4);
        assert_eq!(ctx.prior_errors.len(), 1);
        assert!(ctx.arguments.is_empty());
        assert!(ctx.has_attempts_left());
    }

    #[test]
    fn test_last_attempt_has_no_budget() {
        assert!(!RetryContext::new("get_tasks", 3, 3).has_attempts_left());
        assert!(!RetryContext::new("get_tasks", 50, 50).has_attempts_left());
    }
}
