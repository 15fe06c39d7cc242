//! Error handler
//!
//! Funnels every failure through the normalizer and the recovery table and
//! always comes back with an [`ExecutionOutcome`]. Nothing here returns
//! `Err` or panics, including when a fallback fails.
//!
//! # Decision
//!
//! ```text
//! raw error ─► normalize ─► policy for category?
//!                              │ no  ─► generic terminal
//!                              │ yes
//!                              ▼
//!   context given, caller budget left, attempt <= max_retries
//!   and retry-eligible? ─► Retry (delay described)
//!                              │ no
//!                              ▼
//!                      fallback defined? ─► Fallback (or generic terminal on Err)
//!                              │ no
//!                              ▼
//!                      category terminal message
//! ```

use std::sync::Arc;
use toolgate_domain::recovery::UNKNOWN_TOOL;
use toolgate_domain::{
    AlternativeToolMatcher, ClassifiedError, ErrorNormalizer, ExecutionOutcome, FallbackContext, InvocationState,
    MessageTemplates, RawError, RecoveryStrategyTable, RetryContext, TierSet, ToolCatalog,
};
use tracing::{debug, info, warn};

/// How a failure was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryDecision {
    /// The caller should resubmit after `retry_after_ms`.
    Retry(ExecutionOutcome),
    /// A category fallback produced the outcome.
    Fallback(ExecutionOutcome),
    Terminal(ExecutionOutcome),
}

impl RecoveryDecision {
    pub fn outcome(&self) -> &ExecutionOutcome {
        match self {
            RecoveryDecision::Retry(o) | RecoveryDecision::Fallback(o) | RecoveryDecision::Terminal(o) => o,
        }
    }

    pub fn into_outcome(self) -> ExecutionOutcome {
        match self {
            RecoveryDecision::Retry(o) | RecoveryDecision::Fallback(o) | RecoveryDecision::Terminal(o) => o,
        }
    }

    /// Invocation state reached from `Failed`.
    pub fn state(&self) -> InvocationState {
        match self {
            RecoveryDecision::Retry(_) => InvocationState::RetryDescribed,
            RecoveryDecision::Fallback(_) => InvocationState::FallbackApplied,
            RecoveryDecision::Terminal(_) => InvocationState::Terminal,
        }
    }
}

/// Classifies failures and decides retry, fallback or terminal outcome.
#[derive(Debug, Clone)]
pub struct ErrorHandler {
    catalog: Arc<ToolCatalog>,
    normalizer: ErrorNormalizer,
    table: RecoveryStrategyTable,
    matcher: AlternativeToolMatcher,
    templates: MessageTemplates,
}

impl ErrorHandler {
    pub fn new(catalog: Arc<ToolCatalog>) -> Self {
        Self {
            catalog,
            normalizer: ErrorNormalizer::new(),
            table: RecoveryStrategyTable::standard(),
            matcher: AlternativeToolMatcher::new(),
            templates: MessageTemplates::default(),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_table(mut self, table: RecoveryStrategyTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_templates(mut self, templates: MessageTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn catalog(&self) -> &Arc<ToolCatalog> {
        &self.catalog
    }

    pub fn table(&self) -> &RecoveryStrategyTable {
        &self.table
    }

    pub fn normalize_error(&self, error: impl Into<RawError>) -> ClassifiedError {
        self.normalizer.normalize(error)
    }

    /// Resolve a failure into an outcome. Never fails.
    pub fn handle_error(
        &self,
        error: impl Into<RawError>,
        context: Option<&RetryContext>,
        granted_tiers: &TierSet,
    ) -> ExecutionOutcome {
        self.decide(error, context, granted_tiers).into_outcome()
    }

    /// Like [`handle_error`](Self::handle_error), keeping which path was taken.
    pub fn decide(
        &self,
        error: impl Into<RawError>,
        context: Option<&RetryContext>,
        granted_tiers: &TierSet,
    ) -> RecoveryDecision {
        let error = self.normalizer.normalize(error);
        let tool_name = context
            .map(|c| c.tool_name.as_str())
            .or(error.tool_name.as_deref())
            .unwrap_or(UNKNOWN_TOOL);

        let Some(policy) = self.table.get(error.category) else {
            warn!(category = %error.category, tool = %tool_name, "No recovery policy; degrading");
            return RecoveryDecision::Terminal(self.generic_terminal(&error, tool_name, granted_tiers));
        };

        if let Some(ctx) = context.filter(|c| c.has_attempts_left() && policy.is_retryable(&error, c.attempt)) {
            let delay = policy.retry_delay_ms(ctx.attempt);
            info!(
                tool = %tool_name,
                category = %error.category,
                attempt = ctx.attempt,
                max_attempts = ctx.max_attempts,
                retry_after_ms = delay,
                "Describing retry"
            );
            let message = self
                .templates
                .retry(error.category, delay, ctx.attempt, ctx.max_attempts);
            let outcome = ExecutionOutcome::failure(tool_name, error.message.clone(), message)
                .with_category(error.category)
                .with_retry(delay, ctx.attempt, ctx.max_attempts)
                .with_granted_tiers(granted_tiers.clone());
            return RecoveryDecision::Retry(outcome);
        }

        if let Some(fallback) = policy.fallback {
            let fallback_ctx = FallbackContext {
                tool_name: context.map(|c| c.tool_name.as_str()),
                catalog: &self.catalog,
                granted_tiers,
                templates: &self.templates,
                matcher: &self.matcher,
            };
            return match fallback(&error, &fallback_ctx) {
                Ok(outcome) => {
                    debug!(tool = %tool_name, category = %error.category, "Fallback applied");
                    RecoveryDecision::Fallback(outcome)
                }
                Err(e) => {
                    warn!(tool = %tool_name, category = %error.category, "Fallback failed: {}", e);
                    RecoveryDecision::Terminal(self.generic_terminal(&error, tool_name, granted_tiers))
                }
            };
        }

        debug!(tool = %tool_name, category = %error.category, "Terminal failure");
        let available: Vec<String> = self.catalog.names().map(str::to_string).collect();
        let message = self
            .templates
            .terminal(error.category, tool_name, &error.message, &available);
        RecoveryDecision::Terminal(
            ExecutionOutcome::failure(tool_name, error.message.clone(), message)
                .with_category(error.category)
                .with_granted_tiers(granted_tiers.clone()),
        )
    }

    fn generic_terminal(&self, error: &ClassifiedError, tool_name: &str, granted_tiers: &TierSet) -> ExecutionOutcome {
        ExecutionOutcome::failure(tool_name, error.message.clone(), self.templates.generic_failure(tool_name))
            .with_category(error.category)
            .with_granted_tiers(granted_tiers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgate_domain::error::UpstreamError;
    use toolgate_domain::{ErrorCategory, PermissionTier, RecoveryPolicy};

    fn handler() -> ErrorHandler {
        ErrorHandler::new(Arc::new(ToolCatalog::standard()))
    }

    fn read_only() -> TierSet {
        [PermissionTier::ReadOnly].into()
    }

    #[test]
    fn test_timeout_retry_described() {
        let ctx = RetryContext::new("get_time_data", 1, 4);
        let decision = handler().decide("connection timed out", Some(&ctx), &read_only());

        assert_eq!(decision.state(), InvocationState::RetryDescribed);
        let outcome = decision.outcome();
        assert!(!outcome.success);
        assert_eq!(outcome.category(), Some(ErrorCategory::TimeoutError));
        assert_eq!(outcome.metadata.retry_after_ms, Some(1000));
        assert_eq!(outcome.metadata.attempt, Some(1));
        assert_eq!(outcome.metadata.max_attempts, Some(4));
        assert_eq!(outcome.metadata.tool_name, "get_time_data");
        assert!(outcome.user_message.starts_with("🔄"));
    }

    #[test]
    fn test_execution_delay_at_second_attempt() {
        let ctx = RetryContext::new("create_task", 2, 5);
        let error = ClassifiedError::new(ErrorCategory::ExecutionError, "adapter crashed");
        let outcome = handler().handle_error(error, Some(&ctx), &read_only());

        assert_eq!(outcome.metadata.retry_after_ms, Some(2000));
        assert!(outcome.user_message.contains("Retrying in 2 seconds (attempt 2 of 5)"));
    }

    #[test]
    fn test_retries_end_at_policy_ceiling() {
        // (category, message, max_retries, icon of the outcome once retries run out)
        let cases = [
            (ErrorCategory::ExecutionError, "adapter crashed", 2, "❌"),
            (ErrorCategory::DatabaseError, "database is locked", 3, "💾"),
            (ErrorCategory::NetworkError, "network reset", 3, "🌐"),
            (ErrorCategory::ResourceError, "service unavailable", 2, "📦"),
            (ErrorCategory::TimeoutError, "timed out", 2, "⏱️"),
            (ErrorCategory::UnknownError, "???", 1, "❌"),
        ];
        for (category, message, ceiling, icon) in cases {
            let error = ClassifiedError::new(category, message);

            let last = RetryContext::new("get_tasks", ceiling, 10);
            let decision = handler().decide(error.clone(), Some(&last), &read_only());
            assert_eq!(decision.state(), InvocationState::RetryDescribed, "{} at {}", category, ceiling);

            let exhausted = RetryContext::new("get_tasks", ceiling + 1, 10);
            let decision = handler().decide(error, Some(&exhausted), &read_only());
            assert_ne!(decision.state(), InvocationState::RetryDescribed, "{} at {}", category, ceiling + 1);
            assert!(decision.outcome().metadata.retry_after_ms.is_none());
            assert!(
                decision.outcome().user_message.starts_with(icon),
                "{}: {}",
                category,
                decision.outcome().user_message
            );
        }
    }

    #[test]
    fn test_exhausted_execution_uses_execution_template() {
        let ctx = RetryContext::new("create_task", 3, 5);
        let error = ClassifiedError::new(ErrorCategory::ExecutionError, "adapter crashed");
        let decision = handler().decide(error, Some(&ctx), &read_only());

        assert_eq!(decision.state(), InvocationState::Terminal);
        assert!(decision.outcome().user_message.starts_with("❌ Create Task failed: adapter crashed"));
    }

    #[test]
    fn test_exhausted_database_lock_applies_fallback() {
        let ctx = RetryContext::new("get_tasks", 4, 5);
        let decision = handler().decide("database is locked", Some(&ctx), &read_only());

        assert_eq!(decision.state(), InvocationState::FallbackApplied);
        assert!(decision.outcome().user_message.starts_with("💾"));
    }

    #[test]
    fn test_far_past_ceiling_never_describes_huge_delay() {
        let ctx = RetryContext::new("get_tasks", 50, 100);
        for (category, message) in [
            (ErrorCategory::ExecutionError, "adapter crashed"),
            (ErrorCategory::DatabaseError, "database is locked"),
            (ErrorCategory::NetworkError, "network reset"),
            (ErrorCategory::ResourceError, "service unavailable"),
        ] {
            let error = ClassifiedError::new(category, message);
            let outcome = handler().handle_error(error, Some(&ctx), &read_only());
            assert!(outcome.metadata.retry_after_ms.is_none(), "{}", category);
        }
    }

    #[test]
    fn test_caller_budget_caps_retries() {
        let ctx = RetryContext::new("get_tasks", 2, 2);
        let decision = handler().decide("database is locked", Some(&ctx), &read_only());
        assert_eq!(decision.state(), InvocationState::FallbackApplied);
    }

    #[test]
    fn test_no_context_means_no_retry() {
        let decision = handler().decide("connection timed out", None, &read_only());

        assert_eq!(decision.state(), InvocationState::Terminal);
        assert!(decision.outcome().metadata.retry_after_ms.is_none());
        assert!(decision.outcome().user_message.starts_with("⏱️"));
    }

    #[test]
    fn test_exhausted_timeout_is_terminal() {
        let ctx = RetryContext::new("get_time_data", 3, 4);
        let decision = handler().decide("request timeout", Some(&ctx), &read_only());
        assert_eq!(decision.state(), InvocationState::Terminal);
    }

    #[test]
    fn test_database_fallback_when_not_retryable() {
        let ctx = RetryContext::new("get_tasks", 1, 3);
        let decision = handler().decide("sqlite: no such table", Some(&ctx), &read_only());

        assert_eq!(decision.state(), InvocationState::FallbackApplied);
        assert!(decision.outcome().user_message.starts_with("💾"));
        assert_eq!(decision.outcome().metadata.tool_name, "get_tasks");
    }

    #[test]
    fn test_tool_not_found_suggestions() {
        let decision = handler().decide("Tool xyz not found", None, &read_only());

        assert_eq!(decision.state(), InvocationState::FallbackApplied);
        let outcome = decision.outcome();
        assert_eq!(outcome.category(), Some(ErrorCategory::ToolNotFound));
        assert_eq!(outcome.metadata.suggestions, Some(vec![]));
    }

    #[test]
    fn test_typed_upstream_error() {
        let ctx = RetryContext::new("creat_tsk", 1, 3);
        let outcome = handler().handle_error(UpstreamError::tool_not_found("creat_tsk"), Some(&ctx), &read_only());

        let suggestions = outcome.metadata.suggestions.unwrap();
        assert_eq!(suggestions[0].tool_name, "create_task");
    }

    #[test]
    fn test_failing_fallback_degrades_to_generic_terminal() {
        // ToolNotFound without any tool name makes the suggestion fallback fail.
        let error = ClassifiedError::new(ErrorCategory::ToolNotFound, "missing");
        let decision = handler().decide(error, None, &read_only());

        assert_eq!(decision.state(), InvocationState::Terminal);
        assert_eq!(decision.outcome().metadata.tool_name, UNKNOWN_TOOL);
        assert!(decision.outcome().user_message.contains("Something went wrong"));
    }

    #[test]
    fn test_missing_policy_degrades_to_generic_terminal() {
        let handler = handler().with_table(RecoveryStrategyTable::standard().without_policy(ErrorCategory::UnknownError));
        let ctx = RetryContext::new("get_tasks", 1, 3);
        let decision = handler.decide("???", Some(&ctx), &read_only());

        assert_eq!(decision.state(), InvocationState::Terminal);
        assert_eq!(decision.outcome().category(), Some(ErrorCategory::UnknownError));
    }

    #[test]
    fn test_terminal_without_fallback_uses_category_template() {
        let handler = handler().with_table(
            RecoveryStrategyTable::standard().with_policy(ErrorCategory::NetworkError, RecoveryPolicy::terminal(None)),
        );
        let ctx = RetryContext::new("get_tasks", 1, 3);
        let outcome = handler.handle_error("network unreachable", Some(&ctx), &read_only());

        assert!(outcome.user_message.starts_with("🌐 Network error: network unreachable"));
    }

    #[test]
    fn test_tool_not_found_without_fallback_lists_catalogue() {
        let handler = handler().with_table(
            RecoveryStrategyTable::standard().with_policy(ErrorCategory::ToolNotFound, RecoveryPolicy::terminal(None)),
        );
        let ctx = RetryContext::new("creat_tsk", 1, 3);
        let outcome = handler.handle_error("Tool creat_tsk not found", Some(&ctx), &read_only());

        assert_eq!(outcome.category(), Some(ErrorCategory::ToolNotFound));
        assert!(outcome.user_message.contains("Available tools: get_tasks, create_task"));
        assert!(!outcome.user_message.trim_end().ends_with(':'));
    }

    #[test]
    fn test_permission_fallback_uses_context_tool() {
        let ctx = RetryContext::new("create_task", 1, 3);
        let outcome = handler().handle_error("403 Forbidden", Some(&ctx), &read_only());

        assert_eq!(outcome.category(), Some(ErrorCategory::PermissionDenied));
        assert_eq!(
            outcome.metadata.required_tiers,
            Some([PermissionTier::ModifyTasks].into())
        );
    }
}
