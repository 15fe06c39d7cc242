//! Execution orchestrator
//!
//! The single surface the agent loop talks to: `validate_execution`,
//! `format_result` and `handle_error`, backed by a [`ToolExecutionEngine`]
//! and an [`ErrorHandler`] sharing one catalogue.
//!
//! There is no process-wide default instance. The agent loop constructs one
//! orchestrator and passes it down; mutate it only between invocations.

use super::error_handler::{ErrorHandler, RecoveryDecision};
use super::tool_execution_engine::ToolExecutionEngine;
use std::collections::HashMap;
use std::sync::Arc;
use toolgate_domain::{
    ClassifiedError, ExecutionOutcome, ExecutionPreferences, ExecutionValidator, MessageTemplates,
    PreferencesUpdate, RawError, RecoveryStrategyTable, RetryContext, TierSet, ToolCatalog, ValidationDecision,
};

/// [`ToolExecutionEngine`] and [`ErrorHandler`] acting together.
#[derive(Debug, Clone)]
pub struct ExecutionOrchestrator {
    engine: ToolExecutionEngine,
    errors: ErrorHandler,
}

impl ExecutionOrchestrator {
    pub fn new(catalog: Arc<ToolCatalog>, preferences: ExecutionPreferences) -> Self {
        Self {
            engine: ToolExecutionEngine::new(Arc::clone(&catalog), preferences),
            errors: ErrorHandler::new(catalog),
        }
    }

    /// Standard catalogue with the given preferences.
    pub fn standard(preferences: ExecutionPreferences) -> Self {
        Self::new(Arc::new(ToolCatalog::standard()), preferences)
    }

    // ==================== Builder Methods ====================

    /// Use these templates (and their translator) for every message.
    pub fn with_templates(self, templates: MessageTemplates) -> Self {
        let catalog = Arc::clone(self.errors.catalog());
        let preferences = self.engine.preferences().clone();
        Self {
            engine: ToolExecutionEngine::with_templates(catalog, preferences, templates.clone()),
            errors: self.errors.with_templates(templates),
        }
    }

    pub fn with_recovery_table(mut self, table: RecoveryStrategyTable) -> Self {
        self.errors = self.errors.with_table(table);
        self
    }

    pub fn engine(&self) -> &ToolExecutionEngine {
        &self.engine
    }

    pub fn error_handler(&self) -> &ErrorHandler {
        &self.errors
    }

    // ==================== Permission Surface ====================

    pub fn validate_execution(
        &self,
        tool_name: &str,
        args: &HashMap<String, serde_json::Value>,
    ) -> ValidationDecision {
        self.engine.validate_execution(tool_name, args)
    }

    pub fn has_permission(&self, tool_name: &str) -> bool {
        self.engine.has_permission(tool_name)
    }

    pub fn requires_confirmation(&self, tool_name: &str) -> bool {
        self.engine.requires_confirmation(tool_name)
    }

    pub fn available_tools(&self) -> Vec<String> {
        self.engine.available_tools()
    }

    pub fn set_permissions(&mut self, tiers: TierSet) {
        self.engine.set_permissions(tiers);
    }

    pub fn update_preferences(&mut self, update: PreferencesUpdate) {
        self.engine.update_preferences(update);
    }

    // ==================== Outcomes ====================

    pub fn format_result(
        &self,
        tool_name: &str,
        payload: &serde_json::Value,
        execution_time_ms: u64,
    ) -> ExecutionOutcome {
        self.engine.format_result(tool_name, payload, execution_time_ms)
    }

    pub fn normalize_error(&self, error: impl Into<RawError>) -> ClassifiedError {
        self.errors.normalize_error(error)
    }

    /// Resolve any failure into an outcome. Never fails, never retries.
    pub fn handle_error(&self, error: impl Into<RawError>, context: Option<&RetryContext>) -> ExecutionOutcome {
        self.decide(error, context).into_outcome()
    }

    pub fn decide(&self, error: impl Into<RawError>, context: Option<&RetryContext>) -> RecoveryDecision {
        let granted = context
            .map(|c| &c.granted_tiers)
            .filter(|tiers| !tiers.is_empty())
            .unwrap_or(self.engine.granted_tiers());
        self.errors.decide(error, context, granted)
    }
}

impl ExecutionValidator for ExecutionOrchestrator {
    fn validate_execution(
        &self,
        tool_name: &str,
        args: &HashMap<String, serde_json::Value>,
    ) -> ValidationDecision {
        self.engine.validate_execution(tool_name, args)
    }
}
