//! Tool execution engine
//!
//! Owns the [`PermissionModel`] and the [`ResultFormatter`]: everything the
//! agent loop needs before a tool runs and after it succeeds.

use std::collections::HashMap;
use std::sync::Arc;
use toolgate_domain::{
    ErrorCategory, ExecutionOutcome, ExecutionPreferences, ExecutionValidator, MessageTemplates,
    PermissionModel, PreferencesUpdate, ResultFormatter, TierSet, ToolCatalog, ToolDescriptor,
    ValidationDecision,
};

/// Permission checks plus success formatting.
#[derive(Debug, Clone)]
pub struct ToolExecutionEngine {
    permissions: PermissionModel,
    formatter: ResultFormatter,
    templates: MessageTemplates,
}

impl ToolExecutionEngine {
    pub fn new(catalog: Arc<ToolCatalog>, preferences: ExecutionPreferences) -> Self {
        Self::with_templates(catalog, preferences, MessageTemplates::default())
    }

    pub fn with_templates(
        catalog: Arc<ToolCatalog>,
        preferences: ExecutionPreferences,
        templates: MessageTemplates,
    ) -> Self {
        Self {
            permissions: PermissionModel::new(catalog, preferences),
            formatter: ResultFormatter::new(templates.clone()),
            templates,
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        self.permissions.catalog()
    }

    pub fn preferences(&self) -> &ExecutionPreferences {
        self.permissions.preferences()
    }

    pub fn granted_tiers(&self) -> &TierSet {
        self.permissions.granted_tiers()
    }

    pub fn descriptor(&self, tool_name: &str) -> Option<&ToolDescriptor> {
        self.permissions.descriptor(tool_name)
    }

    // ==================== Permission Surface ====================

    pub fn validate_execution(
        &self,
        tool_name: &str,
        args: &HashMap<String, serde_json::Value>,
    ) -> ValidationDecision {
        self.permissions.validate_execution(tool_name, args)
    }

    pub fn has_permission(&self, tool_name: &str) -> bool {
        self.permissions.has_permission(tool_name)
    }

    pub fn requires_confirmation(&self, tool_name: &str) -> bool {
        self.permissions.requires_confirmation(tool_name)
    }

    pub fn available_tools(&self) -> Vec<String> {
        self.permissions.available_tools()
    }

    pub fn set_permissions(&mut self, tiers: TierSet) {
        self.permissions.set_permissions(tiers);
    }

    pub fn update_preferences(&mut self, update: PreferencesUpdate) {
        self.permissions.update_preferences(update);
    }

    // ==================== Outcomes ====================

    /// Outcome for a successful adapter call.
    pub fn format_result(
        &self,
        tool_name: &str,
        payload: &serde_json::Value,
        execution_time_ms: u64,
    ) -> ExecutionOutcome {
        self.formatter
            .format_result(tool_name, payload, execution_time_ms, self.granted_tiers())
    }

    pub fn format_result_text(&self, tool_name: &str, raw: &str, execution_time_ms: u64) -> ExecutionOutcome {
        self.formatter
            .format_result_text(tool_name, raw, execution_time_ms, self.granted_tiers())
    }

    /// Outcome for a call the validator refused.
    ///
    /// Permission denials carry the tool's `required_tiers`; unknown tools
    /// list what the caller may use instead.
    pub fn denied_outcome(&self, tool_name: &str, decision: &ValidationDecision) -> ExecutionOutcome {
        let reason = decision.reason.clone().unwrap_or_default();
        let granted = self.granted_tiers().clone();

        match self.descriptor(tool_name) {
            Some(descriptor) => {
                let message = self
                    .templates
                    .permission_denied(tool_name, &decision.missing_tiers, &reason);
                ExecutionOutcome::failure(tool_name, reason, message)
                    .with_category(ErrorCategory::PermissionDenied)
                    .with_required_tiers(descriptor.required_tiers.clone())
                    .with_granted_tiers(granted)
            }
            None => {
                let message = self
                    .templates
                    .tool_not_found(tool_name, &[], &self.available_tools());
                ExecutionOutcome::failure(tool_name, reason, message)
                    .with_category(ErrorCategory::ToolNotFound)
                    .with_granted_tiers(granted)
            }
        }
    }

    /// Outcome for a confirmation the user declined or never answered.
    pub fn declined_outcome(&self, tool_name: &str, timed_out_after: Option<u64>) -> ExecutionOutcome {
        let (reason, message) = match timed_out_after {
            Some(seconds) => (
                format!("Confirmation timed out after {}s", seconds),
                self.templates.confirmation_timed_out(tool_name, seconds),
            ),
            None => (
                "Execution declined by user".to_string(),
                self.templates.confirmation_declined(tool_name),
            ),
        };
        ExecutionOutcome::failure(tool_name, reason, message)
            .with_confirmation(true)
            .with_granted_tiers(self.granted_tiers().clone())
    }
}

impl ExecutionValidator for ToolExecutionEngine {
    fn validate_execution(
        &self,
        tool_name: &str,
        args: &HashMap<String, serde_json::Value>,
    ) -> ValidationDecision {
        self.permissions.validate_execution(tool_name, args)
    }
}
