//! Permission model and execution validator.
//!
//! [`PermissionModel`] pairs the immutable [`ToolCatalog`] with the caller's
//! mutable [`ExecutionPreferences`]. [`ExecutionValidator`] is the pure
//! decision trait the orchestrator calls before any side-effecting tool runs.

use super::preferences::{ExecutionPreferences, PreferencesUpdate};
use super::tier::{TierSet, join_tier_ids};
use crate::tool::entities::{ToolCatalog, ToolDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of validating a proposed tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub requires_confirmation: bool,
    /// Tiers the caller lacks (empty unless denied for permissions)
    #[serde(default, skip_serializing_if = "TierSet::is_empty")]
    pub missing_tiers: TierSet,
}

impl ValidationDecision {
    pub fn allow(requires_confirmation: bool) -> Self {
        Self {
            allowed: true,
            reason: None,
            requires_confirmation,
            missing_tiers: TierSet::new(),
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            requires_confirmation: false,
            missing_tiers: TierSet::new(),
        }
    }

    fn deny_missing(missing: TierSet) -> Self {
        Self {
            missing_tiers: missing.clone(),
            ..Self::deny(format!(
                "Missing required permissions: {}",
                join_tier_ids(&missing)
            ))
        }
    }

    pub fn is_unknown_tool(&self) -> bool {
        !self.allowed && self.missing_tiers.is_empty()
    }
}

/// Decides whether a tool call may proceed.
///
/// Pure: reads configuration state, performs no I/O.
pub trait ExecutionValidator {
    fn validate_execution(
        &self,
        tool_name: &str,
        args: &HashMap<String, serde_json::Value>,
    ) -> ValidationDecision;
}

/// Static tool configuration plus the caller's granted tiers and
/// auto-approve preferences.
#[derive(Debug, Clone)]
pub struct PermissionModel {
    catalog: Arc<ToolCatalog>,
    preferences: ExecutionPreferences,
}

impl PermissionModel {
    pub fn new(catalog: Arc<ToolCatalog>, preferences: ExecutionPreferences) -> Self {
        Self {
            catalog,
            preferences,
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub fn preferences(&self) -> &ExecutionPreferences {
        &self.preferences
    }

    pub fn granted_tiers(&self) -> &TierSet {
        &self.preferences.granted_tiers
    }

    pub fn descriptor(&self, tool_name: &str) -> Option<&ToolDescriptor> {
        self.catalog.get(tool_name)
    }

    /// Replace the granted tiers.
    pub fn set_permissions(&mut self, tiers: TierSet) {
        self.preferences.granted_tiers = tiers;
    }

    pub fn update_preferences(&mut self, update: PreferencesUpdate) {
        self.preferences.apply(update);
    }

    /// True iff every required tier is granted or covered by FullAccess.
    /// Unknown tools are never permitted.
    pub fn has_permission(&self, tool_name: &str) -> bool {
        self.catalog
            .get(tool_name)
            .is_some_and(|tool| tool.missing_tiers(&self.preferences.granted_tiers).is_empty())
    }

    /// False for auto-approved tools, otherwise the descriptor's flag.
    pub fn requires_confirmation(&self, tool_name: &str) -> bool {
        if self.preferences.is_auto_approved(tool_name) {
            return false;
        }
        self.catalog
            .get(tool_name)
            .is_some_and(|tool| tool.requires_confirmation)
    }

    /// Catalogue tools the caller may use, in catalogue order.
    pub fn available_tools(&self) -> Vec<String> {
        self.catalog
            .names()
            .filter(|name| self.has_permission(name))
            .map(str::to_string)
            .collect()
    }
}

impl ExecutionValidator for PermissionModel {
    fn validate_execution(
        &self,
        tool_name: &str,
        args: &HashMap<String, serde_json::Value>,
    ) -> ValidationDecision {
        let Some(tool) = self.catalog.get(tool_name) else {
            warn!(tool = %tool_name, "Validation denied: unknown tool");
            return ValidationDecision::deny(format!("Unknown tool: {}", tool_name));
        };

        let missing = tool.missing_tiers(&self.preferences.granted_tiers);
        if !missing.is_empty() {
            warn!(
                tool = %tool_name,
                missing = %join_tier_ids(&missing),
                "Validation denied: insufficient permissions"
            );
            return ValidationDecision::deny_missing(missing);
        }

        let requires_confirmation = self.requires_confirmation(tool_name);
        debug!(
            tool = %tool_name,
            arg_count = args.len(),
            requires_confirmation,
            "Validation allowed"
        );
        ValidationDecision::allow(requires_confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::tier::PermissionTier;
    use crate::tool::catalogue::{CREATE_TASK, GET_TASKS, START_TIMER};
    use crate::tool::entities::ToolDescriptor;

    fn model(tiers: &[PermissionTier]) -> PermissionModel {
        PermissionModel::new(
            Arc::new(ToolCatalog::standard()),
            ExecutionPreferences::default().with_granted_tiers(tiers.iter().copied()),
        )
    }

    fn no_args() -> HashMap<String, serde_json::Value> {
        HashMap::new()
    }

    #[test]
    fn test_unknown_tool_denied() {
        let decision = model(&[PermissionTier::FullAccess]).validate_execution("launch_rocket", &no_args());
        assert!(!decision.allowed);
        assert_eq!(decision.reason.as_deref(), Some("Unknown tool: launch_rocket"));
        assert!(decision.is_unknown_tool());
    }

    #[test]
    fn test_missing_tier_denied() {
        let decision = model(&[PermissionTier::ReadOnly]).validate_execution(CREATE_TASK, &no_args());
        assert!(!decision.allowed);
        assert!(decision.reason.unwrap().contains("ModifyTasks"));
        assert_eq!(decision.missing_tiers, [PermissionTier::ModifyTasks].into());
    }

    #[test]
    fn test_reason_enumerates_every_missing_tier() {
        let catalog = ToolCatalog::new([ToolDescriptor::new("plan_day", "Plan")
            .with_tier(PermissionTier::ModifyTasks)
            .with_tier(PermissionTier::TimerControl)])
        .unwrap();
        let model = PermissionModel::new(Arc::new(catalog), ExecutionPreferences::default());

        let reason = model.validate_execution("plan_day", &no_args()).reason.unwrap();
        assert!(reason.contains("ModifyTasks"));
        assert!(reason.contains("TimerControl"));
    }

    #[test]
    fn test_allowed_with_confirmation() {
        let decision = model(&[PermissionTier::ModifyTasks]).validate_execution(CREATE_TASK, &no_args());
        assert!(decision.allowed);
        assert!(decision.requires_confirmation);
        assert!(decision.reason.is_none());
    }

    #[test]
    fn test_auto_approve_skips_confirmation() {
        let mut model = model(&[PermissionTier::ModifyTasks]);
        model.update_preferences(PreferencesUpdate {
            auto_approve: Some([CREATE_TASK.to_string()].into()),
            ..Default::default()
        });
        assert!(!model.requires_confirmation(CREATE_TASK));
        assert!(!model.validate_execution(CREATE_TASK, &no_args()).requires_confirmation);
    }

    #[test]
    fn test_auto_approve_does_not_bypass_permissions() {
        let mut model = model(&[PermissionTier::ReadOnly]);
        model.update_preferences(PreferencesUpdate {
            auto_approve: Some([CREATE_TASK.to_string()].into()),
            ..Default::default()
        });
        assert!(!model.validate_execution(CREATE_TASK, &no_args()).allowed);
    }

    #[test]
    fn test_full_access_permits_every_tool() {
        let model = model(&[PermissionTier::FullAccess]);
        for name in model.catalog().names() {
            assert!(model.has_permission(name), "{} not permitted", name);
        }
        assert_eq!(model.available_tools().len(), model.catalog().len());
    }

    #[test]
    fn test_available_tools_filters_by_permission() {
        let model = model(&[PermissionTier::ReadOnly]);
        let tools = model.available_tools();
        assert!(tools.contains(&GET_TASKS.to_string()));
        assert!(!tools.contains(&START_TIMER.to_string()));
        assert!(!tools.contains(&CREATE_TASK.to_string()));
    }

    #[test]
    fn test_set_permissions_replaces_tiers() {
        let mut model = model(&[PermissionTier::ReadOnly]);
        assert!(!model.has_permission(START_TIMER));
        model.set_permissions([PermissionTier::TimerControl].into());
        assert!(model.has_permission(START_TIMER));
        assert!(!model.has_permission(GET_TASKS));
    }
}
