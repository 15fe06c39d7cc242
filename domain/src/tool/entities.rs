//! Tool domain entities

use crate::core::error::DomainError;
use crate::permission::tier::{PermissionTier, TierSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Static description of a tool the agent may invoke.
///
/// Built once at startup from a fixed catalogue; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique name of the tool (e.g., "create_task")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Every tier the caller must hold (or cover with FullAccess)
    pub required_tiers: TierSet,
    /// Whether the user must approve the call before it executes
    pub requires_confirmation: bool,
    /// Parameter definitions (documentation and remediation hints only)
    pub parameters: Vec<ToolParameter>,
    /// Keywords used by the alternative-tool matcher
    pub keywords: Vec<String>,
}

/// Parameter definition for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "number", "date")
    pub param_type: String,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required_tiers: TierSet::new(),
            requires_confirmation: false,
            parameters: Vec::new(),
            keywords: Vec::new(),
        }
    }

    pub fn with_tier(mut self, tier: PermissionTier) -> Self {
        self.required_tiers.insert(tier);
        self
    }

    pub fn with_confirmation(mut self, requires: bool) -> Self {
        self.requires_confirmation = requires;
        self
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Tiers required by this tool that `granted` does not satisfy.
    pub fn missing_tiers(&self, granted: &TierSet) -> TierSet {
        self.required_tiers
            .iter()
            .filter(|tier| !tier.is_satisfied_by(granted))
            .copied()
            .collect()
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &ToolParameter> {
        self.parameters.iter().filter(|p| p.required)
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Ordered, exact-match registry of tool descriptors.
///
/// Lookups never resolve misspellings; fuzzy matching lives in
/// [`AlternativeToolMatcher`](super::matcher::AlternativeToolMatcher) and is
/// only consulted on the not-found path.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    /// Build a catalogue, rejecting duplicate tool names.
    pub fn new(tools: impl IntoIterator<Item = ToolDescriptor>) -> Result<Self, DomainError> {
        tools
            .into_iter()
            .try_fold(Self::default(), |catalog, tool| catalog.try_register(tool))
    }

    pub fn try_register(mut self, tool: ToolDescriptor) -> Result<Self, DomainError> {
        if self.index.contains_key(&tool.name) {
            return Err(DomainError::DuplicateTool(tool.name));
        }
        self.index.insert(tool.name.clone(), self.tools.len());
        self.tools.push(tool);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All descriptors in catalogue order.
    pub fn all(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A call to a tool with arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: HashMap<String, serde_json::Value>,
    /// Optional reasoning for why this tool is being called
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
            reasoning: None,
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_tool() -> ToolDescriptor {
        ToolDescriptor::new("get_tasks", "List tasks").with_tier(PermissionTier::ReadOnly)
    }

    #[test]
    fn test_descriptor_builder() {
        let tool = ToolDescriptor::new("create_task", "Create a task")
            .with_tier(PermissionTier::ModifyTasks)
            .with_confirmation(true)
            .with_parameter(ToolParameter::new("title", "Task title", true))
            .with_parameter(ToolParameter::new("estimate", "Minutes", false).with_type("number"));

        assert!(tool.requires_confirmation);
        assert_eq!(tool.required_parameters().count(), 1);
        assert_eq!(tool.parameters[1].param_type, "number");
    }

    #[test]
    fn test_missing_tiers() {
        let tool = ToolDescriptor::new("sync", "Sync")
            .with_tier(PermissionTier::ModifyTasks)
            .with_tier(PermissionTier::TimerControl);

        let granted: TierSet = [PermissionTier::ReadOnly, PermissionTier::TimerControl].into();
        assert_eq!(tool.missing_tiers(&granted), [PermissionTier::ModifyTasks].into());

        let full: TierSet = [PermissionTier::FullAccess].into();
        assert!(tool.missing_tiers(&full).is_empty());
    }

    #[test]
    fn test_catalog_exact_lookup() {
        let catalog = ToolCatalog::new([read_tool()]).unwrap();
        assert!(catalog.get("get_tasks").is_some());
        assert!(catalog.get("get_task").is_none());
        assert!(catalog.get("GET_TASKS").is_none());
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let result = ToolCatalog::new([read_tool(), read_tool()]);
        assert_eq!(
            result.unwrap_err(),
            DomainError::DuplicateTool("get_tasks".to_string())
        );
    }

    #[test]
    fn test_catalog_preserves_order() {
        let catalog = ToolCatalog::new([
            ToolDescriptor::new("b_tool", "B"),
            ToolDescriptor::new("a_tool", "A"),
        ])
        .unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["b_tool", "a_tool"]);
    }

    #[test]
    fn test_tool_call() {
        let call = ToolCall::new("create_task")
            .with_arg("title", "Write report")
            .with_reasoning("User asked for it");

        assert_eq!(call.get_string("title"), Some("Write report"));
        assert!(call.get_string("missing").is_none());
    }
}
