//! Deterministic user-facing message templates.
//!
//! Every failure message starts with an icon-prefixed headline, then a
//! plain-language cause, then remediation bullets where they apply. Raw
//! error type names never appear; only the category's phrasing does.

use super::translate::{IdentityTranslator, Translator};
use crate::core::string::display_name;
use crate::error::category::ErrorCategory;
use crate::permission::tier::TierSet;
use crate::tool::catalogue::{CREATE_TASK, DELETE_TASK, GET_TASKS, START_TIMER, UPDATE_TASK};
use crate::tool::entities::ToolDescriptor;
use crate::tool::matcher::AlternativeSuggestion;
use std::sync::Arc;

pub const DATABASE_REMEDIATION: [&str; 3] = [
    "Wait a moment and try again",
    "Make sure there is enough free disk space",
    "Restart the app if the problem continues",
];

pub const NETWORK_REMEDIATION: [&str; 3] = [
    "Check your internet connection",
    "Try again in a few moments",
    "Make sure the service is reachable",
];

pub const TIMEOUT_REMEDIATION: [&str; 3] = [
    "Try again in a moment",
    "Ask for a smaller amount of data",
    "Close other busy apps to free up the system",
];

pub const RESOURCE_REMEDIATION: [&str; 3] = [
    "Wait a little before trying again",
    "The service may be overloaded right now",
    "Try a smaller request",
];

/// Renders every terminal and retry message.
#[derive(Clone)]
pub struct MessageTemplates {
    translator: Arc<dyn Translator>,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self::new(Arc::new(IdentityTranslator))
    }
}

impl std::fmt::Debug for MessageTemplates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageTemplates").finish_non_exhaustive()
    }
}

impl MessageTemplates {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    pub fn tr(&self, key: &str) -> String {
        self.translator.translate(key)
    }

    fn bullets<S: AsRef<str>>(&self, items: &[S]) -> String {
        items
            .iter()
            .map(|item| format!("• {}", self.tr(item.as_ref())))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn with_remediation(&self, headline: String, items: &[&str]) -> String {
        format!("{}\n\n{}\n{}", headline, self.tr("What you can do:"), self.bullets(items))
    }

    // ==================== Formatter messages ====================

    pub fn tool_failed(&self, tool_name: &str, error: Option<&str>) -> String {
        format!(
            "❌ {} {}: {}",
            display_name(tool_name),
            self.tr("failed"),
            error.map(str::to_string).unwrap_or_else(|| self.tr("Unknown error"))
        )
    }

    pub fn completed(&self, tool_name: &str) -> String {
        format!("✅ {} {}", display_name(tool_name), self.tr("completed successfully"))
    }

    pub fn invalid_response(&self) -> String {
        format!("❌ {}", self.tr("Invalid response format"))
    }

    // ==================== Terminal messages ====================

    pub fn tool_not_found(
        &self,
        missing: &str,
        suggestions: &[AlternativeSuggestion],
        available: &[String],
    ) -> String {
        let headline = format!("❓ {} \"{}\" {}", self.tr("Tool"), missing, self.tr("was not found."));
        if suggestions.is_empty() && available.is_empty() {
            return format!("{}\n\n{}", headline, self.tr("Check the tool name and try again."));
        }
        if suggestions.is_empty() {
            return format!(
                "{}\n\n{} {}",
                headline,
                self.tr("Available tools:"),
                available.join(", ")
            );
        }

        let lines = suggestions
            .iter()
            .map(|s| format!("• {}: {}", s.tool_name, self.tr(&s.description)))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n\n{}\n{}", headline, self.tr("Did you mean:"), lines)
    }

    pub fn permission_denied(&self, tool_name: &str, missing: &TierSet, message: &str) -> String {
        let headline = format!(
            "🔒 {} {}.",
            self.tr("Permission denied for"),
            display_name(tool_name)
        );
        if missing.is_empty() {
            return format!(
                "{}\n\n{}\n\n{}",
                headline,
                message,
                self.tr("Review your permission settings and try again.")
            );
        }

        let tiers = missing
            .iter()
            .map(|tier| format!("• {}", self.tr(tier.display_name())))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "{}\n\n{}\n{}\n\n{}",
            headline,
            self.tr("Missing permissions:"),
            tiers,
            self.tr("Grant these permissions in settings to use this tool.")
        )
    }

    pub fn validation_error(
        &self,
        tool_name: &str,
        message: &str,
        descriptor: Option<&ToolDescriptor>,
    ) -> String {
        let items = validation_remediation(tool_name, message, descriptor);
        format!(
            "⚠️ {} {}: {}\n\n{}\n{}",
            self.tr("Invalid input for"),
            display_name(tool_name),
            message,
            self.tr("How to fix:"),
            self.bullets(&items)
        )
    }

    pub fn database_error(&self, message: &str) -> String {
        self.with_remediation(format!("💾 {}: {}", self.tr("Database error"), message), &DATABASE_REMEDIATION)
    }

    pub fn network_error(&self, message: &str) -> String {
        self.with_remediation(format!("🌐 {}: {}", self.tr("Network error"), message), &NETWORK_REMEDIATION)
    }

    pub fn timeout_error(&self, message: &str) -> String {
        self.with_remediation(
            format!("⏱️ {}: {}", self.tr("The operation timed out"), message),
            &TIMEOUT_REMEDIATION,
        )
    }

    pub fn resource_error(&self, message: &str) -> String {
        self.with_remediation(
            format!("📦 {}: {}", self.tr("Resources are temporarily unavailable"), message),
            &RESOURCE_REMEDIATION,
        )
    }

    pub fn execution_error(&self, tool_name: &str, message: &str) -> String {
        format!(
            "{}\n\n{}",
            self.tool_failed(tool_name, Some(message)),
            self.tr("Please try again or rephrase your request.")
        )
    }

    pub fn unknown_error(&self, message: &str) -> String {
        format!("❌ {}: {}", self.tr("An unexpected error occurred"), message)
    }

    /// Degraded message used when no policy or fallback can produce one.
    pub fn generic_failure(&self, tool_name: &str) -> String {
        format!(
            "❌ {} {}. {}",
            self.tr("Something went wrong while running"),
            display_name(tool_name),
            self.tr("Please try again.")
        )
    }

    pub fn confirmation_declined(&self, tool_name: &str) -> String {
        format!("🚫 {} {}.", self.tr("Cancelled"), display_name(tool_name))
    }

    pub fn confirmation_timed_out(&self, tool_name: &str, timeout_seconds: u64) -> String {
        format!(
            "⏱️ {} {} {} {} {}.",
            self.tr("No confirmation received for"),
            display_name(tool_name),
            self.tr("within"),
            timeout_seconds,
            self.tr(if timeout_seconds == 1 { "second" } else { "seconds" })
        )
    }

    /// Category-specific terminal message.
    ///
    /// `available_tools` is only listed for `ToolNotFound`.
    pub fn terminal(
        &self,
        category: ErrorCategory,
        tool_name: &str,
        message: &str,
        available_tools: &[String],
    ) -> String {
        match category {
            ErrorCategory::ToolNotFound => self.tool_not_found(tool_name, &[], available_tools),
            ErrorCategory::PermissionDenied => self.permission_denied(tool_name, &TierSet::new(), message),
            ErrorCategory::ValidationError => self.validation_error(tool_name, message, None),
            ErrorCategory::ExecutionError => self.execution_error(tool_name, message),
            ErrorCategory::DatabaseError => self.database_error(message),
            ErrorCategory::NetworkError => self.network_error(message),
            ErrorCategory::TimeoutError => self.timeout_error(message),
            ErrorCategory::ResourceError => self.resource_error(message),
            ErrorCategory::UnknownError => self.unknown_error(message),
        }
    }

    // ==================== Retry messages ====================

    /// Retry countdown; the delay is rounded to the nearest whole second.
    pub fn retry(&self, category: ErrorCategory, delay_ms: u64, attempt: u32, max_attempts: u32) -> String {
        let seconds = (delay_ms as f64 / 1000.0).round() as u64;
        format!(
            "🔄 {} {} {} {} ({} {} {} {})",
            self.tr(retry_headline(category)),
            self.tr("Retrying in"),
            seconds,
            self.tr(if seconds == 1 { "second" } else { "seconds" }),
            self.tr("attempt"),
            attempt,
            self.tr("of"),
            max_attempts
        )
    }
}

fn retry_headline(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::DatabaseError => "The database is busy.",
        ErrorCategory::NetworkError => "Network hiccup.",
        ErrorCategory::TimeoutError => "The request timed out.",
        ErrorCategory::ResourceError => "Resources are busy.",
        ErrorCategory::ExecutionError => "The tool failed to run.",
        _ => "Something went wrong.",
    }
}

/// Tool-specific corrective bullets for a validation failure.
pub fn validation_remediation(
    tool_name: &str,
    message: &str,
    descriptor: Option<&ToolDescriptor>,
) -> Vec<String> {
    let lowered = message.to_lowercase();
    let compact = lowered.replace(['_', ' ', '-'], "");
    let mut items = Vec::new();

    if tool_name == CREATE_TASK && lowered.contains("title") {
        items.push("Provide a non-empty title for the task".to_string());
    }
    if [START_TIMER, UPDATE_TASK, DELETE_TASK].contains(&tool_name) && compact.contains("taskid") {
        items.push(format!("Get a valid task ID from {} first", GET_TASKS));
    }
    if lowered.contains("priority") {
        items.push("Use a priority of low, medium or high".to_string());
    }
    if lowered.contains("date") {
        items.push("Use dates in YYYY-MM-DD format".to_string());
    }

    if items.is_empty() {
        if let Some(descriptor) = descriptor {
            items.extend(descriptor.required_parameters().map(|p| {
                format!("Provide the required parameter \"{}\" ({})", p.name, p.param_type)
            }));
        }
        items.push("Check the argument values and try again".to_string());
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::translate::TableTranslator;
    use crate::permission::tier::PermissionTier;
    use crate::tool::entities::ToolCatalog;

    fn templates() -> MessageTemplates {
        MessageTemplates::default()
    }

    #[test]
    fn test_retry_rounds_to_whole_seconds() {
        let msg = templates().retry(ErrorCategory::DatabaseError, 750, 2, 4);
        assert!(msg.starts_with("🔄 "));
        assert!(msg.contains("Retrying in 1 second "));
        assert!(msg.contains("(attempt 2 of 4)"));

        let msg = templates().retry(ErrorCategory::NetworkError, 4500, 2, 4);
        assert!(msg.contains("Retrying in 5 seconds"));
    }

    #[test]
    fn test_permission_denied_lists_display_names() {
        let missing: TierSet = [PermissionTier::ModifyTasks, PermissionTier::TimerControl].into();
        let msg = templates().permission_denied("create_task", &missing, "denied");
        assert!(msg.starts_with("🔒 Permission denied for Create Task."));
        assert!(msg.contains("• Modify Tasks"));
        assert!(msg.contains("• Timer Control"));
    }

    #[test]
    fn test_create_task_title_remediation() {
        let msg = templates().validation_error(CREATE_TASK, "title is required", None);
        assert!(msg.starts_with("⚠️ Invalid input for Create Task: title is required"));
        assert!(msg.contains("• Provide a non-empty title for the task"));
    }

    #[test]
    fn test_start_timer_task_id_remediation() {
        let items = validation_remediation(START_TIMER, "Invalid taskId", None);
        assert_eq!(items, vec!["Get a valid task ID from get_tasks first".to_string()]);

        let items = validation_remediation(START_TIMER, "task_id must be a number", None);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_generic_remediation_uses_required_parameters() {
        let catalog = ToolCatalog::standard();
        let items = validation_remediation(CREATE_TASK, "bad input", catalog.get(CREATE_TASK));
        assert!(items[0].contains("\"title\""));
        assert_eq!(items.last().unwrap(), "Check the argument values and try again");
    }

    #[test]
    fn test_fixed_remediation_lists() {
        let msg = templates().database_error("database is locked");
        assert!(msg.starts_with("💾 Database error: database is locked"));
        for item in DATABASE_REMEDIATION {
            assert!(msg.contains(item));
        }
        assert!(templates().network_error("x").contains(NETWORK_REMEDIATION[0]));
        assert!(templates().timeout_error("x").contains(TIMEOUT_REMEDIATION[0]));
        assert!(templates().resource_error("x").contains(RESOURCE_REMEDIATION[0]));
    }

    #[test]
    fn test_tool_not_found_lists_catalogue_without_suggestions() {
        let available = vec!["get_tasks".to_string(), "create_task".to_string()];
        let msg = templates().tool_not_found("xyz", &[], &available);
        assert!(msg.contains("\"xyz\""));
        assert!(msg.contains("Available tools: get_tasks, create_task"));
    }

    #[test]
    fn test_tool_not_found_without_any_tools_has_no_empty_list() {
        let msg = templates().tool_not_found("xyz", &[], &[]);
        assert!(!msg.contains("Available tools:"));
        assert!(msg.ends_with("Check the tool name and try again."));
    }

    #[test]
    fn test_terminal_tool_not_found_lists_given_tools() {
        let available = vec!["get_tasks".to_string()];
        let msg = templates().terminal(ErrorCategory::ToolNotFound, "xyz", "Tool xyz not found", &available);
        assert!(msg.starts_with("❓ Tool \"xyz\" was not found."));
        assert!(msg.ends_with("Available tools: get_tasks"));
    }

    #[test]
    fn test_translation_applies_to_fixed_phrases() {
        let t = MessageTemplates::new(Arc::new(TableTranslator::new([("Network error", "Netzwerkfehler")])));
        assert!(t.network_error("offline").starts_with("🌐 Netzwerkfehler: offline"));
    }

    #[test]
    fn test_confirmation_messages() {
        let t = MessageTemplates::default();
        assert_eq!(t.confirmation_declined("delete_task"), "🚫 Cancelled Delete Task.");
        assert_eq!(
            t.confirmation_timed_out("create_task", 30),
            "⏱️ No confirmation received for Create Task within 30 seconds."
        );
    }
}
