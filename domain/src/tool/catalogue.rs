//! The fixed tool catalogue of the task/timer/analytics application.

use super::entities::{ToolCatalog, ToolDescriptor, ToolParameter};
use crate::permission::tier::PermissionTier;

pub const GET_TASKS: &str = "get_tasks";
pub const CREATE_TASK: &str = "create_task";
pub const UPDATE_TASK: &str = "update_task";
pub const DELETE_TASK: &str = "delete_task";
pub const START_TIMER: &str = "start_timer";
pub const STOP_TIMER: &str = "stop_timer";
pub const GET_TIME_DATA: &str = "get_time_data";
pub const ANALYZE_PRODUCTIVITY: &str = "analyze_productivity";

/// Descriptors of every tool the agent can call, in presentation order.
pub fn standard_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(GET_TASKS, "List tasks, optionally filtered by status or priority")
            .with_tier(PermissionTier::ReadOnly)
            .with_parameter(ToolParameter::new("status", "Filter by task status", false))
            .with_parameter(ToolParameter::new("priority", "Filter by priority", false))
            .with_parameter(ToolParameter::new("limit", "Maximum tasks to return", false).with_type("number"))
            .with_keywords(["get", "list", "show", "find", "tasks", "search"]),
        ToolDescriptor::new(CREATE_TASK, "Create a new task")
            .with_tier(PermissionTier::ModifyTasks)
            .with_confirmation(true)
            .with_parameter(ToolParameter::new("title", "Task title", true))
            .with_parameter(ToolParameter::new("description", "Task details", false))
            .with_parameter(ToolParameter::new("priority", "low, medium or high", false))
            .with_parameter(ToolParameter::new("due_date", "Due date (YYYY-MM-DD)", false).with_type("date"))
            .with_parameter(ToolParameter::new("time_estimate", "Estimate in minutes", false).with_type("number"))
            .with_keywords(["create", "add", "new", "make", "task"]),
        ToolDescriptor::new(UPDATE_TASK, "Update an existing task")
            .with_tier(PermissionTier::ModifyTasks)
            .with_confirmation(true)
            .with_parameter(ToolParameter::new("task_id", "Identifier of the task", true))
            .with_parameter(ToolParameter::new("title", "New title", false))
            .with_parameter(ToolParameter::new("priority", "New priority", false))
            .with_parameter(ToolParameter::new("status", "New status", false))
            .with_parameter(ToolParameter::new("due_date", "New due date", false).with_type("date"))
            .with_keywords(["update", "edit", "modify", "change", "task"]),
        ToolDescriptor::new(DELETE_TASK, "Delete a task")
            .with_tier(PermissionTier::ModifyTasks)
            .with_confirmation(true)
            .with_parameter(ToolParameter::new("task_id", "Identifier of the task", true))
            .with_keywords(["delete", "remove", "task"]),
        ToolDescriptor::new(START_TIMER, "Start a focus timer for a task")
            .with_tier(PermissionTier::TimerControl)
            .with_parameter(ToolParameter::new("task_id", "Task to track time against", true))
            .with_parameter(ToolParameter::new("duration", "Planned length in seconds", false).with_type("number"))
            .with_keywords(["start", "begin", "timer", "track", "focus"]),
        ToolDescriptor::new(STOP_TIMER, "Stop the running timer")
            .with_tier(PermissionTier::TimerControl)
            .with_parameter(ToolParameter::new("notes", "Notes for the session", false))
            .with_keywords(["stop", "end", "pause", "timer"]),
        ToolDescriptor::new(GET_TIME_DATA, "Summarize tracked time over a period")
            .with_tier(PermissionTier::ReadOnly)
            .with_parameter(ToolParameter::new("start_date", "Period start", false).with_type("date"))
            .with_parameter(ToolParameter::new("end_date", "Period end", false).with_type("date"))
            .with_keywords(["time", "data", "hours", "summary", "report"]),
        ToolDescriptor::new(ANALYZE_PRODUCTIVITY, "Analyze productivity patterns and suggest improvements")
            .with_tier(PermissionTier::ReadOnly)
            .with_parameter(ToolParameter::new("period", "day, week or month", false))
            .with_keywords(["analyze", "productivity", "insights", "stats", "performance"]),
    ]
}

impl ToolCatalog {
    /// The application's fixed catalogue.
    pub fn standard() -> Self {
        // Names in `standard_tools` are unique; fall back to empty on a
        // broken edit rather than panicking.
        Self::new(standard_tools()).unwrap_or_else(|e| {
            tracing::error!("Standard tool catalogue is invalid: {}", e);
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_standard_catalog_is_complete() {
        let catalog = ToolCatalog::standard();
        assert_eq!(catalog.len(), 8);
        for name in [
            GET_TASKS,
            CREATE_TASK,
            UPDATE_TASK,
            DELETE_TASK,
            START_TIMER,
            STOP_TIMER,
            GET_TIME_DATA,
            ANALYZE_PRODUCTIVITY,
        ] {
            assert!(catalog.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_mutating_task_tools_require_confirmation() {
        let catalog = ToolCatalog::standard();
        for name in [CREATE_TASK, UPDATE_TASK, DELETE_TASK] {
            let tool = catalog.get(name).unwrap();
            assert!(tool.requires_confirmation);
            assert!(tool.required_tiers.contains(&PermissionTier::ModifyTasks));
        }
        assert!(!catalog.get(START_TIMER).unwrap().requires_confirmation);
    }

    #[test]
    fn test_every_tool_has_keywords_and_a_tier() {
        for tool in standard_tools() {
            assert!(!tool.keywords.is_empty(), "{} has no keywords", tool.name);
            assert!(!tool.required_tiers.is_empty(), "{} has no tier", tool.name);
        }
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = standard_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names.len(), standard_tools().len());
    }
}
