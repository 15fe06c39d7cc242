//! Turns raw adapter payloads into human-readable outcomes.

use super::entities::ExecutionOutcome;
use super::messages::MessageTemplates;
use super::payload::{
    AnalysisPayload, Envelope, TaskChangePayload, TaskListPayload, TaskSummary,
    TimeSummaryPayload, TimerPayload, ToolPayload,
};
use crate::permission::tier::TierSet;
use chrono::{DateTime, NaiveDate};
use tracing::warn;

const MAX_LISTED_TASKS: usize = 3;
const MAX_RECOMMENDATIONS: usize = 3;

/// Formats tool success payloads.
///
/// Formatting never fails: malformed payloads become an
/// "Invalid response format" outcome, unknown tools get a generic message.
#[derive(Debug, Clone, Default)]
pub struct ResultFormatter {
    templates: MessageTemplates,
}

impl ResultFormatter {
    pub fn new(templates: MessageTemplates) -> Self {
        Self { templates }
    }

    /// Format a JSON payload returned by the tool adapter.
    pub fn format_result(
        &self,
        tool_name: &str,
        payload: &serde_json::Value,
        execution_time_ms: u64,
        granted_tiers: &TierSet,
    ) -> ExecutionOutcome {
        let outcome = self.build(tool_name, payload);
        outcome
            .with_execution_time(execution_time_ms)
            .with_granted_tiers(granted_tiers.clone())
    }

    /// Format a payload still in its serialized form.
    pub fn format_result_text(
        &self,
        tool_name: &str,
        raw: &str,
        execution_time_ms: u64,
        granted_tiers: &TierSet,
    ) -> ExecutionOutcome {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(payload) => self.format_result(tool_name, &payload, execution_time_ms, granted_tiers),
            Err(e) => {
                warn!(tool = %tool_name, "Unparseable tool response: {}", e);
                self.invalid(tool_name)
                    .with_execution_time(execution_time_ms)
                    .with_granted_tiers(granted_tiers.clone())
            }
        }
    }

    fn build(&self, tool_name: &str, payload: &serde_json::Value) -> ExecutionOutcome {
        let envelope = match Envelope::parse(payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(tool = %tool_name, "Invalid tool response: {}", e);
                return self.invalid(tool_name);
            }
        };

        if !envelope.success {
            let error = envelope.error.clone().unwrap_or_else(|| self.templates.tr("Unknown error"));
            return ExecutionOutcome::failure(
                tool_name,
                error,
                self.templates.tool_failed(tool_name, envelope.error.as_deref()),
            )
            .with_data(payload.clone());
        }

        let message = match ToolPayload::parse(tool_name, payload) {
            Ok(parsed) => self.render(tool_name, &parsed),
            Err(e) => {
                warn!(tool = %tool_name, "Rejected tool response: {}", e);
                return self.invalid(tool_name);
            }
        };
        ExecutionOutcome::success(tool_name, message).with_data(payload.clone())
    }

    fn invalid(&self, tool_name: &str) -> ExecutionOutcome {
        ExecutionOutcome::failure(
            tool_name,
            self.templates.tr("Invalid response format"),
            self.templates.invalid_response(),
        )
    }

    fn render(&self, tool_name: &str, payload: &ToolPayload) -> String {
        match payload {
            ToolPayload::TaskList(list) => self.task_list(list),
            ToolPayload::TaskCreated(change) => self.task_created(change),
            ToolPayload::TaskUpdated(change) => self.task_updated(change),
            ToolPayload::TaskDeleted(change) => self.task_deleted(change),
            ToolPayload::TimerStarted(timer) => self.timer_started(timer),
            ToolPayload::TimerStopped(timer) => self.timer_stopped(timer),
            ToolPayload::TimeSummary(summary) => self.time_summary(summary),
            ToolPayload::ProductivityAnalysis(analysis) => self.productivity(analysis),
            ToolPayload::Generic => self.templates.completed(tool_name),
        }
    }

    // ==================== Per-tool templates ====================

    fn task_list(&self, list: &TaskListPayload) -> String {
        let t = &self.templates;
        if list.tasks.is_empty() {
            return format!("📋 {}", t.tr("No tasks found."));
        }

        let total = list.total.unwrap_or(0).max(list.tasks.len());
        let mut lines = vec![format!(
            "📋 {} {} {}:",
            t.tr("Found"),
            total,
            t.tr(if total == 1 { "task" } else { "tasks" })
        )];
        lines.push(String::new());

        for (i, task) in list.tasks.iter().take(MAX_LISTED_TASKS).enumerate() {
            lines.extend(self.task_lines(i + 1, task));
        }

        let shown = list.tasks.len().min(MAX_LISTED_TASKS);
        if total > shown {
            lines.push(String::new());
            lines.push(format!("...{} {} {}", t.tr("and"), total - shown, t.tr("more")));
        }
        lines.join("\n")
    }

    fn task_lines(&self, index: usize, task: &TaskSummary) -> Vec<String> {
        let t = &self.templates;
        let details: Vec<String> = [
            task.priority.as_ref().map(|p| format!("{}: {}", t.tr("priority"), p)),
            task.status.as_ref().map(|s| format!("{}: {}", t.tr("status"), s)),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut lines = vec![if details.is_empty() {
            format!("{}. {}", index, task.title)
        } else {
            format!("{}. {} ({})", index, task.title, details.join(", "))
        }];
        if let Some(due) = &task.due_date {
            lines.push(format!("   📅 {}: {}", t.tr("Due"), format_due_date(due)));
        }
        if let Some(estimate) = task.time_estimate {
            lines.push(format!("   ⏱️ {}: {} min", t.tr("Estimate"), estimate.round() as i64));
        }
        lines
    }

    fn task_created(&self, change: &TaskChangePayload) -> String {
        let t = &self.templates;
        match &change.task {
            Some(task) => match &task.priority {
                Some(priority) => format!(
                    "✅ {} \"{}\" {} {} {}",
                    t.tr("Created task"),
                    task.title,
                    t.tr("with"),
                    priority,
                    t.tr("priority")
                ),
                None => format!("✅ {} \"{}\"", t.tr("Created task"), task.title),
            },
            None => format!("✅ {}", t.tr("Task created successfully")),
        }
    }

    fn task_updated(&self, change: &TaskChangePayload) -> String {
        let t = &self.templates;
        match &change.task {
            Some(task) => match &task.priority {
                Some(priority) => format!(
                    "✏️ {} \"{}\" ({}: {})",
                    t.tr("Updated task"),
                    task.title,
                    t.tr("priority"),
                    priority
                ),
                None => format!("✏️ {} \"{}\"", t.tr("Updated task"), task.title),
            },
            None => format!("✏️ {}", t.tr("Task updated successfully")),
        }
    }

    fn task_deleted(&self, change: &TaskChangePayload) -> String {
        let t = &self.templates;
        match &change.task {
            Some(task) => format!("🗑️ {} \"{}\"", t.tr("Deleted task"), task.title),
            None => format!("🗑️ {}", t.tr("Task deleted successfully")),
        }
    }

    fn timer_started(&self, timer: &TimerPayload) -> String {
        let t = &self.templates;
        let mut message = match &timer.task_title {
            Some(title) => format!(
                "⏱️ {} \"{}\"! {}",
                t.tr("Timer started for"),
                title,
                t.tr("Time tracking is now active.")
            ),
            None => format!(
                "⏱️ {} {}",
                t.tr("Timer started!"),
                t.tr("Time tracking is now active.")
            ),
        };
        if let Some(seconds) = timer.duration {
            message.push_str(&format!(
                " {}: {}.",
                t.tr("Planned session"),
                self.minutes(seconds)
            ));
        }
        message
    }

    fn timer_stopped(&self, timer: &TimerPayload) -> String {
        let t = &self.templates;
        let mut message = match &timer.task_title {
            Some(title) => format!("⏹️ {} \"{}\"", t.tr("Timer stopped for"), title),
            None => format!("⏹️ {}", t.tr("Timer stopped")),
        };
        match timer.duration {
            Some(seconds) => message.push_str(&format!(
                ". {}: {}.",
                t.tr("Session length"),
                self.minutes(seconds)
            )),
            None => message.push('.'),
        }
        message
    }

    fn time_summary(&self, summary: &TimeSummaryPayload) -> String {
        let t = &self.templates;
        let average = summary.average_session.unwrap_or(if summary.total_sessions > 0 {
            summary.total_time / f64::from(summary.total_sessions)
        } else {
            0.0
        });
        format!(
            "📊 {}: {} {}, {:.1} {}, {} {}.",
            t.tr("Time summary"),
            summary.total_sessions,
            t.tr(if summary.total_sessions == 1 { "session" } else { "sessions" }),
            summary.total_time / 60.0,
            t.tr("hours total"),
            t.tr("average session"),
            self.minutes(average * 60.0)
        )
    }

    fn productivity(&self, payload: &AnalysisPayload) -> String {
        let t = &self.templates;
        let analysis = &payload.analysis;
        let mut lines = vec![
            format!("📈 {}", t.tr("Productivity analysis")),
            String::new(),
            format!("🕐 {}: {}", t.tr("Most productive time"), analysis.most_productive_time),
            format!("✅ {}: {}%", t.tr("Completion rate"), percent(analysis.completion_rate)),
            format!("🎯 {}: {}%", t.tr("Focus efficiency"), percent(analysis.focus_efficiency)),
        ];

        if !analysis.recommendations.is_empty() {
            lines.push(String::new());
            lines.push(format!("💡 {}:", t.tr("Recommendations")));
            for (i, rec) in analysis.recommendations.iter().take(MAX_RECOMMENDATIONS).enumerate() {
                lines.push(format!("{}. {}", i + 1, rec));
            }
        }
        lines.join("\n")
    }

    /// Seconds rendered as rounded whole minutes.
    fn minutes(&self, seconds: f64) -> String {
        let minutes = (seconds / 60.0).round().max(0.0) as u64;
        let unit = if minutes == 1 { "minute" } else { "minutes" };
        format!("{} {}", minutes, self.templates.tr(unit))
    }
}

fn percent(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

/// `2026-01-05` or an RFC 3339 timestamp becomes `Jan 5, 2026`;
/// anything else is shown verbatim.
fn format_due_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%b %-d, %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%b %-d, %Y").to_string();
    }
    raw.to_string()
}
