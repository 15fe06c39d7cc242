//! Typed success payloads, one variant per known tool.
//!
//! Adapters return a JSON envelope with a `success` flag plus tool-specific
//! fields. [`ToolPayload::parse`] maps the envelope onto the variant keyed
//! by tool name and rejects shapes that do not match.

use crate::tool::catalogue::{
    ANALYZE_PRODUCTIVITY, CREATE_TASK, DELETE_TASK, GET_TASKS, GET_TIME_DATA, START_TIMER,
    STOP_TIMER, UPDATE_TASK,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("payload is not an object with a boolean `success` field")]
    InvalidEnvelope,

    #[error("unexpected payload shape for {tool}: {source}")]
    Shape {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Envelope fields shared by every payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub success: bool,
    pub error: Option<String>,
}

impl Envelope {
    pub fn parse(value: &serde_json::Value) -> Result<Self, PayloadError> {
        let object = value.as_object().ok_or(PayloadError::InvalidEnvelope)?;
        let success = object
            .get("success")
            .and_then(|v| v.as_bool())
            .ok_or(PayloadError::InvalidEnvelope)?;
        let error = object
            .get("error")
            .and_then(|v| v.as_str())
            .filter(|e| !e.trim().is_empty())
            .map(str::to_string);
        Ok(Self { success, error })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskSummary {
    pub title: String,
    pub priority: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "dueDate")]
    pub due_date: Option<String>,
    /// Minutes
    #[serde(alias = "timeEstimate")]
    pub time_estimate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskListPayload {
    #[serde(default)]
    pub tasks: Vec<TaskSummary>,
    /// Total matches when the adapter paginates
    pub total: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskRef {
    pub title: String,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskChangePayload {
    pub task: Option<TaskRef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimerPayload {
    #[serde(alias = "taskTitle")]
    pub task_title: Option<String>,
    /// Seconds
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeSummaryPayload {
    #[serde(default, alias = "totalSessions")]
    pub total_sessions: u32,
    /// Minutes
    #[serde(default, alias = "totalTime")]
    pub total_time: f64,
    /// Minutes; derived from the totals when absent
    #[serde(alias = "averageSession")]
    pub average_session: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductivityAnalysis {
    #[serde(alias = "mostProductiveTime")]
    pub most_productive_time: String,
    /// Fraction 0..=1
    #[serde(alias = "completionRate")]
    pub completion_rate: f64,
    /// Fraction 0..=1
    #[serde(alias = "focusEfficiency")]
    pub focus_efficiency: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisPayload {
    pub analysis: ProductivityAnalysis,
}

/// Success payload, keyed by tool name.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPayload {
    TaskList(TaskListPayload),
    TaskCreated(TaskChangePayload),
    TaskUpdated(TaskChangePayload),
    TaskDeleted(TaskChangePayload),
    TimerStarted(TimerPayload),
    TimerStopped(TimerPayload),
    TimeSummary(TimeSummaryPayload),
    ProductivityAnalysis(AnalysisPayload),
    /// Tool without a dedicated template
    Generic,
}

impl ToolPayload {
    pub fn parse(tool_name: &str, value: &serde_json::Value) -> Result<Self, PayloadError> {
        let payload = match tool_name {
            GET_TASKS => ToolPayload::TaskList(shape(tool_name, value)?),
            CREATE_TASK => ToolPayload::TaskCreated(shape(tool_name, value)?),
            UPDATE_TASK => ToolPayload::TaskUpdated(shape(tool_name, value)?),
            DELETE_TASK => ToolPayload::TaskDeleted(shape(tool_name, value)?),
            START_TIMER => ToolPayload::TimerStarted(shape(tool_name, value)?),
            STOP_TIMER => ToolPayload::TimerStopped(shape(tool_name, value)?),
            GET_TIME_DATA => ToolPayload::TimeSummary(shape(tool_name, value)?),
            ANALYZE_PRODUCTIVITY => ToolPayload::ProductivityAnalysis(shape(tool_name, value)?),
            _ => ToolPayload::Generic,
        };
        Ok(payload)
    }
}

fn shape<T: DeserializeOwned>(tool_name: &str, value: &serde_json::Value) -> Result<T, PayloadError> {
    T::deserialize(value).map_err(|source| PayloadError::Shape {
        tool: tool_name.to_string(),
        source,
    })
}
