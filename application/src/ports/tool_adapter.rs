//! Tool adapter port
//!
//! The caller-owned component that actually runs a tool (database writes,
//! timer control, analytics queries). Everything that can block or fail on
//! I/O lives behind this port.

use async_trait::async_trait;
use toolgate_domain::{RawError, ToolCall};

/// Port for running a validated tool call.
///
/// Implementations return the tool's structured payload (`{"success": ...}`
/// plus tool-specific fields) or whatever error the underlying layer raised.
/// Errors are classified afterwards, so adapters should not pre-classify
/// unless they already hold a typed [`toolgate_domain::UpstreamError`].
///
/// Adapters are expected to serialize mutating calls per conversation; the
/// orchestrator does not lock.
#[async_trait]
pub trait ToolAdapterPort: Send + Sync {
    async fn execute(&self, call: &ToolCall) -> Result<serde_json::Value, RawError>;
}
