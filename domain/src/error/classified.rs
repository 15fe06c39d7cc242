//! Error values flowing into and out of the normalizer.
//!
//! - [`RawError`]: anything the tool pipeline can raise
//! - [`UpstreamError`]: typed error from the registry, bridge or AI-service layer
//! - [`ClassifiedError`]: the normalized form, tagged with an [`ErrorCategory`]

use super::category::ErrorCategory;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Shared, cloneable error cause.
pub type ErrorCause = Arc<dyn std::error::Error + Send + Sync>;

/// A failure that has been assigned a taxonomy category.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ClassifiedError {
    pub message: String,
    pub category: ErrorCategory,
    pub tool_name: Option<String>,
    #[source]
    pub cause: Option<ErrorCause>,
    pub context: HashMap<String, serde_json::Value>,
}

impl ClassifiedError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category,
            tool_name: None,
            cause: None,
            context: HashMap::new(),
        }
    }

    pub fn with_tool(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Lower-cased message, as used by retry predicates.
    pub fn lowercase_message(&self) -> String {
        self.message.to_lowercase()
    }
}

/// Layer of the tool pipeline that raised a typed error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamLayer {
    /// Tool registry (lookup, argument schema)
    Registry,
    /// Execution bridge between agent and adapters
    Bridge,
    /// AI-service layer (model calls, circuit breakers)
    Service,
}

impl UpstreamLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamLayer::Registry => "registry",
            UpstreamLayer::Bridge => "bridge",
            UpstreamLayer::Service => "service",
        }
    }
}

/// Error codes understood by the code table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamCode {
    ToolNotFound,
    InvalidArguments,
    InsufficientPermissions,
    CircuitBreakerOpen,
    ResourceExhausted,
    RateLimited,
    Other(String),
}

impl UpstreamCode {
    pub fn parse(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "TOOL_NOT_FOUND" => UpstreamCode::ToolNotFound,
            "INVALID_ARGUMENTS" => UpstreamCode::InvalidArguments,
            "INSUFFICIENT_PERMISSIONS" => UpstreamCode::InsufficientPermissions,
            "CIRCUIT_BREAKER_OPEN" => UpstreamCode::CircuitBreakerOpen,
            "RESOURCE_EXHAUSTED" => UpstreamCode::ResourceExhausted,
            "RATE_LIMITED" => UpstreamCode::RateLimited,
            _ => UpstreamCode::Other(code.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            UpstreamCode::ToolNotFound => "TOOL_NOT_FOUND",
            UpstreamCode::InvalidArguments => "INVALID_ARGUMENTS",
            UpstreamCode::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            UpstreamCode::CircuitBreakerOpen => "CIRCUIT_BREAKER_OPEN",
            UpstreamCode::ResourceExhausted => "RESOURCE_EXHAUSTED",
            UpstreamCode::RateLimited => "RATE_LIMITED",
            UpstreamCode::Other(code) => code,
        }
    }
}

/// Typed error raised by a known upstream layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct UpstreamError {
    pub layer: UpstreamLayer,
    pub code: UpstreamCode,
    pub message: String,
    pub tool_name: Option<String>,
}

impl UpstreamError {
    pub fn new(layer: UpstreamLayer, code: UpstreamCode, message: impl Into<String>) -> Self {
        Self {
            layer,
            code,
            message: message.into(),
            tool_name: None,
        }
    }

    pub fn registry(code: &str, message: impl Into<String>) -> Self {
        Self::new(UpstreamLayer::Registry, UpstreamCode::parse(code), message)
    }

    pub fn bridge(code: &str, message: impl Into<String>) -> Self {
        Self::new(UpstreamLayer::Bridge, UpstreamCode::parse(code), message)
    }

    pub fn service(code: &str, message: impl Into<String>) -> Self {
        Self::new(UpstreamLayer::Service, UpstreamCode::parse(code), message)
    }

    /// Registry lookup failure for `tool_name`.
    pub fn tool_not_found(tool_name: impl Into<String>) -> Self {
        let tool_name = tool_name.into();
        Self {
            tool_name: Some(tool_name.clone()),
            ..Self::new(
                UpstreamLayer::Registry,
                UpstreamCode::ToolNotFound,
                format!("Tool {} not found", tool_name),
            )
        }
    }

    pub fn with_tool(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }
}

/// Any error the tool pipeline can hand to the normalizer.
#[derive(Debug, Clone)]
pub enum RawError {
    /// Already normalized; passes through unchanged
    Classified(ClassifiedError),
    /// Typed error from a known layer; mapped via the code table
    Upstream(UpstreamError),
    /// Untyped error; classified by message patterns
    Opaque {
        message: String,
        cause: Option<ErrorCause>,
    },
}

impl RawError {
    pub fn message(message: impl Into<String>) -> Self {
        RawError::Opaque {
            message: message.into(),
            cause: None,
        }
    }

    /// Wrap an arbitrary error, keeping it as the cause.
    pub fn from_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        RawError::Opaque {
            message: error.to_string(),
            cause: Some(Arc::new(error)),
        }
    }
}

impl From<ClassifiedError> for RawError {
    fn from(error: ClassifiedError) -> Self {
        RawError::Classified(error)
    }
}

impl From<UpstreamError> for RawError {
    fn from(error: UpstreamError) -> Self {
        RawError::Upstream(error)
    }
}

impl From<String> for RawError {
    fn from(message: String) -> Self {
        RawError::message(message)
    }
}

impl From<&str> for RawError {
    fn from(message: &str) -> Self {
        RawError::message(message)
    }
}

impl From<std::io::Error> for RawError {
    fn from(error: std::io::Error) -> Self {
        RawError::from_error(error)
    }
}

impl From<serde_json::Error> for RawError {
    fn from(error: serde_json::Error) -> Self {
        RawError::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_classified_error_builder() {
        let err = ClassifiedError::new(ErrorCategory::DatabaseError, "database is locked")
            .with_tool("create_task")
            .with_context("table", "tasks");

        assert_eq!(err.to_string(), "database is locked");
        assert_eq!(err.tool_name.as_deref(), Some("create_task"));
        assert_eq!(err.context["table"], "tasks");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_classified_error_exposes_cause() {
        let io = std::io::Error::other("disk full");
        let err = ClassifiedError::new(ErrorCategory::ResourceError, "write failed").with_cause(io);
        assert_eq!(err.source().unwrap().to_string(), "disk full");
    }

    #[test]
    fn test_upstream_code_parse() {
        assert_eq!(UpstreamCode::parse("tool_not_found"), UpstreamCode::ToolNotFound);
        assert_eq!(UpstreamCode::parse("RATE_LIMITED"), UpstreamCode::RateLimited);
        assert_eq!(
            UpstreamCode::parse("WEIRD"),
            UpstreamCode::Other("WEIRD".to_string())
        );
        assert_eq!(UpstreamCode::parse("WEIRD").as_str(), "WEIRD");
    }

    #[test]
    fn test_tool_not_found_constructor() {
        let err = UpstreamError::tool_not_found("xyz");
        assert_eq!(err.to_string(), "Tool xyz not found");
        assert_eq!(err.tool_name.as_deref(), Some("xyz"));
        assert_eq!(err.layer, UpstreamLayer::Registry);
    }

    #[test]
    fn test_raw_error_conversions() {
        assert!(matches!(RawError::from("boom"), RawError::Opaque { cause: None, .. }));
        let io: RawError = std::io::Error::other("pipe").into();
        match io {
            RawError::Opaque { message, cause } => {
                assert_eq!(message, "pipe");
                assert!(cause.is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
