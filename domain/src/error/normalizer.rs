//! Error normalization into the closed taxonomy.
//!
//! Precedence, first match wins:
//!
//! 1. Already a [`ClassifiedError`] → returned unchanged
//! 2. [`UpstreamError`] → code table
//! 3. Message patterns, evaluated top-to-bottom over [`MESSAGE_RULES`]
//!
//! The rule order is a contract: "timeout while querying sqlite database"
//! is a `TimeoutError`, never a `DatabaseError`.

use super::category::ErrorCategory;
use super::classified::{ClassifiedError, RawError, UpstreamCode, UpstreamError};
use crate::core::string::{contains_any, truncate};
use std::sync::Arc;
use tracing::debug;

/// One `(predicate, category)` entry of the ordered message table.
#[derive(Debug, Clone, Copy)]
pub struct MessageRule {
    pub category: ErrorCategory,
    /// Receives the lower-cased message
    pub matches: fn(&str) -> bool,
}

fn is_timeout(m: &str) -> bool {
    contains_any(m, &["timeout", "timed out"])
}

fn is_database(m: &str) -> bool {
    contains_any(m, &["database", "sql", "sqlite"])
}

fn is_network(m: &str) -> bool {
    contains_any(m, &["network", "connection", "fetch"])
}

fn is_permission(m: &str) -> bool {
    contains_any(m, &["permission", "unauthorized", "forbidden"])
}

fn is_validation(m: &str) -> bool {
    contains_any(m, &["validation", "invalid", "required"])
}

// Only reached by messages no earlier rule claims.
fn is_missing_tool(m: &str) -> bool {
    m.contains("tool") && m.contains("not found")
}

/// Ordered message classification table.
pub static MESSAGE_RULES: [MessageRule; 6] = [
    MessageRule { category: ErrorCategory::TimeoutError, matches: is_timeout },
    MessageRule { category: ErrorCategory::DatabaseError, matches: is_database },
    MessageRule { category: ErrorCategory::NetworkError, matches: is_network },
    MessageRule { category: ErrorCategory::PermissionDenied, matches: is_permission },
    MessageRule { category: ErrorCategory::ValidationError, matches: is_validation },
    MessageRule { category: ErrorCategory::ToolNotFound, matches: is_missing_tool },
];

/// Maps any raw error to a [`ClassifiedError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorNormalizer;

impl ErrorNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, error: impl Into<RawError>) -> ClassifiedError {
        let classified = match error.into() {
            RawError::Classified(classified) => return classified,
            RawError::Upstream(upstream) => self.from_upstream(upstream),
            RawError::Opaque { message, cause } => {
                let category = self.classify_message(&message);
                let mut classified = ClassifiedError::new(category, message);
                if category == ErrorCategory::ToolNotFound {
                    classified.tool_name = extract_missing_tool(&classified.message);
                }
                classified.cause = cause;
                classified
            }
        };

        debug!(
            category = %classified.category,
            tool = ?classified.tool_name,
            "Classified error: {}",
            truncate(&classified.message, 200)
        );
        classified
    }

    /// Category for a message, by the ordered pattern table.
    pub fn classify_message(&self, message: &str) -> ErrorCategory {
        let lowered = message.to_lowercase();
        MESSAGE_RULES
            .iter()
            .find(|rule| (rule.matches)(&lowered))
            .map(|rule| rule.category)
            .unwrap_or(ErrorCategory::UnknownError)
    }

    /// Code table shared by the registry, bridge and service layers.
    pub fn category_for_code(&self, code: &UpstreamCode) -> ErrorCategory {
        match code {
            UpstreamCode::ToolNotFound => ErrorCategory::ToolNotFound,
            UpstreamCode::InvalidArguments => ErrorCategory::ValidationError,
            UpstreamCode::InsufficientPermissions => ErrorCategory::PermissionDenied,
            UpstreamCode::CircuitBreakerOpen
            | UpstreamCode::ResourceExhausted
            | UpstreamCode::RateLimited => ErrorCategory::ResourceError,
            UpstreamCode::Other(_) => ErrorCategory::ExecutionError,
        }
    }

    fn from_upstream(&self, upstream: UpstreamError) -> ClassifiedError {
        let category = self.category_for_code(&upstream.code);
        let mut classified = ClassifiedError::new(category, upstream.message.clone())
            .with_context("layer", upstream.layer.as_str())
            .with_context("code", upstream.code.as_str());
        classified.tool_name = upstream.tool_name.clone();
        classified.cause = Some(Arc::new(upstream));
        classified
    }
}

/// Recover `<name>` from messages shaped like `Tool <name> not found`.
///
/// The returned name is lower-cased, matching catalogue naming.
fn extract_missing_tool(message: &str) -> Option<String> {
    let lowered = message.to_lowercase();
    let start = lowered.find("tool ")? + "tool ".len();
    let end = lowered[start..].find(" not found")? + start;
    let name = lowered[start..end]
        .trim()
        .trim_matches(|c| c == '\'' || c == '"' || c == '`');
    (!name.is_empty() && !name.contains(char::is_whitespace)).then(|| name.to_string())
}
