//! The closed error taxonomy.

use serde::{Deserialize, Serialize};

/// Every failure, whatever its origin, lands in exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorCategory {
    ToolNotFound,
    PermissionDenied,
    ValidationError,
    ExecutionError,
    DatabaseError,
    NetworkError,
    TimeoutError,
    ResourceError,
    UnknownError,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 9] = [
        ErrorCategory::ToolNotFound,
        ErrorCategory::PermissionDenied,
        ErrorCategory::ValidationError,
        ErrorCategory::ExecutionError,
        ErrorCategory::DatabaseError,
        ErrorCategory::NetworkError,
        ErrorCategory::TimeoutError,
        ErrorCategory::ResourceError,
        ErrorCategory::UnknownError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::ToolNotFound => "tool_not_found",
            ErrorCategory::PermissionDenied => "permission_denied",
            ErrorCategory::ValidationError => "validation_error",
            ErrorCategory::ExecutionError => "execution_error",
            ErrorCategory::DatabaseError => "database_error",
            ErrorCategory::NetworkError => "network_error",
            ErrorCategory::TimeoutError => "timeout_error",
            ErrorCategory::ResourceError => "resource_error",
            ErrorCategory::UnknownError => "unknown_error",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ErrorCategory::TimeoutError.to_string(), "timeout_error");
    }
}
