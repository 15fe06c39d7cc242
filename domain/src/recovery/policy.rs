//! Per-category recovery policies.
//!
//! | Category | Retries | Base delay | Backoff | Retry when | Fallback |
//! |---|---:|---:|---:|---|---|
//! | ToolNotFound | 0 | - | - | never | suggest alternatives |
//! | PermissionDenied | 0 | - | - | never | elevation guidance |
//! | ValidationError | 0 | - | - | never | corrective guidance |
//! | ExecutionError | 2 | 1000ms | 2.0 | no validation/permission wording | - |
//! | DatabaseError | 3 | 500ms | 1.5 | locked/busy/timeout/connection | retry/disk guidance |
//! | NetworkError | 3 | 2000ms | 2.0 | not 404/401, or timeout/connection | - |
//! | TimeoutError | 2 | 1000ms | 1.5 | always | - |
//! | ResourceError | 2 | 3000ms | 1.5 | busy/unavailable/overload | - |
//! | UnknownError | 1 | 1000ms | 1.0 | always | - |
//!
//! `attempt` is the 1-based number of the attempt that just failed. A retry is
//! described only while `attempt <= max_retries`; after that the fallback (or
//! the category's terminal message) takes over.

use super::fallback::{
    FallbackFn, database_guidance, permission_guidance, suggest_alternatives, validation_guidance,
};
use crate::core::string::contains_any;
use crate::error::category::ErrorCategory;
use crate::error::classified::ClassifiedError;
use std::collections::HashMap;

/// Decides whether a failed attempt may be retried.
pub type RetryPredicate = fn(&ClassifiedError, u32) -> bool;

/// Retry ceiling, backoff and fallback for one error category.
#[derive(Debug, Clone, Copy)]
pub struct RecoveryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub is_retry_eligible: RetryPredicate,
    pub fallback: Option<FallbackFn>,
}

impl RecoveryPolicy {
    /// A policy that never retries.
    pub fn terminal(fallback: Option<FallbackFn>) -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 0,
            backoff_multiplier: 1.0,
            is_retry_eligible: never,
            fallback,
        }
    }

    pub fn retrying(
        max_retries: u32,
        base_delay_ms: u64,
        backoff_multiplier: f64,
        is_retry_eligible: RetryPredicate,
    ) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            backoff_multiplier,
            is_retry_eligible,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackFn) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// `base_delay × backoff^(attempt - 1)`, rounded to whole milliseconds.
    pub fn retry_delay_ms(&self, attempt: u32) -> u64 {
        let exponent = attempt.saturating_sub(1) as i32;
        (self.base_delay_ms as f64 * self.backoff_multiplier.powi(exponent)).round() as u64
    }

    /// Retry ceiling first, then the category predicate.
    pub fn is_retryable(&self, error: &ClassifiedError, attempt: u32) -> bool {
        attempt <= self.max_retries && (self.is_retry_eligible)(error, attempt)
    }
}

// ==================== Retry predicates ====================

fn never(_: &ClassifiedError, _: u32) -> bool {
    false
}

fn always(_: &ClassifiedError, _: u32) -> bool {
    true
}

fn execution_retryable(error: &ClassifiedError, _: u32) -> bool {
    !contains_any(
        &error.lowercase_message(),
        &["validation", "permission", "unauthorized", "forbidden"],
    )
}

fn database_retryable(error: &ClassifiedError, _: u32) -> bool {
    contains_any(&error.lowercase_message(), &["locked", "busy", "timeout", "connection"])
}

fn network_retryable(error: &ClassifiedError, _: u32) -> bool {
    let message = error.lowercase_message();
    !contains_any(&message, &["404", "401"]) || contains_any(&message, &["timeout", "connection"])
}

fn resource_retryable(error: &ClassifiedError, _: u32) -> bool {
    contains_any(&error.lowercase_message(), &["busy", "unavailable", "overload"])
}

/// Policy lookup by category.
#[derive(Debug, Clone)]
pub struct RecoveryStrategyTable {
    policies: HashMap<ErrorCategory, RecoveryPolicy>,
}

impl Default for RecoveryStrategyTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RecoveryStrategyTable {
    /// The fixed production table.
    pub fn standard() -> Self {
        let policies = HashMap::from([
            (ErrorCategory::ToolNotFound, RecoveryPolicy::terminal(Some(suggest_alternatives))),
            (ErrorCategory::PermissionDenied, RecoveryPolicy::terminal(Some(permission_guidance))),
            (ErrorCategory::ValidationError, RecoveryPolicy::terminal(Some(validation_guidance))),
            (ErrorCategory::ExecutionError, RecoveryPolicy::retrying(2, 1000, 2.0, execution_retryable)),
            (
                ErrorCategory::DatabaseError,
                RecoveryPolicy::retrying(3, 500, 1.5, database_retryable).with_fallback(database_guidance),
            ),
            (ErrorCategory::NetworkError, RecoveryPolicy::retrying(3, 2000, 2.0, network_retryable)),
            (ErrorCategory::TimeoutError, RecoveryPolicy::retrying(2, 1000, 1.5, always)),
            (ErrorCategory::ResourceError, RecoveryPolicy::retrying(2, 3000, 1.5, resource_retryable)),
            (ErrorCategory::UnknownError, RecoveryPolicy::retrying(1, 1000, 1.0, always)),
        ]);
        Self { policies }
    }

    pub fn get(&self, category: ErrorCategory) -> Option<&RecoveryPolicy> {
        self.policies.get(&category)
    }

    /// Replace the policy for one category.
    pub fn with_policy(mut self, category: ErrorCategory, policy: RecoveryPolicy) -> Self {
        self.policies.insert(category, policy);
        self
    }

    pub fn without_policy(mut self, category: ErrorCategory) -> Self {
        self.policies.remove(&category);
        self
    }
}
