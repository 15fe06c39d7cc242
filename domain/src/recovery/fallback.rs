//! Category fallbacks: alternative outcomes produced instead of a bare failure.

use crate::error::category::ErrorCategory;
use crate::error::classified::ClassifiedError;
use crate::outcome::entities::ExecutionOutcome;
use crate::outcome::messages::MessageTemplates;
use crate::permission::tier::TierSet;
use crate::tool::entities::ToolCatalog;
use crate::tool::matcher::AlternativeToolMatcher;
use thiserror::Error;

/// Tool name reported when neither the caller nor the error names one.
pub const UNKNOWN_TOOL: &str = "unknown";

/// Produces a fallback outcome for a classified error.
pub type FallbackFn =
    fn(&ClassifiedError, &FallbackContext<'_>) -> Result<ExecutionOutcome, FallbackError>;

/// A fallback that could not produce an outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FallbackError {
    #[error("no tool name available for {0} fallback")]
    MissingToolName(ErrorCategory),

    #[error("fallback for {category} failed: {message}")]
    Failed {
        category: ErrorCategory,
        message: String,
    },
}

/// Read-only state a fallback may consult.
#[derive(Debug, Clone, Copy)]
pub struct FallbackContext<'a> {
    /// Tool named by the caller's retry context, if any.
    pub tool_name: Option<&'a str>,
    pub catalog: &'a ToolCatalog,
    pub granted_tiers: &'a TierSet,
    pub templates: &'a MessageTemplates,
    pub matcher: &'a AlternativeToolMatcher,
}

impl FallbackContext<'_> {
    /// Name reported in `metadata.tool_name`.
    pub fn reported_tool_name<'s>(&'s self, error: &'s ClassifiedError) -> &'s str {
        self.tool_name
            .or(error.tool_name.as_deref())
            .unwrap_or(UNKNOWN_TOOL)
    }

    fn failure(&self, error: &ClassifiedError, user_message: String) -> ExecutionOutcome {
        ExecutionOutcome::failure(self.reported_tool_name(error), error.message.clone(), user_message)
            .with_category(error.category)
            .with_granted_tiers(self.granted_tiers.clone())
    }
}

/// ToolNotFound: keyword-matched suggestions, or the full catalogue.
///
/// `metadata.suggestions` is always set, empty when nothing scored.
pub fn suggest_alternatives(
    error: &ClassifiedError,
    ctx: &FallbackContext<'_>,
) -> Result<ExecutionOutcome, FallbackError> {
    let missing = error
        .tool_name
        .as_deref()
        .or(ctx.tool_name)
        .filter(|name| !name.trim().is_empty())
        .ok_or(FallbackError::MissingToolName(error.category))?;

    let suggestions = ctx.matcher.find_alternatives(missing, ctx.catalog);
    let available: Vec<String> = ctx.catalog.names().map(str::to_string).collect();
    let message = ctx.templates.tool_not_found(missing, &suggestions, &available);

    Ok(ctx.failure(error, message).with_suggestions(suggestions))
}

/// PermissionDenied: every missing tier by display name.
pub fn permission_guidance(
    error: &ClassifiedError,
    ctx: &FallbackContext<'_>,
) -> Result<ExecutionOutcome, FallbackError> {
    let tool_name = ctx
        .tool_name
        .or(error.tool_name.as_deref())
        .ok_or(FallbackError::MissingToolName(error.category))?;

    let descriptor = ctx.catalog.get(tool_name);
    let missing = descriptor
        .map(|d| d.missing_tiers(ctx.granted_tiers))
        .unwrap_or_default();
    let message = ctx.templates.permission_denied(tool_name, &missing, &error.message);

    let outcome = ctx.failure(error, message);
    Ok(match descriptor {
        Some(d) => outcome.with_required_tiers(d.required_tiers.clone()),
        None => outcome,
    })
}

/// ValidationError: tool-specific corrective bullets.
pub fn validation_guidance(
    error: &ClassifiedError,
    ctx: &FallbackContext<'_>,
) -> Result<ExecutionOutcome, FallbackError> {
    let tool_name = ctx
        .tool_name
        .or(error.tool_name.as_deref())
        .ok_or(FallbackError::MissingToolName(error.category))?;

    let descriptor = ctx.catalog.get(tool_name);
    let message = ctx.templates.validation_error(tool_name, &error.message, descriptor);
    Ok(ctx.failure(error, message))
}

/// DatabaseError once retries are exhausted: retry and disk-space guidance.
pub fn database_guidance(
    error: &ClassifiedError,
    ctx: &FallbackContext<'_>,
) -> Result<ExecutionOutcome, FallbackError> {
    let message = ctx.templates.database_error(&error.message);
    Ok(ctx.failure(error, message))
}
