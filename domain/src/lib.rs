//! Domain layer for toolgate
//!
//! Pure decision logic for running agent-proposed tool calls. No I/O, no
//! async, no global state.
//!
//! # Pipeline
//!
//! ```text
//! ToolCall ─► PermissionModel::validate_execution ─► (caller's adapter)
//!                                                     │
//!                         ┌───────────── Ok(payload) ─┴─ Err(raw) ─────────────┐
//!                         ▼                                                    ▼
//!              ResultFormatter::format_result              ErrorNormalizer::normalize
//!                         │                                                    │
//!                         │                                RecoveryStrategyTable::get
//!                         │                                 retry │ fallback │ terminal
//!                         ▼                                       ▼
//!                  ExecutionOutcome ◄──────────────────────────────┘
//! ```
//!
//! # Error taxonomy
//!
//! Every failure lands in one of nine [`ErrorCategory`] values.
//! `ToolNotFound`, `PermissionDenied` and `ValidationError` are terminal;
//! the rest may be retried with exponential backoff.

pub mod core;
pub mod error;
pub mod outcome;
pub mod permission;
pub mod recovery;
pub mod tool;

pub use core::error::DomainError;
pub use error::{ClassifiedError, ErrorCategory, ErrorNormalizer, RawError, UpstreamCode, UpstreamError, UpstreamLayer};
pub use outcome::{
    ExecutionOutcome, IdentityTranslator, MessageTemplates, OutcomeMetadata, ResultFormatter, TableTranslator,
    Translator,
};
pub use permission::{
    ExecutionPreferences, ExecutionValidator, PermissionModel, PermissionTier, PreferencesUpdate, TierSet,
    ValidationDecision,
};
pub use recovery::{FallbackContext, FallbackError, RecoveryPolicy, RecoveryStrategyTable, RetryContext};
pub use tool::{
    AlternativeSuggestion, AlternativeToolMatcher, Invocation, InvocationState, ToolCall, ToolCatalog, ToolDescriptor,
    ToolParameter,
};
