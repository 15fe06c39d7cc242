//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These represent misconfiguration or programming mistakes (a catalogue
/// with duplicate entries, an illegal state transition). User-facing
/// failures never surface as `DomainError`; they are returned as
/// [`ExecutionOutcome`](crate::outcome::ExecutionOutcome) values instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Duplicate tool in catalogue: {0}")]
    DuplicateTool(String),

    #[error("Unknown permission tier: {0}")]
    UnknownTier(String),

    #[error("Invalid invocation transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}
