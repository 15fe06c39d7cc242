//! Execution outcomes and their human-readable rendering.
//!
//! - [`ExecutionOutcome`]: the one result type the UI and agent loop consume
//! - [`ResultFormatter`]: success payload → outcome, per-tool templates
//! - [`MessageTemplates`]: terminal and retry message templates
//! - [`Translator`]: localization hook, identity by default

pub mod entities;
pub mod formatter;
pub mod messages;
pub mod payload;
pub mod translate;

pub use entities::{ExecutionOutcome, OutcomeMetadata};
pub use formatter::ResultFormatter;
pub use messages::MessageTemplates;
pub use payload::{PayloadError, ToolPayload};
pub use translate::{FnTranslator, IdentityTranslator, TableTranslator, Translator};
