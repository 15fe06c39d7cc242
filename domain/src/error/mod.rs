//! Error taxonomy and normalization.
//!
//! Every failure from the registry, execution bridge, AI-service layer or
//! raw adapter code is funneled through [`ErrorNormalizer::normalize`] into a
//! [`ClassifiedError`] carrying one of nine [`ErrorCategory`] values.

pub mod category;
pub mod classified;
pub mod normalizer;

pub use category::ErrorCategory;
pub use classified::{ClassifiedError, ErrorCause, RawError, UpstreamCode, UpstreamError, UpstreamLayer};
pub use normalizer::{ErrorNormalizer, MESSAGE_RULES, MessageRule};
