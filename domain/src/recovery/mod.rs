//! Recovery policies and fallbacks.
//!
//! The table only *describes* recovery. Nothing here sleeps, schedules or
//! re-invokes a tool; the caller owns resubmission.

pub mod context;
pub mod fallback;
pub mod policy;

pub use context::RetryContext;
pub use fallback::{FallbackContext, FallbackError, FallbackFn, UNKNOWN_TOOL};
pub use policy::{RecoveryPolicy, RecoveryStrategyTable, RetryPredicate};
