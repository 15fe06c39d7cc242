//! Permission model: capability tiers, caller preferences and the
//! execution validator.
//!
//! Permission checks always run before confirmation checks.

pub mod preferences;
pub mod tier;
pub mod validator;

pub use preferences::{ExecutionPreferences, PreferencesUpdate};
pub use tier::{PermissionTier, TierSet};
pub use validator::{ExecutionValidator, PermissionModel, ValidationDecision};
