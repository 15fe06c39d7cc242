//! Execution preferences: the caller's mutable permission state.

use super::tier::{PermissionTier, TierSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default confirmation timeout in seconds.
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECONDS: u64 = 30;

/// Caller-side permission state.
///
/// Read-mostly. Mutated only by the owning control loop between
/// invocations, so no internal locking is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPreferences {
    /// Tools that skip the confirmation gate
    pub auto_approve: BTreeSet<String>,
    /// Tiers currently granted to the caller
    pub granted_tiers: TierSet,
    /// How long a confirmation prompt may stay open
    pub confirmation_timeout_seconds: u64,
}

impl Default for ExecutionPreferences {
    fn default() -> Self {
        Self {
            auto_approve: BTreeSet::new(),
            granted_tiers: [PermissionTier::ReadOnly].into(),
            confirmation_timeout_seconds: DEFAULT_CONFIRMATION_TIMEOUT_SECONDS,
        }
    }
}

impl ExecutionPreferences {
    // ==================== Builder Methods ====================

    pub fn with_granted_tiers(mut self, tiers: impl IntoIterator<Item = PermissionTier>) -> Self {
        self.granted_tiers = tiers.into_iter().collect();
        self
    }

    pub fn with_auto_approve(mut self, tools: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.auto_approve = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_confirmation_timeout(mut self, seconds: u64) -> Self {
        self.confirmation_timeout_seconds = seconds;
        self
    }

    pub fn is_auto_approved(&self, tool_name: &str) -> bool {
        self.auto_approve.contains(tool_name)
    }

    /// Apply a partial update; absent fields keep their current value.
    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(auto_approve) = update.auto_approve {
            self.auto_approve = auto_approve;
        }
        if let Some(granted_tiers) = update.granted_tiers {
            self.granted_tiers = granted_tiers;
        }
        if let Some(timeout) = update.confirmation_timeout_seconds {
            self.confirmation_timeout_seconds = timeout;
        }
    }
}

/// Partial update for [`ExecutionPreferences`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_approve: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granted_tiers: Option<TierSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_timeout_seconds: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let prefs = ExecutionPreferences::default();
        assert!(prefs.auto_approve.is_empty());
        assert_eq!(prefs.granted_tiers, [PermissionTier::ReadOnly].into());
        assert_eq!(prefs.confirmation_timeout_seconds, 30);
    }

    #[test]
    fn test_apply_partial_update() {
        let mut prefs = ExecutionPreferences::default().with_auto_approve(["start_timer"]);
        prefs.apply(PreferencesUpdate {
            granted_tiers: Some([PermissionTier::FullAccess].into()),
            ..Default::default()
        });

        assert_eq!(prefs.granted_tiers, [PermissionTier::FullAccess].into());
        assert!(prefs.is_auto_approved("start_timer"));
        assert_eq!(prefs.confirmation_timeout_seconds, 30);
    }

    #[test]
    fn test_apply_replaces_auto_approve() {
        let mut prefs = ExecutionPreferences::default().with_auto_approve(["start_timer"]);
        prefs.apply(PreferencesUpdate {
            auto_approve: Some(["create_task".to_string()].into()),
            confirmation_timeout_seconds: Some(5),
            ..Default::default()
        });

        assert!(!prefs.is_auto_approved("start_timer"));
        assert!(prefs.is_auto_approved("create_task"));
        assert_eq!(prefs.confirmation_timeout_seconds, 5);
    }
}
