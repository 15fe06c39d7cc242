//! Permission tiers: capability grants that gate tool access.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Ordered capability tier.
///
/// A caller holds a set of tiers; a tool requires a set of tiers.
/// [`PermissionTier::FullAccess`] satisfies any requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionTier {
    /// Read application state (task listings, time data, analytics)
    ReadOnly,
    /// Create, update and delete tasks
    ModifyTasks,
    /// Start and stop timers
    TimerControl,
    /// Superset tier
    FullAccess,
}

/// Set of tiers, iterated in tier order.
pub type TierSet = BTreeSet<PermissionTier>;

impl PermissionTier {
    pub const ALL: [PermissionTier; 4] = [
        PermissionTier::ReadOnly,
        PermissionTier::ModifyTasks,
        PermissionTier::TimerControl,
        PermissionTier::FullAccess,
    ];

    /// Identifier form, used in machine-facing reasons.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionTier::ReadOnly => "ReadOnly",
            PermissionTier::ModifyTasks => "ModifyTasks",
            PermissionTier::TimerControl => "TimerControl",
            PermissionTier::FullAccess => "FullAccess",
        }
    }

    /// Human-readable name, used in user messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            PermissionTier::ReadOnly => "Read Only",
            PermissionTier::ModifyTasks => "Modify Tasks",
            PermissionTier::TimerControl => "Timer Control",
            PermissionTier::FullAccess => "Full Access",
        }
    }

    /// Configuration-file form: `modify_tasks`.
    pub fn snake_case(&self) -> &'static str {
        match self {
            PermissionTier::ReadOnly => "read_only",
            PermissionTier::ModifyTasks => "modify_tasks",
            PermissionTier::TimerControl => "timer_control",
            PermissionTier::FullAccess => "full_access",
        }
    }

    /// Whether a set of granted tiers satisfies this single requirement.
    pub fn is_satisfied_by(&self, granted: &TierSet) -> bool {
        granted.contains(self) || granted.contains(&PermissionTier::FullAccess)
    }
}

impl std::fmt::Display for PermissionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PermissionTier {
    type Err = DomainError;

    /// Accepts the identifier form (`ModifyTasks`) or snake_case (`modify_tasks`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PermissionTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == trimmed || tier.snake_case() == trimmed)
            .ok_or_else(|| DomainError::UnknownTier(trimmed.to_string()))
    }
}

/// Join tiers as identifiers: `ModifyTasks, TimerControl`.
pub fn join_tier_ids(tiers: &TierSet) -> String {
    tiers
        .iter()
        .map(PermissionTier::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
