//! Rule-store configuration.

use serde::{Deserialize, Serialize};

/// What to do with a proposed call that no active scope covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopePolicy {
    /// Unscoped calls pass; only calls with a matching scope are constrained.
    #[default]
    Permissive,
    /// Every call must be covered by an active scope of its proposal type.
    Strict,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub scope_policy: ScopePolicy,
}

impl RulesConfig {
    pub fn strict() -> Self {
        Self {
            scope_policy: ScopePolicy::Strict,
        }
    }
}
