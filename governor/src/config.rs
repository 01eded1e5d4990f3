//! Governor configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tessera_hooks::DEFAULT_MAX_DEPTH;
use tessera_rules::RulesConfig;

use crate::logging::LogFormat;
use crate::GovernorError;

/// Configuration for a [`Governor`](crate::Governor).
///
/// Can be loaded from a TOML file via [`GovernorConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorConfig {
    /// Seconds between proposal creation and the start of voting.
    #[serde(default = "default_voting_delay")]
    pub voting_delay_secs: u64,

    /// Length of the voting window in seconds.
    #[serde(default = "default_voting_period")]
    pub voting_period_secs: u64,

    /// How deeply module callbacks may nest.
    #[serde(default = "default_max_hook_depth")]
    pub max_hook_depth: usize,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub rules: RulesConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_voting_delay() -> u64 {
    86_400
}

fn default_voting_period() -> u64 {
    7 * 86_400
}

fn default_max_hook_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GovernorConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, GovernorError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GovernorError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, GovernorError> {
        let config: Self = toml::from_str(s).map_err(|e| GovernorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, GovernorError> {
        toml::to_string_pretty(self).map_err(|e| GovernorError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), GovernorError> {
        if self.voting_period_secs == 0 {
            return Err(GovernorError::Config("voting_period_secs must be positive".into()));
        }
        if self.max_hook_depth == 0 {
            return Err(GovernorError::Config("max_hook_depth must be positive".into()));
        }
        Ok(())
    }
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            voting_delay_secs: default_voting_delay(),
            voting_period_secs: default_voting_period(),
            max_hook_depth: default_max_hook_depth(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            rules: RulesConfig::default(),
        }
    }
}
