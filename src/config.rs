//! Arena configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file,
//! then `PVP_`-prefixed environment variables (`PVP_RULES__TEAM_SIZE=3`).

use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::MAX_STAT;

/// Default team size
pub const TEAM_SIZE: usize = 3;

/// Default bounds of the random damage term
pub const ROLL_MIN: i32 = 500;
pub const ROLL_MAX: i32 = 1500;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),

    #[error("invalid rules: {0}")]
    InvalidRules(String),
}

/// Match rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Units each participant must field before accept
    pub team_size: usize,
    /// Ceiling for adjusted health and attack
    pub stat_cap: i32,
    /// Lower bound of the per-attack random term
    pub roll_min: i32,
    /// Upper bound of the per-attack random term (inclusive)
    pub roll_max: i32,
    /// A participant may hold only one match at a time
    pub exclusive_matches: bool,
    /// Pending matches idle longer than this are dropped (None = never)
    pub pending_ttl_secs: Option<u64>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            team_size: TEAM_SIZE,
            stat_cap: MAX_STAT,
            roll_min: ROLL_MIN,
            roll_max: ROLL_MAX,
            exclusive_matches: true,
            pending_ttl_secs: None,
        }
    }
}

impl Rules {
    /// Idle expiry for pending matches
    pub fn pending_ttl(&self) -> Option<Duration> {
        self.pending_ttl_secs.map(Duration::from_secs)
    }

    /// Reject rule sets the engine cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.team_size == 0 {
            return Err(ConfigError::InvalidRules("team_size must be at least 1".into()));
        }
        if self.stat_cap <= 0 {
            return Err(ConfigError::InvalidRules("stat_cap must be positive".into()));
        }
        if self.roll_min > self.roll_max {
            return Err(ConfigError::InvalidRules(format!(
                "roll_min {} exceeds roll_max {}",
                self.roll_min, self.roll_max
            )));
        }
        Ok(())
    }
}

/// Top-level configuration for the arena daemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub rules: Rules,
    /// Default tracing filter when RUST_LOG is unset
    pub log_filter: String,
    /// Emit JSON lines instead of chat text, and JSON logs
    pub json_output: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            log_filter: "pvp_arena=info,pvpd=info".to_string(),
            json_output: false,
        }
    }
}

impl ArenaConfig {
    /// Load defaults, then the TOML file (if given), then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(ArenaConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        Self::extract(figment.merge(Env::prefixed("PVP_").split("__")))
    }

    /// Extract and validate from an assembled figment
    pub fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: ArenaConfig = figment.extract()?;
        config.rules.validate()?;
        Ok(config)
    }
}
