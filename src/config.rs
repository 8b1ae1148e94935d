//! Configuration
//!
//! Layered with figment, later layers winning:
//! - Built-in defaults
//! - Optional TOML file
//! - `SKIRMISH_` environment variables (`__` separates nested keys)

use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::engine::validate_speed;
use crate::error::ConfigError;
use crate::roster::RosterDefs;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SKIRMISH_";

/// Base presentation delays, before speed scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Each step of an attack or heal animation
    pub step_ms: u64,
    /// Between one actor's turn and the next
    pub inter_actor_ms: u64,
    /// Between rounds
    pub round_yield_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            step_ms: 300,
            inter_actor_ms: 500,
            round_yield_ms: 10,
        }
    }
}

impl TimingConfig {
    pub fn step(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }

    pub fn inter_actor(&self) -> Duration {
        Duration::from_millis(self.inter_actor_ms)
    }

    pub fn round_yield(&self) -> Duration {
        Duration::from_millis(self.round_yield_ms)
    }
}

/// Battle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Presentation speed multiplier
    pub speed: f64,
    /// Start with the battle paused
    pub start_paused: bool,
    /// Battle RNG seed; OS entropy when unset
    pub seed: Option<u64>,
    /// Encounter tier for monster scaling
    pub tier: Option<u32>,
    pub timing: TimingConfig,
    /// Custom rosters; the standard ones when unset
    pub roster: Option<RosterDefs>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed: 1.0,
            start_paused: false,
            seed: None,
            tier: None,
            timing: TimingConfig::default(),
            roster: None,
        }
    }
}

impl Config {
    /// Provider stack for an optional config file
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate configuration
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
        }
        let config: Config = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_speed(self.speed)?;
        if self.tier == Some(0) {
            return Err(ConfigError::InvalidTier);
        }
        if let Some(roster) = &self.roster {
            roster.validate()?;
        }
        Ok(())
    }

    /// Configured rosters, or the standard ones
    pub fn rosters(&self) -> RosterDefs {
        self.roster.clone().unwrap_or_default()
    }
}
