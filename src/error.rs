//! Error types

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::MIN_SPEED;

/// Rejected control-surface input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    #[error("speed must be finite and at least {min}, got {0}", min = MIN_SPEED)]
    InvalidSpeed(f64),
}

/// Why a battle stopped before producing a winner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("battle superseded by a restart")]
    Superseded,

    #[error("control surface dropped")]
    Detached,
}

/// Invalid roster definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("{0} roster is empty")]
    Empty(&'static str),

    #[error("combatant #{0} has an empty name")]
    EmptyName(usize),

    #[error("{0} has zero max hp")]
    ZeroHp(String),

    #[error("{name} has an inverted attack range ({min} > {max})")]
    InvertedRange { name: String, min: u32, max: u32 },

    #[error("{0} is a monster taunter; taunt only binds monsters")]
    MonsterTaunter(String),

    #[error("tier must be at least 1")]
    InvalidTier,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("config file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("invalid speed: {0}")]
    Speed(#[from] ControlError),

    #[error("tier must be at least 1")]
    InvalidTier,

    #[error("invalid roster: {0}")]
    Roster(#[from] RosterError),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Figment(Box::new(err))
    }
}

/// Errors from the arena host
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("invalid roster: {0}")]
    Roster(#[from] RosterError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error("battle task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
