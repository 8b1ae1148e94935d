//! skirmish - heroes-versus-monsters combat engine
//!
//! A turn-based battle between two rosters with status effects, taunt
//! targeting and paced, pausable presentation.

pub mod arena;
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod render;
pub mod roster;

pub use arena::{Arena, BattleHandle};
pub use config::{Config, TimingConfig};
pub use engine::{BattleOutcome, ControlHandle, ControlSurface, Engine};
pub use error::{ArenaError, ConfigError, ControlError, Interrupted, RosterError};
pub use render::{ChannelRenderer, RenderCall, Renderer, TerminalRenderer, ViewHandle};
pub use roster::{CombatantDef, RosterDefs};
