//! Combat system module
//!
//! Implements the heroes-versus-monsters combat rules:
//! - Injectable random draws
//! - Poison, shield and rage status effects
//! - Attack resolution with rage, crits and shields
//! - Role-based action selection and taunt targeting
//! - Battle state tracking

mod actions;
mod damage;
mod effects;
mod rng;
mod state;

pub use actions::{
    living_enemies, select_burst_targets, select_target, take_turn, ActionKind, TurnAction,
    BURST_TARGETS, SPECIAL_ATTACK_CEILING, SPECIAL_CHANCE, STRIKER_ATTACK_CHANCE,
};
pub use damage::{
    rage_scale, resolve_attack, resolve_heal, AttackReport, HealReport, CRIT_CHANCE,
    HEAL_SHIELD_CHANCE, POISON_CHANCE,
};
pub use effects::{Absorption, StatusSet, TickReport, POISON_DAMAGE, POISON_TURNS, RAGE_TURNS};
pub use rng::{ConstantRng, RngSource, ScriptedRng, SeededRng};
pub use state::{AttackRange, BattleState, Combatant, CombatantId, Role, Roster, Side};
