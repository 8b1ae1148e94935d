//! Action selection and targeting
//!
//! One action draw per actor-turn picks from the actor's role table, then
//! the chosen action is resolved against the battle state.

use serde::Serialize;
use tracing::debug;

use super::damage::{resolve_attack, resolve_heal, AttackReport, HealReport};
use super::rng::RngSource;
use super::state::{BattleState, CombatantId, Role, Side};

/// Draw below which a taunter taunts or a burst caster casts
pub const SPECIAL_CHANCE: f64 = 0.2;
/// Draw below which a taunter or burst caster attacks; above it they heal
pub const SPECIAL_ATTACK_CEILING: f64 = 0.9;
/// Draw below which a striker attacks; above it they heal
pub const STRIKER_ATTACK_CHANCE: f64 = 0.8;
/// Most enemies a burst ability hits
pub const BURST_TARGETS: usize = 2;

/// What an actor decided to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Taunt,
    Burst,
    Attack,
    Heal,
}

impl ActionKind {
    /// Map an action draw onto a role's table
    pub fn select(role: Role, draw: f64) -> Self {
        let special = match role {
            Role::Taunter => Some(ActionKind::Taunt),
            Role::Burst => Some(ActionKind::Burst),
            Role::Striker => None,
        };
        match special {
            Some(kind) if draw < SPECIAL_CHANCE => kind,
            Some(_) if draw < SPECIAL_ATTACK_CEILING => ActionKind::Attack,
            Some(_) => ActionKind::Heal,
            None if draw < STRIKER_ATTACK_CHANCE => ActionKind::Attack,
            None => ActionKind::Heal,
        }
    }
}

/// A fully resolved turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TurnAction {
    Taunt { actor: CombatantId },
    Burst { actor: CombatantId, hits: Vec<AttackReport> },
    Attack(AttackReport),
    Heal(HealReport),
}

impl TurnAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            TurnAction::Taunt { .. } => ActionKind::Taunt,
            TurnAction::Burst { .. } => ActionKind::Burst,
            TurnAction::Attack(_) => ActionKind::Attack,
            TurnAction::Heal(_) => ActionKind::Heal,
        }
    }

    /// Every attack this turn, in resolution order
    pub fn attacks(&self) -> &[AttackReport] {
        match self {
            TurnAction::Burst { hits, .. } => hits,
            TurnAction::Attack(report) => std::slice::from_ref(report),
            TurnAction::Taunt { .. } | TurnAction::Heal(_) => &[],
        }
    }
}

/// Living members of the side opposing `side`
pub fn living_enemies(state: &BattleState, side: Side) -> Vec<CombatantId> {
    state.roster(side.opponent()).living()
}

/// Pick a single-attack target for an actor on `side`
///
/// Monsters are forced onto a living taunt target; everyone else picks a
/// uniformly random living enemy. `None` only when no enemy is alive.
pub fn select_target<R: RngSource + ?Sized>(
    state: &BattleState,
    side: Side,
    rng: &mut R,
) -> Option<CombatantId> {
    let living = living_enemies(state, side);
    if living.is_empty() {
        return None;
    }
    if side == Side::Monsters {
        if let Some(taunt) = state.taunt_target().filter(|id| state.is_alive(*id)) {
            return Some(taunt);
        }
    }
    Some(living[rng.pick_index(living.len())])
}

/// Pick up to [`BURST_TARGETS`] distinct living enemies
pub fn select_burst_targets<R: RngSource + ?Sized>(
    state: &BattleState,
    side: Side,
    rng: &mut R,
) -> Vec<CombatantId> {
    let mut pool = living_enemies(state, side);
    let count = BURST_TARGETS.min(pool.len());

    // Partial Fisher-Yates: the first `count` slots end up a uniform sample
    for slot in 0..count {
        let pick = slot + rng.pick_index(pool.len() - slot);
        pool.swap(slot, pick);
    }
    pool.truncate(count);
    pool
}

/// Select and resolve one action for `actor`
///
/// Returns `None` if the actor is dead or has no living enemies; the
/// scheduler ends the battle before that can happen.
pub fn take_turn<R: RngSource + ?Sized>(
    state: &mut BattleState,
    actor: CombatantId,
    rng: &mut R,
) -> Option<TurnAction> {
    let role = state.combatant(actor).filter(|c| c.is_alive())?.role();
    if living_enemies(state, actor.side).is_empty() {
        return None;
    }

    let kind = ActionKind::select(role, rng.draw());
    debug!(?actor, ?kind, "action selected");

    match kind {
        ActionKind::Taunt => {
            // Only monster targeting honors taunt, so only heroes can set it
            if actor.side == Side::Heroes {
                state.set_taunt_target(actor);
            }
            Some(TurnAction::Taunt { actor })
        }
        ActionKind::Burst => {
            let targets = select_burst_targets(state, actor.side, rng);
            let hits = targets
                .into_iter()
                .filter_map(|target| resolve_attack(state, actor, target, rng))
                .collect();
            Some(TurnAction::Burst { actor, hits })
        }
        ActionKind::Attack => {
            let target = select_target(state, actor.side, rng)?;
            resolve_attack(state, actor, target, rng).map(TurnAction::Attack)
        }
        ActionKind::Heal => resolve_heal(state, actor, rng).map(TurnAction::Heal),
    }
}
