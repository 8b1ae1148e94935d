//! Attack and heal resolution
//!
//! Pure numeric resolution against [`BattleState`]. Nothing here waits on
//! presentation; each call returns a report with the post-action snapshot
//! the renderer needs.
//!
//! Attack order:
//! 1. Base roll in the attacker's range
//! 2. Attacker rage (x1.5, floored)
//! 3. Critical hit (x2)
//! 4. Target rage (x1.5, floored)
//! 5. Shield absorption
//! 6. Hp loss
//! 7. Poison on a surviving target
//! 8. Death bookkeeping

use serde::Serialize;
use tracing::trace;

use super::effects::StatusSet;
use super::rng::RngSource;
use super::state::{BattleState, CombatantId};

/// Chance for an attack to deal double damage
pub const CRIT_CHANCE: f64 = 0.2;
/// Chance for a surviving target to be poisoned
pub const POISON_CHANCE: f64 = 0.1;
/// Self-heal amount range
pub const HEAL_MIN: u32 = 1;
pub const HEAL_MAX: u32 = 5;
/// Chance for a heal to also grant shield
pub const HEAL_SHIELD_CHANCE: f64 = 0.3;
/// Shield granted by a lucky heal
pub const HEAL_SHIELD_MIN: u32 = 1;
pub const HEAL_SHIELD_MAX: u32 = 3;

/// Rage multiplier (x1.5, rounded down)
pub fn rage_scale(damage: u32) -> u32 {
    damage.saturating_mul(3) / 2
}

/// Outcome of one attack against one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackReport {
    pub attacker: CombatantId,
    pub target: CombatantId,
    /// Damage after rage and crit, before shield
    pub raw_damage: u32,
    pub critical: bool,
    /// Damage soaked by the target's shield
    pub absorbed: u32,
    /// Damage that reached hp
    pub damage: u32,
    pub target_hp: u32,
    pub target_max_hp: u32,
    pub target_status: StatusSet,
    pub poisoned: bool,
    pub killed: bool,
}

/// Outcome of a self-heal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealReport {
    pub actor: CombatantId,
    /// Rolled heal amount (may exceed hp actually restored)
    pub amount: u32,
    pub shield_gained: Option<u32>,
    pub hp: u32,
    pub max_hp: u32,
    pub status: StatusSet,
}

/// Resolve a single attack
///
/// Returns `None` if either side is missing or already dead.
pub fn resolve_attack<R: RngSource + ?Sized>(
    state: &mut BattleState,
    attacker: CombatantId,
    target: CombatantId,
    rng: &mut R,
) -> Option<AttackReport> {
    let (range, attacker_raging) = {
        let actor = state.combatant(attacker).filter(|c| c.is_alive())?;
        (actor.attack(), actor.status().is_raging())
    };
    let target_raging = state
        .combatant(target)
        .filter(|c| c.is_alive())?
        .status()
        .is_raging();

    let base = rng.range_inclusive(range.min, range.max);
    let mut raw = base;
    if attacker_raging {
        raw = rage_scale(raw);
    }
    let critical = rng.chance(CRIT_CHANCE);
    if critical {
        raw = raw.saturating_mul(2);
    }
    if target_raging {
        raw = rage_scale(raw);
    }

    let defender = state.combatant_mut(target)?;
    let absorption = defender.status_mut().absorb(raw);
    let killed = defender.take_damage(absorption.remaining);

    let poisoned = defender.is_alive() && rng.chance(POISON_CHANCE);
    if poisoned {
        defender.status_mut().apply_poison();
    }

    let report = AttackReport {
        attacker,
        target,
        raw_damage: raw,
        critical,
        absorbed: absorption.absorbed,
        damage: absorption.remaining,
        target_hp: defender.hp(),
        target_max_hp: defender.max_hp(),
        target_status: *defender.status(),
        poisoned,
        killed,
    };

    if killed {
        state.release_taunt(target);
    }

    trace!(
        ?attacker,
        ?target,
        base,
        raw,
        critical,
        absorbed = report.absorbed,
        damage = report.damage,
        hp = report.target_hp,
        "attack resolved"
    );

    Some(report)
}

/// Resolve a self-heal
pub fn resolve_heal<R: RngSource + ?Sized>(
    state: &mut BattleState,
    actor: CombatantId,
    rng: &mut R,
) -> Option<HealReport> {
    let combatant = state.combatant_mut(actor).filter(|c| c.is_alive())?;

    let amount = rng.range_inclusive(HEAL_MIN, HEAL_MAX);
    combatant.heal(amount);

    let shield_gained = if rng.chance(HEAL_SHIELD_CHANCE) {
        let gained = rng.range_inclusive(HEAL_SHIELD_MIN, HEAL_SHIELD_MAX);
        let status = combatant.status_mut();
        status.shield = status.shield.saturating_add(gained);
        Some(gained)
    } else {
        None
    };

    Some(HealReport {
        actor,
        amount,
        shield_gained,
        hp: combatant.hp(),
        max_hp: combatant.max_hp(),
        status: *combatant.status(),
    })
}
