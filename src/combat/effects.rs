//! Status effects
//!
//! Each combatant carries a fixed [`StatusSet`]:
//! - Poison: damage at the start of the owner's own turns
//! - Shield: pool that soaks incoming damage before hp
//! - Rage: multiplies damage dealt and received
//!
//! Poison and rage tick once per own turn; shield only changes when hit or
//! healed.

use serde::{Deserialize, Serialize};

/// Damage dealt per poison tick
pub const POISON_DAMAGE: u32 = 2;
/// Ticks granted when poison is applied
pub const POISON_TURNS: u32 = 3;
/// Turns of rage granted on auto-enrage
pub const RAGE_TURNS: u32 = 3;

/// Per-combatant status state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSet {
    /// Damage per poison tick (0 if inactive)
    pub poison_amount: u32,
    /// Remaining poison ticks
    pub poison_turns: u32,
    /// Absorption pool
    pub shield: u32,
    /// Remaining turns of rage
    pub rage_turns: u32,
}

impl StatusSet {
    pub fn is_poisoned(&self) -> bool {
        self.poison_turns > 0
    }

    pub fn is_raging(&self) -> bool {
        self.rage_turns > 0
    }

    pub fn has_shield(&self) -> bool {
        self.shield > 0
    }

    /// Apply poison, replacing any existing poison state
    pub fn apply_poison(&mut self) {
        self.poison_amount = POISON_DAMAGE;
        self.poison_turns = POISON_TURNS;
    }

    /// Soak `damage` with the shield, returning what gets through
    pub fn absorb(&mut self, damage: u32) -> Absorption {
        let absorbed = self.shield.min(damage);
        self.shield -= absorbed;
        Absorption {
            absorbed,
            remaining: damage - absorbed,
        }
    }

    /// Short glyph string for display ("☠️🛡️💢")
    pub fn glyphs(&self) -> String {
        let mut out = String::new();
        if self.is_poisoned() {
            out.push_str("☠️");
        }
        if self.has_shield() {
            out.push_str("🛡️");
        }
        if self.is_raging() {
            out.push_str("💢");
        }
        out
    }
}

/// Result of a shield absorbing damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Absorption {
    pub absorbed: u32,
    pub remaining: u32,
}

/// What happened during a turn-start tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Poison damage taken this tick
    pub poison_damage: Option<u32>,
    /// Rage switched on this tick
    pub enraged: bool,
    /// The tick killed the combatant
    pub died: bool,
}

/// Run the turn-start tick on raw hp/status values
///
/// Poison first, then rage: an active rage decays by one turn, otherwise a
/// living combatant at or below a third of max hp enrages.
pub fn begin_turn(hp: &mut u32, max_hp: u32, status: &mut StatusSet) -> TickReport {
    let mut report = TickReport::default();

    if status.poison_turns > 0 {
        let damage = status.poison_amount;
        *hp = hp.saturating_sub(damage);
        status.poison_turns -= 1;
        report.poison_damage = Some(damage);
        report.died = *hp == 0;
    }

    if status.rage_turns > 0 {
        status.rage_turns -= 1;
    } else if *hp > 0 && *hp <= max_hp / 3 {
        status.rage_turns = RAGE_TURNS;
        report.enraged = true;
    }

    report
}
