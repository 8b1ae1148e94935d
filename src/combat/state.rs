//! Battle state
//!
//! Owns the two rosters, the round counter and the taunt override:
//! - Combatants are stored for the whole battle, dead or alive
//! - Rosters keep their construction order, which is turn order
//! - A [`CombatantId`] is a stable `(side, slot)` reference

use std::fmt;

use serde::{Deserialize, Serialize};

use super::effects::{self, StatusSet, TickReport};

/// Which team a combatant fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Heroes,
    Monsters,
}

impl Side {
    /// Phase order within a round
    pub const PHASES: [Side; 2] = [Side::Heroes, Side::Monsters];

    pub fn opponent(self) -> Side {
        match self {
            Side::Heroes => Side::Monsters,
            Side::Monsters => Side::Heroes,
        }
    }

    /// Direction an attacker steps toward the enemy line
    pub fn advance_sign(self) -> i8 {
        match self {
            Side::Heroes => 1,
            Side::Monsters => -1,
        }
    }

    /// Winner banner text
    pub fn victory_text(self) -> &'static str {
        match self {
            Side::Heroes => "Heroes win!",
            Side::Monsters => "Monsters win!",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Heroes => write!(f, "heroes"),
            Side::Monsters => write!(f, "monsters"),
        }
    }
}

/// Action table a combatant draws from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Front-liner that can force monster targeting onto itself
    Taunter,
    /// Caster with a two-target ability
    Burst,
    /// Attacks or heals
    #[default]
    Striker,
}

/// Inclusive damage range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRange {
    pub min: u32,
    pub max: u32,
}

impl AttackRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Stable reference to a roster slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatantId {
    pub side: Side,
    pub index: usize,
}

impl CombatantId {
    pub fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }
}

/// One hero or monster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Combatant {
    name: String,
    glyph: String,
    role: Role,
    side: Side,
    hp: u32,
    max_hp: u32,
    attack: AttackRange,
    status: StatusSet,
}

impl Combatant {
    /// Create a combatant at full health
    ///
    /// `max_hp` is raised to 1 and an inverted range is reordered so the
    /// bounds invariants hold; roster definitions reject both up front.
    pub fn new(
        name: impl Into<String>,
        glyph: impl Into<String>,
        side: Side,
        max_hp: u32,
        attack: AttackRange,
    ) -> Self {
        let max_hp = max_hp.max(1);
        let attack = AttackRange::new(attack.min.min(attack.max), attack.min.max(attack.max));
        Self {
            name: name.into(),
            glyph: glyph.into(),
            role: Role::Striker,
            side,
            hp: max_hp,
            max_hp,
            attack,
            status: StatusSet::default(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Start below full health (clamped to `max_hp`)
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp.min(self.max_hp);
        self
    }

    pub fn with_status(mut self, status: StatusSet) -> Self {
        self.status = status;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn attack(&self) -> AttackRange {
        self.attack
    }

    pub fn status(&self) -> &StatusSet {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusSet {
        &mut self.status
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Lose hp, flooring at 0; returns true if this killed the combatant
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.is_alive();
        self.hp = self.hp.saturating_sub(amount);
        was_alive && !self.is_alive()
    }

    /// Heal (cannot exceed max_hp); returns hp actually restored
    pub fn heal(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.max_hp - self.hp);
        self.hp += actual;
        actual
    }

    /// Turn-start status tick
    pub fn begin_turn(&mut self) -> TickReport {
        effects::begin_turn(&mut self.hp, self.max_hp, &mut self.status)
    }

    /// "Name: hp/max" panel line
    pub fn panel_line(&self) -> String {
        format!("{}: {}/{}", self.name, self.hp, self.max_hp)
    }
}

/// Ordered combatants for one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    side: Side,
    members: Vec<Combatant>,
}

impl Roster {
    pub fn new(side: Side, members: Vec<Combatant>) -> Self {
        Self { side, members }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Combatant> {
        self.members.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.members.iter()
    }

    /// Ids of living members in roster order
    pub fn living(&self) -> Vec<CombatantId> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive())
            .map(|(index, _)| CombatantId::new(self.side, index))
            .collect()
    }

    pub fn living_count(&self) -> usize {
        self.members.iter().filter(|c| c.is_alive()).count()
    }

    pub fn panel_lines(&self) -> Vec<String> {
        self.members.iter().map(Combatant::panel_line).collect()
    }
}

/// Everything a single battle owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleState {
    heroes: Roster,
    monsters: Roster,
    round: u32,
    taunt_target: Option<CombatantId>,
}

impl BattleState {
    /// Build a battle from two lists of combatants; sides are reassigned
    /// to match the list each combatant sits in
    pub fn new(heroes: Vec<Combatant>, monsters: Vec<Combatant>) -> Self {
        let tag = |side: Side, members: Vec<Combatant>| -> Vec<Combatant> {
            members
                .into_iter()
                .map(|mut c| {
                    c.side = side;
                    c
                })
                .collect()
        };
        Self {
            heroes: Roster::new(Side::Heroes, tag(Side::Heroes, heroes)),
            monsters: Roster::new(Side::Monsters, tag(Side::Monsters, monsters)),
            round: 1,
            taunt_target: None,
        }
    }

    pub fn roster(&self, side: Side) -> &Roster {
        match side {
            Side::Heroes => &self.heroes,
            Side::Monsters => &self.monsters,
        }
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.roster(id.side).get(id.index)
    }

    pub(crate) fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        let roster = match id.side {
            Side::Heroes => &mut self.heroes,
            Side::Monsters => &mut self.monsters,
        };
        roster.members.get_mut(id.index)
    }

    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.combatant(id).is_some_and(Combatant::is_alive)
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn taunt_target(&self) -> Option<CombatantId> {
        self.taunt_target
    }

    pub(crate) fn set_taunt_target(&mut self, id: CombatantId) {
        if self.is_alive(id) {
            self.taunt_target = Some(id);
        }
    }

    /// Drop the taunt override if it points at `id`
    pub(crate) fn release_taunt(&mut self, id: CombatantId) {
        if self.taunt_target == Some(id) {
            self.taunt_target = None;
        }
    }

    /// Close out a round: taunt expires and the counter advances
    pub(crate) fn finish_round(&mut self) {
        self.taunt_target = None;
        self.round += 1;
    }

    /// Side with no living members, checked heroes first
    pub fn defeated_side(&self) -> Option<Side> {
        Side::PHASES
            .into_iter()
            .find(|side| self.roster(*side).living_count() == 0)
    }

    /// Living combatants for display: heroes then monsters, roster order
    pub fn initiative_order(&self) -> Vec<CombatantId> {
        let mut order = self.heroes.living();
        order.extend(self.monsters.living());
        order
    }

    /// Every combatant id, heroes first
    pub fn all_ids(&self) -> Vec<CombatantId> {
        Side::PHASES
            .into_iter()
            .flat_map(|side| {
                (0..self.roster(side).len()).map(move |index| CombatantId::new(side, index))
            })
            .collect()
    }
}
