//! Roster definitions
//!
//! Static, deserializable descriptions of both sides. A battle is built
//! fresh from these on every launch and restart.

use serde::{Deserialize, Serialize};

use crate::combat::{AttackRange, BattleState, Combatant, Role, Side};
use crate::error::RosterError;

/// Template for one combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantDef {
    pub name: String,
    pub glyph: String,
    pub max_hp: u32,
    pub attack: AttackRange,
    #[serde(default)]
    pub role: Role,
}

impl CombatantDef {
    pub fn new(name: &str, glyph: &str, max_hp: u32, attack: AttackRange) -> Self {
        Self {
            name: name.to_string(),
            glyph: glyph.to_string(),
            max_hp,
            attack,
            role: Role::Striker,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    fn validate(&self, slot: usize, side: Side) -> Result<(), RosterError> {
        if self.name.trim().is_empty() {
            return Err(RosterError::EmptyName(slot));
        }
        if self.max_hp == 0 {
            return Err(RosterError::ZeroHp(self.name.clone()));
        }
        if self.attack.min > self.attack.max {
            return Err(RosterError::InvertedRange {
                name: self.name.clone(),
                min: self.attack.min,
                max: self.attack.max,
            });
        }
        if side == Side::Monsters && self.role == Role::Taunter {
            return Err(RosterError::MonsterTaunter(self.name.clone()));
        }
        Ok(())
    }

    /// Apply encounter tier scaling to a monster
    ///
    /// Max hp grows 5% per tier above 1 (rounded down, at least 1). On odd
    /// tiers a striker's minimum attack rises by 1, never past its maximum.
    fn scaled(&self, tier: u32) -> Self {
        let percent = 100 + 5 * u64::from(tier.saturating_sub(1));
        let max_hp = (u64::from(self.max_hp) * percent / 100).clamp(1, u64::from(u32::MAX)) as u32;

        let mut attack = self.attack;
        if tier % 2 == 1 && self.role == Role::Striker {
            attack.min = (attack.min + 1).min(attack.max);
        }

        Self {
            max_hp,
            attack,
            ..self.clone()
        }
    }

    fn build(&self, side: Side) -> Combatant {
        Combatant::new(&self.name, &self.glyph, side, self.max_hp, self.attack).with_role(self.role)
    }
}

/// Both sides of an encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterDefs {
    pub heroes: Vec<CombatantDef>,
    pub monsters: Vec<CombatantDef>,
}

impl Default for RosterDefs {
    fn default() -> Self {
        Self::standard()
    }
}

impl RosterDefs {
    /// Warrior and Mage against Goblin and Orc
    pub fn standard() -> Self {
        Self {
            heroes: vec![
                CombatantDef::new("Warrior", "🛡️", 30, AttackRange::new(4, 8))
                    .with_role(Role::Taunter),
                CombatantDef::new("Mage", "🪄", 20, AttackRange::new(5, 10)).with_role(Role::Burst),
            ],
            monsters: vec![
                CombatantDef::new("Goblin", "👺", 15, AttackRange::new(3, 6)),
                CombatantDef::new("Orc", "🪓", 25, AttackRange::new(2, 7)),
            ],
        }
    }

    pub fn validate(&self) -> Result<(), RosterError> {
        for (side, defs) in [(Side::Heroes, &self.heroes), (Side::Monsters, &self.monsters)] {
            if defs.is_empty() {
                return Err(RosterError::Empty(match side {
                    Side::Heroes => "heroes",
                    Side::Monsters => "monsters",
                }));
            }
            for (slot, def) in defs.iter().enumerate() {
                def.validate(slot, side)?;
            }
        }
        Ok(())
    }

    /// Build a fresh battle, scaling monsters when a tier is given
    pub fn build(&self, tier: Option<u32>) -> Result<BattleState, RosterError> {
        self.validate()?;
        if tier == Some(0) {
            return Err(RosterError::InvalidTier);
        }

        let heroes = self.heroes.iter().map(|d| d.build(Side::Heroes)).collect();
        let monsters = self
            .monsters
            .iter()
            .map(|d| match tier {
                Some(tier) => d.scaled(tier).build(Side::Monsters),
                None => d.build(Side::Monsters),
            })
            .collect();
        Ok(BattleState::new(heroes, monsters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_roster() {
        let state = RosterDefs::standard().build(None).unwrap();
        let heroes = state.roster(Side::Heroes);
        assert_eq!(heroes.len(), 2);
        assert_eq!(heroes.get(0).unwrap().role(), Role::Taunter);
        assert_eq!(heroes.get(1).unwrap().role(), Role::Burst);

        let goblin = state.roster(Side::Monsters).get(0).unwrap();
        assert_eq!(goblin.name(), "Goblin");
        assert_eq!(goblin.hp(), 15);
        assert_eq!(goblin.attack(), AttackRange::new(3, 6));
        assert_eq!(state.round(), 1);
    }

    #[test]
    fn test_validation_errors() {
        let mut defs = RosterDefs::standard();
        defs.monsters.clear();
        assert_eq!(defs.validate(), Err(RosterError::Empty("monsters")));

        let mut defs = RosterDefs::standard();
        defs.heroes[1].max_hp = 0;
        assert_eq!(defs.validate(), Err(RosterError::ZeroHp("Mage".into())));

        let mut defs = RosterDefs::standard();
        defs.monsters[0].attack = AttackRange::new(6, 3);
        assert!(matches!(
            defs.build(None),
            Err(RosterError::InvertedRange { min: 6, max: 3, .. })
        ));

        let mut defs = RosterDefs::standard();
        defs.heroes[0].name = "  ".into();
        assert_eq!(defs.validate(), Err(RosterError::EmptyName(0)));

        let mut defs = RosterDefs::standard();
        defs.monsters[1].role = Role::Taunter;
        assert_eq!(defs.validate(), Err(RosterError::MonsterTaunter("Orc".into())));
    }

    #[test]
    fn test_tier_scaling() {
        let defs = RosterDefs::standard();

        // Tier 1: hp unchanged, odd tier bumps striker minimums
        let state = defs.build(Some(1)).unwrap();
        let goblin = state.roster(Side::Monsters).get(0).unwrap();
        assert_eq!(goblin.max_hp(), 15);
        assert_eq!(goblin.attack(), AttackRange::new(4, 6));

        // Tier 4: x1.15, even tier leaves attack alone
        let state = defs.build(Some(4)).unwrap();
        let monsters = state.roster(Side::Monsters);
        assert_eq!(monsters.get(0).unwrap().max_hp(), 17);
        assert_eq!(monsters.get(1).unwrap().max_hp(), 28);
        assert_eq!(monsters.get(1).unwrap().attack(), AttackRange::new(2, 7));

        // Heroes never scale
        assert_eq!(state.roster(Side::Heroes).get(0).unwrap().max_hp(), 30);

        assert_eq!(defs.build(Some(0)), Err(RosterError::InvalidTier));
    }

    #[test]
    fn test_tier_bump_caps_at_max() {
        let defs = RosterDefs {
            heroes: RosterDefs::standard().heroes,
            monsters: vec![CombatantDef::new("Rat", "🐀", 1, AttackRange::new(2, 2))],
        };
        let state = defs.build(Some(3)).unwrap();
        let rat = state.roster(Side::Monsters).get(0).unwrap();
        assert_eq!(rat.attack(), AttackRange::new(2, 2));
        assert_eq!(rat.max_hp(), 1);
    }

    #[test]
    fn test_deserialize_with_default_role() {
        let json = r#"{
            "heroes": [{"name": "Knight", "glyph": "K", "max_hp": 12, "attack": {"min": 1, "max": 4}, "role": "taunter"}],
            "monsters": [{"name": "Slime", "glyph": "S", "max_hp": 5, "attack": {"min": 1, "max": 2}}]
        }"#;
        let defs: RosterDefs = serde_json::from_str(json).unwrap();
        assert_eq!(defs.heroes[0].role, Role::Taunter);
        assert_eq!(defs.monsters[0].role, Role::Striker);
        assert!(defs.build(None).is_ok());
    }
}
