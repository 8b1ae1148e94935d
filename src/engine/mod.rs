//! Turn scheduler
//!
//! Drives one battle to completion on a single task:
//! - Rounds run heroes then monsters, each side in roster order
//! - Every actor ticks its status effects before acting
//! - Actions resolve synchronously; their presentation is then paced by
//!   speed-scaled delays
//! - Pause is honored only between actors, so no action is ever left
//!   half-presented
//! - A restart invalidates the battle at its next suspension point

mod control;

pub use control::{scaled_delay, validate_speed, ControlHandle, ControlSurface, MIN_SPEED};

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::combat::{
    take_turn, AttackReport, BattleState, CombatantId, HealReport, RngSource, Side, TickReport,
    TurnAction,
};
use crate::config::TimingConfig;
use crate::error::Interrupted;
use crate::render::{Renderer, ViewHandle};

/// Result of a finished battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleOutcome {
    pub winner: Side,
    /// Round in which the battle ended
    pub rounds: u32,
    /// Final state, dead combatants included
    pub state: BattleState,
}

/// Owns one battle and its presentation
pub struct Engine<R> {
    id: Uuid,
    state: BattleState,
    rng: Box<dyn RngSource + Send>,
    renderer: R,
    controls: ControlHandle,
    timing: TimingConfig,
    hero_views: Vec<ViewHandle>,
    monster_views: Vec<ViewHandle>,
    initiative: VecDeque<CombatantId>,
}

impl<R: Renderer> Engine<R> {
    /// Create a new engine for a freshly built battle
    pub fn new(
        state: BattleState,
        rng: Box<dyn RngSource + Send>,
        renderer: R,
        controls: ControlHandle,
        timing: TimingConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            state,
            rng,
            renderer,
            controls,
            timing,
            hero_views: Vec::new(),
            monster_views: Vec::new(),
            initiative: VecDeque::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// Run until one side is wiped out or the battle is superseded
    pub async fn run(self) -> Result<BattleOutcome, Interrupted> {
        let span = info_span!("battle", id = %self.id);
        self.drive().instrument(span).await
    }

    async fn drive(mut self) -> Result<BattleOutcome, Interrupted> {
        info!(
            heroes = self.state.roster(Side::Heroes).len(),
            monsters = self.state.roster(Side::Monsters).len(),
            "battle started"
        );
        self.create_views();

        loop {
            self.begin_round();

            for side in Side::PHASES {
                for index in 0..self.state.roster(side).len() {
                    let actor = CombatantId::new(side, index);
                    if let Some(winner) = self.actor_turn(actor).await? {
                        return Ok(self.finish(winner));
                    }
                }
            }

            if let Some(winner) = self.mutual_defeat() {
                return Ok(self.finish(winner));
            }
            self.state.finish_round();
            self.controls.pause_for(self.timing.round_yield()).await?;
        }
    }

    /// Winner when both rosters are wiped out by the end of a round
    ///
    /// No living actor is left to see the empty opposing roster, so the
    /// heroes' phase, evaluated first, takes it.
    fn mutual_defeat(&self) -> Option<Side> {
        let wiped = Side::PHASES
            .into_iter()
            .all(|side| self.state.roster(side).living_count() == 0);
        wiped.then_some(Side::Heroes)
    }

    /// One actor's slot in the turn order; returns the winner if the actor
    /// found no enemies left
    async fn actor_turn(&mut self, actor: CombatantId) -> Result<Option<Side>, Interrupted> {
        if !self.controls.is_running() {
            debug!("paused before {:?}", actor);
        }
        self.controls.wait_until_running().await?;

        if !self.state.is_alive(actor) {
            self.pop_initiative(actor);
            return Ok(None);
        }

        let Some(tick) = self.state.combatant_mut(actor).map(|c| c.begin_turn()) else {
            return Ok(None);
        };
        self.present_tick(actor, &tick);
        if tick.died {
            self.pop_initiative(actor);
            self.refresh_panels();
            self.controls.pause_for(self.timing.inter_actor()).await?;
            return Ok(None);
        }

        if self.state.roster(actor.side.opponent()).living_count() == 0 {
            return Ok(Some(actor.side));
        }

        if let Some(action) = take_turn(&mut self.state, actor, self.rng.as_mut()) {
            self.present_action(&action).await?;
        }

        self.refresh_panels();
        self.pop_initiative(actor);
        self.controls.pause_for(self.timing.inter_actor()).await?;
        Ok(None)
    }

    fn create_views(&mut self) {
        for id in self.state.all_ids() {
            let Some(combatant) = self.state.combatant(id) else {
                continue;
            };
            let handle = self.renderer.create_view(combatant);
            match id.side {
                Side::Heroes => self.hero_views.push(handle),
                Side::Monsters => self.monster_views.push(handle),
            }
        }
    }

    fn view(&self, id: CombatantId) -> Option<ViewHandle> {
        match id.side {
            Side::Heroes => self.hero_views.get(id.index).copied(),
            Side::Monsters => self.monster_views.get(id.index).copied(),
        }
    }

    fn name(&self, id: CombatantId) -> String {
        self.state
            .combatant(id)
            .map(|c| c.name().to_string())
            .unwrap_or_default()
    }

    fn begin_round(&mut self) {
        let round = self.state.round();
        debug!(round, "round started");
        self.renderer.update_round_label(round);
        self.refresh_panels();
        self.initiative = self.state.initiative_order().into();
        self.show_initiative();
    }

    fn refresh_panels(&mut self) {
        for side in Side::PHASES {
            let lines = self.state.roster(side).panel_lines();
            self.renderer.update_panel(side, &lines);
        }
    }

    fn show_initiative(&mut self) {
        let order: Vec<ViewHandle> = self
            .initiative
            .iter()
            .filter_map(|id| self.view(*id))
            .collect();
        self.renderer.update_initiative_display(&order);
    }

    /// Drop an actor's slot from the displayed turn order
    fn pop_initiative(&mut self, actor: CombatantId) {
        self.initiative.retain(|id| *id != actor);
        self.show_initiative();
    }

    fn present_tick(&mut self, actor: CombatantId, tick: &TickReport) {
        let Some(view) = self.view(actor) else {
            return;
        };
        let Some(combatant) = self.state.combatant(actor) else {
            return;
        };

        if let Some(amount) = tick.poison_damage {
            self.renderer.update_view(
                view,
                combatant.hp(),
                combatant.max_hp(),
                combatant.status(),
            );
            self.renderer.show_floating_number(view, amount, false);
            self.renderer.append_log_line(&format!(
                "{} suffers {} poison. {}/{}",
                combatant.name(),
                amount,
                combatant.hp(),
                combatant.max_hp()
            ));
            if tick.died {
                self.renderer.mark_dead(view);
            }
        }

        if tick.enraged {
            self.renderer.update_view(
                view,
                combatant.hp(),
                combatant.max_hp(),
                combatant.status(),
            );
            self.renderer
                .append_log_line(&format!("{} enters Rage!", combatant.name()));
        }
    }

    async fn present_action(&mut self, action: &TurnAction) -> Result<(), Interrupted> {
        match action {
            TurnAction::Taunt { actor } => {
                let text = format!("{} uses Taunt!", self.name(*actor));
                self.renderer.append_log_line(&text);
            }
            TurnAction::Burst { actor, hits } => {
                let text = format!("{} casts Fireball!", self.name(*actor));
                self.renderer.append_log_line(&text);
                for hit in hits {
                    self.present_attack(hit).await?;
                }
            }
            TurnAction::Attack(report) => self.present_attack(report).await?,
            TurnAction::Heal(report) => self.present_heal(report).await?,
        }
        Ok(())
    }

    async fn present_attack(&mut self, report: &AttackReport) -> Result<(), Interrupted> {
        let (Some(source), Some(target)) = (self.view(report.attacker), self.view(report.target))
        else {
            return Ok(());
        };
        let attacker_name = self.name(report.attacker);
        let target_name = self.name(report.target);

        self.renderer
            .animate_advance(source, report.attacker.side.advance_sign());
        self.controls.pause_for(self.timing.step()).await?;

        self.renderer.show_attack_line(source, target);
        self.renderer.update_view(
            target,
            report.target_hp,
            report.target_max_hp,
            &report.target_status,
        );
        self.renderer
            .show_floating_number(target, report.damage, false);
        if report.critical {
            self.renderer.show_crit_indicator(target);
        }
        if report.absorbed > 0 {
            self.renderer.append_log_line(&format!(
                "{}'s shield absorbs {}.",
                target_name, report.absorbed
            ));
        }
        if report.poisoned {
            self.renderer
                .append_log_line(&format!("{} is poisoned!", target_name));
        }
        if report.killed {
            self.renderer.mark_dead(target);
        }
        self.renderer.append_log_line(&format!(
            "{} hits {} for {} dmg{}. {} {}/{}",
            attacker_name,
            target_name,
            report.damage,
            if report.critical { " (CRIT!)" } else { "" },
            target_name,
            report.target_hp,
            report.target_max_hp
        ));

        self.controls.pause_for(self.timing.step()).await?;
        self.renderer.animate_advance(source, 0);
        self.controls.pause_for(self.timing.step()).await
    }

    async fn present_heal(&mut self, report: &HealReport) -> Result<(), Interrupted> {
        let Some(view) = self.view(report.actor) else {
            return Ok(());
        };
        let mut text = format!(
            "{} heals for {}. {}/{}",
            self.name(report.actor),
            report.amount,
            report.hp,
            report.max_hp
        );
        if let Some(shield) = report.shield_gained {
            text.push_str(&format!(" and gains {} shield", shield));
        }

        self.renderer
            .update_view(view, report.hp, report.max_hp, &report.status);
        self.renderer.show_floating_number(view, report.amount, true);
        self.renderer.append_log_line(&text);
        self.controls.pause_for(self.timing.step()).await
    }

    fn finish(mut self, winner: Side) -> BattleOutcome {
        let rounds = self.state.round();
        self.renderer.show_winner_banner(winner.victory_text());
        info!(%winner, rounds, "battle finished");
        BattleOutcome {
            winner,
            rounds,
            state: self.state,
        }
    }
}
