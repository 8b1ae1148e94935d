//! Common test utilities - BattleTest harness for driving engines end to end

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::Rng;
use skirmish::combat::{AttackRange, BattleState, Combatant, RngSource, Role, Side};
use skirmish::{
    BattleOutcome, ChannelRenderer, ControlSurface, Engine, Interrupted, RenderCall, RosterDefs,
    TimingConfig, ViewHandle,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// A spawned battle plus everything it has rendered so far
pub struct BattleTest {
    pub surface: ControlSurface,
    handle: Option<JoinHandle<Result<BattleOutcome, Interrupted>>>,
    rx: UnboundedReceiver<RenderCall>,
    seen: Vec<RenderCall>,
}

impl BattleTest {
    /// Spawn a running battle
    pub fn start(state: BattleState, rng: impl RngSource + Send + 'static, speed: f64) -> Self {
        Self::spawn(state, rng, speed, true)
    }

    /// Spawn a battle that waits for `set_running(true)`
    pub fn start_paused(state: BattleState, rng: impl RngSource + Send + 'static) -> Self {
        Self::spawn(state, rng, 1.0, false)
    }

    fn spawn(
        state: BattleState,
        rng: impl RngSource + Send + 'static,
        speed: f64,
        running: bool,
    ) -> Self {
        let surface = ControlSurface::new(speed, running).expect("valid speed");
        let (renderer, rx) = ChannelRenderer::pair();
        let engine = Engine::new(
            state,
            Box::new(rng),
            renderer,
            surface.subscribe(),
            TimingConfig::default(),
        );
        Self {
            surface,
            handle: Some(tokio::spawn(engine.run())),
            rx,
            seen: Vec::new(),
        }
    }

    /// Wait for the battle task to return
    pub async fn finish(&mut self) -> Result<BattleOutcome, Interrupted> {
        let handle = self.handle.take().expect("battle already finished");
        let result = handle.await.expect("battle task panicked");
        self.collect();
        result
    }

    /// Every call received so far
    pub fn calls(&mut self) -> &[RenderCall] {
        self.collect();
        &self.seen
    }

    fn collect(&mut self) {
        while let Ok(call) = self.rx.try_recv() {
            self.seen.push(call);
        }
    }

    pub fn logs(&mut self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|call| match call {
                RenderCall::Log { text } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// `(view, hp)` for every view update, in order
    pub fn hp_updates(&mut self) -> Vec<(ViewHandle, u32)> {
        self.calls()
            .iter()
            .filter_map(|call| match call {
                RenderCall::UpdateView { handle, hp, .. } => Some((*handle, *hp)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&mut self, pred: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls().iter().filter(|call| pred(call)).count()
    }
}

/// Warrior and Mage against Goblin and Orc
pub fn standard_state() -> BattleState {
    RosterDefs::standard().build(None).expect("standard rosters are valid")
}

/// Random rosters with positive attack ranges
pub fn random_state(rng: &mut StdRng, heroes: usize, monsters: usize) -> BattleState {
    let mut build = |side: Side, count: usize| -> Vec<Combatant> {
        (0..count)
            .map(|i| {
                let min = rng.random_range(1..=5);
                let max = min + rng.random_range(0..=6);
                Combatant::new(
                    format!("{}{}", side, i),
                    "*",
                    side,
                    rng.random_range(1..=40),
                    AttackRange::new(min, max),
                )
                .with_role(match (side, i) {
                    (Side::Heroes, 0) => Role::Taunter,
                    (Side::Heroes, 1) => Role::Burst,
                    _ => Role::Striker,
                })
            })
            .collect()
    };
    let heroes = build(Side::Heroes, heroes);
    let monsters = build(Side::Monsters, monsters);
    BattleState::new(heroes, monsters)
}
