//! Arena host
//!
//! Owns the control surface and launches battles:
//! - Builds fresh combatants from roster definitions on every launch
//! - Asks the renderer factory for a fresh renderer per battle
//! - Restart invalidates the running battle, waits for it to stop, then
//!   launches a new one; pause and speed carry over

use std::marker::PhantomData;

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::combat::{RngSource, SeededRng};
use crate::config::Config;
use crate::engine::{BattleOutcome, ControlSurface, Engine};
use crate::error::{ArenaError, ControlError, Interrupted};
use crate::render::Renderer;
use crate::roster::RosterDefs;

/// Opening descriptions, one picked per battle
pub const ARENA_FLAVORS: [&str; 3] = [
    "The fight takes place in an abandoned ruin.",
    "A cool breeze sweeps across the battlefield.",
    "Thunder rumbles in the distance.",
];

/// Task running one battle
pub type BattleHandle = JoinHandle<Result<BattleOutcome, Interrupted>>;

/// Pick an arena description
pub fn arena_flavor<G: Rng>(rng: &mut G) -> &'static str {
    ARENA_FLAVORS[rng.random_range(0..ARENA_FLAVORS.len())]
}

/// Battle host
pub struct Arena<R, F> {
    config: Config,
    rosters: RosterDefs,
    controls: ControlSurface,
    factory: F,
    launches: u64,
    _renderer: PhantomData<fn() -> R>,
}

impl<R, F> Arena<R, F>
where
    R: Renderer + 'static,
    F: FnMut() -> R,
{
    /// Create a new arena from validated configuration
    pub fn new(config: Config, factory: F) -> Result<Self, ArenaError> {
        config.validate()?;
        let rosters = config.rosters();
        let controls = ControlSurface::new(config.speed, !config.start_paused)?;
        Ok(Self {
            config,
            rosters,
            controls,
            factory,
            launches: 0,
            _renderer: PhantomData,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn controls(&self) -> &ControlSurface {
        &self.controls
    }

    pub fn set_running(&self, running: bool) {
        self.controls.set_running(running);
    }

    /// Flip pause; returns true if now running
    pub fn toggle_running(&self) -> bool {
        self.controls.toggle()
    }

    pub fn set_speed(&self, speed: f64) -> Result<(), ControlError> {
        self.controls.set_speed(speed)
    }

    /// Random source for the next battle
    ///
    /// A configured seed is offset by the launch count so restarts do not
    /// replay the same fight.
    fn battle_rng(&self) -> Box<dyn RngSource + Send> {
        match self.config.seed {
            Some(seed) => Box::new(SeededRng::from_seed(seed.wrapping_add(self.launches))),
            None => Box::new(SeededRng::from_entropy()),
        }
    }

    /// Spawn a new battle
    pub fn launch(&mut self) -> Result<BattleHandle, ArenaError> {
        let state = self.rosters.build(self.config.tier)?;
        let rng = self.battle_rng();
        self.launches += 1;

        let mut renderer = (self.factory)();
        let flavor = arena_flavor(&mut rand::rng());
        renderer.append_log_line(flavor);

        let engine = Engine::new(
            state,
            rng,
            renderer,
            self.controls.subscribe(),
            self.config.timing,
        );
        info!(battle = %engine.id(), launch = self.launches, flavor, "battle launched");
        Ok(tokio::spawn(engine.run()))
    }

    /// Stop `previous` and launch a replacement
    pub async fn restart(&mut self, previous: BattleHandle) -> Result<BattleHandle, ArenaError> {
        let generation = self.controls.bump_generation();
        info!(generation, "restarting battle");

        match previous.await? {
            Ok(outcome) => debug!(winner = %outcome.winner, "previous battle had already ended"),
            Err(reason) => debug!(%reason, "previous battle stopped"),
        }
        self.launch()
    }
}
