//! Pause, speed and restart signals
//!
//! The host owns a [`ControlSurface`]; every battle holds a
//! [`ControlHandle`] subscribed to it:
//! - `running` gates the start of each actor's turn
//! - `speed` divides every presentation delay
//! - `generation` is bumped on restart; a handle whose token no longer
//!   matches stops at its next suspension point

use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use crate::error::{ControlError, Interrupted};

/// Slowest accepted multiplier; stretches every delay at most a hundredfold
pub const MIN_SPEED: f64 = 0.01;

/// Accept only finite multipliers of at least [`MIN_SPEED`]
pub fn validate_speed(speed: f64) -> Result<f64, ControlError> {
    if speed.is_finite() && speed >= MIN_SPEED {
        Ok(speed)
    } else {
        Err(ControlError::InvalidSpeed(speed))
    }
}

/// Scale a base delay by `1 / speed`, with speed floored at [`MIN_SPEED`]
pub fn scaled_delay(base: Duration, speed: f64) -> Duration {
    let speed = speed.max(MIN_SPEED);
    Duration::try_from_secs_f64(base.as_secs_f64() / speed).unwrap_or(Duration::MAX)
}

/// Sending side of the battle controls
#[derive(Debug)]
pub struct ControlSurface {
    running: watch::Sender<bool>,
    speed: watch::Sender<f64>,
    generation: watch::Sender<u64>,
}

impl ControlSurface {
    /// Create a new control surface
    pub fn new(speed: f64, running: bool) -> Result<Self, ControlError> {
        let speed = validate_speed(speed)?;
        let (running, _) = watch::channel(running);
        let (speed, _) = watch::channel(speed);
        let (generation, _) = watch::channel(0);
        Ok(Self {
            running,
            speed,
            generation,
        })
    }

    pub fn set_running(&self, running: bool) {
        let previous = self.running.send_replace(running);
        if previous != running {
            info!(running, "{}", if running { "resumed" } else { "paused" });
        }
    }

    /// Flip the running flag; returns the new value
    pub fn toggle(&self) -> bool {
        let running = !self.is_running();
        self.set_running(running);
        running
    }

    /// Change the speed multiplier
    ///
    /// Applies from the next delay onward; a delay already in progress keeps
    /// its length. Invalid values leave the current speed untouched.
    pub fn set_speed(&self, speed: f64) -> Result<(), ControlError> {
        let speed = validate_speed(speed)?;
        self.speed.send_replace(speed);
        info!(speed, "speed changed");
        Ok(())
    }

    pub fn speed(&self) -> f64 {
        *self.speed.borrow()
    }

    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Invalidate every handle subscribed so far
    pub fn bump_generation(&self) -> u64 {
        self.generation.send_modify(|g| *g += 1);
        self.generation()
    }

    /// Subscribe a handle bound to the current generation
    pub fn subscribe(&self) -> ControlHandle {
        ControlHandle {
            running: self.running.subscribe(),
            speed: self.speed.subscribe(),
            generation: self.generation.subscribe(),
            token: self.generation(),
        }
    }
}

/// Receiving side held by one battle
#[derive(Debug, Clone)]
pub struct ControlHandle {
    running: watch::Receiver<bool>,
    speed: watch::Receiver<f64>,
    generation: watch::Receiver<u64>,
    token: u64,
}

impl ControlHandle {
    /// Generation this handle was issued for
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn is_current(&self) -> bool {
        *self.generation.borrow() == self.token
    }

    pub fn speed(&self) -> f64 {
        *self.speed.borrow()
    }

    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    fn check(&self) -> Result<(), Interrupted> {
        if self.is_current() {
            Ok(())
        } else {
            Err(Interrupted::Superseded)
        }
    }

    /// Suspend while paused
    pub async fn wait_until_running(&mut self) -> Result<(), Interrupted> {
        self.check()?;
        let token = self.token;
        tokio::select! {
            resumed = self.running.wait_for(|running| *running) => {
                resumed.map(|_| ()).map_err(|_| Interrupted::Detached)?;
            }
            changed = self.generation.wait_for(move |g| *g != token) => {
                return Err(match changed {
                    Ok(_) => Interrupted::Superseded,
                    Err(_) => Interrupted::Detached,
                });
            }
        }
        self.check()
    }

    /// Sleep `base / speed`, waking early on restart
    ///
    /// The speed is read once when the delay starts.
    pub async fn pause_for(&mut self, base: Duration) -> Result<(), Interrupted> {
        self.check()?;
        let delay = scaled_delay(base, self.speed());
        let token = self.token;
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            changed = self.generation.wait_for(move |g| *g != token) => {
                return Err(match changed {
                    Ok(_) => Interrupted::Superseded,
                    Err(_) => Interrupted::Detached,
                });
            }
        }
        self.check()
    }
}
