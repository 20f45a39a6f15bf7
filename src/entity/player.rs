//! The auto-running player.

use std::mem;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use tracing::{debug, trace};

use crate::config::GameOptions;
use crate::entity::{Frame, GameEntity, PowerUpKind};
use crate::physics::Body;
use crate::presentation::{Cue, Effect, Sound};

/// Vertical part of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPhase {
    Ascending,
    Descending,
}

/// Why the player stopped for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    ExitReached,
    Killed,
}

/// Movement state of the player.
///
/// The speed boost is tracked separately because a Speed pickup while flying still arms the boost
/// timer without changing the flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Waiting for the level to start; held in place horizontally.
    Idle,
    Running,
    Flying(FlightPhase),
    Ended(EndCause),
}

/// The player's state as seen from outside, with the speed boost folded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Running,
    Speeding,
    Flying(FlightPhase),
    Ended(EndCause),
}

#[derive(Debug)]
pub struct Player {
    body: Body,
    motion: Motion,
    is_speed: bool,
    speed_started_at: Duration,
    options: Rc<GameOptions>,
    cues: Vec<Cue>,
}

impl Player {
    /// Creates an idle player with its body's top-left corner at `position`.
    pub fn new(options: Rc<GameOptions>, position: Vec2, now: Duration) -> Self {
        let mut body = Body::dynamic(position, options.player_size);
        body.collide_world_bounds = true;

        Self {
            body,
            motion: Motion::Idle,
            is_speed: false,
            // Pretend the last boost expired long ago so the timer is valid from the start.
            speed_started_at: now.saturating_sub(options.speed_duration()),
            options,
            cues: vec![Cue::Animate("player-idle")],
        }
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// `Speeding` means the speed timer is armed. A Speed pickup collected mid-air arms it without
    /// a boost, so a landed player can report `Speeding` while running at the base speed.
    pub fn state(&self) -> PlayerState {
        match self.motion {
            Motion::Ended(cause) => PlayerState::Ended(cause),
            Motion::Flying(phase) => PlayerState::Flying(phase),
            _ if self.is_speed => PlayerState::Speeding,
            Motion::Idle => PlayerState::Idle,
            Motion::Running => PlayerState::Running,
        }
    }

    pub fn is_flying(&self) -> bool {
        matches!(self.motion, Motion::Flying(_))
    }

    pub fn is_speed(&self) -> bool {
        self.is_speed
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.motion, Motion::Ended(_))
    }

    pub fn speed_started_at(&self) -> Duration {
        self.speed_started_at
    }

    /// Leaves the idle state and starts running. Does nothing in any other state.
    pub fn start_running(&mut self) {
        if self.motion != Motion::Idle {
            return;
        }
        self.motion = Motion::Running;
        self.body.velocity.x = self.options.player_speed;
        self.cues.push(Cue::Animate("player-run"));
    }

    /// Applies the effect of a collected power-up.
    pub fn apply(&mut self, kind: PowerUpKind, now: Duration) {
        if self.is_ended() {
            return;
        }
        debug!(%kind, motion = ?self.motion, "Player received power-up");
        match kind {
            PowerUpKind::Fly => self.fly(),
            PowerUpKind::Speed => self.speed(now),
            PowerUpKind::Shoot => self.shoot(),
        }
    }

    /// Launches the player up and forward. An active speed boost is converted into extra height.
    pub fn fly(&mut self) {
        if self.is_ended() {
            return;
        }

        let options = &self.options;
        let mut vertical = -options.player_fly_speed.y;
        if self.is_speed {
            self.is_speed = false;
            vertical -= options.player_speed_speed.y;
            self.cues.push(Cue::Particles(Effect::Speed, false));
        }

        self.body
            .set_velocity(options.player_speed + options.player_fly_speed.x, vertical);
        self.motion = Motion::Flying(FlightPhase::Ascending);

        self.cues.push(Cue::Animate("player-fly"));
        self.cues.push(Cue::PlaySound(Sound::Fly));
        self.cues.push(Cue::Particles(Effect::Fly, true));
    }

    /// Arms the speed boost. While flying, only the timer and flag change.
    pub fn speed(&mut self, now: Duration) {
        if self.is_ended() {
            return;
        }

        if !self.is_flying() {
            self.body.velocity.x = self.options.player_speed + self.options.player_speed_speed.x;
            self.cues.push(Cue::Animate("player-speed"));
            self.cues.push(Cue::Particles(Effect::Speed, true));
        }

        self.is_speed = true;
        self.speed_started_at = now;
        self.cues.push(Cue::PlaySound(Sound::Speed));
    }

    /// Shooting has no gameplay effect yet.
    pub fn shoot(&mut self) {
        trace!("Shoot power-up collected");
    }

    /// Stops the player for good. Later calls are ignored.
    pub fn end(&mut self, cause: EndCause) {
        if self.is_ended() {
            return;
        }
        debug!(?cause, "Player ended");

        if self.is_flying() {
            self.cues.push(Cue::StopSound(Sound::Fly));
            self.cues.push(Cue::Particles(Effect::Fly, false));
        }
        if self.is_speed {
            self.cues.push(Cue::Particles(Effect::Speed, false));
        }

        self.motion = Motion::Ended(cause);
        self.is_speed = false;
        self.body.stop();
        self.body.allow_gravity = false;
        self.body.enabled = false;

        match cause {
            EndCause::Killed => {
                self.cues.push(Cue::Animate("player-dead"));
                self.cues.push(Cue::PlaySound(Sound::Dead));
            }
            EndCause::ExitReached => self.cues.push(Cue::Animate("player-idle")),
        }
    }

    fn back_to_running(&mut self) {
        self.motion = Motion::Running;
        self.body.velocity.x = self.options.player_speed;
        self.cues.push(Cue::Animate("player-run"));
    }
}

impl GameEntity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, frame: &Frame) {
        let grounded = self.body.blocked_down();
        let vertical = self.body.velocity.y;

        match self.motion {
            Motion::Ended(_) => return,
            Motion::Idle => self.body.velocity.x = 0.0,
            Motion::Flying(FlightPhase::Ascending) if vertical > 0.0 && !grounded => {
                self.motion = Motion::Flying(FlightPhase::Descending);
                self.cues.push(Cue::StopSound(Sound::Fly));
                self.cues.push(Cue::Particles(Effect::Fly, false));
            }
            _ => {}
        }

        if let Motion::Flying(phase) = self.motion {
            if grounded && vertical >= 0.0 {
                if phase == FlightPhase::Ascending {
                    self.cues.push(Cue::StopSound(Sound::Fly));
                    self.cues.push(Cue::Particles(Effect::Fly, false));
                }
                trace!("Player landed");
                self.back_to_running();
            }
        }

        if self.is_speed && grounded && frame.now > self.speed_started_at + self.options.speed_duration() {
            trace!("Speed boost expired");
            self.is_speed = false;
            self.cues.push(Cue::Particles(Effect::Speed, false));
            if self.motion == Motion::Running {
                self.back_to_running();
            }
        }
    }

    fn is_active(&self) -> bool {
        !self.is_ended()
    }

    fn take_cues(&mut self) -> Vec<Cue> {
        mem::take(&mut self.cues)
    }
}
