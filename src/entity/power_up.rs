//! Collectible power-ups dropped from the spawner.

use std::mem;

use glam::Vec2;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::trace;

use crate::config::GameOptions;
use crate::constants::frames;
use crate::entity::{Frame, GameEntity};
use crate::events::BusEvent;
use crate::physics::Body;
use crate::presentation::{Cue, Sound};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
pub enum PowerUpKind {
    Fly,
    Speed,
    Shoot,
}

impl PowerUpKind {
    /// Sprite frame of the button icon.
    pub fn icon_frame(self) -> u32 {
        match self {
            PowerUpKind::Fly => frames::ICON_FLY,
            PowerUpKind::Speed => frames::ICON_SPEED,
            PowerUpKind::Shoot => frames::ICON_SHOOT,
        }
    }

    /// Position of this kind's button in the UI column, top to bottom.
    pub fn slot(self) -> usize {
        match self {
            PowerUpKind::Fly => 0,
            PowerUpKind::Speed => 1,
            PowerUpKind::Shoot => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpState {
    /// Dropping from the spawner and keeping pace with the scrolling view.
    Falling,
    /// Landed; rolls backwards at a fixed speed.
    RollingWithScroll,
    PickedUp,
}

#[derive(Debug)]
pub struct PowerUp {
    kind: PowerUpKind,
    body: Body,
    state: PowerUpState,
    destroyed: bool,
    roll_speed: f32,
    cues: Vec<Cue>,
}

impl PowerUp {
    /// Creates a falling power-up centred on `center` (world coordinates).
    pub fn new(kind: PowerUpKind, center: Vec2, options: &GameOptions) -> Self {
        let mut body = Body::dynamic(center - options.power_up_size * 0.5, options.power_up_size);
        body.velocity.x = options.player_speed;

        Self {
            kind,
            body,
            state: PowerUpState::Falling,
            destroyed: false,
            roll_speed: options.power_up_speed,
            cues: Vec::new(),
        }
    }

    pub fn kind(&self) -> PowerUpKind {
        self.kind
    }

    pub fn state(&self) -> PowerUpState {
        self.state
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Collects the power-up and returns the event announcing it.
    ///
    /// Returns `None` if it was already collected or destroyed.
    pub fn pick_up(&mut self) -> Option<BusEvent> {
        if self.destroyed || self.state == PowerUpState::PickedUp {
            return None;
        }

        self.state = PowerUpState::PickedUp;
        self.cues.push(Cue::PlaySound(Sound::Pickup));
        self.destroy();
        Some(BusEvent::PowerUpPickedUp(self.kind))
    }

    /// Removes the power-up from play without collecting it.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.on_destroy();
    }
}

impl GameEntity for PowerUp {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, frame: &Frame) {
        if self.destroyed || self.state != PowerUpState::Falling {
            return;
        }

        if self.body.blocked_down() {
            trace!(kind = %self.kind, "Power-up landed");
            self.state = PowerUpState::RollingWithScroll;
            self.body.velocity.x = -self.roll_speed;
        } else if frame.scroll.view_at_world_edge {
            self.body.velocity.x = 0.0;
        } else {
            self.body.velocity.x = frame.scroll.player_velocity_x;
        }
    }

    fn on_destroy(&mut self) {
        self.body.stop();
        self.body.enabled = false;
    }

    fn is_active(&self) -> bool {
        !self.destroyed
    }

    fn take_cues(&mut self) -> Vec<Cue> {
        mem::take(&mut self.cues)
    }
}
