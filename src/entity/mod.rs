//! Gameplay objects living inside one level.
//!
//! Every entity owns its physics [`Body`] and implements [`GameEntity`]; the level scene drives
//! them once per frame in a fixed order (player, power-ups, enemies).

use std::time::Duration;

use crate::physics::Body;
use crate::presentation::Cue;

pub mod enemy;
pub mod player;
pub mod power_up;
pub mod spawner;

pub use enemy::{Enemy, EnemyKind};
pub use player::{EndCause, FlightPhase, Motion, Player, PlayerState};
pub use power_up::{PowerUp, PowerUpKind, PowerUpState};
pub use spawner::Spawner;

/// How the view is scrolling this frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scroll {
    /// Horizontal velocity of the followed player.
    pub player_velocity_x: f32,
    /// The camera has reached the right edge of the world and stopped scrolling.
    pub view_at_world_edge: bool,
}

/// Per-frame input to [`GameEntity::update`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    /// Time since the clock's origin.
    pub now: Duration,
    /// Seconds since the previous frame.
    pub dt: f32,
    pub scroll: Scroll,
}

pub trait GameEntity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn update(&mut self, frame: &Frame);

    /// Called once when the entity is removed from the level.
    fn on_destroy(&mut self) {}

    fn is_active(&self) -> bool {
        true
    }

    /// Drains the presentation cues queued since the last call.
    fn take_cues(&mut self) -> Vec<Cue> {
        Vec::new()
    }
}
