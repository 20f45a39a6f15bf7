//! Gameplay tuning.
//!
//! Changing these values affects gameplay. Defaults are compiled in; any scalar field can be
//! overridden through `POWERUP_`-prefixed environment variables (e.g. `POWERUP_PLAYER_SPEED=260`).

use std::time::Duration;

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GameResult;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "POWERUP_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Width and height of the game view, in pixels.
    pub game_width: f32,
    pub game_height: f32,

    /// Downward acceleration applied to bodies with gravity, in px/s².
    pub gravity: f32,

    /// Horizontal running speed.
    pub player_speed: f32,
    /// Velocity added by a Fly pickup: `x` on top of the running speed, `y` upwards.
    pub player_fly_speed: Vec2,
    /// Speed pickup bonus: `x` on top of the running speed, `y` extra jump when Fly follows Speed.
    pub player_speed_speed: Vec2,
    /// How long a Speed pickup lasts, in milliseconds.
    pub player_speed_time_ms: u64,
    pub player_size: Vec2,
    /// Used when a level has no `Start` object.
    pub player_start: Vec2,

    /// Backward speed of a power-up once it has landed.
    pub power_up_speed: f32,
    pub power_up_size: Vec2,

    /// Time all power-up buttons stay disabled after any of them is pressed, in milliseconds.
    pub button_cooldown_ms: u64,
    /// Clickable area of a power-up button, larger than its icon.
    pub button_hit_area: Vec2,
    /// Screen position of the spawner platform.
    pub spawner_position: Vec2,

    /// Vertical travel of a bat above and below its spawn point.
    pub bat_up_down: f32,
    pub bat_speed: f32,

    /// Distance between the left edge of the view and the followed player.
    pub camera_left_offset: f32,
    pub fade_duration_ms: u64,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            game_width: 1140.0,
            game_height: 540.0,
            gravity: 3000.0,
            player_speed: 200.0,
            player_fly_speed: Vec2::new(100.0, 1000.0),
            player_speed_speed: Vec2::new(200.0, 300.0),
            player_speed_time_ms: 2000,
            player_size: Vec2::new(24.0, 22.0),
            player_start: Vec2::new(64.0, 300.0),
            power_up_speed: 100.0,
            power_up_size: Vec2::new(24.0, 24.0),
            button_cooldown_ms: 1000,
            button_hit_area: Vec2::new(120.0, 90.0),
            spawner_position: Vec2::new(570.0, 60.0),
            bat_up_down: 32.0,
            bat_speed: 50.0,
            camera_left_offset: 64.0,
            fade_duration_ms: 500,
        }
    }
}

impl GameOptions {
    /// The figment used by [`GameOptions::load`]: compiled defaults overlaid with the environment.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(GameOptions::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> GameResult<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> GameResult<Self> {
        figment.extract().map_err(|e| Box::new(e).into())
    }

    pub fn speed_duration(&self) -> Duration {
        Duration::from_millis(self.player_speed_time_ms)
    }

    pub fn button_cooldown(&self) -> Duration {
        Duration::from_millis(self.button_cooldown_ms)
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }

    pub fn view_size(&self) -> Vec2 {
        Vec2::new(self.game_width, self.game_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_figment() {
        let options = GameOptions::from_figment(Figment::from(Serialized::defaults(GameOptions::default()))).unwrap();
        assert_eq!(options, GameOptions::default());
    }

    #[test]
    fn test_env_override() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("POWERUP_PLAYER_SPEED", 260);
            jail.set_env("POWERUP_BUTTON_COOLDOWN_MS", 250);

            let options = GameOptions::load().expect("options should load");
            assert_eq!(options.player_speed, 260.0);
            assert_eq!(options.button_cooldown(), Duration::from_millis(250));
            assert_eq!(options.gravity, GameOptions::default().gravity);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_override_is_reported() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("POWERUP_PLAYER_SPEED", "fast");
            assert!(GameOptions::load().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_durations() {
        let options = GameOptions::default();
        assert_eq!(options.speed_duration(), Duration::from_secs(2));
        assert_eq!(options.button_cooldown(), Duration::from_secs(1));
        assert_eq!(options.fade_duration(), Duration::from_millis(500));
    }
}
