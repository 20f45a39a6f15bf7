//! This module contains the fixed constants used in the game.
//!
//! Tunable values live in [`crate::config::GameOptions`]; the values here are part of the level
//! file format or the frame loop and are not meant to be changed at runtime.

use std::time::Duration;

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Title shown on the home screen.
pub const TITLE: &str = "POWER UP ADVENTURE";

/// Level file names are `level{n}.json`, starting at 1.
pub const LEVEL_FILE_PREFIX: &str = "level";
pub const LEVEL_FILE_EXTENSION: &str = "json";

/// Names of the layers and properties read from a level file.
pub mod layers {
    pub const PLATFORMS: &str = "Platforms";
    pub const EXIT: &str = "Exit";
    pub const ENEMIES: &str = "Enemies";
    pub const START: &str = "Start";
}

pub mod properties {
    pub const COLLIDES: &str = "collides";
    pub const FLY_NUMBER: &str = "flyNumber";
    pub const SPEED_NUMBER: &str = "speedNumber";
    pub const SHOOT_NUMBER: &str = "shootNumber";
    pub const INSTRUCTIONS: &str = "instructions";
}

/// Frame numbers of the button icons in the sprite sheet.
pub mod frames {
    pub const ICON_FLY: u32 = 87;
    pub const ICON_SPEED: u32 = 88;
    pub const ICON_SHOOT: u32 = 89;
}

/// Vertical position of each power-up button, as a fraction of the game height.
pub const BUTTON_ROWS: [f32; 3] = [0.25, 0.5, 0.75];
/// Horizontal position of the power-up buttons, as a fraction of the game width.
pub const BUTTON_COLUMN: f32 = 0.9;

/// Size of the retry and menu buttons in the game UI.
pub const UI_ICON_SIZE: f32 = 48.0;

/// Power-ups further than this below the world are discarded.
pub const FALL_OUT_MARGIN: f32 = 64.0;
