//! Centralized error types for Power-Up Adventure.
//!
//! In-game failure modes are modelled as state-machine guards, so everything in here comes from
//! loading: level files, configuration, replay scripts, or a scene request for a level that does
//! not exist.

use std::io;

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Level data error: {0}")]
    Level(#[from] LevelDataError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),
}

/// Errors produced while validating a level document into [`crate::level::LevelData`].
///
/// Every accessor the scenes rely on is resolved at load time, so a level that passes validation
/// can never produce one of these mid-game.
#[derive(thiserror::Error, Debug)]
pub enum LevelDataError {
    #[error("Level '{level}' is not valid JSON: {source}")]
    Json {
        level: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Level '{level}' has no '{layer}' layer")]
    MissingLayer { level: String, layer: &'static str },

    #[error("Layer '{layer}' in level '{level}' contains no objects")]
    MissingObject { level: String, layer: &'static str },

    #[error("Tile layer '{layer}' in level '{level}' has {found} tiles, expected {expected}")]
    InvalidTileData {
        level: String,
        layer: String,
        expected: usize,
        found: usize,
    },

    #[error("Level '{level}' has an invalid {what} of {width}x{height}")]
    InvalidDimensions {
        level: String,
        what: &'static str,
        width: u32,
        height: u32,
    },

    #[error("Property '{name}' in level '{level}' must be {expected}")]
    InvalidProperty {
        level: String,
        name: String,
        expected: &'static str,
    },

    #[error("Unknown enemy type '{found}' in level '{level}'")]
    UnknownEnemyType { level: String, found: String },

    #[error("Level {0} does not exist")]
    MissingLevel(u32),

    #[error("No levels were found")]
    NoLevels,
}

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Asset not found: {0}")]
    NotFound(String),
}

/// Errors raised while parsing a replay script.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
