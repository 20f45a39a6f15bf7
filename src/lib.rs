//! Power-Up Adventure game library crate.
//!
//! An auto-running platformer: the player cannot steer the runner, only drop power-ups in its path
//! from a limited supply. The library holds the whole game minus rendering and audio, which are
//! reached through [`presentation::Presenter`].

pub mod app;
pub mod asset;
pub mod camera;
pub mod clock;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod formatter;
pub mod input;
pub mod level;
pub mod physics;
pub mod presentation;
pub mod scene;
