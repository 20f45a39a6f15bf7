//! Hooks into rendering and audio.
//!
//! Gameplay code never draws or plays anything itself. Entities and scenes queue [`Cue`]s, and the
//! director forwards them to a [`Presenter`] once per frame.

use std::collections::HashSet;

use strum_macros::{Display, EnumIter, IntoStaticStr};
use tracing::{debug, trace};

use crate::entity::power_up::PowerUpKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Sound {
    Spawn,
    Fly,
    Speed,
    Dead,
    Pickup,
    Win,
    Music,
}

impl Sound {
    /// Looping sounds keep playing until stopped.
    pub fn is_looping(self) -> bool {
        matches!(self, Sound::Fly | Sound::Music)
    }
}

/// Particle emitters attached to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Effect {
    Fly,
    Speed,
}

/// Text slots shown by the scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum LabelId {
    Instructions,
    Level,
    ButtonCount(PowerUpKind),
    Title,
    Menu,
    Summary,
    Credits,
}

/// A request for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    PlaySound(Sound),
    StopSound(Sound),
    /// Switch an entity's sprite animation.
    Animate(&'static str),
    Particles(Effect, bool),
    ButtonTint { kind: PowerUpKind, disabled: bool },
    Label { id: LabelId, text: String },
    HideLabel(LabelId),
    FadeOut,
}

pub trait Presenter {
    fn present(&mut self, cue: &Cue);
}

/// Logs cues instead of rendering them.
///
/// Sound handles are registered the first time they are played; later plays reuse them.
#[derive(Debug, Default)]
pub struct TracingPresenter {
    registered: HashSet<Sound>,
    muted: bool,
}

impl TracingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mute(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_registered(&self, sound: Sound) -> bool {
        self.registered.contains(&sound)
    }

    fn ensure_registered(&mut self, sound: Sound) {
        if self.registered.insert(sound) {
            debug!(%sound, looping = sound.is_looping(), "Registered sound");
        }
    }
}

impl Presenter for TracingPresenter {
    fn present(&mut self, cue: &Cue) {
        match cue {
            Cue::PlaySound(sound) => {
                self.ensure_registered(*sound);
                if !self.muted {
                    trace!(%sound, "Playing sound");
                }
            }
            Cue::StopSound(sound) => {
                if self.is_registered(*sound) {
                    trace!(%sound, "Stopping sound");
                }
            }
            Cue::ButtonTint { kind, disabled } => {
                trace!(%kind, icon = kind.icon_frame(), disabled, "Button tint");
            }
            Cue::Label { id, text } => debug!(label = %id, "{}", text),
            other => trace!(cue = ?other, "Cue"),
        }
    }
}
