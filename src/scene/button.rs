//! The power-up buttons in the game UI.

use std::mem;

use glam::Vec2;
use smallvec::SmallVec;
use tracing::debug;

use crate::entity::{PowerUpKind, Spawner};
use crate::events::BusEvent;
use crate::physics::Rect;
use crate::presentation::{Cue, LabelId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// Created, never activated or deactivated.
    Uninitialized,
    Inactive,
    Active,
    /// Created with nothing to spawn; never shown and never interactive.
    HiddenEmpty,
}

#[derive(Debug)]
pub struct PowerUpButton {
    kind: PowerUpKind,
    /// Screen position of the icon's centre.
    position: Vec2,
    remaining: u32,
    state: ButtonState,
    initialized: bool,
    hit_area: Option<Rect>,
    cues: Vec<Cue>,
}

impl PowerUpButton {
    pub fn new(kind: PowerUpKind, position: Vec2, remaining: u32) -> Self {
        let state = if remaining == 0 {
            ButtonState::HiddenEmpty
        } else {
            ButtonState::Uninitialized
        };

        let cues = match state {
            ButtonState::HiddenEmpty => Vec::new(),
            _ => vec![Cue::Label {
                id: LabelId::ButtonCount(kind),
                text: format!("{remaining}x"),
            }],
        };

        Self {
            kind,
            position,
            remaining,
            state,
            initialized: false,
            hit_area: None,
            cues,
        }
    }

    pub fn kind(&self) -> PowerUpKind {
        self.kind
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn is_interactive(&self) -> bool {
        self.state == ButtonState::Active
    }

    pub fn is_hidden(&self) -> bool {
        self.state == ButtonState::HiddenEmpty
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn hit_area(&self) -> Option<Rect> {
        self.hit_area
    }

    /// Makes the button clickable. The first call also sets up its (enlarged) hit area.
    pub fn activate_btn(&mut self, hit_size: Vec2) {
        if self.is_hidden() {
            return;
        }

        if !self.initialized {
            self.hit_area = Some(Rect::from_center(self.position, hit_size));
            self.initialized = true;
        }

        self.state = ButtonState::Active;
        self.cues.push(Cue::ButtonTint {
            kind: self.kind,
            disabled: false,
        });
    }

    pub fn deactivate_btn(&mut self) {
        if self.is_hidden() {
            return;
        }

        self.state = ButtonState::Inactive;
        self.cues.push(Cue::ButtonTint {
            kind: self.kind,
            disabled: true,
        });
    }

    pub fn hit_test(&self, point: Vec2) -> bool {
        self.hit_area.is_some_and(|area| area.contains(point))
    }

    /// Presses the button and returns the events to publish, in order.
    ///
    /// An interactive button always asks for a cooldown, even with nothing left to spawn.
    pub fn click(&mut self, spawner: &Spawner) -> SmallVec<[BusEvent; 2]> {
        let mut events = SmallVec::new();
        if !self.is_interactive() {
            return events;
        }

        if self.remaining > 0 {
            self.remaining -= 1;
            self.cues.push(Cue::Label {
                id: LabelId::ButtonCount(self.kind),
                text: format!("{}x", self.remaining),
            });

            let at = spawner.position();
            events.push(BusEvent::SpawnPowerUp {
                x: at.x,
                y: at.y,
                kind: self.kind,
            });
        }

        debug!(kind = %self.kind, remaining = self.remaining, "Power-up button clicked");
        events.push(BusEvent::StartButtonCooldown);
        events
    }

    pub fn take_cues(&mut self) -> Vec<Cue> {
        mem::take(&mut self.cues)
    }
}
