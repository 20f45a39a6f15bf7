//! Player input and scripted replays.

use std::str::FromStr;

use glam::Vec2;
use strum_macros::{Display, EnumString};
use tracing::debug;

use crate::error::ScriptError;

/// Keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Key {
    Enter,
    Space,
    Up,
    Down,
    W,
    S,
    R,
    Escape,
    #[strum(serialize = "Digit1", serialize = "1")]
    Digit1,
    #[strum(serialize = "Digit2", serialize = "2")]
    Digit2,
    #[strum(serialize = "Digit3", serialize = "3")]
    Digit3,
}

impl Key {
    /// Keys that confirm a menu entry or start a level.
    pub fn is_confirm(self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

/// A single key-down or pointer-down edge, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    PointerDown(Vec2),
}

/// A recorded sequence of inputs, each tagged with the frame it happens on.
///
/// One entry per line:
///
/// ```text
/// # comment
/// 30 key Enter
/// 95 pointer 1026 135
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputScript {
    entries: Vec<(u64, InputEvent)>,
}

impl InputScript {
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut entries = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            let invalid = |reason: String| ScriptError::InvalidLine { line: index + 1, reason };
            let parts = line.split_whitespace().collect::<Vec<_>>();

            let frame = parts
                .first()
                .and_then(|f| f.parse::<u64>().ok())
                .ok_or_else(|| invalid(format!("expected a frame number, found '{line}'")))?;

            let event = match parts.get(1..) {
                Some(["key", name]) => {
                    let key = Key::from_str(name).map_err(|_| invalid(format!("unknown key '{name}'")))?;
                    InputEvent::KeyDown(key)
                }
                Some(["pointer", x, y]) => {
                    let x = x.parse::<f32>().map_err(|_| invalid(format!("invalid x coordinate '{x}'")))?;
                    let y = y.parse::<f32>().map_err(|_| invalid(format!("invalid y coordinate '{y}'")))?;
                    InputEvent::PointerDown(Vec2::new(x, y))
                }
                _ => return Err(invalid("expected 'key <Key>' or 'pointer <x> <y>'".to_string())),
            };

            entries.push((frame, event));
        }

        entries.sort_by_key(|(frame, _)| *frame);
        debug!(entries = entries.len(), "Parsed input script");
        Ok(Self { entries })
    }

    /// Inputs scheduled for `frame`, in file order.
    pub fn events_at(&self, frame: u64) -> impl Iterator<Item = InputEvent> + '_ {
        self.entries.iter().filter(move |(f, _)| *f == frame).map(|(_, e)| *e)
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.entries.last().map(|(frame, _)| *frame)
    }

    pub fn is_exhausted(&self, frame: u64) -> bool {
        self.last_frame().is_none_or(|last| frame > last)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
