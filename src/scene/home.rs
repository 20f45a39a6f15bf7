//! Title screen with the main menu.

use std::mem;

use glam::Vec2;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use tracing::debug;

use crate::config::GameOptions;
use crate::constants::TITLE;
use crate::input::{InputEvent, Key};
use crate::physics::Rect;
use crate::presentation::{Cue, LabelId, Sound};
use crate::scene::{Bus, Scene, SceneKey, SceneLaunch, SessionData, Stage};

const ENTRY_SIZE: Vec2 = Vec2::new(300.0, 60.0);
/// Vertical centre of the first entry, as a fraction of the game height.
const FIRST_ENTRY_ROW: f32 = 0.5;
/// Distance between entries, as a fraction of the game height.
const ENTRY_SPACING: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum MenuEntry {
    Play,
    Credits,
}

#[derive(Debug)]
pub struct HomeScene {
    selected: usize,
    entries: Vec<(MenuEntry, Rect)>,
    cues: Vec<Cue>,
}

impl HomeScene {
    pub fn new(options: &GameOptions) -> Self {
        let entries = MenuEntry::iter()
            .enumerate()
            .map(|(i, entry)| {
                let center = Vec2::new(
                    options.game_width * 0.5,
                    options.game_height * (FIRST_ENTRY_ROW + i as f32 * ENTRY_SPACING),
                );
                (entry, Rect::from_center(center, ENTRY_SIZE))
            })
            .collect();

        let mut scene = Self {
            selected: 0,
            entries,
            cues: vec![
                Cue::PlaySound(Sound::Music),
                Cue::Label {
                    id: LabelId::Title,
                    text: TITLE.to_string(),
                },
            ],
        };
        scene.show_selection();
        scene
    }

    pub fn selected(&self) -> MenuEntry {
        self.entries[self.selected].0
    }

    pub fn entry_area(&self, entry: MenuEntry) -> Option<Rect> {
        self.entries.iter().find(|(e, _)| *e == entry).map(|(_, area)| *area)
    }

    fn show_selection(&mut self) {
        let text = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (entry, _))| {
                if i == self.selected {
                    format!("> {entry} <")
                } else {
                    entry.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.cues.push(Cue::Label { id: LabelId::Menu, text });
    }

    fn move_selection(&mut self, forward: bool) {
        let len = self.entries.len();
        self.selected = if forward {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
        self.show_selection();
    }

    /// Returns the entry confirmed by this input, if any.
    fn handle_input(&mut self, event: &InputEvent) -> Option<MenuEntry> {
        match *event {
            InputEvent::KeyDown(Key::Up | Key::W) => {
                self.move_selection(false);
                None
            }
            InputEvent::KeyDown(Key::Down | Key::S) => {
                self.move_selection(true);
                None
            }
            InputEvent::KeyDown(key) if key.is_confirm() => Some(self.selected()),
            InputEvent::PointerDown(point) => self
                .entries
                .iter()
                .find(|(_, area)| area.contains(point))
                .map(|(entry, _)| *entry),
            InputEvent::KeyDown(_) => None,
        }
    }
}

impl Scene for HomeScene {
    fn key(&self) -> SceneKey {
        SceneKey::Home
    }

    fn shutdown(&mut self, _bus: &Bus) {
        debug!("Home scene shut down");
    }

    fn take_cues(&mut self) -> Vec<Cue> {
        mem::take(&mut self.cues)
    }
}

pub fn create(stage: &mut Stage) {
    stage.scenes.home = Some(HomeScene::new(&stage.options));
}

pub fn input(stage: &mut Stage, event: &InputEvent) {
    let Some(home) = stage.scenes.home.as_mut() else {
        return;
    };

    match home.handle_input(event) {
        Some(MenuEntry::Play) => stage.start(SceneLaunch::Game(SessionData::new_run())),
        Some(MenuEntry::Credits) => stage.start(SceneLaunch::Credits),
        None => {}
    }
}
