use std::mem;

use tracing::debug;

use crate::input::InputEvent;
use crate::presentation::{Cue, LabelId};
use crate::scene::{Bus, Scene, SceneKey, SceneLaunch, Stage};

const CREDITS: &str = "CREDITS\n\n\
Framework: Rust\n\
Graphics: 1-Bit Platformer Pack from Kenney\n\
Music: Home made noise played on my instruments\n\
Sound effects: My vacuum cleaner (rocket) and sounds from Kenney";

/// Static credits; any input returns to the title screen.
#[derive(Debug)]
pub struct CreditsScene {
    cues: Vec<Cue>,
}

impl CreditsScene {
    pub fn new() -> Self {
        Self {
            cues: vec![Cue::Label {
                id: LabelId::Credits,
                text: CREDITS.to_string(),
            }],
        }
    }
}

impl Default for CreditsScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for CreditsScene {
    fn key(&self) -> SceneKey {
        SceneKey::Credits
    }

    fn shutdown(&mut self, _bus: &Bus) {
        debug!("Credits scene shut down");
    }

    fn take_cues(&mut self) -> Vec<Cue> {
        mem::take(&mut self.cues)
    }
}

pub fn create(stage: &mut Stage) {
    stage.scenes.credits = Some(CreditsScene::new());
}

pub fn input(stage: &mut Stage, _event: &InputEvent) {
    if stage.scenes.credits.is_some() {
        stage.start(SceneLaunch::Home);
    }
}
