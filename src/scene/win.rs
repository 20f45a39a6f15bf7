use std::mem;

use tracing::{debug, info};

use crate::input::InputEvent;
use crate::presentation::{Cue, LabelId, Sound};
use crate::scene::{Bus, Scene, SceneKey, SceneLaunch, SessionData, Stage};

/// Shown after the last level has been cleared.
#[derive(Debug)]
pub struct WinScene {
    session: SessionData,
    cues: Vec<Cue>,
}

impl WinScene {
    pub fn new(session: SessionData) -> Self {
        info!(attempts = session.attempts, "All levels cleared");
        Self {
            session,
            cues: vec![
                Cue::PlaySound(Sound::Win),
                Cue::Label {
                    id: LabelId::Title,
                    text: "YOU WIN!".to_string(),
                },
                Cue::Label {
                    id: LabelId::Summary,
                    text: format!("Attempts: {}", session.attempts),
                },
            ],
        }
    }

    pub fn session(&self) -> SessionData {
        self.session
    }
}

impl Scene for WinScene {
    fn key(&self) -> SceneKey {
        SceneKey::Win
    }

    fn shutdown(&mut self, _bus: &Bus) {
        debug!("Win scene shut down");
    }

    fn take_cues(&mut self) -> Vec<Cue> {
        mem::take(&mut self.cues)
    }
}

pub fn create(stage: &mut Stage, session: SessionData) {
    stage.scenes.win = Some(WinScene::new(session));
}

pub fn input(stage: &mut Stage, event: &InputEvent) {
    if stage.scenes.win.is_none() {
        return;
    }

    let back_home = match event {
        InputEvent::PointerDown(_) => true,
        InputEvent::KeyDown(key) => key.is_confirm(),
    };
    if back_home {
        stage.start(SceneLaunch::Home);
    }
}
