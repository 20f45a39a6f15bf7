//! Scenes and the data handed between them.
//!
//! A [`Stage`] holds every scene slot plus the services scenes need. Scenes never switch each
//! other directly: they queue a [`SceneRequest`] on the stage and the [`Director`] applies it
//! between dispatch passes.

use std::rc::Rc;
use std::time::Duration;

use strum_macros::{Display, EnumIter};
use tracing::debug;

use crate::clock::Clock;
use crate::config::GameOptions;
use crate::events::EventBus;
use crate::level::LevelCatalog;
use crate::presentation::Cue;

pub mod button;
pub mod credits;
pub mod director;
pub mod game;
pub mod game_ui;
pub mod home;
pub mod win;

pub use button::{ButtonState, PowerUpButton};
pub use credits::CreditsScene;
pub use director::Director;
pub use game::{GameScene, LevelPhase};
pub use game_ui::{Cooldown, GameUiScene};
pub use home::{HomeScene, MenuEntry};
pub use win::WinScene;

/// The bus used by every scene; listeners receive the stage.
pub type Bus = EventBus<Stage>;

/// Progress through one run, handed from scene to scene.
///
/// Exactly one scene pair owns it at a time; it is passed by value on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionData {
    pub level: u32,
    /// Level setups so far, including retries, across the whole run.
    pub attempts: u32,
}

impl SessionData {
    pub fn new_run() -> Self {
        Self { level: 1, attempts: 0 }
    }

    /// Counts one more setup of the current level.
    pub fn begin_attempt(&mut self) {
        self.attempts += 1;
    }
}

impl Default for SessionData {
    fn default() -> Self {
        Self::new_run()
    }
}

/// Why a level session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EndReason {
    Exit,
    Retry,
    Menu,
}

/// Where a finished level session goes next.
pub fn resolve_transition(session: SessionData, reason: EndReason, max_level: u32) -> SceneLaunch {
    match reason {
        EndReason::Exit => {
            let next = SessionData {
                level: session.level + 1,
                attempts: session.attempts,
            };
            if next.level > max_level {
                SceneLaunch::Win(next)
            } else {
                SceneLaunch::Game(next)
            }
        }
        EndReason::Retry => SceneLaunch::Game(SessionData {
            level: session.level,
            attempts: session.attempts + 1,
        }),
        EndReason::Menu => SceneLaunch::Home,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum SceneKey {
    Home,
    Game,
    GameUi,
    Win,
    Credits,
}

/// A scene to create, with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneLaunch {
    Home,
    Game(SessionData),
    GameUi(SessionData),
    Win(SessionData),
    Credits,
}

impl SceneLaunch {
    pub fn key(&self) -> SceneKey {
        match self {
            SceneLaunch::Home => SceneKey::Home,
            SceneLaunch::Game(_) => SceneKey::Game,
            SceneLaunch::GameUi(_) => SceneKey::GameUi,
            SceneLaunch::Win(_) => SceneKey::Win,
            SceneLaunch::Credits => SceneKey::Credits,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRequest {
    /// Stop every active scene, then create this one.
    Start(SceneLaunch),
    /// Create this scene alongside the active ones.
    Launch(SceneLaunch),
    Stop(SceneKey),
}

/// Common lifecycle of all scenes.
pub trait Scene {
    fn key(&self) -> SceneKey;

    /// Releases everything the scene registered. Called exactly once, when it is stopped.
    fn shutdown(&mut self, bus: &Bus);

    fn take_cues(&mut self) -> Vec<Cue>;
}

/// Scene slots; at most one instance of each scene is alive.
#[derive(Debug, Default)]
pub struct Scenes {
    pub home: Option<HomeScene>,
    pub game: Option<GameScene>,
    pub game_ui: Option<GameUiScene>,
    pub win: Option<WinScene>,
    pub credits: Option<CreditsScene>,
}

impl Scenes {
    pub fn is_active(&self, key: SceneKey) -> bool {
        match key {
            SceneKey::Home => self.home.is_some(),
            SceneKey::Game => self.game.is_some(),
            SceneKey::GameUi => self.game_ui.is_some(),
            SceneKey::Win => self.win.is_some(),
            SceneKey::Credits => self.credits.is_some(),
        }
    }
}

/// Everything a bus listener can reach.
pub struct Stage {
    pub options: Rc<GameOptions>,
    pub clock: Rc<dyn Clock>,
    pub levels: Rc<LevelCatalog>,
    pub scenes: Scenes,
    requests: Vec<SceneRequest>,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("now", &self.clock.now())
            .field("max_level", &self.levels.max_level())
            .field("scenes", &self.scenes)
            .field("requests", &self.requests)
            .finish()
    }
}

impl Stage {
    pub fn new(options: Rc<GameOptions>, clock: Rc<dyn Clock>, levels: Rc<LevelCatalog>) -> Self {
        Self {
            options,
            clock,
            levels,
            scenes: Scenes::default(),
            requests: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn request(&mut self, request: SceneRequest) {
        debug!(?request, "Scene request queued");
        self.requests.push(request);
    }

    pub fn start(&mut self, launch: SceneLaunch) {
        self.request(SceneRequest::Start(launch));
    }

    pub fn launch(&mut self, launch: SceneLaunch) {
        self.request(SceneRequest::Launch(launch));
    }

    pub fn stop(&mut self, key: SceneKey) {
        self.request(SceneRequest::Stop(key));
    }

    pub fn pending_requests(&self) -> &[SceneRequest] {
        &self.requests
    }

    pub(crate) fn take_requests(&mut self) -> Vec<SceneRequest> {
        std::mem::take(&mut self.requests)
    }
}
