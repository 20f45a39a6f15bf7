//! Owns the bus and the stage and runs scenes frame by frame.

use std::rc::Rc;
use std::time::Duration;

use strum::IntoEnumIterator;
use tracing::{debug, info, trace};

use crate::clock::Clock;
use crate::config::GameOptions;
use crate::error::GameResult;
use crate::input::InputEvent;
use crate::level::LevelCatalog;
use crate::presentation::Presenter;
use crate::scene::{credits, game, game_ui, home, win, Bus, Scene, SceneKey, SceneLaunch, SceneRequest, Stage};

/// Drives every scene.
///
/// Input is dispatched to the active scenes, then one frame is run; queued scene requests are
/// applied after each of these passes.
pub struct Director {
    bus: Bus,
    stage: Stage,
    presenter: Box<dyn Presenter>,
    frame: u64,
}

impl Director {
    pub fn new(
        options: Rc<GameOptions>,
        clock: Rc<dyn Clock>,
        levels: Rc<LevelCatalog>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        Self {
            bus: Bus::new(),
            stage: Stage::new(options, clock, levels),
            presenter,
            frame: 0,
        }
    }

    /// Starts at the title screen.
    pub fn boot(&mut self) -> GameResult<()> {
        self.start(SceneLaunch::Home)
    }

    /// Stops every scene and starts `launch`.
    pub fn start(&mut self, launch: SceneLaunch) -> GameResult<()> {
        self.stage.start(launch);
        self.apply_requests()?;
        self.flush_cues();
        Ok(())
    }

    pub fn input(&mut self, event: InputEvent) -> GameResult<()> {
        trace!(?event, "Input");

        // The UI sees input before the level so a press that starts the level cannot also land
        // on a button that the start just enabled.
        game_ui::input(&mut self.stage, &self.bus, &event);
        game::input(&mut self.stage, &self.bus, &event);
        home::input(&mut self.stage, &event);
        win::input(&mut self.stage, &event);
        credits::input(&mut self.stage, &event);

        self.apply_requests()?;
        self.flush_cues();
        Ok(())
    }

    pub fn update(&mut self, delta: Duration) -> GameResult<()> {
        self.frame += 1;

        game::update(&mut self.stage, &self.bus, delta);
        game_ui::update(&mut self.stage, delta);

        self.flush_cues();
        self.apply_requests()?;
        self.flush_cues();
        Ok(())
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn active_scenes(&self) -> Vec<SceneKey> {
        SceneKey::iter().filter(|key| self.stage.scenes.is_active(*key)).collect()
    }

    pub fn is_active(&self, key: SceneKey) -> bool {
        self.stage.scenes.is_active(key)
    }

    /// Applies queued scene requests until none are left. Creating a scene may queue more.
    fn apply_requests(&mut self) -> GameResult<()> {
        loop {
            let requests = self.stage.take_requests();
            if requests.is_empty() {
                return Ok(());
            }

            for request in requests {
                match request {
                    SceneRequest::Start(launch) => {
                        for key in SceneKey::iter() {
                            self.stop(key);
                        }
                        self.create(launch)?;
                    }
                    SceneRequest::Launch(launch) => {
                        self.stop(launch.key());
                        self.create(launch)?;
                    }
                    SceneRequest::Stop(key) => self.stop(key),
                }
            }
        }
    }

    fn create(&mut self, launch: SceneLaunch) -> GameResult<()> {
        info!(scene = %launch.key(), ?launch, "Starting scene");
        let (stage, bus) = (&mut self.stage, &self.bus);

        match launch {
            SceneLaunch::Home => home::create(stage),
            SceneLaunch::Game(session) => game::create(stage, bus, session)?,
            SceneLaunch::GameUi(session) => game_ui::create(stage, bus, session)?,
            SceneLaunch::Win(session) => win::create(stage, session),
            SceneLaunch::Credits => credits::create(stage),
        }
        Ok(())
    }

    fn stop(&mut self, key: SceneKey) {
        let scenes = &mut self.stage.scenes;
        let scene: Option<Box<dyn Scene>> = match key {
            SceneKey::Home => scenes.home.take().map(|s| Box::new(s) as Box<dyn Scene>),
            SceneKey::Game => scenes.game.take().map(|s| Box::new(s) as Box<dyn Scene>),
            SceneKey::GameUi => scenes.game_ui.take().map(|s| Box::new(s) as Box<dyn Scene>),
            SceneKey::Win => scenes.win.take().map(|s| Box::new(s) as Box<dyn Scene>),
            SceneKey::Credits => scenes.credits.take().map(|s| Box::new(s) as Box<dyn Scene>),
        };

        if let Some(mut scene) = scene {
            scene.shutdown(&self.bus);
            for cue in scene.take_cues() {
                self.presenter.present(&cue);
            }
            debug!(scene = %key, listeners = self.bus.total_listeners(), "Stopped scene");
        }
    }

    /// Hands queued cues from every active scene to the presenter.
    fn flush_cues(&mut self) {
        let scenes = &mut self.stage.scenes;
        let mut cues = Vec::new();
        if let Some(scene) = scenes.game.as_mut() {
            cues.extend(scene.take_cues());
        }
        if let Some(scene) = scenes.game_ui.as_mut() {
            cues.extend(scene.take_cues());
        }
        if let Some(scene) = scenes.home.as_mut() {
            cues.extend(scene.take_cues());
        }
        if let Some(scene) = scenes.win.as_mut() {
            cues.extend(scene.take_cues());
        }
        if let Some(scene) = scenes.credits.as_mut() {
            cues.extend(scene.take_cues());
        }

        for cue in &cues {
            self.presenter.present(cue);
        }
    }
}
