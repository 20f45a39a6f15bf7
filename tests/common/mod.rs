#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use serde_json::{json, Value};

use power_up_adventure::clock::{Clock, ManualClock};
use power_up_adventure::config::GameOptions;
use power_up_adventure::constants::LOOP_TIME;
use power_up_adventure::input::{InputEvent, Key};
use power_up_adventure::level::{LevelCatalog, LevelData};
use power_up_adventure::presentation::{Cue, Presenter};
use power_up_adventure::scene::{Director, GameScene, GameUiScene, SceneLaunch, SessionData};

pub const TILE: u32 = 32;
pub const WIDTH: u32 = 40;
pub const HEIGHT: u32 = 17;
/// First row of the two-row ground strip.
pub const GROUND_ROW: u32 = 15;

/// Screen position of each power-up button with the default options.
pub const FLY_BUTTON: Vec2 = Vec2::new(1026.0, 135.0);
pub const SPEED_BUTTON: Vec2 = Vec2::new(1026.0, 270.0);

/// A small Tiled document: a flat ground strip, an exit near the right edge and no enemies.
#[derive(Debug, Clone)]
pub struct TestLevel {
    pub gaps: Vec<(u32, u32)>,
    pub enemies: Vec<Value>,
    pub properties: Vec<Value>,
    pub exit: Option<Value>,
    pub start: Option<Vec2>,
    pub platforms: bool,
}

impl Default for TestLevel {
    fn default() -> Self {
        Self {
            gaps: Vec::new(),
            enemies: Vec::new(),
            properties: vec![
                json!({"name": "flyNumber", "type": "int", "value": 2}),
                json!({"name": "speedNumber", "type": "int", "value": 1}),
            ],
            exit: Some(json!({"x": 36 * TILE, "y": 416, "width": 32, "height": 64})),
            start: None,
            platforms: true,
        }
    }
}

impl TestLevel {
    pub fn with_property(mut self, name: &str, value: Value) -> Self {
        self.properties.retain(|p| p["name"] != name);
        self.properties.push(json!({"name": name, "value": value}));
        self
    }

    pub fn with_instructions(self, text: &str) -> Self {
        self.with_property("instructions", json!(text))
    }

    /// A spike tile standing on the ground at `column`.
    pub fn with_spike(mut self, column: u32) -> Self {
        self.enemies.push(json!({
            "gid": 123,
            "x": column * TILE,
            "y": GROUND_ROW * TILE,
            "width": TILE,
            "height": TILE,
            "type": "spike"
        }));
        self
    }

    pub fn with_enemy(mut self, object: Value) -> Self {
        self.enemies.push(object);
        self
    }

    pub fn with_start(mut self, start: Vec2) -> Self {
        self.start = Some(start);
        self
    }

    pub fn without_exit(mut self) -> Self {
        self.exit = None;
        self
    }

    pub fn without_platforms(mut self) -> Self {
        self.platforms = false;
        self
    }

    pub fn tiles(&self) -> Vec<u32> {
        let mut data = vec![0; (WIDTH * HEIGHT) as usize];
        for row in GROUND_ROW..HEIGHT {
            for column in 0..WIDTH {
                if !self.gaps.iter().any(|(from, to)| (*from..=*to).contains(&column)) {
                    data[(row * WIDTH + column) as usize] = 1;
                }
            }
        }
        data
    }

    pub fn to_json(&self) -> Value {
        let mut layers = Vec::new();
        if self.platforms {
            layers.push(json!({
                "name": "Platforms",
                "type": "tilelayer",
                "width": WIDTH,
                "height": HEIGHT,
                "data": self.tiles(),
            }));
        }
        layers.push(json!({
            "name": "Exit",
            "type": "objectgroup",
            "objects": self.exit.iter().cloned().collect::<Vec<_>>(),
        }));
        layers.push(json!({"name": "Enemies", "type": "objectgroup", "objects": self.enemies}));
        if let Some(start) = self.start {
            layers.push(json!({
                "name": "Start",
                "type": "objectgroup",
                "objects": [{"x": start.x, "y": start.y, "point": true}],
            }));
        }

        json!({
            "width": WIDTH,
            "height": HEIGHT,
            "tilewidth": TILE,
            "tileheight": TILE,
            "properties": self.properties,
            "tilesets": [{
                "firstgid": 1,
                "tiles": [
                    {"id": 0, "properties": [{"name": "collides", "type": "bool", "value": true}]},
                    {"id": 1, "properties": [{"name": "collides", "type": "bool", "value": false}]}
                ]
            }],
            "layers": layers,
        })
    }

    pub fn build(&self, key: &str) -> LevelData {
        let bytes = serde_json::to_vec(&self.to_json()).unwrap();
        LevelData::from_json(key, &bytes).unwrap()
    }
}

/// Records every cue it is handed.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub cues: Rc<RefCell<Vec<Cue>>>,
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, cue: &Cue) {
        self.cues.borrow_mut().push(cue.clone());
    }
}

/// A director on a manual clock, stepped one frame at a time.
pub struct Harness {
    pub clock: Rc<ManualClock>,
    pub director: Director,
    pub cues: Rc<RefCell<Vec<Cue>>>,
}

impl Harness {
    pub fn new(levels: Vec<TestLevel>) -> Self {
        Self::with_options(GameOptions::default(), levels)
    }

    pub fn with_options(options: GameOptions, levels: Vec<TestLevel>) -> Self {
        let levels = levels
            .iter()
            .enumerate()
            .map(|(i, level)| level.build(&format!("level{}", i + 1)))
            .collect();
        let catalog = LevelCatalog::from_levels(levels).unwrap();

        let clock = Rc::new(ManualClock::new());
        let shared: Rc<dyn Clock> = clock.clone();
        let presenter = RecordingPresenter::default();
        let cues = Rc::clone(&presenter.cues);

        let mut director = Director::new(Rc::new(options), shared, Rc::new(catalog), Box::new(presenter));
        director.boot().unwrap();

        Self { clock, director, cues }
    }

    /// Boots straight into level 1 of a new run.
    pub fn playing(levels: Vec<TestLevel>) -> Self {
        let mut harness = Self::new(levels);
        harness.director.start(SceneLaunch::Game(SessionData::new_run())).unwrap();
        harness
    }

    pub fn frame(&mut self) {
        self.clock.advance(LOOP_TIME);
        self.director.update(LOOP_TIME).unwrap();
    }

    pub fn run_frames(&mut self, frames: u32) {
        for _ in 0..frames {
            self.frame();
        }
    }

    /// Steps frames until `done` holds, up to `max` frames. Returns whether it did.
    pub fn run_until(&mut self, max: u32, done: impl Fn(&Director) -> bool) -> bool {
        for _ in 0..max {
            if done(&self.director) {
                return true;
            }
            self.frame();
        }
        done(&self.director)
    }

    pub fn input(&mut self, event: InputEvent) {
        self.director.input(event).unwrap();
    }

    pub fn press(&mut self, key: Key) {
        self.input(InputEvent::KeyDown(key));
    }

    pub fn click(&mut self, at: Vec2) {
        self.input(InputEvent::PointerDown(at));
    }

    pub fn game(&self) -> &GameScene {
        self.director.stage().scenes.game.as_ref().expect("game scene should be active")
    }

    pub fn ui(&self) -> &GameUiScene {
        self.director.stage().scenes.game_ui.as_ref().expect("game UI scene should be active")
    }

    pub fn take_cues(&self) -> Vec<Cue> {
        self.cues.borrow_mut().drain(..).collect()
    }
}

pub fn game_session(director: &Director) -> Option<SessionData> {
    director.stage().scenes.game.as_ref().map(|game| game.session())
}
