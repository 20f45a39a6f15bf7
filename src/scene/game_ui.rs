//! The UI running on top of a level: power-up buttons, the spawner, retry and menu.

use std::mem;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use smallvec::{smallvec, SmallVec};
use strum::IntoEnumIterator;
use tracing::{debug, trace};

use crate::camera::Fade;
use crate::config::GameOptions;
use crate::constants::{BUTTON_COLUMN, BUTTON_ROWS, UI_ICON_SIZE};
use crate::entity::{PowerUpKind, Spawner};
use crate::error::GameResult;
use crate::events::{BusEvent, EventName, Subscription};
use crate::input::{InputEvent, Key};
use crate::physics::Rect;
use crate::presentation::{Cue, LabelId};
use crate::scene::button::PowerUpButton;
use crate::scene::{Bus, Scene, SceneKey, SessionData, Stage};

/// Shared cooldown of all power-up buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    last_press: Duration,
    active: bool,
    duration: Duration,
}

impl Cooldown {
    pub fn new(duration: Duration) -> Self {
        Self {
            last_press: Duration::ZERO,
            active: false,
            duration,
        }
    }

    pub fn start(&mut self, now: Duration) {
        self.last_press = now;
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_press(&self) -> Duration {
        self.last_press
    }

    /// Clears the cooldown once it has run out. Returns true on the call that clears it.
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.active && now > self.last_press + self.duration {
            self.active = false;
            return true;
        }
        false
    }
}

#[derive(Debug)]
pub struct GameUiScene {
    session: SessionData,
    options: Rc<GameOptions>,
    spawner: Spawner,
    buttons: Vec<PowerUpButton>,
    cooldown: Cooldown,
    /// Buttons stay disabled until the level has started.
    is_started: bool,
    fading: bool,
    fade: Fade,
    retry_area: Rect,
    menu_area: Rect,
    subscriptions: Vec<Subscription>,
    cues: Vec<Cue>,
}

impl GameUiScene {
    pub fn new(options: Rc<GameOptions>, session: SessionData, counts: impl Fn(PowerUpKind) -> u32, started: bool) -> Self {
        let view = options.view_size();
        let buttons = PowerUpKind::iter()
            .map(|kind| {
                let position = Vec2::new(view.x * BUTTON_COLUMN, view.y * BUTTON_ROWS[kind.slot()]);
                PowerUpButton::new(kind, position, counts(kind))
            })
            .collect();

        let icon = Vec2::splat(UI_ICON_SIZE);
        let retry_area = Rect::new(view.x - 2.0 * icon.x - 16.0, view.y - icon.y - 8.0, icon.x, icon.y);
        let menu_area = Rect::new(view.x - icon.x - 8.0, view.y - icon.y - 8.0, icon.x, icon.y);

        let cues = vec![
            Cue::Animate(Spawner::ANIMATION),
            Cue::Label {
                id: LabelId::Level,
                text: format!("Level {}  Attempt {}", session.level, session.attempts),
            },
        ];

        let mut scene = Self {
            session,
            spawner: Spawner::new(options.spawner_position),
            cooldown: Cooldown::new(options.button_cooldown()),
            options,
            buttons,
            is_started: started,
            fading: false,
            fade: Fade::default(),
            retry_area,
            menu_area,
            subscriptions: Vec::new(),
            cues,
        };

        if started {
            scene.activate_all();
        }
        scene
    }

    pub fn session(&self) -> SessionData {
        self.session
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn buttons(&self) -> &[PowerUpButton] {
        &self.buttons
    }

    pub fn button(&self, kind: PowerUpKind) -> &PowerUpButton {
        &self.buttons[kind.slot()]
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    pub fn is_started(&self) -> bool {
        self.is_started
    }

    pub fn is_fading(&self) -> bool {
        self.fading
    }

    pub fn retry_area(&self) -> Rect {
        self.retry_area
    }

    pub fn menu_area(&self) -> Rect {
        self.menu_area
    }

    fn activate_all(&mut self) {
        let hit_size = self.options.button_hit_area;
        for button in &mut self.buttons {
            button.activate_btn(hit_size);
        }
    }

    fn deactivate_all(&mut self) {
        for button in &mut self.buttons {
            button.deactivate_btn();
        }
    }

    /// Clicks the button for `kind` and returns what it wants published.
    pub fn click(&mut self, kind: PowerUpKind) -> SmallVec<[BusEvent; 2]> {
        self.buttons[kind.slot()].click(&self.spawner)
    }

    fn on_cooldown_started(&mut self, now: Duration) {
        self.cooldown.start(now);
        self.deactivate_all();
    }

    fn on_level_started(&mut self) {
        self.is_started = true;
        if !self.fading {
            self.activate_all();
        }
    }

    fn on_fadeout(&mut self) {
        self.fading = true;
        self.deactivate_all();
        self.fade.start(self.options.fade_duration());
    }

    /// Per-frame polling of the cooldown and the fade.
    fn tick(&mut self, now: Duration, delta: Duration) {
        if self.cooldown.poll(now) && self.is_started && !self.fading {
            trace!("Button cooldown over");
            self.activate_all();
        }
        self.fade.tick(delta);
    }

    /// Maps an input to the events it triggers.
    fn handle_input(&mut self, event: &InputEvent) -> SmallVec<[BusEvent; 2]> {
        match *event {
            InputEvent::KeyDown(Key::Digit1) => self.click(PowerUpKind::Fly),
            InputEvent::KeyDown(Key::Digit2) => self.click(PowerUpKind::Speed),
            InputEvent::KeyDown(Key::Digit3) => self.click(PowerUpKind::Shoot),
            InputEvent::KeyDown(Key::R) if !self.fading => smallvec![BusEvent::RetryButton],
            InputEvent::KeyDown(Key::Escape) if !self.fading => smallvec![BusEvent::MenuButton],
            InputEvent::PointerDown(point) => {
                if !self.fading && self.retry_area.contains(point) {
                    return smallvec![BusEvent::RetryButton];
                }
                if !self.fading && self.menu_area.contains(point) {
                    return smallvec![BusEvent::MenuButton];
                }
                match self.buttons.iter().find(|b| b.hit_test(point)).map(|b| b.kind()) {
                    Some(kind) => self.click(kind),
                    None => SmallVec::new(),
                }
            }
            InputEvent::KeyDown(_) => SmallVec::new(),
        }
    }
}

impl Scene for GameUiScene {
    fn key(&self) -> SceneKey {
        SceneKey::GameUi
    }

    fn shutdown(&mut self, bus: &Bus) {
        for subscription in self.subscriptions.drain(..) {
            bus.cancel(subscription);
        }
        debug!("Game UI scene shut down");
    }

    fn take_cues(&mut self) -> Vec<Cue> {
        for button in &mut self.buttons {
            self.cues.extend(button.take_cues());
        }
        mem::take(&mut self.cues)
    }
}

/// Creates the UI for the level currently set up in the game scene.
pub fn create(stage: &mut Stage, bus: &Bus, session: SessionData) -> GameResult<()> {
    let level = stage.levels.get(session.level)?;
    let mut scene = GameUiScene::new(
        Rc::clone(&stage.options),
        session,
        |kind| level.power_up_count(kind),
        !level.has_instructions(),
    );

    scene.subscriptions = vec![
        bus.subscribe(EventName::StartButtonCooldown, |stage, _, _| {
            let now = stage.now();
            if let Some(ui) = stage.scenes.game_ui.as_mut() {
                ui.on_cooldown_started(now);
            }
        }),
        bus.subscribe(EventName::StartLevel, |stage, _, _| {
            if let Some(ui) = stage.scenes.game_ui.as_mut() {
                ui.on_level_started();
            }
        }),
        bus.subscribe(EventName::SceneFadeout, |stage, _, _| {
            if let Some(ui) = stage.scenes.game_ui.as_mut() {
                ui.on_fadeout();
            }
        }),
    ];

    stage.scenes.game_ui = Some(scene);
    Ok(())
}

pub fn input(stage: &mut Stage, bus: &Bus, event: &InputEvent) {
    let Some(ui) = stage.scenes.game_ui.as_mut() else {
        return;
    };
    for event in ui.handle_input(event) {
        bus.publish(stage, event);
    }
}

pub fn update(stage: &mut Stage, delta: Duration) {
    let now = stage.now();
    if let Some(ui) = stage.scenes.game_ui.as_mut() {
        ui.tick(now, delta);
    }
}
