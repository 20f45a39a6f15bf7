//! The level session controller.
//!
//! One [`GameScene`] plays one attempt at one level: it builds the world, runs the player through
//! it and, once the attempt is over, fades out and asks for the next scene. A fresh instance is
//! created for every attempt; only the [`SessionData`] survives.

use std::mem;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use smallvec::SmallVec;
use tracing::{debug, info, trace};

use crate::camera::{Camera, Fade};
use crate::config::GameOptions;
use crate::constants::FALL_OUT_MARGIN;
use crate::entity::{EndCause, Enemy, Frame, GameEntity, Player, PowerUp, PowerUpKind, Scroll};
use crate::error::GameResult;
use crate::events::{BusEvent, EventName, Subscription};
use crate::input::InputEvent;
use crate::level::LevelData;
use crate::physics::{ArcadePhysics, Body};
use crate::presentation::{Cue, LabelId, Sound};
use crate::scene::{resolve_transition, Bus, EndReason, Scene, SceneKey, SceneLaunch, SessionData, Stage};

/// Lifecycle of one level attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPhase {
    /// The instruction overlay is shown and the player is held in place.
    WaitingToStart,
    Running,
    /// Fading out; the next scene is chosen when the fade completes.
    Ending(EndReason),
    /// The next scene has been requested.
    Finished,
}

/// What the contact pass decided this frame.
#[derive(Debug, Default)]
struct Contacts {
    picked_up: SmallVec<[BusEvent; 2]>,
    ended: Option<EndReason>,
}

#[derive(Debug)]
pub struct GameScene {
    session: SessionData,
    level: Rc<LevelData>,
    options: Rc<GameOptions>,
    physics: ArcadePhysics,
    camera: Camera,
    fade: Fade,
    player: Player,
    power_ups: Vec<PowerUp>,
    enemies: Vec<Enemy>,
    exit: Body,
    phase: LevelPhase,
    subscriptions: Vec<Subscription>,
    cues: Vec<Cue>,
}

impl GameScene {
    /// Sets the level up. Counts as one attempt.
    pub fn new(options: Rc<GameOptions>, level: Rc<LevelData>, mut session: SessionData, now: Duration) -> Self {
        session.begin_attempt();

        let bounds = level.bounds();
        let physics = ArcadePhysics::new(options.gravity, bounds, level.collision.clone());
        let camera = Camera::new(bounds, options.view_size(), options.camera_left_offset);

        let start = level.player_start.unwrap_or(options.player_start);
        let mut player = Player::new(Rc::clone(&options), start, now);
        let enemies = level.enemies.iter().map(|spawn| Enemy::new(spawn, &options)).collect();
        let exit = Body::fixed(level.exit);

        let mut cues = Vec::new();
        let phase = match &level.instructions {
            Some(text) => {
                cues.push(Cue::Label {
                    id: LabelId::Instructions,
                    text: text.clone(),
                });
                LevelPhase::WaitingToStart
            }
            None => {
                player.start_running();
                LevelPhase::Running
            }
        };

        info!(
            level = %level.key,
            attempts = session.attempts,
            ?phase,
            enemies = level.enemies.len(),
            "Level set up"
        );

        Self {
            session,
            level,
            options,
            physics,
            camera,
            fade: Fade::default(),
            player,
            power_ups: Vec::new(),
            enemies,
            exit,
            phase,
            subscriptions: Vec::new(),
            cues,
        }
    }

    pub fn session(&self) -> SessionData {
        self.session
    }

    pub fn level(&self) -> &LevelData {
        &self.level
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn power_ups_mut(&mut self) -> &mut [PowerUp] {
        &mut self.power_ups
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn fade(&self) -> &Fade {
        &self.fade
    }

    pub fn exit(&self) -> &Body {
        &self.exit
    }

    /// Drops a power-up at a screen position. Ignored unless the level is running.
    pub fn spawn_power_up(&mut self, screen: Vec2, kind: PowerUpKind) {
        if self.phase != LevelPhase::Running {
            trace!(%kind, phase = ?self.phase, "Ignoring power-up spawn");
            return;
        }

        let world = self.camera.screen_to_world(screen);
        debug!(%kind, x = world.x, y = world.y, "Spawning power-up");
        self.power_ups.push(PowerUp::new(kind, world, &self.options));
        self.cues.push(Cue::PlaySound(Sound::Spawn));
    }

    /// Leaves the instruction overlay. Returns false if the level was not waiting.
    fn begin_running(&mut self) -> bool {
        if self.phase != LevelPhase::WaitingToStart {
            return false;
        }
        self.phase = LevelPhase::Running;
        self.player.start_running();
        self.cues.push(Cue::HideLabel(LabelId::Instructions));
        info!(level = %self.level.key, "Level started");
        true
    }

    /// Enters the ending phase and starts the fade. Returns false if the level is already ending.
    fn begin_ending(&mut self, reason: EndReason) -> bool {
        if matches!(self.phase, LevelPhase::Ending(_) | LevelPhase::Finished) {
            trace!(%reason, phase = ?self.phase, "Level already ending");
            return false;
        }

        info!(level = %self.level.key, %reason, attempts = self.session.attempts, "Level ending");
        self.phase = LevelPhase::Ending(reason);
        self.fade.start(self.options.fade_duration());
        self.cues.push(Cue::FadeOut);
        true
    }

    fn step_physics(&mut self, dt: f32) {
        self.physics.step(self.player.body_mut(), dt);
        for power_up in self.power_ups.iter_mut().filter(|p| p.is_active()) {
            self.physics.step(power_up.body_mut(), dt);
        }
        for enemy in &mut self.enemies {
            self.physics.step(enemy.body_mut(), dt);
        }
    }

    /// Resolves player contacts. Only a running level reacts to them.
    fn resolve_contacts(&mut self) -> Contacts {
        let mut contacts = Contacts::default();
        if self.phase != LevelPhase::Running || self.player.is_ended() {
            return contacts;
        }

        let player = self.player.body();

        if self.enemies.iter().any(|enemy| player.overlaps(enemy.body())) {
            self.player.end(EndCause::Killed);
            // Nothing may try to reach the player once it is gone.
            for power_up in &mut self.power_ups {
                power_up.destroy();
            }
            contacts.ended = Some(EndReason::Retry);
            return contacts;
        }

        if player.overlaps(&self.exit) {
            self.player.end(EndCause::ExitReached);
            self.cues.push(Cue::PlaySound(Sound::Win));
            contacts.ended = Some(EndReason::Exit);
            return contacts;
        }

        for power_up in &mut self.power_ups {
            if player.overlaps(power_up.body()) {
                contacts.picked_up.extend(power_up.pick_up());
            }
        }
        contacts
    }

    fn update_entities(&mut self, frame: &Frame) {
        self.player.update(frame);

        let frame = Frame {
            scroll: Scroll {
                player_velocity_x: self.player.body().velocity.x,
                view_at_world_edge: self.camera.at_right_edge(),
            },
            ..*frame
        };

        for power_up in &mut self.power_ups {
            power_up.update(&frame);
            if power_up.is_active() && self.physics.is_below_world(power_up.body(), FALL_OUT_MARGIN) {
                trace!(kind = %power_up.kind(), "Power-up fell out of the world");
                power_up.destroy();
            }
        }

        for enemy in &mut self.enemies {
            enemy.update(&frame);
        }
    }

    fn collect_entity_cues(&mut self) {
        self.cues.extend(self.player.take_cues());
        for power_up in &mut self.power_ups {
            self.cues.extend(power_up.take_cues());
        }
        for enemy in &mut self.enemies {
            self.cues.extend(enemy.take_cues());
        }
        self.power_ups.retain(|p| p.is_active());
    }

    /// Advances the fade. Returns the next scene on the frame the fade completes.
    fn poll_fade(&mut self, delta: Duration, max_level: u32) -> Option<SceneLaunch> {
        let LevelPhase::Ending(reason) = self.phase else {
            return None;
        };
        if !self.fade.tick(delta) {
            return None;
        }

        self.phase = LevelPhase::Finished;
        let next = resolve_transition(self.session, reason, max_level);
        info!(level = %self.level.key, %reason, ?next, "Level finished");
        Some(next)
    }
}

impl Scene for GameScene {
    fn key(&self) -> SceneKey {
        SceneKey::Game
    }

    fn shutdown(&mut self, bus: &Bus) {
        for subscription in self.subscriptions.drain(..) {
            bus.cancel(subscription);
        }
        if self.player.is_flying() {
            self.cues.push(Cue::StopSound(Sound::Fly));
        }
        debug!(level = %self.level.key, "Game scene shut down");
    }

    fn take_cues(&mut self) -> Vec<Cue> {
        self.collect_entity_cues();
        mem::take(&mut self.cues)
    }
}

/// Creates the level scene for `session` and launches its UI alongside it.
pub fn create(stage: &mut Stage, bus: &Bus, session: SessionData) -> GameResult<()> {
    let level = stage.levels.get(session.level)?;
    let mut scene = GameScene::new(Rc::clone(&stage.options), level, session, stage.now());

    scene.subscriptions = vec![
        bus.subscribe(EventName::SpawnPowerUp, |stage, event, _| {
            if let BusEvent::SpawnPowerUp { x, y, kind } = *event {
                if let Some(game) = stage.scenes.game.as_mut() {
                    game.spawn_power_up(Vec2::new(x, y), kind);
                }
            }
        }),
        bus.subscribe(EventName::PowerUpPickedUp, |stage, event, _| {
            if let BusEvent::PowerUpPickedUp(kind) = *event {
                let now = stage.now();
                if let Some(game) = stage.scenes.game.as_mut() {
                    game.player.apply(kind, now);
                }
            }
        }),
        bus.subscribe(EventName::RetryButton, |stage, _, bus| end_level(stage, bus, EndReason::Retry)),
        bus.subscribe(EventName::MenuButton, |stage, _, bus| end_level(stage, bus, EndReason::Menu)),
    ];

    let session = scene.session();
    stage.scenes.game = Some(scene);
    stage.launch(SceneLaunch::GameUi(session));
    Ok(())
}

/// Ends the running level. Does nothing if it is already ending.
pub fn end_level(stage: &mut Stage, bus: &Bus, reason: EndReason) {
    let Some(game) = stage.scenes.game.as_mut() else {
        return;
    };
    if game.begin_ending(reason) {
        bus.publish(stage, BusEvent::SceneFadeout);
    }
}

pub fn input(stage: &mut Stage, bus: &Bus, event: &InputEvent) {
    let Some(game) = stage.scenes.game.as_mut() else {
        return;
    };

    let is_start_trigger = match event {
        InputEvent::PointerDown(_) => true,
        InputEvent::KeyDown(key) => key.is_confirm(),
    };

    if is_start_trigger && game.begin_running() {
        bus.publish(stage, BusEvent::StartLevel);
    }
}

/// Runs one frame of the level.
pub fn update(stage: &mut Stage, bus: &Bus, delta: Duration) {
    let now = stage.now();
    let max_level = stage.levels.max_level();
    let dt = delta.as_secs_f32();

    let Some(game) = stage.scenes.game.as_mut() else {
        return;
    };

    game.step_physics(dt);
    let contacts = game.resolve_contacts();

    for event in contacts.picked_up {
        bus.publish(stage, event);
    }
    if let Some(reason) = contacts.ended {
        end_level(stage, bus, reason);
    }

    let Some(game) = stage.scenes.game.as_mut() else {
        return;
    };

    let frame = Frame {
        now,
        dt,
        scroll: Scroll::default(),
    };
    game.update_entities(&frame);
    game.camera.follow(game.player.body().position.x);

    if let Some(next) = game.poll_fade(delta, max_level) {
        stage.start(next);
    }
}
