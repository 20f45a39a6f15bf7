mod common;

use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

use power_up_adventure::config::GameOptions;
use power_up_adventure::entity::{EndCause, GameEntity, PlayerState, PowerUpKind};
use power_up_adventure::input::Key;
use power_up_adventure::presentation::{Cue, LabelId, Sound};
use power_up_adventure::scene::{ButtonState, EndReason, GameScene, LevelPhase, SceneKey, SessionData};

use common::{Harness, TestLevel, FLY_BUTTON, SPEED_BUTTON};

fn phase(harness: &Harness) -> LevelPhase {
    harness.game().phase()
}

#[test]
fn test_level_without_instructions_starts_running() {
    let harness = Harness::playing(vec![TestLevel::default()]);

    assert_eq!(phase(&harness), LevelPhase::Running);
    assert_eq!(harness.game().player().state(), PlayerState::Running);
    assert_that(&harness.ui().is_started()).is_true();
    assert_eq!(harness.ui().button(PowerUpKind::Fly).state(), ButtonState::Active);
    assert_eq!(harness.ui().button(PowerUpKind::Speed).state(), ButtonState::Active);
    assert_eq!(harness.ui().button(PowerUpKind::Shoot).state(), ButtonState::HiddenEmpty);
}

#[test]
fn test_instructions_hold_the_level() {
    let mut harness = Harness::playing(vec![TestLevel::default().with_instructions("Click to start")]);
    assert_that(&harness.take_cues()).contains(Cue::Label {
        id: LabelId::Instructions,
        text: "Click to start".to_string(),
    });

    harness.run_frames(30);
    assert_eq!(phase(&harness), LevelPhase::WaitingToStart);
    assert_eq!(harness.game().player().state(), PlayerState::Idle);
    assert_that(&harness.game().player().body().position.x).is_equal_to(64.0);
    assert_eq!(harness.ui().button(PowerUpKind::Fly).state(), ButtonState::Uninitialized);

    // Buttons are dead until the level starts.
    harness.press(Key::Digit1);
    assert_that(&harness.game().power_ups().is_empty()).is_true();
    assert_that(&harness.ui().button(PowerUpKind::Fly).remaining()).is_equal_to(2);

    harness.press(Key::Enter);
    assert_eq!(phase(&harness), LevelPhase::Running);
    assert_that(&harness.ui().is_started()).is_true();
    assert_eq!(harness.ui().button(PowerUpKind::Fly).state(), ButtonState::Active);
    assert_that(&harness.take_cues()).contains(Cue::HideLabel(LabelId::Instructions));

    harness.run_frames(10);
    assert_that(&harness.game().player().body().position.x).is_greater_than(64.0);
}

#[test]
fn test_start_click_does_not_press_a_button() {
    let mut harness = Harness::playing(vec![TestLevel::default().with_instructions("Click to start")]);

    harness.click(FLY_BUTTON);
    assert_eq!(phase(&harness), LevelPhase::Running);
    assert_that(&harness.game().power_ups().is_empty()).is_true();
    assert_that(&harness.ui().button(PowerUpKind::Fly).remaining()).is_equal_to(2);

    harness.click(FLY_BUTTON);
    assert_that(&harness.game().power_ups().len()).is_equal_to(1);
    assert_that(&harness.ui().button(PowerUpKind::Fly).remaining()).is_equal_to(1);
}

#[test]
fn test_button_press_spawns_and_starts_the_cooldown() {
    let mut harness = Harness::playing(vec![TestLevel::default()]);
    harness.take_cues();

    harness.press(Key::Digit1);
    assert_that(&harness.game().power_ups().len()).is_equal_to(1);
    assert_eq!(harness.game().power_ups()[0].kind(), PowerUpKind::Fly);
    assert_eq!(harness.game().power_ups()[0].body().center(), Vec2::new(570.0, 60.0));
    assert_that(&harness.ui().button(PowerUpKind::Fly).remaining()).is_equal_to(1);
    assert_that(&harness.ui().cooldown().is_active()).is_true();
    for kind in [PowerUpKind::Fly, PowerUpKind::Speed] {
        assert_eq!(harness.ui().button(kind).state(), ButtonState::Inactive);
    }
    assert_that(&harness.take_cues()).contains(Cue::PlaySound(Sound::Spawn));

    // Every button is locked while the cooldown runs.
    harness.run_frames(30);
    harness.click(SPEED_BUTTON);
    harness.press(Key::Digit1);
    assert_that(&harness.ui().button(PowerUpKind::Speed).remaining()).is_equal_to(1);
    assert_that(&harness.ui().button(PowerUpKind::Fly).remaining()).is_equal_to(1);

    harness.run_frames(32);
    assert_that(&harness.ui().cooldown().is_active()).is_false();
    assert_eq!(harness.ui().button(PowerUpKind::Speed).state(), ButtonState::Active);

    harness.click(SPEED_BUTTON);
    assert_that(&harness.ui().button(PowerUpKind::Speed).remaining()).is_equal_to(0);
}

#[test]
fn test_picked_up_fly_launches_the_player() {
    let mut harness = Harness::playing(vec![TestLevel::default()]);
    harness.run_frames(30);
    harness.press(Key::Digit1);

    let flying = harness.run_until(300, |d| {
        d.stage().scenes.game.as_ref().is_some_and(|g| g.player().is_flying())
    });
    assert_that(&flying).is_true();
    assert_that(&harness.game().power_ups().is_empty()).is_true();
    assert_that(&harness.take_cues()).contains(Cue::PlaySound(Sound::Pickup));

    let landed = harness.run_until(120, |d| {
        d.stage().scenes.game.as_ref().is_some_and(|g| g.player().state() == PlayerState::Running)
    });
    assert_that(&landed).is_true();
}

#[test]
fn test_exit_reached() {
    let mut harness = Harness::playing(vec![TestLevel::default()]);

    let ending = harness.run_until(600, |d| {
        d.stage().scenes.game.as_ref().is_some_and(|g| g.phase() == LevelPhase::Ending(EndReason::Exit))
    });
    assert_that(&ending).is_true();
    assert_eq!(harness.game().player().state(), PlayerState::Ended(EndCause::ExitReached));

    let cues = harness.take_cues();
    assert_that(&cues).contains(Cue::PlaySound(Sound::Win));
    assert_that(&cues).contains(Cue::FadeOut);
    assert_that(&harness.ui().is_fading()).is_true();
}

#[test]
fn test_fade_gates_the_transition() {
    let mut harness = Harness::playing(vec![TestLevel::default()]);
    harness.press(Key::R);
    assert_eq!(phase(&harness), LevelPhase::Ending(EndReason::Retry));
    assert_that(&harness.game().fade().is_running()).is_true();

    // Nothing reacts while the screen fades.
    harness.press(Key::Digit1);
    harness.press(Key::Escape);
    assert_that(&harness.game().power_ups().is_empty()).is_true();
    assert_eq!(phase(&harness), LevelPhase::Ending(EndReason::Retry));
    for kind in [PowerUpKind::Fly, PowerUpKind::Speed] {
        assert_eq!(harness.ui().button(kind).state(), ButtonState::Inactive);
    }

    harness.run_frames(30);
    assert_eq!(harness.game().session().attempts, 1);
    assert_that(&harness.game().fade().alpha()).is_greater_than(0.9);

    harness.frame();
    assert_eq!(harness.game().session().attempts, 3);
    assert_eq!(phase(&harness), LevelPhase::Running);
    assert_that(&harness.ui().is_fading()).is_false();
}

#[test]
fn test_death_clears_power_ups() {
    let mut harness = Harness::playing(vec![TestLevel::default().with_spike(10)]);
    harness.press(Key::Digit1);
    assert_that(&harness.game().power_ups().len()).is_equal_to(1);

    let died = harness.run_until(300, |d| {
        d.stage().scenes.game.as_ref().is_some_and(|g| g.player().is_ended())
    });
    assert_that(&died).is_true();
    assert_eq!(harness.game().player().state(), PlayerState::Ended(EndCause::Killed));
    assert_that(&harness.game().power_ups().is_empty()).is_true();
}

#[test]
fn test_retry_does_not_accumulate_listeners() {
    let mut harness = Harness::playing(vec![TestLevel::default()]);
    let listeners = harness.director.bus().total_listeners();
    assert_that(&listeners).is_equal_to(7);

    for attempt in 0..3 {
        harness.press(Key::R);
        let restarted = harness.run_until(60, |d| {
            d.stage().scenes.game.as_ref().is_some_and(|g| g.session().attempts == 3 + attempt * 2)
        });
        assert_that(&restarted).is_true();
        assert_that(&harness.director.bus().total_listeners()).is_equal_to(listeners);
    }

    harness.press(Key::Escape);
    assert_that(&harness.run_until(60, |d| d.is_active(SceneKey::Home))).is_true();
    assert_that(&harness.director.bus().total_listeners()).is_equal_to(0);
}

#[test]
fn test_spawn_is_ignored_unless_running() {
    let options = Rc::new(GameOptions::default());
    let level = Rc::new(TestLevel::default().with_instructions("wait").build("level1"));
    let mut scene = GameScene::new(options, level, SessionData::new_run(), Duration::ZERO);

    assert_eq!(scene.phase(), LevelPhase::WaitingToStart);
    scene.spawn_power_up(Vec2::new(570.0, 60.0), PowerUpKind::Fly);
    assert_that(&scene.power_ups().is_empty()).is_true();
    assert_eq!(scene.session().attempts, 1);
}
