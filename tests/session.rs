mod common;

use pretty_assertions::assert_eq;
use speculoos::prelude::*;

use power_up_adventure::entity::{EndCause, PlayerState};
use power_up_adventure::input::Key;
use power_up_adventure::presentation::{Cue, LabelId};
use power_up_adventure::scene::{resolve_transition, EndReason, LevelPhase, SceneKey, SceneLaunch, SessionData};

use common::{game_session, Harness, TestLevel};

#[test]
fn test_transitions_never_lose_attempts() {
    for level in 1..=10 {
        for attempts in [0, 1, 7, 250] {
            let session = SessionData { level, attempts };

            match resolve_transition(session, EndReason::Exit, 10) {
                SceneLaunch::Game(next) | SceneLaunch::Win(next) => {
                    assert_eq!(next.level, level + 1);
                    assert_eq!(next.attempts, attempts);
                }
                other => panic!("exit routed to {other:?}"),
            }

            assert_eq!(
                resolve_transition(session, EndReason::Retry, 10),
                SceneLaunch::Game(SessionData {
                    level,
                    attempts: attempts + 1
                })
            );
            assert_eq!(resolve_transition(session, EndReason::Menu, 10), SceneLaunch::Home);
        }
    }
}

#[test]
fn test_only_the_last_level_routes_to_win() {
    for level in 1..10 {
        let next = resolve_transition(SessionData { level, attempts: 1 }, EndReason::Exit, 10);
        assert!(matches!(next, SceneLaunch::Game(_)), "level {level} routed to {next:?}");
    }
    assert_eq!(
        resolve_transition(SessionData { level: 10, attempts: 4 }, EndReason::Exit, 10),
        SceneLaunch::Win(SessionData { level: 11, attempts: 4 })
    );
}

#[test]
fn test_setup_counts_one_attempt() {
    let harness = Harness::playing(vec![TestLevel::default()]);
    assert_eq!(harness.game().session(), SessionData { level: 1, attempts: 1 });
    assert_eq!(harness.ui().session(), SessionData { level: 1, attempts: 1 });
}

#[test]
fn test_death_retries_the_same_level() {
    let mut harness = Harness::playing(vec![TestLevel::default().with_spike(10)]);

    let died = harness.run_until(400, |d| {
        d.stage().scenes.game.as_ref().map(|g| g.phase()) == Some(LevelPhase::Ending(EndReason::Retry))
    });
    assert_that(&died).is_true();
    assert_eq!(harness.game().player().state(), PlayerState::Ended(EndCause::Killed));

    // Setup, the retry transition and the next setup each count once.
    let retried = harness.run_until(60, |d| game_session(d).is_some_and(|s| s.attempts == 3));
    assert_that(&retried).is_true();
    assert_eq!(harness.game().session().level, 1);
    assert_eq!(harness.game().phase(), LevelPhase::Running);
}

#[test]
fn test_attempts_accumulate_across_levels() {
    let mut harness = Harness::playing(vec![TestLevel::default(), TestLevel::default()]);

    harness.press(Key::R);
    assert_that(&harness.run_until(60, |d| game_session(d).is_some_and(|s| s.attempts == 3))).is_true();

    let advanced = harness.run_until(700, |d| game_session(d).is_some_and(|s| s.level == 2));
    assert_that(&advanced).is_true();
    assert_eq!(harness.game().session(), SessionData { level: 2, attempts: 4 });
}

#[test]
fn test_exit_on_the_last_level_shows_the_win_screen() {
    let levels = vec![TestLevel::default(); 10];
    let mut harness = Harness::new(levels);
    harness
        .director
        .start(SceneLaunch::Game(SessionData { level: 10, attempts: 3 }))
        .unwrap();
    assert_eq!(harness.game().session(), SessionData { level: 10, attempts: 4 });

    let won = harness.run_until(700, |d| d.is_active(SceneKey::Win));
    assert_that(&won).is_true();
    assert_eq!(harness.director.active_scenes(), vec![SceneKey::Win]);

    let win = harness.director.stage().scenes.win.as_ref().unwrap();
    assert_eq!(win.session(), SessionData { level: 11, attempts: 4 });
    assert_that(&harness.take_cues()).contains(Cue::Label {
        id: LabelId::Summary,
        text: "Attempts: 4".to_string(),
    });
}

#[test]
fn test_menu_discards_the_session() {
    let mut harness = Harness::playing(vec![TestLevel::default()]);
    harness.press(Key::Escape);

    let home = harness.run_until(60, |d| d.is_active(SceneKey::Home));
    assert_that(&home).is_true();
    assert_eq!(harness.director.active_scenes(), vec![SceneKey::Home]);

    // Playing again starts a fresh run.
    harness.press(Key::Enter);
    assert_eq!(harness.game().session(), SessionData { level: 1, attempts: 1 });
}
