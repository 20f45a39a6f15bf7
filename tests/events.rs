use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use speculoos::prelude::*;

use power_up_adventure::entity::PowerUpKind;
use power_up_adventure::events::{BusEvent, EventBus, EventName};

type Log = Vec<String>;

#[test]
fn test_event_names_are_camel_case() {
    assert_eq!(EventName::SpawnPowerUp.to_string(), "spawnPowerUp");
    assert_eq!(EventName::StartButtonCooldown.to_string(), "startButtonCooldown");
    assert_eq!(BusEvent::PowerUpPickedUp(PowerUpKind::Fly).name(), EventName::PowerUpPickedUp);
}

#[test]
fn test_publish_without_listeners() {
    let bus = EventBus::<Log>::new();
    let mut log = Log::new();
    assert_that(&bus.publish(&mut log, BusEvent::StartLevel)).is_equal_to(0);
    assert_that(&log).is_empty();
}

#[test]
fn test_listeners_run_in_registration_order() {
    let bus = EventBus::<Log>::new();
    bus.subscribe(EventName::RetryButton, |log, _, _| log.push("first".into()));
    bus.subscribe(EventName::RetryButton, |log, _, _| log.push("second".into()));
    bus.subscribe(EventName::MenuButton, |log, _, _| log.push("menu".into()));

    let mut log = Log::new();
    assert_that(&bus.publish(&mut log, BusEvent::RetryButton)).is_equal_to(2);
    assert_eq!(log, vec!["first", "second"]);
}

#[test]
fn test_nested_publish_is_depth_first() {
    let bus = EventBus::<Log>::new();
    bus.subscribe(EventName::StartLevel, |log, _, bus| {
        log.push("a1".into());
        bus.publish(log, BusEvent::SceneFadeout);
        log.push("a2".into());
    });
    bus.subscribe(EventName::SceneFadeout, |log, _, _| log.push("b".into()));
    bus.subscribe(EventName::StartLevel, |log, _, _| log.push("c".into()));

    let mut log = Log::new();
    bus.publish(&mut log, BusEvent::StartLevel);
    assert_eq!(log, vec!["a1", "b", "a2", "c"]);
}

#[test]
fn test_payload_is_delivered() {
    let bus = EventBus::<Log>::new();
    bus.subscribe(EventName::SpawnPowerUp, |log, event, _| {
        if let BusEvent::SpawnPowerUp { x, y, kind } = event {
            log.push(format!("{kind} at {x},{y}"));
        }
    });

    let mut log = Log::new();
    bus.publish(
        &mut log,
        BusEvent::SpawnPowerUp {
            x: 570.0,
            y: 60.0,
            kind: PowerUpKind::Speed,
        },
    );
    assert_eq!(log, vec!["Speed at 570,60"]);
}

#[test]
fn test_once_listener_runs_once() {
    let bus = EventBus::<Log>::new();
    bus.subscribe_once(EventName::MenuButton, |log, _, _| log.push("once".into()));

    let mut log = Log::new();
    bus.publish(&mut log, BusEvent::MenuButton);
    bus.publish(&mut log, BusEvent::MenuButton);

    assert_eq!(log, vec!["once"]);
    assert_that(&bus.listener_count(EventName::MenuButton)).is_equal_to(0);
}

#[test]
fn test_once_listener_is_gone_before_a_nested_publish() {
    let bus = EventBus::<Log>::new();
    bus.subscribe_once(EventName::StartLevel, |log, _, bus| {
        log.push("once".into());
        bus.publish(log, BusEvent::StartLevel);
    });

    let mut log = Log::new();
    bus.publish(&mut log, BusEvent::StartLevel);
    assert_eq!(log, vec!["once"]);
}

#[test]
fn test_listener_removed_mid_publish_is_skipped() {
    let bus = EventBus::<Log>::new();
    bus.subscribe(EventName::RetryButton, |log, _, bus| {
        log.push("first".into());
        bus.unsubscribe(EventName::RetryButton, None);
    });
    bus.subscribe(EventName::RetryButton, |log, _, _| log.push("second".into()));

    let mut log = Log::new();
    assert_that(&bus.publish(&mut log, BusEvent::RetryButton)).is_equal_to(1);
    assert_eq!(log, vec!["first"]);
    assert_that(&bus.listener_count(EventName::RetryButton)).is_equal_to(0);
}

#[test]
fn test_listener_added_mid_publish_waits_for_the_next_publish() {
    let bus = EventBus::<Log>::new();
    let added = Rc::new(Cell::new(false));
    let flag = Rc::clone(&added);
    bus.subscribe(EventName::StartLevel, move |log, _, bus| {
        log.push("outer".into());
        if !flag.replace(true) {
            bus.subscribe(EventName::StartLevel, |log, _, _| log.push("late".into()));
        }
    });

    let mut log = Log::new();
    bus.publish(&mut log, BusEvent::StartLevel);
    assert_eq!(log, vec!["outer"]);

    bus.publish(&mut log, BusEvent::StartLevel);
    assert_eq!(log, vec!["outer", "outer", "late"]);
}

#[test]
fn test_self_reentry_is_skipped() {
    let bus = EventBus::<Log>::new();
    bus.subscribe(EventName::SceneFadeout, |log, _, bus| {
        log.push("fadeout".into());
        if log.len() < 5 {
            bus.publish(log, BusEvent::SceneFadeout);
        }
    });

    let mut log = Log::new();
    assert_that(&bus.publish(&mut log, BusEvent::SceneFadeout)).is_equal_to(1);
    assert_eq!(log, vec!["fadeout"]);
}

#[test]
fn test_unsubscribe_by_id() {
    let bus = EventBus::<Log>::new();
    let first = bus.subscribe(EventName::StartLevel, |log, _, _| log.push("first".into()));
    bus.subscribe(EventName::StartLevel, |log, _, _| log.push("second".into()));

    assert_that(&bus.unsubscribe(EventName::StartLevel, Some(first.id))).is_equal_to(1);
    assert_that(&bus.unsubscribe(EventName::StartLevel, Some(first.id))).is_equal_to(0);

    let mut log = Log::new();
    bus.publish(&mut log, BusEvent::StartLevel);
    assert_eq!(log, vec!["second"]);
}

#[test]
fn test_cancel_and_counts() {
    let bus = EventBus::<Log>::new();
    let a = bus.subscribe(EventName::RetryButton, |_, _, _| {});
    bus.subscribe(EventName::MenuButton, |_, _, _| {});
    bus.subscribe(EventName::MenuButton, |_, _, _| {});

    assert_that(&bus.total_listeners()).is_equal_to(3);
    assert_that(&bus.cancel(a)).is_true();
    assert_that(&bus.cancel(a)).is_false();
    assert_that(&bus.listener_count(EventName::RetryButton)).is_equal_to(0);
    assert_that(&bus.unsubscribe(EventName::MenuButton, None)).is_equal_to(2);

    bus.subscribe(EventName::StartLevel, |_, _, _| {});
    bus.unsubscribe_all();
    assert_that(&bus.total_listeners()).is_equal_to(0);
}
