//! The event bus coordinating gameplay entities and scene controllers.
//!
//! Delivery is synchronous: [`EventBus::publish`] runs every listener registered for the event's
//! name, in registration order, before it returns. Listeners receive the bus itself and may publish
//! again; a nested publish is fully delivered before the outer publish moves on to its next
//! listener (depth-first).
//!
//! Listeners also receive a mutable context `C` (the [`crate::scene::Stage`] in the game) instead of
//! capturing shared scene state, so no listener ever holds a borrow across a publish.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use strum_macros::{Display, EnumIter, IntoStaticStr};
use tracing::{debug, trace, warn};

use crate::entity::power_up::PowerUpKind;

/// A message on the bus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BusEvent {
    /// A power-up button asks for a power-up at a screen position.
    SpawnPowerUp { x: f32, y: f32, kind: PowerUpKind },
    /// The player collected a power-up.
    PowerUpPickedUp(PowerUpKind),
    RetryButton,
    MenuButton,
    /// A power-up button was pressed; every button goes on cooldown.
    StartButtonCooldown,
    /// The player left the instruction overlay and started running.
    StartLevel,
    /// The level is ending and the screen is about to fade out.
    SceneFadeout,
}

impl BusEvent {
    pub fn name(&self) -> EventName {
        match self {
            BusEvent::SpawnPowerUp { .. } => EventName::SpawnPowerUp,
            BusEvent::PowerUpPickedUp(_) => EventName::PowerUpPickedUp,
            BusEvent::RetryButton => EventName::RetryButton,
            BusEvent::MenuButton => EventName::MenuButton,
            BusEvent::StartButtonCooldown => EventName::StartButtonCooldown,
            BusEvent::StartLevel => EventName::StartLevel,
            BusEvent::SceneFadeout => EventName::SceneFadeout,
        }
    }
}

/// The name listeners subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum EventName {
    SpawnPowerUp,
    PowerUpPickedUp,
    RetryButton,
    MenuButton,
    StartButtonCooldown,
    StartLevel,
    SceneFadeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Handle returned by [`EventBus::subscribe`], used to remove exactly that listener later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub name: EventName,
    pub id: ListenerId,
}

type Handler<C> = Rc<RefCell<dyn FnMut(&mut C, &BusEvent, &EventBus<C>)>>;

struct Listener<C> {
    id: ListenerId,
    once: bool,
    handler: Handler<C>,
}

impl<C> Clone for Listener<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            once: self.once,
            handler: Rc::clone(&self.handler),
        }
    }
}

pub struct EventBus<C> {
    listeners: RefCell<HashMap<EventName, Vec<Listener<C>>>>,
    next_id: Cell<u64>,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }
}

impl<C> std::fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.borrow();
        let mut counts = listeners.iter().map(|(name, list)| (*name, list.len())).collect::<Vec<_>>();
        counts.sort_by_key(|(name, _)| <&'static str>::from(*name));
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, name: EventName, handler: F) -> Subscription
    where
        F: FnMut(&mut C, &BusEvent, &EventBus<C>) + 'static,
    {
        self.register(name, false, Rc::new(RefCell::new(handler)))
    }

    /// Like [`EventBus::subscribe`], but the listener is removed right before its first call.
    pub fn subscribe_once<F>(&self, name: EventName, handler: F) -> Subscription
    where
        F: FnMut(&mut C, &BusEvent, &EventBus<C>) + 'static,
    {
        self.register(name, true, Rc::new(RefCell::new(handler)))
    }

    fn register(&self, name: EventName, once: bool, handler: Handler<C>) -> Subscription {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.listeners
            .borrow_mut()
            .entry(name)
            .or_default()
            .push(Listener { id, once, handler });

        trace!(event = %name, listener = id.0, once, "Listener subscribed");
        Subscription { name, id }
    }

    /// Delivers `event` to every listener registered for its name and returns how many ran.
    ///
    /// The listener list is captured when the publish starts: listeners added during delivery only
    /// see later publishes, and listeners removed during delivery are skipped.
    pub fn publish(&self, ctx: &mut C, event: BusEvent) -> usize {
        let name = event.name();
        let snapshot = match self.listeners.borrow().get(&name) {
            Some(list) => list.clone(),
            None => Vec::new(),
        };

        debug!(event = %name, listeners = snapshot.len(), "Publishing {:?}", event);

        let mut delivered = 0;
        for listener in snapshot {
            if !self.is_registered(name, listener.id) {
                continue;
            }
            if listener.once {
                self.remove(name, listener.id);
            }

            match listener.handler.try_borrow_mut() {
                Ok(mut handler) => {
                    (&mut *handler)(ctx, &event, self);
                    delivered += 1;
                }
                Err(_) => {
                    warn!(event = %name, listener = listener.id.0, "Listener re-entered itself; skipping nested call");
                }
            }
        }

        delivered
    }

    /// Removes one listener when `id` is given, otherwise every listener for `name`.
    ///
    /// Returns how many listeners were removed.
    pub fn unsubscribe(&self, name: EventName, id: Option<ListenerId>) -> usize {
        match id {
            Some(id) => usize::from(self.remove(name, id)),
            None => self
                .listeners
                .borrow_mut()
                .remove(&name)
                .map(|list| list.len())
                .unwrap_or(0),
        }
    }

    pub fn cancel(&self, subscription: Subscription) -> bool {
        self.remove(subscription.name, subscription.id)
    }

    pub fn unsubscribe_all(&self) {
        self.listeners.borrow_mut().clear();
    }

    pub fn listener_count(&self, name: EventName) -> usize {
        self.listeners.borrow().get(&name).map_or(0, Vec::len)
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.borrow().values().map(Vec::len).sum()
    }

    fn is_registered(&self, name: EventName, id: ListenerId) -> bool {
        self.listeners
            .borrow()
            .get(&name)
            .is_some_and(|list| list.iter().any(|l| l.id == id))
    }

    fn remove(&self, name: EventName, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(&name) else {
            return false;
        };

        let before = list.len();
        list.retain(|l| l.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            listeners.remove(&name);
        }
        removed
    }
}
