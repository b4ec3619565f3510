//! Synchronous publish/subscribe event bus.
//!
//! Handlers are plain function pointers that receive the whole context by
//! `&mut`, so a handler can mutate any subsystem and emit further events
//! without holding a borrow on the bus. Dispatch walks a snapshot of the
//! subscriber list taken when `emit` is called:
//!
//! - subscribers added during dispatch do not see the in-flight event;
//! - subscribers removed during dispatch are skipped if not yet visited;
//! - `once` subscribers are removed before their handler runs, so a
//!   reentrant emit of the same event cannot invoke them twice.

use std::collections::HashMap;
use std::hash::Hash;

/// An event that can be routed by kind.
pub trait BusEvent {
    type Kind: Copy + Eq + Hash;

    fn kind(&self) -> Self::Kind;
}

/// Event handler: receives the owning context and the event.
pub type Handler<C, E> = fn(&mut C, &E);

/// Opaque subscription handle returned by [`EventBus::on`] / [`EventBus::once`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscriber<C, E> {
    id: SubscriptionId,
    handler: Handler<C, E>,
    once: bool,
}

/// Subscriber table keyed by event kind. Subscription order is preserved.
pub struct EventBus<C, E: BusEvent> {
    subscribers: HashMap<E::Kind, Vec<Subscriber<C, E>>>,
    next_id: u64,
}

impl<C, E: BusEvent> Default for EventBus<C, E> {
    fn default() -> Self {
        Self {
            subscribers: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<C, E: BusEvent> EventBus<C, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to every event of `kind`.
    pub fn on(&mut self, kind: E::Kind, handler: Handler<C, E>) -> SubscriptionId {
        self.subscribe(kind, handler, false)
    }

    /// Subscribe `handler` to the next event of `kind` only.
    pub fn once(&mut self, kind: E::Kind, handler: Handler<C, E>) -> SubscriptionId {
        self.subscribe(kind, handler, true)
    }

    fn subscribe(&mut self, kind: E::Kind, handler: Handler<C, E>, once: bool) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.entry(kind).or_default().push(Subscriber { id, handler, once });
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        for list in self.subscribers.values_mut() {
            if let Some(index) = list.iter().position(|s| s.id == id) {
                list.remove(index);
                return true;
            }
        }
        false
    }

    /// Whether a subscription is still registered.
    pub fn is_subscribed(&self, kind: E::Kind, id: SubscriptionId) -> bool {
        self.subscribers
            .get(&kind)
            .is_some_and(|list| list.iter().any(|s| s.id == id))
    }

    /// Number of live subscribers for `kind`.
    pub fn subscriber_count(&self, kind: E::Kind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }

    /// Copy of the current subscriber list for `kind`, in subscription order.
    fn snapshot(&self, kind: E::Kind) -> Vec<(SubscriptionId, Handler<C, E>, bool)> {
        self.subscribers
            .get(&kind)
            .map(|list| list.iter().map(|s| (s.id, s.handler, s.once)).collect())
            .unwrap_or_default()
    }
}

/// A context that owns an [`EventBus`] over itself.
pub trait EventHost: Sized {
    type Event: BusEvent;

    fn bus(&mut self) -> &mut EventBus<Self, Self::Event>;

    /// Called once per emitted event, before any handler runs.
    fn record(&mut self, _event: &Self::Event) {}
}

/// Publish `event` synchronously to every current subscriber of its kind.
pub fn emit<C: EventHost>(ctx: &mut C, event: C::Event) {
    ctx.record(&event);

    let kind = event.kind();
    let snapshot = ctx.bus().snapshot(kind);
    for (id, handler, once) in snapshot {
        if !ctx.bus().is_subscribed(kind, id) {
            continue;
        }
        if once {
            ctx.bus().off(id);
        }
        handler(ctx, &event);
    }
}
