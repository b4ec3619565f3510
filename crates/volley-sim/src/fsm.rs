//! Generic finite-state machine.
//!
//! A [`Machine`] holds one boxed [`State`] per id plus the polled
//! [`Predicate`]s registered for it. States and predicates receive the
//! machine's context explicitly; nothing is captured.
//!
//! Predicates come in two flavours:
//!
//! - polled: checked on every [`Machine::update`] while their state is active;
//! - event-driven: a bus handler that calls [`request`] on a context
//!   implementing [`MachineHost`].
//!
//! Machines stored inside their own context are taken out of their slot while
//! they run, so a state's `enter`/`exit` can emit events whose handlers request
//! further transitions. Those requests queue up and are applied in order once
//! the running transition has finished.

use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

use tracing::warn;

/// A target state plus its entry parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, P> {
    pub to: S,
    pub params: P,
}

/// One state of a machine.
pub trait State<P, C> {
    fn enter(&mut self, _ctx: &mut C, _params: &P) {}

    fn update(&mut self, _ctx: &mut C) {}

    fn exit(&mut self, _ctx: &mut C) {}
}

/// A polled transition condition.
pub trait Predicate<S, P, C> {
    fn check(&mut self, ctx: &C) -> Option<Transition<S, P>>;
}

struct Slot<S, P, C> {
    state: Box<dyn State<P, C>>,
    predicates: Vec<Box<dyn Predicate<S, P, C>>>,
}

/// A set of named states and the currently active one.
pub struct Machine<S, P, C> {
    slots: HashMap<S, Slot<S, P, C>>,
    current: Option<S>,
}

impl<S, P, C> Default for Machine<S, P, C> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            current: None,
        }
    }
}

impl<S, P, C> Machine<S, P, C>
where
    S: Copy + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state under `id`, replacing any previous one.
    pub fn add_state(&mut self, id: S, state: impl State<P, C> + 'static) -> &mut Self {
        self.slots.insert(
            id,
            Slot {
                state: Box::new(state),
                predicates: Vec::new(),
            },
        );
        self
    }

    /// Attach a polled predicate to the state `id`.
    pub fn add_predicate(&mut self, id: S, predicate: impl Predicate<S, P, C> + 'static) -> &mut Self {
        match self.slots.get_mut(&id) {
            Some(slot) => slot.predicates.push(Box::new(predicate)),
            None => warn!(state = ?id, "predicate added to unknown state"),
        }
        self
    }

    pub fn current(&self) -> Option<S> {
        self.current
    }

    pub fn has_state(&self, id: S) -> bool {
        self.slots.contains_key(&id)
    }

    /// Exit the active state (if any), then enter `id` with `params`.
    /// Unknown ids are logged and ignored.
    pub fn set(&mut self, id: S, params: P, ctx: &mut C) {
        if !self.slots.contains_key(&id) {
            warn!(state = ?id, "transition to unknown state ignored");
            return;
        }
        if let Some(old) = self.current.take() {
            if let Some(slot) = self.slots.get_mut(&old) {
                slot.state.exit(ctx);
            }
        }
        self.current = Some(id);
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.state.enter(ctx, &params);
        }
    }

    /// Run the active state's update, then poll its predicates. The first
    /// predicate that fires triggers a transition.
    pub fn update(&mut self, ctx: &mut C) {
        let Some(id) = self.current else {
            return;
        };
        let fired = match self.slots.get_mut(&id) {
            Some(slot) => {
                slot.state.update(ctx);
                slot.predicates.iter_mut().find_map(|p| p.check(ctx))
            }
            None => None,
        };
        if let Some(transition) = fired {
            self.set(transition.to, transition.params, ctx);
        }
    }
}

/// A context that stores a machine over itself plus its pending requests.
pub trait MachineHost<S, P>: Sized {
    fn machine_slot(&mut self) -> &mut Option<Machine<S, P, Self>>;

    fn pending_transitions(&mut self) -> &mut VecDeque<Transition<S, P>>;
}

/// Queue a transition and apply it now unless the machine is already running,
/// in which case the running call applies it when it finishes.
pub fn request<C, S, P>(ctx: &mut C, to: S, params: P)
where
    C: MachineHost<S, P>,
    S: Copy + Eq + Hash + Debug,
{
    ctx.pending_transitions().push_back(Transition { to, params });
    drive(ctx, false);
}

/// Run one machine update plus any queued transitions.
pub fn update_hosted<C, S, P>(ctx: &mut C)
where
    C: MachineHost<S, P>,
    S: Copy + Eq + Hash + Debug,
{
    drive(ctx, true);
}

fn drive<C, S, P>(ctx: &mut C, with_update: bool)
where
    C: MachineHost<S, P>,
    S: Copy + Eq + Hash + Debug,
{
    let Some(mut machine) = ctx.machine_slot().take() else {
        return;
    };
    if with_update {
        machine.update(ctx);
    }
    while let Some(transition) = ctx.pending_transitions().pop_front() {
        machine.set(transition.to, transition.params, ctx);
    }
    *ctx.machine_slot() = Some(machine);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Light {
        Red,
        Green,
        Broken,
    }

    #[derive(Default)]
    struct Ctx {
        log: Vec<String>,
        ticks: u32,
        machine: Option<Machine<Light, u32, Ctx>>,
        pending: VecDeque<Transition<Light, u32>>,
    }

    impl MachineHost<Light, u32> for Ctx {
        fn machine_slot(&mut self) -> &mut Option<Machine<Light, u32, Ctx>> {
            &mut self.machine
        }

        fn pending_transitions(&mut self) -> &mut VecDeque<Transition<Light, u32>> {
            &mut self.pending
        }
    }

    struct Logged(&'static str);

    impl State<u32, Ctx> for Logged {
        fn enter(&mut self, ctx: &mut Ctx, params: &u32) {
            ctx.log.push(format!("enter {} {params}", self.0));
        }

        fn update(&mut self, ctx: &mut Ctx) {
            ctx.ticks += 1;
        }

        fn exit(&mut self, ctx: &mut Ctx) {
            ctx.log.push(format!("exit {}", self.0));
        }
    }

    /// Entering green immediately requests red, as an event handler would.
    struct Bouncing;

    impl State<u32, Ctx> for Bouncing {
        fn enter(&mut self, ctx: &mut Ctx, params: &u32) {
            ctx.log.push(format!("enter green {params}"));
            request(ctx, Light::Red, params + 1);
            ctx.log.push("green entered".to_string());
        }
    }

    struct AfterTicks(u32);

    impl Predicate<Light, u32, Ctx> for AfterTicks {
        fn check(&mut self, ctx: &Ctx) -> Option<Transition<Light, u32>> {
            (ctx.ticks >= self.0).then_some(Transition {
                to: Light::Green,
                params: ctx.ticks,
            })
        }
    }

    #[test]
    fn test_set_runs_exit_then_enter() {
        let mut ctx = Ctx::default();
        let mut machine: Machine<Light, u32, Ctx> = Machine::new();
        machine.add_state(Light::Red, Logged("red"));
        machine.add_state(Light::Green, Logged("green"));
        machine.set(Light::Red, 1, &mut ctx);
        machine.set(Light::Green, 2, &mut ctx);
        assert_eq!(ctx.log, vec!["enter red 1", "exit red", "enter green 2"]);
        assert_eq!(machine.current(), Some(Light::Green));
    }

    #[test]
    fn test_unknown_state_is_ignored() {
        let mut ctx = Ctx::default();
        let mut machine: Machine<Light, u32, Ctx> = Machine::new();
        machine.add_state(Light::Red, Logged("red"));
        machine.set(Light::Red, 0, &mut ctx);
        machine.set(Light::Broken, 0, &mut ctx);
        assert_eq!(machine.current(), Some(Light::Red));
        assert_eq!(ctx.log, vec!["enter red 0"]);
    }

    #[test]
    fn test_polled_predicate() {
        let mut ctx = Ctx::default();
        let mut machine: Machine<Light, u32, Ctx> = Machine::new();
        machine.add_state(Light::Red, Logged("red"));
        machine.add_state(Light::Green, Logged("green"));
        machine.add_predicate(Light::Red, AfterTicks(3));
        machine.set(Light::Red, 0, &mut ctx);
        machine.update(&mut ctx);
        machine.update(&mut ctx);
        assert_eq!(machine.current(), Some(Light::Red));
        machine.update(&mut ctx);
        assert_eq!(machine.current(), Some(Light::Green));
        assert_eq!(ctx.log.last().map(String::as_str), Some("enter green 3"));
    }

    /// A request made from inside `enter` is applied after that `enter` returns.
    #[test]
    fn test_request_during_transition_is_queued() {
        let mut ctx = Ctx::default();
        let mut machine: Machine<Light, u32, Ctx> = Machine::new();
        machine.add_state(Light::Red, Logged("red"));
        machine.add_state(Light::Green, Bouncing);
        ctx.machine = Some(machine);

        request(&mut ctx, Light::Green, 7);
        assert_eq!(
            ctx.log,
            vec!["enter green 7", "green entered", "enter red 8"]
        );
        assert!(ctx.pending.is_empty());
        assert_eq!(ctx.machine.as_ref().and_then(|m| m.current()), Some(Light::Red));
    }

    #[test]
    fn test_update_hosted() {
        let mut ctx = Ctx::default();
        let mut machine: Machine<Light, u32, Ctx> = Machine::new();
        machine.add_state(Light::Red, Logged("red"));
        machine.add_state(Light::Green, Logged("green"));
        machine.add_predicate(Light::Red, AfterTicks(1));
        ctx.machine = Some(machine);
        request(&mut ctx, Light::Red, 0);
        update_hosted::<Ctx, Light, u32>(&mut ctx);
        assert_eq!(ctx.machine.as_ref().and_then(|m| m.current()), Some(Light::Green));
    }
}
