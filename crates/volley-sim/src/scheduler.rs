//! Fixed-tick driver and delayed tasks.
//!
//! A [`Scheduler`] owns two things:
//!
//! - a [`FrameTicker`]: per-frame callbacks invoked once per tick in
//!   registration order;
//! - a [`Timers`] queue: fire-once tasks due after a delay in simulated time.
//!
//! [`run_tick`] fires every matured timer (due order, ties in scheduling order)
//! and then the frame callbacks. Timers run independently of gameplay pause;
//! only cancellation stops them.

use std::collections::BTreeMap;

use volley_core::constants::DT;

/// Per-frame update callback.
pub type FrameFn<C> = fn(&mut C, f64);

/// Handle of a registered frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

struct FrameEntry<C> {
    id: FrameId,
    name: &'static str,
    callback: FrameFn<C>,
}

/// Ordered list of per-frame callbacks.
pub struct FrameTicker<C> {
    entries: Vec<FrameEntry<C>>,
    next_id: u64,
}

impl<C> Default for FrameTicker<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<C> FrameTicker<C> {
    pub fn register(&mut self, name: &'static str, callback: FrameFn<C>) -> FrameId {
        let id = FrameId(self.next_id);
        self.next_id += 1;
        self.entries.push(FrameEntry { id, name, callback });
        id
    }

    /// Remove a callback. Takes effect immediately: if the current tick has
    /// not reached it yet, it is skipped.
    pub fn unregister(&mut self, id: FrameId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn is_registered(&self, id: FrameId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Registered callback names, in invocation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    fn snapshot(&self) -> Vec<(FrameId, FrameFn<C>)> {
        self.entries.iter().map(|e| (e.id, e.callback)).collect()
    }
}

/// Cancel handle of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Delay-ordered task queue, keyed by `(due tick, scheduling sequence)`.
#[derive(Debug)]
pub struct Timers<T> {
    queue: BTreeMap<(u64, u64), T>,
    next_seq: u64,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            queue: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

/// Whole ticks covering `delay_secs`, rounded up.
pub fn delay_ticks(delay_secs: f64) -> u64 {
    let ticks = (delay_secs / DT - 1e-6).ceil();
    if ticks > 0.0 {
        ticks as u64
    } else {
        0
    }
}

impl<T> Timers<T> {
    /// Schedule `task` to fire `delay_secs` after tick `now`.
    pub fn schedule(&mut self, now: u64, delay_secs: f64, task: T) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = now + delay_ticks(delay_secs);
        self.queue.insert((due, seq), task);
        TimerHandle(seq)
    }

    /// Cancel a pending task. Cancelling a task that already fired (or was
    /// already cancelled) is a no-op returning false.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let key = self.queue.keys().find(|(_, seq)| *seq == handle.0).copied();
        match key {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.queue.keys().any(|(_, seq)| *seq == handle.0)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Remove and return the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<T> {
        let key = *self.queue.keys().next()?;
        if key.0 > now {
            return None;
        }
        self.queue.remove(&key)
    }
}

/// Frame callbacks plus delayed tasks.
pub struct Scheduler<C, T> {
    pub frames: FrameTicker<C>,
    pub timers: Timers<T>,
}

impl<C, T> Default for Scheduler<C, T> {
    fn default() -> Self {
        Self {
            frames: FrameTicker::default(),
            timers: Timers::default(),
        }
    }
}

/// A context that owns a [`Scheduler`] over itself.
pub trait SchedulerHost: Sized {
    type Task;

    fn scheduler(&mut self) -> &mut Scheduler<Self, Self::Task>;

    /// Ticks completed so far.
    fn current_tick(&self) -> u64;

    /// Execute a matured task.
    fn run_task(&mut self, task: Self::Task);
}

/// Schedule a task relative to the context's current tick.
pub fn schedule<C: SchedulerHost>(ctx: &mut C, delay_secs: f64, task: C::Task) -> TimerHandle {
    let now = ctx.current_tick();
    ctx.scheduler().timers.schedule(now, delay_secs, task)
}

/// Cancel a task previously returned by [`schedule`].
pub fn cancel<C: SchedulerHost>(ctx: &mut C, handle: TimerHandle) -> bool {
    ctx.scheduler().timers.cancel(handle)
}

/// Drive one tick: matured timers first, then every frame callback.
pub fn run_tick<C: SchedulerHost>(ctx: &mut C, dt: f64) {
    let now = ctx.current_tick();
    while let Some(task) = ctx.scheduler().timers.pop_due(now) {
        ctx.run_task(task);
    }

    let frames = ctx.scheduler().frames.snapshot();
    for (id, callback) in frames {
        if ctx.scheduler().frames.is_registered(id) {
            callback(ctx, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Job {
        Say(&'static str),
        Chain,
    }

    #[derive(Default)]
    struct Ctx {
        scheduler: Scheduler<Ctx, Job>,
        tick: u64,
        log: Vec<String>,
        doomed: Option<FrameId>,
    }

    impl SchedulerHost for Ctx {
        type Task = Job;

        fn scheduler(&mut self) -> &mut Scheduler<Ctx, Job> {
            &mut self.scheduler
        }

        fn current_tick(&self) -> u64 {
            self.tick
        }

        fn run_task(&mut self, task: Job) {
            match task {
                Job::Say(word) => self.log.push(format!("{}:{word}", self.tick)),
                Job::Chain => {
                    self.log.push(format!("{}:chain", self.tick));
                    schedule(self, 0.0, Job::Say("chained"));
                }
            }
        }
    }

    fn advance(ctx: &mut Ctx, ticks: u64) {
        for _ in 0..ticks {
            run_tick(ctx, DT);
            ctx.tick += 1;
        }
    }

    fn frame_a(ctx: &mut Ctx, _dt: f64) {
        ctx.log.push("a".into());
    }

    fn frame_b(ctx: &mut Ctx, _dt: f64) {
        ctx.log.push("b".into());
    }

    fn frame_killer(ctx: &mut Ctx, _dt: f64) {
        ctx.log.push("killer".into());
        if let Some(id) = ctx.doomed.take() {
            ctx.scheduler.frames.unregister(id);
        }
    }

    #[test]
    fn test_delay_ticks() {
        assert_eq!(delay_ticks(0.0), 0);
        assert_eq!(delay_ticks(1.0), 40);
        assert_eq!(delay_ticks(1.5), 60);
        assert_eq!(delay_ticks(0.01), 1);
        assert_eq!(delay_ticks(-2.0), 0);
    }

    #[test]
    fn test_timers_fire_in_due_order_then_sequence() {
        let mut ctx = Ctx::default();
        schedule(&mut ctx, 0.5, Job::Say("late"));
        schedule(&mut ctx, 0.25, Job::Say("early"));
        schedule(&mut ctx, 0.25, Job::Say("early2"));
        advance(&mut ctx, 30);
        assert_eq!(ctx.log, vec!["10:early", "10:early2", "20:late"]);
    }

    #[test]
    fn test_cancel() {
        let mut ctx = Ctx::default();
        let handle = schedule(&mut ctx, 0.25, Job::Say("never"));
        assert!(ctx.scheduler.timers.is_pending(handle));
        assert!(cancel(&mut ctx, handle));
        assert!(!cancel(&mut ctx, handle));
        advance(&mut ctx, 20);
        assert!(ctx.log.is_empty());
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut ctx = Ctx::default();
        let handle = schedule(&mut ctx, 0.1, Job::Say("once"));
        advance(&mut ctx, 10);
        assert_eq!(ctx.log.len(), 1);
        assert!(!cancel(&mut ctx, handle));
    }

    /// A zero-delay task scheduled from a firing task runs in the same tick.
    #[test]
    fn test_task_scheduled_during_drain() {
        let mut ctx = Ctx::default();
        schedule(&mut ctx, 0.05, Job::Chain);
        advance(&mut ctx, 3);
        assert_eq!(ctx.log, vec!["2:chain", "2:chained"]);
    }

    #[test]
    fn test_timers_fire_before_frames() {
        let mut ctx = Ctx::default();
        ctx.scheduler.frames.register("a", frame_a);
        schedule(&mut ctx, 0.0, Job::Say("timer"));
        advance(&mut ctx, 1);
        assert_eq!(ctx.log, vec!["0:timer", "a"]);
    }

    #[test]
    fn test_frames_in_registration_order() {
        let mut ctx = Ctx::default();
        ctx.scheduler.frames.register("b", frame_b);
        ctx.scheduler.frames.register("a", frame_a);
        advance(&mut ctx, 2);
        assert_eq!(ctx.log, vec!["b", "a", "b", "a"]);
        assert_eq!(ctx.scheduler.frames.names(), vec!["b", "a"]);
    }

    /// Unregistering mid-tick skips the not-yet-visited callback and every later tick.
    #[test]
    fn test_unregister_mid_tick() {
        let mut ctx = Ctx::default();
        ctx.scheduler.frames.register("a", frame_a);
        ctx.scheduler.frames.register("killer", frame_killer);
        let doomed = ctx.scheduler.frames.register("b", frame_b);
        ctx.doomed = Some(doomed);
        advance(&mut ctx, 2);
        assert_eq!(ctx.log, vec!["a", "killer", "a", "killer"]);
        assert!(!ctx.scheduler.frames.is_registered(doomed));
    }
}
