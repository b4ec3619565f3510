//! Top-level game flow, built on the generic FSM.
//!
//! `Intro` → `Wave(n)` → `ShowBoosts(n)` → `Wave(n + 1)` … → `Complete`,
//! with `Fail` reachable from any phase on `player_died`. Every transition
//! is event-driven: bus handlers below call [`request`] on the arena.

use std::collections::VecDeque;

use tracing::info;

use volley_core::enums::FlowPhase;
use volley_core::events::{EventKind, GameEvent};

use crate::arena::{Arena, FlowMachine, Task};
use crate::event_bus::emit;
use crate::fsm::{request, update_hosted, Machine, State, Transition};
use crate::scheduler::{cancel, schedule, TimerHandle};
use crate::systems::encounter;

/// Entry parameters of a flow state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowParams {
    pub wave: u32,
}

/// Flow bookkeeping shared by the flow states.
#[derive(Debug, Default)]
pub struct FlowController {
    pub phase: FlowPhase,
    /// Wave the flow is on (or just finished, while showing boosts).
    pub wave: u32,
    /// Transitions requested while the machine is running.
    pub pending: VecDeque<Transition<FlowPhase, FlowParams>>,
    hint_timer: Option<TimerHandle>,
    auto_timer: Option<TimerHandle>,
    fail_timer: Option<TimerHandle>,
}

fn enter_phase(arena: &mut Arena, phase: FlowPhase, wave: u32) {
    arena.flow.phase = phase;
    arena.flow.wave = wave;
    info!(?phase, wave, "flow phase");
}

struct Intro;

impl State<FlowParams, Arena> for Intro {
    fn enter(&mut self, arena: &mut Arena, params: &FlowParams) {
        enter_phase(arena, FlowPhase::Intro, params.wave);
    }
}

struct Wave;

impl State<FlowParams, Arena> for Wave {
    fn enter(&mut self, arena: &mut Arena, params: &FlowParams) {
        enter_phase(arena, FlowPhase::Wave, params.wave);
        emit(arena, GameEvent::WaveStart { wave: params.wave });
    }
}

struct ShowBoosts;

impl State<FlowParams, Arena> for ShowBoosts {
    fn enter(&mut self, arena: &mut Arena, params: &FlowParams) {
        enter_phase(arena, FlowPhase::ShowBoosts, params.wave);
        emit(arena, GameEvent::ShowBoosts { wave: params.wave });
        let hint = arena.config.boosts.hint_secs;
        let auto = arena.config.boosts.auto_pick_secs;
        arena.flow.hint_timer = Some(schedule(arena, hint, Task::BoostHint));
        arena.flow.auto_timer = Some(schedule(arena, auto, Task::BoostAutoPick));
    }

    fn exit(&mut self, arena: &mut Arena) {
        if let Some(handle) = arena.flow.hint_timer.take() {
            cancel(arena, handle);
        }
        if let Some(handle) = arena.flow.auto_timer.take() {
            cancel(arena, handle);
        }
    }
}

struct Fail;

impl State<FlowParams, Arena> for Fail {
    fn enter(&mut self, arena: &mut Arena, _params: &FlowParams) {
        let wave = arena.flow.wave;
        enter_phase(arena, FlowPhase::Fail, wave);
        encounter::pause_gameplay(arena);
        arena.hero.stop();
        arena.hero.input_enabled = false;
        let delay = arena.config.encounter.fail_ui_delay_secs;
        arena.flow.fail_timer = Some(schedule(arena, delay, Task::ShowFailUi));
    }
}

struct Complete;

impl State<FlowParams, Arena> for Complete {
    fn enter(&mut self, arena: &mut Arena, params: &FlowParams) {
        enter_phase(arena, FlowPhase::Complete, params.wave);
        info!(waves = params.wave, "run complete");
        emit(arena, GameEvent::RunComplete);
    }
}

/// Build the flow machine, wire its triggers and enter `Intro`.
pub fn install(arena: &mut Arena) {
    let mut machine: FlowMachine = Machine::new();
    machine
        .add_state(FlowPhase::Intro, Intro)
        .add_state(FlowPhase::Wave, Wave)
        .add_state(FlowPhase::ShowBoosts, ShowBoosts)
        .add_state(FlowPhase::Fail, Fail)
        .add_state(FlowPhase::Complete, Complete);
    arena.flow_machine = Some(machine);

    arena.bus.once(EventKind::GameStart, on_game_start);
    arena.bus.on(EventKind::WaveCleared, on_wave_cleared);
    arena.bus.on(EventKind::BoostSelected, on_boost_chosen);
    arena.bus.on(EventKind::BoostAutoselect, on_boost_chosen);
    arena.bus.on(EventKind::PlayerDied, on_player_died);
    arena.scheduler.frames.register("flow", update);

    request(arena, FlowPhase::Intro, FlowParams::default());
}

pub fn update(arena: &mut Arena, _dt: f64) {
    update_hosted::<Arena, FlowPhase, FlowParams>(arena);
}

fn on_game_start(arena: &mut Arena, _event: &GameEvent) {
    if arena.flow.phase == FlowPhase::Intro {
        request(arena, FlowPhase::Wave, FlowParams { wave: 1 });
    }
}

fn on_wave_cleared(arena: &mut Arena, _event: &GameEvent) {
    if arena.flow.phase == FlowPhase::Wave {
        let wave = arena.flow.wave;
        request(arena, FlowPhase::ShowBoosts, FlowParams { wave });
    }
}

/// Explicit or automatic pick: next wave, or the end of the run.
fn on_boost_chosen(arena: &mut Arena, _event: &GameEvent) {
    if arena.flow.phase != FlowPhase::ShowBoosts {
        return;
    }
    let wave = arena.flow.wave;
    if arena.config.has_next_wave(wave) {
        request(arena, FlowPhase::Wave, FlowParams { wave: wave + 1 });
    } else {
        request(arena, FlowPhase::Complete, FlowParams { wave });
    }
}

fn on_player_died(arena: &mut Arena, _event: &GameEvent) {
    if arena.flow.phase != FlowPhase::Fail {
        let wave = arena.flow.wave;
        request(arena, FlowPhase::Fail, FlowParams { wave });
    }
}

pub fn on_boost_hint(arena: &mut Arena) {
    arena.flow.hint_timer = None;
    emit(arena, GameEvent::BoostTimeoutHint);
}

pub fn on_boost_auto_pick(arena: &mut Arena) {
    arena.flow.auto_timer = None;
    let key = arena.config.boosts.auto_pick_key.clone();
    emit(arena, GameEvent::BoostAutoselect { key });
}

pub fn on_show_fail_ui(arena: &mut Arena) {
    arena.flow.fail_timer = None;
    emit(arena, GameEvent::ShowFailUi);
}
