//! Wave orchestration.
//!
//! Runs one wave from its spawn descriptors:
//!
//! 1. `wave_start`: pause gameplay, show spawn markers (`wave_intro_start`).
//! 2. After the intro: `wave_intro_end`, one `spawn_enemy` per descriptor
//!    (inactive).
//! 3. After the resume delay: resume gameplay, which activates every enemy.
//!
//! Clear detection is a live counter decremented once per `enemy_killed`.
//! The `cleared` latch makes `wave_cleared` fire at most once per wave.

use tracing::{info, warn};

use volley_core::enums::EnemyArchetype;
use volley_core::events::{EventKind, GameEvent};

use crate::arena::{Arena, Task};
use crate::event_bus::emit;
use crate::scheduler::{cancel, schedule, TimerHandle};

#[derive(Debug, Clone, Default)]
pub struct EncounterState {
    /// Current wave number (0 before the first wave).
    pub wave: u32,
    /// Spawned enemies of this wave still alive.
    pub alive: u32,
    /// Gameplay gating, mirrored from pause/resume events.
    pub paused: bool,
    pub cleared: bool,
    telegraph_timer: Option<TimerHandle>,
    resume_timer: Option<TimerHandle>,
}

pub fn install(arena: &mut Arena) {
    arena.bus.on(EventKind::WaveStart, on_wave_start);
    arena.bus.on(EventKind::EnemyKilled, on_enemy_killed);
    arena.bus.on(EventKind::PlayerDied, on_player_died);
    arena.bus.on(EventKind::GameplayPause, on_gameplay_pause);
    arena.bus.on(EventKind::GameplayResume, on_gameplay_resume);
}

fn on_gameplay_pause(arena: &mut Arena, _event: &GameEvent) {
    arena.encounter.paused = true;
}

fn on_gameplay_resume(arena: &mut Arena, _event: &GameEvent) {
    arena.encounter.paused = false;
}

/// Disable enemy behaviour and hero attack. No-op if already paused.
pub fn pause_gameplay(arena: &mut Arena) {
    if !arena.encounter.paused {
        emit(arena, GameEvent::GameplayPause);
    }
}

/// Re-enable gated subsystems. No-op if not paused.
pub fn resume_gameplay(arena: &mut Arena) {
    if arena.encounter.paused {
        emit(arena, GameEvent::GameplayResume);
    }
}

fn cancel_pending(arena: &mut Arena) {
    if let Some(handle) = arena.encounter.telegraph_timer.take() {
        cancel(arena, handle);
    }
    if let Some(handle) = arena.encounter.resume_timer.take() {
        cancel(arena, handle);
    }
}

fn on_wave_start(arena: &mut Arena, event: &GameEvent) {
    let GameEvent::WaveStart { wave } = *event else {
        return;
    };
    start_wave(arena, wave);
}

/// Begin wave `wave`. A missing or empty wave is logged and nothing happens.
pub fn start_wave(arena: &mut Arena, wave: u32) {
    cancel_pending(arena);

    let positions: Vec<_> = match arena.config.wave(wave) {
        Some(config) if !config.enemies.is_empty() => {
            config.enemies.iter().map(|d| d.position).collect()
        }
        Some(_) => {
            warn!(wave, "wave has no enemies, not starting");
            return;
        }
        None => {
            warn!(wave, "wave not configured, not starting");
            return;
        }
    };

    arena.encounter.wave = wave;
    arena.encounter.alive = 0;
    arena.encounter.cleared = false;
    info!(wave, enemies = positions.len(), "wave starting");

    pause_gameplay(arena);
    emit(arena, GameEvent::WaveIntroStart { wave, positions });
    let delay = arena.config.encounter.wave_intro_secs;
    arena.encounter.telegraph_timer = Some(schedule(arena, delay, Task::WaveTelegraphEnd));
}

/// Intro over: spawn the wave's enemies inactive and schedule the resume.
pub fn on_telegraph_end(arena: &mut Arena) {
    arena.encounter.telegraph_timer = None;
    let wave = arena.encounter.wave;
    emit(arena, GameEvent::WaveIntroEnd { wave });

    let descriptors = arena
        .config
        .wave(wave)
        .map(|config| config.enemies.clone())
        .unwrap_or_default();
    // Unknown archetypes are skipped at spawn and never count towards the clear.
    arena.encounter.alive = descriptors
        .iter()
        .filter(|d| d.archetype.parse::<EnemyArchetype>().is_ok())
        .count() as u32;

    for descriptor in descriptors {
        emit(
            arena,
            GameEvent::SpawnEnemy {
                archetype: descriptor.archetype,
                position: descriptor.position,
                active: false,
                wave,
            },
        );
    }

    let delay = arena.config.encounter.resume_delay_secs;
    arena.encounter.resume_timer = Some(schedule(arena, delay, Task::WaveResume));
}

/// Gameplay back on. A wave that spawned nothing clears right away.
pub fn on_resume(arena: &mut Arena) {
    arena.encounter.resume_timer = None;
    resume_gameplay(arena);

    let state = &mut arena.encounter;
    if state.alive > 0 || state.cleared {
        return;
    }
    state.cleared = true;
    let wave = state.wave;
    warn!(wave, "wave spawned no known enemies, clearing");
    emit(arena, GameEvent::WaveCleared { wave });
}

fn on_enemy_killed(arena: &mut Arena, _event: &GameEvent) {
    let state = &mut arena.encounter;
    if state.alive == 0 {
        return;
    }
    state.alive -= 1;
    if state.alive > 0 || state.cleared {
        return;
    }
    state.cleared = true;
    let wave = state.wave;
    info!(wave, "wave cleared");
    emit(arena, GameEvent::WaveCleared { wave });
}

/// A late intro timer must not resume gameplay after death.
fn on_player_died(arena: &mut Arena, _event: &GameEvent) {
    cancel_pending(arena);
}
