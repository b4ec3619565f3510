//! Simulation engine: the entry point for presentation layers.
//!
//! `ArenaEngine` owns the arena context, applies player commands, drives the
//! scheduler one fixed tick at a time and produces `ArenaSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use volley_core::commands::PlayerCommand;
use volley_core::config::GameConfig;
use volley_core::constants::DT;
use volley_core::enums::FlowPhase;
use volley_core::events::GameEvent;
use volley_core::state::ArenaSnapshot;
use volley_core::types::SimTime;

use crate::arena::Arena;
use crate::event_bus::emit;
use crate::scheduler::run_tick;
use crate::systems;

/// Configuration for starting a new run.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Stats, waves and attack presets.
    pub config: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            config: GameConfig::default(),
        }
    }
}

/// The simulation engine. Owns the arena and the pending command queue.
pub struct ArenaEngine {
    arena: Arena,
    command_queue: VecDeque<PlayerCommand>,
}

impl ArenaEngine {
    /// Create a new engine and wire every subsystem.
    pub fn new(config: SimConfig) -> Self {
        let mut arena = Arena::new(config.seed, config.config);

        // Install order is frame order.
        systems::hero::install(&mut arena);
        systems::health::install(&mut arena);
        systems::encounter::install(&mut arena);
        systems::flow::install(&mut arena);
        systems::hero_attack::install(&mut arena);
        systems::enemies::install(&mut arena);
        systems::projectiles::install(&mut arena);
        systems::collision::install(&mut arena);
        systems::loot::install(&mut arena);

        Self {
            arena,
            command_queue: VecDeque::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> ArenaSnapshot {
        self.process_commands();
        run_tick(&mut self.arena, DT);
        self.arena.time.advance();

        let events = self.arena.drain_events();
        systems::snapshot::build_snapshot(&self.arena, events)
    }

    pub fn phase(&self) -> FlowPhase {
        self.arena.flow.phase
    }

    pub fn time(&self) -> SimTime {
        self.arena.time
    }

    /// Read-only view of the whole arena.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    #[cfg(test)]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        let arena = &mut self.arena;
        match command {
            PlayerCommand::Tap => {
                if arena.flow.phase == FlowPhase::Intro {
                    emit(arena, GameEvent::GameStart);
                }
            }
            PlayerCommand::SetMovement { speed, facing } => {
                arena.hero.set_movement(speed, facing);
            }
            PlayerCommand::SelectBoost { key } => {
                if arena.flow.phase == FlowPhase::ShowBoosts {
                    emit(arena, GameEvent::BoostSelected { key });
                }
            }
        }
    }
}
