//! Headless arena simulation for VOLLEY.
//!
//! Owns the hecs ECS world, the event bus and the scheduler, runs every
//! subsystem at a fixed tick rate and produces ArenaSnapshots for the
//! presentation layer.

pub mod arena;
pub mod engine;
pub mod event_bus;
pub mod fsm;
pub mod scheduler;
pub mod systems;
pub mod world_setup;

pub use engine::ArenaEngine;
pub use volley_core as core;
