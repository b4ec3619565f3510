//! VOLLEY headless runner.
//!
//! This crate wires the simulation into a fixed-rate game loop thread and
//! exposes a small control surface (start, send command, poll snapshot) to
//! whatever front end drives it.

pub mod control;
pub mod error;
pub mod game_loop;
pub mod state;

pub use volley_core as core;
