//! Core types and definitions for the VOLLEY arena simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, events, configuration tables, snapshots and constants.
//! It has no dependency on the ECS or on any runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
