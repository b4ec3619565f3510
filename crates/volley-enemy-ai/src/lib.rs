//! Enemy AI for the VOLLEY arena.
//!
//! Implements the per-archetype behaviour state machines (archer roam/shoot
//! cycle, melee chase/telegraph/lunge/cooldown cycle) and the archetype
//! profiles that parameterise them.

pub mod fsm;
pub mod profiles;

pub use volley_core as core;

#[cfg(test)]
mod tests;
