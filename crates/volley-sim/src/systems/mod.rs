//! Arena subsystems.
//!
//! Each module owns one slice of [`crate::arena::Arena`] and exposes an
//! `install` function that subscribes its event handlers and registers its
//! frame callback. Frame callbacks are plain functions over `&mut Arena`.

pub mod collision;
pub mod encounter;
pub mod enemies;
pub mod flow;
pub mod health;
pub mod hero;
pub mod hero_attack;
pub mod loot;
pub mod projectiles;
pub mod snapshot;
pub mod status_effects;
pub mod targeting;
