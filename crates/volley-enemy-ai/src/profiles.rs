//! Archetype-specific behavioral profiles.
//!
//! Consolidates per-archetype parameters for the enemy FSM, read from the
//! run's [`GameConfig`].

use rand::Rng;
use std::f64::consts::TAU;

use glam::DVec3;
use volley_core::components::{ArcherState, EnemyBehavior, MeleeState};
use volley_core::config::GameConfig;
use volley_core::enums::EnemyArchetype;

/// Behavioral profile for an enemy archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyBehaviorProfile {
    pub archetype: EnemyArchetype,
    pub max_hp: i32,
    /// Damage dealt to the hero on body contact.
    pub contact_damage: i32,
    /// Roam or chase speed (units/s).
    pub move_speed: f64,
    /// Archer: roam duration of each cycle.
    pub roam_secs: f64,
    /// Archer: pause after the shot before the next roam.
    pub shot_pause_secs: f64,
    /// Melee: chase time before each telegraph.
    pub charge_cooldown_secs: f64,
    pub telegraph_secs: f64,
    pub lunge_speed: f64,
    pub lunge_secs: f64,
    pub recover_secs: f64,
}

/// Get the behavioral profile for a given archetype.
pub fn get_profile(archetype: EnemyArchetype, config: &GameConfig) -> EnemyBehaviorProfile {
    match archetype {
        EnemyArchetype::Archer => {
            let s = &config.archer;
            EnemyBehaviorProfile {
                archetype,
                max_hp: s.hp,
                contact_damage: s.contact_damage,
                move_speed: s.move_speed,
                roam_secs: s.roam_secs,
                shot_pause_secs: s.shot_pause_secs,
                charge_cooldown_secs: 0.0,
                telegraph_secs: 0.0,
                lunge_speed: 0.0,
                lunge_secs: 0.0,
                recover_secs: 0.0,
            }
        }
        EnemyArchetype::Melee => {
            let s = &config.melee;
            EnemyBehaviorProfile {
                archetype,
                max_hp: s.hp,
                contact_damage: s.contact_damage,
                move_speed: s.move_speed,
                roam_secs: 0.0,
                shot_pause_secs: 0.0,
                charge_cooldown_secs: s.charge_cooldown_secs,
                telegraph_secs: s.telegraph_secs,
                lunge_speed: s.lunge_speed,
                lunge_secs: s.lunge_secs,
                recover_secs: s.recover_secs,
            }
        }
    }
}

/// Uniformly random unit direction on the ground plane.
pub fn random_ground_direction<R: Rng>(rng: &mut R) -> DVec3 {
    let angle = rng.gen::<f64>() * TAU;
    DVec3::new(angle.cos(), 0.0, angle.sin())
}

/// Behaviour state for a freshly spawned enemy.
pub fn initial_behavior<R: Rng>(archetype: EnemyArchetype, rng: &mut R) -> EnemyBehavior {
    match archetype {
        EnemyArchetype::Archer => EnemyBehavior::Archer(ArcherState {
            roam_dir: random_ground_direction(rng),
            ..ArcherState::default()
        }),
        EnemyArchetype::Melee => EnemyBehavior::Melee(MeleeState::default()),
    }
}
