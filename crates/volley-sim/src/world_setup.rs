//! Entity spawn factories for the arena world.
//!
//! Creates enemy actors and loot coins with their component bundles.
//! The hero lives in a singleton slot on the arena, not in the ECS world.

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use volley_core::components::*;
use volley_core::constants::BODY_RADIUS;

use volley_enemy_ai::profiles::{initial_behavior, EnemyBehaviorProfile};

/// Spawn an enemy actor at `position` with full health.
pub fn spawn_enemy(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    profile: &EnemyBehaviorProfile,
    position: DVec3,
    active: bool,
) -> Entity {
    let behavior = initial_behavior(profile.archetype, rng);
    world.spawn((
        Transform { position, yaw: 0.0 },
        Health::full(profile.max_hp),
        Enemy {
            archetype: profile.archetype,
            contact_damage: profile.contact_damage,
            body_radius: BODY_RADIUS,
            active,
        },
        behavior,
        ActiveEffects::default(),
    ))
}

/// Spawn a loot coin with a random outward kick of magnitude `kick_speed`.
pub fn spawn_loot_coin(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    position: DVec3,
    kick_speed: f64,
) -> Entity {
    let angle = rng.gen::<f64>() * std::f64::consts::TAU;
    let kick = DVec3::new(angle.cos(), 0.0, angle.sin()) * kick_speed;
    world.spawn((
        Transform { position, yaw: 0.0 },
        LootCoin {
            kick,
            attracting: false,
            attract_speed: 0.0,
        },
    ))
}
