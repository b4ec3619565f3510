//! Target selection over the live enemy set.
//!
//! Both searches scan enemies in registry (spawn) order and keep the best
//! candidate whose squared planar distance is `<=` the current bound, the
//! bound starting at `radius²`. Because the comparison is `<=`, a later
//! candidate at exactly the same distance replaces an earlier one: among
//! equidistant enemies the last one in spawn order wins.

use glam::DVec3;
use hecs::{Entity, World};

use volley_core::components::{Health, Transform};
use volley_core::types::planar_distance_sq;

use crate::arena::Arena;

/// Position of a live (present and not dead) actor.
pub fn live_position(world: &World, entity: Entity) -> Option<DVec3> {
    let health = world.get::<&Health>(entity).ok()?;
    if health.is_dead {
        return None;
    }
    world.get::<&Transform>(entity).ok().map(|t| t.position)
}

fn scan<'a>(
    world: &World,
    candidates: impl Iterator<Item = &'a Entity>,
    origin: DVec3,
    radius: f64,
    exclude: &[Entity],
) -> Option<Entity> {
    let mut best = None;
    let mut best_dist_sq = radius * radius;
    for &entity in candidates {
        if exclude.contains(&entity) {
            continue;
        }
        let Some(position) = live_position(world, entity) else {
            continue;
        };
        let dist_sq = planar_distance_sq(origin, position);
        if dist_sq <= best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some(entity);
        }
    }
    best
}

/// Nearest live enemy within `max_radius` of `origin`.
pub fn find_nearest_in_radius(arena: &Arena, origin: DVec3, max_radius: f64) -> Option<Entity> {
    scan(&arena.world, arena.enemies.ids().iter(), origin, max_radius, &[])
}

/// Next chain target for a ricochet: nearest live enemy within `radius` of
/// `from` (the position of the enemy just struck), skipping `exclude`.
pub fn find_next_ricochet_target(
    arena: &Arena,
    from: DVec3,
    exclude: &[Entity],
    radius: f64,
) -> Option<Entity> {
    scan(&arena.world, arena.enemies.ids().iter(), from, radius, exclude)
}
