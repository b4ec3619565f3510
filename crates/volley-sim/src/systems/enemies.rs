//! Enemy registry and per-tick behaviour.
//!
//! The registry owns the live enemy set in spawn order (the scan order of
//! every target search). Behaviour stepping is delegated to the pure FSM in
//! `volley-enemy-ai`; this system applies its movement and turns its intents
//! into events.

use std::collections::HashMap;

use glam::DVec3;
use hecs::Entity;
use tracing::{debug, warn};

use volley_core::components::{Enemy, EnemyBehavior, Health, Transform};
use volley_core::config::GameConfig;
use volley_core::constants::{ENEMY_ARROW_LIFETIME_SECS, ENEMY_MUZZLE_HEIGHT};
use volley_core::enums::{EnemyArchetype, Faction};
use volley_core::events::{EventKind, GameEvent};

use volley_enemy_ai::fsm::{evaluate, EnemyContext, EnemyIntent};
use volley_enemy_ai::profiles::{get_profile, EnemyBehaviorProfile};

use crate::arena::{actor_id, entity_of, Arena};
use crate::event_bus::emit;
use crate::systems::projectiles::{self, ArrowSpec};
use crate::world_setup;

/// Live enemies plus the gameplay-gating flag mirrored from pause events.
#[derive(Debug, Clone)]
pub struct EnemyRegistry {
    order: Vec<Entity>,
    pub paused: bool,
    profiles: HashMap<EnemyArchetype, EnemyBehaviorProfile>,
}

impl EnemyRegistry {
    pub fn new(config: &GameConfig) -> Self {
        let profiles = [EnemyArchetype::Archer, EnemyArchetype::Melee]
            .into_iter()
            .map(|archetype| (archetype, get_profile(archetype, config)))
            .collect();
        Self {
            order: Vec::new(),
            paused: false,
            profiles,
        }
    }

    /// Live enemies in spawn order.
    pub fn ids(&self) -> &[Entity] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn profile(&self, archetype: EnemyArchetype) -> Option<&EnemyBehaviorProfile> {
        self.profiles.get(&archetype)
    }

    /// Drop a dead enemy from the live set.
    pub fn remove(&mut self, entity: Entity) {
        self.order.retain(|&e| e != entity);
    }
}

pub fn install(arena: &mut Arena) {
    arena.bus.on(EventKind::SpawnEnemy, on_spawn_enemy);
    arena.bus.on(EventKind::GameplayPause, on_gameplay_pause);
    arena.bus.on(EventKind::GameplayResume, on_gameplay_resume);
    arena.bus.on(EventKind::EnemyTryShoot, on_enemy_try_shoot);
    arena.scheduler.frames.register("enemies", update);
}

fn on_spawn_enemy(arena: &mut Arena, event: &GameEvent) {
    let GameEvent::SpawnEnemy {
        archetype,
        position,
        active,
        ..
    } = event
    else {
        return;
    };
    spawn(arena, archetype, *position, *active);
}

/// Create an enemy from a spawn request. Unknown archetypes are logged and
/// skipped.
pub fn spawn(arena: &mut Arena, archetype: &str, position: DVec3, active: bool) -> Option<Entity> {
    let archetype: EnemyArchetype = match archetype.parse() {
        Ok(archetype) => archetype,
        Err(err) => {
            warn!(%err, "spawn request skipped");
            return None;
        }
    };
    let profile = *arena.enemies.profile(archetype)?;
    let active = active && !arena.enemies.paused;
    let entity =
        world_setup::spawn_enemy(&mut arena.world, &mut arena.rng, &profile, position, active);
    arena.enemies.order.push(entity);
    debug!(enemy = ?entity, %archetype, active, "enemy spawned");
    Some(entity)
}

fn on_gameplay_pause(arena: &mut Arena, _event: &GameEvent) {
    arena.enemies.paused = true;
}

/// Lift the gate and wake every enemy, including the inert ones a wave just
/// placed.
fn on_gameplay_resume(arena: &mut Arena, _event: &GameEvent) {
    arena.enemies.paused = false;
    for (_entity, enemy) in arena.world.query_mut::<&mut Enemy>() {
        enemy.active = true;
    }
}

/// Fire one enemy arrow at the hero position captured when the archer shot.
fn on_enemy_try_shoot(arena: &mut Arena, event: &GameEvent) {
    let GameEvent::EnemyTryShoot { enemy, target } = *event else {
        return;
    };
    let Some(entity) = entity_of(enemy) else {
        return;
    };
    let Ok(position) = arena.world.get::<&Transform>(entity).map(|t| t.position) else {
        return;
    };
    let origin = position + DVec3::Y * ENEMY_MUZZLE_HEIGHT;
    let spec = ArrowSpec {
        speed: arena.config.archer.arrow_speed,
        damage: arena.config.archer.arrow_damage,
        hit_radius: arena.config.archer.arrow_hit_radius,
    };
    projectiles::spawn_straight(
        arena,
        Faction::Enemy,
        origin,
        target - origin,
        spec,
        ENEMY_ARROW_LIFETIME_SECS,
    );
}

/// Frame callback: step every active enemy. Gated by gameplay pause.
pub fn update(arena: &mut Arena, dt: f64) {
    if arena.enemies.paused {
        return;
    }
    let hero_position = arena.hero.position();
    let bounds = arena.config.arena;

    // Evaluate first, apply after: intents emit events whose handlers need the world.
    let mut intents: Vec<(Entity, EnemyIntent)> = Vec::new();
    for &entity in arena.enemies.order.iter() {
        let Ok(mut query) = arena
            .world
            .query_one::<(&Enemy, &Health, &mut Transform, &mut EnemyBehavior)>(entity)
        else {
            continue;
        };
        let Some((enemy, health, transform, behavior)) = query.get() else {
            continue;
        };
        if !enemy.active || health.is_dead {
            continue;
        }
        let Some(profile) = arena.enemies.profiles.get(&enemy.archetype) else {
            continue;
        };

        let ctx = EnemyContext {
            behavior: *behavior,
            position: transform.position,
            hero_position,
            dt,
        };
        let update = evaluate(&ctx, profile, &mut arena.rng);
        if update.phase_changed {
            debug!(
                enemy = ?entity,
                phase = update.behavior.phase_name(),
                "enemy phase"
            );
        }

        *behavior = update.behavior;
        transform.position = bounds.clamp(transform.position + update.displacement);
        if let Some(yaw) = update.facing {
            transform.yaw = yaw;
        }
        if let Some(intent) = update.intent {
            intents.push((entity, intent));
        }
    }

    for (entity, intent) in intents {
        let enemy = actor_id(entity);
        match intent {
            EnemyIntent::Shoot { target } => {
                emit(arena, GameEvent::EnemyTryShoot { enemy, target });
            }
            EnemyIntent::Telegraph { duration } => {
                emit(arena, GameEvent::MeleeTelegraphStart { enemy, duration });
            }
        }
    }
}
