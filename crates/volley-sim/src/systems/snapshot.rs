//! Snapshot system: reads the arena and builds a complete ArenaSnapshot.
//!
//! This system is read-only: it never modifies the world.

use volley_core::components::*;
use volley_core::events::GameEvent;
use volley_core::state::*;

use crate::arena::{actor_id, Arena};
use crate::systems::projectiles::Projectile;

/// Build a complete ArenaSnapshot from the current arena state.
pub fn build_snapshot(arena: &Arena, events: Vec<GameEvent>) -> ArenaSnapshot {
    ArenaSnapshot {
        time: arena.time,
        phase: arena.flow.phase,
        wave: arena.encounter.wave,
        gameplay_paused: arena.encounter.paused,
        attack_preset: arena.attack.preset_key.clone(),
        hero: build_hero(arena),
        enemies: build_enemies(arena),
        projectiles: build_projectiles(arena),
        loot: build_loot(arena),
        events,
    }
}

fn build_hero(arena: &Arena) -> HeroView {
    let hero = &arena.hero;
    HeroView {
        position: hero.body.position,
        yaw: hero.body.yaw,
        hp: hero.health.hp,
        max_hp: hero.health.max_hp,
        is_dead: hero.health.is_dead,
        motion: hero.motion(),
    }
}

/// Enemies in spawn order.
fn build_enemies(arena: &Arena) -> Vec<EnemyView> {
    arena
        .enemies
        .ids()
        .iter()
        .filter_map(|&entity| {
            let mut query = arena
                .world
                .query_one::<(&Enemy, &Health, &Transform, &EnemyBehavior)>(entity)
                .ok()?;
            let (enemy, health, transform, behavior) = query.get()?;
            Some(EnemyView {
                id: actor_id(entity),
                archetype: enemy.archetype,
                position: transform.position,
                hp: health.hp,
                max_hp: health.max_hp,
                active: enemy.active,
                phase: behavior.phase_name().to_string(),
            })
        })
        .collect()
}

fn build_projectiles(arena: &Arena) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = arena
        .world
        .query::<(&Projectile, &Transform)>()
        .iter()
        .map(|(entity, (projectile, transform))| ProjectileView {
            id: actor_id(entity),
            position: transform.position,
            faction: projectile.faction,
            mode: projectile.mode(),
            finishing: projectile.finishing,
        })
        .collect();
    projectiles.sort_by_key(|p| p.id);
    projectiles
}

fn build_loot(arena: &Arena) -> Vec<LootView> {
    let mut loot: Vec<LootView> = arena
        .world
        .query::<(&LootCoin, &Transform)>()
        .iter()
        .map(|(entity, (_, transform))| LootView {
            id: actor_id(entity),
            position: transform.position,
        })
        .collect();
    loot.sort_by_key(|l| l.id);
    loot
}
