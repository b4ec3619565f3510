//! Planar overlap sensing.
//!
//! Stands in for the physics layer's sensor callbacks: it detects overlaps
//! on the ground plane and hands each one to the same hit-resolution entry
//! points an external collision layer would call.
//!
//! - projectile leaves the arena: [`projectiles::hit_obstacle`]
//! - hero projectile overlaps an enemy: [`projectiles::hit_enemy`]
//! - enemy projectile overlaps the hero: [`projectiles::hit_hero`]
//! - enemy body overlaps the hero: [`health::try_contact_damage`]

use hecs::Entity;

use volley_core::components::{Enemy, Transform};
use volley_core::constants::BODY_RADIUS;
use volley_core::enums::Faction;
use volley_core::types::planar_distance_sq;

use crate::arena::Arena;
use crate::systems::projectiles::{self, Projectile};
use crate::systems::{health, targeting};

/// One detected overlap, resolved after the scan.
enum Contact {
    Wall(Entity),
    Enemy(Entity, Entity),
    Hero(Entity),
}

pub fn install(arena: &mut Arena) {
    arena.scheduler.frames.register("collision", update);
}

/// Frame callback: sense and resolve this tick's overlaps.
pub fn update(arena: &mut Arena, _dt: f64) {
    let contacts = sense_projectiles(arena);
    for contact in contacts {
        match contact {
            Contact::Wall(projectile) => projectiles::hit_obstacle(arena, projectile),
            Contact::Enemy(projectile, enemy) => projectiles::hit_enemy(arena, projectile, enemy),
            Contact::Hero(projectile) => projectiles::hit_hero(arena, projectile),
        }
    }
    sense_bodies(arena);
}

/// At most one contact per projectile per tick.
fn sense_projectiles(arena: &Arena) -> Vec<Contact> {
    let bounds = arena.config.arena;
    let hero_position = arena.hero.position();
    let hero_alive = !arena.hero.health.is_dead;

    let mut contacts = Vec::new();
    let mut query = arena.world.query::<(&Projectile, &Transform)>();
    for (entity, (projectile, transform)) in query.iter() {
        if projectile.finishing {
            continue;
        }
        let position = transform.position;
        if !bounds.contains(position) {
            contacts.push(Contact::Wall(entity));
            continue;
        }
        match projectile.faction {
            Faction::Hero => {
                let hit_set = projectile
                    .ricochet
                    .as_ref()
                    .map(|chain| chain.hit_set.as_slice())
                    .unwrap_or(&[]);
                let struck = arena.enemies.ids().iter().copied().find(|&enemy| {
                    if hit_set.contains(&enemy) {
                        return false;
                    }
                    let Some(enemy_pos) = targeting::live_position(&arena.world, enemy) else {
                        return false;
                    };
                    let body = arena
                        .world
                        .get::<&Enemy>(enemy)
                        .map_or(BODY_RADIUS, |e| e.body_radius);
                    let reach = projectile.hit_radius + body;
                    planar_distance_sq(position, enemy_pos) <= reach * reach
                });
                if let Some(enemy) = struck {
                    contacts.push(Contact::Enemy(entity, enemy));
                }
            }
            Faction::Enemy => {
                let reach = projectile.hit_radius + BODY_RADIUS;
                if hero_alive && planar_distance_sq(position, hero_position) <= reach * reach {
                    contacts.push(Contact::Hero(entity));
                }
            }
        }
    }
    contacts
}

/// Enemy bodies touching the hero deal throttled contact damage.
fn sense_bodies(arena: &mut Arena) {
    if arena.hero.health.is_dead {
        return;
    }
    let hero_position = arena.hero.position();
    let touching: Vec<i32> = arena
        .enemies
        .ids()
        .iter()
        .filter_map(|&entity| {
            let enemy = arena.world.get::<&Enemy>(entity).ok()?;
            let position = targeting::live_position(&arena.world, entity)?;
            let reach = enemy.body_radius + BODY_RADIUS;
            (planar_distance_sq(position, hero_position) <= reach * reach)
                .then_some(enemy.contact_damage)
        })
        .collect();

    for damage in touching {
        health::try_contact_damage(arena, damage);
    }
}
