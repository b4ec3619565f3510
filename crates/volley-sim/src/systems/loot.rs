//! Loot coins dropped by dead enemies.
//!
//! A coin pops out with a small damped kick. Once the wave is cleared and a
//! short delay has passed, every coin homes onto the hero with accelerating
//! speed and is collected on arrival.

use glam::DVec3;
use hecs::Entity;

use volley_core::components::{LootCoin, Transform};
use volley_core::constants::*;
use volley_core::events::{EventKind, GameEvent};

use crate::arena::{Arena, Task};
use crate::event_bus::emit;
use crate::scheduler::{schedule, TimerHandle};
use crate::world_setup;

#[derive(Debug, Clone, Default)]
pub struct LootState {
    attract_timer: Option<TimerHandle>,
}

pub fn install(arena: &mut Arena) {
    arena.bus.on(EventKind::EnemyKilled, on_enemy_killed);
    arena.bus.on(EventKind::WaveCleared, on_wave_cleared);
    arena.scheduler.frames.register("loot", update);
}

fn on_enemy_killed(arena: &mut Arena, event: &GameEvent) {
    let GameEvent::EnemyKilled { position, .. } = *event else {
        return;
    };
    world_setup::spawn_loot_coin(&mut arena.world, &mut arena.rng, position, LOOT_KICK_SPEED);
}

fn on_wave_cleared(arena: &mut Arena, _event: &GameEvent) {
    if arena.loot.attract_timer.is_some() {
        return;
    }
    let delay = arena.config.encounter.loot_attract_delay_secs;
    arena.loot.attract_timer = Some(schedule(arena, delay, Task::LootAttract));
}

/// Start pulling every coin on the ground towards the hero.
pub fn begin_attract(arena: &mut Arena) {
    arena.loot.attract_timer = None;
    for (_entity, coin) in arena.world.query_mut::<&mut LootCoin>() {
        if !coin.attracting {
            coin.attracting = true;
            coin.attract_speed = LOOT_ATTRACT_SPEED;
        }
        coin.kick = DVec3::ZERO;
    }
}

/// Frame callback. Not gated by pause.
pub fn update(arena: &mut Arena, dt: f64) {
    let hero = arena.hero.position();
    let mut collected: Vec<(Entity, DVec3)> = Vec::new();

    for (entity, (coin, transform)) in arena.world.query_mut::<(&mut LootCoin, &mut Transform)>() {
        let position = &mut transform.position;
        if coin.attracting {
            let dx = hero.x - position.x;
            let dz = hero.z - position.z;
            let distance = dx.hypot(dz);
            if distance <= LOOT_PICKUP_DISTANCE {
                collected.push((entity, *position));
                continue;
            }
            let step = coin.attract_speed * dt;
            position.x += dx / distance * step;
            position.z += dz / distance * step;
            coin.attract_speed =
                (coin.attract_speed + LOOT_ATTRACT_ACCEL * dt).min(LOOT_ATTRACT_MAX_SPEED);
        } else if coin.kick.x.abs() > 1e-3 || coin.kick.z.abs() > 1e-3 {
            *position += coin.kick * dt;
            coin.kick *= (1.0 - LOOT_KICK_DAMPING_PER_SEC * dt).max(0.0);
        }
    }

    for (entity, position) in collected {
        let _ = arena.world.despawn(entity);
        emit(arena, GameEvent::LootCollected { position });
    }
}

/// Coins currently on the ground.
pub fn coin_count(arena: &Arena) -> usize {
    arena.world.query::<&LootCoin>().iter().count()
}
