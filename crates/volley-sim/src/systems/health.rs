//! Damage and health pipeline.
//!
//! Enemies keep their hit points in the [`Health`] component; the hero keeps
//! them in [`HeroHealth`]. Every damage path checks `is_dead` first, so the
//! death transition happens exactly once per actor.

use hecs::Entity;
use tracing::{debug, info};

use volley_core::components::{Enemy, Health, Transform};
use volley_core::config::HeroStats;
use volley_core::constants::{COLOR_HERO_HIT, DAMAGE_NUMBER_Y_OFFSET};
use volley_core::enums::DamageSource;
use volley_core::events::{DamageTarget, EventKind, GameEvent};

use crate::arena::{actor_id, Arena};
use crate::event_bus::emit;
use crate::systems::status_effects;

/// Hero hit points plus the two independent damage throttles.
///
/// Both timers count down every tick, including during gameplay pause.
#[derive(Debug, Clone)]
pub struct HeroHealth {
    pub hp: i32,
    pub max_hp: i32,
    pub is_dead: bool,
    /// Remaining invulnerability after the last successful hit.
    pub invulnerable_timer: f64,
    /// Remaining contact-damage cooldown.
    pub contact_timer: f64,
    pub invulnerable_secs: f64,
    pub contact_cooldown_secs: f64,
}

impl HeroHealth {
    pub fn new(stats: &HeroStats) -> Self {
        Self {
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            is_dead: false,
            invulnerable_timer: 0.0,
            contact_timer: 0.0,
            invulnerable_secs: stats.invulnerable_secs,
            contact_cooldown_secs: stats.contact_cooldown_secs,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0.0
    }
}

pub fn install(arena: &mut Arena) {
    arena.bus.on(EventKind::PlayerTakeDamage, on_player_take_damage);
    arena.scheduler.frames.register("hero_health", tick_hero_timers);
}

/// Whole points of damage: floored, never negative.
fn whole_points(amount: f64) -> i32 {
    amount.floor().max(0.0) as i32
}

/// Damage an enemy. Returns true if this call killed it.
///
/// No-op on dead or despawned enemies.
pub fn apply_damage(arena: &mut Arena, entity: Entity, amount: f64) -> bool {
    let points = whole_points(amount);
    let lethal = {
        let Ok(mut health) = arena.world.get::<&mut Health>(entity) else {
            return false;
        };
        if health.is_dead {
            return false;
        }
        health.hp -= points;
        health.hp <= 0
    };
    if lethal {
        kill_enemy(arena, entity);
    }
    lethal
}

/// Death transition: runs once per enemy, later calls are silent no-ops.
///
/// Marks the enemy dead, cancels its status effects, removes it from the
/// registry, despawns it (which invalidates every weak reference to it) and
/// finally emits `EnemyKilled`.
pub fn kill_enemy(arena: &mut Arena, entity: Entity) {
    {
        let Ok(mut health) = arena.world.get::<&mut Health>(entity) else {
            return;
        };
        if health.is_dead {
            return;
        }
        health.is_dead = true;
        health.hp = health.hp.min(0);
    }

    let archetype = match arena.world.get::<&Enemy>(entity) {
        Ok(enemy) => enemy.archetype,
        Err(_) => return,
    };
    let position = arena
        .world
        .get::<&Transform>(entity)
        .map(|t| t.position)
        .unwrap_or_default();

    status_effects::cancel_all_for(arena, entity);
    arena.enemies.remove(entity);
    let _ = arena.world.despawn(entity);

    debug!(enemy = ?entity, %archetype, "enemy killed");
    emit(
        arena,
        GameEvent::EnemyKilled {
            enemy: actor_id(entity),
            archetype,
            position,
        },
    );
}

fn on_player_take_damage(arena: &mut Arena, event: &GameEvent) {
    if let GameEvent::PlayerTakeDamage { amount, source } = *event {
        take_damage(arena, amount, source);
    }
}

/// Apply damage to the hero unless dead or invulnerable.
pub fn take_damage(arena: &mut Arena, amount: i32, source: DamageSource) {
    let health = &mut arena.hero.health;
    if health.is_dead || health.is_invulnerable() {
        return;
    }
    let amount = amount.max(0);
    health.hp = (health.hp - amount).max(0);
    health.invulnerable_timer = health.invulnerable_secs;
    let died = health.hp <= 0;
    if died {
        health.is_dead = true;
    }
    debug!(hp = health.hp, amount, ?source, "hero hit");

    emit(
        arena,
        GameEvent::ShowDamageNumber {
            target: DamageTarget::Hero,
            amount,
            color: COLOR_HERO_HIT,
            y_offset: DAMAGE_NUMBER_Y_OFFSET,
        },
    );

    if died {
        info!("hero died");
        emit(arena, GameEvent::PlayerDied);
    }
}

/// Contact damage from an overlapping body, throttled by the contact cooldown.
/// The throttle runs even when the invulnerability window swallows the hit.
pub fn try_contact_damage(arena: &mut Arena, amount: i32) {
    let health = &arena.hero.health;
    if health.is_dead || health.contact_timer > 0.0 {
        return;
    }
    emit(
        arena,
        GameEvent::PlayerTakeDamage {
            amount,
            source: DamageSource::Contact,
        },
    );
    arena.hero.health.contact_timer = arena.hero.health.contact_cooldown_secs;
}

/// Frame callback: count both hero throttles down. Not gated by pause.
pub fn tick_hero_timers(arena: &mut Arena, dt: f64) {
    let health = &mut arena.hero.health;
    health.invulnerable_timer = count_down(health.invulnerable_timer, dt);
    health.contact_timer = count_down(health.contact_timer, dt);
}

/// Subtract `dt`, snapping accumulated float error to zero.
fn count_down(timer: f64, dt: f64) -> f64 {
    let left = timer - dt;
    if left > 1e-9 {
        left
    } else {
        0.0
    }
}
