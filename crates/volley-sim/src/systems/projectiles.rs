//! Projectile flight: motion integration, lifetime, hit resolution, ricochet.
//!
//! A projectile is either homing (re-aims at its target's current position
//! every tick) or straight (frozen unit direction); never both. Targets are
//! held as entity handles, so a despawned target simply fails lookup.
//!
//! Endings:
//! - lifetime runs out, or the homing target is gone: removed at once;
//! - terminal hit or obstacle: `finishing` is set (no more motion or
//!   collisions) and the entity is removed after a short cosmetic linger.

use glam::DVec3;
use hecs::Entity;
use tracing::debug;

use volley_core::components::Transform;
use volley_core::config::{BurnSpec, RicochetSpec};
use volley_core::constants::*;
use volley_core::enums::{DamageSource, Faction, FlightMode, ProjectileEnd};
use volley_core::events::{DamageTarget, GameEvent};

use crate::arena::{actor_id, Arena, Task};
use crate::event_bus::emit;
use crate::scheduler::schedule;
use crate::systems::{health, status_effects, targeting};

/// Steering mode, fixed at construction except for ricochet retargeting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Guidance {
    Homing { target: Entity },
    Straight { direction: DVec3 },
}

/// Chain state of a ricochet arrow.
#[derive(Debug, Clone, PartialEq)]
pub struct RicochetState {
    pub max_targets: u32,
    pub radius: f64,
    /// Enemies already struck. Grows monotonically, never holds duplicates.
    pub hit_set: Vec<Entity>,
    pub hit_count: u32,
}

impl RicochetState {
    pub fn new(spec: RicochetSpec) -> Self {
        Self {
            max_targets: spec.max_targets.max(1),
            radius: spec.radius,
            hit_set: Vec::new(),
            hit_count: 0,
        }
    }
}

/// Projectile component.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub faction: Faction,
    pub guidance: Guidance,
    pub speed: f64,
    pub damage: i32,
    pub hit_radius: f64,
    pub elapsed: f64,
    pub max_lifetime: f64,
    pub ricochet: Option<RicochetState>,
    pub on_hit: Option<BurnSpec>,
    /// Flight is over; waiting out the linger.
    pub finishing: bool,
}

impl Projectile {
    pub fn mode(&self) -> FlightMode {
        match self.guidance {
            Guidance::Homing { .. } => FlightMode::Homing,
            Guidance::Straight { .. } => FlightMode::Straight,
        }
    }
}

/// Flight parameters shared by every arrow of one volley.
#[derive(Debug, Clone, Copy)]
pub struct ArrowSpec {
    pub speed: f64,
    pub damage: i32,
    pub hit_radius: f64,
}

fn facing(direction: DVec3) -> f64 {
    direction.x.atan2(direction.z)
}

pub fn install(arena: &mut Arena) {
    arena.scheduler.frames.register("projectiles", update);
}

/// Spawn a hero arrow homing on `target`. Returns `None` if the target is
/// not a live actor.
pub fn spawn_homing(
    arena: &mut Arena,
    origin: DVec3,
    target: Entity,
    spec: ArrowSpec,
    ricochet: Option<RicochetSpec>,
    on_hit: Option<BurnSpec>,
) -> Option<Entity> {
    let target_pos = targeting::live_position(&arena.world, target)?;
    let distance = origin.distance(target_pos);
    let max_lifetime = (distance / spec.speed + ARROW_HOMING_LIFETIME_SLACK_SECS)
        .clamp(ARROW_HOMING_LIFETIME_MIN_SECS, ARROW_HOMING_LIFETIME_MAX_SECS);
    let yaw = (target_pos - origin)
        .try_normalize()
        .map(facing)
        .unwrap_or_default();

    let projectile = Projectile {
        faction: Faction::Hero,
        guidance: Guidance::Homing { target },
        speed: spec.speed,
        damage: spec.damage,
        hit_radius: spec.hit_radius,
        elapsed: 0.0,
        max_lifetime,
        ricochet: ricochet.map(RicochetState::new),
        on_hit,
        finishing: false,
    };
    Some(arena.world.spawn((
        Transform {
            position: origin,
            yaw,
        },
        projectile,
    )))
}

/// Spawn a straight-flying arrow. A degenerate direction falls back to +Z.
pub fn spawn_straight(
    arena: &mut Arena,
    faction: Faction,
    origin: DVec3,
    direction: DVec3,
    spec: ArrowSpec,
    max_lifetime: f64,
) -> Entity {
    let direction = direction.try_normalize().unwrap_or(DVec3::Z);
    let projectile = Projectile {
        faction,
        guidance: Guidance::Straight { direction },
        speed: spec.speed,
        damage: spec.damage,
        hit_radius: spec.hit_radius,
        elapsed: 0.0,
        max_lifetime,
        ricochet: None,
        on_hit: None,
        finishing: false,
    };
    arena.world.spawn((
        Transform {
            position: origin,
            yaw: facing(direction),
        },
        projectile,
    ))
}

/// Frame callback: advance every flying projectile. Not gated by pause.
pub fn update(arena: &mut Arena, dt: f64) {
    let flying: Vec<Entity> = arena
        .world
        .query::<&Projectile>()
        .iter()
        .filter(|(_, p)| !p.finishing)
        .map(|(entity, _)| entity)
        .collect();

    for entity in flying {
        step(arena, entity, dt);
    }
}

fn step(arena: &mut Arena, entity: Entity, dt: f64) {
    let (guidance, speed, expired) = {
        let Ok(mut projectile) = arena.world.get::<&mut Projectile>(entity) else {
            return;
        };
        projectile.elapsed += dt;
        (
            projectile.guidance,
            projectile.speed,
            projectile.elapsed >= projectile.max_lifetime,
        )
    };
    if expired {
        end_now(arena, entity, ProjectileEnd::Expired);
        return;
    }

    let Ok(position) = arena.world.get::<&Transform>(entity).map(|t| t.position) else {
        return;
    };
    let direction = match guidance {
        Guidance::Straight { direction } => direction,
        Guidance::Homing { target } => match targeting::live_position(&arena.world, target) {
            Some(target_pos) => (target_pos - position).try_normalize().unwrap_or(DVec3::Z),
            None => {
                end_now(arena, entity, ProjectileEnd::TargetLost);
                return;
            }
        },
    };

    if let Ok(mut transform) = arena.world.get::<&mut Transform>(entity) {
        transform.position += direction * speed * dt;
        transform.yaw = facing(direction);
    }
}

/// Remove immediately, no linger.
fn end_now(arena: &mut Arena, entity: Entity, reason: ProjectileEnd) {
    debug!(projectile = ?entity, ?reason, "projectile ended");
    let _ = arena.world.despawn(entity);
}

/// Stop all logic now and remove after `linger_secs`. Idempotent.
fn finish(arena: &mut Arena, entity: Entity, linger_secs: f64, reason: ProjectileEnd) {
    {
        let Ok(mut projectile) = arena.world.get::<&mut Projectile>(entity) else {
            return;
        };
        if projectile.finishing {
            return;
        }
        projectile.finishing = true;
    }
    debug!(projectile = ?entity, ?reason, "projectile ended");
    schedule(arena, linger_secs, Task::DespawnProjectile(entity));
}

/// Scheduled removal after a linger.
pub fn despawn(arena: &mut Arena, entity: Entity) {
    let _ = arena.world.despawn(entity);
}

pub fn is_finishing(arena: &Arena, entity: Entity) -> bool {
    arena
        .world
        .get::<&Projectile>(entity)
        .map_or(true, |p| p.finishing)
}

/// Hit resolution for a hero arrow touching `enemy`.
///
/// Ignored when the arrow is already finishing, or when `enemy` is already in
/// its ricochet hit set. Striking a dead enemy ends the arrow without damage.
pub fn hit_enemy(arena: &mut Arena, entity: Entity, enemy: Entity) {
    let (damage, on_hit) = {
        let Ok(projectile) = arena.world.get::<&Projectile>(entity) else {
            return;
        };
        if projectile.finishing || projectile.faction != Faction::Hero {
            return;
        }
        if let Some(chain) = &projectile.ricochet {
            if chain.hit_set.contains(&enemy) {
                return;
            }
        }
        (projectile.damage, projectile.on_hit)
    };

    // Captured before damage: a lethal hit despawns the enemy.
    let Some(enemy_pos) = targeting::live_position(&arena.world, enemy) else {
        finish(arena, entity, LINGER_DEAD_TARGET_SECS, ProjectileEnd::TargetLost);
        return;
    };

    health::apply_damage(arena, enemy, damage as f64);
    emit(
        arena,
        GameEvent::ShowDamageNumber {
            target: DamageTarget::Enemy(actor_id(enemy)),
            amount: damage,
            color: COLOR_HIT,
            y_offset: DAMAGE_NUMBER_Y_OFFSET,
        },
    );
    if let Some(burn) = on_hit {
        status_effects::add_burn(arena, enemy, burn);
    }

    if try_ricochet(arena, entity, enemy, enemy_pos) {
        return;
    }
    finish(arena, entity, LINGER_TERMINAL_HIT_SECS, ProjectileEnd::TerminalHit);
}

/// Record the hit and retarget if the chain has budget and a next target
/// exists. Returns true if the arrow keeps flying.
fn try_ricochet(arena: &mut Arena, entity: Entity, struck: Entity, struck_pos: DVec3) -> bool {
    let chain = {
        let Ok(mut projectile) = arena.world.get::<&mut Projectile>(entity) else {
            return false;
        };
        let Some(chain) = projectile.ricochet.as_mut() else {
            return false;
        };
        if !chain.hit_set.contains(&struck) {
            chain.hit_set.push(struck);
        }
        chain.hit_count += 1;
        if chain.hit_count >= chain.max_targets {
            return false;
        }
        chain.clone()
    };

    let Some(next) =
        targeting::find_next_ricochet_target(arena, struck_pos, &chain.hit_set, chain.radius)
    else {
        return false;
    };

    let Ok(mut projectile) = arena.world.get::<&mut Projectile>(entity) else {
        return false;
    };
    projectile.guidance = Guidance::Homing { target: next };
    projectile.elapsed = (projectile.elapsed - RICOCHET_ELAPSED_REBATE_SECS).max(0.0);
    projectile.max_lifetime =
        (projectile.max_lifetime + RICOCHET_LIFETIME_EXTENSION_SECS).min(RICOCHET_LIFETIME_CAP_SECS);
    debug!(projectile = ?entity, next = ?next, hits = chain.hit_count, "ricochet retarget");
    true
}

/// A projectile reached a wall.
pub fn hit_obstacle(arena: &mut Arena, entity: Entity) {
    let faction = match arena.world.get::<&Projectile>(entity) {
        Ok(p) if !p.finishing => p.faction,
        _ => return,
    };
    match faction {
        Faction::Hero => finish(arena, entity, LINGER_OBSTACLE_SECS, ProjectileEnd::Obstacle),
        Faction::Enemy => end_now(arena, entity, ProjectileEnd::Obstacle),
    }
}

/// An enemy arrow reached the hero.
pub fn hit_hero(arena: &mut Arena, entity: Entity) {
    let damage = match arena.world.get::<&Projectile>(entity) {
        Ok(p) if !p.finishing && p.faction == Faction::Enemy => p.damage,
        _ => return,
    };
    emit(
        arena,
        GameEvent::PlayerTakeDamage {
            amount: damage,
            source: DamageSource::Arrow,
        },
    );
    end_now(arena, entity, ProjectileEnd::TerminalHit);
}
