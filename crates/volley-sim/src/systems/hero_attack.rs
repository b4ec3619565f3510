//! Hero auto-attack.
//!
//! Fires at the nearest enemy in range whenever the hero stands still. After
//! the hero stops moving a short settle delay must elapse before the fire
//! cooldown starts counting again. The active attack preset decides what
//! one shot releases; boost picks switch the preset.

use glam::DVec3;
use hecs::Entity;
use tracing::{debug, warn};

use volley_core::constants::{ARROW_FIXED_LIFETIME_SECS, HERO_MUZZLE_HEIGHT};
use volley_core::enums::{Faction, PayloadMode};
use volley_core::events::{EventKind, GameEvent};
use volley_core::types::{planar_direction, rotate_about_y};

use crate::arena::Arena;
use crate::systems::projectiles::{self, ArrowSpec};
use crate::systems::targeting;

#[derive(Debug, Clone)]
pub struct HeroAttack {
    /// Gameplay gating.
    pub enabled: bool,
    pub preset_key: String,
    /// Fire cooldown left (seconds).
    pub cooldown_timer: f64,
    /// Settle delay left after the hero stopped.
    pub settle_timer: f64,
    was_moving: bool,
}

impl HeroAttack {
    pub fn new(preset_key: &str) -> Self {
        Self {
            enabled: true,
            preset_key: preset_key.to_string(),
            cooldown_timer: 0.0,
            settle_timer: 0.0,
            was_moving: false,
        }
    }
}

pub fn install(arena: &mut Arena) {
    arena.bus.on(EventKind::GameplayPause, on_gameplay_pause);
    arena.bus.on(EventKind::GameplayResume, on_gameplay_resume);
    arena.bus.on(EventKind::BoostSelected, on_boost);
    arena.bus.on(EventKind::BoostAutoselect, on_boost);
    arena.scheduler.frames.register("hero_attack", update);
}

fn on_gameplay_pause(arena: &mut Arena, _event: &GameEvent) {
    arena.attack.enabled = false;
}

fn on_gameplay_resume(arena: &mut Arena, _event: &GameEvent) {
    arena.attack.enabled = true;
}

fn on_boost(arena: &mut Arena, event: &GameEvent) {
    match event {
        GameEvent::BoostSelected { key } | GameEvent::BoostAutoselect { key } => {
            set_preset(arena, key);
        }
        _ => {}
    }
}

/// Switch the active preset. Unknown keys fall back to the default preset.
pub fn set_preset(arena: &mut Arena, key: &str) {
    let key = if arena.config.attack_presets.contains_key(key) {
        key.to_string()
    } else {
        warn!(key, fallback = %arena.config.default_preset, "unknown attack preset");
        arena.config.default_preset.clone()
    };
    debug!(preset = %key, "attack preset");
    arena.attack.preset_key = key;
}

/// Frame callback. Gated by gameplay pause.
pub fn update(arena: &mut Arena, dt: f64) {
    if !arena.attack.enabled || arena.hero.health.is_dead {
        return;
    }
    let settle_secs = arena.config.hero.attack_settle_secs;
    let attack = &mut arena.attack;

    if arena.hero.is_moving() {
        attack.was_moving = true;
        attack.settle_timer = settle_secs;
        return;
    } else if attack.was_moving {
        attack.was_moving = false;
        if attack.settle_timer <= 0.0 {
            attack.settle_timer = settle_secs;
        }
    }

    if attack.settle_timer > 0.0 {
        attack.settle_timer -= dt;
        return;
    }

    attack.cooldown_timer -= dt;
    if attack.cooldown_timer > 0.0 {
        return;
    }

    let range = arena.config.hero.attack_range;
    let origin = arena.hero.position();
    let Some(target) = targeting::find_nearest_in_radius(arena, origin, range) else {
        return;
    };
    fire_at(arena, target);
}

/// Release one volley of the active preset at `target` and restart the cooldown.
pub fn fire_at(arena: &mut Arena, target: Entity) {
    let Some(preset) = arena.config.preset(&arena.attack.preset_key).cloned() else {
        return;
    };
    let Some(target_pos) = targeting::live_position(&arena.world, target) else {
        return;
    };

    let origin = arena.hero.position() + DVec3::Y * HERO_MUZZLE_HEIGHT;
    let base = arena.config.hero.base_damage as f64;
    let spec = ArrowSpec {
        speed: preset.arrow_speed,
        damage: (base * preset.damage_mul).round() as i32,
        hit_radius: preset.hit_radius,
    };

    match preset.payload {
        PayloadMode::Single => {
            projectiles::spawn_homing(arena, origin, target, spec, None, None);
        }
        PayloadMode::Burn => {
            projectiles::spawn_homing(arena, origin, target, spec, None, preset.burn);
        }
        PayloadMode::Ricochet => {
            projectiles::spawn_homing(arena, origin, target, spec, preset.ricochet, None);
        }
        PayloadMode::Spread => {
            projectiles::spawn_homing(arena, origin, target, spec, None, None);
            let aim = planar_direction(origin, target_pos).unwrap_or(DVec3::NEG_Z);
            let angle = preset.spread_angle_deg.to_radians();
            for side in [angle, -angle] {
                projectiles::spawn_straight(
                    arena,
                    Faction::Hero,
                    origin,
                    rotate_about_y(aim, side),
                    spec,
                    ARROW_FIXED_LIFETIME_SECS,
                );
            }
        }
    }

    arena.attack.cooldown_timer = preset.cooldown_secs;
}
