//! Status-effect engine: timed, repeating damage ticks bound to one enemy.
//!
//! Each instance holds a weak reference (entity handle) to its target and the
//! handle of its next scheduled tick. The target's [`ActiveEffects`] lists the
//! instances bound to it so the death transition can cancel them all.

use std::collections::BTreeMap;

use hecs::Entity;
use tracing::debug;

use volley_core::components::{ActiveEffects, Health};
use volley_core::config::BurnSpec;
use volley_core::constants::{BURN_MIN_INTERVAL_SECS, BURN_NUMBER_Y_OFFSET, COLOR_BURN};
use volley_core::events::{DamageTarget, GameEvent};
use volley_core::types::EffectId;

use crate::arena::{actor_id, Arena, Task};
use crate::event_bus::emit;
use crate::scheduler::{cancel as cancel_timer, schedule, TimerHandle};
use crate::systems::health;

/// One damage-over-time instance.
#[derive(Debug, Clone)]
pub struct EffectInstance {
    pub target: Entity,
    pub tick_damage: i32,
    /// Ticks still to apply.
    pub remaining: u32,
    pub interval_secs: f64,
    /// Pending tick, if one is scheduled.
    pub next_tick: Option<TimerHandle>,
}

/// Live status-effect instances.
#[derive(Debug, Default)]
pub struct StatusEffects {
    instances: BTreeMap<EffectId, EffectInstance>,
    next_id: u32,
}

impl StatusEffects {
    pub fn get(&self, id: EffectId) -> Option<&EffectInstance> {
        self.instances.get(&id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

fn target_alive(arena: &Arena, target: Entity) -> bool {
    arena
        .world
        .get::<&Health>(target)
        .is_ok_and(|health| !health.is_dead)
}

/// Schedule `ticks` damage ticks of `tick_damage`, `interval_secs` apart,
/// the first one `interval_secs` from now. Returns `None` if the target is
/// already dead or gone.
pub fn add_effect(
    arena: &mut Arena,
    target: Entity,
    tick_damage: i32,
    ticks: u32,
    interval_secs: f64,
) -> Option<EffectId> {
    if !target_alive(arena, target) {
        return None;
    }
    let tick_damage = tick_damage.max(1);
    let ticks = ticks.max(1);
    let interval_secs = interval_secs.max(BURN_MIN_INTERVAL_SECS);

    let id = EffectId(arena.effects.next_id);
    arena.effects.next_id += 1;

    let handle = schedule(arena, interval_secs, Task::BurnTick(id));
    arena.effects.instances.insert(
        id,
        EffectInstance {
            target,
            tick_damage,
            remaining: ticks,
            interval_secs,
            next_tick: Some(handle),
        },
    );

    let attached = match arena.world.get::<&mut ActiveEffects>(target) {
        Ok(mut active) => {
            active.effects.push(id);
            true
        }
        Err(_) => false,
    };
    if !attached {
        let _ = arena
            .world
            .insert_one(target, ActiveEffects { effects: vec![id] });
    }
    Some(id)
}

/// Attach a burn payload.
pub fn add_burn(arena: &mut Arena, target: Entity, burn: BurnSpec) -> Option<EffectId> {
    add_effect(arena, target, burn.tick_damage, burn.ticks, burn.interval_secs)
}

/// Cancel an effect, including a tick already scheduled. Returns false if it
/// had already finished or been cancelled.
pub fn cancel(arena: &mut Arena, id: EffectId) -> bool {
    let Some(instance) = arena.effects.instances.remove(&id) else {
        return false;
    };
    if let Some(handle) = instance.next_tick {
        cancel_timer(arena, handle);
    }
    if let Ok(mut active) = arena.world.get::<&mut ActiveEffects>(instance.target) {
        active.effects.retain(|e| *e != id);
    }
    true
}

/// Cancel every effect bound to `target`. Called from the death transition.
pub fn cancel_all_for(arena: &mut Arena, target: Entity) {
    let ids = match arena.world.get::<&mut ActiveEffects>(target) {
        Ok(mut active) => std::mem::take(&mut active.effects),
        Err(_) => return,
    };
    for id in ids {
        cancel(arena, id);
    }
}

/// Scheduled tick of effect `id`.
pub fn on_burn_tick(arena: &mut Arena, id: EffectId) {
    let (target, tick_damage) = match arena.effects.instances.get_mut(&id) {
        Some(instance) => {
            instance.next_tick = None;
            instance.remaining = instance.remaining.saturating_sub(1);
            (instance.target, instance.tick_damage)
        }
        None => return,
    };

    if !target_alive(arena, target) {
        debug!(effect = id.0, "status effect target gone");
        cancel(arena, id);
        return;
    }

    // A lethal tick cancels this instance through the death transition.
    health::apply_damage(arena, target, tick_damage as f64);
    emit(
        arena,
        GameEvent::ShowDamageNumber {
            target: DamageTarget::Enemy(actor_id(target)),
            amount: tick_damage,
            color: COLOR_BURN,
            y_offset: BURN_NUMBER_Y_OFFSET,
        },
    );

    let Some(instance) = arena.effects.instances.get(&id) else {
        return;
    };
    if instance.remaining == 0 {
        debug!(effect = id.0, "status effect expired");
        cancel(arena, id);
        return;
    }
    let interval = instance.interval_secs;
    let handle = schedule(arena, interval, Task::BurnTick(id));
    if let Some(instance) = arena.effects.instances.get_mut(&id) {
        instance.next_tick = Some(handle);
    }
}
