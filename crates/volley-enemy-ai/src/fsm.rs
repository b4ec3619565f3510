//! Enemy behavior finite state machine.
//!
//! Pure functions that advance one enemy's behaviour by one tick and report
//! its movement and any intent (shot, telegraph) the simulation must act on.
//! No ECS dependency; operates on plain data.

use glam::DVec3;
use rand::Rng;

use volley_core::components::{ArcherState, EnemyBehavior, MeleeState};
use volley_core::enums::{ArcherPhase, MeleePhase};
use volley_core::types::planar_direction;

use crate::profiles::{random_ground_direction, EnemyBehaviorProfile};

/// Tolerance for phase timers accumulated from fixed `dt` steps, so a 3.0 s
/// phase at 40 Hz ends on tick 120 rather than 121.
const PHASE_EPSILON: f64 = 1e-9;

/// Input to the enemy FSM for a single entity.
pub struct EnemyContext {
    pub behavior: EnemyBehavior,
    pub position: DVec3,
    pub hero_position: DVec3,
    pub dt: f64,
}

/// Something the simulation must do on the enemy's behalf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyIntent {
    /// Release one arrow at a snapshot of the hero position.
    Shoot { target: DVec3 },
    /// Wind-up started; lunge follows after `duration` seconds.
    Telegraph { duration: f64 },
}

/// Output from the enemy FSM.
#[derive(Debug, Clone, Copy)]
pub struct EnemyUpdate {
    pub behavior: EnemyBehavior,
    /// Ground-plane displacement for this tick.
    pub displacement: DVec3,
    /// New facing yaw, when the enemy turned.
    pub facing: Option<f64>,
    pub intent: Option<EnemyIntent>,
    pub phase_changed: bool,
}

impl EnemyUpdate {
    fn idle(behavior: EnemyBehavior) -> Self {
        Self {
            behavior,
            displacement: DVec3::ZERO,
            facing: None,
            intent: None,
            phase_changed: false,
        }
    }
}

/// Evaluate the FSM for one enemy. Returns the updated behaviour and movement.
pub fn evaluate<R: Rng>(
    ctx: &EnemyContext,
    profile: &EnemyBehaviorProfile,
    rng: &mut R,
) -> EnemyUpdate {
    match ctx.behavior {
        EnemyBehavior::Archer(state) => evaluate_archer(state, ctx, profile, rng),
        EnemyBehavior::Melee(state) => evaluate_melee(state, ctx, profile),
    }
}

fn facing_of(dir: DVec3) -> f64 {
    dir.x.atan2(dir.z)
}

fn evaluate_archer<R: Rng>(
    mut state: ArcherState,
    ctx: &EnemyContext,
    profile: &EnemyBehaviorProfile,
    rng: &mut R,
) -> EnemyUpdate {
    if state.timer < profile.roam_secs - PHASE_EPSILON {
        state.timer += ctx.dt;
        return EnemyUpdate {
            behavior: EnemyBehavior::Archer(state),
            displacement: state.roam_dir * profile.move_speed * ctx.dt,
            facing: Some(facing_of(state.roam_dir)),
            intent: None,
            phase_changed: false,
        };
    }

    state.timer += ctx.dt;
    let mut update = EnemyUpdate::idle(EnemyBehavior::Archer(state));

    if state.phase == ArcherPhase::Roam {
        state.phase = ArcherPhase::Hold;
        update.phase_changed = true;
    }

    // One shot per cycle, on the first stationary tick
    if !state.shot_fired {
        state.shot_fired = true;
        update.intent = Some(EnemyIntent::Shoot {
            target: ctx.hero_position,
        });
        update.facing = planar_direction(ctx.position, ctx.hero_position).map(facing_of);
    }

    if state.timer >= profile.roam_secs + profile.shot_pause_secs - PHASE_EPSILON {
        state.timer = 0.0;
        state.shot_fired = false;
        state.phase = ArcherPhase::Roam;
        state.roam_dir = random_ground_direction(rng);
        update.phase_changed = true;
    }

    update.behavior = EnemyBehavior::Archer(state);
    update
}

fn evaluate_melee(
    mut state: MeleeState,
    ctx: &EnemyContext,
    profile: &EnemyBehaviorProfile,
) -> EnemyUpdate {
    let mut update = EnemyUpdate::idle(EnemyBehavior::Melee(state));
    state.timer += ctx.dt;

    match state.phase {
        MeleePhase::Chase => {
            if let Some(dir) = planar_direction(ctx.position, ctx.hero_position) {
                update.displacement = dir * profile.move_speed * ctx.dt;
                update.facing = Some(facing_of(dir));
            }
            if state.timer >= profile.charge_cooldown_secs - PHASE_EPSILON {
                state.timer = 0.0;
                state.phase = MeleePhase::Telegraph;
                update.intent = Some(EnemyIntent::Telegraph {
                    duration: profile.telegraph_secs,
                });
                update.phase_changed = true;
            }
        }
        MeleePhase::Telegraph => {
            if state.timer >= profile.telegraph_secs - PHASE_EPSILON {
                state.timer = 0.0;
                state.phase = MeleePhase::Lunge;
                // Direction is locked here; the lunge does not track.
                state.lunge_dir =
                    planar_direction(ctx.position, ctx.hero_position).unwrap_or(DVec3::Z);
                update.facing = Some(facing_of(state.lunge_dir));
                update.phase_changed = true;
            }
        }
        MeleePhase::Lunge => {
            update.displacement = state.lunge_dir * profile.lunge_speed * ctx.dt;
            if state.timer >= profile.lunge_secs - PHASE_EPSILON {
                state.timer = 0.0;
                state.phase = MeleePhase::Cooldown;
                update.phase_changed = true;
            }
        }
        MeleePhase::Cooldown => {
            if state.timer >= profile.recover_secs - PHASE_EPSILON {
                state.timer = 0.0;
                state.phase = MeleePhase::Chase;
                update.phase_changed = true;
            }
        }
    }

    update.behavior = EnemyBehavior::Melee(state);
    update
}
