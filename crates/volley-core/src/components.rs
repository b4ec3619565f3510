//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EffectId;

/// World placement. `yaw` is the facing angle around +Y (0 = +Z).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    pub yaw: f64,
}

/// Hit-point bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub hp: i32,
    pub max_hp: i32,
    /// Set exactly once by the death transition; every damage path checks it first.
    pub is_dead: bool,
}

impl Health {
    pub fn full(max_hp: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            is_dead: false,
        }
    }
}

/// Marks an entity as an enemy actor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy {
    pub archetype: EnemyArchetype,
    /// Damage dealt to the hero on body contact.
    pub contact_damage: i32,
    /// Collision radius on the ground plane.
    pub body_radius: f64,
    /// Spawned enemies stay inert until the wave activates them.
    pub active: bool,
}

/// Archer behaviour state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArcherState {
    pub phase: ArcherPhase,
    /// Seconds since the current roam cycle began.
    pub timer: f64,
    /// Unit roam direction on the ground plane.
    pub roam_dir: DVec3,
    /// Whether this cycle's single shot has been released.
    pub shot_fired: bool,
}

/// Melee behaviour state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeleeState {
    pub phase: MeleePhase,
    /// Seconds spent in the current phase.
    pub timer: f64,
    /// Dash direction captured when the telegraph ends.
    pub lunge_dir: DVec3,
}

/// Per-archetype behaviour state, dispatched by tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyBehavior {
    Archer(ArcherState),
    Melee(MeleeState),
}

impl EnemyBehavior {
    /// Short tag of the current behaviour phase, for snapshots and logs.
    pub fn phase_name(&self) -> &'static str {
        match self {
            EnemyBehavior::Archer(s) => match s.phase {
                ArcherPhase::Roam => "roam",
                ArcherPhase::Hold => "hold",
            },
            EnemyBehavior::Melee(s) => match s.phase {
                MeleePhase::Chase => "chase",
                MeleePhase::Telegraph => "telegraph",
                MeleePhase::Lunge => "lunge",
                MeleePhase::Cooldown => "cooldown",
            },
        }
    }
}

/// Status effects currently bound to an actor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub effects: Vec<EffectId>,
}

/// A dropped loot coin.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LootCoin {
    /// Outward kick velocity, damped every tick.
    pub kick: DVec3,
    pub attracting: bool,
    pub attract_speed: f64,
}
