//! Arena snapshot: the complete visible state handed to presentation each tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{ActorId, SimTime};

/// Complete arena state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub time: SimTime,
    pub phase: FlowPhase,
    /// Current wave number (0 before the first wave).
    pub wave: u32,
    /// Whether enemy behaviour and hero attack are gated off.
    pub gameplay_paused: bool,
    /// Key of the active hero attack preset.
    pub attack_preset: String,
    pub hero: HeroView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub loot: Vec<LootView>,
    /// Every event emitted during the tick, in emission order.
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeroView {
    pub position: DVec3,
    pub yaw: f64,
    pub hp: i32,
    pub max_hp: i32,
    pub is_dead: bool,
    pub motion: HeroMotion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: ActorId,
    pub archetype: EnemyArchetype,
    pub position: DVec3,
    pub hp: i32,
    pub max_hp: i32,
    pub active: bool,
    /// Behaviour phase tag ("roam", "telegraph", ...).
    pub phase: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: ActorId,
    pub position: DVec3,
    pub faction: Faction,
    pub mode: FlightMode,
    /// True while the arrow lingers after its flight ended.
    pub finishing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootView {
    pub id: ActorId,
    pub position: DVec3,
}
