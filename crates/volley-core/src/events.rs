//! Events published on the simulation bus.
//!
//! This is the contract surface between the core and its presentation
//! collaborators: every event emitted during a tick is also copied into the
//! tick's snapshot, in emission order.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::{DamageSource, EnemyArchetype};
use crate::types::ActorId;

/// Which actor a damage number floats above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageTarget {
    Hero,
    Enemy(ActorId),
}

/// Every event the simulation publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// First player input; leaves the intro.
    GameStart,
    /// The flow asks the wave orchestrator to run a wave.
    WaveStart { wave: u32 },
    /// Spawn markers appear at every spawn position.
    WaveIntroStart { wave: u32, positions: Vec<DVec3> },
    /// Spawn markers disappear; enemies are about to spawn.
    WaveIntroEnd { wave: u32 },
    /// Request to create one enemy. `archetype` is content data and may be unknown.
    SpawnEnemy {
        archetype: String,
        position: DVec3,
        active: bool,
        wave: u32,
    },
    /// An enemy died. Emitted exactly once per enemy.
    EnemyKilled {
        enemy: ActorId,
        archetype: EnemyArchetype,
        position: DVec3,
    },
    /// Every enemy of the wave has been killed.
    WaveCleared { wave: u32 },
    /// Enemy behaviour and hero attack are disabled.
    GameplayPause,
    /// Enemy behaviour and hero attack are enabled again.
    GameplayResume,
    /// Reward selection UI should appear.
    ShowBoosts { wave: u32 },
    /// The player has been idle on the reward screen for a while.
    BoostTimeoutHint,
    /// The player picked a reward.
    BoostSelected { key: String },
    /// The reward timer ran out and picked for the player.
    BoostAutoselect { key: String },
    /// Damage request against the hero.
    PlayerTakeDamage { amount: i32, source: DamageSource },
    /// The hero died. Emitted exactly once per run.
    PlayerDied,
    /// Floating damage number.
    ShowDamageNumber {
        target: DamageTarget,
        amount: i32,
        color: u32,
        y_offset: f64,
    },
    /// An archer released its shot at a snapshot of the hero position.
    EnemyTryShoot { enemy: ActorId, target: DVec3 },
    /// A melee enemy started its wind-up.
    MeleeTelegraphStart { enemy: ActorId, duration: f64 },
    /// Failure banner should appear.
    ShowFailUi,
    /// The last wave is done and a reward was picked.
    RunComplete,
    /// A loot coin reached the hero.
    LootCollected { position: DVec3 },
}

/// Discriminant of [`GameEvent`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    GameStart,
    WaveStart,
    WaveIntroStart,
    WaveIntroEnd,
    SpawnEnemy,
    EnemyKilled,
    WaveCleared,
    GameplayPause,
    GameplayResume,
    ShowBoosts,
    BoostTimeoutHint,
    BoostSelected,
    BoostAutoselect,
    PlayerTakeDamage,
    PlayerDied,
    ShowDamageNumber,
    EnemyTryShoot,
    MeleeTelegraphStart,
    ShowFailUi,
    RunComplete,
    LootCollected,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::GameStart => EventKind::GameStart,
            GameEvent::WaveStart { .. } => EventKind::WaveStart,
            GameEvent::WaveIntroStart { .. } => EventKind::WaveIntroStart,
            GameEvent::WaveIntroEnd { .. } => EventKind::WaveIntroEnd,
            GameEvent::SpawnEnemy { .. } => EventKind::SpawnEnemy,
            GameEvent::EnemyKilled { .. } => EventKind::EnemyKilled,
            GameEvent::WaveCleared { .. } => EventKind::WaveCleared,
            GameEvent::GameplayPause => EventKind::GameplayPause,
            GameEvent::GameplayResume => EventKind::GameplayResume,
            GameEvent::ShowBoosts { .. } => EventKind::ShowBoosts,
            GameEvent::BoostTimeoutHint => EventKind::BoostTimeoutHint,
            GameEvent::BoostSelected { .. } => EventKind::BoostSelected,
            GameEvent::BoostAutoselect { .. } => EventKind::BoostAutoselect,
            GameEvent::PlayerTakeDamage { .. } => EventKind::PlayerTakeDamage,
            GameEvent::PlayerDied => EventKind::PlayerDied,
            GameEvent::ShowDamageNumber { .. } => EventKind::ShowDamageNumber,
            GameEvent::EnemyTryShoot { .. } => EventKind::EnemyTryShoot,
            GameEvent::MeleeTelegraphStart { .. } => EventKind::MeleeTelegraphStart,
            GameEvent::ShowFailUi => EventKind::ShowFailUi,
            GameEvent::RunComplete => EventKind::RunComplete,
            GameEvent::LootCollected { .. } => EventKind::LootCollected,
        }
    }
}
