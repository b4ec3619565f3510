//! Enumeration types used throughout the simulation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpawnError;

/// Enemy behavioural/stat category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyArchetype {
    /// Roams, stops, fires one arrow at the hero, repeats.
    Archer,
    /// Chases the hero, telegraphs, lunges, recovers.
    Melee,
}

impl EnemyArchetype {
    pub fn as_str(self) -> &'static str {
        match self {
            EnemyArchetype::Archer => "archer",
            EnemyArchetype::Melee => "melee",
        }
    }
}

impl fmt::Display for EnemyArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnemyArchetype {
    type Err = SpawnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "archer" => Ok(EnemyArchetype::Archer),
            "melee" => Ok(EnemyArchetype::Melee),
            other => Err(SpawnError::UnknownArchetype(other.to_string())),
        }
    }
}

/// Archer behaviour phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcherPhase {
    /// Walking in a random direction.
    #[default]
    Roam,
    /// Standing still after the shot, before picking a new direction.
    Hold,
}

/// Melee behaviour phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeleePhase {
    /// Moving toward the hero.
    #[default]
    Chase,
    /// Wind-up: standing still, signalling the lunge.
    Telegraph,
    /// Dashing along the direction captured at telegraph end.
    Lunge,
    /// Recovering after the dash.
    Cooldown,
}

/// Top-level game flow phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowPhase {
    /// Waiting for the first input.
    #[default]
    Intro,
    /// A wave is being telegraphed or fought.
    Wave,
    /// Reward selection between waves.
    ShowBoosts,
    /// The hero died.
    Fail,
    /// The last wave was cleared and a reward picked.
    Complete,
}

/// Hero locomotion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroMotion {
    #[default]
    Idle,
    Run,
}

/// What a hero attack preset fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadMode {
    /// One homing arrow.
    #[default]
    Single,
    /// One homing arrow plus two straight side arrows.
    Spread,
    /// One homing arrow that ignites the struck enemy.
    Burn,
    /// One homing arrow that chains between nearby enemies.
    Ricochet,
}

/// Which side fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Hero,
    Enemy,
}

/// How a projectile steers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightMode {
    Homing,
    Straight,
}

/// Why a projectile stopped flying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileEnd {
    /// Lifetime ran out without a hit.
    Expired,
    /// Struck an actor and did not chain further.
    TerminalHit,
    /// Reached a wall.
    Obstacle,
    /// Homing target died or despawned mid-flight.
    TargetLost,
}

/// Origin of damage dealt to the hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageSource {
    Arrow,
    Contact,
    Burn,
    Other,
}
