//! Data-driven configuration tables.
//!
//! Everything here is read-only to the simulation once a run starts.
//! `GameConfig::default()` carries the shipped tuning; `from_json` overlays a
//! partial JSON document on top of it (missing fields keep their defaults).

use std::collections::BTreeMap;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::PayloadMode;
use crate::error::ConfigError;
use crate::types::ArenaBounds;

/// Complete tuning for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub hero: HeroStats,
    pub archer: ArcherStats,
    pub melee: MeleeStats,
    /// Wave number (1-based) to spawn list.
    pub waves: BTreeMap<u32, WaveConfig>,
    /// Attack preset key to preset.
    pub attack_presets: BTreeMap<String, AttackPreset>,
    /// Preset active at the start of a run and used for unknown keys.
    pub default_preset: String,
    pub boosts: BoostConfig,
    pub encounter: EncounterTimings,
    pub arena: ArenaBounds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroStats {
    pub max_hp: i32,
    /// Base arrow damage before the preset multiplier.
    pub base_damage: i32,
    pub move_speed: f64,
    pub invulnerable_secs: f64,
    pub contact_cooldown_secs: f64,
    pub attack_range: f64,
    pub attack_settle_secs: f64,
}

impl Default for HeroStats {
    fn default() -> Self {
        Self {
            max_hp: HERO_MAX_HP,
            base_damage: HERO_BASE_DAMAGE,
            move_speed: HERO_MOVE_SPEED,
            invulnerable_secs: HERO_INVULNERABLE_SECS,
            contact_cooldown_secs: HERO_CONTACT_COOLDOWN_SECS,
            attack_range: HERO_ATTACK_RANGE,
            attack_settle_secs: HERO_ATTACK_SETTLE_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcherStats {
    pub hp: i32,
    pub contact_damage: i32,
    pub move_speed: f64,
    pub roam_secs: f64,
    pub shot_pause_secs: f64,
    pub arrow_damage: i32,
    pub arrow_speed: f64,
    pub arrow_hit_radius: f64,
}

impl Default for ArcherStats {
    fn default() -> Self {
        Self {
            hp: ARCHER_HP,
            contact_damage: ENEMY_CONTACT_DAMAGE,
            move_speed: ARCHER_MOVE_SPEED,
            roam_secs: ARCHER_ROAM_SECS,
            shot_pause_secs: ARCHER_SHOT_PAUSE_SECS,
            arrow_damage: ARCHER_ARROW_DAMAGE,
            arrow_speed: ENEMY_ARROW_SPEED,
            arrow_hit_radius: ENEMY_ARROW_HIT_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeleeStats {
    pub hp: i32,
    pub contact_damage: i32,
    pub move_speed: f64,
    /// Chase time before each telegraph.
    pub charge_cooldown_secs: f64,
    pub telegraph_secs: f64,
    pub lunge_speed: f64,
    pub lunge_secs: f64,
    pub recover_secs: f64,
}

impl Default for MeleeStats {
    fn default() -> Self {
        Self {
            hp: MELEE_HP,
            contact_damage: ENEMY_CONTACT_DAMAGE,
            move_speed: MELEE_MOVE_SPEED,
            charge_cooldown_secs: MELEE_CHARGE_COOLDOWN_SECS,
            telegraph_secs: MELEE_TELEGRAPH_SECS,
            lunge_speed: MELEE_LUNGE_SPEED,
            lunge_secs: MELEE_LUNGE_SECS,
            recover_secs: MELEE_RECOVER_SECS,
        }
    }
}

/// One wave's spawn list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveConfig {
    pub enemies: Vec<SpawnDescriptor>,
}

/// A single enemy placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnDescriptor {
    /// Archetype name. Unknown names are skipped at spawn time.
    #[serde(rename = "type")]
    pub archetype: String,
    #[serde(default)]
    pub position: DVec3,
}

impl SpawnDescriptor {
    pub fn new(archetype: &str, x: f64, z: f64) -> Self {
        Self {
            archetype: archetype.to_string(),
            position: DVec3::new(x, 0.0, z),
        }
    }
}

/// Damage-over-time payload attached to an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurnSpec {
    pub tick_damage: i32,
    pub ticks: u32,
    pub interval_secs: f64,
}

/// Chain payload attached to an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RicochetSpec {
    /// Maximum number of distinct enemies one arrow may strike.
    pub max_targets: u32,
    /// Search radius around the enemy just struck.
    pub radius: f64,
}

/// A named hero attack.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackPreset {
    pub cooldown_secs: f64,
    pub damage_mul: f64,
    pub payload: PayloadMode,
    pub arrow_speed: f64,
    pub hit_radius: f64,
    /// Side-arrow rotation for [`PayloadMode::Spread`].
    pub spread_angle_deg: f64,
    pub burn: Option<BurnSpec>,
    pub ricochet: Option<RicochetSpec>,
}

impl Default for AttackPreset {
    fn default() -> Self {
        Self {
            cooldown_secs: 0.75,
            damage_mul: 1.0,
            payload: PayloadMode::Single,
            arrow_speed: ARROW_SPEED,
            hit_radius: ARROW_HIT_RADIUS,
            spread_angle_deg: 15.0,
            burn: None,
            ricochet: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    pub hint_secs: f64,
    pub auto_pick_secs: f64,
    pub auto_pick_key: String,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            hint_secs: BOOSTS_HINT_SECS,
            auto_pick_secs: BOOSTS_AUTO_PICK_SECS,
            auto_pick_key: "multishot".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterTimings {
    pub wave_intro_secs: f64,
    pub resume_delay_secs: f64,
    pub fail_ui_delay_secs: f64,
    pub loot_attract_delay_secs: f64,
}

impl Default for EncounterTimings {
    fn default() -> Self {
        Self {
            wave_intro_secs: WAVE_INTRO_SECS,
            resume_delay_secs: WAVE_RESUME_DELAY_SECS,
            fail_ui_delay_secs: FAIL_UI_DELAY_SECS,
            loot_attract_delay_secs: LOOT_ATTRACT_DELAY_SECS,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hero: HeroStats::default(),
            archer: ArcherStats::default(),
            melee: MeleeStats::default(),
            waves: default_waves(),
            attack_presets: default_presets(),
            default_preset: "basic".to_string(),
            boosts: BoostConfig::default(),
            encounter: EncounterTimings::default(),
            arena: ArenaBounds::default(),
        }
    }
}

fn default_waves() -> BTreeMap<u32, WaveConfig> {
    let mut waves = BTreeMap::new();
    waves.insert(
        1,
        WaveConfig {
            enemies: vec![
                SpawnDescriptor::new("archer", -3.0, -4.0),
                SpawnDescriptor::new("archer", 3.0, -4.0),
                SpawnDescriptor::new("melee", 0.0, -2.0),
            ],
        },
    );
    waves.insert(
        2,
        WaveConfig {
            enemies: vec![
                SpawnDescriptor::new("melee", -3.5, -3.0),
                SpawnDescriptor::new("melee", 3.5, -3.0),
                SpawnDescriptor::new("archer", -2.0, -6.0),
                SpawnDescriptor::new("archer", 2.0, -6.0),
            ],
        },
    );
    waves
}

fn default_presets() -> BTreeMap<String, AttackPreset> {
    let mut presets = BTreeMap::new();
    presets.insert(
        "basic".to_string(),
        AttackPreset {
            cooldown_secs: 0.1,
            ..AttackPreset::default()
        },
    );
    presets.insert(
        "multishot".to_string(),
        AttackPreset {
            cooldown_secs: 0.8,
            damage_mul: 1.0,
            payload: PayloadMode::Spread,
            spread_angle_deg: 15.0,
            ..AttackPreset::default()
        },
    );
    presets.insert(
        "fire".to_string(),
        AttackPreset {
            cooldown_secs: 0.75,
            damage_mul: 1.15,
            payload: PayloadMode::Burn,
            burn: Some(BurnSpec {
                tick_damage: 8,
                ticks: 3,
                interval_secs: 1.0,
            }),
            ..AttackPreset::default()
        },
    );
    presets.insert(
        "ricochet".to_string(),
        AttackPreset {
            cooldown_secs: 0.78,
            damage_mul: 1.0,
            payload: PayloadMode::Ricochet,
            arrow_speed: 31.0,
            ricochet: Some(RicochetSpec {
                max_targets: 3,
                radius: 6.0,
            }),
            ..AttackPreset::default()
        },
    );
    presets
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.attack_presets.contains_key(&self.default_preset) {
            return Err(ConfigError::MissingDefaultPreset(self.default_preset.clone()));
        }
        if self.hero.max_hp <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "hero.max_hp".to_string(),
                value: self.hero.max_hp as f64,
            });
        }
        for (field, value) in [
            ("hero.move_speed", self.hero.move_speed),
            ("hero.invulnerable_secs", self.hero.invulnerable_secs),
            ("hero.contact_cooldown_secs", self.hero.contact_cooldown_secs),
            ("hero.attack_range", self.hero.attack_range),
            ("hero.attack_settle_secs", self.hero.attack_settle_secs),
            ("archer.move_speed", self.archer.move_speed),
            ("archer.roam_secs", self.archer.roam_secs),
            ("archer.shot_pause_secs", self.archer.shot_pause_secs),
            ("archer.arrow_hit_radius", self.archer.arrow_hit_radius),
            ("melee.move_speed", self.melee.move_speed),
            ("melee.charge_cooldown_secs", self.melee.charge_cooldown_secs),
            ("melee.telegraph_secs", self.melee.telegraph_secs),
            ("melee.lunge_speed", self.melee.lunge_speed),
            ("melee.lunge_secs", self.melee.lunge_secs),
            ("melee.recover_secs", self.melee.recover_secs),
            ("boosts.hint_secs", self.boosts.hint_secs),
            ("boosts.auto_pick_secs", self.boosts.auto_pick_secs),
            ("encounter.wave_intro_secs", self.encounter.wave_intro_secs),
            ("encounter.resume_delay_secs", self.encounter.resume_delay_secs),
            ("encounter.fail_ui_delay_secs", self.encounter.fail_ui_delay_secs),
            ("encounter.loot_attract_delay_secs", self.encounter.loot_attract_delay_secs),
        ] {
            require_non_negative(field, value)?;
        }
        require_positive("archer.arrow_speed", self.archer.arrow_speed)?;
        for (key, preset) in &self.attack_presets {
            require_positive(&format!("attack_presets.{key}.cooldown_secs"), preset.cooldown_secs)?;
            require_positive(&format!("attack_presets.{key}.arrow_speed"), preset.arrow_speed)?;
            require_non_negative(&format!("attack_presets.{key}.hit_radius"), preset.hit_radius)?;
        }
        for (number, wave) in &self.waves {
            if wave.enemies.is_empty() {
                tracing::warn!(wave = number, "wave has no enemies and will not start");
            }
        }
        Ok(())
    }

    pub fn wave(&self, number: u32) -> Option<&WaveConfig> {
        self.waves.get(&number)
    }

    /// Whether wave `number + 1` is configured.
    pub fn has_next_wave(&self, number: u32) -> bool {
        self.waves.contains_key(&(number + 1))
    }

    /// Preset for `key`, falling back to the default preset.
    pub fn preset(&self, key: &str) -> Option<&AttackPreset> {
        self.attack_presets
            .get(key)
            .or_else(|| self.attack_presets.get(&self.default_preset))
    }
}

/// Speeds and durations must be finite and not negative.
fn require_non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        })
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        })
    }
}
