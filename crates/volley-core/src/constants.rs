//! Simulation constants and tuning parameters.
//!
//! Values that designers are expected to tweak per build live in
//! [`crate::config::GameConfig`]; the constants here are the defaults it
//! falls back to plus the fixed mechanics that are not data-driven.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 40;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Arena ---

/// Left wall (x).
pub const ARENA_MIN_X: f64 = -5.5;
/// Right wall (x).
pub const ARENA_MAX_X: f64 = 5.5;
/// Far wall (z).
pub const ARENA_MIN_Z: f64 = -8.0;
/// Near wall (z).
pub const ARENA_MAX_Z: f64 = 12.3;

/// Hero spawn point on the ground plane.
pub const HERO_SPAWN_X: f64 = 0.0;
pub const HERO_SPAWN_Z: f64 = 6.0;

/// Collision radius of hero and enemy bodies.
pub const BODY_RADIUS: f64 = 0.6;

// --- Hero ---

pub const HERO_MAX_HP: i32 = 300;
pub const HERO_BASE_DAMAGE: i32 = 40;
pub const HERO_MOVE_SPEED: f64 = 6.0;

/// Invulnerability window after every successful hit (seconds).
pub const HERO_INVULNERABLE_SECS: f64 = 0.2;

/// Minimum spacing between two contact-damage applications (seconds).
pub const HERO_CONTACT_COOLDOWN_SECS: f64 = 0.45;

/// Auto-attack acquisition range.
pub const HERO_ATTACK_RANGE: f64 = 30.0;

/// Delay after the hero stops moving before the first shot.
pub const HERO_ATTACK_SETTLE_SECS: f64 = 0.05;

/// Height above the hero's feet at which arrows spawn.
pub const HERO_MUZZLE_HEIGHT: f64 = 1.4;

// --- Hero projectiles ---

pub const ARROW_SPEED: f64 = 32.0;
pub const ARROW_HIT_RADIUS: f64 = 0.6;

/// Lifetime of straight-flying arrows (seconds).
pub const ARROW_FIXED_LIFETIME_SECS: f64 = 2.0;

/// Homing lifetime = clamp(distance / speed + slack, min, max).
pub const ARROW_HOMING_LIFETIME_SLACK_SECS: f64 = 0.5;
pub const ARROW_HOMING_LIFETIME_MIN_SECS: f64 = 0.7;
pub const ARROW_HOMING_LIFETIME_MAX_SECS: f64 = 3.5;

/// Ricochet flight budget: elapsed-time rebate and lifetime extension per bounce.
pub const RICOCHET_ELAPSED_REBATE_SECS: f64 = 0.15;
pub const RICOCHET_LIFETIME_EXTENSION_SECS: f64 = 0.6;
pub const RICOCHET_LIFETIME_CAP_SECS: f64 = 3.8;

/// Cosmetic linger before a finished arrow is removed.
pub const LINGER_TERMINAL_HIT_SECS: f64 = 0.06;
pub const LINGER_DEAD_TARGET_SECS: f64 = 0.05;
pub const LINGER_OBSTACLE_SECS: f64 = 0.04;

/// Floor applied to burn tick intervals.
pub const BURN_MIN_INTERVAL_SECS: f64 = 0.05;

// --- Enemy projectiles ---

pub const ENEMY_ARROW_SPEED: f64 = 12.0;
pub const ENEMY_ARROW_HIT_RADIUS: f64 = 0.1;
pub const ENEMY_ARROW_LIFETIME_SECS: f64 = 2.5;
pub const ENEMY_MUZZLE_HEIGHT: f64 = 1.2;

// --- Enemies ---

pub const ARCHER_HP: i32 = 60;
pub const ARCHER_MOVE_SPEED: f64 = 2.2;
pub const ARCHER_ROAM_SECS: f64 = 2.0;
pub const ARCHER_SHOT_PAUSE_SECS: f64 = 0.5;
pub const ARCHER_ARROW_DAMAGE: i32 = 60;

pub const MELEE_HP: i32 = 100;
pub const MELEE_MOVE_SPEED: f64 = 3.2;
pub const MELEE_CHARGE_COOLDOWN_SECS: f64 = 3.0;
pub const MELEE_TELEGRAPH_SECS: f64 = 0.7;
pub const MELEE_LUNGE_SPEED: f64 = 10.0;
pub const MELEE_LUNGE_SECS: f64 = 0.25;
pub const MELEE_RECOVER_SECS: f64 = 0.35;

pub const ENEMY_CONTACT_DAMAGE: i32 = 50;

// --- Encounter ---

/// How long spawn markers are shown before enemies appear.
pub const WAVE_INTRO_SECS: f64 = 1.5;

/// Pause after enemies appear before combat resumes.
pub const WAVE_RESUME_DELAY_SECS: f64 = 0.5;

pub const BOOSTS_HINT_SECS: f64 = 5.0;
pub const BOOSTS_AUTO_PICK_SECS: f64 = 15.0;

/// Delay between player death and the failure banner.
pub const FAIL_UI_DELAY_SECS: f64 = 1.0;

// --- Loot ---

pub const LOOT_ATTRACT_DELAY_SECS: f64 = 1.0;
pub const LOOT_KICK_SPEED: f64 = 1.6;
pub const LOOT_KICK_DAMPING_PER_SEC: f64 = 4.5;
pub const LOOT_ATTRACT_SPEED: f64 = 10.0;
pub const LOOT_ATTRACT_ACCEL: f64 = 12.0;
pub const LOOT_ATTRACT_MAX_SPEED: f64 = 16.0;
pub const LOOT_PICKUP_DISTANCE: f64 = 0.4;

// --- Presentation ---

/// Damage-number colours.
pub const COLOR_HIT: u32 = 0xFF3B30;
pub const COLOR_BURN: u32 = 0xFF9900;
pub const COLOR_HERO_HIT: u32 = 0xFFFFFF;

/// Damage-number vertical offsets above the struck actor.
pub const DAMAGE_NUMBER_Y_OFFSET: f64 = 2.0;
pub const BURN_NUMBER_Y_OFFSET: f64 = 2.4;
