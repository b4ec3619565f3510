//! Fundamental geometric and simulation types.
//!
//! World space is right-handed with Y up; all gameplay happens on the
//! X/Z ground plane. Distances used for targeting and collision are planar.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Stable identifier of a simulated actor or projectile.
///
/// Wraps the 64-bit encoding of the owning ECS handle so that events and
/// snapshots stay serialisable without depending on the ECS crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the fixed tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Axis-aligned arena walls on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            min_x: ARENA_MIN_X,
            max_x: ARENA_MAX_X,
            min_z: ARENA_MIN_Z,
            max_z: ARENA_MAX_Z,
        }
    }
}

impl ArenaBounds {
    /// Whether a point lies inside the walls (inclusive).
    pub fn contains(&self, point: DVec3) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.z >= self.min_z && point.z <= self.max_z
    }

    /// Clamp a point's planar coordinates into the arena, keeping its height.
    pub fn clamp(&self, point: DVec3) -> DVec3 {
        DVec3::new(
            point.x.clamp(self.min_x, self.max_x),
            point.y,
            point.z.clamp(self.min_z, self.max_z),
        )
    }
}

/// Squared distance on the X/Z plane.
pub fn planar_distance_sq(a: DVec3, b: DVec3) -> f64 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    dx * dx + dz * dz
}

/// Unit vector on the ground plane pointing from `from` to `to`, or `None`
/// when the two points (nearly) coincide.
pub fn planar_direction(from: DVec3, to: DVec3) -> Option<DVec3> {
    let flat = DVec3::new(to.x - from.x, 0.0, to.z - from.z);
    let len = flat.length();
    (len > 1e-3).then(|| flat / len)
}

/// Rotate a vector around the world Y axis by `radians`.
///
/// Positive angles turn +Z towards +X, matching the hero's yaw convention
/// (forward = `(sin yaw, 0, cos yaw)`).
pub fn rotate_about_y(v: DVec3, radians: f64) -> DVec3 {
    let (sin, cos) = radians.sin_cos();
    DVec3::new(v.x * cos + v.z * sin, v.y, -v.x * sin + v.z * cos)
}

/// Forward unit vector for a yaw angle.
pub fn yaw_forward(yaw: f64) -> DVec3 {
    DVec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Handle of a status-effect instance, stored on the affected actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(pub u32);
