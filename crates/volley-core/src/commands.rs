//! Player commands sent from the input layer to the simulation.
//!
//! Commands are queued and applied at the next tick boundary, in order.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Screen tap. The first one leaves the intro.
    Tap,
    /// Joystick output. `speed` is in units/s, `facing` is a yaw in radians.
    SetMovement { speed: f64, facing: f64 },
    /// Reward picked on the boost screen.
    SelectBoost { key: String },
}
