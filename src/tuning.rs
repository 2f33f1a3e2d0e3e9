//! Data-driven game balance
//!
//! Every physics and AI constant the simulation reads. Defaults reproduce the
//! shipped feel; a JSON file may override any subset of fields.

use serde::{Deserialize, Serialize};

/// Simulation tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    /// Vertical acceleration applied to grounded-model entities (units/s²)
    pub gravity: f32,
    /// Linear horizontal drag coefficient (1/s)
    pub horizontal_drag: f32,

    // === Player ===
    /// Acceleration produced by a full-length movement intent
    pub player_move_acceleration: f32,
    /// Upward velocity set by a player jump
    pub player_jumping_power: f32,
    /// Extra acceleration along the intent while boosting
    pub boost_acceleration: f32,
    /// Starting fuel for levels with a boost (seconds of burn at rate 1.0)
    pub fuel_capacity: f32,
    /// Fuel consumed per second of boost
    pub fuel_burn_rate: f32,
    /// Player loses after falling this far below the map's lower edge
    pub kill_plane_margin: f32,

    // === Enemies ===
    /// Acceleration produced by a full-length enemy intent
    pub enemy_move_acceleration: f32,
    /// Upward velocity set by a jumper enemy
    pub enemy_jumping_power: f32,
    /// Distance from an enemy's centre to the player's box that triggers an attack
    pub detection_radius: f32,
    /// Seconds a jumper waits on the ground between jumps
    pub jump_interval: f32,

    // === Scheduler ===
    /// Cap on fixed steps per rendered frame (`None` = unbounded catch-up)
    pub max_steps_per_frame: Option<u32>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: -4.905,
            horizontal_drag: 5.0,

            player_move_acceleration: 15.0,
            player_jumping_power: 3.5,
            boost_acceleration: 8.0,
            fuel_capacity: 3.0,
            fuel_burn_rate: 1.0,
            kill_plane_margin: 2.0,

            enemy_move_acceleration: 6.0,
            enemy_jumping_power: 2.0,
            detection_radius: 1.5,
            jump_interval: 1.5,

            max_steps_per_frame: None,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON (for writing a starter tuning file)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Highest point a jump with `jumping_power` reaches above take-off
    pub fn jump_apex(&self, jumping_power: f32) -> Option<f32> {
        if self.gravity < 0.0 {
            Some(jumping_power * jumping_power / (2.0 * -self.gravity))
        } else {
            None
        }
    }
}
