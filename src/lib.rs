//! Tilestep - fixed-timestep 2D tile platformer simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, AI, scheduler)
//! - `level`: Compiled-in level data and entity setup
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio and input polling live outside this crate. They read
//! [`sim::GameState::render_quads`], [`sim::GameState::outcome`] and the
//! drained [`sim::GameEvent`]s.

pub mod level;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (60 Hz), as the scheduler accumulates it
    pub const FIXED_TIMESTEP_SECS: f64 = 1.0 / 60.0;

    /// Fixed simulation timestep as handed to `tick`
    pub const FIXED_TIMESTEP: f32 = FIXED_TIMESTEP_SECS as f32;

    /// Edge length of one map cell in world units
    pub const TILE_SIZE: f32 = 1.0;

    /// Enemies placed by the platformer level
    pub const ENEMY_COUNT: usize = 3;

    /// Where defeated entities are parked so they are never drawn in the arena
    pub const OFFSCREEN: Vec3 = Vec3::new(-1000.0, -1000.0, 0.0);

    /// Overlaps shallower than this are resting contact, not penetration
    pub const COLLISION_EPSILON: f32 = 1e-4;

    /// Smallest half extent a body collides with (points and slivers included)
    pub const MIN_COLLISION_HALF_EXTENT: f32 = 1e-3;

    /// Upper bound on re-scans when resolving one axis
    pub const MAX_RESOLVE_PASSES: usize = 4;
}

/// Clamp an intent vector to unit length (shorter vectors pass through)
#[inline]
pub fn clamp_unit(v: Vec2) -> Vec2 {
    if v.is_finite() {
        v.clamp_length_max(1.0)
    } else {
        Vec2::ZERO
    }
}

/// Unit vector from `from` toward `to`, zero when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}
