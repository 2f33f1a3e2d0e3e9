//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (arena insertion order)
//! - No rendering, audio or platform dependencies

pub mod aabb;
pub mod ai;
pub mod collision;
pub mod entity;
pub mod map;
pub mod motion;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use ai::{Decision, Sensed, archetype_for_index, behavior, detects_player, update_enemy};
pub use collision::{Axis, Hit, resolve_axis};
pub use entity::{
    AiArchetype, AiState, Collider, Contacts, Entity, EntityArena, EntityId, EntityKind,
    MotionModel, Side,
};
pub use map::{LevelError, TileCoord, TileMap};
pub use motion::{MotionInput, MotionReport, integrate};
pub use scheduler::{FrameSteps, Scheduler};
pub use state::{GameEvent, GameState, Outcome, RenderQuad};
pub use tick::{TickInput, tick};
