//! Compiled-in levels and entity setup
//!
//! Level data is row-major, top row first: 0 = empty, any other id = solid
//! tile (the id picks the atlas sprite).

use glam::Vec2;

use crate::consts::{ENEMY_COUNT, TILE_SIZE};
use crate::sim::{
    AiArchetype, Entity, EntityKind, GameState, LevelError, MotionModel, TileMap,
    archetype_for_index,
};
use crate::tuning::Tuning;

pub const LEVEL_1_WIDTH: usize = 16;
pub const LEVEL_1_HEIGHT: usize = 8;

#[rustfmt::skip]
pub static LEVEL_1: [u32; LEVEL_1_WIDTH * LEVEL_1_HEIGHT] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 2, 2, 2, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3,
    3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
];

/// Texture ids handed to the renderer
pub const PLAYER_TEXTURE: u32 = 0;
pub const GUARD_TEXTURE: u32 = 1;
pub const WALKER_TEXTURE: u32 = 2;
pub const JUMPER_TEXTURE: u32 = 3;
pub const PLATFORM_TEXTURE: u32 = 4;

const PLAYER_SPAWN: Vec2 = Vec2::new(1.5, 1.45);
const PLAYER_HALF_EXTENTS: Vec2 = Vec2::new(0.4, 0.45);
const ENEMY_HALF_EXTENTS: Vec2 = Vec2::splat(0.4);
const ENEMY_SPAWNS: [Vec2; ENEMY_COUNT] = [
    Vec2::new(5.5, 1.4),
    Vec2::new(9.5, 1.4),
    Vec2::new(12.5, 1.4),
];
/// Walkers patrol this far either side of their spawn
const PATROL_REACH: f32 = 2.0;

/// Map for level 1 (top-left corner at world (0, height), floor top at y = 1)
pub fn level_1_map() -> Result<TileMap, LevelError> {
    TileMap::new(
        LEVEL_1_WIDTH,
        LEVEL_1_HEIGHT,
        &LEVEL_1,
        TILE_SIZE,
        Vec2::new(0.0, LEVEL_1_HEIGHT as f32 * TILE_SIZE),
    )
}

pub fn player(position: Vec2, tuning: &Tuning) -> Entity {
    Entity::new(EntityKind::Player, position, PLAYER_HALF_EXTENTS)
        .with_acceleration(Vec2::new(0.0, tuning.gravity))
        .with_motion(MotionModel::Grounded, tuning.player_move_acceleration)
        .with_jumping_power(tuning.player_jumping_power)
        .with_texture(PLAYER_TEXTURE)
}

/// The `index`-th enemy of a level; its archetype comes from [`archetype_for_index`]
pub fn enemy(index: usize, position: Vec2, tuning: &Tuning) -> Entity {
    let archetype = archetype_for_index(index);
    let base = Entity::new(EntityKind::Enemy, position, ENEMY_HALF_EXTENTS)
        .with_acceleration(Vec2::new(0.0, tuning.gravity))
        .with_motion(MotionModel::Grounded, tuning.enemy_move_acceleration)
        .with_ai(archetype);

    match archetype {
        AiArchetype::Guard => base.with_texture(GUARD_TEXTURE),
        AiArchetype::Walker => base
            .with_texture(WALKER_TEXTURE)
            .with_patrol(position.x - PATROL_REACH, position.x + PATROL_REACH)
            .with_movement(Vec2::new(-1.0, 0.0)),
        AiArchetype::Jumper => base
            .with_texture(JUMPER_TEXTURE)
            .with_jumping_power(tuning.enemy_jumping_power),
    }
}

/// A static platform: no gravity, no entity collisions
pub fn platform(position: Vec2, half_extents: Vec2) -> Entity {
    Entity::new(EntityKind::Platform, position, half_extents).with_texture(PLATFORM_TEXTURE)
}

/// Level 1: the player, a guard, a walker and a jumper
pub fn platformer(tuning: &Tuning) -> Result<GameState, LevelError> {
    let map = level_1_map()?;
    let mut state =
        GameState::new(map, player(PLAYER_SPAWN, tuning)).with_fuel(tuning.fuel_capacity);

    for (index, &spawn) in ENEMY_SPAWNS.iter().enumerate() {
        state.add_enemy(enemy(index, spawn, tuning));
    }
    state.add_platform(platform(Vec2::new(3.0, 3.5), Vec2::new(0.75, 0.15)));

    log::info!(
        "Level 1 ready: {}x{} tiles ({} solid), {} enemies",
        state.map.width(),
        state.map.height(),
        state.map.solid_count(),
        state.active_enemy_count()
    );
    Ok(state)
}
