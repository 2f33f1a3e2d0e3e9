//! Game state and core simulation types
//!
//! `GameState` is the explicit simulation context: everything a step reads
//! or writes is reachable from it, and nothing lives in globals.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityArena, EntityId, EntityKind};
use super::map::TileMap;
use crate::consts::OFFSCREEN;

/// Win/lose latch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Playing,
    Won,
    Lost,
}

/// Things collaborators react to (sound triggers, HUD text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped(EntityId),
    EnemyDefeated(EntityId),
    FuelDepleted,
    Won,
    Lost,
}

/// What the renderer needs to draw one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderQuad {
    pub position: Vec3,
    /// Full width/height
    pub size: Vec2,
    pub texture_id: u32,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub map: TileMap,
    /// Player, enemies and platforms (iterated in insertion order)
    pub entities: EntityArena,
    pub player: EntityId,
    pub outcome: Outcome,
    /// Remaining boost fuel; `None` when the level has no boost
    pub fuel: Option<f32>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending events, drained by the caller each frame
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state around a map and its player
    pub fn new(map: TileMap, player: Entity) -> Self {
        debug_assert_eq!(player.kind, EntityKind::Player);
        let mut entities = EntityArena::new();
        let player = entities.insert(player);
        Self {
            map,
            entities,
            player,
            outcome: Outcome::Playing,
            fuel: None,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Enable the fuel-limited boost
    pub fn with_fuel(mut self, fuel: f32) -> Self {
        self.fuel = Some(fuel.max(0.0));
        self
    }

    pub fn add_enemy(&mut self, enemy: Entity) -> EntityId {
        debug_assert_eq!(enemy.kind, EntityKind::Enemy);
        self.entities.insert(enemy)
    }

    pub fn add_platform(&mut self, platform: Entity) -> EntityId {
        debug_assert_eq!(platform.kind, EntityKind::Platform);
        self.entities.insert(platform)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entities.get(self.player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.entities.get_mut(self.player)
    }

    pub fn enemies(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .filter(|(_, e)| e.kind == EntityKind::Enemy)
    }

    pub fn active_enemy_count(&self) -> usize {
        self.enemies().filter(|(_, e)| e.active).count()
    }

    pub fn is_won(&self) -> bool {
        self.outcome == Outcome::Won
    }

    pub fn is_lost(&self) -> bool {
        self.outcome == Outcome::Lost
    }

    /// Once won or lost the simulation is frozen
    pub fn is_finished(&self) -> bool {
        self.outcome != Outcome::Playing
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Quads for every entity; inactive ones are reported off-screen
    pub fn render_quads(&self) -> Vec<RenderQuad> {
        self.entities
            .iter()
            .map(|(_, e)| RenderQuad {
                position: if e.active { e.position } else { OFFSCREEN },
                size: e.half_extents * 2.0,
                texture_id: e.texture_id,
            })
            .collect()
    }
}
