//! Entities and the arena that owns them
//!
//! Entities are built once at level setup and never spawned mid-game.
//! Cross-entity references (`last_collided_with`) are [`EntityId`]s:
//! an arena slot index plus the slot's generation, so a stale reference
//! resolves to `None` instead of to whatever reuses the slot.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::map::TileCoord;
use crate::clamp_unit;
use crate::consts::{MIN_COLLISION_HALF_EXTENT, OFFSCREEN};

/// What an entity is in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    /// Moves with the map only; never pushes or is pushed by other entities
    Platform,
}

/// Enemy behaviour archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiArchetype {
    /// Stands still until the player comes close
    Guard,
    /// Patrols left/right, turning at walls and patrol bounds
    Walker,
    /// Hops in place on a timer
    Jumper,
}

/// Enemy behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,
    Walking,
    Attacking,
    Jumping,
}

/// How the movement intent feeds acceleration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionModel {
    /// Only the horizontal intent is used; gravity owns the vertical axis
    #[default]
    Grounded,
    /// Both intent components are used (flying or lander-style)
    Free,
}

/// A face of an entity's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Which faces resolved a collision during the current step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contacts {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Contacts {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set(&mut self, side: Side) {
        match side {
            Side::Top => self.top = true,
            Side::Bottom => self.bottom = true,
            Side::Left => self.left = true,
            Side::Right => self.right = true,
        }
    }

    pub fn has(&self, side: Side) -> bool {
        match side {
            Side::Top => self.top,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }
}

/// Stable handle into an [`EntityArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// The thing an entity last collided with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collider {
    Tile(TileCoord),
    Entity(EntityId),
}

/// A simulated actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    /// Centre of the bounding box (z is a render layer, always 0 here)
    pub position: Vec3,
    pub velocity: Vec2,
    /// Constant acceleration (gravity for grounded entities)
    pub acceleration: Vec2,
    /// Movement intent, at most unit length
    pub movement: Vec2,
    pub half_extents: Vec2,
    pub motion: MotionModel,
    /// Acceleration produced by a full-length intent
    pub move_acceleration: f32,
    /// Upward velocity set by a jump
    pub jumping_power: f32,
    pub ai: Option<AiArchetype>,
    pub ai_state: AiState,
    /// Seconds since the last jump (jumper timer)
    pub ai_timer: f32,
    /// Horizontal patrol bounds for walkers
    pub patrol: Option<(f32, f32)>,
    pub active: bool,
    pub contacts: Contacts,
    /// Only meaningful until the next collision check
    pub last_collided_with: Option<Collider>,
    pub texture_id: u32,
}

impl Entity {
    pub fn new(kind: EntityKind, position: Vec2, half_extents: Vec2) -> Self {
        debug_assert!(
            half_extents.cmpge(Vec2::ZERO).all(),
            "half extents must be non-negative"
        );
        Self {
            kind,
            position: position.extend(0.0),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            movement: Vec2::ZERO,
            half_extents: half_extents.max(Vec2::ZERO),
            motion: MotionModel::Grounded,
            move_acceleration: 0.0,
            jumping_power: 0.0,
            ai: None,
            ai_state: AiState::Idle,
            ai_timer: 0.0,
            patrol: None,
            active: true,
            contacts: Contacts::default(),
            last_collided_with: None,
            texture_id: 0,
        }
    }

    pub fn with_acceleration(mut self, acceleration: Vec2) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_motion(mut self, motion: MotionModel, move_acceleration: f32) -> Self {
        self.motion = motion;
        self.move_acceleration = move_acceleration;
        self
    }

    pub fn with_jumping_power(mut self, jumping_power: f32) -> Self {
        self.jumping_power = jumping_power;
        self
    }

    pub fn with_ai(mut self, archetype: AiArchetype) -> Self {
        self.ai = Some(archetype);
        self.ai_state = match archetype {
            AiArchetype::Walker => AiState::Walking,
            AiArchetype::Guard | AiArchetype::Jumper => AiState::Idle,
        };
        self
    }

    pub fn with_patrol(mut self, min_x: f32, max_x: f32) -> Self {
        self.patrol = Some((min_x.min(max_x), min_x.max(max_x)));
        self
    }

    pub fn with_movement(mut self, movement: Vec2) -> Self {
        self.set_movement(movement);
        self
    }

    pub fn with_texture(mut self, texture_id: u32) -> Self {
        self.texture_id = texture_id;
        self
    }

    #[inline]
    pub fn position2(&self) -> Vec2 {
        self.position.truncate()
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position.extend(self.position.z);
    }

    pub fn set_movement(&mut self, movement: Vec2) {
        self.movement = clamp_unit(movement);
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position2(), self.half_extents)
    }

    /// Half extents used for collision; never thinner than
    /// [`MIN_COLLISION_HALF_EXTENT`] so a point body still hits tiles
    #[inline]
    pub fn collision_half_extents(&self) -> Vec2 {
        self.half_extents.max(Vec2::splat(MIN_COLLISION_HALF_EXTENT))
    }

    pub fn collision_box(&self) -> Aabb {
        Aabb::from_center(self.position2(), self.collision_half_extents())
    }

    /// Standing on something as of the last resolved step
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.contacts.bottom
    }

    /// Whether entity-vs-entity collision applies to this entity at all
    #[inline]
    pub fn collides_with_entities(&self) -> bool {
        self.active && self.kind != EntityKind::Platform
    }

    /// Take the entity out of play and park it off-screen
    pub fn deactivate(&mut self) {
        self.active = false;
        self.position = OFFSCREEN;
        self.velocity = Vec2::ZERO;
        self.movement = Vec2::ZERO;
        self.contacts.clear();
        self.last_collided_with = None;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
    /// Temporarily taken out for an update; the id stays valid
    detached: bool,
}

/// Owner of every entity in a level, iterated in insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityArena {
    slots: Vec<Slot>,
}

impl EntityArena {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn insert(&mut self, entity: Entity) -> EntityId {
        if let Some(index) = self
            .slots
            .iter()
            .position(|s| s.entity.is_none() && !s.detached)
        {
            let slot = &mut self.slots[index];
            slot.entity = Some(entity);
            return EntityId {
                index: index as u32,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            entity: Some(entity),
            detached: false,
        });
        EntityId {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    /// Remove an entity for good; outstanding ids to it go stale
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.live_slot_mut(id)?;
        if slot.detached {
            return None;
        }
        let entity = slot.entity.take();
        slot.generation = slot.generation.wrapping_add(1);
        entity
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots
            .get(id.index())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.entity.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.live_slot_mut(id).and_then(|s| s.entity.as_mut())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Take an entity out so it can be updated against the rest of the arena.
    ///
    /// While detached it is invisible to [`EntityArena::iter`], which is how an
    /// entity is excluded from its own collision checks.
    pub fn detach(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.live_slot_mut(id)?;
        let entity = slot.entity.take()?;
        slot.detached = true;
        Some(entity)
    }

    /// Put a detached entity back under its original id
    pub fn reattach(&mut self, id: EntityId, entity: Entity) {
        if let Some(slot) = self.slots.get_mut(id.index())
            && slot.generation == id.generation
            && slot.detached
        {
            slot.entity = Some(entity);
            slot.detached = false;
        } else {
            log::warn!("reattach with stale id {:?}", id);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entity.as_ref().map(|e| {
                (
                    EntityId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    e,
                )
            })
        })
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.entity.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live_slot_mut(&mut self, id: EntityId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index())
            .filter(|s| s.generation == id.generation)
    }
}
