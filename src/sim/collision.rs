//! Axis-separated collision resolution
//!
//! After an entity moves along one axis it is pushed back out of whatever it
//! now overlaps, along that axis only:
//! 1. solid tiles, in row-major order
//! 2. other active, non-platform entities, in arena order
//!
//! The first overlap found wins. The entity is placed flush against the other
//! rectangle (the minimum translation along the moved axis), that velocity
//! component is zeroed, and the contact flag for the face that hit is set.
//! The scan repeats a bounded number of times so a push out of one collider
//! cannot leave the entity inside another.
//!
//! Bodies collide with their [`Entity::collision_box`], which gives points
//! and slivers a minimum thickness.

use glam::Vec2;

use super::aabb::Aabb;
use super::entity::{Collider, Entity, EntityArena, Side};
use super::map::TileMap;
use crate::consts::MAX_RESOLVE_PASSES;

/// Axis of a positional update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// One resolved collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub collider: Collider,
    /// Face of the moving entity that made contact
    pub side: Side,
}

/// Find the first collider overlapping `body`, tiles before entities
pub fn first_overlap(body: &Entity, map: &TileMap, others: &EntityArena) -> Option<(Collider, Aabb)> {
    let bounds = body.collision_box();

    let tile = map
        .solid_cells_in(&bounds)
        .find(|(_, rect)| bounds.overlaps(rect))
        .map(|(coord, rect)| (Collider::Tile(coord), rect));
    if tile.is_some() {
        return tile;
    }

    if !body.collides_with_entities() {
        return None;
    }

    others
        .iter()
        .filter(|(_, other)| other.collides_with_entities())
        .map(|(id, other)| (id, other.collision_box()))
        .find(|(_, rect)| bounds.overlaps(rect))
        .map(|(id, rect)| (Collider::Entity(id), rect))
}

/// Which face of the mover hit `other`.
///
/// Direction of travel decides; with no travel on the axis the relative
/// centres do.
fn contact_side(axis: Axis, moved: f32, mover: Vec2, other: Vec2) -> Side {
    match axis {
        Axis::Y => {
            let downward = if moved != 0.0 { moved < 0.0 } else { mover.y >= other.y };
            if downward { Side::Bottom } else { Side::Top }
        }
        Axis::X => {
            let rightward = if moved != 0.0 { moved > 0.0 } else { mover.x <= other.x };
            if rightward { Side::Right } else { Side::Left }
        }
    }
}

/// Place the mover flush against `other` on the given face and stop it on that axis
fn displace(body: &mut Entity, side: Side, other: &Aabb) {
    let half = body.collision_half_extents();
    match side {
        Side::Bottom => {
            body.position.y = other.max.y + half.y;
            body.velocity.y = 0.0;
        }
        Side::Top => {
            body.position.y = other.min.y - half.y;
            body.velocity.y = 0.0;
        }
        Side::Right => {
            body.position.x = other.min.x - half.x;
            body.velocity.x = 0.0;
        }
        Side::Left => {
            body.position.x = other.max.x + half.x;
            body.velocity.x = 0.0;
        }
    }
}

/// Resolve penetrations after moving `moved` units along `axis`.
///
/// Returns every hit in resolution order (usually zero or one).
pub fn resolve_axis(
    body: &mut Entity,
    axis: Axis,
    moved: f32,
    map: &TileMap,
    others: &EntityArena,
) -> Vec<Hit> {
    let mut hits = Vec::new();
    if !body.active {
        return hits;
    }

    for _ in 0..MAX_RESOLVE_PASSES {
        let Some((collider, rect)) = first_overlap(body, map, others) else {
            break;
        };

        let side = contact_side(axis, moved, body.position2(), rect.center());
        displace(body, side, &rect);
        body.contacts.set(side);
        body.last_collided_with = Some(collider);
        hits.push(Hit { collider, side });
    }

    hits
}
