//! Per-entity fixed-step motion integration
//!
//! Order inside one step:
//! 1. frame acceleration = constant acceleration + intent + boost
//! 2. velocity += acceleration * dt, then linear horizontal drag
//! 3. jump impulse (only when grounded as of the previous step)
//! 4. move on Y and resolve, then move on X and resolve
//!
//! Y resolves first so landing on a floor settles before any horizontal push.

use glam::Vec2;

use super::collision::{Axis, Hit, resolve_axis};
use super::entity::{Entity, EntityArena, MotionModel};
use super::map::TileMap;
use crate::tuning::Tuning;

/// Per-step motion requests for one entity
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionInput {
    /// Jump requested (ignored unless grounded)
    pub jump: bool,
    /// Boost active this step (the caller has already checked fuel)
    pub boost: bool,
}

/// What happened while integrating one entity
#[derive(Debug, Clone, Default)]
pub struct MotionReport {
    pub jumped: bool,
    /// Collisions in resolution order (Y axis first)
    pub hits: Vec<Hit>,
}

/// Acceleration for this step from gravity, intent and boost
pub fn frame_acceleration(entity: &Entity, boost: bool, tuning: &Tuning) -> Vec2 {
    let intent = match entity.motion {
        MotionModel::Grounded => Vec2::new(entity.movement.x, 0.0),
        MotionModel::Free => entity.movement,
    };

    let mut acceleration = entity.acceleration + intent * entity.move_acceleration;
    if boost {
        acceleration += entity.movement * tuning.boost_acceleration;
    }
    acceleration
}

/// Advance one entity by `dt`, resolving collisions against the map and `others`.
///
/// `others` must not contain `entity` itself (see [`EntityArena::detach`]).
pub fn integrate(
    entity: &mut Entity,
    dt: f32,
    input: MotionInput,
    map: &TileMap,
    others: &EntityArena,
    tuning: &Tuning,
) -> MotionReport {
    let mut report = MotionReport::default();
    if !entity.active {
        return report;
    }

    let grounded = entity.is_grounded();

    let acceleration = frame_acceleration(entity, input.boost, tuning);
    entity.velocity += acceleration * dt;
    entity.velocity.x *= (1.0 - tuning.horizontal_drag * dt).max(0.0);

    if input.jump && grounded {
        entity.velocity.y = entity.jumping_power;
        report.jumped = true;
    }

    entity.contacts.clear();
    entity.last_collided_with = None;

    let dy = entity.velocity.y * dt;
    entity.position.y += dy;
    report
        .hits
        .extend(resolve_axis(entity, Axis::Y, dy, map, others));

    let dx = entity.velocity.x * dt;
    entity.position.x += dx;
    report
        .hits
        .extend(resolve_axis(entity, Axis::X, dx, map, others));

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FIXED_TIMESTEP, MIN_COLLISION_HALF_EXTENT};
    use crate::sim::entity::{EntityKind, Side};

    // 6x4: floor, and a wall block at column 4 on the row above the floor
    const CELLS: [u32; 24] = [
        0, 0, 0, 0, 0, 0, //
        0, 0, 0, 0, 0, 0, //
        0, 0, 0, 0, 1, 0, //
        1, 1, 1, 1, 1, 1, //
    ];

    fn map() -> TileMap {
        TileMap::new(6, 4, &CELLS, 1.0, Vec2::new(0.0, 4.0)).expect("valid map")
    }

    fn tuning() -> Tuning {
        Tuning::default()
    }

    #[test]
    fn test_rest_invariant() {
        let map = map();
        let others = EntityArena::new();
        let mut e = Entity::new(EntityKind::Enemy, Vec2::new(1.5, 3.0), Vec2::splat(0.3));
        let start = e.position;

        for _ in 0..120 {
            integrate(&mut e, FIXED_TIMESTEP, MotionInput::default(), &map, &others, &tuning());
        }
        assert_eq!(e.position, start);
        assert_eq!(e.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_gravity_settles_on_floor() {
        let map = map();
        let others = EntityArena::new();
        let t = tuning();
        let mut e = Entity::new(EntityKind::Player, Vec2::new(1.5, 2.5), Vec2::splat(0.4))
            .with_acceleration(Vec2::new(0.0, t.gravity));

        for _ in 0..180 {
            integrate(&mut e, FIXED_TIMESTEP, MotionInput::default(), &map, &others, &t);
        }
        assert!(e.is_grounded());
        assert!((e.position.y - 1.4).abs() < 1e-5);
        assert_eq!(e.velocity.y, 0.0);
    }

    #[test]
    fn test_point_body_lands_on_floor() {
        let map = map();
        let others = EntityArena::new();
        let t = tuning();

        // Mid-cell and exactly on the seam between two floor cells
        for x in [1.5, 2.0] {
            let mut e = Entity::new(EntityKind::Enemy, Vec2::new(x, 2.5), Vec2::ZERO)
                .with_acceleration(Vec2::new(0.0, t.gravity));

            for step in 0..180 {
                integrate(&mut e, FIXED_TIMESTEP, MotionInput::default(), &map, &others, &t);
                assert!(
                    e.position.y >= 1.0,
                    "step {step}: point inside the floor at y={}",
                    e.position.y
                );
            }
            assert!(e.is_grounded());
            assert_eq!(e.velocity.y, 0.0);
            assert!((e.position.y - (1.0 + MIN_COLLISION_HALF_EXTENT)).abs() < 1e-5);
            assert_eq!(e.position.x, x);
        }
    }

    #[test]
    fn test_walker_into_wall_stops_and_flags_right() {
        let map = map();
        let others = EntityArena::new();
        let t = tuning();
        // Right face exactly touching the wall block at x = 4.0
        let mut e = Entity::new(EntityKind::Enemy, Vec2::new(3.6, 1.4), Vec2::splat(0.4))
            .with_acceleration(Vec2::new(0.0, t.gravity))
            .with_motion(MotionModel::Grounded, t.enemy_move_acceleration)
            .with_movement(Vec2::new(1.0, 0.0));

        let report = integrate(&mut e, FIXED_TIMESTEP, MotionInput::default(), &map, &others, &t);
        assert!(e.contacts.right);
        assert_eq!(e.velocity.x, 0.0);
        assert!(report.hits.iter().any(|h| h.side == Side::Right));
        assert!(e.aabb().max.x <= 4.0 + 1e-5);
    }

    #[test]
    fn test_jump_needs_ground() {
        let map = map();
        let others = EntityArena::new();
        let t = tuning();
        let mut e = Entity::new(EntityKind::Player, Vec2::new(1.5, 3.0), Vec2::splat(0.4))
            .with_acceleration(Vec2::new(0.0, t.gravity))
            .with_jumping_power(2.0);

        let input = MotionInput { jump: true, boost: false };
        let report = integrate(&mut e, FIXED_TIMESTEP, input, &map, &others, &t);
        assert!(!report.jumped);
        assert!(e.velocity.y < 0.0);
    }

    #[test]
    fn test_jumper_arc() {
        let map = map();
        let others = EntityArena::new();
        let t = Tuning {
            gravity: -4.905,
            ..Default::default()
        };
        let mut e = Entity::new(EntityKind::Enemy, Vec2::new(1.5, 1.4), Vec2::splat(0.4))
            .with_acceleration(Vec2::new(0.0, t.gravity))
            .with_jumping_power(2.0);
        e.contacts.bottom = true;

        let jump = MotionInput { jump: true, boost: false };
        let report = integrate(&mut e, FIXED_TIMESTEP, jump, &map, &others, &t);
        assert!(report.jumped);
        assert_eq!(e.velocity.y, 2.0);

        let mut went_negative = false;
        let mut landed = false;
        let mut apex = e.position.y;
        for _ in 0..240 {
            integrate(&mut e, FIXED_TIMESTEP, MotionInput::default(), &map, &others, &t);
            apex = apex.max(e.position.y);
            if e.velocity.y < 0.0 {
                went_negative = true;
            }
            if went_negative && e.is_grounded() {
                landed = true;
                break;
            }
        }
        assert!(went_negative);
        assert!(landed);
        assert_eq!(e.velocity.y, 0.0);
        assert!((e.position.y - 1.4).abs() < 1e-5);

        // Discrete apex stays within one step of 2² / (2 * 4.905)
        let rise = apex - 1.4;
        assert!((rise - 0.4077).abs() < 0.05, "rise {rise}");
    }

    #[test]
    fn test_horizontal_drag_caps_speed() {
        let map = map();
        let others = EntityArena::new();
        let t = tuning();
        let mut e = Entity::new(EntityKind::Player, Vec2::new(0.5, 3.0), Vec2::splat(0.1))
            .with_motion(MotionModel::Free, 10.0)
            .with_movement(Vec2::new(1.0, 0.0));

        for _ in 0..30 {
            integrate(&mut e, FIXED_TIMESTEP, MotionInput::default(), &map, &others, &t);
        }
        // Terminal speed is move_acceleration / drag = 2.0
        assert!(e.velocity.x > 0.0 && e.velocity.x < 2.0);
    }

    #[test]
    fn test_boost_uses_both_axes() {
        let t = tuning();
        let e = Entity::new(EntityKind::Player, Vec2::ZERO, Vec2::splat(0.4))
            .with_acceleration(Vec2::new(0.0, t.gravity))
            .with_motion(MotionModel::Grounded, 10.0)
            .with_movement(Vec2::new(0.0, 1.0));

        assert_eq!(frame_acceleration(&e, false, &t), Vec2::new(0.0, t.gravity));
        let boosted = frame_acceleration(&e, true, &t);
        assert!((boosted.y - (t.gravity + t.boost_acceleration)).abs() < 1e-6);
    }
}
