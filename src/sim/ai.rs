//! Enemy behaviour
//!
//! [`behavior`] is a pure function of (archetype, state, sensed world).
//! [`update_enemy`] is the controller that builds the sensed view for one
//! enemy, applies the decision to it and advances its timers.
//!
//! Rules shared by every archetype:
//! - player box within the detection radius → `Attacking`, intent toward the player
//! - otherwise the archetype's default behaviour

use glam::Vec2;

use super::aabb::Aabb;
use super::entity::{AiArchetype, AiState, Contacts, Entity};
use crate::direction_to;
use crate::tuning::Tuning;

/// What an enemy can perceive this step
#[derive(Debug, Clone, Copy)]
pub struct Sensed {
    pub position: Vec2,
    /// Current movement intent (walkers keep heading this way)
    pub movement: Vec2,
    /// Contact flags from the previous step
    pub contacts: Contacts,
    /// Player bounds, `None` when there is no active player
    pub player: Option<Aabb>,
    pub detection_radius: f32,
    pub patrol: Option<(f32, f32)>,
    /// Seconds since this enemy last jumped
    pub jump_timer: f32,
    pub jump_interval: f32,
}

/// Output of one behaviour evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub state: AiState,
    pub movement: Vec2,
    pub jump: bool,
}

impl Decision {
    fn idle() -> Self {
        Self {
            state: AiState::Idle,
            movement: Vec2::ZERO,
            jump: false,
        }
    }
}

/// Enemy archetype for the `index`-th enemy placed in a level.
///
/// Total over all indices: the archetypes repeat guard, walker, jumper.
pub fn archetype_for_index(index: usize) -> AiArchetype {
    match index % 3 {
        0 => AiArchetype::Guard,
        1 => AiArchetype::Walker,
        _ => AiArchetype::Jumper,
    }
}

/// Whether the player's box is inside the detection radius
pub fn detects_player(sensed: &Sensed) -> bool {
    sensed
        .player
        .is_some_and(|player| player.distance_to_point(sensed.position) <= sensed.detection_radius)
}

/// Choose next state and intent
pub fn behavior(archetype: AiArchetype, state: AiState, sensed: &Sensed) -> Decision {
    if let Some(player) = sensed.player.filter(|_| detects_player(sensed)) {
        return Decision {
            state: AiState::Attacking,
            movement: direction_to(sensed.position, player.center()),
            jump: false,
        };
    }

    match archetype {
        AiArchetype::Guard => Decision::idle(),
        AiArchetype::Walker => walk(sensed),
        AiArchetype::Jumper => hop(state, sensed),
    }
}

fn walk(sensed: &Sensed) -> Decision {
    let mut heading = if sensed.movement.x > 0.0 { 1.0 } else { -1.0 };

    if heading > 0.0 && sensed.contacts.right {
        heading = -1.0;
    } else if heading < 0.0 && sensed.contacts.left {
        heading = 1.0;
    }

    if let Some((min_x, max_x)) = sensed.patrol {
        if heading > 0.0 && sensed.position.x >= max_x {
            heading = -1.0;
        } else if heading < 0.0 && sensed.position.x <= min_x {
            heading = 1.0;
        }
    }

    Decision {
        state: AiState::Walking,
        movement: Vec2::new(heading, 0.0),
        jump: false,
    }
}

fn hop(state: AiState, sensed: &Sensed) -> Decision {
    let grounded = sensed.contacts.bottom;
    if grounded && sensed.jump_timer >= sensed.jump_interval {
        return Decision {
            state: AiState::Jumping,
            movement: Vec2::ZERO,
            jump: true,
        };
    }

    if !grounded && state == AiState::Jumping {
        Decision {
            state: AiState::Jumping,
            movement: Vec2::ZERO,
            jump: false,
        }
    } else {
        Decision::idle()
    }
}

/// Run behaviour for one enemy and apply the result.
///
/// Returns the decision so the caller can turn `jump` into a motion input.
/// Entities without an archetype, and inactive ones, are left untouched.
pub fn update_enemy(
    enemy: &mut Entity,
    player: Option<&Aabb>,
    tuning: &Tuning,
    dt: f32,
) -> Option<Decision> {
    if !enemy.active {
        return None;
    }
    let archetype = enemy.ai?;

    enemy.ai_timer += dt;
    let sensed = Sensed {
        position: enemy.position2(),
        movement: enemy.movement,
        contacts: enemy.contacts,
        player: player.copied(),
        detection_radius: tuning.detection_radius,
        patrol: enemy.patrol,
        jump_timer: enemy.ai_timer,
        jump_interval: tuning.jump_interval,
    };

    let decision = behavior(archetype, enemy.ai_state, &sensed);
    if decision.state != enemy.ai_state {
        log::debug!(
            "{:?} enemy at {:?}: {:?} -> {:?}",
            archetype,
            sensed.position,
            enemy.ai_state,
            decision.state
        );
    }
    enemy.ai_state = decision.state;
    enemy.set_movement(decision.movement);
    Some(decision)
}
