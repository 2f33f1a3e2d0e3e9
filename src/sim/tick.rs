//! Fixed timestep simulation tick
//!
//! Core game step that advances the simulation deterministically:
//! 1. player: intent, boost and fuel, integrate
//! 2. every other entity in arena order: AI, integrate
//! 3. contact rules: stomping an enemy defeats it, any other enemy contact loses
//! 4. win/lose latch

use glam::Vec2;

use super::ai;
use super::collision::Hit;
use super::entity::{Collider, EntityId, EntityKind, Side};
use super::motion::{self, MotionInput};
use super::state::{GameEvent, GameState, Outcome};
use crate::tuning::Tuning;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Player movement intent (clamped to unit length)
    pub movement: Vec2,
    /// Jump request, honoured only while the player is grounded
    pub jump: bool,
    /// Burn fuel for extra acceleration along `movement`
    pub boost: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32) {
    debug_assert!(dt >= 0.0, "timestep must be non-negative");

    // Frozen once won or lost
    if state.is_finished() {
        return;
    }

    state.time_ticks += 1;

    let mut contacts: Vec<(EntityId, Hit)> = Vec::new();
    step_player(state, input, tuning, dt, &mut contacts);
    step_others(state, tuning, dt, &mut contacts);

    apply_contact_rules(state, &contacts);
    check_kill_plane(state, tuning);
    check_win(state);
}

/// Spend fuel for one step of boost; false when there is none to spend
fn burn_fuel(state: &mut GameState, tuning: &Tuning, dt: f32) -> bool {
    let Some(fuel) = state.fuel.as_mut() else {
        return false;
    };
    if *fuel <= 0.0 {
        return false;
    }

    *fuel = (*fuel - tuning.fuel_burn_rate * dt).max(0.0);
    if *fuel == 0.0 {
        log::info!("Fuel depleted at tick {}", state.time_ticks);
        state.events.push(GameEvent::FuelDepleted);
    }
    true
}

fn step_player(
    state: &mut GameState,
    input: &TickInput,
    tuning: &Tuning,
    dt: f32,
    contacts: &mut Vec<(EntityId, Hit)>,
) {
    let id = state.player;
    let boost = input.boost && burn_fuel(state, tuning, dt);

    let Some(mut player) = state.entities.detach(id) else {
        return;
    };
    player.set_movement(input.movement);

    let motion_input = MotionInput {
        jump: input.jump,
        boost,
    };
    let report = motion::integrate(
        &mut player,
        dt,
        motion_input,
        &state.map,
        &state.entities,
        tuning,
    );
    state.entities.reattach(id, player);

    if report.jumped {
        state.events.push(GameEvent::Jumped(id));
    }
    contacts.extend(report.hits.into_iter().map(|hit| (id, hit)));
}

fn step_others(
    state: &mut GameState,
    tuning: &Tuning,
    dt: f32,
    contacts: &mut Vec<(EntityId, Hit)>,
) {
    let player_box = state.player().filter(|p| p.active).map(|p| p.aabb());

    let ids: Vec<EntityId> = state
        .entities
        .iter()
        .filter(|(_, e)| e.kind != EntityKind::Player)
        .map(|(id, _)| id)
        .collect();

    for id in ids {
        let Some(mut entity) = state.entities.detach(id) else {
            continue;
        };

        if entity.active {
            let decision = ai::update_enemy(&mut entity, player_box.as_ref(), tuning, dt);
            let motion_input = MotionInput {
                jump: decision.is_some_and(|d| d.jump),
                boost: false,
            };
            let report = motion::integrate(
                &mut entity,
                dt,
                motion_input,
                &state.map,
                &state.entities,
                tuning,
            );

            if report.jumped {
                entity.ai_timer = 0.0;
                state.events.push(GameEvent::Jumped(id));
            }
            contacts.extend(report.hits.into_iter().map(|hit| (id, hit)));
        }

        state.entities.reattach(id, entity);
    }
}

/// Player-vs-enemy contacts decide stomps and losses, in resolution order
fn apply_contact_rules(state: &mut GameState, contacts: &[(EntityId, Hit)]) {
    let player = state.player;

    for &(mover, hit) in contacts {
        let Collider::Entity(other) = hit.collider else {
            continue;
        };

        // Stomp: the player's bottom face met the enemy's top
        let (enemy_id, stomped) = if mover == player {
            (other, hit.side == Side::Bottom)
        } else if other == player {
            (mover, hit.side == Side::Top)
        } else {
            continue;
        };

        let Some(enemy) = state.entities.get_mut(enemy_id) else {
            continue;
        };
        // Already defeated earlier this step
        if enemy.kind != EntityKind::Enemy || !enemy.active {
            continue;
        }

        if stomped {
            log::debug!("Enemy {:?} defeated", enemy_id);
            enemy.deactivate();
            state.events.push(GameEvent::EnemyDefeated(enemy_id));
        } else {
            lose(state, "touched by an enemy");
            return;
        }
    }
}

fn check_kill_plane(state: &mut GameState, tuning: &Tuning) {
    let floor = state.map.bounds().min.y - tuning.kill_plane_margin;
    let fell = state
        .player()
        .is_some_and(|p| p.active && p.position.y < floor);
    if fell {
        lose(state, "fell off the map");
    }
}

fn check_win(state: &mut GameState) {
    if state.outcome != Outcome::Playing {
        return;
    }
    let total = state.enemies().count();
    if total > 0 && state.active_enemy_count() == 0 {
        log::info!("Player won at tick {}", state.time_ticks);
        state.outcome = Outcome::Won;
        state.events.push(GameEvent::Won);
    }
}

fn lose(state: &mut GameState, reason: &str) {
    if state.outcome != Outcome::Playing {
        return;
    }
    log::info!("Player lost at tick {}: {}", state.time_ticks, reason);
    state.outcome = Outcome::Lost;
    state.events.push(GameEvent::Lost);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FIXED_TIMESTEP;
    use crate::sim::entity::{AiArchetype, Entity, MotionModel};
    use crate::sim::map::TileMap;

    // 10x4 with a floor along the bottom row (floor top at y = 1.0)
    fn floor_map() -> TileMap {
        let mut cells = vec![0u32; 40];
        cells[30..40].fill(1);
        TileMap::new(10, 4, &cells, 1.0, Vec2::new(0.0, 4.0)).expect("valid map")
    }

    fn player_at(x: f32, y: f32, tuning: &Tuning) -> Entity {
        Entity::new(EntityKind::Player, Vec2::new(x, y), Vec2::splat(0.4))
            .with_acceleration(Vec2::new(0.0, tuning.gravity))
            .with_motion(MotionModel::Grounded, tuning.player_move_acceleration)
            .with_jumping_power(tuning.player_jumping_power)
    }

    fn enemy_at(x: f32, archetype: AiArchetype, tuning: &Tuning) -> Entity {
        Entity::new(EntityKind::Enemy, Vec2::new(x, 1.4), Vec2::splat(0.4))
            .with_acceleration(Vec2::new(0.0, tuning.gravity))
            .with_motion(MotionModel::Grounded, tuning.enemy_move_acceleration)
            .with_ai(archetype)
    }

    fn run(state: &mut GameState, input: &TickInput, tuning: &Tuning, ticks: usize) {
        for _ in 0..ticks {
            tick(state, input, tuning, FIXED_TIMESTEP);
        }
    }

    #[test]
    fn test_stomp_defeats_enemy_and_wins() {
        let tuning = Tuning::default();
        let mut state = GameState::new(floor_map(), player_at(5.5, 2.6, &tuning));
        let guard = state.add_enemy(enemy_at(5.5, AiArchetype::Guard, &tuning));

        run(&mut state, &TickInput::default(), &tuning, 90);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::EnemyDefeated(guard)));
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Won).count(), 1);
        assert!(state.is_won());
        let guard = state.entities.get(guard).expect("guard stays in the arena");
        assert!(!guard.active);
    }

    #[test]
    fn test_side_contact_loses() {
        let tuning = Tuning::default();
        let mut state = GameState::new(floor_map(), player_at(5.0, 1.4, &tuning));
        state.add_enemy(
            enemy_at(3.0, AiArchetype::Walker, &tuning).with_movement(Vec2::new(1.0, 0.0)),
        );

        run(&mut state, &TickInput::default(), &tuning, 300);
        assert!(state.is_lost());
        assert!(state.drain_events().contains(&GameEvent::Lost));
    }

    #[test]
    fn test_enemy_landing_on_player_loses() {
        let tuning = Tuning::default();
        let mut state = GameState::new(floor_map(), player_at(5.0, 1.4, &tuning));
        let mut guard = enemy_at(5.0, AiArchetype::Guard, &tuning);
        guard.set_position(Vec2::new(5.0, 2.6));
        let guard = state.add_enemy(guard);

        run(&mut state, &TickInput::default(), &tuning, 60);

        assert!(state.is_lost());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Lost));
        assert!(!events.contains(&GameEvent::EnemyDefeated(guard)));
        assert!(state.entities.get(guard).is_some_and(|g| g.active));
    }

    #[test]
    fn test_jumper_hitting_player_from_below_is_defeated() {
        let tuning = Tuning {
            detection_radius: 0.1,
            ..Default::default()
        };
        // Hovering just above the jumper's head, out of reach of gravity
        let player = player_at(5.0, 2.4, &tuning).with_acceleration(Vec2::ZERO);
        let mut state = GameState::new(floor_map(), player);
        let jumper = state.add_enemy(
            enemy_at(5.0, AiArchetype::Jumper, &tuning)
                .with_jumping_power(tuning.enemy_jumping_power),
        );

        run(&mut state, &TickInput::default(), &tuning, 150);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Jumped(jumper)));
        assert!(events.contains(&GameEvent::EnemyDefeated(jumper)));
        assert!(!events.contains(&GameEvent::Lost));
        assert!(state.is_won());
    }

    #[test]
    fn test_finished_state_is_frozen() {
        let tuning = Tuning::default();
        let mut state = GameState::new(floor_map(), player_at(2.0, 1.4, &tuning));
        state.add_enemy(enemy_at(8.0, AiArchetype::Guard, &tuning));
        state.outcome = Outcome::Lost;

        let before = state.player().map(|p| p.position);
        let input = TickInput {
            movement: Vec2::new(1.0, 0.0),
            jump: true,
            boost: false,
        };
        run(&mut state, &input, &tuning, 30);
        assert_eq!(state.player().map(|p| p.position), before);
        assert_eq!(state.time_ticks, 0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_jump_event_and_grounding() {
        let tuning = Tuning::default();
        let mut state = GameState::new(floor_map(), player_at(2.0, 1.4, &tuning));
        state.add_enemy(enemy_at(9.0, AiArchetype::Guard, &tuning));

        // Settle on the floor first
        run(&mut state, &TickInput::default(), &tuning, 2);
        assert!(state.player().is_some_and(|p| p.is_grounded()));

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, &tuning, FIXED_TIMESTEP);
        let player = state.player;
        assert!(state.events.contains(&GameEvent::Jumped(player)));
        assert_eq!(
            state.player().map(|p| p.velocity.y),
            Some(tuning.player_jumping_power)
        );

        // Airborne: holding jump does nothing
        state.events.clear();
        tick(&mut state, &jump, &tuning, FIXED_TIMESTEP);
        assert!(!state.events.contains(&GameEvent::Jumped(player)));
    }

    #[test]
    fn test_fuel_burns_down_once() {
        let tuning = Tuning::default();
        let mut state =
            GameState::new(floor_map(), player_at(2.0, 2.0, &tuning)).with_fuel(0.05);
        state.add_enemy(enemy_at(9.0, AiArchetype::Guard, &tuning));

        let boost = TickInput {
            movement: Vec2::new(0.0, 1.0),
            boost: true,
            ..Default::default()
        };
        run(&mut state, &boost, &tuning, 20);

        assert_eq!(state.fuel, Some(0.0));
        let depleted = state
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::FuelDepleted)
            .count();
        assert_eq!(depleted, 1);
    }

    #[test]
    fn test_falling_off_the_map_loses() {
        let tuning = Tuning::default();
        let map = TileMap::new(4, 2, &[0; 8], 1.0, Vec2::new(0.0, 2.0)).expect("valid map");
        let mut state = GameState::new(map, player_at(1.5, 1.5, &tuning));

        run(&mut state, &TickInput::default(), &tuning, 200);
        assert!(state.is_lost());
    }

    #[test]
    fn test_no_enemies_is_not_a_win() {
        let tuning = Tuning::default();
        let mut state = GameState::new(floor_map(), player_at(2.0, 1.4, &tuning));
        run(&mut state, &TickInput::default(), &tuning, 10);
        assert_eq!(state.outcome, Outcome::Playing);
    }
}
