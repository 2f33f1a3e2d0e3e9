//! Tilestep headless demo
//!
//! Plays level 1 with a simple autopilot, feeding the scheduler jittery frame
//! times the way a real render loop would. Usage:
//!
//! ```text
//! tilestep [tuning.json]
//! tilestep --dump-tuning > tuning.json
//! ```

use std::process::ExitCode;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use tilestep::Tuning;
use tilestep::level;
use tilestep::sim::{GameEvent, GameState, Outcome, Scheduler, TickInput, tick};

/// Demo length in wall-clock seconds
const DEMO_SECONDS: f64 = 30.0;
const FRAME_SEED: u64 = 0x5eed;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Tilestep demo starting...");

    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("--dump-tuning") {
        return dump_tuning();
    }

    let tuning = match load_tuning(arg) {
        Ok(tuning) => tuning,
        Err(message) => {
            log::error!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let mut state = match level::platformer(&tuning) {
        Ok(state) => state,
        Err(err) => {
            log::error!("Failed to build level: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut scheduler = Scheduler::from_tuning(&tuning);
    let mut rng = Pcg32::seed_from_u64(FRAME_SEED);
    let mut now = 0.0f64;
    let mut frames = 0u64;
    scheduler.frame(now);

    while now < DEMO_SECONDS && !state.is_finished() {
        // 50-70 Hz display with the odd hitch
        let mut frame_time = rng.random_range(1.0 / 70.0..1.0 / 50.0);
        if rng.random_bool(0.01) {
            frame_time += 0.25;
        }
        now += frame_time;
        frames += 1;

        let input = autopilot(&state);
        let frame = scheduler.frame(now);
        for _ in 0..frame.steps {
            tick(&mut state, &input, &tuning, scheduler.step() as f32);
        }
        report_events(&mut state);
    }

    let outcome = match state.outcome {
        Outcome::Won => "You win!",
        Outcome::Lost => "Game over",
        Outcome::Playing => "Time up",
    };
    println!(
        "{} after {} frames / {} ticks ({} enemies left)",
        outcome,
        frames,
        state.time_ticks,
        state.active_enemy_count()
    );
    ExitCode::SUCCESS
}

/// Print the default tuning as a starter file
fn dump_tuning() -> ExitCode {
    match Tuning::default().to_json() {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Failed to serialize tuning: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn load_tuning(path: Option<String>) -> Result<Tuning, String> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(&path)
        .map_err(|e| format!("Unable to read tuning file {}: {}", path, e))?;
    let tuning =
        Tuning::from_json(&json).map_err(|e| format!("Invalid tuning file {}: {}", path, e))?;
    log::info!("Loaded tuning from {}", path);
    Ok(tuning)
}

/// Head for the nearest live enemy and hop onto it
fn autopilot(state: &GameState) -> TickInput {
    let Some(player) = state.player() else {
        return TickInput::default();
    };
    let pos = player.position2();

    let target = state
        .enemies()
        .filter(|(_, e)| e.active)
        .map(|(_, e)| e.position2())
        .min_by(|a, b| {
            a.distance_squared(pos)
                .partial_cmp(&b.distance_squared(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(target) = target else {
        return TickInput::default();
    };

    let dx = target.x - pos.x;
    let close = dx.abs() < 2.2;
    TickInput {
        movement: Vec2::new(dx.signum(), 0.0),
        jump: close && player.is_grounded(),
        boost: false,
    }
}

/// Stand-in for the audio and HUD collaborators
fn report_events(state: &mut GameState) {
    for event in state.drain_events() {
        match event {
            GameEvent::Jumped(_) => log::trace!("sfx: jump"),
            GameEvent::EnemyDefeated(id) => log::info!("sfx: stomp (enemy {})", id.index()),
            GameEvent::FuelDepleted => log::info!("sfx: fuel empty"),
            GameEvent::Won => log::info!("text: YOU WIN"),
            GameEvent::Lost => log::info!("text: YOU LOSE"),
        }
    }
}
