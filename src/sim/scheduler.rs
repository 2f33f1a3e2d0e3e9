//! Fixed-timestep scheduler
//!
//! Turns variable wall-clock frame deltas into a whole number of fixed
//! simulation steps, carrying the remainder into the next frame.
//!
//! The accumulator works in `f64` seconds on an exact 1/60 s step; only the
//! `dt` handed to the step closure is `f32`.
//!
//! A long stall (debugger pause, window drag) produces a burst of catch-up
//! steps. That is the classic spiral-of-death trade-off; it is left unbounded
//! unless `max_steps_per_frame` is set, in which case surplus whole steps are
//! dropped and only the sub-step remainder carries over.

use crate::consts::FIXED_TIMESTEP_SECS;
use crate::tuning::Tuning;

/// Result of scheduling one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSteps {
    /// Fixed steps to run this frame
    pub steps: u32,
    /// Whole steps discarded by the per-frame cap
    pub dropped: u32,
    /// Time carried into the next frame (always < one step)
    pub leftover: f64,
}

/// Accumulator that drives the simulation at a fixed rate
#[derive(Debug, Clone)]
pub struct Scheduler {
    step: f64,
    leftover: f64,
    previous: Option<f64>,
    max_steps: Option<u32>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(FIXED_TIMESTEP_SECS)
    }
}

impl Scheduler {
    pub fn new(step: f64) -> Self {
        debug_assert!(step > 0.0, "fixed timestep must be positive");
        Self {
            step,
            leftover: 0.0,
            previous: None,
            max_steps: None,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::default().with_max_steps(tuning.max_steps_per_frame)
    }

    pub fn with_max_steps(mut self, max_steps: Option<u32>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Length of one fixed step in seconds
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn leftover(&self) -> f64 {
        self.leftover
    }

    /// Forget timing history (after a pause or level reload)
    pub fn reset(&mut self) {
        self.leftover = 0.0;
        self.previous = None;
    }

    /// Consume `delta` seconds of wall-clock time.
    ///
    /// Negative or NaN deltas count as zero, and so do infinite ones.
    /// The step count saturates at `u32::MAX`.
    pub fn advance(&mut self, delta: f64) -> FrameSteps {
        let delta = if delta.is_finite() {
            delta.max(0.0)
        } else {
            if delta.is_infinite() {
                log::warn!("Ignoring infinite frame delta");
            }
            0.0
        };
        let total = delta + self.leftover;

        let mut leftover = total.rem_euclid(self.step);
        if leftover >= self.step {
            leftover = 0.0;
        }
        // Saturating float-to-int cast
        let mut steps = ((total - leftover) / self.step).round() as u32;

        let mut dropped = 0;
        if let Some(max) = self.max_steps
            && steps > max
        {
            dropped = steps - max;
            steps = max;
            log::warn!(
                "Frame needed {} steps, capped at {} ({} dropped)",
                steps.saturating_add(dropped),
                max,
                dropped
            );
        }

        self.leftover = leftover;
        FrameSteps {
            steps,
            dropped,
            leftover,
        }
    }

    /// Consume the time since the previous call (`now` in seconds).
    ///
    /// The first call only records the timestamp.
    pub fn frame(&mut self, now: f64) -> FrameSteps {
        let delta = match self.previous {
            Some(previous) => now - previous,
            None => 0.0,
        };
        self.previous = Some(now);
        self.advance(delta)
    }

    /// Advance by `delta` and call `step_fn(dt)` once per fixed step
    pub fn run<F: FnMut(f32)>(&mut self, delta: f64, mut step_fn: F) -> FrameSteps {
        let frame = self.advance(delta);
        let dt = self.step as f32;
        for _ in 0..frame.steps {
            step_fn(dt);
        }
        frame
    }
}
