//! Simulation clock
//!
//! Decides how many fixed-size physics ticks each displayed frame runs.
//! Frames are stamped with host timestamps in milliseconds (the unit an
//! animation-frame callback hands out).

use serde::Deserialize;
use terrafall_physics::PhysicsBackend;
use tracing::warn;

/// Longest wall-clock gap, in seconds, a single frame may account for
///
/// Keeps a stalled host (debugger pause, hidden tab) from queueing up
/// seconds of catch-up simulation.
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// How frames map to physics ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepPolicy {
    /// Exactly one tick per frame, regardless of elapsed time
    ///
    /// Simulated time runs faster or slower than real time with the
    /// display refresh rate.
    #[default]
    FixedPerFrame,

    /// Ticks follow elapsed time through an accumulator
    ///
    /// At most `max_substeps` ticks run per frame; any backlog beyond that
    /// is discarded.
    Accumulated { max_substeps: u32 },
}

/// Converts frame timestamps into fixed physics ticks
#[derive(Debug, Clone)]
pub struct SimulationClock {
    policy: StepPolicy,
    timestep: f32,
    accumulator: f32,
    last_timestamp_ms: Option<f64>,
    ticks: u64,
}

impl SimulationClock {
    /// Create a clock ticking `timestep` seconds at a time
    pub fn new(policy: StepPolicy, timestep: f32) -> Self {
        Self {
            policy,
            timestep,
            accumulator: 0.0,
            last_timestamp_ms: None,
            ticks: 0,
        }
    }

    pub fn policy(&self) -> StepPolicy {
        self.policy
    }

    /// Tick length in seconds
    pub fn timestep(&self) -> f32 {
        self.timestep
    }

    /// Total ticks issued since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds since creation
    pub fn simulated_time(&self) -> f64 {
        self.ticks as f64 * self.timestep as f64
    }

    /// Register a frame at `timestamp_ms` and return how many ticks it runs
    ///
    /// The first frame has no predecessor and contributes no elapsed time.
    /// Timestamps that go backwards count as zero elapsed time.
    pub fn advance(&mut self, timestamp_ms: f64) -> u32 {
        let delta = match self.last_timestamp_ms {
            Some(previous) => ((timestamp_ms - previous).max(0.0) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_timestamp_ms = Some(timestamp_ms);

        let ticks = match self.policy {
            StepPolicy::FixedPerFrame => 1,
            StepPolicy::Accumulated { max_substeps } => {
                self.accumulate(delta.min(MAX_FRAME_DELTA), max_substeps)
            }
        };
        self.ticks += u64::from(ticks);
        ticks
    }

    fn accumulate(&mut self, delta: f32, max_substeps: u32) -> u32 {
        if self.timestep <= 0.0 {
            return 0;
        }

        self.accumulator += delta;
        let mut ticks = 0;
        while self.accumulator >= self.timestep && ticks < max_substeps {
            self.accumulator -= self.timestep;
            ticks += 1;
        }

        if self.accumulator >= self.timestep {
            let dropped = (self.accumulator / self.timestep) as u32;
            warn!(dropped, max_substeps, "Physics falling behind, dropping ticks");
            self.accumulator %= self.timestep;
        }
        ticks
    }

    /// Advance to `timestamp_ms` and run the resulting ticks on `physics`
    pub fn step<P>(&mut self, physics: &mut P, timestamp_ms: f64) -> u32
    where
        P: PhysicsBackend + ?Sized,
    {
        let ticks = self.advance(timestamp_ms);
        for _ in 0..ticks {
            physics.step(self.timestep);
        }
        ticks
    }
}
