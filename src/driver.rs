//! Display-rate driver that gates fixed-interval simulation ticks and
//! blends the snake between its last two simulated poses.

use log::debug;
use macroquad::math::Vec2;
use rand::Rng;
use thiserror::Error;

use crate::direction::{Direction, DirectionControl};
use crate::grid::{GameState, Position, Snake};
use crate::pacing::SpeedPolicy;
use crate::sim::{self, StepOutcome};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame ticket belongs to a cancelled loop")]
    StaleTicket,
    #[error("driver is idle")]
    NotRunning,
}

/// Handle for the frame loop currently allowed to drive the simulation.
/// Every start or resume issues a new ticket and voids the old ones.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameTicket {
    generation: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
}

/// Last tick time and the interval ticks are gated on, in milliseconds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SimulationClock {
    pub last_tick_ms: f64,
    pub interval_ms: f64,
}

impl SimulationClock {
    /// Fraction of the current tick already elapsed, in [0, 1].
    pub fn alpha(&self, elapsed_ms: f64) -> f32 {
        if self.interval_ms <= 0.0 {
            return 1.0;
        }
        (elapsed_ms / self.interval_ms).clamp(0.0, 1.0) as f32
    }
}

/// What a single display frame produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub alpha: f32,
    /// Set when this frame ran a simulation tick.
    pub outcome: Option<StepOutcome>,
}

pub struct FrameDriver {
    state: GameState,
    previous: Vec<Position>,
    control: DirectionControl,
    clock: SimulationClock,
    base_interval_ms: f64,
    policy: SpeedPolicy,
    status: DriverState,
    generation: u64,
    alpha: f32,
}

impl FrameDriver {
    pub fn new(state: GameState, base_interval_ms: f64, policy: SpeedPolicy) -> Self {
        let previous = state.snake.segments().to_vec();
        Self {
            state,
            previous,
            control: DirectionControl::new(),
            clock: SimulationClock { last_tick_ms: 0.0, interval_ms: base_interval_ms },
            base_interval_ms,
            policy,
            status: DriverState::Idle,
            generation: 0,
            alpha: 1.0,
        }
    }

    /// Installs a fresh game and enters the running state.
    pub fn start(&mut self, state: GameState, base_interval_ms: f64, now_ms: f64) -> FrameTicket {
        self.state = state;
        self.base_interval_ms = base_interval_ms;
        self.control.clear();
        self.enter_running(now_ms)
    }

    /// Re-enters the running state with the current game, e.g. after a pause.
    pub fn resume(&mut self, now_ms: f64) -> FrameTicket {
        self.enter_running(now_ms)
    }

    /// Goes idle and voids the outstanding ticket.
    pub fn stop(&mut self) {
        self.status = DriverState::Idle;
        self.generation += 1;
    }

    fn enter_running(&mut self, now_ms: f64) -> FrameTicket {
        self.previous = self.state.snake.segments().to_vec();
        self.clock = SimulationClock { last_tick_ms: now_ms, interval_ms: self.current_interval_ms() };
        self.alpha = 0.0;
        self.status = DriverState::Running;
        self.generation += 1;
        FrameTicket { generation: self.generation }
    }

    /// Runs one display frame. Ticks the simulation when a full interval
    /// has passed since the last tick, then updates the blend factor.
    pub fn frame<R: Rng>(
        &mut self,
        ticket: FrameTicket,
        now_ms: f64,
        rng: &mut R,
    ) -> Result<FrameReport, FrameError> {
        if ticket.generation != self.generation {
            return Err(FrameError::StaleTicket);
        }
        if self.status != DriverState::Running {
            return Err(FrameError::NotRunning);
        }

        let elapsed = now_ms - self.clock.last_tick_ms;
        let alpha = self.clock.alpha(elapsed);
        let mut outcome = None;

        if elapsed >= self.clock.interval_ms {
            self.clock.last_tick_ms = now_ms - elapsed % self.clock.interval_ms;
            self.previous = self.state.snake.segments().to_vec();
            self.state.velocity = self.control.apply(self.state.velocity);

            let result = sim::step(&mut self.state, rng);
            debug!("tick at {now_ms:.1}ms: {result:?}");
            if result.is_terminal() {
                self.stop();
            } else {
                self.clock.interval_ms = self.current_interval_ms();
            }
            outcome = Some(result);
        }

        self.alpha = alpha;
        Ok(FrameReport { alpha, outcome })
    }

    /// Buffers a turn for the next tick. Returns whether it was accepted.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        self.control.request(direction, self.state.velocity)
    }

    /// Snake segment positions blended with the last frame's alpha.
    pub fn pose(&self) -> Vec<Vec2> {
        blend(&self.previous, &self.state.snake, self.alpha)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> DriverState {
        self.status
    }

    pub fn clock(&self) -> SimulationClock {
        self.clock
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    fn current_interval_ms(&self) -> f64 {
        self.policy.tick_interval_ms(self.base_interval_ms, self.state.score)
    }
}

fn lerp(from: Position, to: Position, alpha: f32) -> Vec2 {
    let from = Vec2::new(from.x as f32, from.y as f32);
    let to = Vec2::new(to.x as f32, to.y as f32);
    from + (to - from) * alpha
}

/// Grid-space position of every segment of `current`, blended from the
/// same index in `previous`. Segments with no previous entry (new growth)
/// stay at their current cell.
pub fn blend(previous: &[Position], current: &Snake, alpha: f32) -> Vec<Vec2> {
    current
        .segments()
        .iter()
        .enumerate()
        .map(|(i, &cell)| lerp(previous.get(i).copied().unwrap_or(cell), cell, alpha))
        .collect()
}
