//! Snake with a fixed-rate simulation and display-rate interpolated drawing.
//!
//! The simulation advances one cell per tick; the [`driver`] decides on each
//! display frame whether a tick is due and blends the snake between its last
//! two simulated poses. [`session`] wraps that in start/restart/pause and
//! score bookkeeping. Nothing here owns a window: [`render`] produces draw
//! commands that the binary executes.

pub mod config;
pub mod direction;
pub mod driver;
pub mod grid;
pub mod input;
pub mod pacing;
pub mod render;
pub mod session;
pub mod sim;
pub mod store;

pub use config::{ConfigError, GameConfig};
pub use direction::{Direction, DirectionControl};
pub use driver::{FrameDriver, FrameError, FrameTicket};
pub use grid::{Food, FoodKind, GameState, Position, Snake, Velocity};
pub use pacing::{Difficulty, SpeedPolicy};
pub use session::{Phase, Session};
pub use sim::{StepOutcome, TerminationCause};
pub use store::{JsonFileStore, MemoryStore, ScoreStore, Scoreboard, Scores, StoreError};
