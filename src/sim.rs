//! The fixed-timestep simulation step.

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::grid::{Food, FoodKind, GameState, Position, Snake};

/// Why a session ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TerminationCause {
    Wall,
    SelfCollision,
    /// The snake covers every cell; nowhere left to put food.
    BoardFilled,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Head advanced, tail followed.
    Moved,
    /// Head advanced onto the food; the snake grew by one.
    Ate,
    /// Velocity is zero, nothing moved.
    Idle,
    Terminated(TerminationCause),
}

impl StepOutcome {
    pub fn is_terminal(self) -> bool {
        matches!(self, StepOutcome::Terminated(_))
    }
}

/// Advances `state` by exactly one tick.
pub fn step<R: Rng>(state: &mut GameState, rng: &mut R) -> StepOutcome {
    if state.velocity.is_still() {
        return StepOutcome::Idle;
    }

    let candidate = state.snake.head().offset(state.velocity);

    if !candidate.in_bounds(state.tile_count) {
        return StepOutcome::Terminated(TerminationCause::Wall);
    }
    // The tail has not moved yet, so it still counts.
    if state.snake.occupies(candidate) {
        return StepOutcome::Terminated(TerminationCause::SelfCollision);
    }

    state.snake.push_head(candidate);

    if candidate != state.food.position {
        state.snake.drop_tail();
        return StepOutcome::Moved;
    }

    state.score += 1;
    match place_food(state.tile_count, &state.snake, rng) {
        Some(food) => {
            debug!("score {} -> food {:?} at {:?}", state.score, food.kind, food.position);
            state.food = food;
            StepOutcome::Ate
        }
        None => StepOutcome::Terminated(TerminationCause::BoardFilled),
    }
}

/// Picks a uniformly random cell not covered by `snake`.
///
/// Below half occupancy this rejects and resamples; above it the free
/// cells are listed and one is chosen directly. Returns `None` when the
/// snake covers the whole grid.
pub fn place_food<R: Rng>(tile_count: i32, snake: &Snake, rng: &mut R) -> Option<Food> {
    let area = (tile_count.max(0) as usize).pow(2);
    let position = if snake.len() * 2 < area {
        loop {
            let cell = Position::new(rng.gen_range(0..tile_count), rng.gen_range(0..tile_count));
            if !snake.occupies(cell) {
                break cell;
            }
        }
    } else {
        let free: Vec<Position> = (0..tile_count)
            .flat_map(|y| (0..tile_count).map(move |x| Position::new(x, y)))
            .filter(|cell| !snake.occupies(*cell))
            .collect();
        *free.choose(rng)?
    };
    let kind = *FoodKind::ALL.choose(rng)?;
    Some(Food { position, kind })
}
