//! Keyboard and swipe classification.

use macroquad::prelude::{KeyCode, Vec2};

use crate::direction::Direction;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    TogglePause,
}

/// Maps a pressed key to a game command; other keys are ignored.
pub fn command_for_key(key: KeyCode) -> Option<Command> {
    let command = match key {
        KeyCode::Up | KeyCode::W => Command::Turn(Direction::Up),
        KeyCode::Down | KeyCode::S => Command::Turn(Direction::Down),
        KeyCode::Left | KeyCode::A => Command::Turn(Direction::Left),
        KeyCode::Right | KeyCode::D => Command::Turn(Direction::Right),
        KeyCode::Space | KeyCode::Escape => Command::TogglePause,
        _ => return None,
    };
    Some(command)
}

/// Classifies a drag from `start` to `end` (screen coordinates, y down)
/// by its dominant axis. Drags shorter than `min_distance` are ignored.
pub fn classify_swipe(start: Vec2, end: Vec2, min_distance: f32) -> Option<Direction> {
    let delta = end - start;
    let (ax, ay) = (delta.x.abs(), delta.y.abs());
    if ax.max(ay) < min_distance {
        return None;
    }
    let direction = if ax > ay {
        if delta.x > 0.0 { Direction::Right } else { Direction::Left }
    } else if delta.y > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(direction)
}

/// Tracks one touch from press to release.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    origin: Option<Vec2>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, at: Vec2) {
        self.origin = Some(at);
    }

    pub fn release(&mut self, at: Vec2, min_distance: f32) -> Option<Direction> {
        let origin = self.origin.take()?;
        classify_swipe(origin, at, min_distance)
    }

    pub fn cancel(&mut self) {
        self.origin = None;
    }
}
