use crate::grid::Velocity;

/// Unit direction requested by the player.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Direction {
    /// Returns the delta (dx, dy), with y growing downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }

    /// Whether turning to `self` is allowed while moving at `velocity`:
    /// vertical turns need dy == 0, horizontal turns need dx == 0.
    pub fn allowed_from(self, velocity: Velocity) -> bool {
        match self.axis() {
            Axis::Vertical => velocity.dy == 0,
            Axis::Horizontal => velocity.dx == 0,
        }
    }
}

/// Buffers the latest accepted direction request until the next tick.
#[derive(Debug, Default, Clone)]
pub struct DirectionControl {
    pending: Option<Direction>,
}

impl DirectionControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `requested` if it leaves the current axis of travel.
    /// A later accepted request overwrites an earlier one.
    pub fn request(&mut self, requested: Direction, current: Velocity) -> bool {
        if !requested.allowed_from(current) {
            return false;
        }
        self.pending = Some(requested);
        true
    }

    /// Consumes the pending request and returns the velocity for this tick.
    /// The request is checked again against `current`, the velocity in
    /// effect at the start of the tick.
    pub fn apply(&mut self, current: Velocity) -> Velocity {
        match self.pending.take() {
            Some(direction) if direction.allowed_from(current) => Velocity::from(direction),
            _ => current,
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
