//! Grid model: the lattice, the snake, and the food on it.

use crate::direction::Direction;

/// A cell on the game grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, velocity: Velocity) -> Self {
        Self { x: self.x + velocity.dx, y: self.y + velocity.dy }
    }

    pub fn in_bounds(self, tile_count: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < tile_count && self.y < tile_count
    }
}

/// Cells moved per tick on each axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Velocity {
    pub dx: i32,
    pub dy: i32,
}

impl Velocity {
    pub const STILL: Velocity = Velocity { dx: 0, dy: 0 };

    pub fn is_still(self) -> bool {
        self == Self::STILL
    }

    pub fn negated(self) -> Self {
        Self { dx: -self.dx, dy: -self.dy }
    }
}

impl From<Direction> for Velocity {
    fn from(direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self { dx, dy }
    }
}

/// Snake body, head first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    segments: Vec<Position>,
}

impl Snake {
    /// Builds a straight snake whose head sits at `head` and whose body
    /// trails away from `heading`.
    pub fn straight(head: Position, heading: Direction, length: usize) -> Self {
        let back = Velocity::from(heading).negated();
        let mut segments = Vec::with_capacity(length.max(1));
        let mut cell = head;
        for _ in 0..length.max(1) {
            segments.push(cell);
            cell = cell.offset(back);
        }
        Self { segments }
    }

    #[cfg(test)]
    pub(crate) fn from_segments(segments: Vec<Position>) -> Self {
        debug_assert!(!segments.is_empty(), "a snake has at least a head");
        Self { segments }
    }

    pub fn head(&self) -> Position {
        self.segments[0]
    }

    pub fn segments(&self) -> &[Position] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn occupies(&self, cell: Position) -> bool {
        self.segments.contains(&cell)
    }

    pub(crate) fn push_head(&mut self, cell: Position) {
        self.segments.insert(0, cell);
    }

    pub(crate) fn drop_tail(&mut self) -> Option<Position> {
        self.segments.pop()
    }
}

/// Cosmetic tag carried by a piece of food.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FoodKind {
    Apple,
    Banana,
    Grapes,
    Cherries,
    Strawberry,
    Pineapple,
    Mango,
    Watermelon,
    Peach,
    Pear,
}

impl FoodKind {
    pub const ALL: [FoodKind; 10] = [
        FoodKind::Apple,
        FoodKind::Banana,
        FoodKind::Grapes,
        FoodKind::Cherries,
        FoodKind::Strawberry,
        FoodKind::Pineapple,
        FoodKind::Mango,
        FoodKind::Watermelon,
        FoodKind::Peach,
        FoodKind::Pear,
    ];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
    pub kind: FoodKind,
}

/// Everything the simulation step reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub tile_count: i32,
    pub snake: Snake,
    pub velocity: Velocity,
    pub food: Food,
    pub score: u32,
}

impl GameState {
    pub fn new(tile_count: i32, snake: Snake, velocity: Velocity, food: Food) -> Self {
        Self { tile_count, snake, velocity, food, score: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_snake_trails_behind_head() {
        let snake = Snake::straight(Position::new(15, 15), Direction::Right, 4);
        assert_eq!(
            snake.segments(),
            &[
                Position::new(15, 15),
                Position::new(14, 15),
                Position::new(13, 15),
                Position::new(12, 15),
            ]
        );
    }

    #[test]
    fn test_bounds() {
        assert!(Position::new(0, 0).in_bounds(30));
        assert!(Position::new(29, 29).in_bounds(30));
        assert!(!Position::new(-1, 3).in_bounds(30));
        assert!(!Position::new(3, 30).in_bounds(30));
    }
}
