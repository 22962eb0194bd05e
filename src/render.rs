//! Turns a blended snake pose into drawing instructions for the canvas.
//!
//! Composition is pure; `paint` is the only function that touches the
//! macroquad context.

use macroquad::prelude::*;

use crate::grid::{Food, FoodKind};

pub const BOARD: Color = Color::new(0.55, 0.76, 0.29, 1.0);
pub const BODY_RED: Color = Color::new(0.83, 0.18, 0.18, 1.0); // #D32F2F
pub const BODY_BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
pub const HEAD_GLOW: Color = Color::new(1.0, 0.32, 0.32, 1.0); // #ff5252
pub const TONGUE: Color = Color::new(1.0, 0.0, 0.0, 1.0);
pub const HUD_TEXT: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Tongue flicker half-period.
const TONGUE_PHASE_MS: f64 = 200.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect { rect: Rect, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Line { from: Vec2, to: Vec2, thickness: f32, color: Color },
    Text { text: String, at: Vec2, size: f32, color: Color },
}

pub fn food_color(kind: FoodKind) -> Color {
    match kind {
        FoodKind::Apple => Color::new(0.86, 0.1, 0.1, 1.0),
        FoodKind::Banana => Color::new(1.0, 0.88, 0.2, 1.0),
        FoodKind::Grapes => Color::new(0.5, 0.2, 0.6, 1.0),
        FoodKind::Cherries => Color::new(0.7, 0.0, 0.15, 1.0),
        FoodKind::Strawberry => Color::new(0.95, 0.25, 0.35, 1.0),
        FoodKind::Pineapple => Color::new(0.95, 0.75, 0.1, 1.0),
        FoodKind::Mango => Color::new(1.0, 0.6, 0.1, 1.0),
        FoodKind::Watermelon => Color::new(0.1, 0.55, 0.2, 1.0),
        FoodKind::Peach => Color::new(1.0, 0.7, 0.55, 1.0),
        FoodKind::Pear => Color::new(0.75, 0.85, 0.3, 1.0),
    }
}

/// Pixel centre of a (possibly fractional) grid coordinate.
pub fn pixel_center(cell: Vec2, tile: f32) -> Vec2 {
    cell * tile + Vec2::splat(tile / 2.0)
}

pub fn tongue_visible(time_ms: f64) -> bool {
    (time_ms / TONGUE_PHASE_MS).floor() as i64 % 2 == 0
}

/// Board, food (if any), body, then head on top.
pub fn compose(
    pose: &[Vec2],
    food: Option<&Food>,
    tile_count: i32,
    tile: f32,
    time_ms: f64,
) -> Vec<DrawCommand> {
    let side = tile_count as f32 * tile;
    let mut commands = vec![DrawCommand::Rect { rect: Rect::new(0.0, 0.0, side, side), color: BOARD }];

    if let Some(food) = food {
        let food_cell = Vec2::new(food.position.x as f32, food.position.y as f32);
        commands.push(DrawCommand::Circle {
            center: pixel_center(food_cell, tile),
            radius: tile * 0.45,
            color: food_color(food.kind),
        });
    }

    // Each body segment is a thick stroke toward the segment ahead of it,
    // with a disc at the joint standing in for a round cap.
    for i in 1..pose.len() {
        let color = if i % 2 == 0 { BODY_RED } else { BODY_BLACK };
        let from = pixel_center(pose[i], tile);
        let to = pixel_center(pose[i - 1], tile);
        commands.push(DrawCommand::Circle { center: from, radius: tile / 2.0, color });
        commands.push(DrawCommand::Line { from, to, thickness: tile, color });
    }

    if let Some(&head) = pose.first() {
        push_head(&mut commands, pixel_center(head, tile), tile, time_ms);
    }
    commands
}

fn push_head(commands: &mut Vec<DrawCommand>, center: Vec2, tile: f32, time_ms: f64) {
    commands.push(DrawCommand::Circle { center, radius: tile / 1.5, color: BODY_BLACK });
    commands.push(DrawCommand::Circle { center, radius: tile / 2.6, color: HEAD_GLOW });

    for side in [-1.0, 1.0] {
        let eye = center + Vec2::new(side * tile / 5.0, -tile / 4.0);
        commands.push(DrawCommand::Circle { center: eye, radius: tile / 8.0, color: WHITE });
        commands.push(DrawCommand::Circle { center: eye, radius: tile / 16.0, color: BODY_BLACK });
    }

    if tongue_visible(time_ms) {
        commands.push(DrawCommand::Line {
            from: center + Vec2::new(0.0, tile / 3.0),
            to: center + Vec2::new(0.0, tile / 1.5),
            thickness: 2.5,
            color: TONGUE,
        });
    }
}

/// Score line shown above the board.
pub fn hud(score: u32, best: u32, last: u32) -> Vec<DrawCommand> {
    vec![DrawCommand::Text {
        text: format!("Score: {score}   Best: {best}   Last: {last}"),
        at: Vec2::new(8.0, 20.0),
        size: 22.0,
        color: HUD_TEXT,
    }]
}

/// Executes `commands` against the current macroquad frame.
pub fn paint(commands: &[DrawCommand], origin: Vec2) {
    for command in commands {
        match command {
            DrawCommand::Rect { rect, color } => {
                draw_rectangle(origin.x + rect.x, origin.y + rect.y, rect.w, rect.h, *color);
            }
            DrawCommand::Circle { center, radius, color } => {
                draw_circle(origin.x + center.x, origin.y + center.y, *radius, *color);
            }
            DrawCommand::Line { from, to, thickness, color } => {
                draw_line(
                    origin.x + from.x,
                    origin.y + from.y,
                    origin.x + to.x,
                    origin.y + to.y,
                    *thickness,
                    *color,
                );
            }
            DrawCommand::Text { text, at, size, color } => {
                draw_text(text, origin.x + at.x, origin.y + at.y, *size, *color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;

    fn apple_at(x: i32, y: i32) -> Food {
        Food { position: Position::new(x, y), kind: FoodKind::Apple }
    }

    #[test]
    fn test_pixel_center() {
        assert_eq!(pixel_center(Vec2::new(0.0, 0.0), 20.0), Vec2::new(10.0, 10.0));
        assert_eq!(pixel_center(Vec2::new(2.5, 1.0), 20.0), Vec2::new(60.0, 30.0));
    }

    #[test]
    fn test_tongue_flicker_phases() {
        assert!(tongue_visible(0.0));
        assert!(tongue_visible(199.0));
        assert!(!tongue_visible(200.0));
        assert!(tongue_visible(400.0));
    }

    #[test]
    fn test_compose_layers_board_food_body_head() {
        let pose = vec![Vec2::new(3.0, 3.0), Vec2::new(2.0, 3.0), Vec2::new(1.0, 3.0)];
        let commands = compose(&pose, Some(&apple_at(7, 7)), 10, 20.0, 0.0);

        assert!(matches!(commands[0], DrawCommand::Rect { .. }));
        assert_eq!(
            commands[1],
            DrawCommand::Circle { center: Vec2::new(150.0, 150.0), radius: 20.0 * 0.45, color: food_color(FoodKind::Apple) }
        );

        // Segment 1 strokes from its own centre to the head's, in black.
        assert_eq!(
            commands[3],
            DrawCommand::Line {
                from: Vec2::new(50.0, 70.0),
                to: Vec2::new(70.0, 70.0),
                thickness: 20.0,
                color: BODY_BLACK,
            }
        );
        // Segment 2 alternates to red.
        assert!(matches!(commands[5], DrawCommand::Line { color, .. } if color == BODY_RED));

        // Head outline comes after every body stroke; tongue is last.
        assert_eq!(
            commands[6],
            DrawCommand::Circle { center: Vec2::new(70.0, 70.0), radius: 20.0 / 1.5, color: BODY_BLACK }
        );
        assert!(matches!(commands.last(), Some(DrawCommand::Line { color, .. }) if *color == TONGUE));
    }

    #[test]
    fn test_compose_hides_tongue_off_phase() {
        let pose = vec![Vec2::new(3.0, 3.0)];
        let on = compose(&pose, Some(&apple_at(0, 0)), 10, 20.0, 0.0);
        let off = compose(&pose, Some(&apple_at(0, 0)), 10, 20.0, 250.0);
        assert_eq!(on.len(), off.len() + 1);
    }

    #[test]
    fn test_compose_without_food() {
        let pose = vec![Vec2::new(3.0, 3.0), Vec2::new(2.0, 3.0)];
        let with = compose(&pose, Some(&apple_at(7, 7)), 10, 20.0, 0.0);
        let without = compose(&pose, None, 10, 20.0, 0.0);
        assert_eq!(without.len(), with.len() - 1);
        assert_eq!(without[0], with[0]);
        assert_eq!(without[1..], with[2..]);
    }
}
