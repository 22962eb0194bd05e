//! Session controller: start, restart, pause and game-over bookkeeping.

use log::{debug, info};
use rand::Rng;
use rand::rngs::StdRng;

use crate::config::{ConfigError, GameConfig};
use crate::direction::Direction;
use crate::driver::{FrameDriver, FrameTicket};
use crate::grid::{GameState, Position, Snake, Velocity};
use crate::pacing::Difficulty;
use crate::render::{self, DrawCommand};
use crate::sim::{self, StepOutcome, TerminationCause};
use crate::store::{Scoreboard, Scores};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first start.
    Ready,
    Running,
    Paused,
    GameOver { score: u32, cause: TerminationCause },
}

pub struct Session {
    config: GameConfig,
    difficulty: Difficulty,
    driver: FrameDriver,
    ticket: Option<FrameTicket>,
    scoreboard: Scoreboard,
    rng: StdRng,
    phase: Phase,
}

/// A centred snake heading right, with food somewhere off its body.
pub fn fresh_state<R: Rng>(config: &GameConfig, rng: &mut R) -> Result<GameState, ConfigError> {
    let center = config.tile_count / 2;
    let snake = Snake::straight(Position::new(center, center), Direction::Right, config.initial_length);
    let food = sim::place_food(config.tile_count, &snake, rng)
        .ok_or_else(|| ConfigError::Invalid("no room for food on the board".to_string()))?;
    Ok(GameState::new(config.tile_count, snake, Velocity::from(Direction::Right), food))
}

impl Session {
    pub fn new(config: GameConfig, scoreboard: Scoreboard, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = fresh_state(&config, &mut rng)?;
        let difficulty = config.difficulty;
        let driver = FrameDriver::new(state, difficulty.tick_interval_ms(), config.speed_policy);
        Ok(Self { config, difficulty, driver, ticket: None, scoreboard, rng, phase: Phase::Ready })
    }

    /// Builds a new board at `difficulty` and starts the frame loop.
    pub fn start(&mut self, difficulty: Difficulty, now_ms: f64) -> Result<(), ConfigError> {
        let state = fresh_state(&self.config, &mut self.rng)?;
        self.difficulty = difficulty;
        self.ticket = Some(self.driver.start(state, difficulty.tick_interval_ms(), now_ms));
        self.phase = Phase::Running;
        info!("session started: {} ({} ms/tick)", difficulty.label(), difficulty.tick_interval_ms());
        Ok(())
    }

    /// Starts over at the difficulty of the last session.
    pub fn restart(&mut self, now_ms: f64) -> Result<(), ConfigError> {
        self.start(self.difficulty, now_ms)
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.driver.stop();
            self.ticket = None;
            self.phase = Phase::Paused;
            debug!("paused at score {}", self.driver.state().score);
        }
    }

    pub fn resume(&mut self, now_ms: f64) {
        if self.phase == Phase::Paused {
            self.ticket = Some(self.driver.resume(now_ms));
            self.phase = Phase::Running;
        }
    }

    pub fn toggle_pause(&mut self, now_ms: f64) {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(now_ms),
            _ => {}
        }
    }

    /// Forwards a turn to the driver; ignored unless running.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        self.phase == Phase::Running && self.driver.request_direction(direction)
    }

    /// Display-frame entry point. Returns the tick outcome when one ran.
    pub fn frame(&mut self, now_ms: f64) -> Option<StepOutcome> {
        let ticket = self.ticket?;
        match self.driver.frame(ticket, now_ms, &mut self.rng) {
            Ok(report) => {
                if let Some(StepOutcome::Terminated(cause)) = report.outcome {
                    self.finish(cause);
                }
                report.outcome
            }
            Err(e) => {
                debug!("dropping frame: {e}");
                self.ticket = None;
                None
            }
        }
    }

    fn finish(&mut self, cause: TerminationCause) {
        let score = self.driver.state().score;
        self.ticket = None;
        let scores = self.scoreboard.record(score);
        self.phase = Phase::GameOver { score, cause };
        info!(
            "game over ({cause:?}): score {score}, best {}, last {}",
            scores.best_score, scores.last_score
        );
    }

    /// Board, food and interpolated snake for the current frame.
    /// Draw list for the current frame. Food that the snake has grown over
    /// (a filled board) is left out.
    pub fn scene(&self, time_ms: f64) -> Vec<DrawCommand> {
        let state = self.driver.state();
        let food = Some(&state.food).filter(|food| !state.snake.occupies(food.position));
        render::compose(
            &self.driver.pose(),
            food,
            state.tile_count,
            self.config.grid_pixel_size as f32,
            time_ms,
        )
    }

    pub fn hud(&self) -> Vec<DrawCommand> {
        let scores = self.scoreboard.scores();
        render::hud(self.driver.state().score, scores.best_score, scores.last_score)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn state(&self) -> &GameState {
        self.driver.state()
    }

    pub fn scores(&self) -> Scores {
        self.scoreboard.scores()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Food, FoodKind};
    use crate::store::{ScoreStore, StoreError};
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Store whose contents stay observable after the session takes it.
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<Scores>>);

    impl ScoreStore for SharedStore {
        fn load(&mut self) -> Result<Scores, StoreError> {
            Ok(*self.0.borrow())
        }

        fn save(&mut self, scores: &Scores) -> Result<(), StoreError> {
            *self.0.borrow_mut() = *scores;
            Ok(())
        }
    }

    fn session_with(store: SharedStore) -> Session {
        let board = Scoreboard::open(Box::new(store));
        Session::new(GameConfig::default(), board, StdRng::seed_from_u64(42)).unwrap()
    }

    /// Installs a board whose next tick runs into the right-hand wall.
    fn doomed_game(session: &mut Session, score: u32, now_ms: f64) {
        let snake = Snake::straight(Position::new(29, 3), Direction::Right, 4);
        let food = Food { position: Position::new(0, 0), kind: FoodKind::Mango };
        let mut state = GameState::new(30, snake, Velocity::from(Direction::Right), food);
        state.score = score;
        session.ticket = Some(session.driver.start(state, 120.0, now_ms));
        session.phase = Phase::Running;
    }

    #[test]
    fn test_start_builds_centred_board() {
        let mut session = session_with(SharedStore::default());
        assert_eq!(session.phase(), Phase::Ready);
        session.start(Difficulty::Hard, 0.0).unwrap();

        let state = session.state();
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.snake.head(), Position::new(15, 15));
        assert_eq!(state.velocity, Velocity { dx: 1, dy: 0 });
        assert!(!state.snake.occupies(state.food.position));
        assert_eq!(session.driver.clock().interval_ms, 80.0);
    }

    #[test]
    fn test_no_frames_before_start() {
        let mut session = session_with(SharedStore::default());
        assert_eq!(session.frame(10_000.0), None);
        assert_eq!(session.state().snake.head(), Position::new(15, 15));
    }

    #[test]
    fn test_game_over_persists_new_best() {
        let store = SharedStore(Rc::new(RefCell::new(Scores { best_score: 5, last_score: 1 })));
        let mut session = session_with(store.clone());
        doomed_game(&mut session, 7, 0.0);

        let outcome = session.frame(120.0);
        assert_eq!(outcome, Some(StepOutcome::Terminated(TerminationCause::Wall)));
        assert_eq!(session.phase(), Phase::GameOver { score: 7, cause: TerminationCause::Wall });
        assert_eq!(*store.0.borrow(), Scores { best_score: 7, last_score: 7 });
    }

    #[test]
    fn test_game_over_keeps_higher_best() {
        let store = SharedStore(Rc::new(RefCell::new(Scores { best_score: 20, last_score: 11 })));
        let mut session = session_with(store.clone());
        doomed_game(&mut session, 3, 0.0);

        session.frame(500.0);
        assert_eq!(*store.0.borrow(), Scores { best_score: 20, last_score: 3 });
        // The loop is dead: later frames do nothing.
        assert_eq!(session.frame(1000.0), None);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut session = session_with(SharedStore::default());
        session.start(Difficulty::Easy, 0.0).unwrap();
        doomed_game(&mut session, 2, 100.0);
        session.frame(300.0);
        assert!(matches!(session.phase(), Phase::GameOver { .. }));

        session.restart(400.0).unwrap();
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.difficulty(), Difficulty::Easy);
        assert_eq!(session.state().score, 0);
        assert_eq!(session.frame(579.0), None);
        assert!(matches!(session.frame(580.0), Some(StepOutcome::Moved | StepOutcome::Ate)));
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let mut session = session_with(SharedStore::default());
        session.start(Difficulty::Medium, 0.0).unwrap();
        session.pause();
        assert_eq!(session.phase(), Phase::Paused);
        assert_eq!(session.frame(10_000.0), None);
        assert!(!session.request_direction(Direction::Up));

        session.toggle_pause(20_000.0);
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.frame(20_060.0), None);
        assert!(matches!(session.frame(20_120.0), Some(StepOutcome::Moved | StepOutcome::Ate)));
        assert_eq!(session.state().snake.head(), Position::new(16, 15));
    }

    #[test]
    fn test_turn_requests_reach_the_snake() {
        let mut session = session_with(SharedStore::default());
        session.start(Difficulty::Medium, 0.0).unwrap();
        assert!(session.request_direction(Direction::Up));
        session.frame(120.0);
        assert_eq!(session.state().snake.head(), Position::new(15, 14));
    }

    #[test]
    fn test_scene_draws_interpolated_head() {
        let mut session = session_with(SharedStore::default());
        session.start(Difficulty::Medium, 0.0).unwrap();
        session.frame(120.0);
        session.frame(180.0);

        // Halfway between (15,15) and (16,15) on a 20px grid.
        let head_center = macroquad::math::Vec2::new(15.5 * 20.0 + 10.0, 15.0 * 20.0 + 10.0);
        let commands = session.scene(0.0);
        assert!(commands.iter().any(|c| matches!(
            c,
            DrawCommand::Circle { center, radius, .. } if *center == head_center && *radius == 20.0 / 1.5
        )));
    }

    #[test]
    fn test_filled_board_scene_has_no_food() {
        let mut session = session_with(SharedStore::default());
        // 2x2 board with one free cell, holding the food, right ahead.
        let snake = Snake::from_segments(vec![
            Position::new(0, 1),
            Position::new(0, 0),
            Position::new(1, 0),
        ]);
        let food = Food { position: Position::new(1, 1), kind: FoodKind::Peach };
        let state = GameState::new(2, snake, Velocity::from(Direction::Right), food);
        session.ticket = Some(session.driver.start(state, 120.0, 0.0));
        session.phase = Phase::Running;

        assert_eq!(
            session.frame(120.0),
            Some(StepOutcome::Terminated(TerminationCause::BoardFilled))
        );
        assert!(session.state().snake.occupies(session.state().food.position));

        let commands = session.scene(0.0);
        let expected = render::compose(&session.driver.pose(), None, 2, 20.0, 0.0);
        assert_eq!(commands, expected);
        assert!(!commands.iter().any(|c| matches!(
            c,
            DrawCommand::Circle { color, .. } if *color == render::food_color(FoodKind::Peach)
        )));
    }
}
