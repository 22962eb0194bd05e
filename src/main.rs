use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use log::{error, info, warn, LevelFilter};
use macroquad::prelude::*;
use ::rand::SeedableRng;
use ::rand::rngs::StdRng;
use simplelog::{Config, WriteLogger};

use smooth_snake::config::CONFIG_FILE;
use smooth_snake::input::{self, Command, SwipeTracker};
use smooth_snake::render::{self, BODY_RED, HUD_TEXT};
use smooth_snake::{
    Difficulty, GameConfig, JsonFileStore, MemoryStore, Phase, ScoreStore, Scoreboard, Session,
    TerminationCause,
};

const LOG_FILE: &str = "snake.log";
const HUD_HEIGHT: f32 = 32.0;

const TITLE_COLOR: Color = Color::new(0.64, 1.0, 0.64, 1.0);
const DIM: Color = Color::new(0.08, 0.4, 0.08, 1.0);

struct LobbyState {
    selected: usize,
}

impl LobbyState {
    const ITEMS: usize = Difficulty::ALL.len() + 1;

    fn new(difficulty: Difficulty) -> Self {
        let selected = Difficulty::ALL.iter().position(|d| *d == difficulty).unwrap_or(1);
        Self { selected }
    }
}

enum Screen {
    Lobby(LobbyState),
    Game,
}

fn load_config() -> (GameConfig, Option<String>) {
    match GameConfig::load(Path::new(CONFIG_FILE)) {
        Ok(config) => (config, None),
        Err(e) => (GameConfig::default(), Some(e.to_string())),
    }
}

fn init_logging(level: LevelFilter) {
    match File::create(LOG_FILE) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(level, Config::default(), file) {
                eprintln!("logging disabled: {e}");
            }
        }
        Err(e) => eprintln!("logging disabled, cannot create {LOG_FILE}: {e}"),
    }
}

fn open_scoreboard(config: &GameConfig) -> Scoreboard {
    let store: Box<dyn ScoreStore> = if config.score_file.as_os_str().is_empty() {
        Box::new(MemoryStore::default())
    } else {
        Box::new(JsonFileStore::new(&config.score_file))
    };
    Scoreboard::open(store)
}

fn draw_centered(text: &str, y: f32, size: u16, color: Color) {
    let m = measure_text(text, None, size, 1.0);
    draw_text(text, (screen_width() - m.width) * 0.5, y, size as f32, color);
}

fn cause_text(cause: TerminationCause) -> &'static str {
    match cause {
        TerminationCause::Wall => "You hit the wall",
        TerminationCause::SelfCollision => "You bit yourself",
        TerminationCause::BoardFilled => "Board cleared!",
    }
}

fn now_ms() -> f64 {
    get_time() * 1000.0
}

fn window_conf() -> Conf {
    let (config, _) = load_config();
    let side = config.board_pixels() as i32;
    Conf {
        window_title: "Smooth Snake".to_owned(),
        window_width: side,
        window_height: side + HUD_HEIGHT as i32,
        window_resizable: false,
        high_dpi: true,
        ..Default::default()
    }
}

/// Feeds this frame's keys and swipe gestures to the session.
/// Touch arrives as mouse events through macroquad's touch emulation.
fn handle_game_input(session: &mut Session, swipe: &mut SwipeTracker) {
    let now = now_ms();
    for key in get_keys_pressed() {
        match input::command_for_key(key) {
            Some(Command::Turn(direction)) => {
                session.request_direction(direction);
            }
            Some(Command::TogglePause) => session.toggle_pause(now),
            None => {}
        }
    }

    let min_distance = session.config().swipe_min_distance;
    if is_mouse_button_pressed(MouseButton::Left) {
        swipe.press(mouse_position().into());
    }
    if is_mouse_button_released(MouseButton::Left) {
        if let Some(direction) = swipe.release(mouse_position().into(), min_distance) {
            session.request_direction(direction);
        }
    }
}

fn draw_lobby(lobby: &LobbyState, session: &Session) {
    let sh = screen_height();
    let mut y = sh * 0.25;
    draw_centered("SNAKE", y, 40, TITLE_COLOR);
    y += 56.0;

    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        let color = if lobby.selected == i { WHITE } else { GRAY };
        let line = format!("{} ({} ms)", difficulty.label(), difficulty.tick_interval_ms());
        draw_centered(&line, y, 22, color);
        y += 28.0;
    }
    let quit_color = if lobby.selected == LobbyState::ITEMS - 1 { WHITE } else { GRAY };
    draw_centered("Quit", y, 22, quit_color);
    y += 40.0;

    draw_centered("Up/Down: choose   Enter: start", y, 18, DIM);

    let scores = session.scores();
    draw_centered(&format!("Best: {}   Last: {}", scores.best_score, scores.last_score), sh - 40.0, 20, TITLE_COLOR);
}

fn draw_overlay(title: &str, lines: &[&str]) {
    draw_rectangle(0.0, 0.0, screen_width(), screen_height(), Color::new(0.0, 0.0, 0.0, 0.4));
    let sh = screen_height();
    let mut y = sh * 0.4;
    draw_centered(title, y, 36, BODY_RED);
    y += 44.0;
    for line in lines {
        draw_centered(line, y, 22, HUD_TEXT);
        y += 28.0;
    }
}

async fn run() -> Result<()> {
    let (config, config_problem) = load_config();
    init_logging(config.level_filter());
    if let Some(problem) = config_problem {
        warn!("{problem}; using default settings");
    }

    // An optional level name on the command line overrides the configured one.
    let difficulty = std::env::args()
        .nth(1)
        .map(|name| Difficulty::from_name(&name))
        .unwrap_or(config.difficulty);

    let scoreboard = open_scoreboard(&config);
    let mut session = Session::new(config, scoreboard, StdRng::from_entropy()).context("setting up the session")?;
    let mut screen = Screen::Lobby(LobbyState::new(difficulty));
    let mut swipe = SwipeTracker::new();
    let board_origin = vec2(0.0, HUD_HEIGHT);
    info!("ready");

    loop {
        if is_key_pressed(KeyCode::Q) {
            break;
        }

        clear_background(BLACK);
        let mut next_screen: Option<Screen> = None;
        match &mut screen {
            Screen::Lobby(lobby) => {
                draw_lobby(lobby, &session);

                if is_key_pressed(KeyCode::Up) {
                    lobby.selected = if lobby.selected == 0 { LobbyState::ITEMS - 1 } else { lobby.selected - 1 };
                }
                if is_key_pressed(KeyCode::Down) {
                    lobby.selected = (lobby.selected + 1) % LobbyState::ITEMS;
                }
                if is_key_pressed(KeyCode::Enter) {
                    match Difficulty::ALL.get(lobby.selected) {
                        Some(&difficulty) => {
                            session.start(difficulty, now_ms()).context("starting a game")?;
                            swipe.cancel();
                            next_screen = Some(Screen::Game);
                        }
                        None => break,
                    }
                }
            }

            Screen::Game => {
                match session.phase() {
                    Phase::Running | Phase::Paused => {
                        handle_game_input(&mut session, &mut swipe);
                        session.frame(now_ms());
                    }
                    Phase::GameOver { .. } => {
                        if is_key_pressed(KeyCode::R) {
                            session.restart(now_ms()).context("restarting")?;
                            swipe.cancel();
                        }
                        if is_key_pressed(KeyCode::Enter) {
                            next_screen = Some(Screen::Lobby(LobbyState::new(session.difficulty())));
                        }
                    }
                    Phase::Ready => {
                        next_screen = Some(Screen::Lobby(LobbyState::new(session.difficulty())));
                    }
                }

                render::paint(&session.scene(now_ms()), board_origin);
                render::paint(&session.hud(), Vec2::ZERO);

                match session.phase() {
                    Phase::Paused => draw_overlay("PAUSED", &["Space/Esc: resume", "Q: quit"]),
                    Phase::GameOver { score, cause } => {
                        let final_score = format!("Your Score: {score}");
                        draw_overlay(
                            "GAME OVER",
                            &[cause_text(cause), final_score.as_str(), "R: Restart  Enter: Lobby  Q: Quit"],
                        );
                    }
                    _ => {}
                }
            }
        }

        if let Some(next) = next_screen {
            screen = next;
        }

        next_frame().await;
    }

    info!("bye");
    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    if let Err(e) = run().await {
        error!("{e:#}");
        eprintln!("smooth_snake: {e:#}");
    }
}
