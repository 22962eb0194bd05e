//! Difficulty levels and the tick interval they resolve to.

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Milliseconds per tick; lower is faster.
    pub fn tick_interval_ms(self) -> f64 {
        match self {
            Difficulty::Easy => 180.0,
            Difficulty::Medium => 120.0,
            Difficulty::Hard => 80.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Parses a level name; anything unrecognised falls back to medium.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

/// How the tick interval evolves during a session.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SpeedPolicy {
    /// The difficulty's interval for the whole session.
    #[default]
    Fixed,
    /// Shave `step_ms` off the interval for every `every` points scored,
    /// never going below `floor_ms`.
    #[serde(rename_all = "camelCase")]
    Escalating { every: u32, step_ms: f64, floor_ms: f64 },
}

impl SpeedPolicy {
    pub fn tick_interval_ms(&self, base_ms: f64, score: u32) -> f64 {
        match *self {
            SpeedPolicy::Fixed => base_ms,
            SpeedPolicy::Escalating { every, step_ms, floor_ms } => {
                if every == 0 {
                    return base_ms;
                }
                let steps = (score / every) as f64;
                (base_ms - steps * step_ms).max(floor_ms.min(base_ms))
            }
        }
    }
}
