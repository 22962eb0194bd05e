//! Best/last score persistence.

use std::fs;
use std::io;
use std::path::PathBuf;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("score file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scores {
    pub best_score: u32,
    pub last_score: u32,
}

impl Scores {
    /// Folds a finished game in: last is always overwritten, best only grows.
    pub fn record(&mut self, score: u32) {
        self.last_score = score;
        if score > self.best_score {
            self.best_score = score;
        }
    }
}

pub trait ScoreStore {
    /// Reads the stored scores; an absent store reads as zeros.
    fn load(&mut self) -> Result<Scores, StoreError>;
    fn save(&mut self, scores: &Scores) -> Result<(), StoreError>;
}

/// Scores kept as a small JSON document on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<Scores, StoreError> {
        if !self.path.exists() {
            return Ok(Scores::default());
        }
        let text = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        serde_json::from_str(&text)
            .map_err(|source| StoreError::Json { path: self.path.clone(), source })
    }

    fn save(&mut self, scores: &Scores) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(scores)
            .map_err(|source| StoreError::Json { path: self.path.clone(), source })?;
        fs::write(&self.path, text).map_err(|e| self.io_error(e))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    scores: Scores,
}

impl MemoryStore {
    pub fn new(scores: Scores) -> Self {
        Self { scores }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Result<Scores, StoreError> {
        Ok(self.scores)
    }

    fn save(&mut self, scores: &Scores) -> Result<(), StoreError> {
        self.scores = *scores;
        Ok(())
    }
}

/// In-memory scores backed by a store when one is usable.
///
/// A store that fails to load or save is dropped and the board carries on
/// with in-memory values only.
pub struct Scoreboard {
    scores: Scores,
    store: Option<Box<dyn ScoreStore>>,
}

impl Scoreboard {
    pub fn open(mut store: Box<dyn ScoreStore>) -> Self {
        match store.load() {
            Ok(scores) => {
                info!("loaded scores: best {} last {}", scores.best_score, scores.last_score);
                Self { scores, store: Some(store) }
            }
            Err(e) => {
                warn!("score store unavailable, keeping scores in memory: {e}");
                Self { scores: Scores::default(), store: None }
            }
        }
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    /// Records a finished game and writes it through.
    pub fn record(&mut self, score: u32) -> Scores {
        self.scores.record(score);
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.save(&self.scores) {
                warn!("failed to persist scores, continuing in memory: {e}");
                self.store = None;
            }
        }
        self.scores
    }
}
