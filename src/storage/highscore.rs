//! High score persistence
//!
//! The score is kept as a single decimal integer in a text file. A missing or
//! empty file means nobody has scored yet.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ScoreStoreError {
    #[error("failed to access high score file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("high score file {path:?} does not hold a score: {contents:?}")]
    Corrupt { path: PathBuf, contents: String },
}

/// Durable storage for the best score
pub trait ScoreStore {
    /// The stored score, or 0 if none has been stored
    fn read_highscore(&mut self) -> Result<u32, ScoreStoreError>;

    fn write_highscore(&mut self, score: u32) -> Result<(), ScoreStoreError>;
}

/// High score kept in a text file
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Set the stored score back to 0
    pub fn reset(&mut self) -> Result<(), ScoreStoreError> {
        self.write_highscore(0)
    }

    fn io_error(&self, source: io::Error) -> ScoreStoreError {
        ScoreStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ScoreStore for FileScoreStore {
    fn read_highscore(&mut self) -> Result<u32, ScoreStoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(self.io_error(e)),
        };

        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed.parse().map_err(|_| ScoreStoreError::Corrupt {
            path: self.path.clone(),
            contents: trimmed.to_string(),
        })
    }

    fn write_highscore(&mut self, score: u32) -> Result<(), ScoreStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // Write beside the target and rename, so a crash never leaves half a number.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, score.to_string()).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

/// High score held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    value: Option<u32>,
    writes: usize,
}

impl MemoryScoreStore {
    pub fn with_score(score: u32) -> Self {
        Self {
            value: Some(score),
            writes: 0,
        }
    }

    pub fn value(&self) -> Option<u32> {
        self.value
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ScoreStore for MemoryScoreStore {
    fn read_highscore(&mut self) -> Result<u32, ScoreStoreError> {
        Ok(self.value.unwrap_or(0))
    }

    fn write_highscore(&mut self, score: u32) -> Result<(), ScoreStoreError> {
        self.value = Some(score);
        self.writes += 1;
        Ok(())
    }
}

/// Outcome of submitting a finished game's score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighScoreReport {
    pub score: u32,
    /// Best score before this game
    pub previous_best: u32,
    pub new_record: bool,
}

/// Compare `score` with the stored best and store it if strictly higher.
///
/// Storage failures never end the session: an unreadable store counts as a
/// best of 0 and a failed write is skipped. Both are logged.
pub fn submit_score<S: ScoreStore + ?Sized>(store: &mut S, score: u32) -> HighScoreReport {
    let previous_best = store.read_highscore().unwrap_or_else(|e| {
        warn!(error = %e, "high score unavailable, treating it as 0");
        0
    });

    let new_record = score > previous_best;
    if new_record {
        if let Err(e) = store.write_highscore(score) {
            warn!(error = %e, score, "failed to save high score");
        }
    }

    HighScoreReport {
        score,
        previous_best,
        new_record,
    }
}
