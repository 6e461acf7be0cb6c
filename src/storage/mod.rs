pub mod highscore;

pub use highscore::{
    FileScoreStore, HighScoreReport, MemoryScoreStore, ScoreStore, ScoreStoreError, submit_score,
};
