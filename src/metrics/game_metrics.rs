use std::time::{Duration, Instant};

use crate::game::GameOverReport;

/// Running totals for this process, shown on the status line
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub longest_snake: usize,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_score: 0,
            longest_snake: 0,
            games_played: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, report: &GameOverReport) {
        self.update();
        self.games_played += 1;
        self.best_score = self.best_score.max(report.high_score.score);
        self.longest_snake = self.longest_snake.max(report.length);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }

    /// One-line summary for the status bar
    pub fn status_line(&self, score: u32) -> String {
        format!(
            "Score: {}   Time: {}   Games: {}   Best: {}",
            score,
            self.format_time(),
            self.games_played,
            self.best_score
        )
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameEnd;
    use crate::storage::HighScoreReport;

    fn report(score: u32, length: usize) -> GameOverReport {
        GameOverReport {
            end: GameEnd::Collision,
            length,
            high_score: HighScoreReport {
                score,
                previous_best: 0,
                new_record: score > 0,
            },
        }
    }

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_best_score_tracking() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(&report(10, 12));
        metrics.on_game_over(&report(5, 7));
        assert_eq!(metrics.best_score, 10);
        assert_eq!(metrics.longest_snake, 12);
        assert_eq!(metrics.games_played, 2);

        metrics.on_game_over(&report(15, 17));
        assert_eq!(metrics.best_score, 15);
        assert_eq!(metrics.games_played, 3);
    }

    #[test]
    fn test_status_line() {
        let mut metrics = GameMetrics::new();
        metrics.on_game_over(&report(4, 6));
        metrics.elapsed_time = Duration::from_secs(9);
        assert_eq!(
            metrics.status_line(2),
            "Score: 2   Time: 00:09   Games: 1   Best: 4"
        );
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update();
        assert!(metrics.elapsed_time.as_millis() >= 50);

        metrics.on_game_start();
        metrics.update();
        assert!(metrics.elapsed_time.as_millis() < 50);
    }
}
