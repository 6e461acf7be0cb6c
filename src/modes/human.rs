use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io::{Stderr, stderr};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use crate::game::{GameConfig, GameEngine, TickOutcome};
use crate::input::{InputHandler, JoystickLatch, KeyAction};
use crate::metrics::GameMetrics;
use crate::platform::{Clock, InputSource, MonotonicClock, Renderer};
use crate::render::TerminalDisplay;
use crate::storage::{FileScoreStore, ScoreStore};

type TerminalEngine = GameEngine<
    MonotonicClock,
    JoystickLatch,
    TerminalDisplay<CrosstermBackend<Stderr>>,
    FileScoreStore,
>;

/// How often the engine is polled; the refresh interval is counted separately.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Play in the terminal with the keyboard as joystick
pub struct HumanMode {
    config: GameConfig,
    highscore_path: PathBuf,
    metrics: GameMetrics,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, highscore_path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            highscore_path: highscore_path.into(),
            metrics: GameMetrics::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let engine = GameEngine::new(
            self.config.clone(),
            MonotonicClock::new(),
            JoystickLatch::default(),
            TerminalDisplay::new(terminal, self.config.border_radius),
            FileScoreStore::new(&self.highscore_path),
        );

        // Run game loop with cleanup
        let result = match engine {
            Ok(mut engine) => self.run_game_loop(&mut engine).await,
            Err(err) => Err(err),
        };

        // Cleanup terminal
        Self::cleanup_terminal()?;

        info!(
            games = self.metrics.games_played,
            best = self.metrics.best_score,
            longest = self.metrics.longest_snake,
            "session finished"
        );
        result
    }

    async fn run_game_loop(&mut self, engine: &mut TerminalEngine) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut poll_timer = interval(POLL_INTERVAL);
        poll_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        engine.reset_game()?;
        self.metrics.on_game_start();

        loop {
            tokio::select! {
                // Latch key presses until the engine reads them
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(engine.input_mut(), event);
                    }
                }

                // One loop iteration
                _ = poll_timer.tick() => {
                    let outcome = engine.poll()?;
                    self.observe(engine, &outcome)?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, joystick: &mut JoystickLatch, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Press(button) => joystick.press(button),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    /// Update session metrics and redraw the frame with the new status line.
    fn observe<C, I, B, S>(
        &mut self,
        engine: &mut GameEngine<C, I, TerminalDisplay<B>, S>,
        outcome: &TickOutcome,
    ) -> Result<()>
    where
        C: Clock,
        I: InputSource,
        B: Backend,
        S: ScoreStore,
    {
        let score = match outcome {
            TickOutcome::Stepped(_) => {
                self.metrics.update();
                engine.state().score
            }
            TickOutcome::GameOver(report) => {
                self.metrics.on_game_over(report);
                report.high_score.score
            }
            TickOutcome::Restarted => {
                self.metrics.on_game_start();
                return Ok(());
            }
            TickOutcome::Idle | TickOutcome::Waiting => return Ok(()),
        };

        // The engine has already presented this step; present again so the
        // status matches it.
        let renderer = engine.renderer_mut();
        renderer.set_status(self.metrics.status_line(score));
        renderer.present()
    }

    fn cleanup_terminal() -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(stderr(), LeaveAlternateScreen, Show)
            .context("Failed to leave alternate screen")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameEnd, GameOverReport, Input, StepInfo};
    use crate::platform::ManualClock;
    use crate::storage::{HighScoreReport, MemoryScoreStore};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    type ScreenEngine =
        GameEngine<ManualClock, JoystickLatch, TerminalDisplay<TestBackend>, MemoryScoreStore>;

    fn key_event(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    fn screen_engine() -> ScreenEngine {
        let config = GameConfig {
            seed: Some(3),
            ..GameConfig::small()
        };
        let terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let mut engine = GameEngine::new(
            config,
            ManualClock::starting_at(0),
            JoystickLatch::default(),
            TerminalDisplay::new(terminal, 5),
            MemoryScoreStore::default(),
        )
        .unwrap();
        engine.reset_game().unwrap();
        engine
    }

    fn screen(engine: &ScreenEngine) -> String {
        engine
            .renderer()
            .terminal()
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_mode_initialization() {
        let mode = HumanMode::new(GameConfig::default(), "highscore.txt");
        assert!(!mode.should_quit);
        assert_eq!(mode.highscore_path, PathBuf::from("highscore.txt"));
        assert_eq!(mode.metrics.games_played, 0);
    }

    #[test]
    fn test_presses_reach_joystick() {
        let mut mode = HumanMode::new(GameConfig::default(), "highscore.txt");
        let mut joystick = JoystickLatch::default();

        mode.handle_event(&mut joystick, key_event(KeyCode::Up, KeyEventKind::Press));
        mode.handle_event(&mut joystick, key_event(KeyCode::Enter, KeyEventKind::Press));

        assert_eq!(joystick.poll(), Input::Move(Direction::Up));
        assert!(!mode.should_quit);
    }

    #[test]
    fn test_releases_ignored() {
        let mut mode = HumanMode::new(GameConfig::default(), "highscore.txt");
        let mut joystick = JoystickLatch::default();

        mode.handle_event(&mut joystick, key_event(KeyCode::Left, KeyEventKind::Release));
        assert_eq!(joystick.poll(), Input::None);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = HumanMode::new(GameConfig::default(), "highscore.txt");
        let mut joystick = JoystickLatch::default();

        mode.handle_event(&mut joystick, key_event(KeyCode::Char('q'), KeyEventKind::Press));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_status_shown_with_the_step() {
        let mut mode = HumanMode::new(GameConfig::small(), "highscore.txt");
        let mut engine = screen_engine();
        assert!(!screen(&engine).contains("Games:"));

        let outcome = TickOutcome::Stepped(StepInfo {
            ate_food: false,
            end: None,
        });
        mode.observe(&mut engine, &outcome).unwrap();
        assert!(screen(&engine).contains("Games: 0"));
    }

    #[test]
    fn test_game_over_screen_counts_the_game() {
        let mut mode = HumanMode::new(GameConfig::small(), "highscore.txt");
        let mut engine = screen_engine();

        let report = GameOverReport {
            end: GameEnd::Collision,
            length: 4,
            high_score: HighScoreReport {
                score: 2,
                previous_best: 0,
                new_record: true,
            },
        };
        mode.observe(&mut engine, &TickOutcome::GameOver(report)).unwrap();

        let shown = screen(&engine);
        assert!(shown.contains("Score: 2"));
        assert!(shown.contains("Games: 1"));
    }
}
