use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use super::{
    action::Input,
    config::GameConfig,
    food::{Food, Placement},
    state::{GamePhase, GameState, Snake},
};
use crate::platform::{Clock, InputSource, Renderer, TextLine, Tint};
use crate::storage::{HighScoreReport, ScoreStore, submit_score};

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    /// The head ran into the body
    Collision,
    /// The snake covers the whole disk and there is nowhere to put food
    BoardCleared,
}

/// Information about a simulation step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Set if this step ended the game
    pub end: Option<GameEnd>,
}

/// Summary handed out when a game ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverReport {
    pub end: GameEnd,
    pub length: usize,
    pub high_score: HighScoreReport,
}

/// What one call to [`GameEngine::poll`] did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Not time to step yet
    Idle,
    /// The simulation advanced one step
    Stepped(StepInfo),
    /// The step just taken ended the game
    GameOver(GameOverReport),
    /// Game over, still waiting for confirm
    Waiting,
    /// Confirm was pressed and a fresh game started
    Restarted,
}

/// Fixed-tick game loop over a set of collaborators
///
/// Call [`GameEngine::poll`] as often as possible. The snake steps once per
/// refresh interval while input is read on every call, and the game-over wait
/// is just another phase, so nothing here blocks.
pub struct GameEngine<C, I, R, S> {
    config: GameConfig,
    state: GameState,
    clock: C,
    input: I,
    renderer: R,
    scores: S,
    rng: StdRng,
}

impl<C, I, R, S> GameEngine<C, I, R, S>
where
    C: Clock,
    I: InputSource,
    R: Renderer,
    S: ScoreStore,
{
    /// Create a new engine. The first game does not start until [`GameEngine::reset_game`].
    pub fn new(config: GameConfig, clock: C, input: I, renderer: R, scores: S) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = GameState::new(
            Snake::new(config.border_radius, config.initial_length),
            Food::new(config.border_radius),
            clock.now_ms(),
        );

        Ok(Self {
            config,
            state,
            clock,
            input,
            renderer,
            scores,
            rng,
        })
    }

    /// Start a new game: fresh snake, food, score and clock.
    pub fn reset_game(&mut self) -> Result<()> {
        self.renderer.clear();
        self.state = GameState::new(
            Snake::new(self.config.border_radius, self.config.initial_length),
            Food::new(self.config.border_radius),
            self.clock.now_ms(),
        );
        let placement = self.state.food.relocate(
            &self.state.snake,
            &mut self.rng,
            self.config.max_food_attempts,
        );

        let snake = &self.state.snake;
        self.renderer.draw_cell(snake.head(), Tint::SnakeHead);
        for cell in snake.body() {
            self.renderer.draw_cell(cell, Tint::SnakeBody);
        }

        if placement == Placement::BoardFull {
            // Nothing left to eat before the first step.
            self.finish_game(GameEnd::BoardCleared)?;
            return Ok(());
        }
        self.renderer.draw_cell(self.state.food.position(), Tint::Food);
        self.renderer.present()?;

        info!(
            radius = self.config.border_radius,
            food = ?self.state.food.position(),
            "new game"
        );
        Ok(())
    }

    /// Run one iteration of the loop
    pub fn poll(&mut self) -> Result<TickOutcome> {
        match self.state.phase {
            GamePhase::Running => self.poll_running(),
            GamePhase::GameOver => self.poll_game_over(),
        }
    }

    fn poll_running(&mut self) -> Result<TickOutcome> {
        let now = self.clock.now_ms();
        let mut outcome = TickOutcome::Idle;

        if self.clock.elapsed_ms(now, self.state.last_step_ms) >= self.config.refresh_interval_ms {
            self.state.last_step_ms = now;
            let info = self.advance()?;

            if let Some(end) = info.end {
                return Ok(TickOutcome::GameOver(self.finish_game(end)?));
            }
            outcome = TickOutcome::Stepped(info);
        }

        if let Input::Move(direction) = self.input.poll() {
            self.state.snake.set_direction(direction);
        }

        Ok(outcome)
    }

    fn poll_game_over(&mut self) -> Result<TickOutcome> {
        if self.input.poll() == Input::Confirm {
            self.reset_game()?;
            return Ok(TickOutcome::Restarted);
        }
        Ok(TickOutcome::Waiting)
    }

    /// Step the snake, eat, draw, then check for the end of the game.
    fn advance(&mut self) -> Result<StepInfo> {
        let state = &mut self.state;
        let vacated = state.snake.step();
        state.steps += 1;

        let mut ate_food = false;
        let mut board_full = false;
        if state.snake.head() == state.food.position() {
            ate_food = true;
            state.score += 1;
            state.snake.grow();
            board_full = state.food.relocate(
                &state.snake,
                &mut self.rng,
                self.config.max_food_attempts,
            ) == Placement::BoardFull;
        }

        if let Some(cell) = vacated {
            self.renderer.clear_cell(cell);
        }
        let prev = state.snake.prev_head();
        if state.snake.body().any(|pos| pos == prev) {
            self.renderer.draw_cell(prev, Tint::SnakeBody);
        }
        self.renderer.draw_cell(state.snake.head(), Tint::SnakeHead);
        if !board_full {
            self.renderer.draw_cell(state.food.position(), Tint::Food);
        }
        self.renderer.present()?;

        let end = if state.snake.is_overlapping() {
            Some(GameEnd::Collision)
        } else if board_full {
            Some(GameEnd::BoardCleared)
        } else {
            None
        };

        Ok(StepInfo { ate_food, end })
    }

    fn finish_game(&mut self, end: GameEnd) -> Result<GameOverReport> {
        self.state.phase = GamePhase::GameOver;
        let high_score = submit_score(&mut self.scores, self.state.score);

        let headline = match end {
            GameEnd::Collision => "GAME OVER",
            GameEnd::BoardCleared => "YOU WIN",
        };
        self.renderer.draw_text(&[
            TextLine::new(0, headline, Tint::Alert),
            TextLine::new(1, "Score:", Tint::Text),
            TextLine::new(2, high_score.score.to_string(), Tint::Text),
            TextLine::new(3, "High Score:", Tint::Text),
            TextLine::new(4, high_score.previous_best.to_string(), Tint::Text),
        ]);
        self.renderer.present()?;

        let report = GameOverReport {
            end,
            length: self.state.snake.length(),
            high_score,
        };
        info!(
            score = high_score.score,
            best = high_score.previous_best,
            new_record = high_score.new_record,
            steps = self.state.steps,
            ?end,
            "game over"
        );
        Ok(report)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position};
    use crate::platform::ManualClock;
    use crate::platform::testing::{RecordingRenderer, ScriptedInput};
    use crate::storage::MemoryScoreStore;

    type TestEngine = GameEngine<ManualClock, ScriptedInput, RecordingRenderer, MemoryScoreStore>;

    const TICK: u32 = 70;

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn engine_with_store(config: GameConfig, store: MemoryScoreStore) -> TestEngine {
        let config = GameConfig {
            seed: Some(1),
            ..config
        };
        let mut engine = GameEngine::new(
            config,
            ManualClock::starting_at(1_000),
            ScriptedInput::default(),
            RecordingRenderer::default(),
            store,
        )
        .unwrap();
        engine.reset_game().unwrap();
        engine
    }

    fn engine(config: GameConfig) -> TestEngine {
        engine_with_store(config, MemoryScoreStore::default())
    }

    fn tick(engine: &mut TestEngine) -> TickOutcome {
        engine.clock().advance(TICK);
        engine.poll().unwrap()
    }

    /// Snake heading up whose next step lands on its own body
    fn doomed_snake(radius: i32) -> Snake {
        Snake::with_history(
            radius,
            vec![pos(0, 0), pos(1, 0), pos(1, -1), pos(0, -1), pos(-1, -1)],
            Direction::Up,
        )
    }

    #[test]
    fn test_reset() {
        let engine = engine(GameConfig::small());
        let state = engine.state();

        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.length(), 2);
        assert!(!state.snake.occupies(state.food.position()));
        assert_eq!(engine.renderer().clears, 1);
        assert_eq!(engine.renderer().frames, 1);
    }

    #[test]
    fn test_reset_draws_snake_and_food() {
        let engine = engine(GameConfig {
            initial_length: 3,
            ..GameConfig::small()
        });
        let cells = &engine.renderer().cells;

        assert_eq!(cells.get(&pos(0, 0)), Some(&Tint::SnakeHead));
        assert_eq!(cells.get(&pos(1, 0)), Some(&Tint::SnakeBody));
        assert_eq!(cells.get(&pos(2, 0)), Some(&Tint::SnakeBody));
        assert_eq!(
            cells.get(&engine.state().food.position()),
            Some(&Tint::Food)
        );
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = GameEngine::new(
            GameConfig::new(0),
            ManualClock::starting_at(0),
            ScriptedInput::default(),
            RecordingRenderer::default(),
            MemoryScoreStore::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_no_step_before_interval() {
        let mut engine = engine(GameConfig::small());
        engine.clock().advance(TICK - 1);

        assert_eq!(engine.poll().unwrap(), TickOutcome::Idle);
        assert_eq!(engine.state().snake.head(), pos(0, 0));
        assert_eq!(engine.state().steps, 0);
        // Input is still read while waiting for the tick.
        assert_eq!(engine.input_mut().polls, 1);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine(GameConfig::small());
        engine.state.food.place_at(pos(3, 3));

        let outcome = tick(&mut engine);

        assert_eq!(
            outcome,
            TickOutcome::Stepped(StepInfo {
                ate_food: false,
                end: None
            })
        );
        assert_eq!(engine.state().snake.head(), pos(-1, 0));
        assert_eq!(engine.state().steps, 1);

        let cells = &engine.renderer().cells;
        assert_eq!(cells.get(&pos(-1, 0)), Some(&Tint::SnakeHead));
        assert_eq!(cells.get(&pos(0, 0)), Some(&Tint::SnakeBody));
        assert_eq!(cells.get(&pos(3, 3)), Some(&Tint::Food));
        assert_eq!(cells.get(&pos(1, 0)), None);
        assert_eq!(engine.renderer().frames, 2);
    }

    #[test]
    fn test_interval_measured_from_last_step() {
        let mut engine = engine(GameConfig::small());
        engine.state.food.place_at(pos(3, 3));
        tick(&mut engine);

        engine.clock().advance(TICK / 2);
        assert_eq!(engine.poll().unwrap(), TickOutcome::Idle);
        engine.clock().advance(TICK / 2);
        assert!(matches!(engine.poll().unwrap(), TickOutcome::Stepped(_)));
        assert_eq!(engine.state().steps, 2);
    }

    #[test]
    fn test_food_consumption_and_growth_lag() {
        let mut engine = engine(GameConfig::small());
        engine.state.food.place_at(pos(-1, 0));

        let outcome = tick(&mut engine);

        assert_eq!(
            outcome,
            TickOutcome::Stepped(StepInfo {
                ate_food: true,
                end: None
            })
        );
        let snake = &engine.state().snake;
        assert_eq!(engine.state().score, 1);
        assert_eq!(snake.length(), 3);
        assert_eq!(snake.history().len(), 2);
        assert_ne!(engine.state().food.position(), pos(-1, 0));
        assert!(!snake.occupies(engine.state().food.position()));

        let food = engine.state().food.position();
        if engine.state().snake.next_position() == food {
            engine.state.food.place_at(pos(0, 4));
        }
        tick(&mut engine);
        assert_eq!(engine.state().snake.history().len(), 3);
    }

    #[test]
    fn test_six_foods_in_a_row() {
        let mut engine = engine(GameConfig::small());

        for _ in 0..6 {
            let next = engine.state().snake.next_position();
            engine.state.food.place_at(next);
            let outcome = tick(&mut engine);
            assert!(matches!(
                outcome,
                TickOutcome::Stepped(StepInfo { ate_food: true, .. })
            ));
        }

        // Five cells left along the row, then the mirror back to the right edge.
        assert_eq!(engine.state().snake.head(), pos(5, 0));
        assert_eq!(engine.state().score, 6);
        assert_eq!(engine.state().snake.length(), 8);
    }

    #[test]
    fn test_turn_applies_on_next_tick() {
        let mut engine = engine(GameConfig::small());
        engine.state.food.place_at(pos(3, 3));
        engine.input_mut().push(Direction::Up);

        assert_eq!(engine.poll().unwrap(), TickOutcome::Idle);
        assert_eq!(engine.state().snake.direction(), Direction::Up);

        tick(&mut engine);
        assert_eq!(engine.state().snake.head(), pos(0, -1));
    }

    #[test]
    fn test_reverse_input_ignored() {
        let mut engine = engine(GameConfig::small());
        engine.state.food.place_at(pos(3, 3));
        engine.input_mut().push(Direction::Right);
        engine.input_mut().push(Input::Confirm);

        engine.poll().unwrap();
        engine.poll().unwrap();
        assert_eq!(engine.state().snake.direction(), Direction::Left);
        assert!(engine.state().is_running());
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut engine = engine_with_store(GameConfig::small(), MemoryScoreStore::with_score(10));
        engine.state.snake = doomed_snake(5);
        engine.state.food.place_at(pos(3, 3));
        engine.state.score = 4;

        let outcome = tick(&mut engine);

        let TickOutcome::GameOver(report) = outcome else {
            panic!("expected game over, got {:?}", outcome);
        };
        assert_eq!(report.end, GameEnd::Collision);
        assert_eq!(report.high_score.score, 4);
        assert_eq!(report.high_score.previous_best, 10);
        assert!(!report.high_score.new_record);
        assert_eq!(engine.scores().value(), Some(10));
        assert_eq!(engine.state().phase, GamePhase::GameOver);

        let text = &engine.renderer().text;
        assert_eq!(text[0], TextLine::new(0, "GAME OVER", Tint::Alert));
        assert_eq!(text[2].text, "4");
        assert_eq!(text[4].text, "10");
    }

    #[test]
    fn test_new_high_score_is_saved() {
        let mut engine = engine_with_store(GameConfig::small(), MemoryScoreStore::with_score(2));
        engine.state.snake = doomed_snake(5);
        engine.state.food.place_at(pos(3, 3));
        engine.state.score = 7;

        let TickOutcome::GameOver(report) = tick(&mut engine) else {
            panic!("expected game over");
        };
        assert!(report.high_score.new_record);
        assert_eq!(engine.scores().value(), Some(7));
        // The screen shows the best from before this game.
        assert_eq!(engine.renderer().text[4].text, "2");
    }

    #[test]
    fn test_game_over_waits_for_confirm() {
        let mut engine = engine(GameConfig::small());
        engine.state.snake = doomed_snake(5);
        engine.state.food.place_at(pos(3, 3));
        engine.state.score = 3;
        tick(&mut engine);

        engine.input_mut().push(Direction::Left);
        assert_eq!(tick(&mut engine), TickOutcome::Waiting);
        assert_eq!(tick(&mut engine), TickOutcome::Waiting);
        assert_eq!(engine.state().score, 3);

        engine.input_mut().push(Input::Confirm);
        assert_eq!(engine.poll().unwrap(), TickOutcome::Restarted);

        let state = engine.state();
        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.snake, Snake::new(5, 2));
        assert_eq!(state.last_step_ms, engine.clock().now_ms());
        assert!(engine.renderer().text.is_empty());
    }

    #[test]
    fn test_board_cleared() {
        let mut engine = engine(GameConfig::new(1));
        // After the step the trail covers all five cells of the radius-1 disk.
        engine.state.snake = Snake::with_history(
            1,
            vec![pos(0, 0), pos(1, 0), pos(0, 1), pos(-1, 0), pos(-1, 0)],
            Direction::Up,
        );
        engine.state.food.place_at(pos(0, -1));

        let TickOutcome::GameOver(report) = tick(&mut engine) else {
            panic!("expected the game to end");
        };
        assert_eq!(report.end, GameEnd::BoardCleared);
        assert_eq!(report.high_score.score, 1);
        assert_eq!(report.length, 6);
        assert_eq!(engine.renderer().text[0].text, "YOU WIN");
    }

    #[test]
    fn test_seeded_engines_place_food_identically() {
        let a = engine(GameConfig::default());
        let b = engine(GameConfig::default());
        assert_eq!(a.state().food, b.state().food);
    }
}
