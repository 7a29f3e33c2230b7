use super::{
    action::Direction,
    config::GameConfig,
    error::ConfigError,
    state::{GameState, Position, Snake},
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::time::Duration;
use tracing::{debug, warn};

/// Interval reduction that counts as one speed level
const SPEED_LEVEL_STEP: Duration = Duration::from_millis(10);

/// How a tick ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The snake advanced one cell
    Moved,
    /// The new head landed on the snake; nothing was changed
    Collided,
}

/// Result of a game tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    pub outcome: TickOutcome,
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Score after the tick
    pub score: u32,
    /// Interval until the next tick should fire
    pub tick_interval: Duration,
}

impl TickResult {
    pub fn is_collision(&self) -> bool {
        self.outcome == TickOutcome::Collided
    }
}

/// The game engine that handles all game logic
///
/// Owns the configuration and the random source used for food placement.
/// Any [`Rng`] can be injected; the default is a seedable PCG generator.
pub struct GameEngine<R = Pcg32> {
    config: GameConfig,
    rng: R,
}

impl GameEngine<Pcg32> {
    /// Create a new game engine seeded from OS entropy
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, Pcg32::from_entropy())
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a fresh game: one segment in the middle of the grid heading right
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(Position::new(center_x, center_y), Direction::default());

        let mut state = GameState::new(
            snake,
            Position::new(0, 0),
            self.config.grid_width,
            self.config.grid_height,
            self.config.initial_tick_interval(),
        );
        self.regenerate_food(&mut state);
        state
    }

    /// Move the food to a random cell not covered by the snake.
    ///
    /// Returns false, leaving the food where it was, only when the snake
    /// covers the whole grid.
    pub fn regenerate_food(&mut self, state: &mut GameState) -> bool {
        match self.spawn_food_avoid_snake(state) {
            Some(pos) => {
                state.food = pos;
                true
            }
            None => {
                warn!(
                    length = state.snake.len(),
                    "snake fills the grid, no free cell for food"
                );
                false
            }
        }
    }

    /// Queue a heading for the next tick. Reversals and same-axis
    /// requests are ignored.
    pub fn set_heading(&self, state: &mut GameState, requested: Direction) -> bool {
        let applied = state.snake.set_heading(requested);
        if !applied {
            debug!(?requested, last = ?state.snake.last_heading, "heading request ignored");
        }
        applied
    }

    /// Advance the game by one tick
    pub fn tick(&mut self, state: &mut GameState) -> TickResult {
        if !state.is_alive {
            return self.collided(state);
        }

        let heading = state.snake.commit_heading();
        let new_head = state
            .snake
            .head()
            .wrapped_step(heading, state.grid_width, state.grid_height);

        // Checked against the whole body, tail included, before it moves
        if state.snake.occupies(new_head) {
            state.is_alive = false;
            return self.collided(state);
        }

        let ate_food = new_head == state.food;
        state.snake.advance(new_head, ate_food);

        if ate_food {
            state.score = state.score.saturating_add(self.config.food_reward);
            self.regenerate_food(state);
            state.tick_interval = self.next_interval(state.tick_interval);
            debug!(
                score = state.score,
                length = state.snake.len(),
                interval_ms = state.tick_interval.as_millis() as u64,
                "food eaten"
            );
        }

        state.steps += 1;

        TickResult {
            outcome: TickOutcome::Moved,
            ate_food,
            score: state.score,
            tick_interval: state.tick_interval,
        }
    }

    /// Speed level shown to the player, starting at 1
    pub fn speed_level(&self, tick_interval: Duration) -> u32 {
        let gained = self
            .config
            .initial_tick_interval()
            .saturating_sub(tick_interval);
        (gained.as_millis() / SPEED_LEVEL_STEP.as_millis()) as u32 + 1
    }

    fn collided(&self, state: &GameState) -> TickResult {
        TickResult {
            outcome: TickOutcome::Collided,
            ate_food: false,
            score: state.score,
            tick_interval: state.tick_interval,
        }
    }

    fn next_interval(&self, current: Duration) -> Duration {
        current
            .saturating_sub(self.config.tick_step())
            .max(self.config.min_tick_interval())
    }

    /// Rejection-sample a free cell. After a bounded number of misses fall
    /// back to picking uniformly among the free cells.
    fn spawn_food_avoid_snake(&mut self, state: &GameState) -> Option<Position> {
        let attempts = state.cell_count().max(64);
        for _ in 0..attempts {
            let x = self.rng.gen_range(0..state.grid_width) as i32;
            let y = self.rng.gen_range(0..state.grid_height) as i32;
            let pos = Position::new(x, y);

            if !state.is_occupied_by_snake(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = (0..state.grid_height as i32)
            .flat_map(|y| (0..state.grid_width as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !state.is_occupied_by_snake(*pos))
            .collect();
        free.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(config: GameConfig) -> GameEngine {
        GameEngine::with_seed(config, 7).unwrap()
    }

    fn state_with(snake: Snake, food: Position, width: usize, height: usize) -> GameState {
        GameState::new(snake, food, width, height, Duration::from_millis(150))
    }

    #[test]
    fn test_reset() {
        let mut engine = engine(GameConfig::default());
        let state = engine.reset();

        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(10, 10));
        assert_eq!(state.snake.heading, Direction::Right);
        assert_eq!(state.snake.last_heading, Direction::Right);
        assert_eq!(state.tick_interval, Duration::from_millis(150));
        assert!(state.is_in_bounds(state.food));
        assert!(!state.snake.occupies(state.food));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let result = GameEngine::with_seed(GameConfig::new(0, 10), 1);
        assert!(matches!(result, Err(ConfigError::EmptyGrid { .. })));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.reset();
        let initial_head = state.snake.head();
        state.food = Position::new(0, 0);

        let result = engine.tick(&mut state);

        assert_eq!(result.outcome, TickOutcome::Moved);
        assert!(!result.ate_food);
        assert_eq!(state.steps, 1);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), initial_head.moved_by(1, 0));
    }

    #[test]
    fn test_food_consumption_on_four_by_four() {
        let config = GameConfig {
            grid_width: 4,
            grid_height: 4,
            ..Default::default()
        };
        let mut engine = engine(config);
        let mut state = engine.reset();
        assert_eq!(state.snake.head(), Position::new(2, 2));
        state.food = Position::new(3, 2);

        let result = engine.tick(&mut state);

        assert!(result.ate_food);
        assert_eq!(result.score, 10);
        assert_eq!(state.score, 10);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.snake.head(), Position::new(3, 2));
        assert_eq!(state.snake.tail(), Position::new(2, 2));
        assert_ne!(state.food, Position::new(2, 2));
        assert_ne!(state.food, Position::new(3, 2));
        assert_eq!(result.tick_interval, Duration::from_millis(148));
    }

    #[test]
    fn test_interval_floors_at_minimum() {
        let config = GameConfig {
            initial_tick_ms: 83,
            ..GameConfig::small()
        };
        let mut engine = engine(config);
        let mut state = engine.reset();

        let mut intervals = Vec::new();
        for _ in 0..3 {
            state.food = state
                .snake
                .head()
                .wrapped_step(state.snake.heading, 10, 10);
            intervals.push(engine.tick(&mut state).tick_interval.as_millis());
        }

        assert_eq!(intervals, vec![81, 80, 80]);
    }

    #[test]
    fn test_wraps_through_edges() {
        let mut engine = engine(GameConfig::small());
        let mut state = state_with(
            Snake::new(Position::new(9, 4), Direction::Right),
            Position::new(5, 5),
            10,
            10,
        );

        engine.tick(&mut state);
        assert_eq!(state.snake.head(), Position::new(0, 4));

        assert!(engine.set_heading(&mut state, Direction::Up));
        for _ in 0..5 {
            engine.tick(&mut state);
        }
        assert_eq!(state.snake.head(), Position::new(0, 9));
    }

    #[test]
    fn test_self_collision_leaves_state_untouched() {
        let mut engine = engine(GameConfig::small());
        let snake = Snake::from_segments(
            [
                Position::new(5, 5),
                Position::new(5, 6),
                Position::new(4, 6),
                Position::new(4, 5),
                Position::new(3, 5),
            ],
            Direction::Up,
        );
        let mut state = state_with(snake, Position::new(8, 8), 10, 10);
        // Turn left into (4, 5), a body segment
        assert!(engine.set_heading(&mut state, Direction::Left));
        let before = state.clone();

        let result = engine.tick(&mut state);

        assert!(result.is_collision());
        assert!(!state.is_alive);
        assert_eq!(state.snake.body, before.snake.body);
        assert_eq!(state.food, before.food);
        assert_eq!(state.score, before.score);
        assert_eq!(state.steps, before.steps);
        assert_eq!(state.snake.last_heading, Direction::Left);
    }

    #[test]
    fn test_moving_into_tail_is_a_collision() {
        let mut engine = engine(GameConfig::new(3, 3));
        // A 2x2 loop: heading left from (1, 0) lands on the tail at (0, 0)
        let snake = Snake::from_segments(
            [
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(0, 1),
                Position::new(0, 0),
            ],
            Direction::Up,
        );
        let mut state = state_with(snake, Position::new(2, 2), 3, 3);
        engine.set_heading(&mut state, Direction::Left);

        let result = engine.tick(&mut state);

        assert_eq!(result.outcome, TickOutcome::Collided);
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_heading_into_neck_collides() {
        let mut engine = engine(GameConfig::new(4, 4));
        let snake = Snake::from_segments(
            [Position::new(3, 2), Position::new(2, 2), Position::new(1, 2)],
            Direction::Left,
        );
        let mut state = state_with(snake, Position::new(0, 0), 4, 4);

        let result = engine.tick(&mut state);

        assert!(result.is_collision());
        assert_eq!(state.snake.head(), Position::new(3, 2));
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_collision_through_wrap() {
        let mut engine = engine(GameConfig::new(4, 4));
        // Heading left from column 0 wraps onto (3, 2)
        let snake = Snake::from_segments(
            [Position::new(0, 2), Position::new(3, 2), Position::new(2, 2)],
            Direction::Left,
        );
        let mut state = state_with(snake, Position::new(1, 1), 4, 4);

        let result = engine.tick(&mut state);

        assert!(result.is_collision());
        assert_eq!(state.snake.head(), Position::new(0, 2));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.reset();

        // Try to turn 180 degrees (should be ignored)
        assert!(!engine.set_heading(&mut state, Direction::Left));
        engine.tick(&mut state);

        assert_eq!(state.snake.last_heading, Direction::Right);
    }

    #[test]
    fn test_quick_double_turn_cannot_reverse() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.reset();
        state.food = Position::new(0, 0);
        let head = state.snake.head();

        // Up then Left within one tick: Left is judged against Right
        assert!(engine.set_heading(&mut state, Direction::Up));
        assert!(!engine.set_heading(&mut state, Direction::Left));
        engine.tick(&mut state);

        assert_eq!(state.snake.head(), head.moved_by(0, -1));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.reset();
        state.is_alive = false;
        let before = state.clone();

        let result = engine.tick(&mut state);

        assert!(result.is_collision());
        assert_eq!(state, before);
    }

    #[test]
    fn test_food_fills_last_free_cell() {
        let mut engine = engine(GameConfig::new(2, 2));
        let snake = Snake::from_segments(
            [Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)],
            Direction::Left,
        );
        let mut state = state_with(snake, Position::new(0, 0), 2, 2);

        assert!(engine.regenerate_food(&mut state));
        assert_eq!(state.food, Position::new(0, 1));
    }

    #[test]
    fn test_full_grid_keeps_food() {
        let mut engine = engine(GameConfig::new(2, 1));
        let snake = Snake::from_segments(
            [Position::new(0, 0), Position::new(1, 0)],
            Direction::Left,
        );
        let mut state = state_with(snake, Position::new(1, 0), 2, 1);

        assert!(!engine.regenerate_food(&mut state));
        assert_eq!(state.food, Position::new(1, 0));
    }

    #[test]
    fn test_seeded_engines_agree() {
        let mut a = engine(GameConfig::default());
        let mut b = engine(GameConfig::default());
        let foods_a: Vec<_> = (0..5).map(|_| a.reset().food).collect();
        let foods_b: Vec<_> = (0..5).map(|_| b.reset().food).collect();
        assert_eq!(foods_a, foods_b);
    }

    #[test]
    fn test_speed_level() {
        let engine = engine(GameConfig::default());
        assert_eq!(engine.speed_level(Duration::from_millis(150)), 1);
        assert_eq!(engine.speed_level(Duration::from_millis(141)), 1);
        assert_eq!(engine.speed_level(Duration::from_millis(140)), 2);
        assert_eq!(engine.speed_level(Duration::from_millis(80)), 8);
    }
}
