//! Game session: phases, commands and the high score
//!
//! A [`GameSession`] wraps one [`GameEngine`] and the [`GameState`] of the
//! game in progress. Front ends drive it with [`Command`]s and a repeating
//! tick, and draw from [`Snapshot`]s.

use rand::Rng;
use rand_pcg::Pcg32;
use std::time::Duration;
use tracing::{debug, info};

use super::{
    action::Direction,
    engine::{GameEngine, TickResult},
    state::{GameState, Position},
};

/// Coarse state of the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Requests a front end can send to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the menu and begin a new game
    Start,
    /// Begin a new game after a game over
    PlayAgain,
    /// Pause while playing, resume while paused
    TogglePause,
    /// Abandon the current game and return to the menu
    Menu,
    /// Ask the snake to turn
    Turn(Direction),
}

/// Read-only copy of everything a renderer needs
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Snake cells, head first
    pub snake: Vec<Position>,
    pub heading: Direction,
    pub food: Position,
    pub score: u32,
    pub high_score: u32,
    pub tick_interval: Duration,
    pub speed_level: u32,
    pub phase: GamePhase,
    pub grid_width: usize,
    pub grid_height: usize,
}

impl Snapshot {
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }

    pub fn snake_len(&self) -> usize {
        self.snake.len()
    }

    /// True when the finished game set the current record
    pub fn is_new_high_score(&self) -> bool {
        self.score > 0 && self.score == self.high_score
    }
}

pub struct GameSession<R = Pcg32> {
    engine: GameEngine<R>,
    state: GameState,
    phase: GamePhase,
    high_score: u32,
}

impl<R: Rng> GameSession<R> {
    /// Create a session sitting in the menu
    pub fn new(mut engine: GameEngine<R>) -> Self {
        let state = engine.reset();
        Self {
            engine,
            state,
            phase: GamePhase::Menu,
            high_score: 0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn engine(&self) -> &GameEngine<R> {
        &self.engine
    }

    /// Current tick interval; the scheduler re-arms with this after every tick
    pub fn tick_interval(&self) -> Duration {
        self.state.tick_interval
    }

    /// Apply a command. Returns false when it does not apply in the current
    /// phase; such commands are dropped without effect.
    pub fn apply(&mut self, command: Command) -> bool {
        let applied = match command {
            Command::Start => self.start(),
            Command::PlayAgain => self.play_again(),
            Command::TogglePause => self.toggle_pause(),
            Command::Menu => self.to_menu(),
            Command::Turn(direction) => self.set_heading(direction),
        };
        if !applied {
            debug!(?command, phase = ?self.phase, "command dropped");
        }
        applied
    }

    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            return false;
        }
        self.begin_game();
        true
    }

    pub fn play_again(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.begin_game();
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::Menu | GamePhase::GameOver => return false,
        };
        true
    }

    pub fn to_menu(&mut self) -> bool {
        if self.phase == GamePhase::Menu {
            return false;
        }
        self.phase = GamePhase::Menu;
        true
    }

    /// Queue a turn for the next tick. Only honored while playing.
    pub fn set_heading(&mut self, direction: Direction) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.engine.set_heading(&mut self.state, direction)
    }

    /// Run one tick of the game in progress.
    ///
    /// Returns `None` outside [`GamePhase::Playing`]. A collision moves the
    /// session to [`GamePhase::GameOver`] and records a new high score.
    pub fn tick(&mut self) -> Option<TickResult> {
        if self.phase != GamePhase::Playing {
            return None;
        }

        let result = self.engine.tick(&mut self.state);
        if result.is_collision() {
            self.phase = GamePhase::GameOver;
            if self.state.score > self.high_score {
                self.high_score = self.state.score;
            }
            info!(
                score = self.state.score,
                high_score = self.high_score,
                length = self.state.snake.len(),
                "game over"
            );
        }
        Some(result)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.state.snake.body.iter().copied().collect(),
            heading: self.state.snake.heading,
            food: self.state.food,
            score: self.state.score,
            high_score: self.high_score,
            tick_interval: self.state.tick_interval,
            speed_level: self.engine.speed_level(self.state.tick_interval),
            phase: self.phase,
            grid_width: self.state.grid_width,
            grid_height: self.state.grid_height,
        }
    }

    fn begin_game(&mut self) {
        self.state = self.engine.reset();
        self.phase = GamePhase::Playing;
        info!(
            width = self.state.grid_width,
            height = self.state.grid_height,
            "game started"
        );
    }
}
