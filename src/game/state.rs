use std::collections::VecDeque;
use std::time::Duration;

use super::action::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Step one cell in a direction, wrapping around the edges of a
    /// `width` x `height` grid
    pub fn wrapped_step(&self, direction: Direction, width: usize, height: usize) -> Self {
        let (dx, dy) = direction.delta();
        let moved = self.moved_by(dx, dy);
        Self {
            x: moved.x.rem_euclid(width as i32),
            y: moved.y.rem_euclid(height as i32),
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    pub body: VecDeque<Position>,
    /// Heading to apply on the next tick
    pub heading: Direction,
    /// Heading actually used on the previous tick
    pub last_heading: Direction,
}

impl Snake {
    /// Create a one-segment snake
    pub fn new(head: Position, heading: Direction) -> Self {
        Self::from_segments([head], heading)
    }

    /// Create a snake from its segments, head first
    ///
    /// # Panics
    ///
    /// Panics if `segments` is empty.
    pub fn from_segments(segments: impl IntoIterator<Item = Position>, heading: Direction) -> Self {
        let body: VecDeque<Position> = segments.into_iter().collect();
        assert!(!body.is_empty(), "a snake needs at least one segment");
        Self {
            body,
            heading,
            last_heading: heading,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Check if any segment, head and tail included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Request a new heading for the next tick.
    ///
    /// Only a turn onto the other axis than the one last travelled is
    /// accepted. Returns whether the request took effect.
    pub fn set_heading(&mut self, requested: Direction) -> bool {
        if requested.axis() == self.last_heading.axis() {
            return false;
        }
        self.heading = requested;
        true
    }

    /// Lock in the pending heading for this tick and return it
    pub fn commit_heading(&mut self) -> Direction {
        self.last_heading = self.heading;
        self.heading
    }

    /// Push a new head; drop the tail unless growing
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);

        if !grow {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Complete state of one game
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    pub tick_interval: Duration,
    pub is_alive: bool,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snake: Snake,
        food: Position,
        grid_width: usize,
        grid_height: usize,
        tick_interval: Duration,
    ) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            tick_interval,
            is_alive: true,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    /// Number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }
}
