use std::time::{Duration, Instant};

/// Play-time clock and game counter shown in the header
pub struct GameMetrics {
    running_since: Option<Instant>,
    accumulated: Duration,
    pub elapsed_time: Duration,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            running_since: None,
            accumulated: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            games_played: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.accumulated
            + self
                .running_since
                .map_or(Duration::ZERO, |since| since.elapsed());
    }

    pub fn on_game_start(&mut self) {
        self.accumulated = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
        self.running_since = Some(Instant::now());
    }

    /// Stop the clock, e.g. while paused
    pub fn pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
        self.update();
    }

    pub fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn on_game_over(&mut self) {
        self.pause();
        self.games_played += 1;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
