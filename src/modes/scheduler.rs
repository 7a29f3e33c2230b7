use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use crate::game::GamePhase;

/// Repeating game-tick timer
///
/// Armed only while a game is being played. A new period takes effect from
/// the next firing; the first firing comes one full period after arming.
pub struct TickScheduler {
    timer: Option<Interval>,
    period: Duration,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self {
            timer: None,
            period: Duration::ZERO,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.timer.as_ref().map(|_| self.period)
    }

    /// Bring the timer in line with the session after a command or tick
    pub fn sync(&mut self, phase: GamePhase, tick_interval: Duration) {
        if phase != GamePhase::Playing {
            self.timer = None;
            return;
        }
        if self.timer.is_some() && self.period == tick_interval {
            return;
        }
        self.arm(tick_interval);
    }

    /// Wait for the next tick. Never completes while disarmed.
    pub async fn wait(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    fn arm(&mut self, period: Duration) {
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.timer = Some(timer);
        self.period = period;
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}
