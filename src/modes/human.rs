use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use crate::game::{Command, GamePhase, GameSession};
use crate::input::{InputHandler, KeyAction, translate};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

use super::scheduler::TickScheduler;

pub struct HumanMode {
    session: GameSession,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    scheduler: TickScheduler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            scheduler: TickScheduler::new(),
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

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            games_played = self.metrics.games_played,
            high_score = self.session.high_score(),
            "session closed"
        );
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick, only armed while playing
                _ = self.scheduler.wait() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.session.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
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

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            if action == KeyAction::Quit {
                self.should_quit = true;
                return;
            }

            if let Some(command) = translate(action, self.session.phase()) {
                self.apply_command(command);
            }
        }
    }

    fn apply_command(&mut self, command: Command) {
        if !self.session.apply(command) {
            return;
        }

        match command {
            Command::Start | Command::PlayAgain => self.metrics.on_game_start(),
            Command::TogglePause if self.session.phase() == GamePhase::Paused => {
                self.metrics.pause()
            }
            Command::TogglePause => self.metrics.resume(),
            Command::Menu => self.metrics.pause(),
            Command::Turn(_) => {}
        }

        self.sync_scheduler();
    }

    fn update_game(&mut self) {
        if let Some(result) = self.session.tick() {
            // Track game over
            if result.is_collision() {
                self.metrics.on_game_over();
            }
        }

        self.sync_scheduler();
    }

    fn sync_scheduler(&mut self) {
        self.scheduler
            .sync(self.session.phase(), self.session.tick_interval());
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
